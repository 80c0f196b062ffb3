//! Consensus (SIP-005) binary encoding of Clarity values.

use crate::value::HASH160_LEN;
use crate::{ClarityError, ClarityValue, Principal, Result};
use std::collections::BTreeMap;

pub const MAX_DEPTH: usize = 32;

const TYPE_INT: u8 = 0x00;
const TYPE_UINT: u8 = 0x01;
const TYPE_BUFFER: u8 = 0x02;
const TYPE_TRUE: u8 = 0x03;
const TYPE_FALSE: u8 = 0x04;
const TYPE_STANDARD_PRINCIPAL: u8 = 0x05;
const TYPE_CONTRACT_PRINCIPAL: u8 = 0x06;
const TYPE_RESPONSE_OK: u8 = 0x07;
const TYPE_RESPONSE_ERR: u8 = 0x08;
const TYPE_OPTIONAL_NONE: u8 = 0x09;
const TYPE_OPTIONAL_SOME: u8 = 0x0a;
const TYPE_LIST: u8 = 0x0b;
const TYPE_TUPLE: u8 = 0x0c;
const TYPE_STRING_ASCII: u8 = 0x0d;
const TYPE_STRING_UTF8: u8 = 0x0e;

impl ClarityValue {
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        write_value(self, &mut out)?;
        Ok(out)
    }

    /// `0x`-prefixed lower-case hex, the form the node's HTTP API expects.
    pub fn to_hex(&self) -> Result<String> {
        Ok(format!("0x{}", hex::encode(self.serialize()?)))
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader { bytes, offset: 0 };
        let value = reader.read_value(0)?;
        let remaining = bytes.len() - reader.offset;
        if remaining != 0 {
            return Err(ClarityError::TrailingBytes(remaining));
        }
        Ok(value)
    }

    pub fn from_hex(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = hex::decode(digits).map_err(|e| ClarityError::InvalidHex(e.to_string()))?;
        Self::deserialize(&bytes)
    }
}

fn write_len(len: usize, out: &mut Vec<u8>) -> Result<()> {
    let len = u32::try_from(len).map_err(|_| ClarityError::TooLarge(format!("{} items", len)))?;
    out.extend_from_slice(&len.to_be_bytes());
    Ok(())
}

fn write_short_name(name: &str, out: &mut Vec<u8>) -> Result<()> {
    let len = u8::try_from(name.len())
        .map_err(|_| ClarityError::TooLarge(format!("name '{}'", name)))?;
    out.push(len);
    out.extend_from_slice(name.as_bytes());
    Ok(())
}

fn write_value(value: &ClarityValue, out: &mut Vec<u8>) -> Result<()> {
    match value {
        ClarityValue::Int(v) => {
            out.push(TYPE_INT);
            out.extend_from_slice(&v.to_be_bytes());
        }
        ClarityValue::UInt(v) => {
            out.push(TYPE_UINT);
            out.extend_from_slice(&v.to_be_bytes());
        }
        ClarityValue::Bool(true) => out.push(TYPE_TRUE),
        ClarityValue::Bool(false) => out.push(TYPE_FALSE),
        ClarityValue::Buffer(bytes) => {
            out.push(TYPE_BUFFER);
            write_len(bytes.len(), out)?;
            out.extend_from_slice(bytes);
        }
        ClarityValue::StringAscii(s) => {
            if !s.is_ascii() {
                return Err(ClarityError::InvalidString(format!(
                    "non-ASCII data in string-ascii: {:?}",
                    s
                )));
            }
            out.push(TYPE_STRING_ASCII);
            write_len(s.len(), out)?;
            out.extend_from_slice(s.as_bytes());
        }
        ClarityValue::StringUtf8(s) => {
            out.push(TYPE_STRING_UTF8);
            write_len(s.len(), out)?;
            out.extend_from_slice(s.as_bytes());
        }
        ClarityValue::Principal(Principal::Standard { version, hash160 }) => {
            out.push(TYPE_STANDARD_PRINCIPAL);
            out.push(*version);
            out.extend_from_slice(hash160);
        }
        ClarityValue::Principal(Principal::Contract {
            version,
            hash160,
            name,
        }) => {
            out.push(TYPE_CONTRACT_PRINCIPAL);
            out.push(*version);
            out.extend_from_slice(hash160);
            write_short_name(name, out)?;
        }
        ClarityValue::ResponseOk(inner) => {
            out.push(TYPE_RESPONSE_OK);
            write_value(inner, out)?;
        }
        ClarityValue::ResponseErr(inner) => {
            out.push(TYPE_RESPONSE_ERR);
            write_value(inner, out)?;
        }
        ClarityValue::OptionalNone => out.push(TYPE_OPTIONAL_NONE),
        ClarityValue::OptionalSome(inner) => {
            out.push(TYPE_OPTIONAL_SOME);
            write_value(inner, out)?;
        }
        ClarityValue::List(items) => {
            out.push(TYPE_LIST);
            write_len(items.len(), out)?;
            for item in items {
                write_value(item, out)?;
            }
        }
        ClarityValue::Tuple(fields) => {
            out.push(TYPE_TUPLE);
            write_len(fields.len(), out)?;
            // BTreeMap iteration is already in the lexicographic order Clarity requires
            for (name, field) in fields {
                write_short_name(name, out)?;
                write_value(field, out)?;
            }
        }
    }
    Ok(())
}

struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, needed: usize) -> Result<&'a [u8]> {
        let end = self
            .offset
            .checked_add(needed)
            .filter(|end| *end <= self.bytes.len())
            .ok_or(ClarityError::UnexpectedEnd {
                offset: self.offset,
                needed,
            })?;
        let slice = &self.bytes[self.offset..end];
        self.offset = end;
        Ok(slice)
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn read_u32(&mut self) -> Result<usize> {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(self.take(4)?);
        Ok(u32::from_be_bytes(buf) as usize)
    }

    fn read_16(&mut self) -> Result<[u8; 16]> {
        let mut buf = [0u8; 16];
        buf.copy_from_slice(self.take(16)?);
        Ok(buf)
    }

    fn read_hash160(&mut self) -> Result<[u8; HASH160_LEN]> {
        let mut buf = [0u8; HASH160_LEN];
        buf.copy_from_slice(self.take(HASH160_LEN)?);
        Ok(buf)
    }

    fn read_short_name(&mut self) -> Result<String> {
        let len = self.read_u8()? as usize;
        let raw = self.take(len)?;
        String::from_utf8(raw.to_vec()).map_err(|e| ClarityError::InvalidString(e.to_string()))
    }

    /// Length-prefixed payload; the length is checked against the input
    /// before anything is allocated.
    fn read_sized(&mut self) -> Result<&'a [u8]> {
        let len = self.read_u32()?;
        self.take(len)
    }

    fn read_value(&mut self, depth: usize) -> Result<ClarityValue> {
        if depth > MAX_DEPTH {
            return Err(ClarityError::DepthExceeded(MAX_DEPTH));
        }

        let prefix_offset = self.offset;
        let prefix = self.read_u8()?;
        let value = match prefix {
            TYPE_INT => ClarityValue::Int(i128::from_be_bytes(self.read_16()?)),
            TYPE_UINT => ClarityValue::UInt(u128::from_be_bytes(self.read_16()?)),
            TYPE_BUFFER => ClarityValue::Buffer(self.read_sized()?.to_vec()),
            TYPE_TRUE => ClarityValue::Bool(true),
            TYPE_FALSE => ClarityValue::Bool(false),
            TYPE_STANDARD_PRINCIPAL => {
                let version = self.read_u8()?;
                let hash160 = self.read_hash160()?;
                ClarityValue::Principal(Principal::Standard { version, hash160 })
            }
            TYPE_CONTRACT_PRINCIPAL => {
                let version = self.read_u8()?;
                let hash160 = self.read_hash160()?;
                let name = self.read_short_name()?;
                ClarityValue::Principal(Principal::Contract {
                    version,
                    hash160,
                    name,
                })
            }
            TYPE_RESPONSE_OK => ClarityValue::ResponseOk(Box::new(self.read_value(depth + 1)?)),
            TYPE_RESPONSE_ERR => ClarityValue::ResponseErr(Box::new(self.read_value(depth + 1)?)),
            TYPE_OPTIONAL_NONE => ClarityValue::OptionalNone,
            TYPE_OPTIONAL_SOME => {
                ClarityValue::OptionalSome(Box::new(self.read_value(depth + 1)?))
            }
            TYPE_LIST => {
                let len = self.read_u32()?;
                // every element takes at least one byte
                if len > self.bytes.len() - self.offset {
                    return Err(ClarityError::UnexpectedEnd {
                        offset: self.offset,
                        needed: len,
                    });
                }
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    items.push(self.read_value(depth + 1)?);
                }
                ClarityValue::List(items)
            }
            TYPE_TUPLE => {
                let len = self.read_u32()?;
                let mut fields = BTreeMap::new();
                for _ in 0..len {
                    let name = self.read_short_name()?;
                    let field = self.read_value(depth + 1)?;
                    fields.insert(name, field);
                }
                ClarityValue::Tuple(fields)
            }
            TYPE_STRING_ASCII => {
                let raw = self.read_sized()?;
                if !raw.is_ascii() {
                    return Err(ClarityError::InvalidString(
                        "non-ASCII byte in string-ascii".to_string(),
                    ));
                }
                ClarityValue::StringAscii(String::from_utf8_lossy(raw).into_owned())
            }
            TYPE_STRING_UTF8 => {
                let raw = self.read_sized()?;
                let s = std::str::from_utf8(raw)
                    .map_err(|e| ClarityError::InvalidString(e.to_string()))?;
                ClarityValue::StringUtf8(s.to_string())
            }
            other => {
                return Err(ClarityError::UnknownPrefix {
                    offset: prefix_offset,
                    prefix: other,
                })
            }
        };
        Ok(value)
    }
}
