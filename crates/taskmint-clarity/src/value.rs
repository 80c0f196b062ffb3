use crate::c32::c32_address;
use crate::{ClarityError, Result};
use std::collections::BTreeMap;
use std::fmt;

pub const HASH160_LEN: usize = 20;

/// A Stacks principal in its on-chain form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    Standard {
        version: u8,
        hash160: [u8; HASH160_LEN],
    },
    Contract {
        version: u8,
        hash160: [u8; HASH160_LEN],
        name: String,
    },
}

impl Principal {
    /// c32check rendering, `ST...` or `ST....contract-name`.
    pub fn to_address(&self) -> String {
        match self {
            Principal::Standard { version, hash160 } => c32_address(*version, hash160),
            Principal::Contract {
                version,
                hash160,
                name,
            } => format!("{}.{}", c32_address(*version, hash160), name),
        }
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_address())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClarityValue {
    Int(i128),
    UInt(u128),
    Bool(bool),
    Buffer(Vec<u8>),
    StringAscii(String),
    StringUtf8(String),
    Principal(Principal),
    OptionalNone,
    OptionalSome(Box<ClarityValue>),
    ResponseOk(Box<ClarityValue>),
    ResponseErr(Box<ClarityValue>),
    List(Vec<ClarityValue>),
    Tuple(BTreeMap<String, ClarityValue>),
}

impl ClarityValue {
    pub fn uint(value: impl Into<u128>) -> Self {
        Self::UInt(value.into())
    }

    pub fn string_utf8(value: impl Into<String>) -> Self {
        Self::StringUtf8(value.into())
    }

    pub fn some(value: ClarityValue) -> Self {
        Self::OptionalSome(Box::new(value))
    }

    pub fn ok(value: ClarityValue) -> Self {
        Self::ResponseOk(Box::new(value))
    }

    pub fn tuple<K: Into<String>>(fields: impl IntoIterator<Item = (K, ClarityValue)>) -> Self {
        Self::Tuple(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::UInt(_) => "uint",
            Self::Bool(_) => "bool",
            Self::Buffer(_) => "buff",
            Self::StringAscii(_) => "string-ascii",
            Self::StringUtf8(_) => "string-utf8",
            Self::Principal(_) => "principal",
            Self::OptionalNone | Self::OptionalSome(_) => "optional",
            Self::ResponseOk(_) | Self::ResponseErr(_) => "response",
            Self::List(_) => "list",
            Self::Tuple(_) => "tuple",
        }
    }

    fn mismatch(&self, expected: &'static str) -> ClarityError {
        ClarityError::TypeMismatch {
            expected,
            found: self.type_name(),
        }
    }

    pub fn as_uint(&self) -> Result<u128> {
        match self {
            Self::UInt(v) => Ok(*v),
            other => Err(other.mismatch("uint")),
        }
    }

    /// Either string flavour.
    pub fn as_str(&self) -> Result<&str> {
        match self {
            Self::StringAscii(s) | Self::StringUtf8(s) => Ok(s),
            other => Err(other.mismatch("string")),
        }
    }

    pub fn as_principal(&self) -> Result<&Principal> {
        match self {
            Self::Principal(p) => Ok(p),
            other => Err(other.mismatch("principal")),
        }
    }

    pub fn as_list(&self) -> Result<&[ClarityValue]> {
        match self {
            Self::List(items) => Ok(items),
            other => Err(other.mismatch("list")),
        }
    }

    pub fn tuple_field(&self, name: &str) -> Result<&ClarityValue> {
        match self {
            Self::Tuple(fields) => fields
                .get(name)
                .ok_or_else(|| ClarityError::MissingField(name.to_string())),
            other => Err(other.mismatch("tuple")),
        }
    }

    /// `Some(inner)` for `(some ..)`, `None` for `none`.
    pub fn unwrap_optional(&self) -> Result<Option<&ClarityValue>> {
        match self {
            Self::OptionalNone => Ok(None),
            Self::OptionalSome(inner) => Ok(Some(&**inner)),
            other => Err(other.mismatch("optional")),
        }
    }

    /// Strip an `(ok ..)` wrapper; other values pass through unchanged.
    pub fn unwrap_response_ok(&self) -> Result<&ClarityValue> {
        match self {
            Self::ResponseOk(inner) => Ok(&**inner),
            Self::ResponseErr(_) => Err(self.mismatch("ok response")),
            other => Ok(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        assert_eq!(ClarityValue::uint(7u32).as_uint().unwrap(), 7);
        assert_eq!(ClarityValue::string_utf8("hi").as_str().unwrap(), "hi");
        assert_eq!(
            ClarityValue::Bool(true).as_uint(),
            Err(ClarityError::TypeMismatch {
                expected: "uint",
                found: "bool"
            })
        );
    }

    #[test]
    fn test_tuple_field() {
        let tuple = ClarityValue::tuple([("reward", ClarityValue::uint(5u8))]);
        assert_eq!(tuple.tuple_field("reward").unwrap().as_uint().unwrap(), 5);
        assert_eq!(
            tuple.tuple_field("status"),
            Err(ClarityError::MissingField("status".to_string()))
        );
    }

    #[test]
    fn test_response_unwrap() {
        let ok = ClarityValue::ok(ClarityValue::uint(3u8));
        assert_eq!(ok.unwrap_response_ok().unwrap(), &ClarityValue::uint(3u8));

        let bare = ClarityValue::uint(3u8);
        assert_eq!(bare.unwrap_response_ok().unwrap(), &bare);

        let err = ClarityValue::ResponseErr(Box::new(ClarityValue::uint(1u8)));
        assert!(err.unwrap_response_ok().is_err());
    }
}
