use crate::{Result, TypesError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Characters of the c32 alphabet used by Stacks addresses.
pub const C32_ALPHABET: &str = "0123456789ABCDEFGHJKMNPQRSTVWXYZ";

const MIN_STANDARD_LEN: usize = 28;
const MAX_STANDARD_LEN: usize = 41;
const MAX_CONTRACT_NAME_LEN: usize = 40;

/// A Stacks principal as shown to users: a standard address (`ST...`/`SP...`)
/// or a contract principal (`ST....contract-name`).
///
/// The address part is stored upper-cased so that equality does not depend on
/// the casing the wallet or the API happened to return.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StacksAddress(String);

impl StacksAddress {
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let (address, contract) = match trimmed.split_once('.') {
            Some((address, name)) => (address, Some(name)),
            None => (trimmed, None),
        };

        let address = address.to_ascii_uppercase();
        validate_standard(&address).map_err(|reason| {
            TypesError::InvalidAddress(format!("{}: {}", input, reason))
        })?;

        match contract {
            Some(name) => {
                validate_contract_name(name).map_err(|reason| {
                    TypesError::InvalidAddress(format!("{}: {}", input, reason))
                })?;
                Ok(Self(format!("{}.{}", address, name)))
            }
            None => Ok(Self(address)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is a contract principal.
    pub fn is_contract(&self) -> bool {
        self.0.contains('.')
    }

    /// Mainnet addresses use the `P`/`M` version characters.
    pub fn is_mainnet(&self) -> bool {
        matches!(self.0.as_bytes().get(1), Some(b'P') | Some(b'M'))
    }

    /// Abbreviated form `ST1PQH...GZGM`.
    pub fn short(&self) -> String {
        self.short_with(4)
    }

    pub fn short_with(&self, chars: usize) -> String {
        let len = self.0.len();
        if len <= chars * 2 + 2 {
            return self.0.clone();
        }
        format!("{}...{}", &self.0[..chars + 2], &self.0[len - chars..])
    }
}

fn validate_standard(address: &str) -> std::result::Result<(), String> {
    if !address.starts_with('S') {
        return Err("address must start with 'S'".to_string());
    }
    if address.len() < MIN_STANDARD_LEN || address.len() > MAX_STANDARD_LEN {
        return Err(format!(
            "address length {} outside {}..={}",
            address.len(),
            MIN_STANDARD_LEN,
            MAX_STANDARD_LEN
        ));
    }
    if let Some(bad) = address[1..].chars().find(|c| !C32_ALPHABET.contains(*c)) {
        return Err(format!("character '{}' is not in the c32 alphabet", bad));
    }
    Ok(())
}

fn validate_contract_name(name: &str) -> std::result::Result<(), String> {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return Err("contract name must start with a letter".to_string()),
    }
    if name.len() > MAX_CONTRACT_NAME_LEN {
        return Err(format!("contract name longer than {}", MAX_CONTRACT_NAME_LEN));
    }
    if chars.any(|c| !(c.is_ascii_alphanumeric() || c == '-' || c == '_')) {
        return Err("contract name contains invalid characters".to_string());
    }
    Ok(())
}

impl FromStr for StacksAddress {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for StacksAddress {
    type Error = TypesError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<StacksAddress> for String {
    fn from(address: StacksAddress) -> Self {
        address.0
    }
}

impl fmt::Display for StacksAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEPLOYER: &str = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM";

    #[test]
    fn test_parse_standard_address() {
        let addr = StacksAddress::parse(DEPLOYER).unwrap();
        assert_eq!(addr.as_str(), DEPLOYER);
        assert!(!addr.is_contract());
        assert!(!addr.is_mainnet());

        let burn = StacksAddress::parse("SP000000000000000000002Q6VF78").unwrap();
        assert!(burn.is_mainnet());
    }

    #[test]
    fn test_equality_ignores_case() {
        let upper = StacksAddress::parse(DEPLOYER).unwrap();
        let lower = StacksAddress::parse(&DEPLOYER.to_lowercase()).unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_parse_contract_principal() {
        let addr = StacksAddress::parse(&format!("{}.taskmint-bounties", DEPLOYER)).unwrap();
        assert!(addr.is_contract());
        assert!(addr.as_str().ends_with(".taskmint-bounties"));

        assert!(StacksAddress::parse(&format!("{}.1bad", DEPLOYER)).is_err());
        assert!(StacksAddress::parse(&format!("{}.bad name", DEPLOYER)).is_err());
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(StacksAddress::parse("").is_err());
        assert!(StacksAddress::parse("0x742d35Cc6567C0535E5F1B6b6c6c23c8a5b6c7d8").is_err());
        assert!(StacksAddress::parse("ST1PQ").is_err());
        // 'U' is not part of the c32 alphabet
        assert!(StacksAddress::parse("ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGU").is_err());
    }

    #[test]
    fn test_short() {
        let addr = StacksAddress::parse(DEPLOYER).unwrap();
        assert_eq!(addr.short(), "ST1PQH...GZGM");
        assert_eq!(addr.short_with(2), "ST1P...GM");
    }

    #[test]
    fn test_serde_roundtrip_validates() {
        let json = format!("\"{}\"", DEPLOYER.to_lowercase());
        let addr: StacksAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(addr.as_str(), DEPLOYER);
        assert!(serde_json::from_str::<StacksAddress>("\"nope\"").is_err());
    }
}
