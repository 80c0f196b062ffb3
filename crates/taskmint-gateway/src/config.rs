use crate::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use taskmint_types::StacksAddress;

pub const DEFAULT_CONTRACT_ADDRESS: &str = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM";
pub const DEFAULT_CONTRACT_NAME: &str = "taskmint-bounties";
pub const DEFAULT_TESTNET_API_URL: &str = "https://api.testnet.hiro.so";
pub const DEFAULT_MAINNET_API_URL: &str = "https://api.hiro.so";
pub const DEFAULT_EXPLORER_URL: &str = "https://explorer.hiro.so";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Testnet,
    Mainnet,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Testnet => "testnet",
            Self::Mainnet => "mainnet",
        }
    }

    pub fn default_api_url(&self) -> &'static str {
        match self {
            Self::Testnet => DEFAULT_TESTNET_API_URL,
            Self::Mainnet => DEFAULT_MAINNET_API_URL,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "testnet" => Ok(Self::Testnet),
            "mainnet" => Ok(Self::Mainnet),
            other => Err(GatewayError::InvalidConfiguration(format!(
                "unknown network '{}'",
                other
            ))),
        }
    }
}

/// Where the bounty contract lives and how to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractConfig {
    pub contract_address: StacksAddress,
    pub contract_name: String,
    pub network: Network,
    pub api_url: String,
    pub explorer_url: String,
    pub request_timeout: Duration,
}

impl ContractConfig {
    pub fn new(contract_address: StacksAddress, contract_name: impl Into<String>) -> Self {
        Self {
            contract_address,
            contract_name: contract_name.into(),
            ..Self::default()
        }
    }

    /// `ADDRESS.name`, the contract's fully qualified identifier.
    pub fn contract_id(&self) -> String {
        format!("{}.{}", self.contract_address, self.contract_name)
    }

    pub fn explorer_tx_url(&self, tx_id: &str) -> String {
        format!(
            "{}/txid/{}?chain={}",
            self.explorer_url.trim_end_matches('/'),
            tx_id,
            self.network
        )
    }

    pub fn validate(&self) -> Result<()> {
        if self.contract_address.is_contract() {
            return Err(GatewayError::InvalidConfiguration(format!(
                "contract address must be a standard principal, got {}",
                self.contract_address
            )));
        }
        if self.contract_name.trim().is_empty() {
            return Err(GatewayError::InvalidConfiguration(
                "contract name is empty".to_string(),
            ));
        }
        if self.contract_address.is_mainnet() != (self.network == Network::Mainnet) {
            return Err(GatewayError::InvalidConfiguration(format!(
                "contract address {} does not belong to {}",
                self.contract_address, self.network
            )));
        }
        for (name, url) in [("api_url", &self.api_url), ("explorer_url", &self.explorer_url)] {
            reqwest::Url::parse(url).map_err(|e| {
                GatewayError::InvalidConfiguration(format!("{} '{}': {}", name, url, e))
            })?;
        }
        Ok(())
    }
}

impl Default for ContractConfig {
    fn default() -> Self {
        let contract_address = StacksAddress::parse(DEFAULT_CONTRACT_ADDRESS)
            .expect("default contract address is a valid testnet principal");
        Self {
            contract_address,
            contract_name: DEFAULT_CONTRACT_NAME.to_string(),
            network: Network::Testnet,
            api_url: DEFAULT_TESTNET_API_URL.to_string(),
            explorer_url: DEFAULT_EXPLORER_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}
