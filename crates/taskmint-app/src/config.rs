use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use taskmint_gateway::config::{DEFAULT_EXPLORER_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
use taskmint_gateway::{ContractConfig, Network, DEFAULT_CONTRACT_ADDRESS, DEFAULT_CONTRACT_NAME};
use taskmint_types::StacksAddress;
use tracing::warn;

pub const DEFAULT_CONFIG_FILE: &str = "./taskmint.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub network: NetworkSettings,
    pub contract: ContractSettings,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkSettings {
    pub network: Network,
    /// Defaults to the Hiro API for `network` when unset.
    pub api_url: Option<String>,
    pub explorer_url: String,
    pub request_timeout_secs: u64,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            network: Network::Testnet,
            api_url: None,
            explorer_url: DEFAULT_EXPLORER_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractSettings {
    pub address: String,
    pub name: String,
}

impl Default for ContractSettings {
    fn default() -> Self {
        Self {
            address: DEFAULT_CONTRACT_ADDRESS.to_string(),
            name: DEFAULT_CONTRACT_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty`, `compact` or `json`.
    pub format: String,
    pub file_output: Option<PathBuf>,
    pub module_filters: BTreeMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_output: None,
            module_filters: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    /// File (explicit path, else `./taskmint.toml` when present, else
    /// defaults) with environment overrides applied on top.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Apply `TASKMINT_*` overrides from `lookup`. Values that do not parse
    /// are ignored with a warning.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(network) = get("TASKMINT_NETWORK") {
            match network.parse() {
                Ok(network) => self.network.network = network,
                Err(e) => warn!(value = %network, error = %e, "Ignoring TASKMINT_NETWORK"),
            }
        }
        if let Some(api_url) = get("TASKMINT_API_URL") {
            self.network.api_url = Some(api_url);
        }
        if let Some(explorer_url) = get("TASKMINT_EXPLORER_URL") {
            self.network.explorer_url = explorer_url;
        }
        if let Some(address) = get("TASKMINT_CONTRACT_ADDRESS") {
            match StacksAddress::parse(&address) {
                Ok(_) => self.contract.address = address,
                Err(e) => warn!(error = %e, "Ignoring TASKMINT_CONTRACT_ADDRESS"),
            }
        }
        if let Some(name) = get("TASKMINT_CONTRACT_NAME") {
            self.contract.name = name;
        }
        if let Some(level) = get("TASKMINT_LOG_LEVEL") {
            self.logging.level = level;
        }
    }

    pub fn api_url(&self) -> String {
        self.network
            .api_url
            .clone()
            .unwrap_or_else(|| self.network.network.default_api_url().to_string())
    }

    pub fn contract_config(&self) -> Result<ContractConfig> {
        let contract_address = StacksAddress::parse(&self.contract.address)
            .context("invalid contract address in configuration")?;
        let config = ContractConfig {
            contract_address,
            contract_name: self.contract.name.clone(),
            network: self.network.network,
            api_url: self.api_url(),
            explorer_url: self.network.explorer_url.clone(),
            request_timeout: Duration::from_secs(self.network.request_timeout_secs),
        };
        config.validate()?;
        Ok(config)
    }
}
