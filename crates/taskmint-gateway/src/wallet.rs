//! The wallet provider seam.
//!
//! The wallet owns keys, signing and broadcast. This side only asks it for
//! accounts and hands it unsigned contract calls; every call resolves exactly
//! once with a [`TxOutcome`].

use crate::config::Network;
use async_trait::async_trait;
use serde::{Deserialize, Serialize, Serializer};
use std::future::Future;
use std::sync::Arc;
use taskmint_clarity::ClarityValue;
use taskmint_types::{StacksAddress, TxId};
use thiserror::Error;
use tokio::sync::OnceCell;

pub const STX_SYMBOL: &str = "STX";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("User rejected request")]
    Rejected,

    #[error("{message}")]
    Failed {
        message: String,
        /// Reason reported by the wallet or the contract, when there is one.
        reason: Option<String>,
    },
}

impl WalletError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
            reason: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressEntry {
    pub address: String,
    #[serde(default)]
    pub symbol: Option<String>,
}

impl AddressEntry {
    pub fn new(address: impl Into<String>, symbol: Option<&str>) -> Self {
        Self {
            address: address.into(),
            symbol: symbol.map(str::to_string),
        }
    }

    pub fn is_stacks(&self) -> bool {
        self.symbol
            .as_deref()
            .map_or(false, |s| s.eq_ignore_ascii_case(STX_SYMBOL))
    }
}

/// Accounts granted by the user on connect, in the wallet's own order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConnectResponse {
    pub addresses: Vec<AddressEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoredAddresses {
    #[serde(default)]
    pub stx: Vec<AddressEntry>,
    #[serde(default)]
    pub btc: Vec<AddressEntry>,
}

/// Session the wallet library persisted from an earlier connect.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoredSession {
    pub addresses: StoredAddresses,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxOutcome {
    Finished { tx_id: TxId },
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostConditionMode {
    Allow,
    Deny,
}

/// An unsigned contract call, ready for a wallet to sign and broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractCallRequest {
    pub contract_address: StacksAddress,
    pub contract_name: String,
    pub function_name: String,
    #[serde(serialize_with = "serialize_args")]
    pub function_args: Vec<ClarityValue>,
    pub network: Network,
    pub post_condition_mode: PostConditionMode,
    #[serde(rename = "stxAddress")]
    pub sender: StacksAddress,
}

fn serialize_args<S: Serializer>(
    args: &[ClarityValue],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let encoded = args
        .iter()
        .map(ClarityValue::to_hex)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(serde::ser::Error::custom)?;
    encoded.serialize(serializer)
}

#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Ask the user for account access.
    async fn connect(&self) -> Result<ConnectResponse, WalletError>;

    /// Forget the persisted session.
    async fn disconnect(&self);

    /// Session persisted by an earlier connect, if any.
    async fn local_storage(&self) -> Option<StoredSession>;

    /// Prompt the user to sign and broadcast `request`.
    async fn open_contract_call(
        &self,
        request: ContractCallRequest,
    ) -> Result<TxOutcome, WalletError>;
}

/// Slot holding the wallet library once it has loaded.
///
/// Shared between the session and the gateway; it is filled at most once and
/// every dependent operation checks it before use.
#[derive(Clone, Default)]
pub struct WalletSlot(Arc<OnceCell<Arc<dyn WalletProvider>>>);

impl WalletSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot that is already loaded.
    pub fn ready(provider: Arc<dyn WalletProvider>) -> Self {
        Self(Arc::new(OnceCell::new_with(Some(provider))))
    }

    pub fn get(&self) -> Option<Arc<dyn WalletProvider>> {
        self.0.get().cloned()
    }

    pub fn is_ready(&self) -> bool {
        self.0.initialized()
    }

    /// Run `loader` unless the slot is already filled. Concurrent callers
    /// wait for the same load; a failed load leaves the slot empty.
    pub async fn load<F, Fut>(&self, loader: F) -> Result<Arc<dyn WalletProvider>, WalletError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Arc<dyn WalletProvider>, WalletError>>,
    {
        self.0.get_or_try_init(loader).await.cloned()
    }
}

impl std::fmt::Debug for WalletSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletSlot")
            .field("ready", &self.is_ready())
            .finish()
    }
}
