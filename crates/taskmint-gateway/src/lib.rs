//! Contract gateway for the TaskMint bounty contract.
//!
//! Reads go through a [`ReadOnlyApi`] (the node's `call-read` endpoint);
//! writes are built as unsigned [`ContractCallRequest`]s and handed to a
//! [`WalletProvider`] for signing and broadcast. Outcomes of writes are
//! announced on the [`Notifier`] bus.

pub mod config;
pub mod decode;
pub mod error;
pub mod gateway;
pub mod memory;
pub mod notify;
pub mod read;
pub mod wallet;

pub use config::{ContractConfig, Network, DEFAULT_CONTRACT_ADDRESS, DEFAULT_CONTRACT_NAME};
pub use error::{GatewayError, Result};
pub use gateway::{
    BountyContract, ContractGateway, WriteKind, SDK_NOT_READY, WALLET_NOT_CONNECTED,
};
pub use notify::{Notification, NotificationAction, NotificationVariant, Notifier};
pub use read::{HttpReadOnlyClient, ReadOnlyApi, ReadOnlyCall};
pub use wallet::{
    AddressEntry, ConnectResponse, ContractCallRequest, PostConditionMode, StoredAddresses,
    StoredSession, TxOutcome, WalletError, WalletProvider, WalletSlot,
};
