//! Wallet session: who is connected, shared with every consumer.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use taskmint_gateway::{
    AddressEntry, Notifier, StoredSession, WalletError, WalletProvider, WalletSlot, SDK_NOT_READY,
};
use taskmint_types::StacksAddress;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Position of the Stacks account in an untagged connect response; the
/// first two entries are bitcoin address formats.
const UNTAGGED_STACKS_INDEX: usize = 2;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub address: Option<StacksAddress>,
    pub is_connected: bool,
    pub is_connecting: bool,
    pub error: Option<String>,
}

impl SessionState {
    pub fn connected(address: StacksAddress) -> Self {
        Self {
            address: Some(address),
            is_connected: true,
            ..Self::default()
        }
    }
}

/// Stacks entry of a connect response: the first one tagged `STX`, else the
/// entry at index 2.
pub fn select_connect_address(addresses: &[AddressEntry]) -> Option<&AddressEntry> {
    addresses
        .iter()
        .find(|entry| entry.is_stacks())
        .or_else(|| addresses.get(UNTAGGED_STACKS_INDEX))
}

/// Stacks entry of a persisted session.
pub fn select_stored_address(stored: &StoredSession) -> Option<&AddressEntry> {
    stored.addresses.stx.first()
}

/// Owns the connection state for the life of the process.
///
/// State lives on a watch channel, so every subscriber sees each change as
/// soon as it is made.
pub struct WalletSession {
    slot: WalletSlot,
    state: watch::Sender<SessionState>,
    notifier: Notifier,
    // bumped by disconnect so a connect that was in flight cannot restore
    // the session afterwards
    epoch: AtomicU64,
}

impl WalletSession {
    pub fn new(slot: WalletSlot, notifier: Notifier) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            slot,
            state,
            notifier,
            epoch: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn address(&self) -> Option<StacksAddress> {
        self.state.borrow().address.clone()
    }

    pub fn is_ready(&self) -> bool {
        self.slot.is_ready()
    }

    pub fn slot(&self) -> &WalletSlot {
        &self.slot
    }

    /// Load the wallet library once, then restore any persisted session.
    pub async fn mount<F, Fut>(&self, loader: F)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Arc<dyn WalletProvider>, WalletError>>,
    {
        if let Err(e) = self.slot.load(loader).await {
            warn!(error = %e, "Wallet library failed to load");
            return;
        }
        self.reconnect_from_storage().await;
    }

    /// Restore the session the wallet persisted, without prompting.
    pub async fn reconnect_from_storage(&self) -> bool {
        let Some(wallet) = self.slot.get() else {
            return false;
        };
        let Some(stored) = wallet.local_storage().await else {
            debug!("No persisted wallet session");
            return false;
        };
        let Some(entry) = select_stored_address(&stored) else {
            debug!("Persisted wallet session has no Stacks address");
            return false;
        };

        match StacksAddress::parse(&entry.address) {
            Ok(address) => {
                info!(address = %address, "Restored wallet session");
                self.state.send_replace(SessionState::connected(address));
                true
            }
            Err(e) => {
                warn!(error = %e, "Persisted wallet address is invalid");
                false
            }
        }
    }

    /// Ask the wallet for account access. Failures are reported through the
    /// session state and the notifier; the return value is the connected
    /// address, if any.
    pub async fn connect(&self) -> Option<StacksAddress> {
        let Some(wallet) = self.slot.get() else {
            warn!("Connect requested before the wallet library loaded");
            self.notifier.error(SDK_NOT_READY);
            return None;
        };

        let epoch = self.epoch.load(Ordering::SeqCst);
        self.state.send_modify(|state| {
            state.is_connecting = true;
            state.error = None;
        });

        let outcome = match wallet.connect().await {
            Ok(response) => match select_connect_address(&response.addresses) {
                Some(entry) => StacksAddress::parse(&entry.address).map_err(|e| e.to_string()),
                None => Err("wallet returned no Stacks address".to_string()),
            },
            Err(e) => Err(e.to_string()),
        };

        if self.epoch.load(Ordering::SeqCst) != epoch {
            debug!("Session was disconnected while connecting; discarding result");
            return None;
        }

        match outcome {
            Ok(address) => {
                info!(address = %address, "Wallet connected");
                self.state.send_replace(SessionState::connected(address.clone()));
                Some(address)
            }
            Err(reason) => {
                warn!(error = %reason, "Wallet connection failed");
                self.notifier
                    .error(format!("Failed to connect wallet: {}", reason));
                self.state.send_modify(|state| {
                    state.is_connecting = false;
                    state.error = Some(reason);
                });
                None
            }
        }
    }

    /// Clear the session. Does nothing when the wallet library never loaded.
    pub async fn disconnect(&self) {
        let Some(wallet) = self.slot.get() else {
            debug!("Disconnect ignored, wallet library not loaded");
            return;
        };
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.state.send_replace(SessionState::default());
        wallet.disconnect().await;
        info!("Wallet disconnected");
    }
}
