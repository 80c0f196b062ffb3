//! In-memory stand-ins for the read endpoint and the wallet.
//!
//! They replay scripted answers and record what they were asked; they do not
//! simulate the contract.

use crate::read::{ReadOnlyApi, ReadOnlyCall};
use crate::wallet::{
    AddressEntry, ConnectResponse, ContractCallRequest, StoredAddresses, StoredSession, TxOutcome,
    WalletError, WalletProvider,
};
use crate::{GatewayError, Result};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use taskmint_clarity::ClarityValue;
use taskmint_types::TxId;
use tokio::sync::{oneshot, Mutex, RwLock};

/// Serves canned values per function name.
#[derive(Default)]
pub struct MemoryReadOnly {
    responses: RwLock<HashMap<String, std::result::Result<ClarityValue, String>>>,
    calls: RwLock<Vec<ReadOnlyCall>>,
}

impl MemoryReadOnly {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_response(&self, function: &str, value: ClarityValue) {
        self.responses
            .write()
            .await
            .insert(function.to_string(), Ok(value));
    }

    /// Make `function` fail the way an unreachable node would.
    pub async fn set_failure(&self, function: &str, message: &str) {
        self.responses
            .write()
            .await
            .insert(function.to_string(), Err(message.to_string()));
    }

    pub async fn calls(&self) -> Vec<ReadOnlyCall> {
        self.calls.read().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }
}

#[async_trait]
impl ReadOnlyApi for MemoryReadOnly {
    async fn call_read_only(&self, call: &ReadOnlyCall) -> Result<ClarityValue> {
        self.calls.write().await.push(call.clone());
        match self.responses.read().await.get(&call.function_name) {
            Some(Ok(value)) => Ok(value.clone()),
            Some(Err(message)) => Err(GatewayError::read(&call.function_name, message)),
            None => Err(GatewayError::read(
                &call.function_name,
                "no such read-only function",
            )),
        }
    }
}

/// Scripted wallet.
///
/// Contract calls resolve with the next queued outcome, or with a fresh
/// transaction id when the queue is empty. [`MemoryWallet::hold_next_call`]
/// keeps the next call pending until the returned sender resolves it.
pub struct MemoryWallet {
    connect_result: RwLock<std::result::Result<ConnectResponse, WalletError>>,
    stored: RwLock<Option<StoredSession>>,
    outcomes: Mutex<VecDeque<std::result::Result<TxOutcome, WalletError>>>,
    held: Mutex<Option<oneshot::Receiver<std::result::Result<TxOutcome, WalletError>>>>,
    requests: RwLock<Vec<ContractCallRequest>>,
    connects: AtomicU64,
    next_tx: AtomicU64,
}

impl MemoryWallet {
    /// A wallet that grants `addresses` on connect.
    pub fn new(addresses: Vec<AddressEntry>) -> Self {
        Self {
            connect_result: RwLock::new(Ok(ConnectResponse { addresses })),
            stored: RwLock::new(None),
            outcomes: Mutex::new(VecDeque::new()),
            held: Mutex::new(None),
            requests: RwLock::new(Vec::new()),
            connects: AtomicU64::new(0),
            next_tx: AtomicU64::new(1),
        }
    }

    /// The usual three-entry response: two bitcoin formats, then Stacks.
    pub fn with_stacks_address(address: &str) -> Self {
        Self::new(vec![
            AddressEntry::new("bc1qxy2kgdygjrsqtzq2n0yrf2493p83kkfjhx0wlh", Some("BTC")),
            AddressEntry::new(
                "bc1p5d7rjq7g6rdk2yhzks9smlaqtedr4dekq08ge8ztwac72sfr9rusxg3297",
                Some("BTC"),
            ),
            AddressEntry::new(address, Some("STX")),
        ])
    }

    pub async fn set_connect_result(
        &self,
        result: std::result::Result<ConnectResponse, WalletError>,
    ) {
        *self.connect_result.write().await = result;
    }

    pub async fn set_stored_session(&self, session: Option<StoredSession>) {
        *self.stored.write().await = session;
    }

    pub async fn push_outcome(&self, outcome: std::result::Result<TxOutcome, WalletError>) {
        self.outcomes.lock().await.push_back(outcome);
    }

    pub async fn hold_next_call(
        &self,
    ) -> oneshot::Sender<std::result::Result<TxOutcome, WalletError>> {
        let (tx, rx) = oneshot::channel();
        *self.held.lock().await = Some(rx);
        tx
    }

    pub async fn requests(&self) -> Vec<ContractCallRequest> {
        self.requests.read().await.clone()
    }

    pub fn connect_count(&self) -> u64 {
        self.connects.load(Ordering::Relaxed)
    }

    fn fresh_tx_id(&self) -> std::result::Result<TxId, WalletError> {
        let n = self.next_tx.fetch_add(1, Ordering::Relaxed);
        TxId::new(format!("0x{:064x}", n)).map_err(|e| WalletError::failed(e.to_string()))
    }
}

#[async_trait]
impl WalletProvider for MemoryWallet {
    async fn connect(&self) -> std::result::Result<ConnectResponse, WalletError> {
        self.connects.fetch_add(1, Ordering::Relaxed);
        let response = self.connect_result.read().await.clone()?;

        // persist what a browser wallet library would keep in local storage
        let (stx, btc): (Vec<_>, Vec<_>) = response
            .addresses
            .iter()
            .cloned()
            .partition(AddressEntry::is_stacks);
        *self.stored.write().await = Some(StoredSession {
            addresses: StoredAddresses { stx, btc },
        });
        Ok(response)
    }

    async fn disconnect(&self) {
        *self.stored.write().await = None;
    }

    async fn local_storage(&self) -> Option<StoredSession> {
        self.stored.read().await.clone()
    }

    async fn open_contract_call(
        &self,
        request: ContractCallRequest,
    ) -> std::result::Result<TxOutcome, WalletError> {
        self.requests.write().await.push(request);

        let held = self.held.lock().await.take();
        if let Some(rx) = held {
            return rx
                .await
                .map_err(|_| WalletError::failed("wallet closed the request without an answer"))?;
        }

        match self.outcomes.lock().await.pop_front() {
            Some(outcome) => outcome,
            None => Ok(TxOutcome::Finished {
                tx_id: self.fresh_tx_id()?,
            }),
        }
    }
}
