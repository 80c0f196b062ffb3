use crate::config::ContractConfig;
use crate::decode::{decode_bounty_list, decode_bounty_slot, decode_count};
use crate::error::USER_REJECTED;
use crate::notify::{Notification, Notifier, EXPLORER_ACTION_LABEL};
use crate::read::{ReadOnlyApi, ReadOnlyCall};
use crate::wallet::{ContractCallRequest, PostConditionMode, TxOutcome, WalletError, WalletSlot};
use crate::{GatewayError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use taskmint_clarity::ClarityValue;
use taskmint_types::{Bounty, StacksAddress, StxAmount, TxId};
use tracing::{debug, error, info, warn};

pub const WALLET_NOT_CONNECTED: &str = "Wallet not connected.";
pub const SDK_NOT_READY: &str = "Wallet library is still loading or not installed.";

/// Application-level view of the bounty contract.
#[async_trait]
pub trait BountyContract: Send + Sync {
    async fn get_bounty_count(&self) -> Result<u64>;

    /// All bounties, newest first.
    async fn get_all_bounties(&self) -> Result<Vec<Bounty>>;

    async fn get_bounty(&self, id: u64) -> Result<Option<Bounty>>;

    /// `reward` is a decimal STX string such as `"1.50"`.
    async fn create_bounty(
        &self,
        description: &str,
        reward: &str,
        sender: Option<&StacksAddress>,
    ) -> Result<TxId>;

    async fn submit_work(
        &self,
        bounty_id: u64,
        submission_link: &str,
        sender: Option<&StacksAddress>,
    ) -> Result<TxId>;

    async fn approve_work(&self, bounty_id: u64, sender: Option<&StacksAddress>) -> Result<TxId>;

    async fn cancel_bounty(&self, bounty_id: u64, sender: Option<&StacksAddress>) -> Result<TxId>;
}

/// The four state-changing contract functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    CreateBounty,
    SubmitWork,
    ApproveBounty,
    CancelBounty,
}

impl WriteKind {
    pub fn function_name(&self) -> &'static str {
        match self {
            Self::CreateBounty => "create-bounty",
            Self::SubmitWork => "submit-work",
            Self::ApproveBounty => "approve-bounty",
            Self::CancelBounty => "cancel-bounty",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            Self::CreateBounty => "Bounty created successfully.",
            Self::SubmitWork => "Bounty work submitted successfully.",
            Self::ApproveBounty => "Bounty work approved successfully.",
            Self::CancelBounty => "Bounty cancelled successfully.",
        }
    }
}

/// Translates [`BountyContract`] calls into read-only queries and wallet
/// contract calls against one fixed contract.
pub struct ContractGateway {
    config: ContractConfig,
    reader: Arc<dyn ReadOnlyApi>,
    wallet: WalletSlot,
    notifier: Notifier,
}

impl ContractGateway {
    pub fn new(
        config: ContractConfig,
        reader: Arc<dyn ReadOnlyApi>,
        wallet: WalletSlot,
        notifier: Notifier,
    ) -> Self {
        Self {
            config,
            reader,
            wallet,
            notifier,
        }
    }

    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Raw value returned by a read-only function, for diagnostics.
    pub async fn read_raw(&self, function: &str, args: Vec<ClarityValue>) -> Result<ClarityValue> {
        let call = ReadOnlyCall {
            contract_address: self.config.contract_address.clone(),
            contract_name: self.config.contract_name.clone(),
            function_name: function.to_string(),
            function_args: args,
            network: self.config.network,
            // reads need no wallet; the contract itself stands in as sender
            sender_address: self.config.contract_address.clone(),
        };
        self.reader.call_read_only(&call).await.map_err(|e| {
            error!(function, error = %e, "Read-only call failed");
            e
        })
    }

    fn build_call(
        &self,
        kind: WriteKind,
        sender: &StacksAddress,
        function_args: Vec<ClarityValue>,
    ) -> ContractCallRequest {
        ContractCallRequest {
            contract_address: self.config.contract_address.clone(),
            contract_name: self.config.contract_name.clone(),
            function_name: kind.function_name().to_string(),
            function_args,
            network: self.config.network,
            post_condition_mode: PostConditionMode::Allow,
            sender: sender.clone(),
        }
    }

    pub fn build_create_bounty_call(
        &self,
        sender: &StacksAddress,
        description: &str,
        reward: StxAmount,
    ) -> ContractCallRequest {
        self.build_call(
            WriteKind::CreateBounty,
            sender,
            vec![
                ClarityValue::string_utf8(description),
                ClarityValue::uint(reward.micro()),
            ],
        )
    }

    pub fn build_submit_work_call(
        &self,
        sender: &StacksAddress,
        bounty_id: u64,
        submission_link: &str,
    ) -> ContractCallRequest {
        self.build_call(
            WriteKind::SubmitWork,
            sender,
            vec![
                ClarityValue::uint(bounty_id),
                ClarityValue::string_utf8(submission_link),
            ],
        )
    }

    pub fn build_approve_call(&self, sender: &StacksAddress, bounty_id: u64) -> ContractCallRequest {
        self.build_call(
            WriteKind::ApproveBounty,
            sender,
            vec![ClarityValue::uint(bounty_id)],
        )
    }

    pub fn build_cancel_call(&self, sender: &StacksAddress, bounty_id: u64) -> ContractCallRequest {
        self.build_call(
            WriteKind::CancelBounty,
            sender,
            vec![ClarityValue::uint(bounty_id)],
        )
    }

    fn require_sender<'a>(&self, sender: Option<&'a StacksAddress>) -> Result<&'a StacksAddress> {
        sender.ok_or_else(|| {
            warn!("Write attempted without a connected wallet");
            self.notifier.error(WALLET_NOT_CONNECTED);
            GatewayError::WalletNotConnected
        })
    }

    /// Hand `request` to the wallet and report the single outcome.
    async fn submit(&self, kind: WriteKind, request: ContractCallRequest) -> Result<TxId> {
        let Some(wallet) = self.wallet.get() else {
            warn!(function = kind.function_name(), "Wallet library not loaded");
            self.notifier.error(SDK_NOT_READY);
            return Err(GatewayError::SdkNotReady);
        };

        debug!(
            function = kind.function_name(),
            sender = %request.sender,
            "Opening contract call"
        );

        match wallet.open_contract_call(request).await {
            Ok(TxOutcome::Finished { tx_id }) => {
                info!(
                    function = kind.function_name(),
                    tx_id = %tx_id,
                    "Transaction submitted"
                );
                self.notifier.notify(
                    Notification::success(kind.success_message()).with_action(
                        EXPLORER_ACTION_LABEL,
                        self.config.explorer_tx_url(tx_id.as_str()),
                    ),
                );
                Ok(tx_id)
            }
            Ok(TxOutcome::Cancelled) | Err(WalletError::Rejected) => {
                info!(function = kind.function_name(), "Transaction cancelled by user");
                self.notifier.error(USER_REJECTED);
                Err(GatewayError::UserCancelled(USER_REJECTED.to_string()))
            }
            Err(err) => {
                error!(function = kind.function_name(), error = %err, "Contract call failed");
                let err = GatewayError::from(err);
                self.notifier.error(err.display_message(&err.to_string()));
                Err(err)
            }
        }
    }
}

#[async_trait]
impl BountyContract for ContractGateway {
    async fn get_bounty_count(&self) -> Result<u64> {
        let function = "get-bounty-count";
        let value = self.read_raw(function, vec![]).await?;
        decode_count(&value).map_err(|e| e.in_function(function))
    }

    async fn get_all_bounties(&self) -> Result<Vec<Bounty>> {
        let function = "get-all-bounties";
        let offset = 0u64;
        let value = self
            .read_raw(function, vec![ClarityValue::uint(offset)])
            .await?;
        let bounties = decode_bounty_list(&value, offset).map_err(|e| e.in_function(function))?;

        for bounty in &bounties {
            if let Err(e) = bounty.check_invariants() {
                warn!(bounty_id = bounty.id, error = %e, "Bounty record violates lifecycle invariant");
            }
        }
        debug!(count = bounties.len(), "Fetched bounties");
        Ok(bounties)
    }

    async fn get_bounty(&self, id: u64) -> Result<Option<Bounty>> {
        let function = "bounties";
        let value = self.read_raw(function, vec![ClarityValue::uint(id)]).await?;
        let bounty = decode_bounty_slot(&value, id).map_err(|e| e.in_function(function))?;
        if let Some(Err(e)) = bounty.as_ref().map(Bounty::check_invariants) {
            warn!(bounty_id = id, error = %e, "Bounty record violates lifecycle invariant");
        }
        Ok(bounty)
    }

    async fn create_bounty(
        &self,
        description: &str,
        reward: &str,
        sender: Option<&StacksAddress>,
    ) -> Result<TxId> {
        let sender = self.require_sender(sender)?;
        // truncates past six decimals: "1.999999999" is 1999999 micro-STX
        let reward = StxAmount::from_decimal_str(reward)?;
        let request = self.build_create_bounty_call(sender, description, reward);
        self.submit(WriteKind::CreateBounty, request).await
    }

    async fn submit_work(
        &self,
        bounty_id: u64,
        submission_link: &str,
        sender: Option<&StacksAddress>,
    ) -> Result<TxId> {
        let sender = self.require_sender(sender)?;
        let request = self.build_submit_work_call(sender, bounty_id, submission_link);
        self.submit(WriteKind::SubmitWork, request).await
    }

    async fn approve_work(&self, bounty_id: u64, sender: Option<&StacksAddress>) -> Result<TxId> {
        let sender = self.require_sender(sender)?;
        let request = self.build_approve_call(sender, bounty_id);
        self.submit(WriteKind::ApproveBounty, request).await
    }

    async fn cancel_bounty(&self, bounty_id: u64, sender: Option<&StacksAddress>) -> Result<TxId> {
        let sender = self.require_sender(sender)?;
        let request = self.build_cancel_call(sender, bounty_id);
        self.submit(WriteKind::CancelBounty, request).await
    }
}
