//! Action forms. Each wraps one contract write in an
//! idle -> pending -> success | error state machine.

use crate::list_view::RefreshSignal;
use crate::session::SessionState;
use serde::Serialize;
use std::sync::Arc;
use taskmint_gateway::{BountyContract, GatewayError};
use taskmint_types::{StacksAddress, StxAmount, TxId};
use tokio::sync::{watch, Mutex};
use tracing::{debug, error, info};

pub const INVALID_CREATE_INPUT: &str = "Please fill in all fields with valid values";
pub const MISSING_SUBMISSION_LINK: &str = "Please provide a submission link";
pub const INVALID_SUBMISSION_LINK: &str = "Please provide a valid URL";

pub const CREATE_FAILED: &str = "Failed to create bounty";
pub const SUBMIT_FAILED: &str = "Failed to submit work";
pub const APPROVE_FAILED: &str = "Failed to approve bounty";
pub const CANCEL_FAILED: &str = "Failed to cancel bounty";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FormState {
    #[default]
    Idle,
    Pending,
    Success {
        tx_id: TxId,
    },
    Error {
        message: String,
    },
}

impl FormState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Checks a new bounty's inputs: a non-blank description and a reward that
/// is a positive decimal amount.
pub fn validate_create(description: &str, reward: &str) -> Result<StxAmount, GatewayError> {
    let invalid = || GatewayError::Validation(INVALID_CREATE_INPUT.to_string());
    if description.trim().is_empty() || reward.trim().is_empty() {
        return Err(invalid());
    }
    match StxAmount::from_decimal_str(reward.trim()) {
        Ok(amount) if !amount.is_zero() => Ok(amount),
        _ => Err(invalid()),
    }
}

/// Checks a submission link is present and parses as an absolute URL.
pub fn validate_submission_link(link: &str) -> Result<String, GatewayError> {
    let link = link.trim();
    if link.is_empty() {
        return Err(GatewayError::Validation(MISSING_SUBMISSION_LINK.to_string()));
    }
    reqwest::Url::parse(link)
        .map_err(|_| GatewayError::Validation(INVALID_SUBMISSION_LINK.to_string()))?;
    Ok(link.to_string())
}

/// What every form needs: the contract, the session, and the refresh signal
/// to bump after a successful write.
#[derive(Clone)]
pub struct FormContext {
    pub contract: Arc<dyn BountyContract>,
    pub session: watch::Receiver<SessionState>,
    pub refresh: RefreshSignal,
}

impl FormContext {
    pub fn new(
        contract: Arc<dyn BountyContract>,
        session: watch::Receiver<SessionState>,
        refresh: RefreshSignal,
    ) -> Self {
        Self {
            contract,
            session,
            refresh,
        }
    }

    /// Address as of now; read per submission so a disconnect is honoured.
    fn caller(&self) -> Option<StacksAddress> {
        self.session.borrow().address.clone()
    }
}

/// State cell shared by the four forms.
struct FormMachine {
    state: watch::Sender<FormState>,
    fallback: &'static str,
}

impl FormMachine {
    fn new(fallback: &'static str) -> Self {
        let (state, _) = watch::channel(FormState::Idle);
        Self { state, fallback }
    }

    /// Move to Pending; false when a submission is already pending.
    fn begin(&self) -> bool {
        self.state.send_if_modified(|state| {
            if state.is_pending() {
                return false;
            }
            *state = FormState::Pending;
            true
        })
    }

    fn reject(&self, err: GatewayError) -> FormState {
        let next = FormState::Error {
            message: err.display_message(self.fallback),
        };
        self.state.send_replace(next.clone());
        next
    }

    fn finish(&self, result: Result<TxId, GatewayError>, ctx: &FormContext) -> FormState {
        let next = match result {
            Ok(tx_id) => {
                info!(tx_id = %tx_id, "Form submission succeeded");
                ctx.refresh.bump();
                FormState::Success { tx_id }
            }
            Err(e) => {
                error!(error = %e, "{}", self.fallback);
                FormState::Error {
                    message: e.display_message(self.fallback),
                }
            }
        };
        self.state.send_replace(next.clone());
        next
    }

    /// Back to Idle from Success or Error. Returns false while pending.
    fn reset(&self) -> bool {
        self.state.send_if_modified(|state| match state {
            FormState::Pending => false,
            FormState::Idle => false,
            _ => {
                *state = FormState::Idle;
                true
            }
        })
    }

    fn current(&self) -> FormState {
        self.state.borrow().clone()
    }
}

macro_rules! form_state_accessors {
    () => {
        pub fn subscribe(&self) -> watch::Receiver<FormState> {
            self.machine.state.subscribe()
        }

        pub fn state(&self) -> FormState {
            self.machine.current()
        }
    };
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateBountyInput {
    pub description: String,
    pub reward: String,
}

pub struct CreateBountyForm {
    ctx: FormContext,
    machine: FormMachine,
    input: Mutex<CreateBountyInput>,
}

impl CreateBountyForm {
    pub fn new(ctx: FormContext) -> Self {
        Self {
            ctx,
            machine: FormMachine::new(CREATE_FAILED),
            input: Mutex::new(CreateBountyInput::default()),
        }
    }

    form_state_accessors!();

    pub async fn set_description(&self, description: impl Into<String>) {
        self.input.lock().await.description = description.into();
    }

    pub async fn set_reward(&self, reward: impl Into<String>) {
        self.input.lock().await.reward = reward.into();
    }

    pub async fn input(&self) -> CreateBountyInput {
        self.input.lock().await.clone()
    }

    pub async fn submit(&self) -> FormState {
        if self.machine.current().is_pending() {
            debug!("Create bounty already pending");
            return FormState::Pending;
        }
        let input = self.input().await;
        if let Err(e) = validate_create(&input.description, &input.reward) {
            debug!(error = %e, "Create bounty input rejected");
            return self.machine.reject(e);
        }
        if !self.machine.begin() {
            return FormState::Pending;
        }

        let caller = self.ctx.caller();
        let result = self
            .ctx
            .contract
            .create_bounty(input.description.trim(), input.reward.trim(), caller.as_ref())
            .await;
        if result.is_ok() {
            *self.input.lock().await = CreateBountyInput::default();
        }
        self.machine.finish(result, &self.ctx)
    }

    pub async fn reset(&self) {
        if self.machine.reset() {
            *self.input.lock().await = CreateBountyInput::default();
        }
    }
}

pub struct SubmitWorkForm {
    ctx: FormContext,
    machine: FormMachine,
    bounty_id: u64,
    link: Mutex<String>,
}

impl SubmitWorkForm {
    pub fn new(ctx: FormContext, bounty_id: u64) -> Self {
        Self {
            ctx,
            machine: FormMachine::new(SUBMIT_FAILED),
            bounty_id,
            link: Mutex::new(String::new()),
        }
    }

    form_state_accessors!();

    pub async fn set_link(&self, link: impl Into<String>) {
        *self.link.lock().await = link.into();
    }

    pub async fn link(&self) -> String {
        self.link.lock().await.clone()
    }

    pub async fn submit(&self) -> FormState {
        if self.machine.current().is_pending() {
            return FormState::Pending;
        }
        let raw = self.link().await;
        let link = match validate_submission_link(&raw) {
            Ok(link) => link,
            Err(e) => {
                debug!(bounty_id = self.bounty_id, error = %e, "Submission link rejected");
                return self.machine.reject(e);
            }
        };
        if !self.machine.begin() {
            return FormState::Pending;
        }

        let caller = self.ctx.caller();
        let result = self
            .ctx
            .contract
            .submit_work(self.bounty_id, &link, caller.as_ref())
            .await;
        if result.is_ok() {
            self.link.lock().await.clear();
        }
        self.machine.finish(result, &self.ctx)
    }

    pub async fn reset(&self) {
        if self.machine.reset() {
            self.link.lock().await.clear();
        }
    }
}

pub struct ApproveBountyForm {
    ctx: FormContext,
    machine: FormMachine,
    bounty_id: u64,
}

impl ApproveBountyForm {
    pub fn new(ctx: FormContext, bounty_id: u64) -> Self {
        Self {
            ctx,
            machine: FormMachine::new(APPROVE_FAILED),
            bounty_id,
        }
    }

    form_state_accessors!();

    pub async fn submit(&self) -> FormState {
        if !self.machine.begin() {
            return FormState::Pending;
        }
        let caller = self.ctx.caller();
        let result = self
            .ctx
            .contract
            .approve_work(self.bounty_id, caller.as_ref())
            .await;
        self.machine.finish(result, &self.ctx)
    }

    pub fn reset(&self) {
        self.machine.reset();
    }
}

pub struct CancelBountyForm {
    ctx: FormContext,
    machine: FormMachine,
    bounty_id: u64,
}

impl CancelBountyForm {
    pub fn new(ctx: FormContext, bounty_id: u64) -> Self {
        Self {
            ctx,
            machine: FormMachine::new(CANCEL_FAILED),
            bounty_id,
        }
    }

    form_state_accessors!();

    pub async fn submit(&self) -> FormState {
        if !self.machine.begin() {
            return FormState::Pending;
        }
        let caller = self.ctx.caller();
        let result = self
            .ctx
            .contract
            .cancel_bounty(self.bounty_id, caller.as_ref())
            .await;
        self.machine.finish(result, &self.ctx)
    }

    pub fn reset(&self) {
        self.machine.reset();
    }
}
