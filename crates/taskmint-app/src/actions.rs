//! What a caller may do with a bounty, derived from its state and identity.

use serde::Serialize;
use taskmint_types::{Bounty, BountyStatus, StacksAddress};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BountyActions {
    pub can_submit_work: bool,
    pub can_approve: bool,
    pub can_cancel: bool,
}

impl BountyActions {
    pub fn any(&self) -> bool {
        self.can_submit_work || self.can_approve || self.can_cancel
    }
}

/// Computed on every render; never stored. The three flags are mutually
/// exclusive because they require disjoint statuses or caller roles.
pub fn derive_actions(bounty: &Bounty, caller: Option<&StacksAddress>) -> BountyActions {
    let is_client = bounty.is_client(caller);
    BountyActions {
        can_submit_work: bounty.status == BountyStatus::Open && !is_client,
        can_approve: bounty.status == BountyStatus::InProgress
            && is_client
            && bounty.has_submission()
            && bounty.worker.is_some(),
        can_cancel: bounty.status == BountyStatus::Open && is_client,
    }
}

/// Informational line shown when no action applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusNotice {
    CompletedPaidOut,
    CancelledRefunded,
    AwaitingYourApproval,
    AwaitingCreatorApproval,
    WaitingForSubmissions,
    OpenForSubmissions,
}

impl StatusNotice {
    pub fn select(status: BountyStatus, caller_is_client: bool) -> Self {
        match (status, caller_is_client) {
            (BountyStatus::Completed, _) => Self::CompletedPaidOut,
            (BountyStatus::Cancelled, _) => Self::CancelledRefunded,
            (BountyStatus::InProgress, true) => Self::AwaitingYourApproval,
            (BountyStatus::InProgress, false) => Self::AwaitingCreatorApproval,
            (BountyStatus::Open, true) => Self::WaitingForSubmissions,
            (BountyStatus::Open, false) => Self::OpenForSubmissions,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::CompletedPaidOut => "This bounty has been completed and paid out.",
            Self::CancelledRefunded => "This bounty has been cancelled.",
            Self::AwaitingYourApproval => "A worker has submitted work for your approval.",
            Self::AwaitingCreatorApproval => "Work has been submitted and is awaiting approval.",
            Self::WaitingForSubmissions => {
                "You created this bounty and it's waiting for submissions."
            }
            Self::OpenForSubmissions => "This bounty is open for submissions.",
        }
    }

    /// Suggested next step.
    pub fn hint(&self) -> &'static str {
        match self {
            Self::CompletedPaidOut => "Bounty completed successfully!",
            Self::CancelledRefunded => "Funds have been refunded to the creator.",
            Self::AwaitingYourApproval => "Review and approve the submission above.",
            Self::AwaitingCreatorApproval => "Waiting for creator approval.",
            Self::WaitingForSubmissions => "Share this bounty to attract skilled workers!",
            Self::OpenForSubmissions => "Submit your work to earn the reward!",
        }
    }
}

/// The notice for `bounty`, or `None` when the caller has an action.
pub fn status_notice(bounty: &Bounty, caller: Option<&StacksAddress>) -> Option<StatusNotice> {
    if derive_actions(bounty, caller).any() {
        return None;
    }
    Some(StatusNotice::select(bounty.status, bounty.is_client(caller)))
}
