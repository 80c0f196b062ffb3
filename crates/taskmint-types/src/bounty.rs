use crate::{Result, StacksAddress, StxAmount, TypesError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle position of a bounty, as encoded by the contract's `status` uint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum BountyStatus {
    Open = 0,
    InProgress = 1,
    Completed = 2,
    Cancelled = 3,
}

impl BountyStatus {
    pub fn from_code(code: u128) -> Result<Self> {
        match code {
            0 => Ok(Self::Open),
            1 => Ok(Self::InProgress),
            2 => Ok(Self::Completed),
            3 => Ok(Self::Cancelled),
            other => Err(TypesError::UnknownStatus(other)),
        }
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Completed and Cancelled bounties never change again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether a worker must be recorded in this status.
    pub fn has_worker(&self) -> bool {
        matches!(self, Self::InProgress | Self::Completed)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for BountyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One on-chain task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounty {
    pub id: u64,
    pub client: StacksAddress,
    pub worker: Option<StacksAddress>,
    pub reward: StxAmount,
    pub description: String,
    pub submission_link: String,
    pub status: BountyStatus,
}

impl Bounty {
    pub fn is_client(&self, caller: Option<&StacksAddress>) -> bool {
        caller.map_or(false, |caller| &self.client == caller)
    }

    pub fn has_submission(&self) -> bool {
        !self.submission_link.is_empty()
    }

    /// Check the record against the lifecycle invariants:
    /// a worker is present exactly in InProgress/Completed, and a submission
    /// link is present exactly when a worker is.
    pub fn check_invariants(&self) -> Result<()> {
        if self.worker.is_some() != self.status.has_worker() {
            return Err(TypesError::InvariantViolation {
                id: self.id,
                reason: format!(
                    "status {} {} a worker",
                    self.status,
                    if self.status.has_worker() {
                        "requires"
                    } else {
                        "forbids"
                    }
                ),
            });
        }
        if self.has_submission() != self.worker.is_some() {
            return Err(TypesError::InvariantViolation {
                id: self.id,
                reason: "submission link must be set exactly when a worker is".to_string(),
            });
        }
        Ok(())
    }
}
