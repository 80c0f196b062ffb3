use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypesError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Amount overflow: {0}")]
    AmountOverflow(String),

    #[error("Unknown bounty status: {0}")]
    UnknownStatus(u128),

    #[error("Invalid transaction id: {0}")]
    InvalidTxId(String),

    #[error("Bounty {id} violates invariant: {reason}")]
    InvariantViolation { id: u64, reason: String },
}

pub type Result<T> = std::result::Result<T, TypesError>;
