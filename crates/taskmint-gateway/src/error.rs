use crate::wallet::WalletError;
use taskmint_clarity::ClarityError;
use taskmint_types::TypesError;
use thiserror::Error;

pub const USER_REJECTED: &str = "User rejected request.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Wallet library is still loading or not installed.")]
    SdkNotReady,

    #[error("Wallet not connected.")]
    WalletNotConnected,

    #[error("{0}")]
    UserCancelled(String),

    #[error("Read-only call {function} failed: {message}")]
    Read { function: String, message: String },

    #[error("Transaction failed: {message}")]
    Write {
        message: String,
        reason: Option<String>,
    },

    #[error("{0}")]
    Validation(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl GatewayError {
    pub fn read(function: impl Into<String>, message: impl ToString) -> Self {
        Self::Read {
            function: function.into(),
            message: message.to_string(),
        }
    }

    /// Attach the contract function name to a read error raised while
    /// decoding, where the function was not known.
    pub fn in_function(self, function: &str) -> Self {
        match self {
            Self::Read { message, .. } => Self::Read {
                function: function.to_string(),
                message,
            },
            other => other,
        }
    }

    /// Most specific text for a user: a contract-supplied reason, then the
    /// error's own message, then `fallback`.
    pub fn display_message(&self, fallback: &str) -> String {
        let message = match self {
            Self::Write {
                reason: Some(reason),
                ..
            } if !reason.trim().is_empty() => reason.clone(),
            Self::Write { message, .. } => message.clone(),
            Self::Read { message, .. } => message.clone(),
            Self::UserCancelled(message) | Self::Validation(message) => message.clone(),
            other => other.to_string(),
        };
        if message.trim().is_empty() {
            fallback.to_string()
        } else {
            message
        }
    }
}

impl From<ClarityError> for GatewayError {
    fn from(err: ClarityError) -> Self {
        Self::read("decode", err)
    }
}

impl From<TypesError> for GatewayError {
    fn from(err: TypesError) -> Self {
        match err {
            TypesError::InvalidAmount(_) | TypesError::AmountOverflow(_) => {
                Self::Validation(err.to_string())
            }
            other => Self::read("decode", other),
        }
    }
}

impl From<WalletError> for GatewayError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::Rejected => Self::UserCancelled(USER_REJECTED.to_string()),
            WalletError::Failed { message, reason } => Self::Write { message, reason },
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_preferred_over_message() {
        let err = GatewayError::Write {
            message: "broadcast failed".to_string(),
            reason: Some("(err u102)".to_string()),
        };
        assert_eq!(err.display_message("Failed to approve bounty"), "(err u102)");
    }

    #[test]
    fn test_message_then_fallback() {
        let err = GatewayError::Write {
            message: "broadcast failed".to_string(),
            reason: None,
        };
        assert_eq!(err.display_message("Failed to approve bounty"), "broadcast failed");

        let blank = GatewayError::Write {
            message: String::new(),
            reason: Some("  ".to_string()),
        };
        assert_eq!(
            blank.display_message("Failed to approve bounty"),
            "Failed to approve bounty"
        );
    }

    #[test]
    fn test_wallet_error_mapping() {
        assert_eq!(
            GatewayError::from(WalletError::Rejected),
            GatewayError::UserCancelled(USER_REJECTED.to_string())
        );
        let decode = GatewayError::from(ClarityError::TrailingBytes(2)).in_function("get-all-bounties");
        assert!(matches!(decode, GatewayError::Read { ref function, .. } if function == "get-all-bounties"));
    }
}
