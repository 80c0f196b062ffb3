use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClarityError {
    #[error("Unexpected end of input: needed {needed} bytes at offset {offset}")]
    UnexpectedEnd { offset: usize, needed: usize },

    #[error("Unknown type prefix 0x{prefix:02x} at offset {offset}")]
    UnknownPrefix { offset: usize, prefix: u8 },

    #[error("Value nesting exceeds depth {0}")]
    DepthExceeded(usize),

    #[error("Invalid string: {0}")]
    InvalidString(String),

    #[error("Trailing bytes after value: {0}")]
    TrailingBytes(usize),

    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Missing tuple field: {0}")]
    MissingField(String),

    #[error("Value too large to encode: {0}")]
    TooLarge(String),
}

pub type Result<T> = std::result::Result<T, ClarityError>;
