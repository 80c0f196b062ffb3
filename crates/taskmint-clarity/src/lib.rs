//! Clarity values as exchanged with a Stacks node.
//!
//! Read-only calls return consensus-serialised values (hex) and contract calls
//! take them as arguments; this crate models those values, encodes and decodes
//! the binary form, and renders principals as c32check addresses.

pub mod c32;
pub mod codec;
pub mod error;
pub mod json;
pub mod value;

pub use c32::{c32_address, c32_encode};
pub use error::{ClarityError, Result};
pub use value::{ClarityValue, Principal};
