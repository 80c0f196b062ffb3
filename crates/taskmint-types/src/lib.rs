pub mod address;
pub mod amount;
pub mod bounty;
pub mod error;
pub mod tx;

pub use address::StacksAddress;
pub use amount::{StxAmount, MICRO_PER_STX, STX_DECIMALS};
pub use bounty::{Bounty, BountyStatus};
pub use error::{Result, TypesError};
pub use tx::TxId;
