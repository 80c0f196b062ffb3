//! TaskMint bounty board client.
//!
//! A [`WalletSession`] tracks the connected account, the [`BountyListView`]
//! loads bounties through a [`BountyContract`](taskmint_gateway::BountyContract)
//! and derives what the caller may do with each, and the action forms wrap
//! each contract write in a small state machine.

pub mod actions;
pub mod config;
pub mod forms;
pub mod list_view;
pub mod logging;
pub mod session;

pub use actions::{derive_actions, status_notice, BountyActions, StatusNotice};
pub use config::{AppConfig, LoggingConfig};
pub use forms::{
    ApproveBountyForm, CancelBountyForm, CreateBountyForm, FormContext, FormState, SubmitWorkForm,
};
pub use list_view::{BountyListView, BountyRow, ListState, RefreshSignal};
pub use session::{SessionState, WalletSession};
