//! Bounty list view: load, derive rows, reload on refresh.

use crate::actions::{derive_actions, status_notice, BountyActions, StatusNotice};
use crate::session::SessionState;
use serde::Serialize;
use std::sync::Arc;
use taskmint_gateway::BountyContract;
use taskmint_types::{Bounty, StacksAddress};
use tokio::sync::watch;
use tracing::{debug, error, info};

pub const LOAD_FAILED: &str = "Failed to load bounties";

/// Counter bumped after every successful write; the list view reloads when
/// it changes.
#[derive(Clone)]
pub struct RefreshSignal {
    sender: Arc<watch::Sender<u64>>,
}

impl RefreshSignal {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(0);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn bump(&self) {
        self.sender.send_modify(|generation| *generation += 1);
    }

    pub fn generation(&self) -> u64 {
        *self.sender.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.sender.subscribe()
    }
}

impl Default for RefreshSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// A bounty as the list shows it to one caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BountyRow {
    pub bounty: Bounty,
    pub actions: BountyActions,
    pub notice: Option<StatusNotice>,
    pub client_label: String,
    pub worker_label: Option<String>,
    pub reward_label: String,
    pub status_label: &'static str,
}

impl BountyRow {
    pub fn new(bounty: Bounty, caller: Option<&StacksAddress>) -> Self {
        let actions = derive_actions(&bounty, caller);
        let notice = status_notice(&bounty, caller);
        Self {
            actions,
            notice,
            client_label: bounty.client.short(),
            worker_label: bounty.worker.as_ref().map(StacksAddress::short),
            reward_label: format!("{} STX", bounty.reward.format_scaled()),
            status_label: bounty.status.label(),
            bounty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState {
    Loading,
    Loaded { count: u64, rows: Vec<BountyRow> },
    Failed { message: String },
}

pub struct BountyListView {
    contract: Arc<dyn BountyContract>,
    session: watch::Receiver<SessionState>,
    state: watch::Sender<ListState>,
}

impl BountyListView {
    pub fn new(contract: Arc<dyn BountyContract>, session: watch::Receiver<SessionState>) -> Self {
        let (state, _) = watch::channel(ListState::Loading);
        Self {
            contract,
            session,
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ListState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> ListState {
        self.state.borrow().clone()
    }

    /// Fetch count and bounties and replace the current state wholesale.
    pub async fn load(&self) -> ListState {
        self.state.send_replace(ListState::Loading);
        let next = match self.fetch().await {
            Ok((count, bounties)) => {
                let caller = self.session.borrow().address.clone();
                let rows = bounties
                    .into_iter()
                    .map(|bounty| BountyRow::new(bounty, caller.as_ref()))
                    .collect::<Vec<_>>();
                debug!(count, rows = rows.len(), "Bounty list loaded");
                ListState::Loaded { count, rows }
            }
            Err(e) => {
                error!(error = %e, "Failed to load bounties");
                ListState::Failed {
                    message: e.display_message(LOAD_FAILED),
                }
            }
        };
        self.state.send_replace(next.clone());
        next
    }

    /// Manual retry after a failure.
    pub async fn retry(&self) -> ListState {
        info!("Retrying bounty list load");
        self.load().await
    }

    async fn fetch(&self) -> taskmint_gateway::Result<(u64, Vec<Bounty>)> {
        let count = self.contract.get_bounty_count().await?;
        let bounties = self.contract.get_all_bounties().await?;
        Ok((count, bounties))
    }

    /// Load now, then reload whenever `refresh` fires or the connected
    /// account changes. Returns once both channels are closed.
    pub async fn run_until_closed(&self, mut refresh: watch::Receiver<u64>) {
        let mut session = self.session.clone();
        self.load().await;

        let mut refresh_open = true;
        let mut session_open = true;
        while refresh_open || session_open {
            tokio::select! {
                changed = refresh.changed(), if refresh_open => {
                    if changed.is_err() {
                        refresh_open = false;
                        continue;
                    }
                    debug!(generation = *refresh.borrow(), "Refresh requested");
                }
                changed = session.changed(), if session_open => {
                    if changed.is_err() {
                        session_open = false;
                        continue;
                    }
                    debug!("Session changed, reloading bounties");
                }
            }
            self.load().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskmint_types::{BountyStatus, StxAmount};

    #[test]
    fn test_row_labels() {
        let client = StacksAddress::parse("ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM").unwrap();
        let bounty = Bounty {
            id: 0,
            client: client.clone(),
            worker: None,
            reward: StxAmount::from_micro(1_500_000_000),
            description: "Audit".to_string(),
            submission_link: String::new(),
            status: BountyStatus::Open,
        };
        let row = BountyRow::new(bounty, Some(&client));
        assert_eq!(row.client_label, "ST1PQH...GZGM");
        assert_eq!(row.reward_label, "1.5K STX");
        assert_eq!(row.status_label, "Open");
        assert!(row.actions.can_cancel);
        assert!(row.notice.is_none());
    }

    #[test]
    fn test_refresh_signal_counts() {
        let signal = RefreshSignal::new();
        let rx = signal.subscribe();
        signal.bump();
        signal.bump();
        assert_eq!(signal.generation(), 2);
        assert!(rx.has_changed().unwrap());
    }
}
