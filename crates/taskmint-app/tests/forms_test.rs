//! Form state machines driven through a scripted wallet.

use std::sync::Arc;
use std::time::Duration;
use taskmint_app::forms::{INVALID_CREATE_INPUT, INVALID_SUBMISSION_LINK};
use taskmint_app::{
    ApproveBountyForm, CancelBountyForm, CreateBountyForm, FormContext, FormState, RefreshSignal,
    SubmitWorkForm, WalletSession,
};
use taskmint_gateway::memory::{MemoryReadOnly, MemoryWallet};
use taskmint_gateway::{
    ContractConfig, ContractGateway, Notifier, TxOutcome, WalletError, WalletSlot,
};
use taskmint_types::TxId;

const CLIENT: &str = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM";

struct Harness {
    wallet: Arc<MemoryWallet>,
    session: Arc<WalletSession>,
    refresh: RefreshSignal,
    ctx: FormContext,
}

async fn harness() -> Harness {
    let wallet = Arc::new(MemoryWallet::with_stacks_address(CLIENT));
    let slot = WalletSlot::ready(wallet.clone());
    let notifier = Notifier::new();
    let gateway = Arc::new(ContractGateway::new(
        ContractConfig::default(),
        Arc::new(MemoryReadOnly::new()),
        slot.clone(),
        notifier.clone(),
    ));
    let session = Arc::new(WalletSession::new(slot, notifier));
    session.connect().await.unwrap();

    let refresh = RefreshSignal::new();
    let ctx = FormContext::new(gateway, session.subscribe(), refresh.clone());
    Harness {
        wallet,
        session,
        refresh,
        ctx,
    }
}

#[tokio::test]
async fn test_create_success_clears_inputs_and_refreshes() {
    let h = harness().await;
    let form = CreateBountyForm::new(h.ctx.clone());
    form.set_description("Write integration tests").await;
    form.set_reward("2.25").await;

    let state = form.submit().await;
    assert!(matches!(state, FormState::Success { .. }));
    assert_eq!(form.state(), state);
    assert_eq!(form.input().await.description, "");
    assert_eq!(form.input().await.reward, "");
    assert_eq!(h.refresh.generation(), 1);

    let requests = h.wallet.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].function_args[1].as_uint().unwrap(), 2_250_000);

    form.reset().await;
    assert_eq!(form.state(), FormState::Idle);
}

#[tokio::test]
async fn test_create_rejects_invalid_reward_without_calling_wallet() {
    let h = harness().await;
    let form = CreateBountyForm::new(h.ctx.clone());
    form.set_description("Something").await;

    for reward in ["", "0", "-1", "abc"] {
        form.set_reward(reward).await;
        assert_eq!(
            form.submit().await,
            FormState::Error {
                message: INVALID_CREATE_INPUT.to_string()
            }
        );
    }
    assert!(h.wallet.requests().await.is_empty());
    // inputs survive a failed submission
    assert_eq!(form.input().await.description, "Something");
}

#[tokio::test]
async fn test_malformed_link_makes_no_calls() {
    let h = harness().await;
    let form = SubmitWorkForm::new(h.ctx.clone(), 3);
    form.set_link("not a url").await;

    assert_eq!(
        form.submit().await,
        FormState::Error {
            message: INVALID_SUBMISSION_LINK.to_string()
        }
    );
    assert!(h.wallet.requests().await.is_empty());
    assert_eq!(h.refresh.generation(), 0);
    assert_eq!(form.link().await, "not a url");
}

#[tokio::test]
async fn test_cancelled_signature_is_an_error() {
    let h = harness().await;
    h.wallet.push_outcome(Ok(TxOutcome::Cancelled)).await;
    let form = ApproveBountyForm::new(h.ctx.clone(), 1);

    assert_eq!(
        form.submit().await,
        FormState::Error {
            message: "User rejected request.".to_string()
        }
    );
    assert_eq!(h.refresh.generation(), 0);

    form.reset();
    assert_eq!(form.state(), FormState::Idle);
}

#[tokio::test]
async fn test_wallet_failure_message_falls_back() {
    let h = harness().await;
    h.wallet
        .push_outcome(Err(WalletError::Failed {
            message: String::new(),
            reason: None,
        }))
        .await;
    let form = CancelBountyForm::new(h.ctx.clone(), 2);

    assert_eq!(
        form.submit().await,
        FormState::Error {
            message: "Failed to cancel bounty".to_string()
        }
    );
}

#[tokio::test]
async fn test_double_submit_while_pending_is_ignored() {
    let h = harness().await;
    let release = h.wallet.hold_next_call().await;
    let form = Arc::new(CancelBountyForm::new(h.ctx.clone(), 4));

    let first = {
        let form = form.clone();
        tokio::spawn(async move { form.submit().await })
    };
    let mut states = form.subscribe();
    states.wait_for(FormState::is_pending).await.unwrap();

    assert_eq!(form.submit().await, FormState::Pending);
    assert_eq!(h.wallet.requests().await.len(), 1);

    let tx_id = TxId::new("0xabc").unwrap();
    release
        .send(Ok(TxOutcome::Finished {
            tx_id: tx_id.clone(),
        }))
        .unwrap();
    assert_eq!(first.await.unwrap(), FormState::Success { tx_id });
    assert_eq!(h.wallet.requests().await.len(), 1);
}

#[tokio::test]
async fn test_disconnect_while_write_in_flight() {
    let h = harness().await;
    let release = h.wallet.hold_next_call().await;
    let form = Arc::new(SubmitWorkForm::new(h.ctx.clone(), 5));
    form.set_link("https://example.com/pr/1").await;

    let pending = {
        let form = form.clone();
        tokio::spawn(async move { form.submit().await })
    };
    let mut states = form.subscribe();
    states.wait_for(FormState::is_pending).await.unwrap();

    h.session.disconnect().await;
    let state = h.session.state();
    assert!(state.address.is_none());
    assert!(!state.is_connected);

    release
        .send(Ok(TxOutcome::Finished {
            tx_id: TxId::new("0xdef").unwrap(),
        }))
        .unwrap();
    let finished = tokio::time::timeout(Duration::from_secs(5), pending)
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(finished, FormState::Success { .. }));

    // the next submission sees the cleared session
    form.reset().await;
    form.set_link("https://example.com/pr/2").await;
    assert_eq!(
        form.submit().await,
        FormState::Error {
            message: "Wallet not connected.".to_string()
        }
    );
    assert_eq!(h.wallet.requests().await.len(), 1);
}
