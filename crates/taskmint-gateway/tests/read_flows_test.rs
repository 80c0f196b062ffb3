use std::sync::Arc;
use taskmint_clarity::{ClarityValue, Principal};
use taskmint_gateway::memory::MemoryReadOnly;
use taskmint_gateway::{BountyContract, ContractConfig, ContractGateway, Notifier, WalletSlot};
use taskmint_types::BountyStatus;

fn principal(hash: &str) -> ClarityValue {
    let mut hash160 = [0u8; 20];
    hash160.copy_from_slice(&hex::decode(hash).unwrap());
    ClarityValue::Principal(Principal::Standard {
        version: 26,
        hash160,
    })
}

fn record(description: &str, status: u8, worker: Option<&str>, link: &str) -> ClarityValue {
    ClarityValue::some(ClarityValue::tuple([
        ("client", principal("6d78de7b0625dfbfc16c3a8a5735f6dc3dc3f2ce")),
        (
            "worker",
            worker.map_or(ClarityValue::OptionalNone, |w| ClarityValue::some(principal(w))),
        ),
        ("reward", ClarityValue::uint(500_000u32)),
        ("description", ClarityValue::string_utf8(description)),
        ("status", ClarityValue::uint(status)),
        ("submission-link", ClarityValue::string_utf8(link)),
    ]))
}

async fn gateway_with(reader: Arc<MemoryReadOnly>) -> ContractGateway {
    ContractGateway::new(
        ContractConfig::default(),
        reader,
        WalletSlot::new(),
        Notifier::new(),
    )
}

#[tokio::test]
async fn test_all_bounties_reverse_creation_order() {
    let reader = Arc::new(MemoryReadOnly::new());
    let worker = "99e2ec69ac5b6e67b4e26edd0e2c1c1a6b9bbd23";
    reader
        .set_response(
            "get-all-bounties",
            ClarityValue::List(vec![
                record("first", 2, Some(worker), "https://a.dev"),
                ClarityValue::OptionalNone,
                record("third", 1, Some(worker), "https://c.dev"),
                record("fourth", 0, None, ""),
            ]),
        )
        .await;
    let gateway = gateway_with(reader.clone()).await;

    let bounties = gateway.get_all_bounties().await.unwrap();
    let order: Vec<(u64, &str)> = bounties
        .iter()
        .map(|b| (b.id, b.description.as_str()))
        .collect();
    assert_eq!(order, vec![(3, "fourth"), (2, "third"), (0, "first")]);
    assert_eq!(bounties[2].status, BountyStatus::Completed);

    let calls = reader.calls().await;
    assert_eq!(calls[0].function_args, vec![ClarityValue::uint(0u8)]);
    assert_eq!(calls[0].sender_address, calls[0].contract_address);
}

#[tokio::test]
async fn test_invariant_violation_is_kept() {
    let reader = Arc::new(MemoryReadOnly::new());
    // InProgress without a worker
    reader
        .set_response(
            "get-all-bounties",
            ClarityValue::List(vec![record("odd", 1, None, "")]),
        )
        .await;
    let gateway = gateway_with(reader).await;

    let bounties = gateway.get_all_bounties().await.unwrap();
    assert_eq!(bounties.len(), 1);
    assert!(bounties[0].check_invariants().is_err());
}

#[tokio::test]
async fn test_get_bounty() {
    let reader = Arc::new(MemoryReadOnly::new());
    reader
        .set_response("bounties", record("only", 0, None, ""))
        .await;
    let gateway = gateway_with(reader.clone()).await;

    let bounty = gateway.get_bounty(5).await.unwrap().unwrap();
    assert_eq!(bounty.id, 5);
    assert_eq!(bounty.reward.to_string(), "0.5");
    assert_eq!(
        reader.calls().await[0].function_args,
        vec![ClarityValue::uint(5u8)]
    );

    reader.set_response("bounties", ClarityValue::OptionalNone).await;
    assert!(gateway.get_bounty(6).await.unwrap().is_none());
}

#[tokio::test]
async fn test_read_failure_propagates() {
    let reader = Arc::new(MemoryReadOnly::new());
    reader.set_failure("get-bounty-count", "connection refused").await;
    let gateway = gateway_with(reader).await;

    let err = gateway.get_bounty_count().await.unwrap_err();
    assert_eq!(err.display_message("Failed to load bounties"), "connection refused");
}
