//! Action derivation properties over every status and caller role.

use proptest::prelude::*;
use taskmint_app::{derive_actions, status_notice};
use taskmint_types::{Bounty, BountyStatus, StacksAddress, StxAmount};

const CLIENT: &str = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM";
const WORKER: &str = "ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG";

fn status_strategy() -> impl Strategy<Value = BountyStatus> {
    prop_oneof![
        Just(BountyStatus::Open),
        Just(BountyStatus::InProgress),
        Just(BountyStatus::Completed),
        Just(BountyStatus::Cancelled),
    ]
}

fn bounty(status: BountyStatus, has_worker: bool, link: &str) -> Bounty {
    Bounty {
        id: 0,
        client: StacksAddress::parse(CLIENT).unwrap(),
        worker: has_worker.then(|| StacksAddress::parse(WORKER).unwrap()),
        reward: StxAmount::from_micro(1_000_000),
        description: "task".to_string(),
        submission_link: link.to_string(),
        status,
    }
}

proptest! {
    #[test]
    fn prop_at_most_one_action(
        status in status_strategy(),
        has_worker in any::<bool>(),
        has_link in any::<bool>(),
        caller in prop_oneof![Just(None), Just(Some(CLIENT)), Just(Some(WORKER))],
    ) {
        let b = bounty(status, has_worker, if has_link { "https://x.dev" } else { "" });
        let caller = caller.map(|c| StacksAddress::parse(c).unwrap());
        let actions = derive_actions(&b, caller.as_ref());

        let enabled = [actions.can_submit_work, actions.can_approve, actions.can_cancel]
            .iter()
            .filter(|flag| **flag)
            .count();
        prop_assert!(enabled <= 1);
        // a notice is shown exactly when nothing can be done
        prop_assert_eq!(status_notice(&b, caller.as_ref()).is_none(), actions.any());
        if b.status.is_terminal() {
            prop_assert!(!actions.any());
        }
    }

    #[test]
    fn prop_approve_needs_all_four_conditions(
        status in status_strategy(),
        has_worker in any::<bool>(),
        has_link in any::<bool>(),
        caller_is_client in any::<bool>(),
    ) {
        let b = bounty(status, has_worker, if has_link { "https://x.dev" } else { "" });
        let caller = StacksAddress::parse(if caller_is_client { CLIENT } else { WORKER }).unwrap();
        let expected = status == BountyStatus::InProgress && has_worker && has_link && caller_is_client;
        prop_assert_eq!(derive_actions(&b, Some(&caller)).can_approve, expected);
    }
}
