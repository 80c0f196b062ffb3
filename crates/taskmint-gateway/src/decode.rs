//! Normalisation of raw contract values into [`Bounty`] records.

use crate::{GatewayError, Result};
use taskmint_clarity::{ClarityError, ClarityValue};
use taskmint_types::{Bounty, BountyStatus, StacksAddress, StxAmount};

/// Decimal places kept when presenting rewards.
pub const REWARD_DISPLAY_DECIMALS: u32 = 3;

pub fn decode_count(value: &ClarityValue) -> Result<u64> {
    let count = value.unwrap_response_ok()?.as_uint()?;
    u64::try_from(count).map_err(|_| GatewayError::read("decode", format!("count {} out of range", count)))
}

/// Decode the `get-all-bounties` list. Slot `i` holds bounty `offset + i`;
/// empty slots are dropped and the result is newest first.
pub fn decode_bounty_list(value: &ClarityValue, offset: u64) -> Result<Vec<Bounty>> {
    let slots = value.unwrap_response_ok()?.as_list()?;
    let mut bounties = Vec::with_capacity(slots.len());
    for (index, slot) in slots.iter().enumerate() {
        let id = offset + index as u64;
        if let Some(bounty) = decode_bounty_slot(slot, id)? {
            bounties.push(bounty);
        }
    }
    bounties.reverse();
    Ok(bounties)
}

/// A slot is `none`, `(some tuple)` or a bare tuple.
pub fn decode_bounty_slot(value: &ClarityValue, id: u64) -> Result<Option<Bounty>> {
    let record = match value.unwrap_response_ok()? {
        ClarityValue::OptionalNone => return Ok(None),
        ClarityValue::OptionalSome(inner) => &**inner,
        other => other,
    };
    decode_bounty_record(record, id).map(Some)
}

pub fn decode_bounty_record(record: &ClarityValue, id: u64) -> Result<Bounty> {
    let client = principal_field(record, "client")?;
    let worker = match optional_field(record, "worker")? {
        Some(value) => Some(principal(value)?),
        None => None,
    };
    let reward = StxAmount::from_micro(record.tuple_field("reward")?.as_uint()?)
        .truncate_decimals(REWARD_DISPLAY_DECIMALS);
    let description = record.tuple_field("description")?.as_str()?.to_string();
    let status = BountyStatus::from_code(record.tuple_field("status")?.as_uint()?)?;
    let submission_link = match optional_field(record, "submission-link")? {
        Some(value) => value.as_str()?.to_string(),
        None => String::new(),
    };

    Ok(Bounty {
        id,
        client,
        worker,
        reward,
        description,
        submission_link,
        status,
    })
}

fn principal(value: &ClarityValue) -> Result<StacksAddress> {
    Ok(StacksAddress::parse(&value.as_principal()?.to_address())?)
}

fn principal_field(record: &ClarityValue, name: &str) -> Result<StacksAddress> {
    principal(record.tuple_field(name)?)
}

/// A field that may be absent, `none`, `(some v)` or a bare `v`.
fn optional_field<'a>(record: &'a ClarityValue, name: &str) -> Result<Option<&'a ClarityValue>> {
    let value = match record.tuple_field(name) {
        Ok(value) => value,
        Err(ClarityError::MissingField(_)) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(match value {
        ClarityValue::OptionalNone => None,
        ClarityValue::OptionalSome(inner) => Some(&**inner),
        other => Some(other),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskmint_clarity::Principal;

    const CLIENT_HASH: &str = "6d78de7b0625dfbfc16c3a8a5735f6dc3dc3f2ce";
    const WORKER_HASH: &str = "99e2ec69ac5b6e67b4e26edd0e2c1c1a6b9bbd23";

    fn principal_value(hash: &str) -> ClarityValue {
        let mut hash160 = [0u8; 20];
        hash160.copy_from_slice(&hex::decode(hash).unwrap());
        ClarityValue::Principal(Principal::Standard {
            version: 26,
            hash160,
        })
    }

    fn record(status: u8, worker: bool) -> ClarityValue {
        ClarityValue::tuple([
            ("client", principal_value(CLIENT_HASH)),
            (
                "worker",
                if worker {
                    ClarityValue::some(principal_value(WORKER_HASH))
                } else {
                    ClarityValue::OptionalNone
                },
            ),
            ("reward", ClarityValue::uint(1_234_567u32)),
            ("description", ClarityValue::string_utf8("Fix the docs")),
            ("status", ClarityValue::uint(status)),
            (
                "submission-link",
                ClarityValue::string_utf8(if worker { "https://example.com/pr/1" } else { "" }),
            ),
        ])
    }

    #[test]
    fn test_record_fields() {
        let bounty = decode_bounty_record(&record(1, true), 4).unwrap();
        assert_eq!(bounty.id, 4);
        assert_eq!(bounty.client.as_str(), "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM");
        assert_eq!(
            bounty.worker.unwrap().as_str(),
            "ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG"
        );
        // 1.234567 truncated to 1.234
        assert_eq!(bounty.reward.micro(), 1_234_000);
        assert_eq!(bounty.status, BountyStatus::InProgress);
        assert_eq!(bounty.submission_link, "https://example.com/pr/1");
    }

    #[test]
    fn test_list_skips_empty_slots_and_reverses() {
        let list = ClarityValue::List(vec![
            ClarityValue::some(record(0, false)),
            ClarityValue::OptionalNone,
            ClarityValue::some(record(1, true)),
            ClarityValue::some(record(2, true)),
        ]);
        let ids: Vec<u64> = decode_bounty_list(&list, 0)
            .unwrap()
            .iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec![3, 2, 0]);
    }

    #[test]
    fn test_ok_wrapped_list() {
        let list = ClarityValue::ok(ClarityValue::List(vec![ClarityValue::some(record(0, false))]));
        assert_eq!(decode_bounty_list(&list, 10).unwrap()[0].id, 10);
    }

    #[test]
    fn test_optional_submission_link() {
        let ClarityValue::Tuple(mut fields) = record(0, false) else {
            unreachable!()
        };
        fields.insert("submission-link".to_string(), ClarityValue::OptionalNone);
        let bounty = decode_bounty_record(&ClarityValue::Tuple(fields), 0).unwrap();
        assert!(bounty.submission_link.is_empty());
        assert!(bounty.worker.is_none());
    }

    #[test]
    fn test_unknown_status_is_read_error() {
        assert!(matches!(
            decode_bounty_record(&record(9, false), 0),
            Err(GatewayError::Read { .. })
        ));
    }

    #[test]
    fn test_missing_client_is_read_error() {
        let ClarityValue::Tuple(mut fields) = record(0, false) else {
            unreachable!()
        };
        fields.remove("client");
        let err = decode_bounty_record(&ClarityValue::Tuple(fields), 0).unwrap_err();
        assert!(err.to_string().contains("client"));
    }

    #[test]
    fn test_count() {
        assert_eq!(decode_count(&ClarityValue::uint(7u8)).unwrap(), 7);
        assert_eq!(decode_count(&ClarityValue::ok(ClarityValue::uint(7u8))).unwrap(), 7);
        assert!(decode_count(&ClarityValue::Bool(true)).is_err());
    }
}
