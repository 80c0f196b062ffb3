use proptest::prelude::*;
use taskmint_clarity::ClarityValue;

fn arb_value() -> impl Strategy<Value = ClarityValue> {
    let leaf = prop_oneof![
        any::<u128>().prop_map(ClarityValue::UInt),
        any::<i128>().prop_map(ClarityValue::Int),
        any::<bool>().prop_map(ClarityValue::Bool),
        ".{0,24}".prop_map(ClarityValue::StringUtf8),
        "[ -~]{0,24}".prop_map(ClarityValue::StringAscii),
        proptest::collection::vec(any::<u8>(), 0..16).prop_map(ClarityValue::Buffer),
        Just(ClarityValue::OptionalNone),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            inner.clone().prop_map(ClarityValue::some),
            inner.clone().prop_map(ClarityValue::ok),
            proptest::collection::vec(inner.clone(), 0..4).prop_map(ClarityValue::List),
            proptest::collection::btree_map("[a-z][a-z-]{0,8}", inner, 0..4)
                .prop_map(ClarityValue::Tuple),
        ]
    })
}

proptest! {
    #[test]
    fn prop_decode_reverses_encode(value in arb_value()) {
        let hex = value.to_hex().unwrap();
        prop_assert_eq!(ClarityValue::from_hex(&hex).unwrap(), value);
    }

    #[test]
    fn prop_arbitrary_bytes_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        let _ = ClarityValue::deserialize(&bytes);
    }

    #[test]
    fn prop_truncation_is_an_error(value in arb_value(), cut in 1usize..8) {
        let bytes = value.serialize().unwrap();
        prop_assume!(cut <= bytes.len());
        prop_assert!(ClarityValue::deserialize(&bytes[..bytes.len() - cut]).is_err());
    }
}
