use date_json::shape::{date_marker_candidate, present_entries};
use date_json::{
    decode, deep_equal, deep_equal_wire, encode, json, DateInstant, RichValue, WireValue,
    DATE_KEY, MAX_EPOCH_MILLIS,
};
use indexmap::IndexMap;
use proptest::prelude::*;

fn key() -> impl Strategy<Value = String> {
    prop_oneof![
        1 => Just(DATE_KEY.to_string()),
        8 => "[a-z]{1,6}",
        1 => "[$~/ a-z]{0,4}",
    ]
}

fn leaf(with_undefined: bool) -> BoxedStrategy<RichValue> {
    let base = prop_oneof![
        Just(RichValue::Null),
        any::<bool>().prop_map(RichValue::Bool),
        (-1e15f64..1e15).prop_map(RichValue::Number),
        any::<i32>().prop_map(RichValue::from),
        ".{0,8}".prop_map(RichValue::Str),
        (-MAX_EPOCH_MILLIS..=MAX_EPOCH_MILLIS)
            .prop_map(|ms| RichValue::Date(DateInstant::from_millis(ms).unwrap())),
    ];
    if with_undefined {
        prop_oneof![9 => base, 1 => Just(RichValue::Undefined)].boxed()
    } else {
        base.boxed()
    }
}

/// Rich trees free of callables and ambiguous markers.
fn rich(with_undefined: bool) -> impl Strategy<Value = RichValue> {
    leaf(with_undefined).prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(RichValue::Array),
            prop::collection::vec((key(), inner), 0..6).prop_map(|entries| {
                let mut map: IndexMap<String, RichValue> = entries.into_iter().collect();
                if date_marker_candidate(&map).is_some() {
                    map.insert("sibling".to_string(), RichValue::Null);
                }
                RichValue::Object(map)
            }),
        ]
    })
}

proptest! {
    #[test]
    fn rich_wire_rich_roundtrip(value in rich(true)) {
        let wire = encode(&value).unwrap();
        let back = decode(&wire).unwrap();
        prop_assert!(deep_equal(&value, &back), "{:?} != {:?}", value, back);
    }

    #[test]
    fn wire_rich_wire_roundtrip(value in rich(true)) {
        let wire = encode(&value).unwrap();
        let again = encode(&decode(&wire).unwrap()).unwrap();
        prop_assert!(deep_equal_wire(&wire, &again));
    }

    #[test]
    fn json_text_roundtrip(value in rich(false)) {
        let text = json::to_string(&value).unwrap();
        let back = json::from_str(&text).unwrap();
        prop_assert!(deep_equal(&value, &back), "{}", text);
    }

    #[test]
    fn sequences_keep_length_and_order(items in prop::collection::vec(rich(true), 0..8)) {
        let wire = encode(&RichValue::Array(items.clone())).unwrap();
        let WireValue::Array(out) = wire else {
            return Err(TestCaseError::fail("expected array"));
        };
        prop_assert_eq!(out.len(), items.len());
        for (item, encoded) in items.iter().zip(&out) {
            prop_assert!(deep_equal_wire(&encode(item).unwrap(), encoded));
        }
    }

    #[test]
    fn absent_keys_are_erased(
        entries in prop::collection::vec(("[a-z]{1,4}", prop::option::of(any::<i32>())), 0..8)
    ) {
        let map: IndexMap<String, RichValue> = entries
            .into_iter()
            .map(|(k, v)| (k, v.map_or(RichValue::Undefined, RichValue::from)))
            .collect();
        let expected: Vec<String> = present_entries(&map).map(|(k, _)| k.clone()).collect();

        let wire = encode(&RichValue::Object(map)).unwrap();
        let WireValue::Object(out) = &wire else {
            return Err(TestCaseError::fail("expected object"));
        };
        let keys: Vec<String> = out.keys().cloned().collect();
        prop_assert_eq!(&keys, &expected);

        let RichValue::Object(back) = decode(&wire).unwrap() else {
            return Err(TestCaseError::fail("expected object"));
        };
        let keys: Vec<String> = back.keys().cloned().collect();
        prop_assert_eq!(&keys, &expected);
    }

    #[test]
    fn dates_encode_to_exact_millis(ms in -MAX_EPOCH_MILLIS..=MAX_EPOCH_MILLIS) {
        let instant = DateInstant::from_millis(ms).unwrap();
        let wire = encode(&RichValue::Date(instant)).unwrap();
        prop_assert_eq!(wire.get(DATE_KEY), Some(&WireValue::Number(ms as f64)));
        prop_assert_eq!(decode(&wire).unwrap().as_date(), Some(instant));
    }
}
