//! Property checks: decoding is a pure function of (pipeline, mapping,
//! initial target), and numeric assignment is exact or rejected.

use proptest::prelude::*;
use structmap::{impl_record, DecodeError, Decoder, Mapping, Value};

#[derive(Debug, Default, Clone, PartialEq)]
struct Inner {
    label: String,
    weight: Option<f64>,
}
impl_record!(Inner { label, weight });

#[derive(Debug, Default, Clone, PartialEq)]
struct Sample {
    small: i8,
    count: Option<u32>,
    flag: bool,
    tags: Vec<String>,
    inner: Inner,
    flat: Inner,
}
impl_record!(Sample { small, count, flag, tags, inner, #[embedded] flat });

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        (-300i64..300).prop_map(Value::from),
        any::<u32>().prop_map(Value::from),
        (-1e6f64..1e6).prop_map(Value::from),
        "[a-z]{0,6}".prop_map(Value::from),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Seq),
            prop::collection::vec(("[a-z]{1,6}", inner.clone()), 0..4)
                .prop_map(|entries| Value::Map(entries.into_iter().collect())),
            inner.prop_map(Value::ptr),
        ]
    })
}

fn mapping() -> impl Strategy<Value = Mapping> {
    let keys = prop_oneof![
        Just("small".to_string()),
        Just("count".to_string()),
        Just("flag".to_string()),
        Just("tags".to_string()),
        Just("inner".to_string()),
        Just("label".to_string()),
        Just("weight".to_string()),
        "[a-z]{1,4}",
    ];
    prop::collection::vec((keys, value()), 0..8).prop_map(|entries| entries.into_iter().collect())
}

fn outcome(decoder: &Decoder, from: &Mapping) -> (Sample, Result<(), String>) {
    let mut sample = Sample::default();
    let result = decoder.decode(from, &mut sample).map_err(|e| e.to_string());
    (sample, result)
}

proptest! {
    #[test]
    fn repeated_decodes_agree(from in mapping()) {
        let decoder = Decoder::new();
        let first = outcome(&decoder, &from);
        let second = outcome(&decoder.clone(), &from);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn decode_never_panics_or_faults(from in mapping()) {
        let mut sample = Sample::default();
        let result = Decoder::new().decode(&from, &mut sample);
        prop_assert!(!matches!(result, Err(DecodeError::Internal(_))));
    }

    #[test]
    fn small_ints_are_exact_or_mismatched(n in any::<i64>()) {
        let from: Mapping = [("small", Value::from(n)), ("inner", Value::Map(Mapping::new()))]
            .into_iter()
            .collect();
        let mut sample = Sample::default();
        match Decoder::new().decode(&from, &mut sample) {
            Ok(()) => prop_assert_eq!(i64::from(sample.small), n),
            Err(DecodeError::TypeMismatch { field, .. }) => {
                prop_assert_eq!(field, "small");
                prop_assert!(i8::try_from(n).is_err());
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }

    #[test]
    fn absent_keys_keep_presets(label in "[a-z]{1,8}", count in any::<u32>()) {
        let mut sample = Sample {
            count: Some(count),
            flat: Inner { label: label.clone(), weight: None },
            ..Default::default()
        };
        let from: Mapping = [("flag", Value::from(true)), ("inner", Value::Map(Mapping::new()))]
            .into_iter()
            .collect();
        Decoder::new().decode(&from, &mut sample).unwrap();
        prop_assert!(sample.flag);
        prop_assert_eq!(sample.count, Some(count));
        prop_assert_eq!(sample.flat.label, label);
    }
}
