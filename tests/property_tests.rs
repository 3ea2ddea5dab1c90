//! Property-based tests for the codec algebra.
//!
//! These tests use proptest to verify the round-trip and schema-stability
//! invariants across many generated inputs.

use std::collections::BTreeSet;
use std::str::FromStr;

use bigdecimal::num_bigint::BigInt;
use bigdecimal::BigDecimal;
use chrono::DateTime;
use proptest::prelude::*;
use uuid::Uuid;

use contrail::*;

// ============================================================================
// Round-Trip Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_boolean_round_trip(value in any::<bool>()) {
        let codec = boolean();
        let encoded = codec.to_avro(&value).unwrap();
        prop_assert_eq!(codec.from_avro(&encoded).unwrap(), value);
    }

    #[test]
    fn prop_int_round_trip(value in any::<i32>()) {
        let codec = int();
        let encoded = codec.to_avro(&value).unwrap();
        prop_assert_eq!(codec.from_avro(&encoded).unwrap(), value);
    }

    #[test]
    fn prop_long_round_trip(value in any::<i64>()) {
        let codec = long();
        let encoded = codec.to_avro(&value).unwrap();
        prop_assert_eq!(codec.from_avro(&encoded).unwrap(), value);
    }

    #[test]
    fn prop_double_round_trip(value in -1.0e12f64..1.0e12) {
        let codec = double();
        let encoded = codec.to_avro(&value).unwrap();
        prop_assert_eq!(codec.from_avro(&encoded).unwrap(), value);
    }

    #[test]
    fn prop_byte_round_trip(value in any::<i8>()) {
        let codec = byte();
        let encoded = codec.to_avro(&value).unwrap();
        prop_assert_eq!(codec.from_avro(&encoded).unwrap(), value);
    }

    #[test]
    fn prop_short_round_trip(value in any::<i16>()) {
        let codec = short();
        let encoded = codec.to_avro(&value).unwrap();
        prop_assert_eq!(codec.from_avro(&encoded).unwrap(), value);
    }

    #[test]
    fn prop_char_round_trip(value in any::<char>()) {
        let codec = character();
        let encoded = codec.to_avro(&value).unwrap();
        prop_assert_eq!(codec.from_avro(&encoded).unwrap(), value);
    }

    #[test]
    fn prop_string_round_trip(value in "\\PC*") {
        let codec = string();
        let encoded = codec.to_avro(&value).unwrap();
        prop_assert_eq!(codec.from_avro(&encoded).unwrap(), value);
    }

    #[test]
    fn prop_bytes_round_trip(payload in prop::collection::vec(any::<u8>(), 0..64)) {
        let codec = bytes();
        let value = bytes::Bytes::from(payload);
        let encoded = codec.to_avro(&value).unwrap();
        prop_assert_eq!(codec.from_avro(&encoded).unwrap(), value);
    }

    #[test]
    fn prop_uuid_round_trip(raw in any::<u128>()) {
        let codec = uuid();
        let value = Uuid::from_u128(raw);
        let encoded = codec.to_avro(&value).unwrap();
        prop_assert_eq!(codec.from_avro(&encoded).unwrap(), value);
    }

    #[test]
    fn prop_instant_round_trip(millis in -8_000_000_000_000i64..8_000_000_000_000) {
        let codec = instant();
        let value = DateTime::from_timestamp_millis(millis).unwrap();
        let encoded = codec.to_avro(&value).unwrap();
        prop_assert_eq!(codec.from_avro(&encoded).unwrap(), value);
    }

    #[test]
    fn prop_local_date_round_trip(days in -100_000i32..100_000) {
        let codec = local_date();
        let schema = codec.schema().unwrap().clone();
        let date = codec.decode(&AvroValue::Int(days), &schema).unwrap();
        prop_assert_eq!(codec.encode(&date, &schema).unwrap(), AvroValue::Int(days));
    }

    #[test]
    fn prop_decimal_round_trip(mantissa in any::<i64>()) {
        let codec = decimal(20, 2);
        let value = BigDecimal::new(BigInt::from(mantissa), 2);
        let encoded = codec.to_avro(&value).unwrap();
        prop_assert_eq!(codec.from_avro(&encoded).unwrap(), value);
    }

    #[test]
    fn prop_array_round_trip(values in prop::collection::vec(any::<i32>(), 0..32)) {
        let codec = array(int());
        let encoded = codec.to_avro(&values).unwrap();
        prop_assert_eq!(codec.from_avro(&encoded).unwrap(), values);
    }

    #[test]
    fn prop_set_round_trip(values in prop::collection::btree_set(any::<i32>(), 0..32)) {
        let codec = set(int());
        let encoded = codec.to_avro(&values).unwrap();
        prop_assert_eq!(codec.from_avro(&encoded).unwrap(), values);
    }

    #[test]
    fn prop_set_decode_dedups(values in prop::collection::vec(any::<i8>(), 0..32)) {
        let codec = set(byte());
        let incoming = AvroValue::Array(
            values.iter().map(|&v| AvroValue::Int(i32::from(v))).collect(),
        );
        let decoded = codec.from_avro(&incoming).unwrap();
        let expected: BTreeSet<i8> = values.into_iter().collect();
        prop_assert_eq!(decoded, expected);
    }

    #[test]
    fn prop_option_round_trip(value in proptest::option::of(any::<i32>())) {
        let codec = option(int());
        let encoded = codec.to_avro(&value).unwrap();
        prop_assert_eq!(codec.from_avro(&encoded).unwrap(), value);
    }
}

// ============================================================================
// Combinator Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_imap_composition_is_identity(value in any::<i32>()) {
        #[derive(Debug, Clone, PartialEq)]
        struct Wrapped(i32);

        let wrapped = int().imap(Wrapped, |w: &Wrapped| w.0);
        let unwrapped = wrapped.imap(|w: Wrapped| w.0, |n: &i32| Wrapped(*n));

        let encoded = unwrapped.to_avro(&value).unwrap();
        prop_assert_eq!(encoded, AvroValue::Int(value));
        prop_assert_eq!(unwrapped.from_avro(&AvroValue::Int(value)).unwrap(), value);
    }
}

// ============================================================================
// Schema Stability
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Sample {
    id: i64,
    amount: BigDecimal,
}

fn sample_codec() -> Codec<Sample> {
    record::<Sample>("Sample")
        .with_namespace("props")
        .field(Field::new("id", |s: &Sample| s.id, long()))
        .field(
            Field::new("amount", |s: &Sample| s.amount.clone(), decimal(10, 2))
                .with_default(BigDecimal::from_str("0.00").unwrap()),
        )
        .build(|(((), id), amount)| Sample { id, amount })
}

#[test]
fn test_schema_stable_across_calls() {
    let codec = sample_codec();
    assert_eq!(codec.schema().unwrap(), codec.schema().unwrap());
}

#[test]
fn test_schema_stable_across_builds() {
    assert_eq!(
        sample_codec().schema().unwrap(),
        sample_codec().schema().unwrap()
    );
}

proptest! {
    #[test]
    fn prop_record_round_trip(id in any::<i64>(), cents in -1_000_000i64..1_000_000) {
        let codec = sample_codec();
        let sample = Sample {
            id,
            amount: BigDecimal::new(BigInt::from(cents), 2),
        };
        let encoded = codec.to_avro(&sample).unwrap();
        prop_assert_eq!(codec.from_avro(&encoded).unwrap(), sample);
    }
}
