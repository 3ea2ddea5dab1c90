//! Built-in codecs for collections and optional values.
//!
//! Collection codecs delegate to an element codec over the array or map
//! schema's element type. Encoded ordering equals the iteration order of
//! the source container; sets dedup on decode because the target container
//! does.

use std::collections::{BTreeMap, BTreeSet};

use crate::codec::Codec;
use crate::error::AvroError;
use crate::schema::{AvroSchema, SchemaKind};
use crate::value::AvroValue;

/// Codec for `Vec<T>`, using the Avro array type.
pub fn array<T: 'static>(element: Codec<T>) -> Codec<Vec<T>> {
    let schema = element
        .schema()
        .map(|s| AvroSchema::Array(Box::new(s.clone())));
    let encode_element = element.clone();
    let decode_element = element;
    Codec::new(
        schema,
        move |values: &Vec<T>, schema| {
            let AvroSchema::Array(element_schema) = schema else {
                return Err(AvroError::encode_unexpected_schema_type(
                    "Vec",
                    schema.kind(),
                    &[SchemaKind::Array],
                ));
            };
            let items = values
                .iter()
                .map(|value| encode_element.encode(value, element_schema))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(AvroValue::Array(items))
        },
        move |value, schema| {
            let AvroSchema::Array(element_schema) = schema else {
                return Err(AvroError::decode_unexpected_schema_type(
                    "Vec",
                    schema.kind(),
                    &[SchemaKind::Array],
                ));
            };
            match value {
                AvroValue::Array(items) => items
                    .iter()
                    .map(|item| decode_element.decode(item, element_schema))
                    .collect(),
                other => Err(AvroError::decode_unexpected_type(
                    "Vec",
                    other.tag(),
                    "array",
                )),
            }
        },
    )
}

/// Codec for a non-empty `Vec<T>`.
///
/// Same schema and encoding as [`array`]; decoding rejects an empty array.
pub fn non_empty_array<T: Clone + 'static>(element: Codec<T>) -> Codec<Vec<T>> {
    let inner = array(element);
    inner.imap_error(
        |values| {
            if values.is_empty() {
                Err(AvroError::decode_empty_collection("non-empty Vec"))
            } else {
                Ok(values)
            }
        },
        |values: &Vec<T>| values.clone(),
    )
}

/// Codec for `BTreeSet<T>`, using the Avro array type.
///
/// Encoding writes elements in their sorted order; decoding collects into
/// the set, deduplicating repeated elements.
pub fn set<T: Ord + 'static>(element: Codec<T>) -> Codec<BTreeSet<T>> {
    let schema = element
        .schema()
        .map(|s| AvroSchema::Array(Box::new(s.clone())));
    let encode_element = element.clone();
    let decode_element = element;
    Codec::new(
        schema,
        move |values: &BTreeSet<T>, schema| {
            let AvroSchema::Array(element_schema) = schema else {
                return Err(AvroError::encode_unexpected_schema_type(
                    "BTreeSet",
                    schema.kind(),
                    &[SchemaKind::Array],
                ));
            };
            let items = values
                .iter()
                .map(|value| encode_element.encode(value, element_schema))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(AvroValue::Array(items))
        },
        move |value, schema| {
            let AvroSchema::Array(element_schema) = schema else {
                return Err(AvroError::decode_unexpected_schema_type(
                    "BTreeSet",
                    schema.kind(),
                    &[SchemaKind::Array],
                ));
            };
            match value {
                AvroValue::Array(items) => items
                    .iter()
                    .map(|item| decode_element.decode(item, element_schema))
                    .collect(),
                other => Err(AvroError::decode_unexpected_type(
                    "BTreeSet",
                    other.tag(),
                    "array",
                )),
            }
        },
    )
}

/// Codec for a non-empty `BTreeSet<T>`.
///
/// Same schema and encoding as [`set`]; decoding rejects an empty array.
pub fn non_empty_set<T: Ord + Clone + 'static>(element: Codec<T>) -> Codec<BTreeSet<T>> {
    let inner = set(element);
    inner.imap_error(
        |values| {
            if values.is_empty() {
                Err(AvroError::decode_empty_collection("non-empty BTreeSet"))
            } else {
                Ok(values)
            }
        },
        |values: &BTreeSet<T>| values.clone(),
    )
}

/// Codec for `BTreeMap<String, T>`, using the Avro map type.
pub fn map<T: 'static>(element: Codec<T>) -> Codec<BTreeMap<String, T>> {
    let schema = element
        .schema()
        .map(|s| AvroSchema::Map(Box::new(s.clone())));
    let encode_element = element.clone();
    let decode_element = element;
    Codec::new(
        schema,
        move |values: &BTreeMap<String, T>, schema| {
            let AvroSchema::Map(value_schema) = schema else {
                return Err(AvroError::encode_unexpected_schema_type(
                    "BTreeMap",
                    schema.kind(),
                    &[SchemaKind::Map],
                ));
            };
            let entries = values
                .iter()
                .map(|(key, value)| {
                    encode_element
                        .encode(value, value_schema)
                        .map(|encoded| (key.clone(), encoded))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(AvroValue::Map(entries))
        },
        move |value, schema| {
            let AvroSchema::Map(value_schema) = schema else {
                return Err(AvroError::decode_unexpected_schema_type(
                    "BTreeMap",
                    schema.kind(),
                    &[SchemaKind::Map],
                ));
            };
            match value {
                AvroValue::Map(entries) => entries
                    .iter()
                    .map(|(key, item)| {
                        decode_element
                            .decode(item, value_schema)
                            .map(|decoded| (key.clone(), decoded))
                    })
                    .collect(),
                other => Err(AvroError::decode_unexpected_type(
                    "BTreeMap",
                    other.tag(),
                    "map",
                )),
            }
        },
    )
}

/// For a two-member union containing null, the non-null branch.
fn non_null_branch(members: &[AvroSchema]) -> Option<&AvroSchema> {
    if members.len() != 2 {
        return None;
    }
    match (&members[0], &members[1]) {
        (AvroSchema::Null, other) if !matches!(other, AvroSchema::Null) => Some(other),
        (other, AvroSchema::Null) if !matches!(other, AvroSchema::Null) => Some(other),
        _ => None,
    }
}

/// Codec for `Option<T>`, using a union of null and the inner schema.
///
/// The supplied schema must be a union of exactly two members, one of
/// which is null (in either position); anything else is rejected with an
/// option-shape error. `None` encodes as null; `Some` encodes with the
/// non-null branch.
pub fn option<T: 'static>(inner: Codec<T>) -> Codec<Option<T>> {
    let schema = inner
        .schema()
        .and_then(|s| AvroSchema::union_of(vec![AvroSchema::Null, s.clone()]));
    let encode_inner = inner.clone();
    let decode_inner = inner;
    Codec::new(
        schema,
        move |value: &Option<T>, schema| {
            let AvroSchema::Union(members) = schema else {
                return Err(AvroError::encode_unexpected_schema_type(
                    "Option",
                    schema.kind(),
                    &[SchemaKind::Union],
                ));
            };
            let branch = non_null_branch(members)
                .ok_or_else(|| AvroError::encode_unexpected_option_schema(schema.to_json()))?;
            match value {
                None => Ok(AvroValue::Null),
                Some(inner_value) => encode_inner.encode(inner_value, branch),
            }
        },
        move |value, schema| {
            let AvroSchema::Union(members) = schema else {
                return Err(AvroError::decode_unexpected_schema_type(
                    "Option",
                    schema.kind(),
                    &[SchemaKind::Union],
                ));
            };
            let branch = non_null_branch(members)
                .ok_or_else(|| AvroError::decode_unexpected_option_schema(schema.to_json()))?;
            match value {
                AvroValue::Null => Ok(None),
                present => decode_inner.decode(present, branch).map(Some),
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::int;

    #[test]
    fn test_array_round_trip() {
        let codec = array(int());
        let values = vec![1, 2, 3];
        let encoded = codec.to_avro(&values).unwrap();
        assert_eq!(
            encoded,
            AvroValue::Array(vec![
                AvroValue::Int(1),
                AvroValue::Int(2),
                AvroValue::Int(3)
            ])
        );
        assert_eq!(codec.from_avro(&encoded).unwrap(), values);
    }

    #[test]
    fn test_set_dedups_on_decode() {
        let codec = set(int());
        let duplicated = AvroValue::Array(vec![
            AvroValue::Int(2),
            AvroValue::Int(1),
            AvroValue::Int(2),
        ]);
        let decoded = codec.from_avro(&duplicated).unwrap();
        assert_eq!(decoded, BTreeSet::from([1, 2]));
    }

    #[test]
    fn test_non_empty_array_rejects_empty() {
        let codec = non_empty_array(int());
        assert_eq!(
            codec.from_avro(&AvroValue::Array(vec![])).unwrap_err(),
            AvroError::decode_empty_collection("non-empty Vec")
        );
    }

    #[test]
    fn test_map_round_trip() {
        let codec = map(int());
        let values = BTreeMap::from([("a".to_string(), 1), ("b".to_string(), 2)]);
        let encoded = codec.to_avro(&values).unwrap();
        assert_eq!(codec.from_avro(&encoded).unwrap(), values);
    }

    #[test]
    fn test_option_round_trip() {
        let codec = option(int());
        assert_eq!(codec.to_avro(&None).unwrap(), AvroValue::Null);
        assert_eq!(codec.to_avro(&Some(9)).unwrap(), AvroValue::Int(9));
        assert_eq!(codec.from_avro(&AvroValue::Null).unwrap(), None);
        assert_eq!(codec.from_avro(&AvroValue::Int(9)).unwrap(), Some(9));
    }

    #[test]
    fn test_option_accepts_null_in_second_position() {
        let codec = option(int());
        let schema = AvroSchema::Union(vec![AvroSchema::Int, AvroSchema::Null]);
        assert_eq!(
            codec.encode(&Some(3), &schema).unwrap(),
            AvroValue::Int(3)
        );
    }

    #[test]
    fn test_option_rejects_wider_unions() {
        let codec = option(int());
        let schema = AvroSchema::Union(vec![
            AvroSchema::Null,
            AvroSchema::Int,
            AvroSchema::String,
        ]);
        let err = codec.encode(&None, &schema).unwrap_err();
        assert!(matches!(err, AvroError::UnexpectedOptionSchema { .. }));
    }
}
