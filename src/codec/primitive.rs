//! Built-in codecs for scalar, byte-string, and unit types.
//!
//! Each codec checks the supplied schema's type tag before touching the
//! value, and each decoder checks the runtime tag of the incoming value,
//! so mismatches surface as structured errors rather than panics.

use bytes::Bytes;

use crate::codec::Codec;
use crate::error::AvroError;
use crate::schema::{AvroSchema, SchemaKind};
use crate::value::{AvroValue, FixedValue};

/// Codec for `bool`, using the Avro boolean type.
pub fn boolean() -> Codec<bool> {
    Codec::new(
        Ok(AvroSchema::Boolean),
        |&value, schema| match schema.kind() {
            SchemaKind::Boolean => Ok(AvroValue::Boolean(value)),
            other => Err(AvroError::encode_unexpected_schema_type(
                "bool",
                other,
                &[SchemaKind::Boolean],
            )),
        },
        |value, schema| match schema.kind() {
            SchemaKind::Boolean => match value {
                AvroValue::Boolean(b) => Ok(*b),
                other => Err(AvroError::decode_unexpected_type(
                    "bool",
                    other.tag(),
                    "boolean",
                )),
            },
            other => Err(AvroError::decode_unexpected_schema_type(
                "bool",
                other,
                &[SchemaKind::Boolean],
            )),
        },
    )
}

/// Codec for `i32`, using the Avro int type.
pub fn int() -> Codec<i32> {
    Codec::new(
        Ok(AvroSchema::Int),
        |&value, schema| match schema.kind() {
            SchemaKind::Int => Ok(AvroValue::Int(value)),
            other => Err(AvroError::encode_unexpected_schema_type(
                "i32",
                other,
                &[SchemaKind::Int],
            )),
        },
        |value, schema| match schema.kind() {
            SchemaKind::Int => match value {
                AvroValue::Int(i) => Ok(*i),
                other => Err(AvroError::decode_unexpected_type("i32", other.tag(), "int")),
            },
            other => Err(AvroError::decode_unexpected_schema_type(
                "i32",
                other,
                &[SchemaKind::Int],
            )),
        },
    )
}

/// Codec for `i64`, using the Avro long type.
pub fn long() -> Codec<i64> {
    Codec::new(
        Ok(AvroSchema::Long),
        |&value, schema| match schema.kind() {
            SchemaKind::Long => Ok(AvroValue::Long(value)),
            other => Err(AvroError::encode_unexpected_schema_type(
                "i64",
                other,
                &[SchemaKind::Long],
            )),
        },
        |value, schema| match schema.kind() {
            SchemaKind::Long => match value {
                AvroValue::Long(l) => Ok(*l),
                other => Err(AvroError::decode_unexpected_type(
                    "i64",
                    other.tag(),
                    "long",
                )),
            },
            other => Err(AvroError::decode_unexpected_schema_type(
                "i64",
                other,
                &[SchemaKind::Long],
            )),
        },
    )
}

/// Codec for `f32`, using the Avro float type.
pub fn float() -> Codec<f32> {
    Codec::new(
        Ok(AvroSchema::Float),
        |&value, schema| match schema.kind() {
            SchemaKind::Float => Ok(AvroValue::Float(value)),
            other => Err(AvroError::encode_unexpected_schema_type(
                "f32",
                other,
                &[SchemaKind::Float],
            )),
        },
        |value, schema| match schema.kind() {
            SchemaKind::Float => match value {
                AvroValue::Float(f) => Ok(*f),
                other => Err(AvroError::decode_unexpected_type(
                    "f32",
                    other.tag(),
                    "float",
                )),
            },
            other => Err(AvroError::decode_unexpected_schema_type(
                "f32",
                other,
                &[SchemaKind::Float],
            )),
        },
    )
}

/// Codec for `f64`, using the Avro double type.
pub fn double() -> Codec<f64> {
    Codec::new(
        Ok(AvroSchema::Double),
        |&value, schema| match schema.kind() {
            SchemaKind::Double => Ok(AvroValue::Double(value)),
            other => Err(AvroError::encode_unexpected_schema_type(
                "f64",
                other,
                &[SchemaKind::Double],
            )),
        },
        |value, schema| match schema.kind() {
            SchemaKind::Double => match value {
                AvroValue::Double(d) => Ok(*d),
                other => Err(AvroError::decode_unexpected_type(
                    "f64",
                    other.tag(),
                    "double",
                )),
            },
            other => Err(AvroError::decode_unexpected_schema_type(
                "f64",
                other,
                &[SchemaKind::Double],
            )),
        },
    )
}

/// Codec for `i8`, stored as an Avro int.
///
/// Decoding range-checks the int value and rejects anything outside
/// `-128..=127`.
pub fn byte() -> Codec<i8> {
    Codec::new(
        Ok(AvroSchema::Int),
        |&value, schema| match schema.kind() {
            SchemaKind::Int => Ok(AvroValue::Int(i32::from(value))),
            other => Err(AvroError::encode_unexpected_schema_type(
                "i8",
                other,
                &[SchemaKind::Int],
            )),
        },
        |value, schema| match schema.kind() {
            SchemaKind::Int => match value {
                AvroValue::Int(i) => {
                    i8::try_from(*i).map_err(|_| AvroError::unexpected_byte(*i))
                }
                other => Err(AvroError::decode_unexpected_type("i8", other.tag(), "int")),
            },
            other => Err(AvroError::decode_unexpected_schema_type(
                "i8",
                other,
                &[SchemaKind::Int],
            )),
        },
    )
}

/// Codec for `i16`, stored as an Avro int.
///
/// Decoding range-checks the int value and rejects anything outside
/// `-32768..=32767`.
pub fn short() -> Codec<i16> {
    Codec::new(
        Ok(AvroSchema::Int),
        |&value, schema| match schema.kind() {
            SchemaKind::Int => Ok(AvroValue::Int(i32::from(value))),
            other => Err(AvroError::encode_unexpected_schema_type(
                "i16",
                other,
                &[SchemaKind::Int],
            )),
        },
        |value, schema| match schema.kind() {
            SchemaKind::Int => match value {
                AvroValue::Int(i) => {
                    i16::try_from(*i).map_err(|_| AvroError::unexpected_short(*i))
                }
                other => Err(AvroError::decode_unexpected_type(
                    "i16",
                    other.tag(),
                    "int",
                )),
            },
            other => Err(AvroError::decode_unexpected_schema_type(
                "i16",
                other,
                &[SchemaKind::Int],
            )),
        },
    )
}

/// Codec for `char`, stored as an Avro string of length 1.
///
/// Decoding rejects strings whose character count is not exactly 1.
pub fn character() -> Codec<char> {
    Codec::new(
        Ok(AvroSchema::String),
        |&value: &char, schema| match schema.kind() {
            SchemaKind::String => Ok(AvroValue::String(value.to_string())),
            other => Err(AvroError::encode_unexpected_schema_type(
                "char",
                other,
                &[SchemaKind::String],
            )),
        },
        |value, schema| match schema.kind() {
            SchemaKind::String => match value {
                AvroValue::String(s) => {
                    let mut chars = s.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => Ok(c),
                        _ => Err(AvroError::unexpected_char(s.chars().count())),
                    }
                }
                other => Err(AvroError::decode_unexpected_type(
                    "char",
                    other.tag(),
                    "string",
                )),
            },
            other => Err(AvroError::decode_unexpected_schema_type(
                "char",
                other,
                &[SchemaKind::String],
            )),
        },
    )
}

/// Codec for `String`, using the Avro string type.
pub fn string() -> Codec<String> {
    Codec::new(
        Ok(AvroSchema::String),
        |value: &String, schema| match schema.kind() {
            SchemaKind::String => Ok(AvroValue::String(value.clone())),
            other => Err(AvroError::encode_unexpected_schema_type(
                "String",
                other,
                &[SchemaKind::String],
            )),
        },
        |value, schema| match schema.kind() {
            SchemaKind::String => match value {
                AvroValue::String(s) => Ok(s.clone()),
                other => Err(AvroError::decode_unexpected_type(
                    "String",
                    other.tag(),
                    "string",
                )),
            },
            other => Err(AvroError::decode_unexpected_schema_type(
                "String",
                other,
                &[SchemaKind::String],
            )),
        },
    )
}

/// Codec for [`Bytes`], using the Avro bytes type.
///
/// The codec also accepts fixed schemas on both sides: encoding against a
/// fixed schema produces a fixed value and fails if the payload is longer
/// than the declared size, and decoding a fixed value checks the same
/// bound.
pub fn bytes() -> Codec<Bytes> {
    Codec::new(
        Ok(AvroSchema::Bytes),
        |value: &Bytes, schema| {
            if let Some(fixed) = schema.as_fixed() {
                if value.len() > fixed.size {
                    return Err(AvroError::encode_exceeds_fixed_size(value.len(), fixed.size));
                }
                return Ok(AvroValue::Fixed(FixedValue::new(
                    fixed.clone(),
                    value.clone(),
                )));
            }
            match schema.kind() {
                SchemaKind::Bytes => Ok(AvroValue::Bytes(value.clone())),
                other => Err(AvroError::encode_unexpected_schema_type(
                    "Bytes",
                    other,
                    &[SchemaKind::Bytes, SchemaKind::Fixed],
                )),
            }
        },
        |value, schema| {
            if let Some(fixed) = schema.as_fixed() {
                return match value {
                    AvroValue::Fixed(f) => {
                        if f.bytes.len() > fixed.size {
                            Err(AvroError::decode_exceeds_fixed_size(
                                f.bytes.len(),
                                fixed.size,
                            ))
                        } else {
                            Ok(f.bytes.clone())
                        }
                    }
                    other => Err(AvroError::decode_unexpected_type(
                        "Bytes",
                        other.tag(),
                        "fixed",
                    )),
                };
            }
            match schema.kind() {
                SchemaKind::Bytes => match value {
                    AvroValue::Bytes(b) => Ok(b.clone()),
                    other => Err(AvroError::decode_unexpected_type(
                        "Bytes",
                        other.tag(),
                        "bytes",
                    )),
                },
                other => Err(AvroError::decode_unexpected_schema_type(
                    "Bytes",
                    other,
                    &[SchemaKind::Bytes, SchemaKind::Fixed],
                )),
            }
        },
    )
}

/// Codec for `()`, using the Avro null type.
pub fn unit() -> Codec<()> {
    Codec::new(
        Ok(AvroSchema::Null),
        |_, schema| match schema.kind() {
            SchemaKind::Null => Ok(AvroValue::Null),
            other => Err(AvroError::encode_unexpected_schema_type(
                "()",
                other,
                &[SchemaKind::Null],
            )),
        },
        |value, schema| match schema.kind() {
            SchemaKind::Null => match value {
                AvroValue::Null => Ok(()),
                other => Err(AvroError::decode_unexpected_type("()", other.tag(), "null")),
            },
            other => Err(AvroError::decode_unexpected_schema_type(
                "()",
                other,
                &[SchemaKind::Null],
            )),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FixedSchema;

    #[test]
    fn test_int_round_trip() {
        let codec = int();
        let value = codec.to_avro(&42).unwrap();
        assert_eq!(value, AvroValue::Int(42));
        assert_eq!(codec.from_avro(&value).unwrap(), 42);
    }

    #[test]
    fn test_byte_range_check() {
        let codec = byte();
        assert_eq!(
            codec.decode(&AvroValue::Int(128), &AvroSchema::Int),
            Err(AvroError::unexpected_byte(128))
        );
        assert_eq!(
            codec.decode(&AvroValue::Int(-128), &AvroSchema::Int),
            Ok(-128)
        );
    }

    #[test]
    fn test_char_rejects_long_strings() {
        let codec = character();
        assert_eq!(
            codec.decode(&AvroValue::String("ab".to_string()), &AvroSchema::String),
            Err(AvroError::unexpected_char(2))
        );
    }

    #[test]
    fn test_bytes_fixed_size_bound() {
        let codec = bytes();
        let fixed = AvroSchema::Fixed(FixedSchema::new("Digest", 2));
        assert_eq!(
            codec.encode(&Bytes::from_static(b"abc"), &fixed),
            Err(AvroError::encode_exceeds_fixed_size(3, 2))
        );
        let encoded = codec.encode(&Bytes::from_static(b"ab"), &fixed).unwrap();
        assert_eq!(codec.decode(&encoded, &fixed).unwrap(), Bytes::from_static(b"ab"));
    }

    #[test]
    fn test_schema_type_checked_before_value() {
        let err = int().encode(&1, &AvroSchema::String).unwrap_err();
        assert!(matches!(err, AvroError::UnexpectedSchemaType { .. }));
    }
}
