//! Built-in codecs for temporal, identifier, and decimal types.
//!
//! These codecs pair a primitive base schema with a logical-type tag. The
//! tag on the supplied schema must match the codec's expectation, and the
//! decimal codec honors the supplied schema's precision and scale rather
//! than the ones it was built with, so a schema read from elsewhere stays
//! authoritative.

use bigdecimal::num_bigint::BigInt;
use bigdecimal::BigDecimal;
use bytes::Bytes;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::codec::Codec;
use crate::error::{AvroError, ErrorOp};
use crate::schema::{AvroSchema, LogicalType, LogicalTypeName, SchemaKind};
use crate::value::AvroValue;

fn unexpected_schema_type(
    op: ErrorOp,
    type_label: &str,
    actual: SchemaKind,
    expected: SchemaKind,
) -> AvroError {
    match op {
        ErrorOp::Encode => {
            AvroError::encode_unexpected_schema_type(type_label, actual, &[expected])
        }
        ErrorOp::Decode => {
            AvroError::decode_unexpected_schema_type(type_label, actual, &[expected])
        }
    }
}

fn unexpected_logical_type(
    op: ErrorOp,
    actual: Option<&LogicalTypeName>,
    type_label: &str,
) -> AvroError {
    let actual = actual.map(|logical| logical.name().to_string());
    match op {
        ErrorOp::Encode => AvroError::encode_unexpected_logical_type(actual, type_label),
        ErrorOp::Decode => AvroError::decode_unexpected_logical_type(actual, type_label),
    }
}

fn check_logical(
    schema: &AvroSchema,
    base: SchemaKind,
    expected: &str,
    type_label: &str,
    op: ErrorOp,
) -> Result<(), AvroError> {
    if schema.kind() != base {
        return Err(unexpected_schema_type(op, type_label, schema.kind(), base));
    }
    match schema.logical_type() {
        Some(logical) if logical.name() == expected => Ok(()),
        other => Err(unexpected_logical_type(op, other, type_label)),
    }
}

fn decimal_params(schema: &AvroSchema, op: ErrorOp) -> Result<(u32, u32), AvroError> {
    if schema.kind() != SchemaKind::Bytes {
        return Err(unexpected_schema_type(
            op,
            "BigDecimal",
            schema.kind(),
            SchemaKind::Bytes,
        ));
    }
    match schema.logical_type() {
        Some(LogicalTypeName::Decimal { precision, scale }) => Ok((*precision, *scale)),
        other => Err(unexpected_logical_type(op, other, "BigDecimal")),
    }
}

/// Codec for [`Uuid`], stored as an Avro string with the `uuid` logical
/// type.
pub fn uuid() -> Codec<Uuid> {
    Codec::new(
        Ok(AvroSchema::Logical(LogicalType::new(
            AvroSchema::String,
            LogicalTypeName::Uuid,
        ))),
        |value: &Uuid, schema| {
            check_logical(schema, SchemaKind::String, "uuid", "Uuid", ErrorOp::Encode)?;
            Ok(AvroValue::String(value.to_string()))
        },
        |value, schema| {
            check_logical(schema, SchemaKind::String, "uuid", "Uuid", ErrorOp::Decode)?;
            match value {
                AvroValue::String(s) => Uuid::parse_str(s).map_err(AvroError::custom),
                other => Err(AvroError::decode_unexpected_type(
                    "Uuid",
                    other.tag(),
                    "string",
                )),
            }
        },
    )
}

/// Codec for [`DateTime<Utc>`], stored as an Avro long with the
/// `timestamp-millis` logical type.
///
/// Encoding truncates to millisecond precision, so instants carrying
/// sub-millisecond components do not round-trip exactly.
pub fn instant() -> Codec<DateTime<Utc>> {
    Codec::new(
        Ok(AvroSchema::Logical(LogicalType::new(
            AvroSchema::Long,
            LogicalTypeName::TimestampMillis,
        ))),
        |value: &DateTime<Utc>, schema| {
            check_logical(
                schema,
                SchemaKind::Long,
                "timestamp-millis",
                "DateTime<Utc>",
                ErrorOp::Encode,
            )?;
            Ok(AvroValue::Long(value.timestamp_millis()))
        },
        |value, schema| {
            check_logical(
                schema,
                SchemaKind::Long,
                "timestamp-millis",
                "DateTime<Utc>",
                ErrorOp::Decode,
            )?;
            match value {
                AvroValue::Long(millis) => DateTime::from_timestamp_millis(*millis)
                    .ok_or_else(|| {
                        AvroError::custom(format!("timestamp {millis} ms is out of range"))
                    }),
                other => Err(AvroError::decode_unexpected_type(
                    "DateTime<Utc>",
                    other.tag(),
                    "long",
                )),
            }
        },
    )
}

fn unix_epoch_date() -> NaiveDate {
    DateTime::<Utc>::UNIX_EPOCH.date_naive()
}

/// Codec for [`NaiveDate`], stored as an Avro int with the `date` logical
/// type (days since the Unix epoch).
pub fn local_date() -> Codec<NaiveDate> {
    Codec::new(
        Ok(AvroSchema::Logical(LogicalType::new(
            AvroSchema::Int,
            LogicalTypeName::Date,
        ))),
        |value: &NaiveDate, schema| {
            check_logical(schema, SchemaKind::Int, "date", "NaiveDate", ErrorOp::Encode)?;
            let days = value.signed_duration_since(unix_epoch_date()).num_days();
            Ok(AvroValue::Int(days as i32))
        },
        |value, schema| {
            check_logical(schema, SchemaKind::Int, "date", "NaiveDate", ErrorOp::Decode)?;
            match value {
                AvroValue::Int(days) => unix_epoch_date()
                    .checked_add_signed(chrono::Duration::days(i64::from(*days)))
                    .ok_or_else(|| {
                        AvroError::custom(format!("date {days} days from epoch is out of range"))
                    }),
                other => Err(AvroError::decode_unexpected_type(
                    "NaiveDate",
                    other.tag(),
                    "int",
                )),
            }
        },
    )
}

/// Codec for [`BigDecimal`], stored as Avro bytes with the `decimal`
/// logical type.
///
/// The payload is the two's-complement big-endian unscaled integer.
/// Encoding requires the value's scale to equal the schema's scale and its
/// digit count to stay within the schema's precision; decoding re-checks
/// precision only, taking the scale from the schema.
pub fn decimal(precision: u32, scale: u32) -> Codec<BigDecimal> {
    let schema = if precision < 1 {
        Err(AvroError::invalid_schema(format!(
            "decimal precision {precision} must be at least 1"
        )))
    } else if scale > precision {
        Err(AvroError::invalid_schema(format!(
            "decimal scale {scale} must not exceed precision {precision}"
        )))
    } else {
        Ok(AvroSchema::Logical(LogicalType::new(
            AvroSchema::Bytes,
            LogicalTypeName::Decimal { precision, scale },
        )))
    };

    Codec::new(
        schema,
        |value: &BigDecimal, schema| {
            let (precision, scale) = decimal_params(schema, ErrorOp::Encode)?;
            let (unscaled, exponent) = value.as_bigint_and_exponent();
            if exponent != i64::from(scale) {
                return Err(AvroError::encode_decimal_scales_mismatch(exponent, scale));
            }
            let digits = value.digits();
            if digits > u64::from(precision) {
                return Err(AvroError::encode_decimal_precision_exceeded(
                    digits, precision,
                ));
            }
            Ok(AvroValue::Bytes(Bytes::from(unscaled.to_signed_bytes_be())))
        },
        |value, schema| {
            let (precision, scale) = decimal_params(schema, ErrorOp::Decode)?;
            match value {
                AvroValue::Bytes(payload) => {
                    let unscaled = BigInt::from_signed_bytes_be(payload);
                    let decoded = BigDecimal::new(unscaled, i64::from(scale));
                    let digits = decoded.digits();
                    if digits > u64::from(precision) {
                        return Err(AvroError::decode_decimal_precision_exceeded(
                            digits, precision,
                        ));
                    }
                    Ok(decoded)
                }
                other => Err(AvroError::decode_unexpected_type(
                    "BigDecimal",
                    other.tag(),
                    "bytes",
                )),
            }
        },
    )
}
