//! Error types for Avro codecs.
//!
//! Every fallible operation in this crate surfaces an [`AvroError`]. The
//! variants form a closed taxonomy over the failure classes of the codec
//! algebra, and each renders a deterministic single-line message carrying
//! the offending schema kind, runtime tag, and contextual names, so errors
//! can be asserted on in tests and logged as-is.

use std::fmt;

use thiserror::Error;

use crate::schema::SchemaKind;

/// Whether a failure happened while encoding or decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorOp {
    Encode,
    Decode,
}

impl fmt::Display for ErrorOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorOp::Encode => write!(f, "encoding"),
            ErrorOp::Decode => write!(f, "decoding"),
        }
    }
}

fn kind_list(kinds: &[SchemaKind]) -> String {
    kinds
        .iter()
        .map(|kind| kind.name())
        .collect::<Vec<_>>()
        .join(" or ")
}

fn symbol_list(symbols: &[String]) -> String {
    symbols.join(", ")
}

fn logical_label(actual: &Option<String>) -> &str {
    actual.as_deref().unwrap_or("none")
}

/// Errors produced by schema construction, encoding, and decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AvroError {
    /// The supplied schema's type is outside the codec's supported set.
    #[error("Got unexpected schema type {actual} while {op} {type_label}, expected {}", kind_list(.expected))]
    UnexpectedSchemaType {
        op: ErrorOp,
        type_label: String,
        actual: SchemaKind,
        expected: Vec<SchemaKind>,
    },

    /// The supplied schema's logical type does not match the expected one.
    #[error("Got unexpected logical type {} while {op} {type_label}", logical_label(.actual))]
    UnexpectedLogicalType {
        op: ErrorOp,
        type_label: String,
        actual: Option<String>,
    },

    /// The runtime value's tag does not match what the schema calls for.
    #[error("Got unexpected value of type {actual} while {op} {type_label}, expected {expected}")]
    UnexpectedType {
        op: ErrorOp,
        type_label: String,
        actual: String,
        expected: String,
    },

    /// The supplied named schema's full name differs from the codec's.
    #[error("Schema full name {schema_name} does not match expected {expected} while {op}")]
    NameMismatch {
        op: ErrorOp,
        schema_name: String,
        expected: String,
    },

    /// An incoming record value carries a different full name than expected.
    #[error("Got record with full name {actual}, expected {expected}")]
    UnexpectedRecordName { actual: String, expected: String },

    /// A program field has no counterpart in the schema at hand.
    #[error("Missing field '{name}' in record schema while {op} {type_label}")]
    MissingRecordField {
        op: ErrorOp,
        name: String,
        type_label: String,
    },

    /// An enum symbol is absent from the supplied schema's symbol set.
    #[error("Symbol {symbol} is not part of schema symbols [{}] while {op} {type_label}", symbol_list(.symbols))]
    SymbolNotInSchema {
        op: ErrorOp,
        symbol: String,
        symbols: Vec<String>,
        type_label: String,
    },

    /// No member of the union schema carries the required full name.
    #[error("Missing schema with full name {name} in union while {op} {type_label}")]
    MissingUnionSchema {
        op: ErrorOp,
        name: String,
        type_label: String,
    },

    /// The union schema has a matching member, but no declared alternative.
    #[error("Missing alternative with full name {name} in union while decoding {type_label}")]
    MissingUnionAlternative { name: String, type_label: String },

    /// Every declared union alternative was tried without success.
    #[error("Exhausted alternatives while {op} {type_label}: no alternative matched {value}")]
    ExhaustedAlternatives {
        op: ErrorOp,
        value: String,
        type_label: String,
    },

    /// The unscaled value has more digits than the schema's precision.
    #[error("Decimal precision {given} exceeds schema precision {limit} while {op}")]
    DecimalPrecisionExceeded { op: ErrorOp, given: u64, limit: u32 },

    /// The value's scale differs from the schema's decimal scale.
    #[error("Decimal scale {given} does not match schema scale {required}")]
    DecimalScalesMismatch { given: i64, required: u32 },

    /// A byte payload is longer than the fixed schema's size.
    #[error("Got {length} bytes while {op}, expected at most {max} bytes for fixed schema")]
    ExceedsFixedSize {
        op: ErrorOp,
        length: usize,
        max: usize,
    },

    /// An int value is outside the byte range.
    #[error("Got unexpected int value {0}, expected value in range -128 to 127")]
    UnexpectedByte(i32),

    /// An int value is outside the short range.
    #[error("Got unexpected int value {0}, expected value in range -32768 to 32767")]
    UnexpectedShort(i32),

    /// A string to be read as a char does not have length 1.
    #[error("Got unexpected string with length {0}, expected length 1")]
    UnexpectedChar(usize),

    /// A non-empty collection codec decoded an empty array.
    #[error("Got unexpected empty collection while decoding {type_label}")]
    EmptyCollection { type_label: String },

    /// The union at hand is not a two-member union containing null.
    #[error("Got unexpected schema {schema} while {op} option, expected union of null and one other type")]
    UnexpectedOptionSchema { op: ErrorOp, schema: String },

    /// Schema construction failed (bad name, namespace, symbol, union
    /// shape, or logical-type parameters).
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// A failure raised outside the codec algebra, e.g. by a conversion
    /// supplied to `imap_error` or by a host library while parsing.
    #[error("{0}")]
    Custom(String),
}

impl AvroError {
    pub fn encode_unexpected_schema_type(
        type_label: impl Into<String>,
        actual: SchemaKind,
        expected: &[SchemaKind],
    ) -> Self {
        AvroError::UnexpectedSchemaType {
            op: ErrorOp::Encode,
            type_label: type_label.into(),
            actual,
            expected: expected.to_vec(),
        }
    }

    pub fn decode_unexpected_schema_type(
        type_label: impl Into<String>,
        actual: SchemaKind,
        expected: &[SchemaKind],
    ) -> Self {
        AvroError::UnexpectedSchemaType {
            op: ErrorOp::Decode,
            type_label: type_label.into(),
            actual,
            expected: expected.to_vec(),
        }
    }

    pub fn encode_unexpected_logical_type(
        actual: Option<String>,
        type_label: impl Into<String>,
    ) -> Self {
        AvroError::UnexpectedLogicalType {
            op: ErrorOp::Encode,
            type_label: type_label.into(),
            actual,
        }
    }

    pub fn decode_unexpected_logical_type(
        actual: Option<String>,
        type_label: impl Into<String>,
    ) -> Self {
        AvroError::UnexpectedLogicalType {
            op: ErrorOp::Decode,
            type_label: type_label.into(),
            actual,
        }
    }

    pub fn encode_unexpected_type(
        type_label: impl Into<String>,
        actual: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        AvroError::UnexpectedType {
            op: ErrorOp::Encode,
            type_label: type_label.into(),
            actual: actual.into(),
            expected: expected.into(),
        }
    }

    pub fn decode_unexpected_type(
        type_label: impl Into<String>,
        actual: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        AvroError::UnexpectedType {
            op: ErrorOp::Decode,
            type_label: type_label.into(),
            actual: actual.into(),
            expected: expected.into(),
        }
    }

    pub fn encode_name_mismatch(
        schema_name: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        AvroError::NameMismatch {
            op: ErrorOp::Encode,
            schema_name: schema_name.into(),
            expected: expected.into(),
        }
    }

    pub fn decode_name_mismatch(
        schema_name: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        AvroError::NameMismatch {
            op: ErrorOp::Decode,
            schema_name: schema_name.into(),
            expected: expected.into(),
        }
    }

    pub fn decode_unexpected_record_name(
        actual: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        AvroError::UnexpectedRecordName {
            actual: actual.into(),
            expected: expected.into(),
        }
    }

    pub fn encode_missing_record_field(
        name: impl Into<String>,
        type_label: impl Into<String>,
    ) -> Self {
        AvroError::MissingRecordField {
            op: ErrorOp::Encode,
            name: name.into(),
            type_label: type_label.into(),
        }
    }

    pub fn decode_missing_record_field(
        name: impl Into<String>,
        type_label: impl Into<String>,
    ) -> Self {
        AvroError::MissingRecordField {
            op: ErrorOp::Decode,
            name: name.into(),
            type_label: type_label.into(),
        }
    }

    pub fn encode_symbol_not_in_schema(
        symbol: impl Into<String>,
        symbols: &[String],
        type_label: impl Into<String>,
    ) -> Self {
        AvroError::SymbolNotInSchema {
            op: ErrorOp::Encode,
            symbol: symbol.into(),
            symbols: symbols.to_vec(),
            type_label: type_label.into(),
        }
    }

    pub fn decode_symbol_not_in_schema(
        symbol: impl Into<String>,
        symbols: &[String],
        type_label: impl Into<String>,
    ) -> Self {
        AvroError::SymbolNotInSchema {
            op: ErrorOp::Decode,
            symbol: symbol.into(),
            symbols: symbols.to_vec(),
            type_label: type_label.into(),
        }
    }

    pub fn encode_missing_union_schema(
        name: impl Into<String>,
        type_label: impl Into<String>,
    ) -> Self {
        AvroError::MissingUnionSchema {
            op: ErrorOp::Encode,
            name: name.into(),
            type_label: type_label.into(),
        }
    }

    pub fn decode_missing_union_schema(
        name: impl Into<String>,
        type_label: impl Into<String>,
    ) -> Self {
        AvroError::MissingUnionSchema {
            op: ErrorOp::Decode,
            name: name.into(),
            type_label: type_label.into(),
        }
    }

    pub fn decode_missing_union_alternative(
        name: impl Into<String>,
        type_label: impl Into<String>,
    ) -> Self {
        AvroError::MissingUnionAlternative {
            name: name.into(),
            type_label: type_label.into(),
        }
    }

    pub fn encode_exhausted_alternatives(
        value: impl Into<String>,
        type_label: impl Into<String>,
    ) -> Self {
        AvroError::ExhaustedAlternatives {
            op: ErrorOp::Encode,
            value: value.into(),
            type_label: type_label.into(),
        }
    }

    pub fn decode_exhausted_alternatives(
        value: impl Into<String>,
        type_label: impl Into<String>,
    ) -> Self {
        AvroError::ExhaustedAlternatives {
            op: ErrorOp::Decode,
            value: value.into(),
            type_label: type_label.into(),
        }
    }

    pub fn encode_decimal_precision_exceeded(given: u64, limit: u32) -> Self {
        AvroError::DecimalPrecisionExceeded {
            op: ErrorOp::Encode,
            given,
            limit,
        }
    }

    pub fn decode_decimal_precision_exceeded(given: u64, limit: u32) -> Self {
        AvroError::DecimalPrecisionExceeded {
            op: ErrorOp::Decode,
            given,
            limit,
        }
    }

    pub fn encode_decimal_scales_mismatch(given: i64, required: u32) -> Self {
        AvroError::DecimalScalesMismatch { given, required }
    }

    pub fn encode_exceeds_fixed_size(length: usize, max: usize) -> Self {
        AvroError::ExceedsFixedSize {
            op: ErrorOp::Encode,
            length,
            max,
        }
    }

    pub fn decode_exceeds_fixed_size(length: usize, max: usize) -> Self {
        AvroError::ExceedsFixedSize {
            op: ErrorOp::Decode,
            length,
            max,
        }
    }

    pub fn unexpected_byte(value: i32) -> Self {
        AvroError::UnexpectedByte(value)
    }

    pub fn unexpected_short(value: i32) -> Self {
        AvroError::UnexpectedShort(value)
    }

    pub fn unexpected_char(length: usize) -> Self {
        AvroError::UnexpectedChar(length)
    }

    pub fn decode_empty_collection(type_label: impl Into<String>) -> Self {
        AvroError::EmptyCollection {
            type_label: type_label.into(),
        }
    }

    pub fn encode_unexpected_option_schema(schema: impl Into<String>) -> Self {
        AvroError::UnexpectedOptionSchema {
            op: ErrorOp::Encode,
            schema: schema.into(),
        }
    }

    pub fn decode_unexpected_option_schema(schema: impl Into<String>) -> Self {
        AvroError::UnexpectedOptionSchema {
            op: ErrorOp::Decode,
            schema: schema.into(),
        }
    }

    /// Wrap a schema-construction failure raised by validation or by a host
    /// library while a codec assembles its schema.
    pub fn invalid_schema(message: impl Into<String>) -> Self {
        AvroError::InvalidSchema(message.into())
    }

    /// Wrap an arbitrary displayable failure, e.g. a parse error from a
    /// host library or a conversion supplied to `imap_error`.
    pub fn custom(message: impl fmt::Display) -> Self {
        AvroError::Custom(message.to_string())
    }
}
