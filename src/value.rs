//! Runtime Avro values.
//!
//! [`AvroValue`] is the generic value representation produced by encoders
//! and consumed by decoders. Named container values (records, enums, fixed)
//! carry their schema, which is how union decoding resolves a branch by
//! full name.

use std::sync::Arc;

use bytes::Bytes;
use serde_json::{json, Map, Value};

use crate::schema::{EnumSchema, FixedSchema, RecordSchema};

/// A runtime Avro value.
#[derive(Debug, Clone, PartialEq)]
pub enum AvroValue {
    /// The null value.
    Null,
    /// A boolean.
    Boolean(bool),
    /// A 32-bit signed integer.
    Int(i32),
    /// A 64-bit signed integer.
    Long(i64),
    /// A 32-bit IEEE 754 floating-point number.
    Float(f32),
    /// A 64-bit IEEE 754 floating-point number.
    Double(f64),
    /// A sequence of bytes.
    Bytes(Bytes),
    /// A unicode string.
    String(String),
    /// An array of values.
    Array(Vec<AvroValue>),
    /// A map from string keys to values, in insertion order.
    Map(Vec<(String, AvroValue)>),
    /// A record with positional field values.
    Record(RecordValue),
    /// An enum symbol.
    Enum(EnumValue),
    /// A fixed-size byte array.
    Fixed(FixedValue),
}

/// A record value carrying its schema and positional field values.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordValue {
    /// The schema this record was written with.
    pub schema: Arc<RecordSchema>,
    /// Field values, positionally matching `schema.fields`.
    pub fields: Vec<AvroValue>,
}

impl RecordValue {
    /// Create a new record value.
    pub fn new(schema: impl Into<Arc<RecordSchema>>, fields: Vec<AvroValue>) -> Self {
        Self {
            schema: schema.into(),
            fields,
        }
    }
}

/// An enum symbol carrying its schema.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    /// The schema this symbol belongs to.
    pub schema: Arc<EnumSchema>,
    /// The symbol.
    pub symbol: String,
}

impl EnumValue {
    /// Create a new enum value.
    pub fn new(schema: impl Into<Arc<EnumSchema>>, symbol: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            symbol: symbol.into(),
        }
    }
}

/// A fixed-size byte array carrying its schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedValue {
    /// The fixed schema for this value.
    pub schema: Arc<FixedSchema>,
    /// The payload.
    pub bytes: Bytes,
}

impl FixedValue {
    /// Create a new fixed value.
    pub fn new(schema: impl Into<Arc<FixedSchema>>, bytes: Bytes) -> Self {
        Self {
            schema: schema.into(),
            bytes,
        }
    }
}

impl AvroValue {
    /// The runtime type tag of this value, as used in error messages.
    pub fn tag(&self) -> &'static str {
        match self {
            AvroValue::Null => "null",
            AvroValue::Boolean(_) => "boolean",
            AvroValue::Int(_) => "int",
            AvroValue::Long(_) => "long",
            AvroValue::Float(_) => "float",
            AvroValue::Double(_) => "double",
            AvroValue::Bytes(_) => "bytes",
            AvroValue::String(_) => "string",
            AvroValue::Array(_) => "array",
            AvroValue::Map(_) => "map",
            AvroValue::Record(_) => "record",
            AvroValue::Enum(_) => "enum",
            AvroValue::Fixed(_) => "fixed",
        }
    }

    /// The full name of a named container value (record, enum, fixed).
    pub fn full_name(&self) -> Option<String> {
        match self {
            AvroValue::Record(r) => Some(r.schema.fullname()),
            AvroValue::Enum(e) => Some(e.schema.fullname()),
            AvroValue::Fixed(f) => Some(f.schema.fullname()),
            _ => None,
        }
    }

    /// Render this value as Avro default-value JSON.
    ///
    /// Bytes and fixed payloads render as ISO-8859-1 strings, per the Avro
    /// specification for defaults.
    pub fn to_json_value(&self) -> Value {
        match self {
            AvroValue::Null => Value::Null,
            AvroValue::Boolean(b) => json!(b),
            AvroValue::Int(i) => json!(i),
            AvroValue::Long(l) => json!(l),
            AvroValue::Float(f) => json!(f),
            AvroValue::Double(d) => json!(d),
            AvroValue::Bytes(bytes) => json!(latin1_string(bytes)),
            AvroValue::String(s) => json!(s),
            AvroValue::Array(items) => {
                Value::Array(items.iter().map(AvroValue::to_json_value).collect())
            }
            AvroValue::Map(entries) => {
                let mut obj = Map::new();
                for (key, value) in entries {
                    obj.insert(key.clone(), value.to_json_value());
                }
                Value::Object(obj)
            }
            AvroValue::Record(record) => {
                let mut obj = Map::new();
                for (field, value) in record.schema.fields.iter().zip(record.fields.iter()) {
                    obj.insert(field.name.clone(), value.to_json_value());
                }
                Value::Object(obj)
            }
            AvroValue::Enum(e) => json!(e.symbol),
            AvroValue::Fixed(f) => json!(latin1_string(&f.bytes)),
        }
    }
}

fn latin1_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}
