//! Typed, composable Avro codecs
//!
//! This library pairs user-defined types with Avro schemas: a [`Codec<A>`]
//! carries a schema, an encoder into the runtime [`AvroValue`]
//! representation, and a decoder back to `A`. Encoding and decoding are
//! checked against a supplied schema at runtime, and every failure is a
//! structured [`AvroError`].
//!
//! Built-in codecs cover the Avro scalar types, temporals, UUIDs,
//! decimals, byte strings, collections, and options; records, unions, and
//! enums are described declaratively with [`record`], [`union`], and
//! [`enumeration`] builders.
//!
//! ```
//! use contrail::{int, option, record, string, Field};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct User {
//!     name: String,
//!     age: Option<i32>,
//! }
//!
//! let codec = record::<User>("User")
//!     .with_namespace("com.example")
//!     .field(Field::new("name", |u: &User| u.name.clone(), string()))
//!     .field(Field::new("age", |u: &User| u.age, option(int())).with_default(None))
//!     .build(|(((), name), age)| User { name, age });
//!
//! let user = User { name: "Ada".to_string(), age: Some(36) };
//! let value = codec.to_avro(&user).unwrap();
//! assert_eq!(codec.from_avro(&value).unwrap(), user);
//! ```

pub mod codec;
pub mod enumeration;
pub mod error;
pub mod record;
pub mod schema;
pub mod union;
pub mod value;

// Re-export main types
pub use codec::{
    array, boolean, byte, bytes, character, decimal, double, float, instant, int, local_date,
    long, map, non_empty_array, non_empty_set, option, set, short, string, unit, uuid, Codec,
};
pub use enumeration::{enumeration, EnumBuilder};
pub use error::{AvroError, ErrorOp};
pub use record::{record, Field, RecordBuilder};
pub use schema::{
    AvroSchema, EnumSchema, FieldOrder, FieldSchema, FixedSchema, LogicalType, LogicalTypeName,
    RecordSchema, SchemaKind,
};
pub use union::{union, Prism, UnionBuilder};
pub use value::{AvroValue, EnumValue, FixedValue, RecordValue};
