//! Avro schema types.
//!
//! This module defines the Avro schema type system used by the codec
//! algebra, including primitives, complex types, named types, logical
//! types, and canonical JSON rendering.

mod types;

pub use types::*;
