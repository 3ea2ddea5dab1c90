//! The codec abstraction and built-in codecs.
//!
//! A [`Codec<A>`] bundles three things for a user type `A`: a schema, an
//! encoder into the runtime [`AvroValue`] representation, and a decoder
//! back to `A`. Encoding and decoding are always checked against a
//! supplied schema, which may differ from the codec's own (e.g. a schema
//! read from a file header), and every mismatch surfaces as a structured
//! [`AvroError`].

mod collection;
mod logical;
mod primitive;

pub use collection::{array, map, non_empty_array, non_empty_set, option, set};
pub use logical::{decimal, instant, local_date, uuid};
pub use primitive::{
    boolean, byte, bytes, character, double, float, int, long, short, string, unit,
};

use std::fmt;
use std::sync::Arc;

use crate::error::AvroError;
use crate::schema::AvroSchema;
use crate::value::AvroValue;

type EncodeFn<A> = Arc<dyn Fn(&A, &AvroSchema) -> Result<AvroValue, AvroError> + Send + Sync>;
type DecodeFn<A> = Arc<dyn Fn(&AvroValue, &AvroSchema) -> Result<A, AvroError> + Send + Sync>;

/// A typed, composable Avro codec.
///
/// Codecs are immutable values: cloning is cheap (the encode and decode
/// functions are shared) and a codec can be used from multiple threads at
/// once. The schema is computed once at construction, so [`Codec::schema`]
/// is referentially transparent and structurally stable across calls.
///
/// # Examples
///
/// Wrapping an existing codec for a newtype:
///
/// ```
/// use contrail::{int, Codec};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Meters(i32);
///
/// let meters: Codec<Meters> = int().imap(Meters, |m: &Meters| m.0);
/// let value = meters.to_avro(&Meters(42)).unwrap();
/// assert_eq!(meters.from_avro(&value).unwrap(), Meters(42));
/// ```
pub struct Codec<A> {
    schema: Result<AvroSchema, AvroError>,
    encode: EncodeFn<A>,
    decode: DecodeFn<A>,
}

impl<A> Clone for Codec<A> {
    fn clone(&self) -> Self {
        Self {
            schema: self.schema.clone(),
            encode: Arc::clone(&self.encode),
            decode: Arc::clone(&self.decode),
        }
    }
}

impl<A: 'static> Codec<A> {
    /// Create a codec from a schema result and encode/decode functions.
    ///
    /// This is the primitive constructor the built-in codecs are made of;
    /// most users want those or the record/union/enumeration builders
    /// instead.
    pub fn new(
        schema: Result<AvroSchema, AvroError>,
        encode: impl Fn(&A, &AvroSchema) -> Result<AvroValue, AvroError> + Send + Sync + 'static,
        decode: impl Fn(&AvroValue, &AvroSchema) -> Result<A, AvroError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            schema,
            encode: Arc::new(encode),
            decode: Arc::new(decode),
        }
    }

    /// The schema this codec writes with.
    pub fn schema(&self) -> Result<&AvroSchema, AvroError> {
        match &self.schema {
            Ok(schema) => Ok(schema),
            Err(error) => Err(error.clone()),
        }
    }

    /// Encode a value against the supplied schema.
    pub fn encode(&self, value: &A, schema: &AvroSchema) -> Result<AvroValue, AvroError> {
        (self.encode.as_ref())(value, schema)
    }

    /// Decode a runtime value interpreted as the supplied schema.
    pub fn decode(&self, value: &AvroValue, schema: &AvroSchema) -> Result<A, AvroError> {
        (self.decode.as_ref())(value, schema)
    }

    /// Encode a value against this codec's own schema.
    pub fn to_avro(&self, value: &A) -> Result<AvroValue, AvroError> {
        let schema = self.schema()?;
        (self.encode.as_ref())(value, schema)
    }

    /// Decode a runtime value against this codec's own schema.
    pub fn from_avro(&self, value: &AvroValue) -> Result<A, AvroError> {
        let schema = self.schema()?;
        (self.decode.as_ref())(value, schema)
    }

    /// Map this codec to another type via an isomorphism.
    ///
    /// `f` converts decoded values, `g` converts values to encode. The
    /// schema is unchanged.
    pub fn imap<B>(
        self,
        f: impl Fn(A) -> B + Send + Sync + 'static,
        g: impl Fn(&B) -> A + Send + Sync + 'static,
    ) -> Codec<B> {
        let encode = self.encode;
        let decode = self.decode;
        Codec {
            schema: self.schema,
            encode: Arc::new(move |b, schema| (encode.as_ref())(&g(b), schema)),
            decode: Arc::new(move |value, schema| (decode.as_ref())(value, schema).map(&f)),
        }
    }

    /// Map this codec to another type, where the decode direction may fail.
    ///
    /// Like [`Codec::imap`], but `f` can reject decoded values with an
    /// [`AvroError`] (typically via [`AvroError::custom`]).
    pub fn imap_error<B>(
        self,
        f: impl Fn(A) -> Result<B, AvroError> + Send + Sync + 'static,
        g: impl Fn(&B) -> A + Send + Sync + 'static,
    ) -> Codec<B> {
        let encode = self.encode;
        let decode = self.decode;
        Codec {
            schema: self.schema,
            encode: Arc::new(move |b, schema| (encode.as_ref())(&g(b), schema)),
            decode: Arc::new(move |value, schema| {
                (decode.as_ref())(value, schema).and_then(&f)
            }),
        }
    }
}

impl<A> fmt::Display for Codec<A> {
    /// Renders the codec as the canonical JSON of its schema, or as its
    /// schema error.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Ok(schema) => write!(f, "Codec({})", schema.to_json()),
            Err(error) => write!(f, "Codec({error})"),
        }
    }
}

impl<A> fmt::Debug for Codec<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Ok(schema) => f.debug_tuple("Codec").field(&schema.to_json()).finish(),
            Err(error) => f.debug_tuple("Codec").field(error).finish(),
        }
    }
}
