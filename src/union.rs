//! The union codec, its alternatives, and prisms.
//!
//! A union codec is described as an ordered list of alternatives, each
//! pairing a branch codec with a [`Prism`] that projects the branch out of
//! the sum type and injects it back. Encoding walks the alternatives in
//! declaration order and takes the first prism hit; decoding resolves
//! named container values by schema full name, and falls back to trying
//! alternatives positionally for unnamed payloads.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::codec::Codec;
use crate::error::AvroError;
use crate::schema::{AvroSchema, SchemaKind};
use crate::value::AvroValue;

/// A partial focus on one branch of a sum type.
///
/// Lawful prisms satisfy `get_option(reverse_get(b)) == Some(b)`, and if
/// `get_option(a) == Some(b)` then `reverse_get(b) == a`.
///
/// # Examples
///
/// ```
/// use contrail::Prism;
///
/// #[derive(Debug, Clone, PartialEq)]
/// enum Shape {
///     Circle(f64),
///     Square(f64),
/// }
///
/// let circle = Prism::new(
///     |shape: &Shape| match shape {
///         Shape::Circle(radius) => Some(*radius),
///         _ => None,
///     },
///     Shape::Circle,
/// );
///
/// assert_eq!(circle.get_option(&Shape::Circle(1.0)), Some(1.0));
/// assert_eq!(circle.get_option(&Shape::Square(1.0)), None);
/// assert_eq!(circle.reverse_get(2.0), Shape::Circle(2.0));
/// ```
pub struct Prism<A, B> {
    get: Arc<dyn Fn(&A) -> Option<B> + Send + Sync>,
    put: Arc<dyn Fn(B) -> A + Send + Sync>,
}

impl<A, B> Clone for Prism<A, B> {
    fn clone(&self) -> Self {
        Self {
            get: Arc::clone(&self.get),
            put: Arc::clone(&self.put),
        }
    }
}

impl<A, B> Prism<A, B> {
    /// Create a prism from a projection and an injection.
    pub fn new(
        get_option: impl Fn(&A) -> Option<B> + Send + Sync + 'static,
        reverse_get: impl Fn(B) -> A + Send + Sync + 'static,
    ) -> Self {
        Self {
            get: Arc::new(get_option),
            put: Arc::new(reverse_get),
        }
    }

    /// Project the branch value out of `a`, if this is the right branch.
    pub fn get_option(&self, a: &A) -> Option<B> {
        (self.get.as_ref())(a)
    }

    /// Inject a branch value back into the sum type.
    pub fn reverse_get(&self, b: B) -> A {
        (self.put.as_ref())(b)
    }
}

/// One declared union alternative, with its branch type erased.
struct Alt<A> {
    schema: Result<AvroSchema, AvroError>,
    try_encode:
        Box<dyn Fn(&A, &[AvroSchema], &str) -> Result<Option<AvroValue>, AvroError> + Send + Sync>,
    decode: Box<dyn Fn(&AvroValue, &AvroSchema) -> Result<A, AvroError> + Send + Sync>,
}

/// Builder for union codecs.
///
/// Obtained from [`union`]. Alternatives keep their declaration order:
/// encoding selects the first alternative whose prism matches, and the
/// structural decode fallback accepts the first alternative that decodes
/// successfully, so overlapping branches resolve deterministically by
/// declaration order.
pub struct UnionBuilder<A> {
    type_label: String,
    alts: Vec<Alt<A>>,
}

/// Start describing a union codec for type `A`.
///
/// `type_label` names the type in error messages.
pub fn union<A>(type_label: impl Into<String>) -> UnionBuilder<A> {
    UnionBuilder {
        type_label: type_label.into(),
        alts: Vec::new(),
    }
}

impl<A: fmt::Debug + 'static> UnionBuilder<A> {
    /// Declare an alternative from a branch codec and its prism.
    pub fn alt<B: 'static>(mut self, codec: Codec<B>, prism: Prism<A, B>) -> Self {
        let schema = codec.schema().map(Clone::clone);

        let alt_schema = schema.clone();
        let encode_codec = codec.clone();
        let encode_prism = prism.clone();
        let try_encode: Box<
            dyn Fn(&A, &[AvroSchema], &str) -> Result<Option<AvroValue>, AvroError> + Send + Sync,
        > = Box::new(move |value, members, type_label| {
            let Some(branch_value) = encode_prism.get_option(value) else {
                return Ok(None);
            };
            let own = match &alt_schema {
                Ok(schema) => schema,
                Err(error) => return Err(error.clone()),
            };
            let full_name = own.full_name();
            let member = members
                .iter()
                .find(|member| member.full_name() == full_name)
                .ok_or_else(|| AvroError::encode_missing_union_schema(&full_name, type_label))?;
            encode_codec.encode(&branch_value, member).map(Some)
        });

        let decode: Box<dyn Fn(&AvroValue, &AvroSchema) -> Result<A, AvroError> + Send + Sync> =
            Box::new(move |value, member| {
                codec
                    .decode(value, member)
                    .map(|branch| prism.reverse_get(branch))
            });

        self.alts.push(Alt {
            schema,
            try_encode,
            decode,
        });
        self
    }

    /// Compile the declared alternatives into a codec.
    pub fn build(self) -> Codec<A> {
        let UnionBuilder { type_label, alts } = self;
        trace!(union = %type_label, alternatives = alts.len(), "building union codec");

        let schema = if alts.is_empty() {
            Err(AvroError::invalid_schema(format!(
                "union {type_label} must declare at least one alternative"
            )))
        } else {
            alts.iter()
                .map(|alt| alt.schema.clone())
                .collect::<Result<Vec<_>, _>>()
                .and_then(AvroSchema::union_of)
        };

        let alts = Arc::new(alts);

        let encode_alts = Arc::clone(&alts);
        let encode_label = type_label.clone();
        let encode = move |value: &A, schema: &AvroSchema| {
            let AvroSchema::Union(members) = schema else {
                return Err(AvroError::encode_unexpected_schema_type(
                    &encode_label,
                    schema.kind(),
                    &[SchemaKind::Union],
                ));
            };
            for alt in encode_alts.iter() {
                if let Some(encoded) = (alt.try_encode)(value, members, &encode_label)? {
                    return Ok(encoded);
                }
            }
            Err(AvroError::encode_exhausted_alternatives(
                format!("{value:?}"),
                &encode_label,
            ))
        };

        let decode_label = type_label;
        let decode = move |value: &AvroValue, schema: &AvroSchema| {
            let AvroSchema::Union(members) = schema else {
                return Err(AvroError::decode_unexpected_schema_type(
                    &decode_label,
                    schema.kind(),
                    &[SchemaKind::Union],
                ));
            };

            // Named containers resolve by full name; everything else is
            // tried positionally, first success wins.
            if let Some(full_name) = value.full_name() {
                let member = members
                    .iter()
                    .find(|member| member.full_name() == full_name)
                    .ok_or_else(|| {
                        AvroError::decode_missing_union_schema(&full_name, &decode_label)
                    })?;
                let alt = alts
                    .iter()
                    .find(|alt| {
                        matches!(&alt.schema, Ok(schema) if schema.full_name() == full_name)
                    })
                    .ok_or_else(|| {
                        AvroError::decode_missing_union_alternative(&full_name, &decode_label)
                    })?;
                return (alt.decode)(value, member);
            }

            for (alt, member) in alts.iter().zip(members.iter()) {
                if let Ok(decoded) = (alt.decode)(value, member) {
                    return Ok(decoded);
                }
            }
            Err(AvroError::decode_exhausted_alternatives(
                value.tag(),
                &decode_label,
            ))
        };

        Codec::new(schema, encode, decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{int, string};

    #[derive(Debug, Clone, PartialEq)]
    enum Id {
        Number(i32),
        Name(String),
    }

    fn number_prism() -> Prism<Id, i32> {
        Prism::new(
            |id: &Id| match id {
                Id::Number(n) => Some(*n),
                _ => None,
            },
            Id::Number,
        )
    }

    fn name_prism() -> Prism<Id, String> {
        Prism::new(
            |id: &Id| match id {
                Id::Name(s) => Some(s.clone()),
                _ => None,
            },
            Id::Name,
        )
    }

    fn id_codec() -> Codec<Id> {
        union::<Id>("Id")
            .alt(int(), number_prism())
            .alt(string(), name_prism())
            .build()
    }

    #[test]
    fn test_prism_laws() {
        let prism = number_prism();
        assert_eq!(prism.get_option(&prism.reverse_get(5)), Some(5));
        assert_eq!(prism.get_option(&Id::Name("x".to_string())), None);
    }

    #[test]
    fn test_schema_in_declaration_order() {
        let schema = id_codec().schema().unwrap().clone();
        assert_eq!(
            schema,
            AvroSchema::Union(vec![AvroSchema::Int, AvroSchema::String])
        );
    }

    #[test]
    fn test_encode_selects_matching_branch() {
        let codec = id_codec();
        assert_eq!(
            codec.to_avro(&Id::Number(42)).unwrap(),
            AvroValue::Int(42)
        );
        assert_eq!(
            codec.to_avro(&Id::Name("hi".to_string())).unwrap(),
            AvroValue::String("hi".to_string())
        );
    }

    #[test]
    fn test_structural_decode_fallback() {
        let codec = id_codec();
        assert_eq!(
            codec.from_avro(&AvroValue::String("hi".to_string())).unwrap(),
            Id::Name("hi".to_string())
        );
        assert_eq!(codec.from_avro(&AvroValue::Int(7)).unwrap(), Id::Number(7));
    }

    #[test]
    fn test_decode_exhausted_alternatives() {
        let codec = id_codec();
        let err = codec.from_avro(&AvroValue::Boolean(true)).unwrap_err();
        assert_eq!(
            err,
            AvroError::decode_exhausted_alternatives("boolean", "Id")
        );
    }

    #[test]
    fn test_empty_union_is_a_schema_error() {
        let codec = union::<Id>("Id").build();
        assert!(codec.schema().is_err());
    }
}
