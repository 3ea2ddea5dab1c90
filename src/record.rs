//! The record codec and its field program.
//!
//! A record codec is described declaratively: each [`Field`] names one
//! field of the enclosing type, how to read it out (`access`), and the
//! codec for its payload, plus optional documentation, a default, sort
//! order, aliases, and custom properties. [`RecordBuilder`] collects the
//! fields in declaration order and compiles them into a [`Codec`] with
//! [`RecordBuilder::build`].
//!
//! Internally the builder keeps two interpretations of the same field
//! list: a type-erased descriptor per field (enough to assemble the schema
//! and to encode), and a single composed reader closure that decodes the
//! fields one by one into a nested-tuple accumulator which `build`'s
//! recombinator turns back into the user type.

use tracing::trace;

use crate::codec::Codec;
use crate::error::AvroError;
use crate::schema::{
    validate_name, validate_namespace, AvroSchema, FieldOrder, FieldSchema, RecordSchema,
    SchemaKind,
};
use crate::value::{AvroValue, RecordValue};

/// Description of one record field of enclosing type `A` with payload
/// type `B`.
pub struct Field<A, B> {
    name: String,
    access: Box<dyn Fn(&A) -> B + Send + Sync>,
    codec: Codec<B>,
    doc: Option<String>,
    default: Option<B>,
    order: FieldOrder,
    aliases: Vec<String>,
    props: Vec<(String, String)>,
}

impl<A, B> Field<A, B> {
    /// Create a field description from a name, an accessor, and the
    /// payload codec.
    pub fn new(
        name: impl Into<String>,
        access: impl Fn(&A) -> B + Send + Sync + 'static,
        codec: Codec<B>,
    ) -> Self {
        Self {
            name: name.into(),
            access: Box::new(access),
            codec,
            doc: None,
            default: None,
            order: FieldOrder::Ascending,
            aliases: Vec::new(),
            props: Vec::new(),
        }
    }

    /// Set the field documentation.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Declare a default value.
    ///
    /// The default is encoded into the schema and is also used when
    /// decoding a record whose writer schema lacks this field.
    pub fn with_default(mut self, default: B) -> Self {
        self.default = Some(default);
        self
    }

    /// Set the field sort order.
    pub fn with_order(mut self, order: FieldOrder) -> Self {
        self.order = order;
        self
    }

    /// Add aliases for this field.
    ///
    /// Aliases are recorded in the schema and are also consulted when
    /// locating the field in an incoming record whose writer named it
    /// differently.
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Attach a custom property. Properties keep declaration order.
    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.props.push((key.into(), value.into()));
        self
    }
}

/// Type-erased field descriptor: everything needed for schema assembly
/// and encoding, with the payload type hidden behind closures.
struct FieldMeta<A> {
    name: String,
    doc: Option<String>,
    order: FieldOrder,
    aliases: Vec<String>,
    props: Vec<(String, String)>,
    schema: Result<AvroSchema, AvroError>,
    default: Result<Option<AvroValue>, AvroError>,
    encode: Box<dyn Fn(&A, &AvroSchema) -> Result<AvroValue, AvroError> + Send + Sync>,
}

type ReadFn<T> =
    Box<dyn Fn(&RecordSchema, &[AvroValue], &str) -> Result<T, AvroError> + Send + Sync>;

/// Builder for record codecs.
///
/// Obtained from [`record`]; see the crate-level documentation for a
/// worked example.
pub struct RecordBuilder<A, T> {
    name: String,
    namespace: Option<String>,
    doc: Option<String>,
    aliases: Vec<String>,
    props: Vec<(String, String)>,
    fields: Vec<FieldMeta<A>>,
    read: ReadFn<T>,
}

/// Start describing a record codec for type `A`.
///
/// # Examples
///
/// ```
/// use contrail::{int, record, string, Field};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Person {
///     name: String,
///     age: i32,
/// }
///
/// let codec = record::<Person>("Person")
///     .with_namespace("com.example")
///     .field(Field::new("name", |p: &Person| p.name.clone(), string()))
///     .field(Field::new("age", |p: &Person| p.age, int()))
///     .build(|(((), name), age)| Person { name, age });
///
/// let person = Person { name: "Ada".to_string(), age: 36 };
/// let value = codec.to_avro(&person).unwrap();
/// assert_eq!(codec.from_avro(&value).unwrap(), person);
/// ```
pub fn record<A>(name: impl Into<String>) -> RecordBuilder<A, ()> {
    RecordBuilder {
        name: name.into(),
        namespace: None,
        doc: None,
        aliases: Vec::new(),
        props: Vec::new(),
        fields: Vec::new(),
        read: Box::new(|_, _, _| Ok(())),
    }
}

impl<A: 'static, T: 'static> RecordBuilder<A, T> {
    /// Set the record namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Set the record documentation.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Add record-level aliases.
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Attach a record-level custom property.
    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.props.push((key.into(), value.into()));
        self
    }

    /// Append a field to the program.
    ///
    /// Fields are processed in the order they are declared, and decoding
    /// extends the accumulator type from `T` to `(T, B)`.
    pub fn field<B>(mut self, field: Field<A, B>) -> RecordBuilder<A, (T, B)>
    where
        B: Clone + Send + Sync + 'static,
    {
        let Field {
            name,
            access,
            codec,
            doc,
            default,
            order,
            aliases,
            props,
        } = field;

        let schema = codec.schema().map(Clone::clone);
        let encoded_default = match (&default, &schema) {
            (Some(value), Ok(field_schema)) => codec.encode(value, field_schema).map(Some),
            (Some(_), Err(error)) => Err(error.clone()),
            (None, _) => Ok(None),
        };

        let encode_codec = codec.clone();
        let encode: Box<dyn Fn(&A, &AvroSchema) -> Result<AvroValue, AvroError> + Send + Sync> =
            Box::new(move |value, field_schema| {
                encode_codec.encode(&access(value), field_schema)
            });

        let lookup_aliases = aliases.clone();
        self.fields.push(FieldMeta {
            name: name.clone(),
            doc,
            order,
            aliases,
            props,
            schema,
            default: encoded_default,
            encode,
        });

        let previous = self.read;
        let read: ReadFn<(T, B)> = Box::new(move |writer, values, type_label| {
            let rest = previous(writer, values, type_label)?;
            // The writer may know this field under one of its aliases.
            let located = writer.field(&name).or_else(|| {
                lookup_aliases
                    .iter()
                    .find_map(|alias| writer.field(alias))
            });
            let decoded = match located {
                Some((position, field_schema)) => match values.get(position) {
                    Some(value) => codec.decode(value, &field_schema.schema)?,
                    None => {
                        return Err(AvroError::decode_missing_record_field(&name, type_label))
                    }
                },
                None => match &default {
                    Some(value) => value.clone(),
                    None => {
                        return Err(AvroError::decode_missing_record_field(&name, type_label))
                    }
                },
            };
            Ok((rest, decoded))
        });

        RecordBuilder {
            name: self.name,
            namespace: self.namespace,
            doc: self.doc,
            aliases: self.aliases,
            props: self.props,
            fields: self.fields,
            read,
        }
    }

    /// Compile the program into a codec.
    ///
    /// `recombine` receives the nested-tuple accumulator built by the
    /// declared fields, innermost first: for fields `x` then `y` it is
    /// called as `recombine((((), x), y))`.
    pub fn build(self, recombine: impl Fn(T) -> A + Send + Sync + 'static) -> Codec<A> {
        let RecordBuilder {
            name,
            namespace,
            doc,
            aliases,
            props,
            fields,
            read,
        } = self;

        let type_name = match &namespace {
            Some(ns) => format!("{ns}.{name}"),
            None => name.clone(),
        };
        trace!(record = %type_name, fields = fields.len(), "building record codec");

        let schema = assemble_schema(&name, namespace, doc, aliases, props, &fields);

        let encode_name = type_name.clone();
        let encode = move |value: &A, schema: &AvroSchema| {
            let record_schema = match schema {
                AvroSchema::Record(record_schema) => record_schema,
                other => {
                    return Err(AvroError::encode_unexpected_schema_type(
                        &encode_name,
                        other.kind(),
                        &[SchemaKind::Record],
                    ))
                }
            };
            if record_schema.fullname() != encode_name {
                return Err(AvroError::encode_name_mismatch(
                    record_schema.fullname(),
                    &encode_name,
                ));
            }
            let mut slots = vec![AvroValue::Null; record_schema.fields.len()];
            for meta in &fields {
                match record_schema.field(&meta.name) {
                    Some((position, field_schema)) => {
                        slots[position] = (meta.encode)(value, &field_schema.schema)?;
                    }
                    None => {
                        return Err(AvroError::encode_missing_record_field(
                            &meta.name,
                            &encode_name,
                        ))
                    }
                }
            }
            Ok(AvroValue::Record(RecordValue::new(
                record_schema.clone(),
                slots,
            )))
        };

        let decode_name = type_name;
        let decode = move |value: &AvroValue, schema: &AvroSchema| {
            if schema.kind() != SchemaKind::Record {
                return Err(AvroError::decode_unexpected_schema_type(
                    &decode_name,
                    schema.kind(),
                    &[SchemaKind::Record],
                ));
            }
            let incoming = match value {
                AvroValue::Record(incoming) => incoming,
                other => {
                    return Err(AvroError::decode_unexpected_type(
                        &decode_name,
                        other.tag(),
                        "record",
                    ))
                }
            };
            if incoming.schema.fullname() != decode_name {
                return Err(AvroError::decode_unexpected_record_name(
                    incoming.schema.fullname(),
                    &decode_name,
                ));
            }
            let accumulated = read(&incoming.schema, &incoming.fields, &decode_name)?;
            Ok(recombine(accumulated))
        };

        Codec::new(schema, encode, decode)
    }
}

fn assemble_schema<A>(
    name: &str,
    namespace: Option<String>,
    doc: Option<String>,
    aliases: Vec<String>,
    props: Vec<(String, String)>,
    fields: &[FieldMeta<A>],
) -> Result<AvroSchema, AvroError> {
    validate_name(name, "Record")?;
    if let Some(ns) = &namespace {
        validate_namespace(ns)?;
    }

    let mut field_schemas = Vec::with_capacity(fields.len());
    for meta in fields {
        validate_name(&meta.name, "Field")?;
        let schema = meta.schema.clone()?;
        let default = meta.default.clone()?;
        field_schemas.push(FieldSchema {
            name: meta.name.clone(),
            schema,
            default,
            doc: meta.doc.clone(),
            order: meta.order,
            aliases: meta.aliases.clone(),
            props: meta.props.clone(),
        });
    }

    Ok(AvroSchema::Record(RecordSchema {
        name: name.to_string(),
        namespace,
        fields: field_schemas,
        doc,
        aliases,
        props,
    }))
}
