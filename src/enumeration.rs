//! The enum codec.
//!
//! An enum codec maps a user type to and from a named Avro symbol set.
//! The user supplies the symbol list and a pair of functions between the
//! type and symbol strings; the supplied schema stays authoritative at
//! encode and decode time, so a symbol outside the schema's set is
//! rejected even if the codec itself declared it.

use tracing::trace;

use crate::codec::Codec;
use crate::error::AvroError;
use crate::schema::{validate_name, validate_namespace, AvroSchema, EnumSchema, SchemaKind};
use crate::value::{AvroValue, EnumValue};

type EncodeSymbolFn<A> = Box<dyn Fn(&A) -> String + Send + Sync>;
type DecodeSymbolFn<A> = Box<dyn Fn(&str) -> Result<A, AvroError> + Send + Sync>;

/// Builder for enum codecs.
///
/// Obtained from [`enumeration`].
pub struct EnumBuilder<A> {
    name: String,
    namespace: Option<String>,
    doc: Option<String>,
    aliases: Vec<String>,
    symbols: Vec<String>,
    default: Option<A>,
    encode_symbol: EncodeSymbolFn<A>,
    decode_symbol: DecodeSymbolFn<A>,
}

/// Start describing an enum codec for type `A`.
///
/// `encode` turns a value into its symbol; `decode` parses a symbol that
/// is known to be part of the schema's symbol set.
///
/// # Examples
///
/// ```
/// use contrail::{enumeration, AvroError};
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Suit {
///     Clubs,
///     Hearts,
/// }
///
/// let codec = enumeration::<Suit>(
///     "Suit",
///     ["clubs", "hearts"],
///     |suit| {
///         match suit {
///             Suit::Clubs => "clubs",
///             Suit::Hearts => "hearts",
///         }
///         .to_string()
///     },
///     |symbol| match symbol {
///         "clubs" => Ok(Suit::Clubs),
///         "hearts" => Ok(Suit::Hearts),
///         other => Err(AvroError::custom(format!("unknown suit {other}"))),
///     },
/// )
/// .build();
///
/// let value = codec.to_avro(&Suit::Hearts).unwrap();
/// assert_eq!(codec.from_avro(&value).unwrap(), Suit::Hearts);
/// ```
pub fn enumeration<A>(
    name: impl Into<String>,
    symbols: impl IntoIterator<Item = impl Into<String>>,
    encode: impl Fn(&A) -> String + Send + Sync + 'static,
    decode: impl Fn(&str) -> Result<A, AvroError> + Send + Sync + 'static,
) -> EnumBuilder<A> {
    EnumBuilder {
        name: name.into(),
        namespace: None,
        doc: None,
        aliases: Vec::new(),
        symbols: symbols.into_iter().map(Into::into).collect(),
        default: None,
        encode_symbol: Box::new(encode),
        decode_symbol: Box::new(decode),
    }
}

impl<A: 'static> EnumBuilder<A> {
    /// Set the enum namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Set the enum documentation.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Add aliases for the enum.
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Declare a default value; its symbol is recorded in the schema.
    pub fn with_default(mut self, default: A) -> Self {
        self.default = Some(default);
        self
    }

    /// Compile the description into a codec.
    pub fn build(self) -> Codec<A> {
        let EnumBuilder {
            name,
            namespace,
            doc,
            aliases,
            symbols,
            default,
            encode_symbol,
            decode_symbol,
        } = self;

        let type_name = match &namespace {
            Some(ns) => format!("{ns}.{name}"),
            None => name.clone(),
        };
        trace!(name = %type_name, symbols = symbols.len(), "building enum codec");

        let schema: Result<AvroSchema, AvroError> = (|| {
            validate_name(&name, "Enum")?;
            if let Some(ns) = &namespace {
                validate_namespace(ns)?;
            }
            for symbol in &symbols {
                validate_name(symbol, "Enum symbol")?;
            }
            let default_symbol = match &default {
                Some(value) => {
                    let symbol = encode_symbol(value);
                    if !symbols.contains(&symbol) {
                        return Err(AvroError::invalid_schema(format!(
                            "enum default symbol {symbol} is not one of the declared symbols"
                        )));
                    }
                    Some(symbol)
                }
                None => None,
            };
            Ok(AvroSchema::Enum(EnumSchema {
                name: name.clone(),
                namespace: namespace.clone(),
                symbols: symbols.clone(),
                doc,
                aliases,
                default: default_symbol,
            }))
        })();

        let encode_name = type_name.clone();
        let encode = move |value: &A, schema: &AvroSchema| {
            let enum_schema = match schema.as_enum() {
                Some(enum_schema) => enum_schema,
                None => {
                    return Err(AvroError::encode_unexpected_schema_type(
                        &encode_name,
                        schema.kind(),
                        &[SchemaKind::Enum],
                    ))
                }
            };
            if enum_schema.fullname() != encode_name {
                return Err(AvroError::encode_name_mismatch(
                    enum_schema.fullname(),
                    &encode_name,
                ));
            }
            let symbol = encode_symbol(value);
            if !enum_schema.symbols.contains(&symbol) {
                return Err(AvroError::encode_symbol_not_in_schema(
                    symbol,
                    &enum_schema.symbols,
                    &encode_name,
                ));
            }
            Ok(AvroValue::Enum(EnumValue::new(enum_schema.clone(), symbol)))
        };

        let decode_name = type_name;
        let decode = move |value: &AvroValue, schema: &AvroSchema| {
            let enum_schema = match schema.as_enum() {
                Some(enum_schema) => enum_schema,
                None => {
                    return Err(AvroError::decode_unexpected_schema_type(
                        &decode_name,
                        schema.kind(),
                        &[SchemaKind::Enum],
                    ))
                }
            };
            if enum_schema.fullname() != decode_name {
                return Err(AvroError::decode_name_mismatch(
                    enum_schema.fullname(),
                    &decode_name,
                ));
            }
            let symbol = match value {
                AvroValue::Enum(enum_value) => &enum_value.symbol,
                other => {
                    return Err(AvroError::decode_unexpected_type(
                        &decode_name,
                        other.tag(),
                        "enum",
                    ))
                }
            };
            if !enum_schema.symbols.contains(symbol) {
                return Err(AvroError::decode_symbol_not_in_schema(
                    symbol,
                    &enum_schema.symbols,
                    &decode_name,
                ));
            }
            decode_symbol(symbol)
        };

        Codec::new(schema, encode, decode)
    }
}
