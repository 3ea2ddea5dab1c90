//! Tests for the record codec and its field program.

use std::sync::Arc;

use contrail::*;

#[derive(Debug, Clone, PartialEq)]
struct Foo {
    x: i32,
    y: i32,
}

fn foo_codec() -> Codec<Foo> {
    record::<Foo>("Foo")
        .with_namespace("p")
        .field(Field::new("x", |foo: &Foo| foo.x, int()))
        .field(Field::new("y", |foo: &Foo| foo.y, int()).with_default(0))
        .build(|(((), x), y)| Foo { x, y })
}

fn record_value(schema: RecordSchema, fields: Vec<AvroValue>) -> AvroValue {
    AvroValue::Record(RecordValue::new(Arc::new(schema), fields))
}

// ============================================================================
// Schema Assembly
// ============================================================================

#[test]
fn test_schema_shape() {
    let schema = foo_codec().schema().unwrap().clone();
    let AvroSchema::Record(record_schema) = schema else {
        panic!("expected record schema");
    };
    assert_eq!(record_schema.fullname(), "p.Foo");
    assert_eq!(record_schema.fields.len(), 2);
    assert_eq!(record_schema.fields[0].name, "x");
    assert_eq!(record_schema.fields[0].default, None);
    assert_eq!(record_schema.fields[1].name, "y");
    assert_eq!(record_schema.fields[1].default, Some(AvroValue::Int(0)));
}

#[test]
fn test_schema_metadata_rendering() {
    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        key: String,
    }

    let codec = record::<Entry>("Entry")
        .with_namespace("store")
        .with_doc("A single entry.")
        .with_aliases(["Item"])
        .with_prop("owner", "storage-team")
        .field(
            Field::new("key", |e: &Entry| e.key.clone(), string())
                .with_doc("Primary key.")
                .with_order(FieldOrder::Descending)
                .with_aliases(["id"])
                .with_prop("indexed", "true"),
        )
        .build(|((), key)| Entry { key });

    let json = codec.schema().unwrap().to_json();
    assert!(json.contains(r#""namespace":"store""#));
    assert!(json.contains(r#""doc":"A single entry.""#));
    assert!(json.contains(r#""aliases":["Item"]"#));
    assert!(json.contains(r#""owner":"storage-team""#));
    assert!(json.contains(r#""doc":"Primary key.""#));
    assert!(json.contains(r#""order":"descending""#));
    assert!(json.contains(r#""aliases":["id"]"#));
    assert!(json.contains(r#""indexed":"true""#));
}

#[test]
fn test_null_default_is_recorded_in_schema() {
    #[derive(Debug, Clone, PartialEq)]
    struct Sparse {
        hint: Option<i32>,
    }

    let codec = record::<Sparse>("Sparse")
        .field(Field::new("hint", |s: &Sparse| s.hint, option(int())).with_default(None))
        .build(|((), hint)| Sparse { hint });

    let AvroSchema::Record(record_schema) = codec.schema().unwrap().clone() else {
        panic!("expected record schema");
    };
    // A declared null default is present, distinct from no default.
    assert_eq!(record_schema.fields[0].default, Some(AvroValue::Null));
    assert!(codec.schema().unwrap().to_json().contains(r#""default":null"#));
}

#[test]
fn test_bad_field_name_fails_schema_assembly() {
    let codec = record::<Foo>("Foo")
        .field(Field::new("not a name", |foo: &Foo| foo.x, int()))
        .field(Field::new("y", |foo: &Foo| foo.y, int()))
        .build(|(((), x), y)| Foo { x, y });
    assert!(matches!(
        codec.schema().unwrap_err(),
        AvroError::InvalidSchema(_)
    ));
}

// ============================================================================
// Encoding
// ============================================================================

#[test]
fn test_encode_round_trip() {
    let codec = foo_codec();
    let foo = Foo { x: 7, y: -1 };
    let value = codec.to_avro(&foo).unwrap();
    assert_eq!(codec.from_avro(&value).unwrap(), foo);
}

#[test]
fn test_encode_places_values_by_schema_position() {
    // The supplied schema lists the fields in the opposite order; values
    // must land at the schema's positions.
    let reversed = RecordSchema {
        name: "Foo".to_string(),
        namespace: Some("p".to_string()),
        fields: vec![
            FieldSchema::new("y", AvroSchema::Int),
            FieldSchema::new("x", AvroSchema::Int),
        ],
        doc: None,
        aliases: vec![],
        props: vec![],
    };
    let schema = AvroSchema::Record(reversed);
    let encoded = foo_codec().encode(&Foo { x: 7, y: 9 }, &schema).unwrap();
    let AvroValue::Record(record) = encoded else {
        panic!("expected record value");
    };
    assert_eq!(record.fields, vec![AvroValue::Int(9), AvroValue::Int(7)]);
}

#[test]
fn test_encode_name_mismatch() {
    let other = AvroSchema::Record(
        RecordSchema::new("Bar", vec![FieldSchema::new("x", AvroSchema::Int)])
            .with_namespace("p"),
    );
    let err = foo_codec().encode(&Foo { x: 1, y: 2 }, &other).unwrap_err();
    assert_eq!(err, AvroError::encode_name_mismatch("p.Bar", "p.Foo"));
}

#[test]
fn test_encode_missing_field() {
    let narrower = AvroSchema::Record(
        RecordSchema::new("Foo", vec![FieldSchema::new("x", AvroSchema::Int)])
            .with_namespace("p"),
    );
    let err = foo_codec().encode(&Foo { x: 1, y: 2 }, &narrower).unwrap_err();
    assert_eq!(err, AvroError::encode_missing_record_field("y", "p.Foo"));
}

#[test]
fn test_encode_requires_record_schema() {
    let err = foo_codec().encode(&Foo { x: 1, y: 2 }, &AvroSchema::Int).unwrap_err();
    assert!(matches!(err, AvroError::UnexpectedSchemaType { .. }));
}

// ============================================================================
// Decoding
// ============================================================================

#[test]
fn test_decode_by_name_tolerates_reordered_fields() {
    let writer = RecordSchema {
        name: "Foo".to_string(),
        namespace: Some("p".to_string()),
        fields: vec![
            FieldSchema::new("y", AvroSchema::Int),
            FieldSchema::new("x", AvroSchema::Int),
        ],
        doc: None,
        aliases: vec![],
        props: vec![],
    };
    let value = record_value(writer, vec![AvroValue::Int(9), AvroValue::Int(7)]);
    let decoded = foo_codec().from_avro(&value).unwrap();
    assert_eq!(decoded, Foo { x: 7, y: 9 });
}

#[test]
fn test_decode_finds_field_under_alias() {
    let codec = record::<Foo>("Foo")
        .with_namespace("p")
        .field(Field::new("x", |foo: &Foo| foo.x, int()).with_aliases(["ex", "abscissa"]))
        .field(Field::new("y", |foo: &Foo| foo.y, int()).with_default(0))
        .build(|(((), x), y)| Foo { x, y });

    // The writer named the field by an alias of the program field.
    let writer = RecordSchema::new(
        "Foo",
        vec![
            FieldSchema::new("abscissa", AvroSchema::Int),
            FieldSchema::new("y", AvroSchema::Int),
        ],
    )
    .with_namespace("p");
    let value = record_value(writer, vec![AvroValue::Int(7), AvroValue::Int(9)]);
    assert_eq!(codec.from_avro(&value).unwrap(), Foo { x: 7, y: 9 });
}

#[test]
fn test_decode_prefers_name_over_alias() {
    let codec = record::<Foo>("Foo")
        .with_namespace("p")
        .field(Field::new("x", |foo: &Foo| foo.x, int()).with_aliases(["y"]))
        .field(Field::new("y", |foo: &Foo| foo.y, int()).with_default(0))
        .build(|(((), x), y)| Foo { x, y });

    // Both the name and the alias are present; the exact name wins.
    let writer = RecordSchema::new(
        "Foo",
        vec![
            FieldSchema::new("x", AvroSchema::Int),
            FieldSchema::new("y", AvroSchema::Int),
        ],
    )
    .with_namespace("p");
    let value = record_value(writer, vec![AvroValue::Int(1), AvroValue::Int(2)]);
    assert_eq!(codec.from_avro(&value).unwrap(), Foo { x: 1, y: 2 });
}

#[test]
fn test_decode_missing_field_uses_default() {
    let writer =
        RecordSchema::new("Foo", vec![FieldSchema::new("x", AvroSchema::Int)]).with_namespace("p");
    let value = record_value(writer, vec![AvroValue::Int(7)]);
    let decoded = foo_codec().from_avro(&value).unwrap();
    assert_eq!(decoded, Foo { x: 7, y: 0 });
}

#[test]
fn test_decode_missing_field_without_default_fails() {
    let writer =
        RecordSchema::new("Foo", vec![FieldSchema::new("y", AvroSchema::Int)]).with_namespace("p");
    let value = record_value(writer, vec![AvroValue::Int(1)]);
    let err = foo_codec().from_avro(&value).unwrap_err();
    assert_eq!(err, AvroError::decode_missing_record_field("x", "p.Foo"));
}

#[test]
fn test_decode_unexpected_record_name() {
    let writer =
        RecordSchema::new("Bar", vec![FieldSchema::new("x", AvroSchema::Int)]).with_namespace("p");
    let value = record_value(writer, vec![AvroValue::Int(1)]);
    let err = foo_codec().from_avro(&value).unwrap_err();
    assert_eq!(err, AvroError::decode_unexpected_record_name("p.Bar", "p.Foo"));
}

#[test]
fn test_decode_requires_record_value() {
    let err = foo_codec().from_avro(&AvroValue::Int(3)).unwrap_err();
    assert_eq!(err, AvroError::decode_unexpected_type("p.Foo", "int", "record"));
}

#[test]
fn test_present_null_does_not_trigger_default() {
    #[derive(Debug, Clone, PartialEq)]
    struct Sparse {
        hint: Option<i32>,
    }

    let codec = record::<Sparse>("Sparse")
        .field(Field::new("hint", |s: &Sparse| s.hint, option(int())).with_default(Some(5)))
        .build(|((), hint)| Sparse { hint });

    // Writer wrote an explicit null; the program default must not apply.
    let writer = RecordSchema::new(
        "Sparse",
        vec![FieldSchema::new(
            "hint",
            AvroSchema::Union(vec![AvroSchema::Null, AvroSchema::Int]),
        )],
    );
    let value = record_value(writer.clone(), vec![AvroValue::Null]);
    assert_eq!(codec.from_avro(&value).unwrap(), Sparse { hint: None });

    // Writer omitted the field entirely; the program default applies.
    let empty_writer = RecordSchema::new("Sparse", vec![]);
    let value = record_value(empty_writer, vec![]);
    assert_eq!(codec.from_avro(&value).unwrap(), Sparse { hint: Some(5) });
}

// ============================================================================
// Nesting
// ============================================================================

#[test]
fn test_nested_record_round_trip() {
    #[derive(Debug, Clone, PartialEq)]
    struct Inner {
        value: i64,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Outer {
        label: String,
        inner: Inner,
    }

    let inner_codec = record::<Inner>("Inner")
        .with_namespace("nested")
        .field(Field::new("value", |i: &Inner| i.value, long()))
        .build(|((), value)| Inner { value });

    let codec = record::<Outer>("Outer")
        .with_namespace("nested")
        .field(Field::new("label", |o: &Outer| o.label.clone(), string()))
        .field(Field::new("inner", |o: &Outer| o.inner.clone(), inner_codec))
        .build(|(((), label), inner)| Outer { label, inner });

    let outer = Outer {
        label: "wrapped".to_string(),
        inner: Inner { value: 99 },
    };
    let value = codec.to_avro(&outer).unwrap();
    assert_eq!(codec.from_avro(&value).unwrap(), outer);
}
