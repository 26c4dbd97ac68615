// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Reflected records: derive output, descriptor construction, copy-on-read.

#![allow(clippy::float_cmp)]
#![allow(clippy::missing_panics_doc)]

use std::borrow::Cow;
use std::collections::BTreeMap;
use wiretype::schema::RecordSchemaBuilder;
use wiretype::{codec, ptypes, Datum, Error, Reflect, Representation, Schema, WireField};

#[derive(Debug, Default, Clone, PartialEq, Reflect)]
struct StringWrapper {
    value: String,
    count: i32,
}

#[derive(Debug, Default, Clone, PartialEq, Reflect)]
#[wire(name = "Station")]
struct WeatherStation {
    id: i64,
    label: Option<String>,
    readings: Vec<f64>,
    tags: BTreeMap<String, String>,
    primary: StringWrapper,
}

fn station() -> WeatherStation {
    let mut tags = BTreeMap::new();
    tags.insert("region".to_string(), "north".to_string());
    WeatherStation {
        id: 17,
        label: Some("ridge".into()),
        readings: vec![1.5, 2.25],
        tags,
        primary: StringWrapper {
            value: "sensor-a".into(),
            count: 4,
        },
    }
}

#[test]
fn test_derived_accessors_follow_declaration_order() {
    let names: Vec<_> = StringWrapper::accessors().iter().map(|a| a.name).collect();
    assert_eq!(names, vec!["value", "count"]);

    let schema = <StringWrapper as Reflect>::schema();
    assert_eq!(schema.name(), Some("StringWrapper"));
    assert_eq!(schema.field("value").map(|f| &f.schema), Some(&Schema::String));
    assert_eq!(schema.field("count").map(|f| &f.schema), Some(&Schema::Int));
}

#[test]
fn test_wire_name_attribute() {
    let schema = <WeatherStation as Reflect>::schema();
    assert_eq!(schema.name(), Some("Station"));
    assert_eq!(
        schema.field("label").map(|f| &f.schema),
        Some(&Schema::nullable(Schema::String))
    );
    assert_eq!(
        schema.field("primary").and_then(|f| f.schema.name()),
        Some("StringWrapper")
    );
}

#[test]
fn test_string_wrapper_end_to_end() {
    let ptype = ptypes::reflects::<StringWrapper>();
    assert_eq!(ptype.representation(), Representation::Reflected);
    assert!(!ptype.is_primitive());

    let schema = ptype.schema().expect("schema");
    let written = StringWrapper {
        value: "a".into(),
        count: 1,
    };
    let bytes = codec::encode(&ptype.encode(&written).expect("encode"), schema).expect("bytes");
    let mut value = ptype
        .decode(codec::decode(&bytes, schema).expect("datum"))
        .expect("decode");
    assert_eq!(value, written);

    let detached = ptype.detached_value(&value).expect("detach");
    let Cow::Owned(copy) = detached else {
        panic!("reflected values must be copied");
    };
    value.value.push_str("-changed");
    value.count += 1;
    assert_eq!(copy, written);
    assert_eq!(value.value, "a-changed");
}

#[test]
fn test_nested_reflected_copy() {
    let ptype = ptypes::reflects::<WeatherStation>();
    let original = station();
    let copy = ptype.detached_value(&original).expect("detach").into_owned();
    assert_eq!(copy, original);
    assert_ne!(copy.readings.as_ptr(), original.readings.as_ptr());
    assert_ne!(copy.primary.value.as_ptr(), original.primary.value.as_ptr());
}

#[test]
fn test_reflected_wire_roundtrip() {
    let ptype = ptypes::reflects::<WeatherStation>();
    let schema = ptype.schema().expect("schema");
    let datum = ptype.encode(&station()).expect("encode");
    assert!(schema.accepts(&datum));

    let bytes = codec::encode(&datum, schema).expect("bytes");
    let decoded = codec::decode(&bytes, schema).expect("datum");
    assert_eq!(ptype.decode(decoded).expect("decode"), station());
}

#[test]
fn test_reflects_with_reordered_schema() {
    let schema = RecordSchemaBuilder::new("Wrapped")
        .field("count", Schema::Int)
        .field("value", Schema::String)
        .build();
    let ptype = ptypes::reflects_with_schema::<StringWrapper>(schema).expect("descriptor");

    let value = StringWrapper {
        value: "x".into(),
        count: 9,
    };
    let datum = ptype.encode(&value).expect("encode");
    let record = datum.as_record().expect("record");
    assert_eq!(record.get_at(0), Some(&Datum::Int(9)));
    assert_eq!(ptype.decode(datum).expect("decode"), value);
    assert_eq!(
        ptype.detached_value(&value).expect("detach").into_owned(),
        value
    );
}

#[test]
fn test_reflects_with_schema_rejects_unknown_field() {
    let schema = RecordSchemaBuilder::new("Wrapped")
        .field("value", Schema::String)
        .field("missing", Schema::Long)
        .build();
    let err = ptypes::reflects_with_schema::<StringWrapper>(schema).unwrap_err();
    assert!(matches!(err, Error::InvalidConfiguration(_)));

    let schema = RecordSchemaBuilder::new("Wrapped")
        .field("count", Schema::Long)
        .build();
    let err = ptypes::reflects_with_schema::<StringWrapper>(schema).unwrap_err();
    assert!(matches!(err, Error::InvalidConfiguration(_)));
}

#[test]
fn test_reflects_with_schema_rejects_partial_schema() {
    let schema = RecordSchemaBuilder::new("Wrapped")
        .field("value", Schema::String)
        .build();
    let err = ptypes::reflects_with_schema::<StringWrapper>(schema).unwrap_err();
    assert!(matches!(err, Error::InvalidConfiguration(_)));
}

#[test]
fn test_reflects_with_schema_rejects_duplicate_field() {
    let schema = RecordSchemaBuilder::new("Wrapped")
        .field("value", Schema::String)
        .field("count", Schema::Int)
        .field("count", Schema::Int)
        .build();
    let err = ptypes::reflects_with_schema::<StringWrapper>(schema).unwrap_err();
    assert!(matches!(err, Error::SchemaParse(_)));
}

#[test]
fn test_reflected_field_type_mismatch() {
    let mut record = match StringWrapper::default().to_field() {
        Datum::Record(record) => record,
        other => panic!("expected record, got {other:?}"),
    };
    *record.get_mut("count").expect("count") = Datum::from("not a number");
    let err = StringWrapper::from_field(Datum::Record(record)).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));
}
