// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// File round-trips through descriptors of every record kind.

#![allow(clippy::float_cmp)]
#![allow(clippy::missing_panics_doc)]

use std::collections::BTreeMap;
use tempfile::tempdir;
use wiretype::{ptypes, CompiledRecord, GenericRecord, Reflect, WireField};
use wiretype_io::{
    DefaultFileSource, FileSourceTarget, FileTableSourceTarget, IoConfig, IoError,
    ReadableSource, Result, Target, WriteMode,
};

#[derive(Debug, Default, Clone, PartialEq, Reflect)]
struct Reading {
    sensor: String,
    value: f64,
    tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, CompiledRecord)]
struct Event {
    id: i64,
    kind: String,
    payload: Option<Vec<i32>>,
}

fn readings() -> Vec<Reading> {
    (0..25)
        .map(|i| Reading {
            sensor: format!("s{}", i % 3),
            value: f64::from(i) / 4.0,
            tags: BTreeMap::from([("site".to_string(), format!("site-{i}"))]),
        })
        .collect()
}

#[test]
fn test_reflected_records_roundtrip() {
    let dir = tempdir().expect("tempdir");
    let config = IoConfig::default().block_records(4);
    let st = ptypes::reflects::<Reading>()
        .default_file_source(dir.path().join("readings.wtr"))
        .with_config(config);

    let values = readings();
    assert_eq!(st.write_values(&values).expect("write"), 25);

    let read = st.read().expect("open").collect::<Result<Vec<_>>>().expect("read");
    assert_eq!(read, values);
}

#[test]
fn test_compiled_records_roundtrip() {
    let dir = tempdir().expect("tempdir");
    let st = FileSourceTarget::new(dir.path().join("events.wtr"), ptypes::records::<Event>());
    let events = vec![
        Event {
            id: 1,
            kind: "open".into(),
            payload: None,
        },
        Event {
            id: 2,
            kind: "data".into(),
            payload: Some(vec![4, 5, 6]),
        },
    ];

    let mut writer = st.create_writer(&ptypes::records::<Event>()).expect("writer");
    writer.write_all(&events).expect("write");
    assert_eq!(writer.entry_count(), 2);
    writer.finish().expect("finish");

    let read = st.read().expect("open").collect::<Result<Vec<_>>>().expect("read");
    assert_eq!(read, events);
}

#[test]
fn test_generic_records_read_compiled_file() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("events.wtr");
    let event = Event {
        id: 9,
        kind: "close".into(),
        payload: Some(vec![1]),
    };
    FileSourceTarget::new(&path, ptypes::records::<Event>())
        .write_values([&event])
        .expect("write");

    let generic = FileSourceTarget::new(&path, ptypes::generics(Event::schema()));
    let records: Vec<GenericRecord> = generic
        .read()
        .expect("open")
        .collect::<Result<_>>()
        .expect("read");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get_as::<i64>("id").expect("id"), 9);
    assert_eq!(records[0].get_as::<String>("kind").expect("kind"), "close");
}

#[test]
fn test_table_roundtrip_through_pairs() {
    let dir = tempdir().expect("tempdir");
    let table = ptypes::table_of(&ptypes::strings(), &ptypes::reflects::<Reading>()).expect("table");
    let st = FileTableSourceTarget::new(dir.path().join("by_sensor.wtr"), table).expect("bind");
    assert!(st.table_type().is_table());

    let entries: Vec<(String, Reading)> = readings()
        .into_iter()
        .map(|r| (r.sensor.clone(), r))
        .collect();
    st.write_values(&entries).expect("write");

    let read = st.read().expect("open").collect::<Result<Vec<_>>>().expect("read");
    assert_eq!(read, entries);
}

#[test]
fn test_schema_mismatch_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("readings.wtr");
    FileSourceTarget::new(&path, ptypes::reflects::<Reading>())
        .write_values(&readings())
        .expect("write");

    let err = FileSourceTarget::new(&path, ptypes::records::<Event>())
        .read()
        .err()
        .expect("mismatch");
    assert!(matches!(err, IoError::SchemaMismatch { .. }));
}

#[test]
fn test_existing_target_fails_unless_overwrite() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("names.wtr");
    let st = ptypes::strings().default_file_source(&path);
    st.write_values(&["a".to_string()]).expect("first write");
    assert!(st.exists());

    let err = st.write_values(&["b".to_string()]).unwrap_err();
    assert!(matches!(err, IoError::TargetExists(_)));

    let st = st.with_config(IoConfig::default().write_mode(WriteMode::Overwrite));
    st.write_values(&["b".to_string()]).expect("overwrite");
    let read = st.read().expect("open").collect::<Result<Vec<_>>>().expect("read");
    assert_eq!(read, vec!["b".to_string()]);
}

#[test]
fn test_transferred_descriptor_reads_file() {
    let dir = tempdir().expect("tempdir");
    let ptype = ptypes::reflects::<Reading>();
    let path = dir.path().join("readings.wtr");
    ptype
        .default_file_source(&path)
        .write_values(&readings())
        .expect("write");

    let remote = ptype.transfer();
    assert!(!remote.schema_holder().is_materialized());
    let read = remote
        .default_file_source(&path)
        .read()
        .expect("open")
        .collect::<Result<Vec<_>>>()
        .expect("read");
    assert_eq!(read, readings());
}

#[test]
fn test_reflected_target_accepts_descriptor() {
    let st = ptypes::reflects::<Reading>().default_file_source("/unused/readings.wtr");
    assert!(st.accepts(&ptypes::reflects::<Reading>()));
    assert_eq!(st.to_string(), "/unused/readings.wtr");
    assert_eq!(
        <Reading as WireField>::field_schema().name(),
        Some("Reading")
    );
}
