// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Descriptor constructors.
//!
//! Leaf descriptors (`strings`, `longs`, ...) use identity mappings over
//! primitive classes. Record descriptors pick their representation from the
//! record kind. Composite descriptors (`pairs`, `collections`, ...) wrap
//! their components with custom decode/encode functions and list them as
//! ordered sub-descriptors.
//!
//! ```rust
//! use wiretype::{ptypes, Datum};
//!
//! let tags = ptypes::collections(&ptypes::strings()).unwrap();
//! let datum = tags.encode(&vec!["a".to_string(), "b".to_string()]).unwrap();
//! assert_eq!(tags.decode(datum).unwrap(), vec!["a", "b"]);
//! ```

use crate::datum::Datum;
use crate::error::{Error, Result};
use crate::generic::GenericRecord;
use crate::ptype::{Binding, InputFn, OutputFn, PType, TypeClass};
use crate::record::{record_datum, record_values, CompiledRecord, Reflect, WireField};
use crate::schema::{Field, Schema, SchemaHolder};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

fn leaf<T: WireField + 'static>() -> PType<T> {
    PType::from_parts(
        TypeClass::primitive::<T>(),
        SchemaHolder::new(T::field_schema()),
        InputFn::Identity,
        OutputFn::Identity,
        Vec::new(),
        Binding::field(),
        false,
    )
}

pub fn nulls() -> PType<()> {
    leaf()
}

pub fn booleans() -> PType<bool> {
    leaf()
}

pub fn ints() -> PType<i32> {
    leaf()
}

pub fn longs() -> PType<i64> {
    leaf()
}

pub fn floats() -> PType<f32> {
    leaf()
}

pub fn doubles() -> PType<f64> {
    leaf()
}

pub fn strings() -> PType<String> {
    leaf()
}

/// Raw byte buffers.
pub fn bytes() -> PType<Vec<u8>> {
    PType::from_parts(
        TypeClass::primitive::<Vec<u8>>(),
        SchemaHolder::new(Schema::Bytes),
        InputFn::Identity,
        OutputFn::Identity,
        Vec::new(),
        Binding::from_fns(read_bytes, write_bytes),
        false,
    )
}

fn read_bytes(datum: Datum) -> Result<Vec<u8>> {
    match datum {
        Datum::Bytes(bytes) => Ok(bytes),
        other => Err(Error::mismatch("bytes", other.kind())),
    }
}

#[allow(clippy::ptr_arg)]
fn write_bytes(bytes: &Vec<u8>) -> Result<Datum> {
    Ok(Datum::Bytes(bytes.clone()))
}

/// Generated record type; classified compiled.
pub fn records<T: CompiledRecord>() -> PType<T> {
    PType::from_parts(
        TypeClass::compiled::<T>(),
        SchemaHolder::new(T::schema()),
        InputFn::Identity,
        OutputFn::Identity,
        Vec::new(),
        Binding::compiled(),
        false,
    )
}

/// Schema-only records; classified dynamic.
pub fn generics(schema: Schema) -> PType<GenericRecord> {
    PType::from_parts(
        TypeClass::of::<GenericRecord>(),
        SchemaHolder::new(schema),
        InputFn::Identity,
        OutputFn::Identity,
        Vec::new(),
        Binding::generic(),
        false,
    )
}

/// Reflected struct with the schema derived from its accessor table.
pub fn reflects<T: Reflect>() -> PType<T> {
    let schema = T::schema();
    PType::from_parts(
        TypeClass::of::<T>(),
        SchemaHolder::new(schema.clone()),
        InputFn::Identity,
        OutputFn::Identity,
        Vec::new(),
        Binding::reflected(Arc::new(schema)),
        false,
    )
}

/// Reflected struct read and written against an explicit schema.
///
/// The schema must declare exactly the struct's fields, in any order, each
/// with the accessor's schema.
pub fn reflects_with_schema<T: Reflect>(schema: Schema) -> Result<PType<T>> {
    schema.validate()?;
    let fields = schema.fields().ok_or_else(|| {
        Error::InvalidConfiguration(format!(
            "{} needs a record schema, got {}",
            std::any::type_name::<T>(),
            schema.kind()
        ))
    })?;
    let accessors = T::accessors();
    for field in fields {
        let accessor = accessors
            .iter()
            .find(|a| a.name == field.name)
            .ok_or_else(|| {
                Error::InvalidConfiguration(format!(
                    "{} has no field '{}'",
                    std::any::type_name::<T>(),
                    field.name
                ))
            })?;
        if (accessor.schema)() != field.schema {
            return Err(Error::InvalidConfiguration(format!(
                "field '{}' of {} is {}, schema declares {}",
                field.name,
                std::any::type_name::<T>(),
                (accessor.schema)().kind(),
                field.schema.kind()
            )));
        }
    }
    if let Some(missing) = accessors.iter().find(|a| schema.field(a.name).is_none()) {
        return Err(Error::InvalidConfiguration(format!(
            "schema {} does not declare field '{}' of {}",
            schema.name().unwrap_or_default(),
            missing.name,
            std::any::type_name::<T>()
        )));
    }
    PType::builder(TypeClass::of::<T>(), Binding::reflected(Arc::new(schema.clone())))
        .schema(schema)
        .build()
}

fn record_schema(name: &str, fields: Vec<(&str, &Arc<Schema>)>) -> Arc<Schema> {
    let fields = fields
        .into_iter()
        .map(|(field, schema)| Field::new(field, schema.as_ref().clone()))
        .collect();
    Arc::new(Schema::record(name, fields))
}

fn next_datum(values: &mut std::vec::IntoIter<Datum>) -> Result<Datum> {
    values
        .next()
        .ok_or_else(|| Error::mismatch("record field", "end of record"))
}

/// Two-element tuples, as record `Tuple2 { field0, field1 }`.
pub fn pairs<A: 'static, B: 'static>(a: &PType<A>, b: &PType<B>) -> Result<PType<(A, B)>> {
    let schema = record_schema("Tuple2", vec![("field0", a.schema()?), ("field1", b.schema()?)]);
    tuple2(a, b, schema, false)
}

/// Key/value table entries, as record `Pair { key, value }`.
pub fn table_of<K: 'static, V: 'static>(key: &PType<K>, value: &PType<V>) -> Result<PType<(K, V)>> {
    let schema = record_schema("Pair", vec![("key", key.schema()?), ("value", value.schema()?)]);
    tuple2(key, value, schema, true)
}

fn tuple2<A: 'static, B: 'static>(
    a: &PType<A>,
    b: &PType<B>,
    schema: Arc<Schema>,
    table: bool,
) -> Result<PType<(A, B)>> {
    let name = schema.name().unwrap_or_default().to_string();
    let (da, db) = (a.clone(), b.clone());
    let decode = move |datum: Datum| -> Result<(A, B)> {
        let mut values = record_values(datum, &name, 2)?;
        Ok((da.decode(next_datum(&mut values)?)?, db.decode(next_datum(&mut values)?)?))
    };
    let (ea, eb, record) = (a.clone(), b.clone(), Arc::clone(&schema));
    let encode = move |value: &(A, B)| -> Result<Datum> {
        Ok(record_datum(&record, vec![ea.encode(&value.0)?, eb.encode(&value.1)?]))
    };
    PType::builder(TypeClass::of::<(A, B)>(), Binding::none())
        .schema(schema.as_ref().clone())
        .input_fn(InputFn::decode_with(decode))
        .output_fn(OutputFn::encode_with(encode))
        .sub_type(a)
        .sub_type(b)
        .table(table)
        .build()
}

/// Three-element tuples, as record `Tuple3 { field0, field1, field2 }`.
pub fn triples<A: 'static, B: 'static, C: 'static>(
    a: &PType<A>,
    b: &PType<B>,
    c: &PType<C>,
) -> Result<PType<(A, B, C)>> {
    let schema = record_schema(
        "Tuple3",
        vec![
            ("field0", a.schema()?),
            ("field1", b.schema()?),
            ("field2", c.schema()?),
        ],
    );
    let (da, db, dc) = (a.clone(), b.clone(), c.clone());
    let decode = move |datum: Datum| -> Result<(A, B, C)> {
        let mut values = record_values(datum, "Tuple3", 3)?;
        Ok((
            da.decode(next_datum(&mut values)?)?,
            db.decode(next_datum(&mut values)?)?,
            dc.decode(next_datum(&mut values)?)?,
        ))
    };
    let (ea, eb, ec, record) = (a.clone(), b.clone(), c.clone(), Arc::clone(&schema));
    let encode = move |value: &(A, B, C)| -> Result<Datum> {
        Ok(record_datum(
            &record,
            vec![
                ea.encode(&value.0)?,
                eb.encode(&value.1)?,
                ec.encode(&value.2)?,
            ],
        ))
    };
    PType::builder(TypeClass::of::<(A, B, C)>(), Binding::none())
        .schema(schema.as_ref().clone())
        .input_fn(InputFn::decode_with(decode))
        .output_fn(OutputFn::encode_with(encode))
        .sub_type(a)
        .sub_type(b)
        .sub_type(c)
        .build()
}

/// Variable-length sequences of `elem`.
pub fn collections<T: 'static>(elem: &PType<T>) -> Result<PType<Vec<T>>> {
    let schema = Schema::array(elem.schema()?.as_ref().clone());
    let decoder = elem.clone();
    let decode = move |datum: Datum| -> Result<Vec<T>> {
        match datum {
            Datum::Array(items) => items.into_iter().map(|d| decoder.decode(d)).collect(),
            other => Err(Error::mismatch("array", other.kind())),
        }
    };
    let encoder = elem.clone();
    let encode = move |values: &Vec<T>| -> Result<Datum> {
        values
            .iter()
            .map(|v| encoder.encode(v))
            .collect::<Result<Vec<_>>>()
            .map(Datum::Array)
    };
    PType::builder(TypeClass::of::<Vec<T>>(), Binding::none())
        .schema(schema)
        .input_fn(InputFn::decode_with(decode))
        .output_fn(OutputFn::encode_with(encode))
        .sub_type(elem)
        .build()
}

/// String-keyed maps of `value`.
pub fn maps<V: 'static>(value: &PType<V>) -> Result<PType<HashMap<String, V>>> {
    let schema = Schema::map(value.schema()?.as_ref().clone());
    let decoder = value.clone();
    let decode = move |datum: Datum| -> Result<HashMap<String, V>> {
        match datum {
            Datum::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| Ok((k, decoder.decode(v)?)))
                .collect(),
            other => Err(Error::mismatch("map", other.kind())),
        }
    };
    let encoder = value.clone();
    let encode = move |entries: &HashMap<String, V>| -> Result<Datum> {
        entries
            .iter()
            .map(|(k, v)| Ok((k.clone(), encoder.encode(v)?)))
            .collect::<Result<BTreeMap<_, _>>>()
            .map(Datum::Map)
    };
    PType::builder(TypeClass::of::<HashMap<String, V>>(), Binding::none())
        .schema(schema)
        .input_fn(InputFn::decode_with(decode))
        .output_fn(OutputFn::encode_with(encode))
        .sub_type(value)
        .build()
}

/// Descriptor of `T` stored in the wire form of `base`.
///
/// The result uses the base schema and inherits the base's nested
/// descriptors.
pub fn derived<S: 'static, T: 'static>(
    base: &PType<S>,
    decode: impl Fn(S) -> Result<T> + Send + Sync + 'static,
    encode: impl Fn(&T) -> Result<S> + Send + Sync + 'static,
) -> Result<PType<T>> {
    let decoder = base.clone();
    let input = move |datum: Datum| -> Result<T> { decode(decoder.decode(datum)?) };
    let encoder = base.clone();
    let output = move |value: &T| -> Result<Datum> { encoder.encode(&encode(value)?) };
    PType::builder(TypeClass::of::<T>(), Binding::none())
        .schema_text(base.schema_text())
        .input_fn(InputFn::decode_with(input))
        .output_fn(OutputFn::encode_with(output))
        .sub_types(base.sub_types().iter().cloned())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Representation;

    #[test]
    fn test_leaves_are_primitive() {
        assert!(strings().is_primitive());
        assert!(bytes().is_primitive());
        assert_eq!(longs().schema().expect("schema").as_ref(), &Schema::Long);
        assert!(nulls().decode(Datum::Null).is_ok());
    }

    #[test]
    fn test_pairs_roundtrip() {
        let pair = pairs(&strings(), &ints()).expect("pairs");
        let datum = pair.encode(&("a".to_string(), 1)).expect("encode");
        assert!(pair.schema().expect("schema").accepts(&datum));
        assert_eq!(pair.decode(datum).expect("decode"), ("a".to_string(), 1));
        assert!(!pair.is_table());
    }

    #[test]
    fn test_table_of_uses_pair_record() {
        let table = table_of(&strings(), &doubles()).expect("table");
        assert!(table.is_table());
        assert_eq!(table.schema().expect("schema").name(), Some("Pair"));
        let datum = table.encode(&("k".to_string(), 2.5)).expect("encode");
        let (key, value) = table.converter().to_entry(datum).expect("split");
        assert_eq!(key, Datum::from("k"));
        assert_eq!(value, Datum::Double(2.5));
    }

    #[test]
    fn test_triples_and_maps() {
        let triple = triples(&ints(), &strings(), &booleans()).expect("triples");
        let value = (1, "x".to_string(), true);
        let back = triple
            .decode(triple.encode(&value).expect("encode"))
            .expect("decode");
        assert_eq!(back, value);

        let map = maps(&longs()).expect("maps");
        let mut value = HashMap::new();
        value.insert("a".to_string(), 3_i64);
        let back = map.decode(map.encode(&value).expect("encode")).expect("decode");
        assert_eq!(back, value);
    }

    #[test]
    fn test_derived_shares_base_wire_form() {
        let celsius = derived(
            &doubles(),
            |d: f64| Ok(d.round() as i64),
            |v: &i64| Ok(*v as f64),
        )
        .expect("derived");
        assert_eq!(celsius.schema_text(), doubles().schema_text());
        assert_eq!(celsius.decode(Datum::Double(20.6)).expect("decode"), 21);
        assert_eq!(celsius.representation(), Representation::Reflected);
    }

    #[test]
    fn test_collections_reject_wrong_shape() {
        let list = collections(&ints()).expect("collections");
        assert!(matches!(
            list.decode(Datum::Int(1)),
            Err(Error::TypeMismatch { .. })
        ));
    }
}
