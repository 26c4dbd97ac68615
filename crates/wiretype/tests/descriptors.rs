// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Descriptor identity, classification and transfer across compiled, dynamic
// and reflected record kinds.

#![allow(clippy::float_cmp)]
#![allow(clippy::missing_panics_doc)]

use std::borrow::Cow;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use wiretype::schema::RecordSchemaBuilder;
use wiretype::{
    ptypes, AnyPType, Binding, CompiledRecord, Datum, GenericRecord, InputFn, OutputFn, PType,
    Reflect, Representation, Schema, TypeClass,
};

#[derive(Debug, Clone, PartialEq, CompiledRecord)]
struct Employee {
    name: String,
    salary: i32,
    department: String,
}

#[derive(Debug, Default, Clone, PartialEq, Reflect)]
struct Badge {
    code: String,
    level: i32,
}

fn employee() -> Employee {
    Employee {
        name: "Ada".into(),
        salary: 90,
        department: "engines".into(),
    }
}

fn hash_of<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn test_compiled_record_roundtrip() {
    let ptype = ptypes::records::<Employee>();
    assert_eq!(ptype.representation(), Representation::Compiled);
    assert_eq!(ptype.schema().expect("schema").name(), Some("Employee"));

    let datum = ptype.encode(&employee()).expect("encode");
    assert_eq!(ptype.decode(datum).expect("decode"), employee());

    let original = employee();
    let copy = ptype.detached_value(&original).expect("detach");
    assert!(matches!(copy, Cow::Owned(ref e) if *e == employee()));
}

#[test]
fn test_compiled_from_datum_checks_record_name() {
    let other = Arc::new(
        RecordSchemaBuilder::new("Contractor")
            .field("name", Schema::String)
            .field("salary", Schema::Int)
            .field("department", Schema::String)
            .build(),
    );
    let record = GenericRecord::new(other);
    assert!(Employee::from_datum(Datum::Record(record)).is_err());
}

#[test]
fn test_classification_table() {
    let generic = ptypes::generics(Employee::schema());
    assert_eq!(generic.representation(), Representation::Dynamic);
    assert_eq!(
        ptypes::reflects::<Badge>().representation(),
        Representation::Reflected
    );
    assert_eq!(ptypes::strings().representation(), Representation::Reflected);

    // Compiled wins over the dynamic marker when a direct sub-descriptor is compiled.
    let mixed = PType::builder(TypeClass::of::<GenericRecord>(), Binding::generic())
        .schema(Employee::schema())
        .sub_type(&ptypes::records::<Employee>())
        .build()
        .expect("descriptor");
    assert_eq!(mixed.representation(), Representation::Compiled);
}

#[test]
fn test_classification_looks_one_level_deep() {
    let inner = ptypes::collections(&ptypes::records::<Employee>()).expect("inner");
    assert_eq!(inner.representation(), Representation::Compiled);

    let outer = ptypes::collections(&inner).expect("outer");
    assert_eq!(outer.representation(), Representation::Reflected);
}

#[test]
fn test_pair_of_compiled_and_reflected() {
    let compiled = ptypes::records::<Employee>();
    let reflected = ptypes::reflects::<Badge>();
    let pair = ptypes::pairs(&compiled, &reflected).expect("pair");

    assert_eq!(pair.representation(), Representation::Compiled);
    assert_eq!(pair.sub_types().len(), 2);
    assert_eq!(pair.sub_types()[0].type_class(), compiled.type_class());
    assert_eq!(pair.sub_types()[1].type_class(), reflected.type_class());

    // Reordered components describe a different tuple type.
    let swapped = ptypes::pairs(&reflected, &compiled).expect("pair");
    assert!(!pair.same_as(&swapped));

    // Compiled composites copy through the codec with their own mappings.
    let value = (
        employee(),
        Badge {
            code: "b-1".into(),
            level: 2,
        },
    );
    let copy = pair.copier().expect("copier").deep_copy(&value).expect("copy");
    assert_eq!(copy, value);
}

#[test]
fn test_equality_and_hash_ignore_schema_and_functions() {
    let a = ptypes::pairs(&ptypes::strings(), &ptypes::longs()).expect("pair");
    let b = ptypes::pairs(&ptypes::strings(), &ptypes::longs()).expect("pair");
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));

    // Same class and sub-descriptors with a different schema and mapping.
    let c = PType::builder(TypeClass::of::<(String, i64)>(), Binding::none())
        .schema(Schema::Null)
        .input_fn(InputFn::decode_with(|_: Datum| Ok((String::new(), 0))))
        .output_fn(OutputFn::encode_with(|_: &(String, i64)| Ok(Datum::Null)))
        .sub_type(&ptypes::strings())
        .sub_type(&ptypes::longs())
        .build()
        .expect("descriptor");
    assert_eq!(a, c);
    assert_eq!(hash_of(&a), hash_of(&c));

    // Erased descriptors hash the same way as typed ones.
    let erased: Arc<dyn AnyPType> = Arc::new(a.clone());
    assert_eq!(hash_of(erased.as_ref()), hash_of(&a));

    let mut set: HashSet<Arc<dyn AnyPType>> = HashSet::new();
    set.insert(erased);
    set.insert(Arc::new(c));
    set.insert(Arc::new(ptypes::strings()));
    assert_eq!(set.len(), 2);
}

#[test]
fn test_sub_type_order_is_identity() {
    let ints = ptypes::ints();
    let a = PType::builder(TypeClass::of::<GenericRecord>(), Binding::generic())
        .schema(Employee::schema())
        .sub_type(&ptypes::strings())
        .sub_type(&ints)
        .build()
        .expect("descriptor");
    let b = PType::builder(TypeClass::of::<GenericRecord>(), Binding::generic())
        .schema(Employee::schema())
        .sub_type(&ints)
        .sub_type(&ptypes::strings())
        .build()
        .expect("descriptor");
    assert_ne!(a, b);
}

#[test]
fn test_transfer_rehydrates_schema_lazily() {
    let ptype = ptypes::pairs(&ptypes::records::<Employee>(), &ptypes::strings()).expect("pair");
    let original = Arc::clone(ptype.schema().expect("schema"));

    let received = ptype.transfer();
    assert!(!received.schema_holder().is_materialized());
    assert!(!received.sub_types()[0].schema_holder().is_materialized());
    assert_eq!(received, ptype);

    let value = (employee(), "note".to_string());
    let datum = received.encode(&value).expect("encode");
    assert_eq!(received.decode(datum).expect("decode"), value);

    assert_eq!(received.schema().expect("schema"), &original);
    assert!(received.schema_holder().is_materialized());
    assert_eq!(received.schema_text(), ptype.schema_text());
}

#[test]
fn test_descriptor_is_shared_across_threads() {
    let ptype = ptypes::reflects::<Badge>().transfer();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let ptype = ptype.clone();
            std::thread::spawn(move || {
                let badge = Badge {
                    code: format!("t{i}"),
                    level: i,
                };
                let copy = ptype.detached_value(&badge).expect("detach").into_owned();
                copy == badge
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().expect("join"));
    }
}

#[test]
fn test_custom_decode_returns_same_instance() {
    let ptype = PType::builder(TypeClass::of::<Badge>(), Binding::none())
        .schema(<Badge as Reflect>::schema())
        .input_fn(InputFn::decode_with(|_: Datum| Ok(Badge::default())))
        .output_fn(OutputFn::encode_with(|_: &Badge| Ok(Datum::Null)))
        .build()
        .expect("descriptor");
    let badge = Badge {
        code: "same".into(),
        level: 1,
    };
    let detached = ptype.detached_value(&badge).expect("detach");
    assert!(matches!(detached, Cow::Borrowed(b) if std::ptr::eq(b, &badge)));
}

#[test]
fn test_missing_copy_capability_surfaces_on_first_copy() {
    // Reflected classification, but the binding only knows how to read and write.
    let ptype = PType::builder(
        TypeClass::of::<Badge>(),
        Binding::from_fns(
            |d: Datum| <Badge as wiretype::WireField>::from_field(d),
            |b: &Badge| Ok(<Badge as wiretype::WireField>::to_field(b)),
        ),
    )
    .schema(<Badge as Reflect>::schema())
    .build()
    .expect("descriptor");
    assert_eq!(ptype.representation(), Representation::Reflected);

    let err = ptype.detached_value(&Badge::default()).unwrap_err();
    assert!(matches!(err, wiretype::Error::Copy { .. }));
}

#[test]
fn test_compiled_copy_survives_source_mutation() {
    let ptype = ptypes::records::<Employee>();
    let mut original = employee();
    let copy = ptype.detached_value(&original).expect("detach").into_owned();

    original.name.push_str(" Lovelace");
    original.salary += 10;
    original.department.clear();
    assert_eq!(copy, employee());
}

#[test]
fn test_dynamic_copy_survives_source_mutation() {
    let ptype = ptypes::generics(Employee::schema());
    let mut original = match employee().to_datum() {
        Datum::Record(record) => record,
        other => panic!("expected record, got {}", other.kind()),
    };
    let copy = ptype.detached_value(&original).expect("detach").into_owned();

    original.put("name", "Grace").expect("name");
    original.put("salary", 120_i32).expect("salary");
    assert_eq!(copy.get_as::<String>("name").expect("name"), "Ada");
    assert_eq!(copy.get_as::<i32>("salary").expect("salary"), 90);
    assert_eq!(original.get_as::<String>("name").expect("name"), "Grace");
}

#[test]
fn test_compiled_flag_comes_from_compiled_constructors() {
    assert!(TypeClass::compiled::<Employee>().is_compiled());
    assert!(!TypeClass::of::<Employee>().is_compiled());
    assert!(ptypes::records::<Employee>().type_class().is_compiled());
    assert!(!ptypes::reflects::<Badge>().type_class().is_compiled());
}
