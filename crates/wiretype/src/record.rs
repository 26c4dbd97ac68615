// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Record traits implemented by application types.
//!
//! - [`CompiledRecord`]: a generated type with a fixed, schema-matching layout.
//!   Usually obtained with `#[derive(CompiledRecord)]`.
//! - [`Reflect`]: a plain struct exposed field by field through a table of
//!   [`FieldAccessor`]s. Usually obtained with `#[derive(Reflect)]`.
//! - [`WireField`]: any value that can sit inside a record field.

use crate::datum::Datum;
use crate::error::{Error, Result};
use crate::generic::GenericRecord;
use crate::schema::{Field, Schema};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Record type generated ahead of time from its schema.
pub trait CompiledRecord: Sized + Send + Sync + 'static {
    /// Schema the layout was generated from.
    fn schema() -> Schema;

    /// Write this value as a record datum.
    fn to_datum(&self) -> Datum;

    /// Read a value back from a record datum.
    fn from_datum(datum: Datum) -> Result<Self>;
}

/// Accessor for one field of a reflected record.
///
/// Every entry is made of plain fn pointers, so a table is `Send + Sync` and
/// cheap to copy.
pub struct FieldAccessor<T> {
    /// Field name as it appears in the schema.
    pub name: &'static str,
    /// Schema of the field.
    pub schema: fn() -> Schema,
    /// Read the field out as a fresh datum.
    pub get: fn(&T) -> Datum,
    /// Overwrite the field from a datum.
    pub set: fn(&mut T, Datum) -> Result<()>,
}

impl<T> Clone for FieldAccessor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for FieldAccessor<T> {}

impl<T> std::fmt::Debug for FieldAccessor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldAccessor")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Plain struct mapped to a record through an accessor table.
///
/// The `Default` bound is the no-argument constructor reflected copies start
/// from.
pub trait Reflect: Default + Send + Sync + 'static {
    /// Accessors in declaration order.
    fn accessors() -> Vec<FieldAccessor<Self>>;

    /// Record name used by [`Reflect::schema`].
    fn record_name() -> &'static str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }

    /// Record schema derived from the accessor table.
    fn schema() -> Schema {
        let fields = Self::accessors()
            .iter()
            .map(|a| Field::new(a.name, (a.schema)()))
            .collect();
        Schema::record(Self::record_name(), fields)
    }
}

/// Value that can be stored in a record field.
pub trait WireField: Sized {
    /// Schema of this field type.
    fn field_schema() -> Schema;

    /// Convert to a datum.
    fn to_field(&self) -> Datum;

    /// Convert from a datum.
    fn from_field(datum: Datum) -> Result<Self>;
}

macro_rules! impl_wire_field {
    ($ty:ty, $schema:ident, $variant:ident) => {
        impl WireField for $ty {
            fn field_schema() -> Schema {
                Schema::$schema
            }

            fn to_field(&self) -> Datum {
                Datum::$variant(self.clone())
            }

            fn from_field(datum: Datum) -> Result<Self> {
                match datum {
                    Datum::$variant(v) => Ok(v),
                    other => Err(Error::mismatch(Schema::$schema.kind(), other.kind())),
                }
            }
        }
    };
}

impl WireField for () {
    fn field_schema() -> Schema {
        Schema::Null
    }

    fn to_field(&self) -> Datum {
        Datum::Null
    }

    fn from_field(datum: Datum) -> Result<Self> {
        match datum {
            Datum::Null => Ok(()),
            other => Err(Error::mismatch("null", other.kind())),
        }
    }
}

impl_wire_field!(bool, Boolean, Boolean);
impl_wire_field!(i32, Int, Int);
impl_wire_field!(i64, Long, Long);
impl_wire_field!(f32, Float, Float);
impl_wire_field!(f64, Double, Double);
impl_wire_field!(String, String, String);

impl<T: WireField> WireField for Vec<T> {
    fn field_schema() -> Schema {
        Schema::array(T::field_schema())
    }

    fn to_field(&self) -> Datum {
        Datum::Array(self.iter().map(WireField::to_field).collect())
    }

    fn from_field(datum: Datum) -> Result<Self> {
        match datum {
            Datum::Array(items) => items.into_iter().map(T::from_field).collect(),
            other => Err(Error::mismatch("array", other.kind())),
        }
    }
}

impl<T: WireField> WireField for Option<T> {
    fn field_schema() -> Schema {
        Schema::nullable(T::field_schema())
    }

    fn to_field(&self) -> Datum {
        self.as_ref().map_or(Datum::Null, WireField::to_field)
    }

    fn from_field(datum: Datum) -> Result<Self> {
        match datum {
            Datum::Null => Ok(None),
            other => T::from_field(other).map(Some),
        }
    }
}

impl<T: WireField> WireField for BTreeMap<String, T> {
    fn field_schema() -> Schema {
        Schema::map(T::field_schema())
    }

    fn to_field(&self) -> Datum {
        Datum::Map(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_field()))
                .collect(),
        )
    }

    fn from_field(datum: Datum) -> Result<Self> {
        match datum {
            Datum::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| Ok((k, T::from_field(v)?)))
                .collect(),
            other => Err(Error::mismatch("map", other.kind())),
        }
    }
}

impl<T: WireField> WireField for HashMap<String, T> {
    fn field_schema() -> Schema {
        Schema::map(T::field_schema())
    }

    fn to_field(&self) -> Datum {
        Datum::Map(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_field()))
                .collect(),
        )
    }

    fn from_field(datum: Datum) -> Result<Self> {
        match datum {
            Datum::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| Ok((k, T::from_field(v)?)))
                .collect(),
            other => Err(Error::mismatch("map", other.kind())),
        }
    }
}

// Support functions for generated code.

/// Wrap positional values generated from `schema` into a record datum.
#[doc(hidden)]
pub fn record_datum(schema: &Arc<Schema>, values: Vec<Datum>) -> Datum {
    Datum::Record(GenericRecord::from_parts(Arc::clone(schema), values))
}

/// Unwrap a record datum named `name` with `arity` fields.
#[doc(hidden)]
pub fn record_values(datum: Datum, name: &str, arity: usize) -> Result<std::vec::IntoIter<Datum>> {
    let record = match datum {
        Datum::Record(record) => record,
        other => return Err(Error::mismatch(format!("record {}", name), other.kind())),
    };
    if record.name() != name {
        return Err(Error::mismatch(
            format!("record {}", name),
            format!("record {}", record.name()),
        ));
    }
    if record.values().len() != arity {
        return Err(Error::mismatch(
            format!("{} fields for record {}", arity, name),
            format!("{} values", record.values().len()),
        ));
    }
    Ok(record.into_values().into_iter())
}

/// Convert the next positional value into a field.
#[doc(hidden)]
pub fn next_field<T: WireField>(values: &mut std::vec::IntoIter<Datum>, field: &str) -> Result<T> {
    let datum = values
        .next()
        .ok_or_else(|| Error::mismatch(format!("field '{}'", field), "end of record"))?;
    T::from_field(datum)
}

/// Write a reflected value as a record datum with `schema`.
#[doc(hidden)]
pub fn reflect_to_datum<T: Reflect>(value: &T, schema: &Arc<Schema>) -> Datum {
    let values = T::accessors().iter().map(|a| (a.get)(value)).collect();
    record_datum(schema, values)
}

/// Read a reflected value from a record datum by field name.
#[doc(hidden)]
pub fn reflect_from_datum<T: Reflect>(datum: Datum) -> Result<T> {
    let record = match datum {
        Datum::Record(record) => record,
        other => {
            return Err(Error::mismatch(
                format!("record {}", T::record_name()),
                other.kind(),
            ))
        }
    };
    let mut value = T::default();
    for accessor in T::accessors() {
        let field = record.get(accessor.name).ok_or_else(|| {
            Error::mismatch(format!("field '{}'", accessor.name), "no such field")
        })?;
        (accessor.set)(&mut value, field.clone())?;
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Sample {
        name: String,
        count: i32,
    }

    impl Reflect for Sample {
        fn accessors() -> Vec<FieldAccessor<Self>> {
            vec![
                FieldAccessor {
                    name: "name",
                    schema: String::field_schema,
                    get: |v: &Sample| v.name.to_field(),
                    set: |v: &mut Sample, d: Datum| {
                        v.name = String::from_field(d)?;
                        Ok(())
                    },
                },
                FieldAccessor {
                    name: "count",
                    schema: i32::field_schema,
                    get: |v: &Sample| v.count.to_field(),
                    set: |v: &mut Sample, d: Datum| {
                        v.count = i32::from_field(d)?;
                        Ok(())
                    },
                },
            ]
        }
    }

    #[test]
    fn test_reflect_schema_from_accessors() {
        let schema = Sample::schema();
        assert_eq!(schema.name(), Some("Sample"));
        assert_eq!(schema.field("count").map(|f| &f.schema), Some(&Schema::Int));
    }

    #[test]
    fn test_reflect_datum_roundtrip() {
        let schema = Arc::new(Sample::schema());
        let value = Sample {
            name: "a".into(),
            count: 3,
        };
        let datum = reflect_to_datum(&value, &schema);
        assert!(schema.accepts(&datum));
        assert_eq!(reflect_from_datum::<Sample>(datum).expect("read"), value);
    }

    #[test]
    fn test_nested_field_types() {
        let value: Vec<Option<i64>> = vec![Some(1), None];
        let datum = value.to_field();
        assert!(<Vec<Option<i64>>>::field_schema().accepts(&datum));
        assert_eq!(<Vec<Option<i64>>>::from_field(datum).expect("read"), value);

        let mut map = HashMap::new();
        map.insert("k".to_string(), 1.5_f64);
        let back = HashMap::<String, f64>::from_field(map.to_field()).expect("read");
        assert_eq!(back, map);
    }

    #[test]
    fn test_field_mismatch() {
        let err = i32::from_field(Datum::Long(1)).unwrap_err();
        assert_eq!(err.to_string(), "Type mismatch: expected int, found long");
    }

    #[test]
    fn test_record_values_checks_name() {
        let schema = Arc::new(Sample::schema());
        let datum = record_datum(&schema, vec![Datum::from("x"), Datum::Int(1)]);
        assert!(record_values(datum.clone(), "Other", 2).is_err());
        let mut values = record_values(datum, "Sample", 2).expect("values");
        assert_eq!(next_field::<String>(&mut values, "name").expect("name"), "x");
        assert_eq!(next_field::<i32>(&mut values, "count").expect("count"), 1);
        assert!(next_field::<i32>(&mut values, "extra").is_err());
    }
}
