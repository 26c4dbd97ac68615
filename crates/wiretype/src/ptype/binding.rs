// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-type wire capabilities.

use super::class::TypeClass;
use super::copier::{DeepCopier, DynamicCopier, ReflectedCopier};
use crate::datum::Datum;
use crate::error::{Error, Result};
use crate::generic::GenericRecord;
use crate::record::{CompiledRecord, Reflect, WireField};
use crate::schema::Schema;
use std::fmt;
use std::sync::Arc;

/// Reader from a datum to an application value.
pub type ReadFn<T> = Arc<dyn Fn(Datum) -> Result<T> + Send + Sync>;

/// Writer from an application value to a datum.
pub type WriteFn<T> = Arc<dyn Fn(&T) -> Result<Datum> + Send + Sync>;

/// Factory for a dynamic copier over `T`.
pub type DynamicFactory<T> = fn(Arc<Schema>) -> Box<dyn DeepCopier<T>>;

/// Factory for a reflected copier over `T`.
pub type ReflectedFactory<T> = fn(&TypeClass, Arc<Schema>) -> Result<Box<dyn DeepCopier<T>>>;

/// What a type can do on the wire.
///
/// `read`/`write` are used by identity mapping functions and by codec-level
/// copies. `dynamic`/`reflected` are the structural copy strategies the type
/// supports. Missing slots are reported when they are first needed.
pub struct Binding<T> {
    pub(crate) read: Option<ReadFn<T>>,
    pub(crate) write: Option<WriteFn<T>>,
    pub(crate) dynamic: Option<DynamicFactory<T>>,
    pub(crate) reflected: Option<ReflectedFactory<T>>,
}

impl<T> Binding<T> {
    /// Binding with no capabilities; descriptors using it need custom
    /// mapping functions in both directions.
    pub fn none() -> Self {
        Self {
            read: None,
            write: None,
            dynamic: None,
            reflected: None,
        }
    }

    /// Binding from an explicit reader and writer.
    pub fn from_fns(
        read: impl Fn(Datum) -> Result<T> + Send + Sync + 'static,
        write: impl Fn(&T) -> Result<Datum> + Send + Sync + 'static,
    ) -> Self {
        Self {
            read: Some(Arc::new(read)),
            write: Some(Arc::new(write)),
            ..Self::none()
        }
    }

    pub fn can_read(&self) -> bool {
        self.read.is_some()
    }

    pub fn can_write(&self) -> bool {
        self.write.is_some()
    }
}

impl<T: CompiledRecord> Binding<T> {
    /// Binding of a generated record type.
    pub fn compiled() -> Self {
        Self::from_fns(read_compiled::<T>, write_compiled::<T>)
    }
}

impl Binding<GenericRecord> {
    /// Binding of schema-only records.
    pub fn generic() -> Self {
        Self {
            dynamic: Some(dynamic_copier),
            ..Self::from_fns(read_generic, write_generic)
        }
    }
}

impl<T: Reflect> Binding<T> {
    /// Binding of a reflected struct written against `schema`.
    ///
    /// Values are written in the schema's field order, looked up by name.
    pub fn reflected(schema: Arc<Schema>) -> Self {
        Self {
            read: Some(Arc::new(read_reflected::<T>)),
            write: Some(Arc::new(move |value: &T| write_reflected(value, &schema))),
            dynamic: None,
            reflected: Some(reflected_copier::<T>),
        }
    }
}

impl<T: WireField + 'static> Binding<T> {
    /// Binding of a plain field type.
    pub fn field() -> Self {
        Self::from_fns(T::from_field, write_field::<T>)
    }
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            read: self.read.clone(),
            write: self.write.clone(),
            dynamic: self.dynamic,
            reflected: self.reflected,
        }
    }
}

impl<T> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("read", &self.read.is_some())
            .field("write", &self.write.is_some())
            .field("dynamic", &self.dynamic.is_some())
            .field("reflected", &self.reflected.is_some())
            .finish()
    }
}

fn read_compiled<T: CompiledRecord>(datum: Datum) -> Result<T> {
    T::from_datum(datum)
}

fn write_compiled<T: CompiledRecord>(value: &T) -> Result<Datum> {
    Ok(value.to_datum())
}

fn read_generic(datum: Datum) -> Result<GenericRecord> {
    match datum {
        Datum::Record(record) => Ok(record),
        other => Err(Error::mismatch("record", other.kind())),
    }
}

fn write_generic(record: &GenericRecord) -> Result<Datum> {
    Ok(Datum::Record(record.clone()))
}

fn write_field<T: WireField>(value: &T) -> Result<Datum> {
    Ok(value.to_field())
}

fn read_reflected<T: Reflect>(datum: Datum) -> Result<T> {
    crate::record::reflect_from_datum(datum)
}

fn write_reflected<T: Reflect>(value: &T, schema: &Arc<Schema>) -> Result<Datum> {
    let fields = schema
        .fields()
        .ok_or_else(|| Error::mismatch("record schema", schema.kind()))?;
    let accessors = T::accessors();
    let mut values = Vec::with_capacity(fields.len());
    for field in fields {
        let accessor = accessors
            .iter()
            .find(|a| a.name == field.name)
            .ok_or_else(|| Error::mismatch(format!("field '{}'", field.name), "no accessor"))?;
        values.push((accessor.get)(value));
    }
    Ok(crate::record::record_datum(schema, values))
}

fn dynamic_copier(schema: Arc<Schema>) -> Box<dyn DeepCopier<GenericRecord>> {
    Box::new(DynamicCopier::new(schema))
}

fn reflected_copier<T: Reflect>(
    class: &TypeClass,
    schema: Arc<Schema>,
) -> Result<Box<dyn DeepCopier<T>>> {
    Ok(Box::new(ReflectedCopier::<T>::new(class, &schema)?))
}
