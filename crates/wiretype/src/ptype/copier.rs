// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Deep-copy strategies.
//!
//! A copy never shares mutable state with its source: every strategy goes
//! through freshly built datums or freshly decoded bytes.

use super::binding::{Binding, ReadFn, WriteFn};
use super::class::{Representation, TypeClass};
use crate::codec;
use crate::datum::Datum;
use crate::error::{Error, Result};
use crate::generic::GenericRecord;
use crate::record::{FieldAccessor, Reflect};
use crate::schema::Schema;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Produces a detached copy of a value.
pub trait DeepCopier<T>: Send + Sync {
    /// Strategy implemented by this copier.
    fn representation(&self) -> Representation;

    /// Copy `value`; the result shares no mutable state with it.
    fn deep_copy(&self, value: &T) -> Result<T>;
}

/// Copy through the binary codec: write, encode, decode, read.
pub struct CompiledCopier<T> {
    type_name: &'static str,
    schema: Arc<Schema>,
    read: ReadFn<T>,
    write: WriteFn<T>,
}

impl<T> CompiledCopier<T> {
    pub fn new(class: &TypeClass, schema: Arc<Schema>, read: ReadFn<T>, write: WriteFn<T>) -> Self {
        Self {
            type_name: class.name(),
            schema,
            read,
            write,
        }
    }
}

impl<T> DeepCopier<T> for CompiledCopier<T> {
    fn representation(&self) -> Representation {
        Representation::Compiled
    }

    fn deep_copy(&self, value: &T) -> Result<T> {
        let datum = (self.write)(value)?;
        let bytes = codec::encode(&datum, &self.schema)?;
        let decoded = codec::decode(&bytes, &self.schema)?;
        (self.read)(decoded).map_err(|e| Error::copy(self.type_name, e.to_string()))
    }
}

/// Structural copy of a [`GenericRecord`], guided by its schema.
pub struct DynamicCopier {
    schema: Arc<Schema>,
}

impl DynamicCopier {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self { schema }
    }

    fn copy_value(&self, value: &Datum, schema: &Schema) -> Result<Datum> {
        let copied = match (schema, value) {
            (Schema::Array { items }, Datum::Array(values)) => Datum::Array(
                values
                    .iter()
                    .map(|v| self.copy_value(v, items))
                    .collect::<Result<_>>()?,
            ),
            (Schema::Map { values }, Datum::Map(entries)) => Datum::Map(
                entries
                    .iter()
                    .map(|(k, v)| Ok((k.clone(), self.copy_value(v, values)?)))
                    .collect::<Result<BTreeMap<_, _>>>()?,
            ),
            (Schema::Record { .. }, Datum::Record(record)) => {
                Datum::Record(self.copy_record(record, Arc::clone(record.schema()))?)
            }
            (Schema::Union { .. }, value) => {
                let branch = schema
                    .branch_for(value)
                    .and_then(|i| match schema {
                        Schema::Union { branches } => branches.get(i),
                        _ => None,
                    })
                    .ok_or_else(|| self.shape_error(schema, value))?;
                self.copy_value(value, branch)?
            }
            (schema, value) if schema.accepts(value) => value.clone(),
            (schema, value) => return Err(self.shape_error(schema, value)),
        };
        Ok(copied)
    }

    fn copy_record(&self, record: &GenericRecord, schema: Arc<Schema>) -> Result<GenericRecord> {
        let fields = schema
            .fields()
            .ok_or_else(|| Error::copy(self.record_name(), "schema is not a record"))?;
        if record.values().len() != fields.len() {
            return Err(Error::copy(
                self.record_name(),
                format!(
                    "record {} has {} values for {} fields",
                    record.name(),
                    record.values().len(),
                    fields.len()
                ),
            ));
        }
        let values = fields
            .iter()
            .zip(record.values())
            .map(|(field, value)| self.copy_value(value, &field.schema))
            .collect::<Result<Vec<_>>>()?;
        Ok(GenericRecord::from_parts(schema, values))
    }

    fn record_name(&self) -> &str {
        self.schema.name().unwrap_or("GenericRecord")
    }

    fn shape_error(&self, schema: &Schema, value: &Datum) -> Error {
        Error::copy(
            self.record_name(),
            format!("expected {}, found {}", schema.kind(), value.kind()),
        )
    }
}

impl DeepCopier<GenericRecord> for DynamicCopier {
    fn representation(&self) -> Representation {
        Representation::Dynamic
    }

    fn deep_copy(&self, value: &GenericRecord) -> Result<GenericRecord> {
        if value.schema().name() != self.schema.name() {
            return Err(Error::copy(
                self.record_name(),
                format!("value is a {} record", value.name()),
            ));
        }
        self.copy_record(value, Arc::clone(&self.schema))
    }
}

/// Field-by-field copy of a reflected struct.
///
/// Schema fields are matched to accessors once, at construction; copying
/// starts from `T::default()` and moves every field through a fresh datum.
pub struct ReflectedCopier<T> {
    type_name: &'static str,
    plan: Vec<FieldAccessor<T>>,
}

impl<T: Reflect> ReflectedCopier<T> {
    pub fn new(class: &TypeClass, schema: &Schema) -> Result<Self> {
        let fields = schema
            .fields()
            .ok_or_else(|| Error::copy(class.name(), "schema is not a record"))?;
        let accessors = T::accessors();
        let mut plan = Vec::with_capacity(fields.len());
        for field in fields {
            let accessor = accessors
                .iter()
                .find(|a| a.name == field.name)
                .ok_or_else(|| {
                    Error::copy(
                        class.name(),
                        format!("no accessor for field '{}'", field.name),
                    )
                })?;
            plan.push(*accessor);
        }
        Ok(Self {
            type_name: class.name(),
            plan,
        })
    }
}

impl<T: Reflect> DeepCopier<T> for ReflectedCopier<T> {
    fn representation(&self) -> Representation {
        Representation::Reflected
    }

    fn deep_copy(&self, value: &T) -> Result<T> {
        let mut copy = T::default();
        for accessor in &self.plan {
            (accessor.set)(&mut copy, (accessor.get)(value)).map_err(|e| {
                Error::copy(
                    self.type_name,
                    format!("field '{}': {}", accessor.name, e),
                )
            })?;
        }
        Ok(copy)
    }
}

/// Selects the copy strategy for a representation.
pub struct DeepCopierFactory;

impl DeepCopierFactory {
    /// Build the copier for `representation` from the capabilities in
    /// `binding`; a missing capability is a copy error.
    pub fn create<T: 'static>(
        representation: Representation,
        class: &TypeClass,
        schema: Arc<Schema>,
        binding: &Binding<T>,
    ) -> Result<Box<dyn DeepCopier<T>>> {
        let copier: Box<dyn DeepCopier<T>> = match representation {
            Representation::Compiled => match (&binding.read, &binding.write) {
                (Some(read), Some(write)) => Box::new(CompiledCopier::new(
                    class,
                    schema,
                    Arc::clone(read),
                    Arc::clone(write),
                )),
                _ => {
                    return Err(Error::copy(
                        class.name(),
                        "no wire reader and writer for a compiled copy",
                    ))
                }
            },
            Representation::Dynamic => match binding.dynamic {
                Some(factory) => factory(schema),
                None => {
                    return Err(Error::copy(
                        class.name(),
                        "type does not support dynamic copies",
                    ))
                }
            },
            Representation::Reflected => match binding.reflected {
                Some(factory) => factory(class, schema)?,
                None => {
                    return Err(Error::copy(
                        class.name(),
                        "type does not support reflected copies",
                    ))
                }
            },
        };
        log::debug!("[copier] created {} copier for {}", representation, class);
        Ok(copier)
    }
}
