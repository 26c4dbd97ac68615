// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Generic records: schema-only values with no compiled type.

use crate::datum::Datum;
use crate::error::{Error, Result};
use crate::record::WireField;
use crate::schema::Schema;
use std::sync::Arc;

/// Record whose layout is known only through its schema.
///
/// Fields are stored positionally in schema order and looked up by name at
/// runtime. This is the dynamic representation: descriptors over
/// `GenericRecord` classify as [`Representation::Dynamic`] unless a
/// sub-descriptor is compiled.
///
/// [`Representation::Dynamic`]: crate::Representation::Dynamic
#[derive(Debug, Clone)]
pub struct GenericRecord {
    schema: Arc<Schema>,
    values: Vec<Datum>,
}

impl GenericRecord {
    /// Create a record with every field set to its schema default.
    ///
    /// A non-record schema yields a record with no fields.
    pub fn new(schema: Arc<Schema>) -> Self {
        let values = schema
            .fields()
            .map(|fields| fields.iter().map(|f| f.schema.default_datum()).collect())
            .unwrap_or_default();
        Self { schema, values }
    }

    /// Create from positional values, validated against the schema.
    pub fn from_values(schema: Arc<Schema>, values: Vec<Datum>) -> Result<Self> {
        let fields = schema
            .fields()
            .ok_or_else(|| Error::mismatch("record schema", schema.kind()))?;
        if fields.len() != values.len() {
            return Err(Error::mismatch(
                format!("{} fields", fields.len()),
                format!("{} values", values.len()),
            ));
        }
        for (field, value) in fields.iter().zip(&values) {
            if !field.schema.accepts(value) {
                return Err(Error::mismatch(
                    format!("{} for field '{}'", field.schema.kind(), field.name),
                    value.kind(),
                ));
            }
        }
        Ok(Self { schema, values })
    }

    /// Assemble without validation; callers guarantee the shape.
    pub(crate) fn from_parts(schema: Arc<Schema>, values: Vec<Datum>) -> Self {
        Self { schema, values }
    }

    /// Get the schema.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Get the record name.
    pub fn name(&self) -> &str {
        self.schema.name().unwrap_or_default()
    }

    /// Positional values in schema order.
    pub fn values(&self) -> &[Datum] {
        &self.values
    }

    /// Into positional values.
    pub fn into_values(self) -> Vec<Datum> {
        self.values
    }

    /// Get a field value by name.
    pub fn get(&self, name: &str) -> Option<&Datum> {
        let index = self.schema.field_index(name)?;
        self.values.get(index)
    }

    /// Get a field value by position.
    pub fn get_at(&self, index: usize) -> Option<&Datum> {
        self.values.get(index)
    }

    /// Get mutable field by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Datum> {
        let index = self.schema.field_index(name)?;
        self.values.get_mut(index)
    }

    /// Get a field converted to a Rust type.
    pub fn get_as<T: WireField>(&self, name: &str) -> Result<T> {
        let value = self
            .get(name)
            .ok_or_else(|| Error::mismatch(format!("field '{}'", name), "no such field"))?;
        T::from_field(value.clone())
    }

    /// Set a field value by name; the value must match the field schema.
    pub fn put(&mut self, name: &str, value: impl Into<Datum>) -> Result<()> {
        let index = self
            .schema
            .field_index(name)
            .ok_or_else(|| Error::mismatch(format!("field '{}'", name), "no such field"))?;
        let value = value.into();
        let field_schema = &self.schema.fields().unwrap_or_default()[index].schema;
        if !field_schema.accepts(&value) {
            return Err(Error::mismatch(
                format!("{} for field '{}'", field_schema.kind(), name),
                value.kind(),
            ));
        }
        self.values[index] = value;
        Ok(())
    }

    /// Iterate over `(name, value)` pairs in schema order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Datum)> {
        self.schema
            .fields()
            .unwrap_or_default()
            .iter()
            .map(|f| f.name.as_str())
            .zip(self.values.iter())
    }
}

impl PartialEq for GenericRecord {
    fn eq(&self, other: &Self) -> bool {
        self.schema.name() == other.schema.name() && self.values == other.values
    }
}
