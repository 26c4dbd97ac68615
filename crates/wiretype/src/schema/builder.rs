// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for record schemas.

use super::{Field, Schema};

/// Builder for record [`Schema`] values.
#[derive(Debug)]
pub struct RecordSchemaBuilder {
    name: String,
    fields: Vec<Field>,
}

impl RecordSchemaBuilder {
    /// Create a new builder for a record.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field.
    pub fn field(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.fields.push(Field::new(name, schema));
        self
    }

    /// Add a field that may hold null.
    pub fn optional_field(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.fields.push(Field::new(name, Schema::nullable(schema)));
        self
    }

    /// Add an array field.
    pub fn array_field(mut self, name: impl Into<String>, items: Schema) -> Self {
        self.fields.push(Field::new(name, Schema::array(items)));
        self
    }

    /// Add a map field.
    pub fn map_field(mut self, name: impl Into<String>, values: Schema) -> Self {
        self.fields.push(Field::new(name, Schema::map(values)));
        self
    }

    /// Add a nested record field.
    pub fn nested_field(self, name: impl Into<String>, nested: &Schema) -> Self {
        self.field(name, nested.clone())
    }

    /// Document the most recently added field.
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        if let Some(last) = self.fields.last_mut() {
            last.doc = Some(doc.into());
        }
        self
    }

    /// Build the record schema.
    pub fn build(self) -> Schema {
        Schema::record(self.name, self.fields)
    }
}
