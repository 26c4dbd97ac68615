// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Record schemas and their canonical text form.
//!
//! A [`Schema`] describes the shape of a wire value. Its canonical text form
//! is compact JSON, which is what travels with a descriptor; the parsed object
//! graph never does.
//!
//! ```rust
//! use wiretype::schema::{RecordSchemaBuilder, Schema};
//!
//! let schema = RecordSchemaBuilder::new("SensorReading")
//!     .field("sensor_id", Schema::Int)
//!     .field("temperature", Schema::Double)
//!     .optional_field("location", Schema::String)
//!     .build();
//!
//! let text = schema.to_text();
//! assert_eq!(Schema::parse(&text).unwrap(), schema);
//! ```

mod builder;
mod holder;

pub use builder::RecordSchemaBuilder;
pub use holder::SchemaHolder;

use crate::datum::Datum;
use crate::error::{Error, Result};
use crate::generic::GenericRecord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Schema of a wire value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Schema {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    String,
    /// Variable-length sequence of one element schema.
    Array { items: Box<Schema> },
    /// String-keyed map of one value schema.
    Map { values: Box<Schema> },
    /// Named record with ordered fields.
    Record { name: String, fields: Vec<Field> },
    /// Named enumeration of symbols.
    Enum { name: String, symbols: Vec<String> },
    /// Value matching exactly one of the branches.
    Union { branches: Vec<Schema> },
}

/// Record field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    /// Field name.
    pub name: String,
    /// Field schema.
    #[serde(rename = "type")]
    pub schema: Schema,
    /// Optional documentation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
            doc: None,
        }
    }

    /// Attach documentation.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

impl Schema {
    /// Parse canonical (or hand-written) schema text.
    pub fn parse(text: &str) -> Result<Self> {
        let schema: Schema =
            serde_json::from_str(text).map_err(|e| Error::SchemaParse(e.to_string()))?;
        schema.validate()?;
        Ok(schema)
    }

    /// Canonical text form.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Array of `items`.
    pub fn array(items: Schema) -> Self {
        Self::Array {
            items: Box::new(items),
        }
    }

    /// Map of `values`.
    pub fn map(values: Schema) -> Self {
        Self::Map {
            values: Box::new(values),
        }
    }

    /// Union of null and `schema`.
    pub fn nullable(schema: Schema) -> Self {
        Self::Union {
            branches: vec![Schema::Null, schema],
        }
    }

    /// Record from a name and fields.
    pub fn record(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self::Record {
            name: name.into(),
            fields,
        }
    }

    /// Check structural rules the JSON grammar cannot express.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Array { items } => items.validate(),
            Self::Map { values } => values.validate(),
            Self::Record { name, fields } => {
                if name.is_empty() {
                    return Err(Error::SchemaParse("record name is empty".into()));
                }
                let mut seen = HashSet::new();
                for field in fields {
                    if field.name.is_empty() {
                        return Err(Error::SchemaParse(format!(
                            "record {} has a field with an empty name",
                            name
                        )));
                    }
                    if !seen.insert(field.name.as_str()) {
                        return Err(Error::SchemaParse(format!(
                            "record {} declares field '{}' twice",
                            name, field.name
                        )));
                    }
                    field.schema.validate()?;
                }
                Ok(())
            }
            Self::Enum { name, symbols } => {
                if name.is_empty() {
                    return Err(Error::SchemaParse("enum name is empty".into()));
                }
                if symbols.is_empty() {
                    return Err(Error::SchemaParse(format!("enum {} has no symbols", name)));
                }
                let mut seen = HashSet::new();
                for symbol in symbols {
                    if !seen.insert(symbol.as_str()) {
                        return Err(Error::SchemaParse(format!(
                            "enum {} declares symbol '{}' twice",
                            name, symbol
                        )));
                    }
                }
                Ok(())
            }
            Self::Union { branches } => {
                if branches.is_empty() {
                    return Err(Error::SchemaParse("union has no branches".into()));
                }
                for branch in branches {
                    if matches!(branch, Self::Union { .. }) {
                        return Err(Error::SchemaParse("union directly contains a union".into()));
                    }
                    branch.validate()?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Name of a record or enum schema.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Record { name, .. } | Self::Enum { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Check if this schema is a leaf value (no nested structure).
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Self::Null
                | Self::Boolean
                | Self::Int
                | Self::Long
                | Self::Float
                | Self::Double
                | Self::Bytes
                | Self::String
        )
    }

    /// Get fields if this is a record.
    pub fn fields(&self) -> Option<&[Field]> {
        match self {
            Self::Record { fields, .. } => Some(fields),
            _ => None,
        }
    }

    /// Get field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields()?.iter().find(|f| f.name == name)
    }

    /// Get field index by name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields()?.iter().position(|f| f.name == name)
    }

    /// Short human-readable kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Bytes => "bytes",
            Self::String => "string",
            Self::Array { .. } => "array",
            Self::Map { .. } => "map",
            Self::Record { .. } => "record",
            Self::Enum { .. } => "enum",
            Self::Union { .. } => "union",
        }
    }

    /// Check whether `datum` has the shape this schema describes.
    pub fn accepts(&self, datum: &Datum) -> bool {
        match (self, datum) {
            (Self::Null, Datum::Null)
            | (Self::Boolean, Datum::Boolean(_))
            | (Self::Int, Datum::Int(_))
            | (Self::Long, Datum::Long(_))
            | (Self::Float, Datum::Float(_))
            | (Self::Double, Datum::Double(_))
            | (Self::Bytes, Datum::Bytes(_))
            | (Self::String, Datum::String(_)) => true,
            (Self::Array { items }, Datum::Array(values)) => {
                values.iter().all(|v| items.accepts(v))
            }
            (Self::Map { values }, Datum::Map(entries)) => {
                entries.values().all(|v| values.accepts(v))
            }
            (Self::Record { name, fields }, Datum::Record(record)) => {
                record.schema().name() == Some(name.as_str())
                    && record.values().len() == fields.len()
                    && fields
                        .iter()
                        .zip(record.values())
                        .all(|(f, v)| f.schema.accepts(v))
            }
            (Self::Enum { symbols, .. }, Datum::Enum(symbol)) => symbols.contains(symbol),
            (Self::Union { branches }, datum) => branches.iter().any(|b| b.accepts(datum)),
            _ => false,
        }
    }

    /// Index of the first union branch accepting `datum`.
    pub fn branch_for(&self, datum: &Datum) -> Option<usize> {
        match self {
            Self::Union { branches } => branches.iter().position(|b| b.accepts(datum)),
            _ => None,
        }
    }

    /// Default value for this schema.
    pub fn default_datum(&self) -> Datum {
        match self {
            Self::Null => Datum::Null,
            Self::Boolean => Datum::Boolean(false),
            Self::Int => Datum::Int(0),
            Self::Long => Datum::Long(0),
            Self::Float => Datum::Float(0.0),
            Self::Double => Datum::Double(0.0),
            Self::Bytes => Datum::Bytes(Vec::new()),
            Self::String => Datum::String(String::new()),
            Self::Array { .. } => Datum::Array(Vec::new()),
            Self::Map { .. } => Datum::Map(BTreeMap::new()),
            Self::Record { .. } => Datum::Record(GenericRecord::new(Arc::new(self.clone()))),
            Self::Enum { symbols, .. } => {
                Datum::Enum(symbols.first().cloned().unwrap_or_default())
            }
            Self::Union { branches } => branches
                .first()
                .map(Schema::default_datum)
                .unwrap_or(Datum::Null),
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}
