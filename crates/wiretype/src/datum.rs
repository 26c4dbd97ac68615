// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Structural wire values.

use crate::generic::GenericRecord;
use std::collections::BTreeMap;

/// A wire value that can hold any schema-described shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    Null,
    Boolean(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Bytes(Vec<u8>),
    String(String),
    Array(Vec<Datum>),
    Map(BTreeMap<String, Datum>),
    Record(GenericRecord),
    /// Enum symbol.
    Enum(String),
}

impl Datum {
    /// Short human-readable kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Int(_) => "int",
            Self::Long(_) => "long",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::Bytes(_) => "bytes",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
            Self::Record(_) => "record",
            Self::Enum(_) => "enum",
        }
    }

    /// Check if null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as i32.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as i64.
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Self::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as f64.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as array.
    pub fn as_array(&self) -> Option<&[Datum]> {
        match self {
            Self::Array(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as record.
    pub fn as_record(&self) -> Option<&GenericRecord> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Take the record out of a record datum.
    pub fn into_record(self) -> Option<GenericRecord> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }
}

// Conversion traits
impl From<()> for Datum {
    fn from(_: ()) -> Self {
        Self::Null
    }
}

impl From<bool> for Datum {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i32> for Datum {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<i64> for Datum {
    fn from(v: i64) -> Self {
        Self::Long(v)
    }
}

impl From<f32> for Datum {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<f64> for Datum {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<String> for Datum {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Datum {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<GenericRecord> for Datum {
    fn from(v: GenericRecord) -> Self {
        Self::Record(v)
    }
}

impl<T: Into<Datum>> From<Option<T>> for Datum {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
