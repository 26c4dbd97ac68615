// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error taxonomy for descriptors, schemas, codecs and copiers.
//!
//! Every variant describes a structural or configuration defect rather than a
//! transient condition, so nothing in this crate retries on error.

use thiserror::Error;

/// Errors raised by descriptor construction, schema handling and copying.
#[derive(Debug, Error)]
pub enum Error {
    /// A required piece of configuration is missing or inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Schema text could not be parsed into a valid schema.
    #[error("Schema parse error: {0}")]
    SchemaParse(String),

    /// A deep-copy strategy could not construct or populate a value.
    #[error("Copy error for {type_name}: {reason}")]
    Copy {
        type_name: String,
        reason: String,
    },

    /// A datum does not have the shape the schema or mapping expects.
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// Encoded bytes are truncated or malformed.
    #[error("Codec error: {0}")]
    Codec(String),
}

impl Error {
    pub(crate) fn copy(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Copy {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// Convenient alias for results carrying [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::copy("Point", "missing accessor for field 'z'");
        assert_eq!(
            err.to_string(),
            "Copy error for Point: missing accessor for field 'z'"
        );

        let err = Error::mismatch("int", "string");
        assert_eq!(err.to_string(), "Type mismatch: expected int, found string");
    }
}
