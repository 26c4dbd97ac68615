// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema ownership with lazy rehydration.
//!
//! The holder keeps the canonical text as its only real state. The parsed
//! schema is a derived cache: it is filled on first use and is never carried
//! across a transfer, so a holder received from another process parses its
//! text again the first time it is asked.
//!
//! The cache cell is a lock-free `OnceBox`. Two threads racing on the first
//! access may both parse; one result is kept and the other is dropped. The
//! parse is a pure function of the immutable text, so both are equal.

use super::Schema;
use crate::error::{Error, Result};
use once_cell::race::OnceBox;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// Owner of a schema's canonical text and its lazily parsed form.
pub struct SchemaHolder {
    text: Arc<str>,
    parsed: OnceBox<Arc<Schema>>,
}

impl SchemaHolder {
    /// Hold an already parsed schema; the cache starts populated.
    pub fn new(schema: Schema) -> Self {
        let text: Arc<str> = Arc::from(schema.to_text());
        let parsed = OnceBox::new();
        let _ = parsed.set(Box::new(Arc::new(schema)));
        Self { text, parsed }
    }

    /// Hold schema text without parsing it.
    ///
    /// Blank text is rejected immediately rather than on first use.
    pub fn from_text(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(Error::InvalidConfiguration(
                "schema text must not be empty".into(),
            ));
        }
        Ok(Self {
            text: Arc::from(text),
            parsed: OnceBox::new(),
        })
    }

    /// Canonical schema text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Check whether the parsed schema is currently cached.
    pub fn is_materialized(&self) -> bool {
        self.parsed.get().is_some()
    }

    /// Parsed schema, parsing the text on first use.
    pub fn get(&self) -> Result<&Arc<Schema>> {
        self.parsed.get_or_try_init(|| {
            let schema = Schema::parse(&self.text)?;
            log::debug!(
                "[schema] materialized {} from {} bytes of text",
                schema.name().unwrap_or(schema.kind()),
                self.text.len()
            );
            Ok(Box::new(Arc::new(schema)))
        })
    }
}

/// Clones carry the text only, exactly as a transfer would.
impl Clone for SchemaHolder {
    fn clone(&self) -> Self {
        Self {
            text: Arc::clone(&self.text),
            parsed: OnceBox::new(),
        }
    }
}

impl fmt::Debug for SchemaHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaHolder")
            .field("text", &self.text)
            .field("materialized", &self.is_materialized())
            .finish()
    }
}

impl Serialize for SchemaHolder {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for SchemaHolder {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_text(text).map_err(serde::de::Error::custom)
    }
}
