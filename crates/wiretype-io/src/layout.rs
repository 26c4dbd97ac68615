// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Entry layout of a descriptor: its value schema and the key/value schemas
//! its converter stores entries under.

use crate::error::{IoError, Result};
use crate::format::FileMetadata;
use std::sync::Arc;
use wiretype::{codec, PType, Schema};

#[derive(Debug, Clone)]
pub(crate) struct EntryLayout {
    pub(crate) schema: Arc<Schema>,
    pub(crate) key: Schema,
    pub(crate) value: Schema,
}

impl EntryLayout {
    pub(crate) fn of<T: 'static>(ptype: &PType<T>) -> Result<Self> {
        let schema = Arc::clone(ptype.schema()?);
        let (key, value) = ptype.converter().entry_schemas(&schema)?;
        Ok(Self { schema, key, value })
    }

    pub(crate) fn metadata<T: 'static>(&self, ptype: &PType<T>) -> FileMetadata {
        FileMetadata {
            type_name: ptype.type_class().name().to_string(),
            schema: self.schema.to_text(),
            key_schema: self.key.to_text(),
            value_schema: self.value.to_text(),
            table: ptype.is_table(),
            writer_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Fail unless the file's value schema is structurally this layout's.
    pub(crate) fn check(&self, metadata: &FileMetadata) -> Result<()> {
        let stored = Schema::parse(&metadata.schema)?;
        if stored != *self.schema {
            return Err(IoError::SchemaMismatch {
                expected: self.schema.to_text(),
                found: metadata.schema.clone(),
            });
        }
        Ok(())
    }

    pub(crate) fn encode_entry<T: 'static>(
        &self,
        ptype: &PType<T>,
        value: &T,
    ) -> Result<(Vec<u8>, Vec<u8>)> {
        let datum = ptype.encode(value)?;
        let (key, value) = ptype.converter().to_entry(datum)?;
        Ok((
            codec::encode(&key, &self.key)?,
            codec::encode(&value, &self.value)?,
        ))
    }

    pub(crate) fn decode_entry<T: 'static>(
        &self,
        ptype: &PType<T>,
        key: &[u8],
        value: &[u8],
    ) -> Result<T> {
        let key = codec::decode(key, &self.key)?;
        let value = codec::decode(value, &self.value)?;
        let datum = ptype.converter().from_entry(key, value, &self.schema)?;
        Ok(ptype.decode(datum)?)
    }
}
