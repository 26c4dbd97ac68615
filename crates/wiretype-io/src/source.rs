// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Readable record sources.

use crate::config::IoConfig;
use crate::error::Result;
use crate::format::{EntryIterator, RecordReader};
use crate::layout::EntryLayout;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use wiretype::PType;

/// Input bound to a descriptor.
pub trait Source<T> {
    /// Descriptor records are decoded with.
    fn ptype(&self) -> &PType<T>;

    /// Size of the input in bytes.
    fn size(&self) -> Result<u64>;
}

/// A source whose records can be read in-process.
pub trait ReadableSource<T>: Source<T> {
    fn read(&self) -> Result<RecordIter<T>>;
}

/// Record container file read through a descriptor.
pub struct FileSource<T> {
    path: Arc<Path>,
    ptype: PType<T>,
    config: IoConfig,
}

impl<T: 'static> FileSource<T> {
    pub fn new(path: impl AsRef<Path>, ptype: PType<T>) -> Self {
        Self::from_shared(Arc::from(path.as_ref()), ptype, IoConfig::default())
    }

    pub(crate) fn from_shared(path: Arc<Path>, ptype: PType<T>, config: IoConfig) -> Self {
        Self {
            path,
            ptype,
            config,
        }
    }

    pub fn with_config(mut self, config: IoConfig) -> Self {
        self.config = config;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &IoConfig {
        &self.config
    }
}

impl<T: 'static> Source<T> for FileSource<T> {
    fn ptype(&self) -> &PType<T> {
        &self.ptype
    }

    fn size(&self) -> Result<u64> {
        Ok(std::fs::metadata(&self.path)?.len())
    }
}

impl<T: 'static> ReadableSource<T> for FileSource<T> {
    fn read(&self) -> Result<RecordIter<T>> {
        let layout = EntryLayout::of(&self.ptype)?;
        let reader = RecordReader::open(&self.path, &self.config)?;
        layout.check(reader.metadata())?;

        tracing::debug!(
            "Reading {} as {}",
            self.path.display(),
            self.ptype.type_class()
        );

        Ok(RecordIter {
            entries: reader.entries(),
            ptype: self.ptype.clone(),
            layout,
            failed: false,
        })
    }
}

impl<T> fmt::Display for FileSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Decoded records of a source, in file order. Stops after the first error.
pub struct RecordIter<T> {
    entries: EntryIterator,
    ptype: PType<T>,
    layout: EntryLayout,
    failed: bool,
}

impl<T: 'static> Iterator for RecordIter<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let record = match self.entries.next()? {
            Ok((key, value)) => self.layout.decode_entry(&self.ptype, &key, &value),
            Err(e) => Err(e),
        };
        self.failed = record.is_err();
        Some(record)
    }
}
