// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Writable record targets.

use crate::config::IoConfig;
use crate::error::Result;
use crate::format::{FileSummary, RecordWriter};
use crate::layout::EntryLayout;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use wiretype::PType;

/// Output location for records.
pub trait Target: fmt::Display {
    fn path(&self) -> &Path;

    fn exists(&self) -> bool {
        self.path().exists()
    }

    /// Whether records of `ptype` can be stored here.
    fn accepts<T: 'static>(&self, ptype: &PType<T>) -> bool;

    /// Open a writer for records of `ptype`.
    fn create_writer<T: 'static>(&self, ptype: &PType<T>) -> Result<TargetWriter<T>>;
}

/// Record container file written through a descriptor.
#[derive(Debug, Clone)]
pub struct FileTarget {
    path: Arc<Path>,
    config: IoConfig,
}

impl FileTarget {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::from_shared(Arc::from(path.as_ref()), IoConfig::default())
    }

    pub(crate) fn from_shared(path: Arc<Path>, config: IoConfig) -> Self {
        Self { path, config }
    }

    pub fn with_config(mut self, config: IoConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &IoConfig {
        &self.config
    }
}

impl Target for FileTarget {
    fn path(&self) -> &Path {
        &self.path
    }

    fn accepts<T: 'static>(&self, ptype: &PType<T>) -> bool {
        EntryLayout::of(ptype).is_ok()
    }

    fn create_writer<T: 'static>(&self, ptype: &PType<T>) -> Result<TargetWriter<T>> {
        let layout = EntryLayout::of(ptype)?;
        let writer = RecordWriter::create(&self.path, &layout.metadata(ptype), &self.config)?;
        tracing::info!(
            "Writing {} records to {}",
            ptype.type_class(),
            self.path.display()
        );
        Ok(TargetWriter {
            ptype: ptype.clone(),
            layout,
            writer,
        })
    }
}

impl fmt::Display for FileTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Encodes values through a descriptor into a record file.
///
/// Dropping a writer without [`finish`](Self::finish) leaves a file that
/// readers reject.
pub struct TargetWriter<T> {
    ptype: PType<T>,
    layout: EntryLayout,
    writer: RecordWriter,
}

impl<T: 'static> TargetWriter<T> {
    pub fn write(&mut self, value: &T) -> Result<()> {
        let (key, value) = self.layout.encode_entry(&self.ptype, value)?;
        self.writer.write_entry(&key, &value)
    }

    pub fn write_all<'a, I>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        for value in values {
            self.write(value)?;
        }
        Ok(())
    }

    pub fn entry_count(&self) -> u64 {
        self.writer.entry_count()
    }

    pub fn finish(self) -> Result<FileSummary> {
        self.writer.finish()
    }
}
