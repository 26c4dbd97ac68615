// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! One path that is both readable and writable through the same descriptor.

use crate::config::IoConfig;
use crate::error::Result;
use crate::source::{FileSource, ReadableSource, RecordIter, Source};
use crate::target::{FileTarget, Target, TargetWriter};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use wiretype::PType;

/// A readable source that is also a target at the same location.
pub trait SourceTarget<T>: ReadableSource<T> + Target {}

/// Record file that is read and written with one descriptor.
///
/// Renders as the target path.
///
/// ```no_run
/// use wiretype::ptypes;
/// use wiretype_io::{FileSourceTarget, ReadableSource, Target};
///
/// let st = FileSourceTarget::new("/tmp/names.wtr", ptypes::strings());
/// let mut writer = st.create_writer(&ptypes::strings())?;
/// writer.write(&"ada".to_string())?;
/// writer.finish()?;
///
/// let names = st.read()?.collect::<Result<Vec<_>, _>>()?;
/// assert_eq!(names, vec!["ada".to_string()]);
/// # Ok::<(), wiretype_io::IoError>(())
/// ```
pub struct FileSourceTarget<T> {
    source: FileSource<T>,
    target: FileTarget,
}

impl<T: 'static> FileSourceTarget<T> {
    pub fn new(path: impl AsRef<Path>, ptype: PType<T>) -> Self {
        Self::with_parts(path, ptype, IoConfig::default())
    }

    fn with_parts(path: impl AsRef<Path>, ptype: PType<T>, config: IoConfig) -> Self {
        let path: Arc<Path> = Arc::from(path.as_ref());
        Self {
            source: FileSource::from_shared(Arc::clone(&path), ptype, config.clone()),
            target: FileTarget::from_shared(path, config),
        }
    }

    pub fn with_config(self, config: IoConfig) -> Self {
        Self {
            source: self.source.with_config(config.clone()),
            target: self.target.with_config(config),
        }
    }

    pub fn source(&self) -> &FileSource<T> {
        &self.source
    }

    pub fn target(&self) -> &FileTarget {
        &self.target
    }

    /// Write `values` with this binding's descriptor and finish the file.
    pub fn write_values<'a, I>(&self, values: I) -> Result<u64>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let mut writer = self.target.create_writer(self.source.ptype())?;
        writer.write_all(values)?;
        Ok(writer.finish()?.entries)
    }
}

impl<T: 'static> Source<T> for FileSourceTarget<T> {
    fn ptype(&self) -> &PType<T> {
        self.source.ptype()
    }

    fn size(&self) -> Result<u64> {
        self.source.size()
    }
}

impl<T: 'static> ReadableSource<T> for FileSourceTarget<T> {
    fn read(&self) -> Result<RecordIter<T>> {
        self.source.read()
    }
}

impl<T: 'static> Target for FileSourceTarget<T> {
    fn path(&self) -> &Path {
        self.target.path()
    }

    fn accepts<U: 'static>(&self, ptype: &PType<U>) -> bool {
        self.target.accepts(ptype)
    }

    fn create_writer<U: 'static>(&self, ptype: &PType<U>) -> Result<TargetWriter<U>> {
        self.target.create_writer(ptype)
    }
}

impl<T: 'static> SourceTarget<T> for FileSourceTarget<T> {}

impl<T> fmt::Display for FileSourceTarget<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.target, f)
    }
}

/// Key/value record file bound to a table descriptor.
pub struct FileTableSourceTarget<K, V> {
    inner: FileSourceTarget<(K, V)>,
}

impl<K: 'static, V: 'static> FileTableSourceTarget<K, V> {
    /// Bind `path` to a descriptor built by `ptypes::table_of`.
    pub fn new(path: impl AsRef<Path>, table_type: PType<(K, V)>) -> Result<Self> {
        if !table_type.is_table() {
            return Err(wiretype::Error::InvalidConfiguration(format!(
                "{} is not a table descriptor",
                table_type.type_class()
            ))
            .into());
        }
        Ok(Self {
            inner: FileSourceTarget::new(path, table_type),
        })
    }

    pub fn with_config(self, config: IoConfig) -> Self {
        Self {
            inner: self.inner.with_config(config),
        }
    }

    pub fn table_type(&self) -> &PType<(K, V)> {
        self.inner.ptype()
    }

    pub fn write_values<'a, I>(&self, entries: I) -> Result<u64>
    where
        I: IntoIterator<Item = &'a (K, V)>,
        K: 'a,
        V: 'a,
    {
        self.inner.write_values(entries)
    }
}

impl<K: 'static, V: 'static> Source<(K, V)> for FileTableSourceTarget<K, V> {
    fn ptype(&self) -> &PType<(K, V)> {
        self.inner.ptype()
    }

    fn size(&self) -> Result<u64> {
        self.inner.size()
    }
}

impl<K: 'static, V: 'static> ReadableSource<(K, V)> for FileTableSourceTarget<K, V> {
    fn read(&self) -> Result<RecordIter<(K, V)>> {
        self.inner.read()
    }
}

impl<K: 'static, V: 'static> Target for FileTableSourceTarget<K, V> {
    fn path(&self) -> &Path {
        self.inner.path()
    }

    fn accepts<U: 'static>(&self, ptype: &PType<U>) -> bool {
        self.inner.accepts(ptype)
    }

    fn create_writer<U: 'static>(&self, ptype: &PType<U>) -> Result<TargetWriter<U>> {
        self.inner.create_writer(ptype)
    }
}

impl<K: 'static, V: 'static> SourceTarget<(K, V)> for FileTableSourceTarget<K, V> {}

impl<K, V> fmt::Display for FileTableSourceTarget<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

/// Default file binding for a descriptor.
pub trait DefaultFileSource<T> {
    fn default_file_source(&self, path: impl AsRef<Path>) -> FileSourceTarget<T>;
}

impl<T: 'static> DefaultFileSource<T> for PType<T> {
    fn default_file_source(&self, path: impl AsRef<Path>) -> FileSourceTarget<T> {
        FileSourceTarget::new(path, self.clone())
    }
}
