// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! File-backed sources and targets for wiretype descriptors.
//!
//! A descriptor's converter splits each value into a key and a value entry;
//! entries are encoded with `wiretype::codec` and stored in a block-based
//! container (`.wtr`) that records the schemas it was written with.
//!
//! # Quick Start
//!
//! ```no_run
//! use wiretype::ptypes;
//! use wiretype_io::{DefaultFileSource, ReadableSource};
//!
//! let table = ptypes::table_of(&ptypes::strings(), &ptypes::longs())?;
//! let st = table.default_file_source("/tmp/counts.wtr");
//! st.write_values(&[("a".to_string(), 1), ("b".to_string(), 2)])?;
//!
//! for entry in st.read()? {
//!     let (word, count) = entry?;
//!     println!("{word}: {count}");
//! }
//! # Ok::<(), wiretype_io::IoError>(())
//! ```
//!
//! # Layout
//!
//! | Type | Role |
//! |------|------|
//! | [`FileSource`] | reads records through a descriptor |
//! | [`FileTarget`] | writes records through a descriptor |
//! | [`FileSourceTarget`] | both, bound to one path |
//! | [`FileTableSourceTarget`] | key/value variant exposing its table descriptor |

pub mod config;
pub mod error;
pub mod format;
mod layout;
pub mod source;
pub mod source_target;
pub mod target;

pub use config::{ConfigError, IoConfig, WriteMode};
pub use error::{IoError, Result};
pub use format::{FileHeader, FileMetadata, FileSummary, RecordReader, RecordWriter};
pub use source::{FileSource, ReadableSource, RecordIter, Source};
pub use source_target::{DefaultFileSource, FileSourceTarget, FileTableSourceTarget, SourceTarget};
pub use target::{FileTarget, Target, TargetWriter};
