// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! File binding configuration.
//!
//! Supports both programmatic and file-based configuration:
//!
//! ```toml
//! block_records = 512
//! verify_checksums = true
//! write_mode = "overwrite"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Largest accepted number of entries per block.
pub const MAX_BLOCK_RECORDS: usize = 1 << 20;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// What a target does when its path already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Refuse to write over an existing file.
    #[default]
    Fail,
    /// Replace the existing file.
    Overwrite,
}

/// Settings shared by file sources and targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoConfig {
    /// Entries buffered per block before it is written.
    #[serde(default = "default_block_records")]
    pub block_records: usize,

    /// Check block CRCs while reading.
    #[serde(default = "default_true")]
    pub verify_checksums: bool,

    /// Behavior when the target path exists.
    #[serde(default)]
    pub write_mode: WriteMode,
}

fn default_block_records() -> usize {
    1024
}

fn default_true() -> bool {
    true
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            block_records: default_block_records(),
            verify_checksums: true,
            write_mode: WriteMode::Fail,
        }
    }
}

impl IoConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.block_records == 0 {
            return Err(ConfigError::Invalid("block_records must be at least 1".into()));
        }
        if self.block_records > MAX_BLOCK_RECORDS {
            return Err(ConfigError::Invalid(format!(
                "block_records {} exceeds the maximum of {}",
                self.block_records, MAX_BLOCK_RECORDS
            )));
        }
        Ok(())
    }

    /// Set the write mode.
    pub fn write_mode(mut self, mode: WriteMode) -> Self {
        self.write_mode = mode;
        self
    }

    /// Set the number of entries per block.
    pub fn block_records(mut self, records: usize) -> Self {
        self.block_records = records;
        self
    }
}
