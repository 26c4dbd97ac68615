// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use crate::config::ConfigError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by file sources, targets and the record container.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    #[error("Version mismatch: expected {expected}, got {got}")]
    VersionMismatch { expected: u32, got: u32 },

    #[error("CRC mismatch in block {block_id}")]
    CrcMismatch { block_id: u32 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file was written with a schema the descriptor does not describe.
    #[error("Schema mismatch: descriptor expects {expected}, file holds {found}")]
    SchemaMismatch { expected: String, found: String },

    #[error("Target already exists: {}", .0.display())]
    TargetExists(PathBuf),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Wiretype(#[from] wiretype::Error),
}

pub type Result<T> = std::result::Result<T, IoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = IoError::CrcMismatch { block_id: 3 };
        assert_eq!(err.to_string(), "CRC mismatch in block 3");

        let err = IoError::TargetExists(PathBuf::from("/tmp/out.wtr"));
        assert_eq!(err.to_string(), "Target already exists: /tmp/out.wtr");
    }

    #[test]
    fn test_core_errors_pass_through() {
        let err: IoError = wiretype::Error::Codec("truncated".into()).into();
        assert_eq!(err.to_string(), "Codec error: truncated");
    }
}
