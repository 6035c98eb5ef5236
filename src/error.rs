//! Error types for Rasscope.
//!
//! This module provides a unified error handling approach using `thiserror`.

use crate::data::NodeKind;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Rasscope operations.
pub type Result<T> = std::result::Result<T, RasscopeError>;

/// Errors that can occur in Rasscope.
#[derive(Debug, Error)]
pub enum RasscopeError {
    /// Failed to open a file.
    #[error("Failed to open file: {path}")]
    FileOpen {
        /// Path that could not be opened.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Unsupported file format.
    #[error("Unsupported file format: {extension}")]
    UnsupportedFormat {
        /// File extension (may be empty).
        extension: String,
    },

    /// A path does not exist in the container, or a file does not exist.
    #[error("Not found: {path}")]
    NotFound {
        /// Missing path.
        path: String,
    },

    /// The file exists but is not a readable container.
    #[error("Not a container: {path} ({reason})")]
    NotAContainer {
        /// Offending file path.
        path: String,
        /// Reason reported by the backend.
        reason: String,
    },

    /// Underlying format or I/O failure while reading from a container.
    #[error("Read error: {0}")]
    Read(String),

    /// Path resolved to a group where a dataset was expected, or vice versa.
    #[error("Type mismatch at {path}: expected {expected}")]
    TypeMismatch {
        /// Offending path.
        path: String,
        /// Kind the caller required.
        expected: NodeKind,
    },

    /// A path template could not be parsed.
    #[error("Invalid path template '{template}': {reason}")]
    InvalidTemplate {
        /// Template text.
        template: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Configuration file could not be parsed.
    #[error("Config error: {0}")]
    Config(String),

    /// JSON snapshot could not be parsed.
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RasscopeError {
    /// Create a FileOpen error.
    pub fn file_open(path: PathBuf, source: std::io::Error) -> Self {
        Self::FileOpen { path, source }
    }

    /// Create an UnsupportedFormat error.
    pub fn unsupported_format(extension: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            extension: extension.into(),
        }
    }

    /// Create a NotFound error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create a TypeMismatch error.
    pub fn type_mismatch(path: impl Into<String>, expected: NodeKind) -> Self {
        Self::TypeMismatch {
            path: path.into(),
            expected,
        }
    }

    /// Create a Read error.
    pub fn read(message: impl Into<String>) -> Self {
        Self::Read(message.into())
    }
}

#[cfg(feature = "hdf5")]
impl From<hdf5::Error> for RasscopeError {
    fn from(err: hdf5::Error) -> Self {
        Self::Read(err.to_string())
    }
}

impl From<toml::de::Error> for RasscopeError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
