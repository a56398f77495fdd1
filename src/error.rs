//! Unified error types for foodbot.
//!
//! The record store never retries. Backend failures, malformed documents and
//! misuse of the table all surface to the caller of `pull`/`push` or of the
//! table operation itself.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for foodbot operations.
#[derive(Error, Debug)]
pub enum FoodbotError {
    /// I/O errors from the file backend.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Remote backend failures (HTTP transport, non-success status).
    #[error("backend error: {message}")]
    Backend { message: String },

    /// JSON parsing/serialization errors.
    #[error("serialization error: {message}")]
    Serde { message: String },

    /// Worksheet content that cannot be mapped onto records.
    #[error("malformed grid: {message}")]
    Grid { message: String },

    /// Delete of a key that is not in the table.
    #[error("missing key: {key}")]
    MissingKey { key: String },

    /// Configuration loading errors.
    #[error("config error: {message}")]
    Config { message: String },
}

/// A specialized Result type for foodbot operations.
pub type Result<T> = std::result::Result<T, FoodbotError>;

impl FoodbotError {
    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Create a serialization error.
    pub fn serde(message: impl Into<String>) -> Self {
        Self::Serde {
            message: message.into(),
        }
    }

    /// Create a malformed grid error.
    pub fn grid(message: impl Into<String>) -> Self {
        Self::Grid {
            message: message.into(),
        }
    }

    /// Create a missing key error.
    pub fn missing_key(key: impl Into<String>) -> Self {
        Self::MissingKey { key: key.into() }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

impl From<io::Error> for FoodbotError {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for FoodbotError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for FoodbotError {
    fn from(err: reqwest::Error) -> Self {
        Self::Backend {
            message: err.to_string(),
        }
    }
}
