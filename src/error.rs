//! Error types.
//!
//! Each concern has its own `thiserror` enum. None of them are fatal to the
//! application: the stores degrade to empty or default state and keep the
//! error around (as a message) for display.

use std::path::PathBuf;
use thiserror::Error;

/// Failure fetching or decoding a remote content document.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Failed to fetch {url}: {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to fetch {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to fetch {path}: not found")]
    NotFound { path: String },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to parse {path}: empty document")]
    EmptyDocument { path: String },

    #[error("Invalid content URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Loading {key} was interrupted: {source}")]
    Interrupted {
        key: String,
        #[source]
        source: tokio::task::JoinError,
    },
}

/// Failure reading or writing a durable record.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O failed for {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Storage serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure from the external translation model.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("Translation model failed: {0}")]
    Model(String),
}

/// Invalid configuration value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid {var}: {source}")]
    InvalidUrl {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },
}
