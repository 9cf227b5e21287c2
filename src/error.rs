//! Error taxonomy for the poll-detect-notify loop.
//!
//! Only [`ConfigError`] is fatal. The other three are caught and logged inside
//! a tick and never stop the scheduler.

use std::path::PathBuf;

use thiserror::Error;

/// Malformed or missing configuration. Halts startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("missing required config value: {0}")]
    Missing(&'static str),

    #[error("invalid config value for {key}: {message}")]
    Invalid { key: &'static str, message: String },

    #[error("missing secret {0} (checked environment)")]
    MissingSecret(&'static str),
}

/// Upstream API unreachable, rejected, or returned data we cannot use.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned HTTP {status}")]
    Status { status: u16 },

    #[error("upstream reported an error: {0}")]
    Upstream(String),

    #[error("malformed upstream response: {0}")]
    Malformed(String),
}

/// State file could not be written.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("writing state to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serializing state: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Destination channel missing or the message was rejected.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Bot token refused at login. Fatal at startup.
    #[error("discord login refused with HTTP {status}: {body}")]
    Unauthorized { status: u16, body: String },

    #[error("destination channel {0} not found or not visible to the bot")]
    ChannelNotFound(String),

    #[error("message rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}
