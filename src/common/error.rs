//! Error types for the test plan tools
//!
//! Fatal errors (missing plan, malformed JSON, unwritable output) abort the
//! command. Transport errors raised while running a plan are caught by the
//! runner and their `Display` text becomes the recorded result message.

use std::io;
use std::path::Path;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the test plan tools
#[derive(Error, Debug)]
pub enum Error {
    // === Test Plan Errors ===
    #[error("Test plan file not found: {path}")]
    PlanNotFound { path: String },

    #[error("Invalid JSON in test plan '{path}': {message} at line {line} column {column}")]
    PlanParse {
        path: String,
        line: usize,
        column: usize,
        message: String,
    },

    // === Transport Errors ===
    #[error("Request timeout (>{0}s)")]
    Timeout(u64),

    #[error("Connection error - is the server running?")]
    Connection,

    #[error("Error: Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    #[error("Error: {0}")]
    Http(String),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    #[error("Failed to write file '{path}': {error}")]
    FileWrite { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a plan parse error from a serde_json failure
    pub fn plan_parse(path: &Path, err: &serde_json::Error) -> Self {
        // serde_json appends " at line X column Y" to its Display output
        let message = err.to_string();
        let message = match message.rfind(" at line ") {
            Some(idx) => message[..idx].to_string(),
            None => message,
        };
        Self::PlanParse {
            path: path.display().to_string(),
            line: err.line(),
            column: err.column(),
            message,
        }
    }

    /// Create a file write error
    pub fn file_write(path: &Path, err: impl ToString) -> Self {
        Self::FileWrite {
            path: path.display().to_string(),
            error: err.to_string(),
        }
    }

    /// Map a reqwest failure onto the runner's transport error variants
    pub fn from_request(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout_secs)
        } else if err.is_connect() {
            Self::Connection
        } else {
            Self::Http(err.to_string())
        }
    }
}
