//! Common utilities shared by the converter and the runner

pub mod config;
pub mod error;
pub mod logging;
pub mod paths;

pub use error::{Error, Result};

/// Local ISO-8601 timestamp with microseconds, as embedded in reports and
/// collection descriptions
pub fn timestamp_now() -> String {
    format_timestamp(chrono::Local::now().naive_local())
}

/// Format a timestamp the way [`timestamp_now`] does
pub fn format_timestamp(at: chrono::NaiveDateTime) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}
