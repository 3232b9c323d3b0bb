//! Error types for cthru-cli.

use thiserror::Error;

/// Errors surfaced by the query engine and the HTTP transport.
///
/// None of these are retried; every variant ends the invocation.
#[derive(Error, Debug)]
pub enum Error {
    /// Network failure or request timeout
    #[error("Connection failed - {reason}")]
    Connection { reason: String },

    /// The portal answered with a non-2xx status
    #[error("HTTP {status} - {reason}{}", server_message(.message))]
    Http {
        status: u16,
        reason: String,
        message: Option<String>,
    },

    /// `datasets --info` was given a key that is not in the catalog
    #[error("Unknown dataset: {key}\nAvailable: {}", .available.join(", "))]
    UnknownDataset {
        key: String,
        available: Vec<&'static str>,
    },

    /// A 2xx body that is not a JSON array of objects
    #[error("Invalid response from portal: {reason}")]
    InvalidResponse { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn server_message(message: &Option<String>) -> String {
    match message {
        Some(message) => format!("\n  {}", message),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, Error>;
