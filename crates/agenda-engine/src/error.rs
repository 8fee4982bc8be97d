//! Error types for agenda-engine operations.
//!
//! The layout components (parser, matcher, binner, grouper, resolver) never fail.
//! Errors only arise at the edges: decoding provider payloads, parsing dates and
//! loading configuration.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgendaError {
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The provider answered with `success: false`.
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Contact not found: {0}")]
    ContactNotFound(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AgendaError>;
