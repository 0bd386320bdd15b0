//! Error types for scpstats
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using StatsError
pub type Result<T> = std::result::Result<T, StatsError>;

/// Unified error type for scpstats operations
#[derive(Debug, Error)]
pub enum StatsError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    /// Transport or file I/O failure. Fatal to the connection loop.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Malformed command: {0}")]
    MalformedCommand(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Bad arguments: {0}")]
    BadArguments(String),

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Player not found: {0}")]
    NotFound(String),

    #[error("Player already exists: {0}")]
    DuplicateKey(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StatsError {
    /// True for errors that end the connection loop rather than a single command
    pub fn is_transport(&self) -> bool {
        matches!(self, StatsError::Io(_))
    }
}
