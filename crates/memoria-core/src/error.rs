// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Memoria memory engine.

use thiserror::Error;

/// The primary error type used across Memoria traits and core operations.
#[derive(Debug, Error)]
pub enum MemoriaError {
    /// Configuration errors (invalid TOML, missing credentials, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Archive errors (database open, query failure, schema setup).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Generation backend errors (quota, network, malformed response).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Caller supplied a value the operation cannot accept.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MemoriaError {
    /// Shorthand for a provider error without an underlying cause.
    pub fn provider(message: impl Into<String>) -> Self {
        MemoriaError::Provider {
            message: message.into(),
            source: None,
        }
    }
}
