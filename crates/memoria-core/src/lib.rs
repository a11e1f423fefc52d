// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Memoria memory engine.
//!
//! This crate provides the error type, the domain types of the memory
//! lifecycle, and the traits implemented by generation backends and
//! archive engines.

pub mod error;
pub mod traits;
pub mod types;

pub use error::MemoriaError;
pub use traits::{GenerationBackend, MemoryStore};
pub use types::{
    render_transcript, tag_fact, ConversationTurn, GenerationOutcome, MemoryRecord, Role,
    CONFLICT_TAG,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memoria_error_has_all_variants() {
        let _config = MemoriaError::Config("test".into());
        let _storage = MemoriaError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _provider = MemoriaError::provider("test");
        let _timeout = MemoriaError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
        let _invalid = MemoriaError::InvalidInput("test".into());
        let _internal = MemoriaError::Internal("test".into());
    }

    #[test]
    fn error_messages_are_prefixed() {
        let err = MemoriaError::provider("quota exhausted");
        assert_eq!(err.to_string(), "provider error: quota exhausted");

        let err = MemoriaError::Timeout {
            duration: std::time::Duration::from_secs(5),
        };
        assert_eq!(err.to_string(), "operation timed out after 5s");
    }

    #[test]
    fn traits_are_object_safe() {
        fn _assert_backend(_: &dyn GenerationBackend) {}
        fn _assert_store(_: &dyn MemoryStore) {}
    }
}
