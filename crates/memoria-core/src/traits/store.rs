// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Archive trait for the append-only warm storage of facts.

use async_trait::async_trait;

use crate::error::MemoriaError;
use crate::types::MemoryRecord;

/// Append-only archive of fact records with keyword search.
///
/// Records are never mutated or deleted once inserted. Search is a boolean
/// OR over case-insensitive, word-boundary tokens; results are ordered by
/// recency (highest id first), never by relevance.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Appends a new record and returns its id. Blank content is rejected.
    async fn insert(&self, content: &str) -> Result<i64, MemoriaError>;

    /// Returns records containing at least one of `terms`, most recent first.
    async fn search(
        &self,
        terms: &[String],
        limit: Option<usize>,
    ) -> Result<Vec<MemoryRecord>, MemoriaError>;

    /// Returns every record, most recent first.
    async fn list_all(&self) -> Result<Vec<MemoryRecord>, MemoriaError>;

    /// Returns the total number of archived records.
    async fn count(&self) -> Result<usize, MemoriaError>;
}
