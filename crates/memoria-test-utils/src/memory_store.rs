// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory `MemoryStore` for tests that do not need SQLite.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use memoria_core::{MemoriaError, MemoryRecord, MemoryStore};

/// A `Vec`-backed store with word-level, case-insensitive matching.
///
/// Search and listing return the most recent record first.
/// `set_failing(true)` makes every operation return a storage error.
#[derive(Default)]
pub struct InMemoryStore {
    records: Mutex<Vec<MemoryRecord>>,
    failing: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-loaded with `facts`, ids assigned from 1.
    pub fn with_facts(facts: &[&str]) -> Self {
        let records = facts
            .iter()
            .enumerate()
            .map(|(i, fact)| MemoryRecord {
                id: i as i64 + 1,
                content: fact.to_string(),
            })
            .collect();
        Self {
            records: Mutex::new(records),
            failing: AtomicBool::new(false),
        }
    }

    /// Toggle simulated storage failure.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Snapshot of every stored record in insertion order.
    pub async fn snapshot(&self) -> Vec<MemoryRecord> {
        self.records.lock().await.clone()
    }

    fn check(&self) -> Result<(), MemoriaError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MemoriaError::Storage {
                source: "simulated storage failure".into(),
            });
        }
        Ok(())
    }
}

fn words(content: &str) -> Vec<String> {
    content
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[async_trait]
impl MemoryStore for InMemoryStore {
    async fn insert(&self, content: &str) -> Result<i64, MemoriaError> {
        self.check()?;
        if content.trim().is_empty() {
            return Err(MemoriaError::InvalidInput(
                "memory content must not be blank".into(),
            ));
        }
        let mut records = self.records.lock().await;
        let id = records.last().map_or(1, |r| r.id + 1);
        records.push(MemoryRecord {
            id,
            content: content.to_string(),
        });
        Ok(id)
    }

    async fn search(
        &self,
        terms: &[String],
        limit: Option<usize>,
    ) -> Result<Vec<MemoryRecord>, MemoriaError> {
        self.check()?;
        let mut wanted: Vec<String> = terms
            .iter()
            .flat_map(|t| words(t))
            .collect();
        wanted.sort();
        wanted.dedup();
        if wanted.is_empty() {
            return Ok(Vec::new());
        }

        let records = self.records.lock().await;
        Ok(records
            .iter()
            .rev()
            .filter(|record| {
                let have = words(&record.content);
                wanted.iter().any(|w| have.contains(w))
            })
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<MemoryRecord>, MemoriaError> {
        self.check()?;
        Ok(self.records.lock().await.iter().rev().cloned().collect())
    }

    async fn count(&self) -> Result<usize, MemoriaError> {
        self.check()?;
        Ok(self.records.lock().await.len())
    }
}
