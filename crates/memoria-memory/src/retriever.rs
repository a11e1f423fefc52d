// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Best-effort grounding context from warm storage.

use std::sync::{Arc, LazyLock};

use memoria_core::MemoryStore;
use regex::Regex;
use tracing::{debug, warn};

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap());

/// Looks up archived facts relevant to a user query.
#[derive(Clone)]
pub struct RetrievalEngine {
    store: Arc<dyn MemoryStore>,
    limit: usize,
}

impl RetrievalEngine {
    pub fn new(store: Arc<dyn MemoryStore>, limit: usize) -> Self {
        Self { store, limit }
    }

    /// Returns matching facts as `- content` lines, or an empty string.
    ///
    /// Never fails: store errors are logged and yield empty context.
    pub async fn retrieve(&self, query: &str) -> String {
        let terms = query_terms(query);
        if terms.is_empty() {
            return String::new();
        }

        match self.store.search(&terms, Some(self.limit)).await {
            Ok(records) => {
                debug!(matches = records.len(), "retrieved grounding context");
                records
                    .iter()
                    .map(|r| format!("- {}", r.content))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            Err(e) => {
                warn!(error = %e, "retrieval failed, continuing without context");
                String::new()
            }
        }
    }
}

/// Words of `query` after punctuation is replaced by spaces.
pub fn query_terms(query: &str) -> Vec<String> {
    NON_WORD
        .replace_all(query, " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
