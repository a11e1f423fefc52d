// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword-overlap conflict heuristic.
//!
//! A new fact "conflicts" when the most recent archived record sharing one
//! of its leading long words is not the same text. This is a cheap proxy
//! for contradiction: false positives and false negatives are expected.

use std::sync::Arc;

use memoria_config::model::ConflictConfig;
use memoria_core::{MemoriaError, MemoryStore};
use tracing::{debug, warn};

/// Tunable constants of the heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConflictSettings {
    /// Words must have strictly more characters than this to be keywords.
    pub min_keyword_len: usize,
    /// Number of leading keywords in the search query.
    pub max_keywords: usize,
    /// Number of archived records compared against the fact.
    pub search_limit: usize,
}

impl Default for ConflictSettings {
    fn default() -> Self {
        Self::from_config(&ConflictConfig::default())
    }
}

impl ConflictSettings {
    pub fn from_config(config: &ConflictConfig) -> Self {
        Self {
            min_keyword_len: config.min_keyword_len,
            max_keywords: config.max_keywords,
            search_limit: config.search_limit,
        }
    }
}

/// Decides whether a candidate fact should be archived with the conflict tag.
#[derive(Clone)]
pub struct ConflictResolver {
    store: Arc<dyn MemoryStore>,
    settings: ConflictSettings,
}

impl ConflictResolver {
    pub fn new(store: Arc<dyn MemoryStore>, settings: ConflictSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> ConflictSettings {
        self.settings
    }

    /// Returns `true` when `fact` conflicts with an archived record.
    ///
    /// Facts without any keyword never conflict and never touch the store.
    pub async fn check(&self, fact: &str) -> Result<bool, MemoriaError> {
        let keywords = candidate_keywords(fact, &self.settings);
        if keywords.is_empty() {
            return Ok(false);
        }

        let hits = self
            .store
            .search(&keywords, Some(self.settings.search_limit))
            .await?;

        let fact_lower = fact.to_lowercase();
        let conflicted = hits
            .iter()
            .any(|existing| existing.content.to_lowercase() != fact_lower);

        if conflicted {
            warn!(
                fact,
                keywords = ?keywords,
                "fact overlaps an existing memory, tagging as conflict"
            );
        } else {
            debug!(fact, matches = hits.len(), "no conflict");
        }
        Ok(conflicted)
    }
}

/// Whitespace-separated words longer than `min_keyword_len` characters, in
/// original order, capped at `max_keywords`.
pub fn candidate_keywords(fact: &str, settings: &ConflictSettings) -> Vec<String> {
    fact.split_whitespace()
        .filter(|word| word.chars().count() > settings.min_keyword_len)
        .take(settings.max_keywords)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use memoria_test_utils::InMemoryStore;

    use super::*;

    fn resolver(store: Arc<InMemoryStore>) -> ConflictResolver {
        ConflictResolver::new(store, ConflictSettings::default())
    }

    #[test]
    fn keywords_keep_order_and_cap() {
        let settings = ConflictSettings::default();
        assert_eq!(
            candidate_keywords("Trip to Bali in December with Sarah and Thomas", &settings),
            vec!["December", "Sarah", "Thomas"]
        );
    }

    #[test]
    fn keywords_count_characters_not_bytes() {
        let settings = ConflictSettings::default();
        // "café" is four characters but five bytes.
        assert!(candidate_keywords("café", &settings).is_empty());
        assert_eq!(candidate_keywords("crème", &settings), vec!["crème"]);
    }

    #[tokio::test]
    async fn short_words_only_never_conflict() {
        let store = Arc::new(InMemoryStore::with_facts(&["I am in Rome now"]));
        assert!(!resolver(store).check("I am in Rome now").await.unwrap());
    }

    #[tokio::test]
    async fn overlapping_different_fact_conflicts() {
        let store = Arc::new(InMemoryStore::with_facts(&["Trip to Paris in December"]));
        assert!(resolver(store).check("Trip to Bali in December").await.unwrap());
    }

    #[tokio::test]
    async fn identical_fact_ignoring_case_does_not_conflict() {
        let store = Arc::new(InMemoryStore::with_facts(&["Trip to Bali in December"]));
        assert!(!resolver(store).check("trip to bali in DECEMBER").await.unwrap());
    }

    #[tokio::test]
    async fn empty_store_has_no_conflicts() {
        let store = Arc::new(InMemoryStore::new());
        assert!(!resolver(store).check("Trip to Bali in December").await.unwrap());
    }

    #[tokio::test]
    async fn only_most_recent_match_is_compared() {
        // The newest "December" record is identical, so no conflict even
        // though an older one differs.
        let store = Arc::new(InMemoryStore::with_facts(&[
            "Trip to Paris in December",
            "Trip to Bali in December",
        ]));
        assert!(!resolver(store).check("Trip to Bali in December").await.unwrap());
    }

    #[tokio::test]
    async fn store_failure_propagates() {
        let store = Arc::new(InMemoryStore::new());
        store.set_failing(true);
        assert!(resolver(store).check("Trip to Bali in December").await.is_err());
    }

    #[tokio::test]
    async fn custom_settings_widen_keywords() {
        let store = Arc::new(InMemoryStore::with_facts(&["Rome is home"]));
        let settings = ConflictSettings {
            min_keyword_len: 3,
            ..ConflictSettings::default()
        };
        let resolver = ConflictResolver::new(store, settings);
        assert!(resolver.check("Rome in May").await.unwrap());
    }
}
