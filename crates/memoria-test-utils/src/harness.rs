// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles a complete memory stack with mock generation
//! tiers and a temp SQLite database. Provides `chat()` to drive the
//! orchestrator and `records()` to inspect warm storage.

use std::sync::Arc;
use std::time::Duration;

use memoria_agent::{MemoryOrchestrator, OrchestratorSettings, TokenCounter};
use memoria_core::{GenerationBackend, MemoriaError, MemoryRecord, MemoryStore};
use memoria_memory::SqliteMemoryStore;
use memoria_resilience::TieredGenerationClient;

use crate::counter::WhitespaceCounter;
use crate::mock_backend::MockBackend;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    tiers: Vec<Arc<MockBackend>>,
    settings: OrchestratorSettings,
    timeout: Duration,
    counter: Arc<dyn TokenCounter>,
    facts: Vec<String>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            tiers: Vec::new(),
            settings: OrchestratorSettings::default(),
            timeout: Duration::from_secs(30),
            counter: Arc::new(WhitespaceCounter),
            facts: Vec::new(),
        }
    }

    /// Set the generation tiers, highest precedence first.
    pub fn with_tiers(mut self, tiers: Vec<Arc<MockBackend>>) -> Self {
        self.tiers = tiers;
        self
    }

    /// Set the flush threshold in tokens.
    pub fn with_threshold(mut self, tokens: usize) -> Self {
        self.settings.flush_threshold_tokens = tokens;
        self
    }

    /// Set how many turns survive a flush.
    pub fn with_keep_turns(mut self, turns: usize) -> Self {
        self.settings.history_keep_turns = turns;
        self
    }

    /// Set the per-tier timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the default whitespace token counter.
    pub fn with_counter(mut self, counter: Arc<dyn TokenCounter>) -> Self {
        self.counter = counter;
        self
    }

    /// Seed warm storage with facts, oldest first.
    pub fn with_facts(mut self, facts: &[&str]) -> Self {
        self.facts = facts.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, MemoriaError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| MemoriaError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("memoria_vault.db");
        let store = Arc::new(SqliteMemoryStore::open(db_path).await?);

        for fact in &self.facts {
            store.insert(fact).await?;
        }

        let backends: Vec<Arc<dyn GenerationBackend>> = self
            .tiers
            .iter()
            .map(|tier| Arc::clone(tier) as Arc<dyn GenerationBackend>)
            .collect();
        let client = TieredGenerationClient::new(backends, self.timeout);

        let orchestrator = MemoryOrchestrator::new(
            client,
            Arc::clone(&store) as Arc<dyn MemoryStore>,
            self.counter,
            self.settings,
        );

        Ok(TestHarness {
            orchestrator,
            store,
            tiers: self.tiers,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment with mock tiers and temp storage.
pub struct TestHarness {
    /// The orchestrator under test.
    pub orchestrator: MemoryOrchestrator,
    /// SQLite warm storage (temp DB, cleaned up on drop).
    pub store: Arc<SqliteMemoryStore>,
    /// The mock tiers, highest precedence first.
    pub tiers: Vec<Arc<MockBackend>>,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Run one chat turn through the orchestrator.
    pub async fn chat(&mut self, input: &str) -> String {
        self.orchestrator.chat(input).await
    }

    /// Every archived record, most recent first.
    pub async fn records(&self) -> Result<Vec<MemoryRecord>, MemoriaError> {
        self.store.list_all().await
    }
}
