// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat turns, token accounting and the flush state machine.
//!
//! The orchestrator owns the conversation history. Each turn is grounded with
//! retrieved facts; when the rendered history grows past the threshold the
//! turn blocks on a flush that archives extracted facts and truncates history
//! to its most recent turns.

use std::sync::Arc;

use memoria_config::MemoriaConfig;
use memoria_core::{ConversationTurn, MemoryStore, render_transcript, tag_fact};
use memoria_memory::{ConflictResolver, ConflictSettings, FactExtractor, RetrievalEngine};
use memoria_resilience::TieredGenerationClient;
use tracing::{debug, info, warn};

use crate::tokens::TokenCounter;

/// Placeholder used in the instruction when retrieval found nothing.
pub const NO_MEMORIES: &str = "No relevant past memories found.";

/// Appended to a response whose instruction carried retrieved facts.
pub const SOURCE_NOTE: &str = "\n\n*(Source: Retrieved from Warm Storage)*";

/// States of the flush state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorState {
    /// Appending turns to history.
    Accumulating,
    /// Extracting, conflict-checking and archiving facts.
    Flushing,
}

impl std::fmt::Display for OrchestratorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrchestratorState::Accumulating => write!(f, "accumulating"),
            OrchestratorState::Flushing => write!(f, "flushing"),
        }
    }
}

/// Tunables of the memory lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorSettings {
    /// A flush runs when the history's token count strictly exceeds this.
    pub flush_threshold_tokens: usize,
    /// Turns kept after a flush.
    pub history_keep_turns: usize,
    /// Facts injected per turn.
    pub retrieval_limit: usize,
    pub conflict: ConflictSettings,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self::from_config(&MemoriaConfig::default())
    }
}

impl OrchestratorSettings {
    pub fn from_config(config: &MemoriaConfig) -> Self {
        Self {
            flush_threshold_tokens: config.memory.flush_threshold_tokens,
            history_keep_turns: config.memory.history_keep_turns,
            retrieval_limit: config.memory.retrieval_limit,
            conflict: ConflictSettings::from_config(&config.conflict),
        }
    }
}

/// Outcome of one flush.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Facts returned by extraction.
    pub extracted: usize,
    /// Facts archived with the conflict tag.
    pub conflicts: usize,
    /// Facts successfully written to the store.
    pub archived: usize,
}

/// Builds the grounding instruction for a chat turn.
pub fn build_system_instruction(context: &str) -> String {
    let memories = if context.is_empty() { NO_MEMORIES } else { context };
    format!(
        "You are a personal AI with long-term memory.\n\
         RELEVANT PAST MEMORIES:\n\
         {memories}\n\n\
         If you use a memory from the list above, mention it briefly at the end of your response."
    )
}

/// Drives chat turns and the flush lifecycle for one conversation.
pub struct MemoryOrchestrator {
    client: TieredGenerationClient,
    extractor: FactExtractor,
    resolver: ConflictResolver,
    retriever: RetrievalEngine,
    store: Arc<dyn MemoryStore>,
    counter: Arc<dyn TokenCounter>,
    settings: OrchestratorSettings,
    history: Vec<ConversationTurn>,
    state: OrchestratorState,
}

impl MemoryOrchestrator {
    pub fn new(
        client: TieredGenerationClient,
        store: Arc<dyn MemoryStore>,
        counter: Arc<dyn TokenCounter>,
        settings: OrchestratorSettings,
    ) -> Self {
        info!(
            tiers = ?client.tier_names(),
            threshold = settings.flush_threshold_tokens,
            "memory orchestrator initialized"
        );
        Self {
            extractor: FactExtractor::new(client.clone()),
            resolver: ConflictResolver::new(Arc::clone(&store), settings.conflict),
            retriever: RetrievalEngine::new(Arc::clone(&store), settings.retrieval_limit),
            client,
            store,
            counter,
            settings,
            history: Vec::new(),
            state: OrchestratorState::Accumulating,
        }
    }

    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    pub fn state(&self) -> OrchestratorState {
        self.state
    }

    pub fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }

    /// Token count of the whole history rendered as `role: content` lines.
    pub fn token_count(&self) -> usize {
        self.counter.count(&render_transcript(&self.history))
    }

    /// Runs one chat turn and returns the agent's response.
    ///
    /// Never fails. May block on a flush before returning.
    pub async fn chat(&mut self, user_input: &str) -> String {
        let context = self.retriever.retrieve(user_input).await;
        let instruction = build_system_instruction(&context);

        self.history.push(ConversationTurn::user(user_input));

        let mut response = self.client.invoke(&instruction, user_input).await;
        if !context.is_empty() {
            response.push_str(SOURCE_NOTE);
        }
        self.history.push(ConversationTurn::agent(response.clone()));

        let tokens = self.token_count();
        debug!(
            tokens,
            threshold = self.settings.flush_threshold_tokens,
            turns = self.history.len(),
            "turn recorded"
        );
        if tokens > self.settings.flush_threshold_tokens {
            info!(
                tokens,
                threshold = self.settings.flush_threshold_tokens,
                "token threshold exceeded, flushing"
            );
            self.flush().await;
        }

        response
    }

    /// Extracts facts from the full history, archives them, then truncates
    /// history to the most recent turns.
    ///
    /// Facts are conflict-checked against the archive as it was before the
    /// flush, never against each other. Always completes: store failures skip
    /// the affected fact, and a failed conflict check archives the fact untagged.
    pub async fn flush(&mut self) -> FlushReport {
        self.state = OrchestratorState::Flushing;
        let facts = self.extractor.extract(&self.history).await;
        let mut report = FlushReport {
            extracted: facts.len(),
            ..FlushReport::default()
        };

        let mut checked = Vec::with_capacity(facts.len());
        for fact in &facts {
            let conflicted = match self.resolver.check(fact).await {
                Ok(conflicted) => conflicted,
                Err(e) => {
                    warn!(error = %e, fact = fact.as_str(), "conflict check failed, archiving untagged");
                    false
                }
            };
            checked.push((fact, conflicted));
        }

        for (fact, conflicted) in checked {
            match self.store.insert(&tag_fact(fact, conflicted)).await {
                Ok(record_id) => {
                    report.archived += 1;
                    if conflicted {
                        report.conflicts += 1;
                    }
                    debug!(record_id, conflicted, "fact archived");
                }
                Err(e) => {
                    warn!(error = %e, fact = fact.as_str(), "failed to archive fact");
                }
            }
        }

        let excess = self
            .history
            .len()
            .saturating_sub(self.settings.history_keep_turns);
        self.history.drain(..excess);
        self.state = OrchestratorState::Accumulating;

        info!(
            facts = report.extracted,
            archived = report.archived,
            conflicts = report.conflicts,
            kept_turns = self.history.len(),
            "flush complete"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_embeds_context() {
        let instruction = build_system_instruction("- Trip to Bali in December");
        assert!(instruction.starts_with("You are a personal AI with long-term memory."));
        assert!(instruction.contains("RELEVANT PAST MEMORIES:\n- Trip to Bali in December\n"));
        assert!(!instruction.contains(NO_MEMORIES));
        assert!(instruction.ends_with("mention it briefly at the end of your response."));
    }

    #[test]
    fn instruction_without_context_says_so() {
        assert!(build_system_instruction("").contains(NO_MEMORIES));
    }

    #[test]
    fn default_settings_follow_config_defaults() {
        let settings = OrchestratorSettings::default();
        assert_eq!(settings.flush_threshold_tokens, 1500);
        assert_eq!(settings.history_keep_turns, 2);
        assert_eq!(settings.retrieval_limit, 3);
        assert_eq!(settings.conflict.max_keywords, 3);
    }

    #[test]
    fn state_display() {
        assert_eq!(OrchestratorState::Accumulating.to_string(), "accumulating");
        assert_eq!(OrchestratorState::Flushing.to_string(), "flushing");
    }
}
