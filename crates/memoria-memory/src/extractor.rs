// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Atomic fact extraction from a conversation transcript.
//!
//! The generation tiers do the semantic work; this module only renders the
//! transcript, asks once, and cleans the reply up line by line.

use memoria_core::{ConversationTurn, render_transcript};
use memoria_resilience::{OFFLINE_SENTINEL, TieredGenerationClient};
use tracing::{debug, warn};

/// Instruction sent with the transcript.
pub const EXTRACTION_INSTRUCTION: &str = "Extract critical atomic facts (dates, names, preferences) from this chat. List only, one fact per line.";

/// Lines at or below this many characters (after marker stripping) are dropped.
pub const MIN_FACT_CHARS: usize = 5;

/// Turns a conversation into a list of candidate facts.
#[derive(Debug, Clone)]
pub struct FactExtractor {
    client: TieredGenerationClient,
}

impl FactExtractor {
    pub fn new(client: TieredGenerationClient) -> Self {
        Self { client }
    }

    /// Extracts facts from `turns`. Zero facts is a normal outcome.
    ///
    /// An empty conversation is not sent to the backends. The offline
    /// sentinel is not a fact and yields nothing.
    pub async fn extract(&self, turns: &[ConversationTurn]) -> Vec<String> {
        if turns.is_empty() {
            return Vec::new();
        }

        let transcript = render_transcript(turns);
        let reply = self
            .client
            .invoke(EXTRACTION_INSTRUCTION, &transcript)
            .await;

        if reply == OFFLINE_SENTINEL {
            warn!("no generation tier available for extraction, archiving nothing");
            return Vec::new();
        }

        let facts = parse_facts(&reply);
        debug!(facts = facts.len(), "facts extracted");
        facts
    }
}

/// Splits a reply into facts: one per line, list markers stripped, short
/// lines discarded.
pub fn parse_facts(reply: &str) -> Vec<String> {
    reply
        .lines()
        .map(strip_list_marker)
        .filter(|line| line.chars().count() > MIN_FACT_CHARS)
        .map(str::to_string)
        .collect()
}

/// Removes a leading bullet (`-`, `*`, `+`, `•`) or ordinal (`1.`, `2)`)
/// plus surrounding whitespace.
fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();
    let rest = line.trim_start_matches(['-', '*', '+', '•']);
    if rest.len() != line.len() {
        return rest.trim();
    }

    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits > 0
        && let Some(rest) = line[digits..]
            .strip_prefix('.')
            .or_else(|| line[digits..].strip_prefix(')'))
    {
        return rest.trim();
    }
    line
}
