// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the memory lifecycle components.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Literal marker prefixed to a fact's stored content when the conflict
/// heuristic fires. Part of the archive's storage format.
pub const CONFLICT_TAG: &str = "[CONFLICT] ";

/// Who produced a conversation turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Agent,
}

/// A single immutable turn of dialogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    role: Role,
    content: String,
}

impl ConversationTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn agent(content: impl Into<String>) -> Self {
        Self::new(Role::Agent, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Renders the turn as a `role: content` transcript line.
    pub fn render(&self) -> String {
        format!("{}: {}", self.role, self.content)
    }
}

/// Renders turns as `role: content` lines joined by newlines.
pub fn render_transcript(turns: &[ConversationTurn]) -> String {
    turns
        .iter()
        .map(ConversationTurn::render)
        .collect::<Vec<_>>()
        .join("\n")
}

/// A fact archived in warm storage.
///
/// Conflict status is carried by the [`CONFLICT_TAG`] prefix on `content`,
/// never by a separate field, so records round-trip through any engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Monotonically increasing identifier assigned by the store.
    pub id: i64,
    /// The stored text, including the conflict tag when present.
    pub content: String,
}

impl MemoryRecord {
    /// Whether this record was archived with the conflict tag.
    pub fn is_conflicted(&self) -> bool {
        self.content.starts_with(CONFLICT_TAG)
    }

    /// The fact text without the conflict tag.
    pub fn fact(&self) -> &str {
        self.content
            .strip_prefix(CONFLICT_TAG)
            .unwrap_or(&self.content)
    }
}

/// Prepares a fact for archiving, adding the conflict tag when flagged.
pub fn tag_fact(fact: &str, conflicted: bool) -> String {
    if conflicted {
        format!("{CONFLICT_TAG}{fact}")
    } else {
        fact.to_string()
    }
}

/// Result of invoking a single generation tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The tier produced text.
    Text(String),
    /// The tier is unavailable for this invocation.
    Unavailable,
}

impl GenerationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationOutcome::Text(_))
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            GenerationOutcome::Text(text) => Some(text),
            GenerationOutcome::Unavailable => None,
        }
    }
}
