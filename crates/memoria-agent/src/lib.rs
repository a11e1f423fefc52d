// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation orchestration for the Memoria memory engine.
//!
//! The [`MemoryOrchestrator`] is the central coordinator that:
//! - Grounds each user turn with facts retrieved from warm storage
//! - Generates responses through the tiered generation client
//! - Tracks the token size of the conversation history
//! - Flushes history into warm storage once it grows past the threshold

pub mod orchestrator;
pub mod tokens;

pub use orchestrator::{
    FlushReport, MemoryOrchestrator, NO_MEMORIES, OrchestratorSettings, OrchestratorState,
    SOURCE_NOTE, build_system_instruction,
};
pub use tokens::{Cl100kCounter, TokenCounter};
