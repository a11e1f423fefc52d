// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Long-term memory components for the Memoria memory engine.
//!
//! ## Architecture
//!
//! - **SqliteMemoryStore**: append-only FTS5 warm storage, connect-per-operation
//! - **FactExtractor**: transcript -> atomic facts via the generation tiers
//! - **ConflictResolver**: keyword-overlap heuristic deciding the conflict tag
//! - **RetrievalEngine**: keyword lookup that renders grounding context

pub mod conflict;
pub mod extractor;
pub mod retriever;
pub mod store;

pub use conflict::{ConflictResolver, ConflictSettings, candidate_keywords};
pub use extractor::{EXTRACTION_INSTRUCTION, FactExtractor, parse_facts};
pub use retriever::{RetrievalEngine, query_terms};
pub use store::SqliteMemoryStore;
