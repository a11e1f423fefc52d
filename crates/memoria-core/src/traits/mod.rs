// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the memory engine and its collaborators.
//!
//! Both traits use `#[async_trait]` for dynamic dispatch, so the
//! orchestrator can hold `Arc<dyn GenerationBackend>` and
//! `Arc<dyn MemoryStore>` without knowing the concrete engine.

pub mod backend;
pub mod store;

pub use backend::GenerationBackend;
pub use store::MemoryStore;
