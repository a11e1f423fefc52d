// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Memoria integration tests.
//!
//! Provides mock backends, an in-memory store and a test harness for fast,
//! deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockBackend`] - Scripted generation backend that records its requests
//! - [`InMemoryStore`] - Vec-backed `MemoryStore` with failure injection
//! - [`WhitespaceCounter`] - Word-count token counter
//! - [`TestHarness`] - Orchestrator wired to mock tiers and a temp SQLite store

pub mod counter;
pub mod harness;
pub mod memory_store;
pub mod mock_backend;

pub use counter::WhitespaceCounter;
pub use harness::{TestHarness, TestHarnessBuilder};
pub use memory_store::InMemoryStore;
pub use mock_backend::{MockBackend, MockReply, MockRequest};
