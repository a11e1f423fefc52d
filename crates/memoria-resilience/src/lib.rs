// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tiered generation with ordered fallback for the Memoria memory engine.
//!
//! A [`TieredGenerationClient`] walks an ordered list of backends and returns
//! the first usable text. Failures, timeouts and blank output all demote to
//! the next tier; when every tier is unavailable the fixed
//! [`OFFLINE_SENTINEL`] is returned instead of an error.

pub mod tiered;

pub use tiered::{OFFLINE_SENTINEL, TieredGenerationClient};
