// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation backend trait for text-generation providers (Gemini, OpenAI, Ollama).

use async_trait::async_trait;

use crate::error::MemoriaError;

/// A text-generation provider that turns an instruction and an input into text.
///
/// Each implementation wraps one provider and adapts its own request and
/// response shapes internally. Any error means "this tier is unavailable
/// now"; callers must only distinguish success from failure.
#[async_trait]
pub trait GenerationBackend: Send + Sync + 'static {
    /// Returns the human-readable name of this backend, used in logs.
    fn name(&self) -> &str;

    /// Generates text for `user_input` under `system_instruction`.
    async fn generate(
        &self,
        system_instruction: &str,
        user_input: &str,
    ) -> Result<String, MemoriaError>;
}
