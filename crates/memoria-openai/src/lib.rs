// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI generation backend for the Memoria memory engine.
//!
//! Implements [`GenerationBackend`] over the Chat Completions API. Any
//! OpenAI-compatible server works by pointing `openai.base_url` at it.

pub mod client;
pub mod types;

use async_trait::async_trait;
use memoria_config::model::OpenAiConfig;
use memoria_core::{GenerationBackend, MemoriaError};
use tracing::info;

use crate::client::OpenAiClient;
use crate::types::ChatCompletionRequest;

/// Environment variable consulted when `openai.api_key` is unset.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// OpenAI backend implementing [`GenerationBackend`].
///
/// API key resolution order: config -> `OPENAI_API_KEY` env var -> error.
pub struct OpenAiBackend {
    client: OpenAiClient,
}

impl OpenAiBackend {
    pub fn from_config(config: &OpenAiConfig) -> Result<Self, MemoriaError> {
        let api_key = resolve_api_key(&config.api_key)?;
        let client = OpenAiClient::new(&api_key, config.model.clone(), config.base_url.clone())?;
        info!(model = %config.model, "OpenAI backend initialized");
        Ok(Self { client })
    }
}

#[async_trait]
impl GenerationBackend for OpenAiBackend {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(
        &self,
        system_instruction: &str,
        user_input: &str,
    ) -> Result<String, MemoriaError> {
        let request =
            ChatCompletionRequest::single_turn(self.client.model(), system_instruction, user_input);
        let response = self.client.complete(&request).await?;
        response
            .first_content()
            .map(str::to_string)
            .ok_or_else(|| MemoriaError::provider("OpenAI response contained no message content"))
    }
}

fn resolve_api_key(config_key: &Option<String>) -> Result<String, MemoriaError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(key.clone());
    }

    match std::env::var(API_KEY_ENV) {
        Ok(key) if !key.is_empty() => Ok(key),
        _ => Err(MemoriaError::Config(format!(
            "OpenAI API key not found. Set openai.api_key in config or {API_KEY_ENV} environment variable."
        ))),
    }
}
