// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini generation backend for the Memoria memory engine.
//!
//! Implements [`GenerationBackend`] over the `generateContent` REST API.

pub mod client;
pub mod types;

use async_trait::async_trait;
use memoria_config::model::GeminiConfig;
use memoria_core::{GenerationBackend, MemoriaError};
use tracing::info;

use crate::client::GeminiClient;
use crate::types::GenerateContentRequest;

/// Environment variable consulted when `gemini.api_key` is unset.
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Gemini backend implementing [`GenerationBackend`].
///
/// API key resolution order: config -> `GOOGLE_API_KEY` env var -> error.
pub struct GeminiBackend {
    client: GeminiClient,
}

impl GeminiBackend {
    /// Creates a backend from configuration.
    ///
    /// Fails with [`MemoriaError::Config`] when no API key is available.
    pub fn from_config(config: &GeminiConfig) -> Result<Self, MemoriaError> {
        let api_key = resolve_api_key(&config.api_key)?;
        let client = GeminiClient::new(&api_key, config.model.clone(), config.base_url.clone())?;
        info!(model = %config.model, "Gemini backend initialized");
        Ok(Self { client })
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(
        &self,
        system_instruction: &str,
        user_input: &str,
    ) -> Result<String, MemoriaError> {
        let request = GenerateContentRequest::single_turn(system_instruction, user_input);
        let response = self.client.generate_content(&request).await?;
        response
            .first_text()
            .ok_or_else(|| MemoriaError::provider("Gemini response contained no candidates"))
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
            "Gemini API key not found. Set gemini.api_key in config or {API_KEY_ENV} environment variable."
        ))),
    }
}
