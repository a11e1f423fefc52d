// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local Ollama generation backend for the Memoria memory engine.
//!
//! The always-available last tier: no credential, low temperature, short
//! output, and stop sequences that keep the model from role-playing turns.

pub mod client;
pub mod types;

use async_trait::async_trait;
use memoria_config::model::OllamaConfig;
use memoria_core::{GenerationBackend, MemoriaError};
use tracing::info;

use crate::client::OllamaClient;
use crate::types::{ChatOptions, ChatRequest, Message};

/// Ollama backend implementing [`GenerationBackend`].
pub struct OllamaBackend {
    client: OllamaClient,
    model: String,
    options: ChatOptions,
}

impl OllamaBackend {
    pub fn from_config(config: &OllamaConfig) -> Result<Self, MemoriaError> {
        let client = OllamaClient::new(&config.base_url)?;
        info!(model = %config.model, url = %config.base_url, "Ollama backend initialized");
        Ok(Self {
            client,
            model: config.model.clone(),
            options: ChatOptions {
                temperature: config.temperature,
                num_predict: config.num_predict,
                stop: config.stop.clone(),
            },
        })
    }

    fn request(&self, system_instruction: &str, user_input: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message::new("system", system_instruction),
                Message::new("user", user_input),
            ],
            stream: false,
            options: self.options.clone(),
        }
    }
}

#[async_trait]
impl GenerationBackend for OllamaBackend {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate(
        &self,
        system_instruction: &str,
        user_input: &str,
    ) -> Result<String, MemoriaError> {
        let response = self
            .client
            .chat(&self.request(system_instruction, user_input))
            .await?;
        Ok(response.message.content.trim().to_string())
    }
}
