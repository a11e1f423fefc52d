// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for a local Ollama server.

use std::time::Duration;

use memoria_core::MemoriaError;
use tracing::debug;

use crate::types::{ChatRequest, ChatResponse, ErrorResponse};

/// Unauthenticated client for the Ollama REST API.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
}

impl OllamaClient {
    pub fn new(base_url: &str) -> Result<Self, MemoriaError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| MemoriaError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends one non-streaming chat request.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, MemoriaError> {
        let url = format!("{}/api/chat", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| MemoriaError::Provider {
                message: format!("Ollama unreachable at {}: {e}", self.base_url),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, model = %request.model, "Ollama response received");

        let body = response.text().await.map_err(|e| MemoriaError::Provider {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(err) => format!("Ollama error ({status}): {}", err.error),
                Err(_) => format!("Ollama returned {status}: {body}"),
            };
            return Err(MemoriaError::provider(message));
        }

        serde_json::from_str(&body).map_err(|e| MemoriaError::Provider {
            message: format!("failed to parse Ollama response: {e}"),
            source: Some(Box::new(e)),
        })
    }
}
