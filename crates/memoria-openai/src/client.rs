// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the OpenAI Chat Completions API.

use std::time::Duration;

use memoria_core::MemoriaError;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use tracing::debug;

use crate::types::{ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse};

/// HTTP client for OpenAI API communication. One request per call.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    /// Creates a client using bearer authentication.
    pub fn new(api_key: &str, model: String, base_url: String) -> Result<Self, MemoriaError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
                MemoriaError::Config(format!("invalid OpenAI API key header value: {e}"))
            })?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| MemoriaError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends a non-streaming chat completion request.
    pub async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, MemoriaError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| MemoriaError::Provider {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, model = %self.model, "OpenAI response received");

        let body = response.text().await.map_err(|e| MemoriaError::Provider {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!(
                    "OpenAI API error ({}): {}",
                    api_err
                        .error
                        .code
                        .or(api_err.error.type_)
                        .unwrap_or_else(|| status.to_string()),
                    api_err.error.message
                ),
                Err(_) => format!("API returned {status}: {body}"),
            };
            return Err(MemoriaError::provider(message));
        }

        serde_json::from_str(&body).map_err(|e| MemoriaError::Provider {
            message: format!("failed to parse OpenAI response: {e}"),
            source: Some(Box::new(e)),
        })
    }
}
