// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Gemini `generateContent` API.

use std::time::Duration;

use memoria_core::MemoriaError;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use crate::types::{ApiErrorResponse, GenerateContentRequest, GenerateContentResponse};

/// HTTP client for Gemini API communication.
///
/// Sends exactly one request per call. Fallback across providers is the
/// caller's concern.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Creates a client authenticated with `api_key` via the `x-goog-api-key` header.
    pub fn new(api_key: &str, model: String, base_url: String) -> Result<Self, MemoriaError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(api_key).map_err(|e| {
                MemoriaError::Config(format!("invalid Gemini API key header value: {e}"))
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

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Sends a `generateContent` request and parses the response.
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, MemoriaError> {
        let response = self
            .client
            .post(self.endpoint())
            .json(request)
            .send()
            .await
            .map_err(|e| MemoriaError::Provider {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, model = %self.model, "Gemini response received");

        let body = response.text().await.map_err(|e| MemoriaError::Provider {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!(
                    "Gemini API error ({} {}): {}",
                    api_err.error.code, api_err.error.status, api_err.error.message
                ),
                Err(_) => format!("API returned {status}: {body}"),
            };
            return Err(MemoriaError::provider(message));
        }

        serde_json::from_str(&body).map_err(|e| MemoriaError::Provider {
            message: format!("failed to parse Gemini response: {e}"),
            source: Some(Box::new(e)),
        })
    }
}
