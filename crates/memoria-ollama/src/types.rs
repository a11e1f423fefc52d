// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ollama `/api/chat` request/response types.

use serde::{Deserialize, Serialize};

/// Non-streaming request body for `POST /api/chat`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub stream: bool,
    pub options: ChatOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    #[serde(default)]
    pub content: String,
}

impl Message {
    pub fn new(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: content.to_string(),
        }
    }
}

/// Sampling options forwarded to the model runner.
#[derive(Debug, Clone, Serialize)]
pub struct ChatOptions {
    pub temperature: f64,
    pub num_predict: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
}

/// Response body of a non-streaming chat call.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub message: Message,
    #[serde(default)]
    pub done: bool,
}

/// Error body, e.g. `{"error": "model 'x' not found"}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
