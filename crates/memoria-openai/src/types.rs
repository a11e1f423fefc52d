// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI Chat Completions request/response types.

use serde::{Deserialize, Serialize};

/// Request body for `POST /v1/chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

impl ChatCompletionRequest {
    /// A system message followed by one user message.
    pub fn single_turn(model: &str, system_instruction: &str, user_input: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![
                ChatMessage::new("system", system_instruction),
                ChatMessage::new("user", user_input),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    /// `null` for some assistant replies (e.g. refusals or tool calls).
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatMessage {
    pub fn new(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: Some(content.to_string()),
        }
    }
}

/// Response body of a non-streaming chat completion.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

impl ChatCompletionResponse {
    /// Content of the first choice's message, if present.
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first()?.message.content.as_deref()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChatMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Error envelope returned on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub message: String,
    #[serde(rename = "type", default)]
    pub type_: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_has_system_then_user() {
        let json =
            serde_json::to_value(ChatCompletionRequest::single_turn("gpt-5.1", "sys", "hi")).unwrap();
        assert_eq!(json["model"], "gpt-5.1");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "sys");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "hi");
    }

    #[test]
    fn null_content_parses_as_none() {
        let body = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": null}, "finish_reason": "stop"}]
        });
        let response: ChatCompletionResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.first_content(), None);
    }
}
