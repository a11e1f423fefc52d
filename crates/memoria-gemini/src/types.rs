// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gemini `generateContent` request/response types.

use serde::{Deserialize, Serialize};

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub system_instruction: Content,
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// A single-turn request: one system instruction, one user message.
    pub fn single_turn(system_instruction: &str, user_input: &str) -> Self {
        Self {
            system_instruction: Content {
                role: None,
                parts: vec![Part::text(system_instruction)],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part::text(user_input)],
            }],
        }
    }
}

/// A role-tagged list of parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// One content part. Only text parts are used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Part {
    pub fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
        }
    }
}

/// Response body of `generateContent`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, if it has any.
    pub fn first_text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        Some(text)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
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
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}
