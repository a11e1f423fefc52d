// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Memoria memory engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Names of the generation tiers this build knows how to construct.
pub const KNOWN_TIERS: &[&str] = &["gemini", "openai", "ollama"];

/// Top-level Memoria configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoriaConfig {
    /// Agent identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Conversation accumulation, flush, and retrieval settings.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Conflict heuristic constants.
    #[serde(default)]
    pub conflict: ConflictConfig,

    /// Warm storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Tier order and per-tier timeout.
    #[serde(default)]
    pub tiers: TierConfig,

    /// Google Gemini settings (tier 1 by default).
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// OpenAI settings (tier 2 by default).
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Local Ollama settings (tier 3 by default).
    #[serde(default)]
    pub ollama: OllamaConfig,
}

/// Agent identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the agent.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "memoria".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Memory lifecycle configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// A flush runs when the rendered history's token count strictly exceeds this.
    #[serde(default = "default_flush_threshold_tokens")]
    pub flush_threshold_tokens: usize,

    /// Number of most recent turns kept in history after a flush.
    #[serde(default = "default_history_keep_turns")]
    pub history_keep_turns: usize,

    /// Maximum number of facts injected as grounding context per turn.
    #[serde(default = "default_retrieval_limit")]
    pub retrieval_limit: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            flush_threshold_tokens: default_flush_threshold_tokens(),
            history_keep_turns: default_history_keep_turns(),
            retrieval_limit: default_retrieval_limit(),
        }
    }
}

fn default_flush_threshold_tokens() -> usize {
    1500
}

fn default_history_keep_turns() -> usize {
    2
}

fn default_retrieval_limit() -> usize {
    3
}

/// Keyword-overlap conflict heuristic configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConflictConfig {
    /// Words must be strictly longer than this (in characters) to count as keywords.
    #[serde(default = "default_min_keyword_len")]
    pub min_keyword_len: usize,

    /// How many leading keywords form the search query.
    #[serde(default = "default_max_keywords")]
    pub max_keywords: usize,

    /// How many archived records are compared against the candidate fact.
    #[serde(default = "default_conflict_search_limit")]
    pub search_limit: usize,
}

impl Default for ConflictConfig {
    fn default() -> Self {
        Self {
            min_keyword_len: default_min_keyword_len(),
            max_keywords: default_max_keywords(),
            search_limit: default_conflict_search_limit(),
        }
    }
}

fn default_min_keyword_len() -> usize {
    4
}

fn default_max_keywords() -> usize {
    3
}

fn default_conflict_search_limit() -> usize {
    1
}

/// Warm storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite archive file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("memoria").join("memoria_vault.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("memoria_vault.db"))
        .to_string_lossy()
        .into_owned()
}

/// Generation tier configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TierConfig {
    /// Tier names in preference order. Each must be one of [`KNOWN_TIERS`].
    #[serde(default = "default_tier_order")]
    pub order: Vec<String>,

    /// Upper bound in seconds on a single tier attempt.
    #[serde(default = "default_tier_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TierConfig {
    fn default() -> Self {
        Self {
            order: default_tier_order(),
            timeout_secs: default_tier_timeout_secs(),
        }
    }
}

fn default_tier_order() -> Vec<String> {
    KNOWN_TIERS.iter().map(|s| s.to_string()).collect()
}

fn default_tier_timeout_secs() -> u64 {
    60
}

/// Google Gemini configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// Gemini API key. `None` falls back to the `GOOGLE_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier.
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// API base URL.
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_gemini_model(),
            base_url: default_gemini_base_url(),
        }
    }
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

/// OpenAI configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// OpenAI API key. `None` falls back to the `OPENAI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier.
    #[serde(default = "default_openai_model")]
    pub model: String,

    /// API base URL.
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_openai_model(),
            base_url: default_openai_base_url(),
        }
    }
}

fn default_openai_model() -> String {
    "gpt-5.1".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com".to_string()
}

/// Local Ollama configuration. No credential is needed.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OllamaConfig {
    /// Ollama server URL.
    #[serde(default = "default_ollama_base_url")]
    pub base_url: String,

    /// Local model tag.
    #[serde(default = "default_ollama_model")]
    pub model: String,

    /// Sampling temperature; kept low for factual extraction.
    #[serde(default = "default_ollama_temperature")]
    pub temperature: f64,

    /// Maximum tokens to generate.
    #[serde(default = "default_ollama_num_predict")]
    pub num_predict: u32,

    /// Stop sequences.
    #[serde(default = "default_ollama_stop")]
    pub stop: Vec<String>,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_base_url(),
            model: default_ollama_model(),
            temperature: default_ollama_temperature(),
            num_predict: default_ollama_num_predict(),
            stop: default_ollama_stop(),
        }
    }
}

fn default_ollama_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "qwen2.5-coder:latest".to_string()
}

fn default_ollama_temperature() -> f64 {
    0.1
}

fn default_ollama_num_predict() -> u32 {
    256
}

fn default_ollama_stop() -> Vec<String> {
    vec!["USER:".to_string(), "ASSISTANT:".to_string()]
}

impl MemoriaConfig {
    /// Returns a copy with every credential replaced by a placeholder, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.gemini.api_key.is_some() {
            copy.gemini.api_key = Some("[REDACTED]".to_string());
        }
        if copy.openai.api_key.is_some() {
            copy.openai.api_key = Some("[REDACTED]".to_string());
        }
        copy
    }
}
