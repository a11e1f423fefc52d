// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde attributes cannot express: positive
//! thresholds and limits, a usable archive path, and a tier order made of
//! known, unique names.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::{KNOWN_TIERS, MemoriaConfig};

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every violation instead of stopping at the first one.
pub fn validate_config(config: &MemoriaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let positive: [(&str, u64); 7] = [
        (
            "memory.flush_threshold_tokens",
            config.memory.flush_threshold_tokens as u64,
        ),
        (
            "memory.history_keep_turns",
            config.memory.history_keep_turns as u64,
        ),
        ("memory.retrieval_limit", config.memory.retrieval_limit as u64),
        ("conflict.max_keywords", config.conflict.max_keywords as u64),
        ("conflict.search_limit", config.conflict.search_limit as u64),
        ("tiers.timeout_secs", config.tiers.timeout_secs),
        ("ollama.num_predict", u64::from(config.ollama.num_predict)),
    ];
    for (key, value) in positive {
        if value == 0 {
            errors.push(validation(format!("{key} must be greater than 0")));
        }
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(validation("storage.database_path must not be empty"));
    }

    if config.tiers.order.is_empty() {
        errors.push(validation("tiers.order must name at least one tier"));
    }

    let mut seen = HashSet::new();
    for tier in &config.tiers.order {
        if !KNOWN_TIERS.contains(&tier.as_str()) {
            errors.push(validation(format!(
                "tiers.order contains unknown tier `{tier}` (expected one of: {})",
                KNOWN_TIERS.join(", ")
            )));
        } else if !seen.insert(tier.as_str()) {
            errors.push(validation(format!(
                "tiers.order lists `{tier}` more than once"
            )));
        }
    }

    let temperature = config.ollama.temperature;
    if !(0.0..=2.0).contains(&temperature) {
        errors.push(validation(format!(
            "ollama.temperature must be between 0.0 and 2.0, got {temperature}"
        )));
    }

    for (key, url) in [
        ("gemini.base_url", &config.gemini.base_url),
        ("openai.base_url", &config.openai.base_url),
        ("ollama.base_url", &config.ollama.base_url),
    ] {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(validation(format!(
                "{key} must be an http(s) URL, got `{url}`"
            )));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validation(message: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(errors: &[ConfigError]) -> Vec<String> {
        errors.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&MemoriaConfig::default()).is_ok());
    }

    #[test]
    fn zero_threshold_rejected() {
        let mut config = MemoriaConfig::default();
        config.memory.flush_threshold_tokens = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(messages(&errors)[0].contains("memory.flush_threshold_tokens"));
    }

    #[test]
    fn collects_all_errors() {
        let mut config = MemoriaConfig::default();
        config.memory.history_keep_turns = 0;
        config.conflict.max_keywords = 0;
        config.storage.database_path = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn unknown_tier_rejected() {
        let mut config = MemoriaConfig::default();
        config.tiers.order = vec!["gemini".into(), "claude".into()];
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(messages(&errors)[0].contains("unknown tier `claude`"));
    }

    #[test]
    fn duplicate_tier_rejected() {
        let mut config = MemoriaConfig::default();
        config.tiers.order = vec!["ollama".into(), "ollama".into()];
        let errors = validate_config(&config).unwrap_err();
        assert!(messages(&errors)[0].contains("more than once"));
    }

    #[test]
    fn empty_tier_order_rejected() {
        let mut config = MemoriaConfig::default();
        config.tiers.order.clear();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn single_local_tier_is_valid() {
        let mut config = MemoriaConfig::default();
        config.tiers.order = vec!["ollama".into()];
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn temperature_out_of_range_rejected() {
        let mut config = MemoriaConfig::default();
        config.ollama.temperature = 3.5;
        let errors = validate_config(&config).unwrap_err();
        assert!(messages(&errors)[0].contains("ollama.temperature"));
    }

    #[test]
    fn non_http_base_url_rejected() {
        let mut config = MemoriaConfig::default();
        config.ollama.base_url = "localhost:11434".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(messages(&errors)[0].contains("ollama.base_url"));
    }
}
