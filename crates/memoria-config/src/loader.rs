// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./memoria.toml` > `~/.config/memoria/memoria.toml` > `/etc/memoria/memoria.toml`
//! with environment variable overrides via `MEMORIA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::MemoriaConfig;

/// Top-level sections that environment variables may address.
const ENV_SECTIONS: &[&str] = &[
    "agent", "memory", "conflict", "storage", "tiers", "gemini", "openai", "ollama",
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/memoria/memoria.toml` (system-wide)
/// 3. `~/.config/memoria/memoria.toml` (user XDG config)
/// 4. `./memoria.toml` (local directory)
/// 5. `MEMORIA_*` environment variables
pub fn load_config() -> Result<MemoriaConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<MemoriaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MemoriaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<MemoriaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MemoriaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(MemoriaConfig::default()))
        .merge(Toml::file("/etc/memoria/memoria.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("memoria/memoria.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("memoria.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `MEMORIA_MEMORY_FLUSH_THRESHOLD_TOKENS` must map to
/// `memory.flush_threshold_tokens`, not `memory.flush.threshold.tokens`.
fn env_provider() -> Env {
    Env::prefixed("MEMORIA_").map(|key| map_env_key(&key.as_str().to_ascii_lowercase()).into())
}

/// Map a lowercased, prefix-stripped env key to its dotted config path.
pub(crate) fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|r| r.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(
            map_env_key("memory_flush_threshold_tokens"),
            "memory.flush_threshold_tokens"
        );
        assert_eq!(map_env_key("openai_api_key"), "openai.api_key");
        assert_eq!(map_env_key("tiers_timeout_secs"), "tiers.timeout_secs");
        assert_eq!(map_env_key("conflict_max_keywords"), "conflict.max_keywords");
    }

    #[test]
    fn unknown_env_section_passes_through() {
        assert_eq!(map_env_key("bogus_key"), "bogus_key");
    }
}
