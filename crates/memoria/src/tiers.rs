// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builds the ordered generation tiers from configuration.

use std::sync::Arc;

use memoria_config::MemoriaConfig;
use memoria_core::{GenerationBackend, MemoriaError};
use tracing::{info, warn};

/// Constructs every configured backend in `tiers.order`.
///
/// A backend that cannot be constructed (missing credential, feature not
/// compiled in) is skipped with a warning. The result may be empty.
pub fn build_tiers(config: &MemoriaConfig) -> Vec<Arc<dyn GenerationBackend>> {
    let mut tiers = Vec::new();
    for name in &config.tiers.order {
        match build_backend(name, config) {
            Ok(Some(backend)) => {
                info!(tier = name.as_str(), position = tiers.len() + 1, "generation tier ready");
                tiers.push(backend);
            }
            Ok(None) => {
                warn!(tier = name.as_str(), "backend not compiled in, skipping tier");
            }
            Err(e) => {
                warn!(tier = name.as_str(), error = %e, "backend unavailable, skipping tier");
            }
        }
    }
    tiers
}

#[allow(unused_variables)]
fn build_backend(
    name: &str,
    config: &MemoriaConfig,
) -> Result<Option<Arc<dyn GenerationBackend>>, MemoriaError> {
    let backend: Arc<dyn GenerationBackend> = match name {
        #[cfg(feature = "gemini")]
        "gemini" => Arc::new(memoria_gemini::GeminiBackend::from_config(&config.gemini)?),
        #[cfg(feature = "openai")]
        "openai" => Arc::new(memoria_openai::OpenAiBackend::from_config(&config.openai)?),
        #[cfg(feature = "ollama")]
        "ollama" => Arc::new(memoria_ollama::OllamaBackend::from_config(&config.ollama)?),
        _ => return Ok(None),
    };
    Ok(Some(backend))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_order_builds_no_tiers() {
        let mut config = MemoriaConfig::default();
        config.tiers.order.clear();
        assert!(build_tiers(&config).is_empty());
    }

    #[test]
    #[cfg(feature = "ollama")]
    fn local_tier_needs_no_credential() {
        let mut config = MemoriaConfig::default();
        config.tiers.order = vec!["ollama".to_string()];
        let tiers = build_tiers(&config);
        assert_eq!(tiers.len(), 1);
        assert_eq!(tiers[0].name(), "ollama");
    }

    #[test]
    fn unknown_tier_is_skipped() {
        let mut config = MemoriaConfig::default();
        config.tiers.order = vec!["anthropic".to_string()];
        assert!(build_tiers(&config).is_empty());
    }
}
