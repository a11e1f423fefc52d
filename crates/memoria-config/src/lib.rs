// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Memoria memory engine.
//!
//! Provides TOML configuration parsing with strict validation (`deny_unknown_fields`),
//! XDG file hierarchy lookup, `MEMORIA_*` environment overrides, and diagnostic
//! error rendering with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use memoria_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("Archive: {}", config.storage.database_path);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::MemoriaConfig;

/// Load configuration from the XDG hierarchy and validate it.
///
/// Figment errors are converted to diagnostics with source spans taken from
/// whichever config files exist on disk.
pub fn load_and_validate() -> Result<MemoriaConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            tracing::debug!(
                database_path = %config.storage.database_path,
                tiers = ?config.tiers.order,
                "configuration loaded"
            );
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(
            err,
            &collect_toml_sources(),
        )),
    }
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<MemoriaConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Read every config file in the lookup hierarchy that exists.
fn collect_toml_sources() -> Vec<(String, String)> {
    let mut candidates = Vec::new();
    if let Ok(dir) = std::env::current_dir() {
        candidates.push(dir.join("memoria.toml"));
    }
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("memoria").join("memoria.toml"));
    }
    candidates.push(std::path::PathBuf::from("/etc/memoria/memoria.toml"));

    candidates
        .into_iter()
        .filter_map(|path| {
            std::fs::read_to_string(&path)
                .ok()
                .map(|content| (path.display().to_string(), content))
        })
        .collect()
}
