// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge with "did you mean" suggestions.
//!
//! Converts Figment deserialization errors into miette diagnostics. Unknown
//! keys are matched against the section's valid keys with Jaro-Winkler
//! similarity, and located in the TOML source when the file is known.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity for a key to be offered as a correction.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration error with diagnostic information for rendering.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// An unknown key was found in the configuration.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(memoria::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        suggestion: Option<String>,
        valid_keys: String,
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A configuration value has the wrong type.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(memoria::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
    },

    /// A required configuration key is missing.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(memoria::config::missing_key),
        help("add `{key} = <value>` to your memoria.toml")
    )]
    MissingKey { key: String },

    /// A value deserialized but failed a semantic check.
    #[error("validation error: {message}")]
    #[diagnostic(code(memoria::config::validation))]
    Validation { message: String },

    /// Catch-all for other configuration errors.
    #[error("configuration error: {0}")]
    #[diagnostic(code(memoria::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Convert a `figment::Error` (which may hold several errors) into diagnostics.
///
/// `toml_sources` pairs a file path with its content, used to attach source
/// spans to unknown-key errors.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| match &error.kind {
            Kind::UnknownField(field, expected) => {
                let valid_keys: Vec<&str> = expected.to_vec();
                let section: Vec<String> = error.path.iter().map(|s| s.to_string()).collect();
                let (span, src) = locate_key(&error, &section, field, toml_sources);
                ConfigError::UnknownKey {
                    key: field.clone(),
                    suggestion: suggest_key(field, &valid_keys),
                    valid_keys: valid_keys.join(", "),
                    span,
                    src,
                }
            }
            Kind::MissingField(field) => ConfigError::MissingKey {
                key: field.clone().into_owned(),
            },
            Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                key: error
                    .path
                    .iter()
                    .map(|s| s.to_string())
                    .collect::<Vec<_>>()
                    .join("."),
                detail: format!("found {actual}, expected {expected}"),
                expected: expected.to_string(),
            },
            _ => ConfigError::Other(error.to_string()),
        })
        .collect()
}

/// Find the file an error came from and the span of the offending key in it.
fn locate_key(
    error: &figment::error::Error,
    section: &[String],
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let origin = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|s| match s {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });

    let Some(origin) = origin else {
        return (None, None);
    };
    let Some((path, content)) = toml_sources.iter().find(|(p, _)| *p == origin) else {
        return (None, None);
    };

    match find_key_offset(content, section, field) {
        Some(offset) => (
            Some(SourceSpan::new(offset.into(), field.len())),
            Some(NamedSource::new(path, content.clone())),
        ),
        None => (None, None),
    }
}

/// Find the byte offset of `field` inside the `[section]` table of `content`.
///
/// An empty `section` searches from the start of the document.
pub fn find_key_offset(content: &str, section: &[String], field: &str) -> Option<usize> {
    let start = match section.first() {
        Some(name) => {
            let header = format!("[{name}]");
            content.find(&header)? + header.len()
        }
        None => 0,
    };

    let mut offset = start;
    for line in content[start..].split_inclusive('\n') {
        let trimmed = line.trim_start();
        if trimmed.starts_with('[') && offset != start {
            // Next table reached without a match.
            return None;
        }
        if let Some(after) = trimmed.strip_prefix(field)
            && matches!(after.chars().next(), Some(' ' | '\t' | '='))
        {
            return Some(offset + (line.len() - trimmed.len()));
        }
        offset += line.len();
    }
    None
}

/// Suggest the closest valid key above [`SUGGESTION_THRESHOLD`], if any.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (*key, strsim::jaro_winkler(unknown, key)))
        .filter(|(_, score)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(key, _)| key.to_string())
}

/// Render diagnostics to stderr using miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        match handler.render_report(&mut buf, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{buf}"),
            Err(_) => eprintln!("Error: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_threshold_for_typo() {
        let valid = &["flush_threshold_tokens", "history_keep_turns", "retrieval_limit"];
        assert_eq!(
            suggest_key("flush_treshold_tokens", valid),
            Some("flush_threshold_tokens".to_string())
        );
    }

    #[test]
    fn suggests_api_key() {
        let valid = &["api_key", "model", "base_url"];
        assert_eq!(suggest_key("api_kye", valid), Some("api_key".to_string()));
    }

    #[test]
    fn no_suggestion_for_distant_typo() {
        let valid = &["name", "log_level"];
        assert_eq!(suggest_key("zzzzzz", valid), None);
    }

    #[test]
    fn find_key_offset_in_section() {
        let content = "[agent]\nname = \"x\"\n\n[memory]\nretrieval_limt = 3\n";
        let section = vec!["memory".to_string()];
        let offset = find_key_offset(content, &section, "retrieval_limt").unwrap();
        assert_eq!(&content[offset..offset + 14], "retrieval_limt");
    }

    #[test]
    fn find_key_offset_stops_at_next_table() {
        let content = "[agent]\nname = \"x\"\n[memory]\nlog_levl = 1\n";
        let section = vec!["agent".to_string()];
        assert_eq!(find_key_offset(content, &section, "log_levl"), None);
    }

    #[test]
    fn find_key_offset_missing_section() {
        let content = "[agent]\nname = \"x\"\n";
        let section = vec!["ollama".to_string()];
        assert_eq!(find_key_offset(content, &section, "name"), None);
    }
}
