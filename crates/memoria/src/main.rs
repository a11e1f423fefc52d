// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memoria - A personal AI with tiered generation and long-term memory.
//!
//! This is the binary entry point for the Memoria memory engine.

mod memories;
mod shell;
mod tiers;

use clap::{Parser, Subcommand};
use colored::Colorize;
use memoria_config::MemoriaConfig;
use memoria_core::MemoriaError;

use crate::memories::MemoriesCommand;

/// Memoria - A personal AI with tiered generation and long-term memory.
#[derive(Parser, Debug)]
#[command(name = "memoria", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch an interactive chat session (default).
    Chat,
    /// Browse archived memories (read-only).
    Memories {
        #[command(subcommand)]
        command: MemoriesCommand,
    },
    /// Print the effective configuration with credentials redacted.
    Config,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup
    let config = match memoria_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            memoria_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);

    if let Err(e) = run(cli.command.unwrap_or(Commands::Chat), config).await {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: MemoriaConfig) -> Result<(), MemoriaError> {
    match command {
        Commands::Chat => shell::run_chat(config).await,
        Commands::Memories { command } => memories::run_memories(&config, command).await,
        Commands::Config => print_config(&config),
    }
}

fn print_config(config: &MemoriaConfig) -> Result<(), MemoriaError> {
    let rendered = toml::to_string_pretty(&config.redacted())
        .map_err(|e| MemoriaError::Internal(format!("failed to render config: {e}")))?;
    print!("{rendered}");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
///
/// Logs go to stderr so they never interleave with responses on stdout.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("memoria={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_loads_config_defaults() {
        let config =
            memoria_config::load_and_validate_str("").expect("default config should be valid");
        assert_eq!(config.agent.name, "memoria");
    }

    #[test]
    fn no_subcommand_means_chat() {
        let cli = Cli::try_parse_from(["memoria"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn memories_search_collects_keywords() {
        let cli =
            Cli::try_parse_from(["memoria", "memories", "search", "Bali", "December"]).unwrap();
        match cli.command {
            Some(Commands::Memories {
                command: MemoriesCommand::Search { keywords, .. },
            }) => assert_eq!(keywords, vec!["Bali", "December"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn memories_search_requires_keywords() {
        assert!(Cli::try_parse_from(["memoria", "memories", "search"]).is_err());
    }

    #[test]
    fn redacted_config_renders_as_toml() {
        let mut config = MemoriaConfig::default();
        config.openai.api_key = Some("sk-secret".to_string());
        let rendered = toml::to_string_pretty(&config.redacted()).unwrap();
        assert!(rendered.contains("[memory]"));
        assert!(!rendered.contains("sk-secret"));
    }
}
