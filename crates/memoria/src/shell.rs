// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `memoria chat` command implementation.
//!
//! Launches an interactive REPL with readline history. Every line goes
//! through one orchestrator, which grounds it with retrieved facts and
//! archives the conversation once it grows past the token threshold.

use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use memoria_agent::{Cl100kCounter, FlushReport, MemoryOrchestrator, OrchestratorSettings};
use memoria_config::MemoriaConfig;
use memoria_core::MemoriaError;
use memoria_memory::SqliteMemoryStore;
use memoria_resilience::TieredGenerationClient;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{info, warn};

use crate::tiers::build_tiers;

const PROMPT: &str = "User: ";

/// What a line typed at the prompt asks for.
#[derive(Debug, PartialEq, Eq)]
enum ShellInput<'a> {
    Exit,
    Blank,
    Flush,
    Message(&'a str),
}

fn parse_input(line: &str) -> ShellInput<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        ShellInput::Blank
    } else if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
        ShellInput::Exit
    } else if trimmed == "/flush" {
        ShellInput::Flush
    } else {
        ShellInput::Message(trimmed)
    }
}

fn format_report(report: &FlushReport) -> String {
    format!(
        "archived {} of {} facts ({} conflicts)",
        report.archived, report.extracted, report.conflicts
    )
}

/// Runs the `memoria chat` interactive REPL.
pub async fn run_chat(config: MemoriaConfig) -> Result<(), MemoriaError> {
    let store = SqliteMemoryStore::open(&config.storage.database_path).await?;

    let tiers = build_tiers(&config);
    if tiers.is_empty() {
        warn!("no generation tier available, responses will use offline mode");
    }
    let timeout = Duration::from_secs(config.tiers.timeout_secs);
    let client = TieredGenerationClient::new(tiers, timeout);

    let mut orchestrator = MemoryOrchestrator::new(
        client,
        Arc::new(store),
        Arc::new(Cl100kCounter::new()?),
        OrchestratorSettings::from_config(&config),
    );

    let mut rl = DefaultEditor::new()
        .map_err(|e| MemoriaError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "--- MEMORIA SYSTEM ONLINE ---".bold().green());
    println!(
        "Type {} to leave, {} to archive the conversation now.\n",
        "exit".yellow(),
        "/flush".yellow()
    );

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => match parse_input(&line) {
                ShellInput::Exit => break,
                ShellInput::Blank => continue,
                ShellInput::Flush => {
                    let report = orchestrator.flush().await;
                    println!("{}", format_report(&report).dimmed());
                }
                ShellInput::Message(message) => {
                    let _ = rl.add_history_entry(message);
                    let response = orchestrator.chat(message).await;
                    println!("{} {response}", "AI:".cyan().bold());
                }
            },
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C
                break;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D
                break;
            }
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    info!(turns = orchestrator.history().len(), "chat session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_words_are_case_insensitive() {
        assert_eq!(parse_input("exit"), ShellInput::Exit);
        assert_eq!(parse_input("  QUIT \n"), ShellInput::Exit);
        assert_eq!(parse_input("Exit"), ShellInput::Exit);
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(parse_input(""), ShellInput::Blank);
        assert_eq!(parse_input("   \t"), ShellInput::Blank);
    }

    #[test]
    fn flush_command_is_recognized() {
        assert_eq!(parse_input("/flush"), ShellInput::Flush);
    }

    #[test]
    fn other_lines_are_messages() {
        assert_eq!(
            parse_input("  I'm going to Bali in December "),
            ShellInput::Message("I'm going to Bali in December")
        );
        assert_eq!(parse_input("exit now"), ShellInput::Message("exit now"));
    }

    #[test]
    fn report_formatting() {
        let report = FlushReport {
            extracted: 3,
            conflicts: 1,
            archived: 2,
        };
        assert_eq!(format_report(&report), "archived 2 of 3 facts (1 conflicts)");
    }
}
