// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `memoria memories` command implementation.
//!
//! Read-only browsing of warm storage: list, keyword search and count.
//! A database that does not exist yet is reported as empty and is never
//! created by these commands.

use std::io::IsTerminal;
use std::path::Path;

use clap::Subcommand;
use colored::Colorize;
use memoria_config::MemoriaConfig;
use memoria_core::{CONFLICT_TAG, MemoriaError, MemoryRecord, MemoryStore};
use memoria_memory::{SqliteMemoryStore, query_terms};

const EMPTY_HINT: &str = "No memories found. Chat first to trigger a flush!";

/// `memoria memories` subcommands.
#[derive(Subcommand, Debug)]
pub enum MemoriesCommand {
    /// List every archived fact, most recent first.
    List {
        /// Output the records as JSON.
        #[arg(long)]
        json: bool,
        /// Disable colors.
        #[arg(long)]
        plain: bool,
    },
    /// Search archived facts matching any keyword, most recent first.
    Search {
        #[arg(required = true)]
        keywords: Vec<String>,
        /// Output the records as JSON.
        #[arg(long)]
        json: bool,
        /// Disable colors.
        #[arg(long)]
        plain: bool,
    },
    /// Print the number of archived facts.
    Count,
}

/// Runs a `memoria memories` subcommand.
pub async fn run_memories(
    config: &MemoriaConfig,
    command: MemoriesCommand,
) -> Result<(), MemoriaError> {
    let store = open_store(Path::new(&config.storage.database_path)).await?;

    match command {
        MemoriesCommand::List { json, plain } => {
            let records = match &store {
                Some(store) => store.list_all().await?,
                None => Vec::new(),
            };
            print_records(&records, json, plain);
            if !json && !records.is_empty() {
                println!("Total facts archived: {}", records.len());
            }
        }
        MemoriesCommand::Search {
            keywords,
            json,
            plain,
        } => {
            let terms = query_terms(&keywords.join(" "));
            let records = match &store {
                Some(store) => store.search(&terms, None).await?,
                None => Vec::new(),
            };
            print_records(&records, json, plain);
        }
        MemoriesCommand::Count => {
            let count = match &store {
                Some(store) => store.count().await?,
                None => 0,
            };
            println!("{count}");
        }
    }

    Ok(())
}

async fn open_store(path: &Path) -> Result<Option<SqliteMemoryStore>, MemoriaError> {
    if path.exists() {
        SqliteMemoryStore::open_existing(path).await.map(Some)
    } else {
        Ok(None)
    }
}

fn print_records(records: &[MemoryRecord], json: bool, plain: bool) {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(records).unwrap_or_else(|_| "[]".to_string())
        );
        return;
    }

    if records.is_empty() {
        println!("{EMPTY_HINT}");
        return;
    }

    let use_color = !plain && std::io::stdout().is_terminal();
    for record in records {
        println!("{}", format_record(record, use_color));
    }
}

/// Renders one record as a `Fact #<id>` header followed by its content.
fn format_record(record: &MemoryRecord, use_color: bool) -> String {
    let header = format!("Fact #{}", record.id);
    if !use_color {
        return format!("{header}\n  {}\n", record.content);
    }

    let content = if record.is_conflicted() {
        format!("{}{}", CONFLICT_TAG.yellow(), record.fact())
    } else {
        record.content.clone()
    };
    format!("{}\n  {content}\n", header.bold())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, content: &str) -> MemoryRecord {
        MemoryRecord {
            id,
            content: content.to_string(),
        }
    }

    #[test]
    fn plain_record_format() {
        assert_eq!(
            format_record(&record(7, "Trip to Bali in December"), false),
            "Fact #7\n  Trip to Bali in December\n"
        );
    }

    #[test]
    fn plain_format_keeps_conflict_tag() {
        let formatted = format_record(&record(2, "[CONFLICT] Lives in Rome"), false);
        assert!(formatted.contains("[CONFLICT] Lives in Rome"));
    }

    #[test]
    fn records_serialize_as_json() {
        let json = serde_json::to_string(&[record(1, "User's dog is named Max")]).unwrap();
        assert_eq!(json, r#"[{"id":1,"content":"User's dog is named Max"}]"#);
    }

    #[tokio::test]
    async fn missing_database_is_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memoria_vault.db");
        assert!(open_store(&path).await.unwrap().is_none());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn existing_database_is_opened() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memoria_vault.db");
        let store = SqliteMemoryStore::open(&path).await.unwrap();
        store.insert("Trip to Bali in December").await.unwrap();

        let reopened = open_store(&path).await.unwrap().unwrap();
        assert_eq!(reopened.count().await.unwrap(), 1);
    }
}
