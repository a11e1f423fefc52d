// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite FTS5 warm storage.
//!
//! The archive is a single FTS5 table; a record's id is its `rowid`. Every
//! operation opens its own connection, runs one closure on it and drops it,
//! so no connection is held between operations.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use memoria_core::{MemoriaError, MemoryRecord, MemoryStore};
use tokio_rusqlite::Connection;
use tracing::debug;

const SCHEMA: &str = "CREATE VIRTUAL TABLE IF NOT EXISTS memories USING fts5(content);";

/// Helper to convert tokio_rusqlite errors into MemoriaError::Storage.
fn storage_err(e: tokio_rusqlite::Error) -> MemoriaError {
    MemoriaError::Storage {
        source: Box::new(e),
    }
}

/// Append-only fact archive in a SQLite database file.
#[derive(Debug, Clone)]
pub struct SqliteMemoryStore {
    path: PathBuf,
}

impl SqliteMemoryStore {
    /// Opens (creating if needed) the archive at `path` and ensures the schema.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, MemoriaError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| MemoriaError::Storage {
                    source: Box::new(e),
                })?;
        }

        let store = Self { path };
        store
            .connect()
            .await?
            .call(|conn| -> Result<(), rusqlite::Error> { conn.execute_batch(SCHEMA) })
            .await
            .map_err(storage_err)?;
        debug!(path = %store.path.display(), "warm storage ready");
        Ok(store)
    }

    /// Opens an existing archive without creating the file or the schema.
    ///
    /// Used by read-only surfaces so browsing never creates an empty vault.
    pub async fn open_existing(path: impl AsRef<Path>) -> Result<Self, MemoriaError> {
        let path = path.as_ref().to_path_buf();
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(MemoriaError::Storage {
                source: format!("no archive at {}", path.display()).into(),
            });
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn connect(&self) -> Result<Connection, MemoriaError> {
        Connection::open(&self.path)
            .await
            .map_err(|e| MemoriaError::Storage {
                source: Box::new(e),
            })
    }
}

/// Builds an FTS5 `MATCH` expression: each usable term quoted as a string
/// literal, joined with `OR`. Returns `None` when no term has an
/// alphanumeric character.
pub fn fts_query(terms: &[String]) -> Option<String> {
    let quoted: Vec<String> = terms
        .iter()
        .map(|t| t.trim())
        .filter(|t| t.chars().any(char::is_alphanumeric))
        .map(|t| format!("\"{}\"", t.replace('"', "\"\"")))
        .collect();
    if quoted.is_empty() {
        None
    } else {
        Some(quoted.join(" OR "))
    }
}

#[async_trait]
impl MemoryStore for SqliteMemoryStore {
    async fn insert(&self, content: &str) -> Result<i64, MemoriaError> {
        if content.trim().is_empty() {
            return Err(MemoriaError::InvalidInput(
                "memory content must not be blank".into(),
            ));
        }
        let content = content.to_string();
        let id = self
            .connect()
            .await?
            .call(move |conn| -> Result<i64, rusqlite::Error> {
                conn.execute(
                    "INSERT INTO memories (content) VALUES (?1)",
                    rusqlite::params![content],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(storage_err)?;
        debug!(record_id = id, "fact archived");
        Ok(id)
    }

    async fn search(
        &self,
        terms: &[String],
        limit: Option<usize>,
    ) -> Result<Vec<MemoryRecord>, MemoriaError> {
        let Some(query) = fts_query(terms) else {
            return Ok(Vec::new());
        };
        // SQLite treats a negative LIMIT as "no limit".
        let limit = limit.map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX));

        self.connect()
            .await?
            .call(move |conn| -> Result<Vec<MemoryRecord>, rusqlite::Error> {
                let mut stmt = conn.prepare(
                    "SELECT rowid, content FROM memories WHERE memories MATCH ?1 ORDER BY rowid DESC LIMIT ?2",
                )?;
                let records = stmt
                    .query_map(rusqlite::params![query, limit], row_to_record)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(records)
            })
            .await
            .map_err(storage_err)
    }

    async fn list_all(&self) -> Result<Vec<MemoryRecord>, MemoriaError> {
        self.connect()
            .await?
            .call(|conn| -> Result<Vec<MemoryRecord>, rusqlite::Error> {
                let mut stmt =
                    conn.prepare("SELECT rowid, content FROM memories ORDER BY rowid DESC")?;
                let records = stmt
                    .query_map([], row_to_record)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(records)
            })
            .await
            .map_err(storage_err)
    }

    async fn count(&self) -> Result<usize, MemoriaError> {
        let count = self
            .connect()
            .await?
            .call(|conn| -> Result<i64, rusqlite::Error> {
                conn.query_row("SELECT count(*) FROM memories", [], |row| row.get(0))
            })
            .await
            .map_err(storage_err)?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> Result<MemoryRecord, rusqlite::Error> {
    Ok(MemoryRecord {
        id: row.get(0)?,
        content: row.get(1)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_store() -> (tempfile::TempDir, SqliteMemoryStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteMemoryStore::open(dir.path().join("vault.db"))
            .await
            .unwrap();
        (dir, store)
    }

    fn terms(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn fts_query_quotes_and_ors_terms() {
        assert_eq!(
            fts_query(&terms(&["Bali", "December"])).as_deref(),
            Some("\"Bali\" OR \"December\"")
        );
    }

    #[test]
    fn fts_query_escapes_quotes_and_drops_symbol_terms() {
        assert_eq!(
            fts_query(&terms(&["say\"cheese", "--", "*"])).as_deref(),
            Some("\"say\"\"cheese\"")
        );
        assert_eq!(fts_query(&terms(&["?", " "])), None);
        assert_eq!(fts_query(&[]), None);
    }

    #[tokio::test]
    async fn insert_then_search_case_insensitive() {
        let (_dir, store) = temp_store().await;
        let id = store.insert("Trip to Bali in December").await.unwrap();

        let hits = store.search(&terms(&["bali"]), None).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, id);
        assert_eq!(hits[0].content, "Trip to Bali in December");
    }

    #[tokio::test]
    async fn search_is_or_and_most_recent_first() {
        let (_dir, store) = temp_store().await;
        let first = store.insert("User's dog is named Max").await.unwrap();
        store.insert("User prefers dark mode").await.unwrap();
        let third = store.insert("Trip to Bali in December").await.unwrap();

        let hits = store
            .search(&terms(&["december", "max"]), None)
            .await
            .unwrap();
        let ids: Vec<i64> = hits.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![third, first]);
    }

    #[tokio::test]
    async fn search_applies_limit() {
        let (_dir, store) = temp_store().await;
        for n in 0..5 {
            store.insert(&format!("Bali note number {n}")).await.unwrap();
        }
        let hits = store.search(&terms(&["bali"]), Some(2)).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].content, "Bali note number 4");
    }

    #[tokio::test]
    async fn search_without_match_is_empty() {
        let (_dir, store) = temp_store().await;
        assert!(
            store
                .search(&terms(&["nonexistent"]), None)
                .await
                .unwrap()
                .is_empty()
        );
        store.insert("Trip to Paris in December").await.unwrap();
        assert!(
            store
                .search(&terms(&["nonexistent"]), None)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn fts_operators_in_terms_are_literal() {
        let (_dir, store) = temp_store().await;
        store.insert("Meeting notes about NEAR protocol").await.unwrap();
        // Bare OR/NEAR/AND would be FTS5 syntax errors without quoting.
        let hits = store
            .search(&terms(&["NEAR", "OR", "AND"]), None)
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn list_all_and_count() {
        let (_dir, store) = temp_store().await;
        assert_eq!(store.count().await.unwrap(), 0);
        store.insert("first fact here").await.unwrap();
        store.insert("[CONFLICT] second fact here").await.unwrap();

        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].is_conflicted());
        assert_eq!(all[1].content, "first fact here");
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn blank_insert_is_rejected() {
        let (_dir, store) = temp_store().await;
        let err = store.insert("   ").await.unwrap_err();
        assert!(matches!(err, MemoriaError::InvalidInput(_)));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn reopen_preserves_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("vault.db");
        {
            let store = SqliteMemoryStore::open(&path).await.unwrap();
            store.insert("User's dog is named Max").await.unwrap();
        }
        let store = SqliteMemoryStore::open(&path).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);

        let existing = SqliteMemoryStore::open_existing(&path).await.unwrap();
        assert_eq!(existing.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn open_existing_rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(
            SqliteMemoryStore::open_existing(dir.path().join("absent.db"))
                .await
                .is_err()
        );
    }
}
