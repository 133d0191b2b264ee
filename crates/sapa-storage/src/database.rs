// SPDX-FileCopyrightText: 2026 Sapa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. The `Database` struct IS the single writer: query modules accept
//! `&Database` and call through `connection().call()`. Do NOT create
//! additional Connection instances for writes.

use sapa_core::SapaError;
use tokio_rusqlite::Connection;
use tracing::debug;

use crate::migrations;

/// Convert a tokio-rusqlite error into `SapaError`. The usual case is a
/// `rusqlite::Error` surfacing from inside a `call` closure; channel-level
/// failures (worker thread gone) map to `Internal`.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> SapaError {
    match e {
        tokio_rusqlite::Error::Error(inner) => SapaError::Storage {
            source: Box::new(inner),
        },
        other => SapaError::Internal(format!("database worker error: {other}")),
    }
}

/// Handle to the single SQLite connection shared by all query modules.
/// Cloning is cheap; clones share the same background writer thread.
#[derive(Clone)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at `path` in WAL mode, apply PRAGMAs,
    /// and run all pending migrations.
    pub async fn open(path: &str) -> Result<Self, SapaError> {
        Self::open_with(path, true).await
    }

    /// Open with an explicit journal mode choice. `wal_mode = false` keeps
    /// SQLite's default rollback journal.
    pub async fn open_with(path: &str, wal_mode: bool) -> Result<Self, SapaError> {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    SapaError::Storage {
                        source: Box::new(e),
                    }
                })?;
            }
        }

        let conn = Connection::open(path).await.map_err(|e| SapaError::Storage {
            source: Box::new(e),
        })?;

        let journal_mode = if wal_mode { "WAL" } else { "DELETE" };
        conn.call(move |conn| {
            conn.pragma_update(None, "journal_mode", journal_mode)?;
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            conn.pragma_update(None, "foreign_keys", "ON")?;
            conn.pragma_update(None, "busy_timeout", 5000)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        conn.call(migrations::run_migrations)
            .await
            .map_err(|e| match e {
                tokio_rusqlite::Error::Error(inner) => SapaError::Storage {
                    source: Box::new(inner),
                },
                other => SapaError::Internal(format!("database worker error: {other}")),
            })?;

        debug!(path, wal_mode, "database opened and migrated");
        Ok(Self { conn })
    }

    /// The shared tokio-rusqlite connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Checkpoint the WAL and release the connection.
    pub async fn close(&self) -> Result<(), SapaError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}
