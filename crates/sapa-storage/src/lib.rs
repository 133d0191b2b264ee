// SPDX-FileCopyrightText: 2026 Sapa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Sapa conversational router.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a single-writer
//! concurrency model via `tokio-rusqlite`, and typed query modules for the
//! intent registry, the canned-response registry, the conversation log, and
//! scoped reads over the operational school tables.

pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;
pub mod seed;

pub use database::Database;
pub use models::*;
