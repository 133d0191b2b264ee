// SPDX-FileCopyrightText: 2026 Sapa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Sapa conversational router.

use thiserror::Error;

/// The primary error type used across all Sapa crates.
#[derive(Debug, Error)]
pub enum SapaError {
    /// Configuration errors (invalid TOML, missing required fields, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Client sent something unusable (empty message, malformed admin payload).
    /// Rejected before classification; no conversation turn is logged.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Operating on an unknown intent, response, or user.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Duplicate intent name.
    #[error("conflict: intent '{0}' already exists")]
    Conflict(String),

    /// The classifier failed during classify. The engine catches this and
    /// degrades the turn to the low-confidence path instead of failing it.
    #[error("classification failed: {0}")]
    Classification(String),

    /// Retraining failed; the previously served model remains in effect.
    #[error("retrain failed: {0}")]
    Retrain(String),

    /// Storage backend errors (database connection, query failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
