// SPDX-FileCopyrightText: 2026 Sapa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Sapa conversational query router.
//!
//! This crate provides the foundational error type, domain types, and the
//! classifier adapter trait used throughout the Sapa workspace.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::SapaError;
pub use traits::IntentClassifier;
pub use types::{
    CannedResponse, Classification, ConversationTurn, Entity, Intent, ModelInfo,
    TrainingExample, TurnStats, UserProfile, UserRole,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sapa_error_has_all_variants() {
        // Verify all 8 error variants exist and can be constructed.
        let _config = SapaError::Config("test".into());
        let _invalid = SapaError::InvalidInput("empty message".into());
        let _not_found = SapaError::NotFound {
            kind: "intent",
            id: "42".into(),
        };
        let _conflict = SapaError::Conflict("greeting".into());
        let _classification = SapaError::Classification("model not trained".into());
        let _retrain = SapaError::Retrain("invalid example".into());
        let _storage = SapaError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _internal = SapaError::Internal("test".into());
    }

    #[test]
    fn not_found_error_display() {
        let err = SapaError::NotFound {
            kind: "intent",
            id: "7".into(),
        };
        assert_eq!(err.to_string(), "intent not found: 7");
    }

    #[test]
    fn conflict_error_display() {
        let err = SapaError::Conflict("jadwal".into());
        assert!(err.to_string().contains("already exists"));
    }
}
