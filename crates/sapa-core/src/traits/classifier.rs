// SPDX-FileCopyrightText: 2026 Sapa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent classifier adapter trait.

use async_trait::async_trait;

use crate::error::SapaError;
use crate::types::{Classification, ModelInfo, TrainingExample};

/// Adapter wrapping an external text-classification capability.
///
/// One instance is shared process-wide: `classify`
/// calls never block each other, while `retrain` is serialized against
/// itself by the implementation. During a retrain, concurrent `classify`
/// calls may observe the previously served model; this brief inconsistency
/// window is a deliberate trade-off since retraining is an infrequent,
/// administrator-triggered operation.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    /// Classify a message into an intent with a confidence in [0, 1].
    ///
    /// `text` must be non-empty after trimming; the caller rejects empty
    /// input before it reaches this adapter. Results are only valid once
    /// the adapter has a trained model; implementations train from their
    /// base corpus on first use if no persisted model can be loaded.
    async fn classify(&self, text: &str) -> Result<Classification, SapaError>;

    /// Rebuild the model from the base corpus plus `extra` examples and
    /// persist it, atomically replacing the served model. On failure the
    /// previously served model remains in effect.
    async fn retrain(&self, extra: &[TrainingExample]) -> Result<(), SapaError>;

    /// Trained-state, known intents, and corpus size for observability.
    async fn model_info(&self) -> ModelInfo;
}
