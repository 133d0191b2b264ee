// SPDX-FileCopyrightText: 2026 Sapa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common domain types used across the Sapa workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Role of an authenticated caller. Established by the external identity
/// layer; responders use it to scope every query they issue.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Teacher,
    Student,
}

/// Profile of the calling user, loaded once per turn from the identity tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub role: UserRole,
    /// Class the user belongs to (students) or `None`.
    pub class_id: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// A structured value extracted alongside an intent (date, number, etc.).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Entity kind: "date", "day", "number", "period".
    pub kind: String,
    pub value: String,
}

/// Output of the intent classifier for one message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    /// Name of the top intent guess.
    pub intent: String,
    /// Classifier certainty in [0.0, 1.0].
    pub confidence: f64,
    /// Entities extracted from the message text.
    pub entities: Vec<Entity>,
}

/// A named category of user request. `name` is unique and is the join key
/// used by the dispatch table and the canned-response registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
}

/// A pre-authored reply belonging to exactly one intent. Higher priority is
/// preferred; equal priorities tie-break on creation time, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CannedResponse {
    pub id: i64,
    pub intent_id: i64,
    pub text: String,
    pub priority: i64,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
}

/// One logged request/response exchange. Exactly one turn is appended per
/// processed message, on every branch. `intent_id` is nullable: it is set at
/// write time and nulled if the owning intent is later deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub id: i64,
    pub user_id: String,
    pub message: String,
    pub reply: String,
    pub intent_id: Option<i64>,
    pub confidence: f64,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
}

/// A (text, intent) pair fed to the classifier on retrain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub text: String,
    pub intent: String,
}

impl TrainingExample {
    pub fn new(text: impl Into<String>, intent: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            intent: intent.into(),
        }
    }

    /// A training example must have non-empty text and intent after trimming.
    pub fn is_valid(&self) -> bool {
        !self.text.trim().is_empty() && !self.intent.trim().is_empty()
    }
}

/// Aggregate conversation statistics over an optional date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnStats {
    pub total_turns: i64,
    /// Average confidence across counted turns; 0.0 when there are none.
    pub avg_confidence: f64,
    /// (intent name, turn count), most frequent first. Turns whose intent
    /// was deleted are grouped under "(deleted)".
    pub per_intent: Vec<(String, i64)>,
}

/// Observability snapshot of the classifier's trained state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub trained: bool,
    /// Known intent names, sorted.
    pub intents: Vec<String>,
    pub intent_count: usize,
    /// Number of training examples in the working corpus.
    pub example_count: usize,
}
