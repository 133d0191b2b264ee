// SPDX-FileCopyrightText: 2026 Sapa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation engine: orchestrates one turn end-to-end.
//!
//! classify -> gate -> dispatch/fallback/escalate -> log. Exactly one
//! conversation turn is appended per processed message, whichever branch the
//! turn takes. Rejected input (empty text, unknown user) is not a processed
//! message and leaves no log entry.

use std::sync::Arc;

use sapa_config::SapaConfig;
use sapa_core::traits::IntentClassifier;
use sapa_core::types::{
    ConversationTurn, Entity, ModelInfo, TrainingExample, TurnStats, UserProfile,
};
use sapa_core::SapaError;
use sapa_storage::queries::{intents, responses, school, turns};
use sapa_storage::Database;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::dispatch;
use crate::gate::{GateDecision, GatePolicy};
use crate::responders::{respond, Reply, ResponderCtx};

/// Intent name recorded when the classifier itself fails on a message.
const UNKNOWN_INTENT: &str = "unknown";

/// Reply when nothing matched: low confidence, or a trusted intent with no
/// responder and no canned response.
const FALLBACK_TEXT: &str =
    "Maaf, saya belum memahami maksud pesanmu. Ketik 'bantuan' untuk melihat apa saja yang bisa saya bantu.";

/// Result of one processed message.
#[derive(Debug, Clone, Serialize)]
pub struct EngineReply {
    pub reply: String,
    pub intent: String,
    pub confidence: f64,
    pub entities: Vec<Entity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

pub struct ConversationEngine {
    db: Database,
    classifier: Arc<dyn IntentClassifier>,
    policy: GatePolicy,
    agent_name: String,
    contact_phone: Option<String>,
    contact_email: Option<String>,
}

impl ConversationEngine {
    pub fn new(db: Database, classifier: Arc<dyn IntentClassifier>, config: &SapaConfig) -> Self {
        Self {
            db,
            classifier,
            policy: GatePolicy::from_config(&config.router),
            agent_name: config.agent.name.clone(),
            contact_phone: config.router.contact_phone.clone(),
            contact_email: config.router.contact_email.clone(),
        }
    }

    /// Process one message from `user_id` and produce a reply.
    pub async fn handle_message(
        &self,
        user_id: &str,
        text: &str,
    ) -> Result<EngineReply, SapaError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SapaError::InvalidInput("message text is empty".into()));
        }

        let profile = school::get_user(&self.db, user_id)
            .await?
            .ok_or_else(|| SapaError::NotFound {
                kind: "user",
                id: user_id.to_string(),
            })?;

        // A classifier failure degrades the turn to the low-confidence path
        // instead of failing it; the caller still gets a reply and the turn
        // is still logged.
        let (intent, confidence, entities) = match self.classifier.classify(text).await {
            Ok(c) => (c.intent, c.confidence, c.entities),
            Err(e) => {
                warn!(user_id, error = %e, "classifier failed, degrading turn");
                (UNKNOWN_INTENT.to_string(), 0.0, Vec::new())
            }
        };

        // The escalation window is the caller's previous turns, read before
        // this turn is appended.
        let recent: Vec<f64> = turns::recent_for_user(&self.db, user_id, self.policy.window)
            .await?
            .iter()
            .map(|t| t.confidence)
            .collect();
        let decision = self.policy.decide(confidence, &recent);
        debug!(user_id, %intent, confidence, ?decision, "gate decision");

        let reply = match decision {
            GateDecision::Dispatch => self.dispatch(&profile, &intent).await?,
            GateDecision::Fallback => Reply::text(FALLBACK_TEXT),
            GateDecision::Escalate => {
                info!(user_id, "escalating to a human contact");
                Reply::text(self.escalation_text(&profile))
            }
        };

        // One log entry per processed message, on every branch. A failure
        // here must not cost the caller their reply.
        let intent_row = intents::find_or_create(&self.db, &intent).await;
        match intent_row {
            Ok(row) => {
                if let Err(e) =
                    turns::append_turn(&self.db, user_id, text, &reply.text, row.id, confidence)
                        .await
                {
                    warn!(user_id, error = %e, "failed to append conversation turn");
                }
            }
            Err(e) => {
                warn!(user_id, %intent, error = %e, "failed to register intent for turn");
            }
        }

        Ok(EngineReply {
            reply: reply.text,
            intent,
            confidence,
            entities,
            payload: reply.payload,
        })
    }

    /// Route a trusted intent: built-in responder if the dispatch table knows
    /// the name, otherwise the canned-response registry, otherwise the
    /// generic fallback text.
    async fn dispatch(&self, profile: &UserProfile, intent: &str) -> Result<Reply, SapaError> {
        if let Some(responder) = dispatch::resolve(intent) {
            let ctx = ResponderCtx {
                db: &self.db,
                profile,
                agent_name: &self.agent_name,
            };
            return respond(responder, &ctx).await;
        }
        if let Some(row) = intents::get_intent_by_name(&self.db, intent).await? {
            if let Some(canned) = responses::best_for_intent(&self.db, row.id).await? {
                return Ok(Reply::text(canned.text));
            }
        }
        Ok(Reply::text(FALLBACK_TEXT))
    }

    fn escalation_text(&self, profile: &UserProfile) -> String {
        let contact = match (&self.contact_phone, &self.contact_email) {
            (Some(phone), Some(email)) => {
                format!("hubungi tata usaha di {phone} atau email {email}")
            }
            (Some(phone), None) => format!("hubungi tata usaha di {phone}"),
            (None, Some(email)) => format!("kirim email ke {email}"),
            (None, None) => "hubungi tata usaha sekolah secara langsung".to_string(),
        };
        format!(
            "Maaf {}, sepertinya saya terus gagal memahami pertanyaanmu. \
             Untuk bantuan lebih lanjut, silakan {contact}.",
            profile.name
        )
    }

    /// Fresh-start hook: clears the caller's history so a new session starts
    /// with an empty escalation window.
    pub async fn begin_session(&self, user_id: &str) -> Result<usize, SapaError> {
        let cleared = turns::clear_for_user(&self.db, user_id).await?;
        debug!(user_id, cleared, "session started fresh");
        Ok(cleared)
    }

    pub async fn history(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<ConversationTurn>, SapaError> {
        turns::history_for_user(&self.db, user_id, Some(limit as i64)).await
    }

    pub async fn clear_history(&self, user_id: &str) -> Result<usize, SapaError> {
        turns::clear_for_user(&self.db, user_id).await
    }

    pub async fn stats(
        &self,
        from: Option<String>,
        to: Option<String>,
    ) -> Result<TurnStats, SapaError> {
        turns::stats(&self.db, from, to).await
    }

    pub async fn retrain(&self, extra: &[TrainingExample]) -> Result<(), SapaError> {
        self.classifier.retrain(extra).await
    }

    pub async fn model_info(&self) -> ModelInfo {
        self.classifier.model_info().await
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}
