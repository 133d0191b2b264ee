// SPDX-FileCopyrightText: 2026 Sapa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation routing for Sapa: the confidence gate, the intent dispatch
//! table, the built-in domain responders, and the engine that threads one
//! message through all of them and into the conversation log.

pub mod dispatch;
pub mod engine;
pub mod gate;
pub mod responders;

pub use dispatch::Responder;
pub use engine::{ConversationEngine, EngineReply};
pub use gate::{GateDecision, GatePolicy};
pub use responders::Reply;
