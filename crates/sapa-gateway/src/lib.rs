// SPDX-FileCopyrightText: 2026 Sapa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Sapa conversation engine.
//!
//! Exposes the conversation surface (message, history, session, stats) and
//! the admin registry surface (intents, canned responses, training) over
//! axum. Authentication is delegated to an external layer; see `auth`.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, serve, AppState};
