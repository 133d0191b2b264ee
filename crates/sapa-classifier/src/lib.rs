// SPDX-FileCopyrightText: 2026 Sapa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trainable intent classifier for the Sapa conversational router.
//!
//! A multinomial naive-Bayes model over a compiled-in Indonesian/English
//! corpus, wrapped in the [`sapa_core::traits::IntentClassifier`] adapter
//! trait. The served model is swapped atomically on retrain and persisted
//! as JSON so a restarted process picks up administrator-taught phrases.

pub mod adapter;
pub mod corpus;
pub mod entities;
pub mod model;

pub use adapter::BayesClassifier;
pub use model::BayesModel;
