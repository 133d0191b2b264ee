// SPDX-FileCopyrightText: 2026 Sapa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Multinomial naive-Bayes text model with Laplace smoothing.
//!
//! Tokens are lowercased alphanumeric runs. Confidence is the top intent's
//! posterior measured against the runner-up (`p1 / (p1 + p2)`), so an
//! utterance matching one intent's vocabulary scores near 1.0 while a
//! message the model has never seen lands near 0.5 and falls below the
//! confidence gate.

use std::collections::HashMap;

use sapa_core::types::TrainingExample;
use sapa_core::SapaError;
use serde::{Deserialize, Serialize};

/// Split text into lowercase alphanumeric tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// A trained naive-Bayes model. Serializable so the adapter can persist and
/// reload it across process restarts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BayesModel {
    /// intent -> token -> occurrence count.
    token_counts: HashMap<String, HashMap<String, u32>>,
    /// intent -> total token count.
    intent_token_totals: HashMap<String, u32>,
    /// intent -> number of training examples.
    intent_doc_counts: HashMap<String, u32>,
    /// Distinct tokens across the whole corpus.
    vocabulary_size: usize,
    /// Total number of training examples.
    pub example_count: usize,
}

impl BayesModel {
    /// Train a model from scratch. Every example must be valid; the corpus
    /// must be non-empty.
    pub fn train(examples: &[TrainingExample]) -> Result<Self, SapaError> {
        if examples.is_empty() {
            return Err(SapaError::Retrain("training corpus is empty".into()));
        }

        let mut token_counts: HashMap<String, HashMap<String, u32>> = HashMap::new();
        let mut intent_token_totals: HashMap<String, u32> = HashMap::new();
        let mut intent_doc_counts: HashMap<String, u32> = HashMap::new();
        let mut vocabulary: std::collections::HashSet<String> = std::collections::HashSet::new();

        for example in examples {
            if !example.is_valid() {
                return Err(SapaError::Retrain(format!(
                    "invalid training example: text='{}' intent='{}'",
                    example.text, example.intent
                )));
            }
            let intent = example.intent.trim().to_string();
            let tokens = tokenize(&example.text);
            if tokens.is_empty() {
                return Err(SapaError::Retrain(format!(
                    "training example has no usable tokens: '{}'",
                    example.text
                )));
            }

            *intent_doc_counts.entry(intent.clone()).or_default() += 1;
            let counts = token_counts.entry(intent.clone()).or_default();
            for token in tokens {
                vocabulary.insert(token.clone());
                *counts.entry(token).or_default() += 1;
                *intent_token_totals.entry(intent.clone()).or_default() += 1;
            }
        }

        Ok(Self {
            token_counts,
            intent_token_totals,
            intent_doc_counts,
            vocabulary_size: vocabulary.len(),
            example_count: examples.len(),
        })
    }

    /// Known intent names, sorted.
    pub fn intents(&self) -> Vec<String> {
        let mut names: Vec<String> = self.intent_doc_counts.keys().cloned().collect();
        names.sort();
        names
    }

    /// Predict the most likely intent for `text` with a confidence in [0, 1].
    ///
    /// Returns `None` only when the text has no tokens at all.
    pub fn predict(&self, text: &str) -> Option<(String, f64)> {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return None;
        }

        let total_docs: u32 = self.intent_doc_counts.values().sum();
        let vocab = self.vocabulary_size as f64;

        // Log-posterior per intent: log prior + sum of smoothed log likelihoods.
        let mut scored: Vec<(&String, f64)> = self
            .intent_doc_counts
            .iter()
            .map(|(intent, doc_count)| {
                let prior = (*doc_count as f64 / total_docs as f64).ln();
                let token_total =
                    *self.intent_token_totals.get(intent).unwrap_or(&0) as f64;
                let counts = self.token_counts.get(intent);
                let likelihood: f64 = tokens
                    .iter()
                    .map(|token| {
                        let count = counts
                            .and_then(|c| c.get(token))
                            .copied()
                            .unwrap_or(0) as f64;
                        ((count + 1.0) / (token_total + vocab)).ln()
                    })
                    .sum();
                (intent, prior + likelihood)
            })
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let (top_intent, top_score) = scored.first()?;
        let confidence = match scored.get(1) {
            Some((_, second_score)) => {
                // p1 / (p1 + p2) in probability space, computed stably from
                // log scores.
                let delta = (second_score - top_score).exp();
                1.0 / (1.0 + delta)
            }
            // Single-intent corpus: the guess is as certain as it gets.
            None => 1.0,
        };

        Some(((*top_intent).clone(), confidence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::base_examples;

    fn trained() -> BayesModel {
        BayesModel::train(&base_examples()).unwrap()
    }

    #[test]
    fn tokenize_lowercases_and_splits_punctuation() {
        assert_eq!(
            tokenize("Nilai saya, berapa?"),
            vec!["nilai", "saya", "berapa"]
        );
        assert!(tokenize("??!").is_empty());
    }

    #[test]
    fn empty_corpus_is_rejected() {
        assert!(matches!(
            BayesModel::train(&[]),
            Err(SapaError::Retrain(_))
        ));
    }

    #[test]
    fn invalid_example_is_rejected() {
        let err = BayesModel::train(&[TrainingExample::new("  ", "greeting")]);
        assert!(matches!(err, Err(SapaError::Retrain(_))));
    }

    #[test]
    fn greeting_classifies_with_high_confidence() {
        let model = trained();
        let (intent, confidence) = model.predict("halo").unwrap();
        assert_eq!(intent, "greeting");
        assert!(confidence >= 0.6, "got {confidence}");
    }

    #[test]
    fn domain_phrases_classify_correctly() {
        let model = trained();
        for (text, expected) in [
            ("jadwal pelajaran hari ini", "jadwal"),
            ("nilai saya berapa", "nilai"),
            ("tagihan spp saya", "pembayaran"),
            ("hapus riwayat chat", "hapus_riwayat"),
        ] {
            let (intent, confidence) = model.predict(text).unwrap();
            assert_eq!(intent, expected, "for '{text}'");
            assert!(confidence >= 0.6, "'{text}' got {confidence}");
        }
    }

    #[test]
    fn gibberish_scores_low() {
        let model = trained();
        let (_, confidence) = model.predict("xyzzy plugh frobnicate").unwrap();
        assert!(
            confidence < 0.6,
            "unseen vocabulary should not be trusted, got {confidence}"
        );
    }

    #[test]
    fn predict_without_tokens_is_none() {
        let model = trained();
        assert!(model.predict("...").is_none());
    }

    #[test]
    fn model_round_trips_through_json() {
        let model = trained();
        let json = serde_json::to_string(&model).unwrap();
        let restored: BayesModel = serde_json::from_str(&json).unwrap();
        let (intent, _) = restored.predict("jadwal pelajaran hari ini").unwrap();
        assert_eq!(intent, "jadwal");
        assert_eq!(restored.example_count, model.example_count);
    }

    #[test]
    fn added_example_dominates_after_retraining_with_it() {
        let mut examples = base_examples();
        examples.push(TrainingExample::new("kapan libur semester", "informasi"));
        let model = BayesModel::train(&examples).unwrap();
        let (intent, confidence) = model.predict("kapan libur semester").unwrap();
        assert_eq!(intent, "informasi");
        assert!(confidence >= 0.6, "got {confidence}");
    }
}
