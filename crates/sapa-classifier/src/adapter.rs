// SPDX-FileCopyrightText: 2026 Sapa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`IntentClassifier`] implementation backed by the naive-Bayes model.
//!
//! The served model lives behind an [`ArcSwapOption`]: `classify` reads it
//! lock-free, `retrain` builds a replacement off to the side and swaps it in
//! only after training and persistence both succeed. A tokio mutex serializes
//! retrains against each other and against first-use initialization.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use sapa_core::traits::IntentClassifier;
use sapa_core::types::{Classification, ModelInfo, TrainingExample};
use sapa_core::SapaError;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::corpus::base_examples;
use crate::entities::extract_entities;
use crate::model::BayesModel;

pub struct BayesClassifier {
    served: ArcSwapOption<BayesModel>,
    /// Serializes retrain and lazy first-train. Never held during classify.
    train_lock: Mutex<()>,
    /// Where the trained model is persisted as JSON, if anywhere.
    model_path: Option<PathBuf>,
}

impl BayesClassifier {
    /// Create an adapter that persists its model at `model_path`. No model is
    /// loaded or trained until the first call that needs one.
    pub fn new(model_path: Option<PathBuf>) -> Self {
        Self {
            served: ArcSwapOption::const_empty(),
            train_lock: Mutex::new(()),
            model_path,
        }
    }

    /// Get the served model, initializing it on first use: load the persisted
    /// model if one exists, otherwise train from the base corpus and persist.
    async fn model(&self) -> Result<Arc<BayesModel>, SapaError> {
        if let Some(model) = self.served.load_full() {
            return Ok(model);
        }

        let _guard = self.train_lock.lock().await;
        // Another caller may have initialized while we waited.
        if let Some(model) = self.served.load_full() {
            return Ok(model);
        }

        let model = match self.load_persisted().await {
            Some(model) => {
                info!(
                    intents = model.intents().len(),
                    examples = model.example_count,
                    "loaded persisted classifier model"
                );
                model
            }
            None => {
                let model = BayesModel::train(&base_examples())?;
                info!(
                    intents = model.intents().len(),
                    examples = model.example_count,
                    "trained classifier from base corpus"
                );
                self.persist(&model).await?;
                model
            }
        };

        let model = Arc::new(model);
        self.served.store(Some(Arc::clone(&model)));
        Ok(model)
    }

    async fn load_persisted(&self) -> Option<BayesModel> {
        let path = self.model_path.as_deref()?;
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read model file");
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(model) => Some(model),
            Err(e) => {
                // Corrupt file: fall back to retraining rather than failing.
                warn!(path = %path.display(), error = %e, "model file is not valid JSON");
                None
            }
        }
    }

    /// Write the model as JSON via a temp file in the same directory, then
    /// rename over the target so readers never see a partial file.
    async fn persist(&self, model: &BayesModel) -> Result<(), SapaError> {
        let Some(path) = self.model_path.as_deref() else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| SapaError::Retrain(format!("create model dir: {e}")))?;
        }
        let json = serde_json::to_vec_pretty(model)
            .map_err(|e| SapaError::Retrain(format!("serialize model: {e}")))?;
        let tmp = tmp_path(path);
        tokio::fs::write(&tmp, &json)
            .await
            .map_err(|e| SapaError::Retrain(format!("write model file: {e}")))?;
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|e| SapaError::Retrain(format!("replace model file: {e}")))?;
        debug!(path = %path.display(), bytes = json.len(), "persisted classifier model");
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".tmp");
    PathBuf::from(os)
}

#[async_trait]
impl IntentClassifier for BayesClassifier {
    async fn classify(&self, text: &str) -> Result<Classification, SapaError> {
        let model = self.model().await?;
        let (intent, confidence) = model
            .predict(text)
            .ok_or_else(|| SapaError::Classification("message has no usable tokens".into()))?;
        debug!(%intent, confidence, "classified message");
        Ok(Classification {
            intent,
            confidence,
            entities: extract_entities(text),
        })
    }

    async fn retrain(&self, extra: &[TrainingExample]) -> Result<(), SapaError> {
        let _guard = self.train_lock.lock().await;

        if let Some(bad) = extra.iter().find(|e| !e.is_valid()) {
            return Err(SapaError::Retrain(format!(
                "invalid training example: text='{}' intent='{}'",
                bad.text, bad.intent
            )));
        }

        let mut examples = base_examples();
        examples.extend_from_slice(extra);
        let model = BayesModel::train(&examples)?;
        self.persist(&model).await?;

        info!(
            extra = extra.len(),
            total = model.example_count,
            intents = model.intents().len(),
            "retrained classifier"
        );
        self.served.store(Some(Arc::new(model)));
        Ok(())
    }

    async fn model_info(&self) -> ModelInfo {
        match self.served.load_full() {
            Some(model) => {
                let intents = model.intents();
                ModelInfo {
                    trained: true,
                    intent_count: intents.len(),
                    example_count: model.example_count,
                    intents,
                }
            }
            None => ModelInfo {
                trained: false,
                intents: Vec::new(),
                intent_count: 0,
                example_count: 0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn classifies_greeting_without_persistence() {
        let classifier = BayesClassifier::new(None);
        let result = classifier.classify("halo").await.unwrap();
        assert_eq!(result.intent, "greeting");
        assert!(result.confidence >= 0.6, "got {}", result.confidence);
    }

    #[tokio::test]
    async fn retrain_teaches_a_new_phrase() {
        let classifier = BayesClassifier::new(None);
        classifier
            .retrain(&[TrainingExample::new("kapan libur semester", "informasi")])
            .await
            .unwrap();
        let result = classifier.classify("kapan libur semester").await.unwrap();
        assert_eq!(result.intent, "informasi");
        assert!(result.confidence >= 0.6, "got {}", result.confidence);
    }

    #[tokio::test]
    async fn model_info_reflects_trained_state() {
        let classifier = BayesClassifier::new(None);
        let before = classifier.model_info().await;
        assert!(!before.trained);
        assert_eq!(before.intent_count, 0);

        classifier.classify("halo").await.unwrap();
        let after = classifier.model_info().await;
        assert!(after.trained);
        assert!(after.intents.contains(&"greeting".to_string()));
        assert_eq!(after.intent_count, after.intents.len());
        assert!(after.example_count > 50);
    }

    #[tokio::test]
    async fn persisted_model_survives_a_new_adapter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");

        let first = BayesClassifier::new(Some(path.clone()));
        first
            .retrain(&[TrainingExample::new("kapan libur semester", "informasi")])
            .await
            .unwrap();
        assert!(path.exists());

        let second = BayesClassifier::new(Some(path));
        let result = second.classify("kapan libur semester").await.unwrap();
        assert_eq!(result.intent, "informasi");
        assert!(result.confidence >= 0.6, "got {}", result.confidence);
    }

    #[tokio::test]
    async fn corrupt_model_file_falls_back_to_base_training() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, b"not json").unwrap();

        let classifier = BayesClassifier::new(Some(path.clone()));
        let result = classifier.classify("halo").await.unwrap();
        assert_eq!(result.intent, "greeting");
        // The rebuilt model replaced the corrupt file.
        let restored: BayesModel =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert!(restored.example_count > 50);
    }

    #[tokio::test]
    async fn failed_retrain_keeps_previous_model() {
        let classifier = BayesClassifier::new(None);
        classifier.classify("halo").await.unwrap();

        let err = classifier
            .retrain(&[TrainingExample::new("   ", "informasi")])
            .await
            .unwrap_err();
        assert!(matches!(err, SapaError::Retrain(_)));

        // Old model still serves.
        let result = classifier.classify("halo").await.unwrap();
        assert_eq!(result.intent, "greeting");
        let info = classifier.model_info().await;
        assert!(info.trained);
    }

    #[tokio::test]
    async fn tokenless_message_is_a_classification_error() {
        let classifier = BayesClassifier::new(None);
        let err = classifier.classify("??!").await.unwrap_err();
        assert!(matches!(err, SapaError::Classification(_)));
    }
}
