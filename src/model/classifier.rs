//! Classifier service
//!
//! Built once at startup and shared read-only by every request. Uses the
//! loaded model when there is one and the heuristic otherwise.

use serde::Serialize;

use crate::features::FeatureVector;

use super::heuristic::predict_fallback;
use super::loader::{LoadedArtifact, ModelMetadata};
use super::types::{ClassificationResult, Label, LoadedModel, ModelCapability, ScoringMethod};

/// Engine status for the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct EngineStatus {
    pub loaded: bool,
    pub capability: Option<ModelCapability>,
    pub name: String,
    pub loaded_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct Classifier {
    model: Option<LoadedModel>,
    metadata: Option<ModelMetadata>,
}

impl Classifier {
    /// Heuristic-only classifier
    pub fn fallback() -> Self {
        Self::default()
    }

    pub fn from_artifact(artifact: Option<LoadedArtifact>) -> Self {
        match artifact {
            Some(LoadedArtifact { model, metadata }) => Self {
                model: Some(model),
                metadata: Some(metadata),
            },
            None => Self::fallback(),
        }
    }

    /// Wrap an in-process model
    pub fn with_model(model: LoadedModel) -> Self {
        Self {
            model: Some(model),
            metadata: None,
        }
    }

    pub fn is_model_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn status(&self) -> EngineStatus {
        let name = match (&self.metadata, &self.model) {
            (Some(meta), _) => meta.model_path.clone(),
            (None, Some(_)) => "<memory>".to_string(),
            (None, None) => "None".to_string(),
        };

        EngineStatus {
            loaded: self.model.is_some(),
            capability: self.model.as_ref().map(LoadedModel::capability),
            name,
            loaded_at: self.metadata.as_ref().map(|meta| meta.loaded_at),
        }
    }

    /// Label a feature vector; never fails
    pub fn classify(&self, features: &FeatureVector) -> ClassificationResult {
        let Some(model) = &self.model else {
            return predict_fallback(features);
        };

        // Single pass: label and probability come from the same run
        let prediction = match model.predict(features) {
            Ok(prediction) => prediction,
            Err(e) => {
                tracing::warn!("Model failed ({}), using fallback", e);
                return predict_fallback(features);
            }
        };

        let confidence = match prediction.fake_probability {
            Some(Ok(p)) if p.is_finite() => Some(p.clamp(0.0, 1.0)),
            Some(Ok(p)) => {
                tracing::debug!("Discarding non-finite probability {}", p);
                None
            }
            Some(Err(e)) => {
                tracing::debug!("Probability unavailable: {}", e);
                None
            }
            None => None,
        };

        ClassificationResult {
            label: Label::from_class(prediction.class),
            confidence,
            method: ScoringMethod::Model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::model::types::{DecisionModel, InferenceError, ProbabilisticModel};

    /// Predicts fake when followers < 100, probability fixed
    struct StubModel {
        probability: Result<f64, String>,
    }

    impl DecisionModel for StubModel {
        fn classify(&self, features: &FeatureVector) -> Result<i64, InferenceError> {
            Ok(if features.values[0] < 100.0 { 1 } else { 0 })
        }
    }

    impl ProbabilisticModel for StubModel {
        fn fake_probability(&self, _: &FeatureVector) -> Result<f64, InferenceError> {
            self.probability.clone().map_err(InferenceError)
        }
    }

    struct BrokenModel;

    impl DecisionModel for BrokenModel {
        fn classify(&self, _: &FeatureVector) -> Result<i64, InferenceError> {
            Err(InferenceError("session poisoned".to_string()))
        }
    }

    fn fake_looking() -> FeatureVector {
        FeatureVector::from_values([5.0, 10.0, 2.0, 10.0, 0.0, 1.0, 0.0, 0.0])
    }

    fn real_looking() -> FeatureVector {
        FeatureVector::from_values([5000.0, 100.0, 9000.0, 2000.0, 1.0, 0.0, 1.0, 50.0])
    }

    fn probabilistic(probability: Result<f64, String>) -> Classifier {
        Classifier::with_model(LoadedModel::Probabilistic(Arc::new(StubModel { probability })))
    }

    #[test]
    fn test_fallback_without_model() {
        let classifier = Classifier::fallback();
        assert!(!classifier.is_model_loaded());

        let fake = classifier.classify(&fake_looking());
        assert_eq!(fake.label, Label::Fake);
        assert_eq!(fake.confidence, None);
        assert_eq!(fake.method, ScoringMethod::Heuristic);

        assert_eq!(classifier.classify(&real_looking()).label, Label::Real);
    }

    #[test]
    fn test_model_label_and_confidence() {
        let classifier = probabilistic(Ok(0.83));

        let result = classifier.classify(&fake_looking());
        assert_eq!(result.label, Label::Fake);
        assert_eq!(result.confidence, Some(0.83));
        assert_eq!(result.method, ScoringMethod::Model);

        assert_eq!(classifier.classify(&real_looking()).label, Label::Real);
    }

    #[test]
    fn test_model_overrides_heuristic() {
        // heuristic says Real, model says Fake (followers < 100)
        let v = FeatureVector::from_values([50.0, 100.0, 200.0, 365.0, 1.0, 0.0, 0.0, 0.0]);
        assert_eq!(Classifier::fallback().classify(&v).label, Label::Real);
        assert_eq!(probabilistic(Ok(0.6)).classify(&v).label, Label::Fake);
    }

    #[test]
    fn test_decision_only_has_no_confidence() {
        let classifier = Classifier::with_model(LoadedModel::DecisionOnly(Arc::new(StubModel {
            probability: Ok(0.9),
        })));

        let result = classifier.classify(&fake_looking());
        assert_eq!(result.label, Label::Fake);
        assert_eq!(result.confidence, None);
        assert_eq!(result.method, ScoringMethod::Model);
    }

    #[test]
    fn test_probability_failure_is_swallowed() {
        let result = probabilistic(Err("no proba".to_string())).classify(&fake_looking());
        assert_eq!(result.label, Label::Fake);
        assert_eq!(result.confidence, None);
    }

    #[test]
    fn test_probability_clamped_or_dropped() {
        assert_eq!(probabilistic(Ok(1.7)).classify(&fake_looking()).confidence, Some(1.0));
        assert_eq!(probabilistic(Ok(-0.2)).classify(&fake_looking()).confidence, Some(0.0));
        assert_eq!(probabilistic(Ok(f64::NAN)).classify(&fake_looking()).confidence, None);
    }

    #[test]
    fn test_broken_model_uses_heuristic() {
        let classifier = Classifier::with_model(LoadedModel::DecisionOnly(Arc::new(BrokenModel)));
        let result = classifier.classify(&fake_looking());
        assert_eq!(result.label, Label::Fake);
        assert_eq!(result.method, ScoringMethod::Heuristic);
    }

    #[test]
    fn test_deterministic() {
        let classifier = probabilistic(Ok(0.42));
        let v = real_looking();
        assert_eq!(classifier.classify(&v), classifier.classify(&v));
    }

    #[test]
    fn test_status() {
        let status = Classifier::fallback().status();
        assert!(!status.loaded);
        assert_eq!(status.capability, None);

        let status = probabilistic(Ok(0.5)).status();
        assert!(status.loaded);
        assert_eq!(status.capability, Some(ModelCapability::Probabilistic));
        assert_eq!(status.name, "<memory>");
        assert_eq!(status.loaded_at, None);
    }

    #[test]
    fn test_onnx_artifact_end_to_end() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures/account.onnx");
        let classifier = Classifier::from_artifact(crate::model::load_or_fallback(&path));
        assert!(classifier.is_model_loaded());

        let fake = classifier.classify(&fake_looking());
        assert_eq!(fake.label, Label::Fake);
        assert_eq!(fake.method, ScoringMethod::Model);
        let confidence = fake.confidence.unwrap();
        assert!((0.0..=1.0).contains(&confidence));
        assert!((confidence - 0.9).abs() < 1e-5);

        let real = classifier.classify(&real_looking());
        assert_eq!(real.label, Label::Real);
        assert!((real.confidence.unwrap() - 0.1).abs() < 1e-5);

        let status = classifier.status();
        assert_eq!(status.capability, Some(ModelCapability::Probabilistic));
        assert!(status.name.ends_with("account.onnx"));
        assert!(status.loaded_at.is_some());
    }

    #[test]
    fn test_decision_only_artifact_has_no_confidence() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures/account_decision.onnx");
        let classifier = Classifier::from_artifact(crate::model::load_or_fallback(&path));

        let result = classifier.classify(&fake_looking());
        assert_eq!(result.label, Label::Fake);
        assert_eq!(result.confidence, None);
        assert_eq!(result.method, ScoringMethod::Model);
        assert_eq!(classifier.classify(&real_looking()).label, Label::Real);
    }
}
