//! Model abstraction - labels, results and the classifier contract

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::features::{layout::LayoutMismatchError, FeatureVector};

// ============================================================================
// RESULT TYPES
// ============================================================================

/// Binary account label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Fake,
    Real,
}

impl Label {
    /// Class 1 is fake, anything else is real
    pub fn from_class(class: i64) -> Self {
        if class == 1 {
            Label::Fake
        } else {
            Label::Real
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Fake => "Fake",
            Label::Real => "Real",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which path produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringMethod {
    Model,
    Heuristic,
}

/// Classification output
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub label: Label,
    /// Probability of the fake class, only from probabilistic models
    pub confidence: Option<f64>,
    pub method: ScoringMethod,
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Runtime failure inside a loaded model
#[derive(Debug, Clone, thiserror::Error)]
#[error("InferenceError: {0}")]
pub struct InferenceError(pub String);

/// Artifact could not be turned into a model
#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("Model not found: {0}")]
    NotFound(String),

    #[error("Failed to load ONNX model: {0}")]
    Onnx(String),

    #[error("Invalid model: {0}")]
    Invalid(String),

    #[error("Invalid model metadata: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("Failed to read model metadata: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    LayoutMismatch(#[from] LayoutMismatchError),
}

// ============================================================================
// MODEL TRAITS
// ============================================================================

/// Any binary classifier
pub trait DecisionModel: Send + Sync {
    /// Predicted class id (1 = fake)
    fn classify(&self, features: &FeatureVector) -> Result<i64, InferenceError>;
}

/// Class id plus, when asked for, the fake-class probability
#[derive(Debug, Clone)]
pub struct Prediction {
    pub class: i64,
    /// `None` when the model has no probability estimate
    pub fake_probability: Option<Result<f64, InferenceError>>,
}

/// Classifier that can also estimate class probabilities
pub trait ProbabilisticModel: DecisionModel {
    /// Probability of the fake class
    fn fake_probability(&self, features: &FeatureVector) -> Result<f64, InferenceError>;

    /// Label and probability together; override when one pass yields both
    fn predict(&self, features: &FeatureVector) -> Result<Prediction, InferenceError> {
        Ok(Prediction {
            class: self.classify(features)?,
            fake_probability: Some(self.fake_probability(features)),
        })
    }
}

/// Capability of the loaded artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelCapability {
    Probabilistic,
    DecisionOnly,
}

impl fmt::Display for ModelCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelCapability::Probabilistic => f.write_str("probabilistic"),
            ModelCapability::DecisionOnly => f.write_str("decision_only"),
        }
    }
}

/// A loaded model tagged with what it can do
#[derive(Clone)]
pub enum LoadedModel {
    Probabilistic(Arc<dyn ProbabilisticModel>),
    DecisionOnly(Arc<dyn DecisionModel>),
}

impl LoadedModel {
    pub fn capability(&self) -> ModelCapability {
        match self {
            LoadedModel::Probabilistic(_) => ModelCapability::Probabilistic,
            LoadedModel::DecisionOnly(_) => ModelCapability::DecisionOnly,
        }
    }

    /// Decision-only models never report a probability
    pub fn predict(&self, features: &FeatureVector) -> Result<Prediction, InferenceError> {
        match self {
            LoadedModel::Probabilistic(m) => m.predict(features),
            LoadedModel::DecisionOnly(m) => Ok(Prediction {
                class: m.classify(features)?,
                fake_probability: None,
            }),
        }
    }
}

impl fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LoadedModel({})", self.capability())
    }
}
