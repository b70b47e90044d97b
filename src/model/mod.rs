//! Model Module - classification engine
//!
//! ONNX inference, heuristic fallback and the service that picks between
//! them.

pub mod types;
pub mod heuristic;
pub mod inference;
pub mod loader;
pub mod classifier;

// Re-export common types
pub use types::{
    ClassificationResult, DecisionModel, InferenceError, Label, LoadedModel, ModelCapability,
    ModelLoadError, Prediction, ProbabilisticModel, ScoringMethod,
};
pub use classifier::{Classifier, EngineStatus};
pub use loader::{default_model_path, load_or_fallback, LoadedArtifact, ModelMetadata};
