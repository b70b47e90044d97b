//! Artifact loader
//!
//! Resolves the artifact at startup. Every failure degrades to `None` so the
//! server keeps running on the heuristic scorer.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::features::layout::validate_feature_names;

use super::inference::load_onnx_model;
use super::types::{LoadedModel, ModelCapability, ModelLoadError};

/// Default artifact file name, resolved next to the executable
pub const DEFAULT_MODEL_FILE: &str = "model.onnx";

/// Optional `<artifact>.json` written by the training pipeline
#[derive(Debug, Clone, Deserialize)]
pub struct MetadataSidecar {
    #[serde(default)]
    pub model_type: Option<String>,
    #[serde(default)]
    pub features: Option<Vec<String>>,
}

/// Model metadata
#[derive(Debug, Clone)]
pub struct ModelMetadata {
    pub model_path: String,
    pub model_type: String,
    pub capability: ModelCapability,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

/// A model together with where it came from
#[derive(Debug, Clone)]
pub struct LoadedArtifact {
    pub model: LoadedModel,
    pub metadata: ModelMetadata,
}

/// `model.onnx` beside the running binary, or the working directory
pub fn default_model_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_MODEL_FILE)))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_FILE))
}

fn sidecar_path(model_path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.json", model_path.display()))
}

/// Read and check the sidecar, if there is one
pub fn load_sidecar(model_path: &Path) -> Result<Option<MetadataSidecar>, ModelLoadError> {
    let path = sidecar_path(model_path);
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path)?;
    let sidecar: MetadataSidecar = serde_json::from_str(&content)?;

    if let Some(features) = &sidecar.features {
        validate_feature_names(features)?;
    }

    Ok(Some(sidecar))
}

/// Load the artifact and its metadata
pub fn load_artifact(model_path: &Path) -> Result<LoadedArtifact, ModelLoadError> {
    if !model_path.exists() {
        return Err(ModelLoadError::NotFound(model_path.display().to_string()));
    }

    // Checked first so a layout mismatch never reaches the runtime
    let sidecar = load_sidecar(model_path)?;
    let model = load_onnx_model(model_path)?;

    let metadata = ModelMetadata {
        model_path: model_path.display().to_string(),
        model_type: sidecar
            .and_then(|s| s.model_type)
            .unwrap_or_else(|| "onnx".to_string()),
        capability: model.capability(),
        loaded_at: chrono::Utc::now(),
    };

    Ok(LoadedArtifact { model, metadata })
}

/// Startup entry point: never fails
pub fn load_or_fallback(model_path: &Path) -> Option<LoadedArtifact> {
    match load_artifact(model_path) {
        Ok(artifact) => {
            tracing::info!(
                path = %artifact.metadata.model_path,
                model_type = %artifact.metadata.model_type,
                capability = %artifact.metadata.capability,
                "Model loaded successfully"
            );
            Some(artifact)
        }
        Err(ModelLoadError::NotFound(path)) => {
            tracing::warn!("No model found at {} - running with fallback heuristic", path);
            None
        }
        Err(e) => {
            tracing::warn!("Failed to load model: {} - running with fallback heuristic", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FEATURE_LAYOUT;

    #[test]
    fn test_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.onnx");

        assert!(matches!(load_artifact(&path), Err(ModelLoadError::NotFound(_))));
        assert!(load_or_fallback(&path).is_none());
    }

    #[test]
    fn test_corrupt_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.onnx");
        std::fs::write(&path, b"\x00\x01corrupt").unwrap();

        assert!(load_or_fallback(&path).is_none());
    }

    #[test]
    fn test_sidecar_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.onnx");
        assert!(load_sidecar(&path).unwrap().is_none());
    }

    #[test]
    fn test_sidecar_matching_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.onnx");
        let sidecar = serde_json::json!({
            "model_type": "random_forest",
            "features": FEATURE_LAYOUT,
        });
        std::fs::write(sidecar_path(&path), sidecar.to_string()).unwrap();

        let loaded = load_sidecar(&path).unwrap().unwrap();
        assert_eq!(loaded.model_type.as_deref(), Some("random_forest"));
    }

    #[test]
    fn test_sidecar_layout_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.onnx");
        std::fs::write(&path, b"unused").unwrap();
        let sidecar = serde_json::json!({ "features": ["followers", "following"] });
        std::fs::write(sidecar_path(&path), sidecar.to_string()).unwrap();

        assert!(matches!(load_sidecar(&path), Err(ModelLoadError::LayoutMismatch(_))));
        assert!(matches!(load_artifact(&path), Err(ModelLoadError::LayoutMismatch(_))));
        assert!(load_or_fallback(&path).is_none());
    }

    #[test]
    fn test_sidecar_corrupt_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.onnx");
        std::fs::write(sidecar_path(&path), "{not json").unwrap();

        assert!(matches!(load_sidecar(&path), Err(ModelLoadError::Metadata(_))));
    }

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
    }

    #[test]
    fn test_load_probabilistic_fixture() {
        let artifact = load_artifact(&fixture("account.onnx")).unwrap();
        assert_eq!(artifact.model.capability(), ModelCapability::Probabilistic);
        assert_eq!(artifact.metadata.capability, ModelCapability::Probabilistic);
        assert_eq!(artifact.metadata.model_type, "onnx");
        assert!(artifact.metadata.model_path.ends_with("account.onnx"));
    }

    #[test]
    fn test_load_decision_only_fixture() {
        let artifact = load_artifact(&fixture("account_decision.onnx")).unwrap();
        assert_eq!(artifact.model.capability(), ModelCapability::DecisionOnly);
    }

    #[test]
    fn test_fixture_with_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.onnx");
        std::fs::copy(fixture("account.onnx"), &path).unwrap();
        let sidecar = serde_json::json!({
            "model_type": "logistic_regression",
            "features": FEATURE_LAYOUT,
        });
        std::fs::write(sidecar_path(&path), sidecar.to_string()).unwrap();

        let artifact = load_or_fallback(&path).unwrap();
        assert_eq!(artifact.metadata.model_type, "logistic_regression");
    }

    #[test]
    fn test_default_model_path_file_name() {
        assert!(default_model_path().ends_with(DEFAULT_MODEL_FILE));
    }
}
