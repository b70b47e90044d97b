//! Inference Engine - ONNX Runtime Integration
//!
//! Expects a binary classifier exported with one `[1, 8]` float input. The
//! first output is the class label; an optional float second output holds
//! `[P(real), P(fake)]`.

use std::path::Path;
use std::sync::Arc;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::tensor::TensorElementType;
use ort::value::{DynValue, Value, ValueType};
use parking_lot::Mutex;

use crate::features::{FeatureVector, FEATURE_COUNT};

use super::types::{
    DecisionModel, InferenceError, LoadedModel, ModelLoadError, Prediction, ProbabilisticModel,
};

// ============================================================================
// SESSION WRAPPER
// ============================================================================

/// ONNX classifier returning class labels only
pub struct OnnxModel {
    /// `Session::run` needs exclusive access
    session: Mutex<Session>,
    label_output: String,
}

/// ONNX classifier that also exposes a probability output
pub struct OnnxProbabilisticModel {
    inner: OnnxModel,
    probability_output: String,
}

impl OnnxModel {
    /// One session run; reads the label and, if named, the probability output
    fn run(
        &self,
        features: &FeatureVector,
        probability_output: Option<&str>,
    ) -> Result<Prediction, InferenceError> {
        let input_array = Array2::<f32>::from_shape_vec(
            (1, FEATURE_COUNT),
            features.to_f32().to_vec(),
        ).map_err(|e| InferenceError(format!("Array error: {}", e)))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| InferenceError(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session.run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError(format!("Inference failed: {}", e)))?;

        let label = outputs.get(self.label_output.as_str())
            .ok_or_else(|| InferenceError(format!("No output named {}", self.label_output)))?;
        let class = extract_label(label)?;

        let fake_probability = probability_output.map(|name| {
            outputs.get(name)
                .ok_or_else(|| InferenceError(format!("No output named {}", name)))
                .and_then(extract_fake_probability)
        });

        Ok(Prediction { class, fake_probability })
    }
}

fn extract_label(output: &DynValue) -> Result<i64, InferenceError> {
    if let Ok((_, data)) = output.try_extract_tensor::<i64>() {
        return data.first()
            .copied()
            .ok_or_else(|| InferenceError("Empty label output".to_string()));
    }

    // Some exporters emit the label as a float
    let (_, data) = output.try_extract_tensor::<f32>()
        .map_err(|e| InferenceError(format!("Extract error: {}", e)))?;
    data.first()
        .map(|v| v.round() as i64)
        .ok_or_else(|| InferenceError("Empty label output".to_string()))
}

fn extract_fake_probability(output: &DynValue) -> Result<f64, InferenceError> {
    let (_, data) = output.try_extract_tensor::<f32>()
        .map_err(|e| InferenceError(format!("Extract error: {}", e)))?;

    // [P(real), P(fake)] or a single P(fake)
    match data {
        [_, fake, ..] => Ok(*fake as f64),
        [fake] => Ok(*fake as f64),
        [] => Err(InferenceError("Empty probability output".to_string())),
    }
}

impl DecisionModel for OnnxModel {
    fn classify(&self, features: &FeatureVector) -> Result<i64, InferenceError> {
        self.run(features, None).map(|p| p.class)
    }
}

impl DecisionModel for OnnxProbabilisticModel {
    fn classify(&self, features: &FeatureVector) -> Result<i64, InferenceError> {
        self.inner.classify(features)
    }
}

impl ProbabilisticModel for OnnxProbabilisticModel {
    fn fake_probability(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        self.predict(features)?
            .fake_probability
            .unwrap_or_else(|| Err(InferenceError("Probability not requested".to_string())))
    }

    fn predict(&self, features: &FeatureVector) -> Result<Prediction, InferenceError> {
        self.inner.run(features, Some(&self.probability_output))
    }
}

// ============================================================================
// LOADING
// ============================================================================

fn is_float_tensor(value_type: &ValueType) -> bool {
    matches!(value_type, ValueType::Tensor { ty: TensorElementType::Float32, .. })
}

/// Load ONNX model from file and detect its capability
pub fn load_onnx_model(model_path: &Path) -> Result<LoadedModel, ModelLoadError> {
    tracing::info!("Loading ONNX model from: {}", model_path.display());

    if !model_path.exists() {
        return Err(ModelLoadError::NotFound(model_path.display().to_string()));
    }

    let session = Session::builder()
        .map_err(|e| ModelLoadError::Onnx(format!("Failed to create session builder: {}", e)))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| ModelLoadError::Onnx(format!("Failed to set optimization: {}", e)))?
        .commit_from_file(model_path)
        .map_err(|e| ModelLoadError::Onnx(format!("Failed to load model: {}", e)))?;

    from_session(session)
}

fn from_session(session: Session) -> Result<LoadedModel, ModelLoadError> {
    if session.inputs.len() != 1 {
        return Err(ModelLoadError::Invalid(format!(
            "expected 1 input, found {}",
            session.inputs.len()
        )));
    }

    let label_output = session.outputs.first()
        .map(|o| o.name.clone())
        .ok_or_else(|| ModelLoadError::Invalid("No output defined".to_string()))?;

    let probability_output = session.outputs.get(1)
        .filter(|o| is_float_tensor(&o.output_type))
        .map(|o| o.name.clone());

    if probability_output.is_none() && session.outputs.len() > 1 {
        tracing::info!(
            "Second model output is not a float tensor (export with zipmap disabled to get probabilities)"
        );
    }

    let model = OnnxModel {
        session: Mutex::new(session),
        label_output,
    };

    Ok(match probability_output {
        Some(probability_output) => LoadedModel::Probabilistic(Arc::new(OnnxProbabilisticModel {
            inner: model,
            probability_output,
        })),
        None => LoadedModel::DecisionOnly(Arc::new(model)),
    })
}
