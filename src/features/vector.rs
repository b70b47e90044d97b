//! Feature Vector - Core data structure for model input
//!
//! Values are stored in the order defined by `FEATURE_LAYOUT`; the length is
//! fixed by the type so a vector can never be short or long.

use super::layout::{FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION};

/// One account submission as eight positional values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    /// Feature layout version
    pub version: u8,
    /// Feature values in order defined by FEATURE_LAYOUT
    pub values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Create from raw values with current version
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self {
            version: FEATURE_VERSION,
            values,
        }
    }

    /// Get values as array reference
    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    /// Get feature by index
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Single-precision copy for tensor input
    pub fn to_f32(&self) -> [f32; FEATURE_COUNT] {
        self.values.map(|v| v as f32)
    }

    /// (name, value) pairs in layout order
    pub fn named_values(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_LAYOUT.iter().copied().zip(self.values.iter().copied())
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        let named: serde_json::Map<String, serde_json::Value> = self
            .named_values()
            .map(|(name, value)| (name.to_string(), serde_json::json!(value)))
            .collect();

        serde_json::json!({
            "feature_version": self.version,
            "values": named,
        })
    }
}
