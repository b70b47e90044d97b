//! Features Module - form values to model input
//!
//! Layout, vector type and form extraction live here so the scorer never
//! sees raw text.

pub mod layout;
pub mod vector;
pub mod extract;

// Re-export common types
pub use layout::{FEATURE_COUNT, FEATURE_DEFAULTS, FEATURE_LAYOUT};
pub use vector::FeatureVector;
pub use extract::{extract_features, first_wins, InputParseError};
