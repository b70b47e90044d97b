//! Form → FeatureVector extraction
//!
//! Missing or blank fields fall back to `FEATURE_DEFAULTS`, everything else
//! must parse as a number and satisfy the value ranges of the data model.

use std::collections::HashMap;

use validator::{Validate, ValidationError};

use super::layout::{FEATURE_COUNT, FEATURE_DEFAULTS, FEATURE_LAYOUT};
use super::vector::FeatureVector;

/// Longest slice of a rejected value echoed back in an error message
pub const MAX_ECHOED_CHARS: usize = 32;

/// Rejected form submission
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputParseError {
    #[error("could not convert {field} value {value:?} to a number")]
    InvalidNumber { field: &'static str, value: String },

    #[error("{0}")]
    OutOfRange(String),
}

/// Parsed account attributes, checked against the data model ranges
#[derive(Debug, Clone, Validate)]
struct AccountFeatures {
    #[validate(custom(function = "validate_finite"), range(min = 0.0, message = "must not be negative"))]
    followers: f64,
    #[validate(custom(function = "validate_finite"), range(min = 0.0, message = "must not be negative"))]
    following: f64,
    #[validate(custom(function = "validate_finite"), range(min = 0.0, message = "must not be negative"))]
    statuses: f64,
    #[validate(custom(function = "validate_finite"), range(min = 0.0, message = "must not be negative"))]
    account_age_days: f64,
    #[validate(custom(function = "validate_flag"))]
    has_profile_pic: f64,
    #[validate(custom(function = "validate_flag"))]
    default_profile: f64,
    #[validate(custom(function = "validate_flag"))]
    verified: f64,
    #[validate(custom(function = "validate_finite"), range(min = 0.0, message = "must not be negative"))]
    listed_count: f64,
}

impl AccountFeatures {
    fn from_values(v: [f64; FEATURE_COUNT]) -> Self {
        Self {
            followers: v[0],
            following: v[1],
            statuses: v[2],
            account_age_days: v[3],
            has_profile_pic: v[4],
            default_profile: v[5],
            verified: v[6],
            listed_count: v[7],
        }
    }
}

fn validate_finite(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        return Ok(());
    }
    let mut err = ValidationError::new("finite");
    err.message = Some("must be a finite number".into());
    Err(err)
}

fn validate_flag(value: f64) -> Result<(), ValidationError> {
    if value == 0.0 || value == 1.0 {
        return Ok(());
    }
    let mut err = ValidationError::new("flag");
    err.message = Some("must be 0 or 1".into());
    Err(err)
}

/// Collect urlencoded pairs; the first occurrence of a repeated key wins
pub fn first_wins<I>(pairs: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut form = HashMap::new();
    for (key, value) in pairs {
        form.entry(key).or_insert(value);
    }
    form
}

/// Shorten a rejected value so error messages stay small enough for a cookie
fn echoed(raw: &str) -> String {
    let mut chars = raw.chars();
    let head: String = chars.by_ref().take(MAX_ECHOED_CHARS).collect();
    if chars.next().is_some() {
        format!("{}…", head)
    } else {
        head
    }
}

/// Resolve the raw text for one field, applying the default when blank
fn raw_value<'a>(form: &'a HashMap<String, String>, index: usize) -> &'a str {
    form.get(FEATURE_LAYOUT[index])
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .unwrap_or(FEATURE_DEFAULTS[index])
}

/// Build a FeatureVector from submitted form values
pub fn extract_features(form: &HashMap<String, String>) -> Result<FeatureVector, InputParseError> {
    let mut values = [0.0f64; FEATURE_COUNT];

    for (i, slot) in values.iter_mut().enumerate() {
        let raw = raw_value(form, i);
        *slot = raw.parse::<f64>().map_err(|_| InputParseError::InvalidNumber {
            field: FEATURE_LAYOUT[i],
            value: echoed(raw),
        })?;
    }

    AccountFeatures::from_values(values)
        .validate()
        .map_err(|e| InputParseError::OutOfRange(e.to_string()))?;

    Ok(FeatureVector::from_values(values))
}
