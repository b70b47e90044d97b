//! Rule-based fallback scorer used when no artifact is loaded
//!
//! Thresholds are fixed constants carried over from the deployed rules.

use crate::features::layout::{
    IDX_ACCOUNT_AGE_DAYS, IDX_FOLLOWERS, IDX_HAS_PROFILE_PIC, IDX_STATUSES,
};
use crate::features::FeatureVector;

use super::types::{ClassificationResult, Label, ScoringMethod};

pub const MIN_FOLLOWERS: f64 = 20.0;
pub const MIN_STATUSES: f64 = 10.0;
pub const MIN_ACCOUNT_AGE_DAYS: f64 = 30.0;
/// Score at or above which an account is labelled fake
pub const FAKE_SCORE_THRESHOLD: u8 = 2;

/// One point per suspicious signal, 0..=4
pub fn heuristic_score(features: &FeatureVector) -> u8 {
    let v = features.as_array();
    let checks = [
        v[IDX_FOLLOWERS] < MIN_FOLLOWERS,
        v[IDX_STATUSES] < MIN_STATUSES,
        v[IDX_ACCOUNT_AGE_DAYS] < MIN_ACCOUNT_AGE_DAYS,
        v[IDX_HAS_PROFILE_PIC] == 0.0,
    ];

    checks.iter().filter(|&&hit| hit).count() as u8
}

pub fn predict_fallback(features: &FeatureVector) -> ClassificationResult {
    let score = heuristic_score(features);
    let label = if score >= FAKE_SCORE_THRESHOLD { Label::Fake } else { Label::Real };

    tracing::debug!(score, %label, "Heuristic classification");

    ClassificationResult {
        label,
        confidence: None,
        method: ScoringMethod::Heuristic,
    }
}
