//! Feature Layout - Centralized Feature Definition
//!
//! **This file controls the feature schema.** Model input is positional, so
//! the order below is the order every artifact was trained on.
//!
//! ## Rules:
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION

use serde::Serialize;

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
pub const FEATURE_VERSION: u8 = 1;

/// Total number of features
pub const FEATURE_COUNT: usize = 8;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the vector
pub const FEATURE_LAYOUT: [&str; FEATURE_COUNT] = [
    "followers",        // 0: Follower count
    "following",        // 1: Accounts followed
    "statuses",         // 2: Posts published
    "account_age_days", // 3: Days since creation
    "has_profile_pic",  // 4: 0/1
    "default_profile",  // 5: 0/1
    "verified",         // 6: 0/1
    "listed_count",     // 7: Public lists containing the account
];

/// Form value substituted when a field is missing or blank
pub const FEATURE_DEFAULTS: [&str; FEATURE_COUNT] = [
    "50", "100", "200", "365", "1", "0", "0", "0",
];

/// Index constants used by the heuristic scorer
pub const IDX_FOLLOWERS: usize = 0;
pub const IDX_STATUSES: usize = 2;
pub const IDX_ACCOUNT_AGE_DAYS: usize = 3;
pub const IDX_HAS_PROFILE_PIC: usize = 4;

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information, reported by the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Error when an artifact declares a feature order different from ours
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Feature layout mismatch: expected {expected:?}, got {actual:?}")]
pub struct LayoutMismatchError {
    pub expected: Vec<String>,
    pub actual: Vec<String>,
}

/// Validate a declared feature list against the current layout
pub fn validate_feature_names(names: &[String]) -> Result<(), LayoutMismatchError> {
    let matches = names.len() == FEATURE_COUNT
        && names.iter().zip(FEATURE_LAYOUT.iter()).all(|(a, b)| a == b);

    if !matches {
        return Err(LayoutMismatchError {
            expected: LayoutInfo::current().feature_names,
            actual: names.to_vec(),
        });
    }

    Ok(())
}
