//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the feature schema**
//!
//! The classifier was trained on exactly this column order. A vector in any
//! other order still produces a prediction, just a wrong one, so the order
//! lives here once and everything else looks it up.
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION

use crc32fast::Hasher;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when layout changes
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE KINDS
// ============================================================================

/// Categorical field expanded into one-hot indicator slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryGroup {
    Gender,
    Married,
    Dependents,
    Education,
    SelfEmployed,
    PropertyArea,
}

impl CategoryGroup {
    pub const ALL: [CategoryGroup; 6] = [
        CategoryGroup::Gender,
        CategoryGroup::Married,
        CategoryGroup::Dependents,
        CategoryGroup::Education,
        CategoryGroup::SelfEmployed,
        CategoryGroup::PropertyArea,
    ];

    /// Layout indices of this group's indicator slots
    pub fn indices(self) -> impl Iterator<Item = usize> {
        FEATURE_LAYOUT
            .iter()
            .enumerate()
            .filter(move |(_, spec)| spec.kind == FeatureKind::Indicator(self))
            .map(|(i, _)| i)
    }

    /// Names of this group's indicator slots, in layout order
    pub fn members(self) -> impl Iterator<Item = &'static str> {
        self.indices().map(|i| FEATURE_LAYOUT[i].name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureKind {
    Continuous,
    Indicator(CategoryGroup),
}

/// One named slot of the feature vector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSpec {
    pub name: &'static str,
    pub kind: FeatureKind,
}

impl FeatureSpec {
    const fn continuous(name: &'static str) -> Self {
        Self { name, kind: FeatureKind::Continuous }
    }

    const fn indicator(name: &'static str, group: CategoryGroup) -> Self {
        Self { name, kind: FeatureKind::Indicator(group) }
    }
}

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Total number of features
pub const FEATURE_COUNT: usize = 19;

/// Continuous slot indices
pub const LOAN_AMOUNT: usize = 0;
pub const LOAN_AMOUNT_TERM: usize = 1;
pub const CREDIT_HISTORY: usize = 2;
pub const TOTAL_INCOME: usize = 3;

/// Feature slots in exact order they appear in the vector
/// This is the SINGLE SOURCE OF TRUTH for feature layout
pub static FEATURE_LAYOUT: [FeatureSpec; FEATURE_COUNT] = [
    // === Continuous (0-3) ===
    FeatureSpec::continuous("LoanAmount"),
    FeatureSpec::continuous("Loan_Amount_Term"),
    FeatureSpec::continuous("Credit_History"),
    FeatureSpec::continuous("TotalIncome"),

    // === Gender (4-5) ===
    FeatureSpec::indicator("Gender_Female", CategoryGroup::Gender),
    FeatureSpec::indicator("Gender_Male", CategoryGroup::Gender),

    // === Married (6-7) ===
    FeatureSpec::indicator("Married_No", CategoryGroup::Married),
    FeatureSpec::indicator("Married_Yes", CategoryGroup::Married),

    // === Dependents (8-11) ===
    FeatureSpec::indicator("Dependents_0", CategoryGroup::Dependents),
    FeatureSpec::indicator("Dependents_1", CategoryGroup::Dependents),
    FeatureSpec::indicator("Dependents_2", CategoryGroup::Dependents),
    FeatureSpec::indicator("Dependents_3+", CategoryGroup::Dependents),

    // === Education (12-13) ===
    FeatureSpec::indicator("Education_Graduate", CategoryGroup::Education),
    FeatureSpec::indicator("Education_Not Graduate", CategoryGroup::Education),

    // === Self employed (14-15) ===
    FeatureSpec::indicator("Self_Employed_No", CategoryGroup::SelfEmployed),
    FeatureSpec::indicator("Self_Employed_Yes", CategoryGroup::SelfEmployed),

    // === Property area (16-18) ===
    FeatureSpec::indicator("Property_Area_Rural", CategoryGroup::PropertyArea),
    FeatureSpec::indicator("Property_Area_Semiurban", CategoryGroup::PropertyArea),
    FeatureSpec::indicator("Property_Area_Urban", CategoryGroup::PropertyArea),
];

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the feature layout
/// Used to detect layout mismatches at runtime
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    // Include version in hash
    hasher.update(&[FEATURE_VERSION]);

    // Hash all feature names in order
    for spec in FEATURE_LAYOUT.iter() {
        hasher.update(spec.name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

static LAYOUT_HASH: Lazy<u32> = Lazy::new(compute_layout_hash);

/// Get layout hash (computed once)
pub fn layout_hash() -> u32 {
    *LAYOUT_HASH
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: feature_names().map(str::to_string).collect(),
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Error when a feature vector was built against another layout
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Feature layout mismatch: expected v{expected_version} (hash: {expected_hash:08x}), \
     got v{actual_version} (hash: {actual_hash:08x})"
)]
pub struct LayoutMismatchError {
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
}

/// Validate that incoming data matches current layout
pub fn validate_layout(incoming_version: u8, incoming_hash: u32) -> Result<(), LayoutMismatchError> {
    let current_hash = layout_hash();

    if incoming_version != FEATURE_VERSION || incoming_hash != current_hash {
        return Err(LayoutMismatchError {
            expected_version: FEATURE_VERSION,
            expected_hash: current_hash,
            actual_version: incoming_version,
            actual_hash: incoming_hash,
        });
    }

    Ok(())
}

/// First position where `names` disagrees with the layout, if any.
///
/// Returns `Some(FEATURE_COUNT.min(names.len()))` when only the lengths differ.
pub fn first_schema_difference<S: AsRef<str>>(names: &[S]) -> Option<usize> {
    let diverged = FEATURE_LAYOUT
        .iter()
        .zip(names)
        .position(|(spec, name)| spec.name != name.as_ref());

    match diverged {
        Some(i) => Some(i),
        None if names.len() != FEATURE_COUNT => Some(FEATURE_COUNT.min(names.len())),
        None => None,
    }
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

/// Get feature index by name (O(n) but features are few)
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|spec| spec.name == name)
}

/// Get feature name by index
pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).map(|spec| spec.name)
}

/// All feature names in layout order
pub fn feature_names() -> impl Iterator<Item = &'static str> {
    FEATURE_LAYOUT.iter().map(|spec| spec.name)
}

// ============================================================================
// TESTS
// ============================================================================
