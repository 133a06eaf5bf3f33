//! Reason Map
//!
//! Human-readable sentence per top contributor. Credit history is keyed by
//! its 0/1 value; every other feature by name. Unmapped features yield
//! nothing.

use std::collections::HashMap;

use crate::logic::features::{layout::CREDIT_HISTORY, feature_name, FeatureVector};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReasonKey {
    Feature(String),
    CreditHistory(i32),
}

#[derive(Debug, Clone, Default)]
pub struct ReasonMap {
    entries: HashMap<ReasonKey, String>,
}

impl ReasonMap {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sentences shown on the result page
    pub fn standard() -> Self {
        Self::empty()
            .with(ReasonKey::CreditHistory(1), "Good credit history")
            .with(ReasonKey::CreditHistory(0), "No credit history available")
            .with_feature("TotalIncome", "Combined applicant and co-applicant income")
            .with_feature("LoanAmount", "Requested loan amount")
            .with_feature("Loan_Amount_Term", "Length of the loan term")
            .with_feature("Education_Graduate", "Applicant is a graduate")
            .with_feature("Education_Not Graduate", "Applicant is not a graduate")
            .with_feature("Married_Yes", "Applicant is married")
            .with_feature("Property_Area_Semiurban", "Property is in a semi-urban area")
            .with_feature("Property_Area_Rural", "Property is in a rural area")
    }

    pub fn with(mut self, key: ReasonKey, text: impl Into<String>) -> Self {
        self.entries.insert(key, text.into());
        self
    }

    pub fn with_feature(self, feature: &str, text: impl Into<String>) -> Self {
        self.with(ReasonKey::Feature(feature.to_string()), text)
    }

    /// Sentence for `feature` given the instance it was computed on
    pub fn lookup(&self, feature: &str, vector: &FeatureVector) -> Option<&str> {
        let key = if Some(feature) == feature_name(CREDIT_HISTORY) {
            let flag = vector.get(CREDIT_HISTORY).unwrap_or_default();
            ReasonKey::CreditHistory(flag as i32)
        } else {
            ReasonKey::Feature(feature.to_string())
        };

        self.entries.get(&key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
