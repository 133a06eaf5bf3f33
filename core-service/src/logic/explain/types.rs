//! Report types

use serde::{Deserialize, Serialize};

use crate::constants::{LABEL_APPROVED, LABEL_REJECTED};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    pub fn label(&self) -> &'static str {
        match self {
            Decision::Approved => LABEL_APPROVED,
            Decision::Rejected => LABEL_REJECTED,
        }
    }

    pub fn is_approved(&self) -> bool {
        *self == Decision::Approved
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureContribution {
    pub name: String,
    pub value: f64,
    pub display_value: String, // signed, 2 decimals
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reason {
    pub feature: String,
    pub text: String,
    pub value: f64,
    pub display_value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    pub decision: Decision,
    pub label: String,
    pub probability: f64,
    pub margin: f64,
    pub base_value: f64,
    pub top: Vec<FeatureContribution>,
    pub reasons: Vec<Reason>,
    pub contributions: Vec<FeatureContribution>, // every feature, ranked
    pub inference_time_us: u64,
}
