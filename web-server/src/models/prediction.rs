//! Prediction response

use loan_eligibility_core::logic::features::LayoutInfo;
use loan_eligibility_core::logic::explain::{FeatureContribution, Reason};
use loan_eligibility_core::logic::model::ModelMetadata;
use loan_eligibility_core::PredictionResult;
use serde::Serialize;

/// Data behind the expandable attribution chart
#[derive(Debug, Serialize)]
pub struct AttributionChart {
    pub base_value: f64,
    pub margin: f64,
    pub contributions: Vec<FeatureContribution>,
}

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub approved: bool,
    pub label: String,
    pub probability: f64,
    pub reasons: Vec<Reason>,
    pub top: Vec<FeatureContribution>,
    pub chart: AttributionChart,
}

impl From<PredictionResult> for PredictionResponse {
    fn from(result: PredictionResult) -> Self {
        Self {
            approved: result.decision.is_approved(),
            label: result.label,
            probability: result.probability,
            reasons: result.reasons,
            top: result.top,
            chart: AttributionChart {
                base_value: result.base_value,
                margin: result.margin,
                contributions: result.contributions,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ModelInfoResponse {
    pub model: ModelMetadata,
    pub layout: LayoutInfo,
}
