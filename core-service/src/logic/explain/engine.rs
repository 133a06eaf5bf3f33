//! Report Engine
//!
//! Prediction, attribution ranking and reason lookup for one applicant.

use std::sync::Arc;

use thiserror::Error;

use super::reasons::ReasonMap;
use super::types::{Decision, FeatureContribution, PredictionResult, Reason};
use crate::logic::applicant::{ApplicantError, ApplicantRecord};
use crate::logic::config::CoreConfig;
use crate::logic::features::{encode, FeatureVector};
use crate::logic::model::{sigmoid, Attributions, ClassifierHandle, ModelError};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("invalid applicant: {0}")]
    Applicant(#[from] ApplicantError),
}

impl ReportError {
    pub fn is_schema_mismatch(&self) -> bool {
        matches!(self, ReportError::Model(ModelError::SchemaMismatch(_)))
    }
}

/// Runs one prediction and explains it.
///
/// Holds the classifier by `Arc`; cloning a reporter is cheap and every clone
/// reads the same immutable model.
#[derive(Debug, Clone)]
pub struct Reporter {
    classifier: Arc<ClassifierHandle>,
    reasons: ReasonMap,
    top_k: usize,
    decision_threshold: f64,
}

impl Reporter {
    pub fn new(classifier: Arc<ClassifierHandle>) -> Self {
        Self::from_config(classifier, &CoreConfig::default())
    }

    pub fn from_config(classifier: Arc<ClassifierHandle>, config: &CoreConfig) -> Self {
        Self {
            classifier,
            reasons: ReasonMap::standard(),
            top_k: config.top_k,
            decision_threshold: config.decision_threshold,
        }
    }

    pub fn with_reasons(mut self, reasons: ReasonMap) -> Self {
        self.reasons = reasons;
        self
    }

    pub fn classifier(&self) -> &ClassifierHandle {
        &self.classifier
    }

    /// Validate, encode and predict a form submission
    pub fn assess(&self, record: &ApplicantRecord) -> Result<PredictionResult, ReportError> {
        record.validate()?;
        self.predict(&encode(record))
    }

    /// Decision, top contributors and reasons for one encoded applicant
    pub fn predict(&self, vector: &FeatureVector) -> Result<PredictionResult, ReportError> {
        let start_time = std::time::Instant::now();

        if log::log_enabled!(log::Level::Trace) {
            log::trace!("Feature vector: {}", vector.to_log_entry());
        }

        let margin = self.classifier.predict_margin(vector)?;
        let probability = sigmoid(margin);
        let decision = if probability > self.decision_threshold {
            Decision::Approved
        } else {
            Decision::Rejected
        };

        let attributions = self.classifier.attribute(vector)?;
        let contributions = rank(&attributions);
        let top: Vec<FeatureContribution> = contributions.iter().take(self.top_k).cloned().collect();

        // unmapped features keep their slot in `top` but get no reason
        let reasons = top
            .iter()
            .filter_map(|c| {
                self.reasons.lookup(&c.name, vector).map(|text| Reason {
                    feature: c.name.clone(),
                    text: text.to_string(),
                    value: c.value,
                    display_value: c.display_value.clone(),
                })
            })
            .collect();

        let inference_time_us = start_time.elapsed().as_micros() as u64;
        log::debug!(
            "Prediction: {} (p={:.3}, margin={:.3}) in {}us",
            decision.label(),
            probability,
            margin,
            inference_time_us
        );

        Ok(PredictionResult {
            decision,
            label: decision.label().to_string(),
            probability,
            margin,
            base_value: attributions.base_value,
            top,
            reasons,
            contributions,
            inference_time_us,
        })
    }
}

/// All features by descending |attribution|; ties keep layout order
pub fn rank(attributions: &Attributions) -> Vec<FeatureContribution> {
    let mut contributions: Vec<FeatureContribution> = attributions
        .named()
        .map(|(name, value)| FeatureContribution {
            name: name.to_string(),
            value,
            display_value: format_signed(value),
        })
        .collect();

    contributions.sort_by(|a, b| b.value.abs().total_cmp(&a.value.abs()));
    contributions
}

/// Two decimals, `+` for positive values; anything that rounds to zero is `0.00`
pub fn format_signed(value: f64) -> String {
    let magnitude = format!("{:.2}", value.abs());
    if magnitude == "0.00" {
        magnitude
    } else if value > 0.0 {
        format!("+{}", magnitude)
    } else {
        format!("-{}", magnitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::applicant::{
        CreditHistory, Dependents, Education, Gender, MaritalStatus, PropertyArea, SelfEmployment,
    };
    use crate::logic::features::FEATURE_COUNT;

    const FIXTURE: &str = include_str!("../../../tests/fixtures/loan_model.json");

    fn reporter() -> Reporter {
        Reporter::new(Arc::new(ClassifierHandle::from_json_str(FIXTURE).unwrap()))
    }

    fn applicant() -> ApplicantRecord {
        ApplicantRecord {
            gender: Gender::Female,
            married: MaritalStatus::No,
            dependents: Dependents::Zero,
            education: Education::Graduate,
            self_employed: SelfEmployment::No,
            applicant_income: 5000.0,
            coapplicant_income: 0.0,
            loan_amount: 100.0,
            loan_term: 360.0,
            credit_history: CreditHistory::Good,
            property_area: PropertyArea::Urban,
        }
    }

    fn names(contributions: &[FeatureContribution]) -> Vec<&str> {
        contributions.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_format_signed() {
        assert_eq!(format_signed(0.2725), "+0.27");
        assert_eq!(format_signed(-1.09), "-1.09");
        assert_eq!(format_signed(0.0), "0.00");
        assert_eq!(format_signed(1.005e1), "+10.05");
        assert_eq!(format_signed(0.004), "0.00");
        assert_eq!(format_signed(-0.004), "0.00");
        assert_eq!(format_signed(-0.0), "0.00");
        assert_eq!(format_signed(-0.006), "-0.01");
    }

    #[test]
    fn test_probability_at_threshold_is_rejected() {
        // single zero leaf over a 0.5 base score: margin 0, p exactly 0.5
        let json = r#"{
            "learner": {
                "gradient_booster": {
                    "name": "gbtree",
                    "model": {
                        "trees": [{
                            "left_children": [-1],
                            "right_children": [-1],
                            "split_indices": [0],
                            "split_conditions": [0.0],
                            "default_left": [0],
                            "sum_hessian": [10.0],
                            "split_type": [0]
                        }],
                        "tree_info": [0]
                    }
                },
                "learner_model_param": {"base_score": "5E-1", "num_class": "0", "num_feature": "19"},
                "objective": {"name": "binary:logistic"}
            },
            "version": [2, 1, 0]
        }"#;
        let handle = ClassifierHandle::from_json_str(json).unwrap();
        let result = Reporter::new(Arc::new(handle)).assess(&applicant()).unwrap();

        assert_eq!(result.margin, 0.0);
        assert_eq!(result.probability, 0.5);
        assert_eq!(result.decision, Decision::Rejected);
        assert_eq!(result.label, "Loan Rejected");
    }

    #[test]
    fn test_rank_orders_by_magnitude_with_stable_ties() {
        let mut values = [0.0; FEATURE_COUNT];
        values[0] = 0.1;
        values[3] = -0.5;
        values[5] = 0.3;
        values[7] = -0.1;

        let ranked = rank(&Attributions { base_value: 0.0, values });
        assert_eq!(ranked.len(), FEATURE_COUNT);
        assert_eq!(
            names(&ranked[..4]),
            vec!["TotalIncome", "Gender_Male", "LoanAmount", "Married_Yes"]
        );
        assert_eq!(ranked[0].display_value, "-0.50");
    }

    #[test]
    fn test_approved_applicant() {
        let result = reporter().assess(&applicant()).unwrap();

        assert_eq!(result.decision, Decision::Approved);
        assert_eq!(result.label, "Loan Approved");
        assert!((result.margin - 0.6).abs() < 1e-6);
        assert!((result.base_value - 0.125).abs() < 1e-6);

        assert_eq!(names(&result.top), vec!["Credit_History", "TotalIncome", "LoanAmount"]);
        assert!((result.top[0].value - 0.2725).abs() < 1e-6);
        assert!((result.top[1].value - 0.10125).abs() < 1e-6);
        assert_eq!(result.top[0].display_value, "+0.27");

        let texts: Vec<&str> = result.reasons.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["Good credit history", "Combined applicant and co-applicant income", "Requested loan amount"]
        );
    }

    #[test]
    fn test_rejected_without_credit_history() {
        let record = ApplicantRecord { credit_history: CreditHistory::Missing, ..applicant() };
        let result = reporter().assess(&record).unwrap();

        assert_eq!(result.decision, Decision::Rejected);
        assert_eq!(result.label, "Loan Rejected");
        assert_eq!(result.top[0].name, "Credit_History");
        assert!((result.top[0].value + 1.09).abs() < 1e-6);
        assert_eq!(result.reasons[0].text, "No credit history available");
        assert_eq!(result.reasons[0].display_value, "-1.09");
    }

    #[test]
    fn test_unmapped_feature_keeps_rank_slot() {
        let reporter = reporter().with_reasons(
            ReasonMap::empty().with_feature("LoanAmount", "Requested loan amount"),
        );
        let result = reporter.assess(&applicant()).unwrap();

        assert_eq!(result.top.len(), 3);
        assert_eq!(result.reasons.len(), 1);
        assert_eq!(result.reasons[0].feature, "LoanAmount");
    }

    #[test]
    fn test_top_is_non_increasing() {
        let result = reporter().assess(&applicant()).unwrap();
        for pair in result.contributions.windows(2) {
            assert!(pair[0].value.abs() >= pair[1].value.abs());
        }
        assert_eq!(&result.contributions[..3], &result.top[..]);
    }

    #[test]
    fn test_invalid_applicant() {
        let record = ApplicantRecord { applicant_income: -5.0, ..applicant() };
        let err = reporter().assess(&record).unwrap_err();
        assert!(matches!(err, ReportError::Applicant(_)));
    }

    #[test]
    fn test_foreign_vector_is_schema_mismatch() {
        let mut vector = encode(&applicant());
        vector.version += 1;
        let err = reporter().predict(&vector).unwrap_err();
        assert!(err.is_schema_mismatch());
    }

    #[test]
    fn test_top_k_from_config() {
        let handle = Arc::new(ClassifierHandle::from_json_str(FIXTURE).unwrap());
        let config = CoreConfig { top_k: 5, ..CoreConfig::default() };
        let result = Reporter::from_config(handle, &config).assess(&applicant()).unwrap();

        assert_eq!(result.top.len(), 5);
        assert_eq!(result.top[3].name, "Education_Graduate");
        assert_eq!(result.top[4].name, "Property_Area_Semiurban");
    }
}
