//! Applicant form submission

use loan_eligibility_core::constants::DEFAULT_LOAN_TERM;
use loan_eligibility_core::logic::applicant::{
    CreditHistory, Dependents, Education, Gender, MaritalStatus, PropertyArea, SelfEmployment,
};
use loan_eligibility_core::ApplicantRecord;
use serde::Deserialize;
use validator::Validate;

fn default_loan_term() -> f64 {
    DEFAULT_LOAN_TERM
}

/// Body of `POST /api/v1/predict`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ApplicantRequest {
    pub gender: Gender,
    pub married: MaritalStatus,
    pub dependents: Dependents,
    pub education: Education,
    pub self_employed: SelfEmployment,

    #[validate(range(min = 0.0, message = "applicant income must be non-negative"))]
    pub applicant_income: f64,

    #[validate(range(min = 0.0, message = "coapplicant income must be non-negative"))]
    pub coapplicant_income: f64,

    /// In thousands
    #[validate(range(min = 0.0, message = "loan amount must be non-negative"))]
    pub loan_amount: f64,

    /// In days
    #[serde(default = "default_loan_term")]
    #[validate(range(min = 0.0, message = "loan term must be non-negative"))]
    pub loan_term: f64,

    pub credit_history: CreditHistory,
    pub property_area: PropertyArea,
}

impl From<ApplicantRequest> for ApplicantRecord {
    fn from(req: ApplicantRequest) -> Self {
        ApplicantRecord {
            gender: req.gender,
            married: req.married,
            dependents: req.dependents,
            education: req.education,
            self_employed: req.self_employed,
            applicant_income: req.applicant_income,
            coapplicant_income: req.coapplicant_income,
            loan_amount: req.loan_amount,
            loan_term: req.loan_term,
            credit_history: req.credit_history,
            property_area: req.property_area,
        }
    }
}
