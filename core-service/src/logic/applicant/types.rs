//! Applicant record and its closed category sets
//!
//! Serde names use the spellings of the training dataset
//! (`"Not Graduate"`, `"3+"`, ...), so a form can post them verbatim.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::DEFAULT_LOAN_TERM;
use crate::logic::features::layout::CategoryGroup;

// ============================================================================
// CATEGORIES
// ============================================================================

/// A closed categorical field that one-hot encodes into a layout group
pub trait Categorical: Copy + 'static {
    /// Layout group this field expands into
    const GROUP: CategoryGroup;

    /// Every possible value, in form order
    const ALL: &'static [Self];

    /// Category label as spelled in the dataset
    fn label(&self) -> &'static str;

    /// Name of the indicator slot set to 1 for this value
    fn feature_name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Categorical for Gender {
    const GROUP: CategoryGroup = CategoryGroup::Gender;
    const ALL: &'static [Self] = &[Gender::Male, Gender::Female];

    fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }

    fn feature_name(&self) -> &'static str {
        match self {
            Gender::Male => "Gender_Male",
            Gender::Female => "Gender_Female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaritalStatus {
    Yes,
    No,
}

impl Categorical for MaritalStatus {
    const GROUP: CategoryGroup = CategoryGroup::Married;
    const ALL: &'static [Self] = &[MaritalStatus::Yes, MaritalStatus::No];

    fn label(&self) -> &'static str {
        match self {
            MaritalStatus::Yes => "Yes",
            MaritalStatus::No => "No",
        }
    }

    fn feature_name(&self) -> &'static str {
        match self {
            MaritalStatus::Yes => "Married_Yes",
            MaritalStatus::No => "Married_No",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dependents {
    #[serde(rename = "0")]
    Zero,
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3+")]
    ThreePlus,
}

impl Categorical for Dependents {
    const GROUP: CategoryGroup = CategoryGroup::Dependents;
    const ALL: &'static [Self] = &[
        Dependents::Zero,
        Dependents::One,
        Dependents::Two,
        Dependents::ThreePlus,
    ];

    fn label(&self) -> &'static str {
        match self {
            Dependents::Zero => "0",
            Dependents::One => "1",
            Dependents::Two => "2",
            Dependents::ThreePlus => "3+",
        }
    }

    fn feature_name(&self) -> &'static str {
        match self {
            Dependents::Zero => "Dependents_0",
            Dependents::One => "Dependents_1",
            Dependents::Two => "Dependents_2",
            Dependents::ThreePlus => "Dependents_3+",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Education {
    Graduate,
    #[serde(rename = "Not Graduate")]
    NotGraduate,
}

impl Categorical for Education {
    const GROUP: CategoryGroup = CategoryGroup::Education;
    const ALL: &'static [Self] = &[Education::Graduate, Education::NotGraduate];

    fn label(&self) -> &'static str {
        match self {
            Education::Graduate => "Graduate",
            Education::NotGraduate => "Not Graduate",
        }
    }

    fn feature_name(&self) -> &'static str {
        match self {
            Education::Graduate => "Education_Graduate",
            Education::NotGraduate => "Education_Not Graduate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelfEmployment {
    Yes,
    No,
}

impl Categorical for SelfEmployment {
    const GROUP: CategoryGroup = CategoryGroup::SelfEmployed;
    const ALL: &'static [Self] = &[SelfEmployment::Yes, SelfEmployment::No];

    fn label(&self) -> &'static str {
        match self {
            SelfEmployment::Yes => "Yes",
            SelfEmployment::No => "No",
        }
    }

    fn feature_name(&self) -> &'static str {
        match self {
            SelfEmployment::Yes => "Self_Employed_Yes",
            SelfEmployment::No => "Self_Employed_No",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyArea {
    Urban,
    Semiurban,
    Rural,
}

impl Categorical for PropertyArea {
    const GROUP: CategoryGroup = CategoryGroup::PropertyArea;
    const ALL: &'static [Self] = &[PropertyArea::Urban, PropertyArea::Semiurban, PropertyArea::Rural];

    fn label(&self) -> &'static str {
        match self {
            PropertyArea::Urban => "Urban",
            PropertyArea::Semiurban => "Semiurban",
            PropertyArea::Rural => "Rural",
        }
    }

    fn feature_name(&self) -> &'static str {
        match self {
            PropertyArea::Urban => "Property_Area_Urban",
            PropertyArea::Semiurban => "Property_Area_Semiurban",
            PropertyArea::Rural => "Property_Area_Rural",
        }
    }
}

/// Credit history flag, posted as `1.0` / `0.0`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum CreditHistory {
    Good,
    Missing,
}

impl CreditHistory {
    pub const ALL: &'static [Self] = &[CreditHistory::Good, CreditHistory::Missing];

    pub fn value(&self) -> f64 {
        match self {
            CreditHistory::Good => 1.0,
            CreditHistory::Missing => 0.0,
        }
    }
}

impl TryFrom<f64> for CreditHistory {
    type Error = ApplicantError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if value == 1.0 {
            Ok(CreditHistory::Good)
        } else if value == 0.0 {
            Ok(CreditHistory::Missing)
        } else {
            Err(ApplicantError::InvalidCreditHistory(value))
        }
    }
}

impl From<CreditHistory> for f64 {
    fn from(value: CreditHistory) -> Self {
        value.value()
    }
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApplicantError {
    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("credit history must be 1.0 or 0.0, got {0}")]
    InvalidCreditHistory(f64),
}

// ============================================================================
// APPLICANT RECORD
// ============================================================================

fn default_loan_term() -> f64 {
    DEFAULT_LOAN_TERM
}

/// One loan application, as collected by the form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantRecord {
    pub gender: Gender,
    pub married: MaritalStatus,
    pub dependents: Dependents,
    pub education: Education,
    pub self_employed: SelfEmployment,
    pub applicant_income: f64,
    pub coapplicant_income: f64,
    /// Loan amount in thousands
    pub loan_amount: f64,
    /// Loan term in days
    #[serde(default = "default_loan_term")]
    pub loan_term: f64,
    pub credit_history: CreditHistory,
    pub property_area: PropertyArea,
}

impl ApplicantRecord {
    /// Check the numeric fields the form constrains (non-negative, finite)
    pub fn validate(&self) -> Result<(), ApplicantError> {
        let numeric = [
            ("applicant_income", self.applicant_income),
            ("coapplicant_income", self.coapplicant_income),
            ("loan_amount", self.loan_amount),
            ("loan_term", self.loan_term),
        ];

        for (field, value) in numeric {
            if !value.is_finite() {
                return Err(ApplicantError::NotFinite { field });
            }
            if value < 0.0 {
                return Err(ApplicantError::Negative { field, value });
            }
        }

        Ok(())
    }

    /// Applicant plus co-applicant income
    pub fn total_income(&self) -> f64 {
        self.applicant_income + self.coapplicant_income
    }

    /// Indicator slot that is hot for the given group
    pub fn active_indicator(&self, group: CategoryGroup) -> &'static str {
        match group {
            CategoryGroup::Gender => self.gender.feature_name(),
            CategoryGroup::Married => self.married.feature_name(),
            CategoryGroup::Dependents => self.dependents.feature_name(),
            CategoryGroup::Education => self.education.feature_name(),
            CategoryGroup::SelfEmployed => self.self_employed.feature_name(),
            CategoryGroup::PropertyArea => self.property_area.feature_name(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::layout::{FeatureKind, FEATURE_LAYOUT};

    fn sample() -> ApplicantRecord {
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

    fn assert_in_group<C: Categorical>() {
        for value in C::ALL {
            let spec = FEATURE_LAYOUT
                .iter()
                .find(|s| s.name == value.feature_name())
                .unwrap_or_else(|| panic!("{} missing from layout", value.feature_name()));
            assert_eq!(spec.kind, FeatureKind::Indicator(C::GROUP));
        }
        assert_eq!(C::ALL.len(), C::GROUP.members().count());
    }

    #[test]
    fn test_every_category_maps_into_its_group() {
        assert_in_group::<Gender>();
        assert_in_group::<MaritalStatus>();
        assert_in_group::<Dependents>();
        assert_in_group::<Education>();
        assert_in_group::<SelfEmployment>();
        assert_in_group::<PropertyArea>();
    }

    #[test]
    fn test_deserialize_dataset_spellings() {
        let json = r#"{
            "gender": "Male",
            "married": "Yes",
            "dependents": "3+",
            "education": "Not Graduate",
            "self_employed": "Yes",
            "applicant_income": 2500,
            "coapplicant_income": 1200.5,
            "loan_amount": 120,
            "credit_history": 0.0,
            "property_area": "Semiurban"
        }"#;

        let record: ApplicantRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.dependents, Dependents::ThreePlus);
        assert_eq!(record.education, Education::NotGraduate);
        assert_eq!(record.credit_history, CreditHistory::Missing);
        assert_eq!(record.loan_term, 360.0);
        assert_eq!(record.total_income(), 3700.5);
    }

    #[test]
    fn test_credit_history_rejects_other_values() {
        let err = CreditHistory::try_from(0.5).unwrap_err();
        assert_eq!(err, ApplicantError::InvalidCreditHistory(0.5));

        let json = serde_json::to_value(CreditHistory::Good).unwrap();
        assert_eq!(json, serde_json::json!(1.0));
    }

    #[test]
    fn test_validate() {
        assert!(sample().validate().is_ok());

        let mut record = sample();
        record.loan_amount = -1.0;
        assert_eq!(
            record.validate(),
            Err(ApplicantError::Negative { field: "loan_amount", value: -1.0 })
        );

        let mut record = sample();
        record.coapplicant_income = f64::NAN;
        assert_eq!(
            record.validate(),
            Err(ApplicantError::NotFinite { field: "coapplicant_income" })
        );
    }
}
