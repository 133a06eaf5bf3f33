//! Feature Encoder
//!
//! Maps an applicant record onto the fixed-order feature vector.

use crate::logic::applicant::ApplicantRecord;
use super::layout::{CategoryGroup, FEATURE_LAYOUT, CREDIT_HISTORY, LOAN_AMOUNT, LOAN_AMOUNT_TERM, TOTAL_INCOME};
use super::vector::FeatureVector;

/// Encode a record into the model's feature vector.
///
/// Continuous slots are copied (TotalIncome is derived); every categorical
/// group gets exactly one hot indicator.
pub fn encode(record: &ApplicantRecord) -> FeatureVector {
    let mut vector = FeatureVector::new();

    vector.set(LOAN_AMOUNT, record.loan_amount as f32);
    vector.set(LOAN_AMOUNT_TERM, record.loan_term as f32);
    vector.set(CREDIT_HISTORY, record.credit_history.value() as f32);
    vector.set(TOTAL_INCOME, record.total_income() as f32);

    for group in CategoryGroup::ALL {
        let active = record.active_indicator(group);
        for index in group.indices() {
            let hot = FEATURE_LAYOUT[index].name == active;
            vector.set(index, if hot { 1.0 } else { 0.0 });
        }
    }

    debug_assert!(vector.is_compatible());
    vector
}
