//! Applicant Module - Form input
//!
//! The record a single form submission produces.

pub mod types;

pub use types::{
    ApplicantError, ApplicantRecord, Categorical, CreditHistory, Dependents, Education, Gender,
    MaritalStatus, PropertyArea, SelfEmployment,
};
