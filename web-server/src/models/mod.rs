//! Request and response models

pub mod applicant;
pub mod prediction;

pub use applicant::ApplicantRequest;
pub use prediction::{AttributionChart, ModelInfoResponse, PredictionResponse};
