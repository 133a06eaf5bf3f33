//! Loan Eligibility Core
//!
//! Turns a loan application into the model's feature vector, runs the
//! boosted-tree classifier and explains the decision.
//!
//! ## Pipeline
//! - `logic::applicant` - Applicant record (form input)
//! - `logic::features` - Feature layout + one-hot encoder
//! - `logic::model` - XGBoost artifact, inference, TreeSHAP
//! - `logic::explain` - Ranking + human-readable reasons

pub mod constants;
pub mod logic;

pub use logic::applicant::{ApplicantError, ApplicantRecord};
pub use logic::config::CoreConfig;
pub use logic::explain::{Decision, PredictionResult, Reporter, ReportError};
pub use logic::features::{encode, FeatureVector, FEATURE_COUNT};
pub use logic::model::{ClassifierHandle, ModelError};
