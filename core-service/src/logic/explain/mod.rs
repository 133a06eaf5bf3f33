//! Explain Module - Decision + Attribution Report
//!
//! Ranks per-feature attributions and maps the top contributors to reasons.

pub mod engine;
pub mod reasons;
pub mod types;

pub use engine::{format_signed, rank, Reporter, ReportError};
pub use reasons::{ReasonKey, ReasonMap};
pub use types::{Decision, FeatureContribution, PredictionResult, Reason};
