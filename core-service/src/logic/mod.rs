//! Logic Module - Business Logic & Engines
//!
//! - `applicant/` - Form input record
//! - `features/` - Feature layout, vector and encoder
//! - `model/` - Classifier artifact, inference, attribution
//! - `explain/` - Ranking and reasons

pub mod config;

pub mod applicant;
pub mod features;
pub mod model;
pub mod explain;
