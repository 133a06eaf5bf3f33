//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.

/// Default classifier artifact path (XGBoost JSON)
pub const DEFAULT_MODEL_PATH: &str = "model.json";

/// Number of top contributors shown as reasons
pub const DEFAULT_TOP_REASONS: usize = 3;

/// Probability above which a loan is approved
pub const DEFAULT_DECISION_THRESHOLD: f64 = 0.5;

/// Loan term pre-filled on the form (days)
pub const DEFAULT_LOAN_TERM: f64 = 360.0;

/// Decision labels
pub const LABEL_APPROVED: &str = "Loan Approved";
pub const LABEL_REJECTED: &str = "Loan Rejected";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Loan Eligibility";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get model path from environment or use default
pub fn get_model_path() -> String {
    std::env::var("MODEL_PATH")
        .unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string())
}

/// Get expected model checksum (hex SHA-256) from environment, if pinned
pub fn get_model_sha256() -> Option<String> {
    std::env::var("MODEL_SHA256")
        .ok()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
}

/// Get number of reasons from environment or use default
pub fn get_top_reasons() -> usize {
    std::env::var("TOP_REASONS")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|&n: &usize| n > 0)
        .unwrap_or(DEFAULT_TOP_REASONS)
}

/// Get decision threshold from environment or use default
pub fn get_decision_threshold() -> f64 {
    std::env::var("DECISION_THRESHOLD")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|t: &f64| (0.0..1.0).contains(t))
        .unwrap_or(DEFAULT_DECISION_THRESHOLD)
}
