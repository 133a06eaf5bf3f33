//! Core configuration
//!
//! Model location and reporting knobs, loaded from the environment with
//! fallbacks from `constants`.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Configuration for loading the classifier and reporting results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Path to the XGBoost JSON artifact
    pub model_path: String,

    /// Expected hex SHA-256 of the artifact (integrity pin)
    pub model_sha256: Option<String>,

    /// How many top contributors to keep
    pub top_k: usize,

    /// Probability above which the decision is "approved"
    pub decision_threshold: f64,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            model_path: constants::DEFAULT_MODEL_PATH.to_string(),
            model_sha256: None,
            top_k: constants::DEFAULT_TOP_REASONS,
            decision_threshold: constants::DEFAULT_DECISION_THRESHOLD,
        }
    }
}

impl CoreConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            model_path: constants::get_model_path(),
            model_sha256: constants::get_model_sha256(),
            top_k: constants::get_top_reasons(),
            decision_threshold: constants::get_decision_threshold(),
        }
    }

    pub fn with_model_path(mut self, path: impl Into<String>) -> Self {
        self.model_path = path.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CoreConfig::default();
        assert_eq!(config.model_path, "model.json");
        assert_eq!(config.top_k, 3);
        assert_eq!(config.decision_threshold, 0.5);
        assert!(config.model_sha256.is_none());
    }

    #[test]
    fn test_with_model_path() {
        let config = CoreConfig::default().with_model_path("/srv/models/loan.json");
        assert_eq!(config.model_path, "/srv/models/loan.json");
    }
}
