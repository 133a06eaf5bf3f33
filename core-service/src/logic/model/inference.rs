//! Inference Engine - XGBoost tree ensemble
//!
//! Loads the classifier artifact once and evaluates it read-only.
//! The handle is immutable after load; share it with `Arc`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::logic::config::CoreConfig;
use crate::logic::features::{
    layout::{self, first_schema_difference},
    FeatureVector, FEATURE_COUNT,
};
use super::artifact::ModelDocument;
use super::error::{ModelError, ModelResult};
use super::shap;
use super::tree::Tree;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Link between the summed tree outputs and a probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    /// `binary:logistic` - base score stored as a probability
    Logistic,
    /// `binary:logitraw` - base score stored as a margin
    LogitRaw,
}

impl Objective {
    fn parse(name: &str) -> ModelResult<Self> {
        match name {
            "binary:logistic" => Ok(Objective::Logistic),
            "binary:logitraw" => Ok(Objective::LogitRaw),
            other => Err(ModelError::Unsupported(format!("objective {}", other))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Objective::Logistic => "binary:logistic",
            Objective::LogitRaw => "binary:logitraw",
        }
    }
}

/// Model metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_path: String,
    pub sha256: String,
    pub num_trees: usize,
    pub num_features: usize,
    pub objective: Objective,
    /// Base score in margin space
    pub base_margin: f64,
    /// Whether the artifact carried its own feature names
    pub embedded_schema: bool,
    pub xgboost_version: Option<String>,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

/// Per-feature attribution of one prediction
///
/// `base_value + values.sum() == margin` up to float rounding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attributions {
    /// Expected margin over the training cover
    pub base_value: f64,
    /// One value per layout slot
    pub values: [f64; FEATURE_COUNT],
}

impl Attributions {
    /// `(feature name, value)` in layout order
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        layout::feature_names().zip(self.values.iter().copied())
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        layout::feature_index(name).map(|i| self.values[i])
    }

    /// Margin reconstructed from the attributions
    pub fn total(&self) -> f64 {
        self.base_value + self.values.iter().sum::<f64>()
    }
}

// ============================================================================
// CLASSIFIER HANDLE
// ============================================================================

/// Loaded binary classifier
#[derive(Debug, Clone)]
pub struct ClassifierHandle {
    trees: Vec<Tree>,
    base_margin: f64,
    base_value: f64,
    metadata: ModelMetadata,
}

impl ClassifierHandle {
    /// Load artifact from file
    pub fn load(path: impl AsRef<Path>) -> ModelResult<Self> {
        Self::load_verified(path, None)
    }

    /// Load artifact from file, optionally pinning its SHA-256
    pub fn load_verified(path: impl AsRef<Path>, expected_sha256: Option<&str>) -> ModelResult<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();
        log::info!("Loading classifier artifact from: {}", display);

        if !path.exists() {
            return Err(ModelError::NotFound(display));
        }

        let bytes = std::fs::read(path).map_err(|source| ModelError::Unreadable {
            path: display.clone(),
            source,
        })?;

        if let Some(expected) = expected_sha256 {
            let expected = expected.trim().to_lowercase();
            let actual = hex::encode(Sha256::digest(&bytes));
            if expected != actual {
                return Err(ModelError::ChecksumMismatch { expected, actual });
            }
        }

        let handle = Self::from_bytes(&bytes, &display)?;

        log::info!(
            "Classifier loaded: {} trees, objective {}, sha256 {}",
            handle.metadata.num_trees,
            handle.metadata.objective.name(),
            handle.metadata.sha256
        );

        Ok(handle)
    }

    /// Load using the configured path and checksum
    pub fn from_config(config: &CoreConfig) -> ModelResult<Self> {
        Self::load_verified(&config.model_path, config.model_sha256.as_deref())
    }

    /// Load artifact from a JSON string
    pub fn from_json_str(json: &str) -> ModelResult<Self> {
        Self::from_bytes(json.as_bytes(), "<memory>")
    }

    /// Parse and validate artifact bytes
    pub fn from_bytes(bytes: &[u8], source: &str) -> ModelResult<Self> {
        let sha256 = hex::encode(Sha256::digest(bytes));
        let doc = ModelDocument::from_slice(bytes)?;
        let learner = &doc.learner;

        let num_class = match &learner.learner_model_param.num_class {
            Some(param) => param.as_usize("num_class")?,
            None => 0,
        };
        if num_class > 1 {
            return Err(ModelError::Unsupported(format!("{} output classes", num_class)));
        }

        let objective = Objective::parse(&learner.objective.name)?;

        let num_features = learner.learner_model_param.num_feature.as_usize("num_feature")?;
        let embedded_schema = !learner.feature_names.is_empty();
        if embedded_schema {
            if let Some(i) = first_schema_difference(learner.feature_names.as_slice()) {
                return Err(ModelError::SchemaMismatch(format!(
                    "artifact feature {} is {:?}, layout expects {:?}",
                    i,
                    learner.feature_names.get(i).map(String::as_str).unwrap_or("<none>"),
                    layout::feature_name(i).unwrap_or("<none>"),
                )));
            }
        } else {
            log::warn!(
                "Artifact {} has no embedded feature names; trusting layout order by count only",
                source
            );
        }
        if num_features != FEATURE_COUNT {
            return Err(ModelError::SchemaMismatch(format!(
                "artifact expects {} features, layout has {}",
                num_features, FEATURE_COUNT
            )));
        }

        let model = learner.gradient_booster.gbtree()?;

        if model.tree_info.iter().any(|&group| group != 0) {
            return Err(ModelError::Unsupported("multiple output groups".to_string()));
        }

        let trees = model
            .trees
            .iter()
            .map(|t| Tree::from_json(t, num_features))
            .collect::<ModelResult<Vec<_>>>()?;

        let base_score = learner.learner_model_param.base_score.as_f64("base_score")?;
        let base_margin = match objective {
            Objective::Logistic => {
                if !(base_score > 0.0 && base_score < 1.0) {
                    return Err(ModelError::Malformed(format!(
                        "base_score {} is not a probability",
                        base_score
                    )));
                }
                (base_score / (1.0 - base_score)).ln()
            }
            Objective::LogitRaw => base_score,
        };

        let base_value = base_margin + trees.iter().map(Tree::expected_value).sum::<f64>();

        let metadata = ModelMetadata {
            model_path: source.to_string(),
            sha256,
            num_trees: trees.len(),
            num_features,
            objective,
            base_margin,
            embedded_schema,
            xgboost_version: doc.version_string(),
            loaded_at: chrono::Utc::now(),
        };

        Ok(Self {
            trees,
            base_margin,
            base_value,
            metadata,
        })
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// Refuse vectors built against another layout
    pub fn check_vector(&self, vector: &FeatureVector) -> ModelResult<()> {
        vector.validate()?;
        Ok(())
    }

    // ========================================================================
    // PREDICTION
    // ========================================================================

    /// Raw log-odds
    pub fn predict_margin(&self, vector: &FeatureVector) -> ModelResult<f64> {
        self.check_vector(vector)?;
        let x = vector.as_slice();
        Ok(self.base_margin + self.trees.iter().map(|t| t.predict(x) as f64).sum::<f64>())
    }

    /// Probability of the positive (approved) class
    pub fn predict_proba(&self, vector: &FeatureVector) -> ModelResult<f64> {
        self.predict_margin(vector).map(sigmoid)
    }

    /// Native decision rule: 1 iff probability > 0.5
    pub fn predict_label(&self, vector: &FeatureVector) -> ModelResult<u8> {
        Ok(u8::from(self.predict_proba(vector)? > 0.5))
    }

    /// TreeSHAP attribution of the margin
    pub fn attribute(&self, vector: &FeatureVector) -> ModelResult<Attributions> {
        self.check_vector(vector)?;
        let x = vector.as_slice();

        let mut phi = [0.0f64; FEATURE_COUNT];
        for tree in &self.trees {
            shap::accumulate(tree, x, &mut phi);
        }

        Ok(Attributions {
            base_value: self.base_value,
            values: phi,
        })
    }
}

pub fn sigmoid(margin: f64) -> f64 {
    1.0 / (1.0 + (-margin).exp())
}
