//! XGBoost JSON Artifact
//!
//! Serde mirror of the document written by `Booster.save_model("*.json")`.
//! Only the fields needed for inference and attribution are modelled;
//! everything else in the file is ignored.

use serde::Deserialize;

use super::error::{ModelError, ModelResult};

// ============================================================================
// DOCUMENT
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ModelDocument {
    pub learner: LearnerJson,
    #[serde(default)]
    pub version: Vec<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LearnerJson {
    /// Column names when the model was fit on a named frame
    #[serde(default)]
    pub feature_names: Vec<String>,
    pub gradient_booster: BoosterJson,
    pub learner_model_param: LearnerModelParam,
    pub objective: ObjectiveJson,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoosterJson {
    pub name: String,
    /// Shape depends on `name`; see [`BoosterJson::gbtree`]
    #[serde(default)]
    pub model: Option<serde_json::Value>,
}

impl BoosterJson {
    /// Tree model of a `gbtree` booster
    pub fn gbtree(&self) -> ModelResult<GbTreeJson> {
        if self.name != "gbtree" {
            return Err(ModelError::Unsupported(format!("booster {}", self.name)));
        }
        let model = self
            .model
            .clone()
            .ok_or_else(|| ModelError::Malformed("gbtree without model".to_string()))?;
        Ok(serde_json::from_value(model)?)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GbTreeJson {
    pub trees: Vec<TreeJson>,
    /// Output group per tree (all 0 for binary models)
    #[serde(default)]
    pub tree_info: Vec<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LearnerModelParam {
    pub base_score: Param,
    #[serde(default)]
    pub num_class: Option<Param>,
    pub num_feature: Param,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectiveJson {
    pub name: String,
}

/// One regression tree in structure-of-arrays form, indexed by node id
#[derive(Debug, Clone, Deserialize)]
pub struct TreeJson {
    pub left_children: Vec<i32>,
    pub right_children: Vec<i32>,
    pub split_indices: Vec<u32>,
    /// Threshold for splits, leaf value for leaves
    pub split_conditions: Vec<f32>,
    pub default_left: Vec<Flag>,
    /// Node cover, used to weight unknown branches during attribution
    pub sum_hessian: Vec<f32>,
    #[serde(default)]
    pub split_type: Vec<u8>,
}

// ============================================================================
// LOOSE SCALARS
// ============================================================================

/// Learner parameters are written as strings (`"5E-1"`, `"19"`), and newer
/// releases wrap `base_score` in brackets (`"[5E-1]"`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Param {
    Number(f64),
    Text(String),
}

impl Param {
    pub fn as_f64(&self, field: &str) -> ModelResult<f64> {
        match self {
            Param::Number(n) => Ok(*n),
            Param::Text(text) => {
                let first = text
                    .trim()
                    .trim_start_matches('[')
                    .trim_end_matches(']')
                    .split(',')
                    .next()
                    .unwrap_or_default()
                    .trim();
                first
                    .parse::<f64>()
                    .map_err(|_| ModelError::Malformed(format!("{} is not a number: {:?}", field, text)))
            }
        }
    }

    pub fn as_usize(&self, field: &str) -> ModelResult<usize> {
        let value = self.as_f64(field)?;
        if value < 0.0 || value.fract() != 0.0 {
            return Err(ModelError::Malformed(format!("{} is not a count: {}", field, value)));
        }
        Ok(value as usize)
    }
}

/// `default_left` is `0/1` in older files and `true/false` in newer ones
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Bool(bool),
    Int(u8),
}

impl Flag {
    pub fn is_set(self) -> bool {
        match self {
            Flag::Bool(b) => b,
            Flag::Int(i) => i != 0,
        }
    }
}

// ============================================================================
// PARSING
// ============================================================================

impl ModelDocument {
    pub fn from_slice(bytes: &[u8]) -> ModelResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// "major.minor.patch" of the writing XGBoost, if recorded
    pub fn version_string(&self) -> Option<String> {
        if self.version.is_empty() {
            return None;
        }
        Some(
            self.version
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join("."),
        )
    }
}
