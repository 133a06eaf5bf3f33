//! Model Module - Classifier Inference Engine
//!
//! XGBoost JSON artifact → validated trees → margin, label and TreeSHAP
//! attributions.

pub mod artifact;
pub mod error;
pub mod inference;
pub mod shap;
pub mod tree;

// Re-export common types
pub use error::{ModelError, ModelResult};
pub use inference::{sigmoid, Attributions, ClassifierHandle, ModelMetadata, Objective};
