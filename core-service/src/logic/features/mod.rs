//! Features Module - Feature Encoding
//!
//! Layout, versioned vector and the applicant encoder.

pub mod layout;
pub mod vector;
pub mod encoder;


// Re-export common types
pub use layout::{
    feature_index, feature_name, CategoryGroup, FeatureKind, LayoutInfo, LayoutMismatchError,
    FEATURE_COUNT, FEATURE_LAYOUT,
};
pub use vector::FeatureVector;
pub use encoder::encode;
