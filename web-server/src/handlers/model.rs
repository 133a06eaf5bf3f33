//! Model metadata handler

use axum::{extract::State, Json};
use loan_eligibility_core::logic::features::LayoutInfo;

use crate::models::ModelInfoResponse;
use crate::AppState;

/// Loaded artifact and the feature layout it was checked against
pub async fn info(State(state): State<AppState>) -> Json<ModelInfoResponse> {
    Json(ModelInfoResponse {
        model: state.reporter.classifier().metadata().clone(),
        layout: LayoutInfo::current(),
    })
}
