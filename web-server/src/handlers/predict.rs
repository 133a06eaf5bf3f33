//! Prediction handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use loan_eligibility_core::ApplicantRecord;
use validator::Validate;

use crate::models::{ApplicantRequest, PredictionResponse};
use crate::{AppResult, AppState};

/// Encode the submitted applicant, predict and explain
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<ApplicantRequest>, JsonRejection>,
) -> AppResult<Json<PredictionResponse>> {
    let Json(req) = payload?;
    req.validate()?;

    let record: ApplicantRecord = req.into();
    let result = state.reporter.assess(&record)?;

    tracing::info!(
        decision = result.label.as_str(),
        probability = result.probability,
        "Prediction served"
    );

    Ok(Json(result.into()))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use loan_eligibility_core::{ClassifierHandle, CoreConfig, Reporter};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::{create_router, AppState};

    fn state() -> AppState {
        let fixture = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../core-service/tests/fixtures/loan_model.json");
        let core = CoreConfig::default().with_model_path(fixture.to_string_lossy());
        let handle = ClassifierHandle::from_config(&core).unwrap();

        AppState {
            reporter: Reporter::from_config(Arc::new(handle), &core),
            config: Config {
                port: 0,
                environment: "test".to_string(),
                core,
            },
        }
    }

    fn applicant(credit_history: f64) -> Value {
        json!({
            "gender": "Female",
            "married": "No",
            "dependents": "0",
            "education": "Graduate",
            "self_employed": "No",
            "applicant_income": 5000,
            "coapplicant_income": 0,
            "loan_amount": 100,
            "loan_term": 360,
            "credit_history": credit_history,
            "property_area": "Urban"
        })
    }

    async fn post(body: Value) -> (StatusCode, Value) {
        let response = create_router(state())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/predict")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_predict_approved() {
        let (status, body) = post(applicant(1.0)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["approved"], true);
        assert_eq!(body["label"], "Loan Approved");
        assert_eq!(body["top"].as_array().unwrap().len(), 3);
        assert_eq!(body["reasons"][0]["text"], "Good credit history");
        assert_eq!(body["reasons"][0]["display_value"], "+0.27");
        assert_eq!(body["chart"]["contributions"].as_array().unwrap().len(), 19);
    }

    #[tokio::test]
    async fn test_predict_rejected_without_credit_history() {
        let (status, body) = post(applicant(0.0)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["approved"], false);
        assert_eq!(body["label"], "Loan Rejected");
        assert_eq!(body["reasons"][0]["text"], "No credit history available");
        assert_eq!(body["reasons"][0]["display_value"], "-1.09");
    }

    #[tokio::test]
    async fn test_negative_income_is_bad_request() {
        let mut body = applicant(1.0);
        body["applicant_income"] = json!(-1);

        let (status, body) = post(body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400);
    }

    #[tokio::test]
    async fn test_fractional_credit_history_is_bad_request() {
        let (status, body) = post(applicant(0.5)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400);
        assert!(body["error"].as_str().unwrap().contains("credit history"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let mut body = applicant(1.0);
        body["property_area"] = json!("Suburban");

        let (status, body) = post(body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400);
    }

    #[tokio::test]
    async fn test_model_info() {
        let response = create_router(state())
            .oneshot(Request::builder().uri("/api/v1/model").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["model"]["num_trees"], 3);
        assert_eq!(body["layout"]["feature_count"], 19);
        assert_eq!(body["layout"]["feature_names"][3], "TotalIncome");
    }

    #[tokio::test]
    async fn test_index_page() {
        let response = create_router(state())
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("Loan Eligibility Prediction"));
    }

    #[test]
    fn test_state_builds_outside_runtime() {
        let state = state();
        tokio_test::assert_ok!(state
            .reporter
            .classifier()
            .predict_label(&loan_eligibility_core::FeatureVector::new()));
    }
}
