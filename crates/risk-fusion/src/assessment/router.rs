use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::adapters::{ApprovalClassifier, QualitativeAssessor};
use super::service::{AssessmentError, AssessmentRequest, RiskAssessmentService};

/// Router builder exposing the assessment endpoint.
pub fn assessment_router<C, Q>(service: Arc<RiskAssessmentService<C, Q>>) -> Router
where
    C: ApprovalClassifier + 'static,
    Q: QualitativeAssessor + 'static,
{
    Router::new()
        .route("/api/v1/assessments", post(assess_handler::<C, Q>))
        .with_state(service)
}

pub(crate) async fn assess_handler<C, Q>(
    State(service): State<Arc<RiskAssessmentService<C, Q>>>,
    axum::Json(request): axum::Json<AssessmentRequest>,
) -> Response
where
    C: ApprovalClassifier + 'static,
    Q: QualitativeAssessor + 'static,
{
    match service.assess(request).await {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error @ AssessmentError::EmptyDocument) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
    }
}
