//! Pair handlers
//!
//! Hands the next pair of applicants to a reviewer. An exhausted project is
//! answered with 409 and a pointer to the results view rather than an error
//! body, so clients can switch screens without parsing error strings.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::app::PairOutcome;
use crate::domain::entities::ProjectId;
use crate::error::AppError;
use crate::handlers::applicants::ApplicantResponse;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PairResponse {
    Pair { applicants: [ApplicantResponse; 2] },
    Exhausted { results_url: String },
}

impl PairResponse {
    fn from_outcome(project_id: &ProjectId, outcome: PairOutcome) -> (StatusCode, Self) {
        match outcome {
            PairOutcome::Pair(pair) => (
                StatusCode::OK,
                PairResponse::Pair {
                    applicants: [pair.first.into(), pair.second.into()],
                },
            ),
            PairOutcome::Exhausted => (
                StatusCode::CONFLICT,
                PairResponse::Exhausted {
                    results_url: format!("/projects/{}/rankings", project_id),
                },
            ),
        }
    }
}

/// GET /projects/:id/pair
pub async fn get_pair(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<PairResponse>), AppError> {
    let project_id = ProjectId(id);
    let outcome = state.ranking_service.request_pair(&project_id).await?;
    let (status, body) = PairResponse::from_outcome(&project_id, outcome);
    Ok((status, Json(body)))
}
