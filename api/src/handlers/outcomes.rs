//! Outcome handlers
//!
//! Records which applicant a reviewer preferred.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app::OutcomeAck;
use crate::domain::entities::{ApplicantId, Comparison, ProjectId};
use crate::error::AppError;
use crate::AppState;

/// Body of POST /projects/:id/outcomes
#[derive(Debug, Deserialize)]
pub struct RecordOutcomeRequest {
    pub winner_id: Uuid,
    pub loser_id: Uuid,
}

/// One recorded comparison with the ratings it moved
#[derive(Debug, Serialize)]
pub struct ComparisonResponse {
    pub id: String,
    pub sequence: i64,
    pub winner_id: String,
    pub loser_id: String,
    pub winner_rating_before: f64,
    pub winner_rating_after: f64,
    pub winner_delta: f64,
    pub loser_rating_before: f64,
    pub loser_rating_after: f64,
    pub loser_delta: f64,
    pub created_at: String,
}

impl From<Comparison> for ComparisonResponse {
    fn from(comparison: Comparison) -> Self {
        Self {
            id: comparison.id.to_string(),
            sequence: comparison.sequence,
            winner_id: comparison.winner_id.to_string(),
            loser_id: comparison.loser_id.to_string(),
            winner_rating_before: comparison.winner_rating_before,
            winner_rating_after: comparison.winner_rating_after(),
            winner_delta: comparison.winner_delta,
            loser_rating_before: comparison.loser_rating_before,
            loser_rating_after: comparison.loser_rating_after(),
            loser_delta: comparison.loser_delta,
            created_at: comparison.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OutcomeResponse {
    pub comparison: ComparisonResponse,
    /// Project status after the outcome; `exhausted` means this was the last one
    pub project_status: String,
}

impl From<OutcomeAck> for OutcomeResponse {
    fn from(ack: OutcomeAck) -> Self {
        Self {
            comparison: ack.comparison.into(),
            project_status: ack.project_status.to_string(),
        }
    }
}

/// POST /projects/:id/outcomes
pub async fn record_outcome(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RecordOutcomeRequest>,
) -> Result<Json<OutcomeResponse>, AppError> {
    let ack = state
        .ranking_service
        .record_outcome(
            &ProjectId(id),
            &ApplicantId(request.winner_id),
            &ApplicantId(request.loser_id),
        )
        .await?;

    Ok(Json(ack.into()))
}
