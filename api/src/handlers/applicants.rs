//! Applicant handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::{Applicant, ApplicantId, RatingSnapshot};
use crate::error::AppError;
use crate::AppState;

/// Applicant as shown to reviewers and on the results view
#[derive(Debug, Serialize)]
pub struct ApplicantResponse {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub major: Option<String>,
    pub year: Option<String>,
    pub rating: f64,
    pub comparison_count: i32,
    pub wins: i32,
    pub losses: i32,
}

impl From<Applicant> for ApplicantResponse {
    fn from(applicant: Applicant) -> Self {
        Self {
            id: applicant.id.to_string(),
            project_id: applicant.project_id.to_string(),
            name: applicant.display_name(),
            first_name: applicant.first_name,
            last_name: applicant.last_name,
            major: applicant.major,
            year: applicant.year,
            rating: applicant.rating,
            comparison_count: applicant.comparison_count,
            wins: applicant.wins,
            losses: applicant.losses,
        }
    }
}

/// Current rating state of one applicant
#[derive(Debug, Serialize)]
pub struct RatingResponse {
    pub id: String,
    pub project_id: String,
    pub rating: f64,
    pub comparison_count: i32,
}

impl From<RatingSnapshot> for RatingResponse {
    fn from(snapshot: RatingSnapshot) -> Self {
        Self {
            id: snapshot.applicant_id.to_string(),
            project_id: snapshot.project_id.to_string(),
            rating: snapshot.rating,
            comparison_count: snapshot.comparison_count,
        }
    }
}

/// GET /applicants/:id
pub async fn get_applicant_rating(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RatingResponse>, AppError> {
    let snapshot = state.ranking_service.rating(&ApplicantId(id)).await?;
    Ok(Json(snapshot.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{test_applicant_named, test_project};

    #[test]
    fn serialize_applicant_response() {
        let project = test_project();
        let applicant = test_applicant_named(&project, "Ada", "Lovelace");
        let response = ApplicantResponse::from(applicant);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["name"], "Ada Lovelace");
        assert_eq!(json["first_name"], "Ada");
        assert_eq!(json["major"], "Economics");
        assert_eq!(json["rating"], 1500.0);
        assert_eq!(json["comparison_count"], 0);
        assert_eq!(json["project_id"], project.id.to_string());
    }

    #[test]
    fn serialize_applicant_without_optional_fields() {
        let project = test_project();
        let mut applicant = test_applicant_named(&project, "Grace", "Hopper");
        applicant.major = None;
        applicant.year = None;

        let json = serde_json::to_value(ApplicantResponse::from(applicant)).unwrap();
        assert!(json["major"].is_null());
        assert!(json["year"].is_null());
    }

    #[test]
    fn serialize_rating_response() {
        let project = test_project();
        let mut applicant = test_applicant_named(&project, "Alan", "Turing");
        applicant.rating = 1516.0;
        applicant.comparison_count = 1;

        let json = serde_json::to_value(RatingResponse::from(applicant.snapshot())).unwrap();
        assert_eq!(json["id"], applicant.id.to_string());
        assert_eq!(json["rating"], 1516.0);
        assert_eq!(json["comparison_count"], 1);
    }
}
