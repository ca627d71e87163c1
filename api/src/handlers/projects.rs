//! Project handlers
//!
//! Read-only endpoints for navigating projects, tracking progress and viewing
//! the final rankings.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app::Progress;
use crate::domain::entities::{Project, ProjectId, ProjectStatus};
use crate::error::AppError;
use crate::handlers::applicants::ApplicantResponse;
use crate::handlers::outcomes::ComparisonResponse;
use crate::AppState;

/// Query parameters for the comparison history
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

const MAX_HISTORY_LIMIT: i64 = 500;

impl HistoryQuery {
    /// Validated limit and offset; oversized pages are capped
    fn bounds(&self) -> Result<(i64, i64), AppError> {
        if self.limit < 1 {
            return Err(AppError::BadRequest("limit must be at least 1".to_string()));
        }
        if self.offset < 0 {
            return Err(AppError::BadRequest("offset cannot be negative".to_string()));
        }
        Ok((self.limit.min(MAX_HISTORY_LIMIT), self.offset))
    }
}

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub completed_comparisons: i64,
    pub total_comparisons: i64,
    pub percent: f64,
    pub status: String,
}

impl ProgressResponse {
    fn new(progress: Progress, status: ProjectStatus) -> Self {
        Self {
            completed_comparisons: progress.completed_comparisons,
            total_comparisons: progress.total_comparisons,
            percent: progress.percent(),
            status: status.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub target_comparisons_per_applicant: Option<i32>,
    pub created_at: String,
    pub exhausted_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<ProgressResponse>,
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        Self {
            id: project.id.to_string(),
            name: project.name,
            description: project.description,
            status: project.status.to_string(),
            target_comparisons_per_applicant: project.target_comparisons_per_applicant,
            created_at: project.created_at.to_rfc3339(),
            exhausted_at: project.exhausted_at.map(|dt| dt.to_rfc3339()),
            progress: None,
        }
    }
}

/// A ranked applicant on the results view
#[derive(Debug, Serialize)]
pub struct RankedApplicantResponse {
    pub rank: usize,
    #[serde(flatten)]
    pub applicant: ApplicantResponse,
}

/// GET /projects
pub async fn list_projects(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProjectResponse>>, AppError> {
    let projects = state.ranking_service.list_projects().await?;
    Ok(Json(projects.into_iter().map(Into::into).collect()))
}

/// GET /projects/:id
///
/// Project details with status and progress.
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProjectResponse>, AppError> {
    let (project, progress) = state.ranking_service.get_project(&ProjectId(id)).await?;
    let status = project.status;

    let mut response = ProjectResponse::from(project);
    response.progress = Some(ProgressResponse::new(progress, status));
    Ok(Json(response))
}

/// GET /projects/:id/progress
pub async fn get_progress(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProgressResponse>, AppError> {
    let project_id = ProjectId(id);
    let status = state.ranking_service.project_status(&project_id).await?;
    let progress = state.ranking_service.progress(&project_id).await?;
    Ok(Json(ProgressResponse::new(progress, status)))
}

/// GET /projects/:id/rankings
///
/// Applicants by rating, best first.
pub async fn get_rankings(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<RankedApplicantResponse>>, AppError> {
    let applicants = state.ranking_service.rankings(&ProjectId(id)).await?;

    let ranked = applicants
        .into_iter()
        .enumerate()
        .map(|(i, applicant)| RankedApplicantResponse {
            rank: i + 1,
            applicant: applicant.into(),
        })
        .collect();

    Ok(Json(ranked))
}

/// GET /projects/:id/comparisons
///
/// Comparison audit trail, newest first.
pub async fn list_comparisons(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<ComparisonResponse>>, AppError> {
    let (limit, offset) = query.bounds()?;
    let comparisons = state
        .ranking_service
        .history(&ProjectId(id), limit, offset)
        .await?;

    Ok(Json(comparisons.into_iter().map(Into::into).collect()))
}
