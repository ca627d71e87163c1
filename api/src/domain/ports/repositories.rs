//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).

use async_trait::async_trait;

use crate::domain::entities::{
    Applicant, ApplicantId, Comparison, Project, ProjectId, RatingSnapshot, RatingUpdate,
};
use crate::error::DomainError;

/// Read access to projects, plus the one-way completion transition
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Find a project by ID
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, DomainError>;

    /// List all projects, newest first
    async fn find_all(&self) -> Result<Vec<Project>, DomainError>;

    /// Move a project to the terminal `Exhausted` status.
    /// Marking an already exhausted project is a no-op.
    async fn mark_exhausted(&self, id: &ProjectId) -> Result<(), DomainError>;
}

/// Read access to the applicant directory
#[async_trait]
pub trait ApplicantRepository: Send + Sync {
    /// All applicants of a project with their current ratings and counts
    async fn find_by_project(&self, project_id: &ProjectId)
        -> Result<Vec<Applicant>, DomainError>;
}

/// Sole owner of applicant rating and comparison-count mutation
#[async_trait]
pub trait RatingStore: Send + Sync {
    /// Current rating state of an applicant.
    /// Fails with `DomainError::NotFound` for unknown applicants.
    async fn get(&self, applicant_id: &ApplicantId) -> Result<RatingSnapshot, DomainError>;

    /// Apply both rating deltas, increment both comparison counts and append the
    /// comparison record as one atomic unit.
    ///
    /// Fails with `DomainError::ConcurrencyConflict` (and changes nothing) when
    /// either participant's comparison count no longer matches the count the
    /// update was computed from.
    async fn apply_outcome(&self, update: &RatingUpdate) -> Result<Comparison, DomainError>;
}

/// Read access to the comparison audit trail
#[async_trait]
pub trait ComparisonRepository: Send + Sync {
    /// Number of comparisons recorded for a project
    async fn count_by_project(&self, project_id: &ProjectId) -> Result<i64, DomainError>;

    /// Comparisons for a project, newest first
    async fn find_by_project(
        &self,
        project_id: &ProjectId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comparison>, DomainError>;

    /// Distinct pairs already compared within a project (winner, loser order)
    async fn find_pairs_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<(ApplicantId, ApplicantId)>, DomainError>;
}
