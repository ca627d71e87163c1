//! PostgreSQL adapter for ApplicantRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::domain::entities::{Applicant, ApplicantId, ProjectId};
use crate::domain::ports::ApplicantRepository;
use crate::entity::applicants;
use crate::error::DomainError;

/// PostgreSQL implementation of ApplicantRepository
pub struct PostgresApplicantRepository {
    db: DatabaseConnection,
}

impl PostgresApplicantRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ApplicantRepository for PostgresApplicantRepository {
    async fn find_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<Applicant>, DomainError> {
        let results = applicants::Entity::find()
            .filter(applicants::Column::ProjectId.eq(project_id.0))
            .order_by_asc(applicants::Column::ComparisonCount)
            .order_by_asc(applicants::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }
}

/// Convert SeaORM model to domain entity
impl From<applicants::Model> for Applicant {
    fn from(model: applicants::Model) -> Self {
        Applicant {
            id: ApplicantId(model.id),
            project_id: ProjectId(model.project_id),
            first_name: model.first_name,
            last_name: model.last_name,
            major: model.major,
            year: model.year,
            rating: model.rating,
            comparison_count: model.comparison_count,
            wins: model.wins,
            losses: model.losses,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
