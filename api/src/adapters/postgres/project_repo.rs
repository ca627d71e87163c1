//! PostgreSQL adapter for ProjectRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, QueryOrder};

use crate::domain::entities::{Project, ProjectId, ProjectStatus};
use crate::domain::ports::ProjectRepository;
use crate::entity::projects;
use crate::error::DomainError;

/// PostgreSQL implementation of ProjectRepository
pub struct PostgresProjectRepository {
    db: DatabaseConnection,
}

impl PostgresProjectRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, DomainError> {
        let result = projects::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        result.map(Project::try_from).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Project>, DomainError> {
        let results = projects::Entity::find()
            .order_by_desc(projects::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        results.into_iter().map(Project::try_from).collect()
    }

    async fn mark_exhausted(&self, id: &ProjectId) -> Result<(), DomainError> {
        // Status only ever moves forward, so the guard keeps the first exhausted_at
        let stmt = sea_orm::Statement::from_sql_and_values(
            sea_orm::DatabaseBackend::Postgres,
            "UPDATE projects SET status = $1, exhausted_at = $2 WHERE id = $3 AND status <> $1",
            [
                ProjectStatus::Exhausted.to_string().into(),
                Utc::now().fixed_offset().into(),
                id.0.into(),
            ],
        );

        self.db
            .execute(stmt)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }
}

/// Convert SeaORM model to domain entity
impl TryFrom<projects::Model> for Project {
    type Error = DomainError;

    fn try_from(model: projects::Model) -> Result<Self, Self::Error> {
        let status = model.status.parse().map_err(DomainError::Internal)?;

        Ok(Project {
            id: ProjectId(model.id),
            name: model.name,
            description: model.description,
            status,
            target_comparisons_per_applicant: model.target_comparisons_per_applicant,
            created_at: model.created_at.with_timezone(&Utc),
            exhausted_at: model.exhausted_at.map(|dt| dt.with_timezone(&Utc)),
        })
    }
}
