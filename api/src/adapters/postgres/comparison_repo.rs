//! PostgreSQL adapter for ComparisonRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use crate::domain::entities::{ApplicantId, Comparison, ComparisonId, ProjectId};
use crate::domain::ports::ComparisonRepository;
use crate::entity::comparisons;
use crate::error::DomainError;

/// PostgreSQL implementation of ComparisonRepository
pub struct PostgresComparisonRepository {
    db: DatabaseConnection,
}

impl PostgresComparisonRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ComparisonRepository for PostgresComparisonRepository {
    async fn count_by_project(&self, project_id: &ProjectId) -> Result<i64, DomainError> {
        let count = comparisons::Entity::find()
            .filter(comparisons::Column::ProjectId.eq(project_id.0))
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(count as i64)
    }

    async fn find_by_project(
        &self,
        project_id: &ProjectId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comparison>, DomainError> {
        let results = comparisons::Entity::find()
            .filter(comparisons::Column::ProjectId.eq(project_id.0))
            .order_by_desc(comparisons::Column::Sequence)
            .limit(limit as u64)
            .offset(offset as u64)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_pairs_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<(ApplicantId, ApplicantId)>, DomainError> {
        let pairs: Vec<(Uuid, Uuid)> = comparisons::Entity::find()
            .filter(comparisons::Column::ProjectId.eq(project_id.0))
            .select_only()
            .column(comparisons::Column::WinnerId)
            .column(comparisons::Column::LoserId)
            .distinct()
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(pairs
            .into_iter()
            .map(|(winner, loser)| (ApplicantId(winner), ApplicantId(loser)))
            .collect())
    }
}

/// Convert SeaORM model to domain entity
impl From<comparisons::Model> for Comparison {
    fn from(model: comparisons::Model) -> Self {
        Comparison {
            id: ComparisonId(model.id),
            project_id: ProjectId(model.project_id),
            winner_id: ApplicantId(model.winner_id),
            loser_id: ApplicantId(model.loser_id),
            sequence: model.sequence,
            winner_rating_before: model.winner_rating_before,
            loser_rating_before: model.loser_rating_before,
            winner_delta: model.winner_delta,
            loser_delta: model.loser_delta,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
