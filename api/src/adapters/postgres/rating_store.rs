//! PostgreSQL adapter for RatingStore
//!
//! Outcomes are applied inside a single transaction that first locks the
//! project row, so outcomes for one project commit one after another even
//! across server instances. Applicant rows are updated with a guard on the
//! comparison count the deltas were computed from; a mismatch rolls the
//! whole transaction back.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, PaginatorTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
};

use crate::domain::entities::{
    Applicant, ApplicantId, Comparison, ComparisonId, ParticipantUpdate, ProjectId,
    RatingSnapshot, RatingUpdate,
};
use crate::domain::ports::RatingStore;
use crate::entity::{applicants, comparisons, projects};
use crate::error::DomainError;

/// PostgreSQL implementation of RatingStore
pub struct PostgresRatingStore {
    db: DatabaseConnection,
}

impl PostgresRatingStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Database(e.to_string())
}

/// Apply one side of an outcome. Returns false when the row did not match.
async fn apply_participant(
    txn: &DatabaseTransaction,
    project_id: &ProjectId,
    side: &ParticipantUpdate,
    won: bool,
) -> Result<bool, DomainError> {
    let stmt = sea_orm::Statement::from_sql_and_values(
        sea_orm::DatabaseBackend::Postgres,
        "UPDATE applicants \
         SET rating = rating + $1, \
             comparison_count = comparison_count + 1, \
             wins = wins + $2, \
             losses = losses + $3 \
         WHERE id = $4 AND project_id = $5 AND comparison_count = $6",
        [
            side.delta.into(),
            (won as i32).into(),
            (!won as i32).into(),
            side.applicant_id.0.into(),
            project_id.0.into(),
            side.expected_count.into(),
        ],
    );

    let result = txn.execute(stmt).await.map_err(db_err)?;
    Ok(result.rows_affected() == 1)
}

#[async_trait]
impl RatingStore for PostgresRatingStore {
    async fn get(&self, applicant_id: &ApplicantId) -> Result<RatingSnapshot, DomainError> {
        let model = applicants::Entity::find_by_id(applicant_id.0)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| {
                DomainError::NotFound(format!("Applicant not found: {}", applicant_id))
            })?;

        Ok(Applicant::from(model).snapshot())
    }

    async fn apply_outcome(&self, update: &RatingUpdate) -> Result<Comparison, DomainError> {
        if update.winner.applicant_id == update.loser.applicant_id {
            return Err(DomainError::Validation(format!(
                "Applicant {} cannot be compared with itself",
                update.winner.applicant_id
            )));
        }

        let txn = self.db.begin().await.map_err(db_err)?;

        // Row lock on the project serializes outcomes per project
        projects::Entity::find_by_id(update.project_id.0)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| {
                DomainError::NotFound(format!("Project not found: {}", update.project_id))
            })?;

        for (side, won) in [(&update.winner, true), (&update.loser, false)] {
            if !apply_participant(&txn, &update.project_id, side, won).await? {
                txn.rollback().await.map_err(db_err)?;
                return Err(DomainError::ConcurrencyConflict(format!(
                    "Applicant {} changed since its rating was read",
                    side.applicant_id
                )));
            }
        }

        let recorded = comparisons::Entity::find()
            .filter(comparisons::Column::ProjectId.eq(update.project_id.0))
            .count(&txn)
            .await
            .map_err(db_err)?;

        let model = comparisons::ActiveModel {
            id: Set(ComparisonId::new().0),
            project_id: Set(update.project_id.0),
            winner_id: Set(update.winner.applicant_id.0),
            loser_id: Set(update.loser.applicant_id.0),
            sequence: Set(recorded as i64 + 1),
            winner_rating_before: Set(update.winner.rating_before),
            loser_rating_before: Set(update.loser.rating_before),
            winner_delta: Set(update.winner.delta),
            loser_delta: Set(update.loser.delta),
            created_at: Set(Utc::now().fixed_offset()),
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        Ok(model.into())
    }
}
