//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::domain::entities::{
    Applicant, ApplicantId, Comparison, ComparisonId, Project, ProjectId, ProjectStatus,
    RatingSnapshot, RatingUpdate,
};
use crate::domain::ports::{
    ApplicantRepository, ComparisonRepository, ProjectRepository, RatingStore,
};
use crate::error::DomainError;

// ============================================================================
// In-Memory Ranking Store
// ============================================================================

#[derive(Default)]
struct RankingState {
    projects: HashMap<ProjectId, Project>,
    applicants: HashMap<ApplicantId, Applicant>,
    comparisons: Vec<Comparison>,
    pending_conflicts: usize,
    fail_mark_exhausted: bool,
}

/// Implements every ranking port over one shared state, so `apply_outcome`
/// can be atomic under a single write lock the way a database transaction is.
#[derive(Default)]
pub struct InMemoryRankingStore {
    state: Arc<RwLock<RankingState>>,
}

impl InMemoryRankingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a project for testing
    pub fn with_project(self, project: Project) -> Self {
        self.insert_project(project);
        self
    }

    /// Pre-populate with applicants for testing
    pub fn with_applicants(self, applicants: Vec<Applicant>) -> Self {
        for applicant in applicants {
            self.insert_applicant(applicant);
        }
        self
    }

    pub fn insert_project(&self, project: Project) {
        let mut state = self.state.write().unwrap();
        state.projects.insert(project.id, project);
    }

    pub fn insert_applicant(&self, applicant: Applicant) {
        let mut state = self.state.write().unwrap();
        state.applicants.insert(applicant.id, applicant);
    }

    /// Make the next `n` calls to `apply_outcome` fail with a concurrency conflict
    pub fn fail_next_applies_with_conflict(&self, n: usize) {
        self.state.write().unwrap().pending_conflicts = n;
    }

    /// Make every later `mark_exhausted` call fail with a database error
    pub fn fail_mark_exhausted(&self) {
        self.state.write().unwrap().fail_mark_exhausted = true;
    }

    /// Append a comparison without touching ratings (for progress tests)
    pub fn record_raw(&self, project_id: &ProjectId, winner: ApplicantId, loser: ApplicantId) {
        let mut state = self.state.write().unwrap();
        let sequence = next_sequence(&state, project_id);
        state.comparisons.push(Comparison {
            id: ComparisonId::new(),
            project_id: *project_id,
            winner_id: winner,
            loser_id: loser,
            sequence,
            winner_rating_before: 0.0,
            loser_rating_before: 0.0,
            winner_delta: 0.0,
            loser_delta: 0.0,
            created_at: Utc::now(),
        });
    }

    /// Get an applicant for inspection in tests
    pub fn applicant(&self, id: &ApplicantId) -> Option<Applicant> {
        self.state.read().unwrap().applicants.get(id).cloned()
    }

    /// Get a project for inspection in tests
    pub fn project(&self, id: &ProjectId) -> Option<Project> {
        self.state.read().unwrap().projects.get(id).cloned()
    }

    /// Get all comparisons for inspection in tests
    pub fn comparisons(&self) -> Vec<Comparison> {
        self.state.read().unwrap().comparisons.clone()
    }
}

fn next_sequence(state: &RankingState, project_id: &ProjectId) -> i64 {
    state
        .comparisons
        .iter()
        .filter(|c| c.project_id == *project_id)
        .count() as i64
        + 1
}

#[async_trait]
impl ProjectRepository for InMemoryRankingStore {
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, DomainError> {
        let state = self.state.read().unwrap();
        Ok(state.projects.get(id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Project>, DomainError> {
        let state = self.state.read().unwrap();
        let mut projects: Vec<Project> = state.projects.values().cloned().collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    async fn mark_exhausted(&self, id: &ProjectId) -> Result<(), DomainError> {
        let mut state = self.state.write().unwrap();
        if state.fail_mark_exhausted {
            return Err(DomainError::Database("injected write failure".to_string()));
        }
        let project = state
            .projects
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("Project not found: {}", id)))?;
        if project.status != ProjectStatus::Exhausted {
            project.status = ProjectStatus::Exhausted;
            project.exhausted_at = Some(Utc::now());
        }
        Ok(())
    }
}

#[async_trait]
impl ApplicantRepository for InMemoryRankingStore {
    async fn find_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<Applicant>, DomainError> {
        let state = self.state.read().unwrap();
        Ok(state
            .applicants
            .values()
            .filter(|a| a.project_id == *project_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RatingStore for InMemoryRankingStore {
    async fn get(&self, applicant_id: &ApplicantId) -> Result<RatingSnapshot, DomainError> {
        let state = self.state.read().unwrap();
        state
            .applicants
            .get(applicant_id)
            .map(|a| a.snapshot())
            .ok_or_else(|| DomainError::NotFound(format!("Applicant not found: {}", applicant_id)))
    }

    async fn apply_outcome(&self, update: &RatingUpdate) -> Result<Comparison, DomainError> {
        if update.winner.applicant_id == update.loser.applicant_id {
            return Err(DomainError::Validation(format!(
                "Applicant {} cannot be compared with itself",
                update.winner.applicant_id
            )));
        }

        let mut state = self.state.write().unwrap();

        if state.pending_conflicts > 0 {
            state.pending_conflicts -= 1;
            return Err(DomainError::ConcurrencyConflict(
                "injected conflict".to_string(),
            ));
        }

        for side in [&update.winner, &update.loser] {
            let current = state.applicants.get(&side.applicant_id).ok_or_else(|| {
                DomainError::NotFound(format!("Applicant not found: {}", side.applicant_id))
            })?;
            if current.comparison_count != side.expected_count {
                return Err(DomainError::ConcurrencyConflict(format!(
                    "Applicant {} changed since it was read",
                    side.applicant_id
                )));
            }
        }

        let sequence = next_sequence(&state, &update.project_id);

        if let Some(winner) = state.applicants.get_mut(&update.winner.applicant_id) {
            winner.rating += update.winner.delta;
            winner.comparison_count += 1;
            winner.wins += 1;
        }
        if let Some(loser) = state.applicants.get_mut(&update.loser.applicant_id) {
            loser.rating += update.loser.delta;
            loser.comparison_count += 1;
            loser.losses += 1;
        }

        let comparison = Comparison {
            id: ComparisonId::new(),
            project_id: update.project_id,
            winner_id: update.winner.applicant_id,
            loser_id: update.loser.applicant_id,
            sequence,
            winner_rating_before: update.winner.rating_before,
            loser_rating_before: update.loser.rating_before,
            winner_delta: update.winner.delta,
            loser_delta: update.loser.delta,
            created_at: Utc::now(),
        };
        state.comparisons.push(comparison.clone());
        Ok(comparison)
    }
}

#[async_trait]
impl ComparisonRepository for InMemoryRankingStore {
    async fn count_by_project(&self, project_id: &ProjectId) -> Result<i64, DomainError> {
        let state = self.state.read().unwrap();
        Ok(state
            .comparisons
            .iter()
            .filter(|c| c.project_id == *project_id)
            .count() as i64)
    }

    async fn find_by_project(
        &self,
        project_id: &ProjectId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comparison>, DomainError> {
        let state = self.state.read().unwrap();
        let mut comparisons: Vec<Comparison> = state
            .comparisons
            .iter()
            .filter(|c| c.project_id == *project_id)
            .cloned()
            .collect();

        // Newest first
        comparisons.sort_by(|a, b| b.sequence.cmp(&a.sequence));

        Ok(comparisons
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn find_pairs_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<(ApplicantId, ApplicantId)>, DomainError> {
        let state = self.state.read().unwrap();
        Ok(state
            .comparisons
            .iter()
            .filter(|c| c.project_id == *project_id)
            .map(|c| (c.winner_id, c.loser_id))
            .collect())
    }
}
