//! Comparison session service
//!
//! Orchestrates the ranking engine for reviewers: hands out the next pair,
//! records outcomes through the Elo updater and rating store, and keeps the
//! completion state of each project current.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::app::completion_tracker::{CompletionTracker, Progress};
use crate::app::elo::EloUpdater;
use crate::app::elo_config::MAX_OUTCOME_ATTEMPTS;
use crate::app::pair_selector::{select_pair, PairingStrategy};
use crate::domain::entities::{
    Applicant, ApplicantId, Comparison, ParticipantUpdate, Project, ProjectId, ProjectStatus,
    RatingSnapshot, RatingUpdate,
};
use crate::domain::ports::{
    ApplicantRepository, ComparisonRepository, ProjectRepository, RatingStore,
};
use crate::error::{AppError, DomainError};

/// Two applicants to show a reviewer side by side
#[derive(Debug, Clone, Serialize)]
pub struct ApplicantPair {
    pub first: Applicant,
    pub second: Applicant,
}

/// Result of asking for the next comparison
#[derive(Debug, Clone)]
pub enum PairOutcome {
    Pair(ApplicantPair),
    /// The project is exhausted; the reviewer should move on to the results
    Exhausted,
}

/// Acknowledgement of a recorded outcome
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeAck {
    pub comparison: Comparison,
    pub project_status: ProjectStatus,
}

/// Tunables for the comparison service
#[derive(Debug, Clone, Copy)]
pub struct RankingSettings {
    pub k_factor: f64,
    pub target_comparisons_per_applicant: i32,
    pub pairing_strategy: PairingStrategy,
}

/// One async mutex per project so outcomes for a project apply one at a time.
/// Entries are dropped once nobody holds or waits on them.
#[derive(Default)]
struct ProjectLocks {
    locks: Mutex<HashMap<ProjectId, Arc<tokio::sync::Mutex<()>>>>,
}

impl ProjectLocks {
    async fn acquire(&self, project_id: &ProjectId) -> ProjectLockGuard<'_> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            locks.entry(*project_id).or_default().clone()
        };

        ProjectLockGuard {
            locks: self,
            project_id: *project_id,
            guard: Some(lock.lock_owned().await),
        }
    }

    fn release(&self, project_id: &ProjectId) {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        if locks
            .get(project_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(project_id);
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

/// Held for the duration of one outcome
struct ProjectLockGuard<'a> {
    locks: &'a ProjectLocks,
    project_id: ProjectId,
    guard: Option<tokio::sync::OwnedMutexGuard<()>>,
}

impl Drop for ProjectLockGuard<'_> {
    fn drop(&mut self) {
        // The mutex must be unlocked before its map entry can be pruned
        self.guard.take();
        self.locks.release(&self.project_id);
    }
}

/// Service behind the reviewer-facing ranking endpoints
pub struct ComparisonService<PR, AR, RS, CR>
where
    PR: ProjectRepository,
    AR: ApplicantRepository,
    RS: RatingStore,
    CR: ComparisonRepository,
{
    projects: Arc<PR>,
    applicants: Arc<AR>,
    ratings: Arc<RS>,
    comparisons: Arc<CR>,
    tracker: CompletionTracker<PR, AR, CR>,
    elo: EloUpdater,
    strategy: PairingStrategy,
    locks: ProjectLocks,
}

impl<PR, AR, RS, CR> ComparisonService<PR, AR, RS, CR>
where
    PR: ProjectRepository,
    AR: ApplicantRepository,
    RS: RatingStore,
    CR: ComparisonRepository,
{
    pub fn new(
        projects: Arc<PR>,
        applicants: Arc<AR>,
        ratings: Arc<RS>,
        comparisons: Arc<CR>,
        settings: RankingSettings,
    ) -> Self {
        let tracker = CompletionTracker::new(
            projects.clone(),
            applicants.clone(),
            comparisons.clone(),
            settings.target_comparisons_per_applicant,
        );

        Self {
            projects,
            applicants,
            ratings,
            comparisons,
            tracker,
            elo: EloUpdater::new(settings.k_factor),
            strategy: settings.pairing_strategy,
            locks: ProjectLocks::default(),
        }
    }

    async fn load_project(&self, project_id: &ProjectId) -> Result<Project, AppError> {
        self.projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Project {} not found", project_id)))
    }

    /// Choose the next pair for a reviewer.
    ///
    /// Takes no locks; reads a snapshot of the project's comparison counts.
    pub async fn request_pair(&self, project_id: &ProjectId) -> Result<PairOutcome, AppError> {
        let project = self.load_project(project_id).await?;
        let applicants = self.applicants.find_by_project(project_id).await?;

        if applicants.len() < 2 {
            return Err(AppError::InsufficientApplicants(project_id.to_string()));
        }

        if self.tracker.is_exhausted_with(&project, &applicants) {
            tracing::debug!(project_id = %project_id, "Pair requested for exhausted project");
            return Ok(PairOutcome::Exhausted);
        }

        let history = match self.strategy {
            PairingStrategy::AvoidRepeats => {
                self.comparisons.find_pairs_by_project(project_id).await?
            }
            PairingStrategy::LeastCompared => Vec::new(),
        };

        let (first, second) = select_pair(&applicants, &history, self.strategy)
            .ok_or_else(|| AppError::InsufficientApplicants(project_id.to_string()))?;

        Ok(PairOutcome::Pair(ApplicantPair { first, second }))
    }

    /// Record that `winner_id` beat `loser_id`.
    ///
    /// Not idempotent: submitting the same decision twice records two comparisons.
    pub async fn record_outcome(
        &self,
        project_id: &ProjectId,
        winner_id: &ApplicantId,
        loser_id: &ApplicantId,
    ) -> Result<OutcomeAck, AppError> {
        if winner_id == loser_id {
            return Err(AppError::InvalidParticipants(format!(
                "Winner and loser must differ (both {})",
                winner_id
            )));
        }

        let project = self.load_project(project_id).await?;
        if project.is_exhausted() {
            return Err(AppError::ComparisonsExhausted(project_id.to_string()));
        }

        let _guard = self.locks.acquire(project_id).await;

        // An outcome applied while we waited may have exhausted the project,
        // and a stored Active status can lag behind the applicants' counts
        let project = self.load_project(project_id).await?;
        let applicants = self.applicants.find_by_project(project_id).await?;
        if self.tracker.is_exhausted_with(&project, &applicants) {
            return Err(AppError::ComparisonsExhausted(project_id.to_string()));
        }

        let mut attempt = 0;
        let comparison = loop {
            attempt += 1;
            match self.apply_once(project_id, winner_id, loser_id).await {
                Err(AppError::Domain(DomainError::ConcurrencyConflict(msg)))
                    if attempt < MAX_OUTCOME_ATTEMPTS =>
                {
                    tracing::warn!(
                        project_id = %project_id,
                        attempt = attempt,
                        "Rating update conflicted, retrying: {}",
                        msg
                    );
                }
                result => break result?,
            }
        };

        // The comparison is committed; a failed transition must not fail the request
        let project_status = match self.tracker.reevaluate(project_id).await {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!(
                    project_id = %project_id,
                    error = %e,
                    "Failed to re-evaluate completion after outcome"
                );
                self.project_status(project_id)
                    .await
                    .unwrap_or(ProjectStatus::Active)
            }
        };

        tracing::info!(
            project_id = %project_id,
            winner_id = %winner_id,
            loser_id = %loser_id,
            sequence = comparison.sequence,
            winner_delta = comparison.winner_delta,
            loser_delta = comparison.loser_delta,
            status = %project_status,
            "Comparison recorded"
        );

        Ok(OutcomeAck {
            comparison,
            project_status,
        })
    }

    /// Read both ratings, compute deltas and hand them to the rating store
    async fn apply_once(
        &self,
        project_id: &ProjectId,
        winner_id: &ApplicantId,
        loser_id: &ApplicantId,
    ) -> Result<Comparison, AppError> {
        let winner = self.ratings.get(winner_id).await?;
        let loser = self.ratings.get(loser_id).await?;

        for participant in [&winner, &loser] {
            if participant.project_id != *project_id {
                return Err(AppError::InvalidParticipants(format!(
                    "Applicant {} does not belong to project {}",
                    participant.applicant_id, project_id
                )));
            }
        }

        let deltas = self.elo.deltas(winner.rating, loser.rating);
        let update = RatingUpdate {
            project_id: *project_id,
            winner: ParticipantUpdate {
                applicant_id: winner.applicant_id,
                rating_before: winner.rating,
                expected_count: winner.comparison_count,
                delta: deltas.winner,
            },
            loser: ParticipantUpdate {
                applicant_id: loser.applicant_id,
                rating_before: loser.rating,
                expected_count: loser.comparison_count,
                delta: deltas.loser,
            },
        };

        Ok(self.ratings.apply_outcome(&update).await?)
    }

    /// Completed versus budgeted comparisons
    pub async fn progress(&self, project_id: &ProjectId) -> Result<Progress, AppError> {
        self.tracker.progress(project_id).await
    }

    /// Whether the project has no comparisons left
    pub async fn is_exhausted(&self, project_id: &ProjectId) -> Result<bool, AppError> {
        self.tracker.is_exhausted(project_id).await
    }

    /// Current lifecycle status. A project whose applicants have all reached
    /// the target reads as exhausted even before the transition is stored.
    pub async fn project_status(&self, project_id: &ProjectId) -> Result<ProjectStatus, AppError> {
        let project = self.load_project(project_id).await?;
        if project.is_exhausted() {
            return Ok(ProjectStatus::Exhausted);
        }

        let applicants = self.applicants.find_by_project(project_id).await?;
        Ok(if self.tracker.is_exhausted_with(&project, &applicants) {
            ProjectStatus::Exhausted
        } else {
            ProjectStatus::Active
        })
    }

    /// Applicants ordered by rating, best first
    pub async fn rankings(&self, project_id: &ProjectId) -> Result<Vec<Applicant>, AppError> {
        self.load_project(project_id).await?;
        let mut applicants = self.applicants.find_by_project(project_id).await?;
        applicants.sort_by(|a, b| b.rating.total_cmp(&a.rating).then_with(|| a.id.cmp(&b.id)));
        Ok(applicants)
    }

    /// Recorded comparisons, newest first
    pub async fn history(
        &self,
        project_id: &ProjectId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comparison>, AppError> {
        self.load_project(project_id).await?;
        Ok(self
            .comparisons
            .find_by_project(project_id, limit, offset)
            .await?)
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        Ok(self.projects.find_all().await?)
    }

    /// Project together with its current status and progress
    pub async fn get_project(&self, project_id: &ProjectId) -> Result<(Project, Progress), AppError> {
        let project = self.load_project(project_id).await?;
        let progress = self.tracker.progress(project_id).await?;
        Ok((project, progress))
    }

    /// Current rating state of a single applicant
    pub async fn rating(&self, applicant_id: &ApplicantId) -> Result<RatingSnapshot, AppError> {
        Ok(self.ratings.get(applicant_id).await?)
    }
}
