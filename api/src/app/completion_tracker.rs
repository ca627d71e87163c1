//! Completion tracker
//!
//! Decides when a project has had enough comparisons and reports progress.
//!
//! Policy: a project is exhausted once every applicant has reached the
//! per-applicant comparison target, i.e. the minimum comparison count across the
//! pool reaches the target. The budget reported by `progress` is the number of
//! comparisons that policy needs in the balanced case:
//! `ceil(applicants * target / 2)`, since every comparison serves two applicants.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::entities::{Applicant, Project, ProjectId, ProjectStatus};
use crate::domain::ports::{ApplicantRepository, ComparisonRepository, ProjectRepository};
use crate::error::{AppError, DomainError};

/// Completed versus budgeted comparisons for a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub completed_comparisons: i64,
    pub total_comparisons: i64,
}

impl Progress {
    /// Completion percentage clamped to [0, 100]
    pub fn percent(&self) -> f64 {
        if self.total_comparisons <= 0 {
            return 0.0;
        }
        let pct = self.completed_comparisons as f64 * 100.0 / self.total_comparisons as f64;
        pct.clamp(0.0, 100.0)
    }
}

/// Comparison budget for `applicant_count` applicants each needing `target` comparisons
pub fn comparison_budget(applicant_count: usize, target: i32) -> i64 {
    if applicant_count < 2 || target <= 0 {
        return 0;
    }
    (applicant_count as i64 * target as i64 + 1) / 2
}

/// Whether every applicant has reached `target` comparisons
pub fn targets_reached(applicants: &[Applicant], target: i32) -> bool {
    if applicants.len() < 2 {
        return false;
    }
    applicants
        .iter()
        .map(|a| a.comparison_count)
        .min()
        .is_some_and(|min| min >= target)
}

/// Tracks the `Active -> Exhausted` transition of projects
pub struct CompletionTracker<PR, AR, CR>
where
    PR: ProjectRepository,
    AR: ApplicantRepository,
    CR: ComparisonRepository,
{
    projects: Arc<PR>,
    applicants: Arc<AR>,
    comparisons: Arc<CR>,
    default_target: i32,
}

impl<PR, AR, CR> CompletionTracker<PR, AR, CR>
where
    PR: ProjectRepository,
    AR: ApplicantRepository,
    CR: ComparisonRepository,
{
    pub fn new(
        projects: Arc<PR>,
        applicants: Arc<AR>,
        comparisons: Arc<CR>,
        default_target: i32,
    ) -> Self {
        Self {
            projects,
            applicants,
            comparisons,
            default_target,
        }
    }

    async fn load_project(&self, project_id: &ProjectId) -> Result<Project, AppError> {
        self.projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Project not found: {}", project_id)).into())
    }

    /// Exhaustion check against an already loaded project and applicant pool
    pub fn is_exhausted_with(&self, project: &Project, applicants: &[Applicant]) -> bool {
        project.is_exhausted()
            || targets_reached(applicants, project.target_per_applicant(self.default_target))
    }

    /// Whether the project has used up its comparison budget
    pub async fn is_exhausted(&self, project_id: &ProjectId) -> Result<bool, AppError> {
        let project = self.load_project(project_id).await?;
        if project.is_exhausted() {
            return Ok(true);
        }
        let applicants = self.applicants.find_by_project(project_id).await?;
        Ok(self.is_exhausted_with(&project, &applicants))
    }

    /// Completed and budgeted comparisons for the project
    pub async fn progress(&self, project_id: &ProjectId) -> Result<Progress, AppError> {
        let project = self.load_project(project_id).await?;
        let applicants = self.applicants.find_by_project(project_id).await?;
        let completed = self.comparisons.count_by_project(project_id).await?;

        Ok(Progress {
            completed_comparisons: completed,
            total_comparisons: comparison_budget(
                applicants.len(),
                project.target_per_applicant(self.default_target),
            ),
        })
    }

    /// Re-evaluate after an outcome and persist the transition if it just happened.
    /// Returns the project's status after evaluation.
    pub async fn reevaluate(&self, project_id: &ProjectId) -> Result<ProjectStatus, AppError> {
        let project = self.load_project(project_id).await?;
        if project.is_exhausted() {
            return Ok(ProjectStatus::Exhausted);
        }

        let applicants = self.applicants.find_by_project(project_id).await?;
        if !self.is_exhausted_with(&project, &applicants) {
            return Ok(ProjectStatus::Active);
        }

        self.projects.mark_exhausted(project_id).await?;
        tracing::info!(
            project_id = %project_id,
            applicants = applicants.len(),
            target = project.target_per_applicant(self.default_target),
            "Project comparisons exhausted"
        );
        Ok(ProjectStatus::Exhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{test_applicant_with_count, test_project, InMemoryRankingStore};

    fn tracker(
        store: &Arc<InMemoryRankingStore>,
        target: i32,
    ) -> CompletionTracker<InMemoryRankingStore, InMemoryRankingStore, InMemoryRankingStore> {
        CompletionTracker::new(store.clone(), store.clone(), store.clone(), target)
    }

    #[test]
    fn percent_of_three_in_ten() {
        let progress = Progress {
            completed_comparisons: 3,
            total_comparisons: 10,
        };
        assert!((progress.percent() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn percent_is_clamped() {
        let over = Progress {
            completed_comparisons: 14,
            total_comparisons: 10,
        };
        assert_eq!(over.percent(), 100.0);

        let empty = Progress {
            completed_comparisons: 0,
            total_comparisons: 0,
        };
        assert_eq!(empty.percent(), 0.0);
    }

    #[test]
    fn budget_rounds_up_for_odd_pools() {
        assert_eq!(comparison_budget(4, 5), 10);
        assert_eq!(comparison_budget(3, 1), 2);
        assert_eq!(comparison_budget(1, 5), 0);
        assert_eq!(comparison_budget(6, 0), 0);
    }

    #[test]
    fn targets_reached_uses_minimum() {
        let project = test_project();
        let pool = vec![
            test_applicant_with_count(&project, 5),
            test_applicant_with_count(&project, 7),
            test_applicant_with_count(&project, 4),
        ];
        assert!(!targets_reached(&pool, 5));
        assert!(targets_reached(&pool, 4));
    }

    #[test]
    fn single_applicant_never_exhausts() {
        let project = test_project();
        assert!(!targets_reached(&[test_applicant_with_count(&project, 10)], 1));
    }

    #[tokio::test]
    async fn progress_reports_recorded_comparisons() {
        let project = test_project();
        let pool: Vec<_> = (0..4).map(|_| test_applicant_with_count(&project, 0)).collect();
        let store = Arc::new(
            InMemoryRankingStore::new()
                .with_project(project.clone())
                .with_applicants(pool.clone()),
        );
        for _ in 0..3 {
            store.record_raw(&project.id, pool[0].id, pool[1].id);
        }

        let progress = tracker(&store, 5).progress(&project.id).await.unwrap();
        assert_eq!(
            progress,
            Progress {
                completed_comparisons: 3,
                total_comparisons: 10,
            }
        );
        assert!((progress.percent() - 30.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn reevaluate_marks_exhausted_once_targets_reached() {
        let project = test_project();
        let store = Arc::new(
            InMemoryRankingStore::new()
                .with_project(project.clone())
                .with_applicants(vec![
                    test_applicant_with_count(&project, 2),
                    test_applicant_with_count(&project, 2),
                ]),
        );
        let tracker = tracker(&store, 2);

        assert!(tracker.is_exhausted(&project.id).await.unwrap());
        assert_eq!(
            tracker.reevaluate(&project.id).await.unwrap(),
            ProjectStatus::Exhausted
        );
        let stored = ProjectRepository::find_by_id(store.as_ref(), &project.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, ProjectStatus::Exhausted);
        assert!(stored.exhausted_at.is_some());
    }

    #[tokio::test]
    async fn reevaluate_leaves_active_project_alone() {
        let project = test_project();
        let store = Arc::new(
            InMemoryRankingStore::new()
                .with_project(project.clone())
                .with_applicants(vec![
                    test_applicant_with_count(&project, 2),
                    test_applicant_with_count(&project, 1),
                ]),
        );

        assert_eq!(
            tracker(&store, 2).reevaluate(&project.id).await.unwrap(),
            ProjectStatus::Active
        );
    }

    #[tokio::test]
    async fn unknown_project_is_not_found() {
        let store = Arc::new(InMemoryRankingStore::new());
        let result = tracker(&store, 5).progress(&ProjectId::new()).await;
        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::NotFound(_)))
        ));
    }
}
