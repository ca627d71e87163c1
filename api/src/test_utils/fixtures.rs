//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid entity that can be customized.

use chrono::Utc;
use uuid::Uuid;

use crate::app::elo_config::INITIAL_RATING;
use crate::domain::entities::{
    Applicant, ApplicantId, Comparison, ComparisonId, Project, ProjectId, ProjectStatus,
};

/// Create an active test project using the configured comparison target
pub fn test_project() -> Project {
    Project {
        id: ProjectId(Uuid::new_v4()),
        name: "Spring Recruitment".to_string(),
        description: Some("Pairwise review of spring applicants".to_string()),
        status: ProjectStatus::Active,
        target_comparisons_per_applicant: None,
        created_at: Utc::now(),
        exhausted_at: None,
    }
}

/// Create a test project with its own comparison target
pub fn test_project_with_target(target: i32) -> Project {
    Project {
        target_comparisons_per_applicant: Some(target),
        ..test_project()
    }
}

/// Create a fresh applicant in `project` at the baseline rating
pub fn test_applicant(project: &Project) -> Applicant {
    Applicant {
        id: ApplicantId(Uuid::new_v4()),
        project_id: project.id,
        first_name: "Test".to_string(),
        last_name: "Applicant".to_string(),
        major: Some("Economics".to_string()),
        year: Some("2nd".to_string()),
        rating: INITIAL_RATING,
        comparison_count: 0,
        wins: 0,
        losses: 0,
        created_at: Utc::now(),
    }
}

/// Create an applicant with a specific name
pub fn test_applicant_named(project: &Project, first: &str, last: &str) -> Applicant {
    Applicant {
        first_name: first.to_string(),
        last_name: last.to_string(),
        ..test_applicant(project)
    }
}

/// Create an applicant that has already taken part in `count` comparisons
pub fn test_applicant_with_count(project: &Project, count: i32) -> Applicant {
    Applicant {
        comparison_count: count,
        wins: count / 2,
        losses: count - count / 2,
        ..test_applicant(project)
    }
}

/// Create a recorded comparison between two applicants
pub fn test_comparison(winner: &Applicant, loser: &Applicant, sequence: i64) -> Comparison {
    Comparison {
        id: ComparisonId(Uuid::new_v4()),
        project_id: winner.project_id,
        winner_id: winner.id,
        loser_id: loser.id,
        sequence,
        winner_rating_before: winner.rating,
        loser_rating_before: loser.rating,
        winner_delta: 16.0,
        loser_delta: -16.0,
        created_at: Utc::now(),
    }
}
