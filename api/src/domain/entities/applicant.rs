//! Applicant domain entity
//!
//! An applicant competing for a place on a project. Display fields come from the
//! intake directory; rating and comparison counters are owned by the rating store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::project::ProjectId;

/// Unique identifier for an applicant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApplicantId(pub Uuid);

impl ApplicantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ApplicantId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ApplicantId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ApplicantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An applicant in a project's ranking pool
#[derive(Debug, Clone, Serialize)]
pub struct Applicant {
    pub id: ApplicantId,
    pub project_id: ProjectId,
    pub first_name: String,
    pub last_name: String,
    pub major: Option<String>,
    pub year: Option<String>,
    pub rating: f64,
    pub comparison_count: i32,
    pub wins: i32,
    pub losses: i32,
    pub created_at: DateTime<Utc>,
}

impl Applicant {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Current rating state as seen by the Elo updater
    pub fn snapshot(&self) -> RatingSnapshot {
        RatingSnapshot {
            applicant_id: self.id,
            project_id: self.project_id,
            rating: self.rating,
            comparison_count: self.comparison_count,
        }
    }
}

/// Rating and comparison count of a single applicant at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingSnapshot {
    pub applicant_id: ApplicantId,
    pub project_id: ProjectId,
    pub rating: f64,
    pub comparison_count: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_applicant(first: &str, last: &str) -> Applicant {
        Applicant {
            id: ApplicantId::new(),
            project_id: ProjectId::new(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            major: None,
            year: None,
            rating: 1500.0,
            comparison_count: 3,
            wins: 2,
            losses: 1,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn display_name_joins_names() {
        assert_eq!(make_applicant("Ada", "Lovelace").display_name(), "Ada Lovelace");
    }

    #[test]
    fn display_name_trims_missing_last_name() {
        assert_eq!(make_applicant("Ada", "").display_name(), "Ada");
    }

    #[test]
    fn snapshot_carries_rating_state() {
        let applicant = make_applicant("Grace", "Hopper");
        let snapshot = applicant.snapshot();
        assert_eq!(snapshot.applicant_id, applicant.id);
        assert_eq!(snapshot.project_id, applicant.project_id);
        assert_eq!(snapshot.rating, 1500.0);
        assert_eq!(snapshot.comparison_count, 3);
    }

    #[test]
    fn applicant_ids_order_by_uuid() {
        let low = ApplicantId(Uuid::from_u128(1));
        let high = ApplicantId(Uuid::from_u128(2));
        assert!(low < high);
    }

    #[test]
    fn applicant_id_display() {
        let id = ApplicantId(Uuid::nil());
        assert_eq!(id.to_string(), "00000000-0000-0000-0000-000000000000");
    }
}
