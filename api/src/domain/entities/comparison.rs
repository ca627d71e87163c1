//! Comparison domain entity
//!
//! The audit trail of reviewer decisions. Every recorded comparison carries the
//! ratings it was computed from and the deltas it applied, so the current ratings
//! can always be explained from history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::applicant::ApplicantId;
use super::project::ProjectId;

/// Unique identifier for a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComparisonId(pub Uuid);

impl ComparisonId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ComparisonId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ComparisonId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ComparisonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A recorded "winner beats loser" decision
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub id: ComparisonId,
    pub project_id: ProjectId,
    pub winner_id: ApplicantId,
    pub loser_id: ApplicantId,
    /// 1-based position of this comparison within its project
    pub sequence: i64,
    pub winner_rating_before: f64,
    pub loser_rating_before: f64,
    pub winner_delta: f64,
    pub loser_delta: f64,
    pub created_at: DateTime<Utc>,
}

impl Comparison {
    pub fn winner_rating_after(&self) -> f64 {
        self.winner_rating_before + self.winner_delta
    }

    pub fn loser_rating_after(&self) -> f64 {
        self.loser_rating_before + self.loser_delta
    }
}

/// One side of a rating update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticipantUpdate {
    pub applicant_id: ApplicantId,
    pub rating_before: f64,
    /// Comparison count observed when the delta was computed
    pub expected_count: i32,
    pub delta: f64,
}

/// Everything the rating store needs to apply one outcome atomically
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingUpdate {
    pub project_id: ProjectId,
    pub winner: ParticipantUpdate,
    pub loser: ParticipantUpdate,
}
