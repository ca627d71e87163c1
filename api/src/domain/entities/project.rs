//! Project domain entity
//!
//! A project owns a pool of applicants that reviewers rank by pairwise comparison.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(pub Uuid);

impl ProjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ProjectId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ranking status of a project
///
/// `Exhausted` is terminal: once reached, no further pairs are handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    /// Comparisons may still be requested
    Active,
    /// Comparison budget reached
    Exhausted,
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectStatus::Active => write!(f, "active"),
            ProjectStatus::Exhausted => write!(f, "exhausted"),
        }
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(ProjectStatus::Active),
            "exhausted" => Ok(ProjectStatus::Exhausted),
            _ => Err(format!("Unknown project status: {}", s)),
        }
    }
}

/// A project whose applicants are being ranked
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    /// Per-project override of the configured comparison target
    pub target_comparisons_per_applicant: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub exhausted_at: Option<DateTime<Utc>>,
}

impl Project {
    pub fn is_exhausted(&self) -> bool {
        self.status == ProjectStatus::Exhausted
    }

    /// Comparison target for each applicant, falling back to `default_target`
    pub fn target_per_applicant(&self, default_target: i32) -> i32 {
        self.target_comparisons_per_applicant
            .filter(|t| *t > 0)
            .unwrap_or(default_target)
    }
}
