//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod applicants;
pub mod outcomes;
pub mod pairs;
pub mod projects;

pub use applicants::get_applicant_rating;
pub use outcomes::record_outcome;
pub use pairs::get_pair;
pub use projects::{get_progress, get_project, get_rankings, list_comparisons, list_projects};
