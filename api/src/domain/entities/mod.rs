//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod applicant;
pub mod comparison;
pub mod project;

pub use applicant::{Applicant, ApplicantId, RatingSnapshot};
pub use comparison::{Comparison, ComparisonId, ParticipantUpdate, RatingUpdate};
pub use project::{Project, ProjectId, ProjectStatus};
