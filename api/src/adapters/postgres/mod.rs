//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod applicant_repo;
pub mod comparison_repo;
pub mod project_repo;
pub mod rating_store;


pub use applicant_repo::PostgresApplicantRepository;
pub use comparison_repo::PostgresComparisonRepository;
pub use project_repo::PostgresProjectRepository;
pub use rating_store::PostgresRatingStore;
