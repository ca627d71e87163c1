//! SeaORM entities
//!
//! Table models for the ranking schema (see `migrations/0001_ranking.sql`).

pub mod applicants;
pub mod comparisons;
pub mod projects;
