//! Application layer
//!
//! Contains the ranking engine's use cases and service orchestration.
//! Services coordinate between domain entities and ports.

pub mod comparison_service;
pub mod completion_tracker;
pub mod elo;
pub mod elo_config;
pub mod pair_selector;

pub use comparison_service::{ComparisonService, OutcomeAck, PairOutcome, RankingSettings};
pub use completion_tracker::Progress;
// Re-export ELO config for public API (constants used by consumers)
#[allow(unused_imports)]
pub use elo_config::*;
pub use pair_selector::PairingStrategy;
