//! Elo updater
//!
//! Turns a binary "winner beats loser" outcome into rating deltas using the
//! standard expected-score model. Pure computation; applying the deltas is the
//! rating store's job.

use serde::Serialize;

use crate::app::elo_config::{DEFAULT_K_FACTOR, ELO_SCALE, RATING_GAP_LIMIT};

/// Expected score of a player rated `rating_a` against one rated `rating_b`
pub fn expected_score(rating_a: f64, rating_b: f64) -> f64 {
    let gap = (rating_b - rating_a).clamp(-RATING_GAP_LIMIT, RATING_GAP_LIMIT);
    1.0 / (1.0 + 10f64.powf(gap / ELO_SCALE))
}

/// Rating changes produced by one outcome
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EloDeltas {
    pub winner: f64,
    pub loser: f64,
    pub winner_expected: f64,
    pub loser_expected: f64,
}

/// Elo calculator with a fixed K factor
#[derive(Debug, Clone, Copy)]
pub struct EloUpdater {
    k_factor: f64,
}

impl Default for EloUpdater {
    fn default() -> Self {
        Self::new(DEFAULT_K_FACTOR)
    }
}

impl EloUpdater {
    pub fn new(k_factor: f64) -> Self {
        Self { k_factor }
    }

    /// Deltas for `winner_rating` beating `loser_rating`
    pub fn deltas(&self, winner_rating: f64, loser_rating: f64) -> EloDeltas {
        let winner_expected = expected_score(winner_rating, loser_rating);
        let loser_expected = expected_score(loser_rating, winner_rating);

        EloDeltas {
            winner: self.k_factor * (1.0 - winner_expected),
            loser: self.k_factor * (0.0 - loser_expected),
            winner_expected,
            loser_expected,
        }
    }
}
