//! Pair selector
//!
//! Chooses the next two applicants a reviewer should compare. Applicants with the
//! fewest comparisons go first so coverage spreads evenly across the pool. Ties
//! are broken by applicant id, which makes selection reproducible: with no
//! intervening outcome the same state always yields the same pair.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Applicant, ApplicantId};

/// Pair selection policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingStrategy {
    /// The two least-compared applicants, repeats allowed
    #[default]
    LeastCompared,
    /// Least-compared anchor paired with the least-compared applicant it has not met yet
    AvoidRepeats,
}

impl std::fmt::Display for PairingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PairingStrategy::LeastCompared => write!(f, "least_compared"),
            PairingStrategy::AvoidRepeats => write!(f, "avoid_repeats"),
        }
    }
}

impl std::str::FromStr for PairingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "least_compared" => Ok(PairingStrategy::LeastCompared),
            "avoid_repeats" => Ok(PairingStrategy::AvoidRepeats),
            _ => Err(format!("Unknown pairing strategy: {}", s)),
        }
    }
}

/// Unordered key for a pair of applicants
fn pair_key(a: ApplicantId, b: ApplicantId) -> (ApplicantId, ApplicantId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Applicants ordered by comparison count ascending, then id ascending
pub fn coverage_order(applicants: &[Applicant]) -> Vec<&Applicant> {
    let mut ordered: Vec<&Applicant> = applicants.iter().collect();
    ordered.sort_by(|a, b| {
        a.comparison_count
            .cmp(&b.comparison_count)
            .then_with(|| a.id.cmp(&b.id))
    });
    ordered.dedup_by(|a, b| a.id == b.id);
    ordered
}

/// Select the next pair, or `None` when fewer than two distinct applicants exist.
///
/// `history` lists previously compared pairs and is only consulted by
/// `PairingStrategy::AvoidRepeats`.
pub fn select_pair(
    applicants: &[Applicant],
    history: &[(ApplicantId, ApplicantId)],
    strategy: PairingStrategy,
) -> Option<(Applicant, Applicant)> {
    let ordered = coverage_order(applicants);
    if ordered.len() < 2 {
        return None;
    }

    let anchor = ordered[0];
    let partner = match strategy {
        PairingStrategy::LeastCompared => ordered[1],
        PairingStrategy::AvoidRepeats => {
            let met: HashSet<(ApplicantId, ApplicantId)> =
                history.iter().map(|(a, b)| pair_key(*a, *b)).collect();

            ordered[1..]
                .iter()
                .copied()
                .find(|candidate| !met.contains(&pair_key(anchor.id, candidate.id)))
                .unwrap_or(ordered[1])
        }
    };

    Some((anchor.clone(), partner.clone()))
}
