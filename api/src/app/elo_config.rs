//! ELO configuration constants
//!
//! Defaults for the pairwise ranking engine. K factor and comparison target can be
//! overridden through `Config`.

/// Rating every applicant starts from when admitted into the ranking pool
pub const INITIAL_RATING: f64 = 1500.0;

/// Default sensitivity constant applied to both participants
pub const DEFAULT_K_FACTOR: f64 = 32.0;

/// Rating difference spanning a tenfold change in odds
pub const ELO_SCALE: f64 = 400.0;

/// Bound on |R_B - R_A| before exponentiation
pub const RATING_GAP_LIMIT: f64 = 4000.0;

/// Default number of comparisons each applicant must reach before a project is exhausted
pub const DEFAULT_TARGET_COMPARISONS: i32 = 5;

/// Attempts for one outcome before a concurrency conflict is surfaced
pub const MAX_OUTCOME_ATTEMPTS: usize = 2;
