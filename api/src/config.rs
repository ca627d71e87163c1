use std::env;
use std::str::FromStr;

use crate::app::{
    PairingStrategy, RankingSettings, DEFAULT_K_FACTOR, DEFAULT_TARGET_COMPARISONS,
};

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Elo K-factor applied to both participants of an outcome
    pub elo_k_factor: f64,
    /// Comparisons each applicant should receive before a project is exhausted
    pub target_comparisons_per_applicant: i32,
    pub pairing_strategy: PairingStrategy,
    /// Allowed CORS origin; any origin when unset
    pub cors_allowed_origin: Option<String>,
    /// Sustained outcome submissions per second per client IP
    pub outcome_rate_per_second: u64,
    pub outcome_rate_burst: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

        let elo_k_factor = parse_or("ELO_K_FACTOR", DEFAULT_K_FACTOR);
        let elo_k_factor = if elo_k_factor.is_finite() && elo_k_factor > 0.0 {
            elo_k_factor
        } else {
            tracing::warn!(value = elo_k_factor, "ELO_K_FACTOR must be positive, using default");
            DEFAULT_K_FACTOR
        };

        let target = parse_or("TARGET_COMPARISONS_PER_APPLICANT", DEFAULT_TARGET_COMPARISONS);
        let target = if target > 0 {
            target
        } else {
            tracing::warn!(
                value = target,
                "TARGET_COMPARISONS_PER_APPLICANT must be positive, using default"
            );
            DEFAULT_TARGET_COMPARISONS
        };

        Ok(Self {
            database_url,
            port: parse_or("PORT", 8080),
            elo_k_factor,
            target_comparisons_per_applicant: target,
            pairing_strategy: parse_or("PAIRING_STRATEGY", PairingStrategy::default()),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .ok()
                .filter(|origin| !origin.trim().is_empty()),
            outcome_rate_per_second: parse_or::<u64>("OUTCOME_RATE_PER_SECOND", 5).max(1),
            outcome_rate_burst: parse_or::<u32>("OUTCOME_RATE_BURST", 10).max(1),
        })
    }

    /// Settings handed to the comparison service
    pub fn ranking_settings(&self) -> RankingSettings {
        RankingSettings {
            k_factor: self.elo_k_factor,
            target_comparisons_per_applicant: self.target_comparisons_per_applicant,
            pairing_strategy: self.pairing_strategy,
        }
    }
}

/// Read and parse an environment variable, falling back to `default` when it
/// is unset or malformed.
fn parse_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match env::var(key) {
        Ok(raw) => parse_value(key, &raw, default),
        Err(_) => default,
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str, default: T) -> T {
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(key, value = raw, "Invalid configuration value, using default");
            default
        }
    }
}
