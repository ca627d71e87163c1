//! Ranking API Server
//!
//! Ranks the applicants of a project by collecting pairwise "which is better"
//! judgements from reviewers and folding them into Elo ratings.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Json, Router,
};
use sea_orm::Database;
use serde::Serialize;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{
    PostgresApplicantRepository, PostgresComparisonRepository, PostgresProjectRepository,
    PostgresRatingStore,
};
use app::ComparisonService;
use config::Config;

pub type RankingService = ComparisonService<
    PostgresProjectRepository,
    PostgresApplicantRepository,
    PostgresRatingStore,
    PostgresComparisonRepository,
>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub ranking_service: Arc<RankingService>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origin = match config
        .cors_allowed_origin
        .as_deref()
        .map(HeaderValue::from_str)
    {
        Some(Ok(origin)) => AllowOrigin::exact(origin),
        Some(Err(_)) => {
            tracing::warn!("CORS_ALLOWED_ORIGIN is not a valid header value, allowing any origin");
            AllowOrigin::from(Any)
        }
        None => AllowOrigin::from(Any),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ranking_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Ranking API...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(
        k_factor = config.elo_k_factor,
        target = config.target_comparisons_per_applicant,
        strategy = %config.pairing_strategy,
        "Ranking settings loaded"
    );

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Create adapters
    let project_repo = Arc::new(PostgresProjectRepository::new(db.clone()));
    let applicant_repo = Arc::new(PostgresApplicantRepository::new(db.clone()));
    let rating_store = Arc::new(PostgresRatingStore::new(db.clone()));
    let comparison_repo = Arc::new(PostgresComparisonRepository::new(db));

    // Create application services
    let ranking_service = Arc::new(ComparisonService::new(
        project_repo,
        applicant_repo,
        rating_store,
        comparison_repo,
        config.ranking_settings(),
    ));

    let state = AppState { ranking_service };

    // Outcome submissions are the only writes, so they are rate limited per client IP
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(config.outcome_rate_per_second)
            .burst_size(config.outcome_rate_burst)
            .finish()
            .context("Failed to build governor config")?,
    );

    let rate_limited_routes = Router::new()
        .route("/projects/:id/outcomes", post(handlers::record_outcome))
        .layer(GovernorLayer {
            config: governor_config,
        });

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        .route("/projects", get(handlers::list_projects))
        .route("/projects/:id", get(handlers::get_project))
        .route("/projects/:id/pair", get(handlers::get_pair))
        .route("/projects/:id/progress", get(handlers::get_progress))
        .route("/projects/:id/rankings", get(handlers::get_rankings))
        .route("/projects/:id/comparisons", get(handlers::list_comparisons))
        .route("/applicants/:id", get(handlers::get_applicant_rating))
        .merge(rate_limited_routes)
        // Middleware
        .layer(cors_layer(&config))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
