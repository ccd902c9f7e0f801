//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod handlers;
mod settings;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use auth::application::BootstrapUserUseCase;
use auth::presentation::{AuthAppState, require_session_auth};
use auth::{ConfiguredSessionStore, PgUserRepository, SessionMetrics, auth_router};
use axum::http::{StatusCode, header};
use axum::middleware::from_fn_with_state;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Router, extract::State};
use prometheus::{Encoder, Registry, TextEncoder};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env()?;

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&settings.database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Metrics
    let registry = Registry::new();
    let metrics = SessionMetrics::new()?;
    metrics.register(&registry)?;

    // Session store: must be reachable before we accept traffic
    let store = ConfiguredSessionStore::connect(&settings.session_backend, &settings.auth, metrics)
        .await
        .with_context(|| {
            format!(
                "Session backend `{}` is unavailable",
                settings.session_backend.name()
            )
        })?;

    let config = Arc::new(settings.auth);
    let users = Arc::new(PgUserRepository::new(pool.clone()));

    if let Some(input) = settings.bootstrap_user {
        let output = BootstrapUserUseCase::new(users.clone(), config.clone())
            .execute(input)
            .await
            .map_err(|e| anyhow::anyhow!("Bootstrap user failed: {e}"))?;
        tracing::info!(created = output.created, "Bootstrap user checked");
    }

    let auth_state = AuthAppState::new(Arc::new(store), users, config);

    // Build router
    let app = Router::new()
        .route("/", get(handlers::hello).post(handlers::echo))
        .route("/{slug}", get(handlers::slug))
        .merge(auth_router(auth_state.clone()))
        .layer(from_fn_with_state(
            auth_state.middleware_state(),
            require_session_auth::<ConfiguredSessionStore>,
        ))
        // Scrape endpoint stays outside the session check
        .merge(
            Router::new()
                .route("/metrics", get(metrics_handler))
                .with_state(Arc::new(registry)),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// GET /metrics (Prometheus text format)
async fn metrics_handler(State(registry): State<Arc<Registry>>) -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();

    match encoder.encode(&registry.gather(), &mut buffer) {
        Ok(()) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, encoder.format_type().to_string())],
            buffer,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
