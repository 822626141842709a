//! Intern Portal Backend
//!
//! REST backend for the intern portal. Data lives in a remote document store
//! when one is configured and reachable at startup, and in a local SQLite
//! key/value store otherwise.

mod api;
mod config;
mod db;
mod errors;
mod models;
mod service;

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::{BackendMode, LocalStore};
use service::PortalService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub portal: Arc<PortalService>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Intern Portal Backend");
    tracing::info!("Local store path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Local store is always available; export/import depend on it
    let pool = db::init_database(&config.db_path).await?;
    let local = LocalStore::new(pool);

    // Remote store is resolved once and never retried
    let remote = db::connect_remote(config.remote_url.as_deref(), &config.remote_database).await;
    let portal = Arc::new(PortalService::new(local, remote));
    tracing::info!("Persistence mode: {:?}", portal.mode());

    if let Some(path) = &config.import_file {
        let imported = portal.import_file(path).await;
        let message = imported.message.unwrap_or_default();
        if imported.success {
            tracing::info!("{} from {}", message, path.display());
        } else {
            tracing::warn!("Import from {} failed: {}", path.display(), message);
        }
    }

    if config.seed_rewards {
        let seeded = service::seed_default_rewards(&portal).await;
        if !seeded.success {
            tracing::warn!(
                "Could not seed default rewards: {}",
                seeded.message.unwrap_or_default()
            );
        }
    }

    let state = AppState {
        portal: portal.clone(),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on http://{}", config.bind_addr);
    tracing::info!("API available at http://{}/api", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(dir) = &config.export_dir {
        let exported = portal.export_to_dir(dir).await;
        if !exported.success {
            tracing::warn!(
                "Export to {} failed: {}",
                dir.display(),
                exported.message.unwrap_or_default()
            );
        }
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Interns
        .route("/interns", get(api::list_interns).post(api::save_intern))
        .route("/interns/{id}", get(api::get_intern))
        .route("/interns/{id}/donations", put(api::update_donations))
        // Rewards
        .route("/rewards", get(api::list_rewards).put(api::save_rewards))
        // Dashboard
        .route("/dashboard", get(api::get_dashboard))
        // Data management
        .route("/export", get(api::export_data))
        .route("/import", post(api::import_data))
        // Health
        .route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check payload.
#[derive(Debug, Serialize)]
struct HealthResponse {
    success: bool,
    message: &'static str,
    timestamp: DateTime<Utc>,
    backend: BackendMode,
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        message: "Server is running",
        timestamp: Utc::now(),
        backend: state.portal.mode(),
    })
}
