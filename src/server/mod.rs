//! HTTP API over the article store.
//!
//! | Route | Handler |
//! |---|---|
//! | `GET /api/articles?category=&search=` | [`routes::list_articles_handler`] |
//! | `GET /api/articles/{id}` | [`routes::get_article_handler`] |
//! | `POST /api/articles/{id}/like` | [`routes::like_article_handler`] |
//! | `GET /api/categories` | [`routes::categories_handler`] |
//! | `GET /api/stats` | [`routes::stats_handler`] |
//! | `GET /api/test` | [`routes::test_handler`] |
//! | `GET /health`, `GET /health/detailed` | [`health`] |
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

pub mod error;
pub mod health;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use health::{detailed_health_handler, health_handler};
use routes::{
    categories_handler, get_article_handler, like_article_handler, list_articles_handler,
    stats_handler, test_handler,
};

use crate::config::Config;
use crate::storage::Database;

/// Build the application router. No listener is bound here.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/test", get(test_handler))
        .route("/api/articles", get(list_articles_handler))
        .route("/api/articles/{id}", get(get_article_handler))
        .route("/api/articles/{id}/like", post(like_article_handler))
        .route("/api/categories", get(categories_handler))
        .route("/api/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .route("/health/detailed", get(detailed_health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serve until Ctrl+C / SIGTERM, then close the pool.
///
/// The caller has already migrated and seeded `db`, so the first request
/// always sees a complete table.
pub async fn serve(config: &Config, db: Database) -> Result<()> {
    let state = AppState::new(db.clone(), &config.service_name);
    let app = router(state);

    let address = config.bind_address();
    info!(address = %address, "Binding listener");
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!(address = %address, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutting down, closing database pool");
    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
