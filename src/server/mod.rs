//! HTTP API over the analytics engine.
//!
//! Thin translation layer: clamps `limit`, calls the engine, wraps rows as
//! `{"results": [...]}` and maps engine failures to status codes.

mod error;
pub mod routes;

pub use error::ApiError;

use axum::{Router, routing::get};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::analyzers::MovieAnalytics;
use crate::error::StoreError;

/// Application state shared across HTTP handlers.
///
/// The snapshot is loaded at most once. A server started before the
/// canonical store exists keeps retrying the load on each request until it
/// succeeds.
#[derive(Clone, Default)]
pub struct AppState {
    snapshot: Arc<OnceCell<Arc<MovieAnalytics>>>,
    data_path: Option<PathBuf>,
}

impl AppState {
    pub fn new(analytics: MovieAnalytics) -> Self {
        Self {
            snapshot: Arc::new(OnceCell::new_with(Some(Arc::new(analytics)))),
            data_path: None,
        }
    }

    /// State that loads the canonical store at `data_path` on first use.
    pub fn lazy(data_path: PathBuf) -> Self {
        Self {
            snapshot: Arc::new(OnceCell::new()),
            data_path: Some(data_path),
        }
    }

    /// State with no dataset and nowhere to load one from.
    pub fn uninitialized() -> Self {
        Self::default()
    }

    async fn analytics(&self) -> Result<Arc<MovieAnalytics>, ApiError> {
        if let Some(analytics) = self.snapshot.get() {
            return Ok(analytics.clone());
        }
        let path = self.data_path.as_deref().ok_or(ApiError::DataUnavailable)?;

        let analytics = self
            .snapshot
            .get_or_try_init(|| async {
                let analytics = MovieAnalytics::load(path)?;
                info!(movies = analytics.len(), "Data layer initialized");
                Ok::<_, StoreError>(Arc::new(analytics))
            })
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => ApiError::DataUnavailable,
                other => ApiError::Store(other),
            })?;
        Ok(analytics.clone())
    }
}

/// Builds the application router with movie routes nested under
/// `{api_prefix}/movies`.
pub fn build_router(state: AppState, api_prefix: &str) -> Router {
    let movies = Router::new()
        .route("/most-popular", get(routes::most_popular))
        .route("/top-rated", get(routes::top_rated))
        .route("/by-genre", get(routes::by_genre))
        .route("/yearly-trends", get(routes::yearly_trends))
        .route("/language-stats", get(routes::language_stats));

    Router::new()
        .route("/", get(routes::health_check))
        .nest(&format!("{api_prefix}/movies"), movies)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `bind_addr` and serves until Ctrl+C.
pub async fn serve(bind_addr: &str, router: Router) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!(addr = %listener.local_addr()?, "API listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
