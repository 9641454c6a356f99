//! Route handlers. Each returns the engine's rows verbatim inside a
//! `{"results": [...]}` envelope.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::analyzers::types::{GenreStats, LanguageCount, PopularMovie, RatedMovie, YearCount};
use crate::config::PROJECT_NAME;
use crate::server::{ApiError, AppState};

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 50;

/// Response envelope shared by every movie route.
#[derive(Debug, Serialize)]
pub struct Results<T> {
    pub results: Vec<T>,
}

impl<T> Results<T> {
    fn new(results: Vec<T>) -> Json<Self> {
        Json(Self { results })
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

#[derive(Debug, Deserialize)]
pub struct TopRatedQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Replaces the computed minimum-votes prior when present.
    pub min_votes: Option<u64>,
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

/// Clamps a requested limit into `[1, MAX_LIMIT]`.
pub fn clamp_limit(limit: i64) -> usize {
    limit.clamp(1, MAX_LIMIT) as usize
}

/// GET /
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "online".to_string(),
        message: format!("{PROJECT_NAME} API is running"),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET {prefix}/movies/most-popular?limit=
pub async fn most_popular(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Results<PopularMovie>>, ApiError> {
    let rows = state.analytics().await?.most_popular(clamp_limit(query.limit))?;
    Ok(Results::new(rows))
}

/// GET {prefix}/movies/top-rated?limit=&min_votes=
pub async fn top_rated(
    State(state): State<AppState>,
    Query(query): Query<TopRatedQuery>,
) -> Result<Json<Results<RatedMovie>>, ApiError> {
    let rows = state
        .analytics()
        .await?
        .top_rated(clamp_limit(query.limit), query.min_votes)?;
    Ok(Results::new(rows))
}

/// GET {prefix}/movies/by-genre
pub async fn by_genre(State(state): State<AppState>) -> Result<Json<Results<GenreStats>>, ApiError> {
    Ok(Results::new(state.analytics().await?.by_genre()))
}

/// GET {prefix}/movies/yearly-trends
pub async fn yearly_trends(
    State(state): State<AppState>,
) -> Result<Json<Results<YearCount>>, ApiError> {
    Ok(Results::new(state.analytics().await?.yearly_trends()))
}

/// GET {prefix}/movies/language-stats
pub async fn language_stats(
    State(state): State<AppState>,
) -> Result<Json<Results<LanguageCount>>, ApiError> {
    Ok(Results::new(state.analytics().await?.language_stats()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(-5), 1);
        assert_eq!(clamp_limit(0), 1);
        assert_eq!(clamp_limit(10), 10);
        assert_eq!(clamp_limit(50), 50);
        assert_eq!(clamp_limit(500), 50);
    }
}
