//! Integration tests for the HTTP API.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::NaiveDate;
use movie_analytics::analyzers::MovieAnalytics;
use movie_analytics::output::write_canonical;
use movie_analytics::preprocess::types::CanonicalRecord;
use movie_analytics::server::{AppState, build_router};
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot` method

fn record(title: &str, date: &str, popularity: f64, votes: u64, avg: f64, genre: &str, lang: &str) -> CanonicalRecord {
    CanonicalRecord {
        title: title.to_string(),
        release_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        popularity,
        vote_count: votes,
        vote_average: avg,
        genre: genre.to_string(),
        original_language: lang.to_string(),
    }
}

/// Test helper: app over the two-movie example dataset
fn setup_app() -> axum::Router {
    let analytics = MovieAnalytics::from_records(&[
        record("A", "2020-01-01", 10.0, 100, 8.0, "Drama", "en"),
        record("B", "2021-06-01", 20.0, 5, 9.0, "Drama", "fr"),
        record("B", "2021-06-01", 20.0, 5, 9.0, "Comedy", "fr"),
    ]);
    build_router(AppState::new(analytics), "/api/v1")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app.oneshot(get(uri)).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    (status, serde_json::from_slice(&bytes).expect("Should parse JSON"))
}

#[tokio::test]
async fn test_health_check() {
    let (status, body) = send(setup_app(), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "online");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_most_popular() {
    let (status, body) = send(setup_app(), "/api/v1/movies/most-popular?limit=5").await;

    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["title"], "B");
    assert_eq!(results[0]["release_year"], 2021);
    assert_eq!(results[1]["vote_count"], 100);
}

#[tokio::test]
async fn test_limit_is_clamped() {
    let (status, body) = send(setup_app(), "/api/v1/movies/most-popular?limit=0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"].as_array().unwrap().len(), 1);

    let (status, body) = send(setup_app(), "/api/v1/movies/top-rated?limit=999").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_top_rated_min_votes_override() {
    let (status, body) = send(setup_app(), "/api/v1/movies/top-rated?min_votes=0").await;

    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results[0]["title"], "B");
    assert_eq!(results[0]["weighted_rating"], 9.0);
    assert_eq!(results[1]["weighted_rating"], 8.0);
}

#[tokio::test]
async fn test_aggregate_routes() {
    let (status, body) = send(setup_app(), "/api/v1/movies/by-genre").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"][1]["genre"], "Drama");
    assert_eq!(body["results"][1]["movie_count"], 2);

    let (status, body) = send(setup_app(), "/api/v1/movies/yearly-trends").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"][0]["year"], 2020);
    assert_eq!(body["results"][1]["movie_count"], 1);

    let (status, body) = send(setup_app(), "/api/v1/movies/language-stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"][0]["language"], "en");
}

#[tokio::test]
async fn test_uninitialized_data_layer() {
    let app = build_router(AppState::uninitialized(), "/api/v1");
    let (status, body) = send(app, "/api/v1/movies/by-genre").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("preprocessing"));
}

#[tokio::test]
async fn test_invalid_limit_type_is_rejected() {
    let response = setup_app()
        .oneshot(get("/api/v1/movies/most-popular?limit=ten"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_lazy_state_loads_store_written_after_startup() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cleaned_movies.csv");
    let app = build_router(AppState::lazy(path.clone()), "/api/v1");

    let (status, _) = send(app.clone(), "/api/v1/movies/yearly-trends").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    write_canonical(&path, &[record("A", "2020-01-01", 10.0, 100, 8.0, "Drama", "en")]).unwrap();

    let (status, body) = send(app, "/api/v1/movies/yearly-trends").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"][0]["year"], 2020);
    assert_eq!(body["results"][0]["movie_count"], 1);
}

#[tokio::test]
async fn test_lazy_state_reports_malformed_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cleaned_movies.csv");
    std::fs::write(&path, "title,release_date\nA,not-a-date\n").unwrap();
    let app = build_router(AppState::lazy(path), "/api/v1");

    let (status, body) = send(app, "/api/v1/movies/by-genre").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}
