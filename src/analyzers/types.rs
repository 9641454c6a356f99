//! Result rows returned by the analytics queries.

use serde::Serialize;

/// Row of [`most_popular`](super::engine::MovieAnalytics::most_popular).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopularMovie {
    pub title: String,
    pub popularity: f64,
    pub vote_count: u64,
    pub release_year: i32,
}

/// Row of [`top_rated`](super::engine::MovieAnalytics::top_rated).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatedMovie {
    pub title: String,
    pub weighted_rating: f64,
    pub vote_count: u64,
    pub vote_average: f64,
}

/// Per-genre average rating and distinct movie count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreStats {
    pub genre: String,
    pub average_rating: f64,
    pub movie_count: usize,
}

/// Number of distinct movies released in a year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub movie_count: usize,
}

/// Number of distinct movies per original language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageCount {
    pub language: String,
    pub movie_count: usize,
}
