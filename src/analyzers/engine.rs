use chrono::{Datelike, NaiveDate};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::debug;

use crate::analyzers::types::{GenreStats, LanguageCount, PopularMovie, RatedMovie, YearCount};
use crate::analyzers::utility::{mean, percentile};
use crate::analyzers::weighted::{VOTE_THRESHOLD_QUANTILE, weighted_rating};
use crate::error::{QueryError, StoreError};
use crate::output::load_canonical;
use crate::preprocess::types::CanonicalRecord;

/// A distinct movie, reassembled from its genre-exploded canonical rows.
///
/// Identity is `(title, release_date)`; when the same identity appears more
/// than once the first occurrence's fields win.
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub title: String,
    pub release_date: NaiveDate,
    pub popularity: f64,
    pub vote_count: u64,
    pub vote_average: f64,
    pub original_language: String,
    pub genres: Vec<String>,
}

/// Immutable snapshot of the canonical dataset with the five analytics
/// queries over it.
///
/// Construction does the deduplication; every query afterwards only reads,
/// so a single instance can be shared across threads behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct MovieAnalytics {
    movies: Vec<Movie>,
}

impl MovieAnalytics {
    /// Builds the snapshot from canonical rows, preserving first-seen order.
    pub fn from_records(records: &[CanonicalRecord]) -> Self {
        let mut movies: Vec<Movie> = Vec::new();
        let mut index: HashMap<(&str, NaiveDate), usize> = HashMap::new();

        for record in records {
            let key = (record.title.as_str(), record.release_date);
            match index.get(&key) {
                Some(&i) => {
                    let genres = &mut movies[i].genres;
                    if !genres.contains(&record.genre) {
                        genres.push(record.genre.clone());
                    }
                }
                None => {
                    index.insert(key, movies.len());
                    movies.push(Movie {
                        title: record.title.clone(),
                        release_date: record.release_date,
                        popularity: record.popularity,
                        vote_count: record.vote_count,
                        vote_average: record.vote_average,
                        original_language: record.original_language.clone(),
                        genres: vec![record.genre.clone()],
                    });
                }
            }
        }

        debug!(
            rows = records.len(),
            movies = movies.len(),
            "Analytics snapshot built"
        );
        Self { movies }
    }

    /// Loads the persisted canonical dataset at `path`.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let records = load_canonical(path)?;
        Ok(Self::from_records(&records))
    }

    /// Distinct movies in first-seen order.
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Mean `vote_average` over distinct movies (`C`).
    pub fn mean_vote_average(&self) -> f64 {
        let ratings: Vec<f64> = self.movies.iter().map(|m| m.vote_average).collect();
        mean(&ratings)
    }

    /// 70th percentile of `vote_count` over distinct movies (`m`).
    pub fn vote_threshold(&self) -> f64 {
        let counts: Vec<f64> = self.movies.iter().map(|m| m.vote_count as f64).collect();
        percentile(&counts, VOTE_THRESHOLD_QUANTILE)
    }

    /// Top `limit` movies by popularity, highest first, ties by title.
    pub fn most_popular(&self, limit: usize) -> Result<Vec<PopularMovie>, QueryError> {
        check_limit(limit)?;

        let mut ranked: Vec<&Movie> = self.movies.iter().collect();
        ranked.sort_by(|a, b| {
            b.popularity
                .total_cmp(&a.popularity)
                .then_with(|| by_identity(a, b))
        });

        Ok(ranked
            .into_iter()
            .take(limit)
            .map(|m| PopularMovie {
                title: m.title.clone(),
                popularity: m.popularity,
                vote_count: m.vote_count,
                release_year: m.release_date.year(),
            })
            .collect())
    }

    /// Top `limit` movies by Bayesian weighted rating, ties by title.
    ///
    /// `min_votes` replaces the computed vote threshold `m` when supplied.
    pub fn top_rated(
        &self,
        limit: usize,
        min_votes: Option<u64>,
    ) -> Result<Vec<RatedMovie>, QueryError> {
        check_limit(limit)?;

        let c = self.mean_vote_average();
        let m = min_votes.map_or_else(|| self.vote_threshold(), |v| v as f64);
        debug!(c, m, movies = self.movies.len(), "Computing weighted ratings");

        let mut scored: Vec<(f64, &Movie)> = self
            .movies
            .iter()
            .map(|movie| {
                let wr = weighted_rating(movie.vote_count as f64, movie.vote_average, m, c);
                (wr, movie)
            })
            .collect();
        scored.sort_by(|(wa, a), (wb, b)| wb.total_cmp(wa).then_with(|| by_identity(a, b)));

        Ok(scored
            .into_iter()
            .take(limit)
            .map(|(wr, movie)| RatedMovie {
                title: movie.title.clone(),
                weighted_rating: wr,
                vote_count: movie.vote_count,
                vote_average: movie.vote_average,
            })
            .collect())
    }

    /// Average rating and distinct movie count per genre, best-rated first.
    pub fn by_genre(&self) -> Vec<GenreStats> {
        let mut groups: HashMap<&str, (f64, usize)> = HashMap::new();
        for movie in &self.movies {
            for genre in &movie.genres {
                let entry = groups.entry(genre.as_str()).or_default();
                entry.0 += movie.vote_average;
                entry.1 += 1;
            }
        }

        let mut rows: Vec<GenreStats> = groups
            .into_iter()
            .map(|(genre, (sum, count))| GenreStats {
                genre: genre.to_string(),
                average_rating: sum / count as f64,
                movie_count: count,
            })
            .collect();
        rows.sort_by(|a, b| {
            b.average_rating
                .total_cmp(&a.average_rating)
                .then_with(|| a.genre.cmp(&b.genre))
        });
        rows
    }

    /// Distinct movies released per year, oldest first.
    pub fn yearly_trends(&self) -> Vec<YearCount> {
        let mut years: BTreeMap<i32, usize> = BTreeMap::new();
        for movie in &self.movies {
            *years.entry(movie.release_date.year()).or_default() += 1;
        }

        years
            .into_iter()
            .map(|(year, movie_count)| YearCount { year, movie_count })
            .collect()
    }

    /// Distinct movies per original language, most common first.
    pub fn language_stats(&self) -> Vec<LanguageCount> {
        let mut languages: HashMap<&str, usize> = HashMap::new();
        for movie in &self.movies {
            *languages.entry(movie.original_language.as_str()).or_default() += 1;
        }

        let mut rows: Vec<LanguageCount> = languages
            .into_iter()
            .map(|(language, movie_count)| LanguageCount {
                language: language.to_string(),
                movie_count,
            })
            .collect();
        rows.sort_by(|a, b| {
            b.movie_count
                .cmp(&a.movie_count)
                .then_with(|| a.language.cmp(&b.language))
        });
        rows
    }
}

fn check_limit(limit: usize) -> Result<(), QueryError> {
    if limit == 0 {
        return Err(QueryError::InvalidLimit(limit));
    }
    Ok(())
}

/// Final tie-break for rankings: title, then release date.
fn by_identity(a: &Movie, b: &Movie) -> Ordering {
    a.title
        .cmp(&b.title)
        .then_with(|| a.release_date.cmp(&b.release_date))
}
