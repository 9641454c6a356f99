/// Row-level outcomes of a preprocessing run.
///
/// Skipped rows and defaulted fields are data-quality metrics, not errors.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleaningReport {
    pub raw_rows: usize,

    // rows removed
    pub dropped_invalid_date: usize,
    pub dropped_duplicate: usize,

    // fields defaulted to zero
    pub defaulted_popularity: usize,
    pub defaulted_vote_count: usize,
    pub defaulted_vote_average: usize,

    // sentinel categories
    pub unknown_language: usize,
    pub unknown_genre: usize,

    // output shape
    pub retained_movies: usize,
    pub canonical_rows: usize,
}

impl CleaningReport {
    pub fn pct(part: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }

    /// Share of raw rows that survived date validation and de-duplication.
    pub fn retention_pct(&self) -> f64 {
        Self::pct(self.retained_movies, self.raw_rows)
    }

    /// Average number of canonical rows each retained movie expanded into.
    pub fn explosion_factor(&self) -> f64 {
        if self.retained_movies == 0 {
            0.0
        } else {
            self.canonical_rows as f64 / self.retained_movies as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pct_with_zero_total() {
        assert_eq!(CleaningReport::pct(10, 0), 0.0);
    }

    #[test]
    fn test_pct_normal_values() {
        assert_eq!(CleaningReport::pct(50, 100), 50.0);
        assert_eq!(CleaningReport::pct(1, 4), 25.0);
    }

    #[test]
    fn test_retention_pct() {
        let report = CleaningReport {
            raw_rows: 4,
            dropped_invalid_date: 1,
            retained_movies: 3,
            ..Default::default()
        };

        assert_eq!(report.retention_pct(), 75.0);
    }

    #[test]
    fn test_explosion_factor_empty() {
        assert_eq!(CleaningReport::default().explosion_factor(), 0.0);
    }

    #[test]
    fn test_explosion_factor() {
        let report = CleaningReport {
            retained_movies: 2,
            canonical_rows: 5,
            ..Default::default()
        };

        assert_eq!(report.explosion_factor(), 2.5);
    }
}
