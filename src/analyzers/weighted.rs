/// Quantile of vote counts used as the default minimum-votes prior `m`.
pub const VOTE_THRESHOLD_QUANTILE: f64 = 0.70;

/// Bayesian weighted rating.
///
/// `WR = (v / (v + m)) * R + (m / (v + m)) * C`
///
/// where `v` is the movie's vote count, `r` its average rating, `m` the
/// minimum-votes prior and `c` the dataset-wide mean rating. When `v + m` is
/// zero there is no evidence either way and the result is `c`.
pub fn weighted_rating(v: f64, r: f64, m: f64, c: f64) -> f64 {
    let total = v + m;
    if total == 0.0 {
        return c;
    }
    (v / total) * r + (m / total) * c
}
