//! Survey score rules and aggregate statistics.
//!
//! Scores are integers 1..=5. Aggregation is done in Rust rather than SQL
//! so the same distribution logic serves both the statistics endpoint and
//! the dashboard widgets.

use serde::Serialize;

use crate::error::CoreError;

/// Lowest accepted satisfaction score.
pub const MIN_SCORE: i16 = 1;
/// Highest accepted satisfaction score.
pub const MAX_SCORE: i16 = 5;

/// Validate a submitted score.
pub fn validate_score(score: i16) -> Result<(), CoreError> {
    if (MIN_SCORE..=MAX_SCORE).contains(&score) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Score must be between {MIN_SCORE} and {MAX_SCORE}, got {score}"
        )))
    }
}

/// Aggregate statistics over a set of scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreStats {
    /// Number of responses.
    pub count: usize,
    /// Mean score, `None` when there are no responses.
    pub mean: Option<f64>,
    /// Responses per score value, indexed `[score 1, score 2, ... score 5]`.
    pub distribution: [usize; 5],
}

impl ScoreStats {
    /// Compute statistics over raw score values. Out-of-range values are
    /// ignored (they cannot be inserted, but old data is not trusted).
    pub fn from_scores(scores: &[i16]) -> Self {
        let mut distribution = [0usize; 5];
        let mut sum: i64 = 0;
        let mut count = 0usize;

        for &score in scores {
            if (MIN_SCORE..=MAX_SCORE).contains(&score) {
                distribution[(score - 1) as usize] += 1;
                sum += i64::from(score);
                count += 1;
            }
        }

        let mean = if count > 0 {
            Some(sum as f64 / count as f64)
        } else {
            None
        };

        Self {
            count,
            mean,
            distribution,
        }
    }
}
