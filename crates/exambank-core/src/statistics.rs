//! Aggregate score statistics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Percentage of `part` in `all`, in `[0, 100]` for valid inputs.
///
/// An empty whole counts as complete: `percentage(x, 0.0) == 100.0`.
pub fn percentage(part: f64, all: f64) -> f64 {
    if all == 0.0 {
        return 100.0;
    }
    part / all * 100.0
}

/// Arithmetic mean, or `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median, averaging the two middle values for even lengths.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// The first `count` characters of `value`, with an ellipsis if cut.
pub fn short_str(value: &str, count: usize) -> String {
    if value.chars().count() < count {
        return value.to_string();
    }
    let mut short: String = value.chars().take(count).collect();
    short.push_str("...");
    short
}

/// Summary over the scores of all graded exams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    /// Number of graded exams.
    pub participants: usize,
    /// Highest attainable score seen across the exams.
    pub max_score: i64,
    pub mean: f64,
    pub median: f64,
}

impl ScoreSummary {
    /// Summarize `scores`, or `None` if there are none.
    pub fn compute(scores: &[i64], max_score: i64) -> Option<Self> {
        let values: Vec<f64> = scores.iter().map(|s| *s as f64).collect();
        Some(Self {
            participants: scores.len(),
            max_score,
            mean: mean(&values)?,
            median: median(&values)?,
        })
    }
}

/// How often each score was given for one question.
pub type ScoreDistribution = BTreeMap<i64, usize>;

/// Share of each score in a distribution, as `(score, count, percent)`.
pub fn distribution_shares(distribution: &ScoreDistribution) -> Vec<(i64, usize, f64)> {
    let total: usize = distribution.values().sum();
    distribution
        .iter()
        .map(|(score, count)| (*score, *count, percentage(*count as f64, total as f64)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_of_nothing_is_full() {
        assert_eq!(percentage(0.0, 0.0), 100.0);
        assert_eq!(percentage(3.0, 0.0), 100.0);
        assert_eq!(percentage(1.0, 2.0), 50.0);
    }

    #[test]
    fn mean_and_median() {
        assert_eq!(mean(&[]), None);
        assert_eq!(median(&[]), None);
        assert_eq!(mean(&[1.0, 2.0, 6.0]), Some(3.0));
        assert_eq!(median(&[6.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn short_str_truncates_long_text() {
        assert_eq!(short_str("short", 32), "short");
        assert_eq!(short_str("abcdef", 3), "abc...");
        assert_eq!(short_str("żółw", 2), "żó...");
    }

    #[test]
    fn summary_of_scores() {
        let summary = ScoreSummary::compute(&[2, 4, 9], 10).unwrap();
        assert_eq!(summary.participants, 3);
        assert_eq!(summary.mean, 5.0);
        assert_eq!(summary.median, 4.0);
        assert!(ScoreSummary::compute(&[], 10).is_none());
    }

    #[test]
    fn distribution_shares_sum_to_hundred() {
        let mut dist = ScoreDistribution::new();
        dist.insert(0, 1);
        dist.insert(2, 3);
        let shares = distribution_shares(&dist);
        assert_eq!(shares, vec![(0, 1, 25.0), (2, 3, 75.0)]);
    }
}
