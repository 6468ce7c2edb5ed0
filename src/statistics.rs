//! Descriptive statistics over transaction amounts.

use serde::{Deserialize, Serialize};

/// Summary statistics for a set of transaction amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmountStatistics {
    /// The number of amounts.
    pub count: usize,
    /// The sum of the amounts.
    pub total: f64,
    /// The arithmetic mean.
    pub mean: f64,
    /// The middle amount, or the mean of the two middle amounts.
    pub median: f64,
    /// The smallest amount.
    pub min: f64,
    /// The largest amount.
    pub max: f64,
}

impl AmountStatistics {
    /// Calculate the statistics of `amounts`.
    ///
    /// Returns `None` if `amounts` is empty.
    pub fn from_amounts(amounts: &[f64]) -> Option<Self> {
        if amounts.is_empty() {
            return None;
        }

        let mut sorted = amounts.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let total: f64 = sorted.iter().sum();
        let middle = count / 2;
        let median = if count % 2 == 0 {
            (sorted[middle - 1] + sorted[middle]) / 2.0
        } else {
            sorted[middle]
        };

        Some(Self {
            count,
            total,
            mean: total / count as f64,
            median,
            min: sorted[0],
            max: sorted[count - 1],
        })
    }
}
