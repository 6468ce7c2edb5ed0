//! Income and expense totals bucketed by day, month or year.

use std::{fmt::Display, str::FromStr};

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::Error;

/// The length of time covered by one summary bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    /// One bucket per date, labelled `YYYY-MM-DD`.
    Daily,
    /// One bucket per calendar month, labelled `YYYY-MM`.
    Monthly,
    /// One bucket per calendar year, labelled `YYYY`.
    Yearly,
}

impl Period {
    /// The SQL expression that turns a transaction date into a bucket label.
    fn bucket_expression(&self) -> &'static str {
        match self {
            Period::Daily => "date",
            Period::Monthly => "strftime('%Y-%m', date)",
            Period::Yearly => "strftime('%Y', date)",
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Period::Daily => "Daily",
            Period::Monthly => "Monthly",
            Period::Yearly => "Yearly",
        };

        f.write_str(name)
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(Period::Daily),
            "monthly" | "month" => Ok(Period::Monthly),
            "yearly" | "year" => Ok(Period::Yearly),
            _ => Err(format!("\"{s}\" is not a report period")),
        }
    }
}

/// The income and expense totals of one bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    /// The bucket label, e.g. "2024-03" for a monthly bucket.
    pub period: String,
    /// The sum of income in the bucket.
    pub income: f64,
    /// The sum of expenses in the bucket.
    pub expenses: f64,
}

impl PeriodSummary {
    /// Income minus expenses.
    pub fn net(&self) -> f64 {
        self.income - self.expenses
    }
}

/// Income and expense totals for each bucket of `period` that has
/// transactions, in chronological order.
///
/// Buckets without transactions are absent, not zero-filled.
pub fn get_period_summaries(
    period: Period,
    connection: &Connection,
) -> Result<Vec<PeriodSummary>, Error> {
    let query = format!(
        "SELECT
            {} AS bucket,
            COALESCE(SUM(CASE WHEN type = 'Income' THEN amount ELSE 0.0 END), 0.0) AS income,
            COALESCE(SUM(CASE WHEN type = 'Expense' THEN amount ELSE 0.0 END), 0.0) AS expenses
        FROM transactions
        GROUP BY bucket
        ORDER BY bucket ASC",
        period.bucket_expression()
    );

    connection
        .prepare(&query)?
        .query_map([], |row| {
            Ok(PeriodSummary {
                period: row.get(0)?,
                income: row.get(1)?,
                expenses: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<PeriodSummary>, rusqlite::Error>>()
        .map_err(|error| error.into())
}
