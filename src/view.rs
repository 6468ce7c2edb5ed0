//! View models for the screens of the application.
//!
//! Each view is loaded from the [LedgerStore] in one go and then handed to
//! the renderer. Views hold plain data only.

use serde::{Deserialize, Serialize};

use crate::{
    Error, LedgerStore,
    statistics::AmountStatistics,
    summary::{CategoryTotal, Period, PeriodSummary},
    transaction::{Transaction, TransactionKind},
};

/// The number of transactions listed on the dashboard.
pub const RECENT_TRANSACTION_COUNT: u32 = 10;

/// The number of months shown by the trend view.
pub const TREND_MONTHS: usize = 12;

/// The trend view needs at least this many months with transactions.
pub const MIN_TREND_MONTHS: usize = 3;

/// The overview shown when the application starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    /// Total income minus total expenses.
    pub balance: f64,
    /// The sum of all income.
    pub total_income: f64,
    /// The sum of all expenses.
    pub total_expenses: f64,
    /// The sum of income in the current month.
    pub monthly_income: f64,
    /// The sum of expenses in the current month.
    pub monthly_expenses: f64,
    /// The most recent transactions, newest first.
    pub recent_transactions: Vec<Transaction>,
    /// Expense totals per category, largest first.
    pub expenses_by_category: Vec<CategoryTotal>,
}

impl DashboardView {
    /// Load the dashboard figures from `store`.
    pub fn load(store: &LedgerStore) -> Result<Self, Error> {
        let total_income = store.total_income()?;
        let total_expenses = store.total_expenses()?;

        Ok(Self {
            balance: total_income - total_expenses,
            total_income,
            total_expenses,
            monthly_income: store.monthly_income()?,
            monthly_expenses: store.monthly_expenses()?,
            recent_transactions: store.recent_transactions(RECENT_TRANSACTION_COUNT)?,
            expenses_by_category: store.expenses_by_category()?,
        })
    }
}

/// Income, expenses and net income per day, month or year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportView {
    /// The length of each row's period.
    pub period: Period,
    /// One row per period with transactions, oldest first.
    pub rows: Vec<PeriodSummary>,
}

impl ReportView {
    /// Load the report for `period` from `store`.
    pub fn load(store: &LedgerStore, period: Period) -> Result<Self, Error> {
        Ok(Self {
            period,
            rows: store.summary(period)?,
        })
    }
}

/// The distribution of income and expense amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsView {
    /// Statistics of the income amounts, `None` without income.
    pub income: Option<AmountStatistics>,
    /// Statistics of the expense amounts, `None` without expenses.
    pub expenses: Option<AmountStatistics>,
}

impl StatisticsView {
    /// Load the amount statistics from `store`.
    pub fn load(store: &LedgerStore) -> Result<Self, Error> {
        let income = store.transaction_amounts(TransactionKind::Income)?;
        let expenses = store.transaction_amounts(TransactionKind::Expense)?;

        Ok(Self {
            income: AmountStatistics::from_amounts(&income),
            expenses: AmountStatistics::from_amounts(&expenses),
        })
    }

    /// Comparing the distributions needs both income and expenses.
    pub fn has_enough_data(&self) -> bool {
        self.income.is_some() && self.expenses.is_some()
    }
}

/// Income, expenses and net income over the most recent months.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendView {
    /// Up to [TREND_MONTHS] of the latest months with transactions, oldest first.
    pub months: Vec<PeriodSummary>,
}

impl TrendView {
    /// Load the latest months from `store`.
    pub fn load(store: &LedgerStore) -> Result<Self, Error> {
        Ok(Self::from_monthly_summary(store.monthly_summary()?))
    }

    /// Keep the last [TREND_MONTHS] entries of a chronological monthly summary.
    pub fn from_monthly_summary(mut monthly_summary: Vec<PeriodSummary>) -> Self {
        let skip = monthly_summary.len().saturating_sub(TREND_MONTHS);
        monthly_summary.drain(..skip);

        Self {
            months: monthly_summary,
        }
    }

    /// Whether there are at least [MIN_TREND_MONTHS] months to show.
    pub fn has_enough_data(&self) -> bool {
        self.months.len() >= MIN_TREND_MONTHS
    }
}
