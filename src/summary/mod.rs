//! Aggregate queries over the transaction table.
//!
//! These back the dashboard figures, the periodic reports and the export.

mod category;
mod period;
mod totals;

pub use category::{CategoryTotal, get_category_summary, get_expenses_by_category};
pub use period::{Period, PeriodSummary, get_period_summaries};
pub use totals::{get_balance, get_total, get_total_in_month};
