//! Plain text rendering of command responses for the terminal.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

use crate::{
    command::Response,
    export::{CATEGORY_SUMMARY_FILE_NAME, STATISTICS_FILE_NAME, TRANSACTIONS_FILE_NAME},
    statistics::AmountStatistics,
    summary::{CategoryTotal, PeriodSummary},
    transaction::Transaction,
    view::{DashboardView, MIN_TREND_MONTHS, ReportView, StatisticsView, TrendView},
};

/// numfmt switches to scientific notation from this many dollars upwards.
const SCIENTIFIC_NOTATION_DOLLARS: u64 = 1_000_000_000_000;

/// Format `number` as dollars and cents, e.g. "$1,234.50" or "-$12.30".
///
/// The number is rounded to the nearest cent first, so float residue such as
/// `0.3 - (0.1 + 0.2)` is shown as "$0.00".
pub fn format_currency(number: f64) -> String {
    static DOLLAR_FMT: OnceLock<Formatter> = OnceLock::new();

    let dollar_fmt = DOLLAR_FMT.get_or_init(|| {
        Formatter::currency("$")
            .expect("\"$\" is a valid currency prefix")
            .precision(Precision::Decimals(0))
    });

    let cents = (number * 100.0).round() as i64;

    if cents == 0 {
        return "$0.00".to_owned();
    }

    let sign = if cents < 0 { "-" } else { "" };
    let dollars = cents.unsigned_abs() / 100;
    let remaining_cents = cents.unsigned_abs() % 100;

    // Zero is hardcoded as "0" by numfmt, without the prefix
    let formatted_dollars = if dollars == 0 {
        "$0".to_owned()
    } else if dollars < SCIENTIFIC_NOTATION_DOLLARS {
        dollar_fmt.fmt_string(dollars as f64)
    } else {
        format!("${dollars}")
    };

    format!("{sign}{formatted_dollars}.{remaining_cents:02}")
}

/// Render `response` as text for the terminal.
pub fn render_response(response: &Response) -> String {
    match response {
        Response::CategoryAdded(category) => format!("Added category \"{}\".", category.name),
        Response::CategoryDeleted(name) => format!("Deleted category \"{name}\"."),
        Response::Categories(names) => names
            .iter()
            .map(|name| name.to_string())
            .collect::<Vec<_>>()
            .join("\n"),
        Response::TransactionAdded(transaction) => format!(
            "Added {} of {} in {} on {}.",
            transaction.kind.as_str().to_lowercase(),
            format_currency(transaction.amount),
            transaction.category,
            transaction.date
        ),
        Response::Transactions(transactions) => render_transactions(transactions),
        Response::Dashboard(dashboard) => render_dashboard(dashboard),
        Response::Report(report) => render_report(report),
        Response::Statistics(statistics) => render_statistics(statistics),
        Response::Trend(trend) => render_trend(trend),
        Response::Exported {
            directory,
            statistics,
        } => format!(
            "Exported {TRANSACTIONS_FILE_NAME}, {CATEGORY_SUMMARY_FILE_NAME} and \
            {STATISTICS_FILE_NAME} to {}.\nNet balance {}, savings rate {}.",
            directory.display(),
            format_currency(statistics.net_balance),
            statistics.savings_rate_label()
        ),
    }
}

fn render_transactions(transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return "No transactions found.".to_owned();
    }

    let header = format!(
        "{:>6}  {:<10}  {:<7}  {:<16}  {:>14}  {}",
        "ID", "Date", "Type", "Category", "Amount", "Description"
    );

    let rows = transactions.iter().map(|transaction| {
        format!(
            "{:>6}  {:<10}  {:<7}  {:<16}  {:>14}  {}",
            transaction.id,
            transaction.date.to_string(),
            transaction.kind.as_str(),
            transaction.category.as_ref(),
            format_currency(transaction.amount),
            transaction.description.as_deref().unwrap_or_default()
        )
        .trim_end()
        .to_owned()
    });

    std::iter::once(header)
        .chain(rows)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_category_totals(totals: &[CategoryTotal]) -> String {
    totals
        .iter()
        .map(|total| {
            format!(
                "  {:<16}  {:>14}\n",
                total.category.as_ref(),
                format_currency(total.total)
            )
        })
        .collect()
}

fn render_dashboard(dashboard: &DashboardView) -> String {
    let mut text = format!(
        "Balance: {}\n\n\
        Total income:       {:>14}\n\
        Total expenses:     {:>14}\n\
        Income this month:  {:>14}\n\
        Expenses this month:{:>14}\n",
        format_currency(dashboard.balance),
        format_currency(dashboard.total_income),
        format_currency(dashboard.total_expenses),
        format_currency(dashboard.monthly_income),
        format_currency(dashboard.monthly_expenses),
    );

    if !dashboard.expenses_by_category.is_empty() {
        text.push_str("\nExpenses by category:\n");
        text.push_str(&render_category_totals(&dashboard.expenses_by_category));
    }

    text.push_str("\nRecent transactions:\n");
    text.push_str(&render_transactions(&dashboard.recent_transactions));

    text
}

fn render_period_rows(label: &str, rows: &[PeriodSummary]) -> String {
    let header = format!(
        "{:<10}  {:>14}  {:>14}  {:>14}",
        label, "Income", "Expenses", "Net"
    );

    let rows = rows.iter().map(|row| {
        format!(
            "{:<10}  {:>14}  {:>14}  {:>14}",
            row.period,
            format_currency(row.income),
            format_currency(row.expenses),
            format_currency(row.net())
        )
    });

    std::iter::once(header)
        .chain(rows)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_report(report: &ReportView) -> String {
    if report.rows.is_empty() {
        return "No data available.".to_owned();
    }

    format!(
        "{} report\n\n{}",
        report.period,
        render_period_rows("Period", &report.rows)
    )
}

fn render_amount_statistics(label: &str, statistics: &AmountStatistics) -> String {
    format!(
        "{label}\n  Count:  {}\n  Total:  {}\n  Mean:   {}\n  Median: {}\n  Min:    {}\n  Max:    {}\n",
        statistics.count,
        format_currency(statistics.total),
        format_currency(statistics.mean),
        format_currency(statistics.median),
        format_currency(statistics.min),
        format_currency(statistics.max),
    )
}

fn render_statistics(statistics: &StatisticsView) -> String {
    match (&statistics.income, &statistics.expenses) {
        (Some(income), Some(expenses)) => format!(
            "{}\n{}",
            render_amount_statistics("Income", income),
            render_amount_statistics("Expenses", expenses)
        )
        .trim_end()
        .to_owned(),
        _ => "Both income and expense data are needed for statistics.".to_owned(),
    }
}

fn render_trend(trend: &TrendView) -> String {
    if !trend.has_enough_data() {
        return format!(
            "Not enough data for a trend, at least {MIN_TREND_MONTHS} months of transactions are needed."
        );
    }

    render_period_rows("Month", &trend.months)
}
