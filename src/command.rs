//! User actions and the dispatcher that carries them out.
//!
//! The presentation layer turns each user action into a [Command] and hands it
//! to [dispatch], which is the single place that calls into the
//! [LedgerStore] on the user's behalf.

use std::path::PathBuf;

use serde::Serialize;

use crate::{
    Error, LedgerStore,
    category::{Category, CategoryName},
    export::{ExportStatistics, export_report},
    summary::Period,
    transaction::{
        Transaction, TransactionFilter, TransactionKind, parse_amount, parse_date,
    },
    view::{DashboardView, ReportView, StatisticsView, TrendView},
};

/// Something the user asked the application to do.
///
/// Free text fields hold the user's input as typed. They are validated by
/// [dispatch].
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Create a new category.
    AddCategory {
        /// The name of the new category.
        name: String,
    },
    /// Delete an unused category.
    DeleteCategory {
        /// The name of the category to delete.
        name: String,
    },
    /// List the category names.
    ListCategories,
    /// Record an income or expense.
    AddTransaction {
        /// Whether money was earned or spent.
        kind: TransactionKind,
        /// The amount as typed by the user.
        amount: String,
        /// The category name as typed by the user.
        category: String,
        /// An optional description.
        description: Option<String>,
        /// An optional date in the `YYYY-MM-DD` format, defaults to today.
        date: Option<String>,
    },
    /// List the transactions matching a filter.
    ListTransactions(TransactionFilter),
    /// Show the balance, totals and recent transactions.
    Dashboard,
    /// Show income and expenses per day, month or year.
    Report(Period),
    /// Show the distribution of income and expense amounts.
    Statistics,
    /// Show the latest months of income, expenses and net income.
    Trend,
    /// Write the ledger to CSV files.
    Export {
        /// The directory to write the files to.
        directory: PathBuf,
    },
}

/// The result of a successful [Command].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "response", content = "data", rename_all = "snake_case")]
pub enum Response {
    /// The category was created.
    CategoryAdded(Category),
    /// The category was deleted.
    CategoryDeleted(CategoryName),
    /// The sorted category names.
    Categories(Vec<CategoryName>),
    /// The transaction was recorded.
    TransactionAdded(Transaction),
    /// The matching transactions, most recent first.
    Transactions(Vec<Transaction>),
    /// The dashboard figures.
    Dashboard(DashboardView),
    /// A periodic report.
    Report(ReportView),
    /// Amount statistics.
    Statistics(StatisticsView),
    /// The monthly trend.
    Trend(TrendView),
    /// The export files were written.
    Exported {
        /// Where the files were written.
        directory: PathBuf,
        /// The figures written to the statistics file.
        statistics: ExportStatistics,
    },
}

/// Carry out `command` against `store`.
///
/// # Errors
/// Returns whichever [Error] the underlying store operation or input
/// validation produced. No error leaves a partial write behind.
pub fn dispatch(store: &LedgerStore, command: Command) -> Result<Response, Error> {
    tracing::debug!("Dispatching {command:?}");

    match command {
        Command::AddCategory { name } => store.add_category(&name).map(Response::CategoryAdded),
        Command::DeleteCategory { name } => {
            let name = CategoryName::new(&name)?;
            store.delete_category(name.as_ref())?;

            Ok(Response::CategoryDeleted(name))
        }
        Command::ListCategories => store.list_categories().map(Response::Categories),
        Command::AddTransaction {
            kind,
            amount,
            category,
            description,
            date,
        } => {
            let amount = parse_amount(&amount)?;
            let category = CategoryName::new(&category)
                .map_err(|_| Error::UnknownCategory(category.clone()))?;
            let mut builder = Transaction::build(kind, amount, category);

            if let Some(description) = description {
                builder = builder.description(&description);
            }

            if let Some(date) = date {
                builder = builder.date(parse_date(&date)?);
            }

            store.add_transaction(builder).map(Response::TransactionAdded)
        }
        Command::ListTransactions(filter) => {
            store.query_transactions(&filter).map(Response::Transactions)
        }
        Command::Dashboard => DashboardView::load(store).map(Response::Dashboard),
        Command::Report(period) => ReportView::load(store, period).map(Response::Report),
        Command::Statistics => StatisticsView::load(store).map(Response::Statistics),
        Command::Trend => TrendView::load(store).map(Response::Trend),
        Command::Export { directory } => {
            let statistics = export_report(store, &directory)?;

            Ok(Response::Exported {
                directory,
                statistics,
            })
        }
    }
}
