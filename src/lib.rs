//! A personal finance tracker.
//!
//! Income and expense transactions are recorded against user-defined
//! categories and persisted in a local SQLite database. The [LedgerStore]
//! owns the database and answers the aggregate queries (balances, per-category
//! totals, daily/monthly/yearly summaries) that the dashboards, reports and
//! exports are built from.

#![warn(missing_docs)]

mod category;
mod command;
mod database_id;
mod db;
mod export;
mod logging;
mod render;
mod statistics;
mod store;
mod summary;
mod timezone;
mod transaction;
mod view;

pub use category::{Category, CategoryName, DEFAULT_CATEGORIES};
pub use command::{Command, Response, dispatch};
pub use database_id::{CategoryId, TransactionId};
pub use db::initialize as initialize_db;
pub use export::{ExportStatistics, export_report};
pub use logging::setup_logging;
pub use render::{format_currency, render_response};
pub use statistics::AmountStatistics;
pub use store::LedgerStore;
pub use summary::{CategoryTotal, Period, PeriodSummary};
pub use timezone::get_local_offset;
pub use transaction::{
    Transaction, TransactionBuilder, TransactionFilter, TransactionKind, parse_amount, parse_date,
};
pub use view::{DashboardView, ReportView, StatisticsView, TrendView};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A category with the same name already exists.
    #[error("the category \"{0}\" already exists")]
    DuplicateCategory(String),

    /// The category is referenced by at least one transaction and cannot be
    /// deleted.
    #[error("the category \"{0}\" is used by one or more transactions")]
    CategoryInUse(String),

    /// A transaction referred to a category name that does not exist.
    #[error("the category \"{0}\" does not exist")]
    UnknownCategory(String),

    /// Tried to delete a category that does not exist.
    #[error("tried to delete the category \"{0}\" which is not in the database")]
    DeleteMissingCategory(String),

    /// An empty string was used to create a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// The amount was not a number, or was zero or negative.
    ///
    /// Callers should pass in the offending input as a string.
    #[error("\"{0}\" is not a valid amount, amounts must be numbers greater than zero")]
    InvalidAmount(String),

    /// A date was not in the `YYYY-MM-DD` format.
    #[error("\"{0}\" is not a valid date, expected the format YYYY-MM-DD")]
    InvalidDate(String),

    /// A canonical timezone string could not be resolved.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// An export was requested but there are no transactions to export.
    #[error("there are no transactions to export")]
    NothingToExport,

    /// Writing the export files failed.
    #[error("could not write the export: {0}")]
    ExportFailed(String),

    /// The database file could not be opened, read or written.
    #[error("the database is unavailable: {0}")]
    StorageUnavailable(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::StorageUnavailable(value)
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Error::ExportFailed(value.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::ExportFailed(value.to_string())
    }
}
