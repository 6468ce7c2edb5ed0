//! Exports the ledger as spreadsheet-friendly CSV files.
//!
//! An export is a directory with three files:
//! - `transactions.csv`: every transaction, most recent first,
//! - `category_summary.csv`: totals per category and kind,
//! - `summary_statistics.csv`: total income, total expenses, net balance and
//!   savings rate.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    Error, LedgerStore,
    summary::CategoryTotal,
    transaction::{Transaction, TransactionKind},
};

/// File name of the transaction sheet.
pub const TRANSACTIONS_FILE_NAME: &str = "transactions.csv";
/// File name of the category summary sheet.
pub const CATEGORY_SUMMARY_FILE_NAME: &str = "category_summary.csv";
/// File name of the summary statistics sheet.
pub const STATISTICS_FILE_NAME: &str = "summary_statistics.csv";

const EXPORT_FILE_NAMES: [&str; 3] = [
    TRANSACTIONS_FILE_NAME,
    CATEGORY_SUMMARY_FILE_NAME,
    STATISTICS_FILE_NAME,
];

/// Export files are written here first, so a failed export writes nothing.
const STAGING_DIR_NAME: &str = ".export_in_progress";

/// Figures derived from the category summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportStatistics {
    /// The sum of all income.
    pub total_income: f64,
    /// The sum of all expenses.
    pub total_expenses: f64,
    /// Income minus expenses.
    pub net_balance: f64,
    /// Net balance as a percentage of income, `None` when there is no income.
    pub savings_rate: Option<f64>,
}

impl ExportStatistics {
    /// Derive the statistics from per-category totals.
    pub fn from_category_summary(summary: &[CategoryTotal]) -> Self {
        let total_for = |kind: TransactionKind| -> f64 {
            summary
                .iter()
                .filter(|category| category.kind == kind)
                .map(|category| category.total)
                .sum()
        };

        let total_income = total_for(TransactionKind::Income);
        let total_expenses = total_for(TransactionKind::Expense);
        let net_balance = total_income - total_expenses;
        let savings_rate = (total_income > 0.0).then(|| net_balance / total_income * 100.0);

        Self {
            total_income,
            total_expenses,
            net_balance,
            savings_rate,
        }
    }

    /// The savings rate to one decimal place, e.g. "12.5%", or "N/A".
    pub fn savings_rate_label(&self) -> String {
        match self.savings_rate {
            Some(rate) => format!("{rate:.1}%"),
            None => "N/A".to_owned(),
        }
    }
}

#[derive(Serialize)]
struct TransactionRecord<'a> {
    id: i64,
    date: String,
    #[serde(rename = "type")]
    kind: &'static str,
    category: &'a str,
    amount: f64,
    description: &'a str,
}

impl<'a> From<&'a Transaction> for TransactionRecord<'a> {
    fn from(transaction: &'a Transaction) -> Self {
        Self {
            id: transaction.id,
            date: transaction.date.to_string(),
            kind: transaction.kind.as_str(),
            category: transaction.category.as_ref(),
            amount: transaction.amount,
            description: transaction.description.as_deref().unwrap_or_default(),
        }
    }
}

#[derive(Serialize)]
struct CategoryRecord<'a> {
    category: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    total_amount: f64,
}

#[derive(Serialize)]
struct StatisticRecord<'a> {
    statistic: &'a str,
    value: String,
}

/// Write the ledger in `store` to CSV files in `directory`.
///
/// The directory is created if it does not exist and existing export files
/// are overwritten.
///
/// # Errors
/// This function will return a:
/// - [Error::NothingToExport] if there are no transactions, nothing is written,
/// - [Error::ExportFailed] if a file cannot be written,
/// - or [Error::StorageUnavailable] if the ledger cannot be read.
pub fn export_report(store: &LedgerStore, directory: &Path) -> Result<ExportStatistics, Error> {
    let transactions = store.list_all_transactions()?;

    if transactions.is_empty() {
        return Err(Error::NothingToExport);
    }

    let category_summary = store.category_summary()?;
    let statistics = ExportStatistics::from_category_summary(&category_summary);

    write_all_or_nothing(directory, |staging| {
        write_transactions(&staging.join(TRANSACTIONS_FILE_NAME), &transactions)?;
        write_category_summary(&staging.join(CATEGORY_SUMMARY_FILE_NAME), &category_summary)?;
        write_statistics(&staging.join(STATISTICS_FILE_NAME), &statistics)
    })?;

    tracing::info!(
        "Exported {} transactions to {directory:?}",
        transactions.len()
    );

    Ok(statistics)
}

/// Run `write` against a fresh staging directory inside `directory`, then
/// move the export files into `directory`.
///
/// If `write` fails the staging directory is removed, as is `directory` if
/// it did not exist before, and the existing export files are left as they were.
fn write_all_or_nothing(
    directory: &Path,
    write: impl FnOnce(&Path) -> Result<(), Error>,
) -> Result<(), Error> {
    let created_directory = !directory.exists();
    let staging = directory.join(STAGING_DIR_NAME);

    // Left over from an export that was interrupted
    if staging.exists() {
        fs::remove_dir_all(&staging)?;
    }

    fs::create_dir_all(&staging)?;

    if let Err(error) = write(&staging) {
        tracing::warn!("Export to {directory:?} failed, removing the staged files: {error}");

        if let Err(cleanup_error) = fs::remove_dir_all(&staging) {
            tracing::error!("Could not remove {staging:?}: {cleanup_error}");
        }

        if created_directory {
            if let Err(cleanup_error) = fs::remove_dir(directory) {
                tracing::error!("Could not remove {directory:?}: {cleanup_error}");
            }
        }

        return Err(error);
    }

    for file_name in EXPORT_FILE_NAMES {
        let staged_file = staging.join(file_name);

        if staged_file.exists() {
            fs::rename(staged_file, directory.join(file_name))?;
        }
    }

    fs::remove_dir(&staging)?;

    Ok(())
}

fn write_transactions(path: &Path, transactions: &[Transaction]) -> Result<(), Error> {
    let mut writer = csv::Writer::from_path(path)?;

    for transaction in transactions {
        writer.serialize(TransactionRecord::from(transaction))?;
    }

    writer.flush()?;

    Ok(())
}

fn write_category_summary(path: &Path, summary: &[CategoryTotal]) -> Result<(), Error> {
    let mut writer = csv::Writer::from_path(path)?;

    for category in summary {
        writer.serialize(CategoryRecord {
            category: category.category.as_ref(),
            kind: category.kind.as_str(),
            total_amount: category.total,
        })?;
    }

    writer.flush()?;

    Ok(())
}

fn write_statistics(path: &Path, statistics: &ExportStatistics) -> Result<(), Error> {
    let mut writer = csv::Writer::from_path(path)?;

    let records = [
        ("Total Income", format!("{:.2}", statistics.total_income)),
        ("Total Expenses", format!("{:.2}", statistics.total_expenses)),
        ("Net Balance", format!("{:.2}", statistics.net_balance)),
        ("Savings Rate", statistics.savings_rate_label()),
    ];

    for (statistic, value) in records {
        writer.serialize(StatisticRecord { statistic, value })?;
    }

    writer.flush()?;

    Ok(())
}
