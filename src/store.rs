//! The ledger store: the only way the rest of the application reads or
//! writes categories and transactions.

use std::path::PathBuf;

use rusqlite::Connection;
use time::{Date, UtcOffset};

use crate::{
    Error,
    category::{self, Category, CategoryName},
    db::{self, open_connection},
    summary::{self, CategoryTotal, Period, PeriodSummary},
    timezone,
    transaction::{self, Transaction, TransactionBuilder, TransactionFilter, TransactionKind},
};

/// Persistent storage and queries for categories and transactions.
///
/// Every operation is its own unit of work: it opens a connection to the
/// database file, runs inside a SQL transaction, commits and closes the
/// connection before returning. If the operation fails the SQL transaction is
/// rolled back, so a failed call never leaves a partial write behind.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    db_path: PathBuf,
    local_offset: UtcOffset,
}

impl LedgerStore {
    /// Open the ledger stored at `db_path`, creating the file and tables if
    /// needed, and add any missing default categories.
    ///
    /// `local_offset` decides which date "today" is.
    ///
    /// # Errors
    /// Returns [Error::StorageUnavailable] if the database cannot be opened or
    /// initialized.
    pub fn open(db_path: impl Into<PathBuf>, local_offset: UtcOffset) -> Result<Self, Error> {
        let store = Self {
            db_path: db_path.into(),
            local_offset,
        };

        tracing::debug!("Opening ledger at {:?}", store.db_path);
        let connection = open_connection(&store.db_path)?;
        db::initialize(&connection)?;
        drop(connection);

        store.run(category::seed_default_categories)?;

        Ok(store)
    }

    /// Today's date in the store's timezone.
    pub fn today(&self) -> Date {
        timezone::today(self.local_offset)
    }

    fn run<T>(&self, operation: impl FnOnce(&Connection) -> Result<T, Error>) -> Result<T, Error> {
        let mut connection = open_connection(&self.db_path)?;
        let transaction = connection.transaction()?;

        let result = operation(&transaction)?;

        transaction.commit()?;

        Ok(result)
    }

    // ========================================================================
    // CATEGORIES
    // ========================================================================

    /// Create a category called `name`.
    ///
    /// # Errors
    /// Returns [Error::EmptyCategoryName] for a blank name and
    /// [Error::DuplicateCategory] if the category already exists.
    pub fn add_category(&self, name: &str) -> Result<Category, Error> {
        let name = CategoryName::new(name)?;
        let category = self.run(|connection| category::create_category(name, connection))?;
        tracing::info!("Added category {}", category.name);

        Ok(category)
    }

    /// Delete the category called `name`.
    ///
    /// # Errors
    /// Returns [Error::CategoryInUse] if a transaction is filed under the
    /// category and [Error::DeleteMissingCategory] if it does not exist.
    pub fn delete_category(&self, name: &str) -> Result<(), Error> {
        let name = CategoryName::new(name)?;
        self.run(|connection| category::delete_category(&name, connection))?;
        tracing::info!("Deleted category {name}");

        Ok(())
    }

    /// The names of all categories in sorted order.
    pub fn list_categories(&self) -> Result<Vec<CategoryName>, Error> {
        let categories = self.run(category::get_all_categories)?;

        Ok(categories
            .into_iter()
            .map(|category| category.name)
            .collect())
    }

    /// Whether any transaction is filed under the category called `name`.
    pub fn is_category_in_use(&self, name: &str) -> Result<bool, Error> {
        let name = CategoryName::new(name)?;

        self.run(|connection| category::is_category_in_use(&name, connection))
    }

    // ========================================================================
    // TRANSACTIONS
    // ========================================================================

    /// Record a new transaction. Dates default to [LedgerStore::today].
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] without touching the database if the
    /// amount is not greater than zero, and [Error::UnknownCategory] if the
    /// category does not exist.
    pub fn add_transaction(&self, builder: TransactionBuilder) -> Result<Transaction, Error> {
        transaction::validate_amount(builder.amount)?;
        let today = self.today();

        let transaction =
            self.run(|connection| transaction::create_transaction(builder, today, connection))?;
        tracing::info!(
            "Added {} transaction {} of {}",
            transaction.kind,
            transaction.id,
            transaction.amount
        );

        Ok(transaction)
    }

    /// Every transaction, most recent first.
    pub fn list_all_transactions(&self) -> Result<Vec<Transaction>, Error> {
        self.run(transaction::get_all_transactions)
    }

    /// The `limit` most recent transactions.
    pub fn recent_transactions(&self, limit: u32) -> Result<Vec<Transaction>, Error> {
        self.query_transactions(&TransactionFilter::most_recent(limit))
    }

    /// The transactions matching `filter`, most recent first.
    pub fn query_transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>, Error> {
        self.run(|connection| transaction::query_transactions(filter, connection))
    }

    /// The amounts of every transaction of `kind`.
    pub fn transaction_amounts(&self, kind: TransactionKind) -> Result<Vec<f64>, Error> {
        self.run(|connection| transaction::get_transaction_amounts(kind, connection))
    }

    // ========================================================================
    // SUMMARIES
    // ========================================================================

    /// Total income minus total expenses.
    pub fn balance(&self) -> Result<f64, Error> {
        self.run(summary::get_balance)
    }

    /// The sum of all income.
    pub fn total_income(&self) -> Result<f64, Error> {
        self.run(|connection| summary::get_total(TransactionKind::Income, connection))
    }

    /// The sum of all expenses.
    pub fn total_expenses(&self) -> Result<f64, Error> {
        self.run(|connection| summary::get_total(TransactionKind::Expense, connection))
    }

    /// The sum of income in the current month.
    pub fn monthly_income(&self) -> Result<f64, Error> {
        let today = self.today();

        self.run(|connection| summary::get_total_in_month(TransactionKind::Income, today, connection))
    }

    /// The sum of expenses in the current month.
    pub fn monthly_expenses(&self) -> Result<f64, Error> {
        let today = self.today();

        self.run(|connection| {
            summary::get_total_in_month(TransactionKind::Expense, today, connection)
        })
    }

    /// Expense totals per category, largest first, excluding empty categories.
    pub fn expenses_by_category(&self) -> Result<Vec<CategoryTotal>, Error> {
        self.run(summary::get_expenses_by_category)
    }

    /// Totals per category and kind.
    pub fn category_summary(&self) -> Result<Vec<CategoryTotal>, Error> {
        self.run(summary::get_category_summary)
    }

    /// Income and expenses per date.
    pub fn daily_summary(&self) -> Result<Vec<PeriodSummary>, Error> {
        self.summary(Period::Daily)
    }

    /// Income and expenses per month.
    pub fn monthly_summary(&self) -> Result<Vec<PeriodSummary>, Error> {
        self.summary(Period::Monthly)
    }

    /// Income and expenses per year.
    pub fn yearly_summary(&self) -> Result<Vec<PeriodSummary>, Error> {
        self.summary(Period::Yearly)
    }

    /// Income and expenses per `period`.
    pub fn summary(&self, period: Period) -> Result<Vec<PeriodSummary>, Error> {
        self.run(|connection| summary::get_period_summaries(period, connection))
    }
}
