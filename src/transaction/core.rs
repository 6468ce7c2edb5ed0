//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    category::{CategoryName, get_category_id},
    database_id::TransactionId,
    transaction::TransactionKind,
};

// ============================================================================
// MODELS
// ============================================================================

/// The only date format accepted at the boundary and written to the database.
const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// An income or expense, i.e. an event where money was either earned or spent.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// When the transaction happened.
    pub date: Date,
    /// Whether money was earned or spent.
    pub kind: TransactionKind,
    /// The name of the category the transaction is filed under.
    pub category: CategoryName,
    /// The amount of money earned or spent, always greater than zero.
    pub amount: f64,
    /// A text description of what the transaction was for.
    pub description: Option<String>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(kind: TransactionKind, amount: f64, category: CategoryName) -> TransactionBuilder {
        TransactionBuilder {
            kind,
            amount,
            category,
            description: None,
            date: None,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// The kind, amount and category are required, the description and date are
/// optional. Pass the builder to [create_transaction] to store it.
///
/// # Examples
///
/// ```ignore
/// use time::macros::date;
///
/// let builder = Transaction::build(
///         TransactionKind::Expense,
///         42.50,
///         CategoryName::new("Food").unwrap(),
///     )
///     .description("Lunch")
///     .date(date!(2024 - 03 - 15));
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// Whether money was earned or spent.
    pub kind: TransactionKind,

    /// The amount of money, must be a finite number greater than zero.
    ///
    /// The direction of the money is given by `kind`, not by the sign.
    pub amount: f64,

    /// The name of the category to file the transaction under.
    ///
    /// The name is resolved to the category's ID when the transaction is
    /// created and must refer to an existing category.
    pub category: CategoryName,

    /// An optional description. Blank descriptions are stored as `None`.
    pub description: Option<String>,

    /// The date when the transaction occurred, defaults to today.
    pub date: Option<Date>,
}

impl TransactionBuilder {
    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        let description = description.trim();
        self.description = (!description.is_empty()).then(|| description.to_owned());
        self
    }

    /// Set the date for the transaction.
    pub fn date(mut self, date: Date) -> Self {
        self.date = Some(date);
        self
    }
}

/// Parse an amount entered by the user.
///
/// # Errors
/// Returns [Error::InvalidAmount] if `input` is not a number, or is not
/// greater than zero.
pub fn parse_amount(input: &str) -> Result<f64, Error> {
    let amount = input
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::InvalidAmount(input.to_owned()))?;

    validate_amount(amount).map_err(|_| Error::InvalidAmount(input.to_owned()))
}

/// Parse a date in the `YYYY-MM-DD` format, e.g. "2024-03-15".
///
/// # Errors
/// Returns [Error::InvalidDate] if `input` is in any other format or is not a
/// real calendar date.
pub fn parse_date(input: &str) -> Result<Date, Error> {
    Date::parse(input.trim(), DATE_FORMAT).map_err(|_| Error::InvalidDate(input.to_owned()))
}

pub(crate) fn validate_amount(amount: f64) -> Result<f64, Error> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(Error::InvalidAmount(amount.to_string()))
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database from a builder.
///
/// The amount is checked before the database is touched. If the builder has
/// no date, `today` is used.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] if the amount is not greater than zero,
/// - [Error::UnknownCategory] if the category name does not refer to a category,
/// - or [Error::StorageUnavailable] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    today: Date,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let amount = validate_amount(builder.amount)?;

    let category_id = get_category_id(&builder.category, connection)?
        .ok_or_else(|| Error::UnknownCategory(builder.category.to_string()))?;

    let date = builder.date.unwrap_or(today);

    connection.execute(
        "INSERT INTO transactions (date, type, category_id, amount, description)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        (date, builder.kind, category_id, amount, &builder.description),
    )?;

    let id = connection.last_insert_rowid();
    tracing::debug!(
        "Created {} transaction {id} of {amount} in {} on {date}",
        builder.kind,
        builder.category
    );

    Ok(Transaction {
        id,
        date,
        kind: builder.kind,
        category: builder.category,
        amount,
        description: builder.description,
    })
}

/// Retrieve every transaction, most recent first.
///
/// Transactions are ordered by date, then by when they were recorded.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT t.id, t.date, t.type, c.name, t.amount, t.description
             FROM transactions t
             INNER JOIN categories c ON c.id = t.category_id
             ORDER BY t.date DESC, t.created_at DESC, t.id DESC",
        )?
        .query_map([], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the amounts of every transaction of `kind`.
pub fn get_transaction_amounts(
    kind: TransactionKind,
    connection: &Connection,
) -> Result<Vec<f64>, Error> {
    connection
        .prepare("SELECT amount FROM transactions WHERE type = ?1")?
        .query_map((kind,), |row| row.get(0))?
        .collect::<Result<Vec<f64>, rusqlite::Error>>()
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// The category table must be created first.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date DATE NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('Income', 'Expense')),
                category_id INTEGER NOT NULL,
                amount REAL NOT NULL CHECK (amount > 0),
                description TEXT,
                created_at TIMESTAMP DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now')),
                FOREIGN KEY(category_id) REFERENCES categories(id) ON UPDATE CASCADE ON DELETE RESTRICT
                )",
        (),
    )?;

    // Composite index used by the summary queries.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transactions_date_category ON transactions(date, category_id);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
///
/// Expects the columns id, date, type, category name, amount and description.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let date = row.get(1)?;
    let kind = row.get(2)?;
    let raw_category: String = row.get(3)?;
    let amount = row.get(4)?;
    let description = row.get(5)?;

    Ok(Transaction {
        id,
        date,
        kind,
        category: CategoryName::new_unchecked(&raw_category),
        amount,
        description,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod parse_tests {
    use time::macros::date;

    use crate::{
        Error,
        transaction::{parse_amount, parse_date},
    };

    #[test]
    fn parse_amount_accepts_positive_numbers() {
        assert_eq!(parse_amount("42.50"), Ok(42.5));
        assert_eq!(parse_amount(" 7 "), Ok(7.0));
    }

    #[test]
    fn parse_amount_rejects_zero_negative_and_text() {
        for input in ["0", "-3", "abc", "", "NaN", "inf"] {
            assert_eq!(
                parse_amount(input),
                Err(Error::InvalidAmount(input.to_owned())),
                "input {input:?} should be rejected"
            );
        }
    }

    #[test]
    fn parse_date_accepts_zero_padded_dates() {
        assert_eq!(parse_date("2024-03-05"), Ok(date!(2024 - 03 - 05)));
    }

    #[test]
    fn parse_date_rejects_other_formats() {
        for input in ["2024-3-5", "05/03/2024", "2024-02-30", "yesterday"] {
            assert_eq!(parse_date(input), Err(Error::InvalidDate(input.to_owned())));
        }
    }
}

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        category::{CategoryName, seed_default_categories},
        db::initialize,
        transaction::{Transaction, TransactionKind, create_transaction, get_all_transactions},
    };

    use super::get_transaction_amounts;

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        seed_default_categories(&conn).unwrap();
        conn
    }

    fn food() -> CategoryName {
        CategoryName::new_unchecked("Food")
    }

    #[test]
    fn create_then_list_round_trips_fields() {
        let conn = get_test_connection();

        let created = create_transaction(
            Transaction::build(TransactionKind::Expense, 42.50, food())
                .description("Lunch")
                .date(date!(2024 - 03 - 15)),
            date!(2025 - 01 - 01),
            &conn,
        )
        .expect("Could not create transaction");

        let got = get_all_transactions(&conn).expect("Could not get transactions");

        assert_eq!(got.len(), 1);
        assert!(got[0].id > 0);
        assert_eq!(got[0], created);
        assert_eq!(got[0].date, date!(2024 - 03 - 15));
        assert_eq!(got[0].kind, TransactionKind::Expense);
        assert_eq!(got[0].category, food());
        assert_eq!(got[0].amount, 42.50);
        assert_eq!(got[0].description.as_deref(), Some("Lunch"));
    }

    #[test]
    fn date_defaults_to_today() {
        let conn = get_test_connection();
        let today = date!(2025 - 06 - 30);

        let transaction = create_transaction(
            Transaction::build(TransactionKind::Income, 10.0, CategoryName::new_unchecked("Salary")),
            today,
            &conn,
        )
        .unwrap();

        assert_eq!(transaction.date, today);
    }

    #[test]
    fn blank_description_is_stored_as_none() {
        let conn = get_test_connection();

        create_transaction(
            Transaction::build(TransactionKind::Expense, 3.0, food()).description("   "),
            date!(2025 - 06 - 30),
            &conn,
        )
        .unwrap();

        let got = get_all_transactions(&conn).unwrap();
        assert_eq!(got[0].description, None);
    }

    #[test]
    fn create_fails_on_non_positive_amount_without_writing() {
        let conn = get_test_connection();

        for amount in [0.0, -5.0, f64::NAN] {
            let result = create_transaction(
                Transaction::build(TransactionKind::Expense, amount, food()),
                date!(2025 - 01 - 01),
                &conn,
            );

            assert!(matches!(result, Err(Error::InvalidAmount(_))));
        }

        assert_eq!(get_all_transactions(&conn).unwrap(), vec![]);
    }

    #[test]
    fn create_fails_on_unknown_category() {
        let conn = get_test_connection();

        let result = create_transaction(
            Transaction::build(
                TransactionKind::Expense,
                1.0,
                CategoryName::new_unchecked("Yachts"),
            ),
            date!(2025 - 01 - 01),
            &conn,
        );

        assert_eq!(result, Err(Error::UnknownCategory("Yachts".to_owned())));
        assert_eq!(get_all_transactions(&conn).unwrap(), vec![]);
    }

    #[test]
    fn list_orders_by_date_then_most_recently_created() {
        let conn = get_test_connection();
        let today = date!(2025 - 01 - 01);
        let older = date!(2024 - 12 - 01);
        let newer = date!(2024 - 12 - 31);

        let first = create_transaction(
            Transaction::build(TransactionKind::Expense, 1.0, food()).date(newer),
            today,
            &conn,
        )
        .unwrap();
        let second = create_transaction(
            Transaction::build(TransactionKind::Expense, 2.0, food()).date(older),
            today,
            &conn,
        )
        .unwrap();
        let third = create_transaction(
            Transaction::build(TransactionKind::Expense, 3.0, food()).date(newer),
            today,
            &conn,
        )
        .unwrap();

        let got = get_all_transactions(&conn).unwrap();

        assert_eq!(got, vec![third, first, second]);
    }

    #[test]
    fn amounts_are_filtered_by_kind() {
        let conn = get_test_connection();
        let today = date!(2025 - 01 - 01);
        create_transaction(
            Transaction::build(TransactionKind::Expense, 4.0, food()),
            today,
            &conn,
        )
        .unwrap();
        create_transaction(
            Transaction::build(TransactionKind::Income, 9.0, CategoryName::new_unchecked("Salary")),
            today,
            &conn,
        )
        .unwrap();

        assert_eq!(
            get_transaction_amounts(TransactionKind::Expense, &conn),
            Ok(vec![4.0])
        );
        assert_eq!(
            get_transaction_amounts(TransactionKind::Income, &conn),
            Ok(vec![9.0])
        );
    }
}
