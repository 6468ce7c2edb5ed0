//! Running totals of income and expenses.

use rusqlite::Connection;
use time::Date;

use crate::{Error, transaction::TransactionKind};

/// The sum of all transactions of `kind`, zero if there are none.
pub fn get_total(kind: TransactionKind, connection: &Connection) -> Result<f64, Error> {
    connection
        .query_row(
            "SELECT COALESCE(SUM(amount), 0.0) FROM transactions WHERE type = ?1",
            (kind,),
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// The sum of the transactions of `kind` in the calendar month containing `date`.
pub fn get_total_in_month(
    kind: TransactionKind,
    date: Date,
    connection: &Connection,
) -> Result<f64, Error> {
    let month = format!("{:04}-{:02}", date.year(), u8::from(date.month()));

    connection
        .query_row(
            "SELECT COALESCE(SUM(amount), 0.0) FROM transactions
             WHERE type = ?1 AND strftime('%Y-%m', date) = ?2",
            (kind, month),
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Total income minus total expenses over all time.
pub fn get_balance(connection: &Connection) -> Result<f64, Error> {
    let income = get_total(TransactionKind::Income, connection)?;
    let expenses = get_total(TransactionKind::Expense, connection)?;

    Ok(income - expenses)
}
