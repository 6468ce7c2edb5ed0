//! Filtered transaction queries for the transaction list and dashboard.

use rusqlite::{Connection, ToSql, params_from_iter};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    category::CategoryName,
    transaction::{Transaction, TransactionKind, map_transaction_row},
};

/// Optional restrictions on which transactions to list.
///
/// The default filter matches every transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionFilter {
    /// Only include transactions of this kind.
    pub kind: Option<TransactionKind>,
    /// Only include transactions filed under this category.
    pub category: Option<CategoryName>,
    /// Only include transactions on or after this date.
    pub from: Option<Date>,
    /// Only include transactions on or before this date.
    pub to: Option<Date>,
    /// Return at most this many transactions.
    pub limit: Option<u32>,
}

impl TransactionFilter {
    /// A filter for the `limit` most recent transactions.
    pub fn most_recent(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Default::default()
        }
    }
}

/// Get the transactions matching `filter`, most recent first.
///
/// Uses the same order as [crate::transaction::get_all_transactions].
///
/// # Errors
/// Returns [Error::StorageUnavailable] if:
/// - SQL query preparation or execution fails
/// - Transaction row mapping fails
pub fn query_transactions(
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut conditions: Vec<&str> = Vec::new();
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(kind) = filter.kind {
        conditions.push("t.type = ?");
        params.push(Box::new(kind));
    }

    if let Some(category) = &filter.category {
        conditions.push("c.name = ?");
        params.push(Box::new(category.to_string()));
    }

    if let Some(from) = filter.from {
        conditions.push("t.date >= ?");
        params.push(Box::new(from));
    }

    if let Some(to) = filter.to {
        conditions.push("t.date <= ?");
        params.push(Box::new(to));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let limit_clause = match filter.limit {
        Some(_) => "LIMIT ?",
        None => "",
    };

    if let Some(limit) = filter.limit {
        params.push(Box::new(limit));
    }

    let query = format!(
        "SELECT t.id, t.date, t.type, c.name, t.amount, t.description
        FROM transactions t
        INNER JOIN categories c ON c.id = t.category_id
        {where_clause}
        ORDER BY t.date DESC, t.created_at DESC, t.id DESC
        {limit_clause}"
    );

    connection
        .prepare(&query)?
        .query_map(params_from_iter(params.iter()), map_transaction_row)?
        .collect::<Result<Vec<Transaction>, rusqlite::Error>>()
        .map_err(|error| error.into())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::{Date, macros::date};

    use crate::{
        category::{CategoryName, seed_default_categories},
        db::initialize,
        transaction::{Transaction, TransactionKind, create_transaction, get_all_transactions},
    };

    use super::{TransactionFilter, query_transactions};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        seed_default_categories(&conn).unwrap();
        conn
    }

    fn insert(conn: &Connection, kind: TransactionKind, amount: f64, category: &str, date: Date) {
        create_transaction(
            Transaction::build(kind, amount, CategoryName::new_unchecked(category)).date(date),
            date,
            conn,
        )
        .expect("Could not create transaction");
    }

    fn populate(conn: &Connection) {
        insert(conn, TransactionKind::Income, 1000.0, "Salary", date!(2024 - 01 - 01));
        insert(conn, TransactionKind::Expense, 20.0, "Food", date!(2024 - 01 - 05));
        insert(conn, TransactionKind::Expense, 500.0, "Housing", date!(2024 - 02 - 01));
        insert(conn, TransactionKind::Expense, 35.0, "Food", date!(2024 - 02 - 10));
        insert(conn, TransactionKind::Income, 200.0, "Freelance", date!(2024 - 03 - 01));
    }

    fn amounts(transactions: &[Transaction]) -> Vec<f64> {
        transactions.iter().map(|t| t.amount).collect()
    }

    #[test]
    fn default_filter_matches_list_all() {
        let conn = get_test_connection();
        populate(&conn);

        let got = query_transactions(&TransactionFilter::default(), &conn).unwrap();

        assert_eq!(got, get_all_transactions(&conn).unwrap());
    }

    #[test]
    fn filters_by_kind() {
        let conn = get_test_connection();
        populate(&conn);
        let filter = TransactionFilter {
            kind: Some(TransactionKind::Income),
            ..Default::default()
        };

        let got = query_transactions(&filter, &conn).unwrap();

        assert_eq!(amounts(&got), vec![200.0, 1000.0]);
    }

    #[test]
    fn filters_by_category() {
        let conn = get_test_connection();
        populate(&conn);
        let filter = TransactionFilter {
            category: Some(CategoryName::new_unchecked("Food")),
            ..Default::default()
        };

        let got = query_transactions(&filter, &conn).unwrap();

        assert_eq!(amounts(&got), vec![35.0, 20.0]);
    }

    #[test]
    fn filters_by_inclusive_date_range() {
        let conn = get_test_connection();
        populate(&conn);
        let filter = TransactionFilter {
            from: Some(date!(2024 - 01 - 05)),
            to: Some(date!(2024 - 02 - 10)),
            ..Default::default()
        };

        let got = query_transactions(&filter, &conn).unwrap();

        assert_eq!(amounts(&got), vec![35.0, 500.0, 20.0]);
    }

    #[test]
    fn combines_filters_and_limit() {
        let conn = get_test_connection();
        populate(&conn);
        let filter = TransactionFilter {
            kind: Some(TransactionKind::Expense),
            from: Some(date!(2024 - 01 - 02)),
            limit: Some(2),
            ..Default::default()
        };

        let got = query_transactions(&filter, &conn).unwrap();

        assert_eq!(amounts(&got), vec![35.0, 500.0]);
    }

    #[test]
    fn most_recent_returns_newest_first() {
        let conn = get_test_connection();
        populate(&conn);

        let got = query_transactions(&TransactionFilter::most_recent(1), &conn).unwrap();

        assert_eq!(amounts(&got), vec![200.0]);
    }
}
