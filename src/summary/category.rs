//! Per-category totals.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, category::CategoryName, transaction::TransactionKind};

/// The sum of the transactions of one kind filed under one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// The name of the category.
    pub category: CategoryName,
    /// The kind of the summed transactions.
    pub kind: TransactionKind,
    /// The sum of the transaction amounts.
    pub total: f64,
}

/// Expense totals for each category with expenses, largest first.
///
/// Categories whose total is not above zero are left out. Equal totals are
/// ordered by category name.
pub fn get_expenses_by_category(connection: &Connection) -> Result<Vec<CategoryTotal>, Error> {
    connection
        .prepare(
            "SELECT c.name, t.type, SUM(t.amount) AS total
             FROM transactions t
             INNER JOIN categories c ON c.id = t.category_id
             WHERE t.type = 'Expense'
             GROUP BY c.id
             HAVING total > 0
             ORDER BY total DESC, c.name ASC",
        )?
        .query_map([], map_row)?
        .collect::<Result<Vec<CategoryTotal>, rusqlite::Error>>()
        .map_err(|error| error.into())
}

/// Totals for every (category, kind) pair that has transactions.
///
/// Ordered by kind ("Expense" before "Income"), then by total, largest first.
pub fn get_category_summary(connection: &Connection) -> Result<Vec<CategoryTotal>, Error> {
    connection
        .prepare(
            "SELECT c.name, t.type, SUM(t.amount) AS total
             FROM transactions t
             INNER JOIN categories c ON c.id = t.category_id
             GROUP BY c.id, t.type
             ORDER BY t.type ASC, total DESC, c.name ASC",
        )?
        .query_map([], map_row)?
        .collect::<Result<Vec<CategoryTotal>, rusqlite::Error>>()
        .map_err(|error| error.into())
}

fn map_row(row: &Row) -> Result<CategoryTotal, rusqlite::Error> {
    let raw_name: String = row.get(0)?;

    Ok(CategoryTotal {
        category: CategoryName::new_unchecked(&raw_name),
        kind: row.get(1)?,
        total: row.get(2)?,
    })
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        category::{CategoryName, seed_default_categories},
        db::initialize,
        transaction::{Transaction, TransactionKind, create_transaction},
    };

    use super::{CategoryTotal, get_category_summary, get_expenses_by_category};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        seed_default_categories(&conn).unwrap();
        conn
    }

    fn insert(conn: &Connection, kind: TransactionKind, amount: f64, category: &str) {
        create_transaction(
            Transaction::build(kind, amount, CategoryName::new_unchecked(category)),
            date!(2024 - 05 - 01),
            conn,
        )
        .expect("Could not create transaction");
    }

    fn total(category: &str, kind: TransactionKind, total: f64) -> CategoryTotal {
        CategoryTotal {
            category: CategoryName::new_unchecked(category),
            kind,
            total,
        }
    }

    #[test]
    fn expenses_by_category_is_empty_without_expenses() {
        let conn = get_test_connection();
        insert(&conn, TransactionKind::Income, 100.0, "Salary");

        assert_eq!(get_expenses_by_category(&conn), Ok(vec![]));
    }

    #[test]
    fn expenses_by_category_sorts_by_descending_total() {
        let conn = get_test_connection();
        insert(&conn, TransactionKind::Expense, 10.0, "Food");
        insert(&conn, TransactionKind::Expense, 15.0, "Food");
        insert(&conn, TransactionKind::Expense, 900.0, "Housing");
        insert(&conn, TransactionKind::Expense, 5.0, "Health");
        insert(&conn, TransactionKind::Income, 5000.0, "Salary");
        // Income in an expense category does not count towards its expenses.
        insert(&conn, TransactionKind::Income, 1000.0, "Health");

        let got = get_expenses_by_category(&conn).unwrap();

        assert_eq!(
            got,
            vec![
                total("Housing", TransactionKind::Expense, 900.0),
                total("Food", TransactionKind::Expense, 25.0),
                total("Health", TransactionKind::Expense, 5.0),
            ]
        );
        assert!(got.windows(2).all(|pair| pair[0].total > pair[1].total));
        assert!(got.iter().all(|category| category.total > 0.0));
    }

    #[test]
    fn category_summary_orders_by_kind_then_total() {
        let conn = get_test_connection();
        insert(&conn, TransactionKind::Income, 3000.0, "Salary");
        insert(&conn, TransactionKind::Income, 400.0, "Freelance");
        insert(&conn, TransactionKind::Expense, 50.0, "Food");
        insert(&conn, TransactionKind::Expense, 70.0, "Bills");
        insert(&conn, TransactionKind::Expense, 30.0, "Food");

        let got = get_category_summary(&conn).unwrap();

        assert_eq!(
            got,
            vec![
                total("Food", TransactionKind::Expense, 80.0),
                total("Bills", TransactionKind::Expense, 70.0),
                total("Salary", TransactionKind::Income, 3000.0),
                total("Freelance", TransactionKind::Income, 400.0),
            ]
        );
    }
}
