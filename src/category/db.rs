//! Database operations for categories.

use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error,
    category::{Category, CategoryName, DEFAULT_CATEGORIES},
    database_id::CategoryId,
};

/// Create a category and return it with its generated ID.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateCategory] if a category with the same name exists,
/// - or [Error::StorageUnavailable] if there is some other SQL error.
pub fn create_category(name: CategoryName, connection: &Connection) -> Result<Category, Error> {
    connection
        .execute("INSERT INTO categories (name) VALUES (?1);", (name.as_ref(),))
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateCategory(name.to_string()),
            error => error.into(),
        })?;

    let id = connection.last_insert_rowid();
    tracing::debug!("Created category {name} with ID {id}");

    Ok(Category { id, name })
}

/// Insert the [DEFAULT_CATEGORIES] that do not exist yet.
///
/// Existing categories are left untouched, so calling this more than once is
/// safe.
pub fn seed_default_categories(connection: &Connection) -> Result<(), Error> {
    let mut statement = connection.prepare("INSERT OR IGNORE INTO categories (name) VALUES (?1);")?;

    for name in DEFAULT_CATEGORIES {
        statement.execute((name,))?;
    }

    Ok(())
}

/// Retrieve all categories ordered by name.
///
/// Names are compared byte-wise, so upper case letters sort before lower case.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name FROM categories ORDER BY name ASC;")?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Look up the ID of the category called `name`.
///
/// Returns `None` if there is no such category.
pub fn get_category_id(
    name: &CategoryName,
    connection: &Connection,
) -> Result<Option<CategoryId>, Error> {
    connection
        .prepare("SELECT id FROM categories WHERE name = ?1;")?
        .query_row((name.as_ref(),), |row| row.get(0))
        .optional()
        .map_err(|error| error.into())
}

/// Whether at least one transaction is filed under the category `name`.
///
/// Unknown category names are never in use.
pub fn is_category_in_use(name: &CategoryName, connection: &Connection) -> Result<bool, Error> {
    connection
        .query_row(
            "SELECT EXISTS (
                SELECT 1 FROM transactions t
                INNER JOIN categories c ON c.id = t.category_id
                WHERE c.name = ?1
            );",
            (name.as_ref(),),
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Delete the category called `name`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingCategory] if there is no category called `name`,
/// - [Error::CategoryInUse] if a transaction refers to the category,
/// - or [Error::StorageUnavailable] if there is some other SQL error.
pub fn delete_category(name: &CategoryName, connection: &Connection) -> Result<(), Error> {
    let category_id = get_category_id(name, connection)?
        .ok_or_else(|| Error::DeleteMissingCategory(name.to_string()))?;

    if is_category_in_use(name, connection)? {
        return Err(Error::CategoryInUse(name.to_string()));
    }

    connection
        .execute("DELETE FROM categories WHERE id = ?1;", [category_id])
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::CategoryInUse(name.to_string()),
            error => error.into(),
        })?;

    tracing::debug!("Deleted category {name}");

    Ok(())
}

/// Initialize the category table.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT UNIQUE NOT NULL
        );",
        (),
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = CategoryName::new_unchecked(&raw_name);

    Ok(Category { id, name })
}

#[cfg(test)]
mod category_query_tests {
    use std::collections::HashSet;

    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        category::{
            CategoryName, DEFAULT_CATEGORIES, create_category, delete_category,
            get_all_categories, get_category_id, is_category_in_use, seed_default_categories,
        },
        db::initialize,
        transaction::{Transaction, TransactionKind, create_transaction},
    };

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        connection
    }

    fn category_names(connection: &Connection) -> Vec<String> {
        get_all_categories(connection)
            .expect("Could not get categories")
            .into_iter()
            .map(|category| category.name.to_string())
            .collect()
    }

    #[test]
    fn create_category_succeeds() {
        let connection = get_test_db_connection();
        let name = CategoryName::new("Groceries").unwrap();

        let category = create_category(name.clone(), &connection);

        let got_category = category.expect("Could not create category");
        assert!(got_category.id > 0);
        assert_eq!(got_category.name, name);
    }

    #[test]
    fn create_category_fails_on_duplicate_name() {
        let connection = get_test_db_connection();
        let name = CategoryName::new_unchecked("Groceries");
        create_category(name.clone(), &connection).expect("Could not create category");

        let duplicate = create_category(name, &connection);

        assert_eq!(
            duplicate,
            Err(Error::DuplicateCategory("Groceries".to_owned()))
        );
        assert_eq!(category_names(&connection), vec!["Groceries"]);
    }

    #[test]
    fn create_category_is_case_sensitive() {
        let connection = get_test_db_connection();
        create_category(CategoryName::new_unchecked("Food"), &connection).unwrap();

        let result = create_category(CategoryName::new_unchecked("food"), &connection);

        assert!(result.is_ok());
    }

    #[test]
    fn get_all_categories_is_sorted_without_duplicates() {
        let connection = get_test_db_connection();
        for name in ["Zoo", "apples", "Bananas", "Apples", "zebra"] {
            create_category(CategoryName::new_unchecked(name), &connection).unwrap();
        }

        let names = category_names(&connection);

        let mut want = names.clone();
        want.sort();
        want.dedup();
        assert_eq!(names, want);
        assert_eq!(names, vec!["Apples", "Bananas", "Zoo", "apples", "zebra"]);
    }

    #[test]
    fn seeding_twice_leaves_exactly_the_default_set() {
        let connection = get_test_db_connection();

        seed_default_categories(&connection).expect("Could not seed categories");
        seed_default_categories(&connection).expect("Could not seed categories again");

        let got: HashSet<String> = HashSet::from_iter(category_names(&connection));
        let want: HashSet<String> = DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect();
        assert_eq!(got, want);
        assert_eq!(category_names(&connection).len(), DEFAULT_CATEGORIES.len());
    }

    #[test]
    fn get_category_id_of_unknown_name_is_none() {
        let connection = get_test_db_connection();

        let id = get_category_id(&CategoryName::new_unchecked("Nope"), &connection);

        assert_eq!(id, Ok(None));
    }

    #[test]
    fn delete_unused_category_succeeds() {
        let connection = get_test_db_connection();
        let name = CategoryName::new_unchecked("ToDelete");
        create_category(name.clone(), &connection).unwrap();

        let result = delete_category(&name, &connection);

        assert_eq!(result, Ok(()));
        assert_eq!(get_category_id(&name, &connection), Ok(None));
    }

    #[test]
    fn delete_missing_category_returns_error() {
        let connection = get_test_db_connection();

        let result = delete_category(&CategoryName::new_unchecked("Ghost"), &connection);

        assert_eq!(result, Err(Error::DeleteMissingCategory("Ghost".to_owned())));
    }

    #[test]
    fn delete_category_in_use_fails_without_changes() {
        let connection = get_test_db_connection();
        let name = CategoryName::new_unchecked("Food");
        create_category(name.clone(), &connection).unwrap();
        create_transaction(
            Transaction::build(TransactionKind::Expense, 12.5, name.clone())
                .date(date!(2024 - 03 - 15)),
            date!(2024 - 03 - 15),
            &connection,
        )
        .expect("Could not create transaction");

        let result = delete_category(&name, &connection);

        assert_eq!(result, Err(Error::CategoryInUse("Food".to_owned())));
        assert!(get_category_id(&name, &connection).unwrap().is_some());
    }

    #[test]
    fn is_category_in_use_reflects_transactions() {
        let connection = get_test_db_connection();
        let used = CategoryName::new_unchecked("Used");
        let unused = CategoryName::new_unchecked("Unused");
        create_category(used.clone(), &connection).unwrap();
        create_category(unused.clone(), &connection).unwrap();
        create_transaction(
            Transaction::build(TransactionKind::Income, 1.0, used.clone()),
            date!(2024 - 01 - 01),
            &connection,
        )
        .unwrap();

        assert_eq!(is_category_in_use(&used, &connection), Ok(true));
        assert_eq!(is_category_in_use(&unused, &connection), Ok(false));
        assert_eq!(
            is_category_in_use(&CategoryName::new_unchecked("Unknown"), &connection),
            Ok(false)
        );
    }
}
