//! Creating and connecting to the application database.

use std::path::Path;

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{category::create_category_table, transaction::create_transaction_table};

/// Create the tables for the application if they do not exist yet.
///
/// Safe to call on a database that has already been initialized.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    enable_foreign_keys(connection)?;

    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_category_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Open a connection to the database file at `path` with foreign key
/// enforcement switched on.
///
/// The file is created if it does not exist.
pub(crate) fn open_connection(path: &Path) -> Result<Connection, rusqlite::Error> {
    let connection = Connection::open(path)?;
    enable_foreign_keys(&connection)?;

    Ok(connection)
}

/// SQLite only enforces foreign keys when asked to, once per connection.
fn enable_foreign_keys(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.pragma_update(None, "foreign_keys", true)
}
