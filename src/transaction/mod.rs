//! Transaction management for the ledger.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Parsing of user supplied amounts and dates
//! - Database functions for storing and querying transactions

mod core;
mod kind;
mod query;

pub use core::{
    Transaction, TransactionBuilder, create_transaction, create_transaction_table,
    get_all_transactions, get_transaction_amounts, map_transaction_row, parse_amount, parse_date,
};
pub(crate) use core::validate_amount;
pub use kind::TransactionKind;
pub use query::{TransactionFilter, query_transactions};
