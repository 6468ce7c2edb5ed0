//! Categories that income and expense transactions are filed under.

mod db;
mod domain;

pub use db::{
    create_category, create_category_table, delete_category, get_all_categories,
    get_category_id, is_category_in_use, seed_default_categories,
};
pub use domain::{Category, CategoryName, DEFAULT_CATEGORIES};
