use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use time::{Date, Duration, UtcOffset};

use finance_tracker::{CategoryName, LedgerStore, Transaction, TransactionKind};

/// A utility for creating a test database for the finance tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Expenses repeated every month: (category, amount, day of month, description).
const MONTHLY_EXPENSES: [(&str, f64, u8, &str); 6] = [
    ("Housing", 1450.0, 2, "Rent"),
    ("Bills", 182.35, 5, "Power and internet"),
    ("Food", 96.4, 8, "Groceries"),
    ("Transportation", 60.0, 12, "Fuel"),
    ("Food", 123.75, 19, "Groceries"),
    ("Entertainment", 35.5, 24, "Movie night"),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let store = LedgerStore::open(output_path, UtcOffset::UTC)?;

    println!("Creating a year of transactions...");
    let today = store.today();
    let mut count = 0;

    for months_ago in (0..12).rev() {
        let month_start = first_of_month_before(today, months_ago);

        let salary = Transaction::build(
            TransactionKind::Income,
            5200.0,
            CategoryName::new_unchecked("Salary"),
        )
        .description("Monthly pay")
        .date(month_start);
        store.add_transaction(salary)?;
        count += 1;

        let freelance_date = month_start + Duration::days(14);

        if months_ago % 3 == 0 && freelance_date <= today {
            let freelance = Transaction::build(
                TransactionKind::Income,
                850.0,
                CategoryName::new_unchecked("Freelance"),
            )
            .description("Website build")
            .date(freelance_date);
            store.add_transaction(freelance)?;
            count += 1;
        }

        for (category, amount, day, description) in MONTHLY_EXPENSES {
            let date = month_start + Duration::days(i64::from(day) - 1);

            if date > today {
                continue;
            }

            let expense = Transaction::build(
                TransactionKind::Expense,
                amount,
                CategoryName::new_unchecked(category),
            )
            .description(description)
            .date(date);
            store.add_transaction(expense)?;
            count += 1;
        }
    }

    println!("Created {count} transactions.");
    println!("Success!");

    Ok(())
}

/// The first day of the month `months_ago` months before the month of `date`.
fn first_of_month_before(date: Date, months_ago: u8) -> Date {
    let mut month_start = date.replace_day(1).unwrap_or(date);

    for _ in 0..months_ago {
        month_start = (month_start - Duration::days(1))
            .replace_day(1)
            .unwrap_or(month_start);
    }

    month_start
}
