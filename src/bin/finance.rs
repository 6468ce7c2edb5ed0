use std::{error::Error, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};

use finance_tracker::{
    CategoryName, Command, LedgerStore, Period, TransactionFilter, TransactionKind, dispatch,
    get_local_offset, parse_date, render_response, setup_logging,
};

/// Track personal income and expenses in a local SQLite database.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, env = "FINANCE_DB_PATH", default_value = "finance.db")]
    db_path: PathBuf,

    /// The canonical timezone used to decide today's date, e.g. "Pacific/Auckland".
    #[arg(long, env = "FINANCE_TIMEZONE", default_value = "Etc/UTC")]
    timezone: String,

    /// Append debug logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the result as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Add, delete or list categories.
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Record an income or expense.
    Add {
        /// Either "income" or "expense".
        kind: TransactionKind,

        /// The amount, a number greater than zero.
        amount: String,

        /// The name of an existing category.
        category: String,

        /// A short note about the transaction.
        #[arg(long, short)]
        description: Option<String>,

        /// The date of the transaction as YYYY-MM-DD, defaults to today.
        #[arg(long)]
        date: Option<String>,
    },
    /// List transactions, most recent first.
    List {
        /// Only list "income" or "expense" transactions.
        #[arg(long)]
        kind: Option<TransactionKind>,

        /// Only list transactions in this category.
        #[arg(long)]
        category: Option<String>,

        /// Only list transactions on or after this date (YYYY-MM-DD).
        #[arg(long)]
        from: Option<String>,

        /// Only list transactions on or before this date (YYYY-MM-DD).
        #[arg(long)]
        to: Option<String>,

        /// List at most this many transactions.
        #[arg(long, short = 'n')]
        limit: Option<u32>,
    },
    /// Show the balance, this month's totals and recent transactions.
    Dashboard,
    /// Show income, expenses and net income per period.
    Report {
        /// One of "daily", "monthly" or "yearly".
        #[arg(default_value = "monthly")]
        period: Period,
    },
    /// Show statistics of income and expense amounts.
    Stats,
    /// Show income, expenses and net income over the last twelve months.
    Trend,
    /// Write the transactions and summaries to CSV files.
    Export {
        /// The directory to write the CSV files to.
        #[arg(default_value = "finance_export")]
        directory: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum CategoryAction {
    /// Create a new category.
    Add { name: String },
    /// Delete a category that no transaction uses.
    Delete { name: String },
    /// List all categories.
    List,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(error) = setup_logging(args.log_file.as_deref()) {
        print_error(format!("Could not open the log file: {error}"));
        return ExitCode::FAILURE;
    }

    match run(args) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            print_error(error);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<String, Box<dyn Error>> {
    let local_offset = get_local_offset(&args.timezone)
        .ok_or_else(|| finance_tracker::Error::InvalidTimezone(args.timezone.clone()))?;

    let store = LedgerStore::open(&args.db_path, local_offset)?;
    let command = to_command(args.action)?;
    let response = dispatch(&store, command)?;

    if args.json {
        Ok(serde_json::to_string_pretty(&response)?)
    } else {
        Ok(render_response(&response))
    }
}

fn to_command(action: Action) -> Result<Command, finance_tracker::Error> {
    let command = match action {
        Action::Category { action } => match action {
            CategoryAction::Add { name } => Command::AddCategory { name },
            CategoryAction::Delete { name } => Command::DeleteCategory { name },
            CategoryAction::List => Command::ListCategories,
        },
        Action::Add {
            kind,
            amount,
            category,
            description,
            date,
        } => Command::AddTransaction {
            kind,
            amount,
            category,
            description,
            date,
        },
        Action::List {
            kind,
            category,
            from,
            to,
            limit,
        } => Command::ListTransactions(TransactionFilter {
            kind,
            category: category.as_deref().map(CategoryName::new).transpose()?,
            from: from.as_deref().map(parse_date).transpose()?,
            to: to.as_deref().map(parse_date).transpose()?,
            limit,
        }),
        Action::Dashboard => Command::Dashboard,
        Action::Report { period } => Command::Report(period),
        Action::Stats => Command::Statistics,
        Action::Trend => Command::Trend,
        Action::Export { directory } => Command::Export { directory },
    };

    Ok(command)
}

fn print_error(error: impl ToString) {
    eprintln!(
        "\x1b[31;1m{}\x1b[0m",
        capitalise_first_char(&error.to_string())
    )
}

fn capitalise_first_char(string: &str) -> String {
    let mut chars = string.chars();
    let Some(first) = chars.next() else {
        return String::with_capacity(0);
    };
    first.to_uppercase().chain(chars).collect()
}
