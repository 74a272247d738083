use std::{error::Error, path::Path, process::exit};

use clap::Parser;
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::{Duration, OffsetDateTime};

use fintracker::{
    GoalTitle, PasswordHash, TargetAmount, Transaction, TransactionType, Username,
    ValidatedPassword, create_goal, create_transaction, create_user, initialize_db,
};

/// A utility for creating a database for manually testing fintracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    if output_path
        .extension()
        .is_none_or(|extension| extension.is_empty())
    {
        eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
        exit(1);
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user(Username::new_unchecked("test"), password_hash, &conn)?;

    println!("Creating sample transactions...");

    let today = OffsetDateTime::now_utc().date();
    let transactions = [
        (TransactionType::Income, 3200, 28, "Salary", "Monthly pay"),
        (TransactionType::Expense, 1450, 27, "Rent", ""),
        (TransactionType::Expense, 180, 20, "Groceries", "Weekly shop"),
        (TransactionType::Expense, 65, 14, "Transport", "Bus pass"),
        (TransactionType::Income, 250, 10, "Freelance", "Logo design"),
        (TransactionType::Expense, 120, 7, "Utilities", "Power bill"),
        (TransactionType::Expense, 42, 2, "Dining", "Pizza night"),
    ];

    for (transaction_type, amount, days_ago, category, description) in transactions {
        create_transaction(
            Transaction::build(
                user.id,
                Decimal::from(amount),
                transaction_type,
                today - Duration::days(days_ago),
            )
            .category(category)
            .description(description),
            &conn,
        )?;
    }

    println!("Creating sample goals...");

    let goals = [
        ("Emergency fund", 1000, 90),
        ("New laptop", 2000, 180),
        ("Holiday", 1500, 365),
    ];

    for (title, target, days_from_now) in goals {
        create_goal(
            user.id,
            GoalTitle::new(title)?,
            TargetAmount::new(Decimal::from(target))?,
            today + Duration::days(days_from_now),
            &conn,
        )?;
    }

    println!("Success! Log in with the username \"test\" and password \"test\".");

    Ok(())
}
