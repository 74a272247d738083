use std::{error::Error, io, path::Path, process::exit};

use clap::Parser;
use rusqlite::Connection;

use fintracker::{
    PasswordHash, User, ValidatedPassword, get_user_by_username, update_password,
};

/// A utility for changing the password of a registered user.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The username of the account to reset.
    #[arg(long, short)]
    username: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let db_path = Path::new(&args.db_path);
    validate_db_path(db_path);

    let mut conn = Connection::open(db_path)?;
    let user = match get_user_by_username(&args.username, &conn) {
        Ok(user) => user,
        Err(error) => {
            print_error(format!("Could not load user {}: {error}", args.username));
            exit(1);
        }
    };
    println!("Resetting password for {}", user.username);

    let Some(password_hash) = get_new_password_hash() else {
        return Ok(());
    };

    save_password(&mut conn, &user, &password_hash)?;
    println!("Password updated successfully!");

    Ok(())
}

fn validate_db_path(db_path: &Path) {
    if db_path.extension().is_none_or(|extension| extension.is_empty()) {
        print_error("Database path must include a file extension (e.g., 'my_database.db').");
        exit(1);
    }

    if !db_path.is_file() {
        print_error(format!("File does not exist at {db_path:#?}!"));
        exit(1);
    }
}

/// Prompt for a password, returning `None` if the user closed stdin.
fn prompt(message: &str) -> Option<String> {
    match rpassword::prompt_password(message) {
        Ok(password) => Some(password),
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => None,
        Err(error) => {
            print_error(format!("Could not read password from stdin: {error}"));
            None
        }
    }
}

fn get_new_password_hash() -> Option<PasswordHash> {
    loop {
        println!();

        let first_password = prompt("Enter a new password: ")?;

        let validated_password = match ValidatedPassword::new(&first_password) {
            Ok(password) => password,
            Err(error) => {
                print_error(error);
                continue;
            }
        };

        let second_password = prompt("Enter the same password again: ")?;

        if first_password != second_password {
            print_error("Passwords must match, try again.");
            continue;
        }

        match PasswordHash::new(validated_password, PasswordHash::DEFAULT_COST) {
            Ok(password_hash) => return Some(password_hash),
            Err(error) => print_error(format!("Could not hash password: {error}. Try again.")),
        }
    }
}

fn save_password(
    conn: &mut Connection,
    user: &User,
    password_hash: &PasswordHash,
) -> Result<(), Box<dyn Error>> {
    let transaction = conn.transaction()?;

    if let Err(error) = update_password(user.id, password_hash, &transaction) {
        print_error(format!("Could not update password: {error}. Rolling back..."));
        transaction.rollback()?;
        return Err(error.into());
    }

    transaction.commit()?;

    Ok(())
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
        return String::new();
    };
    first.to_uppercase().chain(chars).collect()
}
