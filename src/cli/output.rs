//! Terminal output helpers shared by every subcommand.

use crate::error::Error;
use colored::Colorize;
use std::fmt;
use std::io::{self, Write};
use tabled::settings::Style;
use tabled::{Table, Tabled};

pub fn success(message: &str) {
    println!("{} {message}", "✓".green().bold());
}

pub fn info(message: &str) {
    println!("{} {message}", "ℹ".blue().bold());
}

pub fn warning(message: &str) {
    eprintln!("{} {message}", "⚠".yellow().bold());
}

pub fn error(message: &str) {
    eprintln!("{} {message}", "✗".red().bold());
}

/// Prints an error with any field-level detail the server or the client-side
/// validation attached.
pub fn report(err: &Error) {
    match err {
        Error::Validation(invalid) => {
            error("invalid input");
            for item in invalid.iter() {
                eprintln!("    {}: {}", item.field, item.message);
            }
        }
        Error::Status { fields, .. } => {
            error(&err.to_string());
            for (field, messages) in fields {
                for message in messages {
                    eprintln!("    {field}: {message}");
                }
            }
        }
        Error::SessionExpired(cause) => {
            error(&err.to_string());
            eprintln!("    {cause}");
        }
        _ => error(&err.to_string()),
    }
    if err.is_auth_failure() {
        info("Run `fittrack login` to sign in again.");
    }
}

/// One aligned `label  value` line for detail views.
pub fn field(label: &str, value: impl fmt::Display) {
    println!("  {label:<14} {value}");
}

/// Renders rows as a table, or a placeholder when there are none.
pub fn table<T: Tabled>(rows: &[T]) {
    if rows.is_empty() {
        info("Nothing recorded yet.");
    } else {
        println!("{}", Table::new(rows).with(Style::rounded()));
    }
}

/// Asks a yes/no question, defaulting to no.
pub fn confirm(question: &str) -> io::Result<bool> {
    print!("{question} [y/N]: ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    let answer = answer.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

/// Reads a password without echoing it.
pub fn prompt_password(prompt: &str) -> io::Result<String> {
    rpassword::prompt_password(prompt)
}
