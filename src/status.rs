//! Leveled terminal reporting. Formatting and display only — severity
//! filtering and structured logging live behind `tracing`, not here.

use colored::*;
use std::io::{self, BufRead, Write};

pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
}

pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn info(message: &str) {
    println!("{} {}", "→".magenta(), message.magenta());
}

pub fn warning(message: &str) {
    println!("{} {}", "!".yellow().bold(), message.yellow());
}

/// Print a prompt and read one line from stdin, trimmed.
pub fn question(message: &str) -> io::Result<String> {
    print!("{} {}", "?".magenta().bold(), message.magenta());
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
