mod adapters;
mod cli;
mod commands;
mod compose;
mod config;
mod context;
mod error;
mod pipeline;
mod prompts;
mod status;
mod store;
mod workspace;

use clap::Parser;
use cli::{Cli, Command};
use colored::*;
use context::AppContext;
use error::ReelgenResult;

fn main() {
    // Diagnostics go to stderr behind RUST_LOG; user-facing reporting
    // stays on the status sink.
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init();
    }
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("{} {}", "error:".red().bold(), e);
        if let Some(hint) = e.hint() {
            eprintln!("{} {}", "hint:".yellow().bold(), hint);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> ReelgenResult<()> {
    let ctx = AppContext::init(cli.root)?;
    match cli.command.unwrap_or(Command::Menu) {
        Command::Menu => commands::menu::run(&ctx),
        Command::Run { workflow, account } => commands::run::run(&ctx, &workflow, &account),
    }
}
