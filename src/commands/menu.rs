//! The interactive menu. Invalid selections re-prompt locally; workflow
//! failures are reported and return control here.

use crate::adapters::Adapters;
use crate::commands::{products, youtube};
use crate::context::AppContext;
use crate::error::ReelgenResult;
use crate::status;
use crate::store::{Account, Provider, Store};
use colored::*;
use uuid::Uuid;

const MAIN_OPTIONS: &[&str] = &["YouTube Shorts automation", "Affiliate products", "Quit"];

const YOUTUBE_OPTIONS: &[&str] = &[
    "Generate a short",
    "Show published shorts",
    "Remove this account",
    "Back",
];

pub fn run(ctx: &AppContext) -> ReelgenResult<()> {
    if ctx.first_run {
        println!(
            "{}",
            "Welcome to reelgen! Your workspace has been set up.".yellow()
        );
    }

    loop {
        print_options("OPTIONS", MAIN_OPTIONS);
        match prompt_selection("Select an option: ", MAIN_OPTIONS.len())? {
            1 => youtube_menu(ctx)?,
            2 => products::menu(ctx)?,
            _ => {
                if ctx.config.verbose()? {
                    status::info("Quitting...");
                }
                return Ok(());
            }
        }
    }
}

fn youtube_menu(ctx: &AppContext) -> ReelgenResult<()> {
    let store = Store::new(ctx.workspace.cache_dir());
    let accounts = store.accounts(Provider::YouTube)?;

    let account = if accounts.is_empty() {
        status::warning("No YouTube accounts found. Create one now?");
        let answer = status::question("Yes/No: ")?;
        if !answer.eq_ignore_ascii_case("yes") {
            return Ok(());
        }
        create_account(&store)?
    } else {
        match select_account(&accounts)? {
            Some(account) => account,
            None => return Ok(()),
        }
    };

    loop {
        ctx.workspace.clean_temp()?;
        print_options("YOUTUBE OPTIONS", YOUTUBE_OPTIONS);
        match prompt_selection("Select an option: ", YOUTUBE_OPTIONS.len())? {
            1 => generate_and_maybe_upload(ctx, &account)?,
            2 => show_shorts(&store, &account)?,
            3 => {
                store.remove_account(Provider::YouTube, &account.id)?;
                status::success(&format!("Removed account {}.", account.nickname));
                return Ok(());
            }
            _ => return Ok(()),
        }
    }
}

/// Generate a short, then offer to publish it. Failures are reported and
/// control returns to the menu; the store is never touched on failure.
fn generate_and_maybe_upload(ctx: &AppContext, account: &Account) -> ReelgenResult<()> {
    let adapters = match Adapters::from_context(ctx) {
        Ok(adapters) => adapters,
        Err(e) => {
            status::error(&e.to_string());
            return Ok(());
        }
    };

    let session = match youtube::generate_short(ctx, &adapters, account) {
        Ok(session) => session,
        Err(e) => {
            status::error(&format!("Generation failed: {e}"));
            return Ok(());
        }
    };

    let answer = status::question("Upload this video to YouTube? (Yes/No): ")?;
    if answer.eq_ignore_ascii_case("yes") {
        if let Err(e) = youtube::upload_short(ctx, &adapters, account, &session) {
            status::error(&format!("Upload failed: {e}"));
        }
    }
    Ok(())
}

fn show_shorts(store: &Store, account: &Account) -> ReelgenResult<()> {
    // Re-read so shorts published earlier in this session show up.
    let videos = store
        .find_account(Provider::YouTube, &account.id)?
        .map(|account| account.videos)
        .unwrap_or_default();

    if videos.is_empty() {
        status::warning("No shorts published yet.");
        return Ok(());
    }

    for (idx, video) in videos.iter().enumerate() {
        let title: String = video.title.chars().take(60).collect();
        println!(
            " {} {} {}",
            format!("{}.", idx + 1).cyan(),
            video.date.blue(),
            title.green()
        );
        if let Some(url) = &video.url {
            println!("    {}", url.as_str().bright_black());
        }
    }
    Ok(())
}

fn create_account(store: &Store) -> ReelgenResult<Account> {
    let id = Uuid::new_v4().to_string();
    status::success(&format!("Generated id: {id}"));

    let account = Account {
        id,
        nickname: status::question("Enter a nickname for this account: ")?,
        niche: status::question("Enter the account niche: ")?,
        language: status::question("Enter the account language: ")?,
        videos: vec![],
    };
    store.add_account(Provider::YouTube, account.clone())?;
    status::success(&format!("Account {} created.", account.nickname));
    Ok(account)
}

fn select_account(accounts: &[Account]) -> ReelgenResult<Option<Account>> {
    for (idx, account) in accounts.iter().enumerate() {
        println!(
            " {} {} {} {}",
            format!("{}.", idx + 1).cyan(),
            account.id.cyan(),
            account.nickname.blue(),
            account.niche.green()
        );
    }

    let input = status::question("Select an account: ")?;
    match parse_selection(&input, accounts.len()) {
        Some(n) => Ok(Some(accounts[n - 1].clone())),
        None => {
            status::error("Invalid account selected. Please try again.");
            Ok(None)
        }
    }
}

fn print_options(header: &str, options: &[&str]) {
    status::info(&format!("\n============ {header} ============"));
    for (idx, option) in options.iter().enumerate() {
        println!("{}", format!(" {}. {option}", idx + 1).cyan());
    }
    status::info("=================================\n");
}

/// Re-prompt until the input is a number within `1..=max`.
fn prompt_selection(prompt: &str, max: usize) -> ReelgenResult<usize> {
    loop {
        let input = status::question(prompt)?;
        match parse_selection(&input, max) {
            Some(n) => return Ok(n),
            None => status::warning(&format!(
                "Invalid input: enter a number between 1 and {max}."
            )),
        }
    }
}

pub(crate) fn parse_selection(input: &str, max: usize) -> Option<usize> {
    input
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=max).contains(n))
}
