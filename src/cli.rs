use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "reelgen",
    about = "Short-form video automation CLI — generate, narrate, compose and publish AI-made shorts",
    version,
    after_help = "\x1b[1mExamples:\x1b[0m
  reelgen                          Open the interactive menu
  reelgen menu --root ~/creator    Use a different root directory
  reelgen run youtube <account-id> Generate and upload one short non-interactively
                                   (this is the entry point external schedulers call)"
)]
pub struct Cli {
    /// Root directory holding config.json, secrets.json and the cache
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open the interactive menu (the default when no command is given)
    Menu,
    /// Run one workflow non-interactively: generate a short, upload it,
    /// record it on the account
    Run {
        /// Workflow name (supported: youtube)
        workflow: String,

        /// Id of the account to run against
        account: String,
    },
}
