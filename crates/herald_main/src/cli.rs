use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "herald", version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Directory to resolve `.env` files and default paths from.
    ///
    /// Defaults to the current working directory.
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn new(command: Command) -> Self {
        Self { cwd: None, command }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Generate and send today's coaching e-mail.
    Coaching {
        /// Run as if today were this date (YYYY-MM-DD).
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Generate and send the weekly brief for the previous Monday-Sunday.
    Newsletter {
        /// Run as if today were this date (YYYY-MM-DD).
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Run the interactive consent flow and save a fresh credential.
    Auth {
        /// Print the consent URL instead of opening a browser.
        #[arg(long, default_value_t = false)]
        no_browser: bool,
    },

    /// Print the credential and client configuration as base64 for CI.
    Secrets,
}
