use anyhow::Result;
use herald_main::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    herald_main::run(Cli::new(Command::Coaching { date: None })).await
}
