use anyhow::Result;
use clap::Parser;
use herald_main::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    herald_main::run(Cli::parse()).await
}
