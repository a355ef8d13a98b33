use anyhow::Result;
use clap::Parser;

use newschat::cli::{execute, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    newschat::logging::init(cli.verbose);
    execute(cli).await
}
