use anyhow::Result;
use clap::Parser;

use crchat::{init_logging, print_completions, run_command, run_repl, Cli, Commands, Session};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Completions need no session or settings directory
    if let Some(Commands::Completions { shell }) = &cli.command {
        print_completions(*shell);
        return Ok(());
    }

    let session = Session::from_cli(&cli)?;

    match &cli.command {
        Some(command) => run_command(&session, command).await,
        None => run_repl(&session).await,
    }
}
