use anyhow::{bail, Context, Result};
use clap::CommandFactory;
use clap_complete::Shell;
use colored::Colorize;
use crchat_api::ModelSummary;
use crchat_session::SendOutcome;
use std::io;

use crate::cli::{Cli, Commands, ConfigCommands};
use crate::session::{ConfigUpdate, Session};

/// Run a one-shot subcommand
pub async fn run_command(session: &Session, command: &Commands) -> Result<()> {
    let controller = &session.controller;
    match command {
        Commands::Ask { prompt } => {
            let prompt = prompt.join(" ");
            match controller.on_send(&prompt).await {
                SendOutcome::Delivered => Ok(()),
                SendOutcome::Empty => bail!("Prompt is empty"),
                SendOutcome::Failed | SendOutcome::Ignored => bail!("No reply from {}", controller.config().base_url),
            }
        }
        Commands::Test { url } => {
            controller
                .on_test_connection(url.as_deref())
                .await
                .context("Connection test failed")?;
            Ok(())
        }
        Commands::Models => {
            let models = controller
                .list_models()
                .await
                .with_context(|| format!("Failed to list models at {}", controller.config().base_url))?;
            print_models(&models);
            Ok(())
        }
        Commands::Config { command } => run_config_command(session, command),
        Commands::Completions { shell } => {
            print_completions(*shell);
            Ok(())
        }
    }
}

fn run_config_command(session: &Session, command: &ConfigCommands) -> Result<()> {
    let controller = &session.controller;
    match command {
        ConfigCommands::Show => {
            let config = controller.config();
            println!("{} {}", "Settings file:".bright_black(), session.settings_path.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
            let sampling = controller.sampling();
            println!(
                "{}",
                format!(
                    "temperature={} top_p={} top_k={}",
                    sampling.temperature, sampling.top_p, sampling.top_k
                )
                .bright_black()
            );
            Ok(())
        }
        ConfigCommands::Set {
            url,
            model,
            system_prompt,
        } => {
            session
                .update_config(&ConfigUpdate {
                    base_url: url.clone(),
                    model_name: model.clone(),
                    system_prompt: system_prompt.clone(),
                })
                .context("Configuration was not saved")?;
            Ok(())
        }
    }
}

pub fn print_completions(shell: Shell) {
    let mut command = Cli::command();
    clap_complete::generate(shell, &mut command, "crchat", &mut io::stdout());
}

pub fn print_models(models: &[ModelSummary]) {
    if models.is_empty() {
        println!("{}", "No models installed".bright_black());
        return;
    }
    for model in models {
        let size = model.size.map(format_size).unwrap_or_default();
        println!("  {} {}", model.name.cyan(), size.bright_black());
    }
}

/// Human-readable size in decimal units
pub fn format_size(bytes: u64) -> String {
    const GB: f64 = 1_000_000_000.0;
    const MB: f64 = 1_000_000.0;
    let value = bytes as f64;
    if value >= GB {
        format!("{:.1} GB", value / GB)
    } else if value >= MB {
        format!("{:.1} MB", value / MB)
    } else {
        format!("{} B", bytes)
    }
}
