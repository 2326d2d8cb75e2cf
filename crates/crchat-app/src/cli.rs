use clap::{Parser, Subcommand};
use clap_complete::Shell;
use crchat_types::{EndpointConfig, SamplingOptions};
use std::path::PathBuf;

/// CLI arguments for crchat
#[derive(Parser, Debug)]
#[command(name = "crchat")]
#[command(about = "Chat with a local Ollama model from the terminal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Ollama server URL for this run (saved config is left untouched)
    #[arg(long, value_name = "URL", env = "CRCHAT_BASE_URL")]
    pub base_url: Option<String>,

    /// Model name for this run
    #[arg(long, short = 'm', value_name = "MODEL", env = "CRCHAT_MODEL")]
    pub model: Option<String>,

    /// System prompt for this run
    #[arg(long, value_name = "TEXT")]
    pub system_prompt: Option<String>,

    /// Directory holding settings.json (default: ~/.crchat)
    #[arg(long, value_name = "DIR", env = "CRCHAT_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Where /save writes conversation transcripts
    #[arg(long, value_name = "DIR", env = "CRCHAT_EXPORT_DIR", default_value = ".")]
    pub export_dir: PathBuf,

    /// Sampling temperature
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Nucleus sampling threshold
    #[arg(long)]
    pub top_p: Option<f32>,

    /// Top-k sampling cutoff
    #[arg(long)]
    pub top_k: Option<u32>,

    /// Answer yes to confirmation prompts
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Enable verbose debug output (HTTP requests, config resolution)
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send one prompt and print the reply
    Ask {
        /// Prompt text; multiple words are joined with spaces
        #[arg(required = true)]
        prompt: Vec<String>,
    },
    /// Check that the Ollama server is reachable
    Test {
        /// URL to probe instead of the configured one
        #[arg(long, value_name = "URL")]
        url: Option<String>,
    },
    /// List the models available on the server
    Models,
    /// Show or change the saved configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Update and save configuration fields
    Set {
        #[arg(long, value_name = "URL")]
        url: Option<String>,
        #[arg(long, value_name = "MODEL")]
        model: Option<String>,
        #[arg(long, value_name = "TEXT")]
        system_prompt: Option<String>,
    },
}

/// Per-run values from flags and environment, layered over the stored config
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub model_name: Option<String>,
    pub system_prompt: Option<String>,
}

impl ConfigOverrides {
    pub fn apply(&self, mut config: EndpointConfig) -> EndpointConfig {
        if let Some(url) = self.base_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            config.base_url = url.to_string();
        }
        if let Some(model) = self.model_name.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
            config.model_name = model.to_string();
        }
        if let Some(prompt) = &self.system_prompt {
            config.system_prompt = prompt.clone();
        }
        config
    }
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            base_url: self.base_url.clone(),
            model_name: self.model.clone(),
            system_prompt: self.system_prompt.clone(),
        }
    }

    pub fn sampling(&self) -> SamplingOptions {
        let defaults = SamplingOptions::default();
        SamplingOptions {
            temperature: self.temperature.unwrap_or(defaults.temperature),
            top_p: self.top_p.unwrap_or(defaults.top_p),
            top_k: self.top_k.unwrap_or(defaults.top_k),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        let mut cli_args = vec!["crchat"];
        cli_args.extend(args);
        Cli::try_parse_from(cli_args)
    }

    #[test]
    fn test_no_subcommand_runs_repl() -> Result<(), Box<dyn std::error::Error>> {
        let cli = parse(&["-y", "--verbose"])?;
        assert!(cli.command.is_none());
        assert!(cli.yes);
        assert!(cli.verbose);
        Ok(())
    }

    #[test]
    fn test_ask_joins_words() -> Result<(), Box<dyn std::error::Error>> {
        let cli = parse(&["ask", "why", "is", "the", "sky", "blue"])?;
        match cli.command {
            Some(Commands::Ask { prompt }) => assert_eq!(prompt.join(" "), "why is the sky blue"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(parse(&["ask"]).is_err());
        Ok(())
    }

    #[test]
    fn test_config_set() -> Result<(), Box<dyn std::error::Error>> {
        let cli = parse(&["config", "set", "--model", "mistral", "--system-prompt", "Be brief"])?;
        match cli.command {
            Some(Commands::Config {
                command: ConfigCommands::Set { url, model, system_prompt },
            }) => {
                assert_eq!(url, None);
                assert_eq!(model.as_deref(), Some("mistral"));
                assert_eq!(system_prompt.as_deref(), Some("Be brief"));
            }
            other => panic!("unexpected {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_completions_shell() -> Result<(), Box<dyn std::error::Error>> {
        let cli = parse(&["completions", "bash"])?;
        assert!(matches!(cli.command, Some(Commands::Completions { shell: Shell::Bash })));
        Ok(())
    }

    #[test]
    fn test_overrides_win_over_stored_config() -> Result<(), Box<dyn std::error::Error>> {
        let cli = parse(&["--base-url", "http://gpu:11434", "-m", "  ", "--top-k", "5"])?;
        let config = cli.overrides().apply(EndpointConfig::default());
        assert_eq!(config.base_url, "http://gpu:11434");
        assert_eq!(config.model_name, "llama3.2");
        let sampling = cli.sampling();
        assert_eq!(sampling.top_k, 5);
        assert_eq!(sampling.temperature, 0.7);
        Ok(())
    }

    #[test]
    fn test_invalid_flag_fails() {
        assert!(parse(&["--no-such-flag"]).is_err());
    }
}
