use anyhow::Result;
use colored::Colorize;
use crchat_format::extract_reasoning;
use crchat_types::Role;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::commands::print_models;
use crate::session::{ConfigUpdate, Session};

const HELP: &str = "\
Commands:
  /help                   Show this help
  /new                    Start a new conversation
  /clear                  Clear the conversation (asks first)
  /save                   Save the conversation as a text file
  /config                 Show the current configuration
  /set url <url>          Change and save the Ollama URL
  /set model <name>       Change and save the model
  /set prompt <text>      Change and save the system prompt
  /test [url]             Check the connection to Ollama
  /models                 List installed models
  /think <n>              Show or hide the reasoning of message n
  /exit                   Quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetField {
    Url,
    Model,
    Prompt,
}

/// A slash command typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    New,
    Clear,
    Save,
    Config,
    Set(SetField, String),
    Test(Option<String>),
    Models,
    Think(usize),
    Exit,
}

impl ReplCommand {
    /// `None` when the line is chat text rather than a command
    pub fn parse(line: &str) -> Option<Result<Self, String>> {
        let line = line.trim();
        if line == "exit" || line == "quit" {
            return Some(Ok(ReplCommand::Exit));
        }
        let rest = line.strip_prefix('/')?;
        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        let command = match name {
            "help" | "?" => ReplCommand::Help,
            "new" => ReplCommand::New,
            "clear" => ReplCommand::Clear,
            "save" => ReplCommand::Save,
            "config" => ReplCommand::Config,
            "models" => ReplCommand::Models,
            "exit" | "quit" => ReplCommand::Exit,
            "test" => ReplCommand::Test(Some(arg.to_string()).filter(|a| !a.is_empty())),
            "think" => match arg.parse::<usize>() {
                Ok(n) if n > 0 => ReplCommand::Think(n),
                _ => return Some(Err("Usage: /think <message number>".to_string())),
            },
            "set" => {
                let (field, value) = match arg.split_once(char::is_whitespace) {
                    Some((field, value)) => (field, value.trim()),
                    None => (arg, ""),
                };
                let field = match field {
                    "url" => SetField::Url,
                    "model" => SetField::Model,
                    "prompt" => SetField::Prompt,
                    _ => return Some(Err("Usage: /set url|model|prompt <value>".to_string())),
                };
                ReplCommand::Set(field, value.to_string())
            }
            other => return Some(Err(format!("Unknown command: /{} (try /help)", other))),
        };
        Some(Ok(command))
    }
}

/// Run interactive REPL mode
pub async fn run_repl(session: &Session) -> Result<()> {
    let config = session.controller.config();
    println!("{}", "CR Chatbot".bright_cyan().bold());
    println!("{}", format!("Ollama: {} • Model: {}", config.base_url, config.model_name).bright_black());
    println!("{}", "Type /help for commands, /exit to quit\n".bright_black());

    let mut rl = DefaultEditor::new()?;

    loop {
        let model_indicator = format!("[{}]", session.controller.config().model_name).bright_magenta();
        let readline = rl.readline(&format!("{} {} ", model_indicator, "You:".bright_green().bold()));

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                match ReplCommand::parse(line) {
                    None => {
                        session.controller.on_send(line).await;
                    }
                    Some(Err(usage)) => eprintln!("{} {}", "Error:".bright_red().bold(), usage),
                    Some(Ok(ReplCommand::Exit)) => {
                        println!("{}", "Goodbye!".bright_cyan());
                        break;
                    }
                    Some(Ok(command)) => execute(session, command).await,
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C".bright_black());
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".bright_cyan());
                break;
            }
            Err(err) => {
                eprintln!("{} {}", "Error:".bright_red().bold(), err);
                break;
            }
        }
    }

    Ok(())
}

/// Failures are reported by the controller's toasts, so results are dropped here
async fn execute(session: &Session, command: ReplCommand) {
    let controller = &session.controller;
    match command {
        ReplCommand::Help => println!("{}", HELP),
        ReplCommand::New => controller.on_new_conversation(),
        ReplCommand::Clear => {
            controller.on_clear_chat();
        }
        ReplCommand::Save => {
            let _ = controller.on_export();
        }
        ReplCommand::Config => {
            let config = controller.config();
            println!("{} {}", "Ollama URL:".bold(), config.base_url);
            println!("{} {}", "Model:".bold(), config.model_name);
            println!("{} {}", "System prompt:".bold(), config.system_prompt);
            println!("{} {}", "Status:".bold(), controller.connection().label());
            println!("{} {}", "Settings file:".bright_black(), session.settings_path.display());
        }
        ReplCommand::Set(field, value) => {
            let mut update = ConfigUpdate::default();
            match field {
                SetField::Url => update.base_url = Some(value),
                SetField::Model => update.model_name = Some(value),
                SetField::Prompt => update.system_prompt = Some(value),
            }
            let _ = session.update_config(&update);
        }
        ReplCommand::Test(url) => {
            let _ = controller.on_test_connection(url.as_deref()).await;
        }
        ReplCommand::Models => match controller.list_models().await {
            Ok(models) => print_models(&models),
            Err(e) => eprintln!("{} {}", "Error:".bright_red().bold(), e),
        },
        ReplCommand::Think(number) => {
            let index = number - 1;
            match controller.turn(index) {
                Some(turn) if turn.role() == Role::Assistant && has_reasoning(turn.content()) => {
                    session.view.toggle_reasoning(index);
                    println!("{}", session.view.render_turn(index, &turn));
                }
                Some(_) => eprintln!("{}", format!("Message {} has no reasoning", number).bright_black()),
                None => eprintln!("{}", format!("No message {}", number).bright_black()),
            }
        }
        ReplCommand::Exit => {}
    }
}

fn has_reasoning(content: &str) -> bool {
    extract_reasoning(content).reasoning().is_some()
}
