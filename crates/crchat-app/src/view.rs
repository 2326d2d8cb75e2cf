use std::cell::RefCell;
use std::collections::HashSet;
use std::io::{self, BufRead, Write};

use colored::Colorize;
use crchat_format::parse_message;
use crchat_session::{SessionView, Toast, ToastLevel};
use crchat_types::{ChatTurn, ConnectionStatus, EndpointConfig, Role};

use crate::render::{render_events, strip_controls};

/// Prints session events to the terminal
pub struct TerminalView {
    expanded: RefCell<HashSet<usize>>,
    assume_yes: bool,
}

impl TerminalView {
    pub fn new(assume_yes: bool) -> Self {
        Self {
            expanded: RefCell::new(HashSet::new()),
            assume_yes,
        }
    }

    /// Flip the reasoning block of the turn at `index`; returns the new state
    pub fn toggle_reasoning(&self, index: usize) -> bool {
        let mut expanded = self.expanded.borrow_mut();
        if expanded.remove(&index) {
            false
        } else {
            expanded.insert(index);
            true
        }
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded.borrow().contains(&index)
    }

    /// Styled text for one turn, reasoning collapsed unless toggled open
    pub fn render_turn(&self, index: usize, turn: &ChatTurn) -> String {
        let number = index + 1;
        if turn.role() == Role::User {
            return format!("{} {}\n", format!("[{}] You:", number).bright_green().bold(), strip_controls(turn.content()));
        }

        let parsed = parse_message(turn.content());
        let mut out = format!("\n{}\n", format!("[{}] Assistant:", number).bright_blue().bold());

        if let Some(reasoning) = &parsed.reasoning {
            if self.is_expanded(index) {
                out.push_str(&format!("{}\n", "▾ Thinking process".bright_black()));
                for line in strip_controls(reasoning).lines() {
                    out.push_str(&format!("{} {}\n", "│".bright_black(), line.bright_black()));
                }
            } else {
                out.push_str(&format!(
                    "{}\n",
                    format!("▸ Thinking process (/think {} to show)", number).bright_black()
                ));
            }
        }

        out.push_str(&render_events(&parsed.events));
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out
    }
}

impl SessionView for TerminalView {
    fn toast(&self, toast: Toast) {
        let icon = match toast.level {
            ToastLevel::Success => "✓".green(),
            ToastLevel::Error => "✗".bright_red(),
            ToastLevel::Warning => "!".yellow(),
        };
        eprintln!("{} {} {}", icon, format!("{}:", toast.title).bold(), toast.message);
    }

    fn turn_appended(&self, index: usize, turn: &ChatTurn) {
        // The user already sees what they typed
        if turn.role() != Role::User {
            println!("{}", self.render_turn(index, turn));
        }
    }

    fn conversation_cleared(&self) {
        self.expanded.borrow_mut().clear();
    }

    fn busy_changed(&self, busy: bool) {
        if busy {
            eprintln!("{}", "Waiting for the model...".bright_black());
        }
    }

    fn connection_changed(&self, status: ConnectionStatus) {
        log::debug!("Connection status: {}", status.label());
    }

    fn config_changed(&self, config: &EndpointConfig) {
        log::debug!("Using {} at {}", config.model_name, config.base_url);
    }

    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        print!("{} [y/N] ", prompt.yellow());
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}
