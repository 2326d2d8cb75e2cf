use colored::Colorize;
use crchat_format::{Emphasis, Event};

/// Drop control characters other than newline and tab
pub fn strip_controls(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

/// Render formatter events as ANSI-styled terminal text
pub fn render_events(events: &[Event]) -> String {
    let mut out = String::new();
    let mut strong = 0usize;
    let mut em = 0usize;

    for event in events {
        match event {
            Event::Text(text) => {
                let text = strip_controls(text);
                let styled = match (strong > 0, em > 0) {
                    (true, true) => text.bold().italic().to_string(),
                    (true, false) => text.bold().to_string(),
                    (false, true) => text.italic().to_string(),
                    (false, false) => text,
                };
                out.push_str(&styled);
            }
            Event::InlineCode(code) => out.push_str(&strip_controls(code).cyan().to_string()),
            Event::CodeBlock(code) => {
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                for line in strip_controls(code).trim_matches('\n').lines() {
                    out.push_str("    ");
                    out.push_str(&line.yellow().to_string());
                    out.push('\n');
                }
            }
            Event::Start(Emphasis::Strong) => strong += 1,
            Event::End(Emphasis::Strong) => strong = strong.saturating_sub(1),
            Event::Start(Emphasis::Em) => em += 1,
            Event::End(Emphasis::Em) => em = em.saturating_sub(1),
            Event::LineBreak => out.push('\n'),
        }
    }

    out
}
