//! # crchat-format
//!
//! Turns raw model output into safe display markup.
//!
//! The pipeline is fixed: reasoning segments (`<think>…</think>`) are pulled
//! out first, the remaining text is HTML-escaped, and only then are the
//! markup rules applied (code blocks, inline code, bold, italic, line
//! breaks). Formatting is total: every input string yields a result.
//!
//! ```
//! let formatted = crchat_format::format_message("Hello <think>reasoning here</think>**world**");
//! assert_eq!(formatted.body, "Hello <strong>world</strong>");
//! assert_eq!(formatted.reasoning.unwrap().text, "reasoning here");
//! ```

pub mod escape;
pub mod html;
pub mod markup;
pub mod reasoning;

pub use escape::escape_html;
pub use markup::{Emphasis, Event};
pub use reasoning::{extract_reasoning, Extraction, THINK_CLOSE, THINK_OPEN};

use uuid::Uuid;

/// Display view of one message, computed at render time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedMessage {
    /// Escaped and marked-up answer text
    pub body: String,
    /// Collapsible reasoning, present only when it has text
    pub reasoning: Option<ReasoningBlock>,
}

/// Extracted reasoning of one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReasoningBlock {
    /// Unique per formatted block; used to wire a show/hide toggle
    pub id: String,
    /// Trimmed segments joined by a blank line, unescaped
    pub text: String,
    /// Escaped text with line breaks
    pub html: String,
}

/// Message split for non-HTML renderers. Nothing here is escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMessage {
    pub reasoning: Option<String>,
    pub events: Vec<Event>,
}

/// Format a raw message for HTML display.
pub fn format_message(raw: &str) -> FormattedMessage {
    let extraction = extract_reasoning(raw);

    let body = html::to_html(&markup::parse(&escape_html(&extraction.body)));
    let reasoning = extraction.reasoning().map(|text| {
        let html = html::to_html(&markup::parse_plain(&escape_html(&text)));
        ReasoningBlock {
            id: new_reasoning_id(),
            text,
            html,
        }
    });

    FormattedMessage { body, reasoning }
}

/// Same extraction and markup rules, without HTML escaping
pub fn parse_message(raw: &str) -> ParsedMessage {
    let extraction = extract_reasoning(raw);
    ParsedMessage {
        reasoning: extraction.reasoning(),
        events: markup::parse(&extraction.body),
    }
}

fn new_reasoning_id() -> String {
    format!("thinking-{}", Uuid::new_v4().simple())
}

const THINKING_ICON_PATH: &str = "M8.59,16.59L13.17,12L8.59,7.41L10,6L16,12L10,18L8.59,16.59Z";

/// Full message markup: the collapsed "Thinking process" section (if any)
/// followed by the body.
pub fn render_message_html(message: &FormattedMessage) -> String {
    let Some(reasoning) = &message.reasoning else {
        return message.body.clone();
    };

    let mut out = String::with_capacity(message.body.len() + reasoning.html.len() + 512);
    out.push_str("<div class=\"thinking-section\">");
    out.push_str(&format!(
        "<button class=\"thinking-toggle\" data-thinking-id=\"{}\">",
        reasoning.id
    ));
    out.push_str(&format!(
        "<svg class=\"thinking-icon\" viewBox=\"0 0 24 24\" width=\"16\" height=\"16\"><path fill=\"currentColor\" d=\"{}\"/></svg>",
        THINKING_ICON_PATH
    ));
    out.push_str("<span class=\"thinking-label\">Thinking process</span></button>");
    out.push_str(&format!(
        "<div class=\"thinking-content\" id=\"{}\" style=\"display: none;\">",
        reasoning.id
    ));
    out.push_str(&reasoning.html);
    out.push_str("</div></div>");
    out.push_str(&message.body);
    out
}
