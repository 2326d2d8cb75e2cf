//! Small markup pipeline: code blocks, inline code, bold, italic, line breaks.
//!
//! Rules run in that fixed order over a unit stream. Code produced by the
//! first two rules is an opaque unit, so the emphasis rules never look inside
//! it. Emphasis markers inserted by one rule are opaque to the next, and a
//! pair only matches when the span between its delimiters is balanced with
//! respect to them, so the output always nests properly.

/// Emphasis kinds produced by the asterisk rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Strong,
    Em,
}

/// Flat rendering events, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Text(String),
    CodeBlock(String),
    InlineCode(String),
    Start(Emphasis),
    End(Emphasis),
    LineBreak,
}

#[derive(Debug, Clone)]
enum Unit {
    Char(char),
    CodeBlock(String),
    InlineCode(String),
    Start(Emphasis),
    End(Emphasis),
}

const FENCE: &str = "```";

/// Run the whole pipeline over `text`.
///
/// The text is not escaped here; HTML callers escape it first.
pub fn parse(text: &str) -> Vec<Event> {
    let units = code_blocks(text);
    let units = inline_code(units);
    let units = emphasis(units, 2, Emphasis::Strong);
    let units = emphasis(units, 1, Emphasis::Em);
    into_events(units)
}

/// Only the line-break rule, used for reasoning text
pub fn parse_plain(text: &str) -> Vec<Event> {
    into_events(text.chars().map(Unit::Char).collect())
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn spans_lines(s: &str) -> bool {
    s.chars().any(is_line_terminator)
}

// Rule 1: ```…``` blocks, non-greedy
fn code_blocks(text: &str) -> Vec<Unit> {
    let mut units = Vec::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find(FENCE) {
        let after = &rest[open + FENCE.len()..];
        let Some(close) = after.find(FENCE) else {
            break;
        };
        units.extend(rest[..open].chars().map(Unit::Char));
        units.push(Unit::CodeBlock(after[..close].to_string()));
        rest = &after[close + FENCE.len()..];
    }
    units.extend(rest.chars().map(Unit::Char));
    units
}

// Rule 2: `…` spans with at least one character and no backtick inside
fn inline_code(units: Vec<Unit>) -> Vec<Unit> {
    let mut out = Vec::with_capacity(units.len());
    let mut i = 0;

    while i < units.len() {
        if matches!(units[i], Unit::Char('`')) {
            if let Some(close) = inline_code_close(&units, i + 1) {
                if close > i + 1 {
                    let code: String = units[i + 1..close]
                        .iter()
                        .filter_map(|u| match u {
                            Unit::Char(c) => Some(*c),
                            _ => None,
                        })
                        .collect();
                    out.push(Unit::InlineCode(code));
                    i = close + 1;
                    continue;
                }
            }
        }
        out.push(units[i].clone());
        i += 1;
    }
    out
}

fn inline_code_close(units: &[Unit], from: usize) -> Option<usize> {
    for (offset, unit) in units[from..].iter().enumerate() {
        match unit {
            Unit::Char('`') => return Some(from + offset),
            Unit::Char(_) => {}
            // never spans a code block
            _ => return None,
        }
    }
    None
}

// Rules 3 and 4: `delimiter` asterisks on both sides
fn emphasis(units: Vec<Unit>, delimiter: usize, kind: Emphasis) -> Vec<Unit> {
    let mut out = Vec::with_capacity(units.len() + 8);
    let mut i = 0;

    while i < units.len() {
        if is_delimiter(&units, i, delimiter) {
            if let Some(close) = emphasis_close(&units, i + delimiter, delimiter) {
                out.push(Unit::Start(kind));
                out.extend(units[i + delimiter..close].iter().cloned());
                out.push(Unit::End(kind));
                i = close + delimiter;
                continue;
            }
        }
        out.push(units[i].clone());
        i += 1;
    }
    out
}

fn is_delimiter(units: &[Unit], at: usize, len: usize) -> bool {
    at + len <= units.len() && units[at..at + len].iter().all(|u| matches!(u, Unit::Char('*')))
}

/// First closing delimiter on the same line at nesting depth zero
fn emphasis_close(units: &[Unit], from: usize, delimiter: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut j = from;

    while j < units.len() {
        if depth == 0 && is_delimiter(units, j, delimiter) {
            return Some(j);
        }
        match &units[j] {
            Unit::Char(c) if is_line_terminator(*c) => return None,
            Unit::CodeBlock(code) | Unit::InlineCode(code) if spans_lines(code) => return None,
            Unit::Start(_) => depth += 1,
            Unit::End(_) => {
                if depth == 0 {
                    return None;
                }
                depth -= 1;
            }
            _ => {}
        }
        j += 1;
    }
    None
}

// Rule 5 and flattening
fn into_events(units: Vec<Unit>) -> Vec<Event> {
    let mut events = Vec::new();
    let mut text = String::new();

    fn flush(text: &mut String, events: &mut Vec<Event>) {
        if !text.is_empty() {
            events.push(Event::Text(std::mem::take(text)));
        }
    }

    for unit in units {
        match unit {
            Unit::Char('\n') => {
                flush(&mut text, &mut events);
                events.push(Event::LineBreak);
            }
            Unit::Char(c) => text.push(c),
            Unit::CodeBlock(code) => {
                flush(&mut text, &mut events);
                events.push(Event::CodeBlock(code));
            }
            Unit::InlineCode(code) => {
                flush(&mut text, &mut events);
                events.push(Event::InlineCode(code));
            }
            Unit::Start(kind) => {
                flush(&mut text, &mut events);
                events.push(Event::Start(kind));
            }
            Unit::End(kind) => {
                flush(&mut text, &mut events);
                events.push(Event::End(kind));
            }
        }
    }
    flush(&mut text, &mut events);
    events
}
