use crate::markup::{Emphasis, Event};

/// Append the HTML for `events` to `out`.
///
/// Text and code are written as-is: they must already be escaped.
pub fn push_html(out: &mut String, events: &[Event]) {
    for event in events {
        match event {
            Event::Text(text) => out.push_str(text),
            Event::CodeBlock(code) => {
                out.push_str("<pre><code>");
                out.push_str(code);
                out.push_str("</code></pre>");
            }
            Event::InlineCode(code) => {
                out.push_str("<code>");
                out.push_str(code);
                out.push_str("</code>");
            }
            Event::Start(Emphasis::Strong) => out.push_str("<strong>"),
            Event::End(Emphasis::Strong) => out.push_str("</strong>"),
            Event::Start(Emphasis::Em) => out.push_str("<em>"),
            Event::End(Emphasis::Em) => out.push_str("</em>"),
            Event::LineBreak => out.push_str("<br>"),
        }
    }
}

pub fn to_html(events: &[Event]) -> String {
    let mut out = String::new();
    push_html(&mut out, events);
    out
}
