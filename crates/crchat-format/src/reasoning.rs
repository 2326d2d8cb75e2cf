/// Opening marker of a reasoning segment
pub const THINK_OPEN: &str = "<think>";
/// Closing marker of a reasoning segment
pub const THINK_CLOSE: &str = "</think>";

/// Raw text split into reasoning segments and the remaining body
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Extraction {
    /// Trimmed inner text of every well-formed segment, in order (may be empty)
    pub segments: Vec<String>,
    /// Text with every segment removed; trimmed when anything was removed
    pub body: String,
}

impl Extraction {
    /// Non-empty segments joined by a blank line, or `None` if there are none
    pub fn reasoning(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .segments
            .iter()
            .map(String::as_str)
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("\n\n"))
        }
    }
}

/// Pull every `<think>…</think>` segment out of `raw`.
///
/// Pairing is non-greedy and left to right. An opening marker without a
/// closing marker after it is left in the body.
pub fn extract_reasoning(raw: &str) -> Extraction {
    let mut segments = Vec::new();
    let mut body = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(open) = rest.find(THINK_OPEN) {
        let inner_start = open + THINK_OPEN.len();
        let Some(close) = rest[inner_start..].find(THINK_CLOSE) else {
            break;
        };
        body.push_str(&rest[..open]);
        segments.push(rest[inner_start..inner_start + close].trim().to_string());
        rest = &rest[inner_start + close + THINK_CLOSE.len()..];
    }
    body.push_str(rest);

    if !segments.is_empty() {
        body = body.trim().to_string();
    }

    Extraction { segments, body }
}
