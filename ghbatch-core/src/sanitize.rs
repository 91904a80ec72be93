//! Description sanitizer.
//!
//! Runs of carriage returns, line feeds and tabs collapse to one space and the
//! result is trimmed. When that changes anything beyond trimming, the
//! description is flagged [`Marker::NeedsAttention`] so a human reviews the
//! cleaned text and the marker pass leaves it alone.

use crate::marker::{Description, Marker};

/// Output of [`sanitize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitized {
    pub text: String,
    /// `true` when `text` differs from the trimmed input.
    pub altered: bool,
}

fn is_control_break(c: char) -> bool {
    matches!(c, '\r' | '\n' | '\t')
}

/// Collapse control-character runs and trim.
pub fn sanitize(raw: &str) -> Sanitized {
    let mut collapsed = String::with_capacity(raw.len());
    let mut in_run = false;
    for c in raw.chars() {
        if is_control_break(c) {
            if !in_run {
                collapsed.push(' ');
                in_run = true;
            }
        } else {
            collapsed.push(c);
            in_run = false;
        }
    }

    let text = collapsed.trim().to_string();
    let altered = text != raw.trim();
    Sanitized { text, altered }
}

/// Sanitize and lift the marker. Altered text is always `NeedsAttention`
/// and keeps any other legacy glyph as part of its text; clean text has its
/// glyph parsed into the marker.
pub fn sanitize_description(raw: &str) -> Description {
    let Sanitized { text, altered } = sanitize(raw);
    let parsed = Description::parse(&text);
    if !altered {
        return parsed;
    }
    match parsed.marker {
        Marker::NeedsAttention => parsed,
        _ => Description::new(Marker::NeedsAttention, text),
    }
}

/// [`sanitize_description`] rendered back to its wire form.
pub fn sanitize_wire(raw: &str) -> String {
    sanitize_description(raw).to_wire()
}
