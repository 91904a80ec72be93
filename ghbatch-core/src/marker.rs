//! Description markers.
//!
//! The marker is carried as an explicit field next to the description text.
//! Repository descriptions on the remote still use the legacy glyph prefix,
//! so [`Description::parse`] and [`Description::to_wire`] convert between the
//! two forms:
//!
//! ```text
//! "✅ text"  <-> Description { marker: Done, text: "text" }
//! "⁉️ text"  <-> Description { marker: NeedsAttention, text: "text" }
//! "text"     <-> Description { marker: Unmarked, text: "text" }
//! ```

use std::fmt;

/// Legacy wire prefix for [`Marker::Done`].
pub const DONE_GLYPH: &str = "\u{2705}";
/// Legacy wire prefix for [`Marker::NeedsAttention`] (with emoji variation selector).
pub const ATTENTION_GLYPH: &str = "\u{2049}\u{FE0F}";
/// Bare form of the attention glyph some clients strip the selector down to.
const ATTENTION_GLYPH_BARE: &str = "\u{2049}";

/// Completion / attention status of a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Marker {
    #[default]
    Unmarked,
    NeedsAttention,
    Done,
}

impl Marker {
    pub fn glyph(self) -> Option<&'static str> {
        match self {
            Marker::Unmarked => None,
            Marker::NeedsAttention => Some(ATTENTION_GLYPH),
            Marker::Done => Some(DONE_GLYPH),
        }
    }

    /// `NeedsAttention` and `Done` short-circuit re-processing within a pass.
    pub fn is_sticky(self) -> bool {
        !matches!(self, Marker::Unmarked)
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::Unmarked => write!(f, "none"),
            Marker::NeedsAttention => write!(f, "needs-attention"),
            Marker::Done => write!(f, "done"),
        }
    }
}

/// A repository description with its marker held separately from the text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Description {
    pub marker: Marker,
    pub text: String,
}

impl Description {
    pub fn new(marker: Marker, text: impl Into<String>) -> Self {
        Self {
            marker,
            text: text.into(),
        }
    }

    pub fn unmarked(text: impl Into<String>) -> Self {
        Self::new(Marker::Unmarked, text)
    }

    /// Read a description in its wire form, lifting a leading glyph into the
    /// marker. At most one marker is recognised.
    pub fn parse(raw: &str) -> Self {
        let (marker, rest) = if let Some(rest) = raw.strip_prefix(DONE_GLYPH) {
            (Marker::Done, rest)
        } else if let Some(rest) = raw.strip_prefix(ATTENTION_GLYPH) {
            (Marker::NeedsAttention, rest)
        } else if let Some(rest) = raw.strip_prefix(ATTENTION_GLYPH_BARE) {
            (Marker::NeedsAttention, rest)
        } else {
            return Self::unmarked(raw);
        };
        Self::new(marker, rest.trim_start())
    }

    /// Serialize to the wire form stored on the remote.
    pub fn to_wire(&self) -> String {
        match self.marker.glyph() {
            None => self.text.clone(),
            Some(glyph) if self.text.is_empty() => glyph.to_string(),
            Some(glyph) => format!("{glyph} {}", self.text),
        }
    }

    /// The `Unmarked → NeedsAttention` transition. Returns `None` when the
    /// description already carries a marker.
    pub fn claim_attention(&self) -> Option<Description> {
        if self.marker.is_sticky() {
            return None;
        }
        Some(Self::new(Marker::NeedsAttention, self.text.clone()))
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}
