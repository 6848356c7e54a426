use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive, 1-indexed range of document lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineRange {
    /// First line, 1-indexed.
    pub start: usize,
    /// Last line, inclusive.
    pub end: usize,
}

impl LineRange {
    /// Range from `start` to `end`, inclusive.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Whether `line` falls inside the range.
    #[must_use]
    pub const fn contains(&self, line: usize) -> bool {
        self.start <= line && line <= self.end
    }

    /// Whether `other` lies entirely within this range.
    #[must_use]
    pub const fn encloses(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Number of lines covered.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start) + 1
    }

    /// Whether the range covers no line.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

/// One heading and the lines it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSection {
    /// Heading level, 2 or deeper.
    pub level: u8,
    /// Identifier from the heading anchor.
    pub id: String,
    /// Lines the section owns, heading included.
    pub lines: LineRange,
}

/// A docset as listed by the aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Docset {
    /// Display name.
    pub name: String,
    /// Identifier used in URLs and commands.
    pub slug: String,
    /// Version label; may be empty.
    #[serde(default)]
    pub release: String,
}

impl Docset {
    /// Name with the release appended when there is one.
    #[must_use]
    pub fn full_name(&self) -> String {
        if self.release.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, self.release)
        }
    }
}

/// One page within a docset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Display name.
    pub name: String,
    /// Grouping label, persisted as `type`.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Document path, optionally with `#fragment`.
    pub path: String,
}

/// The entry listing of a docset, as served by the aggregator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryManifest {
    /// Docset slug.
    #[serde(default)]
    pub docset: String,
    /// Entries in listing order.
    pub entries: Vec<Entry>,
}
