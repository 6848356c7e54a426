//! Section Index: ordered mapping from heading identifier to line range.
//!
//! The persisted form is one section per line, in document order:
//!
//! ```text
//! <start>:<end> <id>
//! ```
//!
//! Serialization and parsing are exact inverses, so an index survives any
//! number of trips through the cache unchanged, including its order.

use crate::section::{HeadingAnchor, build_sections};
use crate::{DocumentSection, Error, IndexFormatReason, LineRange, Result};
use std::collections::HashMap;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use tracing::{debug, warn};

/// Ordered, immutable heading-identifier index for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionIndex {
    ids: Vec<String>,
    ranges: HashMap<String, LineRange>,
}

impl SectionIndex {
    /// Index the named sections, keeping document order.
    ///
    /// Sections with an empty identifier cannot be looked up by fragment and
    /// are left out, as are identifiers with line breaks, which the persisted
    /// form cannot hold. A repeated identifier keeps its first position and
    /// takes the last range.
    #[must_use]
    pub fn from_sections<'a, I>(sections: I) -> Self
    where
        I: IntoIterator<Item = &'a DocumentSection>,
    {
        let mut index = Self::default();
        for section in sections {
            if section.id.is_empty() {
                continue;
            }
            if section.id.contains(['\n', '\r']) {
                warn!(
                    id = ?section.id,
                    lines = %section.lines,
                    "dropping section with line break in identifier"
                );
                continue;
            }
            index.insert(section.id.clone(), section.lines);
        }
        index
    }

    /// Build the index for converted Markdown and its heading anchors.
    pub fn build(markdown: &[u8], anchors: &[HeadingAnchor]) -> Result<Self> {
        let sections = build_sections(markdown, anchors)?;
        let index = Self::from_sections(&sections);
        debug!(count = index.len(), "created document index");
        Ok(index)
    }

    fn insert(&mut self, id: String, lines: LineRange) {
        if self.ranges.insert(id.clone(), lines).is_none() {
            self.ids.push(id);
        }
    }

    /// Range owned by `id`. No fallback.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<LineRange> {
        self.ranges.get(id).copied()
    }

    /// Identifiers in document order.
    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// `(id, range)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, LineRange)> + '_ {
        self.ids
            .iter()
            .filter_map(|id| self.ranges.get(id).map(|r| (id.as_str(), *r)))
    }

    /// Identifier following `id` in document order.
    #[must_use]
    pub fn next_after(&self, id: &str) -> Option<&str> {
        let pos = self.ids.iter().position(|candidate| candidate == id)?;
        self.ids.get(pos + 1).map(String::as_str)
    }

    /// Number of indexed sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether no section is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Write the persisted form, returning the number of bytes written.
    pub fn write_to<W: Write>(&self, mut w: W) -> io::Result<usize> {
        let mut written = 0;
        for (id, lines) in self.iter() {
            let line = format!("{}:{} {}\n", lines.start, lines.end, id);
            w.write_all(line.as_bytes())?;
            written += line.len();
        }
        Ok(written)
    }

    /// Persisted form as a string.
    #[must_use]
    pub fn serialize(&self) -> String {
        self.to_string()
    }

    /// Parse the persisted form. Blank lines are skipped.
    pub fn parse(text: &str) -> Result<Self> {
        let mut index = Self::default();
        for (i, line) in text.lines().enumerate() {
            if let Some((id, lines)) = parse_line(i + 1, line)? {
                index.insert(id, lines);
            }
        }
        Ok(index)
    }

    /// Parse the persisted form from a reader.
    pub fn read_from<R: BufRead>(reader: R) -> Result<Self> {
        let mut index = Self::default();
        for (i, line) in reader.lines().enumerate() {
            let line = line.map_err(Error::MalformedInput)?;
            if let Some((id, lines)) = parse_line(i + 1, &line)? {
                index.insert(id, lines);
            }
        }
        Ok(index)
    }
}

fn parse_line(number: usize, line: &str) -> Result<Option<(String, LineRange)>> {
    if line.is_empty() {
        return Ok(None);
    }

    let bad = |reason| Error::BadIndexFormat {
        line: number,
        reason,
    };

    let (range, id) = line
        .split_once(' ')
        .ok_or_else(|| bad(IndexFormatReason::NoSpaceAfterRange))?;
    let (start, end) = range
        .split_once(':')
        .ok_or_else(|| bad(IndexFormatReason::BadRangeSyntax))?;
    let start = start
        .parse::<usize>()
        .map_err(|_| bad(IndexFormatReason::StartNotNumber))?;
    let end = end
        .parse::<usize>()
        .map_err(|_| bad(IndexFormatReason::EndNotNumber))?;

    Ok(Some((id.to_string(), LineRange::new(start, end))))
}

impl fmt::Display for SectionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, lines) in self.iter() {
            writeln!(f, "{}:{} {}", lines.start, lines.end, id)?;
        }
        Ok(())
    }
}

impl FromStr for SectionIndex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
