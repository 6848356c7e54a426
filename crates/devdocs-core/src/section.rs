//! Section range construction.
//!
//! Every heading line of level 2 or deeper owns the lines from itself up to
//! the line before the next heading of the same or a shallower level, or up
//! to the end of the document. Level 1 headings are document titles: they are
//! never indexed and never consume a [`HeadingAnchor`].
//!
//! ```rust
//! use devdocs_core::section::{HeadingAnchor, build_sections};
//!
//! let md = "# Title\nintro\n## Alpha\na1\n### Beta\nb1\n## Gamma\ng1\n";
//! let anchors: Vec<HeadingAnchor> = ["alpha", "beta", "gamma"].into_iter().map(Into::into).collect();
//! let sections = build_sections(md.as_bytes(), &anchors)?;
//!
//! assert_eq!(sections[0].lines.start, 3);
//! assert_eq!(sections[0].lines.end, 6);
//! assert_eq!(sections[1].lines.start, 5);
//! assert_eq!(sections[1].lines.end, 6);
//! # Ok::<(), devdocs_core::Error>(())
//! ```

use crate::scanner::LineScanner;
use crate::{DocumentSection, LineRange, Result};
use std::io::BufRead;
use tracing::{debug, warn};

/// Identity of one eligible heading, as produced by the HTML side.
///
/// Anchors are matched positionally to heading lines of level 2 and deeper.
/// `level` is filled in when the producer knows it and is only used to
/// detect drift between the two scans.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeadingAnchor {
    /// Expected heading level, when known.
    pub level: Option<u8>,
    /// Section identifier; empty for headings without one.
    pub id: String,
}

impl HeadingAnchor {
    /// Anchor with a known level.
    #[must_use]
    pub fn new(level: u8, id: impl Into<String>) -> Self {
        Self {
            level: Some(level),
            id: id.into(),
        }
    }

    /// Anchor for a heading-looking line that has no identity.
    #[must_use]
    pub const fn unnamed(level: u8) -> Self {
        Self {
            level: Some(level),
            id: String::new(),
        }
    }
}

impl From<&str> for HeadingAnchor {
    fn from(id: &str) -> Self {
        Self {
            level: None,
            id: id.to_string(),
        }
    }
}

impl From<String> for HeadingAnchor {
    fn from(id: String) -> Self {
        Self { level: None, id }
    }
}

/// A section whose end line is not known yet.
#[derive(Debug)]
struct OpenSection {
    level: u8,
    id: String,
    start: usize,
    end: Option<usize>,
}

/// Array-backed stack of indices into the open section list.
#[derive(Debug, Default)]
struct SectionStack {
    slots: Vec<usize>,
}

impl SectionStack {
    fn push(&mut self, index: usize) {
        self.slots.push(index);
    }

    fn pop(&mut self) -> Option<usize> {
        self.slots.pop()
    }

    fn peek(&self) -> Option<usize> {
        self.slots.last().copied()
    }

    fn len(&self) -> usize {
        self.slots.len()
    }
}

/// Scan `text` and compute the line range owned by each level 2+ heading.
///
/// Sections come back in document order, including those with an empty
/// identifier. Fails only when reading `text` fails.
pub fn build_sections<R: BufRead>(text: R, anchors: &[HeadingAnchor]) -> Result<Vec<DocumentSection>> {
    let mut scanner = LineScanner::new(text);
    let mut sections: Vec<OpenSection> = Vec::with_capacity(anchors.len());
    let mut next_anchor = anchors.iter();
    let mut exhausted = false;

    for line in scanner.by_ref() {
        let line = line?;
        let Some(level) = line.heading_level() else {
            continue;
        };
        if level == 1 {
            continue;
        }

        let id = match next_anchor.next() {
            Some(anchor) => {
                if let Some(expected) = anchor.level {
                    if expected != level {
                        warn!(
                            line = line.number,
                            scanned = level,
                            expected,
                            id = %anchor.id,
                            "heading level differs from anchor level"
                        );
                    }
                }
                anchor.id.clone()
            },
            None => {
                if !exhausted {
                    warn!(line = line.number, "more heading lines than anchors");
                    exhausted = true;
                }
                String::new()
            },
        };

        debug!(level, id = %id, line = line.number, "found section");
        sections.push(OpenSection {
            level,
            id,
            start: line.number,
            end: None,
        });
    }

    let surplus = next_anchor.count();
    if surplus > 0 {
        warn!(surplus, "anchors left over after scanning headings");
    }

    let total_lines = scanner.lines_read();
    close_ranges(&mut sections, total_lines);

    Ok(sections
        .into_iter()
        .map(|s| DocumentSection {
            level: s.level,
            id: s.id,
            lines: LineRange::new(s.start, s.end.unwrap_or(total_lines)),
        })
        .collect())
}

/// Assign end lines: a heading closes every open section at the same or a
/// deeper level, and whatever is still open at the end runs to `total_lines`.
fn close_ranges(sections: &mut [OpenSection], total_lines: usize) {
    debug!(count = sections.len(), "calculating section ranges");
    let mut stack = SectionStack::default();

    for current in 0..sections.len() {
        let (level, start) = (sections[current].level, sections[current].start);

        while let Some(top) = stack.peek() {
            if sections[top].level < level {
                break;
            }
            stack.pop();
            sections[top].end = Some(start - 1);
            debug!(
                id = %sections[top].id,
                start = sections[top].start,
                end = start - 1,
                "calculated range for section"
            );
        }

        stack.push(current);
    }

    debug!(count = stack.len(), "cleaning up section stack");
    while let Some(rest) = stack.pop() {
        sections[rest].end = Some(total_lines);
        debug!(
            id = %sections[rest].id,
            start = sections[rest].start,
            end = total_lines,
            "calculated range for section"
        );
    }
}
