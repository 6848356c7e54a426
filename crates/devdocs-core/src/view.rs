//! Resolving a locator to a view of a document, and writing that view out.
//!
//! A view is either the whole document or an excerpt bounded by the line range
//! of one section:
//!
//! ```rust
//! use devdocs_core::{EntryLocator, SectionIndex, view::resolve_lines};
//!
//! let index = SectionIndex::parse("3:7 alpha\n6:7 beta\n")?;
//! let lines = resolve_lines(&EntryLocator::parse("doc#beta"), &index, "demo")?;
//! assert_eq!(lines.map(|r| (r.start, r.end)), Some((6, 7)));
//!
//! let whole = resolve_lines(&EntryLocator::parse("doc"), &index, "demo")?;
//! assert!(whole.is_none());
//! # Ok::<(), devdocs_core::Error>(())
//! ```

use crate::document::MarkdownDocument;
use crate::locator::EntryLocator;
use crate::section_index::SectionIndex;
use crate::{Error, LineRange, Result};
use serde::Serialize;
use std::io::{self, Write};
use tracing::debug;

/// Line range selected by `locator`, or `None` for the whole document.
///
/// Fails with [`Error::SectionNotFound`] when the fragment is not indexed.
pub fn resolve_lines(
    locator: &EntryLocator,
    index: &SectionIndex,
    docset: &str,
) -> Result<Option<LineRange>> {
    if !locator.has_fragment() {
        return Ok(None);
    }

    match index.get(&locator.fragment) {
        Some(lines) => {
            debug!(fragment = %locator.fragment, %lines, "resolved section");
            Ok(Some(lines))
        },
        None => Err(Error::SectionNotFound {
            docset: docset.to_string(),
            path: locator.path.clone(),
            id: locator.fragment.clone(),
        }),
    }
}

/// A resolved, immutable view of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryView {
    /// Document the view belongs to.
    pub document: MarkdownDocument,
    /// Section lines, or `None` for the whole document.
    pub lines: Option<LineRange>,
}

impl EntryView {
    /// Resolve the document's own locator against its own index.
    pub fn resolve(document: MarkdownDocument) -> Result<Self> {
        let lines = resolve_lines(&document.entry, &document.index, &document.docset)?;
        Ok(Self { document, lines })
    }

    /// Whether the view is a single section.
    #[must_use]
    pub const fn is_excerpt(&self) -> bool {
        self.lines.is_some()
    }

    /// Write the viewed lines to `sink`, returning the byte count.
    pub fn write_to<W: Write>(&self, sink: W) -> io::Result<u64> {
        match self.lines {
            None => write_whole(self.document.as_bytes(), sink),
            Some(range) => write_excerpt(self.document.as_bytes(), range, sink),
        }
    }

    /// Viewed lines as a string.
    #[must_use]
    pub fn render_to_string(&self) -> String {
        let mut buf = Vec::with_capacity(self.document.content.len());
        // Writing to a Vec cannot fail.
        let _ = self.write_to(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

fn write_whole<W: Write>(content: &[u8], mut sink: W) -> io::Result<u64> {
    sink.write_all(content)?;
    Ok(content.len() as u64)
}

/// Copy lines `range.start..=range.end` (1-indexed) of `content` to `sink`.
///
/// Each line is written with a single `\n`, whatever its original terminator.
/// A start past the last line writes nothing.
pub fn write_excerpt<W: Write>(content: &[u8], range: LineRange, mut sink: W) -> io::Result<u64> {
    let mut written = 0u64;

    for (i, raw) in content.split_inclusive(|&b| b == b'\n').enumerate() {
        let number = i + 1;
        if number < range.start {
            continue;
        }
        if number > range.end {
            break;
        }

        let line = raw.strip_suffix(b"\n").unwrap_or(raw);
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        sink.write_all(line)?;
        sink.write_all(b"\n")?;
        written += line.len() as u64 + 1;
    }

    Ok(written)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::section::HeadingAnchor;

    const SAMPLE: &str = "# Title\nintro line\n## Alpha\na1\na2\n### Beta\nb1\n## Gamma\ng1\n";

    fn document(raw_locator: &str) -> MarkdownDocument {
        let anchors: Vec<HeadingAnchor> = ["alpha", "beta", "gamma"].into_iter().map(Into::into).collect();
        MarkdownDocument {
            docset: "demo".into(),
            entry: EntryLocator::parse(raw_locator),
            content: SAMPLE.into(),
            index: SectionIndex::build(SAMPLE.as_bytes(), &anchors).unwrap(),
        }
    }

    #[test]
    fn test_fragment_yields_excerpt() {
        let view = EntryView::resolve(document("doc#beta")).unwrap();
        assert!(view.is_excerpt());
        assert_eq!(view.lines, Some(LineRange::new(6, 7)));

        let mut out = Vec::new();
        let n = view.write_to(&mut out).unwrap();
        assert_eq!(out, b"### Beta\nb1\n");
        assert_eq!(n, 12);
    }

    #[test]
    fn test_no_fragment_yields_whole_document() {
        let view = EntryView::resolve(document("doc")).unwrap();
        assert!(!view.is_excerpt());
        assert_eq!(view.render_to_string(), SAMPLE);
    }

    #[test]
    fn test_unknown_fragment_is_section_not_found() {
        match EntryView::resolve(document("doc#delta")) {
            Err(Error::SectionNotFound { docset, path, id }) => {
                assert_eq!(docset, "demo");
                assert_eq!(path, "doc");
                assert_eq!(id, "delta");
            },
            other => panic!("expected SectionNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_excerpt_normalises_terminators() {
        let mut out = Vec::new();
        let n = write_excerpt(b"a\r\nb\r\nc", LineRange::new(2, 3), &mut out).unwrap();
        assert_eq!(out, b"b\nc\n");
        assert_eq!(n, 4);
    }

    #[test]
    fn test_excerpt_start_past_end_writes_nothing() {
        let mut out = Vec::new();
        let n = write_excerpt(b"a\nb\n", LineRange::new(10, 12), &mut out).unwrap();
        assert_eq!(n, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_excerpt_end_past_eof_stops_at_eof() {
        let mut out = Vec::new();
        write_excerpt(b"a\nb\n", LineRange::new(2, 99), &mut out).unwrap();
        assert_eq!(out, b"b\n");
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_sink_errors_propagate() {
        let err = write_excerpt(b"a\n", LineRange::new(1, 1), BrokenSink).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
