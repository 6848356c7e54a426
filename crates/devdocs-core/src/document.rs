//! Documents as fetched and as converted.

use crate::locator::EntryLocator;
use crate::section_index::SectionIndex;
use serde::Serialize;

/// A raw HTML page from the documents host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlDocument {
    /// Docset slug.
    pub docset: String,
    /// Entry the page was fetched for.
    pub entry: EntryLocator,
    /// Raw HTML.
    pub content: String,
}

/// A converted page together with its Section Index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkdownDocument {
    /// Docset slug.
    pub docset: String,
    /// Entry the page was fetched for, fragment included.
    pub entry: EntryLocator,
    /// Converted Markdown.
    pub content: String,
    /// Section Index of `content`.
    #[serde(skip)]
    pub index: SectionIndex,
}

impl MarkdownDocument {
    /// Bytes of the Markdown content.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.content.as_bytes()
    }
}
