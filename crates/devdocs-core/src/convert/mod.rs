//! HTML to Markdown conversion.
//!
//! The converter parses a page with `scraper`, runs its [`HtmlPreprocessor`]s
//! over an owned copy of the tree, renders Markdown, and indexes the result.
//!
//! Heading anchors are not collected from the HTML separately. After rendering,
//! the output is scanned with the same rules the Section Range Builder uses and
//! every heading line of level 2 or deeper gets exactly one anchor: the `id` of
//! the `<hN>` element that produced it, or an empty anchor when the line only
//! looks like a heading (a `## comment` inside a code block, for instance).
//!
//! ```rust
//! use devdocs_core::{EntryLocator, HtmlDocument, MarkdownConverter};
//!
//! let html = HtmlDocument {
//!     docset: "demo".into(),
//!     entry: EntryLocator::parse("page#usage"),
//!     content: r#"<h1>Page</h1><h2 id="usage">Usage</h2><pre># not a heading</pre>"#.into(),
//! };
//!
//! let md = MarkdownConverter::default().convert(&html)?;
//! assert_eq!(md.index.ids(), ["usage"]);
//! # Ok::<(), devdocs_core::Error>(())
//! ```

mod dom;
mod preprocess;
mod render;

pub use dom::{HtmlElement, HtmlNode};
pub use preprocess::{AddLanguageClasses, HtmlPreprocessor, NormalizeCodeLanguages};

use crate::document::{HtmlDocument, MarkdownDocument};
use crate::scanner::LineScanner;
use crate::section::HeadingAnchor;
use crate::section_index::SectionIndex;
use crate::Result;
use std::fmt;
use tracing::debug;

/// Converts fetched HTML pages into indexed Markdown documents.
pub struct MarkdownConverter {
    preprocessors: Vec<Box<dyn HtmlPreprocessor>>,
}

impl MarkdownConverter {
    /// Converter with no preprocessors.
    #[must_use]
    pub fn new() -> Self {
        Self {
            preprocessors: Vec::new(),
        }
    }

    /// Append a preprocessor; they run in the order added.
    #[must_use]
    pub fn with_preprocessor(mut self, preprocessor: impl HtmlPreprocessor + 'static) -> Self {
        self.preprocessors.push(Box::new(preprocessor));
        self
    }

    /// Convert `html` and build its Section Index.
    pub fn convert(&self, html: &HtmlDocument) -> Result<MarkdownDocument> {
        let mut root = HtmlElement::parse_document(&html.content);
        for preprocessor in &self.preprocessors {
            preprocessor.preprocess(&mut root)?;
        }

        let rendered = render::render(&root);
        let anchors = align_anchors(&rendered.markdown, &rendered.headings)?;
        debug!(
            docset = %html.docset,
            entry = %html.entry,
            bytes = rendered.markdown.len(),
            anchors = anchors.len(),
            "converted document"
        );

        let index = SectionIndex::build(rendered.markdown.as_bytes(), &anchors)?;
        Ok(MarkdownDocument {
            docset: html.docset.clone(),
            entry: html.entry.clone(),
            content: rendered.markdown,
            index,
        })
    }
}

/// The default converter runs [`NormalizeCodeLanguages`] then
/// [`AddLanguageClasses`].
impl Default for MarkdownConverter {
    fn default() -> Self {
        Self::new()
            .with_preprocessor(NormalizeCodeLanguages)
            .with_preprocessor(AddLanguageClasses)
    }
}

impl fmt::Debug for MarkdownConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkdownConverter")
            .field("preprocessors", &self.preprocessors.len())
            .finish()
    }
}

/// One anchor per scanned heading line of level 2+, in line order.
fn align_anchors(markdown: &str, produced: &[(usize, HeadingAnchor)]) -> Result<Vec<HeadingAnchor>> {
    let mut produced = produced.iter().peekable();
    let mut anchors = Vec::with_capacity(produced.len());

    for line in LineScanner::new(markdown.as_bytes()) {
        let line = line?;
        let Some(level) = line.heading_level() else {
            continue;
        };
        if level < 2 {
            continue;
        }

        while produced.next_if(|(at, _)| *at < line.number).is_some() {}
        match produced.next_if(|(at, _)| *at == line.number) {
            Some((_, anchor)) => anchors.push(anchor.clone()),
            None => anchors.push(HeadingAnchor::unnamed(level)),
        }
    }

    Ok(anchors)
}
