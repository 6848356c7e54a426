//! # devdocs-core
//!
//! Core functionality for devdocs - a terminal reader for DevDocs documentation.
//!
//! Pages are fetched as HTML, converted to Markdown, and indexed so that any
//! heading can be addressed as `path#fragment` and printed on its own.
//!
//! ## Architecture
//!
//! - **Indexing**: the Section Index maps heading identifiers to the line ranges
//!   they own; the Entry Index maps entry paths to docset entries
//! - **Views**: a locator resolves to the whole document or one excerpt
//! - **Collaborators**: HTTP client, HTML to Markdown converter, caches
//! - **Service**: wires the above together with explicit dependencies
//!
//! ## Quick Start
//!
//! ```rust
//! use devdocs_core::{EntryLocator, EntryView, HeadingAnchor, MarkdownDocument, SectionIndex};
//!
//! let md = "# Title\nintro line\n## Alpha\na1\na2\n### Beta\nb1\n## Gamma\ng1\n";
//! let anchors: Vec<HeadingAnchor> = ["alpha", "beta", "gamma"].into_iter().map(Into::into).collect();
//!
//! let document = MarkdownDocument {
//!     docset: "demo".into(),
//!     entry: EntryLocator::parse("doc#beta"),
//!     content: md.into(),
//!     index: SectionIndex::build(md.as_bytes(), &anchors)?,
//! };
//!
//! let view = EntryView::resolve(document)?;
//! assert_eq!(view.render_to_string(), "### Beta\nb1\n");
//! # Ok::<(), devdocs_core::Error>(())
//! ```
//!
//! ## Persisted formats
//!
//! Both indexes have a line-oriented text form that round-trips exactly:
//!
//! ```rust
//! use devdocs_core::{EntryIndex, SectionIndex};
//!
//! let sections: SectionIndex = "3:7 alpha\n6:7 beta\n".parse()?;
//! assert_eq!(sections.serialize(), "3:7 alpha\n6:7 beta\n");
//!
//! let entries: EntryIndex = "array/index\tGlobal\tArray\n".parse()?;
//! assert_eq!(entries.get("array").map(|e| e.name.as_str()), Some("Array"));
//! # Ok::<(), devdocs_core::Error>(())
//! ```

/// Byte caches for listings and converted documents
pub mod cache;
/// HTTP client for the documentation aggregator
pub mod client;
/// Configuration file and environment overrides
pub mod config;
/// HTML to Markdown conversion
pub mod convert;
/// HTML and Markdown documents
pub mod document;
/// Entry Index
pub mod entry_index;
/// Error types and result aliases
pub mod error;
/// Entry locators (`path#fragment`)
pub mod locator;
/// Line scanning and heading detection
pub mod scanner;
/// Section range construction
pub mod section;
/// Section Index
pub mod section_index;
/// Listing and viewing entries
pub mod service;
/// Core data structures
pub mod types;
/// View resolution and excerpt extraction
pub mod view;

pub use cache::{Cache, FileSystemCache, MemoryCache, NoCache};
pub use client::{Client, ClientOptions};
pub use config::Config;
pub use convert::{HtmlPreprocessor, MarkdownConverter};
pub use document::{HtmlDocument, MarkdownDocument};
pub use entry_index::EntryIndex;
pub use error::{Error, IndexFormatReason, Result};
pub use locator::EntryLocator;
pub use section::{HeadingAnchor, build_sections};
pub use section_index::SectionIndex;
pub use service::Service;
pub use types::*;
pub use view::{EntryView, resolve_lines, write_excerpt};
