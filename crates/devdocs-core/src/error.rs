//! Error types and handling for devdocs-core operations.
//!
//! Every fallible operation in the crate returns [`Result<T>`]. Errors carry the
//! structured context a caller needs to phrase a message (docset, path, fragment,
//! offending line number) so nothing has to be re-derived from a wrapped chain.
//!
//! ## Error Categories
//!
//! - **Index errors**: malformed persisted Section/Entry Index text
//! - **Lookup errors**: entry or section not found
//! - **Remote errors**: docset or document missing upstream, HTTP failures
//! - **Local errors**: I/O, cache, configuration, serialization
//!
//! None of the indexing or resolution errors are retried anywhere in the crate:
//!
//! ```rust
//! use devdocs_core::{Error, SectionIndex};
//!
//! match SectionIndex::parse("abc:10 foo\n") {
//!     Err(Error::BadIndexFormat { line, reason }) => {
//!         assert_eq!(line, 1);
//!         assert_eq!(reason.to_string(), "start must be a number");
//!     },
//!     other => panic!("unexpected result: {other:?}"),
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// Why a line of persisted index text was rejected.
///
/// The `Display` form is the stable, user-facing reason string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexFormatReason {
    /// Section Index line has no space between the range and the identifier.
    NoSpaceAfterRange,
    /// Section Index range has no `:` separator.
    BadRangeSyntax,
    /// Section Index range start is not an integer.
    StartNotNumber,
    /// Section Index range end is not an integer.
    EndNotNumber,
    /// Entry Index line has fewer than three tab-separated fields.
    NotEnoughValues,
    /// Entry Index line has an empty path.
    BlankPath,
    /// Entry Index line has an empty name.
    BlankName,
}

impl IndexFormatReason {
    /// Stable reason string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoSpaceAfterRange => "no space after range",
            Self::BadRangeSyntax => "bad range syntax",
            Self::StartNotNumber => "start must be a number",
            Self::EndNotNumber => "end must be a number",
            Self::NotEnoughValues => "not enough values",
            Self::BlankPath => "path cannot be blank",
            Self::BlankName => "name cannot be blank",
        }
    }

    /// Format the offending line is expected to follow, used as a hint.
    #[must_use]
    pub const fn expected_format(self) -> &'static str {
        match self {
            Self::NoSpaceAfterRange | Self::StartNotNumber | Self::EndNotNumber => {
                "<start>:<end> <id>"
            },
            Self::BadRangeSyntax => "<start>:<end>",
            Self::NotEnoughValues | Self::BlankPath | Self::BlankName => {
                "<path>\\t<type>\\t<name>"
            },
        }
    }
}

impl fmt::Display for IndexFormatReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The main error type for devdocs-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed outside of a text scan (cache files, sinks).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The underlying line scan of a document failed.
    ///
    /// Produced only when the byte source itself cannot be read; heading and
    /// identifier misalignment is never reported through this variant.
    #[error("Malformed input: {0}")]
    MalformedInput(#[source] std::io::Error),

    /// Persisted index text violates its line format.
    ///
    /// Parsing stops at the first violation; `line` is 1-indexed.
    #[error("failed to parse index line {line}: {reason} (expected format {})", .reason.expected_format())]
    BadIndexFormat {
        /// Offending line number.
        line: usize,
        /// What was wrong with it.
        reason: IndexFormatReason,
    },

    /// Entry Index lookup failed, including the `/index` fallback.
    #[error("docset \"{docset}\" index has no entry \"{path}\"")]
    EntryNotFound {
        /// Docset slug.
        docset: String,
        /// Path as requested by the caller.
        path: String,
    },

    /// A fragment did not resolve against an otherwise valid Section Index.
    #[error("document \"{path}\" in docset \"{docset}\" has no section with ID \"{id}\"")]
    SectionNotFound {
        /// Docset slug.
        docset: String,
        /// Document path (without fragment).
        path: String,
        /// Fragment that failed to resolve.
        id: String,
    },

    /// The aggregator does not know the docset.
    #[error("docset \"{docset}\" not found")]
    DocsetNotFound {
        /// Docset slug.
        docset: String,
    },

    /// The aggregator has no document at the path.
    #[error("document \"{path}\" not found in docset \"{docset}\"")]
    DocumentNotFound {
        /// Docset slug.
        docset: String,
        /// Document path.
        path: String,
    },

    /// HTTP request failed or returned a non-success status.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Remote payload or HTML could not be interpreted.
    #[error("Parse error: {0}")]
    Parse(String),

    /// URL is malformed or invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Configuration is invalid or inaccessible.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Cache could not be read or written.
    #[error("Cache error: {0}")]
    Cache(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl Error {
    /// Check if the error might succeed on a later attempt.
    ///
    /// Only transport-level failures qualify. Parsing and resolution errors are
    /// deterministic and never recoverable.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::Io(e) | Self::MalformedInput(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    /// Get the error category as a string identifier.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::MalformedInput(_) => "malformed_input",
            Self::BadIndexFormat { .. } => "bad_index_format",
            Self::EntryNotFound { .. }
            | Self::SectionNotFound { .. }
            | Self::DocsetNotFound { .. }
            | Self::DocumentNotFound { .. } => "not_found",
            Self::Network(_) => "network",
            Self::Parse(_) => "parse",
            Self::InvalidUrl(_) => "invalid_url",
            Self::Config(_) => "config",
            Self::Cache(_) => "cache",
            Self::Serialization(_) => "serialization",
        }
    }

    /// Whether the error means a named resource does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::EntryNotFound { .. }
                | Self::SectionNotFound { .. }
                | Self::DocsetNotFound { .. }
                | Self::DocumentNotFound { .. }
        )
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
