//! CLI error handling with semantic exit codes.
//!
//! | Code | Category | Description |
//! |------|----------|-------------|
//! | 0 | Success | Command completed successfully |
//! | 1 | `Internal` | Unexpected/internal error |
//! | 2 | `Usage` | Invalid arguments or configuration |
//! | 3 | `NotFound` | Docset, entry, document or section not found |
//! | 5 | `Network` | Network or fetch failure |
//! | 6 | `Timeout` | Operation timed out |
//! | 7 | `Integrity` | Malformed index or upstream data |
//!
//! ```bash
//! devdocs entries show go net/http#Nope
//! case $? in
//!     0) echo "Success" ;;
//!     3) echo "Not found" ;;
//!     *) echo "Other error" ;;
//! esac
//! ```

use devdocs_core::Error as CoreError;
use std::fmt;
use std::process::ExitCode;

/// Semantic error category determining the exit code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCategory {
    /// Unexpected or internal error (exit code 1).
    Internal = 1,
    /// Invalid arguments or configuration (exit code 2).
    Usage = 2,
    /// Requested resource not found (exit code 3).
    NotFound = 3,
    /// Network or fetch failure (exit code 5).
    Network = 5,
    /// Operation timed out (exit code 6).
    Timeout = 6,
    /// Persisted or fetched data could not be read (exit code 7).
    Integrity = 7,
}

impl ErrorCategory {
    /// Process exit code for this category.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        self as u8
    }

    /// [`ExitCode`] for this category.
    #[must_use]
    pub fn as_exit_code(self) -> ExitCode {
        ExitCode::from(self.exit_code())
    }

    /// Short lowercase label, also the `Display` form.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Internal => "internal error",
            Self::Usage => "usage error",
            Self::NotFound => "not found",
            Self::Network => "network error",
            Self::Timeout => "timeout",
            Self::Integrity => "integrity error",
        }
    }

    /// Category of a core error, decided by its kind.
    #[must_use]
    pub fn of_core(err: &CoreError) -> Self {
        match err {
            e if e.is_not_found() => Self::NotFound,
            CoreError::Network(e) if e.is_timeout() => Self::Timeout,
            CoreError::Network(_) => Self::Network,
            CoreError::BadIndexFormat { .. } | CoreError::MalformedInput(_) | CoreError::Parse(_) => {
                Self::Integrity
            },
            CoreError::Config(_) | CoreError::InvalidUrl(_) => Self::Usage,
            _ => Self::Internal,
        }
    }

    /// Heuristic fallback for errors that carry no category.
    #[must_use]
    pub fn infer_from_message(msg: &str) -> Self {
        let msg_lower = msg.to_lowercase();

        // Before Network so "connection timeout" lands here.
        if msg_lower.contains("timeout") || msg_lower.contains("timed out") {
            return Self::Timeout;
        }

        if msg_lower.contains("network")
            || msg_lower.contains("connection")
            || msg_lower.contains("dns")
            || msg_lower.contains("http")
            || msg_lower.contains("unreachable")
        {
            return Self::Network;
        }

        if msg_lower.contains("not found")
            || msg_lower.contains("no such")
            || msg_lower.contains("does not exist")
        {
            return Self::NotFound;
        }

        if msg_lower.contains("corrupt") || msg_lower.contains("failed to parse index") {
            return Self::Integrity;
        }

        if msg_lower.contains("invalid argument") || msg_lower.contains("invalid value") {
            return Self::Usage;
        }

        Self::Internal
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A CLI error with a semantic category for exit code mapping.
///
/// `suggestions` are shown by the reporter under the message.
#[derive(Debug)]
pub struct CliError {
    /// Decides the exit code.
    pub category: ErrorCategory,
    /// Underlying error.
    pub source: anyhow::Error,
    /// Alternatives offered to the user, best first.
    pub suggestions: Vec<String>,
}

impl CliError {
    /// Wrap `source` under `category`.
    pub fn new(category: ErrorCategory, source: impl Into<anyhow::Error>) -> Self {
        Self {
            category,
            source: source.into(),
            suggestions: Vec::new(),
        }
    }

    /// Invalid arguments or configuration.
    pub fn usage(source: impl Into<anyhow::Error>) -> Self {
        Self::new(ErrorCategory::Usage, source)
    }

    /// Attach suggestions, replacing any already set.
    #[must_use]
    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = suggestions;
        self
    }

    /// Process exit code.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.category.exit_code()
    }

    /// The core error underneath, if there is one.
    #[must_use]
    pub fn core(&self) -> Option<&CoreError> {
        self.source.downcast_ref::<CoreError>()
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        Self::new(ErrorCategory::of_core(&err), err)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

/// Category of any error reaching the top level.
///
/// A [`CliError`] keeps its own category, a core error anywhere in the chain
/// decides by kind, and anything else is inferred from the message.
#[must_use]
pub fn category_of(err: &anyhow::Error) -> ErrorCategory {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        return cli_err.category;
    }
    if let Some(core) = err.chain().find_map(|e| e.downcast_ref::<CoreError>()) {
        return ErrorCategory::of_core(core);
    }
    ErrorCategory::infer_from_message(&err.to_string())
}

/// Exit code of any error reaching the top level.
#[must_use]
pub fn exit_code_from_error(err: &anyhow::Error) -> u8 {
    category_of(err).exit_code()
}
