//! # Output Formatting
//!
//! Every command produces one of three shapes: a docset list, an entry list, or
//! an entry view. Each [`Renderer`] writes all three in its own format:
//!
//! - **console**: for people; paged when stdout is a terminal
//! - **porcelain**: tab-separated fields, stable for scripts
//! - **json**: one JSON document per invocation
//!
//! ```bash
//! devdocs entries list go --porcelain | cut -f1
//! devdocs entries show go net/http#Client --json | jq -r .content
//! ```

mod console;
mod json;
mod porcelain;

pub use console::ConsoleRenderer;
pub use json::JsonRenderer;
pub use porcelain::PorcelainRenderer;

use anyhow::Result;
use clap::{Args, ValueEnum};
use devdocs_core::{Docset, Entry, EntryView};
use is_terminal::IsTerminal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Stdout};

/// Output format for command results.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text, paged on terminals.
    #[default]
    Console,
    /// Tab-separated fields; views are printed verbatim.
    Porcelain,
    /// JSON.
    Json,
}

impl OutputFormat {
    /// Whether output is meant for programs only.
    #[must_use]
    pub const fn is_machine_readable(self) -> bool {
        matches!(self, Self::Json)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Console => write!(f, "console"),
            Self::Porcelain => write!(f, "porcelain"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Format selection shared by every command.
#[derive(Args, Clone, Debug, Default, PartialEq, Eq)]
pub struct OutputArgs {
    /// Output format
    #[arg(short = 'f', long = "format", value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Output as JSON (shorthand for --format json)
    #[arg(long, global = true, conflicts_with = "format")]
    pub json: bool,

    /// Output tab-separated fields (shorthand for --format porcelain)
    #[arg(long, global = true, conflicts_with_all = ["format", "json"])]
    pub porcelain: bool,
}

impl OutputArgs {
    /// Shorthand flags first, then `--format`, then console.
    #[must_use]
    pub fn resolve(&self) -> OutputFormat {
        if self.json {
            return OutputFormat::Json;
        }
        if self.porcelain {
            return OutputFormat::Porcelain;
        }
        self.format.unwrap_or_default()
    }
}

/// Writes command results in one output format.
pub trait Renderer {
    /// Render `devdocs docsets list`.
    fn render_docsets(&mut self, docsets: &[Docset]) -> Result<()>;

    /// Render `devdocs entries list`, in index order.
    fn render_entries(&mut self, entries: &[Entry]) -> Result<()>;

    /// Render the lines of a resolved view.
    fn render_view(&mut self, view: &EntryView) -> Result<()>;
}

/// Renderer for `format` writing to stdout.
///
/// `pager` is the configured pager command, used by the console renderer only.
pub fn stdout_renderer(format: OutputFormat, pager: Option<String>) -> Box<dyn Renderer> {
    let stdout: Stdout = io::stdout();
    match format {
        OutputFormat::Console => {
            let is_tty = stdout.is_terminal();
            Box::new(ConsoleRenderer::new(stdout, is_tty, pager))
        },
        OutputFormat::Porcelain => Box::new(PorcelainRenderer::new(stdout)),
        OutputFormat::Json => Box::new(JsonRenderer::new(stdout)),
    }
}
