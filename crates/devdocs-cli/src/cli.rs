//! # CLI Structure and Argument Parsing
//!
//! Commands are grouped by the resource they act on:
//!
//! ```bash
//! devdocs docsets list
//! devdocs entries list javascript
//! devdocs entries show javascript array/index#map
//! ```
//!
//! Global options apply to every command and may appear before or after the
//! subcommand.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::output::OutputArgs;

/// Main CLI structure for the `devdocs` command
#[derive(Parser, Clone, Debug)]
#[command(name = "devdocs")]
#[command(version)]
#[command(about = "Read DevDocs documentation in the terminal", long_about = None)]
pub struct Cli {
    /// Command to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Show debug logs on stderr
    #[arg(short = 'v', long, global = true, alias = "verbose")]
    pub debug: bool,

    /// Only report errors
    #[arg(short = 'q', long, global = true, conflicts_with = "debug")]
    pub quiet: bool,

    /// Disable colored output (also honours `NO_COLOR`)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file
    #[arg(long, global = true, env = "DEVDOCS_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Bypass the local cache for this invocation
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Output format flags.
    #[command(flatten)]
    pub output: OutputArgs,
}

/// Top-level resources.
#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Work with docsets
    #[command(subcommand)]
    Docsets(DocsetsCommand),

    /// Work with entries of a docset
    #[command(subcommand)]
    Entries(EntriesCommand),
}

/// `devdocs docsets ...`
#[derive(Subcommand, Clone, Debug)]
pub enum DocsetsCommand {
    /// List every available docset
    #[command(visible_alias = "ls")]
    List,
}

/// `devdocs entries ...`
#[derive(Subcommand, Clone, Debug)]
pub enum EntriesCommand {
    /// List the entries of a docset
    #[command(visible_alias = "ls")]
    List {
        /// Docset slug (e.g. `javascript`, `go`)
        docset: String,
    },

    /// Show an entry, or one section of it
    Show {
        /// Docset slug
        docset: String,
        /// Entry path, optionally with a `#fragment` naming a section
        path: String,
    },
}
