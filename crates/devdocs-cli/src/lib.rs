//! devdocs CLI library entry point.
//!
//! The binary calls [`run`]; everything else is exposed for tests.

/// Command line definition.
pub mod cli;
/// Command implementations.
pub mod commands;
/// Error categories and exit codes.
pub mod error;
/// Output formats and renderers.
pub mod output;
/// Pager resolution and spawning.
pub mod pager;
/// Error reports on stderr.
pub mod reporter;
/// Logging setup.
pub mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use devdocs_core::{Cache, Client, Config, FileSystemCache, MarkdownConverter, NoCache, Service};
use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::debug;

use crate::cli::{Cli, Commands, DocsetsCommand, EntriesCommand};
use crate::error::{CliError, category_of};
use crate::output::stdout_renderer;
use crate::reporter::Reporter;
use crate::utils::logging::initialize_logging;

/// Parse arguments, run the command, and report any failure on stderr.
pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.debug;

    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if is_broken_pipe(&err) => ExitCode::SUCCESS,
        Err(err) => {
            Reporter::new(io::stderr().lock(), verbose).report_error(&err);
            category_of(&err).as_exit_code()
        },
    }
}

async fn execute(cli: Cli) -> Result<()> {
    initialize_logging(&cli)?;

    let config = Config::load(cli.config.as_deref()).map_err(CliError::from)?;
    debug!(?config, "loaded configuration");
    let service = build_service(&config, cli.no_cache)?;
    let mut renderer = stdout_renderer(cli.output.resolve(), config.pager.command.clone());

    execute_command(&cli.command, &service, renderer.as_mut()).await
}

/// Dispatch one parsed command.
pub async fn execute_command(
    command: &Commands,
    service: &Service,
    renderer: &mut dyn output::Renderer,
) -> Result<()> {
    match command {
        Commands::Docsets(DocsetsCommand::List) => commands::list_docsets(service, renderer).await,
        Commands::Entries(EntriesCommand::List { docset }) => {
            commands::list_entries(service, docset, renderer).await
        },
        Commands::Entries(EntriesCommand::Show { docset, path }) => {
            commands::show_entry(service, docset, path, renderer).await
        },
    }
}

/// Wire the service from configuration. `no_cache` bypasses the cache.
pub fn build_service(config: &Config, no_cache: bool) -> Result<Service> {
    let client = Client::new(config.client_options()).map_err(CliError::from)?;
    Ok(Service::new(
        build_cache(config, no_cache)?,
        client,
        MarkdownConverter::default(),
    ))
}

fn build_cache(config: &Config, no_cache: bool) -> Result<Arc<dyn Cache>> {
    if no_cache || !config.cache.enabled {
        debug!("cache disabled");
        return Ok(Arc::new(NoCache));
    }

    let root = match &config.cache.dir {
        Some(dir) => dir.clone(),
        None => FileSystemCache::default_root()
            .map_err(CliError::from)
            .context("no cache directory; set DEVDOCS_CACHE_DIR or pass --no-cache")?,
    };
    debug!(root = %root.display(), "using filesystem cache");
    Ok(Arc::new(FileSystemCache::new(root)))
}

fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|e| e.downcast_ref::<io::Error>())
        .any(|e| e.kind() == io::ErrorKind::BrokenPipe)
}
