//! Logging initialization and configuration.
//!
//! Sets up the tracing subscriber and color control from CLI flags and the
//! environment.

use anyhow::Result;
use colored::control as color_control;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::cli::Cli;

/// Level for the given flags: DEBUG with `--debug`, ERROR with `--quiet` or
/// machine-readable output, WARN otherwise.
#[must_use]
pub fn log_level(cli: &Cli) -> Level {
    if cli.debug {
        Level::DEBUG
    } else if cli.quiet || cli.output.resolve().is_machine_readable() {
        Level::ERROR
    } else {
        Level::WARN
    }
}

/// Install the global subscriber, writing to stderr.
///
/// # Errors
///
/// Returns an error if the global tracing subscriber cannot be set.
pub fn initialize_logging(cli: &Cli) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level(cli))
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Disable color when requested, NO_COLOR is set, or when emitting JSON
    let env_no_color = std::env::var_os("NO_COLOR").is_some();
    if cli.no_color || env_no_color || cli.output.resolve().is_machine_readable() {
        color_control::set_override(false);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::Parser;

    fn level(args: &[&str]) -> Level {
        let mut argv = vec!["devdocs"];
        argv.extend_from_slice(args);
        argv.extend(["docsets", "list"]);
        log_level(&Cli::try_parse_from(argv).unwrap())
    }

    #[test]
    fn test_levels() {
        assert_eq!(level(&[]), Level::WARN);
        assert_eq!(level(&["--debug"]), Level::DEBUG);
        assert_eq!(level(&["-v", "--json"]), Level::DEBUG);
        assert_eq!(level(&["--quiet"]), Level::ERROR);
        assert_eq!(level(&["--json"]), Level::ERROR);
        assert_eq!(level(&["--porcelain"]), Level::WARN);
    }
}
