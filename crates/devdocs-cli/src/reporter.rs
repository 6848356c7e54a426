//! Error reporting on stderr.
//!
//! Missing docsets and entries get a dedicated message and a hint; everything
//! else prints the error with its cause chain shown in verbose mode.

use colored::{ColoredString, Colorize};
use devdocs_core::Error as CoreError;
use std::io::{self, Write};

use crate::error::{CliError, category_of};

/// Writes user-facing error reports.
pub struct Reporter<W: Write> {
    out: W,
    verbose: bool,
}

impl<W: Write> Reporter<W> {
    /// Reporter writing to `out`. `verbose` adds the category and cause chain.
    pub const fn new(out: W, verbose: bool) -> Self {
        Self { out, verbose }
    }

    /// Underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Report `err`. Failures to write the report are ignored.
    pub fn report_error(&mut self, err: &anyhow::Error) {
        let _ = self.write_report(err);
    }

    fn write_report(&mut self, err: &anyhow::Error) -> io::Result<()> {
        let cli_err = err.downcast_ref::<CliError>();
        let core = cli_err
            .and_then(CliError::core)
            .or_else(|| err.chain().find_map(|e| e.downcast_ref::<CoreError>()));

        match core {
            Some(CoreError::DocsetNotFound { docset }) => {
                self.header(&format!("docset {} not found", emph(docset)))?;
                self.hint("run `devdocs docsets list` to see available docsets")?;
            },
            Some(CoreError::EntryNotFound { docset, path }) => {
                self.header(&format!(
                    "entry {} not found in docset {}",
                    emph(path),
                    emph(docset)
                ))?;
                let suggestions = cli_err.map_or(&[][..], |e| e.suggestions.as_slice());
                if suggestions.is_empty() {
                    self.hint(&format!(
                        "run `devdocs entries list {docset}` to see available entries"
                    ))?;
                } else {
                    writeln!(self.out, "\n{}", "Did you mean:".bold())?;
                    for s in suggestions {
                        writeln!(self.out, "  {s}")?;
                    }
                }
            },
            Some(CoreError::SectionNotFound { docset, path, id }) => {
                self.header(&format!(
                    "section {} not found in {} ({})",
                    emph(id),
                    emph(path),
                    docset
                ))?;
            },
            _ => {
                self.header(&err.to_string())?;
            },
        }

        if self.verbose {
            let category = category_of(err);
            writeln!(self.out, "{}", format!("[{category}]").dimmed())?;
            for cause in err.chain().skip(1) {
                writeln!(self.out, "  {} {}", "caused by:".dimmed(), cause)?;
            }
        }
        Ok(())
    }

    fn header(&mut self, subject: &str) -> io::Result<()> {
        writeln!(self.out, "{} {}", "error:".red().bold(), subject)
    }

    fn hint(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{} {}", "hint:".cyan(), text)
    }
}

/// Quoted without color, yellow with it.
fn emph(s: &str) -> ColoredString {
    if colored::control::SHOULD_COLORIZE.should_colorize() {
        s.yellow()
    } else {
        format!("\"{s}\"").normal()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    fn report(err: &anyhow::Error, verbose: bool) -> String {
        colored::control::set_override(false);
        let mut reporter = Reporter::new(Vec::new(), verbose);
        reporter.report_error(err);
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_docset_not_found() {
        let err = CliError::from(CoreError::DocsetNotFound { docset: "nope".into() }).into();
        let out = report(&err, false);
        assert!(out.starts_with("error: docset \"nope\" not found\n"));
        assert!(out.contains("devdocs docsets list"));
    }

    #[test]
    fn test_entry_not_found_with_suggestions() {
        let err = CliError::from(CoreError::EntryNotFound {
            docset: "go".into(),
            path: "net/htp".into(),
        })
        .with_suggestions(vec!["net/http (net/http/index)".into()])
        .into();

        let out = report(&err, false);
        assert!(out.starts_with("error: entry \"net/htp\" not found in docset \"go\"\n"));
        assert!(out.contains("Did you mean:\n  net/http (net/http/index)\n"));
    }

    #[test]
    fn test_entry_not_found_without_suggestions() {
        let err = anyhow::Error::new(CoreError::EntryNotFound {
            docset: "go".into(),
            path: "zzz".into(),
        });
        let out = report(&err, false);
        assert!(out.contains("hint: run `devdocs entries list go`"));
    }

    #[test]
    fn test_generic_error_verbose_shows_chain() {
        let err = anyhow!("disk exploded").context("could not write cache");
        let quiet = report(&err, false);
        assert_eq!(quiet, "error: could not write cache\n");

        let verbose = report(&err, true);
        assert!(verbose.contains("[internal error]"));
        assert!(verbose.contains("caused by: disk exploded"));
    }
}
