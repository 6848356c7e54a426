//! Human-readable output.
//!
//! On a terminal everything goes through the pager; otherwise it is written
//! straight to the underlying stream.

use anyhow::Result;
use colored::Colorize;
use devdocs_core::{Docset, Entry, EntryView};
use std::io::{self, Write};

use super::Renderer;
use crate::pager::{Pager, PagerVars};

/// Human-readable renderer, paged on terminals.
pub struct ConsoleRenderer<W: Write> {
    out: W,
    is_tty: bool,
    pager: Option<String>,
}

impl<W: Write> ConsoleRenderer<W> {
    /// `pager` is the configured pager command, consulted only when `is_tty`.
    pub const fn new(out: W, is_tty: bool, pager: Option<String>) -> Self {
        Self { out, is_tty, pager }
    }

    /// Underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn with_output<F>(&mut self, vars: PagerVars, write: F) -> Result<()>
    where
        F: FnOnce(&mut dyn Write) -> io::Result<()>,
    {
        if !self.is_tty {
            write(&mut self.out)?;
            self.out.flush()?;
            return Ok(());
        }

        let pager = Pager::lookup(self.pager.as_deref(), vars, |name| std::env::var(name).ok())?;
        let mut pipe = pager.spawn()?;
        write(&mut pipe)?;
        pipe.flush()?;
        pipe.finish()
    }
}

impl<W: Write> Renderer for ConsoleRenderer<W> {
    fn render_docsets(&mut self, docsets: &[Docset]) -> Result<()> {
        self.with_output(PagerVars::default(), |w| {
            for d in docsets {
                writeln!(w, "{} ({})", d.slug.bold(), d.full_name())?;
            }
            Ok(())
        })
    }

    fn render_entries(&mut self, entries: &[Entry]) -> Result<()> {
        self.with_output(PagerVars::default(), |w| {
            for e in entries {
                writeln!(w, "{}", e.name)?;
            }
            Ok(())
        })
    }

    fn render_view(&mut self, view: &EntryView) -> Result<()> {
        let vars = PagerVars {
            filename: view.document.entry.to_string(),
            language: "markdown".to_string(),
        };
        self.with_output(vars, |w| view.write_to(w).map(|_| ()))
    }
}
