//! Tab-separated output for scripts.

use anyhow::Result;
use devdocs_core::{Docset, Entry, EntryView};
use std::io::Write;

use super::Renderer;

/// Docsets as `full name, slug, name, release`; entries as `path, type, name`.
pub struct PorcelainRenderer<W: Write> {
    out: W,
}

impl<W: Write> PorcelainRenderer<W> {
    /// Renderer writing to `out`.
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for PorcelainRenderer<W> {
    fn render_docsets(&mut self, docsets: &[Docset]) -> Result<()> {
        for d in docsets {
            writeln!(self.out, "{}\t{}\t{}\t{}", d.full_name(), d.slug, d.name, d.release)?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn render_entries(&mut self, entries: &[Entry]) -> Result<()> {
        for e in entries {
            writeln!(self.out, "{}\t{}\t{}", e.path, e.kind, e.name)?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn render_view(&mut self, view: &EntryView) -> Result<()> {
        view.write_to(&mut self.out)?;
        self.out.flush()?;
        Ok(())
    }
}
