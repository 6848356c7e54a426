//! JSON output.
//!
//! Views are wrapped with the locator and the excerpt range:
//!
//! ```json
//! {"docset":"go","entry":{"path":"net/http/index","fragment":"Client"},"lines":{"start":3,"end":4},"content":"## Client\nc1\n"}
//! ```

use anyhow::Result;
use devdocs_core::{Docset, Entry, EntryLocator, EntryView, LineRange};
use serde::Serialize;
use std::io::Write;

use super::Renderer;

#[derive(Serialize)]
struct ViewOutput<'a> {
    docset: &'a str,
    entry: &'a EntryLocator,
    lines: Option<LineRange>,
    content: String,
}

/// JSON renderer.
pub struct JsonRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    /// Renderer writing to `out`.
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        serde_json::to_writer(&mut self.out, value)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn render_docsets(&mut self, docsets: &[Docset]) -> Result<()> {
        self.emit(docsets)
    }

    fn render_entries(&mut self, entries: &[Entry]) -> Result<()> {
        self.emit(entries)
    }

    fn render_view(&mut self, view: &EntryView) -> Result<()> {
        let output = ViewOutput {
            docset: &view.document.docset,
            entry: &view.document.entry,
            lines: view.lines,
            content: view.render_to_string(),
        };
        self.emit(&output)
    }
}
