//! `devdocs entries list` and `devdocs entries show`

use anyhow::Result;
use devdocs_core::{EntryIndex, EntryLocator, Error as CoreError, Service};
use tracing::debug;

use crate::error::CliError;
use crate::output::Renderer;

/// Suggestions offered when an entry is not found.
const MAX_SUGGESTIONS: usize = 5;

/// Print the entries of `docset` in index order.
pub async fn list_entries(service: &Service, docset: &str, renderer: &mut dyn Renderer) -> Result<()> {
    let entries = service.list_entries(docset).await.map_err(CliError::from)?;
    debug!(docset, count = entries.len(), "listing entries");
    renderer.render_entries(&entries)
}

/// Print the view of `path` in `docset`, suggesting close matches on a miss.
pub async fn show_entry(
    service: &Service,
    docset: &str,
    path: &str,
    renderer: &mut dyn Renderer,
) -> Result<()> {
    let index = service.entry_index(docset).await.map_err(CliError::from)?;
    match service.show_entry_in(&index, docset, path).await {
        Ok(view) => {
            debug!(
                docset,
                entry = %view.document.entry,
                lines = ?view.lines,
                "showing entry"
            );
            renderer.render_view(&view)
        },
        Err(err @ CoreError::EntryNotFound { .. }) => {
            let suggestions = suggest(&index, path);
            Err(CliError::from(err).with_suggestions(suggestions).into())
        },
        Err(err) => Err(CliError::from(err).into()),
    }
}

/// `name (path)` of the entries closest to `path`.
fn suggest(index: &EntryIndex, path: &str) -> Vec<String> {
    let query = EntryLocator::parse(path).path;
    index
        .suggest(&query, MAX_SUGGESTIONS)
        .into_iter()
        .map(|e| format!("{} ({})", e.name, e.path))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use devdocs_core::Entry;

    #[test]
    fn test_suggest_ignores_fragment_and_formats_name_and_path() {
        let index = EntryIndex::from_entries(vec![
            Entry {
                name: "Array".into(),
                kind: "Global".into(),
                path: "array/index".into(),
            },
            Entry {
                name: "Promise".into(),
                kind: "Global".into(),
                path: "promise".into(),
            },
        ]);
        let suggestions = suggest(&index, "arry#length");
        assert_eq!(suggestions, ["Array (array/index)"]);
    }
}
