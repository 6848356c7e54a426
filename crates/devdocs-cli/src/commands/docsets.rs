//! `devdocs docsets list`

use anyhow::Result;
use devdocs_core::Service;
use tracing::debug;

use crate::error::CliError;
use crate::output::Renderer;

/// Print every docset the aggregator offers.
pub async fn list_docsets(service: &Service, renderer: &mut dyn Renderer) -> Result<()> {
    let docsets = service.list_docsets().await.map_err(CliError::from)?;
    debug!(count = docsets.len(), "listing docsets");
    renderer.render_docsets(&docsets)
}
