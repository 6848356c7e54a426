//! Command implementations.

mod docsets;
mod entries;

pub use docsets::list_docsets;
pub use entries::{list_entries, show_entry};
