//! Shared CLI helpers.

/// Tracing subscriber setup.
pub mod logging;
