//! Persistence boundary toward project documents.

/// Document trait and the JSON-backed implementation.
pub mod project;
