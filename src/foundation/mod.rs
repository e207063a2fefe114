//! Shared error and ID primitives.

/// Crate-wide error type and result alias.
pub mod error;
/// Stable effect identifiers.
pub mod ids;
