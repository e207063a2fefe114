//! Selection state that survives collection mutation.

/// The selection tracker.
pub mod tracker;
