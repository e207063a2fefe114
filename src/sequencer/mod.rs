//! Ordered, per-key coalescing execution of update tasks.

/// The update sequencer.
pub mod queue;
