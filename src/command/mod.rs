//! Undoable edits expressed as commands.

/// The command trait and the built-in edit commands.
pub mod command;
/// Undo/redo history engine.
pub mod engine;
