use tracing::debug;

use crate::collection::store::EffectStore;
use crate::command::command::EditCommand;
use crate::foundation::error::MintframeResult;

/// Undo depth used by [`CommandEngine::default`].
pub const DEFAULT_HISTORY_LIMIT: usize = 200;

/// Executes [`EditCommand`]s and maintains bounded undo/redo stacks.
///
/// A freshly executed command clears the redo stack; once the undo stack
/// exceeds its limit the oldest entry is evicted (its edit becomes
/// permanent).
pub struct CommandEngine {
    undo: Vec<Box<dyn EditCommand>>,
    redo: Vec<Box<dyn EditCommand>>,
    limit: usize,
}

impl Default for CommandEngine {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl CommandEngine {
    /// Engine retaining at most `limit` undoable commands.
    pub fn new(limit: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Apply `command` against the store and record it for undo.
    pub fn execute(
        &mut self,
        mut command: Box<dyn EditCommand>,
        store: &mut EffectStore,
    ) -> MintframeResult<()> {
        command.apply(store)?;
        self.record(command);
        Ok(())
    }

    /// Record a command that the caller already applied successfully.
    pub fn record(&mut self, command: Box<dyn EditCommand>) {
        debug!(label = %command.label(), "record command");
        self.undo.push(command);
        self.redo.clear();
        if self.undo.len() > self.limit {
            self.undo.remove(0);
        }
    }

    /// Revert the most recent command. Returns its label, or `None` when the
    /// undo stack is empty.
    pub fn undo(&mut self, store: &mut EffectStore) -> MintframeResult<Option<String>> {
        let Some(mut command) = self.undo.pop() else {
            return Ok(None);
        };
        command.revert(store)?;
        let label = command.label();
        self.redo.push(command);
        Ok(Some(label))
    }

    /// Re-apply the most recently undone command. Returns its label, or
    /// `None` when the redo stack is empty.
    pub fn redo(&mut self, store: &mut EffectStore) -> MintframeResult<Option<String>> {
        let Some(mut command) = self.redo.pop() else {
            return Ok(None);
        };
        command.apply(store)?;
        let label = command.label();
        self.undo.push(command);
        Ok(Some(label))
    }

    /// True when an undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// True when a redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Label of the next command to undo.
    pub fn undo_label(&self) -> Option<String> {
        self.undo.last().map(|c| c.label())
    }

    /// Label of the next command to redo.
    pub fn redo_label(&self) -> Option<String> {
        self.redo.last().map(|c| c.label())
    }

    /// Drop both stacks (e.g. after a wholesale document load).
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

impl std::fmt::Debug for CommandEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandEngine")
            .field("undo_depth", &self.undo.len())
            .field("redo_depth", &self.redo.len())
            .field("limit", &self.limit)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/command/engine.rs"]
mod tests;
