use std::collections::VecDeque;
use std::fmt;

use tracing::warn;

use crate::foundation::error::MintframeResult;
use crate::foundation::ids::EffectId;

/// Key identifying the logical target of a sequenced update, e.g. one
/// effect's config panel.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SequenceKey(String);

impl SequenceKey {
    /// Arbitrary key.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Key for the config field-group of one effect.
    pub fn config(id: &EffectId) -> Self {
        Self(format!("config-{id}"))
    }

    /// Key for a sub-scoped config field-group (e.g. one attached-list row of
    /// an effect's editor panel).
    pub fn config_scoped(id: &EffectId, scope: &str, sub_index: usize) -> Self {
        Self(format!("config-{id}-{scope}-{sub_index}"))
    }
}

impl fmt::Display for SequenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A queued update. Tasks must re-fetch current state from the context when
/// they run; closing over a snapshot taken at enqueue time defeats the
/// coalescing guarantee.
pub type SequencedTask<C> = Box<dyn FnOnce(&mut C) -> MintframeResult<()>>;

/// Serializes update tasks per key in submission order.
///
/// The scheduling model is single-threaded cooperative: tasks never run
/// concurrently, only interleaved between UI events. Enqueueing a task whose
/// key already has a pending task replaces that pending task in place,
/// keeping the original queue slot so coalescing stays fair across keys.
pub struct UpdateSequencer<C> {
    queue: VecDeque<(SequenceKey, SequencedTask<C>)>,
}

impl<C> Default for UpdateSequencer<C> {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }
}

impl<C> UpdateSequencer<C> {
    /// Empty sequencer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a task under `key`. Returns `true` when a pending task for the
    /// same key was discarded in favor of this one.
    pub fn enqueue(&mut self, key: SequenceKey, task: SequencedTask<C>) -> bool {
        if let Some(slot) = self.queue.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = task;
            return true;
        }
        self.queue.push_back((key, task));
        false
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// True when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// True when a task is pending for `key`.
    pub fn has_pending(&self, key: &SequenceKey) -> bool {
        self.queue.iter().any(|(k, _)| k == key)
    }

    /// Run every pending task in submission order against `ctx`.
    ///
    /// A failing task (e.g. its effect was deleted mid-flight) is logged and
    /// dropped; it never blocks tasks for other keys. Returns the number of
    /// tasks that ran.
    pub fn run_pending(&mut self, ctx: &mut C) -> usize {
        let mut ran = 0;
        while let Some((key, task)) = self.queue.pop_front() {
            ran += 1;
            if let Err(err) = task(ctx) {
                warn!(key = %key, error = %err, "sequenced update failed, dropping");
            }
        }
        ran
    }
}

impl<C> fmt::Debug for UpdateSequencer<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateSequencer")
            .field("pending", &self.queue.len())
            .finish()
    }
}
