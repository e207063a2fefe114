use crate::collection::events::CollectionEvent;
use crate::collection::model::{EffectCollection, EffectSlot};
use crate::effect::model::AttachedList;
use crate::effect::model::EffectKind;
use crate::foundation::error::{MintframeError, MintframeResult};
use crate::foundation::ids::EffectId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Position of a selected sub-effect inside its parent's attached lists.
///
/// The index is a hint captured at selection time, re-resolved against the
/// parent's current list before every use; only the list membership is
/// authoritative.
pub struct SubSelection {
    /// Which attached list the selection addresses.
    pub list: AttachedList,
    /// Position within that list at selection time.
    pub index: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Which effect (and optional nested sub-effect) is currently being edited.
///
/// Transient and UI-scoped; never persisted. For attached kinds `effect_id`
/// names the owning primary effect and `sub` addresses the nested item; for
/// top-level kinds `sub` is an optional highlight hint.
pub struct SelectionContext {
    /// Selected top-level effect (or the parent of a selected sub-effect).
    pub effect_id: EffectId,
    /// Kind of the selected entity.
    pub kind: EffectKind,
    /// Sub-effect position hint.
    pub sub: Option<SubSelection>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Outcome of re-validating the selection against a collection change.
pub enum SelectionChange {
    /// Selection still resolves as before.
    Unchanged,
    /// The sub-effect hint was dropped; the parent stays selected.
    HintCleared,
    /// The selection no longer resolves and was cleared.
    Deselected {
        /// Previously selected effect.
        id: EffectId,
    },
}

/// Tracks the current [`SelectionContext`] and keeps it valid across
/// reorders and deletions.
///
/// The tracker never trusts a cached index to outlive the event that
/// produced it: every collection change is replayed through [`Self::sync`]
/// and positions are recomputed on demand via [`Self::resolved_slot`].
#[derive(Debug, Default)]
pub struct SelectionTracker {
    current: Option<SelectionContext>,
}

impl SelectionTracker {
    /// Start unselected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current selection, if any.
    pub fn current(&self) -> Option<&SelectionContext> {
        self.current.as_ref()
    }

    /// True when `id` is the selected (parent) effect.
    pub fn is_selected(&self, id: &EffectId) -> bool {
        self.current.as_ref().is_some_and(|c| c.effect_id == *id)
    }

    /// Select an effect for editing.
    ///
    /// For attached kinds, `effect_id` must resolve to a primary effect and
    /// `sub` must address an existing entry of the matching list.
    pub fn select(
        &mut self,
        collection: &EffectCollection,
        effect_id: EffectId,
        kind: EffectKind,
        sub: Option<SubSelection>,
    ) -> MintframeResult<()> {
        let effect = collection
            .get(&effect_id)
            .ok_or_else(|| MintframeError::not_found(&effect_id))?;
        if kind.is_attached() {
            let Some(sub) = sub else {
                return Err(MintframeError::validation(format!(
                    "selecting a {} effect requires a sub position",
                    kind.name()
                )));
            };
            if !effect.kind.owns_attachments() {
                return Err(MintframeError::structural(format!(
                    "{} effect '{}' owns no attached effects",
                    effect.kind.name(),
                    effect.name
                )));
            }
            if sub.list.kind() != kind {
                return Err(MintframeError::validation(format!(
                    "sub list {} does not hold {} effects",
                    sub.list.name(),
                    kind.name()
                )));
            }
            if sub.index >= effect.attached(sub.list).len() {
                return Err(MintframeError::validation(format!(
                    "sub index {} out of range for {} list",
                    sub.index,
                    sub.list.name()
                )));
            }
        } else if effect.kind != kind {
            return Err(MintframeError::structural(format!(
                "effect '{}' is {}, not {}",
                effect.name,
                effect.kind.name(),
                kind.name()
            )));
        }
        self.current = Some(SelectionContext {
            effect_id,
            kind,
            sub,
        });
        Ok(())
    }

    /// Explicitly clear the selection. Returns true when something was
    /// selected.
    pub fn clear(&mut self) -> bool {
        self.current.take().is_some()
    }

    /// Re-validate the selection after a collection change.
    ///
    /// Deleting the selected effect (or reloading a collection without it)
    /// deselects; a sub-effect hint that no longer resolves is cleared when
    /// the selection was for the parent itself, or deselects when the
    /// selection was the sub-effect.
    pub fn sync(
        &mut self,
        event: &CollectionEvent,
        collection: &EffectCollection,
    ) -> SelectionChange {
        let Some(ctx) = &self.current else {
            return SelectionChange::Unchanged;
        };
        let gone = match event {
            CollectionEvent::Removed { ids } => ids.contains(&ctx.effect_id),
            CollectionEvent::Reloaded => !collection.contains(&ctx.effect_id),
            _ => false,
        };
        if gone {
            return self.deselect();
        }
        self.revalidate_sub(collection)
    }

    /// Recompute the selected entity's current position as a render hint.
    ///
    /// Returns `None` when the selection (or its sub hint) does not resolve
    /// right now; never caches the result.
    pub fn resolved_slot(&self, collection: &EffectCollection) -> Option<EffectSlot> {
        let ctx = self.current.as_ref()?;
        let slot = collection.resolve(&ctx.effect_id)?;
        let Some(sub) = ctx.sub else {
            return Some(slot);
        };
        let EffectSlot::Top { index } = slot else {
            return None;
        };
        let parent = collection.top_level().get(index)?;
        (sub.index < parent.attached(sub.list).len()).then_some(EffectSlot::Attached {
            parent_index: index,
            list: sub.list,
            index: sub.index,
        })
    }

    fn revalidate_sub(&mut self, collection: &EffectCollection) -> SelectionChange {
        let Some(ctx) = &self.current else {
            return SelectionChange::Unchanged;
        };
        let Some(sub) = ctx.sub else {
            return SelectionChange::Unchanged;
        };
        let in_range = collection
            .get(&ctx.effect_id)
            .is_some_and(|parent| sub.index < parent.attached(sub.list).len());
        if in_range {
            return SelectionChange::Unchanged;
        }
        if ctx.kind.is_attached() {
            // The selection was the sub-effect itself.
            return self.deselect();
        }
        if let Some(ctx) = &mut self.current {
            ctx.sub = None;
        }
        SelectionChange::HintCleared
    }

    fn deselect(&mut self) -> SelectionChange {
        match self.current.take() {
            Some(ctx) => SelectionChange::Deselected { id: ctx.effect_id },
            None => SelectionChange::Unchanged,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/selection/tracker.rs"]
mod tests;
