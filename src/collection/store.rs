use tracing::{debug, warn};

use crate::collection::events::CollectionEvent;
use crate::collection::model::{EffectCollection, EffectSlot};
use crate::effect::config::merge_config;
use crate::effect::model::{AttachedList, Effect, EffectDraft, EffectKind, EffectPatch, FrameIndex};
use crate::foundation::error::{MintframeError, MintframeResult};
use crate::foundation::ids::{EffectId, IdGenerator};

/// An effect removed from the collection together with enough placement
/// information to restore it, ID intact, on undo.
#[derive(Clone, Debug)]
pub(crate) struct RemovedSubtree {
    pub(crate) effect: Effect,
    pub(crate) parent: Option<(EffectId, AttachedList)>,
    pub(crate) index: usize,
}

/// Sole owner of the [`EffectCollection`].
///
/// Every operation resolves identity to position at call time; no public
/// method accepts a top-level index. Mutations append [`CollectionEvent`]s to
/// an internal outbox which the session drains after each command.
#[derive(Debug, Default)]
pub struct EffectStore {
    collection: EffectCollection,
    ids: IdGenerator,
    events: Vec<CollectionEvent>,
}

impl EffectStore {
    /// Empty store with a fresh ID generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only snapshot of the collection.
    pub fn collection(&self) -> &EffectCollection {
        &self.collection
    }

    /// Look up an effect by ID at any nesting depth.
    pub fn get(&self, id: &EffectId) -> Option<&Effect> {
        self.collection.get(id)
    }

    /// Drain the pending change notifications in emission order.
    pub fn drain_events(&mut self) -> Vec<CollectionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Replace the whole collection (project document load).
    ///
    /// The incoming collection has already been validated by
    /// [`EffectCollection::from_effects`]; this emits a single
    /// [`CollectionEvent::Reloaded`].
    pub fn replace_collection(&mut self, collection: EffectCollection) {
        self.collection = collection;
        self.events.push(CollectionEvent::Reloaded);
    }

    /// Add a top-level effect. Assigns a fresh ID and appends to the
    /// top-level sequence; returns the finalized record.
    pub fn add(&mut self, draft: EffectDraft) -> MintframeResult<Effect> {
        if draft.kind.is_attached() {
            return Err(MintframeError::structural(format!(
                "{} effects are attached to a primary effect, not added top-level",
                draft.kind.name()
            )));
        }
        draft.validate()?;
        let effect = draft.into_effect(self.ids.next_id());
        debug!(id = %effect.id, kind = effect.kind.name(), "add effect");
        self.events.push(CollectionEvent::Added {
            id: effect.id.clone(),
            kind: effect.kind,
            parent: None,
        });
        self.collection.top_level_mut().push(effect.clone());
        Ok(effect)
    }

    /// Attach a secondary effect to the primary effect `parent_id`.
    pub fn attach_secondary(
        &mut self,
        parent_id: &EffectId,
        draft: EffectDraft,
    ) -> MintframeResult<Effect> {
        if draft.kind != EffectKind::Secondary {
            return Err(MintframeError::structural(format!(
                "attach_secondary requires a secondary draft, got {}",
                draft.kind.name()
            )));
        }
        self.attach(parent_id, draft, AttachedList::Secondary)
    }

    /// Attach a keyframe effect to the primary effect `parent_id`, anchored
    /// at `frame`.
    pub fn attach_keyframe(
        &mut self,
        parent_id: &EffectId,
        draft: EffectDraft,
        frame: FrameIndex,
    ) -> MintframeResult<Effect> {
        if draft.kind != EffectKind::Keyframe {
            return Err(MintframeError::structural(format!(
                "attach_keyframe requires a keyframe draft, got {}",
                draft.kind.name()
            )));
        }
        self.attach(parent_id, draft.at_frame(frame), AttachedList::Keyframe)
    }

    fn attach(
        &mut self,
        parent_id: &EffectId,
        draft: EffectDraft,
        list: AttachedList,
    ) -> MintframeResult<Effect> {
        draft.validate()?;
        let effect = draft.into_effect(self.ids.next_id());
        let parent = self
            .collection
            .get_mut(parent_id)
            .ok_or_else(|| MintframeError::not_found(parent_id))?;
        if !parent.kind.owns_attachments() {
            return Err(MintframeError::structural(format!(
                "cannot attach a {} effect to a {} effect",
                list.name(),
                parent.kind.name()
            )));
        }
        parent.attached_mut(list).push(effect.clone());
        debug!(id = %effect.id, parent = %parent_id, list = list.name(), "attach effect");
        self.events.push(CollectionEvent::Added {
            id: effect.id.clone(),
            kind: effect.kind,
            parent: Some(parent_id.clone()),
        });
        Ok(effect)
    }

    /// Apply a partial update to the effect `id`.
    ///
    /// The patch's config is shallow-merged into the existing config: keys in
    /// the patch overwrite, keys absent from it are preserved. Fails with
    /// [`MintframeError::NotFound`] when the ID no longer resolves.
    pub fn update(&mut self, id: &EffectId, patch: &EffectPatch) -> MintframeResult<Effect> {
        let effect = self
            .collection
            .get_mut(id)
            .ok_or_else(|| MintframeError::not_found(id))?;
        if let Some(percent) = patch.percent_chance
            && !(0.0..=100.0).contains(&percent)
        {
            return Err(MintframeError::validation(format!(
                "percent_chance must be within [0, 100], got {percent}"
            )));
        }
        if patch.frame.is_some() && effect.kind != EffectKind::Keyframe {
            return Err(MintframeError::invalid_record(format!(
                "{} effect '{}' must not carry a frame index",
                effect.kind.name(),
                effect.name
            )));
        }
        if let Some(name) = &patch.name {
            effect.name = name.clone();
        }
        if let Some(visible) = patch.visible {
            effect.visible = visible;
        }
        if let Some(percent) = patch.percent_chance {
            effect.percent_chance = percent;
        }
        if let Some(frame) = patch.frame {
            effect.frame = Some(frame);
        }
        if let Some(config) = &patch.config {
            merge_config(&mut effect.config, config);
        }
        let updated = effect.clone();
        self.events.push(CollectionEvent::Updated { id: id.clone() });
        Ok(updated)
    }

    /// Flip the effect's visibility; returns the new state.
    ///
    /// Mechanically equivalent to an update, but recorded as a distinct
    /// semantic operation so undo descriptions stay meaningful.
    pub fn toggle_visibility(&mut self, id: &EffectId) -> MintframeResult<bool> {
        let effect = self
            .collection
            .get_mut(id)
            .ok_or_else(|| MintframeError::not_found(id))?;
        effect.visible = !effect.visible;
        let visible = effect.visible;
        self.events.push(CollectionEvent::VisibilityChanged {
            id: id.clone(),
            visible,
        });
        Ok(visible)
    }

    /// Delete the effect `id`, cascading over its attached subtree when it is
    /// a primary effect. Returns the removed IDs, root first.
    ///
    /// Idempotent: a second delete of the same ID is a logged no-op.
    pub fn delete(&mut self, id: &EffectId) -> Vec<EffectId> {
        match self.remove_subtree(id) {
            Some(removed) => removed.effect.subtree_ids(),
            None => {
                warn!(id = %id, "delete: effect not found, ignoring");
                Vec::new()
            }
        }
    }

    /// Move the effect `from_id` immediately before the current position of
    /// `to_id` in the top-level sequence.
    ///
    /// Both endpoints are resolved by ID at call time, so a reorder request
    /// issued against a stale view stays correct as long as both effects
    /// still exist.
    pub fn reorder_top_level(
        &mut self,
        from_id: &EffectId,
        to_id: &EffectId,
    ) -> MintframeResult<()> {
        if from_id == to_id {
            return Ok(());
        }
        let from = self.require_top_slot(from_id)?;
        self.require_top_slot(to_id)?;
        let moved = self.collection.top_level_mut().remove(from);
        // Re-resolve the destination: removing `from` may have shifted it.
        let to = self.require_top_slot(to_id)?;
        self.collection.top_level_mut().insert(to, moved);
        self.events.push(CollectionEvent::ReorderedTop {
            moved: from_id.clone(),
        });
        Ok(())
    }

    /// Reorder within one parent's attached list.
    ///
    /// Intra-list positions are acceptable here because the parent itself is
    /// resolved by ID and the whole move executes as one atomic step against
    /// that fresh snapshot.
    pub fn reorder_attached(
        &mut self,
        parent_id: &EffectId,
        list: AttachedList,
        from_index: usize,
        to_index: usize,
    ) -> MintframeResult<()> {
        let parent = self
            .collection
            .get_mut(parent_id)
            .ok_or_else(|| MintframeError::not_found(parent_id))?;
        if !parent.kind.owns_attachments() {
            return Err(MintframeError::structural(format!(
                "{} effect '{}' owns no attached lists",
                parent.kind.name(),
                parent.name
            )));
        }
        let effects = parent.attached_mut(list);
        if from_index >= effects.len() || to_index >= effects.len() {
            return Err(MintframeError::validation(format!(
                "{} reorder indices {from_index}->{to_index} out of range (len {})",
                list.name(),
                effects.len()
            )));
        }
        if from_index != to_index {
            let moved = effects.remove(from_index);
            effects.insert(to_index, moved);
            self.events.push(CollectionEvent::ReorderedAttached {
                parent: parent_id.clone(),
                list,
            });
        }
        Ok(())
    }

    // ----------------------------
    // Undo support
    // ----------------------------

    /// Detach the effect and its subtree, recording where it came from.
    /// Emits the [`CollectionEvent::Removed`] cascade.
    pub(crate) fn remove_subtree(&mut self, id: &EffectId) -> Option<RemovedSubtree> {
        let removed = match self.collection.resolve(id)? {
            EffectSlot::Top { index } => {
                let effect = self.collection.top_level_mut().remove(index);
                RemovedSubtree {
                    effect,
                    parent: None,
                    index,
                }
            }
            EffectSlot::Attached {
                parent_index,
                list,
                index,
            } => {
                let parent = &mut self.collection.top_level_mut()[parent_index];
                let parent_id = parent.id.clone();
                let effect = parent.attached_mut(list).remove(index);
                RemovedSubtree {
                    effect,
                    parent: Some((parent_id, list)),
                    index,
                }
            }
        };
        self.events.push(CollectionEvent::Removed {
            ids: removed.effect.subtree_ids(),
        });
        Some(removed)
    }

    /// Reinsert a previously removed subtree at its recorded position,
    /// preserving every ID.
    pub(crate) fn restore(&mut self, removed: RemovedSubtree) -> MintframeResult<()> {
        let RemovedSubtree {
            effect,
            parent,
            index,
        } = removed;
        let event = CollectionEvent::Added {
            id: effect.id.clone(),
            kind: effect.kind,
            parent: parent.as_ref().map(|(id, _)| id.clone()),
        };
        match parent {
            None => {
                let top = self.collection.top_level_mut();
                let index = index.min(top.len());
                top.insert(index, effect);
            }
            Some((parent_id, list)) => {
                let parent = self
                    .collection
                    .get_mut(&parent_id)
                    .ok_or_else(|| MintframeError::not_found(&parent_id))?;
                let effects = parent.attached_mut(list);
                let index = index.min(effects.len());
                effects.insert(index, effect);
            }
        }
        self.events.push(event);
        Ok(())
    }

    /// Replace the full record of `id` with `effect` (same ID required).
    pub(crate) fn replace(&mut self, id: &EffectId, effect: Effect) -> MintframeResult<Effect> {
        if effect.id != *id {
            return Err(MintframeError::validation(
                "replacement record must keep the same id",
            ));
        }
        let current = self
            .collection
            .get_mut(id)
            .ok_or_else(|| MintframeError::not_found(id))?;
        let previous = std::mem::replace(current, effect);
        self.events.push(CollectionEvent::Updated { id: id.clone() });
        Ok(previous)
    }

    /// Move a top-level effect back to an absolute index (reorder undo).
    pub(crate) fn move_top_level_to_index(
        &mut self,
        id: &EffectId,
        index: usize,
    ) -> MintframeResult<()> {
        let from = self.require_top_slot(id)?;
        let moved = self.collection.top_level_mut().remove(from);
        let top = self.collection.top_level_mut();
        let index = index.min(top.len());
        top.insert(index, moved);
        self.events
            .push(CollectionEvent::ReorderedTop { moved: id.clone() });
        Ok(())
    }

    fn require_top_slot(&self, id: &EffectId) -> MintframeResult<usize> {
        match self.collection.resolve(id) {
            Some(EffectSlot::Top { index }) => Ok(index),
            Some(EffectSlot::Attached { .. }) => Err(MintframeError::structural(format!(
                "effect '{id}' is attached, not top-level"
            ))),
            None => Err(MintframeError::not_found(id)),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/collection/store.rs"]
mod tests;
