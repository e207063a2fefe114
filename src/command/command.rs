use crate::collection::model::EffectSlot;
use crate::collection::store::{EffectStore, RemovedSubtree};
use crate::effect::model::{AttachedList, Effect, EffectDraft, EffectKind, EffectPatch, FrameIndex};
use crate::foundation::error::{MintframeError, MintframeResult};
use crate::foundation::ids::EffectId;

/// A reversible mutation over the [`EffectStore`].
///
/// Every UI-path mutation is wrapped as one command and handed to the
/// [`crate::CommandEngine`] rather than applied directly, so the engine can
/// maintain an undo/redo stack. `apply` and `revert` call the store's own
/// ID-addressed API internally.
pub trait EditCommand {
    /// Human-readable description for undo menus.
    fn label(&self) -> String;

    /// Apply the mutation. Re-applying after a revert must restore the same
    /// observable state, including effect IDs.
    fn apply(&mut self, store: &mut EffectStore) -> MintframeResult<()>;

    /// Undo the mutation.
    fn revert(&mut self, store: &mut EffectStore) -> MintframeResult<()>;
}

enum AddTarget {
    TopLevel,
    Attached {
        parent: EffectId,
        list: AttachedList,
        frame: Option<FrameIndex>,
    },
}

/// Adds a top-level effect or attaches one to a primary effect.
///
/// The created record (ID included) is captured on first apply so redo
/// restores the exact same effect rather than minting a new ID.
pub struct AddEffect {
    draft: Option<EffectDraft>,
    target: AddTarget,
    created: Option<Effect>,
}

impl AddEffect {
    /// Add `draft` to the top-level sequence.
    pub fn top_level(draft: EffectDraft) -> Self {
        Self {
            draft: Some(draft),
            target: AddTarget::TopLevel,
            created: None,
        }
    }

    /// Attach a secondary `draft` to `parent`.
    pub fn attach_secondary(parent: EffectId, draft: EffectDraft) -> Self {
        Self {
            draft: Some(draft),
            target: AddTarget::Attached {
                parent,
                list: AttachedList::Secondary,
                frame: None,
            },
            created: None,
        }
    }

    /// Attach a keyframe `draft` to `parent` at `frame`.
    pub fn attach_keyframe(parent: EffectId, draft: EffectDraft, frame: FrameIndex) -> Self {
        Self {
            draft: Some(draft),
            target: AddTarget::Attached {
                parent,
                list: AttachedList::Keyframe,
                frame: Some(frame),
            },
            created: None,
        }
    }

    /// The finalized record, available after the first successful apply.
    pub fn created(&self) -> Option<&Effect> {
        self.created.as_ref()
    }
}

impl EditCommand for AddEffect {
    fn label(&self) -> String {
        let (kind, name) = match (&self.created, &self.draft) {
            (Some(e), _) => (e.kind, e.name.as_str()),
            (None, Some(d)) => (d.kind, d.name.as_str()),
            (None, None) => (EffectKind::Primary, "effect"),
        };
        format!("add {} effect '{name}'", kind.name())
    }

    fn apply(&mut self, store: &mut EffectStore) -> MintframeResult<()> {
        // Redo path: reinsert the captured record with its original ID.
        if let Some(effect) = &self.created {
            let parent = match &self.target {
                AddTarget::TopLevel => None,
                AddTarget::Attached { parent, list, .. } => Some((parent.clone(), *list)),
            };
            let index = match &parent {
                None => store.collection().len(),
                Some((id, list)) => store
                    .get(id)
                    .map(|p| p.attached(*list).len())
                    .unwrap_or_default(),
            };
            return store.restore(RemovedSubtree {
                effect: effect.clone(),
                parent,
                index,
            });
        }

        let draft = self
            .draft
            .take()
            .ok_or_else(|| MintframeError::validation("add command already consumed its draft"))?;
        let created = match &self.target {
            AddTarget::TopLevel => store.add(draft),
            AddTarget::Attached {
                parent,
                list: AttachedList::Secondary,
                ..
            } => store.attach_secondary(parent, draft),
            AddTarget::Attached {
                parent,
                frame: Some(frame),
                ..
            } => store.attach_keyframe(parent, draft, *frame),
            AddTarget::Attached { .. } => Err(MintframeError::invalid_record(
                "keyframe attach command has no frame index",
            )),
        };
        self.created = Some(created?);
        Ok(())
    }

    fn revert(&mut self, store: &mut EffectStore) -> MintframeResult<()> {
        let Some(effect) = &self.created else {
            return Err(MintframeError::validation("add command was never applied"));
        };
        store
            .remove_subtree(&effect.id)
            .map(|_| ())
            .ok_or_else(|| MintframeError::not_found(&effect.id))
    }
}

/// Applies an [`EffectPatch`], capturing the previous record for revert.
pub struct UpdateEffect {
    id: EffectId,
    patch: EffectPatch,
    previous: Option<Effect>,
}

impl UpdateEffect {
    /// Patch the effect `id`.
    pub fn new(id: EffectId, patch: EffectPatch) -> Self {
        Self {
            id,
            patch,
            previous: None,
        }
    }
}

impl EditCommand for UpdateEffect {
    fn label(&self) -> String {
        format!("update effect '{}'", self.id)
    }

    fn apply(&mut self, store: &mut EffectStore) -> MintframeResult<()> {
        let previous = store
            .get(&self.id)
            .cloned()
            .ok_or_else(|| MintframeError::not_found(&self.id))?;
        store.update(&self.id, &self.patch)?;
        self.previous = Some(previous);
        Ok(())
    }

    fn revert(&mut self, store: &mut EffectStore) -> MintframeResult<()> {
        let previous = self
            .previous
            .clone()
            .ok_or_else(|| MintframeError::validation("update command was never applied"))?;
        store.replace(&self.id, previous)?;
        Ok(())
    }
}

/// Flips an effect's visibility; reverting flips it back.
pub struct ToggleVisibility {
    id: EffectId,
}

impl ToggleVisibility {
    /// Toggle the effect `id`.
    pub fn new(id: EffectId) -> Self {
        Self { id }
    }
}

impl EditCommand for ToggleVisibility {
    fn label(&self) -> String {
        format!("toggle visibility of '{}'", self.id)
    }

    fn apply(&mut self, store: &mut EffectStore) -> MintframeResult<()> {
        store.toggle_visibility(&self.id).map(|_| ())
    }

    fn revert(&mut self, store: &mut EffectStore) -> MintframeResult<()> {
        store.toggle_visibility(&self.id).map(|_| ())
    }
}

/// Deletes an effect (cascading over its subtree), capturing the removed
/// subtree and its position for revert.
pub struct DeleteEffect {
    id: EffectId,
    removed: Option<RemovedSubtree>,
}

impl DeleteEffect {
    /// Delete the effect `id`.
    pub fn new(id: EffectId) -> Self {
        Self { id, removed: None }
    }
}

impl EditCommand for DeleteEffect {
    fn label(&self) -> String {
        format!("delete effect '{}'", self.id)
    }

    fn apply(&mut self, store: &mut EffectStore) -> MintframeResult<()> {
        self.removed = Some(
            store
                .remove_subtree(&self.id)
                .ok_or_else(|| MintframeError::not_found(&self.id))?,
        );
        Ok(())
    }

    fn revert(&mut self, store: &mut EffectStore) -> MintframeResult<()> {
        let removed = self
            .removed
            .clone()
            .ok_or_else(|| MintframeError::validation("delete command was never applied"))?;
        store.restore(removed)
    }
}

/// Moves a top-level effect before another, remembering its original index.
pub struct ReorderTopLevel {
    from: EffectId,
    to: EffectId,
    original_index: Option<usize>,
}

impl ReorderTopLevel {
    /// Move `from` immediately before `to`.
    pub fn new(from: EffectId, to: EffectId) -> Self {
        Self {
            from,
            to,
            original_index: None,
        }
    }
}

impl EditCommand for ReorderTopLevel {
    fn label(&self) -> String {
        format!("reorder effect '{}'", self.from)
    }

    fn apply(&mut self, store: &mut EffectStore) -> MintframeResult<()> {
        let original = match store.collection().resolve(&self.from) {
            Some(EffectSlot::Top { index }) => index,
            Some(EffectSlot::Attached { .. }) => {
                return Err(MintframeError::structural(format!(
                    "effect '{}' is attached, not top-level",
                    self.from
                )));
            }
            None => return Err(MintframeError::not_found(&self.from)),
        };
        store.reorder_top_level(&self.from, &self.to)?;
        self.original_index = Some(original);
        Ok(())
    }

    fn revert(&mut self, store: &mut EffectStore) -> MintframeResult<()> {
        let original = self
            .original_index
            .ok_or_else(|| MintframeError::validation("reorder command was never applied"))?;
        store.move_top_level_to_index(&self.from, original)
    }
}

/// Reorders within one parent's attached list; reverting swaps the indices.
pub struct ReorderAttached {
    parent: EffectId,
    list: AttachedList,
    from_index: usize,
    to_index: usize,
}

impl ReorderAttached {
    /// Move the entry at `from_index` to `to_index` in `parent`'s `list`.
    pub fn new(parent: EffectId, list: AttachedList, from_index: usize, to_index: usize) -> Self {
        Self {
            parent,
            list,
            from_index,
            to_index,
        }
    }
}

impl EditCommand for ReorderAttached {
    fn label(&self) -> String {
        format!("reorder {} effects of '{}'", self.list.name(), self.parent)
    }

    fn apply(&mut self, store: &mut EffectStore) -> MintframeResult<()> {
        store.reorder_attached(&self.parent, self.list, self.from_index, self.to_index)
    }

    fn revert(&mut self, store: &mut EffectStore) -> MintframeResult<()> {
        store.reorder_attached(&self.parent, self.list, self.to_index, self.from_index)
    }
}
