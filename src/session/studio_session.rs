use std::time::Duration;

use tracing::warn;

use crate::collection::events::CollectionEvent;
use crate::collection::model::{EffectCollection, EffectSlot};
use crate::collection::store::EffectStore;
use crate::command::command::{
    AddEffect, DeleteEffect, EditCommand, ReorderAttached, ReorderTopLevel, ToggleVisibility,
    UpdateEffect,
};
use crate::command::engine::CommandEngine;
use crate::document::project::ProjectDocument;
use crate::effect::config::ConfigMap;
use crate::effect::model::{AttachedList, Effect, EffectDraft, EffectKind, EffectPatch, FrameIndex};
use crate::foundation::error::{MintframeError, MintframeResult};
use crate::foundation::ids::EffectId;
use crate::registry::cache::CachedRegistry;
use crate::registry::descriptor::{EffectDescriptor, EffectRegistry};
use crate::selection::tracker::{SelectionChange, SelectionContext, SelectionTracker, SubSelection};
use crate::sequencer::queue::{SequenceKey, UpdateSequencer};

#[derive(Clone, Debug, PartialEq)]
/// Notification delivered to session observers.
///
/// The session never emits UI-specific events (dialog open, menu close);
/// those remain the caller's concern.
pub enum StudioEvent {
    /// The collection changed.
    Collection(CollectionEvent),
    /// The selection was cleared because its effect no longer resolves or
    /// the session entered read-only mode.
    SelectionCleared {
        /// Previously selected effect.
        id: EffectId,
    },
}

/// Store plus command history; the mutable context handed to sequenced
/// update tasks.
#[derive(Debug, Default)]
pub struct EditorState {
    store: EffectStore,
    history: CommandEngine,
}

impl EditorState {
    /// Read-only view of the store.
    pub fn store(&self) -> &EffectStore {
        &self.store
    }

    /// Apply a command through the history engine.
    pub fn execute(&mut self, command: Box<dyn EditCommand>) -> MintframeResult<()> {
        self.history.execute(command, &mut self.store)
    }
}

/// Editing session for one project's effect collection.
///
/// Implements the UI control flow: each mutation is wrapped as a command and
/// executed against the store, then the resulting change notifications are
/// drained, the selection re-resolves itself, and observers are notified,
/// all before the call returns. The UI always re-renders from a fresh
/// snapshot.
pub struct StudioSession {
    state: EditorState,
    sequencer: UpdateSequencer<EditorState>,
    selection: SelectionTracker,
    registry: CachedRegistry,
    observers: Vec<Box<dyn FnMut(&StudioEvent)>>,
    read_only: bool,
}

impl StudioSession {
    /// Session over an empty collection, using `registry` for effect-type
    /// discovery.
    pub fn new(registry: Box<dyn EffectRegistry>) -> Self {
        Self {
            state: EditorState::default(),
            sequencer: UpdateSequencer::new(),
            selection: SelectionTracker::new(),
            registry: CachedRegistry::new(registry),
            observers: Vec::new(),
            read_only: false,
        }
    }

    /// Session with an explicit registry-cache TTL.
    pub fn with_registry_ttl(registry: Box<dyn EffectRegistry>, ttl: Duration) -> Self {
        Self {
            state: EditorState::default(),
            sequencer: UpdateSequencer::new(),
            selection: SelectionTracker::new(),
            registry: CachedRegistry::with_ttl(registry, ttl),
            observers: Vec::new(),
            read_only: false,
        }
    }

    /// Current collection snapshot.
    pub fn collection(&self) -> &EffectCollection {
        self.state.store.collection()
    }

    /// Look up an effect by ID at any nesting depth.
    pub fn effect(&self, id: &EffectId) -> Option<&Effect> {
        self.state.store.get(id)
    }

    /// Effect types available for `kind`, served through the registry cache.
    pub fn available_effects(
        &mut self,
        kind: EffectKind,
    ) -> MintframeResult<Vec<EffectDescriptor>> {
        self.registry.list_available(kind)
    }

    /// Drop cached registry lookups (call after a plugin install).
    pub fn clear_registry_cache(&mut self) {
        self.registry.clear_cache();
    }

    /// Add a top-level effect from an explicit draft.
    pub fn add_effect(&mut self, draft: EffectDraft) -> MintframeResult<Effect> {
        self.execute_add(AddEffect::top_level(draft))
    }

    /// Build a draft for `registry_key` with the registry's default config
    /// and add it top-level.
    ///
    /// A failing default-config lookup degrades to an empty config rather
    /// than failing the add; the user can configure manually afterward.
    #[tracing::instrument(skip(self))]
    pub fn add_effect_from_registry(
        &mut self,
        kind: EffectKind,
        name: &str,
        registry_key: &str,
    ) -> MintframeResult<Effect> {
        let config = self.default_config_or_empty(registry_key);
        self.add_effect(EffectDraft::new(kind, name, registry_key).with_config(config))
    }

    /// Attach a secondary effect to the primary effect `parent`.
    pub fn attach_secondary(
        &mut self,
        parent: &EffectId,
        draft: EffectDraft,
    ) -> MintframeResult<Effect> {
        self.execute_add(AddEffect::attach_secondary(parent.clone(), draft))
    }

    /// Attach a secondary effect using the registry's default config.
    pub fn attach_secondary_from_registry(
        &mut self,
        parent: &EffectId,
        name: &str,
        registry_key: &str,
    ) -> MintframeResult<Effect> {
        let config = self.default_config_or_empty(registry_key);
        self.attach_secondary(
            parent,
            EffectDraft::new(EffectKind::Secondary, name, registry_key).with_config(config),
        )
    }

    /// Attach a keyframe effect to the primary effect `parent` at `frame`.
    pub fn attach_keyframe(
        &mut self,
        parent: &EffectId,
        draft: EffectDraft,
        frame: FrameIndex,
    ) -> MintframeResult<Effect> {
        self.execute_add(AddEffect::attach_keyframe(parent.clone(), draft, frame))
    }

    /// Attach a keyframe effect using the registry's default config.
    pub fn attach_keyframe_from_registry(
        &mut self,
        parent: &EffectId,
        name: &str,
        registry_key: &str,
        frame: FrameIndex,
    ) -> MintframeResult<Effect> {
        let config = self.default_config_or_empty(registry_key);
        self.attach_keyframe(
            parent,
            EffectDraft::new(EffectKind::Keyframe, name, registry_key).with_config(config),
            frame,
        )
    }

    /// Apply a partial update to the effect `id`.
    ///
    /// A vanished ID (deleted by a concurrent operation) is a logged no-op
    /// returning `Ok(None)` so stale UI callbacks degrade gracefully; every
    /// other failure propagates.
    pub fn update_effect(
        &mut self,
        id: &EffectId,
        patch: EffectPatch,
    ) -> MintframeResult<Option<Effect>> {
        self.ensure_writable()?;
        if !self.state.store.collection().contains(id) {
            warn!(id = %id, "update: effect not found, ignoring stale request");
            return Ok(None);
        }
        self.execute(Box::new(UpdateEffect::new(id.clone(), patch)))?;
        Ok(self.state.store.get(id).cloned())
    }

    /// Queue a config update for the sequencer path.
    ///
    /// Rapid-fire edits against the same effect coalesce: a pending update
    /// for the same key is discarded in favor of this one. The task looks
    /// the effect up again when it runs, never against a snapshot captured
    /// now.
    pub fn queue_config_update(&mut self, id: EffectId, config: ConfigMap) -> MintframeResult<()> {
        self.ensure_writable()?;
        let key = SequenceKey::config(&id);
        self.sequencer.enqueue(
            key,
            Box::new(move |state: &mut EditorState| {
                if !state.store.collection().contains(&id) {
                    warn!(id = %id, "queued update: effect deleted mid-flight, dropping");
                    return Ok(());
                }
                state.execute(Box::new(UpdateEffect::new(id, EffectPatch::config(config))))
            }),
        );
        Ok(())
    }

    /// Run every queued config update in submission order. Returns the
    /// number of tasks that ran.
    ///
    /// Rejected while read-only; tasks queued before entering the mode stay
    /// pending until the session is writable again.
    pub fn run_pending_updates(&mut self) -> MintframeResult<usize> {
        self.ensure_writable()?;
        let ran = self.sequencer.run_pending(&mut self.state);
        self.pump_events();
        Ok(ran)
    }

    /// Number of queued config updates.
    pub fn pending_updates(&self) -> usize {
        self.sequencer.len()
    }

    /// Flip the visibility of the effect `id`; returns the new state, or
    /// `Ok(None)` (logged) when the ID no longer resolves.
    pub fn toggle_visibility(&mut self, id: &EffectId) -> MintframeResult<Option<bool>> {
        self.ensure_writable()?;
        if !self.state.store.collection().contains(id) {
            warn!(id = %id, "toggle: effect not found, ignoring stale request");
            return Ok(None);
        }
        self.execute(Box::new(ToggleVisibility::new(id.clone())))?;
        Ok(self.state.store.get(id).map(|e| e.visible))
    }

    /// Delete the effect `id`, cascading over its attached subtree. Returns
    /// the removed IDs; deleting an already-gone ID is a logged no-op.
    #[tracing::instrument(skip(self))]
    pub fn delete_effect(&mut self, id: &EffectId) -> MintframeResult<Vec<EffectId>> {
        self.ensure_writable()?;
        let Some(effect) = self.state.store.get(id) else {
            warn!(id = %id, "delete: effect not found, ignoring");
            return Ok(Vec::new());
        };
        let ids = effect.subtree_ids();
        self.execute(Box::new(DeleteEffect::new(id.clone())))?;
        Ok(ids)
    }

    /// Move the top-level effect `from` immediately before `to`.
    pub fn reorder_top_level(&mut self, from: &EffectId, to: &EffectId) -> MintframeResult<()> {
        self.ensure_writable()?;
        self.execute(Box::new(ReorderTopLevel::new(from.clone(), to.clone())))
    }

    /// Reorder within one parent's attached list.
    pub fn reorder_attached(
        &mut self,
        parent: &EffectId,
        list: AttachedList,
        from_index: usize,
        to_index: usize,
    ) -> MintframeResult<()> {
        self.ensure_writable()?;
        self.execute(Box::new(ReorderAttached::new(
            parent.clone(),
            list,
            from_index,
            to_index,
        )))
    }

    /// Undo the most recent edit; returns its label.
    pub fn undo(&mut self) -> MintframeResult<Option<String>> {
        self.ensure_writable()?;
        let label = self.state.history.undo(&mut self.state.store)?;
        self.pump_events();
        Ok(label)
    }

    /// Redo the most recently undone edit; returns its label.
    pub fn redo(&mut self) -> MintframeResult<Option<String>> {
        self.ensure_writable()?;
        let label = self.state.history.redo(&mut self.state.store)?;
        self.pump_events();
        Ok(label)
    }

    /// True when an undo is available.
    pub fn can_undo(&self) -> bool {
        self.state.history.can_undo()
    }

    /// True when a redo is available.
    pub fn can_redo(&self) -> bool {
        self.state.history.can_redo()
    }

    /// Select an effect (or one of its attached sub-effects) for editing.
    pub fn select(
        &mut self,
        effect_id: EffectId,
        kind: EffectKind,
        sub: Option<SubSelection>,
    ) -> MintframeResult<()> {
        self.ensure_writable()?;
        self.selection
            .select(self.state.store.collection(), effect_id, kind, sub)
    }

    /// Clear the selection explicitly.
    pub fn clear_selection(&mut self) {
        if let Some(ctx) = self.selection.current().cloned() {
            self.selection.clear();
            self.notify(&StudioEvent::SelectionCleared { id: ctx.effect_id });
        }
    }

    /// Current selection, if any.
    pub fn selection(&self) -> Option<&SelectionContext> {
        self.selection.current()
    }

    /// Current position of the selection, recomputed on every call.
    pub fn selection_slot(&self) -> Option<EffectSlot> {
        self.selection.resolved_slot(self.state.store.collection())
    }

    /// Enter or leave read-only mode. Entering clears the selection: editing
    /// UI must not stay open against a collection the user cannot mutate.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
        if read_only {
            self.clear_selection();
        }
    }

    /// True while the session rejects mutations.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Register an observer for collection and selection notifications.
    pub fn subscribe(&mut self, observer: impl FnMut(&StudioEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Replace the collection from a project document. Clears the undo
    /// history; the selection re-resolves against the loaded collection.
    pub fn load_document(&mut self, document: &dyn ProjectDocument) -> MintframeResult<()> {
        let collection = document.load_collection()?;
        self.state.store.replace_collection(collection);
        self.state.history.clear();
        self.pump_events();
        Ok(())
    }

    /// Write the collection wholesale into a project document.
    pub fn save_document(&self, document: &mut dyn ProjectDocument) -> MintframeResult<()> {
        document.store_collection(self.state.store.collection())
    }

    fn ensure_writable(&self) -> MintframeResult<()> {
        if self.read_only {
            return Err(MintframeError::validation("session is read-only"));
        }
        Ok(())
    }

    fn execute(&mut self, command: Box<dyn EditCommand>) -> MintframeResult<()> {
        self.state.execute(command)?;
        self.pump_events();
        Ok(())
    }

    fn execute_add(&mut self, mut command: AddEffect) -> MintframeResult<Effect> {
        self.ensure_writable()?;
        command.apply(&mut self.state.store)?;
        let created = command
            .created()
            .cloned()
            .ok_or_else(|| MintframeError::validation("add command produced no effect"))?;
        self.state.history.record(Box::new(command));
        self.pump_events();
        Ok(created)
    }

    fn default_config_or_empty(&mut self, registry_key: &str) -> ConfigMap {
        match self.registry.default_config(registry_key) {
            Ok(config) => config,
            Err(err) => {
                warn!(
                    registry_key,
                    error = %err,
                    "default-config lookup failed, continuing with empty config"
                );
                ConfigMap::new()
            }
        }
    }

    fn pump_events(&mut self) {
        for event in self.state.store.drain_events() {
            let change = self.selection.sync(&event, self.state.store.collection());
            self.notify(&StudioEvent::Collection(event));
            if let SelectionChange::Deselected { id } = change {
                self.notify(&StudioEvent::SelectionCleared { id });
            }
        }
    }

    fn notify(&mut self, event: &StudioEvent) {
        for observer in &mut self.observers {
            observer(event);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/studio_session.rs"]
mod tests;
