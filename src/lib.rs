//! Mintframe is the effect-editing core of an NFT animation authoring tool.
//!
//! It keeps a project's effect collection consistent while the UI mutates it:
//! every entity is addressed by a stable ID, every edit resolves its position
//! at the moment it runs, and every change flows back out as a typed event.
//! The public API is session-oriented:
//!
//! - Build a [`StudioSession`] over an [`EffectRegistry`]
//! - Add, update, reorder and delete effects through the session
//! - Undo and redo edits, load and save [`ProjectDocument`]s
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// ID-addressed collection model, mutation engine and change events.
pub mod collection;
/// Undoable edit commands and the history engine.
pub mod command;
/// Project-document persistence boundary.
pub mod document;
/// Effect records, drafts, patches and config values.
pub mod effect;
/// Effect-type discovery with TTL caching.
pub mod registry;
/// Selection tracking that survives collection mutation.
pub mod selection;
/// Per-key coalescing queue for config updates.
pub mod sequencer;
/// Session-oriented editing API.
pub mod session;

pub use crate::foundation::error::{MintframeError, MintframeResult};
pub use crate::foundation::ids::{EffectId, IdGenerator};

pub use crate::collection::events::CollectionEvent;
pub use crate::collection::model::{EffectCollection, EffectSlot};
pub use crate::collection::store::EffectStore;
pub use crate::command::command::{
    AddEffect, DeleteEffect, EditCommand, ReorderAttached, ReorderTopLevel, ToggleVisibility,
    UpdateEffect,
};
pub use crate::command::engine::{CommandEngine, DEFAULT_HISTORY_LIMIT};
pub use crate::document::project::{JsonDocument, ProjectDocument};
pub use crate::effect::config::{ConfigMap, ConfigValue, Position, merge_config};
pub use crate::effect::model::{
    AttachedList, Effect, EffectDraft, EffectKind, EffectPatch, FrameIndex,
};
pub use crate::registry::cache::CachedRegistry;
pub use crate::registry::descriptor::{EffectDescriptor, EffectRegistry};
pub use crate::selection::tracker::{
    SelectionChange, SelectionContext, SelectionTracker, SubSelection,
};
pub use crate::sequencer::queue::{SequenceKey, SequencedTask, UpdateSequencer};
pub use crate::session::studio_session::{EditorState, StudioEvent, StudioSession};
