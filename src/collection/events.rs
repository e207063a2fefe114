use crate::effect::model::{AttachedList, EffectKind};
use crate::foundation::ids::EffectId;

/// Change notification emitted by the store after each mutation.
///
/// The protocol between the store, the selection tracker, and UI observers
/// is this explicit set of message types. Every variant carries the affected
/// ID so observers can re-resolve against a fresh snapshot; no variant
/// carries an index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CollectionEvent {
    /// An effect was added (top-level, or attached when `parent` is set).
    Added {
        /// ID of the new effect.
        id: EffectId,
        /// Kind of the new effect.
        kind: EffectKind,
        /// Owning primary effect for attached additions.
        parent: Option<EffectId>,
    },
    /// An effect's record was updated in place.
    Updated {
        /// ID of the updated effect.
        id: EffectId,
    },
    /// An effect's visibility flag was flipped.
    VisibilityChanged {
        /// ID of the toggled effect.
        id: EffectId,
        /// New visibility state.
        visible: bool,
    },
    /// Effects were removed; a cascade lists the root first, then its
    /// attached subtree.
    Removed {
        /// IDs of every removed effect.
        ids: Vec<EffectId>,
    },
    /// The top-level sequence was reordered.
    ReorderedTop {
        /// ID of the effect that moved.
        moved: EffectId,
    },
    /// One parent's attached list was reordered.
    ReorderedAttached {
        /// Owning primary effect.
        parent: EffectId,
        /// Which attached list changed.
        list: AttachedList,
    },
    /// The whole collection was replaced from a project document.
    Reloaded,
}

impl CollectionEvent {
    /// True when the event removed (directly or via reload) any effect.
    pub fn is_removal(&self) -> bool {
        matches!(self, Self::Removed { .. } | Self::Reloaded)
    }
}
