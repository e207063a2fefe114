use std::collections::HashSet;

use crate::effect::model::{AttachedList, Effect};
use crate::foundation::error::{MintframeError, MintframeResult};
use crate::foundation::ids::EffectId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Current position of an effect, resolved from its ID at the moment of use.
///
/// A slot is a non-authoritative hint: it is recomputed on every use and must
/// never be carried across an await/event boundary. See
/// [`EffectCollection::resolve`].
pub enum EffectSlot {
    /// Effect lives in the top-level sequence.
    Top {
        /// Current top-level array position.
        index: usize,
    },
    /// Effect lives in a primary effect's attached list.
    Attached {
        /// Current top-level position of the owning primary effect.
        parent_index: usize,
        /// Which attached list holds the effect.
        list: AttachedList,
        /// Current position within that list.
        index: usize,
    },
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
/// The ordered sequence of top-level effects (primary and final intermixed).
///
/// Owned exclusively by [`crate::EffectStore`]; all mutation goes through the
/// store's ID-addressed operations so every change can be wrapped as an
/// undoable command and observers always see a consistent snapshot.
pub struct EffectCollection {
    effects: Vec<Effect>,
}

impl EffectCollection {
    /// Empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from already-identified effects, validating the
    /// global uniqueness and structural invariants (used when loading a
    /// project document wholesale).
    pub fn from_effects(effects: Vec<Effect>) -> MintframeResult<Self> {
        let collection = Self { effects };
        collection.validate()?;
        Ok(collection)
    }

    /// Top-level effects in user-controlled order.
    pub fn top_level(&self) -> &[Effect] {
        &self.effects
    }

    /// Number of top-level effects.
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// True when no top-level effects exist.
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Total number of effects at every nesting depth.
    pub fn total_len(&self) -> usize {
        self.effects
            .iter()
            .map(|e| 1 + e.secondary_effects.len() + e.keyframe_effects.len())
            .sum()
    }

    /// Iterate every effect depth-first: each top-level effect followed by
    /// its attached secondary then keyframe effects.
    pub fn iter_all(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter().flat_map(|e| {
            std::iter::once(e)
                .chain(e.secondary_effects.iter())
                .chain(e.keyframe_effects.iter())
        })
    }

    /// Resolve an ID to the effect's current position.
    ///
    /// O(n) over a user-authored collection of dozens of effects; resolution
    /// happens immediately before each mutation so no caller ever trusts a
    /// cached index.
    pub fn resolve(&self, id: &EffectId) -> Option<EffectSlot> {
        for (index, effect) in self.effects.iter().enumerate() {
            if effect.id == *id {
                return Some(EffectSlot::Top { index });
            }
            for list in [AttachedList::Secondary, AttachedList::Keyframe] {
                if let Some(sub) = effect.attached(list).iter().position(|e| e.id == *id) {
                    return Some(EffectSlot::Attached {
                        parent_index: index,
                        list,
                        index: sub,
                    });
                }
            }
        }
        None
    }

    /// Look up an effect by ID at any nesting depth.
    pub fn get(&self, id: &EffectId) -> Option<&Effect> {
        match self.resolve(id)? {
            EffectSlot::Top { index } => self.effects.get(index),
            EffectSlot::Attached {
                parent_index,
                list,
                index,
            } => self.effects.get(parent_index)?.attached(list).get(index),
        }
    }

    /// True when an effect with this ID exists at any depth.
    pub fn contains(&self, id: &EffectId) -> bool {
        self.resolve(id).is_some()
    }

    pub(crate) fn get_mut(&mut self, id: &EffectId) -> Option<&mut Effect> {
        match self.resolve(id)? {
            EffectSlot::Top { index } => self.effects.get_mut(index),
            EffectSlot::Attached {
                parent_index,
                list,
                index,
            } => self
                .effects
                .get_mut(parent_index)?
                .attached_mut(list)
                .get_mut(index),
        }
    }

    pub(crate) fn top_level_mut(&mut self) -> &mut Vec<Effect> {
        &mut self.effects
    }

    /// Validate global ID uniqueness plus each record's own invariants.
    pub fn validate(&self) -> MintframeResult<()> {
        let mut seen = HashSet::new();
        for effect in self.iter_all() {
            if !seen.insert(&effect.id) {
                return Err(MintframeError::validation(format!(
                    "duplicate effect id '{}' in collection",
                    effect.id
                )));
            }
        }
        for effect in &self.effects {
            if effect.kind.is_attached() {
                return Err(MintframeError::structural(format!(
                    "{} effect '{}' cannot live at the top level",
                    effect.kind.name(),
                    effect.name
                )));
            }
            effect.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/collection/model.rs"]
mod tests;
