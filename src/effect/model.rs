use crate::effect::config::ConfigMap;
use crate::foundation::error::{MintframeError, MintframeResult};
use crate::foundation::ids::EffectId;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
/// The four effect kinds and their placement in the hierarchy.
pub enum EffectKind {
    /// Top-level effect that may own attached secondary/keyframe effects.
    Primary,
    /// Effect attached to a primary effect; never nests further.
    Secondary,
    /// Frame-anchored effect attached to a primary effect; never nests further.
    Keyframe,
    /// Post-processing effect applied globally; lives at the top level.
    Final,
}

impl EffectKind {
    /// Display name for logs and undo labels.
    pub fn name(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Keyframe => "keyframe",
            Self::Final => "final",
        }
    }

    /// True for kinds that live in a parent's attached list.
    pub fn is_attached(self) -> bool {
        matches!(self, Self::Secondary | Self::Keyframe)
    }

    /// True for the kind that owns attached lists.
    pub fn owns_attachments(self) -> bool {
        matches!(self, Self::Primary)
    }

    /// True for kinds whose records must carry a registry key.
    ///
    /// A missing key on these kinds is a data-integrity error, never a
    /// recoverable default.
    pub fn requires_registry_key(self) -> bool {
        self.is_attached()
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
/// Frame index at which a keyframe effect applies.
pub struct FrameIndex(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// Which of a primary effect's attached lists an operation targets.
pub enum AttachedList {
    /// The `secondary_effects` list.
    Secondary,
    /// The `keyframe_effects` list.
    Keyframe,
}

impl AttachedList {
    /// Effect kind stored in this list.
    pub fn kind(self) -> EffectKind {
        match self {
            Self::Secondary => EffectKind::Secondary,
            Self::Keyframe => EffectKind::Keyframe,
        }
    }

    /// Display name for logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Secondary => "secondary",
            Self::Keyframe => "keyframe",
        }
    }
}

fn default_visible() -> bool {
    true
}

fn default_percent_chance() -> f64 {
    100.0
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A configured instance of an effect type applied to the generated artwork.
pub struct Effect {
    /// Stable unique identifier; assigned at creation, never reused or mutated.
    pub id: EffectId,
    /// User-facing display name.
    pub name: String,
    /// Canonical type name looked up in the external effect registry.
    ///
    /// Immutable after creation for secondary/keyframe effects.
    pub registry_key: String,
    /// Placement of this effect in the hierarchy.
    pub kind: EffectKind,
    /// Arbitrary configuration; opaque to the store.
    #[serde(default, skip_serializing_if = "ConfigMap::is_empty")]
    pub config: ConfigMap,
    /// Whether the effect participates in rendering; toggled independently of
    /// config.
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Probability weight in `[0, 100]`.
    #[serde(default = "default_percent_chance")]
    pub percent_chance: f64,
    /// Frame at which the effect applies; present only on keyframe effects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<FrameIndex>,
    /// Attached secondary effects; present only on primary effects.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secondary_effects: Vec<Effect>,
    /// Attached keyframe effects; present only on primary effects.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keyframe_effects: Vec<Effect>,
}

impl Effect {
    /// Borrow one attached list.
    pub fn attached(&self, list: AttachedList) -> &[Effect] {
        match list {
            AttachedList::Secondary => &self.secondary_effects,
            AttachedList::Keyframe => &self.keyframe_effects,
        }
    }

    pub(crate) fn attached_mut(&mut self, list: AttachedList) -> &mut Vec<Effect> {
        match list {
            AttachedList::Secondary => &mut self.secondary_effects,
            AttachedList::Keyframe => &mut self.keyframe_effects,
        }
    }

    /// IDs of this effect and its entire attached subtree, root first.
    pub fn subtree_ids(&self) -> Vec<EffectId> {
        let mut ids = Vec::with_capacity(1 + self.secondary_effects.len() + self.keyframe_effects.len());
        ids.push(self.id.clone());
        ids.extend(self.secondary_effects.iter().map(|e| e.id.clone()));
        ids.extend(self.keyframe_effects.iter().map(|e| e.id.clone()));
        ids
    }

    /// Validate the record's structural invariants.
    pub fn validate(&self) -> MintframeResult<()> {
        if self.kind.requires_registry_key() && self.registry_key.trim().is_empty() {
            return Err(MintframeError::invalid_record(format!(
                "{} effect '{}' is missing its registry key",
                self.kind.name(),
                self.name
            )));
        }
        if !(0.0..=100.0).contains(&self.percent_chance) {
            return Err(MintframeError::validation(format!(
                "percent_chance must be within [0, 100], got {}",
                self.percent_chance
            )));
        }
        match self.kind {
            EffectKind::Keyframe if self.frame.is_none() => {
                return Err(MintframeError::invalid_record(format!(
                    "keyframe effect '{}' has no frame index",
                    self.name
                )));
            }
            kind if kind != EffectKind::Keyframe && self.frame.is_some() => {
                return Err(MintframeError::invalid_record(format!(
                    "{} effect '{}' must not carry a frame index",
                    kind.name(),
                    self.name
                )));
            }
            _ => {}
        }
        if !self.kind.owns_attachments()
            && (!self.secondary_effects.is_empty() || !self.keyframe_effects.is_empty())
        {
            return Err(MintframeError::structural(format!(
                "{} effect '{}' must not own attached effects",
                self.kind.name(),
                self.name
            )));
        }
        // Max nesting depth is 2: attached effects never nest further.
        for child in self.secondary_effects.iter().chain(&self.keyframe_effects) {
            child.validate()?;
            if !child.secondary_effects.is_empty() || !child.keyframe_effects.is_empty() {
                return Err(MintframeError::structural(format!(
                    "attached effect '{}' must not own attached effects",
                    child.name
                )));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A fully-formed effect lacking only its identifier.
///
/// Built by the caller (usually from a registry descriptor plus default
/// config) and handed to the store, which assigns the ID.
pub struct EffectDraft {
    /// User-facing display name.
    pub name: String,
    /// Canonical registry type name.
    pub registry_key: String,
    /// Placement of the effect in the hierarchy.
    pub kind: EffectKind,
    /// Initial configuration.
    #[serde(default)]
    pub config: ConfigMap,
    /// Initial visibility.
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Probability weight in `[0, 100]`.
    #[serde(default = "default_percent_chance")]
    pub percent_chance: f64,
    /// Frame index; required for keyframe drafts, forbidden otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<FrameIndex>,
}

impl EffectDraft {
    /// Create a draft with default visibility, probability, and empty config.
    pub fn new(kind: EffectKind, name: impl Into<String>, registry_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            registry_key: registry_key.into(),
            kind,
            config: ConfigMap::new(),
            visible: true,
            percent_chance: default_percent_chance(),
            frame: None,
        }
    }

    /// Replace the initial configuration.
    pub fn with_config(mut self, config: ConfigMap) -> Self {
        self.config = config;
        self
    }

    /// Set the probability weight.
    pub fn with_percent_chance(mut self, percent_chance: f64) -> Self {
        self.percent_chance = percent_chance;
        self
    }

    /// Set the initial visibility.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Anchor a keyframe draft at `frame`.
    pub fn at_frame(mut self, frame: FrameIndex) -> Self {
        self.frame = Some(frame);
        self
    }

    /// Validate the draft before an ID is assigned.
    pub fn validate(&self) -> MintframeResult<()> {
        if self.kind.requires_registry_key() && self.registry_key.trim().is_empty() {
            return Err(MintframeError::invalid_record(format!(
                "{} effect '{}' is missing its registry key",
                self.kind.name(),
                self.name
            )));
        }
        if !(0.0..=100.0).contains(&self.percent_chance) {
            return Err(MintframeError::validation(format!(
                "percent_chance must be within [0, 100], got {}",
                self.percent_chance
            )));
        }
        match self.kind {
            EffectKind::Keyframe if self.frame.is_none() => Err(MintframeError::invalid_record(
                format!("keyframe effect '{}' has no frame index", self.name),
            )),
            kind if kind != EffectKind::Keyframe && self.frame.is_some() => {
                Err(MintframeError::invalid_record(format!(
                    "{} effect '{}' must not carry a frame index",
                    kind.name(),
                    self.name
                )))
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn into_effect(self, id: EffectId) -> Effect {
        Effect {
            id,
            name: self.name,
            registry_key: self.registry_key,
            kind: self.kind,
            config: self.config,
            visible: self.visible,
            percent_chance: self.percent_chance,
            frame: self.frame,
            secondary_effects: Vec::new(),
            keyframe_effects: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Partial update applied to an existing effect.
///
/// `config` is shallow-merged into the current config; all other fields
/// replace the current value only when present. There is deliberately no
/// `registry_key` field: the key is immutable after creation.
pub struct EffectPatch {
    /// New display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New visibility.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    /// New probability weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent_chance: Option<f64>,
    /// New frame anchor (keyframe effects only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<FrameIndex>,
    /// Config keys to overwrite; absent keys are preserved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ConfigMap>,
}

impl EffectPatch {
    /// Empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Patch only the config with the given keys.
    pub fn config(config: ConfigMap) -> Self {
        Self {
            config: Some(config),
            ..Self::default()
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the visibility.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    /// Set the probability weight.
    pub fn with_percent_chance(mut self, percent_chance: f64) -> Self {
        self.percent_chance = Some(percent_chance);
        self
    }

    /// Set the frame anchor.
    pub fn with_frame(mut self, frame: FrameIndex) -> Self {
        self.frame = Some(frame);
        self
    }

    /// True when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.visible.is_none()
            && self.percent_chance.is_none()
            && self.frame.is_none()
            && self.config.as_ref().is_none_or(|c| c.is_empty())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effect/model.rs"]
mod tests;
