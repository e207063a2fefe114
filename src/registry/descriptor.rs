use crate::effect::config::ConfigMap;
use crate::effect::model::EffectKind;
use crate::foundation::error::MintframeResult;

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// One installed effect type as enumerated by the registry.
pub struct EffectDescriptor {
    /// User-facing display name.
    pub name: String,
    /// Canonical type name used to instantiate the effect.
    pub registry_key: String,
    /// Menu category.
    pub category: String,
    /// Plugin author.
    pub author: String,
}

/// The external effect registry / plugin discovery service.
///
/// Consumed by the "add effect" flow before constructing a new effect
/// record; this crate never implements discovery itself. Lookups may be
/// slow (plugin scans, schema fetches), which is why sessions wrap a
/// registry in [`crate::CachedRegistry`].
pub trait EffectRegistry {
    /// Enumerate the effect types available for `kind`.
    fn list_available(&self, kind: EffectKind) -> MintframeResult<Vec<EffectDescriptor>>;

    /// Default configuration for the effect type `registry_key`.
    fn default_config(&self, registry_key: &str) -> MintframeResult<ConfigMap>;
}
