use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::effect::config::ConfigMap;
use crate::effect::model::EffectKind;
use crate::foundation::error::MintframeResult;
use crate::registry::descriptor::{EffectDescriptor, EffectRegistry};

const DEFAULT_TTL: Duration = Duration::from_secs(60);

struct CacheEntry<T> {
    fetched_at: Instant,
    value: T,
}

impl<T> CacheEntry<T> {
    fn fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

/// TTL-bounded cache in front of an [`EffectRegistry`].
///
/// Registry discovery can be slow and its results change rarely (plugin
/// installs), so lookups are cached per kind and per registry key. The cache
/// is an explicitly constructed and owned object, never a module global, and
/// exposes [`Self::clear_cache`] for the moments the host knows the plugin
/// set changed.
pub struct CachedRegistry {
    inner: Box<dyn EffectRegistry>,
    ttl: Duration,
    lists: HashMap<EffectKind, CacheEntry<Vec<EffectDescriptor>>>,
    defaults: HashMap<String, CacheEntry<ConfigMap>>,
}

impl CachedRegistry {
    /// Wrap `inner` with the default TTL.
    pub fn new(inner: Box<dyn EffectRegistry>) -> Self {
        Self::with_ttl(inner, DEFAULT_TTL)
    }

    /// Wrap `inner` with an explicit TTL.
    pub fn with_ttl(inner: Box<dyn EffectRegistry>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            lists: HashMap::new(),
            defaults: HashMap::new(),
        }
    }

    /// Drop every cached entry; the next lookups hit the inner registry.
    pub fn clear_cache(&mut self) {
        self.lists.clear();
        self.defaults.clear();
    }
}

impl CachedRegistry {
    /// Enumerate available effect types, served from cache while fresh.
    pub fn list_available(&mut self, kind: EffectKind) -> MintframeResult<Vec<EffectDescriptor>> {
        if let Some(entry) = self.lists.get(&kind)
            && entry.fresh(self.ttl)
        {
            return Ok(entry.value.clone());
        }
        let value = self.inner.list_available(kind)?;
        self.lists.insert(
            kind,
            CacheEntry {
                fetched_at: Instant::now(),
                value: value.clone(),
            },
        );
        Ok(value)
    }

    /// Default config for `registry_key`, served from cache while fresh.
    pub fn default_config(&mut self, registry_key: &str) -> MintframeResult<ConfigMap> {
        if let Some(entry) = self.defaults.get(registry_key)
            && entry.fresh(self.ttl)
        {
            return Ok(entry.value.clone());
        }
        let value = self.inner.default_config(registry_key)?;
        self.defaults.insert(
            registry_key.to_string(),
            CacheEntry {
                fetched_at: Instant::now(),
                value: value.clone(),
            },
        );
        Ok(value)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/registry/cache.rs"]
mod tests;
