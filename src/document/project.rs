use crate::collection::model::EffectCollection;
use crate::effect::model::Effect;
use crate::foundation::error::{MintframeError, MintframeResult};

/// The persisted project document, seen as a wholesale effect-collection
/// store.
///
/// The host application owns the document's real on-disk format and
/// lifecycle; this crate only reads and writes the full collection. Loaded
/// collections are re-validated before use: the document is an external
/// input, not a trusted snapshot.
pub trait ProjectDocument {
    /// Read the full effect collection out of the document.
    fn load_collection(&self) -> MintframeResult<EffectCollection>;

    /// Write the full effect collection back into the document.
    fn store_collection(&mut self, collection: &EffectCollection) -> MintframeResult<()>;
}

/// JSON-backed [`ProjectDocument`] holding the collection as a
/// `serde_json::Value`.
///
/// Useful as the in-memory document for tests and for hosts that embed the
/// effect collection inside a larger JSON project file.
#[derive(Clone, Debug, Default)]
pub struct JsonDocument {
    value: serde_json::Value,
}

impl JsonDocument {
    /// Empty document (loads as an empty collection).
    pub fn new() -> Self {
        Self {
            value: serde_json::Value::Null,
        }
    }

    /// Document wrapping an existing JSON value.
    pub fn from_value(value: serde_json::Value) -> Self {
        Self { value }
    }

    /// The raw JSON payload.
    pub fn value(&self) -> &serde_json::Value {
        &self.value
    }
}

impl ProjectDocument for JsonDocument {
    fn load_collection(&self) -> MintframeResult<EffectCollection> {
        if self.value.is_null() {
            return Ok(EffectCollection::new());
        }
        let effects: Vec<Effect> = serde_json::from_value(self.value.clone())
            .map_err(|e| MintframeError::serde(format!("invalid effect collection: {e}")))?;
        EffectCollection::from_effects(effects)
    }

    fn store_collection(&mut self, collection: &EffectCollection) -> MintframeResult<()> {
        self.value = serde_json::to_value(collection)
            .map_err(|e| MintframeError::serde(format!("unserializable collection: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/project.rs"]
mod tests;
