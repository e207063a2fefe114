use std::fmt;

/// Stable, globally unique identifier of one effect instance.
///
/// Assigned exactly once when the effect is created and never reused or
/// mutated afterward. Array positions are transient; this is the only value a
/// caller may carry across an asynchronous boundary.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct EffectId(String);

impl EffectId {
    /// Wrap an already-issued identifier, e.g. one read back from a project
    /// document.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Issues fresh [`EffectId`] values.
///
/// Explicitly constructed and owned by the store rather than a process
/// global, so tests and embedders control exactly one issuing authority.
/// Backed by UUIDv4: collision-free across sessions and against IDs already
/// persisted in project documents.
#[derive(Debug, Default)]
pub struct IdGenerator {
    issued: u64,
}

impl IdGenerator {
    /// Create a generator with no issued IDs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next identifier.
    pub fn next_id(&mut self) -> EffectId {
        self.issued += 1;
        EffectId(uuid::Uuid::new_v4().to_string())
    }

    /// Number of IDs issued by this generator so far.
    pub fn issued(&self) -> u64 {
        self.issued
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/ids.rs"]
mod tests;
