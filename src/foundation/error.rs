use crate::foundation::ids::EffectId;

/// Convenience result type used across Mintframe.
pub type MintframeResult<T> = Result<T, MintframeError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum MintframeError {
    /// An operation addressed an effect ID that no longer exists.
    ///
    /// Callers on the UI path are expected to treat this as a stale callback
    /// and drop the operation, not crash the editing session.
    #[error("effect '{id}' not found")]
    NotFound {
        /// The ID that failed to resolve.
        id: EffectId,
    },

    /// An effect record is missing required data (e.g. a registry key on a
    /// secondary/keyframe effect). Indicates a caller bug, surfaced eagerly.
    #[error("invalid effect record: {0}")]
    InvalidRecord(String),

    /// An operation was attempted on an effect kind that does not support it.
    #[error("structural violation: {0}")]
    Structural(String),

    /// Invalid user-provided parameters or collection data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A registry lookup failed or returned unusable data.
    #[error("registry error: {0}")]
    Registry(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MintframeError {
    /// Build a [`MintframeError::NotFound`] value.
    pub fn not_found(id: &EffectId) -> Self {
        Self::NotFound { id: id.clone() }
    }

    /// Build a [`MintframeError::InvalidRecord`] value.
    pub fn invalid_record(msg: impl Into<String>) -> Self {
        Self::InvalidRecord(msg.into())
    }

    /// Build a [`MintframeError::Structural`] value.
    pub fn structural(msg: impl Into<String>) -> Self {
        Self::Structural(msg.into())
    }

    /// Build a [`MintframeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MintframeError::Registry`] value.
    pub fn registry(msg: impl Into<String>) -> Self {
        Self::Registry(msg.into())
    }

    /// Build a [`MintframeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// True when the error is a stale-ID miss that UI callers ignore.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
