use std::collections::BTreeMap;

/// 2D position on the artwork canvas.
///
/// Deserialization matches exactly `{x, y}`; an object carrying any other
/// key falls through to [`ConfigValue::Opaque`] and round-trips untouched.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

/// One configuration value attached to an effect.
///
/// Config payloads are semantically opaque to the store; only the external
/// registry and renderer interpret them. The union is still typed so merging
/// and serialization stay exhaustive, with [`ConfigValue::Opaque`] reserved
/// for fields this crate does not model.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Boolean flag.
    Flag(bool),
    /// Numeric value (integers are widened to `f64`).
    Number(f64),
    /// Text value.
    Text(String),
    /// 2D position on the artwork canvas.
    Position(Position),
    /// Ordered list of values.
    List(Vec<ConfigValue>),
    /// Forward-compatibility catch-all for shapes this crate does not
    /// interpret. Must stay the last variant so untagged deserialization
    /// prefers the typed forms.
    Opaque(serde_json::Value),
}

impl ConfigValue {
    /// Numeric payload, if this value is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text payload, if this value is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Flag payload, if this value is a flag.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<f64> for ConfigValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<bool> for ConfigValue {
    fn from(v: bool) -> Self {
        Self::Flag(v)
    }
}

impl From<&str> for ConfigValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

/// Effect configuration keyed by field name.
///
/// A `BTreeMap` keeps key order stable for serialization and diffing.
pub type ConfigMap = BTreeMap<String, ConfigValue>;

/// Shallow-merge `patch` into `base`: keys present in `patch` overwrite,
/// keys absent from `patch` are preserved.
///
/// Replace semantics would silently drop sibling fields written by another
/// panel, so every config update in the crate goes through this helper.
pub fn merge_config(base: &mut ConfigMap, patch: &ConfigMap) {
    for (key, value) in patch {
        base.insert(key.clone(), value.clone());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effect/config.rs"]
mod tests;
