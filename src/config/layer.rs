//! Layered key/value configuration.
//!
//! A project's effective configuration is built from up to three layers,
//! lowest priority first:
//!
//! 1. the global layer shared by every project,
//! 2. the repository-native layer read from the repository itself,
//! 3. the per-project override layer supplied by whoever configured the scan.
//!
//! A key defined in a higher layer replaces the value from any lower one.
//! Keys no layer defines stay [`Setting::Unset`]; substituting defaults is up
//! to the consumer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use toml::Value;

/// Identifies which layer a resolved value came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    /// Process-wide defaults
    Global,

    /// Settings stored inside the repository
    Repository,

    /// Per-project override from the settings file
    Override,
}

/// A read-only set of configuration keys and values.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ConfigLayer(BTreeMap<String, Value>);

impl ConfigLayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a key, returning the layer for chaining.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ConfigLayer {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// Result of looking up a key in an [`EffectiveConfig`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Setting<'a> {
    /// No layer defines the key
    Unset,

    /// The value from the highest-priority layer defining the key
    Set {
        value: &'a Value,
        source: LayerKind,
    },
}

impl<'a> Setting<'a> {
    #[must_use]
    pub const fn value(&self) -> Option<&'a Value> {
        match self {
            Self::Unset => None,
            Self::Set { value, .. } => Some(*value),
        }
    }

    #[must_use]
    pub const fn source(&self) -> Option<LayerKind> {
        match self {
            Self::Unset => None,
            Self::Set { source, .. } => Some(*source),
        }
    }

    #[must_use]
    pub const fn is_set(&self) -> bool {
        matches!(self, Self::Set { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
struct ResolvedValue {
    value: Value,
    source: LayerKind,
}

/// The merged view of every layer that applies to one project.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EffectiveConfig(BTreeMap<String, ResolvedValue>);

impl EffectiveConfig {
    /// Look up a key, reporting which layer supplied it.
    #[must_use]
    pub fn get(&self, key: &str) -> Setting<'_> {
        self.0.get(key).map_or(Setting::Unset, |resolved| Setting::Set {
            value: &resolved.value,
            source: resolved.source,
        })
    }

    /// String value of a key, if it is set and is a string.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).value().and_then(Value::as_str)
    }

    /// Boolean value of a key, if it is set and is a boolean.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).value().and_then(Value::as_bool)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    fn overlay(&mut self, layer: &ConfigLayer, source: LayerKind) {
        for (key, value) in layer.iter() {
            self.0.insert(
                key.to_owned(),
                ResolvedValue {
                    value: value.clone(),
                    source,
                },
            );
        }
    }
}

/// Merge the configuration layers for a single project.
///
/// Layers are applied global first, then repository-native, then the optional
/// per-project override, so later layers win on conflicting keys.
///
/// # Examples
///
/// ```
/// # use git_project_index::config::{ConfigLayer, LayerKind, resolve};
/// let global = ConfigLayer::new().with("compat", false);
/// let native = ConfigLayer::new().with("compat", true);
///
/// let config = resolve(&global, &native, None);
/// assert_eq!(config.get_bool("compat"), Some(true));
/// assert_eq!(config.get("compat").source(), Some(LayerKind::Repository));
/// ```
#[must_use]
pub fn resolve(
    global: &ConfigLayer,
    repository: &ConfigLayer,
    project_override: Option<&ConfigLayer>,
) -> EffectiveConfig {
    let mut config = EffectiveConfig::default();

    config.overlay(global, LayerKind::Global);
    config.overlay(repository, LayerKind::Repository);

    if let Some(layer) = project_override {
        config.overlay(layer, LayerKind::Override);
    }

    config
}
