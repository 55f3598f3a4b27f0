//! Layered render configuration
//!
//! A [`Config`] is a chain of layers. Lookups walk from the innermost
//! layer outwards; unset keys read as absent rather than failing.

use std::collections::BTreeMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// A configuration value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl ConfigValue {
    /// Truthiness: `null`, `false`, zero and empty strings are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            ConfigValue::Null => false,
            ConfigValue::Bool(b) => *b,
            ConfigValue::Int(n) => *n != 0,
            ConfigValue::Float(x) => *x != 0.0,
            ConfigValue::Str(s) => !s.is_empty(),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ConfigValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Int(value)
    }
}

impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        ConfigValue::Int(value.into())
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Float(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Str(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::Str(value)
    }
}

/// One configuration layer
pub type Layer = BTreeMap<String, ConfigValue>;

/// Layered configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    inner: Rc<ConfigData>,
}

#[derive(Debug, Default)]
struct ConfigData {
    values: Layer,
    parent: Option<Config>,
}

impl Config {
    pub fn new(values: Layer) -> Self {
        Self {
            inner: Rc::new(ConfigData {
                values,
                parent: None,
            }),
        }
    }

    /// Build a root layer from `(key, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ConfigValue>,
    {
        Self::new(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    /// Parse a root layer from a JSON object of scalars.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(Self::layer_from_json(json)?))
    }

    /// Parse a JSON object of scalars into a layer.
    pub fn layer_from_json(json: &str) -> Result<Layer, ConfigError> {
        let parsed: serde_json::Value = serde_json::from_str(json)?;
        let serde_json::Value::Object(map) = parsed else {
            return Err(ConfigError::NotAnObject);
        };
        let mut values = Layer::new();
        for (key, value) in map {
            let value: ConfigValue = serde_json::from_value(value)
                .map_err(|_| ConfigError::InvalidValue { key: key.clone() })?;
            values.insert(key, value);
        }
        Ok(values)
    }

    /// All visible settings, inner layers winning, as a JSON object.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(&self.flatten())?)
    }

    /// Add a layer on top of this one.
    ///
    /// An empty layer returns `self`. A layer setting exactly the same keys
    /// as the innermost one replaces it instead of stacking.
    pub fn with_config(&self, values: Layer) -> Config {
        if values.is_empty() {
            return self.clone();
        }
        let parent = if self.inner.values.keys().eq(values.keys()) {
            self.inner.parent.clone()
        } else {
            Some(self.clone())
        };
        Config {
            inner: Rc::new(ConfigData { values, parent }),
        }
    }

    /// Raw lookup. An explicit `null` is returned as such.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        let mut layer = Some(self);
        while let Some(config) = layer {
            if let Some(value) = config.inner.values.get(key) {
                return Some(value);
            }
            layer = config.inner.parent.as_ref();
        }
        None
    }

    pub fn flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(ConfigValue::is_truthy)
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(ConfigValue::as_int)
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ConfigValue::as_str)
    }

    /// Depth at which full forms give way to short forms.
    pub fn max_depth(&self) -> Option<i64> {
        self.int("max_depth")
    }

    /// Disable reference de-duplication.
    pub fn norefs(&self) -> bool {
        self.flag("norefs") || self.flag("no_refs")
    }

    /// Render back-references without a preview.
    pub fn shortrefs(&self) -> bool {
        self.flag("shortrefs")
    }

    /// Number of layers in the chain.
    pub fn depth(&self) -> usize {
        let mut n = 0;
        let mut layer = Some(self);
        while let Some(config) = layer {
            n += 1;
            layer = config.inner.parent.as_ref();
        }
        n
    }

    fn flatten(&self) -> Layer {
        let mut out = match &self.inner.parent {
            Some(parent) => parent.flatten(),
            None => Layer::new(),
        };
        for (k, v) in &self.inner.values {
            out.insert(k.clone(), v.clone());
        }
        out
    }
}
