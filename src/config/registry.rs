//! config::registry — process-wide option registry.
//!
//! Purpose
//! -------
//! Hold option values shared by every likelihood built in the process:
//! template file paths, constants, and the `url_base` search directory.
//! Values set here take precedence over option defaults, and defaults that
//! get used are written back so later builds see the same value.
//!
//! Conventions
//! -----------
//! - The registry is a lazily initialised `RwLock<HashMap>`; a poisoned lock
//!   is recovered rather than propagated since the map holds plain values.
//! - [`ConfigValue`] deserializes untagged, so a JSON object of scalars maps
//!   directly onto [`set_global_config`].
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{OnceLock, PoisonError, RwLock};

/// Registry key holding the base directory for relative file names.
pub const URL_BASE: &str = "url_base";

/// A scalar option value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl ConfigValue {
    /// Numeric view; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigValue::Float(x) => Some(*x),
            ConfigValue::Int(i) => Some(*i as f64),
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

impl From<f64> for ConfigValue {
    fn from(x: f64) -> Self {
        ConfigValue::Float(x)
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        ConfigValue::Int(i)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::Str(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::Str(s)
    }
}

impl From<PathBuf> for ConfigValue {
    fn from(p: PathBuf) -> Self {
        ConfigValue::Str(p.to_string_lossy().into_owned())
    }
}

fn registry() -> &'static RwLock<HashMap<String, ConfigValue>> {
    static REGISTRY: OnceLock<RwLock<HashMap<String, ConfigValue>>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Merge option values into the global registry, overwriting existing keys.
pub fn set_global_config<I, K, V>(configs: I)
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<ConfigValue>,
{
    let mut map = registry().write().unwrap_or_else(PoisonError::into_inner);
    for (key, value) in configs {
        map.insert(key.into(), value.into());
    }
}

/// Look up one option in the global registry.
pub fn get_global_config(name: &str) -> Option<ConfigValue> {
    registry().read().unwrap_or_else(PoisonError::into_inner).get(name).cloned()
}

/// Store `value` under `name` unless a value is already present; return the
/// value that ends up in the registry.
pub fn get_or_insert_global_config(name: &str, value: ConfigValue) -> ConfigValue {
    let mut map = registry().write().unwrap_or_else(PoisonError::into_inner);
    map.entry(name.to_string()).or_insert(value).clone()
}

/// Remove every option from the global registry.
pub fn clear_global_config() {
    registry().write().unwrap_or_else(PoisonError::into_inner).clear();
}
