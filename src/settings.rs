//! Host settings registry
//!
//! Settings are registered once during `setup` with a default value and read
//! on every composite. Only world-scoped, hidden string settings are used
//! here, but the definition mirrors the full host contract.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::{DEFAULT_BACKGROUND, FLAG_BACKGROUND, SCOPE};

/// Where a setting value is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingScope {
    /// Shared by every client in the world
    #[default]
    World,
    /// Stored per client
    Client,
}

/// Value type of a setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    #[default]
    String,
    Boolean,
    Number,
}

impl SettingType {
    /// Check whether a JSON value has this type.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            SettingType::String => value.is_string(),
            SettingType::Boolean => value.is_boolean(),
            SettingType::Number => value.is_number(),
        }
    }
}

/// Registration record for a setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingDef {
    pub name: String,
    pub hint: String,
    pub scope: SettingScope,
    /// Shown in the host's settings menu
    pub config: bool,
    pub requires_reload: bool,
    #[serde(rename = "type")]
    pub kind: SettingType,
    pub default: Value,
}

/// Settings registry error
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum SettingsError {
    /// Setting was written before being registered
    #[error("Setting '{scope}.{key}' is not registered")]
    Unregistered { scope: String, key: String },
    /// Value does not match the registered type
    #[error("Setting '{scope}.{key}' expects a {expected:?} value, got {value}")]
    TypeMismatch { scope: String, key: String, expected: SettingType, value: Value },
}

/// Registry of module settings.
pub trait SettingsRegistry {
    /// Register a setting. Registering the same key again replaces the definition.
    fn register(&self, scope: &str, key: &str, def: SettingDef) -> Result<(), SettingsError>;

    /// Current value, falling back to the registered default. `None` when unregistered and unset.
    fn get(&self, scope: &str, key: &str) -> Option<Value>;

    /// Store a new value.
    fn set(&self, scope: &str, key: &str, value: Value) -> Result<(), SettingsError>;
}

/// Definition of the background frame setting.
pub fn background_setting(default: &str) -> SettingDef {
    SettingDef {
        name: "Squad Token Background".to_string(),
        hint: "Image to use as a frame/background".to_string(),
        scope: SettingScope::World,
        config: false,
        requires_reload: false,
        kind: SettingType::String,
        default: Value::String(default.to_string()),
    }
}

/// The configured background path, or the built-in default when the setting
/// is missing or not a string.
pub fn background_path<S: SettingsRegistry + ?Sized>(settings: &S) -> String {
    match settings.get(SCOPE, FLAG_BACKGROUND) {
        Some(Value::String(path)) => path,
        _ => DEFAULT_BACKGROUND.to_string(),
    }
}
