//! JSON world document
//!
//! Stands in for the host's persistence layer: actors with their flags, the
//! tokens placed on the canvas, and world-scoped setting values. [`World`]
//! implements both [`FlagStore`] and [`SettingsRegistry`] over one document.
//!
//! ```json
//! {
//!   "actors": {
//!     "goblin": { "name": "Goblin", "flags": { "squad-token": { "is-squad": true } } }
//!   },
//!   "tokens": [ { "id": "goblin-1", "actor": "goblin", "img": "tokens/goblin.png" } ],
//!   "settings": { "squad-token.background": "frames/gold.png" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::entity::{ActorId, TokenId};
use crate::flags::{FlagStore, StoreError};
use crate::settings::{SettingDef, SettingsError, SettingsRegistry};

/// World document loading/saving error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WorldError {
    /// File I/O error
    #[error("Failed to access world file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// JSON parsing error
    #[error("Failed to parse world file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Document is well-formed but refers to missing entities
    #[error("Invalid world file:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// A persisted actor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActorRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Locked actors reject flag writes
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub locked: bool,
    /// Flags by scope, then key
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub flags: BTreeMap<String, BTreeMap<String, Value>>,
}

/// A token placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub id: TokenId,
    pub actor: ActorId,
    /// Path of the token's own image
    pub img: String,
}

/// The serialized world document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldData {
    #[serde(default)]
    pub actors: BTreeMap<ActorId, ActorRecord>,
    #[serde(default)]
    pub tokens: Vec<TokenRecord>,
    /// Values keyed by `scope.key`
    #[serde(default)]
    pub settings: BTreeMap<String, Value>,
}

impl WorldData {
    /// Check that every token references a known actor and ids are unique.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen = std::collections::BTreeSet::new();

        for token in &self.tokens {
            if !seen.insert(&token.id) {
                errors.push(format!("duplicate token id '{}'", token.id));
            }
            if !self.actors.contains_key(&token.actor) {
                errors.push(format!("token '{}' references unknown actor '{}'", token.id, token.actor));
            }
            if token.img.is_empty() {
                errors.push(format!("token '{}' has an empty img path", token.id));
            }
        }

        errors
    }
}

/// Shared handle to a world document.
#[derive(Debug, Default)]
pub struct World {
    path: Option<PathBuf>,
    data: RefCell<WorldData>,
    registered: RefCell<BTreeMap<String, SettingDef>>,
    dirty: Cell<bool>,
}

fn setting_key(scope: &str, key: &str) -> String {
    format!("{}.{}", scope, key)
}

impl World {
    /// An in-memory world that is never written to disk.
    pub fn from_data(data: WorldData) -> Self {
        Self { data: RefCell::new(data), ..Self::default() }
    }

    /// Load a world document. A missing file yields an empty world that will
    /// be created on [`save`](Self::save).
    pub fn load(path: &Path) -> Result<Self, WorldError> {
        let data = if path.exists() {
            let contents = fs::read_to_string(path)
                .map_err(|source| WorldError::Io { path: path.to_path_buf(), source })?;
            let data: WorldData = serde_json::from_str(&contents)
                .map_err(|source| WorldError::Parse { path: path.to_path_buf(), source })?;
            let errors = data.validate();
            if !errors.is_empty() {
                return Err(WorldError::Validation(errors));
            }
            data
        } else {
            log::info!("World file {} not found, starting empty", path.display());
            WorldData::default()
        };

        Ok(Self { path: Some(path.to_path_buf()), data: RefCell::new(data), ..Self::default() })
    }

    /// Write the document back if anything changed since loading.
    ///
    /// Returns `true` when a file was written.
    pub fn save(&self) -> Result<bool, WorldError> {
        let Some(path) = &self.path else {
            return Ok(false);
        };
        if !self.dirty.get() {
            return Ok(false);
        }

        let json = serde_json::to_string_pretty(&*self.data.borrow())
            .map_err(|source| WorldError::Parse { path: path.clone(), source })?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| WorldError::Io { path: path.clone(), source })?;
        }
        fs::write(path, json + "\n").map_err(|source| WorldError::Io { path: path.clone(), source })?;
        self.dirty.set(false);
        log::debug!("Saved world to {}", path.display());
        Ok(true)
    }

    /// Snapshot of the current document.
    pub fn data(&self) -> WorldData {
        self.data.borrow().clone()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    pub fn actor_ids(&self) -> Vec<ActorId> {
        self.data.borrow().actors.keys().cloned().collect()
    }

    pub fn tokens(&self) -> Vec<TokenRecord> {
        self.data.borrow().tokens.clone()
    }
}

impl FlagStore for World {
    fn get_flag(&self, actor: &ActorId, scope: &str, key: &str) -> Result<Option<Value>, StoreError> {
        let data = self.data.borrow();
        let record = data.actors.get(actor).ok_or_else(|| StoreError::UnknownActor(actor.clone()))?;
        Ok(record.flags.get(scope).and_then(|flags| flags.get(key)).cloned())
    }

    fn set_flag(&self, actor: &ActorId, scope: &str, key: &str, value: Value) -> Result<(), StoreError> {
        let mut data = self.data.borrow_mut();
        let record =
            data.actors.get_mut(actor).ok_or_else(|| StoreError::UnknownActor(actor.clone()))?;
        if record.locked {
            return Err(StoreError::Locked(actor.clone()));
        }
        record.flags.entry(scope.to_string()).or_default().insert(key.to_string(), value);
        self.dirty.set(true);
        Ok(())
    }
}

impl SettingsRegistry for World {
    fn register(&self, scope: &str, key: &str, def: SettingDef) -> Result<(), SettingsError> {
        self.registered.borrow_mut().insert(setting_key(scope, key), def);
        Ok(())
    }

    fn get(&self, scope: &str, key: &str) -> Option<Value> {
        let full = setting_key(scope, key);
        if let Some(value) = self.data.borrow().settings.get(&full) {
            return Some(value.clone());
        }
        self.registered.borrow().get(&full).map(|def| def.default.clone())
    }

    fn set(&self, scope: &str, key: &str, value: Value) -> Result<(), SettingsError> {
        let full = setting_key(scope, key);
        let registered = self.registered.borrow();
        let def = registered.get(&full).ok_or_else(|| SettingsError::Unregistered {
            scope: scope.to_string(),
            key: key.to_string(),
        })?;
        if !def.kind.accepts(&value) {
            return Err(SettingsError::TypeMismatch {
                scope: scope.to_string(),
                key: key.to_string(),
                expected: def.kind,
                value,
            });
        }

        let mut data = self.data.borrow_mut();
        if data.settings.get(&full) != Some(&value) {
            data.settings.insert(full, value);
            self.dirty.set(true);
        }
        Ok(())
    }
}
