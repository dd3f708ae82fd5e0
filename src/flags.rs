//! Host entity flag store
//!
//! Flags are key-value attributes attached to an actor, namespaced by a module
//! scope, and persisted by the host with the actor.

use serde_json::Value;
use thiserror::Error;

use crate::entity::ActorId;
use crate::{FLAG_IS_SQUAD, SCOPE};

/// Error raised by a flag store for a single actor.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// The actor does not exist in the store
    #[error("Unknown actor '{0}'")]
    UnknownActor(ActorId),
    /// The actor exists but cannot be modified
    #[error("Actor '{0}' is locked and cannot be modified")]
    Locked(ActorId),
}

/// Read/write access to actor flags.
///
/// Methods take `&self`: the store is a shared handle to host state.
pub trait FlagStore {
    /// Read a flag. `Ok(None)` means the flag was never set.
    fn get_flag(&self, actor: &ActorId, scope: &str, key: &str) -> Result<Option<Value>, StoreError>;

    /// Write a flag.
    fn set_flag(&self, actor: &ActorId, scope: &str, key: &str, value: Value) -> Result<(), StoreError>;
}

/// True only when the actor's `is-squad` flag is exactly boolean `true`.
pub fn is_squad<F: FlagStore + ?Sized>(store: &F, actor: &ActorId) -> Result<bool, StoreError> {
    Ok(matches!(store.get_flag(actor, SCOPE, FLAG_IS_SQUAD)?, Some(Value::Bool(true))))
}
