//! Squad membership toggling

use serde_json::Value;

use crate::entity::ActorId;
use crate::flags::{is_squad, FlagStore, StoreError};
use crate::{FLAG_IS_SQUAD, SCOPE};

/// Outcome of [`toggle`] for every actor, in input order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ToggleReport {
    /// New `is-squad` value, or the store error for that actor.
    pub results: Vec<(ActorId, Result<bool, StoreError>)>,
}

impl ToggleReport {
    /// Actors whose flag was flipped, with the new value.
    pub fn toggled(&self) -> impl Iterator<Item = (&ActorId, bool)> {
        self.results.iter().filter_map(|(actor, r)| r.as_ref().ok().map(|v| (actor, *v)))
    }

    /// Actors whose flag could not be read or written.
    pub fn failures(&self) -> impl Iterator<Item = (&ActorId, &StoreError)> {
        self.results.iter().filter_map(|(actor, r)| r.as_ref().err().map(|e| (actor, e)))
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

/// Flip the `is-squad` flag of every actor.
///
/// Each actor is handled on its own; a failure is recorded for that actor and
/// the remaining actors are still processed.
///
/// Only a boolean `true` counts as squad. Any other stored value, such as
/// `"yes"` or `1`, reads as not squad and is replaced with `true`.
pub fn toggle<F: FlagStore + ?Sized>(store: &F, actors: &[ActorId]) -> ToggleReport {
    let results = actors
        .iter()
        .map(|actor| {
            let result = toggle_one(store, actor);
            match &result {
                Ok(value) => log::debug!("actor '{}' is-squad -> {}", actor, value),
                Err(e) => log::error!("Failed to toggle squad flag: {}", e),
            }
            (actor.clone(), result)
        })
        .collect();

    ToggleReport { results }
}

fn toggle_one<F: FlagStore + ?Sized>(store: &F, actor: &ActorId) -> Result<bool, StoreError> {
    let next = !is_squad(store, actor)?;
    store.set_flag(actor, SCOPE, FLAG_IS_SQUAD, Value::Bool(next))?;
    Ok(next)
}
