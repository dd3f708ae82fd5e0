//! Refresh reaction: decide whether a token shows a squad composite
//!
//! On every refresh the compositor reads the actor's `is-squad` flag and the
//! provenance of the token's displayed image, then applies, reverts, or
//! leaves the token alone:
//!
//! | is-squad | displayed  | action |
//! |----------|------------|--------|
//! | false    | Composited | revert |
//! | false    | Original   | none   |
//! | true     | Composited | none   |
//! | true     | Original   | apply  |
//!
//! Apply has one suspension point, the background load. The source texture
//! is captured before it and re-checked after it, and a token with an apply
//! in flight is skipped, so a composite is never built from a composite.
//! The background path is re-checked too, so a frame that was replaced
//! during the load is never installed.

use std::cell::RefCell;
use std::collections::HashSet;
use thiserror::Error;

use crate::composition::squad_scene;
use crate::entity::{ActorId, TokenId};
use crate::flags::{is_squad, FlagStore, StoreError};
use crate::renderer::{RenderError, Renderer};
use crate::settings::{background_path, SettingsRegistry};
use crate::texture::{Provenance, Texture, TokenVisual};

/// What a refresh should do to a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Apply,
    Revert,
}

/// Pick the action for a token.
pub fn decide(is_squad: bool, provenance: Provenance) -> Action {
    match (is_squad, provenance) {
        (false, Provenance::Composited) => Action::Revert,
        (true, Provenance::Original) => Action::Apply,
        (false, Provenance::Original) | (true, Provenance::Composited) => Action::None,
    }
}

/// What a refresh actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Token was already in the right state
    Unchanged,
    /// A composite was built and installed
    Applied,
    /// The original image was restored
    Reverted,
    /// An apply for this token is still waiting on its background
    Pending,
    /// The token, its actor or the background setting changed while the
    /// background loaded; nothing installed
    Stale,
}

/// Compositor error. None of these leave a token with a partial image.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompositorError {
    /// Background image could not be loaded
    #[error("Failed to load background '{path}' for token '{token}': {source}")]
    BackgroundLoad {
        token: TokenId,
        path: String,
        #[source]
        source: RenderError,
    },
    /// Rasterizing or installing the composite failed
    #[error("Failed to update token '{token}': {source}")]
    Render {
        token: TokenId,
        #[source]
        source: RenderError,
    },
    /// Actor flags could not be read
    #[error("Failed to read squad flag for token '{token}': {source}")]
    Flags {
        token: TokenId,
        #[source]
        source: StoreError,
    },
    /// Token is not on the canvas or has no actor
    #[error("Token '{0}' is not on the canvas")]
    UnknownToken(TokenId),
}

/// Restore a token's original image if it shows a composite.
///
/// Returns `true` when the token was reverted. Inconsistent composites are
/// left alone since their back-reference cannot be restored.
pub fn reset_token<R: Renderer + ?Sized>(renderer: &R, token: &TokenId) -> Result<bool, RenderError> {
    let Some(visual) = renderer.displayed(token) else {
        return Err(RenderError::UnknownToken(token.clone()));
    };
    let Some(source) = visual.restorable_source() else {
        return Ok(false);
    };
    renderer.set_displayed_image(token, TokenVisual::original(source.clone()))?;
    renderer.refresh(token);
    Ok(true)
}

/// Removes a token from the in-flight set when dropped.
struct InFlight<'a> {
    set: &'a RefCell<HashSet<TokenId>>,
    token: TokenId,
}

impl<'a> InFlight<'a> {
    fn enter(set: &'a RefCell<HashSet<TokenId>>, token: &TokenId) -> Option<Self> {
        if set.borrow_mut().insert(token.clone()) {
            Some(Self { set, token: token.clone() })
        } else {
            None
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.set.borrow_mut().remove(&self.token);
    }
}

/// Reacts to token refreshes using the injected host collaborators.
pub struct Compositor<'a, R: ?Sized, F: ?Sized, S: ?Sized> {
    renderer: &'a R,
    flags: &'a F,
    settings: &'a S,
    in_flight: RefCell<HashSet<TokenId>>,
}

impl<'a, R, F, S> Compositor<'a, R, F, S>
where
    R: Renderer + ?Sized,
    F: FlagStore + ?Sized,
    S: SettingsRegistry + ?Sized,
{
    pub fn new(renderer: &'a R, flags: &'a F, settings: &'a S) -> Self {
        Self { renderer, flags, settings, in_flight: RefCell::new(HashSet::new()) }
    }

    /// True while an apply for `token` is waiting on its background.
    pub fn is_in_flight(&self, token: &TokenId) -> bool {
        self.in_flight.borrow().contains(token)
    }

    /// React to one refresh of `token`.
    ///
    /// Safe to call any number of times; it only touches the token when the
    /// decision table calls for a change.
    pub async fn on_refresh_token(&self, token: &TokenId) -> Result<Outcome, CompositorError> {
        if self.is_in_flight(token) {
            log::debug!("token '{}' already has an apply in flight", token);
            return Ok(Outcome::Pending);
        }

        let visual =
            self.renderer.displayed(token).ok_or_else(|| CompositorError::UnknownToken(token.clone()))?;
        let actor =
            self.renderer.actor_of(token).ok_or_else(|| CompositorError::UnknownToken(token.clone()))?;
        let squad = self.is_squad(token, &actor)?;

        if visual.is_inconsistent() {
            log::warn!("token '{}' shows a composite with no usable source, treating it as original", token);
        }

        match decide(squad, visual.provenance()) {
            Action::None => Ok(Outcome::Unchanged),
            Action::Revert => {
                reset_token(self.renderer, token)
                    .map_err(|source| CompositorError::Render { token: token.clone(), source })?;
                log::debug!("token '{}' reverted to original", token);
                Ok(Outcome::Reverted)
            }
            Action::Apply if visual.image().is_empty() => {
                log::debug!("token '{}' has an empty icon, nothing to composite", token);
                Ok(Outcome::Unchanged)
            }
            Action::Apply => self.apply(token, &actor, visual.image().clone()).await,
        }
    }

    async fn apply(&self, token: &TokenId, actor: &ActorId, icon: Texture) -> Result<Outcome, CompositorError> {
        let Some(_guard) = InFlight::enter(&self.in_flight, token) else {
            return Ok(Outcome::Pending);
        };

        let path = background_path(self.settings);
        let background = match self.renderer.load_texture(&path).await {
            Ok(texture) => texture,
            Err(source) => {
                log::error!("Failed to load squad background '{}': {}", path, source);
                return Err(CompositorError::BackgroundLoad { token: token.clone(), path, source });
            }
        };

        // Other refreshes ran while the background loaded
        if !self.still_original(token, &icon) || !self.is_squad(token, actor)? {
            log::debug!("token '{}' changed while its background loaded, skipping", token);
            return Ok(Outcome::Stale);
        }
        // The redraw requested by the background change found this apply in flight
        if background_path(self.settings) != path {
            log::debug!("background changed from '{}' while token '{}' loaded it, redrawing", path, token);
            self.renderer.refresh(token);
            return Ok(Outcome::Stale);
        }

        let scene = squad_scene(&icon, &background);
        let image = self
            .renderer
            .render_to_texture(&scene)
            .map_err(|source| CompositorError::Render { token: token.clone(), source })?;
        log::debug!(
            "token '{}' composited {}x{} icon into {}x{}",
            token,
            icon.width(),
            icon.height(),
            image.width(),
            image.height()
        );

        self.renderer
            .set_displayed_image(token, TokenVisual::composited(image, icon))
            .map_err(|source| CompositorError::Render { token: token.clone(), source })?;
        self.renderer.refresh(token);
        Ok(Outcome::Applied)
    }

    fn is_squad(&self, token: &TokenId, actor: &ActorId) -> Result<bool, CompositorError> {
        is_squad(self.flags, actor).map_err(|source| CompositorError::Flags { token: token.clone(), source })
    }

    fn still_original(&self, token: &TokenId, icon: &Texture) -> bool {
        match self.renderer.displayed(token) {
            Some(current) => current.provenance() == Provenance::Original && current.image().same_as(icon),
            None => false,
        }
    }
}
