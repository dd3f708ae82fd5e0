//! Lifecycle wiring
//!
//! The host fires named lifecycle events. [`SquadToken`] subscribes to
//! `setup` and `refreshToken` and holds the collaborators every operation
//! needs, so nothing is reached through globals.

use std::fmt;
use thiserror::Error;

use crate::background::{select_background, set_background, FilePicker};
use crate::compositor::{Compositor, CompositorError, Outcome};
use crate::entity::{ActorId, TokenId};
use crate::flags::FlagStore;
use crate::membership::{toggle, ToggleReport};
use crate::renderer::Renderer;
use crate::settings::{background_setting, SettingsError, SettingsRegistry};
use crate::{DEFAULT_BACKGROUND, FLAG_BACKGROUND, SCOPE};

/// Names of the host events this module reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    Setup,
    RefreshToken,
}

impl HookKind {
    /// Event name as the host spells it.
    pub fn name(&self) -> &'static str {
        match self {
            HookKind::Setup => "setup",
            HookKind::RefreshToken => "refreshToken",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Events to subscribe to at process start.
pub const SUBSCRIPTIONS: [HookKind; 2] = [HookKind::RefreshToken, HookKind::Setup];

/// A fired lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hook {
    Setup,
    RefreshToken(TokenId),
}

impl Hook {
    pub fn kind(&self) -> HookKind {
        match self {
            Hook::Setup => HookKind::Setup,
            Hook::RefreshToken(_) => HookKind::RefreshToken,
        }
    }
}

/// Error from a hook handler
#[derive(Debug, Error)]
pub enum HookError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Compositor(#[from] CompositorError),
}

/// Tally of one refresh pass over every token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub applied: usize,
    pub reverted: usize,
    pub unchanged: usize,
    /// Pending or stale refreshes
    pub skipped: usize,
    pub failed: usize,
}

impl RefreshSummary {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Applied => self.applied += 1,
            Outcome::Reverted => self.reverted += 1,
            Outcome::Unchanged => self.unchanged += 1,
            Outcome::Pending | Outcome::Stale => self.skipped += 1,
        }
    }
}

/// The squad token module bound to a set of host collaborators.
pub struct SquadToken<'a, R: ?Sized, F: ?Sized, S: ?Sized> {
    renderer: &'a R,
    flags: &'a F,
    settings: &'a S,
    default_background: String,
    compositor: Compositor<'a, R, F, S>,
}

impl<'a, R, F, S> SquadToken<'a, R, F, S>
where
    R: Renderer + ?Sized,
    F: FlagStore + ?Sized,
    S: SettingsRegistry + ?Sized,
{
    pub fn new(renderer: &'a R, flags: &'a F, settings: &'a S) -> Self {
        Self {
            renderer,
            flags,
            settings,
            default_background: DEFAULT_BACKGROUND.to_string(),
            compositor: Compositor::new(renderer, flags, settings),
        }
    }

    /// Use a different default for the background setting.
    pub fn with_default_background(mut self, path: impl Into<String>) -> Self {
        self.default_background = path.into();
        self
    }

    pub fn compositor(&self) -> &Compositor<'a, R, F, S> {
        &self.compositor
    }

    /// Dispatch a lifecycle event.
    pub async fn handle(&self, hook: &Hook) -> Result<(), HookError> {
        match hook {
            Hook::Setup => self.on_setup()?,
            Hook::RefreshToken(token) => {
                self.on_refresh_token(token).await?;
            }
        }
        Ok(())
    }

    /// Register the background setting.
    pub fn on_setup(&self) -> Result<(), SettingsError> {
        self.settings.register(SCOPE, FLAG_BACKGROUND, background_setting(&self.default_background))
    }

    pub async fn on_refresh_token(&self, token: &TokenId) -> Result<Outcome, CompositorError> {
        self.compositor.on_refresh_token(token).await
    }

    /// Flip squad membership of the given actors.
    pub fn toggle(&self, actors: &[ActorId]) -> ToggleReport {
        toggle(self.flags, actors)
    }

    pub fn set_background(&self, path: &str) -> Result<usize, SettingsError> {
        set_background(self.settings, self.renderer, path)
    }

    pub async fn select_background<P: FilePicker + ?Sized>(
        &self,
        picker: &P,
        initial_path: Option<&str>,
    ) -> Result<Option<String>, SettingsError> {
        select_background(picker, self.settings, self.renderer, initial_path).await
    }

    /// Fire `refreshToken` for every token on the canvas, one after another.
    ///
    /// Failures are logged and counted; they never stop the pass.
    pub async fn refresh_all(&self) -> RefreshSummary {
        let mut summary = RefreshSummary::default();
        for token in self.renderer.tokens() {
            match self.on_refresh_token(&token).await {
                Ok(outcome) => summary.record(outcome),
                Err(e) => {
                    log::error!("{}", e);
                    summary.failed += 1;
                }
            }
        }
        summary
    }
}
