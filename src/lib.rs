//! Squad tokens - tiled squad decorations for tabletop tokens
//!
//! This library provides functionality to:
//! - Toggle an actor's squad membership flag
//! - Composite a token's icon 2x2 over a background frame on refresh
//! - Restore the original image when membership ends or the frame changes
//!
//! The host renderer, flag store, settings registry and file picker are
//! injected as traits; [`renderer::SoftwareRenderer`] and [`world::World`]
//! implement them in-process.

pub mod background;
pub mod cli;
pub mod composition;
pub mod compositor;
pub mod config;
pub mod entity;
pub mod flags;
pub mod hooks;
pub mod membership;
pub mod renderer;
pub mod settings;
pub mod texture;
pub mod world;

/// Module scope for flags and settings.
pub const SCOPE: &str = "squad-token";
/// Actor flag marking squad membership.
pub const FLAG_IS_SQUAD: &str = "is-squad";
/// Setting holding the background frame path.
pub const FLAG_BACKGROUND: &str = "background";
/// Background used until one is chosen.
pub const DEFAULT_BACKGROUND: &str = "/modules/squad-token/assets/background.png";

pub use compositor::{decide, Action, Compositor, CompositorError, Outcome};
pub use entity::{ActorId, TokenId};
pub use hooks::{Hook, HookKind, SquadToken};
pub use texture::{Provenance, Texture, TokenVisual};
