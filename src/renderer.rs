//! Host renderer interface and a software implementation
//!
//! The compositor only talks to the renderer through [`Renderer`]: loading a
//! texture from a path, rasterizing a scene, and reading or replacing the
//! image a token displays. [`SoftwareRenderer`] implements it on top of the
//! `image` crate so the crate can run without a GPU scene graph.

use image::RgbaImage;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::composition::{default_frame, rasterize, Container};
use crate::entity::{ActorId, TokenId};
use crate::texture::{Texture, TokenVisual};
use crate::DEFAULT_BACKGROUND;

/// Renderer error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RenderError {
    /// Texture file could not be read
    #[error("Failed to read texture '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// Texture file could not be decoded
    #[error("Failed to decode texture '{path}': {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
    /// Scene produced no pixels
    #[error("Scene has nothing to render")]
    EmptyScene,
    /// Token is not on the canvas
    #[error("Token '{0}' is not on the canvas")]
    UnknownToken(TokenId),
}

/// Everything the compositor needs from the host renderer.
pub trait Renderer {
    /// Load a texture from a path. This is the only asynchronous operation.
    async fn load_texture(&self, path: &str) -> Result<Texture, RenderError>;

    /// Rasterize a scene into a new texture.
    fn render_to_texture(&self, scene: &Container) -> Result<Texture, RenderError>;

    /// Tokens currently on the canvas.
    fn tokens(&self) -> Vec<TokenId>;

    /// The actor a token belongs to.
    fn actor_of(&self, token: &TokenId) -> Option<ActorId>;

    /// The image a token currently displays.
    fn displayed(&self, token: &TokenId) -> Option<TokenVisual>;

    /// Replace the image a token displays.
    fn set_displayed_image(&self, token: &TokenId, visual: TokenVisual) -> Result<(), RenderError>;

    /// Ask the host to redraw a token.
    fn refresh(&self, token: &TokenId);
}

#[derive(Debug)]
struct TokenSlot {
    actor: ActorId,
    visual: TokenVisual,
    refreshes: u64,
}

/// CPU renderer backed by the filesystem and `image`.
///
/// Host-style paths such as `/modules/squad-token/assets/background.png` are
/// resolved against `assets_root`. The default background path is served from
/// a built-in frame so a fresh world renders without any asset files.
#[derive(Debug)]
pub struct SoftwareRenderer {
    assets_root: PathBuf,
    builtin: HashMap<String, Texture>,
    slots: RefCell<BTreeMap<TokenId, TokenSlot>>,
}

impl SoftwareRenderer {
    pub fn new(assets_root: impl Into<PathBuf>) -> Self {
        let mut builtin = HashMap::new();
        builtin.insert(DEFAULT_BACKGROUND.to_string(), Texture::new(default_frame()));
        Self { assets_root: assets_root.into(), builtin, slots: RefCell::new(BTreeMap::new()) }
    }

    /// Map a texture path to a file on disk.
    ///
    /// Absolute paths that exist are used as-is; anything else is taken
    /// relative to the assets root.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let as_path = Path::new(path);
        if as_path.is_absolute() && as_path.exists() {
            return as_path.to_path_buf();
        }
        self.assets_root.join(path.trim_start_matches('/'))
    }

    /// Place a token on the canvas showing `image` as its original.
    pub fn place_token(&self, token: TokenId, actor: ActorId, image: Texture) {
        let slot = TokenSlot { actor, visual: TokenVisual::original(image), refreshes: 0 };
        self.slots.borrow_mut().insert(token, slot);
    }

    /// Remove a token from the canvas.
    pub fn remove_token(&self, token: &TokenId) -> bool {
        self.slots.borrow_mut().remove(token).is_some()
    }

    /// How many times a token was asked to redraw.
    pub fn refresh_count(&self, token: &TokenId) -> u64 {
        self.slots.borrow().get(token).map_or(0, |slot| slot.refreshes)
    }
}

impl Renderer for SoftwareRenderer {
    async fn load_texture(&self, path: &str) -> Result<Texture, RenderError> {
        if let Some(texture) = self.builtin.get(path) {
            return Ok(texture.clone());
        }

        let file = self.resolve(path);
        log::debug!("Loading texture {} from {}", path, file.display());
        let bytes = tokio::fs::read(&file)
            .await
            .map_err(|source| RenderError::Io { path: path.to_string(), source })?;
        let decoded = image::load_from_memory(&bytes)
            .map_err(|source| RenderError::Decode { path: path.to_string(), source })?;
        Ok(Texture::new(decoded.to_rgba8()))
    }

    fn render_to_texture(&self, scene: &Container) -> Result<Texture, RenderError> {
        let image: RgbaImage = rasterize(scene);
        if image.width() == 0 || image.height() == 0 {
            return Err(RenderError::EmptyScene);
        }
        Ok(Texture::new(image))
    }

    fn tokens(&self) -> Vec<TokenId> {
        self.slots.borrow().keys().cloned().collect()
    }

    fn actor_of(&self, token: &TokenId) -> Option<ActorId> {
        self.slots.borrow().get(token).map(|slot| slot.actor.clone())
    }

    fn displayed(&self, token: &TokenId) -> Option<TokenVisual> {
        self.slots.borrow().get(token).map(|slot| slot.visual.clone())
    }

    fn set_displayed_image(&self, token: &TokenId, visual: TokenVisual) -> Result<(), RenderError> {
        let mut slots = self.slots.borrow_mut();
        let slot = slots.get_mut(token).ok_or_else(|| RenderError::UnknownToken(token.clone()))?;
        slot.visual = visual;
        Ok(())
    }

    fn refresh(&self, token: &TokenId) {
        if let Some(slot) = self.slots.borrow_mut().get_mut(token) {
            slot.refreshes += 1;
        }
    }
}
