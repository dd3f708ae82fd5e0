//! Textures and the provenance of a token's displayed image
//!
//! A [`Texture`] is an immutable RGBA image with a process-unique identity.
//! Cloning a texture clones the handle, not the pixels, so two handles compare
//! equal exactly when they refer to the same loaded or rendered image.
//!
//! [`TokenVisual`] records whether the image currently displayed by a token is
//! the token's own image or a generated squad composite. The back-reference of
//! a composite is a plain [`Texture`], so a composite can never point at
//! another composite.

use image::RgbaImage;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_TEXTURE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique texture identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextureId(u64);

impl fmt::Display for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A shared, immutable image.
#[derive(Clone)]
pub struct Texture {
    id: TextureId,
    pixels: Arc<RgbaImage>,
}

impl Texture {
    /// Wrap pixels in a new texture with a fresh identity.
    pub fn new(pixels: RgbaImage) -> Self {
        let id = TextureId(NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed));
        Self { id, pixels: Arc::new(pixels) }
    }

    pub fn id(&self) -> TextureId {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// True when the texture has no pixels to draw.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// True when both handles refer to the same image.
    pub fn same_as(&self, other: &Texture) -> bool {
        self.id == other.id
    }
}

impl PartialEq for Texture {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl Eq for Texture {}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Texture({} {}x{})", self.id, self.width(), self.height())
    }
}

/// Whether a displayed image is the token's own or a generated composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    Original,
    Composited,
}

/// The image a token currently displays, tagged with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenVisual {
    /// The token's own image.
    Original { image: Texture },
    /// A squad composite built from `source`.
    Composited { image: Texture, source: Texture },
}

impl TokenVisual {
    pub fn original(image: Texture) -> Self {
        TokenVisual::Original { image }
    }

    pub fn composited(image: Texture, source: Texture) -> Self {
        TokenVisual::Composited { image, source }
    }

    /// The image that is actually drawn.
    pub fn image(&self) -> &Texture {
        match self {
            TokenVisual::Original { image } | TokenVisual::Composited { image, .. } => image,
        }
    }

    /// The back-reference of a composite, if any.
    pub fn source(&self) -> Option<&Texture> {
        match self {
            TokenVisual::Original { .. } => None,
            TokenVisual::Composited { source, .. } => Some(source),
        }
    }

    /// A composite whose back-reference cannot be restored.
    ///
    /// This covers an empty source and a source that is the composite itself.
    pub fn is_inconsistent(&self) -> bool {
        match self {
            TokenVisual::Original { .. } => false,
            TokenVisual::Composited { image, source } => source.is_empty() || source.same_as(image),
        }
    }

    /// The original a revert would restore. `None` for originals and inconsistent composites.
    pub fn restorable_source(&self) -> Option<&Texture> {
        match self {
            TokenVisual::Composited { source, .. } if !self.is_inconsistent() => Some(source),
            _ => None,
        }
    }

    /// Provenance used for decisions. Inconsistent composites count as originals.
    pub fn provenance(&self) -> Provenance {
        match self {
            TokenVisual::Composited { .. } if !self.is_inconsistent() => Provenance::Composited,
            _ => Provenance::Original,
        }
    }
}
