//! Geometry of the squad decoration
//!
//! The token's icon is centered in a `size x size` cell, where `size` is the
//! larger of its two dimensions. Four cells form a 2x2 grid with half a cell
//! of margin on the top-left, all drawn over a background scaled to
//! `3.5 * size` on both axes.

use super::scene::{Container, Sprite};
use crate::texture::Texture;

/// Background edge length, as a multiple of the icon cell size.
pub const BACKGROUND_SCALE: f32 = 3.5;

/// Z-index of the background frame. Icons sit at the default of 0.
pub const BACKGROUND_Z_INDEX: i32 = -1;

/// Cell size and centering offsets computed from an icon's dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SquadLayout {
    /// Edge of the square cell holding one icon.
    pub size: f32,
    /// Horizontal offset that centers the icon in its cell.
    pub dx: f32,
    /// Vertical offset that centers the icon in its cell.
    pub dy: f32,
}

impl SquadLayout {
    pub fn for_icon(width: u32, height: u32) -> Self {
        let size = width.max(height) as f32;
        Self { size, dx: (size - width as f32) / 2.0, dy: (size - height as f32) / 2.0 }
    }

    /// Edge length of the scaled background.
    pub fn background_size(&self) -> f32 {
        self.size * BACKGROUND_SCALE
    }

    /// Top-left corners of the four icon copies, row by row.
    pub fn tile_origins(&self) -> [(f32, f32); 4] {
        let near = self.size / 2.0;
        let far = self.size * 2.0;
        [
            (near + self.dx, near + self.dy),
            (far + self.dx, near + self.dy),
            (near + self.dx, far + self.dy),
            (far + self.dx, far + self.dy),
        ]
    }
}

/// Build the squad scene for `icon` over `background`.
pub fn squad_scene(icon: &Texture, background: &Texture) -> Container {
    let layout = SquadLayout::for_icon(icon.width(), icon.height());
    let edge = layout.background_size();

    let mut container = Container::new();
    container.add_child(
        Sprite::new(background.clone()).sized(edge, edge).with_z_index(BACKGROUND_Z_INDEX),
    );
    for (x, y) in layout.tile_origins() {
        container.add_child(Sprite::new(icon.clone()).at(x, y));
    }
    container
}
