//! Composable scene nodes that can be rasterized into a single texture

use crate::texture::Texture;

/// An image node placed in a [`Container`].
///
/// `width` and `height` are the drawn size; the texture is scaled to fit.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub texture: Texture,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Lower values are drawn first.
    pub z_index: i32,
}

impl Sprite {
    /// A sprite at the origin, drawn at the texture's native size.
    pub fn new(texture: Texture) -> Self {
        let width = texture.width() as f32;
        let height = texture.height() as f32;
        Self { texture, x: 0.0, y: 0.0, width, height, z_index: 0 }
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn sized(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }
}

/// Axis-aligned bounds in scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// A flat group of sprites.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Container {
    children: Vec<Sprite>,
}

impl Container {
    pub fn new() -> Self {
        Self { children: Vec::new() }
    }

    pub fn add_child(&mut self, sprite: Sprite) {
        self.children.push(sprite);
    }

    /// Children in insertion order.
    pub fn children(&self) -> &[Sprite] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Children sorted by `z_index`; ties keep insertion order.
    pub fn draw_order(&self) -> Vec<&Sprite> {
        let mut ordered: Vec<&Sprite> = self.children.iter().collect();
        ordered.sort_by_key(|s| s.z_index);
        ordered
    }

    /// Union of all children's rectangles, or `None` for an empty container.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut iter = self.children.iter();
        let first = iter.next()?;
        let (mut min_x, mut min_y) = (first.x, first.y);
        let (mut max_x, mut max_y) = (first.x + first.width, first.y + first.height);

        for sprite in iter {
            min_x = min_x.min(sprite.x);
            min_y = min_y.min(sprite.y);
            max_x = max_x.max(sprite.x + sprite.width);
            max_y = max_y.max(sprite.y + sprite.height);
        }

        Some(Bounds { x: min_x, y: min_y, width: max_x - min_x, height: max_y - min_y })
    }
}
