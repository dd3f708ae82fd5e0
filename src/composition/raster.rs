//! Software rasterization of a [`Container`] into a single image

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use std::borrow::Cow;

use super::blend::blit_sprite;
use super::scene::Container;

/// Rasterize a container.
///
/// The output covers the container's bounds, so a sprite at the top-left of
/// the bounds lands at pixel `(0, 0)`. Sprites are drawn in z order, scaled
/// with bilinear filtering when their drawn size differs from the texture.
/// An empty container yields a 0x0 image.
pub fn rasterize(container: &Container) -> RgbaImage {
    let Some(bounds) = container.bounds() else {
        return RgbaImage::new(0, 0);
    };

    let width = bounds.width.ceil().max(0.0) as u32;
    let height = bounds.height.ceil().max(0.0) as u32;
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));

    for sprite in container.draw_order() {
        if sprite.texture.is_empty() {
            continue;
        }

        let target_w = sprite.width.round().max(0.0) as u32;
        let target_h = sprite.height.round().max(0.0) as u32;
        if target_w == 0 || target_h == 0 {
            continue;
        }

        let source = sprite.texture.pixels();
        let scaled: Cow<'_, RgbaImage> = if source.dimensions() == (target_w, target_h) {
            Cow::Borrowed(source)
        } else {
            Cow::Owned(imageops::resize(source, target_w, target_h, FilterType::Triangle))
        };

        let x = (sprite.x - bounds.x).round() as i64;
        let y = (sprite.y - bounds.y).round() as i64;
        blit_sprite(&mut canvas, &scaled, x, y);
    }

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::scene::Sprite;
    use crate::texture::Texture;

    fn solid(w: u32, h: u32, color: [u8; 4]) -> Texture {
        Texture::new(RgbaImage::from_pixel(w, h, Rgba(color)))
    }

    #[test]
    fn test_empty_container() {
        let image = rasterize(&Container::new());
        assert_eq!(image.dimensions(), (0, 0));
    }

    #[test]
    fn test_scaled_background_covers_canvas() {
        let mut container = Container::new();
        container.add_child(Sprite::new(solid(2, 2, [0, 255, 0, 255])).sized(8.0, 8.0));

        let image = rasterize(&container);
        assert_eq!(image.dimensions(), (8, 8));
        assert!(image.pixels().all(|p| *p == Rgba([0, 255, 0, 255])));
    }

    #[test]
    fn test_higher_z_draws_on_top() {
        let mut container = Container::new();
        container.add_child(Sprite::new(solid(2, 2, [255, 0, 0, 255])).at(1.0, 1.0));
        container.add_child(Sprite::new(solid(4, 4, [0, 0, 255, 255])).with_z_index(-1));

        let image = rasterize(&container);
        assert_eq!(*image.get_pixel(0, 0), Rgba([0, 0, 255, 255]));
        assert_eq!(*image.get_pixel(1, 1), Rgba([255, 0, 0, 255]));
        assert_eq!(*image.get_pixel(3, 3), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_output_is_relative_to_bounds() {
        let mut container = Container::new();
        container.add_child(Sprite::new(solid(2, 2, [1, 2, 3, 255])).at(10.0, 20.0));

        let image = rasterize(&container);
        assert_eq!(image.dimensions(), (2, 2));
        assert_eq!(*image.get_pixel(0, 0), Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn test_empty_texture_is_skipped() {
        let mut container = Container::new();
        container.add_child(Sprite::new(solid(3, 3, [5, 5, 5, 255])));
        container.add_child(Sprite::new(Texture::new(RgbaImage::new(0, 0))).sized(3.0, 3.0));

        let image = rasterize(&container);
        assert!(image.pixels().all(|p| *p == Rgba([5, 5, 5, 255])));
    }
}
