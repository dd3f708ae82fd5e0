//! Built-in background frame used when no background asset is installed

use image::{Rgba, RgbaImage};

/// Edge length of the built-in frame.
pub const FRAME_SIZE: u32 = 64;

const FRAME_BORDER: u32 = 4;
const FRAME_FILL: Rgba<u8> = Rgba([32, 36, 48, 200]);
const FRAME_EDGE: Rgba<u8> = Rgba([196, 160, 72, 255]);

/// Draw the default squad frame: a translucent slate fill with a gold border.
///
/// The frame is stretched to `3.5 * size` when composited, so it only needs
/// enough resolution to keep the border visible.
pub fn default_frame() -> RgbaImage {
    RgbaImage::from_fn(FRAME_SIZE, FRAME_SIZE, |x, y| {
        let edge = x < FRAME_BORDER
            || y < FRAME_BORDER
            || x >= FRAME_SIZE - FRAME_BORDER
            || y >= FRAME_SIZE - FRAME_BORDER;
        if edge {
            FRAME_EDGE
        } else {
            FRAME_FILL
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_border_and_fill() {
        let frame = default_frame();
        assert_eq!(frame.dimensions(), (FRAME_SIZE, FRAME_SIZE));
        assert_eq!(*frame.get_pixel(0, 0), FRAME_EDGE);
        assert_eq!(*frame.get_pixel(FRAME_SIZE - 1, FRAME_SIZE / 2), FRAME_EDGE);
        assert_eq!(*frame.get_pixel(FRAME_SIZE / 2, FRAME_SIZE / 2), FRAME_FILL);
    }
}
