use image::{GrayImage, Luma, RgbaImage};

use crate::packing::Rect;

/// Render the alpha channel of `atlas` inside `rects` into a mask plane.
///
/// The plane has the atlas dimensions; pixels outside every rect stay 0.
/// Rects must lie within the atlas.
pub fn render_mask(atlas: &RgbaImage, rects: &[Rect]) -> GrayImage {
    let mut mask = GrayImage::new(atlas.width(), atlas.height());

    for rect in rects {
        for y in rect.y..rect.y + rect.height {
            for x in rect.x..rect.x + rect.width {
                let alpha = atlas.get_pixel(x, y)[3];
                mask.put_pixel(x, y, Luma([alpha]));
            }
        }
    }

    mask
}
