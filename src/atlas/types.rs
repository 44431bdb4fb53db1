use image::{GrayImage, RgbaImage};

use crate::sprite::PackedSprite;

/// A packed texture atlas
#[derive(Debug, Clone)]
pub struct AtlasCanvas {
    /// Atlas index within its packing session
    pub index: usize,
    /// Atlas width
    pub width: u32,
    /// Atlas height
    pub height: u32,
    /// Rendered atlas pixels
    pub image: RgbaImage,
    /// Alpha mask plane, present when mask generation is enabled
    pub mask: Option<GrayImage>,
    /// Sprites in placement order
    pub sprites: Vec<PackedSprite>,
}

impl AtlasCanvas {
    pub fn new(index: usize, width: u32, height: u32) -> Self {
        Self {
            index,
            width,
            height,
            image: RgbaImage::new(width, height),
            mask: None,
            sprites: Vec::new(),
        }
    }

    /// Look up a sprite by its logical path
    pub fn sprite(&self, name: &str) -> Option<&PackedSprite> {
        self.sprites.iter().find(|s| s.name == name)
    }

    /// Total pixel area covered by sprites
    pub fn used_area(&self) -> u64 {
        self.sprites.iter().map(|s| s.rect.area()).sum()
    }

    /// Share of the canvas covered by sprites (0.0 to 1.0)
    pub fn occupancy(&self) -> f64 {
        let total = u64::from(self.width) * u64::from(self.height);
        if total == 0 {
            return 0.0;
        }
        self.used_area() as f64 / total as f64
    }
}
