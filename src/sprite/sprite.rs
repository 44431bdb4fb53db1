use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::packing::Rect;

/// Per-image packing flags derived from naming markers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageFlags {
    /// Gets an atlas of its own
    pub pack_alone: bool,
    /// Excluded from packing entirely
    pub no_touch: bool,
    /// Alpha is rendered into the atlas mask plane
    pub needs_mask: bool,
}

/// A logical path paired with the physical file backing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEntry {
    /// Identifier used for lookups in the packed atlas
    pub name: String,
    /// File on disk
    pub path: PathBuf,
}

impl ImageEntry {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// A decoded image waiting to be packed
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// Logical path, unique within a packing session
    pub name: String,
    /// Original file path
    pub path: PathBuf,
    /// RGBA8 pixels
    pub image: RgbaImage,
    pub flags: ImageFlags,
}

impl SourceImage {
    /// Build an image that did not come from disk
    pub fn from_image(name: impl Into<String>, image: RgbaImage, flags: ImageFlags) -> Self {
        let name = name.into();
        Self {
            path: PathBuf::from(&name),
            name,
            image,
            flags,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// A sprite's placement inside an atlas
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedSprite {
    /// Logical path of the source image
    pub name: String,
    /// Rectangle occupied in the atlas
    pub rect: Rect,
}
