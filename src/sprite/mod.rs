mod classify;
mod loader;
mod sprite;

pub use classify::{
    Classification, MASK_MARKER, NO_TOUCH_MARKER, PACK_ALONE_MARKER, classify, flags_for,
};
pub use loader::{IntakeReport, load_image, load_images, scan_inputs};
pub use sprite::{ImageEntry, ImageFlags, PackedSprite, SourceImage};
