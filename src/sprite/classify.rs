use super::ImageFlags;

/// Marker for images that are copied through and never packed
pub const NO_TOUCH_MARKER: &str = "notouch_";
/// Marker for images that always get an atlas to themselves
pub const PACK_ALONE_MARKER: &str = "nopack_";
/// Marker for images whose alpha goes into the mask plane
pub const MASK_MARKER: &str = "mask_";

/// How the intake stage treats an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Shares atlases with other sprites
    Pack,
    /// Sole occupant of its own atlas
    PackAlone,
    /// Left for the outer build step to copy untouched
    Skip,
}

/// Classify a logical path by its naming markers.
///
/// `notouch_` takes precedence over `nopack_`.
pub fn classify(name: &str) -> Classification {
    if name.contains(NO_TOUCH_MARKER) {
        Classification::Skip
    } else if name.contains(PACK_ALONE_MARKER) {
        Classification::PackAlone
    } else {
        Classification::Pack
    }
}

/// Derive the full flag set for a logical path
pub fn flags_for(name: &str) -> ImageFlags {
    let class = classify(name);
    ImageFlags {
        pack_alone: class == Classification::PackAlone,
        no_touch: class == Classification::Skip,
        needs_mask: name.contains(MASK_MARKER),
    }
}
