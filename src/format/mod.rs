//! Binary atlas container.
//!
//! Every integer is big-endian. A record is laid out as:
//!
//! ```text
//! u32 width
//! u32 height
//! u32 pixel format tag
//! u32 sprite count
//! sprite count times:
//!     u16 name length, name bytes (UTF-8)
//!     u32 x, u32 y, u32 width, u32 height
//! width * height * bytes-per-pixel payload bytes, row-major
//! ```
//!
//! Format tag 0 is plain RGBA8. Tag 1 appends an 8-bit mask plane after the
//! RGBA rows, so its payload is `width * height * 4` RGBA bytes followed by
//! `width * height` mask bytes.

mod reader;
mod writer;

pub use reader::read_atlas;
pub use writer::{encode_atlas, write_atlas};

use crate::atlas::AtlasCanvas;
use crate::error::FormatError;

/// Size of the fixed header in bytes
pub const HEADER_LEN: usize = 16;

/// Longest sprite name the u16 length prefix can describe
pub const MAX_NAME_LEN: usize = u16::MAX as usize;

/// Pixel layout of an atlas payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 4 bytes per pixel
    Rgba8,
    /// RGBA8 rows followed by an A8 mask plane
    Rgba8Masked,
}

impl PixelFormat {
    pub fn tag(self) -> u32 {
        match self {
            PixelFormat::Rgba8 => 0,
            PixelFormat::Rgba8Masked => 1,
        }
    }

    pub fn from_tag(tag: u32) -> Result<Self, FormatError> {
        match tag {
            0 => Ok(PixelFormat::Rgba8),
            1 => Ok(PixelFormat::Rgba8Masked),
            other => Err(FormatError::UnknownPixelFormat(other)),
        }
    }

    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgba8 => 4,
            PixelFormat::Rgba8Masked => 5,
        }
    }

    /// The format an atlas is written in
    pub fn of(atlas: &AtlasCanvas) -> Self {
        if atlas.mask.is_some() {
            PixelFormat::Rgba8Masked
        } else {
            PixelFormat::Rgba8
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PixelFormat::Rgba8 => "rgba8",
            PixelFormat::Rgba8Masked => "rgba8+a8",
        }
    }
}

/// Payload length in bytes for a `width` x `height` atlas
pub fn payload_len(width: u32, height: u32, format: PixelFormat) -> Result<usize, FormatError> {
    let too_large = || FormatError::PayloadTooLarge { width, height };
    let w = usize::try_from(width).map_err(|_e| too_large())?;
    let h = usize::try_from(height).map_err(|_e| too_large())?;
    w.checked_mul(h)
        .and_then(|n| n.checked_mul(format.bytes_per_pixel()))
        .ok_or_else(too_large)
}
