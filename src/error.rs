use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PackError {
    #[error("Failed to load image '{path}': {source}")]
    ImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Image '{path}' is not a PNG file")]
    NotPng { path: PathBuf },

    #[error("Failed to save image '{path}': {source}")]
    ImageSave {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("No valid images found in input")]
    NoImages,

    #[error(
        "Sprite '{name}' ({width}x{height}) exceeds maximum atlas size ({max_width}x{max_height})"
    )]
    SpriteTooLarge {
        name: String,
        width: u32,
        height: u32,
        max_width: u32,
        max_height: u32,
    },

    #[error("Sprite '{0}' has zero width or height")]
    EmptyImage(String),

    #[error("Sprite '{0}' was already added to this session")]
    DuplicateImage(String),

    #[error("Sprite '{0}' is marked notouch and cannot be packed")]
    Untouchable(String),

    #[error("Sprite name for '{path}' is {len} bytes, atlas files allow at most 65535")]
    NameTooLong { path: PathBuf, len: usize },

    #[error("Failed to write atlas '{path}': {source}")]
    AtlasWrite { path: PathBuf, source: FormatError },

    #[error("Failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Input path does not exist: {0}")]
    InputNotFound(PathBuf),
}

/// Errors raised while encoding or decoding the binary atlas container.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unexpected end of data while reading {0}")]
    Truncated(&'static str),

    #[error("Unknown pixel format tag {0}")]
    UnknownPixelFormat(u32),

    #[error("Sprite name is {0} bytes, the format allows at most 65535")]
    NameTooLong(usize),

    #[error("Atlas holds {0} sprites, the format allows at most 4294967295")]
    TooManySprites(usize),

    #[error("Sprite name is not valid UTF-8")]
    InvalidName,

    #[error("Sprite '{name}' at ({x}, {y}) {width}x{height} lies outside the {atlas_width}x{atlas_height} atlas")]
    SpriteOutOfBounds {
        name: String,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        atlas_width: u32,
        atlas_height: u32,
    },

    #[error("Pixel payload for a {width}x{height} atlas does not fit in memory")]
    PayloadTooLarge { width: u32, height: u32 },

    #[error("Pixel buffer holds {actual} bytes, expected {expected}")]
    PayloadSize { expected: usize, actual: usize },

    #[error("{0} unexpected bytes after the atlas record")]
    TrailingData(u64),
}
