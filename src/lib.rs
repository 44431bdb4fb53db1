pub mod atlas;
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod output;
pub mod packing;
pub mod sprite;

pub use atlas::{AtlasBuilder, AtlasCanvas, PackOutcome, PackingSession};
pub use cli::{CliArgs, Command, MaskMode, PackArgs};
pub use error::{FormatError, PackError};
pub use format::{PixelFormat, read_atlas, write_atlas};
pub use sprite::{ImageEntry, ImageFlags, PackedSprite, SourceImage};
