mod file;
mod json;
mod preview;

pub use file::{atlas_filename, load_atlas, save_atlas};
pub use json::write_manifest;
pub use preview::save_preview;
