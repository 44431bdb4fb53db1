use std::path::Path;

use anyhow::Result;
use image::ImageFormat;

use crate::atlas::AtlasCanvas;
use crate::error::PackError;

/// Save the atlas pixels as a PNG for eyeballing the layout.
///
/// When the atlas has a mask plane, it is saved alongside as
/// `{stem}_mask.png`.
pub fn save_preview(atlas: &AtlasCanvas, path: &Path) -> Result<()> {
    atlas
        .image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| PackError::ImageSave {
            path: path.to_path_buf(),
            source: e,
        })?;

    if let Some(mask) = &atlas.mask {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mask_path = path.with_file_name(format!("{}_mask.png", stem));
        mask.save_with_format(&mask_path, ImageFormat::Png)
            .map_err(|e| PackError::ImageSave {
                path: mask_path.clone(),
                source: e,
            })?;
    }

    Ok(())
}
