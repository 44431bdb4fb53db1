use std::io::Write;

use super::{HEADER_LEN, MAX_NAME_LEN, PixelFormat, payload_len};
use crate::atlas::AtlasCanvas;
use crate::error::FormatError;

/// Write one atlas record to `writer`.
///
/// The atlas is validated before the first byte is written, so a malformed
/// atlas never leaves a partial record behind. I/O errors can still cut a
/// record short; callers must not treat the sink as valid in that case.
pub fn write_atlas<W: Write>(writer: &mut W, atlas: &AtlasCanvas) -> Result<(), FormatError> {
    let format = PixelFormat::of(atlas);
    validate(atlas, format)?;

    let count = u32::try_from(atlas.sprites.len())
        .map_err(|_e| FormatError::TooManySprites(atlas.sprites.len()))?;

    let mut header = [0u8; HEADER_LEN];
    header[0..4].copy_from_slice(&atlas.width.to_be_bytes());
    header[4..8].copy_from_slice(&atlas.height.to_be_bytes());
    header[8..12].copy_from_slice(&format.tag().to_be_bytes());
    header[12..16].copy_from_slice(&count.to_be_bytes());
    writer.write_all(&header)?;

    for sprite in &atlas.sprites {
        let name = sprite.name.as_bytes();
        let name_len =
            u16::try_from(name.len()).map_err(|_e| FormatError::NameTooLong(name.len()))?;

        writer.write_all(&name_len.to_be_bytes())?;
        writer.write_all(name)?;
        writer.write_all(&sprite.rect.x.to_be_bytes())?;
        writer.write_all(&sprite.rect.y.to_be_bytes())?;
        writer.write_all(&sprite.rect.width.to_be_bytes())?;
        writer.write_all(&sprite.rect.height.to_be_bytes())?;
    }

    writer.write_all(atlas.image.as_raw())?;
    if let Some(mask) = &atlas.mask {
        writer.write_all(mask.as_raw())?;
    }

    Ok(())
}

/// Encode one atlas record into memory
pub fn encode_atlas(atlas: &AtlasCanvas) -> Result<Vec<u8>, FormatError> {
    let mut buf = Vec::new();
    write_atlas(&mut buf, atlas)?;
    Ok(buf)
}

fn validate(atlas: &AtlasCanvas, format: PixelFormat) -> Result<(), FormatError> {
    for sprite in &atlas.sprites {
        if sprite.name.len() > MAX_NAME_LEN {
            return Err(FormatError::NameTooLong(sprite.name.len()));
        }
        if !sprite.rect.within(atlas.width, atlas.height) {
            return Err(FormatError::SpriteOutOfBounds {
                name: sprite.name.clone(),
                x: sprite.rect.x,
                y: sprite.rect.y,
                width: sprite.rect.width,
                height: sprite.rect.height,
                atlas_width: atlas.width,
                atlas_height: atlas.height,
            });
        }
    }

    let expected = payload_len(atlas.width, atlas.height, format)?;
    let actual = atlas.image.as_raw().len() + atlas.mask.as_ref().map_or(0, |m| m.as_raw().len());
    let dims_match = atlas.image.dimensions() == (atlas.width, atlas.height)
        && atlas
            .mask
            .as_ref()
            .is_none_or(|m| m.dimensions() == (atlas.width, atlas.height));

    if !dims_match || actual != expected {
        return Err(FormatError::PayloadSize { expected, actual });
    }

    Ok(())
}
