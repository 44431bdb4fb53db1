use std::io::{ErrorKind, Read};

use image::{GrayImage, RgbaImage};

use super::{PixelFormat, payload_len};
use crate::atlas::AtlasCanvas;
use crate::error::FormatError;
use crate::packing::Rect;
use crate::sprite::PackedSprite;

/// Read one atlas record from `reader`.
///
/// Exactly one record is consumed, so several records can be read back to
/// back from the same stream. Any short read is fatal. The returned atlas
/// always has index 0; the record does not carry one.
pub fn read_atlas<R: Read>(reader: &mut R) -> Result<AtlasCanvas, FormatError> {
    let width = read_u32(reader, "header")?;
    let height = read_u32(reader, "header")?;
    let format = PixelFormat::from_tag(read_u32(reader, "header")?)?;
    let count = read_u32(reader, "header")?;

    let mut sprites = Vec::new();
    for _ in 0..count {
        sprites.push(read_entry(reader, width, height)?);
    }

    let rgba_len = payload_len(width, height, PixelFormat::Rgba8)?;
    let mut payload = read_bytes(reader, payload_len(width, height, format)?, "pixel payload")?;
    let mask_bytes = payload.split_off(rgba_len);

    let image = RgbaImage::from_raw(width, height, payload).ok_or(FormatError::PayloadSize {
        expected: rgba_len,
        actual: 0,
    })?;

    let mask = match format {
        PixelFormat::Rgba8 => None,
        PixelFormat::Rgba8Masked => {
            let len = mask_bytes.len();
            Some(
                GrayImage::from_raw(width, height, mask_bytes).ok_or(FormatError::PayloadSize {
                    expected: rgba_len / 4,
                    actual: len,
                })?,
            )
        }
    };

    Ok(AtlasCanvas {
        index: 0,
        width,
        height,
        image,
        mask,
        sprites,
    })
}

fn read_entry<R: Read>(reader: &mut R, width: u32, height: u32) -> Result<PackedSprite, FormatError> {
    let name_len = read_u16(reader, "sprite directory")?;
    let name_bytes = read_bytes(reader, usize::from(name_len), "sprite directory")?;
    let name = String::from_utf8(name_bytes).map_err(|_e| FormatError::InvalidName)?;

    let rect = Rect::new(
        read_u32(reader, "sprite directory")?,
        read_u32(reader, "sprite directory")?,
        read_u32(reader, "sprite directory")?,
        read_u32(reader, "sprite directory")?,
    );

    if !rect.within(width, height) {
        return Err(FormatError::SpriteOutOfBounds {
            name,
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            atlas_width: width,
            atlas_height: height,
        });
    }

    Ok(PackedSprite { name, rect })
}

fn read_u32<R: Read>(reader: &mut R, section: &'static str) -> Result<u32, FormatError> {
    let mut buf = [0u8; 4];
    read_exact(reader, &mut buf, section)?;
    Ok(u32::from_be_bytes(buf))
}

fn read_u16<R: Read>(reader: &mut R, section: &'static str) -> Result<u16, FormatError> {
    let mut buf = [0u8; 2];
    read_exact(reader, &mut buf, section)?;
    Ok(u16::from_be_bytes(buf))
}

fn read_exact<R: Read>(
    reader: &mut R,
    buf: &mut [u8],
    section: &'static str,
) -> Result<(), FormatError> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => FormatError::Truncated(section),
        _ => FormatError::Io(e),
    })
}

/// Read `len` bytes, growing the buffer as data arrives rather than trusting
/// the declared length up front
fn read_bytes<R: Read>(
    reader: &mut R,
    len: usize,
    section: &'static str,
) -> Result<Vec<u8>, FormatError> {
    let mut buf = Vec::new();
    let limit = u64::try_from(len).map_err(|_e| FormatError::Truncated(section))?;
    reader.take(limit).read_to_end(&mut buf)?;

    if buf.len() != len {
        return Err(FormatError::Truncated(section));
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::encode_atlas;
    use image::Rgba;

    fn sample_bytes() -> Vec<u8> {
        let mut atlas = AtlasCanvas::new(0, 4, 2);
        for (x, y, pixel) in atlas.image.enumerate_pixels_mut() {
            *pixel = Rgba([x as u8, y as u8, 9, 255]);
        }
        atlas.sprites.push(PackedSprite {
            name: "left".to_string(),
            rect: Rect::new(0, 0, 2, 2),
        });
        atlas.sprites.push(PackedSprite {
            name: "right".to_string(),
            rect: Rect::new(2, 0, 2, 2),
        });
        encode_atlas(&atlas).unwrap()
    }

    /// Byte offset where the pixel payload starts in `sample_bytes`
    const PAYLOAD_START: usize = 16 + (2 + 4 + 16) + (2 + 5 + 16);

    #[test]
    fn test_reads_sample() {
        let bytes = sample_bytes();
        let atlas = read_atlas(&mut bytes.as_slice()).unwrap();

        assert_eq!((atlas.width, atlas.height), (4, 2));
        assert_eq!(atlas.sprites.len(), 2);
        assert_eq!(atlas.sprites[1].name, "right");
        assert_eq!(atlas.sprites[1].rect, Rect::new(2, 0, 2, 2));
        assert_eq!(atlas.image.get_pixel(3, 1), &Rgba([3, 1, 9, 255]));
        assert!(atlas.mask.is_none());
        assert_eq!(bytes.len(), PAYLOAD_START + 4 * 2 * 4);
    }

    #[test]
    fn test_truncated_header() {
        let bytes = sample_bytes();
        let err = read_atlas(&mut &bytes[..10]).unwrap_err();
        assert!(matches!(err, FormatError::Truncated("header")));
    }

    #[test]
    fn test_truncated_directory() {
        let bytes = sample_bytes();
        let err = read_atlas(&mut &bytes[..30]).unwrap_err();
        assert!(matches!(err, FormatError::Truncated("sprite directory")));
    }

    #[test]
    fn test_short_payload() {
        let bytes = sample_bytes();
        let err = read_atlas(&mut &bytes[..bytes.len() - 1]).unwrap_err();
        assert!(matches!(err, FormatError::Truncated("pixel payload")));
    }

    #[test]
    fn test_count_larger_than_directory() {
        let mut bytes = sample_bytes();
        bytes[12..16].copy_from_slice(&3u32.to_be_bytes());
        // The third "entry" is parsed out of pixel data and runs off the end
        assert!(read_atlas(&mut bytes.as_slice()).is_err());
    }

    #[test]
    fn test_huge_count_does_not_allocate_up_front() {
        let mut bytes = sample_bytes()[..PAYLOAD_START].to_vec();
        bytes[12..16].copy_from_slice(&u32::MAX.to_be_bytes());
        assert!(read_atlas(&mut bytes.as_slice()).is_err());
    }

    #[test]
    fn test_unknown_pixel_format() {
        let mut bytes = sample_bytes();
        bytes[8..12].copy_from_slice(&42u32.to_be_bytes());
        let err = read_atlas(&mut bytes.as_slice()).unwrap_err();
        assert!(matches!(err, FormatError::UnknownPixelFormat(42)));
    }

    #[test]
    fn test_invalid_utf8_name() {
        let mut bytes = sample_bytes();
        // First byte of "left"
        bytes[18] = 0xFF;
        let err = read_atlas(&mut bytes.as_slice()).unwrap_err();
        assert!(matches!(err, FormatError::InvalidName));
    }

    #[test]
    fn test_rect_outside_atlas() {
        let mut bytes = sample_bytes();
        // x of "left" moved to 3, so 3 + 2 > 4
        bytes[22..26].copy_from_slice(&3u32.to_be_bytes());
        let err = read_atlas(&mut bytes.as_slice()).unwrap_err();
        assert!(matches!(err, FormatError::SpriteOutOfBounds { .. }));
    }
}
