use log::{info, warn};

use super::{AtlasCanvas, PackingSession};
use crate::cli::MaskMode;
use crate::error::PackError;
use crate::sprite::{ImageFlags, SourceImage};

/// Configuration for atlas building
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasBuilder {
    pub max_width: u32,
    pub max_height: u32,
    pub padding: u32,
    pub mask: MaskMode,
    pub shrink_to_fit: bool,
    pub power_of_two: bool,
}

/// Everything a full packing run produced
#[derive(Debug, Default)]
pub struct PackOutcome {
    /// Atlases in the order they were packed
    pub atlases: Vec<AtlasCanvas>,
    /// Images that were refused and appear in no atlas
    pub rejected: Vec<PackError>,
}

impl Default for AtlasBuilder {
    fn default() -> Self {
        Self::new(1024, 1024)
    }
}

impl AtlasBuilder {
    pub fn new(max_width: u32, max_height: u32) -> Self {
        Self {
            max_width,
            max_height,
            padding: 1,
            mask: MaskMode::Off,
            shrink_to_fit: false,
            power_of_two: false,
        }
    }

    pub fn padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    pub fn mask(mut self, mask: MaskMode) -> Self {
        self.mask = mask;
        self
    }

    pub fn shrink_to_fit(mut self, shrink: bool) -> Self {
        self.shrink_to_fit = shrink;
        self
    }

    pub fn power_of_two(mut self, pot: bool) -> Self {
        self.power_of_two = pot;
        self
    }

    /// Whether an image with these flags gets its alpha rendered into the mask
    pub fn wants_mask(&self, flags: ImageFlags) -> bool {
        match self.mask {
            MaskMode::Off => false,
            MaskMode::Flagged => flags.needs_mask,
            MaskMode::All => true,
        }
    }

    /// Final canvas size for placements whose extent reaches `used_w` x `used_h`
    pub fn canvas_size(&self, used_w: u32, used_h: u32) -> (u32, u32) {
        if !self.shrink_to_fit {
            return (self.max_width, self.max_height);
        }

        let (w, h) = if self.power_of_two {
            (next_power_of_two(used_w), next_power_of_two(used_h))
        } else {
            (used_w.max(1), used_h.max(1))
        };
        (w.min(self.max_width), h.min(self.max_height))
    }

    /// Start an empty packing session with these settings
    pub fn session(&self) -> PackingSession {
        PackingSession::new(self.clone())
    }

    /// Pack every image, returning all atlases plus the images that were refused
    pub fn build(&self, images: Vec<SourceImage>) -> PackOutcome {
        let mut session = self.session();
        let mut outcome = PackOutcome::default();

        for image in images {
            if let Err(e) = session.add_image(image) {
                warn!("Skipping image: {}", e);
                outcome.rejected.push(e);
            }
        }

        while let Some(atlas) = session.pack_images() {
            outcome.atlases.push(atlas);
        }

        info!(
            "Created {} atlas(es) with {} total sprites",
            outcome.atlases.len(),
            outcome.atlases.iter().map(|a| a.sprites.len()).sum::<usize>()
        );

        outcome
    }
}

fn next_power_of_two(n: u32) -> u32 {
    if n == 0 {
        return 1;
    }
    let mut v = n - 1;
    v |= v >> 1;
    v |= v >> 2;
    v |= v >> 4;
    v |= v >> 8;
    v |= v >> 16;
    v.saturating_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packing::Rect;
    use image::{Rgba, RgbaImage};
    use std::collections::HashMap;

    fn solid(name: &str, w: u32, h: u32) -> SourceImage {
        let mut img = RgbaImage::new(w, h);
        for pixel in img.pixels_mut() {
            *pixel = Rgba([255, 0, 0, 255]);
        }
        SourceImage::from_image(name, img, ImageFlags::default())
    }

    fn assert_valid(atlases: &[AtlasCanvas]) {
        for atlas in atlases {
            for (i, a) in atlas.sprites.iter().enumerate() {
                assert!(
                    a.rect.within(atlas.width, atlas.height),
                    "{} out of bounds",
                    a.name
                );
                for b in &atlas.sprites[i + 1..] {
                    assert!(
                        !a.rect.intersects(&b.rect),
                        "{} overlaps {}",
                        a.name,
                        b.name
                    );
                }
            }
        }
    }

    #[test]
    fn test_next_power_of_two() {
        assert_eq!(next_power_of_two(0), 1);
        assert_eq!(next_power_of_two(1), 1);
        assert_eq!(next_power_of_two(2), 2);
        assert_eq!(next_power_of_two(3), 4);
        assert_eq!(next_power_of_two(5), 8);
        assert_eq!(next_power_of_two(100), 128);
        assert_eq!(next_power_of_two(1000), 1024);
    }

    #[test]
    fn test_large_image_fills_its_own_atlas() {
        let images = vec![
            solid("a", 64, 64),
            solid("b", 64, 64),
            solid("c", 128, 128),
            solid("d", 32, 32),
            solid("e", 256, 256),
        ];

        let outcome = AtlasBuilder::new(256, 256).build(images);

        assert!(outcome.rejected.is_empty());
        assert_eq!(outcome.atlases.len(), 2);
        assert_valid(&outcome.atlases);

        let first = &outcome.atlases[0];
        assert_eq!(first.sprites.len(), 1);
        assert_eq!(first.sprites[0].name, "e");
        assert_eq!(first.sprites[0].rect, Rect::new(0, 0, 256, 256));

        let second = &outcome.atlases[1];
        let mut names: Vec<_> = second.sprites.iter().map(|s| s.name.as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
        assert_eq!(second.used_area(), 25600);
    }

    #[test]
    fn test_oversize_image_is_reported_and_excluded() {
        let outcome = AtlasBuilder::new(256, 256).build(vec![solid("huge", 300, 300)]);

        assert!(outcome.atlases.is_empty());
        assert_eq!(outcome.rejected.len(), 1);
        assert!(matches!(
            &outcome.rejected[0],
            PackError::SpriteTooLarge { name, width: 300, height: 300, .. } if name == "huge"
        ));
    }

    #[test]
    fn test_oversize_in_one_axis_only() {
        let outcome = AtlasBuilder::new(256, 256).build(vec![
            solid("wide", 257, 10),
            solid("ok", 10, 10),
        ]);

        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.atlases.len(), 1);
        assert_eq!(outcome.atlases[0].sprites[0].name, "ok");
    }

    #[test]
    fn test_empty_input_yields_no_atlases() {
        let outcome = AtlasBuilder::new(256, 256).build(Vec::new());
        assert!(outcome.atlases.is_empty());
        assert!(outcome.rejected.is_empty());
    }

    #[test]
    fn test_every_image_placed_exactly_once() {
        let mut images = Vec::new();
        for i in 0..60u32 {
            let w = 8 + (i * 37) % 90;
            let h = 8 + (i * 53) % 70;
            images.push(solid(&format!("sprite_{}", i), w, h));
        }

        let outcome = AtlasBuilder::new(256, 256).build(images);

        assert!(outcome.rejected.is_empty());
        assert!(outcome.atlases.len() > 1);
        assert_valid(&outcome.atlases);

        let mut seen: HashMap<String, usize> = HashMap::new();
        for atlas in &outcome.atlases {
            for sprite in &atlas.sprites {
                *seen.entry(sprite.name.clone()).or_default() += 1;
            }
        }
        assert_eq!(seen.len(), 60);
        assert!(seen.values().all(|&n| n == 1));
    }

    #[test]
    fn test_packing_is_deterministic() {
        let make = || {
            (0..40u32)
                .map(|i| solid(&format!("s{}", i), 5 + (i * 13) % 60, 5 + (i * 29) % 45))
                .collect::<Vec<_>>()
        };

        let first = AtlasBuilder::new(128, 128).build(make());
        let mut reversed = make();
        reversed.reverse();
        let second = AtlasBuilder::new(128, 128).build(reversed);

        assert_eq!(first.atlases.len(), second.atlases.len());
        for (a, b) in first.atlases.iter().zip(&second.atlases) {
            assert_eq!(a.sprites, b.sprites);
            assert_eq!(a.image, b.image);
        }
    }

    #[test]
    fn test_shrink_to_fit_with_power_of_two() {
        let outcome = AtlasBuilder::new(1024, 1024)
            .padding(0)
            .shrink_to_fit(true)
            .power_of_two(true)
            .build(vec![solid("a", 100, 60), solid("b", 20, 20)]);

        let atlas = &outcome.atlases[0];
        assert_eq!((atlas.width, atlas.height), (128, 64));
        assert_valid(&outcome.atlases);
    }

    #[test]
    fn test_shrink_never_exceeds_maximum() {
        let builder = AtlasBuilder::new(300, 200).shrink_to_fit(true).power_of_two(true);
        assert_eq!(builder.canvas_size(290, 150), (300, 200));
        assert_eq!(builder.canvas_size(10, 10), (16, 16));
    }

    #[test]
    fn test_pixels_are_copied_verbatim() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([10, 20, 30, 40]));
        img.put_pixel(1, 0, Rgba([50, 60, 70, 0]));
        let image = SourceImage::from_image("semi", img, ImageFlags::default());

        let outcome = AtlasBuilder::new(16, 16).build(vec![image]);
        let atlas = &outcome.atlases[0];
        let rect = atlas.sprite("semi").unwrap().rect;

        assert_eq!(atlas.image.get_pixel(rect.x, rect.y), &Rgba([10, 20, 30, 40]));
        assert_eq!(atlas.image.get_pixel(rect.x + 1, rect.y), &Rgba([50, 60, 70, 0]));
    }
}
