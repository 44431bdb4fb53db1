use std::collections::HashSet;

use image::imageops;
use log::{debug, info};

use super::{AtlasBuilder, AtlasCanvas, render_mask};
use crate::cli::MaskMode;
use crate::error::PackError;
use crate::format::MAX_NAME_LEN;
use crate::packing::{GuillotinePacker, Rect};
use crate::sprite::{PackedSprite, SourceImage};

/// One packing run over a batch of images.
///
/// The session owns every image until it is placed. Each call to
/// [`pack_images`](Self::pack_images) fills one atlas and hands it out;
/// images that did not fit stay pending for the next call.
pub struct PackingSession {
    settings: AtlasBuilder,
    pending: Vec<SourceImage>,
    /// Every name ever accepted, placed or not
    names: HashSet<String>,
    next_index: usize,
}

impl PackingSession {
    pub fn new(settings: AtlasBuilder) -> Self {
        Self {
            settings,
            pending: Vec::new(),
            names: HashSet::new(),
            next_index: 0,
        }
    }

    /// Number of images waiting to be placed
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// True when no images remain to be placed
    pub fn all_done(&self) -> bool {
        self.pending.is_empty()
    }

    /// Queue an image for packing.
    ///
    /// Refuses images that can never be placed or written: larger than the
    /// atlas in either axis, empty, marked `notouch_`, named too long for the
    /// file format, or sharing a name with an image already seen by this
    /// session. A refused image is dropped.
    pub fn add_image(&mut self, image: SourceImage) -> Result<(), PackError> {
        let (width, height) = image.image.dimensions();

        if image.flags.no_touch {
            return Err(PackError::Untouchable(image.name));
        }
        if width == 0 || height == 0 {
            return Err(PackError::EmptyImage(image.name));
        }
        if width > self.settings.max_width || height > self.settings.max_height {
            return Err(PackError::SpriteTooLarge {
                name: image.name,
                width,
                height,
                max_width: self.settings.max_width,
                max_height: self.settings.max_height,
            });
        }
        if image.name.len() > MAX_NAME_LEN {
            return Err(PackError::NameTooLong {
                len: image.name.len(),
                path: image.path,
            });
        }
        if self.names.contains(&image.name) {
            return Err(PackError::DuplicateImage(image.name));
        }

        self.names.insert(image.name.clone());
        self.pending.push(image);
        Ok(())
    }

    /// Fill one atlas from the pending images.
    ///
    /// Returns `None` once nothing is pending. Pack-alone images are emitted
    /// first, each as the only sprite of its atlas.
    pub fn pack_images(&mut self) -> Option<AtlasCanvas> {
        if self.pending.is_empty() {
            return None;
        }

        let mut pending = std::mem::take(&mut self.pending);
        sort_largest_first(&mut pending);

        let (placed, deferred) = match pending.iter().position(|i| i.flags.pack_alone) {
            Some(pos) => {
                let image = pending.remove(pos);
                let rect = Rect::new(0, 0, image.width(), image.height());
                (vec![(image, rect)], pending)
            }
            None => self.place(pending),
        };

        if !deferred.is_empty() {
            debug!("{} image(s) deferred to the next atlas", deferred.len());
        }
        self.pending = deferred;

        let index = self.next_index;
        self.next_index += 1;
        Some(self.render(index, placed))
    }

    /// Single first-fit sweep; whatever does not fit is deferred
    fn place(&self, pending: Vec<SourceImage>) -> (Vec<(SourceImage, Rect)>, Vec<SourceImage>) {
        let mut packer = GuillotinePacker::new(
            self.settings.max_width,
            self.settings.max_height,
            self.settings.padding,
        );
        let mut placed: Vec<(SourceImage, Rect)> = Vec::new();
        let mut deferred = Vec::new();

        for image in pending {
            match packer.insert(image.width(), image.height()) {
                Some(rect) => {
                    debug_assert!(placed.iter().all(|(_, r)| !r.intersects(&rect)));
                    placed.push((image, rect));
                }
                None => deferred.push(image),
            }
        }

        (placed, deferred)
    }

    /// Copy placed pixels into a fresh canvas, then run the mask pass
    fn render(&self, index: usize, placed: Vec<(SourceImage, Rect)>) -> AtlasCanvas {
        let used_w = placed.iter().map(|(_, r)| r.x + r.width).max().unwrap_or(0);
        let used_h = placed.iter().map(|(_, r)| r.y + r.height).max().unwrap_or(0);
        let (width, height) = self.settings.canvas_size(used_w, used_h);

        let mut atlas = AtlasCanvas::new(index, width, height);
        let mut mask_rects = Vec::new();

        for (source, rect) in placed {
            imageops::replace(
                &mut atlas.image,
                &source.image,
                i64::from(rect.x),
                i64::from(rect.y),
            );

            if self.settings.wants_mask(source.flags) {
                mask_rects.push(rect);
            }
            debug!(
                "Placed {} from {} at ({}, {})",
                source.name,
                source.path.display(),
                rect.x,
                rect.y
            );

            // The source pixels are released here
            atlas.sprites.push(PackedSprite {
                name: source.name,
                rect,
            });
        }

        if self.settings.mask != MaskMode::Off {
            atlas.mask = Some(render_mask(&atlas.image, &mask_rects));
        }

        info!(
            "Atlas {}: {}x{} with {} sprites ({:.1}% efficiency){}",
            index,
            width,
            height,
            atlas.sprites.len(),
            atlas.occupancy() * 100.0,
            if atlas.mask.is_some() { " + mask" } else { "" },
        );

        atlas
    }
}

/// Tallest first, then widest, then by name so the order is total
fn sort_largest_first(images: &mut [SourceImage]) {
    images.sort_by(|a, b| {
        b.height()
            .cmp(&a.height())
            .then_with(|| b.width().cmp(&a.width()))
            .then_with(|| a.name.cmp(&b.name))
    });
}
