use std::path::{Component, Path};

use anyhow::{Context, Result};
use image::{ImageFormat, ImageReader};
use log::{debug, info, warn};
use rayon::prelude::*;

use super::{Classification, ImageEntry, SourceImage, classify, flags_for};
use crate::error::PackError;

/// Outcome of loading a batch of images
#[derive(Debug, Default)]
pub struct IntakeReport {
    /// Decoded images, in input order
    pub images: Vec<SourceImage>,
    /// Entries marked `notouch_`, left for the caller to copy through
    pub untouched: Vec<ImageEntry>,
    /// Images that could not be loaded
    pub failures: Vec<PackError>,
}

/// Expand input files and directories into logical-path/file pairs.
///
/// Files found under a directory are named by their path relative to that
/// directory, with `/` separators. Individual files are named relative to
/// `base_dir` when it is given, or by their file name otherwise. Directory
/// listings are sorted so the same tree always scans in the same order.
pub fn scan_inputs(
    inputs: &[impl AsRef<Path>],
    base_dir: Option<&Path>,
) -> Result<Vec<ImageEntry>> {
    let mut entries = Vec::new();

    for input in inputs {
        let path = input.as_ref();
        if !path.exists() {
            return Err(PackError::InputNotFound(path.to_path_buf()).into());
        }

        if path.is_file() {
            if is_png(path) {
                let name = match base_dir {
                    Some(base) => logical_name(path, base),
                    None => path
                        .file_name()
                        .map(|s| s.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.to_string_lossy().into_owned()),
                };
                entries.push(ImageEntry::new(name, path));
            }
        } else if path.is_dir() {
            collect_from_directory(path, path, &mut entries)?;
        }
    }

    Ok(entries)
}

fn collect_from_directory(base: &Path, dir: &Path, entries: &mut Vec<ImageEntry>) -> Result<()> {
    let mut children = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
    {
        children.push(entry?.path());
    }
    children.sort();

    for path in children {
        if path.is_file() && is_png(&path) {
            entries.push(ImageEntry::new(logical_name(&path, base), path));
        } else if path.is_dir() {
            collect_from_directory(base, &path, entries)?;
        }
    }

    Ok(())
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}

/// Path relative to `base`, joined with `/` regardless of platform
fn logical_name(path: &Path, base: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Load every entry, classifying by name first.
///
/// `notouch_` entries are not decoded. Decoding runs in parallel; failures
/// are logged and collected so one bad file never aborts the batch.
pub fn load_images(entries: &[ImageEntry]) -> IntakeReport {
    let mut report = IntakeReport::default();
    let mut to_load = Vec::new();

    for entry in entries {
        if classify(&entry.name) == Classification::Skip {
            debug!("Leaving '{}' untouched", entry.name);
            report.untouched.push(entry.clone());
        } else {
            to_load.push(entry);
        }
    }

    info!("Loading {} images...", to_load.len());

    let results: Vec<_> = to_load.par_iter().map(|entry| load_image(entry)).collect();

    for result in results {
        match result {
            Ok(image) => report.images.push(image),
            Err(e) => {
                warn!("Skipping image: {}", e);
                report.failures.push(e);
            }
        }
    }

    report
}

/// Decode a single PNG into an RGBA8 source image
pub fn load_image(entry: &ImageEntry) -> Result<SourceImage, PackError> {
    let load_error = |source: image::ImageError| PackError::ImageLoad {
        path: entry.path.clone(),
        source,
    };

    let reader = ImageReader::open(&entry.path)
        .map_err(|e| load_error(e.into()))?
        .with_guessed_format()
        .map_err(|e| load_error(e.into()))?;

    if reader.format() != Some(ImageFormat::Png) {
        return Err(PackError::NotPng {
            path: entry.path.clone(),
        });
    }

    let image = reader.decode().map_err(load_error)?.into_rgba8();

    Ok(SourceImage {
        name: entry.name.clone(),
        path: entry.path.clone(),
        image,
        flags: flags_for(&entry.name),
    })
}
