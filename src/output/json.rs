use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use super::atlas_filename;
use crate::atlas::AtlasCanvas;
use crate::error::PackError;
use crate::format::PixelFormat;
use crate::sprite::PackedSprite;

#[derive(Serialize)]
struct JsonOutput {
    meta: Meta,
    atlases: Vec<JsonAtlas>,
    skipped: Vec<String>,
}

#[derive(Serialize)]
struct Meta {
    app: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct JsonAtlas {
    file: String,
    size: Size,
    format: &'static str,
    sprites: Vec<JsonSprite>,
}

#[derive(Serialize)]
struct Size {
    w: u32,
    h: u32,
}

#[derive(Serialize)]
struct JsonSprite {
    name: String,
    frame: Frame,
}

#[derive(Serialize)]
struct Frame {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

/// Write a `{base_name}.json` manifest describing every atlas.
///
/// `skipped` lists the images that were left out, with the reason.
pub fn write_manifest(
    atlases: &[AtlasCanvas],
    skipped: &[String],
    output_dir: &Path,
    base_name: &str,
) -> Result<()> {
    let content = manifest_json(atlases, skipped, base_name)?;
    let json_path = output_dir.join(format!("{}.json", base_name));

    fs::write(&json_path, content).map_err(|e| PackError::OutputWrite {
        path: json_path,
        source: e,
    })?;

    Ok(())
}

fn manifest_json(atlases: &[AtlasCanvas], skipped: &[String], base_name: &str) -> Result<String> {
    let atlases = atlases
        .iter()
        .map(|atlas| JsonAtlas {
            file: atlas_filename(base_name, atlas.index),
            size: Size {
                w: atlas.width,
                h: atlas.height,
            },
            format: PixelFormat::of(atlas).name(),
            sprites: atlas.sprites.iter().map(sprite_to_json).collect(),
        })
        .collect();

    let output = JsonOutput {
        meta: Meta {
            app: "sheaf",
            version: env!("CARGO_PKG_VERSION"),
        },
        atlases,
        skipped: skipped.to_vec(),
    };

    Ok(serde_json::to_string_pretty(&output)?)
}

fn sprite_to_json(sprite: &PackedSprite) -> JsonSprite {
    JsonSprite {
        name: sprite.name.clone(),
        frame: Frame {
            x: sprite.rect.x,
            y: sprite.rect.y,
            w: sprite.rect.width,
            h: sprite.rect.height,
        },
    }
}
