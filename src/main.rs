use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use sheaf::atlas::AtlasBuilder;
use sheaf::cli::{CliArgs, Command, InspectArgs, MaskMode, PackArgs};
use sheaf::config::LoadedConfig;
use sheaf::error::PackError;
use sheaf::format::PixelFormat;
use sheaf::output::{atlas_filename, load_atlas, save_atlas, save_preview, write_manifest};
use sheaf::sprite::{load_images, scan_inputs};

#[allow(clippy::print_stderr)]
fn main() {
    if let Err(e) = run() {
        // Use eprintln instead of error! because logger may not be initialized
        // (e.g., config loading fails before logger init)
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = CliArgs::parse();

    match cli.command {
        Command::Pack(args) => pack(&args),
        Command::Inspect(args) => {
            init_logging(args.verbose);
            inspect(&args)
        }
    }
}

fn init_logging(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn pack(args: &PackArgs) -> Result<()> {
    // Load config if specified and merge with CLI args
    let merged = merge_config_with_args(args)?;

    init_logging(merged.verbose);

    info!("Sheaf atlas packer v{}", env!("CARGO_PKG_VERSION"));

    // Create output directory if it doesn't exist
    if !merged.output.exists() {
        fs::create_dir_all(&merged.output)?;
    }

    let entries = scan_inputs(&merged.input, merged.base_dir.as_deref())?;
    if entries.is_empty() {
        return Err(PackError::NoImages.into());
    }
    let intake = load_images(&entries);
    info!("Loaded {} images", intake.images.len());
    for entry in &intake.untouched {
        info!("Left untouched: {}", entry.name);
    }

    let outcome = AtlasBuilder::new(merged.max_width, merged.max_height)
        .padding(merged.padding)
        .mask(merged.mask)
        .shrink_to_fit(merged.shrink)
        .power_of_two(merged.pot)
        .build(intake.images);

    let skipped: Vec<String> = intake
        .failures
        .iter()
        .chain(&outcome.rejected)
        .map(ToString::to_string)
        .collect();

    for atlas in &outcome.atlases {
        let path = merged.output.join(atlas_filename(&merged.name, atlas.index));
        save_atlas(atlas, &path)
            .with_context(|| format!("failed to write atlas {}", atlas.index))?;
        info!("Saved {}", path.display());

        if merged.preview {
            let preview = path.with_extension("png");
            save_preview(atlas, &preview)?;
            info!("Saved preview {}", preview.display());
        }
    }

    if merged.manifest {
        write_manifest(&outcome.atlases, &skipped, &merged.output, &merged.name)?;
        info!("Generated {}.json", merged.name);
    }

    if !skipped.is_empty() {
        warn!("{} image(s) were not packed:", skipped.len());
        for reason in &skipped {
            warn!("  {}", reason);
        }
    }

    info!("Done!");

    Ok(())
}

#[allow(clippy::print_stdout)]
fn inspect(args: &InspectArgs) -> Result<()> {
    let atlas = load_atlas(&args.file)
        .with_context(|| format!("failed to read atlas {}", args.file.display()))?;

    println!(
        "{}: {}x{} {} with {} sprites ({:.1}% efficiency)",
        args.file.display(),
        atlas.width,
        atlas.height,
        PixelFormat::of(&atlas).name(),
        atlas.sprites.len(),
        atlas.occupancy() * 100.0
    );

    if args.verbose {
        for sprite in &atlas.sprites {
            let r = sprite.rect;
            println!("  {} at ({}, {}) {}x{}", sprite.name, r.x, r.y, r.width, r.height);
        }
    }

    Ok(())
}

/// Merged configuration from CLI args and optional config file.
struct MergedConfig {
    input: Vec<PathBuf>,
    /// Directory that single-file inputs are named relative to
    base_dir: Option<PathBuf>,
    output: PathBuf,
    name: String,
    max_width: u32,
    max_height: u32,
    padding: u32,
    mask: MaskMode,
    shrink: bool,
    pot: bool,
    manifest: bool,
    preview: bool,
    verbose: bool,
}

/// Merge config file values with CLI arguments.
/// CLI arguments always take precedence over config values.
fn merge_config_with_args(args: &PackArgs) -> Result<MergedConfig> {
    // Load config if specified
    let loaded_config = if let Some(config_path) = &args.config {
        Some(
            LoadedConfig::load(config_path)
                .with_context(|| format!("failed to load config: {}", config_path.display()))?,
        )
    } else {
        None
    };

    // Determine input files: CLI args override config
    let (input, base_dir) = if !args.input.is_empty() {
        (args.input.clone(), None)
    } else if let Some(ref lc) = loaded_config {
        (
            lc.resolve_inputs()
                .context("failed to resolve input files from config")?,
            Some(lc.config_dir.clone()),
        )
    } else {
        // This shouldn't happen due to clap's required_unless_present
        (Vec::new(), None)
    };

    // Determine output directory: CLI > config > default
    let output = args.output.clone().unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| lc.resolve_output_dir())
            .unwrap_or_else(|| PathBuf::from("."))
    });

    let config = loaded_config.as_ref().map(|lc| &lc.config);

    // Determine name: CLI > config > default
    let name = args.name.clone().unwrap_or_else(|| {
        config
            .map(|c| c.name.clone())
            .unwrap_or_else(|| "atlas".to_string())
    });

    // For numeric fields: CLI > config > default
    let max_width = args
        .max_width
        .unwrap_or_else(|| config.map(|c| c.max_width).unwrap_or(1024));
    let max_height = args
        .max_height
        .unwrap_or_else(|| config.map(|c| c.max_height).unwrap_or(1024));
    let padding = args
        .padding
        .unwrap_or_else(|| config.map(|c| c.padding).unwrap_or(1));

    // Boolean flags: CLI presence sets them to true, otherwise use config
    let shrink = args.shrink || config.is_some_and(|c| c.shrink);
    let pot = args.pot || config.is_some_and(|c| c.pot);
    let manifest = args.manifest || config.is_some_and(|c| c.manifest);
    let preview = args.preview || config.is_some_and(|c| c.preview);

    // Mask: CLI > config > default
    let mask = if let Some(m) = args.mask {
        m
    } else if let Some(c) = config {
        MaskMode::parse(&c.mask).ok_or_else(|| {
            anyhow::anyhow!(
                "unknown mask '{}' in config file. Valid values: off, flagged, all",
                c.mask
            )
        })?
    } else {
        MaskMode::Off
    };

    Ok(MergedConfig {
        input,
        base_dir,
        output,
        name,
        max_width,
        max_height,
        padding,
        mask,
        shrink,
        pot,
        manifest,
        preview,
        verbose: args.verbose,
    })
}
