use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sheaf")]
#[command(version, about = "Texture atlas packer", long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Pack images into binary atlas files
    Pack(PackArgs),
    /// Print the header and sprite directory of an atlas file
    Inspect(InspectArgs),
}

#[derive(Args, Debug, Clone)]
pub struct PackArgs {
    /// Input PNG files or directories
    #[arg(required_unless_present = "config")]
    pub input: Vec<PathBuf>,

    /// Load settings from a .sheaf config file
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output directory for atlas files [default: .]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Base name for output files (atlas_0.atl, atlas.json, etc.) [default: atlas]
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Maximum atlas width in pixels [default: 1024]
    #[arg(long)]
    pub max_width: Option<u32>,

    /// Maximum atlas height in pixels [default: 1024]
    #[arg(long)]
    pub max_height: Option<u32>,

    /// Padding between sprites in pixels [default: 1]
    #[arg(short, long)]
    pub padding: Option<u32>,

    /// Alpha mask plane generation [default: off]
    #[arg(long, value_enum)]
    pub mask: Option<MaskMode>,

    /// Crop each atlas to the area its sprites use
    #[arg(long)]
    pub shrink: bool,

    /// Round shrunk atlas dimensions up to a power of two
    #[arg(long)]
    pub pot: bool,

    /// Write a JSON manifest describing the atlases
    #[arg(long)]
    pub manifest: bool,

    /// Write a PNG preview of every atlas
    #[arg(long)]
    pub preview: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Atlas file to read
    pub file: PathBuf,

    /// Also list every sprite rectangle
    #[arg(short, long)]
    pub verbose: bool,
}

/// Which sprites get their alpha rendered into the mask plane
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum MaskMode {
    /// No mask plane
    #[default]
    Off,
    /// Only sprites whose name carries the mask_ marker
    Flagged,
    /// Every sprite
    All,
}

impl MaskMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "off" => Some(MaskMode::Off),
            "flagged" => Some(MaskMode::Flagged),
            "all" => Some(MaskMode::All),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_pack_args() {
        let cli = CliArgs::try_parse_from([
            "sheaf", "pack", "sprites", "--max-width", "512", "--mask", "flagged", "--shrink",
        ])
        .unwrap();

        let Command::Pack(args) = cli.command else {
            panic!("expected pack command");
        };
        assert_eq!(args.input, vec![PathBuf::from("sprites")]);
        assert_eq!(args.max_width, Some(512));
        assert_eq!(args.mask, Some(MaskMode::Flagged));
        assert!(args.shrink);
        assert!(!args.pot);
    }

    #[test]
    fn test_pack_requires_input_or_config() {
        assert!(CliArgs::try_parse_from(["sheaf", "pack"]).is_err());
        assert!(CliArgs::try_parse_from(["sheaf", "pack", "-c", "project.sheaf"]).is_ok());
    }

    #[test]
    fn test_mask_mode_parse() {
        assert_eq!(MaskMode::parse("all"), Some(MaskMode::All));
        assert_eq!(MaskMode::parse("ALL"), None);
    }
}
