use serde::{Deserialize, Serialize};

/// Sheaf project file structure.
///
/// All paths in the config are relative to the config file location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheafConfig {
    /// Config file version (currently 1)
    pub version: u32,
    /// Input file paths, directories or glob patterns
    pub input: Vec<String>,
    /// Output directory for atlas files
    pub output_dir: String,
    /// Base name for output files (atlas_0.atl, atlas.json, etc.)
    pub name: String,
    /// Maximum atlas width in pixels
    pub max_width: u32,
    /// Maximum atlas height in pixels
    pub max_height: u32,
    /// Padding between sprites in pixels
    pub padding: u32,
    /// Mask plane generation: "off", "flagged" or "all"
    pub mask: String,
    /// Crop each atlas to the area its sprites use
    pub shrink: bool,
    /// Round shrunk atlas dimensions up to a power of two
    pub pot: bool,
    /// Write a JSON manifest next to the atlases
    pub manifest: bool,
    /// Write PNG previews next to the atlases
    pub preview: bool,
}

impl Default for SheafConfig {
    fn default() -> Self {
        Self {
            version: 1,
            input: Vec::new(),
            output_dir: ".".to_string(),
            name: "atlas".to_string(),
            max_width: 1024,
            max_height: 1024,
            padding: 1,
            mask: "off".to_string(),
            shrink: false,
            pot: false,
            manifest: false,
            preview: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: SheafConfig =
            serde_json::from_str(r#"{ "input": ["sprites"], "max_width": 2048 }"#).unwrap();

        assert_eq!(config.input, vec!["sprites"]);
        assert_eq!(config.max_width, 2048);
        assert_eq!(config.max_height, 1024);
        assert_eq!(config.padding, 1);
        assert_eq!(config.mask, "off");
        assert_eq!(config.name, "atlas");
    }
}
