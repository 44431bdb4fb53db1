use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use log::warn;

use super::types::SheafConfig;

/// Highest config file version this build understands
const SUPPORTED_VERSION: u32 = 1;

/// A parsed project file plus the directory its relative paths start from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: SheafConfig,
    pub config_dir: PathBuf,
}

impl LoadedConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        let config: SheafConfig = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;

        if config.version > SUPPORTED_VERSION {
            bail!(
                "config file {} has version {}, this build supports up to {}",
                path.display(),
                config.version,
                SUPPORTED_VERSION
            );
        }

        let config_dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Ok(Self { config, config_dir })
    }

    /// Expand `input` into concrete paths under the config directory.
    ///
    /// Glob matches come back sorted. A path reached twice is kept once, at
    /// its first position, so the scan order stays stable.
    pub fn resolve_inputs(&self) -> Result<Vec<PathBuf>> {
        let mut seen = HashSet::new();
        let mut results = Vec::new();

        for pattern in &self.config.input {
            let full = self.config_dir.join(pattern);

            let matches = if is_glob_pattern(pattern) {
                let found = glob::glob(&full.to_string_lossy())
                    .with_context(|| format!("invalid glob pattern: {}", pattern))?
                    .collect::<Result<Vec<_>, _>>()
                    .with_context(|| format!("failed to read glob entry: {}", pattern))?;
                if found.is_empty() {
                    warn!("Input pattern '{}' matched nothing", pattern);
                }
                found
            } else {
                vec![full]
            };

            for path in matches {
                if seen.insert(path.clone()) {
                    results.push(path);
                }
            }
        }

        Ok(results)
    }

    pub fn resolve_output_dir(&self) -> PathBuf {
        self.config_dir.join(&self.config.output_dir)
    }
}

fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}
