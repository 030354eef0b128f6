//! `generate` flags and how they layer over a TOML config file.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use mapgen::{ConfigOverrides, GenerationDimensions};

use crate::files;

#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Seed string; the same seed always yields the same map
    #[arg(short, long)]
    pub seed: Option<String>,
    /// Archetype id (see `mapgen presets`)
    #[arg(short, long)]
    pub archetype: Option<String>,
    /// Town template id
    #[arg(short, long)]
    pub template: Option<String>,
    #[arg(long, requires = "height")]
    pub width: Option<u32>,
    #[arg(long, requires = "width")]
    pub height: Option<u32>,
    #[arg(long)]
    pub max_repair_attempts: Option<u32>,
    /// TOML file holding config overrides; flags win over its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Editor tile registry JSON replacing the built-in tiles and buildings
    #[arg(short, long)]
    pub registry: Option<PathBuf>,
    /// Write the full result as JSON here
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Print the generated grid as text
    #[arg(long)]
    pub ascii: bool,
}

impl GenerateArgs {
    pub fn flag_overrides(&self) -> ConfigOverrides {
        let dimensions = match (self.width, self.height) {
            (Some(width), Some(height)) => Some(GenerationDimensions { width, height }),
            _ => None,
        };
        ConfigOverrides {
            seed: self.seed.clone(),
            dimensions,
            archetype_id: self.archetype.clone(),
            template_id: self.template.clone(),
            max_repair_attempts: self.max_repair_attempts,
            ..ConfigOverrides::default()
        }
    }

    pub fn overrides(&self) -> Result<ConfigOverrides> {
        let from_file = match &self.config {
            Some(path) => files::load_overrides(path)?,
            None => ConfigOverrides::default(),
        };
        Ok(from_file.merged_with(self.flag_overrides()))
    }
}
