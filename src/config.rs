use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::engine::config::Normalization;
use crate::report::DEFAULT_SOURCE_BIT_WIDTH;

pub const DEFAULT_CONFIG_FILE: &str = "huffpack.toml";
pub const MAX_INPUT_SIZE: u64 = 64 * 1024 * 1024; // 64MB

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub data_directory: PathBuf,
    pub normalization: Normalization,
    pub source_bit_width: u32,
    pub max_input_size: u64,
    pub batch_concurrency: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            data_directory: PathBuf::from("./data"),
            normalization: Normalization::default(),
            source_bit_width: DEFAULT_SOURCE_BIT_WIDTH,
            max_input_size: MAX_INPUT_SIZE,
            batch_concurrency: 4,
        }
    }
}

impl CodecConfig {
    pub fn load_or_create(config_path: Option<&str>) -> Result<Self> {
        let config_file = config_path.unwrap_or(DEFAULT_CONFIG_FILE);

        if Path::new(config_file).exists() {
            Self::load(config_file)
        } else {
            let config = Self::default();
            config.save(config_file)?;
            tracing::info!("Wrote default config to {}", config_file);
            Ok(config)
        }
    }

    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let path = config_path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: CodecConfig = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config_path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.source_bit_width == 0 || self.source_bit_width > 32 {
            bail!("source_bit_width must be between 1 and 32, got {}", self.source_bit_width);
        }
        if self.batch_concurrency == 0 {
            bail!("batch_concurrency must be at least 1");
        }
        Ok(())
    }

    pub fn ensure_directories(&self) -> Result<()> {
        if !self.data_directory.exists() {
            std::fs::create_dir_all(&self.data_directory)?;
            tracing::info!("Created data directory: {:?}", self.data_directory);
        }
        Ok(())
    }
}
