//! Catalog configuration
//!
//! Settings are resolved in layers, later ones winning:
//! built-in defaults, `config.toml` in the user config directory,
//! `CATALOG_*` environment variables (a `.env` file is honoured), then
//! command-line flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

const APP_DIR: &str = "catalog-cli";
const CONFIG_FILE: &str = "config.toml";

pub const DEFAULT_CATALOG_FILE: &str = "catalogo.xlsx";
pub const DEFAULT_IMAGES_DIR: &str = "images";
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Environment variable names
pub mod env {
    pub const CATALOG_PATH: &str = "CATALOG_PATH";
    pub const IMAGES_DIR: &str = "CATALOG_IMAGES_DIR";
    pub const JPEG_QUALITY: &str = "CATALOG_JPEG_QUALITY";
}

/// Effective configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Spreadsheet holding the catalog
    pub catalog_path: PathBuf,
    /// Flat directory of item images
    pub images_dir: PathBuf,
    /// JPEG quality used when re-encoding uploads (1-100)
    pub jpeg_quality: u8,
}

/// On-disk config file; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub catalog_path: Option<PathBuf>,
    pub images_dir: Option<PathBuf>,
    pub jpeg_quality: Option<u8>,
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub catalog_path: Option<PathBuf>,
    pub images_dir: Option<PathBuf>,
    pub jpeg_quality: Option<u8>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        let base = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR);

        Self {
            catalog_path: base.join(DEFAULT_CATALOG_FILE),
            images_dir: base.join(DEFAULT_IMAGES_DIR),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl CatalogConfig {
    /// Default location of the config file (~/.config/catalog-cli/config.toml)
    pub fn default_config_file() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Resolve the effective configuration for this process
    pub fn load(overrides: &ConfigOverrides) -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("Loaded environment from {}", path.display());
        }

        let mut config = Self::default();

        let file_path = overrides
            .config_file
            .clone()
            .or_else(Self::default_config_file);
        if let Some(path) = file_path {
            if path.exists() {
                config.apply_file(ConfigFile::read(&path)?);
                log::debug!("Applied config file {}", path.display());
            } else if overrides.config_file.is_some() {
                bail!("Config file does not exist: {}", path.display());
            }
        }

        config.apply_env(|key| std::env::var(key).ok())?;
        config.apply_overrides(overrides);
        config.validate()?;

        log::debug!("Effective config: {:?}", config);
        Ok(config)
    }

    pub fn apply_file(&mut self, file: ConfigFile) {
        if let Some(path) = file.catalog_path {
            self.catalog_path = path;
        }
        if let Some(dir) = file.images_dir {
            self.images_dir = dir;
        }
        if let Some(quality) = file.jpeg_quality {
            self.jpeg_quality = quality;
        }
    }

    /// Apply `CATALOG_*` variables from `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(env::CATALOG_PATH).filter(|v| !v.trim().is_empty()) {
            self.catalog_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup(env::IMAGES_DIR).filter(|v| !v.trim().is_empty()) {
            self.images_dir = PathBuf::from(dir);
        }
        if let Some(quality) = lookup(env::JPEG_QUALITY).filter(|v| !v.trim().is_empty()) {
            self.jpeg_quality = quality.trim().parse().with_context(|| {
                format!("{} must be a number between 1 and 100, got '{}'", env::JPEG_QUALITY, quality)
            })?;
        }
        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(path) = &overrides.catalog_path {
            self.catalog_path = path.clone();
        }
        if let Some(dir) = &overrides.images_dir {
            self.images_dir = dir.clone();
        }
        if let Some(quality) = overrides.jpeg_quality {
            self.jpeg_quality = quality;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            bail!("JPEG quality must be between 1 and 100, got {}", self.jpeg_quality);
        }
        Ok(())
    }

    /// Create the image directory and the catalog's parent directory
    pub fn ensure_folders(&self) -> Result<()> {
        std::fs::create_dir_all(&self.images_dir).with_context(|| {
            format!("Failed to create image directory: {}", self.images_dir.display())
        })?;

        if let Some(parent) = self.catalog_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        Ok(())
    }
}

impl ConfigFile {
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}
