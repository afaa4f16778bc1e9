//! CLI configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

/// CLI configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CliConfig {
    /// Base URL of the share relay service
    pub relay_url: String,
    /// Origin and path of the viewer page the share link points at
    pub share_base: String,
    /// Folder requested on upload grants, or empty
    pub upload_folder: String,
    /// Largest photo file accepted for upload, in bytes
    pub max_photo_bytes: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            relay_url: "http://127.0.0.1:8086".to_string(),
            share_base: "https://greetlink.example.com/card".to_string(),
            upload_folder: String::new(),
            max_photo_bytes: 10 * 1024 * 1024,
        }
    }
}

impl CliConfig {
    /// Load config from file or create default
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: CliConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Self::default();

            // Create parent directories
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            // Save default config
            let content = toml::to_string_pretty(&config)?;
            std::fs::write(path, content)?;

            Ok(config)
        }
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
