//! Application Configuration
//!
//! User settings stored in TOML format.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Remote team directory
    pub directory: DirectorySettings,
    /// Lookup cache persistence
    pub cache: CacheSettings,
    /// Number extraction
    pub detection: DetectionSettings,
    /// Overlay presentation
    pub overlay: OverlaySettings,
}

impl AppConfig {
    /// Check cross-field constraints serde cannot express
    pub fn validate(&self) -> Result<()> {
        let d = &self.detection;
        if d.min_digits == 0 || d.min_digits > d.max_digits {
            bail!(
                "detection.min_digits ({}) must be between 1 and detection.max_digits ({})",
                d.min_digits,
                d.max_digits
            );
        }

        let o = &self.overlay;
        if o.min_font_size <= 0.0 || o.min_font_size > o.max_font_size {
            bail!(
                "overlay.min_font_size ({}) must be positive and not exceed overlay.max_font_size ({})",
                o.min_font_size,
                o.max_font_size
            );
        }

        if self.directory.timeout_secs == 0 {
            bail!("directory.timeout_secs must be at least 1");
        }

        Ok(())
    }
}

/// Remote directory settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorySettings {
    /// REST API root, without the `/teams` suffix
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for DirectorySettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.ftcscout.org/rest/v1".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Cache persistence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Directory for cache files (platform cache dir when unset)
    pub dir: Option<PathBuf>,
    /// Persist lookups across restarts
    pub persist: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            dir: None,
            persist: true,
        }
    }
}

/// Number extraction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionSettings {
    /// Shortest digit run treated as a team number
    pub min_digits: usize,
    /// Longest digit run treated as a team number
    pub max_digits: usize,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            min_digits: 3,
            max_digits: 5,
        }
    }
}

/// Overlay presentation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlaySettings {
    /// Team page link, `{TEAM}` is replaced with the team number
    pub team_page_template: String,
    /// Smallest label font size
    pub min_font_size: f64,
    /// Largest label font size
    pub max_font_size: f64,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            team_page_template: "https://ftcscout.org/teams/{TEAM}".to_string(),
            min_font_size: 8.0,
            max_font_size: 18.0,
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {:?}", path))?;
    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config {:?}", path))?;
    config.validate()?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
