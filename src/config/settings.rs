use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::utils::hijri::season_year_for_today;

pub const DEFAULT_ENDPOINT: &str = "https://script.google.com/macros/s/AKfycbxNQ7dv6Sl-LOkpCoriy9eB9_u4Z56JnAtMH4SiX0TTW6H9BX-yiwWRzULXzw-QQ3jYFA/exec";

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}
fn default_hijri_offset() -> i32 {
    0
}
fn default_toast_secs() -> u64 {
    4
}
fn default_title() -> String {
    "بوابة الميدان".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_endpoint")]
    pub url: String,
    /// Unset means requests wait as long as the endpoint takes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: default_endpoint(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonConfig {
    /// Hijri year written into report ids and dates. Defaults to the
    /// Ramadan that is current or next.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    /// Days to add/subtract from the Hijri date for local moon sighting.
    #[serde(default = "default_hijri_offset")]
    pub hijri_offset: i32,
}

impl Default for SeasonConfig {
    fn default() -> Self {
        Self {
            year: None,
            hijri_offset: default_hijri_offset(),
        }
    }
}

impl SeasonConfig {
    pub fn year(&self) -> u32 {
        self.year
            .unwrap_or_else(|| season_year_for_today(self.hijri_offset))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Plaintext, compared after trimming. Empty disables admin mode.
    #[serde(default)]
    pub password: String,
}

impl AdminConfig {
    pub fn enabled(&self) -> bool {
        !self.password.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_toast_secs")]
    pub toast_secs: u64,
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            toast_secs: default_toast_secs(),
            title: default_title(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub season: SeasonConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "masjid-report")
            .context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;
        let config: AppConfig = toml::from_str(&content).context("Parsing config.toml")?;
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(path, content).with_context(|| format!("Writing {:?}", path))?;
        Ok(())
    }
}
