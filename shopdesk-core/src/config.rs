//! Configuration management
//!
//! Settings live in `settings.json` in the app directory:
//! ```json
//! {
//!   "app": { "demoMode": false, "baseUrl": "https://dummyjson.com", ... },
//!   ...
//! }
//! ```
//! Keys this crate does not manage are preserved when saving.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::adapters::dummyjson::DUMMYJSON_BASE_URL;

pub const SETTINGS_FILE: &str = "settings.json";

/// Overrides the API host (mirrors, local mock servers)
pub const BASE_URL_ENV: &str = "SHOPDESK_BASE_URL";

/// Forces demo mode on or off (CI, scripted runs)
pub const DEMO_MODE_ENV: &str = "SHOPDESK_DEMO_MODE";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default)]
    demo_mode: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// ShopDesk configuration (simplified view of settings)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub demo_mode: bool,
    /// API host; the DummyJSON production URL unless overridden
    pub base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            demo_mode: false,
            base_url: DUMMYJSON_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Load config from the app directory, applying environment overrides
    pub fn load(app_dir: &Path) -> Result<Self> {
        Self::load_with_env(app_dir, |name| std::env::var(name).ok())
    }

    fn load_with_env(app_dir: &Path, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let raw = read_settings(app_dir)?;

        let demo_mode = match env(DEMO_MODE_ENV).as_deref() {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => true,
            Some("false" | "0" | "no" | "FALSE" | "NO") => false,
            _ => raw.app.demo_mode,
        };

        let base_url = env(BASE_URL_ENV)
            .filter(|v| !v.trim().is_empty())
            .or(raw.app.base_url)
            .unwrap_or_else(|| DUMMYJSON_BASE_URL.to_string());
        validate_base_url(&base_url)?;

        Ok(Self {
            demo_mode,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Save config to the app directory
    ///
    /// Only `demoMode` is written back; the base URL and any other keys are
    /// left as they are in the file.
    pub fn save(&self, app_dir: &Path) -> Result<()> {
        let mut settings = read_settings(app_dir).unwrap_or_default();
        settings.app.demo_mode = self.demo_mode;

        std::fs::create_dir_all(app_dir)
            .with_context(|| format!("Failed to create {}", app_dir.display()))?;
        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(app_dir.join(SETTINGS_FILE), content)?;
        Ok(())
    }

    pub fn enable_demo_mode(&mut self) {
        self.demo_mode = true;
    }

    pub fn disable_demo_mode(&mut self) {
        self.demo_mode = false;
    }
}

fn read_settings(app_dir: &Path) -> Result<SettingsFile> {
    let settings_path = app_dir.join(SETTINGS_FILE);
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(&settings_path)
        .with_context(|| format!("Failed to read {}", settings_path.display()))?;
    Ok(serde_json::from_str(&content).unwrap_or_default())
}

fn validate_base_url(value: &str) -> Result<()> {
    let url = Url::parse(value).with_context(|| format!("Invalid base URL '{}'", value))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("Base URL must use http or https: '{}'", value);
    }
    Ok(())
}
