//! Settings file (`.widgetool.toml`).
//!
//! # File Format
//!
//! ```toml
//! default_brand = "none"
//! debounce_ms = 300
//! base_url = "http://127.0.0.1:7878/"
//! listen = "127.0.0.1:7878"
//!
//! [[brand_kits]]
//! id = "acme"
//! label = "Acme"
//! font_family = "Inter, sans-serif"
//! accent_color = "#FF5A1F"
//! ```
//!
//! Every key is optional. A missing file yields the defaults.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use widgetkit::{BrandKit, BrandKits, store::DEFAULT_DEBOUNCE};

/// Default settings file name, looked up in the working directory.
pub const SETTINGS_FILE: &str = ".widgetool.toml";

/// Errors raised while loading the settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings in {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// User settings for the command line tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Brand kit applied when an editing session starts.
    pub default_brand: String,
    /// Quiet interval of the live preview, in milliseconds.
    pub debounce_ms: u64,
    /// Base URL of generated share links.
    pub base_url: String,
    /// Bind address of `widgetool serve`.
    pub listen: String,
    /// Additional brand kits. A kit with a built-in id replaces it.
    pub brand_kits: Vec<BrandKit>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_brand: widgetkit::data::brand::NEUTRAL_KIT.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
            base_url: "http://127.0.0.1:7878/".to_string(),
            listen: "127.0.0.1:7878".to_string(),
            brand_kits: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, or the defaults if it does not exist.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("no settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let settings = toml::from_str(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        info!("loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Built-in kits followed by the user's.
    pub fn kits(&self) -> BrandKits {
        let mut kits = BrandKits::default();
        for kit in &self.brand_kits {
            kits.insert(kit.clone());
        }
        kits
    }

    /// JSON schema of the settings file.
    pub fn schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(Settings)).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(dir.path().join(SETTINGS_FILE)).await.unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.debounce(), Duration::from_millis(300));
    }

    #[tokio::test]
    async fn test_partial_file_and_user_kits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(
            &path,
            r##"
debounce_ms = 50
default_brand = "acme"

[[brand_kits]]
id = "acme"
label = "Acme"
accent_color = "#FF5A1F"
"##,
        )
        .unwrap();

        let settings = Settings::load(&path).await.unwrap();
        assert_eq!(settings.debounce_ms, 50);
        assert_eq!(settings.listen, "127.0.0.1:7878");

        let kits = settings.kits();
        let ids: Vec<_> = kits.iter().map(|k| k.id.as_str()).collect();
        assert_eq!(ids, ["none", "jazer", "acme"]);
        assert_eq!(
            kits.get("acme").unwrap().accent_color.as_deref(),
            Some("#FF5A1F")
        );
    }

    #[tokio::test]
    async fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, "debounce_ms = \"soon\"").unwrap();
        let err = Settings::load(&path).await.unwrap_err();
        assert!(matches!(err, ConfigError::Toml { .. }));
        assert!(err.to_string().contains(SETTINGS_FILE));
    }

    #[test]
    fn test_schema_lists_keys() {
        let schema = Settings::schema();
        let props = schema["properties"].as_object().unwrap();
        for key in ["default_brand", "debounce_ms", "base_url", "listen", "brand_kits"] {
            assert!(props.contains_key(key), "{key}");
        }
    }
}
