//! Application context and state management.
//!
//! [`AppContext`] holds the loaded settings, the widget registry and the
//! available brand kits, and resolves command line inputs against them.

use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use serde_json::Value;
use url::Url;
use widgetkit::{
    AuthoringSession, BrandKit, BrandKits, Config, WidgetDefinition, WidgetRegistry, codec,
};

use crate::settings::{SETTINGS_FILE, Settings};

/// Where a command takes its starting configuration from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSource {
    /// JSON file holding a configuration object.
    pub file: Option<PathBuf>,
    /// Share-link token.
    pub token: Option<String>,
    /// `path=value` assignments applied last. Values are JSON, or plain
    /// strings when they do not parse as JSON.
    pub sets: Vec<String>,
}

/// The main application context.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub settings: Settings,
    pub settings_path: PathBuf,
    pub registry: WidgetRegistry,
    pub kits: BrandKits,
}

impl AppContext {
    /// Load settings from `path` (default `.widgetool.toml`) and register
    /// the built-in widgets.
    pub async fn load(path: Option<PathBuf>) -> anyhow::Result<Self> {
        let settings_path = path.unwrap_or_else(|| PathBuf::from(SETTINGS_FILE));
        let settings = Settings::load(&settings_path).await?;
        let registry = WidgetRegistry::with_builtins();
        registry.validate()?;
        Ok(Self {
            kits: settings.kits(),
            settings,
            settings_path,
            registry,
        })
    }

    /// Look up a widget, listing the known ids on failure.
    pub fn widget(&self, id: &str) -> anyhow::Result<Arc<WidgetDefinition>> {
        self.registry.get(id).with_context(|| {
            let known: Vec<_> = self.registry.list().map(|w| w.id.as_str()).collect();
            format!("available widgets: {}", known.join(", "))
        })
    }

    pub fn brand(&self, id: &str) -> anyhow::Result<&BrandKit> {
        self.kits.get(id).with_context(|| {
            let known: Vec<_> = self.kits.iter().map(|k| k.id.as_str()).collect();
            format!("unknown brand kit '{id}', available: {}", known.join(", "))
        })
    }

    pub fn base_url(&self) -> anyhow::Result<Url> {
        Url::parse(&self.settings.base_url)
            .with_context(|| format!("invalid base_url '{}'", self.settings.base_url))
    }

    pub fn listen_addr(&self, overridden: Option<&str>) -> anyhow::Result<SocketAddr> {
        let addr = overridden.unwrap_or(&self.settings.listen);
        addr.parse()
            .with_context(|| format!("invalid listen address '{addr}'"))
    }

    /// Resolve the configuration for `def` from `source`.
    ///
    /// Without a file or token the widget's defaults are used.
    pub async fn load_config(
        &self,
        def: &WidgetDefinition,
        source: &ConfigSource,
    ) -> anyhow::Result<Config> {
        let mut config = match (&source.file, &source.token) {
            (Some(_), Some(_)) => bail!("--config and --token are mutually exclusive"),
            (Some(file), None) => read_config(file).await?,
            (None, Some(token)) => codec::decode(token).context("invalid share token")?,
            (None, None) => def.default_config.clone(),
        };
        for assignment in &source.sets {
            let (path, value) = parse_assignment(assignment)?;
            if !config.set(&path, value) {
                bail!("cannot set '{path}': a parent value is not a group");
            }
        }
        Ok(config)
    }

    /// Start an editing session on `widget` with `brand` (or the
    /// configured default kit).
    pub fn session(&self, widget: &str, brand: Option<&str>) -> anyhow::Result<AuthoringSession> {
        self.widget(widget)?;
        let mut session = AuthoringSession::new(
            self.registry.clone(),
            self.kits.clone(),
            Some(widget),
            self.settings.debounce(),
        )?;
        let brand = brand.unwrap_or(&self.settings.default_brand);
        self.brand(brand)?;
        session.select_brand(brand)?;
        Ok(session)
    }
}

async fn read_config(path: &Path) -> anyhow::Result<Config> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    Config::try_from(value).with_context(|| format!("{} is not a JSON object", path.display()))
}

/// Split `path=value`, parsing the value as JSON when possible.
pub fn parse_assignment(s: &str) -> anyhow::Result<(String, Value)> {
    let (path, raw) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("expected path=value, got '{s}'"))?;
    let path = path.trim();
    if path.is_empty() {
        bail!("empty path in '{s}'");
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((path.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    async fn ctx() -> AppContext {
        let dir = tempfile::tempdir().unwrap();
        AppContext::load(Some(dir.path().join(SETTINGS_FILE)))
            .await
            .unwrap()
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("lightMode.textColor=#fff").unwrap(),
            ("lightMode.textColor".to_string(), json!("#fff"))
        );
        assert_eq!(parse_assignment("count=3").unwrap().1, json!(3));
        assert_eq!(parse_assignment("on=true").unwrap().1, json!(true));
        assert_eq!(parse_assignment("t=a=b").unwrap().1, json!("a=b"));
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("=1").is_err());
    }

    #[tokio::test]
    async fn test_load_config_sources() {
        let ctx = ctx().await;
        let counter = ctx.widget("counter").unwrap();

        let source = ConfigSource {
            sets: vec!["counterTitle=Laps".into()],
            ..Default::default()
        };
        let config = ctx.load_config(&counter, &source).await.unwrap();
        assert_eq!(config.get_str("counterTitle"), Some("Laps"));
        assert_eq!(config.get_bool("centerText"), Some(true));

        let token = codec::encode(&config);
        let source = ConfigSource {
            token: Some(token),
            ..Default::default()
        };
        assert_eq!(ctx.load_config(&counter, &source).await.unwrap(), config);

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("config.json");
        std::fs::write(&file, r#"{"counterTitle":"From file"}"#).unwrap();
        let source = ConfigSource {
            file: Some(file),
            ..Default::default()
        };
        let config = ctx.load_config(&counter, &source).await.unwrap();
        assert_eq!(config.get_str("counterTitle"), Some("From file"));
    }

    #[tokio::test]
    async fn test_unknown_names() {
        let ctx = ctx().await;
        let err = ctx.widget("sundial").unwrap_err();
        assert!(format!("{err:#}").contains("clock"));
        assert!(ctx.brand("acme").is_err());
        assert!(ctx.session("clock", Some("jazer")).is_ok());
    }
}
