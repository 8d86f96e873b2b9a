//! Brand kits: named bundles of fonts, colours and CSS applied to any
//! widget configuration.
//!
//! Applying a kit is a merge that only overwrites keys the configuration
//! already has. A kit never introduces keys.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::config::Config;

/// Id of the neutral kit that changes nothing.
pub const NEUTRAL_KIT: &str = "none";

/// A named bundle of font and colour overrides.
///
/// Unset colour and font fields leave the corresponding config keys alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BrandKit {
    /// Unique kit id.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub label: String,
    /// Body font stack, applied to `fontFamily`.
    #[serde(default)]
    pub font_family: Option<String>,
    /// Heading font stack, applied to `headingFontFamily`.
    #[serde(default)]
    pub heading_font_family: Option<String>,
    /// Applied to `bgColor` and `backgroundColor`.
    #[serde(default)]
    pub background_color: Option<String>,
    /// Applied to `textColor`.
    #[serde(default)]
    pub text_color: Option<String>,
    /// Applied to `accentColor`.
    #[serde(default)]
    pub accent_color: Option<String>,
    /// Stylesheet URLs for the kit's web fonts.
    #[serde(default)]
    pub font_links: Vec<String>,
    /// CSS custom properties emitted under `:root`, without the `--` prefix.
    #[serde(default)]
    pub css_variables: BTreeMap<String, String>,
    /// Additional CSS appended after the variables.
    #[serde(default)]
    pub extra_css: String,
    /// Boolean config keys switched on by the kit (e.g. `glowEffect`).
    #[serde(default)]
    pub effects: Vec<String>,
}

impl BrandKit {
    /// The neutral kit.
    pub fn none() -> Self {
        Self {
            id: NEUTRAL_KIT.to_string(),
            label: "None / Custom".to_string(),
            font_family: None,
            heading_font_family: None,
            background_color: None,
            text_color: None,
            accent_color: None,
            font_links: Vec::new(),
            css_variables: BTreeMap::new(),
            extra_css: String::new(),
            effects: Vec::new(),
        }
    }

    /// The JaZeR neon kit.
    pub fn jazer() -> Self {
        let palette = [
            ("jazer-electric-purple", "#8B5CF6"),
            ("jazer-cosmic-blue", "#3B82F6"),
            ("jazer-neon-pink", "#EC4899"),
            ("jazer-sunburst-gold", "#F59E0B"),
            ("jazer-aether-teal", "#06B6D4"),
            ("jazer-ultraviolet", "#A78BFA"),
            ("jazer-night-black", "#0B0E12"),
            ("jazer-stardust-white", "#F8F9FF"),
            ("jazer-graphite", "#1F2937"),
            ("jazer-soft-slate", "#94A3B8"),
            ("jazer-glow-blur", "4px"),
            ("jazer-glow-purple", "0 0 4px rgba(139, 92, 246, 0.5)"),
        ];

        Self {
            id: "jazer".to_string(),
            label: "JaZeR Neon".to_string(),
            font_family: Some(r#""Montserrat", system-ui, sans-serif"#.to_string()),
            heading_font_family: Some(r#""Orbitron", system-ui, sans-serif"#.to_string()),
            background_color: Some("#0B0E12".to_string()),
            text_color: Some("#F8F9FF".to_string()),
            accent_color: Some("#8B5CF6".to_string()),
            font_links: vec![
                "https://fonts.googleapis.com/css2?family=Montserrat:wght@400;500;700&family=Orbitron:wght@400;700&display=swap".to_string(),
            ],
            css_variables: palette
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            extra_css: JAZER_EXTRA_CSS.to_string(),
            effects: vec!["glowEffect".to_string(), "gradientText".to_string()],
        }
    }

    /// Whether applying this kit leaves every config unchanged.
    pub fn is_neutral(&self) -> bool {
        self.overrides().next().is_none()
    }

    /// Config keys this kit sets, with their values.
    pub fn overrides(&self) -> impl Iterator<Item = (&str, Value)> + '_ {
        let colors = [
            ("fontFamily", &self.font_family),
            ("headingFontFamily", &self.heading_font_family),
            ("bgColor", &self.background_color),
            ("backgroundColor", &self.background_color),
            ("textColor", &self.text_color),
            ("accentColor", &self.accent_color),
        ];
        colors
            .into_iter()
            .filter_map(|(key, value)| value.as_ref().map(|v| (key, Value::String(v.clone()))))
            .chain(self.effects.iter().map(|key| (key.as_str(), Value::Bool(true))))
    }

    /// `:root { --name: value; }` for the kit's variables.
    pub fn css_variables_block(&self) -> String {
        if self.css_variables.is_empty() {
            return String::new();
        }
        let mut css = String::from(":root {\n");
        for (name, value) in &self.css_variables {
            css.push_str(&format!("  --{name}: {value};\n"));
        }
        css.push_str("}\n");
        css
    }
}

/// Apply `kit` to `config`.
///
/// Only keys present in both are overwritten; the kit's value wins.
pub fn apply_brand_kit(config: &Config, kit: &BrandKit) -> Config {
    let mut branded = config.clone();
    for (key, value) in kit.overrides() {
        if branded.contains_key(key) {
            branded.set(key, value);
        }
    }
    branded
}

/// Ordered collection of available kits.
#[derive(Debug, Clone)]
pub struct BrandKits {
    kits: Vec<BrandKit>,
}

impl Default for BrandKits {
    fn default() -> Self {
        Self {
            kits: vec![BrandKit::none(), BrandKit::jazer()],
        }
    }
}

impl BrandKits {
    /// Add or replace a kit by id.
    pub fn insert(&mut self, kit: BrandKit) {
        match self.kits.iter_mut().find(|k| k.id == kit.id) {
            Some(existing) => *existing = kit,
            None => self.kits.push(kit),
        }
    }

    pub fn get(&self, id: &str) -> Option<&BrandKit> {
        self.kits.iter().find(|k| k.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BrandKit> {
        self.kits.iter()
    }
}

const JAZER_EXTRA_CSS: &str = r#"
.neon-text {
  font-family: "Orbitron", system-ui, sans-serif;
  text-shadow: var(--jazer-glow-purple);
  letter-spacing: 0.03em;
}
.neon-gradient-text {
  font-family: "Orbitron", system-ui, sans-serif;
  background: linear-gradient(90deg, #EC4899 0%, #F59E0B 28%, #06B6D4 50%, #3B82F6 74%, #8B5CF6 100%);
  -webkit-background-clip: text;
  background-clip: text;
  color: transparent;
  letter-spacing: 0.03em;
}
h1, h2, h3 { letter-spacing: 0.03em; font-family: "Orbitron", system-ui, sans-serif; }
button:focus-visible, input:focus-visible, select:focus-visible {
  outline: 2px solid var(--jazer-cosmic-blue);
  outline-offset: 2px;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_apply_never_adds_keys() {
        let config = Config::from_object(json!({ "textColor": "#000", "title": "Hi" }));
        let branded = apply_brand_kit(&config, &BrandKit::jazer());
        assert_eq!(branded.as_map().len(), 2);
        assert!(!branded.contains_key("fontFamily"));
        assert_eq!(branded.get_str("textColor"), Some("#F8F9FF"));
        assert_eq!(branded.get_str("title"), Some("Hi"));
    }

    #[test]
    fn test_effects_only_on_existing_keys() {
        let config = Config::from_object(json!({ "glowEffect": false }));
        let branded = apply_brand_kit(&config, &BrandKit::jazer());
        assert_eq!(branded.get_bool("glowEffect"), Some(true));
        assert!(!branded.contains_key("gradientText"));
    }

    #[test]
    fn test_neutral_kit_is_identity() {
        let config = Config::from_object(json!({ "textColor": "#000", "bgColor": "#fff" }));
        assert!(BrandKit::none().is_neutral());
        assert_eq!(apply_brand_kit(&config, &BrandKit::none()), config);
    }

    #[test]
    fn test_css_variables_block() {
        let css = BrandKit::jazer().css_variables_block();
        assert!(css.starts_with(":root {"));
        assert!(css.contains("--jazer-electric-purple: #8B5CF6;"));
        assert!(BrandKit::none().css_variables_block().is_empty());
    }

    #[test]
    fn test_kits_insert_replaces() {
        let mut kits = BrandKits::default();
        let mut custom = BrandKit::none();
        custom.id = "jazer".into();
        custom.label = "Override".into();
        kits.insert(custom);
        assert_eq!(kits.iter().count(), 2);
        assert_eq!(kits.get("jazer").unwrap().label, "Override");
    }
}
