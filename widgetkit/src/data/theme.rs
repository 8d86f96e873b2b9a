use serde::{Deserialize, Serialize};

use crate::data::config::Config;

/// Background sentinel used when a widget asks for no background.
pub const TRANSPARENT: &str = "transparent";

const LIGHT_BACKGROUND: &str = "#FFFFFF";
const LIGHT_TEXT: &str = "#37352F";
const DARK_BACKGROUND: &str = "#0B0E12";
const DARK_TEXT: &str = "#FFFFFF";
const FLAT_TEXT: &str = "#000000";

/// How a widget picks between its light and dark colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppearanceMode {
    /// Follow the viewer's system preference.
    System,
    Light,
    Dark,
    /// No light/dark split: use the flat colours.
    None,
}

impl AppearanceMode {
    /// Parse a config value. `do-nothing` is an alias of `none`; anything
    /// unrecognised behaves like `light`.
    pub fn parse(s: &str) -> Self {
        match s {
            "system" => AppearanceMode::System,
            "dark" => AppearanceMode::Dark,
            "none" | "do-nothing" => AppearanceMode::None,
            _ => AppearanceMode::Light,
        }
    }
}

/// One background/text pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeColors {
    pub background: String,
    pub text: String,
}

impl ModeColors {
    pub fn new(background: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            background: background.into(),
            text: text.into(),
        }
    }
}

/// Everything the resolver looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeInputs {
    pub mode: AppearanceMode,
    pub system_prefers_dark: bool,
    pub light: ModeColors,
    pub dark: ModeColors,
    /// Colours used when `mode` is [`AppearanceMode::None`].
    pub flat: ModeColors,
    pub transparent: bool,
}

/// Resolved colours for one render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColors {
    pub background: String,
    pub text: String,
}

/// Resolve final colours from appearance inputs.
///
/// Pure: the live preview and the export composer both call this and must
/// agree.
pub fn resolve(inputs: &ThemeInputs) -> ThemeColors {
    if inputs.mode == AppearanceMode::None {
        return ThemeColors {
            background: inputs.flat.background.clone(),
            text: inputs.flat.text.clone(),
        };
    }

    let is_dark = inputs.mode == AppearanceMode::Dark
        || (inputs.mode == AppearanceMode::System && inputs.system_prefers_dark);
    let bucket = if is_dark { &inputs.dark } else { &inputs.light };

    ThemeColors {
        background: if inputs.transparent {
            TRANSPARENT.to_string()
        } else {
            bucket.background.clone()
        },
        text: bucket.text.clone(),
    }
}

/// Config paths of one background/text pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPaths {
    pub background: &'static str,
    pub text: &'static str,
}

/// Where a widget keeps its appearance settings.
///
/// Widgets name these keys differently (`appearance` vs `appearanceMode`,
/// `lightMode.textColor` vs `textColorLight`); this maps a config onto
/// [`ThemeInputs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeKeys {
    pub appearance: &'static str,
    pub light: ColorPaths,
    pub dark: ColorPaths,
    pub flat: ColorPaths,
    pub transparent: Option<&'static str>,
}

impl Default for ThemeKeys {
    fn default() -> Self {
        Self {
            appearance: "appearanceMode",
            light: ColorPaths {
                background: "lightMode.backgroundColor",
                text: "lightMode.textColor",
            },
            dark: ColorPaths {
                background: "darkMode.backgroundColor",
                text: "darkMode.textColor",
            },
            flat: ColorPaths {
                background: "bgColor",
                text: "textColor",
            },
            transparent: None,
        }
    }
}

impl ThemeKeys {
    /// Read the appearance inputs for `config`.
    pub fn inputs(&self, config: &Config, system_prefers_dark: bool) -> ThemeInputs {
        let pick = |paths: &ColorPaths, background: &str, text: &str| {
            ModeColors::new(
                config.str_or(paths.background, background),
                config.str_or(paths.text, text),
            )
        };

        ThemeInputs {
            mode: AppearanceMode::parse(config.str_or(self.appearance, "system")),
            system_prefers_dark,
            light: pick(&self.light, LIGHT_BACKGROUND, LIGHT_TEXT),
            dark: pick(&self.dark, DARK_BACKGROUND, DARK_TEXT),
            flat: pick(&self.flat, TRANSPARENT, FLAT_TEXT),
            transparent: self
                .transparent
                .map(|key| config.bool_or(key, false))
                .unwrap_or(false),
        }
    }

    /// Resolve `config` for a viewer with the given preference.
    pub fn resolve(&self, config: &Config, system_prefers_dark: bool) -> ThemeColors {
        resolve(&self.inputs(config, system_prefers_dark))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn inputs(mode: AppearanceMode, prefers_dark: bool, transparent: bool) -> ThemeInputs {
        ThemeInputs {
            mode,
            system_prefers_dark: prefers_dark,
            light: ModeColors::new("#fff", "#111"),
            dark: ModeColors::new("#000", "#eee"),
            flat: ModeColors::new("#abcdef", "#123456"),
            transparent,
        }
    }

    #[test]
    fn test_none_mode_uses_flat_colors() {
        let colors = resolve(&inputs(AppearanceMode::None, true, true));
        assert_eq!(colors, ThemeColors { background: "#abcdef".into(), text: "#123456".into() });
    }

    #[test]
    fn test_system_follows_preference() {
        assert_eq!(resolve(&inputs(AppearanceMode::System, true, false)).text, "#eee");
        assert_eq!(resolve(&inputs(AppearanceMode::System, false, false)).text, "#111");
        assert_eq!(resolve(&inputs(AppearanceMode::Light, true, false)).text, "#111");
        assert_eq!(resolve(&inputs(AppearanceMode::Dark, false, false)).text, "#eee");
    }

    #[test]
    fn test_transparent_keeps_text() {
        let colors = resolve(&inputs(AppearanceMode::Dark, false, true));
        assert_eq!(colors.background, TRANSPARENT);
        assert_eq!(colors.text, "#eee");
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let i = inputs(AppearanceMode::System, true, false);
        assert_eq!(resolve(&i), resolve(&i));
    }

    #[test]
    fn test_keys_read_config() {
        let keys = ThemeKeys {
            appearance: "appearance",
            transparent: Some("useTransparentBg"),
            ..ThemeKeys::default()
        };
        let config = Config::from_object(json!({
            "appearance": "dark",
            "useTransparentBg": false,
            "lightMode": { "backgroundColor": "#F8F9FF", "textColor": "#1F2937" },
            "darkMode": { "backgroundColor": "#0B0E12", "textColor": "#F8F9FF" }
        }));
        let colors = keys.resolve(&config, false);
        assert_eq!(colors.background, "#0B0E12");
        assert_eq!(colors.text, "#F8F9FF");
    }

    #[test]
    fn test_appearance_aliases() {
        assert_eq!(AppearanceMode::parse("do-nothing"), AppearanceMode::None);
        assert_eq!(AppearanceMode::parse("sepia"), AppearanceMode::Light);
    }
}
