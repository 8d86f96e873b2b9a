//! Built-in widgets.
//!
//! Visually minimal, but each one is a complete definition: defaults,
//! fields, theme keys, markup and behavior.

mod buttons;
mod clock;
mod countdown;
mod counter;
mod life_progress;
mod pomodoro;
mod quotes;
mod simple_list;

use serde::Serialize;

use crate::{
    data::{config::Config, field::FieldDescriptor, field::FieldType},
    widget::WidgetDefinition,
};

pub use buttons::{BUTTON_PRESETS, ButtonPreset, STYLE_KEYS, preset};
pub(crate) use buttons::new_button;

/// Palette shared by the built-in defaults.
pub(crate) mod palette {
    pub const ELECTRIC_PURPLE: &str = "#8B5CF6";
    pub const COSMIC_BLUE: &str = "#3B82F6";
    pub const NEON_PINK: &str = "#EC4899";
    pub const ULTRAVIOLET: &str = "#A78BFA";
    pub const NIGHT_BLACK: &str = "#0B0E12";
    pub const STARDUST_WHITE: &str = "#F8F9FF";
    pub const GRAPHITE: &str = "#1F2937";
    pub const SOFT_SLATE: &str = "#94A3B8";
}

/// Every built-in widget, in navigation order.
pub fn all() -> Vec<WidgetDefinition> {
    vec![
        clock::definition(),
        counter::definition(),
        countdown::definition(),
        life_progress::definition(),
        buttons::definition(),
        quotes::definition(),
        simple_list::definition(),
        pomodoro::definition(),
    ]
}

/// Serialize a value as a JavaScript literal.
pub(crate) fn js(value: impl Serialize) -> String {
    serde_json::to_string(&value).unwrap_or_else(|_| "null".to_string())
}

/// Font stack for a `textFontFamily`/`digitFontFamily` style choice.
pub(crate) fn font_stack(choice: &str) -> &'static str {
    match choice {
        "serif" => "ui-serif, Georgia, serif",
        "mono" => "ui-monospace, \"Courier New\", monospace",
        "impact" => "Impact, \"Arial Black\", sans-serif",
        "heading" => "\"Orbitron\", system-ui, sans-serif",
        _ => "inherit",
    }
}

/// CSS classes for the brand effect flags.
pub(crate) fn effect_classes(config: &Config) -> String {
    let mut classes = Vec::new();
    if config.bool_or("glowEffect", false) {
        classes.push("neon-text");
    }
    if config.bool_or("gradientText", false) {
        classes.push("neon-gradient-text");
    }
    classes.join(" ")
}

pub(crate) fn appearance_field(name: &str, with_none: bool) -> FieldDescriptor {
    let mut options = Vec::new();
    if with_none {
        options.push(("Do Nothing", "none"));
    }
    options.extend([
        ("Use System Setting", "system"),
        ("Light", "light"),
        ("Dark", "dark"),
    ]);
    FieldDescriptor::new(name, "Dark/Light Appearance", FieldType::Select)
        .section("appearance")
        .options(&options)
}

pub(crate) fn text_align_field(section: &str) -> FieldDescriptor {
    FieldDescriptor::new("textAlign", "Text Alignment", FieldType::Select)
        .section(section)
        .options(&[("Left", "left"), ("Center", "center"), ("Right", "right")])
}

/// Soft glow around the widget when `showHoverMenu` is on.
pub(crate) fn hover_menu_style(config: &Config) -> &'static str {
    if config.bool_or("showHoverMenu", false) {
        "box-shadow:0 0 4px rgba(0,0,0,0.2);"
    } else {
        ""
    }
}

pub(crate) fn customize_button(config: &Config) -> &'static str {
    if config.bool_or("showCustomizeButton", false) {
        r#"<button class="customize-button">Customize</button>"#
    } else {
        ""
    }
}

pub(crate) fn feature_fields() -> [FieldDescriptor; 2] {
    [
        FieldDescriptor::new("showHoverMenu", "Show Hover Menu", FieldType::Boolean)
            .section("features"),
        FieldDescriptor::new(
            "showCustomizeButton",
            "Show Customize Button",
            FieldType::Boolean,
        )
        .section("features"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = "<script>alert('x & \"y\"')</script>";

    #[test]
    fn test_feature_toggles_reach_markup() {
        for def in all() {
            for path in ["showHoverMenu", "showCustomizeButton"] {
                if !def.fields.iter().any(|f| f.name == path) {
                    continue;
                }
                let mut on = def.default_config.clone();
                on.set(path, serde_json::Value::Bool(true));
                let mut off = def.default_config.clone();
                off.set(path, serde_json::Value::Bool(false));
                assert_ne!(def.markup(&on), def.markup(&off), "{} {path}", def.id);
            }
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let defs = all();
        let mut ids: Vec<_> = defs.iter().map(|d| d.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), defs.len());
    }

    #[test]
    fn test_every_builtin_validates() {
        for def in all() {
            assert_eq!(def.validate(), Ok(()), "widget {}", def.id);
        }
    }

    #[test]
    fn test_text_fields_are_escaped_in_markup() {
        for def in all() {
            let mut config = def.default_config.clone();
            for field in &def.fields {
                if matches!(field.kind, FieldType::Text | FieldType::Textarea) {
                    config.set(&field.name, serde_json::Value::String(PAYLOAD.into()));
                }
            }
            let markup = def.markup(&config);
            assert!(!markup.contains("<script>"), "widget {}", def.id);
            assert!(!markup.contains("alert('x"), "widget {}", def.id);
        }
    }

    #[test]
    fn test_js_literal() {
        assert_eq!(js("a\"b"), r#""a\"b""#);
        assert_eq!(js(true), "true");
    }

    #[test]
    fn test_effect_classes() {
        let config = Config::from_object(serde_json::json!({ "glowEffect": true }));
        assert_eq!(effect_classes(&config), "neon-text");
        assert!(effect_classes(&Config::new()).is_empty());
    }
}
