use serde_json::{Map, Value, json};
use url::{ParseError, Url};

use super::{appearance_field, customize_button, hover_menu_style, js, palette::*};
use crate::{
    data::{
        config::Config,
        field::{FieldDescriptor, FieldType},
        theme::{ColorPaths, ThemeKeys},
    },
    export::{css_value, escape_html},
    widget::{WidgetDefinition, WidgetRenderer},
};

/// Record keys copied by "copy style to all". Identity and content keys
/// (`id`, `label`, `url`, `icon`) are never part of a style.
pub const STYLE_KEYS: [&str; 8] = [
    "colorPreset",
    "bgColor",
    "bgOpacity",
    "outlineColor",
    "textColor",
    "hoverBgColor",
    "hoverTextColor",
    "enableHoverHighlight",
];

/// A named button colour preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonPreset {
    pub name: &'static str,
    pub bg_color: &'static str,
    pub outline_color: &'static str,
    pub text_color: &'static str,
}

const fn solid(name: &'static str, color: &'static str) -> ButtonPreset {
    ButtonPreset {
        name,
        bg_color: color,
        outline_color: color,
        text_color: "#FFFFFF",
    }
}

pub const BUTTON_PRESETS: [ButtonPreset; 10] = [
    ButtonPreset {
        name: "black",
        bg_color: "#000000",
        outline_color: "#000000",
        text_color: "#FFFFFF",
    },
    solid("grey", "#9B9A97"),
    solid("yellow", "#DFAB01"),
    solid("purple", "#6940A5"),
    solid("brown", "#64473A"),
    solid("green", "#0F7B6C"),
    solid("pink", "#AD1A72"),
    solid("orange", "#D9730D"),
    solid("blue", "#0B6E99"),
    solid("red", "#E03E3E"),
];

/// Look up a preset by name.
pub fn preset(name: &str) -> Option<&'static ButtonPreset> {
    BUTTON_PRESETS.iter().find(|p| p.name == name)
}

impl ButtonPreset {
    /// Style keys this preset sets.
    pub fn apply(&self, record: &mut Map<String, Value>) {
        record.insert("colorPreset".into(), json!(self.name));
        record.insert("bgColor".into(), json!(self.bg_color));
        record.insert("outlineColor".into(), json!(self.outline_color));
        record.insert("textColor".into(), json!(self.text_color));
    }
}

/// A fresh button record with the given id.
pub(crate) fn new_button(id: &str) -> Value {
    json!({
        "id": id,
        "label": "Button",
        "icon": "\u{2728}",
        "hideIcon": false,
        "url": "https://example.com",
        "colorPreset": "custom",
        "bgColor": ELECTRIC_PURPLE,
        "bgOpacity": 100,
        "outlineColor": ELECTRIC_PURPLE,
        "textColor": STARDUST_WHITE,
        "enableHoverHighlight": true,
        "hoverBgColor": ULTRAVIOLET,
        "hoverTextColor": STARDUST_WHITE,
        "size": "medium",
        "rounding": "round"
    })
}

struct Buttons;

pub fn definition() -> WidgetDefinition {
    let flat = ColorPaths {
        background: "backgroundColor",
        text: "textColor",
    };
    WidgetDefinition::new("buttons", "Button Generator", Buttons)
        .description("Create customizable buttons with advanced styling and actions.")
        .default_config(json!({
            "buttons": [new_button("btn-default")],
            "layout": "horizontal",
            "alignment": "center",
            "useTransparentBackground": false,
            "backgroundColor": STARDUST_WHITE,
            "appearanceMode": "system",
            "showHoverMenu": true,
            "showCustomizeButton": true
        }))
        .fields(vec![
            FieldDescriptor::new(
                "useTransparentBackground",
                "Transparent Widget Background",
                FieldType::Boolean,
            )
            .section("global"),
            FieldDescriptor::new("backgroundColor", "Widget Background Color", FieldType::Color)
                .section("global"),
            appearance_field("appearanceMode", true).section("global"),
            FieldDescriptor::new("showHoverMenu", "Show Hover Menu", FieldType::Boolean)
                .section("global"),
            FieldDescriptor::new(
                "showCustomizeButton",
                "Show Customize Button",
                FieldType::Boolean,
            )
            .section("global"),
            FieldDescriptor::new("layout", "Button Layout", FieldType::Select)
                .section("display")
                .options(&[
                    ("Horizontal", "horizontal"),
                    ("Vertical", "vertical"),
                    ("Full Width", "full-width"),
                ]),
            FieldDescriptor::new("alignment", "Button Alignment", FieldType::Select)
                .section("display")
                .options(&[
                    ("Left", "left"),
                    ("Center", "center"),
                    ("Right", "right"),
                    ("Space Evenly", "space-evenly"),
                ]),
            FieldDescriptor::new("buttons", "Buttons", FieldType::ButtonManager)
                .section("buttons"),
        ])
        .theme(ThemeKeys {
            appearance: "appearanceMode",
            light: ColorPaths {
                background: "backgroundColor",
                text: "lightMode.textColor",
            },
            flat,
            transparent: Some("useTransparentBackground"),
            ..ThemeKeys::default()
        })
}

fn str_of<'a>(record: &'a Value, key: &str, default: &'a str) -> &'a str {
    record.get(key).and_then(Value::as_str).unwrap_or(default)
}

/// Link target for a button: `http`, `https`, `mailto` and relative URLs
/// pass, anything else becomes `#`.
fn safe_href(raw: &str) -> &str {
    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https" | "mailto") => raw,
        Err(ParseError::RelativeUrlWithoutBase) => raw,
        _ => {
            debug!("dropping button link with unsupported scheme");
            "#"
        }
    }
}

fn button_markup(record: &Value) -> String {
    let opacity = record
        .get("bgOpacity")
        .and_then(Value::as_i64)
        .unwrap_or(100)
        .clamp(0, 100);
    let radius = match str_of(record, "rounding", "round") {
        "square" => "0",
        "pill" => "999px",
        _ => "8px",
    };
    let padding = match str_of(record, "size", "medium") {
        "small" => "6px 12px",
        "large" => "14px 28px",
        _ => "10px 20px",
    };
    let hide_icon = record
        .get("hideIcon")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let icon = if hide_icon {
        String::new()
    } else {
        format!(
            r#"<span class="btn-icon">{}</span> "#,
            escape_html(str_of(record, "icon", ""))
        )
    };
    let hover = record
        .get("enableHoverHighlight")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    format!(
        r#"<a class="wbtn" href="{url}" target="_blank" rel="noopener noreferrer" data-hover="{hover}" data-hover-bg="{hover_bg}" data-hover-text="{hover_text}" style="display:inline-block;text-decoration:none;padding:{padding};border-radius:{radius};border:2px solid {outline};color:{text};background:{bg};--bg-opacity:{opacity}%;">{icon}{label}</a>"#,
        url = escape_html(safe_href(str_of(record, "url", "#"))),
        hover_bg = escape_html(&css_value(str_of(record, "hoverBgColor", ""))),
        hover_text = escape_html(&css_value(str_of(record, "hoverTextColor", ""))),
        outline = escape_html(&css_value(str_of(record, "outlineColor", "transparent"))),
        text = escape_html(&css_value(str_of(record, "textColor", "#FFFFFF"))),
        bg = escape_html(&css_value(str_of(record, "bgColor", "#000000"))),
        label = escape_html(str_of(record, "label", "")),
    )
}

impl WidgetRenderer for Buttons {
    fn markup(&self, config: &Config) -> String {
        let direction = match config.str_or("layout", "horizontal") {
            "vertical" | "full-width" => "column",
            _ => "row",
        };
        let justify = match config.str_or("alignment", "center") {
            "left" => "flex-start",
            "right" => "flex-end",
            "space-evenly" => "space-evenly",
            _ => "center",
        };
        let buttons: String = config
            .get("buttons")
            .and_then(Value::as_array)
            .map(|records| records.iter().map(button_markup).collect())
            .unwrap_or_default();
        let hover = hover_menu_style(config);
        let customize = customize_button(config);
        format!(
            r#"<div class="widget widget-buttons" style="display:flex;flex-direction:{direction};justify-content:{justify};gap:12px;flex-wrap:wrap;{hover}">{buttons}{customize}</div>"#
        )
    }

    fn behavior(&self, config: &Config) -> String {
        format!(
            r#"const fullWidth = {full};
document.querySelectorAll('.wbtn').forEach((btn) => {{
  if (fullWidth) btn.style.width = '100%';
  if (btn.dataset.hover !== 'true') return;
  const bg = btn.style.background;
  const color = btn.style.color;
  btn.addEventListener('mouseenter', () => {{
    btn.style.background = btn.dataset.hoverBg;
    btn.style.color = btn.dataset.hoverText;
  }});
  btn.addEventListener('mouseleave', () => {{
    btn.style.background = bg;
    btn.style.color = color;
  }});
}});
"#,
            full = js(config.str_or("layout", "horizontal") == "full-width"),
        )
    }
}
