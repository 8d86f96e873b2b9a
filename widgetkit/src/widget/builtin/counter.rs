use serde_json::json;

use super::{
    appearance_field, customize_button, feature_fields, hover_menu_style, js, palette::*,
};
use crate::{
    data::{
        config::Config,
        field::{FieldDescriptor, FieldType},
        theme::{ColorPaths, ThemeKeys},
    },
    export::escape_html,
    widget::{WidgetDefinition, WidgetRenderer},
};

struct Counter;

pub fn definition() -> WidgetDefinition {
    let light = ColorPaths {
        background: "backgroundColor",
        text: "textColorLight",
    };
    WidgetDefinition::new("counter", "Counter", Counter)
        .description("Track habits and count things")
        .default_config(json!({
            "counterTitle": "Counter",
            "preferredIcons": "plusMinus",
            "counterSize": "medium",
            "centerText": true,
            "textShadows": false,
            "transparentBg": false,
            "backgroundColor": STARDUST_WHITE,
            "hideResetButton": false,
            "textColorLight": NIGHT_BLACK,
            "textColorDark": STARDUST_WHITE,
            "appearanceMode": "system",
            "showHoverMenu": true,
            "showCustomizeButton": true
        }))
        .fields(fields())
        .theme(ThemeKeys {
            appearance: "appearanceMode",
            light,
            dark: ColorPaths {
                background: "backgroundColor",
                text: "textColorDark",
            },
            flat: light,
            transparent: Some("transparentBg"),
        })
}

fn fields() -> Vec<FieldDescriptor> {
    let mut fields = vec![
        FieldDescriptor::new("counterTitle", "Counter Title", FieldType::Text).section("settings"),
        FieldDescriptor::new("preferredIcons", "Preferred Icons", FieldType::Select)
            .section("settings")
            .options(&[("Plus and Minus", "plusMinus"), ("Arrows", "arrows")]),
        FieldDescriptor::new("counterSize", "Counter Size", FieldType::Select)
            .section("settings")
            .options(&[
                ("Small", "small"),
                ("Medium", "medium"),
                ("Large", "large"),
                ("X-Large", "xlarge"),
            ]),
        FieldDescriptor::new("centerText", "Center Text", FieldType::Boolean).section("style"),
        FieldDescriptor::new("textShadows", "Text Shadows", FieldType::Boolean).section("style"),
        FieldDescriptor::new("transparentBg", "Use Transparent Background", FieldType::Boolean)
            .section("style"),
        FieldDescriptor::new("backgroundColor", "Background Color", FieldType::Color)
            .section("style"),
        FieldDescriptor::new("hideResetButton", "Hide Reset Button", FieldType::Boolean)
            .section("behavior"),
        FieldDescriptor::new("textColorLight", "Text Color (Light Mode)", FieldType::Color)
            .section("colors"),
        FieldDescriptor::new("textColorDark", "Text Color (Dark Mode)", FieldType::Color)
            .section("colors"),
        appearance_field("appearanceMode", true),
    ];
    fields.extend(feature_fields());
    fields
}

impl WidgetRenderer for Counter {
    fn markup(&self, config: &Config) -> String {
        let (down, up) = match config.str_or("preferredIcons", "plusMinus") {
            "arrows" => ("&#8595;", "&#8593;"),
            _ => ("&minus;", "+"),
        };
        let px = match config.str_or("counterSize", "medium") {
            "small" => 32,
            "large" => 64,
            "xlarge" => 96,
            _ => 48,
        };
        let align = if config.bool_or("centerText", true) {
            "center"
        } else {
            "left"
        };
        let shadow = if config.bool_or("textShadows", false) {
            "text-shadow:0 2px 4px rgba(0,0,0,0.15);"
        } else {
            ""
        };
        let reset = if config.bool_or("hideResetButton", false) {
            String::new()
        } else {
            r#"<button id="counter-reset" class="counter-reset">Reset</button>"#.to_string()
        };
        let hover = hover_menu_style(config);
        let customize = customize_button(config);

        format!(
            r#"<div class="widget widget-counter" style="text-align:{align};{shadow}{hover}"><h2 class="counter-title">{title}</h2><div class="counter-row"><button id="counter-down">{down}</button><span id="counter-value" style="font-size:{px}px;font-weight:bold;">0</span><button id="counter-up">{up}</button></div>{reset}{customize}</div>"#,
            title = escape_html(config.str_or("counterTitle", "Counter")),
        )
    }

    fn behavior(&self, config: &Config) -> String {
        format!(
            r#"let count = 0;
const value = document.getElementById('counter-value');
const render = () => {{ value.textContent = String(count); }};
document.getElementById('counter-up').onclick = () => {{ count++; render(); }};
document.getElementById('counter-down').onclick = () => {{ count--; render(); }};
if (!{hide_reset}) {{
  document.getElementById('counter-reset').onclick = () => {{ count = 0; render(); }};
}}
render();
"#,
            hide_reset = js(config.bool_or("hideResetButton", false)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_button_toggle() {
        let def = definition();
        let mut config = def.default_config.clone();
        assert!(def.markup(&config).contains("counter-reset"));
        config.set("hideResetButton", json!(true));
        assert!(!def.markup(&config).contains("counter-reset"));
        assert!(def.behavior(&config).contains("if (!true)"));
    }

    #[test]
    fn test_dark_mode_text_color() {
        let def = definition();
        let mut config = def.default_config.clone();
        config.set("appearanceMode", json!("dark"));
        assert_eq!(def.theme.resolve(&config, false).text, STARDUST_WHITE);
    }
}
