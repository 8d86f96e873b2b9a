use serde_json::json;

use super::{
    appearance_field, customize_button, effect_classes, feature_fields, font_stack,
    hover_menu_style, js, palette::*, text_align_field,
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

struct Clock;

pub fn definition() -> WidgetDefinition {
    WidgetDefinition::new("clock", "Clock", Clock)
        .description("Advanced customizable clock with multiple styles.")
        .default_config(json!({
            "is12Hour": true,
            "showDate": true,
            "showSeconds": false,
            "clockSize": "large",
            "clockType": "digital-solid",
            "digitFontFamily": "default",
            "textFontFamily": "default",
            "textAlign": "center",
            "textShadows": false,
            "useTransparentBg": false,
            "bgColor": STARDUST_WHITE,
            "appearance": "system",
            "lightMode": {
                "clockColor": GRAPHITE,
                "digitColor": STARDUST_WHITE,
                "textColor": GRAPHITE,
                "backgroundColor": STARDUST_WHITE
            },
            "darkMode": {
                "clockColor": ULTRAVIOLET,
                "digitColor": STARDUST_WHITE,
                "textColor": STARDUST_WHITE,
                "backgroundColor": NIGHT_BLACK
            },
            "showHoverMenu": false,
            "showCustomizeButton": false,
            "glowEffect": false,
            "gradientText": false
        }))
        .fields(fields())
        .theme(ThemeKeys {
            appearance: "appearance",
            flat: ColorPaths {
                background: "bgColor",
                text: "lightMode.textColor",
            },
            transparent: Some("useTransparentBg"),
            ..ThemeKeys::default()
        })
}

fn fields() -> Vec<FieldDescriptor> {
    let mut fields = vec![
        FieldDescriptor::new("is12Hour", "12-Hour Format", FieldType::Boolean).section("time"),
        FieldDescriptor::new("showDate", "Show Date", FieldType::Boolean).section("time"),
        FieldDescriptor::new("showSeconds", "Show Seconds", FieldType::Boolean).section("time"),
        FieldDescriptor::new("clockSize", "Clock Size", FieldType::Select)
            .section("style")
            .options(&[
                ("Small", "small"),
                ("Medium", "medium"),
                ("Large", "large"),
                ("X-Large", "xlarge"),
            ]),
        FieldDescriptor::new("clockType", "Clock Type", FieldType::Select)
            .section("style")
            .options(&[
                ("Digital Solid", "digital-solid"),
                ("Digital Roulette", "digital-roulette"),
                ("Flip Clock", "flip-clock"),
                ("Analog Smooth", "analog-smooth"),
                ("Analog Tick", "analog-tick"),
            ]),
        FieldDescriptor::new("digitFontFamily", "Digit Font", FieldType::Select)
            .section("typography")
            .options(&[("Default", "default"), ("Impact", "impact"), ("Serif", "serif")]),
        FieldDescriptor::new("textFontFamily", "Text Font", FieldType::Select)
            .section("typography")
            .options(&[("Default", "default"), ("Serif", "serif"), ("Mono", "mono")]),
        text_align_field("typography"),
        FieldDescriptor::new("textShadows", "Text Shadows", FieldType::Boolean)
            .section("typography"),
        FieldDescriptor::new("useTransparentBg", "Transparent Background", FieldType::Boolean)
            .section("background"),
        FieldDescriptor::new("bgColor", "Background Color", FieldType::Color)
            .section("background"),
        appearance_field("appearance", true),
        FieldDescriptor::new("lightMode", "Light Mode Colors", FieldType::Group).section("colors"),
        FieldDescriptor::new("darkMode", "Dark Mode Colors", FieldType::Group).section("colors"),
    ];
    fields.extend(feature_fields());
    fields.extend([
        FieldDescriptor::new("glowEffect", "Neon Glow Effect", FieldType::Boolean)
            .section("effects"),
        FieldDescriptor::new("gradientText", "Gradient Text", FieldType::Boolean)
            .section("effects"),
    ]);
    fields
}

fn font_size(size: &str) -> u32 {
    match size {
        "small" => 32,
        "medium" => 48,
        "xlarge" => 96,
        _ => 64,
    }
}

impl WidgetRenderer for Clock {
    fn markup(&self, config: &Config) -> String {
        let size = config.str_or("clockSize", "large");
        let kind = config.str_or("clockType", "digital-solid");
        let shadow = if config.bool_or("textShadows", false) {
            "text-shadow:0 2px 4px rgba(0,0,0,0.1);"
        } else {
            ""
        };

        let mut html = format!(
            r#"<div class="widget widget-clock" style="text-align:{align};font-family:{text_font};{hover}">"#,
            hover = hover_menu_style(config),
            align = escape_html(config.str_or("textAlign", "center")),
            text_font = escape_html(font_stack(config.str_or("textFontFamily", "default"))),
        );
        html.push_str(&format!(
            r#"<div id="clock" class="clock clock-{kind} {effects}" style="font-size:{px}px;font-weight:bold;font-family:{digit_font};{shadow}"></div>"#,
            kind = escape_html(kind),
            effects = effect_classes(config),
            px = font_size(size),
            digit_font = escape_html(font_stack(config.str_or("digitFontFamily", "default"))),
        ));
        if config.bool_or("showDate", true) {
            html.push_str(r#"<div id="date" class="date" style="margin-top:16px;font-size:18px;opacity:0.7;"></div>"#);
        }
        html.push_str(customize_button(config));
        html.push_str("</div>");
        html
    }

    fn behavior(&self, config: &Config) -> String {
        let date = if config.bool_or("showDate", true) {
            r#"
  document.getElementById('date').textContent = now.toLocaleDateString([], {
    weekday: 'long', month: 'long', day: 'numeric', year: 'numeric'
  });"#
        } else {
            ""
        };
        format!(
            r#"function updateClock() {{
  const now = new Date();
  const options = {{ hour: '2-digit', minute: '2-digit', hour12: {hour12} }};
  if ({seconds}) options.second = '2-digit';
  document.getElementById('clock').textContent = now.toLocaleTimeString([], options);{date}
}}
setInterval(updateClock, 1000);
updateClock();
"#,
            hour12 = js(config.bool_or("is12Hour", true)),
            seconds = js(config.bool_or("showSeconds", false)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_follows_config() {
        let def = definition();
        let mut config = def.default_config.clone();
        assert!(def.markup(&config).contains(r#"id="date""#));
        config.set("showDate", json!(false));
        assert!(!def.markup(&config).contains(r#"id="date""#));
        assert!(!def.behavior(&config).contains("getElementById('date')"));
    }

    #[test]
    fn test_behavior_uses_hour_format() {
        let def = definition();
        let mut config = def.default_config.clone();
        config.set("is12Hour", json!(false));
        assert!(def.behavior(&config).contains("hour12: false"));
    }
}
