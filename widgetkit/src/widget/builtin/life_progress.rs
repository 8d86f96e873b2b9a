use serde_json::{Value, json};

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

struct LifeProgress;

pub fn definition() -> WidgetDefinition {
    let light = ColorPaths {
        background: "backgroundColor",
        text: "textColorLight",
    };
    WidgetDefinition::new("lifeProgress", "Life Progress", LifeProgress)
        .description("Track your life progress with beautiful progress bars.")
        .default_config(json!({
            "birthDate": "1990-01-01",
            "lifeExpectancy": 80,
            "bars": [
                { "id": "year", "label": "Year", "enabled": true },
                { "id": "month", "label": "Month", "enabled": true },
                { "id": "week", "label": "Week", "enabled": true },
                { "id": "day", "label": "Day", "enabled": true },
                { "id": "lifetime", "label": "Lifetime", "enabled": true }
            ],
            "dropShadows": false,
            "useTransparentBackground": false,
            "backgroundColor": STARDUST_WHITE,
            "useGradientBars": true,
            "useGlowEffect": false,
            "barHeight": "medium",
            "textColorLight": NIGHT_BLACK,
            "textColorDark": STARDUST_WHITE,
            "barColorLight": COSMIC_BLUE,
            "barColorDark": ELECTRIC_PURPLE,
            "barBackgroundLight": SOFT_SLATE,
            "barBackgroundDark": GRAPHITE,
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
            transparent: Some("useTransparentBackground"),
        })
}

fn fields() -> Vec<FieldDescriptor> {
    let mut fields = vec![
        FieldDescriptor::new("birthDate", "Birth Date", FieldType::Date).section("progress"),
        FieldDescriptor::new("lifeExpectancy", "Life Expectancy (years)", FieldType::Number)
            .section("progress")
            .range(50.0, 120.0),
        FieldDescriptor::new("bars", "Progress Bars", FieldType::BarList).section("bars"),
        FieldDescriptor::new("useGradientBars", "Use Gradient Bars", FieldType::Boolean)
            .section("bars"),
        FieldDescriptor::new("useGlowEffect", "Glow Effect on Bars", FieldType::Boolean)
            .section("bars"),
        FieldDescriptor::new("barHeight", "Bar Height", FieldType::Select)
            .section("bars")
            .options(&[("Small", "small"), ("Medium", "medium"), ("Large", "large")]),
        FieldDescriptor::new("dropShadows", "Drop Shadows", FieldType::Boolean).section("style"),
        FieldDescriptor::new(
            "useTransparentBackground",
            "Use Transparent Background",
            FieldType::Boolean,
        )
        .section("style"),
        FieldDescriptor::new("backgroundColor", "Background Color", FieldType::Color)
            .section("style"),
        FieldDescriptor::new("textColorLight", "Text Color (Light Mode)", FieldType::Color)
            .section("colors"),
        FieldDescriptor::new("textColorDark", "Text Color (Dark Mode)", FieldType::Color)
            .section("colors"),
        FieldDescriptor::new("barColorLight", "Bar Color (Light Mode)", FieldType::Color)
            .section("colors"),
        FieldDescriptor::new("barColorDark", "Bar Color (Dark Mode)", FieldType::Color)
            .section("colors"),
        appearance_field("appearanceMode", true),
    ];
    fields.extend(feature_fields());
    fields
}

/// Enabled bars as `(id, label)`, in configured order.
fn enabled_bars(config: &Config) -> Vec<(String, String)> {
    config
        .get("bars")
        .and_then(Value::as_array)
        .map(|bars| {
            bars.iter()
                .filter(|bar| bar.get("enabled").and_then(Value::as_bool).unwrap_or(false))
                .filter_map(|bar| {
                    let id = bar.get("id")?.as_str()?;
                    let label = bar.get("label").and_then(Value::as_str).unwrap_or(id);
                    Some((id.to_string(), label.to_string()))
                })
                .collect()
        })
        .unwrap_or_default()
}

impl WidgetRenderer for LifeProgress {
    fn markup(&self, config: &Config) -> String {
        let height = match config.str_or("barHeight", "medium") {
            "small" => 6,
            "large" => 16,
            _ => 10,
        };
        let fill = if config.bool_or("useGradientBars", true) {
            "linear-gradient(90deg, #EC4899 0%, #F59E0B 28%, #06B6D4 50%, #3B82F6 74%, #8B5CF6 100%)"
                .to_string()
        } else {
            escape_html(config.str_or("barColorLight", COSMIC_BLUE))
        };
        let glow = if config.bool_or("useGlowEffect", false) {
            "box-shadow:0 0 4px rgba(139, 92, 246, 0.5);"
        } else {
            ""
        };
        let track = escape_html(config.str_or("barBackgroundLight", SOFT_SLATE));

        let rows: String = enabled_bars(config)
            .iter()
            .map(|(id, label)| {
                format!(
                    r#"<div class="lp-row"><div class="lp-head"><span>{label}</span><span data-pct="{id}">0%</span></div><div class="lp-track" style="height:{height}px;background:{track};border-radius:99px;"><div class="lp-fill" data-bar="{id}" style="height:100%;width:0;background:{fill};border-radius:99px;{glow}"></div></div></div>"#,
                    label = escape_html(label),
                    id = escape_html(id),
                )
            })
            .collect();
        let hover = hover_menu_style(config);
        let customize = customize_button(config);
        format!(r#"<div class="widget widget-life-progress" style="{hover}">{rows}{customize}</div>"#)
    }

    fn behavior(&self, config: &Config) -> String {
        let ids: Vec<String> = enabled_bars(config).into_iter().map(|(id, _)| id).collect();
        format!(
            r#"const birth = new Date({birth});
const expectancy = {expectancy};
const bars = {bars};
function fraction(id, now) {{
  const y = now.getFullYear();
  switch (id) {{
    case 'year': return (now - new Date(y, 0, 1)) / (new Date(y + 1, 0, 1) - new Date(y, 0, 1));
    case 'month': return (now - new Date(y, now.getMonth(), 1)) / (new Date(y, now.getMonth() + 1, 1) - new Date(y, now.getMonth(), 1));
    case 'week': return ((now.getDay() * 86400000) + (now - new Date(y, now.getMonth(), now.getDate()))) / 604800000;
    case 'day': return (now - new Date(y, now.getMonth(), now.getDate())) / 86400000;
    case 'lifetime': return (now - birth) / (expectancy * 31557600000);
    default: return 0;
  }}
}}
function update() {{
  const now = new Date();
  for (const id of bars) {{
    const pct = Math.max(0, Math.min(100, fraction(id, now) * 100));
    const fill = document.querySelector('[data-bar="' + id + '"]');
    const text = document.querySelector('[data-pct="' + id + '"]');
    if (fill) fill.style.width = pct.toFixed(2) + '%';
    if (text) text.textContent = pct.toFixed(1) + '%';
  }}
}}
setInterval(update, 60000);
update();
"#,
            birth = js(config.str_or("birthDate", "1990-01-01")),
            expectancy = config.get_i64("lifeExpectancy").unwrap_or(80),
            bars = js(ids),
        )
    }
}
