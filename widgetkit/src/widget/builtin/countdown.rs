use serde_json::json;

use super::{
    appearance_field, customize_button, feature_fields, font_stack, hover_menu_style, js, palette::*,
    text_align_field,
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

struct Countdown;

const UNITS: [(&str, &str, u64); 7] = [
    ("showYear", "years", 31_536_000),
    ("showMonth", "months", 2_592_000),
    ("showWeek", "weeks", 604_800),
    ("showDay", "days", 86_400),
    ("showHour", "hours", 3_600),
    ("showMinute", "minutes", 60),
    ("showSecond", "seconds", 1),
];

pub fn definition() -> WidgetDefinition {
    WidgetDefinition::new("countdown", "Countdown", Countdown)
        .description("Event countdowns with flip cards and confetti")
        .default_config(json!({
            "eventTitle": "Project Launch",
            "targetDate": "2030-01-01T00:00",
            "format24h": true,
            "ignoreTimezone": true,
            "timezone": "UTC",
            "countdownStyle": "flip-countdown",
            "showYear": false,
            "showMonth": true,
            "showWeek": false,
            "showDay": true,
            "showHour": true,
            "showMinute": true,
            "showSecond": true,
            "confettiDuration": "5min",
            "stopAtZero": true,
            "showToGoLabel": true,
            "digitFontFamily": "default",
            "textFontFamily": "default",
            "textAlign": "center",
            "textShadows": false,
            "useTransparentBg": true,
            "appearance": "system",
            "lightMode": {
                "textColor": GRAPHITE,
                "panelColor": STARDUST_WHITE,
                "digitColor": NIGHT_BLACK
            },
            "darkMode": {
                "textColor": STARDUST_WHITE,
                "panelColor": GRAPHITE,
                "digitColor": STARDUST_WHITE
            },
            "showHoverMenu": false,
            "showCustomizeButton": false
        }))
        .fields(fields())
        .theme(ThemeKeys {
            appearance: "appearance",
            light: ColorPaths {
                background: "lightMode.panelColor",
                text: "lightMode.textColor",
            },
            dark: ColorPaths {
                background: "darkMode.panelColor",
                text: "darkMode.textColor",
            },
            flat: ColorPaths {
                background: "lightMode.panelColor",
                text: "lightMode.textColor",
            },
            transparent: Some("useTransparentBg"),
        })
}

fn fields() -> Vec<FieldDescriptor> {
    let mut fields = vec![
        FieldDescriptor::new("eventTitle", "Event Title", FieldType::Text).section("event"),
        FieldDescriptor::new("targetDate", "Target Date & Time", FieldType::DateTime)
            .section("event"),
        FieldDescriptor::new("format24h", "24-Hour Format", FieldType::Boolean).section("event"),
        FieldDescriptor::new("ignoreTimezone", "Ignore Timezone", FieldType::Boolean)
            .section("event"),
        FieldDescriptor::new("timezone", "Timezone", FieldType::Select)
            .section("event")
            .options(&[
                ("UTC", "UTC"),
                ("EST (UTC-5)", "America/New_York"),
                ("PST (UTC-8)", "America/Los_Angeles"),
                ("GMT", "Europe/London"),
                ("CET (UTC+1)", "Europe/Paris"),
                ("JST (UTC+9)", "Asia/Tokyo"),
            ]),
        FieldDescriptor::new("countdownStyle", "Countdown Style", FieldType::Select)
            .section("style")
            .options(&[("Text Only", "text-only"), ("Flip Countdown", "flip-countdown")]),
        text_align_field("style"),
    ];
    let unit_labels = [
        "Show Years",
        "Show Months",
        "Show Weeks",
        "Show Days",
        "Show Hours",
        "Show Minutes",
        "Show Seconds",
    ];
    for ((key, _, _), label) in UNITS.iter().zip(unit_labels) {
        fields.push(FieldDescriptor::new(*key, label, FieldType::Boolean).section("units"));
    }
    fields.extend([
        FieldDescriptor::new("confettiDuration", "Confetti Duration", FieldType::Select)
            .section("completion")
            .options(&[
                ("Never", "never"),
                ("1 Minute", "1min"),
                ("5 Minutes", "5min"),
                ("10 Minutes", "10min"),
                ("1 Hour", "1hour"),
                ("Forever", "forever"),
            ]),
        FieldDescriptor::new("stopAtZero", "Stop at Zero", FieldType::Boolean)
            .section("completion"),
        FieldDescriptor::new("showToGoLabel", "Show \"To Go/Ago\" Label", FieldType::Boolean)
            .section("completion"),
        FieldDescriptor::new("digitFontFamily", "Digit Font", FieldType::Select)
            .section("typography")
            .options(&[("Default", "default"), ("Impact", "impact"), ("Serif", "serif")]),
        FieldDescriptor::new("textFontFamily", "Text Font", FieldType::Select)
            .section("typography")
            .options(&[("Default", "default"), ("Serif", "serif"), ("Mono", "mono")]),
        FieldDescriptor::new("textShadows", "Text Shadows", FieldType::Boolean)
            .section("typography"),
        FieldDescriptor::new("useTransparentBg", "Transparent Background", FieldType::Boolean)
            .section("background"),
        appearance_field("appearance", false),
        FieldDescriptor::new("lightMode", "Light Mode Colors", FieldType::Group).section("colors"),
        FieldDescriptor::new("darkMode", "Dark Mode Colors", FieldType::Group).section("colors"),
    ]);
    fields.extend(feature_fields());
    fields
}

fn enabled_units(config: &Config) -> Vec<(&'static str, u64)> {
    UNITS
        .iter()
        .filter(|(key, _, _)| config.bool_or(key, false))
        .map(|(_, unit, seconds)| (*unit, *seconds))
        .collect()
}

impl WidgetRenderer for Countdown {
    fn markup(&self, config: &Config) -> String {
        let flip = config.str_or("countdownStyle", "flip-countdown") == "flip-countdown";
        let cells: String = enabled_units(config)
            .iter()
            .map(|(unit, _)| {
                format!(
                    r#"<div class="cd-cell{flip}"><span class="cd-value" data-unit="{unit}">0</span><span class="cd-label">{unit}</span></div>"#,
                    flip = if flip { " cd-flip" } else { "" },
                )
            })
            .collect();
        let to_go = if config.bool_or("showToGoLabel", true) {
            r#"<div id="cd-to-go" class="cd-to-go"></div>"#
        } else {
            ""
        };
        let hover = hover_menu_style(config);
        let customize = customize_button(config);

        format!(
            r#"<div class="widget widget-countdown" style="text-align:{align};font-family:{font};{hover}"><h2 class="cd-title">{title}</h2><div class="cd-grid" style="font-family:{digits};">{cells}</div>{to_go}{customize}</div>"#,
            align = escape_html(config.str_or("textAlign", "center")),
            font = escape_html(font_stack(config.str_or("textFontFamily", "default"))),
            digits = escape_html(font_stack(config.str_or("digitFontFamily", "default"))),
            title = escape_html(config.str_or("eventTitle", "")),
        )
    }

    fn behavior(&self, config: &Config) -> String {
        let units: Vec<_> = enabled_units(config)
            .into_iter()
            .map(|(unit, seconds)| json!([unit, seconds]))
            .collect();
        let zone = if config.bool_or("ignoreTimezone", true) {
            ""
        } else {
            "Z"
        };
        format!(
            r#"const target = new Date({target} + {zone}).getTime();
const units = {units};
const stopAtZero = {stop};
function tick() {{
  let diff = Math.round((target - Date.now()) / 1000);
  const past = diff < 0;
  if (past && stopAtZero) diff = 0;
  let rest = Math.abs(diff);
  for (const [unit, size] of units) {{
    const el = document.querySelector('[data-unit="' + unit + '"]');
    const n = Math.floor(rest / size);
    rest -= n * size;
    if (el) el.textContent = String(n).padStart(2, '0');
  }}
  const label = document.getElementById('cd-to-go');
  if (label) label.textContent = past ? 'ago' : 'to go';
}}
setInterval(tick, 1000);
tick();
"#,
            target = js(config.str_or("targetDate", "")),
            zone = js(zone),
            units = js(units),
            stop = js(config.bool_or("stopAtZero", true)),
        )
    }
}
