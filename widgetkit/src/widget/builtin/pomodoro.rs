use serde_json::json;

use super::palette::*;
use crate::{
    data::{
        config::Config,
        field::{FieldDescriptor, FieldType},
        theme::{ColorPaths, ThemeKeys},
    },
    export::escape_html,
    widget::{WidgetDefinition, WidgetRenderer},
};

struct Pomodoro;

pub fn definition() -> WidgetDefinition {
    let flat = ColorPaths {
        background: "bgColor",
        text: "textColor",
    };
    WidgetDefinition::new("pomodoro", "Pomodoro", Pomodoro)
        .description("Work/break focus timer.")
        .default_config(json!({
            "workTime": 25,
            "breakTime": 5,
            "accentColor": NEON_PINK,
            "textColor": GRAPHITE,
            "bgColor": STARDUST_WHITE
        }))
        .fields(vec![
            FieldDescriptor::new("workTime", "Work", FieldType::Number)
                .section("settings")
                .range(1.0, 120.0),
            FieldDescriptor::new("breakTime", "Break", FieldType::Number)
                .section("settings")
                .range(1.0, 60.0),
            FieldDescriptor::new("accentColor", "Color", FieldType::Color).section("colors"),
        ])
        .theme(ThemeKeys {
            appearance: "appearanceMode",
            light: flat,
            dark: flat,
            flat,
            transparent: None,
        })
}

fn minutes(config: &Config, key: &str, default: i64) -> i64 {
    config.get_i64(key).filter(|m| *m > 0).unwrap_or(default)
}

impl WidgetRenderer for Pomodoro {
    fn markup(&self, config: &Config) -> String {
        format!(
            r#"<div class="widget widget-pomodoro" style="display:flex;flex-direction:column;align-items:center;justify-content:center;height:100%;"><div id="timer" style="font-size:48px;font-weight:bold;margin-bottom:16px;">{work:02}:00</div><button id="btn" style="background:{accent};color:white;border:none;padding:10px 24px;border-radius:99px;font-weight:bold;cursor:pointer;">Start</button></div>"#,
            work = minutes(config, "workTime", 25),
            accent = escape_html(config.str_or("accentColor", NEON_PINK)),
        )
    }

    fn behavior(&self, config: &Config) -> String {
        format!(
            r#"const work = {work} * 60;
const rest = {rest} * 60;
let time = work;
let onBreak = false;
let timer = null;
const el = document.getElementById('timer');
const btn = document.getElementById('btn');
const fmt = (s) => String(Math.floor(s / 60)).padStart(2, '0') + ':' + String(s % 60).padStart(2, '0');
btn.addEventListener('click', () => {{
  if (timer) {{
    clearInterval(timer);
    timer = null;
    btn.textContent = 'Start';
    return;
  }}
  btn.textContent = 'Pause';
  timer = setInterval(() => {{
    if (time > 0) {{ time--; }} else {{ onBreak = !onBreak; time = onBreak ? rest : work; }}
    el.textContent = fmt(time);
  }}, 1000);
}});
"#,
            work = minutes(config, "workTime", 25),
            rest = minutes(config, "breakTime", 5),
        )
    }
}
