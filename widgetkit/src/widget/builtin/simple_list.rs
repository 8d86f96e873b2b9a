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

struct SimpleList;

pub fn definition() -> WidgetDefinition {
    let flat = ColorPaths {
        background: "bgColor",
        text: "textColor",
    };
    WidgetDefinition::new("simpleList", "List", SimpleList)
        .description("A checklist with one item per line.")
        .default_config(json!({
            "title": "To Do",
            "items": "Task 1\nTask 2",
            "accentColor": COSMIC_BLUE,
            "textColor": GRAPHITE,
            "bgColor": STARDUST_WHITE,
            "strikeCompleted": false
        }))
        .fields(vec![
            FieldDescriptor::new("title", "Title", FieldType::Text),
            FieldDescriptor::new("items", "Items", FieldType::Textarea),
            FieldDescriptor::new("accentColor", "Accent", FieldType::Color),
            FieldDescriptor::new("strikeCompleted", "Strike Completed Items", FieldType::Boolean)
                .locked(),
        ])
        .theme(ThemeKeys {
            appearance: "appearanceMode",
            light: flat,
            dark: flat,
            flat,
            transparent: None,
        })
}

impl WidgetRenderer for SimpleList {
    fn markup(&self, config: &Config) -> String {
        let items: String = config
            .str_or("items", "")
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                format!(
                    r#"<li class="list-item" style="display:flex;gap:12px;margin-bottom:8px;cursor:pointer;"><div style="width:16px;height:16px;border:2px solid currentColor;border-radius:4px;"></div><span>{}</span></li>"#,
                    escape_html(line)
                )
            })
            .collect();

        format!(
            r#"<div class="widget widget-list" style="padding:24px;height:100%;overflow-y:auto;"><h3 style="font-weight:bold;margin-bottom:16px;padding-bottom:8px;border-bottom:2px solid {accent};">{title}</h3><ul style="list-style:none;padding:0;">{items}</ul></div>"#,
            accent = escape_html(config.str_or("accentColor", COSMIC_BLUE)),
            title = escape_html(config.str_or("title", "")),
        )
    }

    fn behavior(&self, config: &Config) -> String {
        let done = if config.bool_or("strikeCompleted", false) {
            "el.style.textDecoration = el.style.textDecoration ? '' : 'line-through';"
        } else {
            "el.style.opacity = el.style.opacity === '0.5' ? '1' : '0.5';"
        };
        format!(
            "document.querySelectorAll('.list-item').forEach((el) => {{\n  el.addEventListener('click', () => {{ {done} }});\n}});\n"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_split_by_line() {
        let def = definition();
        let mut config = def.default_config.clone();
        config.set("items", json!("one\n\n<two>\n"));
        let markup = def.markup(&config);
        assert_eq!(markup.matches("list-item").count(), 2);
        assert!(markup.contains("&lt;two&gt;"));
    }

    #[test]
    fn test_unsectioned_fields() {
        let def = definition();
        assert!(def.fields.iter().all(|f| f.section.is_none()));
        assert!(def.field("strikeCompleted").unwrap().locked);
    }
}
