use serde_json::{Value, json};

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

const CATEGORIES: [(&str, &str); 4] = [
    ("Motivation", "motivation"),
    ("Success", "success"),
    ("Life", "life"),
    ("Wisdom", "wisdom"),
];

const POOL: [(&str, &str, &str); 8] = [
    ("The only way to do great work is to love what you do.", "Steve Jobs", "motivation"),
    ("Innovation distinguishes between a leader and a follower.", "Steve Jobs", "success"),
    ("Your time is limited, don't waste it living someone else's life.", "Steve Jobs", "life"),
    ("Believe you can and you're halfway there.", "Theodore Roosevelt", "motivation"),
    ("The future belongs to those who believe in the beauty of their dreams.", "Eleanor Roosevelt", "life"),
    ("Strive not to be a success, but rather to be of value.", "Albert Einstein", "success"),
    ("Life is 10% what happens to you and 90% how you react to it.", "Charles R. Swindoll", "wisdom"),
    ("The best time to plant a tree was 20 years ago. The second best time is now.", "Chinese Proverb", "wisdom"),
];

struct Quotes;

pub fn definition() -> WidgetDefinition {
    let light = ColorPaths {
        background: "quoteBackgroundLight",
        text: "textColorLight",
    };
    WidgetDefinition::new("quotes", "Quotes", Quotes)
        .description("Inspirational quotes with a refreshable card.")
        .default_config(json!({
            "quoteText": "The only way to do great work is to love what you do.",
            "author": "Steve Jobs",
            "categories": ["motivation", "success"],
            "showRefreshIcon": true,
            "quoteTextFont": "body",
            "textAlign": "center",
            "fontSize": 20,
            "textShadows": false,
            "useTransparentBackground": false,
            "quoteBackgroundLight": STARDUST_WHITE,
            "quoteBackgroundDark": NIGHT_BLACK,
            "textColorLight": GRAPHITE,
            "textColorDark": STARDUST_WHITE,
            "authorColor": SOFT_SLATE,
            "appearanceMode": "system",
            "showHoverMenu": true,
            "showCustomizeButton": true,
            "glowEffect": false,
            "gradientText": false
        }))
        .fields(fields())
        .theme(ThemeKeys {
            appearance: "appearanceMode",
            light,
            dark: ColorPaths {
                background: "quoteBackgroundDark",
                text: "textColorDark",
            },
            flat: light,
            transparent: Some("useTransparentBackground"),
        })
}

fn fields() -> Vec<FieldDescriptor> {
    let mut fields = vec![
        FieldDescriptor::new("quoteText", "Quote", FieldType::Textarea).section("general"),
        FieldDescriptor::new("author", "Author", FieldType::Text).section("general"),
        FieldDescriptor::new("categories", "Refresh Categories", FieldType::CheckboxList)
            .section("settings")
            .options(&CATEGORIES),
        FieldDescriptor::new("showRefreshIcon", "Show Refresh Icon", FieldType::Boolean)
            .section("settings"),
        FieldDescriptor::new("quoteTextFont", "Quote Font", FieldType::Select)
            .section("typography")
            .options(&[
                ("Body", "body"),
                ("Heading", "heading"),
                ("Serif", "serif"),
                ("Mono", "mono"),
            ]),
        text_align_field("typography"),
        FieldDescriptor::new("fontSize", "Font Size", FieldType::Number)
            .section("typography")
            .range(12.0, 48.0)
            .step(1.0),
        FieldDescriptor::new("textShadows", "Text Shadows", FieldType::Boolean)
            .section("typography"),
        FieldDescriptor::new(
            "useTransparentBackground",
            "Use Transparent Background",
            FieldType::Boolean,
        )
        .section("background"),
        FieldDescriptor::new("quoteBackgroundLight", "Card Background (Light)", FieldType::Color)
            .section("colors"),
        FieldDescriptor::new("quoteBackgroundDark", "Card Background (Dark)", FieldType::Color)
            .section("colors"),
        FieldDescriptor::new("textColorLight", "Text Color (Light Mode)", FieldType::Color)
            .section("colors"),
        FieldDescriptor::new("textColorDark", "Text Color (Dark Mode)", FieldType::Color)
            .section("colors"),
        FieldDescriptor::new("authorColor", "Author Color", FieldType::Color).section("colors"),
        appearance_field("appearanceMode", true),
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

impl WidgetRenderer for Quotes {
    fn markup(&self, config: &Config) -> String {
        let font = match config.str_or("quoteTextFont", "body") {
            "body" => "inherit",
            other => font_stack(other),
        };
        let shadow = if config.bool_or("textShadows", false) {
            "text-shadow:0 1px 2px rgba(0,0,0,0.15);"
        } else {
            ""
        };
        let refresh = if config.bool_or("showRefreshIcon", true) {
            r#"<button id="quote-refresh" class="quote-refresh" aria-label="New quote">&#8635;</button>"#
        } else {
            ""
        };
        let hover = hover_menu_style(config);
        let customize = customize_button(config);

        format!(
            r#"<figure class="widget widget-quotes" style="text-align:{align};font-family:{font};{shadow}{hover}"><blockquote id="quote-text" class="{effects}" style="font-size:{size}px;">{text}</blockquote><figcaption id="quote-author" style="color:{author_color};">{author}</figcaption>{refresh}{customize}</figure>"#,
            align = escape_html(config.str_or("textAlign", "center")),
            font = escape_html(font),
            effects = super::effect_classes(config),
            size = config.get_i64("fontSize").unwrap_or(20),
            author_color = escape_html(config.str_or("authorColor", SOFT_SLATE)),
            text = escape_html(config.str_or("quoteText", "")),
            author = escape_html(config.str_or("author", "")),
        )
    }

    fn behavior(&self, config: &Config) -> String {
        let selected: Vec<&str> = config
            .get("categories")
            .and_then(Value::as_array)
            .map(|values| values.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();
        let pool: Vec<Value> = POOL
            .iter()
            .filter(|(_, _, category)| selected.is_empty() || selected.contains(category))
            .map(|(text, author, _)| json!({ "text": text, "author": author }))
            .collect();

        format!(
            r#"const quotes = {pool};
const button = document.getElementById('quote-refresh');
if (button && quotes.length) {{
  button.addEventListener('click', () => {{
    const q = quotes[Math.floor(Math.random() * quotes.length)];
    document.getElementById('quote-text').textContent = q.text;
    document.getElementById('quote-author').textContent = q.author;
  }});
}}
"#,
            pool = js(pool),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_follows_categories() {
        let def = definition();
        let mut config = def.default_config.clone();
        config.set("categories", json!(["wisdom"]));
        let behavior = def.behavior(&config);
        assert!(behavior.contains("Chinese Proverb"));
        assert!(!behavior.contains("Theodore Roosevelt"));
    }

    #[test]
    fn test_quote_is_escaped() {
        let def = definition();
        let mut config = def.default_config.clone();
        config.set("quoteText", json!("a < b & \"c\""));
        assert!(def.markup(&config).contains("a &lt; b &amp; &quot;c&quot;"));
    }
}
