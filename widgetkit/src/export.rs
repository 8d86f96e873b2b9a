//! Standalone document composer.
//!
//! [`compose`] turns a widget and a configuration snapshot into a complete
//! HTML document that runs without the authoring app. Parts are assembled
//! in a fixed order: document shell, brand font links, one style block,
//! the widget markup, one script block.

use std::fmt;

use serde::Serialize;

use crate::{
    data::{
        brand::BrandKit,
        config::Config,
        theme::{AppearanceMode, ThemeColors, ThemeInputs, resolve},
    },
    widget::{WidgetDefinition, font_family},
};

const RESET_CSS: &str = "* { margin: 0; padding: 0; box-sizing: border-box; }\n\
html, body { width: 100%; height: 100%; }\n";

/// Escape `& < > " '` everywhere in `input`.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Keep a script body from closing its own `<script>` element.
fn guard_script(body: &str) -> String {
    body.replace("</", "<\\/")
}

/// A composed standalone document.
///
/// `Display` renders the full HTML text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    /// Everything inside `<head>` before the style block.
    pub head: String,
    /// Contents of the single style block.
    pub style: String,
    /// Widget markup, exactly as the widget produced it.
    pub markup: String,
    /// Contents of the single script block.
    pub script: String,
    /// Resolved colours the document opens with.
    pub theme: ThemeColors,
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<!DOCTYPE html>")?;
        writeln!(f, "<html lang=\"en\">")?;
        writeln!(f, "<head>")?;
        f.write_str(&self.head)?;
        writeln!(f, "<style>")?;
        f.write_str(&self.style)?;
        writeln!(f, "</style>")?;
        writeln!(f, "</head>")?;
        writeln!(f, "<body>")?;
        writeln!(f, "{}", self.markup)?;
        writeln!(f, "<script>")?;
        f.write_str(&self.script)?;
        writeln!(f, "</script>")?;
        writeln!(f, "</body>")?;
        writeln!(f, "</html>")
    }
}

/// Drop characters that could end a declaration or the style element.
pub(crate) fn css_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '{' | '}' | ';'))
        .collect()
}

fn theme_vars(selector: &str, colors: &ThemeColors) -> String {
    format!(
        "{selector} {{ --widget-bg: {}; --widget-text: {}; }}\n",
        css_value(&colors.background),
        css_value(&colors.text)
    )
}

/// Compose a standalone document for `def` rendered with `config`.
///
/// When a brand kit is given its font links, variables and extra CSS are
/// included. `config` is rendered as is: merge a kit into a raw config with
/// [`apply_brand_kit`](crate::data::brand::apply_brand_kit) before calling
/// this, the way the config store does. Colours come
/// from the same resolver the live preview uses; `system` appearance is
/// expressed as a `prefers-color-scheme` media query so the document
/// follows the viewer.
pub fn compose(def: &WidgetDefinition, config: &Config, brand: Option<&BrandKit>) -> Document {
    let title = escape_html(&format!("{} Widget", def.label));
    let mut head = String::new();
    head.push_str("<meta charset=\"UTF-8\">\n");
    head.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    head.push_str(&format!("<title>{title}</title>\n"));
    if let Some(kit) = brand {
        for href in &kit.font_links {
            head.push_str(&format!(
                "<link rel=\"stylesheet\" href=\"{}\">\n",
                escape_html(href)
            ));
        }
    }

    let inputs = def.theme_inputs(config, false);
    let light = resolve(&inputs);

    let mut style = String::new();
    if let Some(kit) = brand {
        style.push_str(&kit.css_variables_block());
        if !kit.extra_css.is_empty() {
            style.push_str(&kit.extra_css);
            style.push('\n');
        }
    }
    style.push_str(RESET_CSS);
    style.push_str(&theme_vars(":root", &light));
    if inputs.mode == AppearanceMode::System {
        let dark = resolve(&ThemeInputs {
            system_prefers_dark: true,
            ..inputs.clone()
        });
        style.push_str("@media (prefers-color-scheme: dark) {\n  ");
        style.push_str(&theme_vars(":root", &dark));
        style.push_str("}\n");
    }
    style.push_str(&format!(
        "body {{ background: var(--widget-bg); color: var(--widget-text); font-family: {}; }}\n",
        css_value(&font_family(config, brand))
    ));

    debug!("compose '{}' with brand {:?}", def.id, brand.map(|k| &k.id));

    Document {
        head,
        style,
        markup: def.markup(config),
        script: guard_script(&def.behavior(config)),
        theme: light,
    }
}
