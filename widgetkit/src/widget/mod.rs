//! The widget contract.
//!
//! A [`WidgetDefinition`] bundles everything the engine needs to know about
//! one widget: its id and label, the default configuration, the ordered
//! field descriptors the form is generated from, where its appearance
//! settings live ([`ThemeKeys`]), and a [`WidgetRenderer`] producing markup
//! and behavior from a configuration.
//!
//! Renderers are pure. They never mutate the configuration they are given;
//! a live renderer that wants to change a value goes through the
//! `on_change` callback handed to [`WidgetRenderer::render`].

pub mod builtin;
pub mod registry;

use std::{collections::HashSet, fmt, sync::Arc};

use serde::Serialize;
use serde_json::Value;

use crate::{
    data::{
        brand::BrandKit,
        config::Config,
        field::{FieldDescriptor, FieldType},
        theme::{ThemeColors, ThemeInputs, ThemeKeys},
    },
    error::ContractError,
};

/// Font stack used when neither the brand kit nor the config names one.
pub const DEFAULT_FONT_FAMILY: &str = "system-ui, -apple-system, sans-serif";

/// Viewer environment a live preview is rendered for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreviewEnv {
    pub system_prefers_dark: bool,
}

/// Everything a renderer gets for one live render.
pub struct RenderContext<'a> {
    pub config: &'a Config,
    pub theme: &'a ThemeColors,
    pub brand: Option<&'a BrandKit>,
    pub font_family: &'a str,
}

/// Output of a live render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preview {
    pub widget: String,
    pub theme: ThemeColors,
    pub font_family: String,
    pub markup: String,
    pub behavior: String,
}

/// Produces a widget's markup and behavior.
pub trait WidgetRenderer: Send + Sync {
    /// Markup for `config`. Every user-supplied string must be escaped.
    fn markup(&self, config: &Config) -> String;

    /// Script body for `config`.
    fn behavior(&self, config: &Config) -> String;

    /// Live render.
    ///
    /// The default renders the same markup and behavior the export uses, so
    /// preview and document cannot drift apart.
    fn render(&self, ctx: &RenderContext<'_>, on_change: &mut dyn FnMut(&str, Value)) -> Preview {
        let _ = on_change;
        Preview {
            widget: String::new(),
            theme: ctx.theme.clone(),
            font_family: ctx.font_family.to_string(),
            markup: self.markup(ctx.config),
            behavior: self.behavior(ctx.config),
        }
    }
}

/// A complete widget description.
#[derive(Clone)]
pub struct WidgetDefinition {
    pub id: String,
    pub label: String,
    pub description: Option<String>,
    pub default_config: Config,
    pub fields: Vec<FieldDescriptor>,
    pub theme: ThemeKeys,
    renderer: Arc<dyn WidgetRenderer>,
}

impl fmt::Debug for WidgetDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetDefinition")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("fields", &self.fields.len())
            .finish_non_exhaustive()
    }
}

impl WidgetDefinition {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        renderer: impl WidgetRenderer + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: None,
            default_config: Config::new(),
            fields: Vec::new(),
            theme: ThemeKeys::default(),
            renderer: Arc::new(renderer),
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Set the default configuration from a JSON object literal.
    pub fn default_config(mut self, config: Value) -> Self {
        self.default_config = Config::from_object(config);
        self
    }

    pub fn fields(mut self, fields: Vec<FieldDescriptor>) -> Self {
        self.fields = fields;
        self
    }

    pub fn theme(mut self, theme: ThemeKeys) -> Self {
        self.theme = theme;
        self
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn markup(&self, config: &Config) -> String {
        self.renderer.markup(config)
    }

    pub fn behavior(&self, config: &Config) -> String {
        self.renderer.behavior(config)
    }

    /// Appearance inputs for `config`.
    pub fn theme_inputs(&self, config: &Config, system_prefers_dark: bool) -> ThemeInputs {
        self.theme.inputs(config, system_prefers_dark)
    }

    /// Live render of `config`.
    pub fn render(
        &self,
        config: &Config,
        on_change: &mut dyn FnMut(&str, Value),
        brand: Option<&BrandKit>,
        env: PreviewEnv,
    ) -> Preview {
        let theme = self.theme.resolve(config, env.system_prefers_dark);
        let font_family = font_family(config, brand);
        let ctx = RenderContext {
            config,
            theme: &theme,
            brand,
            font_family: &font_family,
        };
        let mut preview = self.renderer.render(&ctx, on_change);
        preview.widget = self.id.clone();
        preview
    }

    /// Check the definition invariants.
    ///
    /// Every field path must resolve in the default config, option fields
    /// must declare options, names must be unique and types known.
    pub fn validate(&self) -> Result<(), ContractError> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            let widget = self.id.clone();
            let name = field.name.clone();

            if !seen.insert(field.name.as_str()) {
                return Err(ContractError::DuplicateField {
                    widget,
                    field: name,
                });
            }
            if let FieldType::Other(kind) = &field.kind {
                return Err(ContractError::UnsupportedFieldType {
                    widget,
                    field: name,
                    kind: kind.clone(),
                });
            }
            if field.kind.needs_options() && field.options.is_empty() {
                return Err(ContractError::MissingOptions {
                    widget,
                    field: name,
                });
            }
            if self.default_config.get(&field.name).is_none() {
                return Err(ContractError::MissingDefault {
                    widget,
                    field: name,
                });
            }
        }
        Ok(())
    }
}

/// Body font for a render: brand kit, then the config's `fontFamily`, then
/// the system stack.
pub fn font_family(config: &Config, brand: Option<&BrandKit>) -> String {
    brand
        .and_then(|kit| kit.font_family.as_deref())
        .or_else(|| config.get_str("fontFamily"))
        .unwrap_or(DEFAULT_FONT_FAMILY)
        .to_string()
}
