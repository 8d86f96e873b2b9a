//! Top-level dispatch between embed mode and authoring.
//!
//! An embed request carries `embed=1`, a registered `widget` id and an
//! optional `config` token. It is rendered once from the decoded config
//! with no form, store or export surface. Anything else, including an
//! unknown widget id, gets the authoring view.

use std::sync::Arc;

use url::Url;

use crate::{
    codec,
    data::config::Config,
    export::{Document, compose},
    widget::{WidgetDefinition, registry::WidgetRegistry},
};

/// Query parameters read at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedParams {
    pub embed: Option<String>,
    pub widget: Option<String>,
    pub config: Option<String>,
}

impl EmbedParams {
    /// Parse a raw query string (without the leading `?`).
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let slot = match key.as_ref() {
                "embed" => &mut params.embed,
                "widget" => &mut params.widget,
                "config" => &mut params.config,
                _ => continue,
            };
            *slot = Some(value.into_owned());
        }
        params
    }

    pub fn from_url(url: &Url) -> Self {
        url.query().map(Self::from_query).unwrap_or_default()
    }

    pub fn is_embed(&self) -> bool {
        self.embed.as_deref() == Some("1")
    }
}

/// A widget rendered once from a share link.
#[derive(Debug, Clone)]
pub struct EmbedView {
    pub widget: Arc<WidgetDefinition>,
    pub config: Config,
}

impl EmbedView {
    /// The standalone document for this view. Embeds never apply a kit.
    pub fn document(&self) -> Document {
        compose(&self.widget, &self.config, None)
    }
}

#[derive(Debug, Clone)]
pub enum Route {
    Embed(EmbedView),
    /// Full authoring composition; `requested` is the widget id asked for,
    /// if any.
    Authoring { requested: Option<String> },
}

/// Decide what to run for `params`.
pub fn route(registry: &WidgetRegistry, params: &EmbedParams) -> Route {
    let requested = params.widget.clone();
    if !params.is_embed() {
        return Route::Authoring { requested };
    }
    let Some(id) = params.widget.as_deref() else {
        debug!("embed requested without a widget id");
        return Route::Authoring { requested };
    };
    match registry.get(id) {
        Ok(widget) => {
            let config = codec::decode_or_default(params.config.as_deref(), &widget.default_config);
            info!("embed: rendering '{id}'");
            Route::Embed(EmbedView { widget, config })
        }
        Err(e) => {
            warn!("embed: {e}, falling back to authoring");
            Route::Authoring { requested }
        }
    }
}

/// Share link for `widget` with `config` under `base`.
pub fn embed_url(base: &Url, widget: &str, config: &Config) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut()
        .clear()
        .append_pair("embed", "1")
        .append_pair("widget", widget)
        .append_pair("config", &codec::encode(config));
    url
}
