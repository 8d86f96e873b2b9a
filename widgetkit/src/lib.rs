//! # widgetkit
//!
//! A schema-driven engine for configurable, embeddable widgets.
//!
//! A single configuration object flows through one declarative widget
//! definition and comes out three ways: a live preview, a stateless share
//! link, and a standalone HTML document that behaves like the preview.
//!
//! ## Features
//!
//! - Widget contract and ordered registry (clock, counter, countdown, ...)
//! - Form model generated purely from field descriptors
//! - Pure light/dark/transparent theme resolution shared by preview and export
//! - Brand kits merged non-invasively into any widget configuration
//! - URL-safe embed tokens with robust decoding
//! - Standalone document composer with full HTML escaping
//! - Debounced preview view over an authoritative configuration store
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use widgetkit::{codec, export, widget::registry};
//!
//! let clock = registry::builtin().get("clock").unwrap();
//! let config = clock.default_config.clone();
//!
//! let token = codec::encode(&config);
//! assert_eq!(codec::decode(&token).unwrap(), config);
//!
//! let document = export::compose(&clock, &config, None);
//! println!("{document}");
//! ```
//!
//! ## Modules
//!
//! - [`data`] - Configuration values, field descriptors, themes and brand kits
//! - [`widget`] - Widget contract, registry and built-in widgets
//! - [`form`] - Form model generation and field change handling
//! - [`codec`] - Embed token encoding and decoding
//! - [`export`] - Standalone document composer
//! - [`store`] - Authoritative config store with a debounced preview view
//! - [`router`] - Embed/authoring dispatch and share links
//! - [`session`] - Authoring composition of registry, store, form and composer
//! - [`web`] - HTTP surface (requires `web` feature)

#[macro_use]
extern crate log;

/// Configuration values, field descriptors, themes and brand kits.
pub mod data;

/// Error types shared across the crate.
pub mod error;

/// Widget contract, registry and built-in widgets.
pub mod widget;

/// Form model generation from field descriptors.
pub mod form;

/// Embed token encoding and decoding.
pub mod codec;

/// Standalone document composer.
pub mod export;

/// Injected `<head>` resources with scoped lifetimes.
pub mod head;

/// Authoritative config store and debounced preview view.
pub mod store;

/// Embed-mode routing and share link construction.
pub mod router;

/// Authoring session tying registry, store, form and composer together.
pub mod session;

/// HTTP surface for authoring and embedding.
///
/// This module is only available when the `web` feature is enabled.
#[cfg(feature = "web")]
pub mod web;

pub use data::{
    brand::{BrandKit, BrandKits, apply_brand_kit},
    config::Config,
    field::{FieldDescriptor, FieldType, SelectOption},
    theme::{AppearanceMode, ThemeColors, ThemeInputs, ThemeKeys},
};
pub use error::{ContractError, DecodeError, FormError, RegistryError};
pub use export::{Document, compose, escape_html};
pub use serde_json::Value;
pub use session::AuthoringSession;
pub use store::ConfigStore;
pub use widget::{Preview, PreviewEnv, WidgetDefinition, WidgetRenderer, registry::WidgetRegistry};
