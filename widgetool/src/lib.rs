//! # widgetool
//!
//! Command line front-end for [`widgetkit`].
//!
//! ## Features
//!
//! - **Registry**: list widgets and inspect their generated forms
//! - **Export**: compose standalone HTML documents, optionally branded
//! - **Share links**: encode configurations as embed URLs and decode tokens
//! - **Serve**: run the embed entry point and JSON API over HTTP
//! - **Editor**: TUI editor with a debounced live preview
//!
//! ## Modules
//!
//! - [`ctx`] - Application context and input resolution
//! - [`menuconfig`] - TUI editor
//! - [`settings`] - `.widgetool.toml` settings file

/// Application context and state management.
pub mod ctx;

/// TUI editor for widget configurations.
pub mod menuconfig;

/// Settings file loading and schema.
pub mod settings;

#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;

pub use widgetkit;
