//! Configuration values and the declarative pieces that describe them.
//!
//! - [`config`] - The open JSON configuration object and path helpers
//! - [`field`] - Field descriptors driving form generation
//! - [`theme`] - Appearance resolution shared by preview and export
//! - [`brand`] - Brand kits and their non-invasive merge

/// Open, JSON-serializable widget configuration.
pub mod config;

/// Field descriptors and field types.
pub mod field;

/// Light/dark/transparent theme resolution.
pub mod theme;

/// Brand kits.
pub mod brand;
