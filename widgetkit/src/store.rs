//! Authoritative configuration store with a debounced preview view.
//!
//! The form writes through [`ConfigStore::set_field`], which updates the
//! authoritative config immediately and (re)schedules the preview copy.
//! The preview copy only changes once input has been quiet for the debounce
//! interval, so a burst of edits reaches the preview as a single update
//! carrying the final state.
//!
//! Time is passed in explicitly (`*_at` variants) so the behavior is
//! deterministic; callers drive [`ConfigStore::poll`] from a UI refresh
//! tick or sleep until [`ConfigStore::next_deadline`].

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use serde_json::Value;

use crate::{
    data::{
        brand::{BrandKit, apply_brand_kit},
        config::Config,
    },
    head::{DocumentHead, HeadGuard},
    widget::WidgetDefinition,
};

/// Quiet interval used when none is configured.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// A value that follows its input only after a quiet period.
#[derive(Debug, Clone)]
pub struct Debounced<T> {
    current: T,
    pending: Option<(T, Instant)>,
    quiet: Duration,
}

impl<T> Debounced<T> {
    pub fn new(value: T, quiet: Duration) -> Self {
        Self {
            current: value,
            pending: None,
            quiet,
        }
    }

    /// The settled value.
    pub fn get(&self) -> &T {
        &self.current
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Schedule `value`, cancelling anything still pending.
    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.quiet));
    }

    /// Settle the pending value if its deadline has passed.
    ///
    /// Returns whether the settled value changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending.take() {
            Some((value, deadline)) if now >= deadline => {
                self.current = value;
                true
            }
            pending => {
                self.pending = pending;
                false
            }
        }
    }

    /// Replace the settled value immediately and drop anything pending.
    pub fn reset(&mut self, value: T) {
        self.current = value;
        self.pending = None;
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Owns the configuration of the active widget.
#[derive(Debug)]
pub struct ConfigStore {
    widget: Arc<WidgetDefinition>,
    brand: BrandKit,
    config: Config,
    preview: Debounced<Config>,
    head: DocumentHead,
    fonts: Option<HeadGuard>,
}

impl ConfigStore {
    /// Start editing `widget` with `brand` applied to its defaults.
    pub fn new(
        widget: Arc<WidgetDefinition>,
        brand: BrandKit,
        head: DocumentHead,
        quiet: Duration,
    ) -> Self {
        let config = apply_brand_kit(&widget.default_config, &brand);
        let fonts = Some(head.inject(brand.font_links.iter().cloned()));
        Self {
            preview: Debounced::new(config.clone(), quiet),
            widget,
            brand,
            config,
            head,
            fonts,
        }
    }

    pub fn widget(&self) -> &Arc<WidgetDefinition> {
        &self.widget
    }

    pub fn brand(&self) -> &BrandKit {
        &self.brand
    }

    /// The authoritative config.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The debounced copy the preview renders from.
    pub fn preview(&self) -> &Config {
        self.preview.get()
    }

    pub fn head(&self) -> &DocumentHead {
        &self.head
    }

    /// Set one value. The authoritative config changes immediately.
    pub fn set_field(&mut self, path: &str, value: Value) -> bool {
        self.set_field_at(path, value, Instant::now())
    }

    pub fn set_field_at(&mut self, path: &str, value: Value, now: Instant) -> bool {
        if !self.config.set(path, value) {
            return false;
        }
        trace!("store: '{path}' updated");
        self.preview.schedule(self.config.clone(), now);
        true
    }

    /// Settle the preview if the quiet period is over.
    pub fn poll(&mut self) -> bool {
        self.poll_at(Instant::now())
    }

    pub fn poll_at(&mut self, now: Instant) -> bool {
        self.preview.poll(now)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.preview.next_deadline()
    }

    pub fn is_pending(&self) -> bool {
        self.preview.is_pending()
    }

    /// Make `widget` active with branded defaults.
    ///
    /// The preview switches immediately; nothing of the previous widget
    /// stays visible.
    pub fn switch_widget(&mut self, widget: Arc<WidgetDefinition>) {
        info!("switch widget: {} -> {}", self.widget.id, widget.id);
        self.config = apply_brand_kit(&widget.default_config, &self.brand);
        self.preview.reset(self.config.clone());
        self.widget = widget;
    }

    /// Merge `brand` into the current config and make it the active kit.
    ///
    /// The previous kit's font links are released before the new ones are
    /// injected.
    pub fn apply_brand(&mut self, brand: BrandKit) {
        info!("apply brand kit '{}'", brand.id);
        self.fonts = None;
        self.fonts = Some(self.head.inject(brand.font_links.iter().cloned()));
        self.config = apply_brand_kit(&self.config, &brand);
        self.preview.reset(self.config.clone());
        self.brand = brand;
    }

    /// Replace the whole config, e.g. from a decoded token.
    pub fn replace_config(&mut self, config: Config) {
        self.config = config;
        self.preview.reset(self.config.clone());
    }

    /// Whether the config differs from the branded defaults.
    ///
    /// Callers ask for confirmation before applying a kit over
    /// customizations.
    pub fn has_customizations(&self) -> bool {
        self.config != apply_brand_kit(&self.widget.default_config, &self.brand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::registry::builtin;
    use serde_json::json;

    const QUIET: Duration = Duration::from_millis(300);

    fn store() -> ConfigStore {
        let counter = builtin().get("counter").unwrap();
        ConfigStore::new(counter, BrandKit::none(), DocumentHead::new(), QUIET)
    }

    #[test]
    fn test_debounce_collapses_burst() {
        let t0 = Instant::now();
        let mut d = Debounced::new(0, QUIET);
        d.schedule(1, t0);
        d.schedule(2, t0 + Duration::from_millis(100));
        d.schedule(3, t0 + Duration::from_millis(200));
        assert!(!d.poll(t0 + Duration::from_millis(450)));
        assert_eq!(*d.get(), 0);
        assert!(d.poll(t0 + Duration::from_millis(500)));
        assert_eq!(*d.get(), 3);
        assert!(!d.is_pending());
    }

    #[test]
    fn test_set_field_is_immediate_for_form() {
        let mut store = store();
        let t0 = Instant::now();
        store.set_field_at("counterTitle", json!("Push-ups"), t0);
        assert_eq!(store.config().get_str("counterTitle"), Some("Push-ups"));
        assert_eq!(store.preview().get_str("counterTitle"), Some("Counter"));
        assert_eq!(store.next_deadline(), Some(t0 + QUIET));
        assert!(store.poll_at(t0 + QUIET));
        assert_eq!(store.preview().get_str("counterTitle"), Some("Push-ups"));
    }

    #[test]
    fn test_switch_widget_resets_preview() {
        let mut store = store();
        let t0 = Instant::now();
        store.set_field_at("counterTitle", json!("Stale"), t0);
        store.switch_widget(builtin().get("clock").unwrap());
        assert!(!store.is_pending());
        assert!(!store.poll_at(t0 + QUIET));
        assert_eq!(store.preview(), store.config());
        assert!(!store.preview().contains_key("counterTitle"));
    }

    #[test]
    fn test_brand_fonts_follow_active_kit() {
        let mut store = store();
        assert!(store.head().links().is_empty());
        store.apply_brand(BrandKit::jazer());
        assert_eq!(store.head().links(), BrandKit::jazer().font_links);
        store.apply_brand(BrandKit::none());
        assert!(store.head().links().is_empty());
    }

    #[test]
    fn test_drop_releases_fonts() {
        let head = DocumentHead::new();
        let clock = builtin().get("clock").unwrap();
        let store = ConfigStore::new(clock, BrandKit::jazer(), head.clone(), QUIET);
        assert!(!head.links().is_empty());
        drop(store);
        assert!(head.links().is_empty());
    }

    #[test]
    fn test_has_customizations() {
        let mut store = store();
        assert!(!store.has_customizations());
        store.set_field("centerText", json!(false));
        assert!(store.has_customizations());
    }

    #[test]
    fn test_rejected_set_keeps_preview_idle() {
        let mut store = store();
        assert!(!store.set_field("counterTitle.inner", json!(1)));
        assert!(!store.is_pending());
    }
}
