//! Authoring composition: registry, store, form, preview and composer.
//!
//! Field edits go through the form renderer into the store. The preview is
//! rendered from the store's debounced view. Export and share links always
//! use the authoritative config so they never lag behind the form.

use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::{
    data::{
        brand::{BrandKit, BrandKits},
        config::Config,
    },
    error::{FormError, RegistryError},
    export::{Document, compose},
    form::{Form, FormEvent, FormRenderer},
    head::DocumentHead,
    router::embed_url,
    store::ConfigStore,
    widget::{Preview, PreviewEnv, registry::WidgetRegistry},
};

pub struct AuthoringSession {
    registry: WidgetRegistry,
    kits: BrandKits,
    store: ConfigStore,
}

impl AuthoringSession {
    /// Start authoring `widget`, or the first registered widget when the id
    /// is unknown or absent.
    pub fn new(
        registry: WidgetRegistry,
        kits: BrandKits,
        widget: Option<&str>,
        quiet: Duration,
    ) -> Result<Self, RegistryError> {
        let def = match widget.map(|id| registry.get(id)) {
            Some(Ok(def)) => def,
            other => {
                if let Some(Err(e)) = other {
                    warn!("{e}, starting with the first widget");
                }
                registry
                    .first()
                    .cloned()
                    .ok_or_else(|| RegistryError::UnknownWidget {
                        id: widget.unwrap_or_default().to_string(),
                    })?
            }
        };
        let store = ConfigStore::new(def, BrandKit::none(), DocumentHead::new(), quiet);
        Ok(Self {
            registry,
            kits,
            store,
        })
    }

    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    pub fn kits(&self) -> &BrandKits {
        &self.kits
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ConfigStore {
        &mut self.store
    }

    /// The form for the active widget and authoritative config.
    pub fn form(&self) -> Result<Form, FormError> {
        FormRenderer::new(self.store.widget()).build(self.store.config())
    }

    /// Apply one form event. Returns whether the config changed.
    pub fn edit(&mut self, path: &str, event: FormEvent) -> Result<bool, FormError> {
        let widget = self.store.widget().clone();
        let mut changes = Vec::new();
        FormRenderer::new(&widget).handle(self.store.config(), path, event, &mut |p, v| {
            changes.push((p.to_string(), v))
        })?;
        Ok(self.apply_changes(changes))
    }

    fn apply_changes(&mut self, changes: Vec<(String, Value)>) -> bool {
        let mut changed = false;
        for (path, value) in changes {
            changed |= self.store.set_field(&path, value);
        }
        changed
    }

    /// Switch to another registered widget with branded defaults.
    pub fn select_widget(&mut self, id: &str) -> Result<(), RegistryError> {
        let def = self.registry.get(id)?;
        self.store.switch_widget(def);
        Ok(())
    }

    /// Apply a registered brand kit to the current config.
    pub fn select_brand(&mut self, id: &str) -> Result<(), RegistryError> {
        let kit = self
            .kits
            .get(id)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownBrandKit { id: id.to_string() })?;
        self.store.apply_brand(kit);
        Ok(())
    }

    /// Settle pending edits into the preview view if they are due.
    pub fn poll(&mut self) -> bool {
        self.store.poll()
    }

    /// Live render of the debounced config.
    ///
    /// Changes the widget reports while rendering are written back through
    /// the store like form edits.
    pub fn preview(&mut self, env: PreviewEnv) -> Preview {
        let widget = self.store.widget().clone();
        let brand = (!self.store.brand().is_neutral()).then(|| self.store.brand().clone());
        let mut changes = Vec::new();
        let preview = widget.render(
            self.store.preview(),
            &mut |p, v| changes.push((p.to_string(), v)),
            brand.as_ref(),
            env,
        );
        self.apply_changes(changes);
        preview
    }

    /// Standalone document for the authoritative config.
    pub fn export(&self) -> Document {
        let brand = self.store.brand();
        compose(
            self.store.widget(),
            self.store.config(),
            (!brand.is_neutral()).then_some(brand),
        )
    }

    /// Share link for the authoritative config.
    pub fn share_link(&self, base: &Url) -> Url {
        embed_url(base, &self.store.widget().id, self.store.config())
    }

    /// Replace the config, e.g. with one decoded from a token.
    pub fn load(&mut self, config: Config) {
        self.store.replace_config(config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{codec, router::EmbedParams, store::DEFAULT_DEBOUNCE};
    use serde_json::json;

    fn session(widget: Option<&str>) -> AuthoringSession {
        AuthoringSession::new(
            WidgetRegistry::with_builtins(),
            BrandKits::default(),
            widget,
            DEFAULT_DEBOUNCE,
        )
        .unwrap()
    }

    #[test]
    fn test_unknown_initial_widget_uses_first() {
        assert_eq!(session(Some("sundial")).store().widget().id, "clock");
        assert_eq!(session(None).store().widget().id, "clock");
        assert_eq!(session(Some("quotes")).store().widget().id, "quotes");
    }

    #[test]
    fn test_edit_reaches_export_before_preview() {
        let mut s = session(Some("counter"));
        assert!(s.edit("counterTitle", FormEvent::input("Reps")).unwrap());
        assert!(s.export().to_string().contains("Reps"));
        let preview = s.preview(PreviewEnv::default());
        assert!(!preview.markup.contains("Reps"));
    }

    #[test]
    fn test_share_link_round_trips() {
        let mut s = session(Some("counter"));
        s.edit("centerText", FormEvent::Toggle).unwrap();
        let base = Url::parse("https://widgets.test/").unwrap();
        let link = s.share_link(&base);
        let params = EmbedParams::from_url(&link);
        assert_eq!(params.widget.as_deref(), Some("counter"));
        let decoded = codec::decode(params.config.as_deref().unwrap()).unwrap();
        assert_eq!(&decoded, s.store().config());
        assert_eq!(decoded.get("centerText"), Some(&json!(false)));
    }

    #[test]
    fn test_brand_applies_to_export() {
        let mut s = session(Some("clock"));
        s.select_brand("jazer").unwrap();
        let html = s.export().to_string();
        assert!(html.contains("--jazer-"));
        assert!(matches!(
            s.select_brand("acme"),
            Err(RegistryError::UnknownBrandKit { .. })
        ));
    }

    #[test]
    fn test_branded_edit_matches_preview_and_export() {
        let mut s = session(Some("counter"));
        s.select_brand("jazer").unwrap();
        s.edit("appearanceMode", FormEvent::select("light")).unwrap();
        s.edit("backgroundColor", FormEvent::input("#123456")).unwrap();
        s.store_mut()
            .poll_at(std::time::Instant::now() + DEFAULT_DEBOUNCE * 2);
        let preview = s.preview(PreviewEnv::default());
        let export = s.export();
        assert_eq!(preview.theme, export.theme);
        assert_eq!(export.theme.background, "#123456");
    }

    #[test]
    fn test_select_widget() {
        let mut s = session(None);
        s.select_widget("pomodoro").unwrap();
        assert_eq!(s.form().unwrap().widget, "pomodoro");
        assert!(s.select_widget("sundial").is_err());
        assert_eq!(s.store().widget().id, "pomodoro");
    }

    #[test]
    fn test_empty_registry() {
        let err = AuthoringSession::new(
            WidgetRegistry::new(),
            BrandKits::default(),
            None,
            DEFAULT_DEBOUNCE,
        )
        .err();
        assert!(matches!(err, Some(RegistryError::UnknownWidget { .. })));
    }
}
