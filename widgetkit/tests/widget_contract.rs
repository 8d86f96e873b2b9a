use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use serde_json::json;
use widgetkit::{
    BrandKit, Config, ConfigStore, FieldDescriptor, FieldType, PreviewEnv, WidgetDefinition,
    WidgetRegistry, WidgetRenderer, apply_brand_kit, codec, compose, escape_html,
    form::{FormEvent, FormRenderer},
    head::DocumentHead,
    widget::registry::builtin,
};

/// Title banner that hides itself when `visible` is off.
struct Banner;

impl WidgetRenderer for Banner {
    fn markup(&self, config: &Config) -> String {
        if config.bool_or("visible", true) {
            format!(
                "<div class=\"banner\">{} x{}</div>",
                escape_html(config.str_or("title", "")),
                config.get_i64("count").unwrap_or_default()
            )
        } else {
            "<div class=\"banner\" hidden></div>".to_string()
        }
    }

    fn behavior(&self, config: &Config) -> String {
        format!("const visible = {};", config.bool_or("visible", true))
    }
}

fn banner() -> WidgetDefinition {
    WidgetDefinition::new("banner", "Banner", Banner)
        .default_config(json!({ "title": "Hi", "count": 3, "visible": true }))
        .fields(vec![
            FieldDescriptor::new("visible", "Visible", FieldType::Boolean).section("display"),
        ])
}

#[test]
fn registered_widget_flows_through_form_store_and_export() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut registry = WidgetRegistry::new();
    registry.register(banner());
    registry.validate().unwrap();
    let def = registry.get("banner").unwrap();

    let before = compose(&def, &def.default_config, None);
    assert!(before.markup.contains("Hi x3"));
    assert!(before.script.contains("const visible = true;"));

    let mut store = ConfigStore::new(
        def.clone(),
        BrandKit::none(),
        DocumentHead::new(),
        Duration::from_millis(300),
    );
    let mut changes = Vec::new();
    FormRenderer::new(&def)
        .handle(
            store.config(),
            "visible",
            FormEvent::SetBool { value: false },
            &mut |path, value| changes.push((path.to_string(), value)),
        )
        .unwrap();
    for (path, value) in changes {
        assert!(store.set_field(&path, value));
    }

    let after = compose(&def, store.config(), None);
    assert!(!after.markup.contains("Hi"));
    assert!(after.script.contains("const visible = false;"));
}

#[test]
fn builtin_field_paths_resolve_in_defaults() {
    for def in builtin().list() {
        for field in &def.fields {
            assert!(
                def.default_config.get(&field.name).is_some(),
                "{}: '{}' has no default",
                def.id,
                field.name
            );
        }
    }
}

#[test]
fn script_payload_is_escaped_everywhere() {
    const PAYLOAD: &str = "<script>alert(1)</script>";
    let quotes = builtin().get("quotes").unwrap();
    let mut config = quotes.default_config.clone();
    config.set("quoteText", json!(format!("{PAYLOAD} and {PAYLOAD}")));
    config.set("author", json!(PAYLOAD));

    let document = compose(&quotes, &config, None);
    assert!(!document.markup.contains("<script>"));
    assert_eq!(document.markup.matches("&lt;script&gt;").count(), 3);
}

#[test]
fn brand_merge_never_adds_keys() {
    for def in builtin().list() {
        let branded = apply_brand_kit(&def.default_config, &BrandKit::jazer());
        let before: Vec<_> = def.default_config.iter().map(|(k, _)| k.clone()).collect();
        let after: Vec<_> = branded.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(before, after, "{}", def.id);
    }
}

#[test]
fn burst_of_edits_reaches_preview_once() {
    let counter = builtin().get("counter").unwrap();
    let quiet = Duration::from_millis(300);
    let mut store = ConfigStore::new(counter.clone(), BrandKit::none(), DocumentHead::new(), quiet);
    let t0 = Instant::now();
    for (i, title) in ["A", "AB", "ABC"].iter().enumerate() {
        store.set_field_at("counterTitle", json!(title), t0 + Duration::from_millis(50 * i as u64));
        assert!(!store.poll_at(t0 + Duration::from_millis(50 * i as u64 + 10)));
        assert_eq!(store.preview().get_str("counterTitle"), Some("Counter"));
    }
    assert!(store.poll_at(t0 + Duration::from_millis(100) + quiet));
    assert_eq!(store.preview().get_str("counterTitle"), Some("ABC"));

    let preview = counter.render(store.preview(), &mut |_, _| {}, None, PreviewEnv::default());
    assert!(preview.markup.contains("ABC"));
}

#[test]
fn share_token_survives_every_builtin() {
    for def in builtin().list() {
        let token = codec::encode(&def.default_config);
        assert_eq!(codec::decode(&token).unwrap(), def.default_config, "{}", def.id);
    }
}
