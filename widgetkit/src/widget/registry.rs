//! Ordered widget registry.
//!
//! The registry is the only source of truth for which widgets exist. It is
//! built once at startup and read-only afterwards; [`builtin`] exposes the
//! process-wide instance holding the built-in widgets.

use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;

use crate::{
    error::{ContractError, RegistryError},
    widget::{WidgetDefinition, builtin},
};

/// Widgets keyed by id, in registration order.
#[derive(Debug, Clone, Default)]
pub struct WidgetRegistry {
    widgets: IndexMap<String, Arc<WidgetDefinition>>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in widget.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for def in builtin::all() {
            registry.register(def);
        }
        registry
    }

    /// Add a widget. Registering an existing id replaces the definition but
    /// keeps its position.
    pub fn register(&mut self, def: WidgetDefinition) {
        if self.widgets.contains_key(&def.id) {
            warn!("widget '{}' registered twice, replacing", def.id);
        }
        debug!("register widget '{}'", def.id);
        self.widgets.insert(def.id.clone(), Arc::new(def));
    }

    /// Look up a widget by id.
    pub fn get(&self, id: &str) -> Result<Arc<WidgetDefinition>, RegistryError> {
        self.widgets
            .get(id)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownWidget { id: id.to_string() })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.widgets.contains_key(id)
    }

    /// All widgets in registration order.
    pub fn list(&self) -> impl Iterator<Item = &Arc<WidgetDefinition>> {
        self.widgets.values()
    }

    /// The first registered widget.
    pub fn first(&self) -> Option<&Arc<WidgetDefinition>> {
        self.widgets.first().map(|(_, def)| def)
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Validate every registered definition.
    pub fn validate(&self) -> Result<(), ContractError> {
        self.widgets.values().try_for_each(|def| def.validate())
    }
}

/// The process-wide registry of built-in widgets.
pub fn builtin() -> &'static WidgetRegistry {
    static REGISTRY: OnceLock<WidgetRegistry> = OnceLock::new();
    REGISTRY.get_or_init(WidgetRegistry::with_builtins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::{config::Config, field::FieldDescriptor, field::FieldType},
        widget::WidgetRenderer,
    };
    use serde_json::json;

    struct Blank;

    impl WidgetRenderer for Blank {
        fn markup(&self, _config: &Config) -> String {
            String::new()
        }

        fn behavior(&self, _config: &Config) -> String {
            String::new()
        }
    }

    #[test]
    fn test_get_unknown() {
        let registry = WidgetRegistry::new();
        assert_eq!(
            registry.get("sundial").unwrap_err(),
            RegistryError::UnknownWidget {
                id: "sundial".into()
            }
        );
    }

    #[test]
    fn test_list_keeps_registration_order() {
        let mut registry = WidgetRegistry::new();
        for id in ["b", "a", "c"] {
            registry.register(WidgetDefinition::new(id, id, Blank));
        }
        let ids: Vec<_> = registry.list().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["b", "a", "c"]);
    }

    #[test]
    fn test_register_replaces_in_place() {
        let mut registry = WidgetRegistry::new();
        registry.register(WidgetDefinition::new("a", "First", Blank));
        registry.register(WidgetDefinition::new("b", "B", Blank));
        registry.register(WidgetDefinition::new("a", "Second", Blank));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.first().unwrap().label, "Second");
    }

    #[test]
    fn test_validate_reports_broken_widget() {
        let mut registry = WidgetRegistry::new();
        registry.register(
            WidgetDefinition::new("broken", "Broken", Blank)
                .default_config(json!({}))
                .fields(vec![FieldDescriptor::new("x", "X", FieldType::Boolean)]),
        );
        assert!(registry.validate().is_err());
    }

    #[test]
    fn test_builtin_registry_is_valid() {
        let registry = builtin();
        assert!(registry.contains("clock"));
        assert_eq!(registry.validate(), Ok(()));
    }
}
