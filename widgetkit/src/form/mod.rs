//! Form model generated from field descriptors.
//!
//! [`FormRenderer::build`] turns a widget's fields and the current config
//! into sections of controls. [`FormRenderer::handle`] turns one user
//! event on one control into at most one `on_change(path, value)` call.
//! The renderer knows nothing about specific widgets; it dispatches purely
//! on the field type.

pub mod buttons;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::{
    data::{
        config::Config,
        field::{FieldDescriptor, FieldType, SelectOption},
    },
    error::{FieldCoercionError, FormError},
    widget::{WidgetDefinition, builtin::BUTTON_PRESETS},
};

pub use buttons::{ButtonOp, Direction};

/// Section used for fields that declare none.
pub const DEFAULT_SECTION: &str = "general";

/// Known sections, in display order, with their titles.
pub const SECTIONS: [(&str, &str); 19] = [
    ("general", "General"),
    ("time", "Time Display"),
    ("event", "Event Setup"),
    ("settings", "Settings"),
    ("global", "Widget Settings"),
    ("progress", "Progress Configuration"),
    ("display", "Display Options"),
    ("style", "Style"),
    ("typography", "Typography"),
    ("units", "Time Units"),
    ("bars", "Progress Bars"),
    ("buttons", "Buttons"),
    ("background", "Background"),
    ("colors", "Colors"),
    ("appearance", "Appearance Mode"),
    ("behavior", "Behavior"),
    ("completion", "Completion"),
    ("features", "Additional Features"),
    ("effects", "Visual Effects"),
];

/// Generated form for one widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Form {
    pub widget: String,
    pub sections: Vec<FormSection>,
}

impl Form {
    /// Find a control by path.
    pub fn control(&self, path: &str) -> Option<&Control> {
        self.sections
            .iter()
            .flat_map(|s| s.controls.iter())
            .find(|c| c.path == path)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSection {
    pub key: String,
    pub title: String,
    pub controls: Vec<Control>,
}

/// One editable (or locked) control.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Control {
    pub path: String,
    pub label: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub locked: bool,
    #[serde(flatten)]
    pub kind: ControlKind,
}

/// How a text-like value is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextInput {
    Line,
    Multiline,
    Date,
    DateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckboxOption {
    pub label: String,
    pub value: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarItem {
    pub id: String,
    pub label: String,
    pub enabled: bool,
}

/// Control state, tagged by `control`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "control", rename_all = "kebab-case")]
pub enum ControlKind {
    Toggle {
        value: bool,
    },
    Select {
        value: String,
        options: Vec<SelectOption>,
    },
    /// A colour picker and its raw text mirror, both editing one path.
    Color {
        picker: String,
        text: String,
    },
    Number {
        value: Option<i64>,
        min: Option<f64>,
        max: Option<f64>,
        step: Option<f64>,
    },
    Text {
        value: String,
        input: TextInput,
    },
    CheckboxList {
        options: Vec<CheckboxOption>,
    },
    BarList {
        bars: Vec<BarItem>,
    },
    ButtonManager {
        buttons: Vec<Value>,
        presets: Vec<String>,
    },
    /// Entries of a nested group such as `lightMode`.
    Group {
        entries: Map<String, Value>,
    },
}

/// A user action on one control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum FormEvent {
    /// Flip a boolean.
    Toggle,
    SetBool { value: bool },
    Select { value: String },
    /// Raw text from an input: text, textarea, date, colour picker or its
    /// text mirror, number.
    Input { value: String },
    ToggleOption { value: String },
    MoveBar { index: usize, direction: Direction },
    ToggleBar { index: usize },
    Button { op: ButtonOp },
    /// Shallow-merge entries into a nested group.
    GroupPatch { patch: Map<String, Value> },
}

impl FormEvent {
    pub fn input(value: impl Into<String>) -> Self {
        FormEvent::Input {
            value: value.into(),
        }
    }

    pub fn select(value: impl Into<String>) -> Self {
        FormEvent::Select {
            value: value.into(),
        }
    }

    /// Patch a single group entry.
    pub fn group_entry(key: impl Into<String>, value: Value) -> Self {
        let mut patch = Map::new();
        patch.insert(key.into(), value);
        FormEvent::GroupPatch { patch }
    }

    fn name(&self) -> &'static str {
        match self {
            FormEvent::Toggle => "toggle",
            FormEvent::SetBool { .. } => "setBool",
            FormEvent::Select { .. } => "select",
            FormEvent::Input { .. } => "input",
            FormEvent::ToggleOption { .. } => "toggleOption",
            FormEvent::MoveBar { .. } => "moveBar",
            FormEvent::ToggleBar { .. } => "toggleBar",
            FormEvent::Button { .. } => "button",
            FormEvent::GroupPatch { .. } => "groupPatch",
        }
    }
}

/// Integer coercion of raw numeric input, like JavaScript `parseInt`:
/// leading whitespace, an optional sign, then the longest digit prefix.
pub fn parse_int(raw: &str) -> Result<i64, FieldCoercionError> {
    let err = || FieldCoercionError {
        input: raw.to_string(),
    };
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return Err(err());
    }
    let magnitude: i64 = rest[..digits].parse().map_err(|_| err())?;
    Ok(if negative { -magnitude } else { magnitude })
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7 && s.starts_with('#') && s[1..].bytes().all(|b| b.is_ascii_hexdigit())
}

fn section_title(key: &str) -> Option<&'static str> {
    SECTIONS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, title)| *title)
}

fn out_of_range(field: &str, index: usize, len: usize) -> FormError {
    FormError::IndexOutOfRange {
        field: field.to_string(),
        index,
        len,
    }
}

fn bar_items(value: Option<&Value>) -> Vec<BarItem> {
    value
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default()
}

/// Generates forms and interprets events for one widget.
pub struct FormRenderer<'a> {
    widget: &'a WidgetDefinition,
    strict: bool,
}

impl<'a> FormRenderer<'a> {
    /// A renderer that is strict about unknown field types in debug builds.
    pub fn new(widget: &'a WidgetDefinition) -> Self {
        Self {
            widget,
            strict: cfg!(debug_assertions),
        }
    }

    /// Whether unknown field types fail the build (`true`) or are skipped
    /// with a warning (`false`).
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Build the form for `config`.
    pub fn build(&self, config: &Config) -> Result<Form, FormError> {
        let mut fields = Vec::with_capacity(self.widget.fields.len());
        for field in &self.widget.fields {
            if let FieldType::Other(kind) = &field.kind {
                if self.strict {
                    return Err(FormError::UnsupportedFieldType {
                        field: field.name.clone(),
                        kind: kind.clone(),
                    });
                }
                warn!(
                    "widget '{}': skipping field '{}' of unsupported type '{kind}'",
                    self.widget.id, field.name
                );
                continue;
            }
            let section = field.section.as_deref().unwrap_or(DEFAULT_SECTION);
            if section_title(section).is_none() {
                debug!(
                    "widget '{}': field '{}' in unlisted section '{section}' dropped",
                    self.widget.id, field.name
                );
                continue;
            }
            fields.push((section, field));
        }

        let sections = SECTIONS
            .iter()
            .filter_map(|(key, title)| {
                let controls: Vec<Control> = fields
                    .iter()
                    .filter(|(section, _)| section == key)
                    .map(|(_, field)| control(field, config))
                    .collect();
                (!controls.is_empty()).then(|| FormSection {
                    key: key.to_string(),
                    title: title.to_string(),
                    controls,
                })
            })
            .collect();

        Ok(Form {
            widget: self.widget.id.clone(),
            sections,
        })
    }

    /// Interpret `event` on the field at `path`.
    ///
    /// Returns whether `on_change` was called. Locked fields and input that
    /// cannot be coerced produce no change.
    pub fn handle(
        &self,
        config: &Config,
        path: &str,
        event: FormEvent,
        on_change: &mut dyn FnMut(&str, Value),
    ) -> Result<bool, FormError> {
        let field = self
            .widget
            .field(path)
            .ok_or_else(|| FormError::UnknownField {
                field: path.to_string(),
            })?;

        if field.locked {
            debug!("field '{path}' is locked, ignoring {}", event.name());
            return Ok(false);
        }

        let unexpected = |event: &FormEvent| FormError::UnexpectedEvent {
            field: path.to_string(),
            kind: field.kind.to_string(),
            event: event.name(),
        };

        let value = match (&field.kind, event) {
            (FieldType::Boolean, FormEvent::Toggle) => json!(!config.bool_or(path, false)),
            (FieldType::Boolean, FormEvent::SetBool { value }) => json!(value),
            (FieldType::Select, FormEvent::Select { value }) => {
                debug_assert!(
                    field.has_option(&value),
                    "'{value}' is not an option of '{path}'"
                );
                json!(value)
            }
            (FieldType::Color, FormEvent::Input { value }) => json!(value),
            (FieldType::Number, FormEvent::Input { value }) => match parse_int(&value) {
                Ok(n) => json!(n),
                Err(e) => {
                    warn!("field '{path}': {e}, keeping previous value");
                    return Ok(false);
                }
            },
            (
                FieldType::Text | FieldType::Textarea | FieldType::Date | FieldType::DateTime,
                FormEvent::Input { value },
            ) => json!(value),
            (FieldType::CheckboxList, FormEvent::ToggleOption { value }) => {
                toggle_option(field, config, &value)
            }
            (FieldType::BarList, FormEvent::MoveBar { index, direction }) => {
                let mut bars = bar_items(config.get(path));
                let len = bars.len();
                if index >= len {
                    return Err(out_of_range(path, index, len));
                }
                match direction {
                    Direction::Up if index > 0 => bars.swap(index, index - 1),
                    Direction::Down if index + 1 < len => bars.swap(index, index + 1),
                    _ => return Ok(false),
                }
                json!(bars)
            }
            (FieldType::BarList, FormEvent::ToggleBar { index }) => {
                let mut bars = bar_items(config.get(path));
                let len = bars.len();
                let bar = bars
                    .get_mut(index)
                    .ok_or_else(|| out_of_range(path, index, len))?;
                bar.enabled = !bar.enabled;
                json!(bars)
            }
            (FieldType::ButtonManager, FormEvent::Button { op }) => {
                let current = config
                    .get(path)
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default();
                Value::Array(buttons::apply(path, &current, &op)?)
            }
            (FieldType::Group, FormEvent::GroupPatch { patch }) => {
                let mut merged = config
                    .get(path)
                    .and_then(Value::as_object)
                    .cloned()
                    .unwrap_or_default();
                merged.extend(patch);
                Value::Object(merged)
            }
            (_, event) => return Err(unexpected(&event)),
        };

        on_change(path, value);
        Ok(true)
    }
}

/// New selection after toggling `value`, in declared option order.
fn toggle_option(field: &FieldDescriptor, config: &Config, value: &str) -> Value {
    let selected: Vec<&str> = config
        .get(&field.name)
        .and_then(Value::as_array)
        .map(|values| values.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    let next: Vec<&str> = field
        .options
        .iter()
        .map(|o| o.value.as_str())
        .filter(|option| {
            let on = selected.contains(option);
            if *option == value { !on } else { on }
        })
        .collect();
    json!(next)
}

fn control(field: &FieldDescriptor, config: &Config) -> Control {
    let path = field.name.as_str();
    let text = |input| ControlKind::Text {
        value: config.str_or(path, "").to_string(),
        input,
    };
    let kind = match &field.kind {
        FieldType::Boolean => ControlKind::Toggle {
            value: config.bool_or(path, false),
        },
        FieldType::Select => ControlKind::Select {
            value: config.str_or(path, "").to_string(),
            options: field.options.clone(),
        },
        FieldType::Color => {
            let text = config.str_or(path, "").to_string();
            ControlKind::Color {
                picker: if is_hex_color(&text) {
                    text.clone()
                } else {
                    "#000000".to_string()
                },
                text,
            }
        }
        FieldType::Number => ControlKind::Number {
            value: config.get_i64(path),
            min: field.min,
            max: field.max,
            step: field.step,
        },
        FieldType::Text => text(TextInput::Line),
        FieldType::Textarea => text(TextInput::Multiline),
        FieldType::Date => text(TextInput::Date),
        FieldType::DateTime => text(TextInput::DateTime),
        FieldType::CheckboxList => {
            let selected = config.get(path).and_then(Value::as_array);
            ControlKind::CheckboxList {
                options: field
                    .options
                    .iter()
                    .map(|o| CheckboxOption {
                        label: o.label.clone(),
                        value: o.value.clone(),
                        checked: selected
                            .is_some_and(|s| s.iter().any(|v| v.as_str() == Some(&o.value))),
                    })
                    .collect(),
            }
        }
        FieldType::BarList => ControlKind::BarList {
            bars: bar_items(config.get(path)),
        },
        FieldType::ButtonManager => ControlKind::ButtonManager {
            buttons: config
                .get(path)
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
            presets: BUTTON_PRESETS.iter().map(|p| p.name.to_string()).collect(),
        },
        FieldType::Group => ControlKind::Group {
            entries: config
                .get(path)
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default(),
        },
        // Filtered out by `build`.
        FieldType::Other(_) => ControlKind::Group {
            entries: Map::new(),
        },
    };
    Control {
        path: field.name.clone(),
        label: field.label.clone(),
        locked: field.locked,
        kind,
    }
}
