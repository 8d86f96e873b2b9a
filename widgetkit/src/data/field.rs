use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// One choice of a `select` or `checkbox-list` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// The control a field is edited with.
///
/// Serialized as its kebab-case name. Names the renderer does not know are
/// kept in [`FieldType::Other`] so they can be reported instead of lost.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Boolean,
    Select,
    Color,
    Text,
    Number,
    Date,
    DateTime,
    Textarea,
    CheckboxList,
    BarList,
    ButtonManager,
    Group,
    Other(String),
}

impl FieldType {
    /// Canonical name of the type.
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Boolean => "boolean",
            FieldType::Select => "select",
            FieldType::Color => "color",
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::DateTime => "datetime",
            FieldType::Textarea => "textarea",
            FieldType::CheckboxList => "checkbox-list",
            FieldType::BarList => "bar-list",
            FieldType::ButtonManager => "button-manager",
            FieldType::Group => "group",
            FieldType::Other(name) => name,
        }
    }

    /// Whether the type declares a closed option list.
    pub fn needs_options(&self) -> bool {
        matches!(self, FieldType::Select | FieldType::CheckboxList)
    }
}

impl FromStr for FieldType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "boolean" => FieldType::Boolean,
            "select" => FieldType::Select,
            "color" => FieldType::Color,
            "text" => FieldType::Text,
            "number" => FieldType::Number,
            "date" => FieldType::Date,
            "datetime" | "datetime-local" => FieldType::DateTime,
            "textarea" => FieldType::Textarea,
            "checkbox-list" => FieldType::CheckboxList,
            "bar-list" => FieldType::BarList,
            "button-manager" => FieldType::ButtonManager,
            "group" => FieldType::Group,
            other => FieldType::Other(other.to_string()),
        })
    }
}

impl From<String> for FieldType {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(kind) => kind,
            Err(never) => match never {},
        }
    }
}

impl From<FieldType> for String {
    fn from(kind: FieldType) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declarative description of one editable setting.
///
/// `name` is a dotted path into the widget's configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: FieldType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Rendered read-only; never produces changes.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub locked: bool,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldType) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            options: Vec::new(),
            min: None,
            max: None,
            step: None,
            section: None,
            locked: false,
        }
    }

    pub fn section(mut self, section: &str) -> Self {
        self.section = Some(section.to_string());
        self
    }

    /// Set options from `(label, value)` pairs, keeping their order.
    pub fn options(mut self, options: &[(&str, &str)]) -> Self {
        self.options = options
            .iter()
            .map(|(label, value)| SelectOption::new(*label, *value))
            .collect();
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    /// Whether `value` is one of the declared option values.
    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|o| o.value == value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_type_names() {
        assert_eq!(FieldType::from("checkbox-list".to_string()), FieldType::CheckboxList);
        assert_eq!(FieldType::from("datetime-local".to_string()), FieldType::DateTime);
        assert_eq!(
            FieldType::from("stars".to_string()),
            FieldType::Other("stars".into())
        );
        assert_eq!(FieldType::ButtonManager.to_string(), "button-manager");
    }

    #[test]
    fn test_descriptor_deserialize() {
        let field: FieldDescriptor = serde_json::from_value(json!({
            "name": "clockSize",
            "label": "Clock Size",
            "type": "select",
            "section": "style",
            "options": [{ "label": "Small", "value": "small" }]
        }))
        .unwrap();
        assert_eq!(field.kind, FieldType::Select);
        assert!(field.has_option("small"));
        assert!(!field.locked);
    }

    #[test]
    fn test_descriptor_serialize_skips_empty() {
        let field = FieldDescriptor::new("title", "Title", FieldType::Text);
        let value = serde_json::to_value(&field).unwrap();
        assert_eq!(value, json!({ "name": "title", "label": "Title", "type": "text" }));
    }
}
