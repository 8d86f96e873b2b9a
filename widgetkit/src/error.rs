//! Error types for widget lookup, token decoding, form handling and
//! definition validation.
//!
//! None of these terminate a session: callers recover by falling back to
//! defaults, ignoring an edit, or (for contract errors) fixing the widget.

use thiserror::Error;

/// Errors raised by widget and brand kit lookups.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// No widget is registered under this id.
    #[error("unknown widget: {id}")]
    UnknownWidget { id: String },

    /// No brand kit is registered under this id.
    #[error("unknown brand kit: {id}")]
    UnknownBrandKit { id: String },
}

/// Errors raised while decoding an embed token.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The token is not valid base64 in either alphabet.
    #[error("malformed token: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The decoded bytes are not text.
    #[error("token payload is not UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The percent-encoded layer could not be reversed.
    #[error("invalid percent-encoding in token")]
    Percent,

    /// The payload is not JSON.
    #[error("token payload is not JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload is JSON but not an object.
    #[error("token payload is not a JSON object")]
    NotAnObject,
}

/// Errors raised by the form renderer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormError {
    /// A field descriptor declares a type the renderer does not know.
    #[error("field '{field}' has unsupported type '{kind}'")]
    UnsupportedFieldType { field: String, kind: String },

    /// The widget has no field with this name.
    #[error("unknown field: {field}")]
    UnknownField { field: String },

    /// The event does not apply to the field's control.
    #[error("event {event} does not apply to {kind} field '{field}'")]
    UnexpectedEvent {
        field: String,
        kind: String,
        event: &'static str,
    },

    /// A list operation addressed an element that does not exist.
    #[error("index {index} out of range for '{field}' (len {len})")]
    IndexOutOfRange {
        field: String,
        index: usize,
        len: usize,
    },

    /// A button manager always keeps at least one button.
    #[error("cannot delete the last button of '{field}'")]
    LastButton { field: String },
}

/// Violations of the widget definition contract.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContractError {
    /// A field path does not resolve to a value in the default config.
    #[error("widget '{widget}': field '{field}' has no default value")]
    MissingDefault { widget: String, field: String },

    /// A `select` or `checkbox-list` field declares no options.
    #[error("widget '{widget}': field '{field}' needs at least one option")]
    MissingOptions { widget: String, field: String },

    /// Two fields share a name.
    #[error("widget '{widget}': duplicate field '{field}'")]
    DuplicateField { widget: String, field: String },

    /// A field declares an unknown type.
    #[error("widget '{widget}': field '{field}' has unsupported type '{kind}'")]
    UnsupportedFieldType {
        widget: String,
        field: String,
        kind: String,
    },
}

/// Failed integer coercion of raw numeric input.
///
/// Not an error path: the form keeps the previous value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("'{input}' is not a number")]
pub struct FieldCoercionError {
    pub input: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RegistryError::UnknownWidget {
            id: "sundial".into(),
        };
        assert_eq!(err.to_string(), "unknown widget: sundial");
    }

    #[test]
    fn test_form_error_display() {
        let err = FormError::UnsupportedFieldType {
            field: "rating".into(),
            kind: "stars".into(),
        };
        assert!(err.to_string().contains("rating"));
        assert!(err.to_string().contains("stars"));
    }
}
