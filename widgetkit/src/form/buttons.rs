//! Button-manager list operations.
//!
//! Each operation takes the current list of button records and returns the
//! new list; the form emits it as one change.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::{
    error::FormError,
    widget::builtin::{STYLE_KEYS, new_button, preset},
};

/// Direction of an adjacent swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// An edit of a button list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum ButtonOp {
    /// Append a new grey button.
    Add,
    /// Insert a copy with a fresh id right after `index`.
    Duplicate { index: usize },
    Delete { index: usize },
    Move { index: usize, direction: Direction },
    /// Shallow-merge `patch` into the record. The id cannot be changed.
    Update {
        index: usize,
        patch: Map<String, Value>,
    },
    ApplyPreset { index: usize, preset: String },
    /// Copy the style keys of `index` onto every record, keeping each
    /// record's own id, label and url.
    CopyStyleToAll { index: usize },
}

/// A new unique button id.
pub fn button_id() -> String {
    format!("btn-{}", uuid::Uuid::new_v4().simple())
}

/// Apply `op` to `buttons`.
pub fn apply(field: &str, buttons: &[Value], op: &ButtonOp) -> Result<Vec<Value>, FormError> {
    let check = |index: usize| {
        if index < buttons.len() {
            Ok(index)
        } else {
            Err(FormError::IndexOutOfRange {
                field: field.to_string(),
                index,
                len: buttons.len(),
            })
        }
    };

    let mut next = buttons.to_vec();
    match op {
        ButtonOp::Add => {
            let mut record = new_button(&button_id());
            if let (Some(map), Some(grey)) = (record.as_object_mut(), preset("grey")) {
                map.insert("label".into(), json!("New Button"));
                grey.apply(map);
            }
            next.push(record);
        }
        ButtonOp::Duplicate { index } => {
            let index = check(*index)?;
            let mut clone = next[index].clone();
            if let Some(map) = clone.as_object_mut() {
                map.insert("id".into(), json!(button_id()));
            }
            next.insert(index + 1, clone);
        }
        ButtonOp::Delete { index } => {
            let index = check(*index)?;
            if next.len() == 1 {
                return Err(FormError::LastButton {
                    field: field.to_string(),
                });
            }
            next.remove(index);
        }
        ButtonOp::Move { index, direction } => {
            let index = check(*index)?;
            match direction {
                Direction::Up if index > 0 => next.swap(index, index - 1),
                Direction::Down if index + 1 < next.len() => next.swap(index, index + 1),
                _ => {}
            }
        }
        ButtonOp::Update { index, patch } => {
            let index = check(*index)?;
            if let Some(map) = next[index].as_object_mut() {
                for (key, value) in patch {
                    if key != "id" {
                        map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        ButtonOp::ApplyPreset { index, preset: name } => {
            let index = check(*index)?;
            match (preset(name), next[index].as_object_mut()) {
                (Some(p), Some(map)) => p.apply(map),
                (None, _) => warn!("unknown button preset '{name}'"),
                _ => {}
            }
        }
        ButtonOp::CopyStyleToAll { index } => {
            let index = check(*index)?;
            let style: Map<String, Value> = next[index]
                .as_object()
                .map(|source| {
                    STYLE_KEYS
                        .iter()
                        .filter_map(|key| source.get(*key).map(|v| (key.to_string(), v.clone())))
                        .collect()
                })
                .unwrap_or_default();
            for record in next.iter_mut() {
                if let Some(map) = record.as_object_mut() {
                    for (key, value) in &style {
                        map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(id: &str, label: &str, bg: &str) -> Value {
        json!({
            "id": id, "label": label, "url": format!("https://{id}.test"),
            "bgColor": bg, "textColor": "#fff", "outlineColor": bg,
            "hoverBgColor": "#111", "hoverTextColor": "#222",
            "enableHoverHighlight": false, "bgOpacity": 50, "colorPreset": "custom"
        })
    }

    fn list() -> Vec<Value> {
        vec![record("a", "A", "#aaa"), record("b", "B", "#bbb"), record("c", "C", "#ccc")]
    }

    fn ids(buttons: &[Value]) -> Vec<&str> {
        buttons.iter().map(|b| b["id"].as_str().unwrap()).collect()
    }

    #[test]
    fn test_copy_style_keeps_identity() {
        let out = apply("buttons", &list(), &ButtonOp::CopyStyleToAll { index: 1 }).unwrap();
        assert_eq!(ids(&out), ["a", "b", "c"]);
        for (record, label) in out.iter().zip(["A", "B", "C"]) {
            assert_eq!(record["label"], label);
            assert_eq!(record["bgColor"], "#bbb");
            assert_eq!(record["outlineColor"], "#bbb");
            assert_eq!(record["url"], format!("https://{}.test", label.to_lowercase()));
        }
    }

    #[test]
    fn test_duplicate_inserts_after_with_new_id() {
        let out = apply("buttons", &list(), &ButtonOp::Duplicate { index: 0 }).unwrap();
        assert_eq!(out.len(), 4);
        assert_eq!(out[1]["label"], "A");
        assert_ne!(out[1]["id"], "a");
        assert!(out[1]["id"].as_str().unwrap().starts_with("btn-"));
    }

    #[test]
    fn test_move_and_bounds() {
        let moved = apply(
            "buttons",
            &list(),
            &ButtonOp::Move { index: 2, direction: Direction::Up },
        )
        .unwrap();
        assert_eq!(ids(&moved), ["a", "c", "b"]);

        let edge = apply(
            "buttons",
            &list(),
            &ButtonOp::Move { index: 0, direction: Direction::Up },
        )
        .unwrap();
        assert_eq!(ids(&edge), ["a", "b", "c"]);

        assert!(matches!(
            apply("buttons", &list(), &ButtonOp::Delete { index: 3 }),
            Err(FormError::IndexOutOfRange { index: 3, len: 3, .. })
        ));
    }

    #[test]
    fn test_delete_keeps_last_button() {
        let out = apply("buttons", &list(), &ButtonOp::Delete { index: 1 }).unwrap();
        assert_eq!(ids(&out), ["a", "c"]);

        let single = &out[..1];
        assert_eq!(
            apply("buttons", single, &ButtonOp::Delete { index: 0 }),
            Err(FormError::LastButton {
                field: "buttons".into()
            })
        );
    }

    #[test]
    fn test_update_cannot_change_id() {
        let mut patch = Map::new();
        patch.insert("id".into(), json!("hijack"));
        patch.insert("label".into(), json!("Renamed"));
        let out = apply("buttons", &list(), &ButtonOp::Update { index: 0, patch }).unwrap();
        assert_eq!(out[0]["id"], "a");
        assert_eq!(out[0]["label"], "Renamed");
    }

    #[test]
    fn test_apply_preset_and_add() {
        let out = apply(
            "buttons",
            &list(),
            &ButtonOp::ApplyPreset { index: 0, preset: "green".into() },
        )
        .unwrap();
        assert_eq!(out[0]["bgColor"], "#0F7B6C");
        assert_eq!(out[0]["colorPreset"], "green");

        let added = apply("buttons", &[], &ButtonOp::Add).unwrap();
        assert_eq!(added[0]["label"], "New Button");
        assert_eq!(added[0]["bgColor"], "#9B9A97");
    }

    #[test]
    fn test_op_serde_shape() {
        let op: ButtonOp = serde_json::from_value(json!({ "op": "copyStyleToAll", "index": 2 })).unwrap();
        assert_eq!(op, ButtonOp::CopyStyleToAll { index: 2 });
    }
}
