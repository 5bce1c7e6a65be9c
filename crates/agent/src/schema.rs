//! Schema-as-data: each agent's expected output is a constant table of field
//! descriptors, and every descriptor kind owns its coercion rule. Overlaying
//! model output onto defaults goes through this table only, so a single
//! wrong-typed field degrades to its default instead of poisoning the object.

use serde_json::{Map, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Bool,
    TextList,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

pub const fn field(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, kind }
}

/// An agent's result schema: fixed at process start, never reflective.
pub type Schema = &'static [FieldSpec];

pub fn lookup(schema: Schema, key: &str) -> Option<&'static FieldSpec> {
    schema.iter().find(|spec| spec.name == key)
}

/// Default object for a schema: empty text, false, empty list. Result
/// objects start here and are selectively overwritten by recovered values.
pub fn defaults(schema: Schema) -> Map<String, Value> {
    schema
        .iter()
        .map(|spec| {
            let value = match spec.kind {
                FieldKind::Text => Value::String(String::new()),
                FieldKind::Bool => Value::Bool(false),
                FieldKind::TextList => Value::Array(Vec::new()),
            };
            (spec.name.to_string(), value)
        })
        .collect()
}

/// Coerce a parsed JSON value into the declared kind. `None` means the value
/// has no sensible reading for this kind and the default must stand.
pub fn coerce(kind: FieldKind, value: &Value) -> Option<Value> {
    match kind {
        FieldKind::Text => coerce_text(value).map(Value::String),
        FieldKind::Bool => Some(Value::Bool(truthy(value))),
        FieldKind::TextList => coerce_text_list(value)
            .map(|items| Value::Array(items.into_iter().map(Value::String).collect())),
    }
}

/// Coerce a raw scraped line value (everything after the first `:`).
pub fn coerce_scalar(kind: FieldKind, raw: &str) -> Value {
    let raw = raw.trim();
    match kind {
        FieldKind::Text => Value::String(raw.to_string()),
        FieldKind::Bool => Value::Bool(truthy_str(raw)),
        FieldKind::TextList => {
            Value::Array(text_list_from_scalar(raw).into_iter().map(Value::String).collect())
        }
    }
}

fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.trim().to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Array(_) | Value::Object(_) | Value::Null => None,
    }
}

fn coerce_text_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(items.iter().filter_map(coerce_text).collect()),
        Value::String(text) => Some(text_list_from_scalar(text)),
        Value::Bool(_) | Value::Number(_) | Value::Object(_) | Value::Null => None,
    }
}

/// A bracketed scalar is parsed as JSON, falling back to a comma split of its
/// interior; anything else becomes a one-element list.
pub fn text_list_from_scalar(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }

    if raw.starts_with('[') && raw.ends_with(']') {
        if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(raw) {
            return items.iter().filter_map(coerce_text).collect();
        }
        return raw[1..raw.len() - 1]
            .split(',')
            .map(|item| item.trim().trim_matches('"').to_string())
            .filter(|item| !item.is_empty())
            .collect();
    }

    vec![raw.to_string()]
}

/// The truthy set: `true`, `"true"`, `"yes"`, `"1"` (and the number 1).
/// Everything else is false.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::String(text) => truthy_str(text),
        Value::Number(number) => number.as_i64() == Some(1),
        _ => false,
    }
}

fn truthy_str(raw: &str) -> bool {
    let raw = raw.trim();
    raw.eq_ignore_ascii_case("true") || raw.eq_ignore_ascii_case("yes") || raw == "1"
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::{coerce, coerce_scalar, defaults, field, text_list_from_scalar, FieldKind, Schema};

    const SCHEMA: Schema = &[
        field("summary", FieldKind::Text),
        field("approved", FieldKind::Bool),
        field("tags", FieldKind::TextList),
    ];

    #[test]
    fn defaults_cover_every_field_with_matching_shape() {
        let object = defaults(SCHEMA);
        assert_eq!(object.len(), 3);
        assert_eq!(object["summary"], json!(""));
        assert_eq!(object["approved"], json!(false));
        assert_eq!(object["tags"], json!([]));
    }

    #[test]
    fn bool_coercion_uses_the_truthy_set_only() {
        for truthy in [json!(true), json!("true"), json!("YES"), json!("1"), json!(1)] {
            assert_eq!(coerce(FieldKind::Bool, &truthy), Some(json!(true)), "{truthy:?}");
        }
        for falsy in [json!(false), json!("no"), json!("maybe"), json!(0), json!(2), json!(null)] {
            assert_eq!(coerce(FieldKind::Bool, &falsy), Some(json!(false)), "{falsy:?}");
        }
    }

    #[test]
    fn text_coercion_stringifies_scalars_and_rejects_containers() {
        assert_eq!(coerce(FieldKind::Text, &json!("  hi  ")), Some(json!("hi")));
        assert_eq!(coerce(FieldKind::Text, &json!(42)), Some(json!("42")));
        assert_eq!(coerce(FieldKind::Text, &json!(true)), Some(json!("true")));
        assert_eq!(coerce(FieldKind::Text, &json!({"a": 1})), None);
        assert_eq!(coerce(FieldKind::Text, &Value::Null), None);
    }

    #[test]
    fn list_coercion_accepts_arrays_and_scalar_strings() {
        assert_eq!(coerce(FieldKind::TextList, &json!(["a", 2, "b"])), Some(json!(["a", "2", "b"])));
        assert_eq!(coerce(FieldKind::TextList, &json!("gmail")), Some(json!(["gmail"])));
        assert_eq!(coerce(FieldKind::TextList, &json!(7)), None);
    }

    #[test]
    fn scraped_bracketed_list_splits_on_commas_when_not_json() {
        assert_eq!(text_list_from_scalar("[gmail, slack]"), vec!["gmail", "slack"]);
        assert_eq!(text_list_from_scalar(r#"["gmail", "slack"]"#), vec!["gmail", "slack"]);
        assert_eq!(text_list_from_scalar("just one"), vec!["just one"]);
        assert!(text_list_from_scalar("").is_empty());
    }

    #[test]
    fn scraped_scalars_follow_field_kind() {
        assert_eq!(coerce_scalar(FieldKind::Text, " plain value "), json!("plain value"));
        assert_eq!(coerce_scalar(FieldKind::Bool, "Yes"), json!(true));
        assert_eq!(coerce_scalar(FieldKind::Bool, "nope"), json!(false));
        assert_eq!(coerce_scalar(FieldKind::TextList, "a, b"), json!(["a, b"]));
    }
}
