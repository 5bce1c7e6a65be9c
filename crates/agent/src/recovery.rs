//! Layered recovery of schema-conformant objects from model output.
//!
//! Model responses are supposed to be bare JSON, but in practice arrive as
//! fenced JSON, JSON embedded in prose, loose `key: value` text, or garbage.
//! `normalize` runs an ordered chain of strategies and always produces a
//! fully-populated object; parse failures never leave this module.

use serde_json::{Map, Value};

use weave_core::WorkflowStep;

use crate::schema::{self, Schema};

/// Recover a result object from raw model text. Total: every schema field is
/// present in the output, falling back to its default when nothing usable
/// was recovered for it.
///
/// Strategy order, first whole-object success wins:
/// 1. direct JSON parse;
/// 2. code-fence stripping, then parse;
/// 3. first balanced `{...}` span, then parse;
/// 4. line-oriented `key: value` scraping;
/// 5. schema defaults for whatever is still unset.
pub fn normalize(raw: &str, schema: Schema) -> Map<String, Value> {
    let parsed = parse_object(raw)
        .or_else(|| parse_object(&strip_code_fences(raw)))
        .or_else(|| balanced_span(raw, '{', '}').and_then(|span| parse_object(span)));

    match parsed {
        Some(object) => overlay(schema, object),
        None => scrape_lines(raw, schema),
    }
}

/// Recover an ordered workflow from raw model text. Array elements missing
/// any of the three step keys are dropped; conforming elements are kept in
/// order. Non-JSON text is grouped into steps on step-indicator lines.
pub fn normalize_steps(raw: &str) -> Vec<WorkflowStep> {
    let parsed = parse_array(raw)
        .or_else(|| parse_array(&strip_code_fences(raw)))
        .or_else(|| balanced_span(raw, '[', ']').and_then(|span| parse_array(span)));

    match parsed {
        Some(items) => items.iter().filter_map(step_from_value).collect(),
        None => scrape_step_lines(raw),
    }
}

fn parse_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text.trim()) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}

fn parse_array(text: &str) -> Option<Vec<Value>> {
    match serde_json::from_str::<Value>(text.trim()) {
        Ok(Value::Array(items)) => Some(items),
        _ => None,
    }
}

/// Overlay parsed keys onto schema defaults. Unknown keys are ignored;
/// known keys pass through the kind's coercion rule, and a value the rule
/// rejects leaves that field's default in place.
fn overlay(schema: Schema, parsed: Map<String, Value>) -> Map<String, Value> {
    let mut result = schema::defaults(schema);
    for (key, value) in parsed {
        if let Some(spec) = schema::lookup(schema, &key) {
            if let Some(coerced) = schema::coerce(spec.kind, &value) {
                result.insert(key, coerced);
            }
        }
    }
    result
}

/// Return the contents of the first fenced block, or the input unchanged
/// when no fence is present. Tolerates a `json` language tag and a missing
/// closing fence.
fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    let Some(start) = trimmed.find("```") else {
        return trimmed.to_string();
    };

    let after_fence = &trimmed[start + 3..];
    let body = after_fence
        .strip_prefix("json")
        .or_else(|| after_fence.strip_prefix("JSON"))
        .unwrap_or(after_fence);
    let body = match body.find("```") {
        Some(end) => &body[..end],
        None => body,
    };
    body.trim().to_string()
}

/// First balanced `open...close` span in the text, tracking string literals
/// so braces inside quoted values do not confuse the depth count.
fn balanced_span(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        if ch == '"' {
            in_string = true;
        } else if ch == open {
            depth += 1;
        } else if ch == close {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Some(&text[start..start + offset + ch.len_utf8()]);
            }
        }
    }

    None
}

/// Last-resort recovery: scan `key: value` lines, normalize keys (lowercase,
/// spaces to underscores) and coerce values into the matching field's kind.
fn scrape_lines(raw: &str, schema: Schema) -> Map<String, Value> {
    let mut result = schema::defaults(schema);

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = normalize_key(key);
        let value = value.trim();

        if let Some(spec) = schema::lookup(schema, &key) {
            result.insert(key, schema::coerce_scalar(spec.kind, value));
        }
    }

    result
}

fn normalize_key(raw: &str) -> String {
    raw.trim().to_ascii_lowercase().replace(' ', "_")
}

/// A candidate step is kept only when it carries all three required keys.
fn step_from_value(value: &Value) -> Option<WorkflowStep> {
    let object = value.as_object()?;
    let label = object.get("label")?;
    let description = object.get("description")?;
    let integrations = object.get("integrations")?;

    Some(WorkflowStep {
        label: value_to_text(label),
        description: value_to_text(description),
        integrations: match integrations {
            Value::Array(items) => items.iter().map(value_to_text).collect(),
            other => vec![value_to_text(other)],
        },
    })
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Group loose text into steps: a line starting with a step indicator opens
/// a new step (flushing the previous one); `description` and `integrations`
/// lines fill the current step.
///
/// Indicator matching is prefix-only and greedy: prose lines such as
/// `tasks remaining:` or `actions:` also open a new step. Text only reaches
/// this path after every structured parse has failed, where over-splitting
/// recovers more than a stricter match would. Tightening the prefix check
/// changes what callers get back for loose model output.
fn scrape_step_lines(raw: &str) -> Vec<WorkflowStep> {
    const STEP_INDICATORS: [&str; 3] = ["step", "task", "action"];

    let mut steps = Vec::new();
    let mut current: Option<WorkflowStep> = None;

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let lowered = line.to_ascii_lowercase();
        if STEP_INDICATORS.iter().any(|indicator| lowered.starts_with(indicator)) {
            if let Some(step) = current.take() {
                steps.push(step);
            }
            let label = match line.split_once(':') {
                Some((_, rest)) => rest.trim().to_string(),
                None => line.to_string(),
            };
            current = Some(WorkflowStep {
                label,
                description: String::new(),
                integrations: Vec::new(),
            });
            continue;
        }

        let Some(step) = current.as_mut() else {
            continue;
        };
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();

        match normalize_key(key).as_str() {
            "description" | "desc" => step.description = value.to_string(),
            "integration" | "integrations" => {
                step.integrations = schema::text_list_from_scalar(value);
            }
            _ => {}
        }
    }

    if let Some(step) = current {
        steps.push(step);
    }

    steps
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use weave_core::WorkflowStep;

    use super::{normalize, normalize_steps};
    use crate::schema::{field, FieldKind, Schema};

    const SCHEMA: Schema = &[
        field("summary", FieldKind::Text),
        field("approved", FieldKind::Bool),
        field("tags", FieldKind::TextList),
    ];

    #[test]
    fn empty_input_yields_exact_schema_defaults() {
        let object = normalize("", SCHEMA);
        assert_eq!(object["summary"], json!(""));
        assert_eq!(object["approved"], json!(false));
        assert_eq!(object["tags"], json!([]));
        assert_eq!(object.len(), SCHEMA.len());
    }

    #[test]
    fn well_formed_json_overlays_onto_defaults() {
        let object =
            normalize(r#"{"summary": "done", "tags": ["a", "b"], "extra": 9}"#, SCHEMA);
        assert_eq!(object["summary"], json!("done"));
        assert_eq!(object["tags"], json!(["a", "b"]));
        assert_eq!(object["approved"], json!(false), "missing field keeps default");
        assert!(!object.contains_key("extra"), "unknown keys are ignored");
    }

    #[test]
    fn fenced_json_normalizes_identically_to_unwrapped() {
        let bare = r#"{"summary": "ok", "approved": true, "tags": []}"#;
        let fenced = format!("```json\n{bare}\n```");
        assert_eq!(normalize(&fenced, SCHEMA), normalize(bare, SCHEMA));
    }

    #[test]
    fn json_embedded_in_prose_is_extracted() {
        let raw = "Sure! Here is the result:\n{\"summary\": \"with {braces} inside\", \"approved\": \"yes\"}\nLet me know.";
        let object = normalize(raw, SCHEMA);
        assert_eq!(object["summary"], json!("with {braces} inside"));
        assert_eq!(object["approved"], json!(true));
    }

    #[test]
    fn wrong_typed_field_keeps_default_without_affecting_others() {
        let object = normalize(r#"{"summary": {"oops": 1}, "approved": "yes"}"#, SCHEMA);
        assert_eq!(object["summary"], json!(""), "uncoercible value falls back per field");
        assert_eq!(object["approved"], json!(true));
    }

    #[test]
    fn key_value_lines_are_scraped_with_key_normalization() {
        let raw = "Summary: all set\napproved: yes\nTags: [gmail, slack]\nnot a pair";
        let object = normalize(raw, SCHEMA);
        assert_eq!(object["summary"], json!("all set"));
        assert_eq!(object["approved"], json!(true));
        assert_eq!(object["tags"], json!(["gmail", "slack"]));
    }

    #[test]
    fn selection_style_line_input_scrapes_agent_name() {
        const SELECTION: Schema =
            &[field("next_agent", FieldKind::Text), field("reason", FieldKind::Text)];
        let object = normalize("next_agent: workflow_builder\nreason: ready", SELECTION);
        assert_eq!(object["next_agent"], json!("workflow_builder"));
        assert_eq!(object["reason"], json!("ready"));
    }

    #[test]
    fn step_arrays_drop_partial_elements_and_preserve_order() {
        let raw = r#"[
            {"label": "Read Leads", "description": "Reads leads", "integrations": ["google-sheets"]},
            {"label": "No Description", "integrations": []},
            {"label": "Send Summary", "description": "Posts to channel", "integrations": ["slack"]}
        ]"#;

        let steps = normalize_steps(raw);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].label, "Read Leads");
        assert_eq!(steps[1].label, "Send Summary");
        assert_eq!(steps[1].integrations, vec!["slack"]);
    }

    #[test]
    fn fenced_step_arrays_are_recovered() {
        let raw = "```json\n[{\"label\": \"A\", \"description\": \"B\", \"integrations\": [\"http\"]}]\n```";
        let steps = normalize_steps(raw);
        assert_eq!(
            steps,
            vec![WorkflowStep {
                label: "A".to_string(),
                description: "B".to_string(),
                integrations: vec!["http".to_string()],
            }]
        );
    }

    #[test]
    fn loose_text_groups_lines_into_steps() {
        let raw = "Step 1: Read Leads Data\ndescription: Reads leads from a sheet\nintegrations: [google-sheets]\nStep 2: Notify Team\ndesc: Sends a message\nintegration: slack";
        let steps = normalize_steps(raw);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].label, "Read Leads Data");
        assert_eq!(steps[0].description, "Reads leads from a sheet");
        assert_eq!(steps[0].integrations, vec!["google-sheets"]);
        assert_eq!(steps[1].label, "Notify Team");
        assert_eq!(steps[1].description, "Sends a message");
        assert_eq!(steps[1].integrations, vec!["slack"]);
    }

    #[test]
    fn indicator_prefixes_open_steps_even_inside_prose() {
        // "tasks remaining" starts with "task", so it flushes the current
        // step and opens a new one; greedy prefix matching is the contract
        let raw = "Step 1: Collect Input\ndescription: Gathers the form data\ntasks remaining: two";
        let steps = normalize_steps(raw);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].label, "Collect Input");
        assert_eq!(steps[0].description, "Gathers the form data");
        assert_eq!(steps[1].label, "two");
        assert!(steps[1].description.is_empty());
    }

    #[test]
    fn garbage_step_text_degenerates_to_empty_workflow() {
        assert!(normalize_steps("no structure at all").is_empty());
        assert!(normalize_steps("").is_empty());
    }
}
