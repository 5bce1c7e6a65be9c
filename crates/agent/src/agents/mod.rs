//! Agent definitions: each agent is a (system prompt, schema,
//! post-validation, exhaustion policy) tuple consumed by the retry
//! controller. Prompt text carries no logic; the contracts live in the
//! schema tables and the typed result builders.

use serde_json::{Map, Value};

pub mod designer;
pub mod interface;
pub mod selector;
pub mod understanding;

pub use designer::design_workflow;
pub use interface::respond_to_user;
pub use selector::{select_next_agent, NextAgentDecision};
pub use understanding::{understand_user, UserUnderstanding};

// Normalized objects are schema-complete by construction; these readers only
// pick typed values out, with shape-matched defaults as the last resort.

pub(crate) fn text_field(fields: &Map<String, Value>, key: &str) -> String {
    fields.get(key).and_then(Value::as_str).unwrap_or_default().to_string()
}

pub(crate) fn bool_field(fields: &Map<String, Value>, key: &str) -> bool {
    fields.get(key).and_then(Value::as_bool).unwrap_or(false)
}

pub(crate) fn list_field(fields: &Map<String, Value>, key: &str) -> Vec<String> {
    fields
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
