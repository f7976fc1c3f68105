use serde_json::Value;

const START_PREFIX: &str = "start";

/// The form a workflow node points at, if any.
///
/// Only nodes carrying a string `data.label` are considered; nodes whose label
/// begins with "start" (any case) are skipped. The reference is the non-empty
/// string at `data.config.form_id`.
pub fn form_reference(node: &Value) -> Option<&str> {
    let data = node.get("data")?;
    let label = data.get("label")?.as_str()?;
    if label.to_lowercase().starts_with(START_PREFIX) {
        return None;
    }

    match data.get("config").and_then(|config| config.get("form_id")) {
        Some(Value::String(form_id)) if !form_id.is_empty() => Some(form_id),
        Some(other) => {
            tracing::debug!("form_id is not a non-empty string: {}", other);
            None
        }
        None => None,
    }
}

/// First form reference in scan order. The caller supplies nodes already
/// sorted by their stored sequence so the result is deterministic.
pub fn first_form_reference<'a>(nodes: impl IntoIterator<Item = &'a Value>) -> Option<String> {
    nodes.into_iter().find_map(form_reference).map(str::to_string)
}
