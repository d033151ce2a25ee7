use serde_json::Value;

/// Flatten a description to plain text.
///
/// Accepts a plain string or a rich-text tree (`{"root": {"children": [...]}}`
/// or a bare list of block nodes). Top-level blocks are separated by a blank
/// line; anything unrecognised contributes nothing.
pub fn plain_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.trim().to_string(),
        Some(Value::Object(map)) => match map.get("root") {
            Some(root) => blocks(root.get("children")),
            None => blocks(map.get("children")),
        },
        Some(Value::Array(_)) => blocks(value),
        _ => String::new(),
    }
}

fn blocks(children: Option<&Value>) -> String {
    children
        .and_then(Value::as_array)
        .map(|nodes| {
            nodes
                .iter()
                .map(|node| inline(node).trim().to_string())
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>()
                .join("\n\n")
        })
        .unwrap_or_default()
}

fn inline(node: &Value) -> String {
    if node.get("type").and_then(Value::as_str) == Some("linebreak") {
        return "\n".to_string();
    }
    let own = node.get("text").and_then(Value::as_str).unwrap_or_default();
    let nested = node
        .get("children")
        .and_then(Value::as_array)
        .map(|children| children.iter().map(inline).collect::<String>())
        .unwrap_or_default();
    format!("{own}{nested}")
}
