pub mod brand_guard;
pub mod copywriter;
pub mod human_gate;
pub mod media;
pub mod publisher;

use adweave_core::types::DEPENDENCIES_KEY;

/// Dependency outputs merged into the payload by the executor, keyed by
/// node id. Absent or malformed means no dependencies.
pub(crate) fn dependencies(payload: &serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    payload
        .get(DEPENDENCIES_KEY)
        .and_then(|v| v.as_object())
        .cloned()
        .unwrap_or_default()
}

pub(crate) fn str_field<'a>(payload: &'a serde_json::Value, key: &str) -> Option<&'a str> {
    payload.get(key).and_then(|v| v.as_str())
}

/// Text content produced by upstream nodes, in dependency-map order.
pub(crate) fn dependency_texts(
    deps: &serde_json::Map<String, serde_json::Value>,
) -> Vec<(String, String)> {
    deps.iter()
        .filter_map(|(node, output)| {
            output
                .get("content")
                .and_then(|v| v.as_str())
                .map(|s| (node.clone(), s.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependencies_tolerates_missing_key() {
        assert!(dependencies(&serde_json::json!({"topic": "x"})).is_empty());
        assert!(dependencies(&serde_json::json!(null)).is_empty());
    }

    #[test]
    fn dependency_texts_picks_content_fields() {
        let payload = serde_json::json!({
            "dependencies": {
                "copy": {"content": "Spring sale!", "artifact_id": "a1"},
                "hero": {"locator": "mock://x/image/1"}
            }
        });
        let texts = dependency_texts(&dependencies(&payload));
        assert_eq!(texts, vec![("copy".to_string(), "Spring sale!".to_string())]);
    }
}
