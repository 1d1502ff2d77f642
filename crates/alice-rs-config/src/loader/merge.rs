//! JSON merge helper for layered configuration.

use serde_json::Value;

/// Merge `overlay` into `base`. Objects merge per key; anything else in the
/// overlay replaces the base value outright, arrays included.
pub(super) fn merge_json_values(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(existing) => merge_json_values(existing, value),
                    None => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (slot, value) => *slot = value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::merge_json_values;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn nested_objects_merge_and_arrays_replace() {
        let mut base = json!({
            "retrieval": { "top_k": 3, "min_score": 0.2 },
            "extraction": { "rules": ["date", "location"] }
        });
        let overlay = json!({
            "retrieval": { "top_k": 5 },
            "extraction": { "rules": ["personal"] }
        });
        merge_json_values(&mut base, &overlay);
        assert_eq!(
            base,
            json!({
                "retrieval": { "top_k": 5, "min_score": 0.2 },
                "extraction": { "rules": ["personal"] }
            })
        );
    }
}
