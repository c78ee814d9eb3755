//! Recursive JSON merge used by the config cascade and context assembly.

use serde_json::Value;

/// Merge `overlay` into `base` in place.
///
/// Objects merge key by key, recursively. Any other overlay value (arrays
/// included) replaces the base value. `null` overlays are skipped so an
/// explicit `null` never erases inherited data.
pub fn deep_merge(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(existing) => deep_merge(existing, overlay_value),
                    None => {
                        if !overlay_value.is_null() {
                            base_map.insert(key.clone(), overlay_value.clone());
                        }
                    }
                }
            }
        }
        (_, Value::Null) => {}
        (base, overlay) => *base = overlay.clone(),
    }
}

/// Owned convenience wrapper: `overlay` merged over a copy of `base`.
pub fn merged(base: &Value, overlay: &Value) -> Value {
    let mut result = base.clone();
    deep_merge(&mut result, overlay);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn nested_objects_merge_per_key() {
        let mut base = json!({"a": 1, "nested": {"x": 1, "y": 2}, "list": [1, 2, 3]});
        deep_merge(
            &mut base,
            &json!({"b": 2, "nested": {"y": 20, "z": 30}, "list": [9]}),
        );
        assert_eq!(
            base,
            json!({"a": 1, "b": 2, "nested": {"x": 1, "y": 20, "z": 30}, "list": [9]})
        );
    }

    #[test]
    fn scalars_replace_objects_and_null_is_ignored() {
        let base = json!({"title": {"text": "a"}, "keep": "me"});
        let result = merged(&base, &json!({"title": "plain", "keep": null}));
        assert_eq!(result, json!({"title": "plain", "keep": "me"}));
    }
}
