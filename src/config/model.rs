//! Typed view over a component configuration document.
//!
//! Documents stay `serde_json::Value` while they cascade so unknown keys
//! survive merging; these structs are pulled out at the end for the fields
//! the catalog understands.

use log::warn;
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Clone, Debug, Default, Deserialize)]
/// Fields recognized in `*.config.json`.
pub struct ComponentConfig {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub layout: Option<String>,
    #[serde(default)]
    pub context: Option<Map<String, Value>>,
    #[serde(default)]
    pub variants: Vec<VariantConfig>,
}

#[derive(Clone, Debug, Deserialize)]
/// One entry of the `variants` array.
pub struct VariantConfig {
    pub identifier: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub context: Option<Map<String, Value>>,
}

impl ComponentConfig {
    /// Extract the typed view, logging and defaulting when the shape is off.
    pub fn from_value(value: &Value) -> Self {
        match serde_json::from_value(value.clone()) {
            Ok(config) => config,
            Err(err) => {
                warn!("config document has unexpected shape, using defaults: {err}");
                Self::default()
            }
        }
    }

    /// Custom handle, ignoring blank strings.
    pub fn custom_handle(&self) -> Option<&str> {
        self.handle
            .as_deref()
            .map(str::trim)
            .filter(|handle| !handle.is_empty())
    }

    /// Layout reference, ignoring blank strings.
    pub fn layout_ref(&self) -> Option<&str> {
        self.layout
            .as_deref()
            .map(str::trim)
            .filter(|layout| !layout.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_known_fields_and_ignores_unknown() {
        let config = ComponentConfig::from_value(&json!({
            "label": "Card",
            "handle": " ui-card ",
            "layout": "",
            "context": {"title": "x"},
            "variants": [{"identifier": "dark", "context": {"theme": "dark"}}],
            "notes": "free-form"
        }));
        assert_eq!(config.label.as_deref(), Some("Card"));
        assert_eq!(config.custom_handle(), Some("ui-card"));
        assert_eq!(config.layout_ref(), None);
        assert_eq!(config.variants.len(), 1);
        assert_eq!(config.variants[0].identifier, "dark");
        assert!(config.variants[0].label.is_none());
    }

    #[test]
    fn wrong_shape_defaults() {
        let config = ComponentConfig::from_value(&json!({"variants": "nope"}));
        assert!(config.variants.is_empty());
        assert!(config.label.is_none());
    }
}
