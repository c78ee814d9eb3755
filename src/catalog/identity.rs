use crate::paths::{VARIANT_SEPARATOR, strip_ordering_prefixes};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier reserved for a component's base rendering.
pub const DEFAULT_VARIANT: &str = "default";

/// Address of a component or variant (e.g., `forms/button--primary`).
///
/// Default handles are derived from catalog-relative paths with ordering
/// prefixes removed; custom handles come verbatim from configuration.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Handle(pub String);

impl Handle {
    /// Structural handle for a catalog-relative, extension-less path.
    pub fn from_relative_path(relative: &str) -> Self {
        Handle(strip_ordering_prefixes(relative.trim_matches('/')))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Handle of a variant of this component; `default` keeps the bare handle.
    pub fn for_variant(&self, variant: &str) -> Handle {
        if variant == DEFAULT_VARIANT {
            self.clone()
        } else {
            Handle(format!("{}{VARIANT_SEPARATOR}{variant}", self.0))
        }
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Handle {
    fn from(value: &str) -> Self {
        Handle(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_handles_drop_prefixes_on_every_segment() {
        assert_eq!(
            Handle::from_relative_path("01-atoms/10-card").as_str(),
            "atoms/card"
        );
        assert_eq!(Handle::from_relative_path("/button/").as_str(), "button");
    }

    #[test]
    fn variant_handles_append_suffix_except_default() {
        let handle = Handle::from("forms/button");
        assert_eq!(handle.for_variant("primary").as_str(), "forms/button--primary");
        assert_eq!(handle.for_variant(DEFAULT_VARIANT), handle);
    }

    #[test]
    fn handle_serializes_as_plain_string() {
        let json = serde_json::to_string(&Handle::from("ui-card")).unwrap();
        assert_eq!(json, "\"ui-card\"");
        let back: Handle = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_str(), "ui-card");
    }
}
