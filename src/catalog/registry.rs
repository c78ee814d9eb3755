//! Handle lookup table over a built catalog tree.
//!
//! Every component contributes its default handle and, when configured, its
//! custom handle; each variant contributes its own namespaced handles. All
//! entries share the `Arc`'d records owned by the tree. Default handles are
//! registered before any custom handle so a configured alias can never shadow
//! a structural address; a custom handle that collides with an existing entry
//! is dropped with a warning.

use crate::catalog::identity::Handle;
use crate::catalog::model::{ComponentRecord, Group};
use log::warn;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Clone, Debug)]
/// What a handle points at: a component, optionally narrowed to one variant.
pub struct HandleTarget {
    pub record: Arc<ComponentRecord>,
    pub variant: Option<String>,
}

#[derive(Clone, Debug, Default)]
/// Immutable handle → record map.
pub struct HandleRegistry {
    by_handle: BTreeMap<String, HandleTarget>,
}

impl HandleRegistry {
    /// Flatten `root` into a registry.
    ///
    /// Traversal uses an explicit work list and visits groups left to right,
    /// so collision outcomes are deterministic for a given tree.
    pub fn build(root: &Group) -> Self {
        let components = collect_components(root);
        let mut registry = HandleRegistry::default();

        for record in &components {
            registry.insert_default(&record.default_handle, record, None);
            for variant in &record.variants {
                registry.insert_default(
                    &variant.default_handle,
                    record,
                    Some(&variant.identifier),
                );
            }
        }

        for record in &components {
            if let Some(custom) = &record.custom_handle {
                registry.insert_custom(custom, record, None);
            }
            for variant in &record.variants {
                if let Some(custom) = &variant.custom_handle {
                    registry.insert_custom(custom, record, Some(&variant.identifier));
                }
            }
        }

        registry
    }

    /// Component registered under `handle`, if any.
    pub fn by_handle(&self, handle: &str) -> Option<&Arc<ComponentRecord>> {
        self.by_handle.get(handle).map(|target| &target.record)
    }

    /// Full target (component plus variant) registered under `handle`.
    pub fn target(&self, handle: &str) -> Option<&HandleTarget> {
        self.by_handle.get(handle)
    }

    pub fn len(&self) -> usize {
        self.by_handle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_handle.is_empty()
    }

    fn insert_default(
        &mut self,
        handle: &Handle,
        record: &Arc<ComponentRecord>,
        variant: Option<&str>,
    ) {
        if let Some(existing) = self.by_handle.get(handle.as_str()) {
            if !Arc::ptr_eq(&existing.record, record) {
                warn!(
                    "default handle '{handle}' of {} already belongs to {}",
                    record.template_file, existing.record.template_file
                );
            }
            return;
        }
        self.by_handle.insert(handle.0.clone(), target(record, variant));
    }

    fn insert_custom(
        &mut self,
        handle: &Handle,
        record: &Arc<ComponentRecord>,
        variant: Option<&str>,
    ) {
        match self.by_handle.get(handle.as_str()) {
            Some(existing) if Arc::ptr_eq(&existing.record, record) => {}
            Some(existing) => warn!(
                "custom handle '{handle}' of {} ignored; already used by {}",
                record.template_file, existing.record.template_file
            ),
            None => {
                self.by_handle.insert(handle.0.clone(), target(record, variant));
            }
        }
    }
}

fn target(record: &Arc<ComponentRecord>, variant: Option<&str>) -> HandleTarget {
    HandleTarget {
        record: Arc::clone(record),
        variant: variant.map(str::to_string),
    }
}

/// Components in left-to-right depth-first order.
fn collect_components(root: &Group) -> Vec<Arc<ComponentRecord>> {
    let mut components = Vec::new();
    let mut work: Vec<&Group> = vec![root];
    while let Some(group) = work.pop() {
        components.extend(group.components.iter().cloned());
        work.extend(group.subgroups.iter().rev());
    }
    components
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::model::{CatalogNode, VariantRecord};
    use serde_json::json;

    fn record(identifier: &str, handle: &str, custom: Option<&str>) -> ComponentRecord {
        ComponentRecord {
            identifier: identifier.to_string(),
            label: identifier.to_string(),
            template_file: format!("{handle}.njk"),
            default_handle: Handle::from(handle),
            custom_handle: custom.map(Handle::from),
            variants: Vec::new(),
            context: json!({}),
            layout: None,
            sorting: 0,
        }
    }

    fn with_variant(mut record: ComponentRecord, identifier: &str) -> ComponentRecord {
        let default = VariantRecord {
            identifier: "default".to_string(),
            label: "Default".to_string(),
            template_file: None,
            context: None,
            default_handle: record.default_handle.clone(),
            custom_handle: record.custom_handle.clone(),
        };
        let variant = VariantRecord {
            identifier: identifier.to_string(),
            label: identifier.to_string(),
            template_file: None,
            context: None,
            default_handle: record.default_handle.for_variant(identifier),
            custom_handle: record.custom_handle.as_ref().map(|h| h.for_variant(identifier)),
        };
        record.variants = vec![default, variant];
        record
    }

    #[test]
    fn default_and_custom_handles_share_one_record() {
        let mut root = Group::new("components", "Components");
        root.push(CatalogNode::Component(with_variant(
            record("card", "card", Some("ui-card")),
            "dark",
        )));
        let registry = HandleRegistry::build(&root);

        let by_default = registry.by_handle("card").expect("default handle");
        let by_custom = registry.by_handle("ui-card").expect("custom handle");
        assert!(Arc::ptr_eq(by_default, by_custom));

        let variant = registry.target("ui-card--dark").expect("custom variant handle");
        assert_eq!(variant.variant.as_deref(), Some("dark"));
        assert!(Arc::ptr_eq(&variant.record, by_default));
        assert!(registry.target("card").unwrap().variant.is_none());
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn custom_handles_never_shadow_default_handles() {
        let mut root = Group::new("components", "Components");
        let mut forms = Group::new("forms", "Forms");
        forms.push(CatalogNode::Component(record("input", "forms/input", Some("button"))));
        root.push(CatalogNode::Group(forms));
        root.push(CatalogNode::Component(record("button", "button", None)));
        let registry = HandleRegistry::build(&root);

        assert_eq!(registry.by_handle("button").unwrap().identifier, "button");
        assert_eq!(registry.by_handle("forms/input").unwrap().identifier, "input");
    }

    #[test]
    fn first_custom_handle_wins_in_tree_order() {
        let mut root = Group::new("components", "Components");
        let mut first = Group::new("a", "A");
        first.push(CatalogNode::Component(record("one", "a/one", Some("shared"))));
        let mut second = Group::new("b", "B");
        second.push(CatalogNode::Component(record("two", "b/two", Some("shared"))));
        root.push(CatalogNode::Group(first));
        root.push(CatalogNode::Group(second));

        let registry = HandleRegistry::build(&root);
        assert_eq!(registry.by_handle("shared").unwrap().identifier, "one");
    }

    #[test]
    fn unknown_handles_are_absent() {
        let registry = HandleRegistry::build(&Group::new("components", "Components"));
        assert!(registry.is_empty());
        assert!(registry.by_handle("missing").is_none());
    }
}
