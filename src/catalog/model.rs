//! Catalog tree types.
//!
//! The serialized form (camelCase JSON) is what the listing API hands to the
//! browsing UI. Records are shared through `Arc` so the handle registry can
//! point at the same instances the tree owns.

use crate::catalog::identity::Handle;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
/// Non-leaf catalog node: a directory that groups components.
pub struct Group {
    pub identifier: String,
    pub label: String,
    pub sorting: usize,
    pub subgroups: Vec<Group>,
    pub components: Vec<Arc<ComponentRecord>>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
/// One renderable component backed by a template document.
pub struct ComponentRecord {
    pub identifier: String,
    pub label: String,
    /// Catalog-relative, `/`-separated path of the default template.
    pub template_file: String,
    pub default_handle: Handle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_handle: Option<Handle>,
    pub variants: Vec<VariantRecord>,
    /// Default render data; always a JSON object.
    pub context: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    pub sorting: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Alternate rendering of a component.
pub struct VariantRecord {
    pub identifier: String,
    pub label: String,
    /// Own template, if any; `None` renders through the component template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
    pub default_handle: Handle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_handle: Option<Handle>,
}

/// A scanned directory entry: exactly one of the two node kinds.
#[derive(Clone, Debug)]
pub enum CatalogNode {
    Group(Group),
    Component(ComponentRecord),
}

impl CatalogNode {
    pub fn identifier(&self) -> &str {
        match self {
            CatalogNode::Group(group) => &group.identifier,
            CatalogNode::Component(component) => &component.identifier,
        }
    }

    pub fn set_sorting(&mut self, sorting: usize) {
        match self {
            CatalogNode::Group(group) => group.sorting = sorting,
            CatalogNode::Component(component) => component.sorting = sorting,
        }
    }
}

impl Group {
    pub fn new(identifier: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            label: label.into(),
            sorting: 0,
            subgroups: Vec::new(),
            components: Vec::new(),
        }
    }

    /// Append a child node, keeping the group/component split.
    pub fn push(&mut self, node: CatalogNode) {
        match node {
            CatalogNode::Group(group) => self.subgroups.push(group),
            CatalogNode::Component(component) => self.components.push(Arc::new(component)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.subgroups.is_empty() && self.components.is_empty()
    }

    /// Direct subgroup by identifier.
    pub fn subgroup(&self, identifier: &str) -> Option<&Group> {
        self.subgroups
            .iter()
            .find(|group| group.identifier == identifier)
    }

    /// Direct component by identifier.
    pub fn component(&self, identifier: &str) -> Option<&Arc<ComponentRecord>> {
        self.components
            .iter()
            .find(|component| component.identifier == identifier)
    }

    /// Every component in this group and below, depth-first.
    pub fn all_components(&self) -> Vec<Arc<ComponentRecord>> {
        let mut out = self.components.clone();
        for group in &self.subgroups {
            out.extend(group.all_components());
        }
        out
    }
}

impl ComponentRecord {
    /// Variant by identifier.
    pub fn variant(&self, identifier: &str) -> Option<&VariantRecord> {
        self.variants
            .iter()
            .find(|variant| variant.identifier == identifier)
    }

    /// Directory part of `template_file` (empty for root-level templates).
    pub fn template_dir(&self) -> &str {
        match self.template_file.rsplit_once('/') {
            Some((dir, _)) => dir,
            None => "",
        }
    }
}
