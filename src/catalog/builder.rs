//! Filesystem scan that turns a catalog root into a `Group` tree.
//!
//! Classification per directory entry:
//! - a directory holding a template named after itself is one component;
//! - any other directory is a group and is scanned recursively;
//! - a public, non-variant `.njk` file is a component, except the self-named
//!   template of a component directory.
//!
//! Groups left without children are dropped, and a group whose only child
//! carries the group's own identifier is replaced by that child. Both rules
//! run bottom-up as each directory finishes, so parents only ever see
//! normalized children.

use crate::catalog::identity::Handle;
use crate::catalog::model::{CatalogNode, ComponentRecord, Group};
use crate::catalog::variants::{VariantResolver, sorted_entries};
use crate::config::{ComponentConfig, ConfigResolver};
use crate::paths::{
    TEMPLATE_EXTENSION, VARIANT_SEPARATOR, is_private, label_from_identifier, relative_slash_path,
    strip_ordering_prefix, template_stem,
};
use anyhow::{Context, Result, anyhow};
use log::debug;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Builds the catalog tree for one root directory.
pub struct TreeBuilder {
    root: PathBuf,
    configs: ConfigResolver,
}

impl TreeBuilder {
    /// `root` should already be canonical; paths are compared against it.
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            configs: ConfigResolver::new(root),
        }
    }

    /// Scan the root and return the root group.
    ///
    /// A missing root yields an empty group rather than an error so callers
    /// can list an empty catalog.
    pub fn build(&self) -> Result<Group> {
        let name = dir_name(&self.root).unwrap_or_default();
        let identifier = strip_ordering_prefix(name);
        let mut root = Group::new(identifier, self.group_label(&self.root, identifier));
        if !self.root.is_dir() {
            debug!("catalog root {} does not exist", self.root.display());
            return Ok(root);
        }
        for node in self.scan_directory(&self.root, true)? {
            root.push(node);
        }
        Ok(root)
    }

    /// Classify every entry of `dir`, returning retained nodes with sorting set.
    fn scan_directory(&self, dir: &Path, is_root: bool) -> Result<Vec<CatalogNode>> {
        let dir_identifier = dir_name(dir).map(strip_ordering_prefix).unwrap_or_default();
        let mut nodes = Vec::new();
        for path in sorted_entries(dir)? {
            let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            if path.is_dir() {
                if let Some(node) = self.directory_node(&path)? {
                    nodes.push(node);
                }
                continue;
            }
            let Some(stem) = template_stem(name) else {
                continue;
            };
            if is_private(name) || stem.contains(VARIANT_SEPARATOR) {
                continue;
            }
            if !is_root && strip_ordering_prefix(stem) == dir_identifier {
                continue;
            }
            nodes.push(CatalogNode::Component(self.component(&path, false)?));
        }
        for (sorting, node) in nodes.iter_mut().enumerate() {
            node.set_sorting(sorting);
        }
        Ok(nodes)
    }

    fn directory_node(&self, dir: &Path) -> Result<Option<CatalogNode>> {
        if let Some(template) = self_named_template(dir)? {
            return Ok(Some(CatalogNode::Component(self.component(&template, true)?)));
        }

        let identifier = dir_name(dir)
            .map(strip_ordering_prefix)
            .ok_or_else(|| anyhow!("unreadable directory name {}", dir.display()))?;
        let children = self.scan_directory(dir, false)?;
        Ok(self.collapse(dir, identifier, children))
    }

    /// Apply the pruning and single-child flattening rules to one directory.
    fn collapse(
        &self,
        dir: &Path,
        identifier: &str,
        children: Vec<CatalogNode>,
    ) -> Option<CatalogNode> {
        if children.is_empty() {
            debug!("pruning empty group {}", dir.display());
            return None;
        }
        if children.len() == 1 && children[0].identifier() == identifier {
            debug!("flattening single-child group {}", dir.display());
            return children.into_iter().next();
        }
        let mut group = Group::new(identifier, self.group_label(dir, identifier));
        for child in children {
            group.push(child);
        }
        Some(CatalogNode::Group(group))
    }

    fn group_label(&self, dir: &Path, identifier: &str) -> String {
        ComponentConfig::from_value(&self.configs.directory_document(dir))
            .label
            .unwrap_or_else(|| label_from_identifier(identifier))
    }

    /// Build the record for a template; `own_directory` marks `card/card.njk`.
    fn component(&self, template: &Path, own_directory: bool) -> Result<ComponentRecord> {
        let stem = template
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(template_stem)
            .ok_or_else(|| anyhow!("not a template document: {}", template.display()))?;
        let identifier = strip_ordering_prefix(stem).to_string();
        let template_file = relative_slash_path(&self.root, template)
            .with_context(|| format!("{} is outside the catalog root", template.display()))?;

        let handle_source = if own_directory {
            template
                .parent()
                .and_then(|dir| relative_slash_path(&self.root, dir))
                .unwrap_or_default()
        } else {
            template_file
                .strip_suffix(&format!(".{TEMPLATE_EXTENSION}"))
                .unwrap_or(&template_file)
                .to_string()
        };
        let default_handle = Handle::from_relative_path(&handle_source);

        let resolved = self.configs.resolve(&template.with_extension(""));
        let own = ComponentConfig::from_value(&resolved.own);
        let cascade = ComponentConfig::from_value(&resolved.merged);

        let label = own
            .label
            .clone()
            .unwrap_or_else(|| label_from_identifier(&identifier));
        let custom_handle = own.custom_handle().map(Handle::from);
        let variants = VariantResolver {
            root: &self.root,
            template_path: template,
            default_handle: &default_handle,
            custom_handle: custom_handle.as_ref(),
            label: &label,
        }
        .resolve(&own.variants)?;

        debug!("component {default_handle} -> {template_file}");
        Ok(ComponentRecord {
            identifier,
            label,
            template_file,
            default_handle,
            custom_handle,
            variants,
            context: Value::Object(cascade.context.clone().unwrap_or_else(Map::new)),
            layout: cascade.layout_ref().map(str::to_string),
            sorting: 0,
        })
    }
}

/// Template in `dir` whose prefix-stripped stem equals the directory's.
fn self_named_template(dir: &Path) -> Result<Option<PathBuf>> {
    let Some(identifier) = dir_name(dir).map(strip_ordering_prefix) else {
        return Ok(None);
    };
    for path in sorted_entries(dir)? {
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        if is_private(name) {
            continue;
        }
        if let Some(stem) = template_stem(name) {
            if !stem.contains(VARIANT_SEPARATOR) && strip_ordering_prefix(stem) == identifier {
                return Ok(Some(path));
            }
        }
    }
    Ok(None)
}

fn dir_name(dir: &Path) -> Option<&str> {
    dir.file_name().and_then(|name| name.to_str())
}
