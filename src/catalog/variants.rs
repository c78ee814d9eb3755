//! Variant discovery for a single component.
//!
//! Variants come from two places: the `variants` array of the component's
//! configuration and sibling files named `<component>--<variant>.njk`.
//! Declared entries come first and win identifier collisions; discovered
//! files follow in name order. The `default` entry always leads a non-empty
//! list, synthesized from the component itself when nothing declares it.

use crate::catalog::identity::{DEFAULT_VARIANT, Handle};
use crate::catalog::model::VariantRecord;
use crate::config::VariantConfig;
use crate::paths::{
    VARIANT_SEPARATOR, is_private, label_from_identifier, relative_slash_path,
    strip_ordering_prefix, template_stem,
};
use anyhow::{Context, Result};
use log::{debug, warn};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Inputs describing the component whose variants are being resolved.
pub struct VariantResolver<'a> {
    pub root: &'a Path,
    /// Absolute path of the component's default template document.
    pub template_path: &'a Path,
    pub default_handle: &'a Handle,
    pub custom_handle: Option<&'a Handle>,
    pub label: &'a str,
}

/// A `<base>--<variant>.njk` file found next to the component template.
#[derive(Debug)]
struct VariantFile {
    identifier: String,
    relative: String,
}

impl VariantResolver<'_> {
    /// Merge declared and discovered variants into the final ordered list.
    pub fn resolve(&self, declared: &[VariantConfig]) -> Result<Vec<VariantRecord>> {
        let files = self.discover_files()?;
        let mut seen = BTreeSet::new();
        let mut variants = Vec::new();

        for config in declared {
            let identifier = config.identifier.trim();
            if identifier.is_empty() {
                continue;
            }
            if !seen.insert(identifier.to_string()) {
                warn!(
                    "component '{}' declares variant '{identifier}' more than once; keeping the first",
                    self.default_handle
                );
                continue;
            }
            let template_file = files
                .iter()
                .find(|file| file.identifier == identifier)
                .map(|file| file.relative.clone());
            variants.push(self.record(
                identifier,
                config
                    .label
                    .clone()
                    .unwrap_or_else(|| label_from_identifier(identifier)),
                template_file,
                config.context.clone().map(Value::Object),
            ));
        }

        for file in &files {
            if !seen.insert(file.identifier.clone()) {
                continue;
            }
            debug!(
                "discovered variant '{}' of '{}' at {}",
                file.identifier, self.default_handle, file.relative
            );
            variants.push(self.record(
                &file.identifier,
                label_from_identifier(&file.identifier),
                Some(file.relative.clone()),
                None,
            ));
        }

        match variants
            .iter()
            .position(|variant| variant.identifier == DEFAULT_VARIANT)
        {
            Some(0) => {}
            Some(index) => {
                let default = variants.remove(index);
                variants.insert(0, default);
            }
            None if !variants.is_empty() => {
                let default = self.record(DEFAULT_VARIANT, self.label.to_string(), None, None);
                variants.insert(0, default);
            }
            None => {}
        }

        Ok(variants)
    }

    fn record(
        &self,
        identifier: &str,
        label: String,
        template_file: Option<String>,
        context: Option<Value>,
    ) -> VariantRecord {
        VariantRecord {
            identifier: identifier.to_string(),
            label,
            template_file,
            context,
            default_handle: self.default_handle.for_variant(identifier),
            custom_handle: self.custom_handle.map(|handle| handle.for_variant(identifier)),
        }
    }

    /// Variant files beside the template, sorted by file name.
    fn discover_files(&self) -> Result<Vec<VariantFile>> {
        let (Some(dir), Some(component_stem)) = (
            self.template_path.parent(),
            self.template_path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(template_stem),
        ) else {
            return Ok(Vec::new());
        };
        let component_base = strip_ordering_prefix(component_stem);

        let mut files = Vec::new();
        for path in sorted_entries(dir)? {
            if !path.is_file() {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            if is_private(file_name) {
                continue;
            }
            let Some((base, identifier)) = template_stem(file_name)
                .and_then(|stem| stem.split_once(VARIANT_SEPARATOR))
            else {
                continue;
            };
            if identifier.is_empty() || strip_ordering_prefix(base) != component_base {
                continue;
            }
            let Some(relative) = relative_slash_path(self.root, &path) else {
                continue;
            };
            files.push(VariantFile {
                identifier: identifier.to_string(),
                relative,
            });
        }
        Ok(files)
    }
}

/// Directory entries sorted by file name so ordering prefixes drive order.
pub(crate) fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let entry = entry.with_context(|| format!("reading entry in {}", dir.display()))?;
        entries.push(entry.path());
    }
    entries.sort();
    Ok(entries)
}
