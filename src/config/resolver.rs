//! Cascading configuration lookup for a template document.
//!
//! The walk starts in the template's own directory and climbs toward the
//! catalog root, loading one document per directory. Deeper documents always
//! win: each shallower document is merged *underneath* what has been
//! accumulated so far.

use crate::config::loader::{empty_document, load_config_document};
use crate::config::merge::merged;
use crate::paths::{config_file_name, is_inside, strip_ordering_prefix};
use serde_json::Value;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq)]
/// Result of a config walk.
///
/// `own` is the template-named document alone, the source for fields that
/// identify one component (`label`, `handle`, `variants`). `merged` is the
/// full cascade, the source for inheritable fields (`context`, `layout`).
pub struct ResolvedConfig {
    pub own: Value,
    pub merged: Value,
}

impl ResolvedConfig {
    pub fn empty() -> Self {
        Self {
            own: empty_document(),
            merged: empty_document(),
        }
    }
}

#[derive(Clone, Debug)]
/// Walks config documents bounded by the catalog root.
pub struct ConfigResolver {
    root: PathBuf,
}

impl ConfigResolver {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// Resolve the configuration for `template_path` (extension removed).
    ///
    /// The first level loads `<template>.config.json` and, when the directory
    /// name differs from the template name, `<directory>.config.json` beneath
    /// it. Every ancestor level up to and including the root loads
    /// `<ancestor>/<ancestor>.config.json`.
    pub fn resolve(&self, template_path: &Path) -> ResolvedConfig {
        let (Some(dir), Some(base)) = (
            template_path.parent(),
            template_path.file_name().and_then(|name| name.to_str()),
        ) else {
            return ResolvedConfig::empty();
        };
        if !is_inside(&self.root, dir) {
            return ResolvedConfig::empty();
        }

        let own = load_config_document(&dir.join(config_file_name(base)));
        let mut accumulated = own.clone();
        if let Some(dir_name) = dir_name(dir) {
            if strip_ordering_prefix(dir_name) != strip_ordering_prefix(base) {
                accumulated = merged(&self.directory_document(dir), &accumulated);
            }
        }

        let mut current = dir.parent().map(Path::to_path_buf);
        while let Some(level) = current {
            if !is_inside(&self.root, &level) {
                break;
            }
            accumulated = merged(&self.directory_document(&level), &accumulated);
            current = level.parent().map(Path::to_path_buf);
        }

        ResolvedConfig {
            own,
            merged: accumulated,
        }
    }

    /// The directory's own `<name>.config.json`, used for group labels.
    pub fn directory_document(&self, dir: &Path) -> Value {
        match dir_name(dir) {
            Some(name) if is_inside(&self.root, dir) => {
                load_config_document(&dir.join(config_file_name(name)))
            }
            _ => empty_document(),
        }
    }
}

fn dir_name(dir: &Path) -> Option<&str> {
    dir.file_name().and_then(|name| name.to_str())
}
