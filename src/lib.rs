//! Component styleguide engine.
//!
//! A catalog root holds `.njk` template documents arranged in directories,
//! with optional `*.config.json` documents beside them. The crate scans that
//! tree into groups, components, and variants (`catalog`), cascades config
//! documents from root to leaf (`config`), resolves handles such as
//! `forms/button--primary`, and renders components with their layouts
//! (`render`). Nothing is cached: every operation on [`Styleguide`] rescans the
//! filesystem so edits show up immediately.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::{
    env,
    path::{Path, PathBuf},
};

pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod paths;
pub mod render;

pub use catalog::{
    Catalog, CatalogNode, ComponentRecord, DEFAULT_VARIANT, Group, Handle, HandleRegistry,
    HandleTarget, TreeBuilder, VariantRecord, VariantResolver,
};
pub use config::{ComponentConfig, ConfigResolver, ResolvedConfig, VariantConfig, deep_merge};
pub use error::{StyleguideError, StyleguideResult};
pub use paths::split_variant_handle;
pub use render::{RenderExtensions, RenderRequest, Renderer, resolve_layout};

/// Environment variable naming the catalog root.
pub const ROOT_ENV: &str = "STYLEGUIDE_ROOT";
/// Catalog directory looked for under the working directory when nothing else is set.
pub const DEFAULT_ROOT_DIR: &str = "components";

#[derive(Clone, Debug)]
/// Construction options for [`Styleguide`].
pub struct StyleguideOptions {
    pub root: PathBuf,
    pub extensions: RenderExtensions,
}

impl StyleguideOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: RenderExtensions::new(),
        }
    }

    pub fn with_extensions(mut self, extensions: RenderExtensions) -> Self {
        self.extensions = extensions;
        self
    }
}

#[derive(Clone, Debug)]
/// Entry point for hosts: listing, handle lookup, and rendering.
pub struct Styleguide {
    root: PathBuf,
    extensions: RenderExtensions,
}

impl Styleguide {
    pub fn new(options: StyleguideOptions) -> Self {
        let root = options
            .root
            .canonicalize()
            .unwrap_or_else(|_| options.root.clone());
        Self {
            root,
            extensions: options.extensions,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scan the catalog root from scratch.
    pub fn catalog(&self) -> StyleguideResult<Catalog> {
        Ok(Catalog::load(&self.root)?)
    }

    /// The root group of a fresh scan.
    pub fn catalog_tree(&self) -> StyleguideResult<Group> {
        let catalog = self.catalog()?;
        Ok(catalog.tree().clone())
    }

    /// Component registered under `handle` (default or custom form).
    pub fn lookup_handle(&self, handle: &str) -> StyleguideResult<Arc<ComponentRecord>> {
        let catalog = self.catalog()?;
        catalog
            .lookup(handle)
            .cloned()
            .ok_or_else(|| StyleguideError::HandleNotFound {
                handle: handle.to_string(),
            })
    }

    pub fn render_component(&self, request: &RenderRequest) -> StyleguideResult<String> {
        self.renderer()?.render(request)
    }

    pub fn render_component_preview(&self, request: &RenderRequest) -> StyleguideResult<String> {
        self.renderer()?.render_preview(request)
    }

    fn renderer(&self) -> StyleguideResult<Renderer> {
        Ok(Renderer::new(self.catalog()?, self.extensions.clone()))
    }
}

/// Locate the catalog root.
///
/// Order: an explicit path, then `STYLEGUIDE_ROOT` when set and non-empty, then
/// `./components`. The result is canonicalized when it exists; a missing
/// directory is returned as-is and later scans as an empty catalog.
pub fn find_catalog_root(explicit: Option<&Path>) -> Result<PathBuf> {
    let candidate = match explicit {
        Some(path) => path.to_path_buf(),
        None => match env::var(ROOT_ENV) {
            Ok(hint) if !hint.trim().is_empty() => PathBuf::from(hint.trim()),
            _ => env::current_dir()
                .context("reading current directory")?
                .join(DEFAULT_ROOT_DIR),
        },
    };
    Ok(candidate.canonicalize().unwrap_or(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_wins_and_is_canonicalized() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("kit");
        fs::create_dir_all(&root).unwrap();

        let found = find_catalog_root(Some(&root.join("."))).unwrap();
        assert_eq!(found, root.canonicalize().unwrap());
    }

    #[test]
    fn missing_explicit_root_is_returned_unchanged() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("absent");
        assert_eq!(find_catalog_root(Some(&missing)).unwrap(), missing);
    }

    #[test]
    fn lookup_reports_unknown_handles() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("button.njk"), "<button></button>").unwrap();
        let styleguide = Styleguide::new(StyleguideOptions::new(temp.path()));

        assert_eq!(styleguide.lookup_handle("button").unwrap().identifier, "button");
        let err = styleguide.lookup_handle("missing").unwrap_err();
        assert!(err.is_not_found());
    }
}
