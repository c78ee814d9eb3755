//! Layout reference resolution.
//!
//! A component's `layout` setting takes one of three forms:
//!
//! * `/wrappers/page`: a path from the catalog root.
//! * `page`: a bare name, searched for from the component's directory upward
//!   to the catalog root; the nearest match wins.
//! * `shells/page` or `../page`: a path relative to the component's directory.
//!
//! In every form the final segment is forced private (`_page.njk`), and the
//! resolved file must lie inside the catalog root.

use crate::paths::{self, PRIVATE_PREFIX, TEMPLATE_EXTENSION};
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Parsed form of a `layout` setting.
pub enum LayoutReference<'a> {
    FromRoot(&'a str),
    Named(&'a str),
    Relative(&'a str),
}

impl<'a> LayoutReference<'a> {
    /// `None` for blank references.
    pub fn parse(reference: &'a str) -> Option<Self> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }
        if let Some(rest) = reference.strip_prefix('/') {
            let rest = rest.trim_start_matches('/');
            return (!rest.is_empty()).then_some(LayoutReference::FromRoot(rest));
        }
        if reference.contains('/') {
            Some(LayoutReference::Relative(reference))
        } else {
            Some(LayoutReference::Named(reference))
        }
    }
}

/// File name a layout base name refers to: `page` -> `_page.njk`.
pub fn layout_file_name(name: &str) -> String {
    let mut file = String::with_capacity(name.len() + 6);
    if !name.starts_with(PRIVATE_PREFIX) {
        file.push(PRIVATE_PREFIX);
    }
    file.push_str(name);
    if paths::template_stem(name).is_none() {
        file.push('.');
        file.push_str(TEMPLATE_EXTENSION);
    }
    file
}

/// Resolve `reference` for a component living in `component_dir`.
///
/// Returns the catalog-relative template name of the layout, or `None` when
/// nothing matching exists inside `root`.
pub fn resolve_layout(root: &Path, component_dir: &Path, reference: &str) -> Option<String> {
    let candidate = match LayoutReference::parse(reference)? {
        LayoutReference::FromRoot(path) => private_path(root, path)?,
        LayoutReference::Relative(path) => private_path(component_dir, path)?,
        LayoutReference::Named(name) => return search_upward(root, component_dir, name),
    };
    existing_inside(root, &candidate)
}

fn private_path(base: &Path, reference: &str) -> Option<PathBuf> {
    let (parent, name) = match reference.rsplit_once('/') {
        Some((parent, name)) => (parent, name),
        None => ("", reference),
    };
    if name.is_empty() {
        return None;
    }
    Some(base.join(parent).join(layout_file_name(name)))
}

fn search_upward(root: &Path, component_dir: &Path, name: &str) -> Option<String> {
    let file = layout_file_name(name);
    let mut dir = paths::normalize_lexically(component_dir);
    loop {
        if !paths::is_inside(root, &dir) {
            return None;
        }
        if let Some(found) = existing_inside(root, &dir.join(&file)) {
            return Some(found);
        }
        if !dir.pop() {
            return None;
        }
    }
}

fn existing_inside(root: &Path, candidate: &Path) -> Option<String> {
    let candidate = paths::normalize_lexically(candidate);
    if !paths::is_inside(root, &candidate) || !candidate.is_file() {
        return None;
    }
    paths::relative_slash_path(root, &candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn catalog() -> (TempDir, PathBuf) {
        let temp = TempDir::new().expect("temp dir");
        let root = temp.path().join("components");
        fs::create_dir_all(root.join("atoms/button")).unwrap();
        fs::create_dir_all(root.join("wrappers")).unwrap();
        fs::write(root.join("_page.njk"), "root page").unwrap();
        fs::write(root.join("atoms/_page.njk"), "atoms page").unwrap();
        fs::write(root.join("wrappers/_frame.njk"), "frame").unwrap();
        fs::write(temp.path().join("_outside.njk"), "outside").unwrap();
        let root = root.canonicalize().unwrap();
        (temp, root)
    }

    #[test]
    fn parse_distinguishes_three_forms() {
        assert_eq!(
            LayoutReference::parse("/wrappers/frame"),
            Some(LayoutReference::FromRoot("wrappers/frame"))
        );
        assert_eq!(LayoutReference::parse("page"), Some(LayoutReference::Named("page")));
        assert_eq!(
            LayoutReference::parse("../page"),
            Some(LayoutReference::Relative("../page"))
        );
        assert_eq!(LayoutReference::parse("  "), None);
        assert_eq!(LayoutReference::parse("/"), None);
    }

    #[test]
    fn file_names_are_forced_private_with_extension() {
        assert_eq!(layout_file_name("page"), "_page.njk");
        assert_eq!(layout_file_name("_page"), "_page.njk");
        assert_eq!(layout_file_name("page.njk"), "_page.njk");
    }

    #[test]
    fn named_layouts_prefer_the_nearest_directory() {
        let (_temp, root) = catalog();
        let dir = root.join("atoms/button");
        assert_eq!(
            resolve_layout(&root, &dir, "page").as_deref(),
            Some("atoms/_page.njk")
        );
        assert_eq!(
            resolve_layout(&root, &root, "page").as_deref(),
            Some("_page.njk")
        );
        assert_eq!(resolve_layout(&root, &dir, "missing"), None);
    }

    #[test]
    fn root_and_relative_references_resolve_from_their_base() {
        let (_temp, root) = catalog();
        let dir = root.join("atoms/button");
        assert_eq!(
            resolve_layout(&root, &dir, "/wrappers/frame").as_deref(),
            Some("wrappers/_frame.njk")
        );
        assert_eq!(
            resolve_layout(&root, &dir, "../../wrappers/frame").as_deref(),
            Some("wrappers/_frame.njk")
        );
    }

    #[test]
    fn references_outside_the_root_are_rejected() {
        let (_temp, root) = catalog();
        assert_eq!(resolve_layout(&root, &root, "../outside"), None);
        assert_eq!(resolve_layout(&root, &root, "/../outside"), None);
    }
}
