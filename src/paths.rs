//! Filesystem naming conventions shared by the scanner, config walk, and layout search.
//!
//! Everything that knows about `.njk` extensions, `_private` files, `--`
//! variant separators, or `10-` ordering prefixes lives here so the catalog
//! and renderer cannot disagree about what a name means.

use std::path::{Component, Path, PathBuf};

/// Extension (without dot) of template documents.
pub const TEMPLATE_EXTENSION: &str = "njk";
/// Separator between a component base name and a variant identifier.
pub const VARIANT_SEPARATOR: &str = "--";
/// Leading marker for private files (layouts, partials).
pub const PRIVATE_PREFIX: char = '_';
/// Suffix appended to a base name to form its configuration document name.
pub const CONFIG_SUFFIX: &str = ".config.json";

/// Remove a leading `\d+-` ordering prefix from a single path segment.
///
/// Segments that are only digits or digits without a trailing dash are
/// returned unchanged.
pub fn strip_ordering_prefix(segment: &str) -> &str {
    let digits = segment.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return segment;
    }
    match segment[digits..].strip_prefix('-') {
        Some(rest) => rest,
        None => segment,
    }
}

/// Strip ordering prefixes from every `/`-separated segment.
pub fn strip_ordering_prefixes(path: &str) -> String {
    path.split('/')
        .map(strip_ordering_prefix)
        .collect::<Vec<_>>()
        .join("/")
}

/// Human-readable label for an identifier: `10-primary-button` -> `Primary button`.
pub fn label_from_identifier(identifier: &str) -> String {
    let spaced = strip_ordering_prefix(identifier).replace('-', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// File stem of a template document, or `None` when `file_name` is not one.
pub fn template_stem(file_name: &str) -> Option<&str> {
    let stem = file_name.strip_suffix(TEMPLATE_EXTENSION)?.strip_suffix('.')?;
    if stem.is_empty() { None } else { Some(stem) }
}

pub fn is_private(file_name: &str) -> bool {
    file_name.starts_with(PRIVATE_PREFIX)
}

/// Expected configuration document name for a file or directory base name.
pub fn config_file_name(base_name: &str) -> String {
    format!("{}{CONFIG_SUFFIX}", strip_ordering_prefix(base_name))
}

/// Split `button--primary` into `("button", Some("primary"))`.
///
/// Only the first separator counts; a trailing separator yields no variant.
pub fn split_variant_handle(handle: &str) -> (&str, Option<&str>) {
    match handle.split_once(VARIANT_SEPARATOR) {
        Some((base, variant)) if !variant.is_empty() => (base, Some(variant)),
        Some((base, _)) => (base, None),
        None => (handle, None),
    }
}

/// Resolve `.` and `..` components without touching the filesystem.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Returns true when `candidate` is `root` or lies beneath it.
///
/// Both paths are normalized lexically first. The deepest existing ancestor of
/// the candidate is then canonicalized so symlinks pointing outside the root
/// do not count as inside.
pub fn is_inside(root: &Path, candidate: &Path) -> bool {
    let root = normalize_lexically(root);
    let lexical = normalize_lexically(candidate);
    if !lexical.starts_with(&root) {
        return false;
    }
    let canonical_root = root.canonicalize().unwrap_or_else(|_| root.clone());
    match lexical.ancestors().find_map(|ancestor| ancestor.canonicalize().ok()) {
        Some(resolved) => resolved.starts_with(&canonical_root),
        None => true,
    }
}

/// `/`-separated path of `path` relative to `root`, if it lies inside it.
pub fn relative_slash_path(root: &Path, path: &Path) -> Option<String> {
    let relative = normalize_lexically(path)
        .strip_prefix(normalize_lexically(root))
        .ok()?
        .to_path_buf();
    let segments = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(segments.join("/"))
}
