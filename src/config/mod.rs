//! Component configuration documents.
//!
//! `loader` reads a single `*.config.json`, `resolver` cascades documents from
//! a template up to the catalog root, `merge` implements the recursive merge
//! both the cascade and render contexts use, and `model` is the typed view of
//! the recognized fields.

pub mod loader;
pub mod merge;
pub mod model;
pub mod resolver;

pub use loader::{load_config_document, read_config_document};
pub use merge::{deep_merge, merged};
pub use model::{ComponentConfig, VariantConfig};
pub use resolver::{ConfigResolver, ResolvedConfig};
