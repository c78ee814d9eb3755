//! Component catalog wiring.
//!
//! `builder` scans a catalog root into a `Group` tree, `variants` discovers the
//! variants of one component, `registry` indexes every handle, and `index`
//! bundles tree and registry into a `Catalog` snapshot. Types in `model` are
//! what the listing API serializes.

pub mod builder;
pub mod identity;
pub mod index;
pub mod model;
pub mod registry;
pub mod variants;

pub use builder::TreeBuilder;
pub use identity::{DEFAULT_VARIANT, Handle};
pub use index::Catalog;
pub use model::{CatalogNode, ComponentRecord, Group, VariantRecord};
pub use registry::{HandleRegistry, HandleTarget};
pub use variants::VariantResolver;
