//! A freshly scanned catalog: the tree plus its handle registry.
//!
//! Nothing here is cached. Each `Catalog::load` rescans the filesystem and
//! re-reads every config document so edits show up on the next query.

use crate::catalog::builder::TreeBuilder;
use crate::catalog::model::{ComponentRecord, Group};
use crate::catalog::registry::{HandleRegistry, HandleTarget};
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Clone, Debug)]
/// Immutable snapshot of one catalog root.
pub struct Catalog {
    root: PathBuf,
    tree: Group,
    registry: HandleRegistry,
}

impl Catalog {
    /// Scan `root` and index every handle.
    ///
    /// `root` is canonicalized when it exists; a missing root produces an
    /// empty catalog.
    pub fn load(root: &Path) -> Result<Self> {
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        let tree = TreeBuilder::new(&root).build()?;
        let registry = HandleRegistry::build(&tree);
        Ok(Self {
            root,
            tree,
            registry,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn tree(&self) -> &Group {
        &self.tree
    }

    pub fn registry(&self) -> &HandleRegistry {
        &self.registry
    }

    /// Component registered under `handle`. A leading `@` is tolerated.
    pub fn lookup(&self, handle: &str) -> Option<&Arc<ComponentRecord>> {
        self.registry.by_handle(trim_handle(handle))
    }

    /// Component and variant registered under `handle`.
    pub fn target(&self, handle: &str) -> Option<&HandleTarget> {
        self.registry.target(trim_handle(handle))
    }
}

fn trim_handle(handle: &str) -> &str {
    handle.trim().trim_start_matches('@')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn lookup_accepts_at_prefixed_handles() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("components");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("button.njk"), "<button></button>").unwrap();

        let catalog = Catalog::load(&root).unwrap();
        assert_eq!(catalog.lookup("@button").unwrap().identifier, "button");
        assert_eq!(catalog.root(), root.canonicalize().unwrap());
        assert_eq!(catalog.tree().components.len(), 1);
    }
}
