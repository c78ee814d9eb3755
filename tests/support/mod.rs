use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use styleguide::{Styleguide, StyleguideOptions};
use tempfile::TempDir;

/// Throwaway catalog rooted at `<tmp>/components`.
pub struct CatalogFixture {
    _temp: TempDir,
    root: PathBuf,
}

impl CatalogFixture {
    pub fn new() -> Result<Self> {
        let temp = TempDir::new().context("creating temp dir")?;
        let root = temp.path().join("components");
        fs::create_dir_all(&root).with_context(|| format!("creating {}", root.display()))?;
        let root = root.canonicalize()?;
        Ok(Self { _temp: temp, root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `contents` to a catalog-relative path, creating parents.
    pub fn write(&self, relative: &str, contents: &str) -> Result<&Self> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("writing {}", path.display()))?;
        Ok(self)
    }

    pub fn styleguide(&self) -> Styleguide {
        Styleguide::new(StyleguideOptions::new(&self.root))
    }
}

pub fn styleguide_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_styleguide"))
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}
