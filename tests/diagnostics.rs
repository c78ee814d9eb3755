// Diagnostics that the engine reports through the `log` facade instead of
// failing. Lives in its own test binary so the capturing logger below is the
// only one installed in the process.
mod support;

use anyhow::Result;
use log::{Level, LevelFilter, Log, Metadata, Record};
use pretty_assertions::assert_eq;
use std::sync::{Mutex, Once};
use styleguide::RenderRequest;
use support::CatalogFixture;

struct CapturingLogger {
    records: Mutex<Vec<String>>,
}

impl Log for CapturingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Warn
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut records) = self.records.lock() {
            records.push(format!("{}: {}", record.level(), record.args()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: CapturingLogger = CapturingLogger {
    records: Mutex::new(Vec::new()),
};
static INSTALL: Once = Once::new();

fn install_logger() {
    INSTALL.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(LevelFilter::Warn);
        }
    });
}

fn warnings_containing(needle: &str) -> Vec<String> {
    LOGGER
        .records
        .lock()
        .map(|records| {
            records
                .iter()
                .filter(|line| line.starts_with("WARN: ") && line.contains(needle))
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

// A malformed config document is skipped with a warning naming its path.
#[test]
fn bad_config_document_is_logged() -> Result<()> {
    install_logger();
    let fixture = CatalogFixture::new()?;
    fixture
        .write("broken.njk", "{{ text }}")?
        .write("broken.config.json", "{ not json")?;

    let tree = fixture.styleguide().catalog_tree()?;
    assert!(tree.component("broken").is_some());

    let config_path = fixture.root().join("broken.config.json");
    let warnings = warnings_containing(&config_path.display().to_string());
    assert!(
        warnings.iter().any(|line| line.contains("ignoring config")),
        "{warnings:?}"
    );
    Ok(())
}

// A preview whose layout cannot be found warns and renders unwrapped.
#[test]
fn missing_layout_is_logged() -> Result<()> {
    install_logger();
    let fixture = CatalogFixture::new()?;
    fixture
        .write("atoms/badge.njk", "<span>{{ text }}</span>")?
        .write(
            "atoms/badge.config.json",
            r#"{"layout": "base", "context": {"text": "New"}}"#,
        )?;

    let preview = fixture
        .styleguide()
        .render_component_preview(&RenderRequest::new("atoms/badge"))?;
    assert_eq!(preview, "<span>New</span>");

    let warnings = warnings_containing("for component \"atoms/badge\"");
    assert!(
        warnings
            .iter()
            .any(|line| line.contains("layout 'base'") && line.contains("not found")),
        "{warnings:?}"
    );
    Ok(())
}
