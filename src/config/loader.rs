//! Reads one `*.config.json` document from disk.
//!
//! Loading never fails: a missing file is an empty document, and a file that
//! cannot be read, parsed, or validated against the embedded schema is logged
//! and also treated as empty. Catalog builds and renders must survive a
//! half-edited config file.

use anyhow::{Context, Result, bail};
use jsonschema::JSONSchema;
use log::{debug, error, warn};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

const CONFIG_SCHEMA: &str = include_str!("../../schema/component_config.schema.json");

/// Load a configuration document, falling back to `{}` on any problem.
pub fn load_config_document(path: &Path) -> Value {
    match read_config_document(path) {
        Ok(Some(value)) => {
            debug!("loaded config {}", path.display());
            value
        }
        Ok(None) => empty_document(),
        Err(err) => {
            warn!("ignoring config {}: {err:#}", path.display());
            empty_document()
        }
    }
}

/// Strict variant of [`load_config_document`]: `Ok(None)` when absent, `Err`
/// when unreadable, malformed, or schema-invalid.
pub fn read_config_document(path: &Path) -> Result<Option<Value>> {
    if !path.is_file() {
        return Ok(None);
    }
    let data =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let value: Value =
        serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
    validate_config_value(&value).with_context(|| format!("validating {}", path.display()))?;
    Ok(Some(value))
}

pub fn empty_document() -> Value {
    Value::Object(Map::new())
}

fn validate_config_value(value: &Value) -> Result<()> {
    let Some(schema) = config_schema() else {
        return Ok(());
    };
    if let Err(errors) = schema.validate(value) {
        let details = errors
            .map(|err| err.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        bail!("config failed schema validation: {details}");
    }
    Ok(())
}

fn config_schema() -> Option<&'static JSONSchema> {
    static RAW: OnceLock<Value> = OnceLock::new();
    static COMPILED: OnceLock<Option<JSONSchema>> = OnceLock::new();
    COMPILED
        .get_or_init(|| {
            let raw = RAW.get_or_init(|| {
                serde_json::from_str(CONFIG_SCHEMA).unwrap_or_else(|err| {
                    error!("embedded config schema is not valid JSON: {err}");
                    Value::Bool(true)
                })
            });
            match JSONSchema::compile(raw) {
                Ok(compiled) => Some(compiled),
                Err(err) => {
                    error!("embedded config schema failed to compile: {err}");
                    None
                }
            }
        })
        .as_ref()
}
