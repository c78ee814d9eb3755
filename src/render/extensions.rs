//! Host-supplied template extensions.
//!
//! Hosts hand the renderer a closed set of named globals, functions, and
//! filters when it is constructed; nothing is registered on a shared
//! environment. Functions and filters receive their arguments as a slice
//! (for filters, the filtered value comes first).

use log::warn;
use minijinja::value::Rest;
use minijinja::{Environment, Error, Value};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Names the renderer installs itself; host entries with these names are skipped.
pub const RESERVED_FUNCTIONS: &[&str] = &["render"];

/// Callable shared by functions and filters.
pub type ExtensionFn = Arc<dyn Fn(&[Value]) -> Result<Value, Error> + Send + Sync>;

#[derive(Clone, Default)]
/// Globals, functions, and filters added to every template environment.
pub struct RenderExtensions {
    globals: BTreeMap<String, Value>,
    functions: BTreeMap<String, ExtensionFn>,
    filters: BTreeMap<String, ExtensionFn>,
}

impl RenderExtensions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expose a serializable value under `name`.
    pub fn with_global<T: Serialize>(mut self, name: &str, value: T) -> Self {
        self.globals
            .insert(name.to_string(), Value::from_serialize(&value));
        self
    }

    /// Register a callable invoked as `{{ name(args...) }}`.
    pub fn with_function<F>(mut self, name: &str, function: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, Error> + Send + Sync + 'static,
    {
        self.functions.insert(name.to_string(), Arc::new(function));
        self
    }

    /// Register a filter invoked as `{{ value | name(args...) }}`.
    pub fn with_filter<F>(mut self, name: &str, filter: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, Error> + Send + Sync + 'static,
    {
        self.filters.insert(name.to_string(), Arc::new(filter));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.globals.is_empty() && self.functions.is_empty() && self.filters.is_empty()
    }

    /// Add every extension to `env`.
    pub(crate) fn install(&self, env: &mut Environment<'_>) {
        for (name, value) in &self.globals {
            if RESERVED_FUNCTIONS.contains(&name.as_str()) {
                warn!("global '{name}' shadows a built-in function; skipping");
                continue;
            }
            env.add_global(name.clone(), value.clone());
        }
        for (name, function) in &self.functions {
            if RESERVED_FUNCTIONS.contains(&name.as_str()) {
                warn!("function '{name}' shadows a built-in function; skipping");
                continue;
            }
            let function = Arc::clone(function);
            env.add_function(name.clone(), move |args: Rest<Value>| -> Result<Value, Error> {
                function(&args)
            });
        }
        for (name, filter) in &self.filters {
            let filter = Arc::clone(filter);
            env.add_filter(name.clone(), move |args: Rest<Value>| -> Result<Value, Error> {
                filter(&args)
            });
        }
    }
}

impl fmt::Debug for RenderExtensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderExtensions")
            .field("globals", &self.globals.keys().collect::<Vec<_>>())
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .field("filters", &self.filters.keys().collect::<Vec<_>>())
            .finish()
    }
}
