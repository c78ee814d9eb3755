//! Template environment assembly.
//!
//! A fresh environment is built for every render, nested ones included.
//! Templates load from the catalog root, HTML autoescape is always on, host
//! extensions are installed, and the built-in `render` function embeds other
//! components.

use crate::render::renderer::RenderScope;
use minijinja::{AutoEscape, Environment, Error, ErrorKind, Value, path_loader};
use serde_json::Value as JsonValue;
use std::sync::Arc;

pub(crate) fn template_environment(scope: &Arc<RenderScope>) -> Environment<'static> {
    let mut env = Environment::new();
    env.set_loader(path_loader(scope.catalog().root().to_path_buf()));
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    scope.extensions().install(&mut env);
    let nested = Arc::clone(scope);

    // {{ render("button--primary", {"text": "Go"}, false) }}
    env.add_function(
        "render",
        move |handle: String,
              context: Option<Value>,
              merge_defaults: Option<bool>|
              -> Result<Value, Error> {
            let context = json_context(context)?;
            nested
                .render_nested(
                    &handle,
                    context.as_ref(),
                    merge_defaults.unwrap_or(true),
                )
                .map(Value::from_safe_string)
                .map_err(|err| Error::new(ErrorKind::InvalidOperation, err.to_string()))
        },
    );
    env
}

fn json_context(context: Option<Value>) -> Result<Option<JsonValue>, Error> {
    let Some(context) = context.filter(|value| !value.is_undefined() && !value.is_none()) else {
        return Ok(None);
    };
    serde_json::to_value(&context).map(Some).map_err(|err| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("render context is not serializable: {err}"),
        )
    })
}
