//! Component rendering.
//!
//! A render resolves a handle to a component (and optional variant), layers
//! the context (component defaults, then variant overrides, then the caller's
//! overrides), and evaluates the selected template. Direct renders propagate
//! every failure. Preview renders keep a browsing UI alive: evaluation errors
//! become an inline placeholder, and the component is wrapped in its layout
//! when one can be found.

use crate::catalog::{Catalog, ComponentRecord, DEFAULT_VARIANT, VariantRecord};
use crate::config::deep_merge;
use crate::config::loader::empty_document;
use crate::error::{StyleguideError, StyleguideResult};
use crate::paths::split_variant_handle;
use crate::render::environment::template_environment;
use crate::render::extensions::RenderExtensions;
use crate::render::layout::resolve_layout;
use log::{debug, warn};
use minijinja::{Environment, Value, context};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Deepest chain of nested `render(...)` calls allowed in one request.
pub const MAX_RENDER_DEPTH: usize = 32;

#[derive(Clone, Debug)]
/// What to render and with which data.
pub struct RenderRequest {
    pub handle: String,
    pub variant: Option<String>,
    pub context: Option<JsonValue>,
    pub merge_defaults: bool,
}

impl RenderRequest {
    pub fn new(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            variant: None,
            context: None,
            merge_defaults: true,
        }
    }

    pub fn variant(mut self, identifier: impl Into<String>) -> Self {
        self.variant = Some(identifier.into());
        self
    }

    pub fn context(mut self, context: JsonValue) -> Self {
        self.context = Some(context);
        self
    }

    pub fn merge_defaults(mut self, merge_defaults: bool) -> Self {
        self.merge_defaults = merge_defaults;
        self
    }
}

#[derive(Clone, Debug)]
/// Renders components of one catalog snapshot.
pub struct Renderer {
    catalog: Arc<Catalog>,
    extensions: Arc<RenderExtensions>,
}

impl Renderer {
    pub fn new(catalog: Catalog, extensions: RenderExtensions) -> Self {
        Self {
            catalog: Arc::new(catalog),
            extensions: Arc::new(extensions),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Render the addressed component, propagating every failure.
    pub fn render(&self, request: &RenderRequest) -> StyleguideResult<String> {
        let scope = self.scope();
        let env = template_environment(&scope);
        let selection = scope.select(&request.handle, request.variant.as_deref())?;
        let context = assemble_context(
            &selection,
            request.context.as_ref(),
            request.merge_defaults,
        );
        scope.render_selection(&env, &request.handle, &selection, &context)
    }

    /// Render for the browsing UI: evaluation errors become a placeholder and
    /// the result is wrapped in the component's layout, if any.
    ///
    /// Unknown handles, unknown variants, and missing template files are still
    /// returned as errors since there is nothing to preview.
    pub fn render_preview(&self, request: &RenderRequest) -> StyleguideResult<String> {
        let scope = self.scope();
        let env = template_environment(&scope);
        let selection = scope.select(&request.handle, request.variant.as_deref())?;
        let context = assemble_context(
            &selection,
            request.context.as_ref(),
            request.merge_defaults,
        );

        let content = match scope.render_selection(&env, &request.handle, &selection, &context) {
            Ok(html) => html,
            Err(StyleguideError::Render { handle, message }) => {
                warn!("error rendering component \"{handle}\": {message}");
                component_placeholder(&handle, &message)
            }
            Err(err) => return Err(err),
        };

        let Some(reference) = selection.record.layout.as_deref() else {
            return Ok(content);
        };
        let root = self.catalog.root();
        let component_dir = root.join(selection.record.template_dir());
        let Some(layout) = resolve_layout(root, &component_dir, reference) else {
            warn!(
                "layout '{reference}' for component \"{}\" not found; rendering without it",
                request.handle
            );
            return Ok(content);
        };
        debug!("wrapping \"{}\" in layout {layout}", request.handle);

        match render_layout(&env, &layout, content, &selection.record, &context) {
            Ok(html) => Ok(html),
            Err(err) => {
                let message = describe(&err);
                warn!("error rendering layout {layout}: {message}");
                Ok(layout_placeholder(&layout, &request.handle, &message))
            }
        }
    }

    fn scope(&self) -> Arc<RenderScope> {
        Arc::new(RenderScope {
            catalog: Arc::clone(&self.catalog),
            extensions: Arc::clone(&self.extensions),
            depth: AtomicUsize::new(0),
        })
    }
}

/// State shared by one top-level render and every nested render it triggers.
pub(crate) struct RenderScope {
    catalog: Arc<Catalog>,
    extensions: Arc<RenderExtensions>,
    depth: AtomicUsize,
}

#[derive(Clone, Debug)]
struct Selection {
    record: Arc<ComponentRecord>,
    variant: Option<VariantRecord>,
}

impl Selection {
    fn template_file(&self) -> &str {
        self.variant
            .as_ref()
            .and_then(|variant| variant.template_file.as_deref())
            .unwrap_or(&self.record.template_file)
    }
}

struct DepthGuard<'a>(&'a AtomicUsize);

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl RenderScope {
    pub(crate) fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub(crate) fn extensions(&self) -> &RenderExtensions {
        &self.extensions
    }

    /// Body of the template-level `render(handle, context?, merge_defaults?)`.
    ///
    /// Each nested call gets its own environment; the depth counter is shared.
    pub(crate) fn render_nested(
        self: &Arc<Self>,
        handle: &str,
        context: Option<&JsonValue>,
        merge_defaults: bool,
    ) -> StyleguideResult<String> {
        let env = template_environment(self);
        let selection = self.select(handle, None)?;
        let context = assemble_context(&selection, context, merge_defaults);
        self.render_selection(&env, handle, &selection, &context)
    }

    /// Resolve `handle` (and an optional explicit variant) to what gets rendered.
    ///
    /// Handles are looked up as registered; failing that, `base--variant` is
    /// split so an unknown variant of a known component reports as such.
    fn select(&self, handle: &str, variant: Option<&str>) -> StyleguideResult<Selection> {
        let (record, addressed) = match self.catalog.target(handle) {
            Some(target) => (Arc::clone(&target.record), target.variant.clone()),
            None => {
                let (base, suffix) = split_variant_handle(handle.trim().trim_start_matches('@'));
                match (self.catalog.target(base), suffix) {
                    (Some(target), Some(suffix)) => {
                        (Arc::clone(&target.record), Some(suffix.to_string()))
                    }
                    _ => {
                        return Err(StyleguideError::HandleNotFound {
                            handle: handle.to_string(),
                        });
                    }
                }
            }
        };

        let requested = variant
            .map(str::trim)
            .filter(|identifier| !identifier.is_empty())
            .map(str::to_string)
            .or(addressed);
        let variant = match requested {
            None => None,
            Some(identifier) => match record.variant(&identifier) {
                Some(variant) => Some(variant.clone()),
                None if identifier == DEFAULT_VARIANT => None,
                None => {
                    return Err(StyleguideError::VariantNotFound {
                        handle: handle.to_string(),
                        variant: identifier,
                    });
                }
            },
        };
        Ok(Selection { record, variant })
    }

    fn render_selection(
        &self,
        env: &Environment<'_>,
        handle: &str,
        selection: &Selection,
        context: &JsonValue,
    ) -> StyleguideResult<String> {
        let template_file = selection.template_file();
        let path = self.catalog.root().join(template_file);
        if !path.is_file() {
            return Err(StyleguideError::TemplateNotFound {
                handle: handle.to_string(),
                path,
            });
        }

        let _guard = self.enter(handle)?;
        let template = env
            .get_template(template_file)
            .map_err(|err| render_error(handle, &err))?;
        template
            .render(Value::from_serialize(context))
            .map_err(|err| render_error(handle, &err))
    }

    fn enter(&self, handle: &str) -> StyleguideResult<DepthGuard<'_>> {
        let depth = self.depth.fetch_add(1, Ordering::SeqCst) + 1;
        let guard = DepthGuard(&self.depth);
        if depth > MAX_RENDER_DEPTH {
            return Err(StyleguideError::Render {
                handle: handle.to_string(),
                message: format!("nested renders exceed {MAX_RENDER_DEPTH} levels"),
            });
        }
        Ok(guard)
    }
}

/// Component defaults (optional), then variant overrides, then caller overrides.
fn assemble_context(
    selection: &Selection,
    overrides: Option<&JsonValue>,
    merge_defaults: bool,
) -> JsonValue {
    let mut context = empty_document();
    if merge_defaults {
        deep_merge(&mut context, &selection.record.context);
    }
    if let Some(variant_context) = selection
        .variant
        .as_ref()
        .and_then(|variant| variant.context.as_ref())
    {
        deep_merge(&mut context, variant_context);
    }
    if let Some(overrides) = overrides {
        deep_merge(&mut context, overrides);
    }
    context
}

fn render_layout(
    env: &Environment<'_>,
    layout: &str,
    content: String,
    record: &ComponentRecord,
    context: &JsonValue,
) -> Result<String, minijinja::Error> {
    let template = env.get_template(layout)?;
    template.render(context! {
        _content => Value::from_safe_string(content),
        _config => Value::from_serialize(record),
        _target => context! { context => Value::from_serialize(context) },
    })
}

fn render_error(handle: &str, err: &minijinja::Error) -> StyleguideError {
    StyleguideError::Render {
        handle: handle.to_string(),
        message: describe(err),
    }
}

/// Error text including every chained cause.
fn describe(err: &minijinja::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(&format!("\ncaused by: {cause}"));
        source = cause.source();
    }
    message
}

fn component_placeholder(handle: &str, message: &str) -> String {
    format!(
        "<pre style=\"color: red;\">Error rendering component \"{}\":\n{}</pre>",
        escape_html(handle),
        escape_html(message)
    )
}

fn layout_placeholder(layout: &str, handle: &str, message: &str) -> String {
    format!(
        "<pre style=\"color: red;\">Error rendering layout \"{}\" for component \"{}\":\n{}</pre>",
        escape_html(layout),
        escape_html(handle),
        escape_html(message)
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}
