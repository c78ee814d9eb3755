//! Template rendering on top of `minijinja`.
//!
//! `renderer` turns a handle into HTML, `layout` finds the wrapper a preview
//! is shown in, `extensions` carries host-supplied globals, functions, and
//! filters, and `environment` assembles the per-request template environment.

mod environment;
pub mod extensions;
pub mod layout;
pub mod renderer;

pub use extensions::{ExtensionFn, RenderExtensions};
pub use layout::{LayoutReference, resolve_layout};
pub use renderer::{MAX_RENDER_DEPTH, RenderRequest, Renderer};
