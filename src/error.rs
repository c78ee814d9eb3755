//! Errors surfaced to callers of the public engine operations.

use std::path::PathBuf;
use thiserror::Error;

/// Failures a host (HTTP layer, CLI) needs to tell apart.
///
/// A missing catalog root is deliberately absent: it produces an empty
/// catalog instead of an error.
#[derive(Debug, Error)]
pub enum StyleguideError {
    /// No component or variant is registered under the handle.
    #[error("no component found with handle '{handle}'")]
    HandleNotFound { handle: String },

    /// The component exists but declares no such variant.
    #[error("component '{handle}' has no variant '{variant}'")]
    VariantNotFound { handle: String, variant: String },

    /// The record points at a template document that is not on disk.
    #[error("template file \"{}\" for component \"{handle}\" does not exist", path.display())]
    TemplateNotFound { handle: String, path: PathBuf },

    /// The template engine failed while loading or evaluating a template.
    #[error("error rendering component \"{handle}\": {message}")]
    Render { handle: String, message: String },

    /// Unexpected filesystem failure while scanning the catalog.
    #[error(transparent)]
    Io(#[from] anyhow::Error),
}

impl StyleguideError {
    /// True for the not-found family: unknown handle, variant, or template file.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StyleguideError::HandleNotFound { .. }
                | StyleguideError::VariantNotFound { .. }
                | StyleguideError::TemplateNotFound { .. }
        )
    }
}

pub type StyleguideResult<T> = std::result::Result<T, StyleguideError>;
