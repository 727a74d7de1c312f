//! Markup errors

use arbor_dom::DomError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HtmlError {
    #[error("Unsupported mime type: {0}")]
    UnsupportedMimeType(String),

    #[error(transparent)]
    Dom(#[from] DomError),
}

/// Result type for markup operations
pub type Result<T> = std::result::Result<T, HtmlError>;
