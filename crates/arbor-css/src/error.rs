//! Selector parse errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("Empty selector")]
    Empty,

    #[error("Unexpected {token:?} at position {position}")]
    UnexpectedToken { token: char, position: usize },

    #[error("Unexpected end of selector")]
    UnexpectedEnd,

    #[error("Unsupported pseudo-class :{0}")]
    UnsupportedPseudoClass(String),

    #[error("Invalid An+B expression {0:?}")]
    InvalidNth(String),
}
