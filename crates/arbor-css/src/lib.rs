//! Arbor CSS - Selector engine
//!
//! Parses CSS selector lists and matches them against an
//! [`arbor_dom::NodeStore`]: `matches`, `closest` and the
//! `querySelector` family.

mod error;
mod matching;
mod parser;
mod query;
mod selectors;

pub use error::SelectorError;
pub use matching::{matches_complex, matches_list};
pub use parser::parse_selector_list;
pub use query::ElementQuery;
pub use selectors::{
    AttributeMatcher, AttributeSelector, Combinator, ComplexSelector, CompoundSelector,
    NthExpression, PseudoClass, SelectorList, SimpleSelector,
};

/// Result type for selector operations
pub type Result<T> = std::result::Result<T, SelectorError>;
