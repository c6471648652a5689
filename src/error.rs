//! Errors surfaced by the factory.
//!
//! Selection is the single fallible boundary: a handle always wraps a live
//! node, so failure is reported where the handle would have been created
//! instead of on first use.

use thiserror::Error;

/// Why `Page::select` could not produce a handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error("no element matches selector {selector:?}")]
    NoMatch { selector: String },

    #[error("invalid selector {selector:?}: {source}")]
    Invalid {
        selector: String,
        #[source]
        source: selector::ParseError,
    },
}
