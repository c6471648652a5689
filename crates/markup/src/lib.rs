//! Markup crate — fragment parsing for raw-content replacement.
//!
//! Parses a snippet of HTML-shaped markup into detached [`dom`] nodes.
//! This is deliberately a fragment parser: no insertion modes, no implied
//! `html`/`head`/`body` scaffolding, no doctype retention. It handles what
//! raw content assignments actually contain — nested tags, attributes,
//! text with character references, comments, void and self-closing tags,
//! and the usual sloppiness around end tags.

#![forbid(unsafe_code)]

pub mod builder;
pub mod tokenizer;

pub use builder::parse_fragment;
pub use tokenizer::{tokenize, MarkupToken};

use phf::phf_set;

/// Elements that never take children.
static VOID_ELEMENTS: phf::Set<&'static str> = phf_set! {
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "param", "source", "track", "wbr"
};

/// Check if an element is void (self-closing by definition).
#[inline]
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(tag)
}
