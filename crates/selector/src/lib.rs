//! Selector crate — parsing and first-match querying over a [`dom::Document`].
//!
//! Supports the query surface the node-handle factory needs: type selectors,
//! `*`, `#id`, `.class`, `[attr]` / `[attr=value]`, compound selectors,
//! descendant and `>` child combinators, and comma-separated lists.
//! Everything else (pseudo-classes, sibling combinators, namespaces) is
//! rejected at parse time.

#![forbid(unsafe_code)]

pub mod matching;
pub mod parse;

pub use matching::{matches_compound, matches_selector};
pub use parse::{parse, ParseError};

use dom::{Document, NodeId};

// ---------------------------------------------------------------------------
// Selector model
// ---------------------------------------------------------------------------

/// Combinator between compound selectors in a complex selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Whitespace: ancestor descendant
    Descendant,
    /// `>`: parent > child
    Child,
}

/// A single simple selector component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// Type selector, e.g. `div`, `p`.
    Type(String),
    /// Universal selector `*`.
    Universal,
    /// ID selector `#foo`.
    Id(String),
    /// Class selector `.bar`.
    Class(String),
    /// Attribute selector `[name]` or `[name=value]`.
    Attribute { name: String, value: Option<String> },
}

/// A sequence of simple selectors with no combinator between them
/// (e.g. `div.foo#bar`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector {
    pub simples: Vec<SimpleSelector>,
}

/// A chain of compound selectors separated by combinators.
///
/// Stored right-to-left for matching: `parts[0]` is the rightmost (subject)
/// compound selector, and each element carries the combinator linking it to
/// the compound on its *left*. The last element's combinator is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    pub parts: Vec<(CompoundSelector, Option<Combinator>)>,
}

impl ComplexSelector {
    /// If this selector is exactly `#some-id`, return the id.
    fn lone_id(&self) -> Option<&str> {
        match self.parts.as_slice() {
            [(compound, None)] => match compound.simples.as_slice() {
                [SimpleSelector::Id(id)] => Some(id.as_str()),
                _ => None,
            },
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Querying
// ---------------------------------------------------------------------------

/// Return the first element under `root` (pre-order, document order) that
/// matches any selector in `selectors`. `root` itself is not considered.
///
/// A list consisting of a single `#id` selector short-circuits through the
/// document's id index walk.
pub fn query_first(
    doc: &Document,
    root: NodeId,
    selectors: &[ComplexSelector],
) -> Option<NodeId> {
    if let [selector] = selectors {
        if let Some(id) = selector.lone_id() {
            let found = doc.element_by_id(root, id)?;
            // element_by_id may return `root` itself; a query never does.
            return if found == root { None } else { Some(found) };
        }
    }

    doc.descendants(root).into_iter().find(|&node| {
        doc.get(node).is_some_and(|n| n.is_element())
            && selectors
                .iter()
                .any(|selector| matches_selector(doc, node, selector))
    })
}

// ===========================================================================
// Tests
// ===========================================================================
