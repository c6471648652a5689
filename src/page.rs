//! Entry point — the only way node handles come into existence.

use dom::{Document, NodeId, SharedDocument};

use crate::error::SelectError;
use crate::handle::NodeHandle;

// ---------------------------------------------------------------------------
// Target
// ---------------------------------------------------------------------------

/// What to select: a selector string to query, or an already-obtained node
/// id to wrap directly.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    Selector(&'a str),
    Node(NodeId),
}

impl<'a> From<&'a str> for Target<'a> {
    fn from(selector: &'a str) -> Self {
        Target::Selector(selector)
    }
}

impl From<NodeId> for Target<'_> {
    fn from(node: NodeId) -> Self {
        Target::Node(node)
    }
}

// ---------------------------------------------------------------------------
// CreateOptions
// ---------------------------------------------------------------------------

/// Options for creating a new element.
///
/// `tag` falls back to `"div"` when absent or empty. `id` and `class` are
/// applied only when present and non-empty — an empty string is skipped, not
/// written as an empty attribute.
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub class: Option<String>,
}

impl CreateOptions {
    /// Start from a tag name.
    pub fn tag(name: &str) -> Self {
        Self {
            tag: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.class = Some(class.to_string());
        self
    }
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// A document plus the factory operations that hand out [`NodeHandle`]s.
///
/// Cloning a `Page` clones the shared document handle, not the tree.
#[derive(Clone)]
pub struct Page {
    doc: SharedDocument,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    /// An empty page: a lone document node, nothing attached.
    pub fn new() -> Self {
        Self {
            doc: Document::new().into_shared(),
        }
    }

    /// A page whose tree is parsed from `source` (fragment roots attach
    /// under the document node, in source order).
    pub fn from_markup(source: &str) -> Self {
        let mut doc = Document::new();
        let roots = markup::parse_fragment(&mut doc, source);
        let root = doc.root();
        for id in roots {
            doc.append_child(root, id);
        }
        Self {
            doc: doc.into_shared(),
        }
    }

    /// The shared platform document (escape hatch for code that needs to
    /// talk to the tree directly, and for tests).
    pub fn document(&self) -> SharedDocument {
        self.doc.clone()
    }

    /// Resolve `target` to a handle.
    ///
    /// A selector string is parsed and queried with first-match document
    /// order; no match is an error here, not a deferred failure on first
    /// use. A node id is wrapped directly without any query.
    pub fn select<'a>(&self, target: impl Into<Target<'a>>) -> Result<NodeHandle, SelectError> {
        match target.into() {
            Target::Node(node) => Ok(NodeHandle::new(self.doc.clone(), node)),
            Target::Selector(input) => {
                let selectors =
                    selector::parse(input).map_err(|source| SelectError::Invalid {
                        selector: input.to_string(),
                        source,
                    })?;
                let doc = self.doc.borrow();
                let node = selector::query_first(&doc, doc.root(), &selectors).ok_or_else(
                    || SelectError::NoMatch {
                        selector: input.to_string(),
                    },
                )?;
                drop(doc);
                Ok(NodeHandle::new(self.doc.clone(), node))
            }
        }
    }

    /// Create a new, detached element and hand back its handle.
    pub fn create(&self, options: CreateOptions) -> NodeHandle {
        let tag = options
            .tag
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or("div");

        let mut doc = self.doc.borrow_mut();
        let node = doc.create_element(tag, Vec::new());
        if let Some(id) = options.id.as_deref().filter(|s| !s.is_empty()) {
            doc.set_attribute(node, "id", id);
        }
        if let Some(class) = options.class.as_deref().filter(|s| !s.is_empty()) {
            doc.set_attribute(node, "class", class);
        }
        drop(doc);

        NodeHandle::new(self.doc.clone(), node)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
