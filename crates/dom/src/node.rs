//! DOM node model.
//!
//! The tree structure is encoded via parent/child/sibling links stored
//! directly on each node; [`Document`](crate::Document) keeps the links
//! consistent.

use bitflags::bitflags;

/// Index of a node in its document's store.
///
/// Ids are only meaningful for the document that issued them. The store
/// never frees a slot, so an id cannot dangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

// ---------------------------------------------------------------------------
// Attribute
// ---------------------------------------------------------------------------

/// A single attribute on an element (e.g. `class="foo"`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

impl Attr {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Element data
// ---------------------------------------------------------------------------

/// Data specific to element nodes.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ElementData {
    pub tag_name: String,
    pub attrs: Vec<Attr>,
    /// Cached `id` attribute value for fast lookup.
    pub id: Option<String>,
    /// Cached list of class names (split from the `class` attribute).
    pub classes: Vec<String>,
    /// Inline style declarations, in first-set order.
    pub style: Vec<(String, String)>,
}

impl ElementData {
    /// Build element data from a tag name and attribute list.
    ///
    /// The `id` and `classes` caches are extracted from `attrs`.
    pub fn new(tag_name: &str, attrs: Vec<Attr>) -> Self {
        let mut data = Self {
            tag_name: tag_name.to_string(),
            attrs,
            id: None,
            classes: Vec::new(),
            style: Vec::new(),
        };
        data.refresh_caches();
        data
    }

    /// Re-derive `id` and `classes` from the attribute list.
    pub(crate) fn refresh_caches(&mut self) {
        self.id = self
            .attrs
            .iter()
            .find(|a| a.name == "id")
            .map(|a| a.value.clone());
        self.classes = self
            .attrs
            .iter()
            .find(|a| a.name == "class")
            .map(|a| a.value.split_whitespace().map(String::from).collect())
            .unwrap_or_default();
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }
}

// ---------------------------------------------------------------------------
// Node data (variant per node type)
// ---------------------------------------------------------------------------

/// The payload that distinguishes different kinds of DOM nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeData {
    /// The document root. Exactly one per [`Document`](crate::Document).
    Document,
    Element(ElementData),
    Text { data: String },
    Comment { data: String },
}

// ---------------------------------------------------------------------------
// Dirty flags
// ---------------------------------------------------------------------------

bitflags! {
    /// Per-node dirty bits a consuming renderer can poll to drive
    /// incremental style / layout / paint work.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct DirtyFlags: u8 {
        const STYLE  = 1 << 0;
        const LAYOUT = 1 << 1;
        const PAINT  = 1 << 2;
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// A single node in the DOM tree.
///
/// Tree links form an intrusive doubly-linked child list so that
/// insertions and removals are O(1).
#[derive(Clone, Debug)]
pub struct Node {
    pub data: NodeData,

    // -- tree links ----------------------------------------------------------
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub last_child: Option<NodeId>,
    pub prev_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,

    // -- incremental update flags -------------------------------------------
    pub dirty: DirtyFlags,
}

impl Node {
    /// Create a new detached node with all-dirty flags.
    pub fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            dirty: DirtyFlags::all(),
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text { .. })
    }

    /// If this is an element, return a reference to its [`ElementData`].
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// If this is an element, return a mutable reference to its [`ElementData`].
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
