//! The node handle — one node, a small fixed operation set.

use std::rc::Rc;

use dom::{Event, EventKind, NodeId, SharedDocument};

use crate::position::{px_number, px_string, Offset, PurePosition};

/// Display value written by `show()`.
const DEFAULT_DISPLAY: &str = "block";

/// A wrapper around exactly one node of one document.
///
/// Handles are produced by [`Page`](crate::Page) and stay pointed at the
/// same node for their whole lifetime. Cloning a handle aliases the node.
/// Operations that take another handle expect it to belong to the same
/// page.
///
/// None of the mutating operations returns a value — the surface is a set
/// of terminal statements, not a fluent chain.
#[derive(Clone)]
pub struct NodeHandle {
    doc: SharedDocument,
    node: NodeId,
}

impl NodeHandle {
    pub(crate) fn new(doc: SharedDocument, node: NodeId) -> Self {
        Self { doc, node }
    }

    /// The wrapped node id.
    pub fn node(&self) -> NodeId {
        self.node
    }

    // -- styling ------------------------------------------------------------

    /// Set inline style properties, in iteration order. Names and values are
    /// passed through to the platform unvalidated.
    pub fn style<I, K, V>(&self, declarations: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut doc = self.doc.borrow_mut();
        for (name, value) in declarations {
            doc.set_style_property(self.node, name.as_ref(), value.as_ref());
        }
    }

    /// Show the node with the fixed default display value.
    pub fn show(&self) {
        self.show_as(DEFAULT_DISPLAY);
    }

    /// Show the node with an explicit display value.
    pub fn show_as(&self, display: &str) {
        self.doc
            .borrow_mut()
            .set_style_property(self.node, "display", display);
    }

    /// Hide the node.
    pub fn hide(&self) {
        self.doc
            .borrow_mut()
            .set_style_property(self.node, "display", "none");
    }

    // -- positioning --------------------------------------------------------

    /// Move the node by the given delta, per axis. An absent axis is left
    /// untouched; a present zero is a real (if idle) move. Offsets that were
    /// never set count as zero.
    pub fn translate(&self, delta: Offset) {
        let mut doc = self.doc.borrow_mut();
        if let Some(dx) = delta.x {
            let current = doc
                .style_property(self.node, "left")
                .map(px_number)
                .unwrap_or(0.0);
            doc.set_style_property(self.node, "left", &px_string(current + dx));
        }
        if let Some(dy) = delta.y {
            let current = doc
                .style_property(self.node, "top")
                .map(px_number)
                .unwrap_or(0.0);
            doc.set_style_property(self.node, "top", &px_string(current + dy));
        }
    }

    /// Place the node at the given coordinates, per axis, discarding any
    /// prior offset on the axes that are present.
    pub fn position(&self, target: Offset) {
        let mut doc = self.doc.borrow_mut();
        if let Some(x) = target.x {
            doc.set_style_property(self.node, "left", &px_string(x));
        }
        if let Some(y) = target.y {
            doc.set_style_property(self.node, "top", &px_string(y));
        }
    }

    /// The node's current offsets as plain numbers. Unset offsets read as
    /// zero; malformed stored values read as `NaN`.
    pub fn pure_position(&self) -> PurePosition {
        let doc = self.doc.borrow();
        PurePosition {
            x: doc
                .style_property(self.node, "left")
                .map(px_number)
                .unwrap_or(0.0),
            y: doc
                .style_property(self.node, "top")
                .map(px_number)
                .unwrap_or(0.0),
        }
    }

    // -- composition --------------------------------------------------------

    /// Append `child`'s node as this node's last child.
    pub fn append(&self, child: &NodeHandle) {
        debug_assert!(Rc::ptr_eq(&self.doc, &child.doc));
        self.doc.borrow_mut().append_child(self.node, child.node);
    }

    /// Attach this node as the last child of `parent`.
    pub fn append_to(&self, parent: &NodeHandle) {
        parent.append(self);
    }

    /// Detach this node from its parent. No-op when already detached; the
    /// handle stays valid either way.
    pub fn remove(&self) {
        self.doc.borrow_mut().remove(self.node);
    }

    // -- content ------------------------------------------------------------

    /// Replace the node's content with plain text.
    pub fn text(&self, text: &str) {
        self.doc.borrow_mut().set_text(self.node, text);
    }

    /// Replace the node's content with parsed markup.
    pub fn html(&self, source: &str) {
        let mut doc = self.doc.borrow_mut();
        let roots = markup::parse_fragment(&mut doc, source);
        doc.clear_children(self.node);
        for id in roots {
            doc.append_child(self.node, id);
        }
    }

    /// Clear the node's content. The node itself stays where it is.
    pub fn empty(&self) {
        self.doc.borrow_mut().clear_children(self.node);
    }

    // -- attributes ---------------------------------------------------------

    /// Set attributes, in iteration order.
    pub fn attribute<I, K, V>(&self, attrs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut doc = self.doc.borrow_mut();
        for (name, value) in attrs {
            doc.set_attribute(self.node, name.as_ref(), value.as_ref());
        }
    }

    // -- events -------------------------------------------------------------

    /// Register `action` for events of `kind` on this node. Registrations
    /// accumulate and fire in registration order; there is no removal.
    pub fn on<F>(&self, kind: EventKind, action: F)
    where
        F: Fn(&mut Event) + 'static,
    {
        self.doc.borrow_mut().add_listener(self.node, kind, action);
    }
}

// ===========================================================================
// Tests
// ===========================================================================
