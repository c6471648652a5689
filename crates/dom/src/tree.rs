//! DOM tree operations.
//!
//! [`Document`] owns every node and provides tree-manipulation methods that
//! keep the intrusive parent/child/sibling links consistent. Node slots are
//! never reused or freed: `remove` detaches a node but its id stays valid,
//! so wrappers holding a [`NodeId`] never observe a dangling reference.

use std::cell::RefCell;
use std::rc::Rc;

use crate::event::{Event, EventKind, EventTargets, Listener};
use crate::node::{Attr, DirtyFlags, ElementData, Node, NodeData, NodeId};

/// Shared handle to a document. The tree is single-threaded by design;
/// every consumer clones the `Rc` and borrows for the duration of one call.
pub type SharedDocument = Rc<RefCell<Document>>;

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// The complete DOM tree plus the per-node event listener table.
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    targets: EventTargets,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document containing only its root document node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Document)],
            root: NodeId(0),
            targets: EventTargets::new(),
        }
    }

    /// Wrap this document in the shared single-threaded handle.
    pub fn into_shared(self) -> SharedDocument {
        Rc::new(RefCell::new(self))
    }

    /// The root document node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    fn allocate(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    // =======================================================================
    // Node creation
    // =======================================================================

    /// Create a detached element node.
    pub fn create_element(&mut self, tag_name: &str, attrs: Vec<Attr>) -> NodeId {
        let data = NodeData::Element(ElementData::new(tag_name, attrs));
        self.allocate(Node::new(data))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, data: &str) -> NodeId {
        self.allocate(Node::new(NodeData::Text {
            data: data.to_string(),
        }))
    }

    /// Create a detached comment node.
    pub fn create_comment(&mut self, data: &str) -> NodeId {
        self.allocate(Node::new(NodeData::Comment {
            data: data.to_string(),
        }))
    }

    // =======================================================================
    // Tree mutation
    // =======================================================================

    /// Append `child` as the last child of `parent`.
    ///
    /// If `child` already has a parent it is first removed from its current
    /// position.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.get(child).and_then(|n| n.parent).is_some() {
            self.remove(child);
        }

        let old_last = self.get(parent).and_then(|n| n.last_child);

        // Link previous last sibling → child.
        if let Some(old_last_id) = old_last {
            if let Some(old_last_node) = self.get_mut(old_last_id) {
                old_last_node.next_sibling = Some(child);
            }
        }

        // Set child links.
        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = Some(parent);
            child_node.prev_sibling = old_last;
            child_node.next_sibling = None;
        }

        // Update parent.
        if let Some(parent_node) = self.get_mut(parent) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = Some(child);
            }
            parent_node.last_child = Some(child);
        }

        self.mark(parent, DirtyFlags::LAYOUT | DirtyFlags::PAINT);
        self.mark(child, DirtyFlags::all());
    }

    /// Detach `node` from its parent. No-op when the node has no parent.
    /// The node itself (and its subtree) stays alive and re-attachable.
    pub fn remove(&mut self, node_id: NodeId) {
        let (parent_id, prev, next) = match self.get(node_id) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return,
        };
        if parent_id.is_none() {
            return;
        }

        // prev.next = next
        if let Some(prev_id) = prev {
            if let Some(prev_node) = self.get_mut(prev_id) {
                prev_node.next_sibling = next;
            }
        }

        // next.prev = prev
        if let Some(next_id) = next {
            if let Some(next_node) = self.get_mut(next_id) {
                next_node.prev_sibling = prev;
            }
        }

        // Update parent's first_child / last_child.
        if let Some(pid) = parent_id {
            if let Some(parent_node) = self.get_mut(pid) {
                if parent_node.first_child == Some(node_id) {
                    parent_node.first_child = next;
                }
                if parent_node.last_child == Some(node_id) {
                    parent_node.last_child = prev;
                }
            }
            self.mark(pid, DirtyFlags::LAYOUT | DirtyFlags::PAINT);
        }

        // Clear the node's own links.
        if let Some(node) = self.get_mut(node_id) {
            node.parent = None;
            node.prev_sibling = None;
            node.next_sibling = None;
        }
    }

    /// Detach every child of `parent`. The parent stays in place.
    pub fn clear_children(&mut self, parent: NodeId) {
        while let Some(child) = self.get(parent).and_then(|n| n.first_child) {
            self.remove(child);
        }
    }

    // =======================================================================
    // Traversal
    // =======================================================================

    /// Return the immediate children of `parent` in document order.
    pub fn children(&self, parent: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cursor = self.get(parent).and_then(|n| n.first_child);
        while let Some(id) = cursor {
            out.push(id);
            cursor = self.get(id).and_then(|n| n.next_sibling);
        }
        out
    }

    /// Return the chain of ancestors from `node` up to (and including) the
    /// root. The first element is the direct parent.
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cursor = self.get(node).and_then(|n| n.parent);
        while let Some(id) = cursor {
            out.push(id);
            cursor = self.get(id).and_then(|n| n.parent);
        }
        out
    }

    /// Return all descendants of `node` in pre-order DFS (not including
    /// `node` itself).
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = Vec::new();

        // Push children in reverse so the first child is processed first.
        for &child in self.children(node).iter().rev() {
            stack.push(child);
        }

        while let Some(id) = stack.pop() {
            out.push(id);
            for &gc in self.children(id).iter().rev() {
                stack.push(gc);
            }
        }
        out
    }

    // =======================================================================
    // Queries
    // =======================================================================

    /// Find the first element with the given `id` attribute in the subtree
    /// rooted at `root` (pre-order DFS, root included).
    pub fn element_by_id(&self, root: NodeId, id: &str) -> Option<NodeId> {
        if let Some(elem) = self.get(root).and_then(|n| n.as_element()) {
            if elem.id.as_deref() == Some(id) {
                return Some(root);
            }
        }
        for desc in self.descendants(root) {
            if let Some(elem) = self.get(desc).and_then(|n| n.as_element()) {
                if elem.id.as_deref() == Some(id) {
                    return Some(desc);
                }
            }
        }
        None
    }

    // =======================================================================
    // Attributes
    // =======================================================================

    /// Set (or overwrite) an attribute on an element node.
    ///
    /// Writing `id` or `class` refreshes the element's lookup caches.
    /// Silently ignored on non-element nodes.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(elem) = self.get_mut(node).and_then(|n| n.as_element_mut()) else {
            return;
        };
        match elem.attrs.iter_mut().find(|a| a.name == name) {
            Some(attr) => attr.value = value.to_string(),
            None => elem.attrs.push(Attr::new(name, value)),
        }
        if name == "id" || name == "class" {
            elem.refresh_caches();
        }
        self.mark(node, DirtyFlags::all());
    }

    /// Read an attribute value from an element node.
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.get(node)
            .and_then(|n| n.as_element())
            .and_then(|e| e.attribute(name))
    }

    // =======================================================================
    // Inline style
    // =======================================================================

    /// Set an inline style property on an element node. Property names are
    /// stored as given; the platform does not validate them.
    pub fn set_style_property(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(elem) = self.get_mut(node).and_then(|n| n.as_element_mut()) else {
            return;
        };
        match elem.style.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => elem.style.push((name.to_string(), value.to_string())),
        }
        self.mark(node, DirtyFlags::all());
    }

    /// Read an inline style property from an element node.
    pub fn style_property(&self, node: NodeId, name: &str) -> Option<&str> {
        self.get(node)
            .and_then(|n| n.as_element())
            .and_then(|e| e.style.iter().find(|(n, _)| n == name))
            .map(|(_, v)| v.as_str())
    }

    /// All inline style declarations of an element, in first-set order.
    pub fn style_properties(&self, node: NodeId) -> &[(String, String)] {
        self.get(node)
            .and_then(|n| n.as_element())
            .map(|e| e.style.as_slice())
            .unwrap_or(&[])
    }

    // =======================================================================
    // Text content
    // =======================================================================

    /// Replace the node's content with a single text node.
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        self.clear_children(node);
        if !text.is_empty() {
            let text_node = self.create_text(text);
            self.append_child(node, text_node);
        }
    }

    /// Concatenated text data of the node and its descendants, in document
    /// order.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        let collect = |id: NodeId, out: &mut String| {
            if let Some(Node {
                data: NodeData::Text { data },
                ..
            }) = self.get(id)
            {
                out.push_str(data);
            }
        };
        collect(node, &mut out);
        for desc in self.descendants(node) {
            collect(desc, &mut out);
        }
        out
    }

    // =======================================================================
    // Dirty-flag helpers
    // =======================================================================

    fn mark(&mut self, node: NodeId, flags: DirtyFlags) {
        if let Some(n) = self.get_mut(node) {
            n.dirty |= flags;
        }
    }

    /// Clear and return the node's dirty bits.
    pub fn take_dirty(&mut self, node: NodeId) -> DirtyFlags {
        match self.get_mut(node) {
            Some(n) => {
                let flags = n.dirty;
                n.dirty = DirtyFlags::empty();
                flags
            }
            None => DirtyFlags::empty(),
        }
    }

    // =======================================================================
    // Events
    // =======================================================================

    /// Register a listener for `kind` on `node`. Registrations accumulate
    /// and fire in registration order; there is no deduplication.
    pub fn add_listener<F>(&mut self, node: NodeId, kind: EventKind, action: F)
    where
        F: Fn(&mut Event) + 'static,
    {
        self.targets.add(node, kind, Listener::new(action));
    }

    /// Snapshot of the listeners registered for `kind` on `node`.
    pub fn listeners_for(&self, node: NodeId, kind: EventKind) -> Vec<Listener> {
        self.targets.matching(node, kind)
    }

    /// Number of listeners registered for `kind` on `node`.
    pub fn listener_count(&self, node: NodeId, kind: EventKind) -> usize {
        self.targets.matching(node, kind).len()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: build a small document tree and return the relevant node ids.
    ///
    /// ```text
    /// document
    /// └── body
    ///     ├── div#main
    ///     │   ├── p.intro  ("First paragraph")
    ///     │   └── p        ("Second paragraph")
    ///     └── <!-- comment -->
    /// ```
    fn build_sample_tree() -> (Document, NodeId, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();

        let body = doc.create_element("body", Vec::new());
        let div = doc.create_element("div", vec![Attr::new("id", "main")]);
        let p1 = doc.create_element("p", vec![Attr::new("class", "intro highlight")]);
        let p1_text = doc.create_text("First paragraph");
        let p2 = doc.create_element("p", Vec::new());
        let p2_text = doc.create_text("Second paragraph");
        let comment = doc.create_comment(" comment ");

        let root = doc.root();
        doc.append_child(root, body);
        doc.append_child(body, div);
        doc.append_child(div, p1);
        doc.append_child(p1, p1_text);
        doc.append_child(div, p2);
        doc.append_child(p2, p2_text);
        doc.append_child(body, comment);

        (doc, body, div, p1, p2)
    }

    // -- creation -----------------------------------------------------------

    #[test]
    fn new_document_has_root() {
        let doc = Document::new();
        let root = doc.root();
        assert!(matches!(doc.get(root).unwrap().data, NodeData::Document));
        assert!(doc.children(root).is_empty());
    }

    #[test]
    fn create_element_extracts_caches() {
        let mut doc = Document::new();
        let el = doc.create_element(
            "div",
            vec![Attr::new("id", "main"), Attr::new("class", "foo bar")],
        );
        let elem = doc.get(el).unwrap().as_element().unwrap();
        assert_eq!(elem.id.as_deref(), Some("main"));
        assert_eq!(elem.classes, vec!["foo", "bar"]);
    }

    // -- append_child -------------------------------------------------------

    #[test]
    fn append_child_sets_links() {
        let mut doc = Document::new();
        let parent = doc.create_element("div", Vec::new());
        let c1 = doc.create_element("span", Vec::new());
        let c2 = doc.create_text("hi");

        doc.append_child(parent, c1);
        doc.append_child(parent, c2);

        let p = doc.get(parent).unwrap();
        assert_eq!(p.first_child, Some(c1));
        assert_eq!(p.last_child, Some(c2));

        let n1 = doc.get(c1).unwrap();
        assert_eq!(n1.parent, Some(parent));
        assert_eq!(n1.prev_sibling, None);
        assert_eq!(n1.next_sibling, Some(c2));

        let n2 = doc.get(c2).unwrap();
        assert_eq!(n2.parent, Some(parent));
        assert_eq!(n2.prev_sibling, Some(c1));
        assert_eq!(n2.next_sibling, None);
    }

    #[test]
    fn append_child_moves_from_old_parent() {
        let mut doc = Document::new();
        let p1 = doc.create_element("div", Vec::new());
        let p2 = doc.create_element("section", Vec::new());
        let child = doc.create_element("span", Vec::new());

        doc.append_child(p1, child);
        assert_eq!(doc.children(p1).len(), 1);

        // Move to p2 — should auto-detach from p1.
        doc.append_child(p2, child);
        assert_eq!(doc.children(p1).len(), 0);
        assert_eq!(doc.children(p2), vec![child]);
    }

    #[test]
    fn append_many_children_order() {
        let mut doc = Document::new();
        let parent = doc.create_element("div", Vec::new());
        let mut ids = Vec::new();
        for i in 0..10 {
            let child = doc.create_text(&format!("child {i}"));
            doc.append_child(parent, child);
            ids.push(child);
        }
        assert_eq!(doc.children(parent), ids);
    }

    // -- remove -------------------------------------------------------------

    #[test]
    fn remove_middle_child_relinks_siblings() {
        let mut doc = Document::new();
        let parent = doc.create_element("ul", Vec::new());
        let a = doc.create_element("li", Vec::new());
        let b = doc.create_element("li", Vec::new());
        let c = doc.create_element("li", Vec::new());

        doc.append_child(parent, a);
        doc.append_child(parent, b);
        doc.append_child(parent, c);

        doc.remove(b);
        assert_eq!(doc.children(parent), vec![a, c]);

        assert_eq!(doc.get(a).unwrap().next_sibling, Some(c));
        assert_eq!(doc.get(c).unwrap().prev_sibling, Some(a));

        // Removed node is detached but still addressable.
        let nb = doc.get(b).unwrap();
        assert_eq!(nb.parent, None);
        assert_eq!(nb.prev_sibling, None);
        assert_eq!(nb.next_sibling, None);
    }

    #[test]
    fn remove_first_and_last_child_update_parent_links() {
        let mut doc = Document::new();
        let parent = doc.create_element("ul", Vec::new());
        let a = doc.create_element("li", Vec::new());
        let b = doc.create_element("li", Vec::new());

        doc.append_child(parent, a);
        doc.append_child(parent, b);

        doc.remove(a);
        let p = doc.get(parent).unwrap();
        assert_eq!(p.first_child, Some(b));
        assert_eq!(p.last_child, Some(b));

        doc.remove(b);
        let p = doc.get(parent).unwrap();
        assert_eq!(p.first_child, None);
        assert_eq!(p.last_child, None);
    }

    #[test]
    fn remove_detached_node_is_noop() {
        let mut doc = Document::new();
        let lone = doc.create_element("div", Vec::new());
        doc.remove(lone); // no parent — must not panic or relink anything
        assert!(doc.get(lone).unwrap().parent.is_none());
    }

    #[test]
    fn removed_subtree_can_be_reattached() {
        let (mut doc, body, div, _p1, _p2) = build_sample_tree();
        doc.remove(div);
        assert_eq!(doc.children(body).len(), 1); // comment only

        doc.append_child(body, div);
        assert_eq!(doc.children(body).len(), 2);
        // Subtree survived the round trip.
        assert_eq!(doc.text_content(div), "First paragraphSecond paragraph");
    }

    // -- clear_children -----------------------------------------------------

    #[test]
    fn clear_children_empties_but_keeps_node_attached() {
        let (mut doc, body, div, _p1, _p2) = build_sample_tree();
        doc.clear_children(div);
        assert!(doc.children(div).is_empty());
        assert_eq!(doc.get(div).unwrap().parent, Some(body));
    }

    // -- traversal ----------------------------------------------------------

    #[test]
    fn ancestors_chain() {
        let (doc, body, div, p1, _p2) = build_sample_tree();
        assert_eq!(doc.ancestors(p1), vec![div, body, doc.root()]);
        assert!(doc.ancestors(doc.root()).is_empty());
    }

    #[test]
    fn descendants_preorder() {
        let (doc, body, div, p1, p2) = build_sample_tree();

        let desc = doc.descendants(div);
        assert_eq!(desc.len(), 4);
        assert_eq!(desc[0], p1);
        assert!(doc.get(desc[1]).unwrap().is_text());
        assert_eq!(desc[2], p2);
        assert!(doc.get(desc[3]).unwrap().is_text());

        // body has div, p1, text, p2, text, comment = 6 descendants
        assert_eq!(doc.descendants(body).len(), 6);
    }

    // -- element_by_id ------------------------------------------------------

    #[test]
    fn element_by_id_found_and_missing() {
        let (doc, _body, div, _p1, _p2) = build_sample_tree();
        assert_eq!(doc.element_by_id(doc.root(), "main"), Some(div));
        assert_eq!(doc.element_by_id(doc.root(), "nope"), None);
    }

    // -- attributes ---------------------------------------------------------

    #[test]
    fn set_attribute_overwrites_and_appends() {
        let mut doc = Document::new();
        let el = doc.create_element("input", Vec::new());

        doc.set_attribute(el, "type", "text");
        doc.set_attribute(el, "type", "number");
        doc.set_attribute(el, "name", "age");

        assert_eq!(doc.attribute(el, "type"), Some("number"));
        assert_eq!(doc.attribute(el, "name"), Some("age"));
        assert_eq!(doc.get(el).unwrap().as_element().unwrap().attrs.len(), 2);
    }

    #[test]
    fn set_attribute_refreshes_id_and_class_caches() {
        let mut doc = Document::new();
        let el = doc.create_element("div", Vec::new());

        doc.set_attribute(el, "id", "hero");
        doc.set_attribute(el, "class", "a b");

        let elem = doc.get(el).unwrap().as_element().unwrap();
        assert_eq!(elem.id.as_deref(), Some("hero"));
        assert_eq!(elem.classes, vec!["a", "b"]);
        assert_eq!(doc.element_by_id(doc.root(), "hero"), None); // detached
    }

    #[test]
    fn set_attribute_on_text_node_is_ignored() {
        let mut doc = Document::new();
        let t = doc.create_text("hi");
        doc.set_attribute(t, "id", "x");
        assert_eq!(doc.attribute(t, "id"), None);
    }

    // -- inline style -------------------------------------------------------

    #[test]
    fn style_properties_keep_first_set_order() {
        let mut doc = Document::new();
        let el = doc.create_element("div", Vec::new());

        doc.set_style_property(el, "color", "red");
        doc.set_style_property(el, "left", "10px");
        doc.set_style_property(el, "color", "blue"); // overwrite in place

        assert_eq!(doc.style_property(el, "color"), Some("blue"));
        assert_eq!(doc.style_property(el, "left"), Some("10px"));
        assert_eq!(
            doc.style_properties(el)
                .iter()
                .map(|(n, _)| n.as_str())
                .collect::<Vec<_>>(),
            vec!["color", "left"]
        );
    }

    #[test]
    fn style_property_missing_is_none() {
        let mut doc = Document::new();
        let el = doc.create_element("div", Vec::new());
        assert_eq!(doc.style_property(el, "left"), None);
    }

    // -- text content -------------------------------------------------------

    #[test]
    fn set_text_replaces_children() {
        let (mut doc, _body, div, _p1, _p2) = build_sample_tree();
        doc.set_text(div, "plain");
        assert_eq!(doc.children(div).len(), 1);
        assert_eq!(doc.text_content(div), "plain");
    }

    #[test]
    fn set_text_empty_clears() {
        let (mut doc, _body, div, _p1, _p2) = build_sample_tree();
        doc.set_text(div, "");
        assert!(doc.children(div).is_empty());
        assert_eq!(doc.text_content(div), "");
    }

    #[test]
    fn text_content_concatenates_descendants() {
        let (doc, body, _div, _p1, _p2) = build_sample_tree();
        assert_eq!(doc.text_content(body), "First paragraphSecond paragraph");
    }

    // -- dirty flags --------------------------------------------------------

    #[test]
    fn mutations_set_dirty_flags() {
        let mut doc = Document::new();
        let el = doc.create_element("div", Vec::new());

        // Newly-created nodes start all-dirty.
        assert_eq!(doc.take_dirty(el), DirtyFlags::all());
        assert_eq!(doc.take_dirty(el), DirtyFlags::empty());

        doc.set_style_property(el, "color", "red");
        assert!(doc.take_dirty(el).contains(DirtyFlags::STYLE));

        let child = doc.create_text("x");
        doc.take_dirty(el);
        doc.append_child(el, child);
        let flags = doc.take_dirty(el);
        assert!(flags.contains(DirtyFlags::LAYOUT | DirtyFlags::PAINT));
    }
}
