//! Fragment builder — turns a token stream into detached document nodes.

use dom::{Attr, Document, NodeId};

use crate::tokenizer::{tokenize, MarkupToken};
use crate::is_void_element;

/// Parse `input` into nodes allocated inside `doc` and return the fragment's
/// root ids in source order. Nothing is attached to the document tree; the
/// caller decides where the fragment goes.
///
/// Recovery rules: an end tag pops the open-element stack back past the
/// nearest open element of that name (or is ignored if there is none), void
/// elements never open, and elements still open at end of input are closed
/// implicitly.
pub fn parse_fragment(doc: &mut Document, input: &str) -> Vec<NodeId> {
    let mut roots = Vec::new();
    let mut stack: Vec<NodeId> = Vec::new();

    for token in tokenize(input) {
        match token {
            MarkupToken::Text(data) => {
                let id = doc.create_text(&data);
                attach(doc, &stack, &mut roots, id);
            }
            MarkupToken::Comment(data) => {
                let id = doc.create_comment(&data);
                attach(doc, &stack, &mut roots, id);
            }
            MarkupToken::StartTag {
                name,
                attrs,
                self_closing,
            } => {
                let attrs = attrs
                    .iter()
                    .map(|(n, v)| Attr::new(n, v))
                    .collect::<Vec<_>>();
                let id = doc.create_element(&name, attrs);
                attach(doc, &stack, &mut roots, id);
                if !self_closing && !is_void_element(&name) {
                    stack.push(id);
                }
            }
            MarkupToken::EndTag { name } => {
                let open = stack.iter().rposition(|&id| {
                    doc.get(id)
                        .and_then(|n| n.as_element())
                        .is_some_and(|e| e.tag_name == name)
                });
                if let Some(pos) = open {
                    stack.truncate(pos);
                }
                // Stray end tags are dropped.
            }
        }
    }

    roots
}

fn attach(doc: &mut Document, stack: &[NodeId], roots: &mut Vec<NodeId>, id: NodeId) {
    match stack.last() {
        Some(&parent) => doc.append_child(parent, id),
        None => roots.push(id),
    }
}

// ===========================================================================
// Tests
// ===========================================================================
