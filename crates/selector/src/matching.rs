//! Selector matching — right-to-left from the subject compound.

use dom::{Document, ElementData, NodeId};

use crate::{Combinator, ComplexSelector, CompoundSelector, SimpleSelector};

/// Test whether the element `node_id` matches a full complex selector.
///
/// Returns `false` if `node_id` does not refer to an element.
pub fn matches_selector(doc: &Document, node_id: NodeId, selector: &ComplexSelector) -> bool {
    let Some((subject, mut combinator)) = selector.parts.first().map(|(c, k)| (c, *k)) else {
        return false;
    };

    if !matches_compound(doc, node_id, subject) {
        return false;
    }

    let mut current = node_id;
    for (compound, next_combinator) in &selector.parts[1..] {
        match combinator {
            Some(Combinator::Descendant) => {
                // Walk up ancestors until one matches or we run out.
                let mut ancestor = parent_element(doc, current);
                let mut found = false;
                while let Some(anc_id) = ancestor {
                    if matches_compound(doc, anc_id, compound) {
                        current = anc_id;
                        found = true;
                        break;
                    }
                    ancestor = parent_element(doc, anc_id);
                }
                if !found {
                    return false;
                }
            }
            Some(Combinator::Child) => match parent_element(doc, current) {
                Some(parent_id) if matches_compound(doc, parent_id, compound) => {
                    current = parent_id;
                }
                _ => return false,
            },
            None => return false,
        }
        combinator = *next_combinator;
    }

    true
}

/// Test whether the element matches every simple in a compound selector.
pub fn matches_compound(doc: &Document, node_id: NodeId, compound: &CompoundSelector) -> bool {
    let Some(elem) = doc.get(node_id).and_then(|n| n.as_element()) else {
        return false;
    };
    compound
        .simples
        .iter()
        .all(|simple| matches_simple(elem, simple))
}

fn matches_simple(elem: &ElementData, simple: &SimpleSelector) -> bool {
    match simple {
        SimpleSelector::Type(tag) => elem.tag_name == *tag,
        SimpleSelector::Universal => true,
        SimpleSelector::Id(id) => elem.id.as_deref() == Some(id.as_str()),
        SimpleSelector::Class(class) => elem.has_class(class),
        SimpleSelector::Attribute { name, value } => match value {
            Some(expected) => elem.attribute(name) == Some(expected.as_str()),
            None => elem.attribute(name).is_some(),
        },
    }
}

/// The nearest ancestor that is an element (document and text nodes are
/// skipped).
fn parent_element(doc: &Document, node_id: NodeId) -> Option<NodeId> {
    let mut cursor = doc.get(node_id).and_then(|n| n.parent);
    while let Some(id) = cursor {
        if doc.get(id).is_some_and(|n| n.is_element()) {
            return Some(id);
        }
        cursor = doc.get(id).and_then(|n| n.parent);
    }
    None
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;
    use dom::Attr;

    /// body > article#post.story > p.lead
    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let body = doc.create_element("body", Vec::new());
        let article = doc.create_element(
            "article",
            vec![Attr::new("id", "post"), Attr::new("class", "story")],
        );
        let p = doc.create_element("p", vec![Attr::new("class", "lead")]);
        let root = doc.root();
        doc.append_child(root, body);
        doc.append_child(body, article);
        doc.append_child(article, p);
        (doc, body, article, p)
    }

    fn matches(doc: &Document, node: NodeId, input: &str) -> bool {
        matches_selector(doc, node, &parse(input).unwrap()[0])
    }

    #[test]
    fn simple_selectors_match() {
        let (doc, body, article, p) = sample();
        assert!(matches(&doc, body, "body"));
        assert!(matches(&doc, article, "#post"));
        assert!(matches(&doc, article, ".story"));
        assert!(matches(&doc, article, "*"));
        assert!(matches(&doc, p, "p.lead"));
        assert!(!matches(&doc, p, "p.note"));
        assert!(!matches(&doc, body, "div"));
    }

    #[test]
    fn attribute_selectors_match() {
        let (doc, _body, article, _p) = sample();
        assert!(matches(&doc, article, "[id]"));
        assert!(matches(&doc, article, "[id=post]"));
        assert!(!matches(&doc, article, "[id=other]"));
        assert!(!matches(&doc, article, "[hidden]"));
    }

    #[test]
    fn descendant_combinator_walks_ancestors() {
        let (doc, _body, _article, p) = sample();
        assert!(matches(&doc, p, "body p"));
        assert!(matches(&doc, p, "article p"));
        assert!(matches(&doc, p, "body article p"));
        assert!(!matches(&doc, p, "div p"));
    }

    #[test]
    fn child_combinator_requires_direct_parent() {
        let (doc, _body, article, p) = sample();
        assert!(matches(&doc, p, "article > p"));
        assert!(matches(&doc, article, "body > article"));
        assert!(!matches(&doc, p, "body > p"));
    }

    #[test]
    fn mixed_combinators() {
        let (doc, _body, _article, p) = sample();
        assert!(matches(&doc, p, "body > article p"));
        assert!(matches(&doc, p, "body article > p"));
        assert!(!matches(&doc, p, "article > body p"));
    }

    #[test]
    fn non_element_never_matches() {
        let (mut doc, _body, article, _p) = sample();
        let text = doc.create_text("hello");
        doc.append_child(article, text);
        assert!(!matches(&doc, text, "*"));
        assert!(!matches(&doc, doc.root(), "*"));
    }
}
