//! Tests for document mutation: insert, remove, replace and teardown.

use thicket_dom::{Attr, AttrId, Document, DomError, Namespace, NodeId, Tag};

/// Helper to create a detached HTML element.
fn alloc_element(doc: &mut Document, tag: Tag) -> NodeId {
    doc.create_element(tag.id(), Namespace::Html, Vec::new())
        .expect("allocation")
}

fn children(doc: &Document, parent: NodeId) -> Vec<NodeId> {
    doc.children(parent).collect()
}

/// Parent with children `a`, `b`, `c`.
fn three_children(doc: &mut Document) -> (NodeId, NodeId, NodeId, NodeId) {
    let parent = alloc_element(doc, Tag::Div);
    doc.insert_as_last_child(NodeId::ROOT, parent);
    let a = alloc_element(doc, Tag::A);
    let b = alloc_element(doc, Tag::B);
    let c = alloc_element(doc, Tag::I);
    doc.insert_as_last_child(parent, a);
    doc.insert_as_last_child(parent, b);
    doc.insert_as_last_child(parent, c);
    (parent, a, b, c)
}

// ========== remove ==========

#[test]
fn test_remove_single_child() {
    let mut doc = Document::new();
    let parent = alloc_element(&mut doc, Tag::Div);
    doc.insert_as_last_child(NodeId::ROOT, parent);
    let child = alloc_element(&mut doc, Tag::P);
    doc.insert_as_last_child(parent, child);

    doc.remove(child);

    assert!(children(&doc, parent).is_empty());
    assert_eq!(doc.first_child(parent), None);
    assert_eq!(doc.last_child(parent), None);
    assert_eq!(doc.parent(child), None);
}

#[test]
fn test_remove_first_of_three() {
    let mut doc = Document::new();
    let (parent, a, b, c) = three_children(&mut doc);

    doc.remove(a);

    assert_eq!(children(&doc, parent), vec![b, c]);
    assert_eq!(doc.first_child(parent), Some(b));
    assert_eq!(doc.prev_sibling(b), None);
}

#[test]
fn test_remove_middle_of_three() {
    let mut doc = Document::new();
    let (parent, a, b, c) = three_children(&mut doc);

    doc.remove(b);

    assert_eq!(children(&doc, parent), vec![a, c]);
    assert_eq!(doc.next_sibling(a), Some(c));
    assert_eq!(doc.prev_sibling(c), Some(a));
}

#[test]
fn test_remove_last_of_three() {
    let mut doc = Document::new();
    let (parent, a, b, c) = three_children(&mut doc);

    doc.remove(c);

    assert_eq!(children(&doc, parent), vec![a, b]);
    assert_eq!(doc.last_child(parent), Some(b));
    assert_eq!(doc.next_sibling(b), None);
}

#[test]
fn test_remove_detached_is_noop() {
    let mut doc = Document::new();
    let lonely = alloc_element(&mut doc, Tag::Span);
    doc.remove(lonely);
    assert_eq!(doc.parent(lonely), None);
}

#[test]
fn test_stale_ids_are_ignored() {
    let mut doc = Document::new();
    let (parent, a, b, c) = three_children(&mut doc);
    let gone = alloc_element(&mut doc, Tag::Span);
    doc.destroy_node(gone);
    assert!(!doc.contains(gone));

    doc.remove(gone);
    doc.insert_as_last_child(parent, gone);
    doc.insert_as_last_child(gone, a);
    doc.insert_before(b, gone);
    doc.insert_before(gone, b);
    doc.insert_after(b, gone);
    doc.insert_after(gone, b);
    doc.replace_all_children(parent, gone);
    doc.replace_all_children(gone, b);

    assert_eq!(children(&doc, parent), vec![a, b, c]);
    assert_eq!(doc.parent(a), Some(parent));
}

// ========== insert_before / insert_after ==========

#[test]
fn test_insert_before_first() {
    let mut doc = Document::new();
    let (parent, a, b, c) = three_children(&mut doc);
    let x = alloc_element(&mut doc, Tag::Em);

    doc.insert_before(a, x);

    assert_eq!(children(&doc, parent), vec![x, a, b, c]);
    assert_eq!(doc.first_child(parent), Some(x));
    assert_eq!(doc.prev_sibling(a), Some(x));
}

#[test]
fn test_insert_before_middle() {
    let mut doc = Document::new();
    let (parent, a, b, c) = three_children(&mut doc);
    let x = alloc_element(&mut doc, Tag::Em);

    doc.insert_before(b, x);

    assert_eq!(children(&doc, parent), vec![a, x, b, c]);
    assert_eq!(doc.next_sibling(a), Some(x));
    assert_eq!(doc.parent(x), Some(parent));
}

#[test]
fn test_insert_after_last_updates_last_child() {
    let mut doc = Document::new();
    let (parent, a, b, c) = three_children(&mut doc);
    let x = alloc_element(&mut doc, Tag::Em);

    doc.insert_after(c, x);

    assert_eq!(children(&doc, parent), vec![a, b, c, x]);
    assert_eq!(doc.last_child(parent), Some(x));
}

#[test]
fn test_insert_moves_attached_node() {
    let mut doc = Document::new();
    let (parent, a, b, c) = three_children(&mut doc);

    doc.insert_before(a, c);

    assert_eq!(children(&doc, parent), vec![c, a, b]);
    assert_eq!(doc.last_child(parent), Some(b));
    assert_eq!(doc.next_sibling(b), None);
}

// ========== replace_all_children ==========

#[test]
fn test_replace_all_children_wraps_existing_children() {
    let mut doc = Document::new();
    let (parent, a, b, c) = three_children(&mut doc);
    let wrapper = alloc_element(&mut doc, Tag::Span);

    doc.replace_all_children(parent, wrapper);

    assert_eq!(children(&doc, parent), vec![wrapper]);
    assert_eq!(children(&doc, wrapper), vec![a, b, c]);
    assert_eq!(doc.parent(a), Some(wrapper));
}

#[test]
fn test_replace_all_children_of_empty_parent() {
    let mut doc = Document::new();
    let parent = alloc_element(&mut doc, Tag::Div);
    let wrapper = alloc_element(&mut doc, Tag::Span);

    doc.replace_all_children(parent, wrapper);

    assert_eq!(children(&doc, parent), vec![wrapper]);
    assert!(children(&doc, wrapper).is_empty());
}

// ========== allocation / teardown ==========

#[test]
fn test_template_gets_content_fragment() {
    let mut doc = Document::new();
    let template = alloc_element(&mut doc, Tag::Template);
    let content = doc.template_content(template).expect("content fragment");
    assert_eq!(doc.parent(content), None);
    let div = alloc_element(&mut doc, Tag::Div);
    assert!(doc.template_content(div).is_none());
}

#[test]
fn test_destroy_subtree_frees_every_slot() {
    let mut doc = Document::new();
    let before = doc.len();
    let (parent, a, _, _) = three_children(&mut doc);
    let deep = alloc_element(&mut doc, Tag::Template);
    doc.insert_as_last_child(a, deep);
    let text = doc.create_text("x".to_string()).expect("text");
    let content = doc.template_content(deep).expect("content");
    doc.insert_as_last_child(content, text);

    doc.destroy_subtree(parent);

    assert_eq!(doc.len(), before);
    assert!(doc.get(parent).is_none());
    assert!(doc.get(text).is_none());
    assert_eq!(doc.first_child(NodeId::ROOT), None);
}

#[test]
fn test_destroy_subtree_handles_deep_nesting() {
    let mut doc = Document::new();
    let top = alloc_element(&mut doc, Tag::Div);
    doc.insert_as_last_child(NodeId::ROOT, top);
    let mut current = top;
    for _ in 0..100_000 {
        let next = alloc_element(&mut doc, Tag::Div);
        doc.insert_as_last_child(current, next);
        current = next;
    }

    doc.destroy_subtree(top);

    assert_eq!(doc.len(), 1);
}

#[test]
fn test_freed_slots_are_reused() {
    let mut doc = Document::new();
    let a = alloc_element(&mut doc, Tag::A);
    doc.destroy_node(a);
    let b = alloc_element(&mut doc, Tag::B);
    assert_eq!(a, b);
    assert!(doc.is_html(b, Tag::B));
}

#[test]
fn test_node_limit_is_reported() {
    let mut doc = Document::new().with_node_limit(Some(2));
    let _ = alloc_element(&mut doc, Tag::Div);
    let err = doc
        .create_text("overflow".to_string())
        .expect_err("limit reached");
    assert_eq!(err, DomError::NodeLimitExceeded { limit: 2 });
}

#[test]
fn test_attribute_cache_and_owner() {
    let mut doc = Document::new();
    let el = doc
        .create_element(
            Tag::Div.id(),
            Namespace::Html,
            vec![
                Attr::new(AttrId::CLASS, "x  y".to_string()),
                Attr::new(AttrId::ID, "main".to_string()),
            ],
        )
        .expect("allocation");
    let data = doc.element(el).expect("element");
    assert_eq!(data.id(), Some("main"));
    assert_eq!(data.classes().collect::<Vec<_>>(), vec!["x", "y"]);
    assert!(data.attrs().iter().all(|a| a.owner == Some(el)));
}

#[test]
fn test_body_and_document_element() {
    let mut doc = Document::new();
    let html = alloc_element(&mut doc, Tag::Html);
    let head = alloc_element(&mut doc, Tag::Head);
    let body = alloc_element(&mut doc, Tag::Body);
    doc.insert_as_last_child(NodeId::ROOT, html);
    doc.insert_as_last_child(html, head);
    doc.insert_as_last_child(html, body);

    assert_eq!(doc.document_element(), Some(html));
    assert_eq!(doc.body(), Some(body));
    assert!(doc.is_descendant_of(body, NodeId::ROOT));
    assert_eq!(doc.tag_name(body).as_deref(), Some("body"));
}
