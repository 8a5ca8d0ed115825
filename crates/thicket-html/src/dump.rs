//! Tree dump in the html5lib test format.
//!
//! ```text
//! | <!DOCTYPE html>
//! | <html>
//! |   <head>
//! |   <body>
//! |     <p>
//! |       class="x"
//! |       "text"
//! ```
//!
//! Attributes are listed under their element sorted by name. Foreign
//! elements and namespaced attributes carry their namespace prefix
//! (`<svg path>`, `xlink href`). Template contents follow a `content` line.

use std::fmt::Write as _;

use thicket_dom::{Document, Namespace, NodeId, NodeType};

use crate::driver::ParseOutput;

enum Item {
    Node(NodeId, usize),
    Content(NodeId, usize),
}

/// Dump a parse result: the document's children, or the fragment's nodes.
#[must_use]
pub fn dump(output: &ParseOutput) -> String {
    dump_children(&output.document, output.root)
}

/// Dump every descendant of `parent`, one line per node.
#[must_use]
pub fn dump_children(document: &Document, parent: NodeId) -> String {
    let mut out = String::new();
    let mut stack: Vec<Item> = Vec::new();
    push_children(document, parent, 0, &mut stack);

    // Iterative walk so arbitrarily deep trees do not exhaust the call stack.
    while let Some(item) = stack.pop() {
        match item {
            Item::Content(fragment, depth) => {
                line(&mut out, depth, "content");
                push_children(document, fragment, depth + 1, &mut stack);
            }
            Item::Node(id, depth) => {
                line(&mut out, depth, &describe(document, id));
                if let Some(element) = document.element(id) {
                    for attr in attribute_lines(document, id) {
                        line(&mut out, depth + 1, &attr);
                    }
                    push_children(document, id, depth + 1, &mut stack);
                    if let Some(content) = element.template_content {
                        stack.push(Item::Content(content, depth + 1));
                    }
                }
            }
        }
    }
    out
}

/// Print the subtree below `id` to stdout, for debugging.
pub fn print_tree(document: &Document, id: NodeId) {
    print!("{}", dump_children(document, id));
}

fn push_children(document: &Document, parent: NodeId, depth: usize, stack: &mut Vec<Item>) {
    let children: Vec<NodeId> = document.children(parent).collect();
    stack.extend(children.into_iter().rev().map(|child| Item::Node(child, depth)));
}

fn line(out: &mut String, depth: usize, text: &str) {
    let _ = writeln!(out, "| {}{text}", "  ".repeat(depth));
}

fn describe(document: &Document, id: NodeId) -> String {
    let Some(node) = document.get(id) else {
        return String::new();
    };
    match &node.node_type {
        NodeType::Document => "#document".to_string(),
        NodeType::DocumentFragment => "#document-fragment".to_string(),
        NodeType::DocumentType(doctype) => {
            if doctype.public_id.is_empty() && doctype.system_id.is_empty() {
                format!("<!DOCTYPE {}>", doctype.name)
            } else {
                format!(
                    "<!DOCTYPE {} \"{}\" \"{}\">",
                    doctype.name, doctype.public_id, doctype.system_id
                )
            }
        }
        NodeType::Element(element) => {
            let name = document.tag_name(id).map_or_else(String::new, |n| n.to_string());
            match element.namespace {
                Namespace::Svg | Namespace::MathMl => format!("<{} {name}>", element.namespace),
                _ => format!("<{name}>"),
            }
        }
        NodeType::Text(data) => format!("\"{data}\""),
        NodeType::Comment(data) => format!("<!-- {data} -->"),
        NodeType::ProcessingInstruction { target, data } => format!("<?{target} {data}>"),
    }
}

/// `name="value"` lines for an element's attributes, sorted by name.
fn attribute_lines(document: &Document, id: NodeId) -> Vec<String> {
    let Some(element) = document.element(id) else {
        return Vec::new();
    };
    let interner = document.interner();
    let interner = interner.borrow();
    let mut lines: Vec<(String, &str)> = element
        .attrs()
        .iter()
        .map(|attr| {
            let local = interner
                .attr_name(attr.local_name)
                .map_or_else(String::new, |n| n.to_string());
            let name = match attr.prefix.and_then(|p| interner.prefix_name(p)) {
                Some(prefix) => format!("{prefix} {local}"),
                None => local.to_string(),
            };
            (name, attr.value.as_str())
        })
        .collect();
    lines.sort_by(|a, b| a.0.cmp(&b.0));
    lines
        .into_iter()
        .map(|(name, value)| format!("{name}=\"{value}\""))
        .collect()
}

#[cfg(test)]
mod tests {
    use thicket_dom::{Attr, Tag};

    use super::*;

    #[test]
    fn attributes_sorted_before_children() {
        let mut document = Document::new();
        let (b, a) = {
            let interner = document.interner();
            let mut interner = interner.borrow_mut();
            (interner.intern_attr("b"), interner.intern_attr("a"))
        };
        let div = document
            .create_element(
                Tag::Div.id(),
                Namespace::Html,
                vec![Attr::new(b, "2".into()), Attr::new(a, "1".into())],
            )
            .unwrap();
        document.insert_as_last_child(NodeId::ROOT, div);
        let text = document.create_text("hi".into()).unwrap();
        document.insert_as_last_child(div, text);

        assert_eq!(
            dump_children(&document, NodeId::ROOT),
            "| <div>\n|   a=\"1\"\n|   b=\"2\"\n|   \"hi\"\n"
        );
    }

    #[test]
    fn foreign_elements_show_namespace() {
        let mut document = Document::new();
        let svg = document.create_element(Tag::Svg.id(), Namespace::Svg, Vec::new()).unwrap();
        document.insert_as_last_child(NodeId::ROOT, svg);
        let comment = document.create_comment(" c ".into()).unwrap();
        document.insert_as_last_child(NodeId::ROOT, comment);
        assert_eq!(dump_children(&document, NodeId::ROOT), "| <svg svg>\n| <!--  c  -->\n");
    }
}
