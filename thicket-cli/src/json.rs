//! JSON view of a parsed tree.
//!
//! The tree is walked with an explicit work stack, so arbitrarily deep
//! documents print without exhausting the call stack.

use std::collections::BTreeMap;
use std::io::{self, Write};

use serde::Serialize;
use thicket_dom::{Document, ElementData, Namespace, NodeId, NodeType};
use thicket_html::ParseOutput;

/// A node without children, serialized in one go.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum Leaf<'a> {
    #[serde(rename_all = "camelCase")]
    Doctype {
        name: &'a str,
        public_id: &'a str,
        system_id: &'a str,
    },
    Text {
        content: &'a str,
    },
    Comment {
        content: &'a str,
    },
    ProcessingInstruction {
        target: &'a str,
        data: &'a str,
    },
}

/// Pending output.
enum Step {
    Node { id: NodeId, comma: bool },
    Raw(&'static str),
}

/// Write the document, or the fragment root's children wrapped in a
/// fragment node, followed by a newline.
///
/// Element attributes are keyed by their qualified name.
pub fn write_json<W: Write>(output: &ParseOutput, out: &mut W) -> io::Result<()> {
    let document = &output.document;
    let mut steps = Vec::new();
    if output.is_fragment() {
        out.write_all(br#"{"type":"documentFragment","children":["#)?;
        steps.push(Step::Raw("]}"));
        push_children(&mut steps, document, output.root);
    } else {
        steps.push(Step::Node {
            id: output.root,
            comma: false,
        });
    }

    while let Some(step) = steps.pop() {
        match step {
            Step::Raw(text) => out.write_all(text.as_bytes())?,
            Step::Node { id, comma } => {
                if comma {
                    out.write_all(b",")?;
                }
                write_node(document, id, out, &mut steps)?;
            }
        }
    }
    out.write_all(b"\n")
}

fn push_children(steps: &mut Vec<Step>, document: &Document, parent: NodeId) {
    let children: Vec<NodeId> = document.children(parent).collect();
    for (index, &id) in children.iter().enumerate().rev() {
        steps.push(Step::Node {
            id,
            comma: index > 0,
        });
    }
}

/// Write a leaf whole, or the head of a container with its tail queued.
fn write_node<W: Write>(
    document: &Document,
    id: NodeId,
    out: &mut W,
    steps: &mut Vec<Step>,
) -> io::Result<()> {
    let Some(node) = document.get(id) else {
        return out.write_all(b"null");
    };
    let leaf = match &node.node_type {
        NodeType::Document | NodeType::DocumentFragment => {
            let kind = if matches!(node.node_type, NodeType::Document) {
                "document"
            } else {
                "documentFragment"
            };
            write!(out, r#"{{"type":"{kind}","children":["#)?;
            steps.push(Step::Raw("]}"));
            push_children(steps, document, id);
            return Ok(());
        }
        NodeType::Element(element) => {
            return write_element(document, id, element, out, steps);
        }
        NodeType::DocumentType(doctype) => Leaf::Doctype {
            name: &doctype.name,
            public_id: &doctype.public_id,
            system_id: &doctype.system_id,
        },
        NodeType::Text(data) => Leaf::Text { content: data },
        NodeType::Comment(data) => Leaf::Comment { content: data },
        NodeType::ProcessingInstruction { target, data } => {
            Leaf::ProcessingInstruction { target, data }
        }
    };
    serde_json::to_writer(&mut *out, &leaf)?;
    Ok(())
}

fn write_element<W: Write>(
    document: &Document,
    id: NodeId,
    element: &ElementData,
    out: &mut W,
    steps: &mut Vec<Step>,
) -> io::Result<()> {
    let tag_name = document
        .tag_name(id)
        .map_or_else(String::new, |n| n.to_string());
    let namespace = match element.namespace {
        Namespace::None => String::new(),
        ns => ns.to_string(),
    };

    out.write_all(br#"{"type":"element","tagName":"#)?;
    serde_json::to_writer(&mut *out, &tag_name)?;
    out.write_all(br#","namespace":"#)?;
    serde_json::to_writer(&mut *out, &namespace)?;
    out.write_all(br#","attributes":"#)?;
    serde_json::to_writer(&mut *out, &attributes(document, element))?;
    out.write_all(br#","children":["#)?;

    steps.push(Step::Raw("}"));
    if let Some(content) = element.template_content {
        steps.push(Step::Raw("]"));
        push_children(steps, document, content);
        steps.push(Step::Raw(r#","content":["#));
    }
    steps.push(Step::Raw("]"));
    push_children(steps, document, id);
    Ok(())
}

fn attributes(document: &Document, element: &ElementData) -> BTreeMap<String, String> {
    let interner = document.interner();
    let interner = interner.borrow();
    element
        .attrs()
        .iter()
        .map(|attr| {
            let name = attr.qualified_name.clone().unwrap_or_else(|| {
                interner
                    .attr_name(attr.local_name)
                    .map_or_else(String::new, |n| n.to_string())
            });
            (name, attr.value.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::Value;
    use thicket_html::HTMLParser;

    use super::*;

    fn to_value(output: &ParseOutput) -> Value {
        let mut bytes = Vec::new();
        write_json(output, &mut bytes).unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn element_with_attributes() {
        let output = HTMLParser::new()
            .parse(b"<!DOCTYPE html><p id=x>hi")
            .unwrap();
        let value = to_value(&output);
        assert_eq!(value["type"], "document");
        assert_eq!(value["children"][0]["type"], "doctype");
        let body = &value["children"][1]["children"][1];
        assert_eq!(body["tagName"], "body");
        let p = &body["children"][0];
        assert_eq!(p["attributes"]["id"], "x");
        assert_eq!(p["children"][0]["content"], "hi");
        assert!(p.get("content").is_none());
    }

    #[test]
    fn template_content_follows_children() {
        let output = HTMLParser::new()
            .parse(b"<!DOCTYPE html><template><b>x</b></template>")
            .unwrap();
        let value = to_value(&output);
        let template = &value["children"][1]["children"][0]["children"][0];
        assert_eq!(template["tagName"], "template");
        assert_eq!(template["children"], Value::Array(Vec::new()));
        assert_eq!(template["content"][0]["tagName"], "b");
        assert_eq!(template["content"][0]["children"][0]["content"], "x");
    }

    #[test]
    fn fragment_is_wrapped() {
        let output = HTMLParser::new()
            .parse_fragment(b"<b>x</b>y", "div", Namespace::Html)
            .unwrap();
        let value = to_value(&output);
        assert_eq!(value["type"], "documentFragment");
        assert_eq!(value["children"][0]["tagName"], "b");
        assert_eq!(value["children"][1]["content"], "y");
    }

    #[test]
    fn deep_nesting() {
        let depth = 20_000;
        let html = "<div>".repeat(depth);
        let output = HTMLParser::new().parse(html.as_bytes()).unwrap();
        let mut bytes = Vec::new();
        write_json(&output, &mut bytes).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.matches(r#""tagName":"div""#).count(), depth);
        assert!(text.ends_with("]}]}]}]}\n"));
    }
}
