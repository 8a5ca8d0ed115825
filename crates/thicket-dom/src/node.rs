//! Node records stored in the [`Document`](crate::Document) arena.

use crate::interner::{AttrId, Namespace, PrefixId, Tag, TagId};

/// A type-safe index into the document arena.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
/// "Each node has an associated node document..."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Node is an abstract interface that is used by all nodes in a tree."
///
/// Links are arena indices. The sibling chain of a parent always runs from
/// its `first_child` to its `last_child`.
#[derive(Debug, Clone)]
pub struct Node {
    /// "Each node has an associated node type"
    pub node_type: NodeType,
    /// The document that owns this node's slot.
    pub owner_document: NodeId,
    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-parent)
    pub parent: Option<NodeId>,
    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-first-child)
    pub first_child: Option<NodeId>,
    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-last-child)
    pub last_child: Option<NodeId>,
    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-previous-sibling)
    pub prev_sibling: Option<NodeId>,
    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-next-sibling)
    pub next_sibling: Option<NodeId>,
}

impl Node {
    pub(crate) const fn detached(node_type: NodeType, owner_document: NodeId) -> Self {
        Self {
            node_type,
            owner_document,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
        }
    }

    /// Element data, if this node is an element.
    #[must_use]
    pub const fn as_element(&self) -> Option<&ElementData> {
        match &self.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Text data, if this node is a text node.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match &self.node_type {
            NodeType::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// "Each node has an associated node type"
#[derive(Debug, Clone)]
pub enum NodeType {
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    Document,
    /// [§ 4.6 Interface DocumentType](https://dom.spec.whatwg.org/#interface-documenttype)
    DocumentType(DoctypeData),
    /// [§ 4.7 Interface DocumentFragment](https://dom.spec.whatwg.org/#interface-documentfragment)
    DocumentFragment,
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    Element(ElementData),
    /// [§ 4.11 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    Text(String),
    /// [§ 4.14 Interface Comment](https://dom.spec.whatwg.org/#interface-comment)
    Comment(String),
    /// [§ 4.13 Interface ProcessingInstruction](https://dom.spec.whatwg.org/#interface-processinginstruction)
    ProcessingInstruction {
        /// The PI target.
        target: String,
        /// The PI data.
        data: String,
    },
}

/// "Doctypes have an associated name, public ID, and system ID."
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctypeData {
    /// The doctype name (empty when missing).
    pub name: String,
    /// The public identifier (empty when missing).
    pub public_id: String,
    /// The system identifier (empty when missing).
    pub system_id: String,
}

/// [§ 4.9.2 Interface Attr](https://dom.spec.whatwg.org/#interface-attr)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    /// Interned local name.
    pub local_name: AttrId,
    /// Qualified name for prefixed foreign attributes (`xlink:href`).
    pub qualified_name: Option<String>,
    /// Attribute namespace, [`Namespace::None`] for ordinary attributes.
    pub namespace: Namespace,
    /// Namespace prefix, if any.
    pub prefix: Option<PrefixId>,
    /// Attribute value.
    pub value: String,
    /// The element this attribute is attached to.
    pub owner: Option<NodeId>,
}

impl Attr {
    /// An unprefixed, un-namespaced attribute.
    #[must_use]
    pub const fn new(local_name: AttrId, value: String) -> Self {
        Self {
            local_name,
            qualified_name: None,
            namespace: Namespace::None,
            prefix: None,
            value,
            owner: None,
        }
    }
}

/// Element-specific data.
///
/// "Elements have an associated namespace, namespace prefix, local name..."
/// plus an ordered attribute list. Positions of `id` and `class` are cached.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Interned local name.
    pub tag: TagId,
    /// Element namespace.
    pub namespace: Namespace,
    /// Namespace prefix, if any.
    pub prefix: Option<PrefixId>,
    attrs: Vec<Attr>,
    id_index: Option<usize>,
    class_index: Option<usize>,
    /// [§ 4.12.3](https://html.spec.whatwg.org/multipage/scripting.html#template-contents)
    /// "Each template element has an associated DocumentFragment object that
    /// is its template contents."
    pub template_content: Option<NodeId>,
}

impl ElementData {
    /// A new element with no attributes.
    #[must_use]
    pub const fn new(tag: TagId, namespace: Namespace) -> Self {
        Self {
            tag,
            namespace,
            prefix: None,
            attrs: Vec::new(),
            id_index: None,
            class_index: None,
            template_content: None,
        }
    }

    /// Whether this is the HTML element `tag`.
    #[must_use]
    pub fn is_html(&self, tag: Tag) -> bool {
        self.namespace == Namespace::Html && self.tag == tag
    }

    /// Whether this element has `tag` in namespace `ns`.
    #[must_use]
    pub fn is(&self, tag: Tag, ns: Namespace) -> bool {
        self.namespace == ns && self.tag == tag
    }

    /// Attributes in insertion order.
    #[must_use]
    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    /// Append an attribute, updating the `id`/`class` cache.
    pub fn append_attr(&mut self, attr: Attr) {
        if attr.namespace == Namespace::None {
            if attr.local_name == AttrId::ID && self.id_index.is_none() {
                self.id_index = Some(self.attrs.len());
            } else if attr.local_name == AttrId::CLASS && self.class_index.is_none() {
                self.class_index = Some(self.attrs.len());
            }
        }
        self.attrs.push(attr);
    }

    /// The first attribute with this local name.
    #[must_use]
    pub fn attr(&self, name: AttrId) -> Option<&Attr> {
        self.attrs.iter().find(|a| a.local_name == name)
    }

    /// The value of the first attribute with this local name.
    #[must_use]
    pub fn attr_value(&self, name: AttrId) -> Option<&str> {
        self.attr(name).map(|a| a.value.as_str())
    }

    /// Whether an attribute with this local name exists.
    #[must_use]
    pub fn has_attr(&self, name: AttrId) -> bool {
        self.attr(name).is_some()
    }

    /// The element's `id` attribute value, via the cached position.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id_index.map(|i| self.attrs[i].value.as_str())
    }

    /// The element's `class` attribute value, via the cached position.
    #[must_use]
    pub fn class(&self) -> Option<&str> {
        self.class_index.map(|i| self.attrs[i].value.as_str())
    }

    /// Space-separated class names.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.class().into_iter().flat_map(str::split_ascii_whitespace)
    }
}
