//! The arena document: node storage, allocation and tree mutation.

use std::rc::Rc;

use thiserror::Error;

use crate::interner::{Interner, Namespace, SharedInterner, Tag, TagId};
use crate::node::{Attr, DoctypeData, ElementData, Node, NodeId, NodeType};

/// Allocation failures. The parser treats these as fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The configured node budget is used up.
    #[error("node limit of {limit} reached")]
    NodeLimitExceeded {
        /// The configured budget.
        limit: usize,
    },
    /// The arena could not grow.
    #[error("arena allocation failed")]
    OutOfMemory,
}

/// [§ 3.2.1 Document quirks mode](https://dom.spec.whatwg.org/#concept-document-mode)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompatMode {
    /// "no-quirks"
    #[default]
    NoQuirks,
    /// "limited-quirks"
    LimitedQuirks,
    /// "quirks"
    Quirks,
}

/// Arena-backed document tree.
///
/// [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
///
/// All nodes live in one vector and refer to each other by [`NodeId`].
/// Destroyed nodes leave an empty slot which the next allocation reuses.
/// The document node is always at [`NodeId::ROOT`].
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Option<Node>>,
    free: Vec<NodeId>,
    live: usize,
    node_limit: Option<usize>,
    interner: SharedInterner,
    /// Quirks mode decided by the DOCTYPE.
    pub compat_mode: CompatMode,
    /// Whether scripting is considered enabled for this document.
    pub scripting: bool,
}

impl Document {
    /// An empty document with a fresh interner.
    #[must_use]
    pub fn new() -> Self {
        Self::with_interner(Interner::shared())
    }

    /// An empty document sharing an existing interner.
    #[must_use]
    pub fn with_interner(interner: SharedInterner) -> Self {
        Self {
            nodes: vec![Some(Node::detached(NodeType::Document, NodeId::ROOT))],
            free: Vec::new(),
            live: 1,
            node_limit: None,
            interner,
            compat_mode: CompatMode::NoQuirks,
            scripting: false,
        }
    }

    /// Cap the number of live nodes. Allocation past the cap fails with
    /// [`DomError::NodeLimitExceeded`].
    #[must_use]
    pub const fn with_node_limit(mut self, limit: Option<usize>) -> Self {
        self.node_limit = limit;
        self
    }

    /// A new handle to the shared interner.
    #[must_use]
    pub fn interner(&self) -> SharedInterner {
        Rc::clone(&self.interner)
    }

    /// The document node.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Number of live nodes, the document included.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.live
    }

    /// A document always holds at least its own node.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Get a node by id, `None` for destroyed or out-of-range ids.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    /// Mutable access to a node.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Whether `id` names a live node.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    // Only called with live ids: the public mutators check theirs, and the
    // links of a live node only ever name live nodes.
    fn node(&self, id: NodeId) -> &Node {
        match self.get(id) {
            Some(node) => node,
            None => panic!("stale node id {id:?}"),
        }
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        match self.get_mut(id) {
            Some(node) => node,
            None => panic!("stale node id {id:?}"),
        }
    }

    // ---- allocation ----------------------------------------------------

    /// Allocate a detached node.
    pub fn create_node(&mut self, node_type: NodeType) -> Result<NodeId, DomError> {
        if let Some(limit) = self.node_limit
            && self.live >= limit
        {
            return Err(DomError::NodeLimitExceeded { limit });
        }
        let node = Node::detached(node_type, NodeId::ROOT);
        self.live += 1;
        if let Some(id) = self.free.pop() {
            self.nodes[id.0] = Some(node);
            return Ok(id);
        }
        if self.nodes.try_reserve(1).is_err() {
            self.live -= 1;
            return Err(DomError::OutOfMemory);
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(node));
        Ok(id)
    }

    /// Allocate an element. `template` elements in the HTML namespace also
    /// get their content fragment.
    pub fn create_element(
        &mut self,
        tag: TagId,
        namespace: Namespace,
        attrs: Vec<Attr>,
    ) -> Result<NodeId, DomError> {
        let id = self.create_node(NodeType::Element(ElementData::new(tag, namespace)))?;
        if let NodeType::Element(data) = &mut self.node_mut(id).node_type {
            for mut attr in attrs {
                attr.owner = Some(id);
                data.append_attr(attr);
            }
        }
        if namespace == Namespace::Html && tag == Tag::Template {
            let content = self.create_fragment()?;
            if let NodeType::Element(data) = &mut self.node_mut(id).node_type {
                data.template_content = Some(content);
            }
        }
        Ok(id)
    }

    /// Allocate a text node.
    pub fn create_text(&mut self, data: String) -> Result<NodeId, DomError> {
        self.create_node(NodeType::Text(data))
    }

    /// Allocate a comment node.
    pub fn create_comment(&mut self, data: String) -> Result<NodeId, DomError> {
        self.create_node(NodeType::Comment(data))
    }

    /// Allocate a document type node.
    pub fn create_doctype(&mut self, doctype: DoctypeData) -> Result<NodeId, DomError> {
        self.create_node(NodeType::DocumentType(doctype))
    }

    /// Allocate a document fragment.
    pub fn create_fragment(&mut self) -> Result<NodeId, DomError> {
        self.create_node(NodeType::DocumentFragment)
    }

    /// Free a single node. The node is detached first; its children, if
    /// any, are detached and left alive.
    pub fn destroy_node(&mut self, id: NodeId) {
        if id == NodeId::ROOT || self.get(id).is_none() {
            return;
        }
        self.remove(id);
        while let Some(child) = self.node(id).first_child {
            self.remove(child);
        }
        self.release(id);
    }

    /// Free a node and everything below it, template contents included.
    ///
    /// Walks the subtree through the sibling links without recursion, so
    /// arbitrarily deep trees are fine.
    pub fn destroy_subtree(&mut self, id: NodeId) {
        if id == NodeId::ROOT || self.get(id).is_none() {
            return;
        }
        self.remove(id);
        let mut pending = vec![id];
        while let Some(top) = pending.pop() {
            let mut current = top;
            loop {
                if let Some(child) = self.node(current).first_child {
                    current = child;
                    continue;
                }
                let parent = self.node(current).parent;
                self.remove(current);
                if let Some(content) = self.template_content(current) {
                    pending.push(content);
                }
                self.release(current);
                match parent {
                    Some(parent) if current != top => current = parent,
                    _ => break,
                }
            }
        }
    }

    fn release(&mut self, id: NodeId) {
        if self.nodes[id.0].take().is_some() {
            self.live -= 1;
            self.free.push(id);
        }
    }

    // ---- mutation ------------------------------------------------------

    /// [§ 4.2.3 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// Detaches `child` if needed, then links it after `parent`'s last child.
    /// A no-op if either id is stale.
    pub fn insert_as_last_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.contains(parent) || !self.contains(child) {
            return;
        }
        self.remove(child);
        let last = self.node(parent).last_child;
        {
            let node = self.node_mut(child);
            node.parent = Some(parent);
            node.prev_sibling = last;
            node.next_sibling = None;
        }
        match last {
            Some(last) => self.node_mut(last).next_sibling = Some(child),
            None => self.node_mut(parent).first_child = Some(child),
        }
        self.node_mut(parent).last_child = Some(child);
    }

    /// Link `node` immediately before `reference`, which must have a parent.
    /// A no-op if either id is stale.
    pub fn insert_before(&mut self, reference: NodeId, node: NodeId) {
        if !self.contains(reference) || !self.contains(node) {
            return;
        }
        self.remove(node);
        let Some(parent) = self.node(reference).parent else {
            return;
        };
        let prev = self.node(reference).prev_sibling;
        {
            let n = self.node_mut(node);
            n.parent = Some(parent);
            n.prev_sibling = prev;
            n.next_sibling = Some(reference);
        }
        self.node_mut(reference).prev_sibling = Some(node);
        match prev {
            Some(prev) => self.node_mut(prev).next_sibling = Some(node),
            None => self.node_mut(parent).first_child = Some(node),
        }
    }

    /// Link `node` immediately after `reference`, which must have a parent.
    /// A no-op if either id is stale.
    pub fn insert_after(&mut self, reference: NodeId, node: NodeId) {
        if !self.contains(reference) || !self.contains(node) {
            return;
        }
        self.remove(node);
        let Some(parent) = self.node(reference).parent else {
            return;
        };
        let next = self.node(reference).next_sibling;
        {
            let n = self.node_mut(node);
            n.parent = Some(parent);
            n.prev_sibling = Some(reference);
            n.next_sibling = next;
        }
        self.node_mut(reference).next_sibling = Some(node);
        match next {
            Some(next) => self.node_mut(next).prev_sibling = Some(node),
            None => self.node_mut(parent).last_child = Some(node),
        }
    }

    /// [§ 4.2.3 Remove](https://dom.spec.whatwg.org/#concept-node-remove)
    ///
    /// Unlink `node` from its parent. A no-op for detached nodes and stale
    /// ids.
    pub fn remove(&mut self, node: NodeId) {
        let Some(n) = self.get(node) else {
            return;
        };
        let (parent, prev, next) = (n.parent, n.prev_sibling, n.next_sibling);
        let Some(parent) = parent else {
            return;
        };
        match prev {
            Some(prev) => self.node_mut(prev).next_sibling = next,
            None => self.node_mut(parent).first_child = next,
        }
        match next {
            Some(next) => self.node_mut(next).prev_sibling = prev,
            None => self.node_mut(parent).last_child = prev,
        }
        let n = self.node_mut(node);
        n.parent = None;
        n.prev_sibling = None;
        n.next_sibling = None;
    }

    /// Move every child of `parent` under `node` (in order), then make
    /// `node` the only child of `parent`. A no-op if either id is stale.
    pub fn replace_all_children(&mut self, parent: NodeId, node: NodeId) {
        if !self.contains(parent) || !self.contains(node) {
            return;
        }
        self.remove(node);
        while let Some(child) = self.node(parent).first_child {
            self.insert_as_last_child(node, child);
        }
        self.insert_as_last_child(parent, node);
    }

    /// Append `data` to a text node. Ignored for other node types.
    pub fn append_text(&mut self, id: NodeId, data: &str) {
        if let Some(Node {
            node_type: NodeType::Text(text),
            ..
        }) = self.get_mut(id)
        {
            text.push_str(data);
        }
    }

    /// Add attributes to an element, skipping names it already has.
    pub fn merge_attrs(&mut self, id: NodeId, attrs: &[Attr]) {
        if let Some(Node {
            node_type: NodeType::Element(data),
            ..
        }) = self.get_mut(id)
        {
            for attr in attrs {
                if !data.has_attr(attr.local_name) {
                    let mut attr = attr.clone();
                    attr.owner = Some(id);
                    data.append_attr(attr);
                }
            }
        }
    }

    // ---- traversal -----------------------------------------------------

    /// Parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// First child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.first_child)
    }

    /// Last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.last_child)
    }

    /// Next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// Iterate over the children of a node in order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            doc: self,
            next: self.first_child(id),
        }
    }

    /// Iterate over ancestors, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            current: self.parent(id),
        }
    }

    /// Element data for an element node.
    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(Node::as_element)
    }

    /// Mutable element data for an element node.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match self.get_mut(id) {
            Some(Node {
                node_type: NodeType::Element(data),
                ..
            }) => Some(data),
            _ => None,
        }
    }

    /// Text of a text node.
    #[must_use]
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(Node::as_text)
    }

    /// Whether `id` is the HTML element `tag`.
    #[must_use]
    pub fn is_html(&self, id: NodeId, tag: Tag) -> bool {
        self.element(id).is_some_and(|e| e.is_html(tag))
    }

    /// Content fragment of a `template` element.
    #[must_use]
    pub fn template_content(&self, id: NodeId) -> Option<NodeId> {
        self.element(id).and_then(|e| e.template_content)
    }

    /// The tag name of an element, as interned.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> Option<Rc<str>> {
        let tag = self.element(id)?.tag;
        self.interner.borrow().tag_name(tag)
    }

    /// [§ 4.2.6 Descendant](https://dom.spec.whatwg.org/#concept-tree-descendant)
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// [§ 3.1.1 The document element](https://html.spec.whatwg.org/multipage/dom.html#the-html-element-2)
    ///
    /// "The document element of a document is the element whose parent is that
    /// document, if it exists; otherwise null."
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .find(|&id| self.element(id).is_some())
    }

    /// [§ 3.1.3 The body element](https://html.spec.whatwg.org/multipage/dom.html#the-body-element-2)
    ///
    /// "The body element of a document is the first of the html element's children
    /// that is either a body element or a frameset element, or null if there is
    /// no such element."
    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        let html = self.document_element()?;
        self.children(html)
            .find(|&id| self.is_html(id, Tag::Body) || self.is_html(id, Tag::Frameset))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the children of a node.
#[derive(Debug)]
pub struct Children<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.doc.next_sibling(id);
        Some(id)
    }
}

/// Iterator over the ancestors of a node.
#[derive(Debug)]
pub struct Ancestors<'a> {
    doc: &'a Document,
    current: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.doc.parent(id);
        Some(id)
    }
}
