//! [§ 13.2.6.1 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)

use thicket_dom::{Attr, DoctypeData, Namespace, NodeId, NodeType, Tag};

use super::core::TreeConstructor;
use super::foreign_content::{adjust_mathml_attributes, adjust_svg_attributes, foreign_attrs};
use crate::error::ParserError;
use crate::tokenizer::{Doctype, TagToken, TokenizerState};

/// Elements whose presence as insertion target triggers foster parenting.
const FOSTER_TARGETS: &[Tag] = &[Tag::Table, Tag::Tbody, Tag::Tfoot, Tag::Thead, Tag::Tr];

impl TreeConstructor {
    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    ///
    /// "The appropriate place for inserting a node, optionally using a
    /// particular override target". Returns the parent and the child to
    /// insert before (`None` to append).
    pub(super) fn appropriate_insertion_location(
        &self,
        override_target: Option<NodeId>,
    ) -> (NodeId, Option<NodeId>) {
        // "If there was an override target specified, then let target be the
        // override target. Otherwise, let target be the current node."
        let target = override_target
            .or_else(|| self.current_node())
            .unwrap_or(NodeId::ROOT);

        // "If foster parenting is enabled and target is a table, tbody, tfoot,
        // thead, or tr element"
        let (parent, before) = if self.foster_parenting && self.is_html_one_of(target, FOSTER_TARGETS) {
            self.foster_parent_location()
        } else {
            // "Otherwise: Let adjusted insertion location be inside target,
            // after its last child (if any)."
            (target, None)
        };

        // "If the adjusted insertion location is inside a template element, let
        // it instead be inside the template element's template contents, after
        // its last child (if any)."
        if self.is_html(parent, Tag::Template)
            && let Some(content) = self.document.template_content(parent)
        {
            return (content, None);
        }
        (parent, before)
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    fn foster_parent_location(&self) -> (NodeId, Option<NodeId>) {
        let stack = &self.stack_of_open_elements;
        // "Let last template be the last template element in the stack of open
        // elements, if any."
        let last_template = stack.iter().rposition(|&id| self.is_html(id, Tag::Template));
        // "Let last table be the last table element in the stack of open
        // elements, if any."
        let last_table = stack.iter().rposition(|&id| self.is_html(id, Tag::Table));

        // "If there is a last template and either there is no last table, or
        // there is one, but last template is lower (more recently added) than
        // last table in the stack of open elements, then: let adjusted
        // insertion location be inside last template's template contents"
        if let Some(template) = last_template
            && last_table.is_none_or(|table| template > table)
        {
            let template = stack[template];
            let content = self.document.template_content(template).unwrap_or(template);
            return (content, None);
        }

        // "If there is no last table, then let adjusted insertion location be
        // inside the first element in the stack of open elements (the html
        // element), after its last child (if any)"
        let Some(table_index) = last_table else {
            return (stack.first().copied().unwrap_or(NodeId::ROOT), None);
        };
        let table = stack[table_index];

        // "If last table has a parent node, then let adjusted insertion
        // location be inside last table's parent node, immediately before last
        // table"
        if let Some(parent) = self.document.parent(table) {
            return (parent, Some(table));
        }

        // "Let previous element be the element immediately above last table in
        // the stack of open elements."
        let previous = table_index
            .checked_sub(1)
            .map_or(NodeId::ROOT, |index| stack[index]);
        (previous, None)
    }

    /// Link `node` at a location from [`Self::appropriate_insertion_location`].
    pub(super) fn insert_at(&mut self, (parent, before): (NodeId, Option<NodeId>), node: NodeId) {
        match before {
            Some(reference) => self.document.insert_before(reference, node),
            None => self.document.insert_as_last_child(parent, node),
        }
    }

    /// The attribute list for an element created for `tag` in `namespace`.
    fn attrs_for_token(&self, tag: &TagToken, namespace: Namespace) -> Vec<Attr> {
        // Synthetic tokens stand for an existing element.
        if let Some(base) = tag.base {
            return self
                .element(base)
                .map(|e| e.attrs().to_vec())
                .unwrap_or_default();
        }
        if namespace == Namespace::Html {
            return tag
                .attributes
                .iter()
                .map(|a| Attr::new(a.name, a.value.clone()))
                .collect();
        }
        let mut attributes = tag.attributes.clone();
        let mut interner = self.interner.borrow_mut();
        match namespace {
            // "adjust MathML attributes for the token"
            Namespace::MathMl => adjust_mathml_attributes(&mut attributes, &mut interner),
            // "adjust SVG attributes for the token"
            Namespace::Svg => adjust_svg_attributes(&mut attributes, &mut interner),
            _ => {}
        }
        // "Adjust foreign attributes for the token."
        foreign_attrs(&attributes, &mut interner)
    }

    /// [§ 13.2.6.1 Create an element for a token](https://html.spec.whatwg.org/multipage/parsing.html#create-an-element-for-the-token)
    pub(super) fn create_element_for_token(
        &mut self,
        tag: &TagToken,
        namespace: Namespace,
    ) -> Result<NodeId, ParserError> {
        let attrs = self.attrs_for_token(tag, namespace);
        Ok(self.document.create_element(tag.name, namespace, attrs)?)
    }

    /// [§ 13.2.6.1 Insert a foreign element](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-foreign-element)
    ///
    /// "Let adjusted insertion location be the appropriate place for
    /// inserting a node. Let element be the result of creating an element for
    /// the token in the given namespace... If it is possible to insert element
    /// at the adjusted insertion location, then insert... Push element onto
    /// the stack of open elements so that it is the new current node."
    pub(super) fn insert_foreign_element(
        &mut self,
        tag: &TagToken,
        namespace: Namespace,
    ) -> Result<NodeId, ParserError> {
        let location = self.appropriate_insertion_location(None);
        let element = self.create_element_for_token(tag, namespace)?;
        let document_has_element =
            location.0 == NodeId::ROOT && self.document.document_element().is_some();
        if !document_has_element {
            self.insert_at(location, element);
        }
        self.stack_of_open_elements.push(element);
        Ok(element)
    }

    /// [§ 13.2.6.1 Insert an HTML element](https://html.spec.whatwg.org/multipage/parsing.html#insert-an-html-element)
    pub(super) fn insert_html_element(&mut self, tag: &TagToken) -> Result<NodeId, ParserError> {
        self.insert_foreign_element(tag, Namespace::Html)
    }

    /// Insert an HTML element for a start tag the parser made up.
    pub(super) fn insert_synthetic_element(&mut self, tag: Tag) -> Result<NodeId, ParserError> {
        self.insert_html_element(&TagToken::new(tag.id()))
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    ///
    /// "If there is a Text node immediately before the adjusted insertion
    /// location, then append data to that Text node's data. Otherwise, create
    /// a new Text node whose data is data".
    pub(super) fn insert_character(&mut self, data: &str) -> Result<(), ParserError> {
        if data.is_empty() {
            return Ok(());
        }
        let location @ (parent, before) = self.appropriate_insertion_location(None);

        // "If the adjusted insertion location's parent is a Document node,
        // then return."
        if self
            .document
            .get(parent)
            .is_none_or(|node| matches!(node.node_type, NodeType::Document))
        {
            return Ok(());
        }

        let adjacent = match before {
            Some(reference) => self.document.prev_sibling(reference),
            None => self.document.last_child(parent),
        };
        if let Some(text) = adjacent.filter(|&id| self.document.text(id).is_some()) {
            self.document.append_text(text, data);
            return Ok(());
        }
        let text = self.document.create_text(data.to_string())?;
        self.insert_at(location, text);
        Ok(())
    }

    /// [§ 13.2.6.1 Insert a comment](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    ///
    /// "If position was specified, then let the adjusted insertion location
    /// be position. Otherwise, let adjusted insertion location be the
    /// appropriate place for inserting a node."
    pub(super) fn insert_comment(&mut self, data: &str, parent: Option<NodeId>) -> Result<(), ParserError> {
        let location = parent.map_or_else(|| self.appropriate_insertion_location(None), |p| (p, None));
        let comment = self.document.create_comment(data.to_string())?;
        self.insert_at(location, comment);
        Ok(())
    }

    /// Append a DOCTYPE node to the document.
    pub(super) fn insert_doctype(&mut self, doctype: &Doctype) -> Result<(), ParserError> {
        // "Append a DocumentType node to the Document node, with its name set
        // to the name given in the DOCTYPE token, or the empty string if the
        // name was missing"
        let node = self.document.create_doctype(DoctypeData {
            name: doctype.name.clone().unwrap_or_default(),
            public_id: doctype.public_identifier.clone().unwrap_or_default(),
            system_id: doctype.system_identifier.clone().unwrap_or_default(),
        })?;
        self.document.insert_as_last_child(NodeId::ROOT, node);
        Ok(())
    }

    /// [§ 13.2.6.2 Parsing elements that contain only text](https://html.spec.whatwg.org/multipage/parsing.html#parsing-elements-that-contain-only-text)
    ///
    /// "The generic raw text element parsing algorithm and the generic RCDATA
    /// element parsing algorithm consist of the following steps."
    pub(super) fn parse_text_element(
        &mut self,
        tag: &TagToken,
        state: TokenizerState,
    ) -> Result<(), ParserError> {
        let _ = self.insert_html_element(tag)?;
        // "switch the tokenizer to the RAWTEXT state" / "to the RCDATA state"
        self.next_tokenizer_state = Some(state);
        // "Let the original insertion mode be the current insertion mode."
        self.original_insertion_mode = Some(self.insertion_mode);
        // "Then, switch the insertion mode to "text"."
        self.insertion_mode = super::core::InsertionMode::Text;
        Ok(())
    }
}
