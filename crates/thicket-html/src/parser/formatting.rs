//! [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
//! and [§ 13.2.6.4.7 the adoption agency algorithm](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm).

use thicket_dom::{Attr, NodeId, TagId};

use super::core::{ActiveFormattingElement, TreeConstructor};
use crate::error::{ParserError, TreeErrorKind};
use crate::tag_category::TagCategory;
use crate::tokenizer::TagToken;

impl TreeConstructor {
    /// Position of `node` in the list of active formatting elements.
    pub(super) fn formatting_position(&self, node: NodeId) -> Option<usize> {
        self.active_formatting_elements
            .iter()
            .rposition(|entry| *entry == ActiveFormattingElement::Element(node))
    }

    fn is_open(&self, node: NodeId) -> bool {
        self.stack_of_open_elements.contains(&node)
    }

    /// Attributes compared by name, namespace and value, in a fixed order.
    fn attribute_key(&self, node: NodeId) -> Vec<(u32, String, String)> {
        let mut key: Vec<_> = self
            .element(node)
            .map(|e| e.attrs())
            .unwrap_or_default()
            .iter()
            .map(|a: &Attr| (a.local_name.0, a.namespace.to_string(), a.value.clone()))
            .collect();
        key.sort();
        key
    }

    /// [§ 13.2.4.3 Push onto the list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#push-onto-the-list-of-active-formatting-elements)
    ///
    /// "If there are already three elements in the list of active formatting
    /// elements after the last marker, if any, or anywhere in the list if
    /// there are no markers, that have the same tag name, namespace, and
    /// attributes as element, then remove the earliest such element from the
    /// list of active formatting elements." (the Noah's Ark clause)
    pub(super) fn push_active_formatting_element(&mut self, node: NodeId) {
        let identity = self.identity(node);
        let key = self.attribute_key(node);
        let mut matches = Vec::new();
        for (index, entry) in self.active_formatting_elements.iter().enumerate().rev() {
            match *entry {
                ActiveFormattingElement::Marker => break,
                ActiveFormattingElement::Element(other) => {
                    if self.identity(other) == identity && self.attribute_key(other) == key {
                        matches.push(index);
                    }
                }
            }
        }
        if matches.len() >= 3
            && let Some(&earliest) = matches.last()
        {
            let _ = self.active_formatting_elements.remove(earliest);
        }
        self.active_formatting_elements
            .push(ActiveFormattingElement::Element(node));
    }

    /// Push a marker.
    pub(super) fn insert_marker(&mut self) {
        self.active_formatting_elements
            .push(ActiveFormattingElement::Marker);
    }

    /// [§ 13.2.4.3 Clear the list of active formatting elements up to the last marker](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-list-of-active-formatting-elements-up-to-the-last-marker)
    pub(super) fn clear_active_formatting_elements_to_last_marker(&mut self) {
        while let Some(entry) = self.active_formatting_elements.pop() {
            if entry == ActiveFormattingElement::Marker {
                break;
            }
        }
    }

    /// [§ 13.2.4.3 Reconstruct the active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#reconstruct-the-active-formatting-elements)
    pub(super) fn reconstruct_active_formatting_elements(&mut self) -> Result<(), ParserError> {
        let entries = &self.active_formatting_elements;
        // "If there are no entries in the list of active formatting elements,
        // then there is nothing to reconstruct; stop this algorithm."
        // "If the last (most recently added) entry in the list of active
        // formatting elements is a marker, or if it is an element that is in
        // the stack of open elements, then there is nothing to reconstruct"
        match entries.last() {
            None | Some(ActiveFormattingElement::Marker) => return Ok(()),
            Some(&ActiveFormattingElement::Element(node)) if self.is_open(node) => return Ok(()),
            Some(_) => {}
        }

        // "Rewind: If there are no entries before entry in the list of active
        // formatting elements, then jump to the step labeled create. Let entry
        // be the entry one earlier than entry in the list of active formatting
        // elements. If entry is neither a marker nor an element that is also
        // in the stack of open elements, go to the step labeled rewind."
        let mut index = entries.len() - 1;
        while index > 0 {
            let open = match entries[index - 1] {
                ActiveFormattingElement::Marker => true,
                ActiveFormattingElement::Element(node) => self.is_open(node),
            };
            if open {
                break;
            }
            index -= 1;
        }

        // "Create: Insert an HTML element for the token for which the element
        // entry was created, to obtain new element. Replace the entry for entry
        // in the list with an entry for new element. If the entry for new
        // element in the list of active formatting elements is not the last
        // entry in the list, return to the step labeled advance."
        for position in index..self.active_formatting_elements.len() {
            let ActiveFormattingElement::Element(node) = self.active_formatting_elements[position] else {
                continue;
            };
            let token = self.token_for(node);
            let new = self.insert_html_element(&token)?;
            self.active_formatting_elements[position] = ActiveFormattingElement::Element(new);
        }
        Ok(())
    }

    /// A synthetic start tag standing for `node`'s tag and attributes.
    fn token_for(&self, node: NodeId) -> TagToken {
        let name = self.identity(node).map_or(TagId(u32::MAX), |(tag, _)| tag);
        TagToken {
            base: Some(node),
            ..TagToken::new(name)
        }
    }

    /// A detached copy of an HTML element, attributes included.
    fn clone_element(&mut self, node: NodeId) -> Result<NodeId, ParserError> {
        let token = self.token_for(node);
        self.create_element_for_token(&token, thicket_dom::Namespace::Html)
    }

    /// [§ 13.2.6.4.7 Adoption agency algorithm](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm)
    ///
    /// Returns `Ok(false)` when the caller must "act as described in the any
    /// other end tag entry".
    pub(super) fn run_adoption_agency(&mut self, subject: TagId) -> Result<bool, ParserError> {
        // "If the current node is an HTML element whose tag name is subject, and
        // the current node is not in the list of active formatting elements,
        // then pop the current node off the stack of open elements and return."
        if let Some(current) = self.current_node()
            && self
                .element(current)
                .is_some_and(|e| e.namespace == thicket_dom::Namespace::Html && e.tag == subject)
            && self.formatting_position(current).is_none()
        {
            let _ = self.stack_of_open_elements.pop();
            return Ok(true);
        }

        // "Let outer loop counter be 0. Outer loop: If outer loop counter is
        // greater than or equal to 8, then return."
        for _ in 0..8 {
            // "Let formatting element be the last element in the list of active
            // formatting elements that: is between the end of the list and the
            // last marker in the list, if any, or the start of the list
            // otherwise, and has the tag name subject."
            let mut found = None;
            for (index, entry) in self.active_formatting_elements.iter().enumerate().rev() {
                match *entry {
                    ActiveFormattingElement::Marker => break,
                    ActiveFormattingElement::Element(node) => {
                        if self.identity(node).is_some_and(|(tag, _)| tag == subject) {
                            found = Some((index, node));
                            break;
                        }
                    }
                }
            }
            // "If there is no such element, then return and instead act as
            // described in the "any other end tag" entry above."
            let Some((formatting_index, formatting_element)) = found else {
                return Ok(false);
            };

            // "If formatting element is not in the stack of open elements, then
            // this is a parse error; remove the element from the list, and
            // return."
            let Some(stack_index) = self
                .stack_of_open_elements
                .iter()
                .position(|&id| id == formatting_element)
            else {
                self.parse_error_here(TreeErrorKind::MisnestedFormatting);
                let _ = self.active_formatting_elements.remove(formatting_index);
                return Ok(true);
            };

            // "If formatting element is in the stack of open elements, but the
            // element is not in scope, then this is a parse error; return."
            if !self.element_in_scope_by_node(formatting_element, TagCategory::SCOPE) {
                self.parse_error_here(TreeErrorKind::MisnestedFormatting);
                return Ok(true);
            }

            // "If formatting element is not the current node, this is a parse
            // error. (But do not return.)"
            if self.current_node() != Some(formatting_element) {
                self.parse_error_here(TreeErrorKind::MisnestedFormatting);
            }

            // "Let furthest block be the topmost node in the stack of open
            // elements that is lower in the stack than formatting element, and
            // is an element in the special category."
            let furthest = self.stack_of_open_elements[stack_index + 1..]
                .iter()
                .position(|&id| self.category_of(id).contains(TagCategory::SPECIAL))
                .map(|offset| stack_index + 1 + offset);

            // "If there is no furthest block, then the UA must first pop all the
            // nodes from the bottom of the stack of open elements, from the
            // current node up to and including formatting element, then remove
            // formatting element from the list of active formatting elements,
            // and finally return."
            let Some(furthest_index) = furthest else {
                self.stack_of_open_elements.truncate(stack_index);
                let _ = self.active_formatting_elements.remove(formatting_index);
                return Ok(true);
            };
            let furthest_block = self.stack_of_open_elements[furthest_index];

            // "Let common ancestor be the element immediately above formatting
            // element in the stack of open elements."
            let common_ancestor = stack_index
                .checked_sub(1)
                .map_or(NodeId::ROOT, |index| self.stack_of_open_elements[index]);

            // "Let a bookmark note the position of formatting element in the list
            // of active formatting elements relative to the elements on either
            // side of it in the list."
            let mut bookmark = formatting_index;

            // "Let node and last node be furthest block."
            let mut node_index = furthest_index;
            let mut last_node = furthest_block;
            let mut inner_loop_counter = 0;

            loop {
                inner_loop_counter += 1;
                // "Let node be the element immediately above node in the stack of
                // open elements, or if node is no longer in the stack of open
                // elements (e.g. because it got removed by this algorithm), the
                // element that was immediately above node in the stack of open
                // elements before node was removed."
                node_index -= 1;
                let node = self.stack_of_open_elements[node_index];

                // "If node is formatting element, then break."
                if node == formatting_element {
                    break;
                }

                // "If inner loop counter is greater than 3 and node is in the list
                // of active formatting elements, then remove node from the list of
                // active formatting elements."
                let mut node_position = self.formatting_position(node);
                if inner_loop_counter > 3
                    && let Some(position) = node_position
                {
                    let _ = self.active_formatting_elements.remove(position);
                    if position < bookmark {
                        bookmark -= 1;
                    }
                    node_position = None;
                }

                // "If node is not in the list of active formatting elements, then
                // remove node from the stack of open elements and continue."
                let Some(position) = node_position else {
                    let _ = self.stack_of_open_elements.remove(node_index);
                    continue;
                };

                // "Create an element for the token for which the element node was
                // created, in the HTML namespace, with common ancestor as the
                // intended parent; replace the entry for node in the list of
                // active formatting elements with an entry for the new element,
                // replace the entry for node in the stack of open elements with an
                // entry for the new element, and let node be the new element."
                let new = self.clone_element(node)?;
                self.active_formatting_elements[position] = ActiveFormattingElement::Element(new);
                self.stack_of_open_elements[node_index] = new;

                // "If last node is furthest block, then move the aforementioned
                // bookmark to be immediately after the new node in the list of
                // active formatting elements."
                if last_node == furthest_block {
                    bookmark = position + 1;
                }

                // "Append last node to node."
                self.document.insert_as_last_child(new, last_node);
                // "Set last node to node."
                last_node = new;
            }

            // "Insert whatever last node ended up being in the appropriate place
            // for inserting a node, but using common ancestor as the override
            // target."
            self.document.remove(last_node);
            let location = self.appropriate_insertion_location(Some(common_ancestor));
            self.insert_at(location, last_node);

            // "Create an element for the token for which formatting element was
            // created, in the HTML namespace, with furthest block as the intended
            // parent."
            let new = self.clone_element(formatting_element)?;

            // "Take all of the child nodes of furthest block and append them to
            // the element created in the last step. Append that new element to
            // furthest block."
            self.document.replace_all_children(furthest_block, new);

            // "Remove formatting element from the list of active formatting
            // elements, and insert the new element into the list of active
            // formatting elements at the position of the aforementioned
            // bookmark."
            if let Some(position) = self.formatting_position(formatting_element) {
                let _ = self.active_formatting_elements.remove(position);
                if position < bookmark {
                    bookmark -= 1;
                }
            }
            let bookmark = bookmark.min(self.active_formatting_elements.len());
            self.active_formatting_elements
                .insert(bookmark, ActiveFormattingElement::Element(new));

            // "Remove formatting element from the stack of open elements, and
            // insert the new element into the stack of open elements immediately
            // below the position of furthest block in that stack."
            self.remove_from_stack(formatting_element);
            let below = self
                .stack_of_open_elements
                .iter()
                .position(|&id| id == furthest_block)
                .map_or(self.stack_of_open_elements.len(), |index| index + 1);
            self.stack_of_open_elements.insert(below, new);
        }
        Ok(true)
    }
}
