//! [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
//! and the algorithms that walk it.

use thicket_dom::{Namespace, NodeId, Tag};

use super::core::{InsertionMode, TreeConstructor};
use crate::error::TreeErrorKind;
use crate::tag_category::{TagCategory, category};

/// [§ 13.2.6.3](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
const IMPLIED_END_TAGS: &[Tag] = &[
    Tag::Dd,
    Tag::Dt,
    Tag::Li,
    Tag::Optgroup,
    Tag::Option,
    Tag::P,
    Tag::Rb,
    Tag::Rp,
    Tag::Rt,
    Tag::Rtc,
];

/// [§ 13.2.6.3](https://html.spec.whatwg.org/multipage/parsing.html#generate-all-implied-end-tags-thoroughly)
const THOROUGH_IMPLIED_END_TAGS: &[Tag] = &[
    Tag::Caption,
    Tag::Colgroup,
    Tag::Dd,
    Tag::Dt,
    Tag::Li,
    Tag::Optgroup,
    Tag::Option,
    Tag::P,
    Tag::Rb,
    Tag::Rp,
    Tag::Rt,
    Tag::Rtc,
    Tag::Tbody,
    Tag::Td,
    Tag::Tfoot,
    Tag::Th,
    Tag::Thead,
    Tag::Tr,
];

pub(super) const HEADINGS: &[Tag] = &[Tag::H1, Tag::H2, Tag::H3, Tag::H4, Tag::H5, Tag::H6];
pub(super) const TABLE_SECTIONS: &[Tag] = &[Tag::Tbody, Tag::Thead, Tag::Tfoot];
pub(super) const CELLS: &[Tag] = &[Tag::Td, Tag::Th];

impl TreeConstructor {
    /// Categories of an open element.
    pub(super) fn category_of(&self, id: NodeId) -> TagCategory {
        self.identity(id)
            .map_or(TagCategory::ORDINARY, |(tag, ns)| category(tag, ns))
    }

    /// [§ 13.2.4.2 Has an element in the specific scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
    ///
    /// "1. Initialize node to be the current node (the bottommost node of the
    /// stack). 2. If node is the target node, terminate in a match state.
    /// 3. Otherwise, if node is one of the element types in list, terminate in
    /// a failure state. 4. Otherwise, set node to the previous entry in the
    /// stack of open elements and return to step 2."
    fn scope_search(&self, boundary: TagCategory, is_target: impl Fn(NodeId) -> bool) -> bool {
        for &node in self.stack_of_open_elements.iter().rev() {
            if is_target(node) {
                return true;
            }
            if self.category_of(node).contains(boundary) {
                return false;
            }
        }
        false
    }

    /// Whether an HTML element `tag` is in the scope bounded by `boundary`.
    pub(super) fn element_in_scope(&self, tag: Tag, boundary: TagCategory) -> bool {
        self.scope_search(boundary, |node| self.is_html(node, tag))
    }

    /// Whether an HTML element with any of `tags` is in scope.
    pub(super) fn any_element_in_scope(&self, tags: &[Tag], boundary: TagCategory) -> bool {
        self.scope_search(boundary, |node| self.is_html_one_of(node, tags))
    }

    /// Whether the node itself is in scope.
    pub(super) fn element_in_scope_by_node(&self, target: NodeId, boundary: TagCategory) -> bool {
        self.scope_search(boundary, |node| node == target)
    }

    /// "has an element in scope"
    pub(super) fn in_scope(&self, tag: Tag) -> bool {
        self.element_in_scope(tag, TagCategory::SCOPE)
    }

    /// "has an element in button scope"
    pub(super) fn in_button_scope(&self, tag: Tag) -> bool {
        self.element_in_scope(tag, TagCategory::SCOPE_BUTTON)
    }

    /// "has an element in table scope"
    pub(super) fn in_table_scope(&self, tag: Tag) -> bool {
        self.element_in_scope(tag, TagCategory::SCOPE_TABLE)
    }

    /// "has an h1, h2, h3, h4, h5, or h6 element in scope"
    pub(super) fn heading_in_scope(&self) -> bool {
        self.any_element_in_scope(HEADINGS, TagCategory::SCOPE)
    }

    /// "has a tbody, thead, or tfoot element in table scope"
    pub(super) fn table_section_in_table_scope(&self) -> bool {
        self.any_element_in_scope(TABLE_SECTIONS, TagCategory::SCOPE_TABLE)
    }

    /// "has a td or th element in table scope"
    pub(super) fn cell_in_table_scope(&self) -> bool {
        self.any_element_in_scope(CELLS, TagCategory::SCOPE_TABLE)
    }

    /// Whether the stack holds an HTML element `tag` anywhere.
    pub(super) fn stack_has(&self, tag: Tag) -> bool {
        self.stack_of_open_elements
            .iter()
            .any(|&id| self.is_html(id, tag))
    }

    /// Pop elements until an HTML element `tag` has been popped.
    pub(super) fn pop_until(&mut self, tag: Tag) {
        self.pop_until_one_of(&[tag]);
    }

    /// Pop elements until an HTML element with one of `tags` has been popped.
    pub(super) fn pop_until_one_of(&mut self, tags: &[Tag]) {
        while let Some(node) = self.stack_of_open_elements.pop() {
            if self.is_html_one_of(node, tags) {
                break;
            }
        }
    }

    /// Pop elements until `target` has been popped.
    pub(super) fn pop_until_node(&mut self, target: NodeId) {
        while let Some(node) = self.stack_of_open_elements.pop() {
            if node == target {
                break;
            }
        }
    }

    /// Remove `target` from wherever it is in the stack.
    pub(super) fn remove_from_stack(&mut self, target: NodeId) {
        if let Some(index) = self.stack_of_open_elements.iter().rposition(|&id| id == target) {
            let _ = self.stack_of_open_elements.remove(index);
        }
    }

    /// [§ 13.2.6.3 Generate implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
    ///
    /// "while the current node is a dd element, a dt element, an li element,
    /// an optgroup element, an option element, a p element, an rb element, an
    /// rp element, an rt element, or an rtc element, the UA must pop the
    /// current node off the stack of open elements." `except` is left open.
    pub(super) fn generate_implied_end_tags(&mut self, except: Option<Tag>) {
        while let Some(node) = self.current_node() {
            if !self.is_html_one_of(node, IMPLIED_END_TAGS)
                || except.is_some_and(|tag| self.is_html(node, tag))
            {
                break;
            }
            let _ = self.stack_of_open_elements.pop();
        }
    }

    /// [§ 13.2.6.3 Generate all implied end tags thoroughly](https://html.spec.whatwg.org/multipage/parsing.html#generate-all-implied-end-tags-thoroughly)
    pub(super) fn generate_all_implied_end_tags_thoroughly(&mut self) {
        while self.current_node_is_one_of(THOROUGH_IMPLIED_END_TAGS) {
            let _ = self.stack_of_open_elements.pop();
        }
    }

    /// Pop until the current node is one of `tags` (or the stack runs dry).
    fn clear_stack_back_to(&mut self, tags: &[Tag]) {
        while let Some(node) = self.current_node() {
            if self.is_html_one_of(node, tags) {
                break;
            }
            let _ = self.stack_of_open_elements.pop();
        }
    }

    /// [§ 13.2.6.4.9](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-context)
    ///
    /// "while the current node is not a table, template, or html element, pop
    /// elements from the stack of open elements."
    pub(super) fn clear_stack_back_to_table_context(&mut self) {
        self.clear_stack_back_to(&[Tag::Table, Tag::Template, Tag::Html]);
    }

    /// [§ 13.2.6.4.13](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-body-context)
    pub(super) fn clear_stack_back_to_table_body_context(&mut self) {
        self.clear_stack_back_to(&[Tag::Tbody, Tag::Tfoot, Tag::Thead, Tag::Template, Tag::Html]);
    }

    /// [§ 13.2.6.4.14](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-row-context)
    pub(super) fn clear_stack_back_to_table_row_context(&mut self) {
        self.clear_stack_back_to(&[Tag::Tr, Tag::Template, Tag::Html]);
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#close-a-p-element)
    ///
    /// "Generate implied end tags, except for p elements. If the current node
    /// is not a p element, then this is a parse error. Pop elements from the
    /// stack of open elements until a p element has been popped from the
    /// stack."
    pub(super) fn close_p_element(&mut self) {
        self.generate_implied_end_tags(Some(Tag::P));
        if !self.current_node_is(Tag::P) {
            self.parse_error_here(TreeErrorKind::UnclosedElement);
        }
        self.pop_until(Tag::P);
    }

    /// Close a p element if one is in button scope.
    pub(super) fn close_p_if_in_button_scope(&mut self) {
        if self.in_button_scope(Tag::P) {
            self.close_p_element();
        }
    }

    /// [§ 13.2.6.4.15](https://html.spec.whatwg.org/multipage/parsing.html#close-the-cell)
    pub(super) fn close_the_cell(&mut self) {
        // "Generate implied end tags."
        self.generate_implied_end_tags(None);
        // "If the current node is not now a td element or a th element, then
        // this is a parse error."
        if !self.current_node_is_one_of(CELLS) {
            self.parse_error_here(TreeErrorKind::UnclosedElement);
        }
        // "Pop elements from the stack of open elements stack until a td
        // element or a th element has been popped from the stack."
        self.pop_until_one_of(CELLS);
        // "Clear the list of active formatting elements up to the last marker."
        self.clear_active_formatting_elements_to_last_marker();
        // "Switch the insertion mode to "in row"."
        self.insertion_mode = InsertionMode::InRow;
    }

    /// [§ 13.2.4.1 Reset the insertion mode appropriately](https://html.spec.whatwg.org/multipage/parsing.html#reset-the-insertion-mode-appropriately)
    pub(super) fn reset_insertion_mode_appropriately(&mut self) {
        self.insertion_mode = self.appropriate_insertion_mode();
    }

    fn appropriate_insertion_mode(&self) -> InsertionMode {
        let stack = &self.stack_of_open_elements;
        for index in (0..stack.len()).rev() {
            // "If node is the first node in the stack of open elements, then set
            // last to true, and, if the parser was created as part of the HTML
            // fragment parsing algorithm (fragment case), set node to the context
            // element passed to that algorithm."
            let last = index == 0;
            let node = match &self.fragment {
                Some(fragment) if last => fragment.element,
                _ => stack[index],
            };
            let tag = match self.identity(node) {
                Some((tag, Namespace::Html)) => tag.tag(),
                _ => {
                    if last {
                        return InsertionMode::InBody;
                    }
                    continue;
                }
            };

            match tag {
                // "If node is a select element, run these substeps"
                Tag::Select => return self.select_mode(index, last),
                // "If node is a td or th element and last is false"
                Tag::Td | Tag::Th if !last => return InsertionMode::InCell,
                Tag::Tr => return InsertionMode::InRow,
                Tag::Tbody | Tag::Thead | Tag::Tfoot => return InsertionMode::InTableBody,
                Tag::Caption => return InsertionMode::InCaption,
                Tag::Colgroup => return InsertionMode::InColumnGroup,
                Tag::Table => return InsertionMode::InTable,
                // "If node is a template element, then switch the insertion mode
                // to the current template insertion mode"
                Tag::Template => {
                    return self
                        .template_insertion_modes
                        .last()
                        .copied()
                        .unwrap_or(InsertionMode::InTemplate);
                }
                Tag::Head if !last => return InsertionMode::InHead,
                Tag::Body => return InsertionMode::InBody,
                Tag::Frameset => return InsertionMode::InFrameset,
                // "If the head element pointer is null, switch the insertion mode
                // to "before head" ... Otherwise, ... "after head""
                Tag::Html => {
                    return if self.head_element_pointer.is_none() {
                        InsertionMode::BeforeHead
                    } else {
                        InsertionMode::AfterHead
                    };
                }
                _ if last => return InsertionMode::InBody,
                _ => {}
            }
        }
        InsertionMode::InBody
    }

    /// The select sub-steps of resetting the insertion mode. `index` is the
    /// select's position in the stack.
    fn select_mode(&self, index: usize, last: bool) -> InsertionMode {
        if last {
            // The context element: scan the ancestors it was declared with.
            let ancestors = self.fragment.iter().flat_map(|f| f.ancestors.iter().rev());
            for &(tag, ns) in ancestors {
                if ns != Namespace::Html {
                    continue;
                }
                if tag == Tag::Template {
                    break;
                }
                if tag == Tag::Table {
                    return InsertionMode::InSelectInTable;
                }
            }
            return InsertionMode::InSelect;
        }
        // "Loop: If ancestor is the first node in the stack of open elements,
        // jump to the step below labeled done. Let ancestor be the node before
        // ancestor in the stack of open elements. If ancestor is a template
        // node, jump to the step below labeled done. If ancestor is a table
        // node, switch the insertion mode to "in select in table" and return."
        for &ancestor in self.stack_of_open_elements[..index].iter().rev() {
            if self.is_html(ancestor, Tag::Template) {
                break;
            }
            if self.is_html(ancestor, Tag::Table) {
                return InsertionMode::InSelectInTable;
            }
        }
        // "Done: Switch the insertion mode to "in select" and return."
        InsertionMode::InSelect
    }
}
