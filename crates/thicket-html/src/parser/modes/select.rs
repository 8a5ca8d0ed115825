//! [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
//! and [§ 13.2.6.4.17 "in select in table"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable).

use thicket_dom::Tag;

use super::{is_end, is_start};
use crate::error::TreeErrorKind;
use crate::parser::core::{Handled, InsertionMode, TreeConstructor};
use crate::tag_category::TagCategory;
use crate::tokenizer::Token;

const TABLE_PARTS: &[Tag] = &[
    Tag::Caption,
    Tag::Table,
    Tag::Tbody,
    Tag::Tfoot,
    Tag::Thead,
    Tag::Tr,
    Tag::Td,
    Tag::Th,
];

impl TreeConstructor {
    fn select_in_select_scope(&self) -> bool {
        self.element_in_scope(Tag::Select, TagCategory::SCOPE_SELECT)
    }

    /// Pop up to and including the select, then reset the insertion mode.
    fn close_select(&mut self) {
        self.pop_until(Tag::Select);
        self.reset_insertion_mode_appropriately();
    }

    pub(in crate::parser) fn handle_in_select_mode(&mut self, token: &mut Token) -> Handled {
        match &*token {
            // "A character token that is U+0000 NULL: Parse error. Ignore the
            // token." / "Any other character token: Insert the token's
            // character."
            Token::Character(run) => {
                self.null_error(run);
                let text = run.text_for_insertion();
                if !text.is_empty() {
                    self.insert_character(&text)?;
                }
            }
            Token::Comment(data) => self.insert_comment(data, None)?,
            Token::Doctype(_) => self.parse_error(TreeErrorKind::UnexpectedDoctype, token),
            Token::StartTag(tag) if tag.name == Tag::Html => {
                return self.process_using_mode(InsertionMode::InBody, token);
            }

            // "A start tag whose tag name is "option": If the current node is an
            // option element, pop that node from the stack of open elements.
            // Insert an HTML element for the token."
            Token::StartTag(tag) if tag.name == Tag::Option => {
                if self.current_node_is(Tag::Option) {
                    let _ = self.stack_of_open_elements.pop();
                }
                let _ = self.insert_html_element(tag)?;
            }

            // "A start tag whose tag name is "optgroup"" / "hr"
            Token::StartTag(tag) if tag.name == Tag::Optgroup || tag.name == Tag::Hr => {
                if self.current_node_is(Tag::Option) {
                    let _ = self.stack_of_open_elements.pop();
                }
                if self.current_node_is(Tag::Optgroup) {
                    let _ = self.stack_of_open_elements.pop();
                }
                if tag.name == Tag::Hr {
                    self.insert_void_element(tag)?;
                } else {
                    let _ = self.insert_html_element(tag)?;
                }
            }

            // "An end tag whose tag name is "optgroup""
            Token::EndTag(tag) if tag.name == Tag::Optgroup => {
                // "First, if the current node is an option element, and the node
                // immediately before it in the stack of open elements is an
                // optgroup element, then pop the current node from the stack of
                // open elements."
                let len = self.stack_of_open_elements.len();
                let before_is_optgroup = len >= 2
                    && self.is_html(self.stack_of_open_elements[len - 2], Tag::Optgroup);
                if self.current_node_is(Tag::Option) && before_is_optgroup {
                    let _ = self.stack_of_open_elements.pop();
                }
                // "If the current node is an optgroup element, then pop that node
                // from the stack of open elements. Otherwise, this is a parse
                // error; ignore the token."
                if self.current_node_is(Tag::Optgroup) {
                    let _ = self.stack_of_open_elements.pop();
                } else {
                    self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
                }
            }

            // "An end tag whose tag name is "option""
            Token::EndTag(tag) if tag.name == Tag::Option => {
                if self.current_node_is(Tag::Option) {
                    let _ = self.stack_of_open_elements.pop();
                } else {
                    self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
                }
            }

            // "An end tag whose tag name is "select": If the stack of open
            // elements does not have a select element in select scope, this is a
            // parse error; ignore the token. (fragment case) Otherwise: Pop
            // elements from the stack of open elements until a select element has
            // been popped from the stack. Reset the insertion mode appropriately."
            Token::EndTag(tag) if tag.name == Tag::Select => {
                if self.select_in_select_scope() {
                    self.close_select();
                } else {
                    self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
                }
            }

            // "A start tag whose tag name is "select": Parse error. If the stack
            // of open elements does not have a select element in select scope,
            // ignore the token. (fragment case) Otherwise: Pop elements from the
            // stack of open elements until a select element has been popped from
            // the stack. Reset the insertion mode appropriately."
            Token::StartTag(tag) if tag.name == Tag::Select => {
                self.parse_error(TreeErrorKind::UnexpectedStartTag, token);
                if self.select_in_select_scope() {
                    self.close_select();
                }
            }

            // "A start tag whose tag name is one of: "input", "keygen",
            // "textarea"": the same, then "Reprocess the token."
            Token::StartTag(tag)
                if matches!(tag.name.tag(), Tag::Input | Tag::Keygen | Tag::Textarea) =>
            {
                self.parse_error(TreeErrorKind::UnexpectedStartTag, token);
                if self.select_in_select_scope() {
                    self.close_select();
                    return Ok(false);
                }
            }

            _ if is_start(token, &[Tag::Script, Tag::Template]) || is_end(token, &[Tag::Template]) => {
                return self.process_using_mode(InsertionMode::InHead, token);
            }

            Token::EndOfFile => return self.process_using_mode(InsertionMode::InBody, token),

            // "Anything else: Parse error. Ignore the token."
            Token::StartTag(_) => self.parse_error(TreeErrorKind::UnexpectedStartTag, token),
            Token::EndTag(_) => self.parse_error(TreeErrorKind::UnexpectedEndTag, token),
        }
        Ok(true)
    }

    pub(in crate::parser) fn handle_in_select_in_table_mode(&mut self, token: &mut Token) -> Handled {
        // "A start tag whose tag name is one of: "caption", "table", "tbody",
        // "tfoot", "thead", "tr", "td", "th": Parse error. Pop elements from the
        // stack of open elements until a select element has been popped from
        // the stack. Reset the insertion mode appropriately. Reprocess the
        // token."
        if is_start(token, TABLE_PARTS) {
            self.parse_error(TreeErrorKind::UnexpectedStartTag, token);
            // A select context element is not on the stack.
            if !self.select_in_select_scope() {
                return Ok(true);
            }
            self.close_select();
            return Ok(false);
        }

        // "An end tag whose tag name is one of: ... Parse error. If the stack of
        // open elements does not have an element in table scope that is an HTML
        // element with the same tag name as that of the token, then ignore the
        // token. Otherwise: ... Reprocess the token."
        if let Token::EndTag(tag) = &*token
            && TABLE_PARTS.iter().any(|&t| tag.name == t)
        {
            let name = tag.name.tag();
            self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
            if !self.in_table_scope(name) {
                return Ok(true);
            }
            self.close_select();
            return Ok(false);
        }

        self.handle_in_select_mode(token)
    }
}
