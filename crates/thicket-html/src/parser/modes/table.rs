//! Table modes: in table, in table text, in caption, in column group, in
//! table body, in row and in cell.

use thicket_dom::Tag;

use super::body::is_hidden_input;
use super::{is_end, is_start};
use crate::error::TreeErrorKind;
use crate::parser::core::{Handled, InsertionMode, TreeConstructor};
use crate::parser::stack::{CELLS, TABLE_SECTIONS};
use crate::tokenizer::token::is_html_whitespace;
use crate::tokenizer::{CharacterRun, Token};

/// End tags every table mode below "in table" ignores.
const TABLE_STRUCTURE: &[Tag] = &[
    Tag::Body,
    Tag::Caption,
    Tag::Col,
    Tag::Colgroup,
    Tag::Html,
    Tag::Tbody,
    Tag::Td,
    Tag::Tfoot,
    Tag::Th,
    Tag::Thead,
    Tag::Tr,
];

impl TreeConstructor {
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    pub(in crate::parser) fn handle_in_table_mode(&mut self, token: &mut Token) -> Handled {
        match &*token {
            // "A character token, if the current node is table, tbody, template,
            // tfoot, thead, or tr element: Let the pending table character
            // tokens be an empty list of tokens. Let the original insertion mode
            // be the current insertion mode. Switch the insertion mode to "in
            // table text" and reprocess the token."
            Token::Character(_)
                if self.current_node_is_one_of(&[
                    Tag::Table,
                    Tag::Tbody,
                    Tag::Template,
                    Tag::Tfoot,
                    Tag::Thead,
                    Tag::Tr,
                ]) =>
            {
                self.pending_table_text.clear();
                self.pending_table_text_is_whitespace = true;
                self.original_insertion_mode = Some(self.insertion_mode);
                self.insertion_mode = InsertionMode::InTableText;
                return Ok(false);
            }
            Token::Comment(data) => self.insert_comment(data, None)?,
            Token::Doctype(_) => self.parse_error(TreeErrorKind::UnexpectedDoctype, token),

            // "A start tag whose tag name is "caption": Clear the stack back to a
            // table context. Insert a marker at the end of the list of active
            // formatting elements. Insert an HTML element for the token. Switch
            // the insertion mode to "in caption"."
            Token::StartTag(tag) if tag.name == Tag::Caption => {
                self.clear_stack_back_to_table_context();
                self.insert_marker();
                let _ = self.insert_html_element(tag)?;
                self.insertion_mode = InsertionMode::InCaption;
            }

            // "A start tag whose tag name is "colgroup""
            Token::StartTag(tag) if tag.name == Tag::Colgroup => {
                self.clear_stack_back_to_table_context();
                let _ = self.insert_html_element(tag)?;
                self.insertion_mode = InsertionMode::InColumnGroup;
            }

            // "A start tag whose tag name is "col": Clear the stack back to a
            // table context. Insert an HTML element for a "colgroup" start tag
            // token with no attributes, then switch the insertion mode to "in
            // column group". Reprocess the current token."
            Token::StartTag(tag) if tag.name == Tag::Col => {
                self.clear_stack_back_to_table_context();
                let _ = self.insert_synthetic_element(Tag::Colgroup)?;
                self.insertion_mode = InsertionMode::InColumnGroup;
                return Ok(false);
            }

            // "A start tag whose tag name is one of: "tbody", "tfoot", "thead""
            Token::StartTag(tag) if matches!(tag.name.tag(), Tag::Tbody | Tag::Tfoot | Tag::Thead) => {
                self.clear_stack_back_to_table_context();
                let _ = self.insert_html_element(tag)?;
                self.insertion_mode = InsertionMode::InTableBody;
            }

            // "A start tag whose tag name is one of: "td", "th", "tr""
            Token::StartTag(tag) if matches!(tag.name.tag(), Tag::Td | Tag::Th | Tag::Tr) => {
                self.clear_stack_back_to_table_context();
                let _ = self.insert_synthetic_element(Tag::Tbody)?;
                self.insertion_mode = InsertionMode::InTableBody;
                return Ok(false);
            }

            // "A start tag whose tag name is "table": Parse error. If the stack of
            // open elements does not have a table element in table scope, ignore
            // the token. Otherwise: Pop elements from this stack until a table
            // element has been popped from the stack. Reset the insertion mode
            // appropriately. Reprocess the token."
            Token::StartTag(tag) if tag.name == Tag::Table => {
                self.parse_error(TreeErrorKind::UnexpectedStartTag, token);
                if self.in_table_scope(Tag::Table) {
                    self.pop_until(Tag::Table);
                    self.reset_insertion_mode_appropriately();
                    return Ok(false);
                }
            }

            // "An end tag whose tag name is "table""
            Token::EndTag(tag) if tag.name == Tag::Table => {
                if !self.in_table_scope(Tag::Table) {
                    self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
                    return Ok(true);
                }
                self.pop_until(Tag::Table);
                self.reset_insertion_mode_appropriately();
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html", "tbody", "td", "tfoot", "th", "thead", "tr":
            // Parse error. Ignore the token."
            Token::EndTag(_) if is_end(token, TABLE_STRUCTURE) => {
                self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
            }

            // "A start tag whose tag name is one of: "style", "script",
            // "template"" / "An end tag whose tag name is "template"": "Process
            // the token using the rules for the "in head" insertion mode."
            _ if is_start(token, &[Tag::Style, Tag::Script, Tag::Template])
                || is_end(token, &[Tag::Template]) =>
            {
                return self.process_using_mode(InsertionMode::InHead, token);
            }

            // "A start tag whose tag name is "input": If the token does not have
            // an attribute with the name "type", or if it does, but that
            // attribute's value is not an ASCII case-insensitive match for the
            // string "hidden", then: act as described in the "anything else"
            // entry below. Otherwise: Parse error. Insert an HTML element for the
            // token. Pop that input element off the stack of open elements.
            // Acknowledge the token's self-closing flag, if it is set."
            Token::StartTag(tag) if tag.name == Tag::Input && is_hidden_input(tag) => {
                self.parse_error(TreeErrorKind::UnexpectedStartTag, token);
                self.insert_void_element(tag)?;
            }

            // "A start tag whose tag name is "form""
            Token::StartTag(tag) if tag.name == Tag::Form => {
                self.parse_error(TreeErrorKind::UnexpectedStartTag, token);
                // "If there is a template element on the stack of open elements,
                // or if the form element pointer is not null, ignore the token.
                // Otherwise: Insert an HTML element for the token, and set the
                // form element pointer to point to the element created. Pop that
                // form element off the stack of open elements."
                if self.template_on_stack() || self.form_element_pointer.is_some() {
                    return Ok(true);
                }
                let form = self.insert_html_element(tag)?;
                self.form_element_pointer = Some(form);
                let _ = self.stack_of_open_elements.pop();
            }

            // "An end-of-file token: Process the token using the rules for the
            // "in body" insertion mode."
            Token::EndOfFile => return self.process_using_mode(InsertionMode::InBody, token),

            // "Anything else: Parse error. Enable foster parenting, process the
            // token using the rules for the "in body" insertion mode, and then
            // disable foster parenting."
            _ => {
                let kind = match &*token {
                    Token::EndTag(_) => TreeErrorKind::UnexpectedEndTag,
                    Token::Character(_) => TreeErrorKind::FosterParentedCharacter,
                    _ => TreeErrorKind::UnexpectedStartTag,
                };
                self.parse_error(kind, token);
                return self.in_body_with_foster_parenting(token);
            }
        }
        Ok(true)
    }

    /// Process `token` with the "in body" rules while foster parenting is
    /// enabled.
    fn in_body_with_foster_parenting(&mut self, token: &mut Token) -> Handled {
        self.foster_parenting = true;
        let handled = self.process_using_mode(InsertionMode::InBody, token);
        self.foster_parenting = false;
        handled
    }

    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    pub(in crate::parser) fn handle_in_table_text_mode(&mut self, token: &mut Token) -> Handled {
        // "A character token that is U+0000 NULL: Parse error. Ignore the
        // token." / "Any other character token: Append the character token to
        // the pending table character tokens list."
        if let Token::Character(run) = &*token {
            self.null_error(run);
            let text = run.text_for_insertion();
            if !text.chars().all(is_html_whitespace) {
                self.pending_table_text_is_whitespace = false;
            }
            self.pending_table_text.push_str(&text);
            return Ok(true);
        }

        // "Anything else: If any of the tokens in the pending table character
        // tokens list are character tokens that are not ASCII whitespace, then
        // this is a parse error: reprocess the character tokens in the pending
        // table character tokens list using the rules given in the "anything
        // else" entry in the "in table" insertion mode. Otherwise, insert the
        // characters given by the pending table character tokens list."
        let pending = std::mem::take(&mut self.pending_table_text);
        if !pending.is_empty() {
            if self.pending_table_text_is_whitespace {
                self.insert_character(&pending)?;
            } else {
                self.parse_error_here(TreeErrorKind::FosterParentedCharacter);
                let mut run = Token::Character(CharacterRun::new(pending));
                let _ = self.in_body_with_foster_parenting(&mut run)?;
            }
        }
        self.pending_table_text_is_whitespace = true;

        // "Switch the insertion mode to the original insertion mode and
        // reprocess the token."
        self.insertion_mode = self
            .original_insertion_mode
            .take()
            .unwrap_or(InsertionMode::InTable);
        Ok(false)
    }

    /// Close the caption; `false` if none is in table scope.
    fn close_caption(&mut self, token: &Token) -> bool {
        // "If the stack of open elements does not have a caption element in
        // table scope, this is a parse error; ignore the token. (fragment case)"
        if !self.in_table_scope(Tag::Caption) {
            self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
            return false;
        }
        // "Generate implied end tags. Now, if the current node is not a caption
        // element, then this is a parse error. Pop elements from this stack
        // until a caption element has been popped from the stack. Clear the
        // list of active formatting elements up to the last marker. Switch the
        // insertion mode to "in table"."
        self.generate_implied_end_tags(None);
        if !self.current_node_is(Tag::Caption) {
            self.parse_error(TreeErrorKind::UnclosedElement, token);
        }
        self.pop_until(Tag::Caption);
        self.clear_active_formatting_elements_to_last_marker();
        self.insertion_mode = InsertionMode::InTable;
        true
    }

    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    pub(in crate::parser) fn handle_in_caption_mode(&mut self, token: &mut Token) -> Handled {
        if is_end(token, &[Tag::Caption]) {
            let _ = self.close_caption(token);
            return Ok(true);
        }

        // "A start tag whose tag name is one of: "caption", "col", "colgroup",
        // "tbody", "td", "tfoot", "th", "thead", "tr"" / "An end tag whose tag
        // name is "table"": close the caption, then "Reprocess the token."
        if is_start(
            token,
            &[
                Tag::Caption,
                Tag::Col,
                Tag::Colgroup,
                Tag::Tbody,
                Tag::Td,
                Tag::Tfoot,
                Tag::Th,
                Tag::Thead,
                Tag::Tr,
            ],
        ) || is_end(token, &[Tag::Table])
        {
            return Ok(!self.close_caption(token));
        }

        // "An end tag whose tag name is one of: "body", "col", "colgroup",
        // "html", "tbody", "td", "tfoot", "th", "thead", "tr": Parse error.
        // Ignore the token."
        if is_end(
            token,
            &[
                Tag::Body,
                Tag::Col,
                Tag::Colgroup,
                Tag::Html,
                Tag::Tbody,
                Tag::Td,
                Tag::Tfoot,
                Tag::Th,
                Tag::Thead,
                Tag::Tr,
            ],
        ) {
            self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
            return Ok(true);
        }

        self.process_using_mode(InsertionMode::InBody, token)
    }

    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolgroup)
    pub(in crate::parser) fn handle_in_column_group_mode(&mut self, token: &mut Token) -> Handled {
        if self.insert_leading_whitespace(token)? {
            return Ok(true);
        }
        match &*token {
            Token::Comment(data) => self.insert_comment(data, None)?,
            Token::Doctype(_) => self.parse_error(TreeErrorKind::UnexpectedDoctype, token),
            Token::StartTag(tag) if tag.name == Tag::Html => {
                return self.process_using_mode(InsertionMode::InBody, token);
            }

            // "A start tag whose tag name is "col": Insert an HTML element for
            // the token. Immediately pop the current node off the stack of open
            // elements. Acknowledge the token's self-closing flag, if it is set."
            Token::StartTag(tag) if tag.name == Tag::Col => self.insert_void_element(tag)?,

            // "An end tag whose tag name is "colgroup""
            Token::EndTag(tag) if tag.name == Tag::Colgroup => {
                if !self.current_node_is(Tag::Colgroup) {
                    self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
                    return Ok(true);
                }
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = InsertionMode::InTable;
            }

            Token::EndTag(tag) if tag.name == Tag::Col => {
                self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
            }

            _ if is_start(token, &[Tag::Template]) || is_end(token, &[Tag::Template]) => {
                return self.process_using_mode(InsertionMode::InHead, token);
            }

            Token::EndOfFile => return self.process_using_mode(InsertionMode::InBody, token),

            // "Anything else: If the current node is not a colgroup element, then
            // this is a parse error; ignore the token. Otherwise, pop the current
            // node from the stack of open elements. Switch the insertion mode to
            // "in table". Reprocess the token."
            _ => {
                if !self.current_node_is(Tag::Colgroup) {
                    self.parse_error(TreeErrorKind::UnexpectedCharacter, token);
                    return Ok(true);
                }
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = InsertionMode::InTable;
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intbody)
    pub(in crate::parser) fn handle_in_table_body_mode(&mut self, token: &mut Token) -> Handled {
        match &*token {
            // "A start tag whose tag name is "tr": Clear the stack back to a table
            // body context. Insert an HTML element for the token, then switch
            // the insertion mode to "in row"."
            Token::StartTag(tag) if tag.name == Tag::Tr => {
                self.clear_stack_back_to_table_body_context();
                let _ = self.insert_html_element(tag)?;
                self.insertion_mode = InsertionMode::InRow;
            }

            // "A start tag whose tag name is one of: "th", "td": Parse error.
            // Clear the stack back to a table body context. Insert an HTML
            // element for a "tr" start tag token with no attributes, then switch
            // the insertion mode to "in row". Reprocess the current token."
            _ if is_start(token, CELLS) => {
                self.parse_error(TreeErrorKind::UnexpectedStartTag, token);
                self.clear_stack_back_to_table_body_context();
                let _ = self.insert_synthetic_element(Tag::Tr)?;
                self.insertion_mode = InsertionMode::InRow;
                return Ok(false);
            }

            // "An end tag whose tag name is one of: "tbody", "tfoot", "thead""
            Token::EndTag(tag) if matches!(tag.name.tag(), Tag::Tbody | Tag::Tfoot | Tag::Thead) => {
                if !self.in_table_scope(tag.name.tag()) {
                    self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
                    return Ok(true);
                }
                self.clear_stack_back_to_table_body_context();
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = InsertionMode::InTable;
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "tbody", "tfoot", "thead"" / "An end tag whose tag name
            // is "table""
            _ if is_start(
                token,
                &[Tag::Caption, Tag::Col, Tag::Colgroup, Tag::Tbody, Tag::Tfoot, Tag::Thead],
            ) || is_end(token, &[Tag::Table]) =>
            {
                // "If the stack of open elements does not have a tbody, thead, or
                // tfoot element in table scope, this is a parse error; ignore the
                // token."
                if !self.table_section_in_table_scope() {
                    self.parse_error(TreeErrorKind::UnexpectedStartTag, token);
                    return Ok(true);
                }
                // "Otherwise: Clear the stack back to a table body context. Pop
                // the current node from the stack of open elements. Switch the
                // insertion mode to "in table". Reprocess the token."
                self.clear_stack_back_to_table_body_context();
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = InsertionMode::InTable;
                return Ok(false);
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html", "td", "th", "tr": Parse error. Ignore the
            // token."
            _ if is_end(
                token,
                &[Tag::Body, Tag::Caption, Tag::Col, Tag::Colgroup, Tag::Html, Tag::Td, Tag::Th, Tag::Tr],
            ) =>
            {
                self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
            }

            // "Anything else: Process the token using the rules for the "in
            // table" insertion mode."
            _ => return self.process_using_mode(InsertionMode::InTable, token),
        }
        Ok(true)
    }

    /// Close the current row; `false` if no tr is in table scope.
    fn close_row(&mut self, token: &Token) -> bool {
        if !self.in_table_scope(Tag::Tr) {
            self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
            return false;
        }
        // "Clear the stack back to a table row context. Pop the current node
        // (which will be a tr element) from the stack of open elements. Switch
        // the insertion mode to "in table body"."
        self.clear_stack_back_to_table_row_context();
        let _ = self.stack_of_open_elements.pop();
        self.insertion_mode = InsertionMode::InTableBody;
        true
    }

    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intr)
    pub(in crate::parser) fn handle_in_row_mode(&mut self, token: &mut Token) -> Handled {
        match &*token {
            // "A start tag whose tag name is one of: "th", "td": Clear the stack
            // back to a table row context. Insert an HTML element for the token,
            // then switch the insertion mode to "in cell". Insert a marker at the
            // end of the list of active formatting elements."
            Token::StartTag(tag) if matches!(tag.name.tag(), Tag::Td | Tag::Th) => {
                self.clear_stack_back_to_table_row_context();
                let _ = self.insert_html_element(tag)?;
                self.insertion_mode = InsertionMode::InCell;
                self.insert_marker();
            }

            // "An end tag whose tag name is "tr""
            Token::EndTag(tag) if tag.name == Tag::Tr => {
                let _ = self.close_row(token);
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "tbody", "tfoot", "thead", "tr"" / "An end tag whose
            // tag name is "table"": close the row, "Reprocess the token."
            _ if is_start(
                token,
                &[Tag::Caption, Tag::Col, Tag::Colgroup, Tag::Tbody, Tag::Tfoot, Tag::Thead, Tag::Tr],
            ) || is_end(token, &[Tag::Table]) =>
            {
                return Ok(!self.close_row(token));
            }

            // "An end tag whose tag name is one of: "tbody", "tfoot", "thead""
            Token::EndTag(tag) if matches!(tag.name.tag(), Tag::Tbody | Tag::Tfoot | Tag::Thead) => {
                // "If the stack of open elements does not have an element in
                // table scope that is an HTML element with the same tag name as
                // the token, this is a parse error; ignore the token."
                if !self.in_table_scope(tag.name.tag()) {
                    self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
                    return Ok(true);
                }
                // "If the stack of open elements does not have a tr element in
                // table scope, ignore the token."
                if !self.in_table_scope(Tag::Tr) {
                    return Ok(true);
                }
                let _ = self.close_row(token);
                return Ok(false);
            }

            _ if is_end(
                token,
                &[Tag::Body, Tag::Caption, Tag::Col, Tag::Colgroup, Tag::Html, Tag::Td, Tag::Th],
            ) =>
            {
                self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
            }

            _ => return self.process_using_mode(InsertionMode::InTable, token),
        }
        Ok(true)
    }

    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intd)
    pub(in crate::parser) fn handle_in_cell_mode(&mut self, token: &mut Token) -> Handled {
        match &*token {
            // "An end tag whose tag name is one of: "td", "th""
            Token::EndTag(tag) if matches!(tag.name.tag(), Tag::Td | Tag::Th) => {
                let cell = tag.name.tag();
                if !self.in_table_scope(cell) {
                    self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
                    return Ok(true);
                }
                // "Generate implied end tags. Now, if the current node is not an
                // HTML element with the same tag name as the token, then this is
                // a parse error. Pop elements from the stack of open elements
                // stack until an HTML element with the same tag name as the token
                // has been popped from the stack. Clear the list of active
                // formatting elements up to the last marker. Switch the insertion
                // mode to "in row"."
                self.generate_implied_end_tags(None);
                if !self.current_node_is(cell) {
                    self.parse_error(TreeErrorKind::UnclosedElement, token);
                }
                self.pop_until(cell);
                self.clear_active_formatting_elements_to_last_marker();
                self.insertion_mode = InsertionMode::InRow;
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr""
            _ if is_start(
                token,
                &[
                    Tag::Caption,
                    Tag::Col,
                    Tag::Colgroup,
                    Tag::Tbody,
                    Tag::Td,
                    Tag::Tfoot,
                    Tag::Th,
                    Tag::Thead,
                    Tag::Tr,
                ],
            ) =>
            {
                // "Assert: The stack of open elements has a td or th element in
                // table scope." Fragment parsing can break that.
                if !self.cell_in_table_scope() {
                    self.parse_error(TreeErrorKind::UnexpectedStartTag, token);
                    return Ok(true);
                }
                self.close_the_cell();
                return Ok(false);
            }

            _ if is_end(token, &[Tag::Body, Tag::Caption, Tag::Col, Tag::Colgroup, Tag::Html]) => {
                self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
            }

            // "An end tag whose tag name is one of: "table", "tbody", "tfoot",
            // "thead", "tr": If the stack of open elements does not have an
            // element in table scope that is an HTML element with the same tag
            // name as that of the token, then this is a parse error; ignore the
            // token. Otherwise, close the cell and reprocess the token."
            Token::EndTag(tag)
                if tag.name == Tag::Table
                    || tag.name == Tag::Tr
                    || TABLE_SECTIONS.iter().any(|&t| tag.name == t) =>
            {
                if !self.in_table_scope(tag.name.tag()) {
                    self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
                    return Ok(true);
                }
                self.close_the_cell();
                return Ok(false);
            }

            _ => return self.process_using_mode(InsertionMode::InBody, token),
        }
        Ok(true)
    }
}
