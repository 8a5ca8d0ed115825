//! [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
//! and [§ 13.2.6.4.8 the "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata).

use thicket_dom::{Attr, AttrId, CompatMode, Namespace, NodeId, Tag, TagId};

use crate::error::{ParserError, TreeErrorKind};
use crate::parser::core::{ActiveFormattingElement, Handled, InsertionMode, TreeConstructor};
use crate::parser::stack::HEADINGS;
use crate::tag_category::TagCategory;
use crate::tokenizer::token::is_html_whitespace;
use crate::tokenizer::{TagToken, Token, TokenizerState};

/// Elements that may stay open at the end of the body without a parse error.
const MAY_STAY_OPEN: &[Tag] = &[
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
    Tag::Body,
    Tag::Html,
];

impl TreeConstructor {
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    pub(in crate::parser) fn handle_in_body_mode(&mut self, token: &mut Token) -> Handled {
        // "<image>": "Parse error. Change the token's tag name to "img" and
        // reprocess it. (Don't ask.)"
        if let Token::StartTag(tag) = token
            && tag.name == Tag::Image
        {
            tag.name = Tag::Img.id();
            self.parse_error(TreeErrorKind::UnexpectedStartTag, token);
            return Ok(false);
        }

        match &*token {
            // "A character token that is U+0000 NULL: Parse error. Ignore the
            // token." / "Any other character token: Reconstruct the active
            // formatting elements, if any. Insert the token's character. Set the
            // frameset-ok flag to "not ok"."
            Token::Character(run) => {
                self.null_error(run);
                let text = run.text_for_insertion();
                if text.is_empty() {
                    return Ok(true);
                }
                self.reconstruct_active_formatting_elements()?;
                self.insert_character(&text)?;
                if !text.chars().all(is_html_whitespace) {
                    self.frameset_ok = false;
                }
            }
            Token::Comment(data) => self.insert_comment(data, None)?,
            Token::Doctype(_) => self.parse_error(TreeErrorKind::UnexpectedDoctype, token),
            Token::StartTag(tag) => return self.in_body_start_tag(token, tag.clone()),
            Token::EndTag(tag) => {
                let name = tag.name;
                return self.in_body_end_tag(token, name);
            }

            // "An end-of-file token"
            Token::EndOfFile => {
                // "If the stack of template insertion modes is not empty, then
                // process the token using the rules for the "in template"
                // insertion mode."
                if !self.template_insertion_modes.is_empty() {
                    return self.process_using_mode(InsertionMode::InTemplate, token);
                }
                // "If there is a node in the stack of open elements that is not
                // either a dd element, ... or the html element, then this is a
                // parse error."
                self.check_open_elements_at_end();
                // "Stop parsing."
                self.stop_parsing();
            }
        }
        Ok(true)
    }

    /// Record an error if elements other than the harmless ones are open.
    fn check_open_elements_at_end(&mut self) {
        let unclosed = self
            .stack_of_open_elements
            .iter()
            .any(|&id| !self.is_html_one_of(id, MAY_STAY_OPEN));
        if unclosed {
            self.parse_error_here(TreeErrorKind::UnexpectedEof);
        }
    }

    fn in_body_start_tag(&mut self, token: &Token, tag: TagToken) -> Handled {
        match tag.name.tag() {
            // "A start tag whose tag name is "html": Parse error. If there is a
            // template element on the stack of open elements, then ignore the
            // token. Otherwise, for each attribute on the token, check to see if
            // the attribute is already present on the top element of the stack of
            // open elements. If it is not, add the attribute and its
            // corresponding value to that element."
            Tag::Html => {
                self.parse_error(TreeErrorKind::UnexpectedStartTag, token);
                if !self.template_on_stack()
                    && let Some(&html) = self.stack_of_open_elements.first()
                {
                    self.merge_token_attributes(html, &tag);
                }
            }

            // "A start tag whose tag name is one of: "base", "basefont",
            // "bgsound", "link", "meta", "noframes", "script", "style",
            // "template", "title": Process the token using the rules for the "in
            // head" insertion mode."
            Tag::Base
            | Tag::Basefont
            | Tag::Bgsound
            | Tag::Link
            | Tag::Meta
            | Tag::Noframes
            | Tag::Script
            | Tag::Style
            | Tag::Template
            | Tag::Title => {
                let mut token = token.clone();
                return self.process_using_mode(InsertionMode::InHead, &mut token);
            }

            // "A start tag whose tag name is "body""
            Tag::Body => {
                self.parse_error(TreeErrorKind::UnexpectedStartTag, token);
                // "If the stack of open elements has only one node on it, or if
                // the second element on the stack of open elements is not a body
                // element, or if there is a template element on the stack of open
                // elements, then ignore the token."
                let body = self.stack_of_open_elements.get(1).copied();
                if let Some(body) = body.filter(|&b| self.is_html(b, Tag::Body))
                    && !self.template_on_stack()
                {
                    // "Otherwise, set the frameset-ok flag to "not ok"; then, for
                    // each attribute on the token, check to see if the attribute
                    // is already present on the body element"
                    self.frameset_ok = false;
                    self.merge_token_attributes(body, &tag);
                }
            }

            // "A start tag whose tag name is "frameset""
            Tag::Frameset => {
                self.parse_error(TreeErrorKind::UnexpectedStartTag, token);
                let body = self.stack_of_open_elements.get(1).copied();
                let Some(body) = body.filter(|&b| self.is_html(b, Tag::Body)) else {
                    return Ok(true);
                };
                // "If the frameset-ok flag is set to "not ok", ignore the token."
                if !self.frameset_ok {
                    return Ok(true);
                }
                // "Remove the second element on the stack of open elements from
                // its parent node, if it has one. Pop all the nodes from the bottom
                // of the stack of open elements, from the current node up to, but
                // not including, the root html element. Insert an HTML element for
                // the token. Switch the insertion mode to "in frameset"."
                self.document.remove(body);
                self.stack_of_open_elements.truncate(1);
                let _ = self.insert_html_element(&tag)?;
                self.insertion_mode = InsertionMode::InFrameset;
            }

            // "A start tag whose tag name is one of: "address", "article",
            // "aside", "blockquote", "center", "details", "dialog", "dir", "div",
            // "dl", "fieldset", "figcaption", "figure", "footer", "header",
            // "hgroup", "main", "menu", "nav", "ol", "p", "search", "section",
            // "summary", "ul""
            Tag::Address
            | Tag::Article
            | Tag::Aside
            | Tag::Blockquote
            | Tag::Center
            | Tag::Details
            | Tag::Dialog
            | Tag::Dir
            | Tag::Div
            | Tag::Dl
            | Tag::Fieldset
            | Tag::Figcaption
            | Tag::Figure
            | Tag::Footer
            | Tag::Header
            | Tag::Hgroup
            | Tag::Main
            | Tag::Menu
            | Tag::Nav
            | Tag::Ol
            | Tag::P
            | Tag::Search
            | Tag::Section
            | Tag::Summary
            | Tag::Ul => {
                self.close_p_if_in_button_scope();
                let _ = self.insert_html_element(&tag)?;
            }

            // "A start tag whose tag name is one of: "h1", "h2", "h3", "h4",
            // "h5", "h6""
            Tag::H1 | Tag::H2 | Tag::H3 | Tag::H4 | Tag::H5 | Tag::H6 => {
                self.close_p_if_in_button_scope();
                // "If the current node is an HTML element whose tag name is one of
                // "h1", "h2", "h3", "h4", "h5", or "h6", then this is a parse
                // error; pop the current node off the stack of open elements."
                if self.current_node_is_one_of(HEADINGS) {
                    self.parse_error(TreeErrorKind::UnexpectedStartTag, token);
                    let _ = self.stack_of_open_elements.pop();
                }
                let _ = self.insert_html_element(&tag)?;
            }

            // "A start tag whose tag name is one of: "pre", "listing""
            Tag::Pre | Tag::Listing => {
                self.close_p_if_in_button_scope();
                let _ = self.insert_html_element(&tag)?;
                // "If the next token is a U+000A LINE FEED (LF) character token,
                // then ignore that token and move on to the next one."
                self.skip_next_newline = true;
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "form""
            Tag::Form => {
                // "If the form element pointer is not null, and there is no
                // template element on the stack of open elements, then this is a
                // parse error; ignore the token."
                if self.form_element_pointer.is_some() && !self.template_on_stack() {
                    self.parse_error(TreeErrorKind::UnexpectedStartTag, token);
                    return Ok(true);
                }
                self.close_p_if_in_button_scope();
                let form = self.insert_html_element(&tag)?;
                if !self.template_on_stack() {
                    self.form_element_pointer = Some(form);
                }
            }

            // "A start tag whose tag name is "li"" / "one of: "dd", "dt""
            Tag::Li => self.list_item_start_tag(&tag, &[Tag::Li])?,
            Tag::Dd | Tag::Dt => self.list_item_start_tag(&tag, &[Tag::Dd, Tag::Dt])?,

            // "A start tag whose tag name is "plaintext""
            Tag::Plaintext => {
                self.close_p_if_in_button_scope();
                let _ = self.insert_html_element(&tag)?;
                // "Switch the tokenizer to the PLAINTEXT state."
                self.next_tokenizer_state = Some(TokenizerState::Plaintext);
            }

            // "A start tag whose tag name is "button""
            Tag::Button => {
                // "If the stack of open elements has a button element in scope,
                // then run these substeps: Parse error. Generate implied end tags.
                // Pop elements from the stack of open elements until a button
                // element has been popped from the stack."
                if self.in_scope(Tag::Button) {
                    self.parse_error(TreeErrorKind::UnexpectedStartTag, token);
                    self.generate_implied_end_tags(None);
                    self.pop_until(Tag::Button);
                }
                self.reconstruct_active_formatting_elements()?;
                let _ = self.insert_html_element(&tag)?;
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "a""
            Tag::A => {
                // "If the list of active formatting elements contains an a element
                // between the end of the list and the last marker on the list (or
                // the start of the list if there is no marker on the list), then
                // this is a parse error; run the adoption agency algorithm for the
                // token, then remove that element from the list of active
                // formatting elements and the stack of open elements if the
                // adoption agency algorithm didn't already remove it"
                if let Some(existing) = self.formatting_element_after_last_marker(Tag::A) {
                    self.parse_error(TreeErrorKind::MisnestedFormatting, token);
                    if !self.run_adoption_agency(Tag::A.id())? {
                        self.any_other_end_tag(token, Tag::A.id());
                    }
                    if let Some(position) = self.formatting_position(existing) {
                        let _ = self.active_formatting_elements.remove(position);
                    }
                    self.remove_from_stack(existing);
                }
                self.insert_formatting_element(&tag)?;
            }

            // "A start tag whose tag name is one of: "b", "big", "code", "em",
            // "font", "i", "s", "small", "strike", "strong", "tt", "u""
            Tag::B
            | Tag::Big
            | Tag::Code
            | Tag::Em
            | Tag::Font
            | Tag::I
            | Tag::S
            | Tag::Small
            | Tag::Strike
            | Tag::Strong
            | Tag::Tt
            | Tag::U => self.insert_formatting_element(&tag)?,

            // "A start tag whose tag name is "nobr""
            Tag::Nobr => {
                self.reconstruct_active_formatting_elements()?;
                // "If the stack of open elements has a nobr element in scope, then
                // this is a parse error; run the adoption agency algorithm for the
                // token, then once again reconstruct the active formatting
                // elements, if any."
                if self.in_scope(Tag::Nobr) {
                    self.parse_error(TreeErrorKind::MisnestedFormatting, token);
                    if !self.run_adoption_agency(Tag::Nobr.id())? {
                        self.any_other_end_tag(token, Tag::Nobr.id());
                    }
                }
                self.insert_formatting_element(&tag)?;
            }

            // "A start tag whose tag name is one of: "applet", "marquee",
            // "object": Reconstruct the active formatting elements, if any.
            // Insert an HTML element for the token. Insert a marker at the end of
            // the list of active formatting elements. Set the frameset-ok flag to
            // "not ok"."
            Tag::Applet | Tag::Marquee | Tag::Object => {
                self.reconstruct_active_formatting_elements()?;
                let _ = self.insert_html_element(&tag)?;
                self.insert_marker();
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "table""
            Tag::Table => {
                // "If the Document is not set to quirks mode, and the stack of
                // open elements has a p element in button scope, then close a p
                // element."
                if self.document.compat_mode != CompatMode::Quirks {
                    self.close_p_if_in_button_scope();
                }
                let _ = self.insert_html_element(&tag)?;
                self.frameset_ok = false;
                self.insertion_mode = InsertionMode::InTable;
            }

            // "A start tag whose tag name is one of: "area", "br", "embed",
            // "img", "keygen", "wbr""
            Tag::Area | Tag::Br | Tag::Embed | Tag::Img | Tag::Keygen | Tag::Wbr => {
                self.reconstruct_active_formatting_elements()?;
                self.insert_void_element(&tag)?;
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "input""
            Tag::Input => {
                self.reconstruct_active_formatting_elements()?;
                self.insert_void_element(&tag)?;
                // "If the token does not have an attribute with the name "type", or
                // if it does, but that attribute's value is not an ASCII
                // case-insensitive match for the string "hidden", then: set the
                // frameset-ok flag to "not ok"."
                if !is_hidden_input(&tag) {
                    self.frameset_ok = false;
                }
            }

            // "A start tag whose tag name is one of: "param", "source", "track""
            Tag::Param | Tag::Source | Tag::Track => self.insert_void_element(&tag)?,

            // "A start tag whose tag name is "hr""
            Tag::Hr => {
                self.close_p_if_in_button_scope();
                self.insert_void_element(&tag)?;
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "textarea""
            Tag::Textarea => {
                let _ = self.insert_html_element(&tag)?;
                self.skip_next_newline = true;
                self.next_tokenizer_state = Some(TokenizerState::Rcdata);
                self.original_insertion_mode = Some(self.insertion_mode);
                self.frameset_ok = false;
                self.insertion_mode = InsertionMode::Text;
            }

            // "A start tag whose tag name is "xmp""
            Tag::Xmp => {
                self.close_p_if_in_button_scope();
                self.reconstruct_active_formatting_elements()?;
                self.frameset_ok = false;
                self.parse_text_element(&tag, TokenizerState::Rawtext)?;
            }

            // "A start tag whose tag name is "iframe""
            Tag::Iframe => {
                self.frameset_ok = false;
                self.parse_text_element(&tag, TokenizerState::Rawtext)?;
            }

            // "A start tag whose tag name is "noembed"" / "A start tag whose tag
            // name is "noscript", if the scripting flag is enabled"
            Tag::Noembed => self.parse_text_element(&tag, TokenizerState::Rawtext)?,
            Tag::Noscript if self.scripting => {
                self.parse_text_element(&tag, TokenizerState::Rawtext)?;
            }

            // "A start tag whose tag name is "select""
            Tag::Select => {
                self.reconstruct_active_formatting_elements()?;
                let _ = self.insert_html_element(&tag)?;
                self.frameset_ok = false;
                // "If the insertion mode is one of "in table", "in caption", "in
                // table body", "in row", or "in cell", then switch the insertion
                // mode to "in select in table". Otherwise, switch the insertion
                // mode to "in select"."
                self.insertion_mode = match self.insertion_mode {
                    InsertionMode::InTable
                    | InsertionMode::InCaption
                    | InsertionMode::InTableBody
                    | InsertionMode::InRow
                    | InsertionMode::InCell => InsertionMode::InSelectInTable,
                    _ => InsertionMode::InSelect,
                };
            }

            // "A start tag whose tag name is one of: "optgroup", "option""
            Tag::Optgroup | Tag::Option => {
                if self.current_node_is(Tag::Option) {
                    let _ = self.stack_of_open_elements.pop();
                }
                self.reconstruct_active_formatting_elements()?;
                let _ = self.insert_html_element(&tag)?;
            }

            // "A start tag whose tag name is one of: "rb", "rtc""
            Tag::Rb | Tag::Rtc => {
                if self.in_scope(Tag::Ruby) {
                    self.generate_implied_end_tags(None);
                    if !self.current_node_is(Tag::Ruby) {
                        self.parse_error(TreeErrorKind::UnexpectedStartTag, token);
                    }
                }
                let _ = self.insert_html_element(&tag)?;
            }

            // "A start tag whose tag name is one of: "rp", "rt""
            Tag::Rp | Tag::Rt => {
                if self.in_scope(Tag::Ruby) {
                    self.generate_implied_end_tags(Some(Tag::Rtc));
                    if !self.current_node_is_one_of(&[Tag::Rtc, Tag::Ruby]) {
                        self.parse_error(TreeErrorKind::UnexpectedStartTag, token);
                    }
                }
                let _ = self.insert_html_element(&tag)?;
            }

            // "A start tag whose tag name is "math"" / "svg": "Reconstruct the
            // active formatting elements, if any. Adjust MathML attributes for
            // the token. Adjust foreign attributes for the token. Insert a foreign
            // element for the token, with MathML namespace and false. If the
            // token has its self-closing flag set, pop the current node off the
            // stack of open elements and acknowledge the token's self-closing
            // flag."
            Tag::Math | Tag::Svg => {
                let namespace = if tag.name == Tag::Math {
                    Namespace::MathMl
                } else {
                    Namespace::Svg
                };
                self.reconstruct_active_formatting_elements()?;
                let _ = self.insert_foreign_element(&tag, namespace)?;
                if tag.self_closing {
                    let _ = self.stack_of_open_elements.pop();
                    self.self_closing_acknowledged = true;
                }
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "frame", "head", "tbody", "td", "tfoot", "th", "thead",
            // "tr": Parse error. Ignore the token."
            Tag::Caption
            | Tag::Col
            | Tag::Colgroup
            | Tag::Frame
            | Tag::Head
            | Tag::Tbody
            | Tag::Td
            | Tag::Tfoot
            | Tag::Th
            | Tag::Thead
            | Tag::Tr => self.parse_error(TreeErrorKind::UnexpectedStartTag, token),

            // "Any other start tag: Reconstruct the active formatting elements,
            // if any. Insert an HTML element for the token."
            _ => {
                self.reconstruct_active_formatting_elements()?;
                let _ = self.insert_html_element(&tag)?;
            }
        }
        Ok(true)
    }

    /// "A start tag whose tag name is "li"" and the "dd"/"dt" twin.
    fn list_item_start_tag(&mut self, tag: &TagToken, closes: &[Tag]) -> Result<(), ParserError> {
        // "Set the frameset-ok flag to "not ok"."
        self.frameset_ok = false;
        // "Initialize node to be the current node (the bottommost node of the
        // stack)."
        for index in (0..self.stack_of_open_elements.len()).rev() {
            let node = self.stack_of_open_elements[index];
            // "Loop: If node is an li element, then run these substeps: Generate
            // implied end tags, except for li elements. If the current node is
            // not an li element, then this is a parse error. Pop elements from
            // the stack of open elements until an li element has been popped from
            // the stack. Jump to the step labeled done below."
            if let Some(&found) = closes.iter().find(|&&t| self.is_html(node, t)) {
                self.generate_implied_end_tags(Some(found));
                if !self.current_node_is(found) {
                    self.parse_error_here(TreeErrorKind::UnclosedElement);
                }
                self.pop_until(found);
                break;
            }
            // "If node is in the special category, but is not an address, div,
            // or p element, then jump to the step labeled done below."
            if self.category_of(node).contains(TagCategory::SPECIAL)
                && !self.is_html_one_of(node, &[Tag::Address, Tag::Div, Tag::P])
            {
                break;
            }
        }
        // "Done: If the stack of open elements has a p element in button scope,
        // then close a p element. Finally, insert an HTML element for the token."
        self.close_p_if_in_button_scope();
        let _ = self.insert_html_element(tag)?;
        Ok(())
    }

    /// Reconstruct, insert, and push onto the list of active formatting
    /// elements.
    fn insert_formatting_element(&mut self, tag: &TagToken) -> Result<(), ParserError> {
        self.reconstruct_active_formatting_elements()?;
        let element = self.insert_html_element(tag)?;
        self.push_active_formatting_element(element);
        Ok(())
    }

    /// An HTML `tag` element in the list after the last marker.
    fn formatting_element_after_last_marker(&self, tag: Tag) -> Option<NodeId> {
        self.active_formatting_elements
            .iter()
            .rev()
            .take_while(|entry| **entry != ActiveFormattingElement::Marker)
            .find_map(|entry| match *entry {
                ActiveFormattingElement::Element(node) if self.is_html(node, tag) => Some(node),
                _ => None,
            })
    }

    /// Add the token's attributes the element does not have yet.
    fn merge_token_attributes(&mut self, element: NodeId, tag: &TagToken) {
        let attrs: Vec<_> = tag
            .attributes
            .iter()
            .map(|a| Attr::new(a.name, a.value.clone()))
            .collect();
        self.document.merge_attrs(element, &attrs);
    }

    fn in_body_end_tag(&mut self, token: &mut Token, name: TagId) -> Handled {
        match name.tag() {
            Tag::Template => return self.process_using_mode(InsertionMode::InHead, token),

            // "An end tag whose tag name is "body""
            Tag::Body => {
                // "If the stack of open elements does not have a body element in
                // scope, this is a parse error; ignore the token."
                if !self.in_scope(Tag::Body) {
                    self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
                    return Ok(true);
                }
                self.check_open_elements_at_end();
                // "Switch the insertion mode to "after body"."
                self.insertion_mode = InsertionMode::AfterBody;
            }

            // "An end tag whose tag name is "html""
            Tag::Html => {
                if !self.in_scope(Tag::Body) {
                    self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
                    return Ok(true);
                }
                self.check_open_elements_at_end();
                self.insertion_mode = InsertionMode::AfterBody;
                return Ok(false);
            }

            // "An end tag whose tag name is one of: "address", "article", "aside",
            // "blockquote", "button", "center", "details", "dialog", "dir", "div",
            // "dl", "fieldset", "figcaption", "figure", "footer", "header",
            // "hgroup", "listing", "main", "menu", "nav", "ol", "pre", "search",
            // "section", "summary", "ul""
            tag @ (Tag::Address
            | Tag::Article
            | Tag::Aside
            | Tag::Blockquote
            | Tag::Button
            | Tag::Center
            | Tag::Details
            | Tag::Dialog
            | Tag::Dir
            | Tag::Div
            | Tag::Dl
            | Tag::Fieldset
            | Tag::Figcaption
            | Tag::Figure
            | Tag::Footer
            | Tag::Header
            | Tag::Hgroup
            | Tag::Listing
            | Tag::Main
            | Tag::Menu
            | Tag::Nav
            | Tag::Ol
            | Tag::Pre
            | Tag::Search
            | Tag::Section
            | Tag::Summary
            | Tag::Ul) => {
                // "If the stack of open elements does not have an element in scope
                // that is an HTML element with the same tag name as that of the
                // token, then this is a parse error; ignore the token."
                if !self.in_scope(tag) {
                    self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
                    return Ok(true);
                }
                self.close_element(token, tag, None);
            }

            // "An end tag whose tag name is "form""
            Tag::Form => {
                if self.template_on_stack() {
                    if !self.in_scope(Tag::Form) {
                        self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
                        return Ok(true);
                    }
                    self.close_element(token, Tag::Form, None);
                    return Ok(true);
                }
                // "Let node be the element that the form element pointer is set
                // to, or null if it is not set to an element. Set the form
                // element pointer to null."
                let node = self.form_element_pointer.take();
                // "If node is null or if the stack of open elements does not have
                // node in scope, then this is a parse error; return and ignore the
                // token."
                let Some(node) =
                    node.filter(|&n| self.element_in_scope_by_node(n, TagCategory::SCOPE))
                else {
                    self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
                    return Ok(true);
                };
                self.generate_implied_end_tags(None);
                if self.current_node() != Some(node) {
                    self.parse_error(TreeErrorKind::UnclosedElement, token);
                }
                // "Remove node from the stack of open elements."
                self.remove_from_stack(node);
            }

            // "An end tag whose tag name is "p""
            Tag::P => {
                // "If the stack of open elements does not have a p element in
                // button scope, then this is a parse error; insert an HTML element
                // for a "p" start tag token with no attributes."
                if !self.in_button_scope(Tag::P) {
                    self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
                    let _ = self.insert_synthetic_element(Tag::P)?;
                }
                self.close_p_element();
            }

            // "An end tag whose tag name is "li""
            Tag::Li => {
                if !self.element_in_scope(Tag::Li, TagCategory::SCOPE_LIST_ITEM) {
                    self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
                    return Ok(true);
                }
                self.close_element(token, Tag::Li, Some(Tag::Li));
            }

            // "An end tag whose tag name is one of: "dd", "dt""
            tag @ (Tag::Dd | Tag::Dt) => {
                if !self.in_scope(tag) {
                    self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
                    return Ok(true);
                }
                self.close_element(token, tag, Some(tag));
            }

            // "An end tag whose tag name is one of: "h1", "h2", "h3", "h4", "h5",
            // "h6""
            tag @ (Tag::H1 | Tag::H2 | Tag::H3 | Tag::H4 | Tag::H5 | Tag::H6) => {
                if !self.heading_in_scope() {
                    self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
                    return Ok(true);
                }
                self.generate_implied_end_tags(None);
                if !self.current_node_is(tag) {
                    self.parse_error(TreeErrorKind::UnclosedElement, token);
                }
                self.pop_until_one_of(HEADINGS);
            }

            // "An end tag whose tag name is one of: "a", "b", "big", "code",
            // "em", "font", "i", "nobr", "s", "small", "strike", "strong", "tt",
            // "u": Run the adoption agency algorithm for the token."
            Tag::A
            | Tag::B
            | Tag::Big
            | Tag::Code
            | Tag::Em
            | Tag::Font
            | Tag::I
            | Tag::Nobr
            | Tag::S
            | Tag::Small
            | Tag::Strike
            | Tag::Strong
            | Tag::Tt
            | Tag::U => {
                if !self.run_adoption_agency(name)? {
                    self.any_other_end_tag(token, name);
                }
            }

            // "An end tag token whose tag name is one of: "applet", "marquee",
            // "object""
            tag @ (Tag::Applet | Tag::Marquee | Tag::Object) => {
                if !self.in_scope(tag) {
                    self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
                    return Ok(true);
                }
                self.close_element(token, tag, None);
                self.clear_active_formatting_elements_to_last_marker();
            }

            // "An end tag whose tag name is "br": Parse error. Drop the attributes
            // from the token, and act as described in the next entry; i.e. act as
            // if this was a "br" start tag token with no attributes, rather than
            // the end tag token that it actually is."
            Tag::Br => {
                self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
                self.reconstruct_active_formatting_elements()?;
                self.insert_void_element(&TagToken::new(Tag::Br.id()))?;
                self.frameset_ok = false;
            }

            _ => self.any_other_end_tag(token, name),
        }
        Ok(true)
    }

    /// "Generate implied end tags[, except for `except`]. If the current node
    /// is not an HTML element with the same tag name as that of the token,
    /// then this is a parse error. Pop elements from the stack of open
    /// elements until an HTML element with the same tag name as the token has
    /// been popped from the stack."
    fn close_element(&mut self, token: &Token, tag: Tag, except: Option<Tag>) {
        self.generate_implied_end_tags(except);
        if !self.current_node_is(tag) {
            self.parse_error(TreeErrorKind::UnclosedElement, token);
        }
        self.pop_until(tag);
    }

    /// "Any other end tag"
    pub(in crate::parser) fn any_other_end_tag(&mut self, token: &Token, name: TagId) {
        for index in (0..self.stack_of_open_elements.len()).rev() {
            let node = self.stack_of_open_elements[index];
            // "If node is an HTML element with the same tag name as the token,
            // then: Generate implied end tags, except for HTML elements with the
            // same tag name as the token. If node is not the current node, then
            // this is a parse error. Pop all the nodes from the current node up
            // to node, including node, then stop these steps."
            let same = self
                .element(node)
                .is_some_and(|e| e.namespace == Namespace::Html && e.tag == name);
            if same {
                while let Some(current) = self.current_node() {
                    let implied = self.identity(current) != Some((name, Namespace::Html))
                        && self.is_html_one_of(
                            current,
                            &[
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
                            ],
                        );
                    if !implied {
                        break;
                    }
                    let _ = self.stack_of_open_elements.pop();
                }
                if self.current_node() != Some(node) {
                    self.parse_error(TreeErrorKind::UnclosedElement, token);
                }
                self.pop_until_node(node);
                return;
            }
            // "Otherwise, if node is in the special category, then this is a
            // parse error; ignore the token, and return."
            if self.category_of(node).contains(TagCategory::SPECIAL) {
                self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
                return;
            }
        }
    }

    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    pub(in crate::parser) fn handle_text_mode(&mut self, token: &mut Token) -> Handled {
        let original = self.original_insertion_mode.unwrap_or(InsertionMode::InBody);
        match &*token {
            // "A character token: Insert the token's character."
            Token::Character(run) => self.insert_character(&run.text_replace_null())?,
            // "An end-of-file token: Parse error. ... Pop the current node off
            // the stack of open elements. Switch the insertion mode to the
            // original insertion mode and reprocess the token."
            Token::EndOfFile => {
                self.parse_error_here(TreeErrorKind::UnexpectedEof);
                let _ = self.stack_of_open_elements.pop();
                self.original_insertion_mode = None;
                self.insertion_mode = original;
                return Ok(false);
            }
            // "An end tag whose tag name is "script"" / "Any other end tag": "Pop
            // the current node off the stack of open elements. Switch the
            // insertion mode to the original insertion mode."
            Token::EndTag(_) => {
                let _ = self.stack_of_open_elements.pop();
                self.original_insertion_mode = None;
                self.insertion_mode = original;
            }
            Token::StartTag(_) | Token::Comment(_) | Token::Doctype(_) => {}
        }
        Ok(true)
    }
}

/// Whether an `<input>` token has `type=hidden`.
pub(in crate::parser) fn is_hidden_input(tag: &TagToken) -> bool {
    tag.attr(AttrId::TYPE)
        .is_some_and(|value| value.eq_ignore_ascii_case("hidden"))
}
