//! The modes before `<body>`: initial, before html, before head, in head,
//! in head noscript and after head.

use thicket_dom::{CompatMode, Namespace, NodeId, Tag};

use super::{is_end, is_start};
use crate::error::TreeErrorKind;
use crate::parser::core::{Handled, InsertionMode, TreeConstructor};
use crate::parser::quirks;
use crate::tokenizer::{Token, TokenizerState};

impl TreeConstructor {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    pub(in crate::parser) fn handle_initial_mode(&mut self, token: &mut Token) -> Handled {
        // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A
        // LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or
        // U+0020 SPACE: Ignore the token."
        if Self::ignore_leading_whitespace(token) {
            return Ok(true);
        }
        match &*token {
            // "A comment token: Insert a comment as the last child of the Document
            // object."
            Token::Comment(data) => self.insert_comment(data, Some(NodeId::ROOT))?,

            // "A DOCTYPE token"
            Token::Doctype(doctype) => {
                if !quirks::is_conforming(doctype) {
                    self.parse_error(TreeErrorKind::NonConformingDoctype, token);
                }
                self.insert_doctype(doctype)?;
                self.document.compat_mode = quirks::compat_mode_for(doctype);
                self.insertion_mode = InsertionMode::BeforeHtml;
            }

            // "Anything else: If the document is not an iframe srcdoc document,
            // then this is a parse error; if the parser cannot change the mode
            // flag is false, set the Document to quirks mode. In any case, switch
            // the insertion mode to "before html", then reprocess the token."
            _ => {
                self.parse_error(TreeErrorKind::MissingDoctype, token);
                self.document.compat_mode = CompatMode::Quirks;
                self.insertion_mode = InsertionMode::BeforeHtml;
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    pub(in crate::parser) fn handle_before_html_mode(&mut self, token: &mut Token) -> Handled {
        if Self::ignore_leading_whitespace(token) {
            return Ok(true);
        }
        match &*token {
            Token::Doctype(_) => self.parse_error(TreeErrorKind::UnexpectedDoctype, token),
            Token::Comment(data) => self.insert_comment(data, Some(NodeId::ROOT))?,

            // "A start tag whose tag name is "html": Create an element for the
            // token in the HTML namespace, with the Document as the intended
            // parent. Append it to the Document object. Put this element in the
            // stack of open elements. Switch the insertion mode to "before head"."
            Token::StartTag(tag) if tag.name == Tag::Html => {
                let html = self.create_element_for_token(tag, Namespace::Html)?;
                self.document.insert_as_last_child(NodeId::ROOT, html);
                self.stack_of_open_elements.push(html);
                self.insertion_mode = InsertionMode::BeforeHead;
            }

            // "Any other end tag: Parse error. Ignore the token."
            Token::EndTag(_) if !is_end(token, &[Tag::Head, Tag::Body, Tag::Html, Tag::Br]) => {
                self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
            }

            // "Anything else: Create an html element whose node document is the
            // Document object. Append it to the Document object. Put this element
            // in the stack of open elements. Switch the insertion mode to "before
            // head", then reprocess the token."
            _ => {
                let html = self
                    .document
                    .create_element(Tag::Html.id(), Namespace::Html, Vec::new())?;
                self.document.insert_as_last_child(NodeId::ROOT, html);
                self.stack_of_open_elements.push(html);
                self.insertion_mode = InsertionMode::BeforeHead;
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    pub(in crate::parser) fn handle_before_head_mode(&mut self, token: &mut Token) -> Handled {
        if Self::ignore_leading_whitespace(token) {
            return Ok(true);
        }
        match &*token {
            Token::Comment(data) => self.insert_comment(data, None)?,
            Token::Doctype(_) => self.parse_error(TreeErrorKind::UnexpectedDoctype, token),
            Token::StartTag(tag) if tag.name == Tag::Html => {
                return self.process_using_mode(InsertionMode::InBody, token);
            }

            // "A start tag whose tag name is "head": Insert an HTML element for
            // the token. Set the head element pointer to the newly created head
            // element. Switch the insertion mode to "in head"."
            Token::StartTag(tag) if tag.name == Tag::Head => {
                let head = self.insert_html_element(tag)?;
                self.head_element_pointer = Some(head);
                self.insertion_mode = InsertionMode::InHead;
            }

            Token::EndTag(_) if !is_end(token, &[Tag::Head, Tag::Body, Tag::Html, Tag::Br]) => {
                self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
            }

            // "Anything else: Insert an HTML element for a "head" start tag token
            // with no attributes. Set the head element pointer to the newly
            // created head element. Switch the insertion mode to "in head".
            // Reprocess the current token."
            _ => {
                let head = self.insert_synthetic_element(Tag::Head)?;
                self.head_element_pointer = Some(head);
                self.insertion_mode = InsertionMode::InHead;
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    pub(in crate::parser) fn handle_in_head_mode(&mut self, token: &mut Token) -> Handled {
        if self.insert_leading_whitespace(token)? {
            return Ok(true);
        }
        match &*token {
            Token::Comment(data) => self.insert_comment(data, None)?,
            Token::Doctype(_) => self.parse_error(TreeErrorKind::UnexpectedDoctype, token),
            Token::StartTag(tag) if tag.name == Tag::Html => {
                return self.process_using_mode(InsertionMode::InBody, token);
            }

            // "A start tag whose tag name is one of: "base", "basefont",
            // "bgsound", "link"" / "A start tag whose tag name is "meta"":
            // "Insert an HTML element for the token. Immediately pop the current
            // node off the stack of open elements. Acknowledge the token's
            // self-closing flag, if it is set."
            Token::StartTag(tag)
                if matches!(
                    tag.name.tag(),
                    Tag::Base | Tag::Basefont | Tag::Bgsound | Tag::Link | Tag::Meta
                ) =>
            {
                self.insert_void_element(tag)?;
            }

            // "A start tag whose tag name is "title": Follow the generic RCDATA
            // element parsing algorithm."
            Token::StartTag(tag) if tag.name == Tag::Title => {
                self.parse_text_element(tag, TokenizerState::Rcdata)?;
            }

            // "A start tag whose tag name is "noscript", if the scripting flag is
            // enabled" / "A start tag whose tag name is one of: "noframes",
            // "style"": "Follow the generic raw text element parsing algorithm."
            Token::StartTag(tag)
                if tag.name == Tag::Noframes
                    || tag.name == Tag::Style
                    || (tag.name == Tag::Noscript && self.scripting) =>
            {
                self.parse_text_element(tag, TokenizerState::Rawtext)?;
            }

            // "A start tag whose tag name is "noscript", if the scripting flag is
            // disabled: Insert an HTML element for the token. Switch the
            // insertion mode to "in head noscript"."
            Token::StartTag(tag) if tag.name == Tag::Noscript => {
                let _ = self.insert_html_element(tag)?;
                self.insertion_mode = InsertionMode::InHeadNoscript;
            }

            // "A start tag whose tag name is "script"": insert the element at
            // the appropriate place, "Switch the tokenizer to the script data
            // state. Let the original insertion mode be the current insertion
            // mode. Switch the insertion mode to "text"."
            Token::StartTag(tag) if tag.name == Tag::Script => {
                self.parse_text_element(tag, TokenizerState::ScriptData)?;
            }

            // "An end tag whose tag name is "head": Pop the current node (which
            // will be the head element) off the stack of open elements. Switch
            // the insertion mode to "after head"."
            Token::EndTag(tag) if tag.name == Tag::Head => {
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = InsertionMode::AfterHead;
            }

            // "A start tag whose tag name is "template""
            Token::StartTag(tag) if tag.name == Tag::Template => {
                let _ = self.insert_html_element(tag)?;
                // "Insert a marker at the end of the list of active formatting
                // elements. Set the frameset-ok flag to "not ok". Switch the
                // insertion mode to "in template". Push "in template" onto the
                // stack of template insertion modes so that it is the new current
                // template insertion mode."
                self.insert_marker();
                self.frameset_ok = false;
                self.insertion_mode = InsertionMode::InTemplate;
                self.template_insertion_modes.push(InsertionMode::InTemplate);
            }

            // "An end tag whose tag name is "template""
            Token::EndTag(tag) if tag.name == Tag::Template => {
                if !self.template_on_stack() {
                    self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
                    return Ok(true);
                }
                self.generate_all_implied_end_tags_thoroughly();
                if !self.current_node_is(Tag::Template) {
                    self.parse_error(TreeErrorKind::UnclosedElement, token);
                }
                self.pop_until(Tag::Template);
                self.clear_active_formatting_elements_to_last_marker();
                let _ = self.template_insertion_modes.pop();
                self.reset_insertion_mode_appropriately();
            }

            // "A start tag whose tag name is "head"" / "Any other end tag":
            // "Parse error. Ignore the token."
            Token::StartTag(tag) if tag.name == Tag::Head => {
                self.parse_error(TreeErrorKind::UnexpectedStartTag, token);
            }
            Token::EndTag(_) if !is_end(token, &[Tag::Body, Tag::Html, Tag::Br]) => {
                self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
            }

            // "Anything else: Pop the current node (which will be the head
            // element) off the stack of open elements. Switch the insertion mode
            // to "after head". Reprocess the token."
            _ => {
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = InsertionMode::AfterHead;
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    pub(in crate::parser) fn handle_in_head_noscript_mode(&mut self, token: &mut Token) -> Handled {
        // "A character token that is one of U+0009 ... U+0020 SPACE: Process the
        // token using the rules for the "in head" insertion mode."
        if self.insert_leading_whitespace(token)? {
            return Ok(true);
        }
        match &*token {
            Token::Doctype(_) => self.parse_error(TreeErrorKind::UnexpectedDoctype, token),
            Token::StartTag(tag) if tag.name == Tag::Html => {
                return self.process_using_mode(InsertionMode::InBody, token);
            }

            // "An end tag whose tag name is "noscript": Pop the current node
            // (which will be a noscript element) from the stack of open elements;
            // the new current node will be a head element. Switch the insertion
            // mode to "in head"."
            Token::EndTag(tag) if tag.name == Tag::Noscript => {
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = InsertionMode::InHead;
            }

            Token::Comment(_) => return self.process_using_mode(InsertionMode::InHead, token),
            _ if is_start(
                token,
                &[Tag::Basefont, Tag::Bgsound, Tag::Link, Tag::Meta, Tag::Noframes, Tag::Style],
            ) =>
            {
                return self.process_using_mode(InsertionMode::InHead, token);
            }

            Token::StartTag(tag) if tag.name == Tag::Head || tag.name == Tag::Noscript => {
                self.parse_error(TreeErrorKind::UnexpectedStartTag, token);
            }
            Token::EndTag(tag) if tag.name != Tag::Br => {
                self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
            }

            // "Anything else: Parse error. Pop the current node (which will be a
            // noscript element) from the stack of open elements; the new current
            // node will be a head element. Switch the insertion mode to "in head".
            // Reprocess the token."
            _ => {
                self.parse_error(TreeErrorKind::UnexpectedCharacter, token);
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = InsertionMode::InHead;
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    pub(in crate::parser) fn handle_after_head_mode(&mut self, token: &mut Token) -> Handled {
        if self.insert_leading_whitespace(token)? {
            return Ok(true);
        }
        match &*token {
            Token::Comment(data) => self.insert_comment(data, None)?,
            Token::Doctype(_) => self.parse_error(TreeErrorKind::UnexpectedDoctype, token),
            Token::StartTag(tag) if tag.name == Tag::Html => {
                return self.process_using_mode(InsertionMode::InBody, token);
            }

            // "A start tag whose tag name is "body": Insert an HTML element for
            // the token. Set the frameset-ok flag to "not ok". Switch the
            // insertion mode to "in body"."
            Token::StartTag(tag) if tag.name == Tag::Body => {
                let _ = self.insert_html_element(tag)?;
                self.frameset_ok = false;
                self.insertion_mode = InsertionMode::InBody;
            }

            // "A start tag whose tag name is "frameset": Insert an HTML element
            // for the token. Switch the insertion mode to "in frameset"."
            Token::StartTag(tag) if tag.name == Tag::Frameset => {
                let _ = self.insert_html_element(tag)?;
                self.insertion_mode = InsertionMode::InFrameset;
            }

            // "A start tag whose tag name is one of: "base", "basefont",
            // "bgsound", "link", "meta", "noframes", "script", "style",
            // "template", "title": Parse error. Push the node pointed to by the
            // head element pointer onto the stack of open elements. Process the
            // token using the rules for the "in head" insertion mode. Remove the
            // node pointed to by the head element pointer from the stack of open
            // elements. (It might not be the current node at this point.)"
            Token::StartTag(tag)
                if matches!(
                    tag.name.tag(),
                    Tag::Base
                        | Tag::Basefont
                        | Tag::Bgsound
                        | Tag::Link
                        | Tag::Meta
                        | Tag::Noframes
                        | Tag::Script
                        | Tag::Style
                        | Tag::Template
                        | Tag::Title
                ) =>
            {
                self.parse_error(TreeErrorKind::UnexpectedStartTag, token);
                let Some(head) = self.head_element_pointer else {
                    return self.process_using_mode(InsertionMode::InHead, token);
                };
                self.stack_of_open_elements.push(head);
                let handled = self.process_using_mode(InsertionMode::InHead, token)?;
                self.remove_from_stack(head);
                return Ok(handled);
            }

            Token::EndTag(tag) if tag.name == Tag::Template => {
                return self.process_using_mode(InsertionMode::InHead, token);
            }

            Token::StartTag(tag) if tag.name == Tag::Head => {
                self.parse_error(TreeErrorKind::UnexpectedStartTag, token);
            }
            Token::EndTag(_) if !is_end(token, &[Tag::Body, Tag::Html, Tag::Br]) => {
                self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
            }

            // "Anything else: Insert an HTML element for a "body" start tag token
            // with no attributes. Switch the insertion mode to "in body".
            // Reprocess the current token."
            _ => {
                let _ = self.insert_synthetic_element(Tag::Body)?;
                self.insertion_mode = InsertionMode::InBody;
                return Ok(false);
            }
        }
        Ok(true)
    }
}
