//! The closing modes: after body, in frameset, after frameset, after after
//! body and after after frameset.

use thicket_dom::{NodeId, Tag};

use crate::error::TreeErrorKind;
use crate::parser::core::{Handled, InsertionMode, TreeConstructor};
use crate::tokenizer::token::is_html_whitespace;
use crate::tokenizer::{CharacterRun, Token};

impl TreeConstructor {
    /// Frameset documents keep only whitespace text. Everything else in the
    /// run is a parse error and is dropped.
    fn insert_frameset_whitespace(&mut self, run: &CharacterRun) -> Handled {
        let whitespace: String = run.data.chars().filter(|&c| is_html_whitespace(c)).collect();
        if whitespace.len() != run.data.len() {
            self.parse_error_here(TreeErrorKind::UnexpectedCharacter);
        }
        if !whitespace.is_empty() {
            self.insert_character(&whitespace)?;
        }
        Ok(true)
    }

    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    pub(in crate::parser) fn handle_after_body_mode(&mut self, token: &mut Token) -> Handled {
        if self.whitespace_using_in_body(token)? {
            return Ok(true);
        }
        match &*token {
            // "A comment token: Insert a comment as the last child of the first
            // element in the stack of open elements (the html element)."
            Token::Comment(data) => {
                let html = self.stack_of_open_elements.first().copied();
                self.insert_comment(data, html)?;
            }
            Token::Doctype(_) => self.parse_error(TreeErrorKind::UnexpectedDoctype, token),
            Token::StartTag(tag) if tag.name == Tag::Html => {
                return self.process_using_mode(InsertionMode::InBody, token);
            }

            // "An end tag whose tag name is "html": If the parser was created as
            // part of the HTML fragment parsing algorithm, this is a parse error;
            // ignore the token. (fragment case) Otherwise, switch the insertion
            // mode to "after after body"."
            Token::EndTag(tag) if tag.name == Tag::Html => {
                if self.fragment.is_some() {
                    self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
                } else {
                    self.insertion_mode = InsertionMode::AfterAfterBody;
                }
            }

            Token::EndOfFile => self.stop_parsing(),

            // "Anything else: Parse error. Switch the insertion mode to "in body"
            // and reprocess the token."
            _ => {
                self.parse_error(TreeErrorKind::UnexpectedStartTag, token);
                self.insertion_mode = InsertionMode::InBody;
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    pub(in crate::parser) fn handle_in_frameset_mode(&mut self, token: &mut Token) -> Handled {
        match &*token {
            Token::Character(run) => return self.insert_frameset_whitespace(run),
            Token::Comment(data) => self.insert_comment(data, None)?,
            Token::Doctype(_) => self.parse_error(TreeErrorKind::UnexpectedDoctype, token),
            Token::StartTag(tag) if tag.name == Tag::Html => {
                return self.process_using_mode(InsertionMode::InBody, token);
            }
            Token::StartTag(tag) if tag.name == Tag::Frameset => {
                let _ = self.insert_html_element(tag)?;
            }

            // "An end tag whose tag name is "frameset""
            Token::EndTag(tag) if tag.name == Tag::Frameset => {
                // "If the current node is the root html element, then this is a
                // parse error; ignore the token. (fragment case)"
                if self.stack_of_open_elements.len() <= 1 {
                    self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
                    return Ok(true);
                }
                // "Otherwise, pop the current node from the stack of open
                // elements. If the parser was not created as part of the HTML
                // fragment parsing algorithm (fragment case), and the current node
                // is no longer a frameset element, then switch the insertion mode
                // to "after frameset"."
                let _ = self.stack_of_open_elements.pop();
                if self.fragment.is_none() && !self.current_node_is(Tag::Frameset) {
                    self.insertion_mode = InsertionMode::AfterFrameset;
                }
            }

            // "A start tag whose tag name is "frame": Insert an HTML element for
            // the token. Immediately pop the current node off the stack of open
            // elements. Acknowledge the token's self-closing flag, if it is set."
            Token::StartTag(tag) if tag.name == Tag::Frame => self.insert_void_element(tag)?,

            Token::StartTag(tag) if tag.name == Tag::Noframes => {
                return self.process_using_mode(InsertionMode::InHead, token);
            }

            // "An end-of-file token: If the current node is not the root html
            // element, then this is a parse error. Note: The current node can
            // only be the root html element in the fragment case. Stop parsing."
            Token::EndOfFile => {
                if self.stack_of_open_elements.len() > 1 {
                    self.parse_error(TreeErrorKind::UnexpectedEof, token);
                }
                self.stop_parsing();
            }

            Token::StartTag(_) => self.parse_error(TreeErrorKind::UnexpectedStartTag, token),
            Token::EndTag(_) => self.parse_error(TreeErrorKind::UnexpectedEndTag, token),
        }
        Ok(true)
    }

    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    pub(in crate::parser) fn handle_after_frameset_mode(&mut self, token: &mut Token) -> Handled {
        match &*token {
            Token::Character(run) => return self.insert_frameset_whitespace(run),
            Token::Comment(data) => self.insert_comment(data, None)?,
            Token::Doctype(_) => self.parse_error(TreeErrorKind::UnexpectedDoctype, token),
            Token::StartTag(tag) if tag.name == Tag::Html => {
                return self.process_using_mode(InsertionMode::InBody, token);
            }
            Token::EndTag(tag) if tag.name == Tag::Html => {
                self.insertion_mode = InsertionMode::AfterAfterFrameset;
            }
            Token::StartTag(tag) if tag.name == Tag::Noframes => {
                return self.process_using_mode(InsertionMode::InHead, token);
            }
            Token::EndOfFile => self.stop_parsing(),
            Token::StartTag(_) => self.parse_error(TreeErrorKind::UnexpectedStartTag, token),
            Token::EndTag(_) => self.parse_error(TreeErrorKind::UnexpectedEndTag, token),
        }
        Ok(true)
    }

    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    pub(in crate::parser) fn handle_after_after_body_mode(&mut self, token: &mut Token) -> Handled {
        if self.whitespace_using_in_body(token)? {
            return Ok(true);
        }
        match &*token {
            // "A comment token: Insert a comment as the last child of the Document
            // object."
            Token::Comment(data) => self.insert_comment(data, Some(NodeId::ROOT))?,
            Token::Doctype(_) => return self.process_using_mode(InsertionMode::InBody, token),
            Token::StartTag(tag) if tag.name == Tag::Html => {
                return self.process_using_mode(InsertionMode::InBody, token);
            }
            Token::EndOfFile => self.stop_parsing(),
            _ => {
                self.parse_error(TreeErrorKind::UnexpectedStartTag, token);
                self.insertion_mode = InsertionMode::InBody;
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    pub(in crate::parser) fn handle_after_after_frameset_mode(&mut self, token: &mut Token) -> Handled {
        if self.whitespace_using_in_body(token)? {
            return Ok(true);
        }
        match &*token {
            Token::Comment(data) => self.insert_comment(data, Some(NodeId::ROOT))?,
            Token::Doctype(_) => return self.process_using_mode(InsertionMode::InBody, token),
            Token::StartTag(tag) if tag.name == Tag::Html || tag.name == Tag::Noframes => {
                let mode = if tag.name == Tag::Html {
                    InsertionMode::InBody
                } else {
                    InsertionMode::InHead
                };
                return self.process_using_mode(mode, token);
            }
            Token::EndOfFile => self.stop_parsing(),
            Token::Character(_) => self.parse_error(TreeErrorKind::UnexpectedCharacter, token),
            Token::StartTag(_) => self.parse_error(TreeErrorKind::UnexpectedStartTag, token),
            Token::EndTag(_) => self.parse_error(TreeErrorKind::UnexpectedEndTag, token),
        }
        Ok(true)
    }
}
