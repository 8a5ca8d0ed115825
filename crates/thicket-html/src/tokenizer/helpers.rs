//! Helper functions for the HTML tokenizer.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! This module contains utility functions used throughout the tokenizer:
//! - State transitions ("Switch to", "Reconsume in")
//! - Token emission ("Emit the current token"), with character coalescing
//! - Tag and attribute builders, interned when the tag is emitted
//! - Parse error recording

use super::core::{HTMLTokenizer, TagBuilder, TokenizerState};
use super::token::{Attribute, CharacterRun, TagToken, Token};
use crate::error::{ErrorKind, ParseError, TokenizerErrorKind};

// =============================================================================
// State Transition Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Switch to the X state"
    ///
    /// The next character will be consumed on the next iteration of the
    /// main loop.
    pub(super) const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }

    /// "Reconsume in the X state"
    ///
    /// The same character will be processed again in the new state.
    pub(super) const fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.reconsume = true;
        self.state = new_state;
    }

    /// Stop the main loop until more input arrives. The current character is
    /// handed to the same state again on resumption, so callers must not have
    /// changed anything before suspending.
    pub(super) const fn suspend(&mut self) {
        self.suspended = true;
    }

    /// "Set the return state" counterpart: the state a character reference
    /// flushes into.
    pub(super) fn take_return_state(&mut self) -> TokenizerState {
        self.return_state.take().unwrap_or(TokenizerState::Data)
    }

    /// [§ 13.2.5.72](https://html.spec.whatwg.org/multipage/parsing.html#charref-in-attribute)
    ///
    /// "A character reference is said to be consumed as part of an attribute
    /// if the return state is either attribute value (double-quoted) state,
    /// attribute value (single-quoted) state, or attribute value (unquoted) state."
    pub(super) fn consumed_as_part_of_attribute(&self) -> bool {
        matches!(
            self.return_state,
            Some(
                TokenizerState::AttributeValueDoubleQuoted
                    | TokenizerState::AttributeValueSingleQuoted
                    | TokenizerState::AttributeValueUnquoted
            )
        )
    }
}

// =============================================================================
// Token Emission Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Emit the current input character as a character token."
    ///
    /// Characters collect in a pending run until another token is emitted,
    /// so chunk boundaries never split a run. A run only holds NULs of one
    /// kind.
    pub(super) fn emit_char(&mut self, c: char) {
        if c == '\0' {
            let replaced = self.state.replaces_null();
            if self.pending_nulls > 0 && self.pending_nulls_replaced != replaced {
                self.flush_text();
            }
            self.pending_nulls += 1;
            self.pending_nulls_replaced = replaced;
        }
        self.pending_text.push(c);
        self.pending_text_end = self.input.position();
    }

    /// Emit every character of `text`.
    pub(super) fn emit_str(&mut self, text: &str) {
        for c in text.chars() {
            self.emit_char(c);
        }
    }

    /// Queue the pending character run, if any.
    pub(super) fn flush_text(&mut self) {
        if self.pending_text.is_empty() {
            return;
        }
        let run = CharacterRun {
            data: std::mem::take(&mut self.pending_text),
            null_count: std::mem::take(&mut self.pending_nulls),
            nulls_replaced: std::mem::take(&mut self.pending_nulls_replaced),
        };
        self.queue.push_back((Token::Character(run), self.pending_text_end));
    }

    fn emit(&mut self, token: Token) {
        self.flush_text();
        self.queue.push_back((token, self.input.position()));
    }

    /// "Emit an end-of-file token."
    pub(super) fn emit_eof(&mut self) {
        self.emit(Token::EndOfFile);
    }

    /// "Emit the current comment token."
    pub(super) fn emit_current_comment(&mut self) {
        let data = std::mem::take(&mut self.current_comment);
        self.emit(Token::Comment(data));
    }

    /// "Emit the current DOCTYPE token."
    pub(super) fn emit_current_doctype(&mut self) {
        let doctype = std::mem::take(&mut self.current_doctype);
        self.emit(Token::Doctype(doctype));
    }

    /// "Emit the current tag token."
    ///
    /// Names are interned here. An end tag with attributes or a trailing
    /// solidus is a parse error; its attributes are dropped.
    pub(super) fn emit_current_tag(&mut self) {
        let builder = std::mem::take(&mut self.current_tag);
        let TagBuilder {
            is_end,
            name,
            self_closing,
            attributes,
            current_is_duplicate,
        } = builder;

        let mut attributes = attributes;
        if current_is_duplicate {
            let _ = attributes.pop();
        }

        if is_end {
            if !attributes.is_empty() {
                self.parse_error(TokenizerErrorKind::EndTagWithAttributes);
            }
            if self_closing {
                self.parse_error(TokenizerErrorKind::EndTagWithTrailingSolidus);
            }
        }

        let token = {
            let mut interner = self.interner.borrow_mut();
            let mut tag = TagToken::new(interner.intern_tag(&name));
            tag.self_closing = self_closing;
            if !is_end {
                tag.attributes = attributes
                    .into_iter()
                    .map(|(attr_name, value)| Attribute::new(interner.intern_attr(&attr_name), value))
                    .collect();
            }
            tag
        };

        if is_end {
            self.emit(Token::EndTag(token));
        } else {
            self.last_start_tag_name = Some(name);
            self.emit(Token::StartTag(token));
        }
    }
}

// =============================================================================
// Tag and Attribute Builders
// =============================================================================

impl HTMLTokenizer {
    /// "Create a new start tag token" / "Create a new end tag token", with
    /// the tag name set to the empty string.
    pub(super) fn create_tag(&mut self, is_end: bool) {
        self.current_tag = TagBuilder {
            is_end,
            ..TagBuilder::default()
        };
    }

    /// "Start a new attribute in the current tag token."
    pub(super) fn start_attribute(&mut self) {
        if self.current_tag.current_is_duplicate {
            let _ = self.current_tag.attributes.pop();
            self.current_tag.current_is_duplicate = false;
        }
        self.current_tag
            .attributes
            .push((String::new(), String::new()));
    }

    pub(super) fn push_attribute_name(&mut self, c: char) {
        if let Some((name, _)) = self.current_tag.attributes.last_mut() {
            name.push(c);
        }
    }

    pub(super) fn push_attribute_value(&mut self, c: char) {
        if let Some((_, value)) = self.current_tag.attributes.last_mut() {
            value.push(c);
        }
    }

    pub(super) fn push_attribute_value_str(&mut self, s: &str) {
        if let Some((_, value)) = self.current_tag.attributes.last_mut() {
            value.push_str(s);
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    ///
    /// "When the user agent leaves the attribute name state... if there is
    /// already an attribute on the token with the exact same name, then this
    /// is a duplicate-attribute parse error and the new attribute must be
    /// removed from the token."
    ///
    /// The value still gets parsed, so the attribute is only flagged here and
    /// dropped when the next attribute starts or the tag is emitted.
    pub(super) fn check_duplicate_attribute(&mut self) {
        let attributes = &self.current_tag.attributes;
        let Some(((current, _), earlier)) = attributes.split_last() else {
            return;
        };
        if earlier.iter().any(|(name, _)| name == current) {
            self.current_tag.current_is_duplicate = true;
            self.parse_error(TokenizerErrorKind::DuplicateAttribute);
        }
    }

    /// "An appropriate end tag token is an end tag token whose tag name
    /// matches the tag name of the last start tag to have been emitted from
    /// this tokenizer, if any."
    pub(super) fn is_appropriate_end_tag_token(&self) -> bool {
        self.current_tag.is_end
            && self
                .last_start_tag_name
                .as_deref()
                .is_some_and(|last| last == self.current_tag.name)
    }

    /// The "anything else" branch of the RCDATA, RAWTEXT and script end tag
    /// name states: "Emit a U+003C LESS-THAN SIGN character token, a U+002F
    /// SOLIDUS character token, and a character token for each of the
    /// characters in the temporary buffer (in the order they were added to
    /// the buffer). Reconsume in the ... state."
    pub(super) fn abandon_end_tag(&mut self, text_state: TokenizerState) {
        self.emit_char('<');
        self.emit_char('/');
        let buffer = std::mem::take(&mut self.temporary_buffer);
        self.emit_str(&buffer);
        self.current_tag = TagBuilder::default();
        self.reconsume_in(text_state);
    }
}

// =============================================================================
// Error Handling
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
    ///
    /// Parse errors in HTML are not fatal; the error is recorded and the
    /// tokenizer carries on with the recovery the state prescribes.
    pub(super) fn parse_error(&mut self, kind: TokenizerErrorKind) {
        self.errors.push(ParseError {
            kind: ErrorKind::Tokenizer(kind),
            position: self.input.position(),
            token: None,
        });
    }
}
