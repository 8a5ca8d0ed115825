//! Insertion mode handlers, [§ 13.2.6.4](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhtml).
//!
//! Every handler takes the token mutably (character runs are split in
//! place) and returns [`Handled`](super::core::Handled).

mod after;
mod body;
mod head;
mod select;
mod table;
mod template;

use thicket_dom::Tag;

use super::core::{InsertionMode, TreeConstructor};
use crate::error::ParserError;
use crate::tokenizer::{CharacterRun, TagToken, Token};

impl TreeConstructor {
    /// Insert an element that is popped right away, acknowledging its
    /// self-closing flag.
    pub(super) fn insert_void_element(&mut self, tag: &TagToken) -> Result<(), ParserError> {
        let _ = self.insert_html_element(tag)?;
        let _ = self.stack_of_open_elements.pop();
        self.self_closing_acknowledged = true;
        Ok(())
    }

    /// Handle leading whitespace of a character token with the "in body"
    /// rules. Returns `true` when nothing is left of the token.
    pub(super) fn whitespace_using_in_body(&mut self, token: &mut Token) -> Result<bool, ParserError> {
        if let Some(whitespace) = Self::split_whitespace(token) {
            let mut run = Token::Character(CharacterRun::new(whitespace));
            let _ = self.process_using_mode(InsertionMode::InBody, &mut run)?;
        }
        Ok(Self::is_spent(token))
    }

    /// Insert leading whitespace of a character token. Returns `true` when
    /// nothing is left of the token.
    pub(super) fn insert_leading_whitespace(&mut self, token: &mut Token) -> Result<bool, ParserError> {
        if let Some(whitespace) = Self::split_whitespace(token) {
            self.insert_character(&whitespace)?;
        }
        Ok(Self::is_spent(token))
    }

    /// Drop leading whitespace of a character token. Returns `true` when
    /// nothing is left of the token.
    pub(super) fn ignore_leading_whitespace(token: &mut Token) -> bool {
        let _ = Self::split_whitespace(token);
        Self::is_spent(token)
    }

    /// Whether a template element is open.
    pub(super) fn template_on_stack(&self) -> bool {
        self.stack_has(Tag::Template)
    }
}

/// Whether `tag` is a start tag for one of `tags`.
pub(super) fn is_start(token: &Token, tags: &[Tag]) -> bool {
    matches!(token, Token::StartTag(tag) if tags.iter().any(|&t| tag.name == t))
}

/// Whether `tag` is an end tag for one of `tags`.
pub(super) fn is_end(token: &Token, tags: &[Tag]) -> bool {
    matches!(token, Token::EndTag(tag) if tags.iter().any(|&t| tag.name == t))
}
