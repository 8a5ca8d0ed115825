//! HTML tokenizer module.
//!
//! Implements [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//! of the WHATWG HTML Living Standard over chunked byte input.
//!
//! Tokens are delivered synchronously to a [`TokenSink`]. While handling a
//! token the sink may pick the tokenizer's next state through [`Steering`];
//! this is how the tree builder switches to RCDATA after `<title>`.

/// Character reference states per § 13.2.5.72-80.
mod character_reference;
/// Comment, markup declaration and CDATA states.
mod comment;
/// HTML tokenizer state machine implementation.
mod core;
/// DOCTYPE states.
mod doctype;
/// Helper methods for tokenizer state transitions.
mod helpers;
/// Byte decoding and newline normalization.
pub mod input;
/// Named character reference lookup table per § 13.5.
pub mod named_character_references;
/// Script data states.
mod script;
/// Token types produced by the tokenizer.
pub mod token;

use std::convert::Infallible;

pub use self::core::{HTMLTokenizer, TokenizerConfig, TokenizerState};
pub use token::{Attribute, CharacterRun, Doctype, TagToken, Token};

/// Receiver of tokens.
pub trait TokenSink {
    /// Error that stops tokenization when returned.
    type Error;

    /// Handle one token. `steering` may set the next tokenizer state.
    fn process_token(&mut self, token: Token, steering: &mut Steering) -> Result<(), Self::Error>;

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    ///
    /// "if there is an adjusted current node and it is not an element in the
    /// HTML namespace" then `<![CDATA[` opens a CDATA section.
    fn adjusted_current_node_is_foreign(&self) -> bool {
        false
    }
}

/// Per-token handle a [`TokenSink`] uses to steer the tokenizer.
#[derive(Debug)]
pub struct Steering {
    position: usize,
    tokenizer_errors: usize,
    next_state: Option<TokenizerState>,
}

impl Steering {
    pub(crate) const fn new(position: usize, tokenizer_errors: usize) -> Self {
        Self {
            position,
            tokenizer_errors,
            next_state: None,
        }
    }

    /// Switch the tokenizer to `state` before it reads the next character.
    pub const fn set_state(&mut self, state: TokenizerState) {
        self.next_state = Some(state);
    }

    /// The state requested so far, if any.
    #[must_use]
    pub const fn requested_state(&self) -> Option<TokenizerState> {
        self.next_state
    }

    /// Input position right after the token.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Number of tokenizer parse errors recorded so far.
    #[must_use]
    pub const fn tokenizer_errors(&self) -> usize {
        self.tokenizer_errors
    }
}

/// A sink that records every token. It never reports a foreign adjusted
/// current node, so CDATA sections become bogus comments.
#[derive(Debug, Default)]
pub struct TokenCollector {
    /// Tokens in emission order.
    pub tokens: Vec<Token>,
}

impl TokenSink for TokenCollector {
    type Error = Infallible;

    fn process_token(&mut self, token: Token, _steering: &mut Steering) -> Result<(), Infallible> {
        self.tokens.push(token);
        Ok(())
    }
}
