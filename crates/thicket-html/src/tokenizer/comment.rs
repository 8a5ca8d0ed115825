//! Markup declarations, comments and CDATA sections
//! (§ 13.2.5.41 through § 13.2.5.52 and § 13.2.5.69 through § 13.2.5.71).

use super::core::{HTMLTokenizer, TokenizerState};
use crate::error::TokenizerErrorKind;

impl HTMLTokenizer {
    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    pub(super) fn handle_bogus_comment_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_comment();
            }
            None => {
                self.emit_current_comment();
                self.emit_eof();
            }
            Some('\0') => {
                self.parse_error(TokenizerErrorKind::UnexpectedNullCharacter);
                self.current_comment.push('\u{FFFD}');
            }
            Some(c) => self.current_comment.push(c),
        }
    }

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    ///
    /// Entered by reconsuming the `!`, so the words below are matched against
    /// the characters after it. Any undecidable match suspends the tokenizer.
    pub(super) fn handle_markup_declaration_open_state(&mut self) {
        // "Two U+002D HYPHEN-MINUS characters (-)"
        match self.input.lookahead("--", false) {
            None => return self.suspend(),
            Some(true) => {
                self.input.skip(2);
                self.current_comment.clear();
                return self.switch_to(TokenizerState::CommentStart);
            }
            Some(false) => {}
        }

        // "ASCII case-insensitive match for the word "DOCTYPE""
        match self.input.lookahead("DOCTYPE", true) {
            None => return self.suspend(),
            Some(true) => {
                self.input.skip(7);
                return self.switch_to(TokenizerState::Doctype);
            }
            Some(false) => {}
        }

        // "The string "[CDATA[" (the five uppercase letters "CDATA" with a
        // U+005B LEFT SQUARE BRACKET character before and after)"
        match self.input.lookahead("[CDATA[", false) {
            None => return self.suspend(),
            Some(true) => {
                self.input.skip(7);
                if self.cdata_allowed {
                    self.switch_to(TokenizerState::CdataSection);
                } else {
                    // "This is a cdata-in-html-content parse error. Create a
                    // comment token whose data is the "[CDATA[" string."
                    self.parse_error(TokenizerErrorKind::CdataInHtmlContent);
                    self.current_comment = String::from("[CDATA[");
                    self.switch_to(TokenizerState::BogusComment);
                }
                return;
            }
            Some(false) => {}
        }

        // "Anything else - This is an incorrectly-opened-comment parse error.
        // Create a comment token whose data is the empty string. Switch to the
        // bogus comment state (don't consume anything in the current state)."
        self.parse_error(TokenizerErrorKind::IncorrectlyOpenedComment);
        self.current_comment.clear();
        self.switch_to(TokenizerState::BogusComment);
    }

    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    pub(super) fn handle_comment_start_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.switch_to(TokenizerState::CommentStartDash),
            Some('>') => self.abrupt_comment_close(),
            _ => self.reconsume_in(TokenizerState::Comment),
        }
    }

    /// [§ 13.2.5.44 Comment start dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-dash-state)
    pub(super) fn handle_comment_start_dash_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.switch_to(TokenizerState::CommentEnd),
            Some('>') => self.abrupt_comment_close(),
            None => self.eof_in_comment(),
            Some(_) => {
                self.current_comment.push('-');
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    pub(super) fn handle_comment_state(&mut self) {
        match self.current_input_character {
            Some('<') => {
                self.current_comment.push('<');
                self.switch_to(TokenizerState::CommentLessThanSign);
            }
            Some('-') => self.switch_to(TokenizerState::CommentEndDash),
            Some('\0') => {
                self.parse_error(TokenizerErrorKind::UnexpectedNullCharacter);
                self.current_comment.push('\u{FFFD}');
            }
            None => self.eof_in_comment(),
            Some(c) => self.current_comment.push(c),
        }
    }

    /// [§ 13.2.5.46 Comment less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-state)
    pub(super) fn handle_comment_less_than_sign_state(&mut self) {
        match self.current_input_character {
            Some('!') => {
                self.current_comment.push('!');
                self.switch_to(TokenizerState::CommentLessThanSignBang);
            }
            Some('<') => self.current_comment.push('<'),
            _ => self.reconsume_in(TokenizerState::Comment),
        }
    }

    /// [§ 13.2.5.47 Comment less-than sign bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-state)
    pub(super) fn handle_comment_less_than_sign_bang_state(&mut self) {
        if self.current_input_character == Some('-') {
            self.switch_to(TokenizerState::CommentLessThanSignBangDash);
        } else {
            self.reconsume_in(TokenizerState::Comment);
        }
    }

    /// [§ 13.2.5.48 Comment less-than sign bang dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-dash-state)
    pub(super) fn handle_comment_less_than_sign_bang_dash_state(&mut self) {
        if self.current_input_character == Some('-') {
            self.switch_to(TokenizerState::CommentLessThanSignBangDashDash);
        } else {
            self.reconsume_in(TokenizerState::CommentEndDash);
        }
    }

    /// [§ 13.2.5.49 Comment less-than sign bang dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-dash-dash-state)
    pub(super) fn handle_comment_less_than_sign_bang_dash_dash_state(&mut self) {
        match self.current_input_character {
            Some('>') | None => self.reconsume_in(TokenizerState::CommentEnd),
            Some(_) => {
                self.parse_error(TokenizerErrorKind::NestedComment);
                self.reconsume_in(TokenizerState::CommentEnd);
            }
        }
    }

    /// [§ 13.2.5.50 Comment end dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-dash-state)
    pub(super) fn handle_comment_end_dash_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.switch_to(TokenizerState::CommentEnd),
            None => self.eof_in_comment(),
            Some(_) => {
                self.current_comment.push('-');
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.51 Comment end state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-state)
    pub(super) fn handle_comment_end_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_comment();
            }
            Some('!') => self.switch_to(TokenizerState::CommentEndBang),
            Some('-') => self.current_comment.push('-'),
            None => self.eof_in_comment(),
            Some(_) => {
                self.current_comment.push_str("--");
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.52 Comment end bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-bang-state)
    pub(super) fn handle_comment_end_bang_state(&mut self) {
        match self.current_input_character {
            Some('-') => {
                self.current_comment.push_str("--!");
                self.switch_to(TokenizerState::CommentEndDash);
            }
            Some('>') => {
                self.parse_error(TokenizerErrorKind::IncorrectlyClosedComment);
                self.switch_to(TokenizerState::Data);
                self.emit_current_comment();
            }
            None => self.eof_in_comment(),
            Some(_) => {
                self.current_comment.push_str("--!");
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// "This is an abrupt-closing-of-empty-comment parse error. Switch to the
    /// data state. Emit the current comment token."
    fn abrupt_comment_close(&mut self) {
        self.parse_error(TokenizerErrorKind::AbruptClosingOfEmptyComment);
        self.switch_to(TokenizerState::Data);
        self.emit_current_comment();
    }

    /// "This is an eof-in-comment parse error. Emit the current comment
    /// token. Emit an end-of-file token."
    fn eof_in_comment(&mut self) {
        self.parse_error(TokenizerErrorKind::EofInComment);
        self.emit_current_comment();
        self.emit_eof();
    }

    /// [§ 13.2.5.69 CDATA section state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-state)
    pub(super) fn handle_cdata_section_state(&mut self) {
        match self.current_input_character {
            Some(']') => self.switch_to(TokenizerState::CdataSectionBracket),
            None => {
                self.parse_error(TokenizerErrorKind::EofInCdata);
                self.emit_eof();
            }
            Some(c) => self.emit_char(c),
        }
    }

    /// [§ 13.2.5.70 CDATA section bracket state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-bracket-state)
    pub(super) fn handle_cdata_section_bracket_state(&mut self) {
        if self.current_input_character == Some(']') {
            self.switch_to(TokenizerState::CdataSectionEnd);
        } else {
            self.emit_char(']');
            self.reconsume_in(TokenizerState::CdataSection);
        }
    }

    /// [§ 13.2.5.71 CDATA section end state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-end-state)
    pub(super) fn handle_cdata_section_end_state(&mut self) {
        match self.current_input_character {
            Some(']') => self.emit_char(']'),
            Some('>') => self.switch_to(TokenizerState::Data),
            _ => {
                self.emit_str("]]");
                self.reconsume_in(TokenizerState::CdataSection);
            }
        }
    }
}
