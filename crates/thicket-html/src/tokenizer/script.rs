//! Script data states, [§ 13.2.5.4](https://html.spec.whatwg.org/multipage/parsing.html#script-data-state)
//! and § 13.2.5.15 through § 13.2.5.31.
//!
//! The escaped and double-escaped states track `<!--` and `<script>` inside
//! script text so that `</script>` within a commented-out script does not
//! end the outer one.

use super::core::{HTMLTokenizer, TokenizerState, is_tab_lf_ff_space};
use crate::error::TokenizerErrorKind;

impl HTMLTokenizer {
    /// [§ 13.2.5.4 Script data state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-state)
    pub(super) fn handle_script_data_state(&mut self) {
        match self.current_input_character {
            Some('<') => self.switch_to(TokenizerState::ScriptDataLessThanSign),
            Some('\0') => {
                self.parse_error(TokenizerErrorKind::UnexpectedNullCharacter);
                self.emit_char('\0');
            }
            None => self.emit_eof(),
            Some(c) => self.emit_char(c),
        }
    }

    /// [§ 13.2.5.15 Script data less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-less-than-sign-state)
    pub(super) fn handle_script_data_less_than_sign_state(&mut self) {
        match self.current_input_character {
            Some('/') => {
                self.temporary_buffer.clear();
                self.switch_to(TokenizerState::ScriptDataEndTagOpen);
            }
            // "Switch to the script data escape start state. Emit a U+003C
            // LESS-THAN SIGN character token and a U+0021 EXCLAMATION MARK
            // character token."
            Some('!') => {
                self.switch_to(TokenizerState::ScriptDataEscapeStart);
                self.emit_str("<!");
            }
            _ => {
                self.emit_char('<');
                self.reconsume_in(TokenizerState::ScriptData);
            }
        }
    }

    /// [§ 13.2.5.18 Script data escape start state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escape-start-state)
    pub(super) fn handle_script_data_escape_start_state(&mut self) {
        if self.current_input_character == Some('-') {
            self.switch_to(TokenizerState::ScriptDataEscapeStartDash);
            self.emit_char('-');
        } else {
            self.reconsume_in(TokenizerState::ScriptData);
        }
    }

    /// [§ 13.2.5.19 Script data escape start dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escape-start-dash-state)
    pub(super) fn handle_script_data_escape_start_dash_state(&mut self) {
        if self.current_input_character == Some('-') {
            self.switch_to(TokenizerState::ScriptDataEscapedDashDash);
            self.emit_char('-');
        } else {
            self.reconsume_in(TokenizerState::ScriptData);
        }
    }

    /// [§ 13.2.5.20 Script data escaped state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-state)
    pub(super) fn handle_script_data_escaped_state(&mut self) {
        match self.current_input_character {
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataEscapedDash);
                self.emit_char('-');
            }
            Some('<') => self.switch_to(TokenizerState::ScriptDataEscapedLessThanSign),
            Some('\0') => {
                self.parse_error(TokenizerErrorKind::UnexpectedNullCharacter);
                self.emit_char('\0');
            }
            None => self.eof_in_script_comment(),
            Some(c) => self.emit_char(c),
        }
    }

    /// [§ 13.2.5.21 Script data escaped dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-dash-state)
    pub(super) fn handle_script_data_escaped_dash_state(&mut self) {
        match self.current_input_character {
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataEscapedDashDash);
                self.emit_char('-');
            }
            Some('<') => self.switch_to(TokenizerState::ScriptDataEscapedLessThanSign),
            Some('\0') => {
                self.parse_error(TokenizerErrorKind::UnexpectedNullCharacter);
                self.switch_to(TokenizerState::ScriptDataEscaped);
                self.emit_char('\0');
            }
            None => self.eof_in_script_comment(),
            Some(c) => {
                self.switch_to(TokenizerState::ScriptDataEscaped);
                self.emit_char(c);
            }
        }
    }

    /// [§ 13.2.5.22 Script data escaped dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-dash-dash-state)
    pub(super) fn handle_script_data_escaped_dash_dash_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.emit_char('-'),
            Some('<') => self.switch_to(TokenizerState::ScriptDataEscapedLessThanSign),
            Some('>') => {
                self.switch_to(TokenizerState::ScriptData);
                self.emit_char('>');
            }
            Some('\0') => {
                self.parse_error(TokenizerErrorKind::UnexpectedNullCharacter);
                self.switch_to(TokenizerState::ScriptDataEscaped);
                self.emit_char('\0');
            }
            None => self.eof_in_script_comment(),
            Some(c) => {
                self.switch_to(TokenizerState::ScriptDataEscaped);
                self.emit_char(c);
            }
        }
    }

    /// [§ 13.2.5.23 Script data escaped less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-less-than-sign-state)
    pub(super) fn handle_script_data_escaped_less_than_sign_state(&mut self) {
        match self.current_input_character {
            Some('/') => {
                self.temporary_buffer.clear();
                self.switch_to(TokenizerState::ScriptDataEscapedEndTagOpen);
            }
            // "Set the temporary buffer to the empty string. Emit a U+003C
            // LESS-THAN SIGN character token. Reconsume in the script data
            // double escape start state."
            Some(c) if c.is_ascii_alphabetic() => {
                self.temporary_buffer.clear();
                self.emit_char('<');
                self.reconsume_in(TokenizerState::ScriptDataDoubleEscapeStart);
            }
            _ => {
                self.emit_char('<');
                self.reconsume_in(TokenizerState::ScriptDataEscaped);
            }
        }
    }

    /// [§ 13.2.5.26 Script data double escape start state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escape-start-state)
    pub(super) fn handle_script_data_double_escape_start_state(&mut self) {
        self.double_escape_boundary(
            TokenizerState::ScriptDataDoubleEscaped,
            TokenizerState::ScriptDataEscaped,
        );
    }

    /// [§ 13.2.5.27 Script data double escaped state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-state)
    pub(super) fn handle_script_data_double_escaped_state(&mut self) {
        match self.current_input_character {
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedDash);
                self.emit_char('-');
            }
            Some('<') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedLessThanSign);
                self.emit_char('<');
            }
            Some('\0') => {
                self.parse_error(TokenizerErrorKind::UnexpectedNullCharacter);
                self.emit_char('\0');
            }
            None => self.eof_in_script_comment(),
            Some(c) => self.emit_char(c),
        }
    }

    /// [§ 13.2.5.28 Script data double escaped dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-dash-state)
    pub(super) fn handle_script_data_double_escaped_dash_state(&mut self) {
        match self.current_input_character {
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedDashDash);
                self.emit_char('-');
            }
            Some('<') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedLessThanSign);
                self.emit_char('<');
            }
            Some('\0') => {
                self.parse_error(TokenizerErrorKind::UnexpectedNullCharacter);
                self.switch_to(TokenizerState::ScriptDataDoubleEscaped);
                self.emit_char('\0');
            }
            None => self.eof_in_script_comment(),
            Some(c) => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscaped);
                self.emit_char(c);
            }
        }
    }

    /// [§ 13.2.5.29 Script data double escaped dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-dash-dash-state)
    pub(super) fn handle_script_data_double_escaped_dash_dash_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.emit_char('-'),
            Some('<') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedLessThanSign);
                self.emit_char('<');
            }
            Some('>') => {
                self.switch_to(TokenizerState::ScriptData);
                self.emit_char('>');
            }
            Some('\0') => {
                self.parse_error(TokenizerErrorKind::UnexpectedNullCharacter);
                self.switch_to(TokenizerState::ScriptDataDoubleEscaped);
                self.emit_char('\0');
            }
            None => self.eof_in_script_comment(),
            Some(c) => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscaped);
                self.emit_char(c);
            }
        }
    }

    /// [§ 13.2.5.30 Script data double escaped less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-less-than-sign-state)
    pub(super) fn handle_script_data_double_escaped_less_than_sign_state(&mut self) {
        if self.current_input_character == Some('/') {
            self.temporary_buffer.clear();
            self.switch_to(TokenizerState::ScriptDataDoubleEscapeEnd);
            self.emit_char('/');
        } else {
            self.reconsume_in(TokenizerState::ScriptDataDoubleEscaped);
        }
    }

    /// [§ 13.2.5.31 Script data double escape end state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escape-end-state)
    pub(super) fn handle_script_data_double_escape_end_state(&mut self) {
        self.double_escape_boundary(
            TokenizerState::ScriptDataEscaped,
            TokenizerState::ScriptDataDoubleEscaped,
        );
    }

    /// Shared body of the double escape start and end states: "If the
    /// temporary buffer is the string "script", then switch to `on_script`.
    /// Otherwise, switch to `otherwise`."
    fn double_escape_boundary(&mut self, on_script: TokenizerState, otherwise: TokenizerState) {
        match self.current_input_character {
            Some(c) if is_tab_lf_ff_space(c) || c == '/' || c == '>' => {
                if self.temporary_buffer == "script" {
                    self.switch_to(on_script);
                } else {
                    self.switch_to(otherwise);
                }
                self.emit_char(c);
            }
            Some(c) if c.is_ascii_alphabetic() => {
                self.temporary_buffer.push(c.to_ascii_lowercase());
                self.emit_char(c);
            }
            _ => self.reconsume_in(otherwise),
        }
    }

    /// "EOF - This is an eof-in-script-html-comment-like-text parse error.
    /// Emit an end-of-file token."
    fn eof_in_script_comment(&mut self) {
        self.parse_error(TokenizerErrorKind::EofInScriptHtmlCommentLikeText);
        self.emit_eof();
    }
}
