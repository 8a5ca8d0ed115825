//! DOCTYPE states, § 13.2.5.53 through § 13.2.5.68.
//!
//! Public and system identifier states differ only in which field they fill
//! and which error ids they raise, so each pair shares one handler taking a
//! `public` flag.

use super::core::{HTMLTokenizer, TokenizerState, is_tab_lf_ff_space};
use crate::error::TokenizerErrorKind;

impl HTMLTokenizer {
    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    pub(super) fn handle_doctype_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_tab_lf_ff_space(c) => self.switch_to(TokenizerState::BeforeDoctypeName),
            Some('>') => self.reconsume_in(TokenizerState::BeforeDoctypeName),
            None => self.eof_in_doctype(),
            Some(_) => {
                self.parse_error(TokenizerErrorKind::MissingWhitespaceBeforeDoctypeName);
                self.reconsume_in(TokenizerState::BeforeDoctypeName);
            }
        }
    }

    /// [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state)
    pub(super) fn handle_before_doctype_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_tab_lf_ff_space(c) => {}
            Some('\0') => {
                self.parse_error(TokenizerErrorKind::UnexpectedNullCharacter);
                self.current_doctype.name = Some(String::from('\u{FFFD}'));
                self.switch_to(TokenizerState::DoctypeName);
            }
            // "This is a missing-doctype-name parse error. Create a new DOCTYPE
            // token. Set its force-quirks flag to on. Switch to the data state.
            // Emit the current token."
            Some('>') => {
                self.parse_error(TokenizerErrorKind::MissingDoctypeName);
                self.current_doctype.force_quirks = true;
                self.switch_to(TokenizerState::Data);
                self.emit_current_doctype();
            }
            None => self.eof_in_doctype(),
            Some(c) => {
                self.current_doctype.name = Some(String::from(c.to_ascii_lowercase()));
                self.switch_to(TokenizerState::DoctypeName);
            }
        }
    }

    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    pub(super) fn handle_doctype_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_tab_lf_ff_space(c) => self.switch_to(TokenizerState::AfterDoctypeName),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_doctype();
            }
            Some('\0') => {
                self.parse_error(TokenizerErrorKind::UnexpectedNullCharacter);
                self.push_doctype_name('\u{FFFD}');
            }
            None => self.eof_in_doctype(),
            Some(c) => self.push_doctype_name(c.to_ascii_lowercase()),
        }
    }

    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    pub(super) fn handle_after_doctype_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_tab_lf_ff_space(c) => {}
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_doctype();
            }
            None => self.eof_in_doctype(),
            Some(c) => {
                // "If the six characters starting from the current input
                // character are an ASCII case-insensitive match for the word
                // "PUBLIC"/"SYSTEM", then consume those characters"
                for (keyword, next) in [
                    ("PUBLIC", TokenizerState::AfterDoctypePublicKeyword),
                    ("SYSTEM", TokenizerState::AfterDoctypeSystemKeyword),
                ] {
                    let (first, rest) = keyword.split_at(1);
                    if !first.starts_with(c.to_ascii_uppercase()) {
                        continue;
                    }
                    match self.input.lookahead(rest, true) {
                        None => return self.suspend(),
                        Some(true) => {
                            self.input.skip(rest.len());
                            return self.switch_to(next);
                        }
                        Some(false) => {}
                    }
                }
                self.parse_error(TokenizerErrorKind::InvalidCharacterSequenceAfterDoctypeName);
                self.current_doctype.force_quirks = true;
                self.reconsume_in(TokenizerState::BogusDoctype);
            }
        }
    }

    /// [§ 13.2.5.57](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-keyword-state)
    /// and [§ 13.2.5.63](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-keyword-state)
    pub(super) fn handle_after_doctype_keyword_state(&mut self, public: bool) {
        match self.current_input_character {
            Some(c) if is_tab_lf_ff_space(c) => self.switch_to(if public {
                TokenizerState::BeforeDoctypePublicIdentifier
            } else {
                TokenizerState::BeforeDoctypeSystemIdentifier
            }),
            Some(quote @ ('"' | '\'')) => {
                self.parse_error(if public {
                    TokenizerErrorKind::MissingWhitespaceAfterDoctypePublicKeyword
                } else {
                    TokenizerErrorKind::MissingWhitespaceAfterDoctypeSystemKeyword
                });
                self.open_doctype_identifier(public, quote);
            }
            _ => self.doctype_identifier_fallback(public),
        }
    }

    /// [§ 13.2.5.58](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-public-identifier-state)
    /// and [§ 13.2.5.64](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-system-identifier-state)
    pub(super) fn handle_before_doctype_identifier_state(&mut self, public: bool) {
        match self.current_input_character {
            Some(c) if is_tab_lf_ff_space(c) => {}
            Some(quote @ ('"' | '\'')) => self.open_doctype_identifier(public, quote),
            _ => self.doctype_identifier_fallback(public),
        }
    }

    /// [§ 13.2.5.59](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(double-quoted)-state)
    /// through [§ 13.2.5.66](https://html.spec.whatwg.org/multipage/parsing.html#doctype-system-identifier-(single-quoted)-state)
    pub(super) fn handle_doctype_identifier_quoted_state(&mut self, public: bool, quote: char) {
        match self.current_input_character {
            Some(c) if c == quote => self.switch_to(if public {
                TokenizerState::AfterDoctypePublicIdentifier
            } else {
                TokenizerState::AfterDoctypeSystemIdentifier
            }),
            Some('\0') => {
                self.parse_error(TokenizerErrorKind::UnexpectedNullCharacter);
                self.push_doctype_identifier(public, '\u{FFFD}');
            }
            Some('>') => {
                self.parse_error(if public {
                    TokenizerErrorKind::AbruptDoctypePublicIdentifier
                } else {
                    TokenizerErrorKind::AbruptDoctypeSystemIdentifier
                });
                self.current_doctype.force_quirks = true;
                self.switch_to(TokenizerState::Data);
                self.emit_current_doctype();
            }
            None => self.eof_in_doctype(),
            Some(c) => self.push_doctype_identifier(public, c),
        }
    }

    /// [§ 13.2.5.61 After DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-identifier-state)
    pub(super) fn handle_after_doctype_public_identifier_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_tab_lf_ff_space(c) => {
                self.switch_to(TokenizerState::BetweenDoctypePublicAndSystemIdentifiers);
            }
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_doctype();
            }
            Some(quote @ ('"' | '\'')) => {
                self.parse_error(
                    TokenizerErrorKind::MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
                );
                self.open_doctype_identifier(false, quote);
            }
            None => self.eof_in_doctype(),
            Some(_) => self.missing_quote_before_system_identifier(),
        }
    }

    /// [§ 13.2.5.62 Between DOCTYPE public and system identifiers state](https://html.spec.whatwg.org/multipage/parsing.html#between-doctype-public-and-system-identifiers-state)
    pub(super) fn handle_between_doctype_public_and_system_identifiers_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_tab_lf_ff_space(c) => {}
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_doctype();
            }
            Some(quote @ ('"' | '\'')) => self.open_doctype_identifier(false, quote),
            None => self.eof_in_doctype(),
            Some(_) => self.missing_quote_before_system_identifier(),
        }
    }

    /// [§ 13.2.5.67 After DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-identifier-state)
    pub(super) fn handle_after_doctype_system_identifier_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_tab_lf_ff_space(c) => {}
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_doctype();
            }
            None => self.eof_in_doctype(),
            // "(This does not set the current DOCTYPE token's force-quirks flag to on.)"
            Some(_) => {
                self.parse_error(TokenizerErrorKind::UnexpectedCharacterAfterDoctypeSystemIdentifier);
                self.reconsume_in(TokenizerState::BogusDoctype);
            }
        }
    }

    /// [§ 13.2.5.68 Bogus DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state)
    pub(super) fn handle_bogus_doctype_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_doctype();
            }
            Some('\0') => self.parse_error(TokenizerErrorKind::UnexpectedNullCharacter),
            None => {
                self.emit_current_doctype();
                self.emit_eof();
            }
            Some(_) => {}
        }
    }

    fn push_doctype_name(&mut self, c: char) {
        self.current_doctype.name.get_or_insert_with(String::new).push(c);
    }

    fn push_doctype_identifier(&mut self, public: bool, c: char) {
        let field = if public {
            &mut self.current_doctype.public_identifier
        } else {
            &mut self.current_doctype.system_identifier
        };
        field.get_or_insert_with(String::new).push(c);
    }

    /// "Set the current DOCTYPE token's public/system identifier to the empty
    /// string (not missing), then switch to the DOCTYPE public/system
    /// identifier (double-quoted/single-quoted) state."
    fn open_doctype_identifier(&mut self, public: bool, quote: char) {
        let double = quote == '"';
        let next = match (public, double) {
            (true, true) => {
                self.current_doctype.public_identifier = Some(String::new());
                TokenizerState::DoctypePublicIdentifierDoubleQuoted
            }
            (true, false) => {
                self.current_doctype.public_identifier = Some(String::new());
                TokenizerState::DoctypePublicIdentifierSingleQuoted
            }
            (false, true) => {
                self.current_doctype.system_identifier = Some(String::new());
                TokenizerState::DoctypeSystemIdentifierDoubleQuoted
            }
            (false, false) => {
                self.current_doctype.system_identifier = Some(String::new());
                TokenizerState::DoctypeSystemIdentifierSingleQuoted
            }
        };
        self.switch_to(next);
    }

    /// The `>`, EOF and "anything else" entries shared by the keyword and
    /// before-identifier states.
    fn doctype_identifier_fallback(&mut self, public: bool) {
        match self.current_input_character {
            Some('>') => {
                self.parse_error(if public {
                    TokenizerErrorKind::MissingDoctypePublicIdentifier
                } else {
                    TokenizerErrorKind::MissingDoctypeSystemIdentifier
                });
                self.current_doctype.force_quirks = true;
                self.switch_to(TokenizerState::Data);
                self.emit_current_doctype();
            }
            None => self.eof_in_doctype(),
            Some(_) => {
                self.parse_error(if public {
                    TokenizerErrorKind::MissingQuoteBeforeDoctypePublicIdentifier
                } else {
                    TokenizerErrorKind::MissingQuoteBeforeDoctypeSystemIdentifier
                });
                self.current_doctype.force_quirks = true;
                self.reconsume_in(TokenizerState::BogusDoctype);
            }
        }
    }

    fn missing_quote_before_system_identifier(&mut self) {
        self.parse_error(TokenizerErrorKind::MissingQuoteBeforeDoctypeSystemIdentifier);
        self.current_doctype.force_quirks = true;
        self.reconsume_in(TokenizerState::BogusDoctype);
    }

    /// "This is an eof-in-doctype parse error. Set the current DOCTYPE
    /// token's force-quirks flag to on. Emit the current DOCTYPE token. Emit
    /// an end-of-file token."
    fn eof_in_doctype(&mut self) {
        self.parse_error(TokenizerErrorKind::EofInDoctype);
        self.current_doctype.force_quirks = true;
        self.emit_current_doctype();
        self.emit_eof();
    }
}
