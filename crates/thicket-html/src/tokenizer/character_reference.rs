//! Character reference states, § 13.2.5.72 through § 13.2.5.80.
//!
//! Named references are matched by peeking, so a reference cut by a chunk
//! boundary suspends the tokenizer instead of committing to a shorter match.

use super::core::{HTMLTokenizer, TokenizerState};
use super::named_character_references::{any_entity_has_prefix, lookup_entity};
use crate::error::TokenizerErrorKind;

/// [§ 13.2.5.80](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
/// replacement table for C1 control references.
const C1_REPLACEMENTS: [(u32, char); 27] = [
    (0x80, '\u{20AC}'),
    (0x82, '\u{201A}'),
    (0x83, '\u{0192}'),
    (0x84, '\u{201E}'),
    (0x85, '\u{2026}'),
    (0x86, '\u{2020}'),
    (0x87, '\u{2021}'),
    (0x88, '\u{02C6}'),
    (0x89, '\u{2030}'),
    (0x8A, '\u{0160}'),
    (0x8B, '\u{2039}'),
    (0x8C, '\u{0152}'),
    (0x8E, '\u{017D}'),
    (0x91, '\u{2018}'),
    (0x92, '\u{2019}'),
    (0x93, '\u{201C}'),
    (0x94, '\u{201D}'),
    (0x95, '\u{2022}'),
    (0x96, '\u{2013}'),
    (0x97, '\u{2014}'),
    (0x98, '\u{02DC}'),
    (0x99, '\u{2122}'),
    (0x9A, '\u{0161}'),
    (0x9B, '\u{203A}'),
    (0x9C, '\u{0153}'),
    (0x9E, '\u{017E}'),
    (0x9F, '\u{0178}'),
];

/// Larger than any valid code point; accumulation saturates here.
const CODE_CEILING: u32 = 0x0011_0000;

impl HTMLTokenizer {
    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    pub(super) fn handle_character_reference_state(&mut self) {
        // "Set the temporary buffer to the empty string. Append a U+0026
        // AMPERSAND (&) character to the temporary buffer."
        self.temporary_buffer.clear();
        self.temporary_buffer.push('&');
        match self.current_input_character {
            Some(c) if c.is_ascii_alphanumeric() => {
                self.reconsume_in(TokenizerState::NamedCharacterReference);
            }
            Some('#') => {
                self.temporary_buffer.push('#');
                self.switch_to(TokenizerState::NumericCharacterReference);
            }
            _ => {
                self.flush_code_points_consumed_as_character_reference();
                let return_state = self.take_return_state();
                self.reconsume_in(return_state);
            }
        }
    }

    /// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
    pub(super) fn handle_named_character_reference_state(&mut self) {
        let Some(first) = self.current_input_character else {
            return self.reconsume_in(TokenizerState::AmbiguousAmpersand);
        };

        // "Consume the maximum number of characters possible, where the
        // consumed characters are one of the identifiers in the named
        // character references table."
        let mut candidate = String::from(first);
        let mut longest: Option<(usize, &'static str)> = None;
        loop {
            if let Some(value) = lookup_entity(&candidate) {
                longest = Some((candidate.chars().count(), value));
            }
            if !any_entity_has_prefix(&candidate) {
                break;
            }
            match self.input.peek(candidate.chars().count() - 1) {
                Some(c) => candidate.push(c),
                None if self.input.is_finished() => break,
                None => return self.suspend(),
            }
        }

        let Some((length, value)) = longest else {
            // "Flush code points consumed as a character reference. Switch to
            // the ambiguous ampersand state."
            self.flush_code_points_consumed_as_character_reference();
            return self.reconsume_in(TokenizerState::AmbiguousAmpersand);
        };

        let matched: String = candidate.chars().take(length).collect();
        let ends_with_semicolon = matched.ends_with(';');

        // "If the character reference was consumed as part of an attribute,
        // and the last character matched is not a U+003B SEMICOLON character
        // (;), and the next input character is either a U+003D EQUALS SIGN
        // character (=) or an ASCII alphanumeric, then, for historical
        // reasons, flush code points consumed as a character reference and
        // switch to the return state."
        let mut historical = false;
        if self.consumed_as_part_of_attribute() && !ends_with_semicolon {
            match self.input.peek(length - 1) {
                Some(c) => historical = c == '=' || c.is_ascii_alphanumeric(),
                None if self.input.is_finished() => {}
                None => return self.suspend(),
            }
        }

        self.input.skip(length - 1);
        if historical {
            self.temporary_buffer.push_str(&matched);
        } else {
            if !ends_with_semicolon {
                self.parse_error(TokenizerErrorKind::MissingSemicolonAfterCharacterReference);
            }
            // "Set the temporary buffer to the empty string. Append one or two
            // characters corresponding to the character reference name"
            self.temporary_buffer.clear();
            self.temporary_buffer.push_str(value);
        }
        self.flush_code_points_consumed_as_character_reference();
        let return_state = self.take_return_state();
        self.switch_to(return_state);
    }

    /// [§ 13.2.5.74 Ambiguous ampersand state](https://html.spec.whatwg.org/multipage/parsing.html#ambiguous-ampersand-state)
    pub(super) fn handle_ambiguous_ampersand_state(&mut self) {
        match self.current_input_character {
            Some(c) if c.is_ascii_alphanumeric() => {
                if self.consumed_as_part_of_attribute() {
                    self.push_attribute_value(c);
                } else {
                    self.emit_char(c);
                }
            }
            Some(';') => {
                self.parse_error(TokenizerErrorKind::UnknownNamedCharacterReference);
                let return_state = self.take_return_state();
                self.reconsume_in(return_state);
            }
            _ => {
                let return_state = self.take_return_state();
                self.reconsume_in(return_state);
            }
        }
    }

    /// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
    pub(super) fn handle_numeric_character_reference_state(&mut self) {
        self.character_reference_code = 0;
        match self.current_input_character {
            Some(c @ ('x' | 'X')) => {
                self.temporary_buffer.push(c);
                self.switch_to(TokenizerState::HexadecimalCharacterReferenceStart);
            }
            _ => self.reconsume_in(TokenizerState::DecimalCharacterReferenceStart),
        }
    }

    /// [§ 13.2.5.76 Hexadecimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-start-state)
    pub(super) fn handle_hexadecimal_character_reference_start_state(&mut self) {
        match self.current_input_character {
            Some(c) if c.is_ascii_hexdigit() => {
                self.reconsume_in(TokenizerState::HexadecimalCharacterReference);
            }
            _ => self.absence_of_digits(),
        }
    }

    /// [§ 13.2.5.77 Decimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-start-state)
    pub(super) fn handle_decimal_character_reference_start_state(&mut self) {
        match self.current_input_character {
            Some(c) if c.is_ascii_digit() => {
                self.reconsume_in(TokenizerState::DecimalCharacterReference);
            }
            _ => self.absence_of_digits(),
        }
    }

    /// [§ 13.2.5.78 Hexadecimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-state)
    pub(super) fn handle_hexadecimal_character_reference_state(&mut self) {
        match self.current_input_character.and_then(|c| c.to_digit(16)) {
            Some(digit) => self.accumulate_digit(16, digit),
            None => self.end_numeric_digits(),
        }
    }

    /// [§ 13.2.5.79 Decimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-state)
    pub(super) fn handle_decimal_character_reference_state(&mut self) {
        match self.current_input_character.and_then(|c| c.to_digit(10)) {
            Some(digit) => self.accumulate_digit(10, digit),
            None => self.end_numeric_digits(),
        }
    }

    /// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
    ///
    /// This state consumes nothing, so the digit states run it directly; it
    /// is only reached here when the state was forced from outside.
    pub(super) fn handle_numeric_character_reference_end_state(&mut self) {
        self.finish_numeric_reference();
        let return_state = self.take_return_state();
        self.reconsume_in(return_state);
    }

    fn accumulate_digit(&mut self, radix: u32, digit: u32) {
        self.character_reference_code = self
            .character_reference_code
            .saturating_mul(radix)
            .saturating_add(digit)
            .min(CODE_CEILING);
    }

    /// The `;` and "anything else" entries of the digit states.
    fn end_numeric_digits(&mut self) {
        let terminated = self.current_input_character == Some(';');
        if !terminated {
            self.parse_error(TokenizerErrorKind::MissingSemicolonAfterCharacterReference);
        }
        self.finish_numeric_reference();
        let return_state = self.take_return_state();
        if terminated {
            self.switch_to(return_state);
        } else {
            self.reconsume_in(return_state);
        }
    }

    /// "This is an absence-of-digits-in-numeric-character-reference parse
    /// error. Flush code points consumed as a character reference. Reconsume
    /// in the return state."
    fn absence_of_digits(&mut self) {
        self.parse_error(TokenizerErrorKind::AbsenceOfDigitsInNumericCharacterReference);
        self.flush_code_points_consumed_as_character_reference();
        let return_state = self.take_return_state();
        self.reconsume_in(return_state);
    }

    /// Check the character reference code, then flush the resulting
    /// character.
    fn finish_numeric_reference(&mut self) {
        let code = self.character_reference_code;
        let mut replacement = None;
        if code == 0 {
            self.parse_error(TokenizerErrorKind::NullCharacterReference);
            replacement = Some('\u{FFFD}');
        } else if code > 0x0010_FFFF {
            self.parse_error(TokenizerErrorKind::CharacterReferenceOutsideUnicodeRange);
            replacement = Some('\u{FFFD}');
        } else if (0xD800..=0xDFFF).contains(&code) {
            self.parse_error(TokenizerErrorKind::SurrogateCharacterReference);
            replacement = Some('\u{FFFD}');
        } else if is_noncharacter(code) {
            self.parse_error(TokenizerErrorKind::NoncharacterCharacterReference);
        } else if code == 0x0D || (is_control(code) && !is_ascii_whitespace(code)) {
            self.parse_error(TokenizerErrorKind::ControlCharacterReference);
            replacement = C1_REPLACEMENTS
                .iter()
                .find(|&&(from, _)| from == code)
                .map(|&(_, to)| to);
        }

        let c = replacement
            .or_else(|| char::from_u32(code))
            .unwrap_or('\u{FFFD}');
        self.temporary_buffer.clear();
        self.temporary_buffer.push(c);
        self.flush_code_points_consumed_as_character_reference();
    }

    /// [§ 13.2.5.72](https://html.spec.whatwg.org/multipage/parsing.html#flush-code-points-consumed-as-a-character-reference)
    ///
    /// "If the character reference was consumed as part of an attribute,
    /// then append each character to the current attribute's value.
    /// Otherwise, emit each character as a character token."
    fn flush_code_points_consumed_as_character_reference(&mut self) {
        let buffer = std::mem::take(&mut self.temporary_buffer);
        if self.consumed_as_part_of_attribute() {
            self.push_attribute_value_str(&buffer);
        } else {
            self.emit_str(&buffer);
        }
    }
}

/// "A noncharacter is a code point that is in the range U+FDD0 to U+FDEF,
/// inclusive, or U+FFFE, U+FFFF, U+1FFFE, U+1FFFF, ... U+10FFFE, or U+10FFFF."
const fn is_noncharacter(code: u32) -> bool {
    matches!(code, 0xFDD0..=0xFDEF) || (code & 0xFFFE) == 0xFFFE
}

/// "A control is a C0 control or a code point in the range U+007F DELETE to
/// U+009F APPLICATION PROGRAM COMMAND, inclusive."
const fn is_control(code: u32) -> bool {
    code <= 0x1F || matches!(code, 0x7F..=0x9F)
}

const fn is_ascii_whitespace(code: u32) -> bool {
    matches!(code, 0x09 | 0x0A | 0x0C | 0x0D | 0x20)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noncharacters() {
        assert!(is_noncharacter(0xFDD0));
        assert!(is_noncharacter(0xFFFF));
        assert!(is_noncharacter(0x10_FFFE));
        assert!(!is_noncharacter(0xFFFD));
    }

    #[test]
    fn c1_table_is_sorted_and_in_range() {
        assert!(C1_REPLACEMENTS.windows(2).all(|w| w[0].0 < w[1].0));
        assert!(C1_REPLACEMENTS.iter().all(|&(code, _)| (0x80..=0x9F).contains(&code)));
    }
}
