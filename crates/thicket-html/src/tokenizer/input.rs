//! [§ 13.2.3 The input byte stream](https://html.spec.whatwg.org/multipage/parsing.html#the-input-byte-stream)
//!
//! Turns arbitrarily split UTF-8 chunks into a stream of code points.
//! A multi-byte sequence cut by a chunk boundary is carried over to the next
//! chunk; invalid sequences become U+FFFD.
//!
//! [§ 13.2.3.5 Preprocessing the input stream](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream)
//! "Before the tokenization stage, the input stream must be preprocessed by
//! normalizing newlines." CR LF pairs and lone CRs both become LF, also when
//! the pair is split across chunks.

use std::collections::VecDeque;

const REPLACEMENT: char = '\u{FFFD}';

/// Decoded, newline-normalized characters waiting for the tokenizer.
#[derive(Debug, Default)]
pub struct InputStream {
    chars: VecDeque<char>,
    /// Bytes of an incomplete UTF-8 sequence at the end of the last chunk.
    partial: Vec<u8>,
    last_was_cr: bool,
    eof: bool,
    consumed: usize,
}

impl InputStream {
    /// An empty, open stream.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode and append a chunk of bytes.
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        let mut data = std::mem::take(&mut self.partial);
        data.extend_from_slice(bytes);

        let mut rest = data.as_slice();
        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    self.push_str(valid);
                    break;
                }
                Err(error) => {
                    let (valid, after) = rest.split_at(error.valid_up_to());
                    // `valid_up_to` guarantees this prefix decodes.
                    if let Ok(valid) = std::str::from_utf8(valid) {
                        self.push_str(valid);
                    }
                    match error.error_len() {
                        Some(len) => {
                            self.push_char(REPLACEMENT);
                            rest = &after[len..];
                        }
                        None => {
                            self.partial = after.to_vec();
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Append already-decoded text.
    pub fn push_str(&mut self, text: &str) {
        for c in text.chars() {
            self.push_char(c);
        }
    }

    fn push_char(&mut self, c: char) {
        match c {
            '\r' => {
                self.chars.push_back('\n');
                self.last_was_cr = true;
            }
            '\n' if self.last_was_cr => self.last_was_cr = false,
            c => {
                self.chars.push_back(c);
                self.last_was_cr = false;
            }
        }
    }

    /// Mark the end of input. A dangling partial sequence decodes to a
    /// single U+FFFD.
    pub fn finish(&mut self) {
        if !self.partial.is_empty() {
            self.partial.clear();
            self.push_char(REPLACEMENT);
        }
        self.eof = true;
    }

    /// Whether [`finish`](Self::finish) has been called.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.eof
    }

    /// Consume the next character.
    pub fn next_char(&mut self) -> Option<char> {
        let c = self.chars.pop_front()?;
        self.consumed += 1;
        Some(c)
    }

    /// Look at the character `offset` positions after the next one.
    #[must_use]
    pub fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(offset).copied()
    }

    /// Number of characters ready for consumption.
    #[must_use]
    pub fn available(&self) -> usize {
        self.chars.len()
    }

    /// Number of characters consumed since the stream started.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.consumed
    }

    /// Skip `count` already-peeked characters.
    pub fn skip(&mut self, count: usize) {
        for _ in 0..count {
            let _ = self.next_char();
        }
    }

    /// Match `target` against the upcoming characters.
    ///
    /// `Some(true)`/`Some(false)` when decided, `None` when the available
    /// input is a strict prefix of `target` and more may still arrive.
    #[must_use]
    pub fn lookahead(&self, target: &str, ignore_case: bool) -> Option<bool> {
        for (i, expected) in target.chars().enumerate() {
            match self.peek(i) {
                Some(c) if c == expected => {}
                Some(c) if ignore_case && c.eq_ignore_ascii_case(&expected) => {}
                Some(_) => return Some(false),
                None if self.eof => return Some(false),
                None => return None,
            }
        }
        Some(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(input: &mut InputStream) -> String {
        std::iter::from_fn(|| input.next_char()).collect()
    }

    #[test]
    fn split_multibyte_sequence_is_carried_over() {
        let mut input = InputStream::new();
        let bytes = "é€".as_bytes();
        input.push_bytes(&bytes[..1]);
        assert_eq!(input.available(), 0);
        input.push_bytes(&bytes[1..3]);
        input.push_bytes(&bytes[3..]);
        assert_eq!(drain(&mut input), "é€");
    }

    #[test]
    fn invalid_bytes_become_replacement_characters() {
        let mut input = InputStream::new();
        input.push_bytes(b"a\xFFb");
        input.push_bytes(b"\xE2\x82");
        input.finish();
        assert_eq!(drain(&mut input), "a\u{FFFD}b\u{FFFD}");
    }

    #[test]
    fn newlines_are_normalized_across_chunks() {
        let mut input = InputStream::new();
        input.push_bytes(b"a\r");
        input.push_bytes(b"\nb\r\rc\r\n");
        assert_eq!(drain(&mut input), "a\nb\n\nc\n");
    }

    #[test]
    fn lookahead_waits_for_more_input() {
        let mut input = InputStream::new();
        input.push_str("DOC");
        assert_eq!(input.lookahead("doctype", true), None);
        assert_eq!(input.lookahead("DOX", false), Some(false));
        input.push_str("TYPE");
        assert_eq!(input.lookahead("doctype", true), Some(true));
        assert_eq!(input.lookahead("doctype", false), Some(false));
        input.finish();
        assert_eq!(input.lookahead("DOCTYPEX", false), Some(false));
    }
}
