//! Integration tests for the HTML tokenizer.

use std::convert::Infallible;

use thicket_dom::{AttrId, SharedInterner, Tag};
use thicket_html::tokenizer::{
    HTMLTokenizer, Steering, TokenCollector, TokenSink, TokenizerConfig, TokenizerState,
};
use thicket_html::{ErrorKind, Token, TokenizerErrorKind};

/// Helper to tokenize a string and return the tokens
fn tokenize(input: &str) -> Vec<Token> {
    tokenize_with_errors(input).0
}

fn tokenize_with_errors(input: &str) -> (Vec<Token>, Vec<ErrorKind>) {
    let mut tokenizer = HTMLTokenizer::new();
    let mut sink = TokenCollector::default();
    tokenizer.feed_all(input, &mut sink).unwrap();
    let errors = tokenizer.errors().iter().map(|e| e.kind).collect();
    (sink.tokens, errors)
}

/// Feed `chunks` one by one.
fn tokenize_chunks(chunks: &[&[u8]]) -> Vec<Token> {
    let mut tokenizer = HTMLTokenizer::new();
    let mut sink = TokenCollector::default();
    tokenizer.begin();
    for chunk in chunks {
        tokenizer.chunk(chunk, &mut sink).unwrap();
    }
    tokenizer.end(&mut sink).unwrap();
    sink.tokens
}

/// All character data, concatenated.
fn text_of(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter_map(|t| match t {
            Token::Character(run) => Some(run.data.as_str()),
            _ => None,
        })
        .collect()
}

/// Everything except character tokens.
fn markup_of(tokens: &[Token]) -> Vec<&Token> {
    tokens
        .iter()
        .filter(|t| !matches!(t, Token::Character(_)))
        .collect()
}

fn has_error(errors: &[ErrorKind], kind: TokenizerErrorKind) -> bool {
    errors.contains(&ErrorKind::Tokenizer(kind))
}

#[test]
fn test_plain_text_is_one_run() {
    let tokens = tokenize("Hello");
    assert_eq!(tokens.len(), 2);
    assert!(matches!(&tokens[0], Token::Character(run) if run.data == "Hello"));
    assert!(matches!(tokens[1], Token::EndOfFile));
}

#[test]
fn test_doctype() {
    let tokens = tokenize("<!DOCTYPE html>");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::Doctype(doctype) => {
            assert_eq!(doctype.name.as_deref(), Some("html"));
            assert!(doctype.public_identifier.is_none());
            assert!(!doctype.force_quirks);
        }
        other => panic!("Expected DOCTYPE token, got {other:?}"),
    }
}

#[test]
fn test_doctype_identifiers() {
    let tokens = tokenize(
        r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01//EN" 'http://www.w3.org/TR/html4/strict.dtd'>"#,
    );
    let Token::Doctype(doctype) = &tokens[0] else {
        panic!("Expected DOCTYPE token");
    };
    assert_eq!(doctype.name.as_deref(), Some("html"));
    assert_eq!(doctype.public_identifier.as_deref(), Some("-//W3C//DTD HTML 4.01//EN"));
    assert_eq!(
        doctype.system_identifier.as_deref(),
        Some("http://www.w3.org/TR/html4/strict.dtd")
    );
}

#[test]
fn test_doctype_missing_name_forces_quirks() {
    let (tokens, errors) = tokenize_with_errors("<!DOCTYPE>");
    let Token::Doctype(doctype) = &tokens[0] else {
        panic!("Expected DOCTYPE token");
    };
    assert!(doctype.force_quirks);
    assert!(has_error(&errors, TokenizerErrorKind::MissingDoctypeName));
}

#[test]
fn test_start_tag_with_attributes() {
    let tokens = tokenize(r#"<div id="main" class='a b' hidden data-x=1>"#);
    let Token::StartTag(tag) = &tokens[0] else {
        panic!("Expected StartTag token");
    };
    assert!(tag.name == Tag::Div);
    assert!(!tag.self_closing);
    assert_eq!(tag.attributes.len(), 4);
    assert_eq!(tag.attr(AttrId::ID), Some("main"));
    assert_eq!(tag.attr(AttrId::CLASS), Some("a b"));
    assert_eq!(tag.attributes[2].value, "");
    assert_eq!(tag.attributes[3].value, "1");
}

#[test]
fn test_tag_names_are_lowercased() {
    let tokens = tokenize("<DiV></DIV>");
    assert!(matches!(&tokens[0], Token::StartTag(tag) if tag.name == Tag::Div));
    assert!(matches!(&tokens[1], Token::EndTag(tag) if tag.name == Tag::Div));
}

#[test]
fn test_duplicate_attribute_first_wins() {
    let (tokens, errors) = tokenize_with_errors(r#"<p id="a" id="b">"#);
    let Token::StartTag(tag) = &tokens[0] else {
        panic!("Expected StartTag token");
    };
    assert_eq!(tag.attributes.len(), 1);
    assert_eq!(tag.attr(AttrId::ID), Some("a"));
    assert!(has_error(&errors, TokenizerErrorKind::DuplicateAttribute));
}

#[test]
fn test_self_closing_tag() {
    let tokens = tokenize("<br/>");
    assert!(matches!(&tokens[0], Token::StartTag(tag) if tag.self_closing && tag.name == Tag::Br));
}

#[test]
fn test_comment() {
    let tokens = tokenize("<!-- hi -->");
    assert!(matches!(&tokens[0], Token::Comment(data) if data == " hi "));
}

#[test]
fn test_bogus_comment() {
    let (tokens, errors) = tokenize_with_errors("<?xml version?>");
    assert!(matches!(&tokens[0], Token::Comment(data) if data == "?xml version?"));
    assert!(has_error(
        &errors,
        TokenizerErrorKind::UnexpectedQuestionMarkInsteadOfTagName
    ));
}

#[test]
fn test_cdata_outside_foreign_content_is_a_comment() {
    let tokens = tokenize("<![CDATA[x]]>");
    assert!(matches!(&tokens[0], Token::Comment(data) if data == "[CDATA[x]]"));
}

#[test]
fn test_character_references() {
    let (tokens, errors) = tokenize_with_errors("&amp;&lt;&#x41;&#65;&notit;");
    assert_eq!(text_of(&tokens), "&<AA\u{00AC}it;");
    assert!(has_error(
        &errors,
        TokenizerErrorKind::MissingSemicolonAfterCharacterReference
    ));
}

#[test]
fn test_numeric_reference_replacements() {
    let (tokens, errors) = tokenize_with_errors("&#x80;&#0;&#x110000;");
    assert_eq!(text_of(&tokens), "\u{20AC}\u{FFFD}\u{FFFD}");
    assert!(has_error(&errors, TokenizerErrorKind::ControlCharacterReference));
    assert!(has_error(&errors, TokenizerErrorKind::NullCharacterReference));
    assert!(has_error(
        &errors,
        TokenizerErrorKind::CharacterReferenceOutsideUnicodeRange
    ));
}

#[test]
fn test_legacy_reference_in_attribute_is_kept() {
    let tokens = tokenize(r#"<a href="?a=1&copy=2&amp;x">"#);
    let Token::StartTag(tag) = &tokens[0] else {
        panic!("Expected StartTag token");
    };
    assert_eq!(tag.attributes[0].value, "?a=1&copy=2&x");
}

#[test]
fn test_nul_is_counted_not_replaced() {
    let (tokens, errors) = tokenize_with_errors("a\0b");
    let Token::Character(run) = &tokens[0] else {
        panic!("Expected Character token");
    };
    assert_eq!(run.data, "a\0b");
    assert_eq!(run.null_count, 1);
    assert_eq!(run.text_drop_null(), "ab");
    assert_eq!(run.text_replace_null(), "a\u{FFFD}b");
    assert!(!run.nulls_replaced);
    assert!(has_error(&errors, TokenizerErrorKind::UnexpectedNullCharacter));
}

#[test]
fn test_eof_in_tag() {
    let (tokens, errors) = tokenize_with_errors("<div class=");
    assert_eq!(tokens.len(), 1);
    assert!(matches!(tokens[0], Token::EndOfFile));
    assert!(has_error(&errors, TokenizerErrorKind::EofInTag));
}

#[test]
fn test_lone_less_than_is_text() {
    let (tokens, errors) = tokenize_with_errors("a < b");
    assert_eq!(text_of(&tokens), "a < b");
    assert!(has_error(&errors, TokenizerErrorKind::InvalidFirstCharacterOfTagName));
}

#[test]
fn test_chunk_boundaries_inside_tags() {
    let whole = tokenize_chunks(&[b"<div class=x>text</div>"]);
    let split = tokenize_chunks(&[b"<di", b"v cl", b"ass=x>te", b"xt</", b"div>"]);
    assert_eq!(whole.len(), 4);
    assert!(matches!(&split[0], Token::StartTag(tag) if tag.name == Tag::Div));
    assert_eq!(text_of(&split), "text");
    let markup = markup_of(&split);
    assert_eq!(markup.len(), 3);
    assert!(matches!(markup[1], Token::EndTag(tag) if tag.name == Tag::Div));
}

#[test]
fn test_chunk_boundaries_do_not_split_text() {
    let whole = tokenize_chunks(&[b"one two<br>three"]);
    let split = tokenize_chunks(&[b"on", b"e t", b"wo<b", b"r>thr", b"ee"]);
    assert_eq!(whole, split);
    assert_eq!(whole.len(), 4);
}

#[test]
fn test_lookahead_across_chunks() {
    let tokens = tokenize_chunks(&[b"<!-", b"- x -", b"-><!DOC", b"TYPE html>&am", b"p;"]);
    assert!(matches!(&tokens[0], Token::Comment(data) if data == " x "));
    assert!(matches!(&tokens[1], Token::Doctype(d) if d.name.as_deref() == Some("html")));
    assert_eq!(text_of(&tokens), "&");
}

#[test]
fn test_utf8_split_across_chunks() {
    let bytes = "é€".as_bytes();
    let tokens = tokenize_chunks(&[&bytes[..1], &bytes[1..3], &bytes[3..]]);
    assert_eq!(text_of(&tokens), "é€");
}

#[test]
fn test_invalid_utf8_becomes_replacement() {
    let tokens = tokenize_chunks(&[b"a\xffb"]);
    assert_eq!(text_of(&tokens), "a\u{FFFD}b");
}

#[test]
fn test_newlines_are_normalized_across_chunks() {
    let tokens = tokenize_chunks(&[b"a\r", b"\nb\rc"]);
    assert_eq!(text_of(&tokens), "a\nb\nc");
}

#[test]
fn test_script_data_escapes() {
    let config = TokenizerConfig::default()
        .with_initial_state(TokenizerState::ScriptData)
        .with_last_start_tag("script");
    let mut tokenizer = HTMLTokenizer::with_interner(thicket_dom::Interner::shared(), config);
    let mut sink = TokenCollector::default();
    tokenizer
        .feed_all("<!--<script></script>--></script>", &mut sink)
        .unwrap();
    assert_eq!(text_of(&sink.tokens), "<!--<script></script>-->");
    let markup = markup_of(&sink.tokens);
    assert_eq!(markup.len(), 2);
    assert!(matches!(markup[0], Token::EndTag(tag) if tag.name == Tag::Script));
}

#[test]
fn test_plaintext_never_ends() {
    let config = TokenizerConfig::default().with_initial_state(TokenizerState::Plaintext);
    let mut tokenizer = HTMLTokenizer::with_interner(thicket_dom::Interner::shared(), config);
    let mut sink = TokenCollector::default();
    tokenizer.feed_all("</plaintext><b>", &mut sink).unwrap();
    assert_eq!(text_of(&sink.tokens), "</plaintext><b>");
}

#[test]
fn test_text_state_nuls_are_marked_for_replacement() {
    for state in [
        TokenizerState::Plaintext,
        TokenizerState::Rcdata,
        TokenizerState::Rawtext,
        TokenizerState::ScriptData,
    ] {
        let config = TokenizerConfig::default().with_initial_state(state);
        let mut tokenizer = HTMLTokenizer::with_interner(thicket_dom::Interner::shared(), config);
        let mut sink = TokenCollector::default();
        tokenizer.feed_all("a\0b", &mut sink).unwrap();
        let Token::Character(run) = &sink.tokens[0] else {
            panic!("Expected Character token in {state}");
        };
        assert_eq!(run.null_count, 1, "{state}");
        assert!(run.nulls_replaced, "{state}");
        assert_eq!(run.text_for_insertion(), "a\u{FFFD}b", "{state}");
    }
}

/// Switches to RCDATA after `<title>`, the way the tree builder does.
struct TitleSteering {
    tokens: Vec<Token>,
}

impl TokenSink for TitleSteering {
    type Error = Infallible;

    fn process_token(&mut self, token: Token, steering: &mut Steering) -> Result<(), Infallible> {
        if matches!(&token, Token::StartTag(tag) if tag.name == Tag::Title) {
            steering.set_state(TokenizerState::Rcdata);
        }
        self.tokens.push(token);
        Ok(())
    }
}

#[test]
fn test_sink_steers_into_rcdata() {
    let mut tokenizer = HTMLTokenizer::new();
    let mut sink = TitleSteering { tokens: Vec::new() };
    tokenizer
        .feed_all("<title><b>&amp;</title><b>", &mut sink)
        .unwrap();
    assert_eq!(text_of(&sink.tokens), "<b>&");
    let markup = markup_of(&sink.tokens);
    assert!(matches!(markup[1], Token::EndTag(tag) if tag.name == Tag::Title));
    assert!(matches!(markup[2], Token::StartTag(tag) if tag.name == Tag::B));
}

#[test]
fn test_inherited_tokenizer_shares_interner() {
    let parent = HTMLTokenizer::new();
    let child = parent.inherit();
    let a: SharedInterner = parent.interner();
    let b: SharedInterner = child.interner();
    assert!(std::rc::Rc::ptr_eq(&a, &b));

    let mut child = child;
    let mut sink = TokenCollector::default();
    child.feed_all("<custom-el>", &mut sink).unwrap();
    let Token::StartTag(tag) = &sink.tokens[0] else {
        panic!("Expected StartTag token");
    };
    assert_eq!(a.borrow().tag_name(tag.name).as_deref(), Some("custom-el"));
}

#[test]
fn test_end_tag_describe() {
    let mut tokenizer = HTMLTokenizer::new();
    let interner = tokenizer.interner();
    let mut sink = TokenCollector::default();
    tokenizer.feed_all("</p>", &mut sink).unwrap();
    assert_eq!(sink.tokens[0].describe(&interner.borrow()), "</p>");
}

#[test]
fn test_input_after_end_is_ignored() {
    let mut tokenizer = HTMLTokenizer::new();
    let mut sink = TokenCollector::default();
    tokenizer.feed_all("a", &mut sink).unwrap();
    assert!(tokenizer.is_finished());
    tokenizer.chunk(b"<b>", &mut sink).unwrap();
    tokenizer.end(&mut sink).unwrap();
    assert_eq!(text_of(&sink.tokens), "a");
    assert_eq!(markup_of(&sink.tokens), vec![&Token::EndOfFile]);
}
