use std::collections::VecDeque;

use strum_macros::Display;
use thicket_common::warning::warn_once;
use thicket_dom::{Interner, Namespace, SharedInterner, Tag, TagId};

use super::input::InputStream;
use super::token::{Doctype, Token};
use super::TokenSink;
use crate::error::{ParseError, TokenizerErrorKind};

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// The tokenizer state machine. Each state corresponds to a section in § 13.2.5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    Data,
    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    Rcdata,
    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    Rawtext,
    /// [§ 13.2.5.4 Script data state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-state)
    ScriptData,
    /// [§ 13.2.5.5 PLAINTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#plaintext-state)
    Plaintext,
    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    TagOpen,
    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    EndTagOpen,
    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    TagName,
    /// [§ 13.2.5.9 RCDATA less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-less-than-sign-state)
    RcdataLessThanSign,
    /// [§ 13.2.5.10 RCDATA end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-open-state)
    RcdataEndTagOpen,
    /// [§ 13.2.5.11 RCDATA end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    RcdataEndTagName,
    /// [§ 13.2.5.12 RAWTEXT less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-less-than-sign-state)
    RawtextLessThanSign,
    /// [§ 13.2.5.13 RAWTEXT end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-open-state)
    RawtextEndTagOpen,
    /// [§ 13.2.5.14 RAWTEXT end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-name-state)
    RawtextEndTagName,
    /// [§ 13.2.5.15 Script data less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-less-than-sign-state)
    ScriptDataLessThanSign,
    /// [§ 13.2.5.16 Script data end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-end-tag-open-state)
    ScriptDataEndTagOpen,
    /// [§ 13.2.5.17 Script data end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-end-tag-name-state)
    ScriptDataEndTagName,
    /// [§ 13.2.5.18 Script data escape start state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escape-start-state)
    ScriptDataEscapeStart,
    /// [§ 13.2.5.19 Script data escape start dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escape-start-dash-state)
    ScriptDataEscapeStartDash,
    /// [§ 13.2.5.20 Script data escaped state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-state)
    ScriptDataEscaped,
    /// [§ 13.2.5.21 Script data escaped dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-dash-state)
    ScriptDataEscapedDash,
    /// [§ 13.2.5.22 Script data escaped dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-dash-dash-state)
    ScriptDataEscapedDashDash,
    /// [§ 13.2.5.23 Script data escaped less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-less-than-sign-state)
    ScriptDataEscapedLessThanSign,
    /// [§ 13.2.5.24 Script data escaped end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-end-tag-open-state)
    ScriptDataEscapedEndTagOpen,
    /// [§ 13.2.5.25 Script data escaped end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-end-tag-name-state)
    ScriptDataEscapedEndTagName,
    /// [§ 13.2.5.26 Script data double escape start state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escape-start-state)
    ScriptDataDoubleEscapeStart,
    /// [§ 13.2.5.27 Script data double escaped state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-state)
    ScriptDataDoubleEscaped,
    /// [§ 13.2.5.28 Script data double escaped dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-dash-state)
    ScriptDataDoubleEscapedDash,
    /// [§ 13.2.5.29 Script data double escaped dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-dash-dash-state)
    ScriptDataDoubleEscapedDashDash,
    /// [§ 13.2.5.30 Script data double escaped less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-less-than-sign-state)
    ScriptDataDoubleEscapedLessThanSign,
    /// [§ 13.2.5.31 Script data double escape end state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escape-end-state)
    ScriptDataDoubleEscapeEnd,
    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    BeforeAttributeName,
    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    AttributeName,
    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    AfterAttributeName,
    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    BeforeAttributeValue,
    /// [§ 13.2.5.36 Attribute value (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    AttributeValueDoubleQuoted,
    /// [§ 13.2.5.37 Attribute value (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    AttributeValueSingleQuoted,
    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    AttributeValueUnquoted,
    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    AfterAttributeValueQuoted,
    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    SelfClosingStartTag,
    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    BogusComment,
    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    MarkupDeclarationOpen,
    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    CommentStart,
    /// [§ 13.2.5.44 Comment start dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-dash-state)
    CommentStartDash,
    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    Comment,
    /// [§ 13.2.5.46 Comment less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-state)
    CommentLessThanSign,
    /// [§ 13.2.5.47 Comment less-than sign bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-state)
    CommentLessThanSignBang,
    /// [§ 13.2.5.48 Comment less-than sign bang dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-dash-state)
    CommentLessThanSignBangDash,
    /// [§ 13.2.5.49 Comment less-than sign bang dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-dash-dash-state)
    CommentLessThanSignBangDashDash,
    /// [§ 13.2.5.50 Comment end dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-dash-state)
    CommentEndDash,
    /// [§ 13.2.5.51 Comment end state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-state)
    CommentEnd,
    /// [§ 13.2.5.52 Comment end bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-bang-state)
    CommentEndBang,
    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    Doctype,
    /// [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state)
    BeforeDoctypeName,
    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    DoctypeName,
    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    AfterDoctypeName,
    /// [§ 13.2.5.57 After DOCTYPE public keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-keyword-state)
    AfterDoctypePublicKeyword,
    /// [§ 13.2.5.58 Before DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-public-identifier-state)
    BeforeDoctypePublicIdentifier,
    /// [§ 13.2.5.59 DOCTYPE public identifier (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(double-quoted)-state)
    DoctypePublicIdentifierDoubleQuoted,
    /// [§ 13.2.5.60 DOCTYPE public identifier (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(single-quoted)-state)
    DoctypePublicIdentifierSingleQuoted,
    /// [§ 13.2.5.61 After DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-identifier-state)
    AfterDoctypePublicIdentifier,
    /// [§ 13.2.5.62 Between DOCTYPE public and system identifiers state](https://html.spec.whatwg.org/multipage/parsing.html#between-doctype-public-and-system-identifiers-state)
    BetweenDoctypePublicAndSystemIdentifiers,
    /// [§ 13.2.5.63 After DOCTYPE system keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-keyword-state)
    AfterDoctypeSystemKeyword,
    /// [§ 13.2.5.64 Before DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-system-identifier-state)
    BeforeDoctypeSystemIdentifier,
    /// [§ 13.2.5.65 DOCTYPE system identifier (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-system-identifier-(double-quoted)-state)
    DoctypeSystemIdentifierDoubleQuoted,
    /// [§ 13.2.5.66 DOCTYPE system identifier (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-system-identifier-(single-quoted)-state)
    DoctypeSystemIdentifierSingleQuoted,
    /// [§ 13.2.5.67 After DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-identifier-state)
    AfterDoctypeSystemIdentifier,
    /// [§ 13.2.5.68 Bogus DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state)
    BogusDoctype,
    /// [§ 13.2.5.69 CDATA section state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-state)
    CdataSection,
    /// [§ 13.2.5.70 CDATA section bracket state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-bracket-state)
    CdataSectionBracket,
    /// [§ 13.2.5.71 CDATA section end state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-end-state)
    CdataSectionEnd,
    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    CharacterReference,
    /// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
    NamedCharacterReference,
    /// [§ 13.2.5.74 Ambiguous ampersand state](https://html.spec.whatwg.org/multipage/parsing.html#ambiguous-ampersand-state)
    AmbiguousAmpersand,
    /// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
    NumericCharacterReference,
    /// [§ 13.2.5.76 Hexadecimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-start-state)
    HexadecimalCharacterReferenceStart,
    /// [§ 13.2.5.77 Decimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-start-state)
    DecimalCharacterReferenceStart,
    /// [§ 13.2.5.78 Hexadecimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-state)
    HexadecimalCharacterReference,
    /// [§ 13.2.5.79 Decimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-state)
    DecimalCharacterReference,
    /// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
    NumericCharacterReferenceEnd,
}

impl TokenizerState {
    /// The lexical state content of `tag` starts in.
    ///
    /// [§ 13.2.6.4.4](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead) and
    /// [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
    /// step "Set the state of the HTML parser's tokenization stage as follows".
    /// Outside the HTML namespace content is always tokenized in the data state.
    #[must_use]
    pub fn for_tag(scripting: bool, tag: TagId, namespace: Namespace) -> Self {
        if namespace != Namespace::Html {
            return Self::Data;
        }
        match tag.tag() {
            Tag::Title | Tag::Textarea => Self::Rcdata,
            Tag::Style | Tag::Xmp | Tag::Iframe | Tag::Noembed | Tag::Noframes => Self::Rawtext,
            Tag::Noscript if scripting => Self::Rawtext,
            Tag::Script => Self::ScriptData,
            Tag::Plaintext => Self::Plaintext,
            _ => Self::Data,
        }
    }

    /// Whether a NUL emitted in this state stands for U+FFFD.
    ///
    /// The RCDATA, RAWTEXT, script data and PLAINTEXT states say "Emit a
    /// U+FFFD REPLACEMENT CHARACTER character token" where the data state
    /// emits the NUL itself.
    #[must_use]
    pub const fn replaces_null(self) -> bool {
        matches!(
            self,
            Self::Rcdata
                | Self::Rawtext
                | Self::Plaintext
                | Self::ScriptData
                | Self::ScriptDataEscaped
                | Self::ScriptDataEscapedDash
                | Self::ScriptDataEscapedDashDash
                | Self::ScriptDataDoubleEscaped
                | Self::ScriptDataDoubleEscapedDash
                | Self::ScriptDataDoubleEscapedDashDash
        )
    }
}

/// Tokenizer options.
#[derive(Debug, Clone)]
pub struct TokenizerConfig {
    /// State the tokenizer starts in after `begin`.
    pub initial_state: TokenizerState,
    /// Name treated as the last emitted start tag, for appropriate end tags.
    pub last_start_tag: Option<String>,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            initial_state: TokenizerState::Data,
            last_start_tag: None,
        }
    }
}

impl TokenizerConfig {
    /// Start in `state` instead of the data state.
    #[must_use]
    pub const fn with_initial_state(mut self, state: TokenizerState) -> Self {
        self.initial_state = state;
        self
    }

    /// Pretend a start tag named `name` was the last one emitted.
    #[must_use]
    pub fn with_last_start_tag(mut self, name: impl Into<String>) -> Self {
        self.last_start_tag = Some(name.into());
        self
    }
}

/// Start or end tag under construction.
#[derive(Debug, Default)]
pub(super) struct TagBuilder {
    pub(super) is_end: bool,
    pub(super) name: String,
    pub(super) self_closing: bool,
    pub(super) attributes: Vec<(String, String)>,
    /// The attribute being built repeats an earlier name and is dropped when
    /// the tag is finished.
    pub(super) current_is_duplicate: bool,
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "Implementations must act as if they used the following state machine to tokenize HTML."
///
/// Input arrives through [`chunk`](Self::chunk) in arbitrary pieces. States
/// needing lookahead past the available input suspend until the next chunk
/// or [`end`](Self::end).
pub struct HTMLTokenizer {
    pub(super) state: TokenizerState,
    pub(super) return_state: Option<TokenizerState>,
    pub(super) input: InputStream,
    pub(super) current_input_character: Option<char>,
    // When true, the next iteration of the main loop will not consume a new character.
    // "Reconsume in the X state" sets this flag.
    pub(super) reconsume: bool,
    /// A lookahead state ran out of input; stop until more arrives.
    pub(super) suspended: bool,

    pub(super) current_tag: TagBuilder,
    pub(super) current_comment: String,
    pub(super) current_doctype: Doctype,
    /// Character data not yet flushed as a token.
    pub(super) pending_text: String,
    pub(super) pending_nulls: usize,
    /// The pending NULs came from a state where they stand for U+FFFD.
    pub(super) pending_nulls_replaced: bool,
    /// Input position right after the last pending character.
    pub(super) pending_text_end: usize,
    /// Tokens waiting for the sink, each with the input position right
    /// after it.
    pub(super) queue: VecDeque<(Token, usize)>,

    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
    /// "The last start tag token emitted is used as part of the tree construction stage
    /// and in the RCDATA, RAWTEXT, and script data states."
    pub(super) last_start_tag_name: Option<String>,

    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#temporary-buffer)
    pub(super) temporary_buffer: String,
    /// [§ 13.2.5.75](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-code)
    pub(super) character_reference_code: u32,
    /// Answer of the sink, asked each time the markup declaration open state
    /// is entered.
    pub(super) cdata_allowed: bool,

    pub(super) errors: Vec<ParseError>,
    pub(super) interner: SharedInterner,
    config: TokenizerConfig,
    started: bool,
    emitted_eof: bool,
}

impl HTMLTokenizer {
    /// Create a tokenizer with its own interner.
    #[must_use]
    pub fn new() -> Self {
        Self::with_interner(Interner::shared(), TokenizerConfig::default())
    }

    /// Create a tokenizer interning names into `interner`.
    ///
    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization):
    /// "The initial state is the data state."
    #[must_use]
    pub fn with_interner(interner: SharedInterner, config: TokenizerConfig) -> Self {
        Self {
            state: config.initial_state,
            return_state: None,
            input: InputStream::new(),
            current_input_character: None,
            reconsume: false,
            suspended: false,
            current_tag: TagBuilder::default(),
            current_comment: String::new(),
            current_doctype: Doctype::default(),
            pending_text: String::new(),
            pending_nulls: 0,
            pending_nulls_replaced: false,
            pending_text_end: 0,
            queue: VecDeque::new(),
            last_start_tag_name: config.last_start_tag.clone(),
            temporary_buffer: String::new(),
            character_reference_code: 0,
            cdata_allowed: false,
            errors: Vec::new(),
            interner,
            config,
            started: false,
            emitted_eof: false,
        }
    }

    /// A tokenizer for a nested parse: same interner (shared, reference
    /// counted), fresh lexical state.
    #[must_use]
    pub fn inherit(&self) -> Self {
        Self::with_interner(self.interner(), self.config.clone())
    }

    /// Handle to the interner tag and attribute names go into.
    #[must_use]
    pub fn interner(&self) -> SharedInterner {
        std::rc::Rc::clone(&self.interner)
    }

    /// Current lexical state.
    #[must_use]
    pub const fn state(&self) -> TokenizerState {
        self.state
    }

    /// Force the lexical state, as the tree builder does for fragments.
    pub const fn set_state(&mut self, state: TokenizerState) {
        self.state = state;
    }

    /// [`TokenizerState::for_tag`] applied to this tokenizer.
    pub fn set_state_by_tag(&mut self, scripting: bool, tag: TagId, namespace: Namespace) {
        self.state = TokenizerState::for_tag(scripting, tag, namespace);
    }

    /// Tokenizer parse errors recorded so far.
    #[must_use]
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Take the recorded parse errors.
    pub fn take_errors(&mut self) -> Vec<ParseError> {
        std::mem::take(&mut self.errors)
    }

    /// Whether the end-of-file token has been delivered.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.emitted_eof
    }

    /// Reset all lexical state and open a new input stream.
    pub fn begin(&mut self) {
        let interner = self.interner();
        let config = self.config.clone();
        *self = Self::with_interner(interner, config);
        self.started = true;
    }

    /// Feed a chunk of UTF-8 bytes.
    pub fn chunk<S: TokenSink>(&mut self, bytes: &[u8], sink: &mut S) -> Result<(), S::Error> {
        if !self.accepting("chunk") {
            return Ok(());
        }
        self.input.push_bytes(bytes);
        self.run(sink)
    }

    /// Feed already-decoded text.
    pub fn chunk_str<S: TokenSink>(&mut self, text: &str, sink: &mut S) -> Result<(), S::Error> {
        if !self.accepting("chunk") {
            return Ok(());
        }
        self.input.push_str(text);
        self.run(sink)
    }

    /// Signal end of input and run to the end-of-file token.
    pub fn end<S: TokenSink>(&mut self, sink: &mut S) -> Result<(), S::Error> {
        if !self.accepting("end") {
            return Ok(());
        }
        self.input.finish();
        self.run(sink)
    }

    fn accepting(&mut self, call: &str) -> bool {
        if !self.started {
            self.begin();
        }
        if self.input.is_finished() {
            let _ = warn_once("HTML Tokenizer", &format!("{call} after end of input ignored"));
            return false;
        }
        true
    }

    /// Tokenize a complete string into `sink`.
    pub fn feed_all<S: TokenSink>(&mut self, text: &str, sink: &mut S) -> Result<(), S::Error> {
        self.begin();
        self.chunk_str(text, sink)?;
        self.end(sink)
    }

    /// Run the state machine until input runs out, a lookahead suspends, or
    /// the end-of-file token is delivered.
    fn run<S: TokenSink>(&mut self, sink: &mut S) -> Result<(), S::Error> {
        loop {
            self.deliver(sink)?;
            if self.emitted_eof {
                return Ok(());
            }

            // Each state begins by consuming the next input character,
            // unless we're reconsuming from a previous state transition.
            if self.reconsume {
                self.reconsume = false;
            } else if let Some(c) = self.input.next_char() {
                self.current_input_character = Some(c);
            } else if self.input.is_finished() {
                self.current_input_character = None;
            } else {
                return self.deliver(sink);
            }

            if self.state == TokenizerState::MarkupDeclarationOpen {
                self.cdata_allowed = sink.adjusted_current_node_is_foreign();
            }

            self.step();

            if self.suspended {
                self.suspended = false;
                self.reconsume = true;
                return self.deliver(sink);
            }
        }
    }

    /// Hand queued tokens to the sink, applying any steering after each.
    fn deliver<S: TokenSink>(&mut self, sink: &mut S) -> Result<(), S::Error> {
        while let Some((token, position)) = self.queue.pop_front() {
            let is_eof = matches!(token, Token::EndOfFile);
            let mut steering = super::Steering::new(position, self.errors.len());
            sink.process_token(token, &mut steering)?;
            if let Some(state) = steering.requested_state() {
                self.state = state;
            }
            if is_eof {
                self.emitted_eof = true;
                self.queue.clear();
            }
        }
        Ok(())
    }

    fn step(&mut self) {
        match self.state {
            TokenizerState::Data => self.handle_data_state(),
            TokenizerState::Rcdata => self.handle_rcdata_state(),
            TokenizerState::Rawtext => self.handle_rawtext_state(),
            TokenizerState::ScriptData => self.handle_script_data_state(),
            TokenizerState::Plaintext => self.handle_plaintext_state(),
            TokenizerState::TagOpen => self.handle_tag_open_state(),
            TokenizerState::EndTagOpen => self.handle_end_tag_open_state(),
            TokenizerState::TagName => self.handle_tag_name_state(),
            TokenizerState::RcdataLessThanSign => {
                self.handle_text_less_than_sign_state(TokenizerState::Rcdata);
            }
            TokenizerState::RcdataEndTagOpen => {
                self.handle_text_end_tag_open_state(TokenizerState::Rcdata);
            }
            TokenizerState::RcdataEndTagName => {
                self.handle_text_end_tag_name_state(TokenizerState::Rcdata);
            }
            TokenizerState::RawtextLessThanSign => {
                self.handle_text_less_than_sign_state(TokenizerState::Rawtext);
            }
            TokenizerState::RawtextEndTagOpen => {
                self.handle_text_end_tag_open_state(TokenizerState::Rawtext);
            }
            TokenizerState::RawtextEndTagName => {
                self.handle_text_end_tag_name_state(TokenizerState::Rawtext);
            }
            TokenizerState::ScriptDataLessThanSign => {
                self.handle_script_data_less_than_sign_state();
            }
            TokenizerState::ScriptDataEndTagOpen => {
                self.handle_text_end_tag_open_state(TokenizerState::ScriptData);
            }
            TokenizerState::ScriptDataEndTagName => {
                self.handle_text_end_tag_name_state(TokenizerState::ScriptData);
            }
            TokenizerState::ScriptDataEscapeStart => self.handle_script_data_escape_start_state(),
            TokenizerState::ScriptDataEscapeStartDash => {
                self.handle_script_data_escape_start_dash_state();
            }
            TokenizerState::ScriptDataEscaped => self.handle_script_data_escaped_state(),
            TokenizerState::ScriptDataEscapedDash => self.handle_script_data_escaped_dash_state(),
            TokenizerState::ScriptDataEscapedDashDash => {
                self.handle_script_data_escaped_dash_dash_state();
            }
            TokenizerState::ScriptDataEscapedLessThanSign => {
                self.handle_script_data_escaped_less_than_sign_state();
            }
            TokenizerState::ScriptDataEscapedEndTagOpen => {
                self.handle_text_end_tag_open_state(TokenizerState::ScriptDataEscaped);
            }
            TokenizerState::ScriptDataEscapedEndTagName => {
                self.handle_text_end_tag_name_state(TokenizerState::ScriptDataEscaped);
            }
            TokenizerState::ScriptDataDoubleEscapeStart => {
                self.handle_script_data_double_escape_start_state();
            }
            TokenizerState::ScriptDataDoubleEscaped => {
                self.handle_script_data_double_escaped_state();
            }
            TokenizerState::ScriptDataDoubleEscapedDash => {
                self.handle_script_data_double_escaped_dash_state();
            }
            TokenizerState::ScriptDataDoubleEscapedDashDash => {
                self.handle_script_data_double_escaped_dash_dash_state();
            }
            TokenizerState::ScriptDataDoubleEscapedLessThanSign => {
                self.handle_script_data_double_escaped_less_than_sign_state();
            }
            TokenizerState::ScriptDataDoubleEscapeEnd => {
                self.handle_script_data_double_escape_end_state();
            }
            TokenizerState::BeforeAttributeName => self.handle_before_attribute_name_state(),
            TokenizerState::AttributeName => self.handle_attribute_name_state(),
            TokenizerState::AfterAttributeName => self.handle_after_attribute_name_state(),
            TokenizerState::BeforeAttributeValue => self.handle_before_attribute_value_state(),
            TokenizerState::AttributeValueDoubleQuoted => {
                self.handle_attribute_value_quoted_state('"');
            }
            TokenizerState::AttributeValueSingleQuoted => {
                self.handle_attribute_value_quoted_state('\'');
            }
            TokenizerState::AttributeValueUnquoted => self.handle_attribute_value_unquoted_state(),
            TokenizerState::AfterAttributeValueQuoted => {
                self.handle_after_attribute_value_quoted_state();
            }
            TokenizerState::SelfClosingStartTag => self.handle_self_closing_start_tag_state(),
            TokenizerState::BogusComment => self.handle_bogus_comment_state(),
            TokenizerState::MarkupDeclarationOpen => self.handle_markup_declaration_open_state(),
            TokenizerState::CommentStart => self.handle_comment_start_state(),
            TokenizerState::CommentStartDash => self.handle_comment_start_dash_state(),
            TokenizerState::Comment => self.handle_comment_state(),
            TokenizerState::CommentLessThanSign => self.handle_comment_less_than_sign_state(),
            TokenizerState::CommentLessThanSignBang => {
                self.handle_comment_less_than_sign_bang_state();
            }
            TokenizerState::CommentLessThanSignBangDash => {
                self.handle_comment_less_than_sign_bang_dash_state();
            }
            TokenizerState::CommentLessThanSignBangDashDash => {
                self.handle_comment_less_than_sign_bang_dash_dash_state();
            }
            TokenizerState::CommentEndDash => self.handle_comment_end_dash_state(),
            TokenizerState::CommentEnd => self.handle_comment_end_state(),
            TokenizerState::CommentEndBang => self.handle_comment_end_bang_state(),
            TokenizerState::Doctype => self.handle_doctype_state(),
            TokenizerState::BeforeDoctypeName => self.handle_before_doctype_name_state(),
            TokenizerState::DoctypeName => self.handle_doctype_name_state(),
            TokenizerState::AfterDoctypeName => self.handle_after_doctype_name_state(),
            TokenizerState::AfterDoctypePublicKeyword => {
                self.handle_after_doctype_keyword_state(true);
            }
            TokenizerState::BeforeDoctypePublicIdentifier => {
                self.handle_before_doctype_identifier_state(true);
            }
            TokenizerState::DoctypePublicIdentifierDoubleQuoted => {
                self.handle_doctype_identifier_quoted_state(true, '"');
            }
            TokenizerState::DoctypePublicIdentifierSingleQuoted => {
                self.handle_doctype_identifier_quoted_state(true, '\'');
            }
            TokenizerState::AfterDoctypePublicIdentifier => {
                self.handle_after_doctype_public_identifier_state();
            }
            TokenizerState::BetweenDoctypePublicAndSystemIdentifiers => {
                self.handle_between_doctype_public_and_system_identifiers_state();
            }
            TokenizerState::AfterDoctypeSystemKeyword => {
                self.handle_after_doctype_keyword_state(false);
            }
            TokenizerState::BeforeDoctypeSystemIdentifier => {
                self.handle_before_doctype_identifier_state(false);
            }
            TokenizerState::DoctypeSystemIdentifierDoubleQuoted => {
                self.handle_doctype_identifier_quoted_state(false, '"');
            }
            TokenizerState::DoctypeSystemIdentifierSingleQuoted => {
                self.handle_doctype_identifier_quoted_state(false, '\'');
            }
            TokenizerState::AfterDoctypeSystemIdentifier => {
                self.handle_after_doctype_system_identifier_state();
            }
            TokenizerState::BogusDoctype => self.handle_bogus_doctype_state(),
            TokenizerState::CdataSection => self.handle_cdata_section_state(),
            TokenizerState::CdataSectionBracket => self.handle_cdata_section_bracket_state(),
            TokenizerState::CdataSectionEnd => self.handle_cdata_section_end_state(),
            TokenizerState::CharacterReference => self.handle_character_reference_state(),
            TokenizerState::NamedCharacterReference => {
                self.handle_named_character_reference_state();
            }
            TokenizerState::AmbiguousAmpersand => self.handle_ambiguous_ampersand_state(),
            TokenizerState::NumericCharacterReference => {
                self.handle_numeric_character_reference_state();
            }
            TokenizerState::HexadecimalCharacterReferenceStart => {
                self.handle_hexadecimal_character_reference_start_state();
            }
            TokenizerState::DecimalCharacterReferenceStart => {
                self.handle_decimal_character_reference_start_state();
            }
            TokenizerState::HexadecimalCharacterReference => {
                self.handle_hexadecimal_character_reference_state();
            }
            TokenizerState::DecimalCharacterReference => {
                self.handle_decimal_character_reference_state();
            }
            TokenizerState::NumericCharacterReferenceEnd => {
                self.handle_numeric_character_reference_end_state();
            }
        }
    }

    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    fn handle_data_state(&mut self) {
        match self.current_input_character {
            // "U+0026 AMPERSAND (&) - Set the return state to the data state.
            // Switch to the character reference state."
            Some('&') => {
                self.return_state = Some(TokenizerState::Data);
                self.switch_to(TokenizerState::CharacterReference);
            }
            // "U+003C LESS-THAN SIGN (<) - Switch to the tag open state."
            Some('<') => self.switch_to(TokenizerState::TagOpen),
            // "U+0000 NULL - This is an unexpected-null-character parse error.
            // Emit the current input character as a character token."
            Some('\0') => {
                self.parse_error(TokenizerErrorKind::UnexpectedNullCharacter);
                self.emit_char('\0');
            }
            // "EOF - Emit an end-of-file token."
            None => self.emit_eof(),
            // "Anything else - Emit the current input character as a character token."
            Some(c) => self.emit_char(c),
        }
    }

    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    fn handle_rcdata_state(&mut self) {
        match self.current_input_character {
            Some('&') => {
                self.return_state = Some(TokenizerState::Rcdata);
                self.switch_to(TokenizerState::CharacterReference);
            }
            Some('<') => self.switch_to(TokenizerState::RcdataLessThanSign),
            // The NUL stays in the run; consumers replace it with U+FFFD.
            Some('\0') => {
                self.parse_error(TokenizerErrorKind::UnexpectedNullCharacter);
                self.emit_char('\0');
            }
            None => self.emit_eof(),
            Some(c) => self.emit_char(c),
        }
    }

    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    fn handle_rawtext_state(&mut self) {
        match self.current_input_character {
            Some('<') => self.switch_to(TokenizerState::RawtextLessThanSign),
            Some('\0') => {
                self.parse_error(TokenizerErrorKind::UnexpectedNullCharacter);
                self.emit_char('\0');
            }
            None => self.emit_eof(),
            Some(c) => self.emit_char(c),
        }
    }

    /// [§ 13.2.5.5 PLAINTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#plaintext-state)
    fn handle_plaintext_state(&mut self) {
        match self.current_input_character {
            Some('\0') => {
                self.parse_error(TokenizerErrorKind::UnexpectedNullCharacter);
                self.emit_char('\0');
            }
            None => self.emit_eof(),
            Some(c) => self.emit_char(c),
        }
    }

    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    fn handle_tag_open_state(&mut self) {
        match self.current_input_character {
            // "U+0021 EXCLAMATION MARK (!) - Switch to the markup declaration open state."
            // NOTE: We use reconsume_in here so that MarkupDeclarationOpen can peek ahead
            // without the main loop consuming a character first.
            Some('!') => self.reconsume_in(TokenizerState::MarkupDeclarationOpen),
            // "U+002F SOLIDUS (/) - Switch to the end tag open state."
            Some('/') => self.switch_to(TokenizerState::EndTagOpen),
            // "ASCII alpha - Create a new start tag token, set its tag name to the empty
            // string. Reconsume in the tag name state."
            Some(c) if c.is_ascii_alphabetic() => {
                self.create_tag(false);
                self.reconsume_in(TokenizerState::TagName);
            }
            // "U+003F QUESTION MARK (?) - This is an unexpected-question-mark-instead-of-tag-name
            // parse error. Create a comment token whose data is the empty string. Reconsume in the
            // bogus comment state."
            Some('?') => {
                self.parse_error(TokenizerErrorKind::UnexpectedQuestionMarkInsteadOfTagName);
                self.current_comment.clear();
                self.reconsume_in(TokenizerState::BogusComment);
            }
            // "EOF - This is an eof-before-tag-name parse error. Emit a U+003C LESS-THAN SIGN
            // character token and an end-of-file token."
            None => {
                self.parse_error(TokenizerErrorKind::EofBeforeTagName);
                self.emit_char('<');
                self.emit_eof();
            }
            // "Anything else - This is an invalid-first-character-of-tag-name parse error.
            // Emit a U+003C LESS-THAN SIGN character token. Reconsume in the data state."
            Some(_) => {
                self.parse_error(TokenizerErrorKind::InvalidFirstCharacterOfTagName);
                self.emit_char('<');
                self.reconsume_in(TokenizerState::Data);
            }
        }
    }

    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    fn handle_end_tag_open_state(&mut self) {
        match self.current_input_character {
            Some(c) if c.is_ascii_alphabetic() => {
                self.create_tag(true);
                self.reconsume_in(TokenizerState::TagName);
            }
            // "U+003E GREATER-THAN SIGN (>) - This is a missing-end-tag-name parse error.
            // Switch to the data state."
            Some('>') => {
                self.parse_error(TokenizerErrorKind::MissingEndTagName);
                self.switch_to(TokenizerState::Data);
            }
            None => {
                self.parse_error(TokenizerErrorKind::EofBeforeTagName);
                self.emit_char('<');
                self.emit_char('/');
                self.emit_eof();
            }
            // "Anything else - This is an invalid-first-character-of-tag-name parse error.
            // Create a comment token whose data is the empty string. Reconsume in the bogus
            // comment state."
            Some(_) => {
                self.parse_error(TokenizerErrorKind::InvalidFirstCharacterOfTagName);
                self.current_comment.clear();
                self.reconsume_in(TokenizerState::BogusComment);
            }
        }
    }

    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    fn handle_tag_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_tab_lf_ff_space(c) => self.switch_to(TokenizerState::BeforeAttributeName),
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_tag();
            }
            Some('\0') => {
                self.parse_error(TokenizerErrorKind::UnexpectedNullCharacter);
                self.current_tag.name.push('\u{FFFD}');
            }
            None => {
                self.parse_error(TokenizerErrorKind::EofInTag);
                self.emit_eof();
            }
            // "ASCII upper alpha - Append the lowercase version of the current input
            // character to the current tag token's tag name."
            Some(c) => self.current_tag.name.push(c.to_ascii_lowercase()),
        }
    }

    /// RCDATA, RAWTEXT, script data and script data escaped less-than sign
    /// states share one shape apart from the state they fall back to.
    ///
    /// [§ 13.2.5.9](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-less-than-sign-state),
    /// [§ 13.2.5.12](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-less-than-sign-state)
    fn handle_text_less_than_sign_state(&mut self, text_state: TokenizerState) {
        match self.current_input_character {
            // "Set the temporary buffer to the empty string. Switch to the ... end tag open state."
            Some('/') => {
                self.temporary_buffer.clear();
                self.switch_to(end_tag_open_state_for(text_state));
            }
            // "Emit a U+003C LESS-THAN SIGN character token. Reconsume in the ... state."
            _ => {
                self.emit_char('<');
                self.reconsume_in(text_state);
            }
        }
    }

    /// [§ 13.2.5.10](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-open-state),
    /// [§ 13.2.5.13](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-open-state),
    /// [§ 13.2.5.16](https://html.spec.whatwg.org/multipage/parsing.html#script-data-end-tag-open-state),
    /// [§ 13.2.5.24](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-end-tag-open-state)
    fn handle_text_end_tag_open_state(&mut self, text_state: TokenizerState) {
        match self.current_input_character {
            // "Create a new end tag token, set its tag name to the empty string.
            // Reconsume in the ... end tag name state."
            Some(c) if c.is_ascii_alphabetic() => {
                self.create_tag(true);
                self.reconsume_in(end_tag_name_state_for(text_state));
            }
            // "Emit a U+003C LESS-THAN SIGN character token and a U+002F SOLIDUS
            // character token. Reconsume in the ... state."
            _ => {
                self.emit_char('<');
                self.emit_char('/');
                self.reconsume_in(text_state);
            }
        }
    }

    /// [§ 13.2.5.11](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state),
    /// [§ 13.2.5.14](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-name-state),
    /// [§ 13.2.5.17](https://html.spec.whatwg.org/multipage/parsing.html#script-data-end-tag-name-state),
    /// [§ 13.2.5.25](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-end-tag-name-state)
    fn handle_text_end_tag_name_state(&mut self, text_state: TokenizerState) {
        match self.current_input_character {
            // "If the current end tag token is an appropriate end tag token, then switch
            // to the before attribute name state. Otherwise, treat it as per the
            // 'anything else' entry below."
            Some(c) if is_tab_lf_ff_space(c) && self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') if self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::SelfClosingStartTag);
            }
            Some('>') if self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_tag();
            }
            // "Append the lowercase version of the current input character to the current
            // tag token's tag name. Append the current input character to the temporary buffer."
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_tag.name.push(c.to_ascii_lowercase());
                self.temporary_buffer.push(c);
            }
            _ => self.abandon_end_tag(text_state),
        }
    }

    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    fn handle_before_attribute_name_state(&mut self) {
        match self.current_input_character {
            // "Ignore the character."
            Some(c) if is_tab_lf_ff_space(c) => {}
            // "Reconsume in the after attribute name state."
            Some('/' | '>') | None => self.reconsume_in(TokenizerState::AfterAttributeName),
            // "This is an unexpected-equals-sign-before-attribute-name parse error. Start a
            // new attribute in the current tag token. Set that attribute's name to the
            // current input character, and its value to the empty string. Switch to the
            // attribute name state."
            Some('=') => {
                self.parse_error(TokenizerErrorKind::UnexpectedEqualsSignBeforeAttributeName);
                self.start_attribute();
                self.push_attribute_name('=');
                self.switch_to(TokenizerState::AttributeName);
            }
            // "Start a new attribute in the current tag token. Set that attribute name and
            // value to the empty string. Reconsume in the attribute name state."
            Some(_) => {
                self.start_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    fn handle_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_tab_lf_ff_space(c) => {
                self.check_duplicate_attribute();
                self.reconsume_in(TokenizerState::AfterAttributeName);
            }
            Some('/' | '>') | None => {
                self.check_duplicate_attribute();
                self.reconsume_in(TokenizerState::AfterAttributeName);
            }
            Some('=') => {
                self.check_duplicate_attribute();
                self.switch_to(TokenizerState::BeforeAttributeValue);
            }
            Some('\0') => {
                self.parse_error(TokenizerErrorKind::UnexpectedNullCharacter);
                self.push_attribute_name('\u{FFFD}');
            }
            // "This is an unexpected-character-in-attribute-name parse error. Treat it as
            // per the 'anything else' entry below."
            Some(c @ ('"' | '\'' | '<')) => {
                self.parse_error(TokenizerErrorKind::UnexpectedCharacterInAttributeName);
                self.push_attribute_name(c);
            }
            Some(c) => self.push_attribute_name(c.to_ascii_lowercase()),
        }
    }

    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    fn handle_after_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_tab_lf_ff_space(c) => {}
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_tag();
            }
            None => {
                self.parse_error(TokenizerErrorKind::EofInTag);
                self.emit_eof();
            }
            Some(_) => {
                self.start_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    fn handle_before_attribute_value_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_tab_lf_ff_space(c) => {}
            Some('"') => self.switch_to(TokenizerState::AttributeValueDoubleQuoted),
            Some('\'') => self.switch_to(TokenizerState::AttributeValueSingleQuoted),
            // "This is a missing-attribute-value parse error. Switch to the data state.
            // Emit the current tag token."
            Some('>') => {
                self.parse_error(TokenizerErrorKind::MissingAttributeValue);
                self.switch_to(TokenizerState::Data);
                self.emit_current_tag();
            }
            _ => self.reconsume_in(TokenizerState::AttributeValueUnquoted),
        }
    }

    /// [§ 13.2.5.36](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    /// and [§ 13.2.5.37](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    fn handle_attribute_value_quoted_state(&mut self, quote: char) {
        match self.current_input_character {
            Some(c) if c == quote => self.switch_to(TokenizerState::AfterAttributeValueQuoted),
            Some('&') => {
                self.return_state = Some(self.state);
                self.switch_to(TokenizerState::CharacterReference);
            }
            Some('\0') => {
                self.parse_error(TokenizerErrorKind::UnexpectedNullCharacter);
                self.push_attribute_value('\u{FFFD}');
            }
            None => {
                self.parse_error(TokenizerErrorKind::EofInTag);
                self.emit_eof();
            }
            Some(c) => self.push_attribute_value(c),
        }
    }

    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    fn handle_attribute_value_unquoted_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_tab_lf_ff_space(c) => self.switch_to(TokenizerState::BeforeAttributeName),
            Some('&') => {
                self.return_state = Some(TokenizerState::AttributeValueUnquoted);
                self.switch_to(TokenizerState::CharacterReference);
            }
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_tag();
            }
            Some('\0') => {
                self.parse_error(TokenizerErrorKind::UnexpectedNullCharacter);
                self.push_attribute_value('\u{FFFD}');
            }
            Some(c @ ('"' | '\'' | '<' | '=' | '`')) => {
                self.parse_error(TokenizerErrorKind::UnexpectedCharacterInUnquotedAttributeValue);
                self.push_attribute_value(c);
            }
            None => {
                self.parse_error(TokenizerErrorKind::EofInTag);
                self.emit_eof();
            }
            Some(c) => self.push_attribute_value(c),
        }
    }

    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    fn handle_after_attribute_value_quoted_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_tab_lf_ff_space(c) => self.switch_to(TokenizerState::BeforeAttributeName),
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_tag();
            }
            None => {
                self.parse_error(TokenizerErrorKind::EofInTag);
                self.emit_eof();
            }
            Some(_) => {
                self.parse_error(TokenizerErrorKind::MissingWhitespaceBetweenAttributes);
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
        }
    }

    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    fn handle_self_closing_start_tag_state(&mut self) {
        match self.current_input_character {
            // "Set the self-closing flag of the current tag token. Switch to the data
            // state. Emit the current tag token."
            Some('>') => {
                self.current_tag.self_closing = true;
                self.switch_to(TokenizerState::Data);
                self.emit_current_tag();
            }
            None => {
                self.parse_error(TokenizerErrorKind::EofInTag);
                self.emit_eof();
            }
            Some(_) => {
                self.parse_error(TokenizerErrorKind::UnexpectedSolidusInTag);
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
        }
    }
}

impl Default for HTMLTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

/// "U+0009 CHARACTER TABULATION (tab), U+000A LINE FEED (LF),
/// U+000C FORM FEED (FF), U+0020 SPACE"
pub(super) const fn is_tab_lf_ff_space(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\x0C' | ' ')
}

const fn end_tag_open_state_for(text_state: TokenizerState) -> TokenizerState {
    match text_state {
        TokenizerState::Rcdata => TokenizerState::RcdataEndTagOpen,
        TokenizerState::Rawtext => TokenizerState::RawtextEndTagOpen,
        TokenizerState::ScriptDataEscaped => TokenizerState::ScriptDataEscapedEndTagOpen,
        _ => TokenizerState::ScriptDataEndTagOpen,
    }
}

const fn end_tag_name_state_for(text_state: TokenizerState) -> TokenizerState {
    match text_state {
        TokenizerState::Rcdata => TokenizerState::RcdataEndTagName,
        TokenizerState::Rawtext => TokenizerState::RawtextEndTagName,
        TokenizerState::ScriptDataEscaped => TokenizerState::ScriptDataEscapedEndTagName,
        _ => TokenizerState::ScriptDataEndTagName,
    }
}
