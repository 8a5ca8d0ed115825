//! Parse errors (recoverable, recorded) and parser errors (returned).

use strum_macros::{Display, IntoStaticStr};
use thiserror::Error;
use thicket_dom::DomError;

/// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
///
/// Tokenizer error codes, named as in the standard's error table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
#[allow(missing_docs)]
pub enum TokenizerErrorKind {
    AbruptClosingOfEmptyComment,
    AbruptDoctypePublicIdentifier,
    AbruptDoctypeSystemIdentifier,
    AbsenceOfDigitsInNumericCharacterReference,
    CdataInHtmlContent,
    CharacterReferenceOutsideUnicodeRange,
    ControlCharacterReference,
    DuplicateAttribute,
    EndTagWithAttributes,
    EndTagWithTrailingSolidus,
    EofBeforeTagName,
    EofInCdata,
    EofInComment,
    EofInDoctype,
    EofInScriptHtmlCommentLikeText,
    EofInTag,
    IncorrectlyClosedComment,
    IncorrectlyOpenedComment,
    InvalidCharacterSequenceAfterDoctypeName,
    InvalidFirstCharacterOfTagName,
    MissingAttributeValue,
    MissingDoctypeName,
    MissingDoctypePublicIdentifier,
    MissingDoctypeSystemIdentifier,
    MissingEndTagName,
    MissingQuoteBeforeDoctypePublicIdentifier,
    MissingQuoteBeforeDoctypeSystemIdentifier,
    MissingSemicolonAfterCharacterReference,
    MissingWhitespaceAfterDoctypePublicKeyword,
    MissingWhitespaceAfterDoctypeSystemKeyword,
    MissingWhitespaceBeforeDoctypeName,
    MissingWhitespaceBetweenAttributes,
    MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
    NestedComment,
    NoncharacterCharacterReference,
    NullCharacterReference,
    SurrogateCharacterReference,
    UnexpectedCharacterAfterDoctypeSystemIdentifier,
    UnexpectedCharacterInAttributeName,
    UnexpectedCharacterInUnquotedAttributeValue,
    UnexpectedEqualsSignBeforeAttributeName,
    UnexpectedNullCharacter,
    UnexpectedQuestionMarkInsteadOfTagName,
    UnexpectedSolidusInTag,
    UnknownNamedCharacterReference,
}

/// Tree construction error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum TreeErrorKind {
    /// First token was not a DOCTYPE.
    MissingDoctype,
    /// DOCTYPE anywhere but the initial mode.
    UnexpectedDoctype,
    /// DOCTYPE other than `<!DOCTYPE html>` and the allowed legacy forms.
    NonConformingDoctype,
    /// Start tag not allowed in the current mode.
    UnexpectedStartTag,
    /// End tag without a matching open element, or not allowed here.
    UnexpectedEndTag,
    /// Non-whitespace text where only whitespace is allowed.
    UnexpectedCharacter,
    /// U+0000 in character data.
    UnexpectedNullCharacter,
    /// End of file with elements still open.
    UnexpectedEof,
    /// An element was implicitly closed while others were still open inside it.
    UnclosedElement,
    /// Misnested formatting elements repaired by the adoption agency.
    MisnestedFormatting,
    /// Text moved out of a table.
    FosterParentedCharacter,
    /// `<foo/>` on an HTML element that is not void.
    NonVoidHtmlElementStartTagWithTrailingSolidus,
}

/// Either tier of parse error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Raised by the tokenizer.
    Tokenizer(TokenizerErrorKind),
    /// Raised by the tree constructor.
    Tree(TreeErrorKind),
}

impl ErrorKind {
    /// The symbolic error id.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Tokenizer(kind) => kind.into(),
            Self::Tree(kind) => kind.into(),
        }
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.id())
    }
}

/// A recoverable parse error. Recording one never stops the parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The error id.
    pub kind: ErrorKind,
    /// Character offset in the normalized input.
    pub position: usize,
    /// Description of the offending token, for tree construction errors.
    pub token: Option<String>,
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.position, self.kind)?;
        if let Some(token) = &self.token {
            write!(f, " ({token})")?;
        }
        Ok(())
    }
}

/// Lifecycle stage of a parser, for [`ParserError::WrongStage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Stage {
    /// Created, `begin` not yet called.
    Idle,
    /// Between `begin` and `end`.
    Parsing,
    /// `end` called, or aborted.
    Done,
}

/// Errors returned from the parser API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParserError {
    /// Node allocation failed; the parse was aborted.
    #[error("fatal: {0}")]
    Fatal(#[from] DomError),
    /// A lifecycle call arrived at the wrong time.
    #[error("{call} called while the parser is {stage}")]
    WrongStage {
        /// The offending call.
        call: &'static str,
        /// Where the parser actually was.
        stage: Stage,
    },
    /// The context tag cannot seed a fragment parse.
    #[error("unsupported fragment context: {0}")]
    InvalidContext(String),
    /// Strict mode stopped at the first parse error.
    #[error("parse error at {position} in strict mode")]
    Strict {
        /// Input position of the token that raised it.
        position: usize,
    },
}
