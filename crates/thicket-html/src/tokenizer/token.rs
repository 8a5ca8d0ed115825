//! Token types produced by the tokenizer.

use core::fmt;

use thicket_dom::{AttrId, Interner, NodeId, TagId};

/// An attribute on a start or end tag token.
///
/// Per [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization):
/// "a list of attributes, each of which has a name and a value"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// "each of which has a name" (interned, lowercased)
    pub name: AttrId,
    /// "and a value"
    pub value: String,
}

impl Attribute {
    /// Create a new attribute with the given name and value.
    #[must_use]
    pub const fn new(name: AttrId, value: String) -> Self {
        Self { name, value }
    }
}

/// "Start and end tag tokens have a tag name, a self-closing flag, and a
/// list of attributes"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagToken {
    /// Interned, lowercased tag name.
    pub name: TagId,
    /// "a self-closing flag"
    pub self_closing: bool,
    /// Attributes in source order, duplicates already dropped.
    pub attributes: Vec<Attribute>,
    /// Element whose attributes a synthetic token stands for. Set only for
    /// tokens the tree builder fabricates when it clones an element.
    pub base: Option<NodeId>,
}

impl TagToken {
    /// A token with no attributes.
    #[must_use]
    pub const fn new(name: TagId) -> Self {
        Self {
            name,
            self_closing: false,
            attributes: Vec::new(),
            base: None,
        }
    }

    /// Value of the first attribute with this name.
    #[must_use]
    pub fn attr(&self, name: AttrId) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }
}

/// "DOCTYPE tokens have a name, a public identifier, a system identifier,
/// and a force-quirks flag. When a DOCTYPE token is created, its name,
/// public identifier, and system identifier must be marked as missing
/// (which is a distinct state from the empty string)"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Doctype {
    /// "a name"
    pub name: Option<String>,
    /// "a public identifier"
    pub public_identifier: Option<String>,
    /// "a system identifier"
    pub system_identifier: Option<String>,
    /// "a force-quirks flag"
    pub force_quirks: bool,
}

/// A run of adjacent character data.
///
/// U+0000 is kept verbatim and counted; consumers pick
/// [`text_drop_null`](Self::text_drop_null) or
/// [`text_replace_null`](Self::text_replace_null).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterRun {
    /// Raw text, NULs included.
    pub data: String,
    /// Number of U+0000 characters in `data`.
    pub null_count: usize,
    /// The NULs were emitted by the RCDATA, RAWTEXT, script data or
    /// PLAINTEXT state, where each one stands for U+FFFD.
    pub nulls_replaced: bool,
}

impl CharacterRun {
    /// A run over `data`, counting its NULs.
    #[must_use]
    pub fn new(data: impl Into<String>) -> Self {
        let data = data.into();
        let null_count = data.chars().filter(|&c| c == '\0').count();
        Self {
            data,
            null_count,
            nulls_replaced: false,
        }
    }

    /// The text with every U+0000 removed.
    #[must_use]
    pub fn text_drop_null(&self) -> String {
        if self.null_count == 0 {
            return self.data.clone();
        }
        self.data.chars().filter(|&c| c != '\0').collect()
    }

    /// The text with every U+0000 replaced by U+FFFD.
    #[must_use]
    pub fn text_replace_null(&self) -> String {
        if self.null_count == 0 {
            return self.data.clone();
        }
        self.data.replace('\0', "\u{FFFD}")
    }

    /// The text tree construction inserts outside foreign content: NULs
    /// from the data state are dropped, the others become U+FFFD.
    #[must_use]
    pub fn text_for_insertion(&self) -> String {
        if self.nulls_replaced {
            self.text_replace_null()
        } else {
            self.text_drop_null()
        }
    }

    /// Whether the run is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether every character is HTML whitespace.
    #[must_use]
    pub fn is_whitespace(&self) -> bool {
        self.data.chars().all(is_html_whitespace)
    }

    /// Split off the leading whitespace, leaving the remainder in `self`.
    pub fn take_leading_whitespace(&mut self) -> String {
        let end = self
            .data
            .find(|c: char| !is_html_whitespace(c))
            .unwrap_or(self.data.len());
        let rest = self.data.split_off(end);
        std::mem::replace(&mut self.data, rest)
    }

    /// Drop the first character if it is a line feed.
    pub fn strip_leading_newline(&mut self) {
        if self.data.starts_with('\n') {
            let _ = self.data.remove(0);
        }
    }
}

/// "ASCII whitespace" minus CR, which preprocessing already removed.
#[must_use]
pub const fn is_html_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0C' | '\r')
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "The output of the tokenization step is a series of zero or more of the following
/// tokens: DOCTYPE, start tag, end tag, comment, character, end-of-file."
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// DOCTYPE token.
    Doctype(Doctype),
    /// Start tag token.
    StartTag(TagToken),
    /// End tag token.
    EndTag(TagToken),
    /// "Comment and character tokens have data."
    Comment(String),
    /// Adjacent character tokens, coalesced.
    Character(CharacterRun),
    /// End-of-file token signals the end of input.
    EndOfFile,
}

impl Token {
    /// A start tag token for `name`.
    #[must_use]
    pub const fn start_tag(name: TagId) -> Self {
        Self::StartTag(TagToken::new(name))
    }

    /// An end tag token for `name`.
    #[must_use]
    pub const fn end_tag(name: TagId) -> Self {
        Self::EndTag(TagToken::new(name))
    }

    /// A one-line description using names from `interner`.
    #[must_use]
    pub fn describe(&self, interner: &Interner) -> String {
        let tag_name = |tag: &TagToken| {
            interner
                .tag_name(tag.name)
                .map_or_else(String::new, |name| name.to_string())
        };
        match self {
            Self::Doctype(doctype) => {
                format!("<!DOCTYPE {}>", doctype.name.as_deref().unwrap_or(""))
            }
            Self::StartTag(tag) => format!("<{}>", tag_name(tag)),
            Self::EndTag(tag) => format!("</{}>", tag_name(tag)),
            Self::Comment(data) => format!("<!--{data}-->"),
            Self::Character(run) => format!("{:?}", run.data),
            Self::EndOfFile => "EOF".to_string(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Doctype(doctype) => {
                write!(f, "DOCTYPE")?;
                if let Some(name) = &doctype.name {
                    write!(f, " name={name}")?;
                }
                if let Some(public) = &doctype.public_identifier {
                    write!(f, " public={public:?}")?;
                }
                if let Some(system) = &doctype.system_identifier {
                    write!(f, " system={system:?}")?;
                }
                if doctype.force_quirks {
                    write!(f, " force_quirks")?;
                }
                Ok(())
            }
            Self::StartTag(tag) => {
                write!(f, "StartTag #{}", tag.name.0)?;
                if tag.self_closing {
                    write!(f, " self_closing")?;
                }
                for attr in &tag.attributes {
                    write!(f, " @{}={:?}", attr.name.0, attr.value)?;
                }
                Ok(())
            }
            Self::EndTag(tag) => write!(f, "EndTag #{}", tag.name.0),
            Self::Comment(data) => write!(f, "Comment {data:?}"),
            Self::Character(run) => write!(f, "Character {:?}", run.data),
            Self::EndOfFile => write!(f, "EOF"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_materialization_variants() {
        let run = CharacterRun::new("a\0b\0\0c");
        assert_eq!(run.null_count, 3);
        assert_eq!(run.text_drop_null(), "abc");
        assert_eq!(run.text_replace_null(), "a\u{FFFD}b\u{FFFD}\u{FFFD}c");
        assert_eq!(
            run.text_replace_null().as_bytes(),
            b"a\xEF\xBF\xBDb\xEF\xBF\xBD\xEF\xBF\xBDc"
        );
    }

    #[test]
    fn insertion_text_follows_the_emitting_state() {
        let mut run = CharacterRun::new("a\0b");
        assert_eq!(run.text_for_insertion(), "ab");
        run.nulls_replaced = true;
        assert_eq!(run.text_for_insertion(), "a\u{FFFD}b");
    }

    #[test]
    fn leading_whitespace_split() {
        let mut run = CharacterRun::new(" \n\tabc ");
        assert_eq!(run.take_leading_whitespace(), " \n\t");
        assert_eq!(run.data, "abc ");
        let mut blank = CharacterRun::new("  ");
        assert_eq!(blank.take_leading_whitespace(), "  ");
        assert!(blank.is_empty());
    }
}
