//! [§ 13.2 Parsing HTML documents](https://html.spec.whatwg.org/multipage/parsing.html#parsing)
//! and [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments).
//!
//! [`HTMLParser`] ties a [`HTMLTokenizer`] to a [`TreeConstructor`] and owns
//! the begin / chunk / end lifecycle.

use thicket_common::warning::warn_once;
use thicket_dom::{Document, Interner, Namespace, NodeId, TagId};

use crate::error::{ParseError, ParserError, Stage};
use crate::parser::{InsertionMode, ParseStatus, TreeBuilderConfig, TreeConstructor};
use crate::tokenizer::{HTMLTokenizer, TokenizerConfig};

/// Parser options.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParserConfig {
    /// [§ 13.2.4.5](https://html.spec.whatwg.org/multipage/parsing.html#scripting-flag)
    /// "The scripting flag is set to "enabled" if scripting was enabled for
    /// the Document with which the parser is associated". Changes how
    /// `<noscript>` is parsed.
    pub scripting: bool,
    /// Maximum number of nodes the document may hold. Running out aborts
    /// the parse with [`ParserError::Fatal`].
    pub node_limit: Option<usize>,
    /// Stop at the first parse error.
    pub strict: bool,
}

impl ParserConfig {
    /// Set the scripting flag.
    #[must_use]
    pub const fn with_scripting(mut self, scripting: bool) -> Self {
        self.scripting = scripting;
        self
    }

    /// Cap the number of nodes.
    #[must_use]
    pub const fn with_node_limit(mut self, limit: usize) -> Self {
        self.node_limit = Some(limit);
        self
    }

    /// Enable strict mode - the first parse error aborts the parse.
    #[must_use]
    pub const fn with_strict_mode(mut self) -> Self {
        self.strict = true;
        self
    }
}

/// What a finished parse hands back.
#[derive(Debug)]
pub struct ParseOutput {
    /// The document the nodes live in.
    pub document: Document,
    /// The document node, or the `html` element holding a fragment's nodes.
    pub root: NodeId,
    /// Parse errors of both stages, ordered by input position.
    pub errors: Vec<ParseError>,
}

impl ParseOutput {
    /// Whether this is a fragment parse result.
    #[must_use]
    pub fn is_fragment(&self) -> bool {
        self.root != NodeId::ROOT
    }
}

/// One running parse.
struct Session {
    tokenizer: HTMLTokenizer,
    tree: TreeConstructor,
    root: NodeId,
}

/// Document and fragment parser.
///
/// ```
/// use thicket_html::{HTMLParser, dump};
///
/// let mut parser = HTMLParser::new();
/// parser.parse_chunk_begin()?;
/// parser.parse_chunk(b"<p>a")?;
/// parser.parse_chunk(b"b</p>")?;
/// let output = parser.parse_chunk_end()?;
/// assert!(dump::dump(&output).contains("\"ab\""));
/// # Ok::<(), thicket_html::ParserError>(())
/// ```
pub struct HTMLParser {
    config: ParserConfig,
    stage: Stage,
    session: Option<Session>,
}

impl Default for HTMLParser {
    fn default() -> Self {
        Self::new()
    }
}

impl HTMLParser {
    /// A parser with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    /// A parser with `config`.
    #[must_use]
    pub const fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            stage: Stage::Idle,
            session: None,
        }
    }

    /// Where the parser is in its lifecycle.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Status of the running tree constructor, if a parse was begun.
    #[must_use]
    pub fn status(&self) -> Option<ParseStatus> {
        self.session.as_ref().map(|s| s.tree.status())
    }

    /// Insertion mode of the running tree constructor.
    #[must_use]
    pub fn insertion_mode(&self) -> Option<InsertionMode> {
        self.session.as_ref().map(|s| s.tree.insertion_mode())
    }

    /// The open-elements stack of the running parse.
    #[must_use]
    pub fn open_elements(&self) -> &[NodeId] {
        self.session.as_ref().map_or(&[], |s| s.tree.open_elements())
    }

    fn new_document(&self) -> Document {
        Document::with_interner(Interner::shared()).with_node_limit(self.config.node_limit)
    }

    fn tree_config(&self) -> TreeBuilderConfig {
        TreeBuilderConfig {
            scripting: self.config.scripting,
            strict: self.config.strict,
        }
    }

    fn expect_stage(&self, call: &'static str, allowed: &[Stage]) -> Result<(), ParserError> {
        if allowed.contains(&self.stage) {
            return Ok(());
        }
        let _ = warn_once("HTML Parser", &format!("{call} called while {}", self.stage));
        Err(ParserError::WrongStage {
            call,
            stage: self.stage,
        })
    }

    /// Start parsing a document.
    pub fn parse_chunk_begin(&mut self) -> Result<(), ParserError> {
        self.expect_stage("parse_chunk_begin", &[Stage::Idle, Stage::Done])?;
        let document = self.new_document();
        let mut tokenizer = HTMLTokenizer::with_interner(document.interner(), TokenizerConfig::default());
        tokenizer.begin();
        self.session = Some(Session {
            tokenizer,
            tree: TreeConstructor::new(document, self.tree_config()),
            root: NodeId::ROOT,
        });
        self.stage = Stage::Parsing;
        Ok(())
    }

    /// Start parsing a fragment in the context of a `context` element in
    /// `namespace`.
    pub fn parse_fragment_chunk_begin(&mut self, context: &str, namespace: Namespace) -> Result<(), ParserError> {
        self.parse_fragment_chunk_begin_in(context, namespace, &[])
    }

    /// Start parsing a fragment whose context element sits below
    /// `ancestors`, outermost first.
    pub fn parse_fragment_chunk_begin_in(
        &mut self,
        context: &str,
        namespace: Namespace,
        ancestors: &[(&str, Namespace)],
    ) -> Result<(), ParserError> {
        self.expect_stage("parse_fragment_chunk_begin", &[Stage::Idle, Stage::Done])?;
        if context.is_empty() {
            let _ = warn_once("HTML Parser", "empty fragment context tag");
            return Err(ParserError::InvalidContext(String::new()));
        }

        let document = self.new_document();
        let interner = document.interner();
        let (context_tag, ancestors) = {
            let mut interner = interner.borrow_mut();
            let intern = |interner: &mut Interner, name: &str, ns: Namespace| -> TagId {
                if ns == Namespace::Html {
                    interner.intern_tag(&name.to_ascii_lowercase())
                } else {
                    interner.intern_tag(name)
                }
            };
            let context_tag = intern(&mut interner, context, namespace);
            let ancestors: Vec<(TagId, Namespace)> = ancestors
                .iter()
                .map(|&(name, ns)| (intern(&mut interner, name, ns), ns))
                .collect();
            (context_tag, ancestors)
        };

        let mut tree = TreeConstructor::new(document, self.tree_config());
        let (root, state) = match tree.begin_fragment(context_tag, namespace, ancestors) {
            Ok(seeded) => seeded,
            Err(error) => {
                let _ = warn_once("HTML Parser", &error.to_string());
                return Err(error);
            }
        };

        // "Set the state of the HTML parser's tokenization stage as follows,
        // switching on the context element"
        let last_start_tag = interner
            .borrow()
            .tag_name(context_tag)
            .map(|name| name.to_ascii_lowercase());
        let mut config = TokenizerConfig::default().with_initial_state(state);
        if let Some(name) = last_start_tag {
            config = config.with_last_start_tag(name);
        }
        let mut tokenizer = HTMLTokenizer::with_interner(interner, config);
        tokenizer.begin();

        self.session = Some(Session { tokenizer, tree, root });
        self.stage = Stage::Parsing;
        Ok(())
    }

    fn session(&mut self, call: &'static str) -> Result<&mut Session, ParserError> {
        self.expect_stage(call, &[Stage::Parsing])?;
        self.session.as_mut().ok_or(ParserError::WrongStage {
            call,
            stage: Stage::Idle,
        })
    }

    /// Feed a chunk of UTF-8 bytes. Chunk boundaries may fall anywhere.
    pub fn parse_chunk(&mut self, bytes: &[u8]) -> Result<(), ParserError> {
        let session = self.session("parse_chunk")?;
        let Session { tokenizer, tree, .. } = session;
        let result = tokenizer.chunk(bytes, tree);
        if result.is_err() {
            self.teardown();
        }
        result
    }

    /// Signal the end of input and take the result.
    pub fn parse_chunk_end(&mut self) -> Result<ParseOutput, ParserError> {
        let session = self.session("parse_chunk_end")?;
        let Session { tokenizer, tree, .. } = session;
        let result = tokenizer.end(tree);
        if let Err(error) = result {
            self.teardown();
            return Err(error);
        }
        self.finish()
    }

    /// Parse a whole document.
    pub fn parse(&mut self, bytes: &[u8]) -> Result<ParseOutput, ParserError> {
        self.parse_chunk_begin()?;
        self.parse_chunk(bytes)?;
        self.parse_chunk_end()
    }

    /// Parse a whole fragment in the context of a `context` element.
    pub fn parse_fragment(
        &mut self,
        bytes: &[u8],
        context: &str,
        namespace: Namespace,
    ) -> Result<ParseOutput, ParserError> {
        self.parse_fragment_chunk_begin(context, namespace)?;
        self.parse_chunk(bytes)?;
        self.parse_chunk_end()
    }

    /// Drop fragment bookkeeping after a fatal error. The session stays
    /// around so its state can be inspected.
    fn teardown(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.tree.finish_fragment();
        }
        self.stage = Stage::Done;
    }

    fn finish(&mut self) -> Result<ParseOutput, ParserError> {
        self.stage = Stage::Done;
        let Some(mut session) = self.session.take() else {
            return Err(ParserError::WrongStage {
                call: "parse_chunk_end",
                stage: Stage::Idle,
            });
        };
        session.tree.finish_fragment();

        let mut errors = session.tokenizer.take_errors();
        errors.extend(session.tree.take_errors());
        errors.sort_by_key(|e| e.position);

        Ok(ParseOutput {
            document: session.tree.into_document(),
            root: session.root,
            errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_before_begin_is_wrong_stage() {
        let mut parser = HTMLParser::new();
        let err = parser.parse_chunk(b"<p>").unwrap_err();
        assert_eq!(
            err,
            ParserError::WrongStage {
                call: "parse_chunk",
                stage: Stage::Idle
            }
        );
    }

    #[test]
    fn chunk_after_end_is_wrong_stage() {
        let mut parser = HTMLParser::new();
        let _ = parser.parse(b"<p>x").unwrap();
        assert_eq!(parser.stage(), Stage::Done);
        assert!(matches!(
            parser.parse_chunk(b"y"),
            Err(ParserError::WrongStage { stage: Stage::Done, .. })
        ));
        // A finished parser may start over.
        assert!(parser.parse_chunk_begin().is_ok());
    }

    #[test]
    fn fragment_root_is_synthetic_html() {
        let mut parser = HTMLParser::new();
        let output = parser.parse_fragment(b"<b>x</b>", "div", Namespace::Html).unwrap();
        assert!(output.is_fragment());
        let root = output.document.element(output.root).unwrap();
        assert_eq!(root.tag, thicket_dom::Tag::Html.id());
        assert_eq!(output.document.children(output.root).count(), 1);
    }

    #[test]
    fn unsupported_context_namespace() {
        let mut parser = HTMLParser::new();
        let err = parser.parse_fragment_chunk_begin("x", Namespace::XLink).unwrap_err();
        assert!(matches!(err, ParserError::InvalidContext(_)));
        assert_eq!(parser.stage(), Stage::Idle);
    }
}
