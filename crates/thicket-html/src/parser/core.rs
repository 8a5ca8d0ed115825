use strum_macros::Display;

use thicket_common::warning::warn_once;
use thicket_dom::{
    AttrId, Document, ElementData, Namespace, NodeId, SharedInterner, Tag, TagId,
};

use crate::error::{ErrorKind, ParseError, ParserError, TreeErrorKind};
use crate::tokenizer::{CharacterRun, Steering, Token, TokenSink, TokenizerState};

/// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
///
/// "The insertion mode is a state variable that controls the primary operation
/// of the tree construction stage."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum InsertionMode {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    Initial,
    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    BeforeHtml,
    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    BeforeHead,
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    InHead,
    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    InHeadNoscript,
    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    AfterHead,
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    InBody,
    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    Text,
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    InTable,
    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    InTableText,
    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    InCaption,
    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolumngroup)
    InColumnGroup,
    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intablebody)
    InTableBody,
    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inrow)
    InRow,
    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incell)
    InCell,
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    InSelect,
    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    InSelectInTable,
    /// [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
    InTemplate,
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    AfterBody,
    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    InFrameset,
    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    AfterFrameset,
    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    AfterAfterBody,
    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    AfterAfterFrameset,
}

/// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
///
/// "The list of active formatting elements... is used to handle mis-nested
/// formatting element tags."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveFormattingElement {
    /// A formatting element. Its attributes are read back from the node when
    /// it has to be recreated.
    Element(NodeId),
    /// "A marker is an entry in the list of active formatting elements that is
    /// distinct from any element."
    ///
    /// Markers are pushed when entering: applet, object, marquee, template,
    /// td, th, caption.
    Marker,
}

/// Where a parse stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ParseStatus {
    /// Tokens are being accepted.
    Running,
    /// The end-of-file token was processed.
    Finished,
    /// A fatal error stopped the parse.
    Aborted,
}

/// Tree construction options.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeBuilderConfig {
    /// [§ 13.2.4.5 Other parsing state flags](https://html.spec.whatwg.org/multipage/parsing.html#scripting-flag)
    pub scripting: bool,
    /// Stop at the first parse error of either stage.
    pub strict: bool,
}

/// Fragment parsing state, [§ 13.4](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments).
#[derive(Debug)]
pub(super) struct FragmentContext {
    /// The context element. Detached and destroyed when the parse ends.
    pub(super) element: NodeId,
    /// Tags of the context element's ancestors, outermost first.
    pub(super) ancestors: Vec<(TagId, Namespace)>,
    /// Synthetic form the form element pointer was set to.
    pub(super) form: Option<NodeId>,
}

/// `Ok(true)` when the token was consumed, `Ok(false)` when it must be
/// reprocessed in the (possibly new) current insertion mode.
pub(super) type Handled = Result<bool, ParserError>;

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// Receives tokens from the tokenizer and builds the document. Owns the
/// document for the duration of the parse.
pub struct TreeConstructor {
    pub(super) document: Document,
    pub(super) interner: SharedInterner,

    /// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
    pub(super) insertion_mode: InsertionMode,
    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#original-insertion-mode)
    pub(super) original_insertion_mode: Option<InsertionMode>,
    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#stack-of-template-insertion-modes)
    pub(super) template_insertion_modes: Vec<InsertionMode>,

    /// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    pub(super) stack_of_open_elements: Vec<NodeId>,
    /// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
    pub(super) active_formatting_elements: Vec<ActiveFormattingElement>,

    /// [§ 13.2.4.4 The element pointers](https://html.spec.whatwg.org/multipage/parsing.html#the-element-pointers)
    pub(super) head_element_pointer: Option<NodeId>,
    /// "The form element pointer points to the last form element that was opened
    /// and whose end tag has not yet been seen."
    pub(super) form_element_pointer: Option<NodeId>,

    /// [§ 13.2.6.4.10](https://html.spec.whatwg.org/multipage/parsing.html#concept-pending-table-char-tokens)
    /// "The pending table character tokens list"
    pub(super) pending_table_text: String,
    pub(super) pending_table_text_is_whitespace: bool,

    /// [§ 13.2.4.5 Other parsing state flags](https://html.spec.whatwg.org/multipage/parsing.html#frameset-ok-flag)
    pub(super) frameset_ok: bool,
    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    pub(super) foster_parenting: bool,
    pub(super) scripting: bool,
    strict: bool,

    pub(super) fragment: Option<FragmentContext>,

    /// After `pre`, `listing` and `textarea`: "If the next token is a U+000A
    /// LINE FEED (LF) character token, then ignore that token"
    pub(super) skip_next_newline: bool,
    pub(super) self_closing_acknowledged: bool,
    pub(super) next_tokenizer_state: Option<TokenizerState>,

    errors: Vec<ParseError>,
    position: usize,
    status: ParseStatus,
}

impl TreeConstructor {
    /// A tree constructor building into `document`.
    #[must_use]
    pub fn new(document: Document, config: TreeBuilderConfig) -> Self {
        let interner = document.interner();
        let mut document = document;
        document.scripting = config.scripting;
        Self {
            document,
            interner,
            insertion_mode: InsertionMode::Initial,
            original_insertion_mode: None,
            template_insertion_modes: Vec::new(),
            stack_of_open_elements: Vec::new(),
            active_formatting_elements: Vec::new(),
            head_element_pointer: None,
            form_element_pointer: None,
            pending_table_text: String::new(),
            pending_table_text_is_whitespace: true,
            frameset_ok: true,
            foster_parenting: false,
            scripting: config.scripting,
            strict: config.strict,
            fragment: None,
            skip_next_newline: false,
            self_closing_acknowledged: false,
            next_tokenizer_state: None,
            errors: Vec::new(),
            position: 0,
            status: ParseStatus::Running,
        }
    }

    /// The document being built.
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// Give up the document.
    #[must_use]
    pub fn into_document(self) -> Document {
        self.document
    }

    /// Current insertion mode.
    #[must_use]
    pub const fn insertion_mode(&self) -> InsertionMode {
        self.insertion_mode
    }

    /// Open elements, outermost first.
    #[must_use]
    pub fn open_elements(&self) -> &[NodeId] {
        &self.stack_of_open_elements
    }

    /// Tree construction errors so far.
    #[must_use]
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Take the recorded tree construction errors.
    pub fn take_errors(&mut self) -> Vec<ParseError> {
        std::mem::take(&mut self.errors)
    }

    /// Where the parse stands.
    #[must_use]
    pub const fn status(&self) -> ParseStatus {
        self.status
    }

    // ---- fragment setup ------------------------------------------------

    /// [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
    ///
    /// Seed the tree constructor for a fragment whose context element is
    /// `context` in `namespace`, below `ancestors` (outermost first).
    /// Returns the root element the fragment's nodes end up in, and the
    /// tokenizer state to start in.
    pub fn begin_fragment(
        &mut self,
        context: TagId,
        namespace: Namespace,
        ancestors: Vec<(TagId, Namespace)>,
    ) -> Result<(NodeId, TokenizerState), ParserError> {
        if !matches!(namespace, Namespace::Html | Namespace::MathMl | Namespace::Svg) {
            return Err(ParserError::InvalidContext(format!("namespace {namespace}")));
        }

        // "Create a new Document node, and mark it as being an HTML document."
        // "Let root be a new html element with no attributes."
        // "Append the element root to the Document node created above."
        // "Set up the parser's stack of open elements so that it contains just
        // the single element root."
        let root = self
            .document
            .create_element(Tag::Html.id(), Namespace::Html, Vec::new())?;
        self.document.insert_as_last_child(NodeId::ROOT, root);
        self.stack_of_open_elements.push(root);

        let element = self.document.create_element(context, namespace, Vec::new())?;
        let is_html_context = |tag: Tag| namespace == Namespace::Html && context == tag;

        // "If the context element is a template element, push "in template"
        // onto the stack of template insertion modes"
        if is_html_context(Tag::Template) {
            self.template_insertion_modes.push(InsertionMode::InTemplate);
        }

        // "Set the parser's form element pointer to the nearest node to the
        // context element that is a form element"
        let form = if is_html_context(Tag::Form) {
            Some(element)
        } else if ancestors
            .iter()
            .any(|&(tag, ns)| ns == Namespace::Html && tag == Tag::Form)
        {
            Some(self.document.create_element(Tag::Form.id(), Namespace::Html, Vec::new())?)
        } else {
            None
        };
        self.form_element_pointer = form;

        self.fragment = Some(FragmentContext {
            element,
            ancestors,
            form: form.filter(|&f| f != element),
        });

        // "Reset the parser's insertion mode appropriately."
        self.reset_insertion_mode_appropriately();

        let state = TokenizerState::for_tag(self.scripting, context, namespace);
        Ok((root, state))
    }

    /// Tear down fragment-only bookkeeping: the context element, the
    /// synthetic form and the template mode seeded for a template context.
    pub fn finish_fragment(&mut self) {
        if let Some(fragment) = self.fragment.take() {
            if let Some(form) = fragment.form {
                self.document.destroy_node(form);
            }
            self.document.destroy_subtree(fragment.element);
        }
        self.form_element_pointer = None;
        self.template_insertion_modes.clear();
    }

    // ---- errors --------------------------------------------------------

    /// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
    ///
    /// Record a tree construction error against `token`.
    pub(super) fn parse_error(&mut self, kind: TreeErrorKind, token: &Token) {
        let description = token.describe(&self.interner.borrow());
        self.errors.push(ParseError {
            kind: ErrorKind::Tree(kind),
            position: self.position,
            token: Some(description),
        });
    }

    /// Record a tree construction error raised while processing the current
    /// token from a helper that does not hold it. The token is described
    /// once processing finishes.
    pub(super) fn parse_error_here(&mut self, kind: TreeErrorKind) {
        self.errors.push(ParseError {
            kind: ErrorKind::Tree(kind),
            position: self.position,
            token: None,
        });
    }

    /// Empty the stack and mark the parse aborted.
    pub fn abort(&mut self, reason: &ParserError) {
        let _ = warn_once("HTML Parser", &format!("parse aborted: {reason}"));
        self.stack_of_open_elements.clear();
        self.active_formatting_elements.clear();
        self.template_insertion_modes.clear();
        self.status = ParseStatus::Aborted;
    }

    /// [§ 13.2.7 The end](https://html.spec.whatwg.org/multipage/parsing.html#stop-parsing)
    ///
    /// "Pop all the nodes off the stack of open elements."
    pub(super) fn stop_parsing(&mut self) {
        self.stack_of_open_elements.clear();
        self.active_formatting_elements.clear();
        self.status = ParseStatus::Finished;
    }

    // ---- node queries --------------------------------------------------

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#current-node)
    ///
    /// "The current node is the bottommost node in this stack of open elements."
    pub(super) fn current_node(&self) -> Option<NodeId> {
        self.stack_of_open_elements.last().copied()
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#adjusted-current-node)
    ///
    /// "The adjusted current node is the context element if the parser was
    /// created as part of the HTML fragment parsing algorithm and the stack of
    /// open elements has only one element in it (fragment case); otherwise,
    /// the adjusted current node is the current node."
    pub(super) fn adjusted_current_node(&self) -> Option<NodeId> {
        match &self.fragment {
            Some(fragment) if self.stack_of_open_elements.len() == 1 => Some(fragment.element),
            _ => self.current_node(),
        }
    }

    pub(super) fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.document.element(id)
    }

    /// Whether `id` is the HTML element `tag`.
    pub(super) fn is_html(&self, id: NodeId, tag: Tag) -> bool {
        self.document.is_html(id, tag)
    }

    /// Whether `id` is an HTML element whose tag is one of `tags`.
    pub(super) fn is_html_one_of(&self, id: NodeId, tags: &[Tag]) -> bool {
        self.element(id)
            .is_some_and(|e| e.namespace == Namespace::Html && tags.iter().any(|&t| e.tag == t))
    }

    pub(super) fn current_node_is(&self, tag: Tag) -> bool {
        self.current_node().is_some_and(|id| self.is_html(id, tag))
    }

    pub(super) fn current_node_is_one_of(&self, tags: &[Tag]) -> bool {
        self.current_node().is_some_and(|id| self.is_html_one_of(id, tags))
    }

    /// Tag and namespace of an element node.
    pub(super) fn identity(&self, id: NodeId) -> Option<(TagId, Namespace)> {
        self.element(id).map(|e| (e.tag, e.namespace))
    }

    /// [§ 13.2.6.5](https://html.spec.whatwg.org/multipage/parsing.html#mathml-text-integration-point)
    ///
    /// "A node is a MathML text integration point if it is one of the
    /// following elements: A MathML mi element, A MathML mo element, A MathML
    /// mn element, A MathML ms element, A MathML mtext element"
    pub(super) fn is_mathml_text_integration_point(&self, id: NodeId) -> bool {
        self.element(id).is_some_and(|e| {
            e.namespace == Namespace::MathMl
                && matches!(e.tag.tag(), Tag::Mi | Tag::Mo | Tag::Mn | Tag::Ms | Tag::Mtext)
        })
    }

    /// [§ 13.2.6.5](https://html.spec.whatwg.org/multipage/parsing.html#html-integration-point)
    ///
    /// "A MathML annotation-xml element whose start tag token had an attribute
    /// with the name "encoding" whose value was an ASCII case-insensitive match
    /// for the string "text/html" or "application/xhtml+xml"; an SVG
    /// foreignObject element; an SVG desc element; an SVG title element"
    pub(super) fn is_html_integration_point(&self, id: NodeId) -> bool {
        let Some(e) = self.element(id) else {
            return false;
        };
        match e.namespace {
            Namespace::MathMl if e.tag == Tag::AnnotationXml => {
                e.attr_value(AttrId::ENCODING).is_some_and(|v| {
                    v.eq_ignore_ascii_case("text/html") || v.eq_ignore_ascii_case("application/xhtml+xml")
                })
            }
            Namespace::Svg => matches!(e.tag.tag(), Tag::ForeignObject | Tag::Desc | Tag::Title),
            _ => false,
        }
    }

    // ---- dispatch ------------------------------------------------------

    /// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction-dispatcher)
    ///
    /// "As each token is emitted from the tokenizer, the user agent must follow
    /// the appropriate steps from the following list, known as the tree
    /// construction dispatcher"
    fn dispatch(&mut self, token: &mut Token) -> Result<(), ParserError> {
        if std::mem::take(&mut self.skip_next_newline)
            && let Token::Character(run) = &mut *token
        {
            run.strip_leading_newline();
            if run.is_empty() {
                return Ok(());
            }
        }

        let self_closing = matches!(token, Token::StartTag(tag) if tag.self_closing);
        self.self_closing_acknowledged = false;

        loop {
            let consumed = if self.use_insertion_mode_rules(token) {
                self.process_using_mode(self.insertion_mode, token)?
            } else {
                self.process_in_foreign_content(token)?
            };
            if consumed {
                break;
            }
        }

        // "When a start tag token is emitted with its self-closing flag set, if
        // the flag is not acknowledged when it is processed by the tree
        // construction stage, that is a parse error."
        if self_closing && !self.self_closing_acknowledged {
            self.parse_error(TreeErrorKind::NonVoidHtmlElementStartTagWithTrailingSolidus, token);
        }
        Ok(())
    }

    /// The dispatcher's test for using "the current insertion mode" rather
    /// than "the rules for parsing tokens in foreign content".
    fn use_insertion_mode_rules(&self, token: &Token) -> bool {
        // "If the stack of open elements is empty"
        let Some(node) = self.adjusted_current_node() else {
            return true;
        };
        let Some(element) = self.element(node) else {
            return true;
        };
        // "If the adjusted current node is an element in the HTML namespace"
        if element.namespace == Namespace::Html {
            return true;
        }
        let is_start = |tags: &[Tag]| {
            matches!(token, Token::StartTag(tag) if tags.iter().any(|&t| tag.name == t))
        };
        match token {
            // "If the adjusted current node is a MathML text integration point
            // and the token is a start tag whose tag name is neither "mglyph"
            // nor "malignmark"" / "...and the token is a character token"
            Token::StartTag(_) | Token::Character(_)
                if self.is_mathml_text_integration_point(node)
                    && !is_start(&[Tag::Mglyph, Tag::Malignmark]) =>
            {
                true
            }
            // "If the adjusted current node is a MathML annotation-xml element
            // and the token is a start tag whose tag name is "svg""
            Token::StartTag(tag)
                if element.is(Tag::AnnotationXml, Namespace::MathMl) && tag.name == Tag::Svg =>
            {
                true
            }
            // "If the adjusted current node is an HTML integration point and
            // the token is a start tag" / "...and the token is a character token"
            Token::StartTag(_) | Token::Character(_) => self.is_html_integration_point(node),
            // "If the token is an end-of-file token"
            Token::EndOfFile => true,
            _ => false,
        }
    }

    /// "Process the token using the rules for" `mode`.
    pub(super) fn process_using_mode(&mut self, mode: InsertionMode, token: &mut Token) -> Handled {
        match mode {
            InsertionMode::Initial => self.handle_initial_mode(token),
            InsertionMode::BeforeHtml => self.handle_before_html_mode(token),
            InsertionMode::BeforeHead => self.handle_before_head_mode(token),
            InsertionMode::InHead => self.handle_in_head_mode(token),
            InsertionMode::InHeadNoscript => self.handle_in_head_noscript_mode(token),
            InsertionMode::AfterHead => self.handle_after_head_mode(token),
            InsertionMode::InBody => self.handle_in_body_mode(token),
            InsertionMode::Text => self.handle_text_mode(token),
            InsertionMode::InTable => self.handle_in_table_mode(token),
            InsertionMode::InTableText => self.handle_in_table_text_mode(token),
            InsertionMode::InCaption => self.handle_in_caption_mode(token),
            InsertionMode::InColumnGroup => self.handle_in_column_group_mode(token),
            InsertionMode::InTableBody => self.handle_in_table_body_mode(token),
            InsertionMode::InRow => self.handle_in_row_mode(token),
            InsertionMode::InCell => self.handle_in_cell_mode(token),
            InsertionMode::InSelect => self.handle_in_select_mode(token),
            InsertionMode::InSelectInTable => self.handle_in_select_in_table_mode(token),
            InsertionMode::InTemplate => self.handle_in_template_mode(token),
            InsertionMode::AfterBody => self.handle_after_body_mode(token),
            InsertionMode::InFrameset => self.handle_in_frameset_mode(token),
            InsertionMode::AfterFrameset => self.handle_after_frameset_mode(token),
            InsertionMode::AfterAfterBody => self.handle_after_after_body_mode(token),
            InsertionMode::AfterAfterFrameset => self.handle_after_after_frameset_mode(token),
        }
    }

    /// Split off the leading whitespace of a character token.
    pub(super) fn split_whitespace(token: &mut Token) -> Option<String> {
        match token {
            Token::Character(run) => {
                let ws = run.take_leading_whitespace();
                (!ws.is_empty()).then_some(ws)
            }
            _ => None,
        }
    }

    /// Whether a token is a character token with nothing left in it.
    pub(super) const fn is_spent(token: &Token) -> bool {
        matches!(token, Token::Character(run) if run.data.is_empty())
    }

    /// Record an unexpected-null error for each data-state NUL of a run.
    /// The tokenizer already reported the others.
    pub(super) fn null_error(&mut self, run: &CharacterRun) {
        if run.nulls_replaced {
            return;
        }
        for _ in 0..run.null_count {
            self.parse_error_here(TreeErrorKind::UnexpectedNullCharacter);
        }
    }

    /// Attach the description of `token` to the errors recorded since
    /// `first` that have none.
    fn describe_errors(&mut self, first: usize, token: &Token) {
        if self.errors.iter().skip(first).all(|e| e.token.is_some()) {
            return;
        }
        let description = token.describe(&self.interner.borrow());
        for error in self.errors.iter_mut().skip(first) {
            if error.token.is_none() {
                error.token = Some(description.clone());
            }
        }
    }
}

impl TokenSink for TreeConstructor {
    type Error = ParserError;

    fn process_token(&mut self, token: Token, steering: &mut Steering) -> Result<(), ParserError> {
        if self.status != ParseStatus::Running {
            return Ok(());
        }
        self.position = steering.position();

        let mut token = token;
        let first_error = self.errors.len();
        let dispatched = self.dispatch(&mut token);
        self.describe_errors(first_error, &token);
        if let Err(error) = dispatched {
            self.abort(&error);
            return Err(error);
        }
        if let Some(state) = self.next_tokenizer_state.take() {
            steering.set_state(state);
        }

        if self.strict && (steering.tokenizer_errors() > 0 || !self.errors.is_empty()) {
            let error = ParserError::Strict {
                position: self.position,
            };
            self.abort(&error);
            return Err(error);
        }
        Ok(())
    }

    fn adjusted_current_node_is_foreign(&self) -> bool {
        self.adjusted_current_node()
            .and_then(|id| self.element(id))
            .is_some_and(|e| e.namespace != Namespace::Html)
    }
}
