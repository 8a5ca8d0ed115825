//! HTML tokenizer and tree constructor for Thicket.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tag categories** used by the scope algorithms ([`tag_category`])
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Every lexical state, including script data escapes, CDATA and
//!     character references
//!   - Chunked byte input with suspension on split lookahead
//! - **Tree Construction** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - All 23 insertion modes, foreign content, foster parenting, the
//!     adoption agency algorithm and template contents
//! - **Parse driver** for documents and fragments ([`HTMLParser`])
//! - **Tree dump** in the html5lib test format ([`dump`])
//!
//! # Not Implemented
//!
//! - Serialization back to markup
//! - Encoding sniffing (input is UTF-8)
//! - Script execution

/// Document and fragment parse driver.
pub mod driver;
/// html5lib-style tree dump.
pub mod dump;
/// Parse errors and parser errors.
pub mod error;
/// Tree construction.
pub mod parser;
/// Element categories for the scope algorithms.
pub mod tag_category;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

pub use driver::{HTMLParser, ParseOutput, ParserConfig};
pub use dump::print_tree;
pub use error::{ErrorKind, ParseError, ParserError, Stage, TokenizerErrorKind, TreeErrorKind};
pub use parser::{InsertionMode, ParseStatus, TreeConstructor};
pub use tokenizer::{Attribute, HTMLTokenizer, Token, TokenSink};
