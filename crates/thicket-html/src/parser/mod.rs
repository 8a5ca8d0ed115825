//! [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
//!
//! The tree constructor consumes tokens through [`TokenSink`](crate::tokenizer::TokenSink)
//! and builds a [`Document`](thicket_dom::Document).

mod core;
mod formatting;
pub mod foreign_content;
mod insertion;
mod modes;
pub mod quirks;
mod stack;

pub use self::core::{
    ActiveFormattingElement, InsertionMode, ParseStatus, TreeBuilderConfig, TreeConstructor,
};
