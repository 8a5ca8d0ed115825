//! Document tree for the Thicket HTML parser.
//!
//! This crate provides an arena-based document following the
//! [DOM Living Standard](https://dom.spec.whatwg.org/), plus the name
//! interner shared between a document and the tokenizers that feed it.
//!
//! # Design
//!
//! Nodes live in a single vector owned by [`Document`] and refer to each
//! other by [`NodeId`]. Parent, first/last child and sibling links make every
//! mutation primitive O(1). Destroyed nodes return their slot to a free list.

mod document;
mod interner;
mod node;

pub use document::{Ancestors, Children, CompatMode, Document, DomError};
pub use interner::{AttrId, Interner, Namespace, PrefixId, SharedInterner, Tag, TagId};
pub use node::{Attr, DoctypeData, ElementData, Node, NodeId, NodeType};
