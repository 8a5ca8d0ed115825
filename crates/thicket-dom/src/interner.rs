//! Interned names for tags, attributes and namespace prefixes.
//!
//! Every tag name the parser has special rules for is pre-seeded so that its
//! [`TagId`] equals the discriminant of the matching [`Tag`] variant. Names
//! the parser has never heard of are interned on demand and map back to
//! [`Tag::Unknown`].
//!
//! The interner is shared between a [`Document`](crate::Document) and every
//! tokenizer feeding it through a [`SharedInterner`] handle; the tables live
//! until the last handle is dropped.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumCount, EnumIter, FromRepr, IntoStaticStr};

/// Reference-counted interner handle shared by a document and its tokenizers.
pub type SharedInterner = Rc<RefCell<Interner>>;

/// Interned tag name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagId(pub u32);

impl TagId {
    /// The known tag this id stands for, or [`Tag::Unknown`].
    #[must_use]
    pub fn tag(self) -> Tag {
        Tag::from_repr(self.0).unwrap_or(Tag::Unknown)
    }

    /// Whether this id is one of the pre-seeded tag names.
    #[must_use]
    pub fn is_known(self) -> bool {
        self.tag() != Tag::Unknown
    }
}

impl From<Tag> for TagId {
    fn from(tag: Tag) -> Self {
        tag.id()
    }
}

impl PartialEq<Tag> for TagId {
    fn eq(&self, other: &Tag) -> bool {
        self.0 == *other as u32
    }
}

/// Interned attribute local name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttrId(pub u32);

impl AttrId {
    /// `id`
    pub const ID: Self = Self(0);
    /// `class`
    pub const CLASS: Self = Self(1);
    /// `type`
    pub const TYPE: Self = Self(2);
    /// `color`
    pub const COLOR: Self = Self(3);
    /// `face`
    pub const FACE: Self = Self(4);
    /// `size`
    pub const SIZE: Self = Self(5);
    /// `encoding`
    pub const ENCODING: Self = Self(6);
}

const KNOWN_ATTRS: [&str; 7] = ["id", "class", "type", "color", "face", "size", "encoding"];

/// Interned namespace prefix (`xlink`, `xml`, `xmlns`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrefixId(pub u32);

impl PrefixId {
    /// `xlink`
    pub const XLINK: Self = Self(0);
    /// `xml`
    pub const XML: Self = Self(1);
    /// `xmlns`
    pub const XMLNS: Self = Self(2);
}

const KNOWN_PREFIXES: [&str; 3] = ["xlink", "xml", "xmlns"];

/// Tag names with dedicated tree-construction rules.
///
/// The discriminant of each variant is its pre-seeded [`TagId`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumIter,
    EnumCount,
    FromRepr,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[repr(u32)]
#[allow(missing_docs)]
pub enum Tag {
    A,
    Address,
    #[strum(serialize = "annotation-xml")]
    AnnotationXml,
    Applet,
    Area,
    Article,
    Aside,
    B,
    Base,
    Basefont,
    Bgsound,
    Big,
    Blockquote,
    Body,
    Br,
    Button,
    Caption,
    Center,
    Code,
    Col,
    Colgroup,
    Dd,
    Desc,
    Details,
    Dialog,
    Dir,
    Div,
    Dl,
    Dt,
    Em,
    Embed,
    Fieldset,
    Figcaption,
    Figure,
    Font,
    Footer,
    #[strum(serialize = "foreignObject")]
    ForeignObject,
    Form,
    Frame,
    Frameset,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Head,
    Header,
    Hgroup,
    Hr,
    Html,
    I,
    Iframe,
    Image,
    Img,
    Input,
    Keygen,
    Li,
    Link,
    Listing,
    Main,
    Malignmark,
    Marquee,
    Math,
    Menu,
    Meta,
    Mglyph,
    Mi,
    Mn,
    Mo,
    Ms,
    Mtext,
    Nav,
    Nobr,
    Noembed,
    Noframes,
    Noscript,
    Object,
    Ol,
    Optgroup,
    Option,
    P,
    Param,
    Plaintext,
    Pre,
    Rb,
    Rp,
    Rt,
    Rtc,
    Ruby,
    S,
    Script,
    Search,
    Section,
    Select,
    Small,
    Source,
    Span,
    Strike,
    Strong,
    Style,
    Sub,
    Summary,
    Sup,
    Svg,
    Table,
    Tbody,
    Td,
    Template,
    Textarea,
    Tfoot,
    Th,
    Thead,
    Title,
    Tr,
    Track,
    Tt,
    U,
    Ul,
    Var,
    Wbr,
    Xmp,
    /// Any name without dedicated rules. Never produced by the tokenizer
    /// because tag names cannot start with `#`.
    #[strum(serialize = "#unknown")]
    Unknown,
}

impl Tag {
    /// The pre-seeded id of this tag.
    #[must_use]
    pub const fn id(self) -> TagId {
        TagId(self as u32)
    }

    /// The canonical (case-preserving) name of this tag.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// [§ 2.1.8 Namespaces](https://infra.spec.whatwg.org/#namespaces)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter)]
pub enum Namespace {
    /// No namespace (plain attributes).
    #[default]
    #[strum(serialize = "none")]
    None,
    /// "The HTML namespace is "http://www.w3.org/1999/xhtml"."
    #[strum(serialize = "html")]
    Html,
    /// "The MathML namespace is "http://www.w3.org/1998/Math/MathML"."
    #[strum(serialize = "math")]
    MathMl,
    /// "The SVG namespace is "http://www.w3.org/2000/svg"."
    #[strum(serialize = "svg")]
    Svg,
    /// "The XLink namespace is "http://www.w3.org/1999/xlink"."
    #[strum(serialize = "xlink")]
    XLink,
    /// "The XML namespace is "http://www.w3.org/XML/1998/namespace"."
    #[strum(serialize = "xml")]
    Xml,
    /// "The XMLNS namespace is "http://www.w3.org/2000/xmlns/"."
    #[strum(serialize = "xmlns")]
    Xmlns,
}

impl Namespace {
    /// The namespace URI.
    #[must_use]
    pub const fn uri(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Html => "http://www.w3.org/1999/xhtml",
            Self::MathMl => "http://www.w3.org/1998/Math/MathML",
            Self::Svg => "http://www.w3.org/2000/svg",
            Self::XLink => "http://www.w3.org/1999/xlink",
            Self::Xml => "http://www.w3.org/XML/1998/namespace",
            Self::Xmlns => "http://www.w3.org/2000/xmlns/",
        }
    }

    /// Look a namespace up by URI.
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        Self::iter().find(|ns| ns.uri() == uri)
    }
}

/// One name table: dense ids in insertion order plus reverse lookup.
#[derive(Debug, Default)]
struct NameTable {
    names: Vec<Rc<str>>,
    ids: HashMap<Rc<str>, u32>,
}

impl NameTable {
    fn intern(&mut self, name: &str) -> u32 {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = u32::try_from(self.names.len()).unwrap_or(u32::MAX);
        let name: Rc<str> = Rc::from(name);
        self.names.push(Rc::clone(&name));
        let _ = self.ids.insert(name, id);
        id
    }

    fn lookup(&self, name: &str) -> Option<u32> {
        self.ids.get(name).copied()
    }

    fn name(&self, id: u32) -> Option<Rc<str>> {
        self.names.get(id as usize).cloned()
    }
}

/// Tag, attribute and prefix name tables.
#[derive(Debug)]
pub struct Interner {
    tags: NameTable,
    attrs: NameTable,
    prefixes: NameTable,
}

impl Interner {
    /// An interner pre-seeded with every [`Tag`], the attribute names the
    /// tree builder inspects and the foreign-attribute prefixes.
    #[must_use]
    pub fn new() -> Self {
        let mut interner = Self {
            tags: NameTable::default(),
            attrs: NameTable::default(),
            prefixes: NameTable::default(),
        };
        for tag in Tag::iter() {
            let _ = interner.tags.intern(tag.name());
        }
        for attr in KNOWN_ATTRS {
            let _ = interner.attrs.intern(attr);
        }
        for prefix in KNOWN_PREFIXES {
            let _ = interner.prefixes.intern(prefix);
        }
        interner
    }

    /// A fresh interner behind a shared handle.
    #[must_use]
    pub fn shared() -> SharedInterner {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Intern a tag name, returning the existing id if already present.
    pub fn intern_tag(&mut self, name: &str) -> TagId {
        TagId(self.tags.intern(name))
    }

    /// Look a tag name up without inserting it.
    #[must_use]
    pub fn lookup_tag(&self, name: &str) -> Option<TagId> {
        self.tags.lookup(name).map(TagId)
    }

    /// The name behind a tag id.
    #[must_use]
    pub fn tag_name(&self, id: TagId) -> Option<Rc<str>> {
        self.tags.name(id.0)
    }

    /// Intern an attribute local name.
    pub fn intern_attr(&mut self, name: &str) -> AttrId {
        AttrId(self.attrs.intern(name))
    }

    /// Look an attribute name up without inserting it.
    #[must_use]
    pub fn lookup_attr(&self, name: &str) -> Option<AttrId> {
        self.attrs.lookup(name).map(AttrId)
    }

    /// The name behind an attribute id.
    #[must_use]
    pub fn attr_name(&self, id: AttrId) -> Option<Rc<str>> {
        self.attrs.name(id.0)
    }

    /// Intern a namespace prefix.
    pub fn intern_prefix(&mut self, prefix: &str) -> PrefixId {
        PrefixId(self.prefixes.intern(prefix))
    }

    /// The text of an interned prefix.
    #[must_use]
    pub fn prefix_name(&self, id: PrefixId) -> Option<Rc<str>> {
        self.prefixes.name(id.0)
    }

    /// Number of distinct tag names interned so far.
    #[must_use]
    pub fn tag_count(&self) -> usize {
        self.tags.names.len()
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::EnumCount;

    #[test]
    fn known_tags_keep_their_discriminants() {
        let interner = Interner::new();
        for tag in Tag::iter() {
            assert_eq!(interner.lookup_tag(tag.name()), Some(tag.id()), "{tag}");
        }
        assert_eq!(interner.tag_count(), Tag::COUNT);
    }

    #[test]
    fn unknown_names_get_fresh_ids() {
        let mut interner = Interner::new();
        let custom = interner.intern_tag("my-widget");
        assert_eq!(custom.tag(), Tag::Unknown);
        assert_eq!(interner.intern_tag("my-widget"), custom);
        assert_eq!(interner.tag_name(custom).as_deref(), Some("my-widget"));
    }

    #[test]
    fn foreign_names_are_case_sensitive() {
        let mut interner = Interner::new();
        assert_eq!(interner.intern_tag("foreignObject"), Tag::ForeignObject.id());
        assert_ne!(interner.intern_tag("foreignobject"), Tag::ForeignObject.id());
        assert_eq!(interner.intern_tag("annotation-xml"), Tag::AnnotationXml.id());
    }

    #[test]
    fn known_attributes_are_seeded() {
        let interner = Interner::new();
        assert_eq!(interner.lookup_attr("type"), Some(AttrId::TYPE));
        assert_eq!(interner.lookup_attr("encoding"), Some(AttrId::ENCODING));
        assert_eq!(interner.attr_name(AttrId::CLASS).as_deref(), Some("class"));
    }

    #[test]
    fn namespace_round_trips_through_uri() {
        for ns in Namespace::iter() {
            assert_eq!(Namespace::from_uri(ns.uri()), Some(ns));
        }
    }
}
