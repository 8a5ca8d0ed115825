//! Element categories used by tree construction.
//!
//! [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
//! sorts elements into special, formatting and ordinary, and defines the
//! element types that bound each flavour of "has an element in scope".

use core::fmt;
use core::ops::BitOr;

use thicket_dom::{Namespace, Tag, TagId};

/// A set of element categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TagCategory(u8);

impl TagCategory {
    /// Neither special nor formatting.
    pub const ORDINARY: Self = Self(1);
    /// "The following elements have varying levels of special parsing rules"
    pub const SPECIAL: Self = Self(1 << 1);
    /// a, b, big, code, em, font, i, nobr, s, small, strike, strong, tt, u
    pub const FORMATTING: Self = Self(1 << 2);
    /// Boundary of "has an element in scope".
    pub const SCOPE: Self = Self(1 << 3);
    /// Boundary of "has an element in list item scope".
    pub const SCOPE_LIST_ITEM: Self = Self(1 << 4);
    /// Boundary of "has an element in button scope".
    pub const SCOPE_BUTTON: Self = Self(1 << 5);
    /// Boundary of "has an element in table scope".
    pub const SCOPE_TABLE: Self = Self(1 << 6);
    /// Boundary of "has an element in select scope".
    pub const SCOPE_SELECT: Self = Self(1 << 7);

    /// The empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Whether every category in `other` is present.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether any category in `other` is present.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Set union.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Raw bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for TagCategory {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl fmt::Display for TagCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(TagCategory, &str); 8] = [
            (TagCategory::ORDINARY, "ordinary"),
            (TagCategory::SPECIAL, "special"),
            (TagCategory::FORMATTING, "formatting"),
            (TagCategory::SCOPE, "scope"),
            (TagCategory::SCOPE_LIST_ITEM, "scope-list-item"),
            (TagCategory::SCOPE_BUTTON, "scope-button"),
            (TagCategory::SCOPE_TABLE, "scope-table"),
            (TagCategory::SCOPE_SELECT, "scope-select"),
        ];
        let mut first = true;
        for (category, name) in NAMES {
            if self.contains(category) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// The categories of the element `tag` in `namespace`.
///
/// Unknown tags, and known tags in a namespace where they carry no rules,
/// are `ORDINARY | SCOPE_SELECT`.
#[must_use]
pub fn category(tag: TagId, namespace: Namespace) -> TagCategory {
    let ordinary = TagCategory::ORDINARY | TagCategory::SCOPE_SELECT;
    match namespace {
        Namespace::Html => html_category(tag.tag()),
        Namespace::MathMl => match tag.tag() {
            Tag::Mi | Tag::Mo | Tag::Mn | Tag::Ms | Tag::Mtext | Tag::AnnotationXml => {
                special_scope()
            }
            _ => ordinary,
        },
        Namespace::Svg => match tag.tag() {
            Tag::ForeignObject | Tag::Desc | Tag::Title => special_scope(),
            _ => ordinary,
        },
        _ => ordinary,
    }
}

/// Special elements bounding the default, list item and button scopes.
const fn special_scope() -> TagCategory {
    TagCategory::SPECIAL
        .union(TagCategory::SCOPE)
        .union(TagCategory::SCOPE_LIST_ITEM)
        .union(TagCategory::SCOPE_BUTTON)
        .union(TagCategory::SCOPE_SELECT)
}

fn html_category(tag: Tag) -> TagCategory {
    let select = TagCategory::SCOPE_SELECT;
    match tag {
        Tag::Html | Tag::Table | Tag::Template => special_scope() | TagCategory::SCOPE_TABLE,
        Tag::Applet | Tag::Caption | Tag::Td | Tag::Th | Tag::Marquee | Tag::Object => {
            special_scope()
        }
        Tag::Ol | Tag::Ul => TagCategory::SPECIAL | TagCategory::SCOPE_LIST_ITEM | select,
        Tag::Button => TagCategory::SPECIAL | TagCategory::SCOPE_BUTTON | select,
        // "all element types except the following: optgroup in the HTML
        // namespace, option in the HTML namespace"
        Tag::Optgroup | Tag::Option => TagCategory::ORDINARY,
        Tag::A
        | Tag::B
        | Tag::Big
        | Tag::Code
        | Tag::Em
        | Tag::Font
        | Tag::I
        | Tag::Nobr
        | Tag::S
        | Tag::Small
        | Tag::Strike
        | Tag::Strong
        | Tag::Tt
        | Tag::U => TagCategory::FORMATTING | select,
        Tag::Address
        | Tag::Area
        | Tag::Article
        | Tag::Aside
        | Tag::Base
        | Tag::Basefont
        | Tag::Bgsound
        | Tag::Blockquote
        | Tag::Body
        | Tag::Br
        | Tag::Center
        | Tag::Col
        | Tag::Colgroup
        | Tag::Dd
        | Tag::Details
        | Tag::Dir
        | Tag::Div
        | Tag::Dl
        | Tag::Dt
        | Tag::Embed
        | Tag::Fieldset
        | Tag::Figcaption
        | Tag::Figure
        | Tag::Footer
        | Tag::Form
        | Tag::Frame
        | Tag::Frameset
        | Tag::H1
        | Tag::H2
        | Tag::H3
        | Tag::H4
        | Tag::H5
        | Tag::H6
        | Tag::Head
        | Tag::Header
        | Tag::Hgroup
        | Tag::Hr
        | Tag::Iframe
        | Tag::Img
        | Tag::Input
        | Tag::Keygen
        | Tag::Li
        | Tag::Link
        | Tag::Listing
        | Tag::Main
        | Tag::Menu
        | Tag::Meta
        | Tag::Nav
        | Tag::Noembed
        | Tag::Noframes
        | Tag::Noscript
        | Tag::P
        | Tag::Param
        | Tag::Plaintext
        | Tag::Pre
        | Tag::Script
        | Tag::Search
        | Tag::Section
        | Tag::Select
        | Tag::Source
        | Tag::Style
        | Tag::Summary
        | Tag::Tbody
        | Tag::Textarea
        | Tag::Tfoot
        | Tag::Thead
        | Tag::Title
        | Tag::Tr
        | Tag::Track
        | Tag::Wbr
        | Tag::Xmp => TagCategory::SPECIAL | select,
        _ => TagCategory::ORDINARY | select,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_and_out_of_range_ids_are_ordinary() {
        let expected = TagCategory::ORDINARY | TagCategory::SCOPE_SELECT;
        assert_eq!(category(TagId(u32::MAX), Namespace::Html), expected);
        assert_eq!(category(Tag::Unknown.id(), Namespace::Html), expected);
        assert_eq!(category(Tag::Div.id(), Namespace::MathMl), expected);
    }

    #[test]
    fn scope_boundaries() {
        let table = category(Tag::Table.id(), Namespace::Html);
        assert!(table.contains(TagCategory::SCOPE | TagCategory::SCOPE_TABLE | TagCategory::SPECIAL));
        let ul = category(Tag::Ul.id(), Namespace::Html);
        assert!(ul.contains(TagCategory::SCOPE_LIST_ITEM));
        assert!(!ul.contains(TagCategory::SCOPE));
        let option = category(Tag::Option.id(), Namespace::Html);
        assert!(!option.contains(TagCategory::SCOPE_SELECT));
        let svg_title = category(Tag::Title.id(), Namespace::Svg);
        assert!(svg_title.contains(TagCategory::SCOPE));
        let html_title = category(Tag::Title.id(), Namespace::Html);
        assert!(!html_title.contains(TagCategory::SCOPE));
    }

    #[test]
    fn formatting_elements() {
        for tag in [Tag::A, Tag::Nobr, Tag::Font, Tag::Tt] {
            assert!(category(tag.id(), Namespace::Html).contains(TagCategory::FORMATTING));
        }
        assert!(!category(Tag::Span.id(), Namespace::Html).contains(TagCategory::FORMATTING));
    }

    #[test]
    fn display_lists_members() {
        let cat = TagCategory::SPECIAL | TagCategory::SCOPE_BUTTON;
        assert_eq!(cat.to_string(), "special|scope-button");
    }
}
