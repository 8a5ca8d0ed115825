//! Foreign content parsing support for SVG and MathML.
//!
//! [§ 13.2.6.1 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)
//! [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)

pub mod mathml;
pub mod svg;

pub use mathml::adjust_mathml_attributes;
pub use svg::{adjust_svg_attributes, adjust_svg_tag_name};

use thicket_dom::{Attr, AttrId, Interner, Namespace, NodeId, PrefixId, Tag, TagId};

use super::core::{Handled, TreeConstructor};
use crate::error::TreeErrorKind;
use crate::tokenizer::token::is_html_whitespace;
use crate::tokenizer::{Attribute, Token};

/// [§ 13.2.6.1 Adjust foreign attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-foreign-attributes)
///
/// "if any of the attributes on the token match the strings given in the
/// first column of the following table, let the attribute be a namespaced
/// attribute, with the prefix being the string given in the corresponding
/// cell in the second column, the local name being the string given in the
/// corresponding cell in the third column, and the namespace being the
/// namespace given in the corresponding cell in the fourth column."
const FOREIGN_ATTRIBUTE_ADJUSTMENTS: &[(&str, Option<PrefixId>, &str, Namespace)] = &[
    ("xlink:actuate", Some(PrefixId::XLINK), "actuate", Namespace::XLink),
    ("xlink:arcrole", Some(PrefixId::XLINK), "arcrole", Namespace::XLink),
    ("xlink:href", Some(PrefixId::XLINK), "href", Namespace::XLink),
    ("xlink:role", Some(PrefixId::XLINK), "role", Namespace::XLink),
    ("xlink:show", Some(PrefixId::XLINK), "show", Namespace::XLink),
    ("xlink:title", Some(PrefixId::XLINK), "title", Namespace::XLink),
    ("xlink:type", Some(PrefixId::XLINK), "type", Namespace::XLink),
    ("xml:lang", Some(PrefixId::XML), "lang", Namespace::Xml),
    ("xml:space", Some(PrefixId::XML), "space", Namespace::Xml),
    ("xmlns", None, "xmlns", Namespace::Xmlns),
    ("xmlns:xlink", Some(PrefixId::XMLNS), "xlink", Namespace::Xmlns),
];

/// Turn token attributes into DOM attributes, namespacing the ones listed in
/// the foreign attribute table.
pub fn foreign_attrs(attributes: &[Attribute], interner: &mut Interner) -> Vec<Attr> {
    attributes
        .iter()
        .map(|attribute| {
            let name = interner.attr_name(attribute.name);
            let adjustment = name.as_deref().and_then(|name| {
                FOREIGN_ATTRIBUTE_ADJUSTMENTS
                    .iter()
                    .find(|(qualified, ..)| *qualified == name)
            });
            match adjustment {
                Some(&(qualified, prefix, local, namespace)) => Attr {
                    local_name: interner.intern_attr(local),
                    qualified_name: prefix.map(|_| qualified.to_string()),
                    namespace,
                    prefix,
                    value: attribute.value.clone(),
                    owner: None,
                },
                None => Attr::new(attribute.name, attribute.value.clone()),
            }
        })
        .collect()
}

/// "A start tag whose tag name is one of: "b", "big", "blockquote", "body",
/// "br", "center", "code", "dd", "div", "dl", "dt", "em", "embed", "h1", "h2",
/// "h3", "h4", "h5", "h6", "head", "hr", "i", "img", "li", "listing", "menu",
/// "meta", "nobr", "ol", "p", "pre", "ruby", "s", "small", "span", "strong",
/// "strike", "sub", "sup", "table", "tt", "u", "ul", "var""
const BREAKOUT_TAGS: &[Tag] = &[
    Tag::B,
    Tag::Big,
    Tag::Blockquote,
    Tag::Body,
    Tag::Br,
    Tag::Center,
    Tag::Code,
    Tag::Dd,
    Tag::Div,
    Tag::Dl,
    Tag::Dt,
    Tag::Em,
    Tag::Embed,
    Tag::H1,
    Tag::H2,
    Tag::H3,
    Tag::H4,
    Tag::H5,
    Tag::H6,
    Tag::Head,
    Tag::Hr,
    Tag::I,
    Tag::Img,
    Tag::Li,
    Tag::Listing,
    Tag::Menu,
    Tag::Meta,
    Tag::Nobr,
    Tag::Ol,
    Tag::P,
    Tag::Pre,
    Tag::Ruby,
    Tag::S,
    Tag::Small,
    Tag::Span,
    Tag::Strong,
    Tag::Strike,
    Tag::Sub,
    Tag::Sup,
    Tag::Table,
    Tag::Tt,
    Tag::U,
    Tag::Ul,
    Tag::Var,
];

impl TreeConstructor {
    /// [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
    pub(super) fn process_in_foreign_content(&mut self, token: &mut Token) -> Handled {
        match &*token {
            // "A character token that is U+0000 NULL: Parse error. Insert a
            // U+FFFD REPLACEMENT CHARACTER character."
            // "Any other character token: Insert the token's character. Set the
            // frameset-ok flag to "not ok"."
            Token::Character(run) => {
                self.null_error(run);
                let ignorable = |c: char| (c == '\0' && !run.nulls_replaced) || is_html_whitespace(c);
                if !run.data.chars().all(ignorable) {
                    self.frameset_ok = false;
                }
                let text = run.text_replace_null();
                self.insert_character(&text)?;
            }
            Token::Comment(data) => self.insert_comment(data, None)?,
            Token::Doctype(_) => self.parse_error(TreeErrorKind::UnexpectedDoctype, token),

            Token::StartTag(tag)
                if BREAKOUT_TAGS.iter().any(|&t| tag.name == t)
                    || (tag.name == Tag::Font
                        && [AttrId::COLOR, AttrId::FACE, AttrId::SIZE]
                            .iter()
                            .any(|&a| tag.attr(a).is_some())) =>
            {
                return self.break_out_of_foreign_content(token);
            }
            Token::EndTag(tag) if tag.name == Tag::Br || tag.name == Tag::P => {
                return self.break_out_of_foreign_content(token);
            }

            Token::StartTag(_) => return self.foreign_start_tag(token),

            // "An end tag whose tag name is "script", if the current node is an
            // SVG script element: Pop the current node off the stack of open
            // elements."
            Token::EndTag(tag)
                if tag.name == Tag::Script
                    && self
                        .current_node()
                        .and_then(|id| self.element(id))
                        .is_some_and(|e| e.is(Tag::Script, Namespace::Svg)) =>
            {
                let _ = self.stack_of_open_elements.pop();
            }

            Token::EndTag(tag) => {
                let name = tag.name;
                return self.foreign_end_tag(token, name);
            }

            Token::EndOfFile => {}
        }
        Ok(true)
    }

    /// "Parse error. While the current node is not a MathML text integration
    /// point, an HTML integration point, or an element in the HTML namespace,
    /// pop elements from the stack of open elements. Reprocess the token
    /// according to the rules given in the section corresponding to the
    /// current insertion mode in HTML content."
    fn break_out_of_foreign_content(&mut self, token: &mut Token) -> Handled {
        self.parse_error(TreeErrorKind::UnexpectedStartTag, token);
        while let Some(node) = self.current_node() {
            let html = self.element(node).is_none_or(|e| e.namespace == Namespace::Html);
            if html
                || self.is_mathml_text_integration_point(node)
                || self.is_html_integration_point(node)
            {
                break;
            }
            let _ = self.stack_of_open_elements.pop();
        }
        self.process_using_mode(self.insertion_mode, token)
    }

    /// "Any other start tag"
    fn foreign_start_tag(&mut self, token: &mut Token) -> Handled {
        let namespace = self
            .adjusted_current_node()
            .and_then(|id| self.element(id))
            .map_or(Namespace::Html, |e| e.namespace);
        let Token::StartTag(tag) = token else {
            return Ok(true);
        };

        // "If the adjusted current node is an element in the SVG namespace,
        // and the token's tag name is one of the ones in the first column of
        // the following table, change the tag name"
        if namespace == Namespace::Svg {
            tag.name = adjust_svg_tag_name(tag.name, &mut self.interner.borrow_mut());
        }

        // "Insert a foreign element for the token, with adjusted current
        // node's namespace and false." Attribute adjustments happen on
        // creation.
        let _ = self.insert_foreign_element(tag, namespace)?;

        // "If the token has its self-closing flag set, then run the
        // appropriate steps from the following list: ... Pop the current node
        // off the stack of open elements and acknowledge the token's
        // self-closing flag."
        if tag.self_closing {
            let _ = self.stack_of_open_elements.pop();
            self.self_closing_acknowledged = true;
        }
        Ok(true)
    }

    /// "Any other end tag"
    fn foreign_end_tag(&mut self, token: &mut Token, name: TagId) -> Handled {
        let wanted = self.interner.borrow().tag_name(name);
        let matches = |this: &Self, node: NodeId| {
            let found = this.document.tag_name(node);
            match (&found, &wanted) {
                (Some(found), Some(wanted)) => found.eq_ignore_ascii_case(wanted),
                _ => false,
            }
        };

        let Some(mut index) = self.stack_of_open_elements.len().checked_sub(1) else {
            return Ok(true);
        };
        // "If node's tag name, converted to ASCII lowercase, is not the same as
        // the tag name of the token, then this is a parse error."
        if !matches(self, self.stack_of_open_elements[index]) {
            self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
        }

        loop {
            // "If node is the topmost element in the stack of open elements,
            // then return. (fragment case)"
            if index == 0 {
                return Ok(true);
            }
            let node = self.stack_of_open_elements[index];
            // "If node's tag name, converted to ASCII lowercase, is the same as
            // the tag name of the token, pop elements from the stack of open
            // elements until node has been popped from the stack, and then
            // return."
            if matches(self, node) {
                self.pop_until_node(node);
                return Ok(true);
            }
            // "Set node to the previous entry in the stack of open elements."
            index -= 1;
            // "If node is not an element in the HTML namespace, return to the
            // step labeled loop. Otherwise, process the token according to the
            // rules given in the section corresponding to the current insertion
            // mode in HTML content."
            let node = self.stack_of_open_elements[index];
            if self.element(node).is_some_and(|e| e.namespace == Namespace::Html) {
                return self.process_using_mode(self.insertion_mode, token);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xlink_attributes_are_namespaced() {
        let mut interner = Interner::new();
        let attrs = [
            Attribute::new(interner.intern_attr("xlink:href"), "#a".into()),
            Attribute::new(interner.intern_attr("xmlns"), "http://www.w3.org/2000/svg".into()),
            Attribute::new(interner.intern_attr("width"), "10".into()),
        ];
        let adjusted = foreign_attrs(&attrs, &mut interner);
        assert_eq!(adjusted[0].namespace, Namespace::XLink);
        assert_eq!(adjusted[0].prefix, Some(PrefixId::XLINK));
        assert_eq!(interner.attr_name(adjusted[0].local_name).as_deref(), Some("href"));
        assert_eq!(adjusted[0].qualified_name.as_deref(), Some("xlink:href"));
        assert_eq!(adjusted[1].namespace, Namespace::Xmlns);
        assert_eq!(adjusted[1].prefix, None);
        assert_eq!(adjusted[2].namespace, Namespace::None);
    }
}
