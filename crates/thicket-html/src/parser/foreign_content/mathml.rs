//! MathML name fix-ups.

use thicket_dom::Interner;

use crate::tokenizer::Attribute;

/// [§ 13.2.6.3 Adjust MathML attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-mathml-attributes)
///
/// "if the token has an attribute named definitionurl, change its name to
/// definitionURL (note the case difference)."
pub fn adjust_mathml_attributes(attributes: &mut [Attribute], interner: &mut Interner) {
    let Some(lower) = interner.lookup_attr("definitionurl") else {
        return;
    };
    for attr in attributes.iter_mut().filter(|a| a.name == lower) {
        attr.name = interner.intern_attr("definitionURL");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definition_url_is_recased() {
        let mut interner = Interner::new();
        let mut attrs = vec![Attribute::new(interner.intern_attr("definitionurl"), "x".into())];
        adjust_mathml_attributes(&mut attrs, &mut interner);
        assert_eq!(interner.attr_name(attrs[0].name).as_deref(), Some("definitionURL"));
    }
}
