//! SVG name fix-ups.
//!
//! The tokenizer lowercases every tag and attribute name; SVG names are
//! camel-cased, so the tree builder restores them from these tables.

use thicket_dom::{Interner, TagId};

use crate::tokenizer::Attribute;

/// [§ 13.2.6.3 Adjust SVG attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-svg-attributes)
///
/// "if the attribute's name is one of the names in the first column of the
/// following table, set the attribute's name to the name in the second
/// column."
const SVG_ATTRIBUTE_ADJUSTMENTS: &[(&str, &str)] = &[
    ("attributename", "attributeName"),
    ("attributetype", "attributeType"),
    ("basefrequency", "baseFrequency"),
    ("baseprofile", "baseProfile"),
    ("calcmode", "calcMode"),
    ("clippathunits", "clipPathUnits"),
    ("diffuseconstant", "diffuseConstant"),
    ("edgemode", "edgeMode"),
    ("filterunits", "filterUnits"),
    ("glyphref", "glyphRef"),
    ("gradienttransform", "gradientTransform"),
    ("gradientunits", "gradientUnits"),
    ("kernelmatrix", "kernelMatrix"),
    ("kernelunitlength", "kernelUnitLength"),
    ("keypoints", "keyPoints"),
    ("keysplines", "keySplines"),
    ("keytimes", "keyTimes"),
    ("lengthadjust", "lengthAdjust"),
    ("limitingconeangle", "limitingConeAngle"),
    ("markerheight", "markerHeight"),
    ("markerunits", "markerUnits"),
    ("markerwidth", "markerWidth"),
    ("maskcontentunits", "maskContentUnits"),
    ("maskunits", "maskUnits"),
    ("numoctaves", "numOctaves"),
    ("pathlength", "pathLength"),
    ("patterncontentunits", "patternContentUnits"),
    ("patterntransform", "patternTransform"),
    ("patternunits", "patternUnits"),
    ("pointsatx", "pointsAtX"),
    ("pointsaty", "pointsAtY"),
    ("pointsatz", "pointsAtZ"),
    ("preservealpha", "preserveAlpha"),
    ("preserveaspectratio", "preserveAspectRatio"),
    ("primitiveunits", "primitiveUnits"),
    ("refx", "refX"),
    ("refy", "refY"),
    ("repeatcount", "repeatCount"),
    ("repeatdur", "repeatDur"),
    ("requiredextensions", "requiredExtensions"),
    ("requiredfeatures", "requiredFeatures"),
    ("specularconstant", "specularConstant"),
    ("specularexponent", "specularExponent"),
    ("spreadmethod", "spreadMethod"),
    ("startoffset", "startOffset"),
    ("stddeviation", "stdDeviation"),
    ("stitchtiles", "stitchTiles"),
    ("surfacescale", "surfaceScale"),
    ("systemlanguage", "systemLanguage"),
    ("tablevalues", "tableValues"),
    ("targetx", "targetX"),
    ("targety", "targetY"),
    ("textlength", "textLength"),
    ("viewbox", "viewBox"),
    ("viewtarget", "viewTarget"),
    ("xchannelselector", "xChannelSelector"),
    ("ychannelselector", "yChannelSelector"),
    ("zoomandpan", "zoomAndPan"),
];

/// [§ 13.2.6.5](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
///
/// "If the adjusted current node is an element in the SVG namespace, and the
/// token's tag name is one of the ones in the first column of the following
/// table, change the tag name to the name given in the corresponding cell in
/// the second column."
const SVG_TAG_ADJUSTMENTS: &[(&str, &str)] = &[
    ("altglyph", "altGlyph"),
    ("altglyphdef", "altGlyphDef"),
    ("altglyphitem", "altGlyphItem"),
    ("animatecolor", "animateColor"),
    ("animatemotion", "animateMotion"),
    ("animatetransform", "animateTransform"),
    ("clippath", "clipPath"),
    ("feblend", "feBlend"),
    ("fecolormatrix", "feColorMatrix"),
    ("fecomponenttransfer", "feComponentTransfer"),
    ("fecomposite", "feComposite"),
    ("feconvolvematrix", "feConvolveMatrix"),
    ("fediffuselighting", "feDiffuseLighting"),
    ("fedisplacementmap", "feDisplacementMap"),
    ("fedistantlight", "feDistantLight"),
    ("fedropshadow", "feDropShadow"),
    ("feflood", "feFlood"),
    ("fefunca", "feFuncA"),
    ("fefuncb", "feFuncB"),
    ("fefuncg", "feFuncG"),
    ("fefuncr", "feFuncR"),
    ("fegaussianblur", "feGaussianBlur"),
    ("feimage", "feImage"),
    ("femerge", "feMerge"),
    ("femergenode", "feMergeNode"),
    ("femorphology", "feMorphology"),
    ("feoffset", "feOffset"),
    ("fepointlight", "fePointLight"),
    ("fespecularlighting", "feSpecularLighting"),
    ("fespotlight", "feSpotLight"),
    ("fetile", "feTile"),
    ("feturbulence", "feTurbulence"),
    ("foreignobject", "foreignObject"),
    ("glyphref", "glyphRef"),
    ("lineargradient", "linearGradient"),
    ("radialgradient", "radialGradient"),
    ("textpath", "textPath"),
];

/// Restore the casing of SVG attribute names, re-interning renamed ones.
pub fn adjust_svg_attributes(attributes: &mut [Attribute], interner: &mut Interner) {
    for attr in &mut *attributes {
        let Some(name) = interner.attr_name(attr.name) else {
            continue;
        };
        if let Some(&(_, to)) = SVG_ATTRIBUTE_ADJUSTMENTS.iter().find(|(from, _)| *from == &*name) {
            attr.name = interner.intern_attr(to);
        }
    }
}

/// Restore the casing of an SVG tag name.
pub fn adjust_svg_tag_name(name: TagId, interner: &mut Interner) -> TagId {
    let Some(lower) = interner.tag_name(name) else {
        return name;
    };
    match SVG_TAG_ADJUSTMENTS.iter().find(|(from, _)| *from == &*lower) {
        Some(&(_, to)) => interner.intern_tag(to),
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thicket_dom::Tag;

    #[test]
    fn tag_names_regain_case() {
        let mut interner = Interner::new();
        let lowered = interner.intern_tag("foreignobject");
        assert_eq!(adjust_svg_tag_name(lowered, &mut interner), Tag::ForeignObject.id());
        let clip = interner.intern_tag("clippath");
        let fixed = adjust_svg_tag_name(clip, &mut interner);
        assert_eq!(interner.tag_name(fixed).as_deref(), Some("clipPath"));
        assert_eq!(adjust_svg_tag_name(Tag::Svg.id(), &mut interner), Tag::Svg.id());
    }

    #[test]
    fn attribute_names_regain_case() {
        let mut interner = Interner::new();
        let mut attrs = vec![
            Attribute::new(interner.intern_attr("viewbox"), "0 0 1 1".into()),
            Attribute::new(interner.intern_attr("fill"), "red".into()),
        ];
        adjust_svg_attributes(&mut attrs, &mut interner);
        assert_eq!(interner.attr_name(attrs[0].name).as_deref(), Some("viewBox"));
        assert_eq!(interner.attr_name(attrs[1].name).as_deref(), Some("fill"));
    }
}
