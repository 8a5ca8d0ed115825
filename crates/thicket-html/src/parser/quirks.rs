//! DOCTYPE classification for [§ 13.2.6.4.1 the "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode).

use thicket_dom::CompatMode;

use crate::tokenizer::Doctype;

/// Public identifiers that start with one of these put the document in
/// quirks mode.
const QUIRKS_PUBLIC_PREFIXES: &[&str] = &[
    "+//silmaril//dtd html pro v0r11 19970101//",
    "-//as//dtd html 3.0 aswedit + extensions//",
    "-//advasoft ltd//dtd html 3.0 aswedit + extensions//",
    "-//ietf//dtd html 2.0 level 1//",
    "-//ietf//dtd html 2.0 level 2//",
    "-//ietf//dtd html 2.0 strict level 1//",
    "-//ietf//dtd html 2.0 strict level 2//",
    "-//ietf//dtd html 2.0 strict//",
    "-//ietf//dtd html 2.0//",
    "-//ietf//dtd html 2.1e//",
    "-//ietf//dtd html 3.0//",
    "-//ietf//dtd html 3.2 final//",
    "-//ietf//dtd html 3.2//",
    "-//ietf//dtd html 3//",
    "-//ietf//dtd html level 0//",
    "-//ietf//dtd html level 1//",
    "-//ietf//dtd html level 2//",
    "-//ietf//dtd html level 3//",
    "-//ietf//dtd html strict level 0//",
    "-//ietf//dtd html strict level 1//",
    "-//ietf//dtd html strict level 2//",
    "-//ietf//dtd html strict level 3//",
    "-//ietf//dtd html strict//",
    "-//ietf//dtd html//",
    "-//metrius//dtd metrius presentational//",
    "-//microsoft//dtd internet explorer 2.0 html strict//",
    "-//microsoft//dtd internet explorer 2.0 html//",
    "-//microsoft//dtd internet explorer 2.0 tables//",
    "-//microsoft//dtd internet explorer 3.0 html strict//",
    "-//microsoft//dtd internet explorer 3.0 html//",
    "-//microsoft//dtd internet explorer 3.0 tables//",
    "-//netscape comm. corp.//dtd html//",
    "-//netscape comm. corp.//dtd strict html//",
    "-//o'reilly and associates//dtd html 2.0//",
    "-//o'reilly and associates//dtd html extended 1.0//",
    "-//o'reilly and associates//dtd html extended relaxed 1.0//",
    "-//sq//dtd html 2.0 hotmetal + extensions//",
    "-//softquad software//dtd hotmetal pro 6.0::19990601::extensions to html 4.0//",
    "-//softquad//dtd hotmetal pro 4.0::19971010::extensions to html 4.0//",
    "-//spyglass//dtd html 2.0 extended//",
    "-//sun microsystems corp.//dtd hotjava html//",
    "-//sun microsystems corp.//dtd hotjava strict html//",
    "-//w3c//dtd html 3 1995-03-24//",
    "-//w3c//dtd html 3.2 draft//",
    "-//w3c//dtd html 3.2 final//",
    "-//w3c//dtd html 3.2//",
    "-//w3c//dtd html 3.2s draft//",
    "-//w3c//dtd html 4.0 frameset//",
    "-//w3c//dtd html 4.0 transitional//",
    "-//w3c//dtd html experimental 19960712//",
    "-//w3c//dtd html experimental 970421//",
    "-//w3c//dtd w3 html//",
    "-//w3o//dtd w3 html 3.0//",
    "-//webtechs//dtd mozilla html 2.0//",
    "-//webtechs//dtd mozilla html//",
];

/// Public identifiers matched exactly for quirks mode.
const QUIRKS_PUBLIC_IDS: &[&str] = &[
    "-//w3o//dtd w3 html strict 3.0//en//",
    "-/w3c/dtd html 4.0 transitional/en",
    "html",
];

/// Prefixes giving quirks mode when the system identifier is missing and
/// limited-quirks mode when it is present.
const FRAMESET_TRANSITIONAL_PREFIXES: &[&str] = &[
    "-//w3c//dtd html 4.01 frameset//",
    "-//w3c//dtd html 4.01 transitional//",
];

/// Prefixes that always give limited-quirks mode.
const LIMITED_QUIRKS_PREFIXES: &[&str] = &[
    "-//w3c//dtd xhtml 1.0 frameset//",
    "-//w3c//dtd xhtml 1.0 transitional//",
];

const QUIRKS_SYSTEM_ID: &str = "http://www.ibm.com/data/dtd/v11/ibmxhtml1-transitional.dtd";

/// "If the DOCTYPE token's name is not "html", or the token's public
/// identifier is not missing, or the token's system identifier is neither
/// missing nor "about:legacy-compat", then there is a parse error."
#[must_use]
pub fn is_conforming(doctype: &Doctype) -> bool {
    doctype.name.as_deref() == Some("html")
        && doctype.public_identifier.is_none()
        && doctype
            .system_identifier
            .as_deref()
            .is_none_or(|system| system == "about:legacy-compat")
}

fn starts_with_any(id: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| id.starts_with(prefix))
}

/// The document mode a DOCTYPE token asks for.
#[must_use]
pub fn compat_mode_for(doctype: &Doctype) -> CompatMode {
    let public = doctype
        .public_identifier
        .as_deref()
        .map(str::to_ascii_lowercase);
    let system = doctype
        .system_identifier
        .as_deref()
        .map(str::to_ascii_lowercase);
    let public = public.as_deref();
    let system = system.as_deref();

    let quirks = doctype.force_quirks
        || doctype.name.as_deref() != Some("html")
        || public.is_some_and(|id| QUIRKS_PUBLIC_IDS.contains(&id) || starts_with_any(id, QUIRKS_PUBLIC_PREFIXES))
        || system == Some(QUIRKS_SYSTEM_ID)
        || (system.is_none() && public.is_some_and(|id| starts_with_any(id, FRAMESET_TRANSITIONAL_PREFIXES)));
    if quirks {
        return CompatMode::Quirks;
    }

    let limited = public.is_some_and(|id| {
        starts_with_any(id, LIMITED_QUIRKS_PREFIXES)
            || (system.is_some() && starts_with_any(id, FRAMESET_TRANSITIONAL_PREFIXES))
    });
    if limited {
        CompatMode::LimitedQuirks
    } else {
        CompatMode::NoQuirks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doctype(name: &str, public: Option<&str>, system: Option<&str>) -> Doctype {
        Doctype {
            name: Some(name.to_string()),
            public_identifier: public.map(str::to_string),
            system_identifier: system.map(str::to_string),
            force_quirks: false,
        }
    }

    #[test]
    fn html5_doctype_is_no_quirks() {
        let d = doctype("html", None, None);
        assert!(is_conforming(&d));
        assert_eq!(compat_mode_for(&d), CompatMode::NoQuirks);
    }

    #[test]
    fn legacy_public_ids() {
        let d = doctype("html", Some("-//W3C//DTD HTML 3.2 Final//EN"), None);
        assert_eq!(compat_mode_for(&d), CompatMode::Quirks);

        let d = doctype("html", Some("-//W3C//DTD HTML 4.01 Transitional//EN"), None);
        assert_eq!(compat_mode_for(&d), CompatMode::Quirks);

        let d = doctype(
            "html",
            Some("-//W3C//DTD HTML 4.01 Transitional//EN"),
            Some("http://www.w3.org/TR/html4/loose.dtd"),
        );
        assert_eq!(compat_mode_for(&d), CompatMode::LimitedQuirks);

        let d = doctype("html", Some("-//W3C//DTD XHTML 1.0 Strict//EN"), None);
        assert_eq!(compat_mode_for(&d), CompatMode::NoQuirks);
    }

    #[test]
    fn force_quirks_and_wrong_name() {
        let mut d = doctype("html", None, None);
        d.force_quirks = true;
        assert_eq!(compat_mode_for(&d), CompatMode::Quirks);
        let d = doctype("svg", None, None);
        assert!(!is_conforming(&d));
        assert_eq!(compat_mode_for(&d), CompatMode::Quirks);
    }
}
