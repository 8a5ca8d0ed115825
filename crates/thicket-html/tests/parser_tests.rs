//! Integration tests for the HTML parser.

use quickcheck_macros::quickcheck;
use thicket_dom::{CompatMode, DomError, Namespace, NodeId, NodeType};
use thicket_html::dump::dump;
use thicket_html::{
    ErrorKind, HTMLParser, InsertionMode, ParseOutput, ParseStatus, ParserConfig, ParserError,
    Stage, TokenizerErrorKind, TreeErrorKind,
};

/// Helper to parse a whole document
fn parse(html: &str) -> ParseOutput {
    HTMLParser::new().parse(html.as_bytes()).unwrap()
}

/// Helper to parse a document fed in `chunks`
fn parse_chunks(chunks: &[&[u8]]) -> ParseOutput {
    let mut parser = HTMLParser::new();
    parser.parse_chunk_begin().unwrap();
    for chunk in chunks {
        parser.parse_chunk(chunk).unwrap();
    }
    parser.parse_chunk_end().unwrap()
}

fn parse_fragment(html: &str, context: &str, namespace: Namespace) -> ParseOutput {
    HTMLParser::new()
        .parse_fragment(html.as_bytes(), context, namespace)
        .unwrap()
}

/// Assert the dump of `output` is exactly `lines`.
fn assert_tree(output: &ParseOutput, lines: &[&str]) {
    let expected: String = lines.iter().map(|l| format!("{l}\n")).collect();
    assert_eq!(dump(output), expected);
}

fn tree_errors(output: &ParseOutput) -> Vec<TreeErrorKind> {
    output
        .errors
        .iter()
        .filter_map(|e| match e.kind {
            ErrorKind::Tree(kind) => Some(kind),
            ErrorKind::Tokenizer(_) => None,
        })
        .collect()
}

#[test]
fn test_document_structure() {
    let output = parse("<!DOCTYPE html><html><head></head><body></body></html>");
    assert!(!output.is_fragment());
    assert!(output.errors.is_empty());
    assert_tree(
        &output,
        &["| <!DOCTYPE html>", "| <html>", "|   <head>", "|   <body>"],
    );

    let html = output.document.document_element().unwrap();
    assert_eq!(output.document.tag_name(html).as_deref(), Some("html"));
    assert!(output.document.body().is_some());
}

#[test]
fn test_implied_elements() {
    let output = parse("<!DOCTYPE html><p>Hello");
    assert_tree(
        &output,
        &[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <p>",
            "|       \"Hello\"",
        ],
    );
}

#[test]
fn test_missing_doctype_is_quirks() {
    let output = parse("<p>x");
    assert_eq!(output.document.compat_mode, CompatMode::Quirks);
    assert!(tree_errors(&output).contains(&TreeErrorKind::MissingDoctype));

    let output = parse("<!DOCTYPE html><p>x");
    assert_eq!(output.document.compat_mode, CompatMode::NoQuirks);
}

#[test]
fn test_doctype_identifiers_in_dump() {
    let output = parse(r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01//EN">"#);
    let first = output.document.children(NodeId::ROOT).next().unwrap();
    assert!(matches!(
        &output.document.get(first).unwrap().node_type,
        NodeType::DocumentType(d) if d.public_id == "-//W3C//DTD HTML 4.01//EN"
    ));
    assert!(dump(&output).starts_with("| <!DOCTYPE html \"-//W3C//DTD HTML 4.01//EN\" \"\">\n"));
}

#[test]
fn test_table_in_paragraph_depends_on_quirks() {
    let quirks = parse("<p><table></table>");
    assert_tree(
        &quirks,
        &["| <html>", "|   <head>", "|   <body>", "|     <p>", "|       <table>"],
    );

    let standards = parse("<!DOCTYPE html><p><table></table>");
    assert_tree(
        &standards,
        &[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <p>",
            "|     <table>",
        ],
    );
}

#[test]
fn test_attributes_sorted_in_dump() {
    let output = parse(r#"<!DOCTYPE html><div title="t" class="c" id="i">x</div>"#);
    assert_tree(
        &output,
        &[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <div>",
            "|       class=\"c\"",
            "|       id=\"i\"",
            "|       title=\"t\"",
            "|       \"x\"",
        ],
    );
}

#[test]
fn test_adoption_agency() {
    let output = parse("<!DOCTYPE html><b>1<p>2</b>3</p>");
    assert_tree(
        &output,
        &[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <b>",
            "|       \"1\"",
            "|     <p>",
            "|       <b>",
            "|         \"2\"",
            "|       \"3\"",
        ],
    );
    assert!(tree_errors(&output).contains(&TreeErrorKind::MisnestedFormatting));
}

#[test]
fn test_formatting_reconstructed() {
    let output = parse("<!DOCTYPE html><b><i>X</b>Y</i>");
    assert_tree(
        &output,
        &[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <b>",
            "|       <i>",
            "|         \"X\"",
            "|     <i>",
            "|       \"Y\"",
        ],
    );
}

#[test]
fn test_adoption_agency_outer_loop_runs_eight_times() {
    let output = parse(&format!("<!DOCTYPE html><a>{}</a>", "<div>".repeat(10)));
    assert_tree(
        &output,
        &[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <a>",
            "|     <div>",
            "|       <a>",
            "|       <div>",
            "|         <a>",
            "|         <div>",
            "|           <a>",
            "|           <div>",
            "|             <a>",
            "|             <div>",
            "|               <a>",
            "|               <div>",
            "|                 <a>",
            "|                 <div>",
            "|                   <a>",
            "|                   <div>",
            "|                     <a>",
            "|                       <div>",
            "|                         <div>",
        ],
    );
}

#[test]
fn test_adoption_agency_inner_loop_drops_distant_formatting() {
    // em sits more than three steps above the furthest block, so it leaves
    // the active formatting list and is not reconstructed for "x".
    let output = parse(&format!("<!DOCTYPE html><b><em>{}<aside></b>x", "<foo>".repeat(5)));
    assert_tree(
        &output,
        &[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <b>",
            "|       <em>",
            "|         <foo>",
            "|           <foo>",
            "|             <foo>",
            "|               <foo>",
            "|                 <foo>",
            "|     <aside>",
            "|       <b>",
            "|       \"x\"",
        ],
    );
}

#[test]
fn test_adoption_agency_furthest_block_gets_clone() {
    let output = parse("<!DOCTYPE html><b>1<p>2<i>3</b>");
    assert_tree(
        &output,
        &[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <b>",
            "|       \"1\"",
            "|     <p>",
            "|       <b>",
            "|         \"2\"",
            "|         <i>",
            "|           \"3\"",
        ],
    );
}

#[test]
fn test_adoption_agency_clones_intermediate_formatting() {
    let output = parse("<!DOCTYPE html><b>1<i>2<p>3</b>4");
    assert_tree(
        &output,
        &[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <b>",
            "|       \"1\"",
            "|       <i>",
            "|         \"2\"",
            "|     <i>",
            "|       <p>",
            "|         <b>",
            "|           \"3\"",
            "|         \"4\"",
        ],
    );
    assert!(tree_errors(&output).contains(&TreeErrorKind::MisnestedFormatting));
}

#[test]
fn test_implied_table_body() {
    let output = parse("<!DOCTYPE html><table> <tr><td>x</table>");
    assert_tree(
        &output,
        &[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <table>",
            "|       \" \"",
            "|       <tbody>",
            "|         <tr>",
            "|           <td>",
            "|             \"x\"",
        ],
    );
}

#[test]
fn test_foster_parenting() {
    let output = parse("<!DOCTYPE html><table>X<div>Y</div></table>");
    assert_tree(
        &output,
        &[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     \"X\"",
            "|     <div>",
            "|       \"Y\"",
            "|     <table>",
        ],
    );
    assert!(tree_errors(&output).contains(&TreeErrorKind::FosterParentedCharacter));
}

#[test]
fn test_template_contents() {
    let output = parse("<!DOCTYPE html><template><p>x</p></template>");
    assert_tree(
        &output,
        &[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|     <template>",
            "|       content",
            "|         <p>",
            "|           \"x\"",
            "|   <body>",
        ],
    );
}

#[test]
fn test_foster_parenting_into_template_contents() {
    let output = parse("<!DOCTYPE html><table><template><tr>x</template>");
    assert_tree(
        &output,
        &[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <table>",
            "|       <template>",
            "|         content",
            "|           <tr>",
            "|           \"x\"",
        ],
    );
    assert!(tree_errors(&output).contains(&TreeErrorKind::FosterParentedCharacter));
}

#[test]
fn test_comments_after_body_and_html() {
    let output = parse("<!DOCTYPE html><body></body><!--a--></html><!--b-->");
    assert_tree(
        &output,
        &[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|   <!-- a -->",
            "| <!-- b -->",
        ],
    );
}

#[test]
fn test_frameset() {
    let output = parse("<!DOCTYPE html><frameset><frame></frameset>");
    assert_tree(
        &output,
        &[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <frameset>",
            "|     <frame>",
        ],
    );
}

#[test]
fn test_foreign_content() {
    let output = parse(
        "<!DOCTYPE html><svg viewbox='0 0 1 1'><foreignobject><p>x</p></foreignobject></svg>",
    );
    assert_tree(
        &output,
        &[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <svg svg>",
            "|       viewBox=\"0 0 1 1\"",
            "|       <svg foreignObject>",
            "|         <p>",
            "|           \"x\"",
        ],
    );
}

#[test]
fn test_html_breaks_out_of_foreign_content() {
    let output = parse("<!DOCTYPE html><math><mi>x</mi><b>y");
    assert_tree(
        &output,
        &[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <math math>",
            "|       <math mi>",
            "|         \"x\"",
            "|     <b>",
            "|       \"y\"",
        ],
    );
}

#[test]
fn test_textarea_skips_leading_newline() {
    let output = parse("<!DOCTYPE html><textarea>\nx</textarea>");
    assert!(dump(&output).contains("|       \"x\"\n"));
}

#[test]
fn test_nul_handling() {
    // Dropped in body text
    let output = parse("<!DOCTYPE html><p>a\0b");
    assert!(dump(&output).contains("\"ab\""));
    assert!(tree_errors(&output).contains(&TreeErrorKind::UnexpectedNullCharacter));

    // Replaced in RCDATA
    let output = parse("<!DOCTYPE html><textarea>a\0b</textarea>");
    assert!(dump(&output).contains("\"a\u{FFFD}b\""));
}

#[test]
fn test_plaintext_nul_is_replaced() {
    let output = parse("<!DOCTYPE html><plaintext>a\0b");
    assert_tree(
        &output,
        &[
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <plaintext>",
            "|       \"a\u{FFFD}b\"",
        ],
    );
    // The tokenizer reports it; the tree builder does not report it again.
    assert!(!tree_errors(&output).contains(&TreeErrorKind::UnexpectedNullCharacter));
    assert!(output.errors.iter().any(|e| matches!(
        e.kind,
        ErrorKind::Tokenizer(TokenizerErrorKind::UnexpectedNullCharacter)
    )));
}

#[test]
fn test_text_fragment_contexts_replace_nul() {
    for context in ["title", "textarea", "style", "script", "plaintext"] {
        let output = parse_fragment("a\0b", context, Namespace::Html);
        assert_tree(&output, &["| \"a\u{FFFD}b\""]);
        assert!(
            !tree_errors(&output).contains(&TreeErrorKind::UnexpectedNullCharacter),
            "{context}"
        );
    }
    // A data-state fragment still drops it.
    let output = parse_fragment("a\0b", "div", Namespace::Html);
    assert_tree(&output, &["| \"ab\""]);
}

#[test]
fn test_errors_do_not_depend_on_chunking() {
    let html = "hello world\0 and more<table>x<b>1<p>2</b></table>";
    let whole = parse(html);
    let bytes = html.as_bytes();
    let chunks: Vec<&[u8]> = bytes.chunks(2).collect();
    let split = parse_chunks(&chunks);
    assert_eq!(split.errors, whole.errors);

    let missing = whole
        .errors
        .iter()
        .find(|e| e.kind == ErrorKind::Tree(TreeErrorKind::MissingDoctype))
        .unwrap();
    assert_eq!(missing.token.as_deref(), Some("\"hello world\\0 and more\""));
}

#[test]
fn test_tree_errors_name_their_token() {
    let output = parse("<!DOCTYPE html><b>1<p>2</b>3</p>a\0b");
    let described: Vec<(TreeErrorKind, Option<&str>)> = output
        .errors
        .iter()
        .filter_map(|e| match e.kind {
            ErrorKind::Tree(kind) => Some((kind, e.token.as_deref())),
            ErrorKind::Tokenizer(_) => None,
        })
        .collect();
    assert!(described.contains(&(TreeErrorKind::MisnestedFormatting, Some("</b>"))));
    assert!(described.contains(&(TreeErrorKind::UnexpectedNullCharacter, Some("\"a\\0b\""))));
    assert!(described.iter().all(|(_, token)| token.is_some()));

    let output = parse("<!DOCTYPE html><table>x</table>");
    let foster = output
        .errors
        .iter()
        .find(|e| e.kind == ErrorKind::Tree(TreeErrorKind::FosterParentedCharacter))
        .unwrap();
    assert_eq!(foster.token.as_deref(), Some("</table>"));
}

#[test]
fn test_chunks_coalesce_into_one_text_node() {
    let output = parse_chunks(&[b"<!DOCTYPE html><p>a", b"b", b"c</p>"]);
    let body = output.document.body().unwrap();
    let p = output.document.children(body).next().unwrap();
    let texts: Vec<NodeId> = output.document.children(p).collect();
    assert_eq!(texts.len(), 1);
    assert_eq!(output.document.text(texts[0]), Some("abc"));
}

#[test]
fn test_errors_are_ordered_by_position() {
    let output = parse("<p></b>&bogus;<x =>");
    assert!(output.errors.len() >= 3);
    assert!(output.errors.windows(2).all(|w| w[0].position <= w[1].position));
    assert!(tree_errors(&output).contains(&TreeErrorKind::UnexpectedEndTag));
    assert!(
        output
            .errors
            .iter()
            .any(|e| matches!(e.kind, ErrorKind::Tokenizer(_)))
    );
}

#[test]
fn test_node_limit_aborts() {
    let mut parser = HTMLParser::with_config(ParserConfig::default().with_node_limit(4));
    parser.parse_chunk_begin().unwrap();
    let err = parser.parse_chunk(b"<p>x").unwrap_err();
    assert_eq!(err, ParserError::Fatal(DomError::NodeLimitExceeded { limit: 4 }));
    assert_eq!(parser.stage(), Stage::Done);
    assert_eq!(parser.status(), Some(ParseStatus::Aborted));
    assert!(parser.open_elements().is_empty());
}

#[test]
fn test_open_elements_while_parsing() {
    let mut parser = HTMLParser::new();
    parser.parse_chunk_begin().unwrap();
    parser.parse_chunk(b"<div><span>").unwrap();
    assert_eq!(parser.open_elements().len(), 4);
    assert_eq!(parser.status(), Some(ParseStatus::Running));
    let _ = parser.parse_chunk_end().unwrap();
    assert!(parser.open_elements().is_empty());

    let mut parser = HTMLParser::new();
    parser.parse_fragment_chunk_begin("div", Namespace::Html).unwrap();
    assert_eq!(parser.open_elements().len(), 1);
    parser.parse_chunk(b"</div></div>").unwrap();
    assert_eq!(parser.open_elements().len(), 1);
}

#[test]
fn test_strict_mode() {
    let config = ParserConfig::default().with_strict_mode();
    let err = HTMLParser::with_config(config).parse(b"<p>x").unwrap_err();
    assert!(matches!(err, ParserError::Strict { .. }));

    let output = HTMLParser::with_config(config)
        .parse(b"<!DOCTYPE html><title>t</title><p>x")
        .unwrap();
    assert!(output.errors.is_empty());
}

#[test]
fn test_scripting_flag_changes_noscript() {
    let html = b"<!DOCTYPE html><body><noscript><p>x</p></noscript>";
    let off = HTMLParser::new().parse(html).unwrap();
    assert!(dump(&off).contains("|       <p>\n"));

    let on = HTMLParser::with_config(ParserConfig::default().with_scripting(true))
        .parse(html)
        .unwrap();
    assert!(dump(&on).contains("|       \"<p>x</p>\"\n"));
}

#[test]
fn test_fragment_in_div() {
    let output = parse_fragment("<b>x</b>y", "div", Namespace::Html);
    assert!(output.is_fragment());
    assert_tree(&output, &["| <b>", "|   \"x\"", "| \"y\""]);
}

#[test]
fn test_fragment_in_title_is_rcdata() {
    let output = parse_fragment("<b>&amp;</b>", "title", Namespace::Html);
    assert_tree(&output, &["| \"<b>&</b>\""]);
}

#[test]
fn test_fragment_in_template() {
    let output = parse_fragment("<td>x", "template", Namespace::Html);
    assert_tree(&output, &["| <td>", "|   \"x\""]);
}

#[test]
fn test_fragment_in_svg() {
    let output = parse_fragment("<path/>", "svg", Namespace::Svg);
    assert_tree(&output, &["| <svg path>"]);
}

#[test]
fn test_fragment_in_select() {
    let output = parse_fragment("<option>a<option>b", "select", Namespace::Html);
    assert_tree(
        &output,
        &["| <option>", "|   \"a\"", "| <option>", "|   \"b\""],
    );
}

#[test]
fn test_select_context_ancestors_pick_mode() {
    let mut parser = HTMLParser::new();
    parser
        .parse_fragment_chunk_begin("select", Namespace::Html)
        .unwrap();
    assert_eq!(parser.insertion_mode(), Some(InsertionMode::InSelect));

    let mut parser = HTMLParser::new();
    parser
        .parse_fragment_chunk_begin_in("select", Namespace::Html, &[("table", Namespace::Html)])
        .unwrap();
    assert_eq!(parser.insertion_mode(), Some(InsertionMode::InSelectInTable));
    parser.parse_chunk(b"<option>a<td>b").unwrap();
    let output = parser.parse_chunk_end().unwrap();
    assert_tree(&output, &["| <option>", "|   \"ab\""]);

    // A template between them hides the table.
    let mut parser = HTMLParser::new();
    parser
        .parse_fragment_chunk_begin_in(
            "select",
            Namespace::Html,
            &[("table", Namespace::Html), ("template", Namespace::Html)],
        )
        .unwrap();
    assert_eq!(parser.insertion_mode(), Some(InsertionMode::InSelect));
}

#[test]
fn test_fragment_end_html_is_an_error() {
    let output = parse_fragment("x</body></html>y", "body", Namespace::Html);
    assert_tree(&output, &["| \"xy\""]);
    assert!(tree_errors(&output).contains(&TreeErrorKind::UnexpectedEndTag));
}

const CORPUS: &str = "<!DOCTYPE html><title>A &amp; B</title>\
    <p class=x>caf\u{e9} &notin; \u{1F600}<pre>\nline</pre><!-- c -->\
    <script>if (a<b) {}</script><table> <tr><td>1\0</td></tr></table>\
    <svg><path d='M0'/></svg>&#x41;&ampx";

#[quickcheck]
fn prop_chunk_boundaries_do_not_change_the_result(cuts: Vec<u16>) -> bool {
    let bytes = CORPUS.as_bytes();
    let mut points: Vec<usize> = cuts
        .into_iter()
        .map(|c| usize::from(c) % (bytes.len() + 1))
        .collect();
    points.sort_unstable();
    points.dedup();

    let mut chunks: Vec<&[u8]> = Vec::new();
    let mut start = 0;
    for point in points {
        chunks.push(&bytes[start..point]);
        start = point;
    }
    chunks.push(&bytes[start..]);

    let split = parse_chunks(&chunks);
    let whole = parse(CORPUS);
    dump(&split) == dump(&whole) && split.errors == whole.errors
}
