//! Tests for the goml parser: tree shape, text handling, and error kinds.
//!
//! Prefab capture and instantiation live in `prefab.rs`.

mod common;

use common::{children, el, error_kind, parser};
use goml_core::{
    AttributeError, Element, ElementError, ErrorKind, EscapeError, Parser, PrefabError, ROOT,
    codes, parse_with_definitions,
};

// ── Tree shape ──────────────────────────────────────────────────────────

#[test]
fn nested_elements_and_text() {
    let input = "
<div>
	<fiv>
		<giv/>
		hello
		<giv/>
	</>
</>
";
    assert_eq!(
        children(input),
        vec![el("div").with_child(
            el("fiv")
                .with_child(el("giv"))
                .with_child(Element::text("hello"))
                .with_child(el("giv"))
        )]
    );
}

#[test]
fn root_is_named_root() {
    let root = parser().parse(b"<div/>").unwrap();
    assert_eq!(root.name, ROOT);
    assert!(root.attributes.is_empty());
}

#[test]
fn empty_input_has_no_children() {
    assert!(children("").is_empty());
    assert!(children(" \n\t ").is_empty());
}

#[test]
fn several_top_level_nodes_keep_order() {
    assert_eq!(
        children("<div/> hi <fiv/>"),
        vec![el("div"), Element::text("hi"), el("fiv")]
    );
}

#[test]
fn open_elements_close_at_end_of_input() {
    assert_eq!(
        children("<div><fiv>tail"),
        vec![el("div").with_child(el("fiv").with_child(Element::text("tail")))]
    );
}

#[test]
fn attribute_forms() {
    let got = children(r#"<img src="a.png" hidden set=["x" "y"] none=[]/>"#);
    assert_eq!(
        got,
        vec![
            el("img")
                .with_attribute("src", ["a.png"])
                .with_attribute("hidden", ["true"])
                .with_attribute("set", ["x", "y"])
                .with_attribute("none", Vec::<String>::new())
        ]
    );
}

#[test]
fn attributes_on_open_tag_with_children() {
    let got = children("<div id=\"a\">\n  <span/>\n</>");
    assert_eq!(
        got,
        vec![el("div").with_attribute("id", ["a"]).with_child(el("span"))]
    );
}

#[test]
fn dashed_and_unicode_names() {
    let mut p = Parser::new();
    p.add_definitions(["my-box", "блок"]);
    let root = p.parse("<my-box data-id=\"1\"/><блок/>".as_bytes()).unwrap();
    assert_eq!(root.children[0].name, "my-box");
    assert_eq!(root.children[0].value("data-id"), Some("1"));
    assert_eq!(root.children[1].name, "блок");
}

// ── Text ────────────────────────────────────────────────────────────────

#[test]
fn text_whitespace_is_collapsed_and_trimmed() {
    assert_eq!(
        children("<div>  hello \n\t world  </>"),
        vec![el("div").with_child(Element::text("hello world"))]
    );
}

#[test]
fn text_escapes() {
    assert_eq!(
        children(r"<div>\x3Cb\x3E \x20x {{y}</>"),
        vec![el("div").with_child(Element::text("<b>  x {y}"))]
    );
}

#[test]
fn quoted_values_keep_spaces() {
    let got = children(r#"<div a="  two  spaces  "/>"#);
    assert_eq!(got[0].value("a"), Some("  two  spaces  "));
}

#[test]
fn numeric_escapes_are_code_points() {
    let got = children(r#"<div a="\xFF\123é"/>"#);
    assert_eq!(got[0].value("a"), Some("ÿSé"));
}

// ── Registry ────────────────────────────────────────────────────────────

#[test]
fn registry_is_idempotent() {
    let mut p = Parser::new();
    p.add_definitions(["div"]);
    p.add_definitions(["div"]);
    assert_eq!(p.definitions().collect::<Vec<_>>(), vec!["div"]);
    p.remove_definitions(["div", "never-added"]);
    assert!(!p.resolves("div"));
    assert_eq!(
        p.parse(b"<div/>").unwrap_err().kind,
        ErrorKind::Unknown("div".into())
    );
}

#[test]
fn definitions_survive_across_parses() {
    let mut p = parser();
    assert!(p.parse(b"<div/>").is_ok());
    assert!(p.parse(b"<span/>").is_ok());
    p.clear_definitions();
    assert!(p.parse(b"<div/>").is_err());
}

// ── Errors ──────────────────────────────────────────────────────────────

#[test]
fn element_errors() {
    assert_eq!(error_kind("<"), ElementError::Incomplete.into());
    assert_eq!(error_kind("<div"), ElementError::Incomplete.into());
    assert_eq!(error_kind("<div a=\"1\""), ElementError::Incomplete.into());
    assert_eq!(error_kind("<div></"), ElementError::AfterSlash.into());
    assert_eq!(error_kind("<div/ >"), ElementError::AfterSlash.into());
    assert_eq!(error_kind("<div></></>"), ElementError::ExtraClosure.into());
    assert_eq!(error_kind("</>"), ElementError::ExtraClosure.into());
    assert_eq!(error_kind("<div=/>"), ElementError::AfterIdent.into());
    assert_eq!(error_kind("< div/>"), ElementError::Identifier.into());
    assert_eq!(error_kind("<1/>"), ElementError::Identifier.into());
    assert_eq!(error_kind("<div \"x\"/>"), ElementError::Identifier.into());
}

#[test]
fn attribute_errors() {
    assert_eq!(error_kind("<div a,/>"), AttributeError::Assignment.into());
    assert_eq!(error_kind("<div a="), AttributeError::Incomplete.into());
    assert_eq!(error_kind("<div a= \"x\"/>"), AttributeError::ValueStart.into());
    assert_eq!(error_kind("<div a=x/>"), AttributeError::ValueStart.into());
    assert_eq!(error_kind("<div a=[ ]/>"), AttributeError::ExtraSpace.into());
    assert_eq!(error_kind("<div a=[\"x\""), AttributeError::ListIncomplete.into());
    assert_eq!(error_kind("<div a=[x]/>"), AttributeError::BetweenByte.into());
}

#[test]
fn string_and_escape_errors() {
    assert_eq!(error_kind("<div a=\"x"), ErrorKind::StringNotTerminated);
    assert_eq!(error_kind(r#"<div a="\q"/>"#), EscapeError::InvalidIdent.into());
    assert_eq!(error_kind(r#"<div a="\777"/>"#), EscapeError::Overflow.into());
    assert_eq!(error_kind(r#"<div a="\x4"/>"#), EscapeError::Incomplete.into());
    assert_eq!(error_kind(r#"<div a="\xZZ"/>"#), EscapeError::Illegal.into());
}

#[test]
fn placeholders_outside_prefab_are_rejected() {
    assert_eq!(error_kind("<div h={h}/>"), PrefabError::Outside.into());
    assert_eq!(error_kind(" {h} "), PrefabError::Outside.into());
    assert_eq!(error_kind("<div h=\"a {h}\"/>"), PrefabError::Outside.into());
}

#[test]
fn unknown_element_is_named() {
    assert_eq!(error_kind("<div><nope/></>"), ErrorKind::Unknown("nope".into()));
}

#[test]
fn invalid_utf8_is_rejected() {
    let err = parser().parse(b"<div a=\"\xFF\"/>").unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidEncoding);
    assert_eq!(err.span.start, 8);
}

#[test]
fn first_error_is_final() {
    let mut p = parser();
    let err = p.parse(b"<nope/><div a=/>").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unknown("nope".into()));
    assert!(p.failed());
    assert_eq!(p.error(), Some(&err));
}

// ── Diagnostics ─────────────────────────────────────────────────────────

#[test]
fn diagnostic_result_for_failure() {
    let res = parse_with_definitions(b"<div>\n  <div a=[ ]/>\n</>", ["div"]);
    assert!(!res.ok());
    assert!(res.root.children.is_empty());
    assert_eq!(res.diagnostics.len(), 1);
    let d = &res.diagnostics[0];
    assert_eq!(d.id, codes::ATTRIBUTE_EXTRA_SPACE);
    let ctx = d.context.as_ref().unwrap();
    assert_eq!(ctx["line"], "2");
    assert_eq!(ctx["column"], "11");
    assert!(d.explain().is_some());
}

#[test]
fn diagnostic_result_for_success() {
    let res = parse_with_definitions(b"<div/>", ["div"]);
    assert!(res.ok());
    assert!(res.diagnostics.is_empty());
    assert_eq!(res.root.children, vec![el("div")]);
}
