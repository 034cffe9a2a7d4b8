//! Shared test helpers for `goml_core` integration tests.

#![allow(unreachable_pub)]

use goml_core::{Element, ErrorKind, Parser};

/// Element names registered by [`parser`].
pub const NAMES: [&str; 5] = ["div", "fiv", "giv", "img", "span"];

/// A parser with [`NAMES`] registered.
pub fn parser() -> Parser {
    let mut p = Parser::new();
    p.add_definitions(NAMES);
    p
}

/// Parse `input` with a fresh [`parser`] and return the top-level nodes.
#[allow(dead_code)]
pub fn children(input: &str) -> Vec<Element> {
    parser()
        .parse(input.as_bytes())
        .unwrap_or_else(|e| panic!("{input:?} failed: {e}"))
        .into_children()
}

/// Parse `input` with a fresh [`parser`] and return the error kind.
#[allow(dead_code)]
pub fn error_kind(input: &str) -> ErrorKind {
    match parser().parse(input.as_bytes()) {
        Ok(root) => panic!("{input:?} parsed unexpectedly: {root:?}"),
        Err(e) => e.kind,
    }
}

/// Element with no attributes or children.
#[allow(dead_code)]
pub fn el(name: &str) -> Element {
    Element::new(name)
}

/// Strip slot records recursively so trees built by instantiation can be
/// compared with hand-written ones.
#[allow(dead_code)]
pub fn without_slots(mut el: Element) -> Element {
    el.slots.clear();
    el.children = std::mem::take(&mut el.children)
        .into_iter()
        .map(without_slots)
        .collect();
    el
}
