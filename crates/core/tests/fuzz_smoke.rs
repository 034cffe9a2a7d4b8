//! Fuzz smoke tests for the goml scanner and parser.
//!
//! These tests feed random, adversarial, and edge-case inputs to the parser
//! to verify it never panics and that basic structural invariants hold on
//! every `ParseResult`.
//!
//! No external crate dependencies are used; a simple deterministic PRNG
//! provides reproducible randomness.

mod common;

use goml_core::{
    Element, ElementError, EmitConfig, ErrorKind, MAX_DEPTH, ParseResult, Parser, TEXT,
    emit_document, parse_with_definitions,
};

// ─── Simple deterministic PRNG (LCG) ────────────────────────────────────────

struct SimpleRng(u64);

impl SimpleRng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range(&mut self, max: usize) -> usize {
        (self.next() as usize) % max
    }

    fn gen_bytes(&mut self, len: usize) -> Vec<u8> {
        (0..len).map(|_| self.next() as u8).collect()
    }
}

// ─── Invariant checking ─────────────────────────────────────────────────────

/// Assert structural invariants on any `ParseResult`, regardless of input.
fn assert_invariants(result: &ParseResult, input: &[u8]) {
    assert!(result.diagnostics.len() <= 1, "first error must be final");
    if result.ok() {
        assert!(
            !result.root.has_slots(),
            "slot records leaked out of prefabs for {:?}",
            String::from_utf8_lossy(input)
        );
    } else {
        assert!(result.root.children.is_empty());
    }

    for diag in &result.diagnostics {
        if let Some(span) = diag.span {
            assert!(
                span.start <= span.end,
                "Diagnostic span start ({}) > end ({}): {:?}",
                span.start,
                span.end,
                diag
            );
            assert!(
                span.end <= input.len(),
                "Diagnostic span end ({}) > input length ({}): {:?}",
                span.end,
                input.len(),
                diag
            );
        }
    }
}

/// Whether `root` has a form the emitter can reproduce. Prefab expansion can
/// leave two text nodes side by side or an empty text node, and neither is
/// expressible in markup. An element named after a prefab in `taken` would be
/// read back as a usage.
fn expressible(root: &Element, taken: &[&str]) -> bool {
    let mut pending = vec![root];
    while let Some(el) = pending.pop() {
        let empty_text = el
            .children
            .iter()
            .any(|c| c.is_text() && c.value(TEXT) == Some("") && c.slots.is_empty());
        let adjacent_text = el
            .children
            .windows(2)
            .any(|pair| pair[0].is_text() && pair[1].is_text());
        let reused_name = el.children.iter().any(|c| taken.contains(&c.name.as_str()));
        if empty_text || adjacent_text || reused_name {
            return false;
        }
        pending.extend(&el.children);
    }
    true
}

/// Whether the tree and every template in `parser` can be emitted faithfully.
fn round_trips(parser: &Parser, root: &Element) -> bool {
    let mut taken: Vec<&str> = Vec::new();
    if !expressible(root, &taken) {
        return false;
    }
    for template in parser.prefabs_in_order() {
        if !expressible(template, &taken) {
            return false;
        }
        taken.push(template.name.as_str());
    }
    true
}

/// Parse an input with the shared registry, check invariants, and make sure
/// a successful tree survives formatting.
fn fuzz_parse(input: &[u8]) {
    let mut parser = common::parser();
    let result = parser.parse_to_result(input);
    assert_invariants(&result, input);
    if result.ok() && round_trips(&parser, &result.root) {
        let config = EmitConfig::default();
        let formatted = emit_document(&result.root, parser.prefabs_in_order(), &config);
        let mut again = common::parser();
        let back = again
            .parse(formatted.as_bytes())
            .unwrap_or_else(|e| panic!("formatted output failed to parse: {e}\n{formatted}"));
        assert_eq!(
            back,
            result.root,
            "tree changed for {:?}\nformatted:\n{formatted}",
            String::from_utf8_lossy(input)
        );
        assert_eq!(again.prefabs(), parser.prefabs(), "\nformatted:\n{formatted}");
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Category A: Random input
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn parser_no_panic_random_bytes() {
    let mut rng = SimpleRng::new(0xCAFE_BABE);
    for len in [0, 1, 2, 5, 10, 50, 100, 500, 1000] {
        for _ in 0..20 {
            fuzz_parse(&rng.gen_bytes(len));
        }
    }
}

#[test]
fn parser_no_panic_random_goml_like() {
    let mut rng = SimpleRng::new(0xBAAD_F00D);
    let alphabet: &[u8] = b"<>/!=\"[]{}\\x0u divspanimg \n\t";
    for len in [1, 5, 20, 100, 500] {
        for _ in 0..30 {
            let s: Vec<u8> = (0..len)
                .map(|_| alphabet[rng.gen_range(alphabet.len())])
                .collect();
            fuzz_parse(&s);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Category B: Truncation
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn parser_no_panic_every_prefix() {
    let doc = "<!card>\n  <div title=\"Hi {who}\" set=[\"a\" {b}]>{who} \\x41\\u00e9</>\n<!/>\n<span><card who=\"x\" b=\"y\"/>é</>";
    for end in 0..=doc.len() {
        fuzz_parse(&doc.as_bytes()[..end]);
    }
}

#[test]
fn parser_no_panic_non_ascii() {
    let cases: [&[u8]; 6] = [
        "<div a=\"日本語\"/>".as_bytes(),
        "<div>🎉</>".as_bytes(),
        "<div>\u{FEFF}</>".as_bytes(),
        b"<div a=\"\xC3\"/>",
        b"\xE2\x82",
        b"<div>\xF8\x88\x80\x80\x80</>",
    ];
    for input in cases {
        fuzz_parse(input);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Category C: Pathological nesting / repetition
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn parser_accepts_nesting_up_to_the_limit() {
    let input = "<div>".repeat(MAX_DEPTH) + &"</>".repeat(MAX_DEPTH);
    let result = parse_with_definitions(input.as_bytes(), ["div"]);
    assert!(result.ok());
    assert_eq!(result.root.depth(), MAX_DEPTH + 1);
    let mut depth = 0;
    let mut node: &Element = &result.root;
    while let Some(child) = node.children.first() {
        depth += 1;
        node = child;
    }
    assert_eq!(depth, MAX_DEPTH);
}

#[test]
fn parser_rejects_nesting_past_the_limit() {
    for levels in [MAX_DEPTH + 1, 200_000] {
        let input = "<div>".repeat(levels) + &"</>".repeat(levels);
        let mut p = common::parser();
        let err = p.parse(input.as_bytes()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Element(ElementError::TooDeep));
        assert_eq!(err.span.start, MAX_DEPTH * "<div>".len() + 1);
    }
}

#[test]
fn prefab_expansion_counts_toward_the_limit() {
    let prefab = "<!p><div><span/></><!/>";
    let fits = prefab.to_string() + &"<div>".repeat(MAX_DEPTH - 2) + "<p/>";
    assert!(common::parser().parse(fits.as_bytes()).is_ok());

    let too_deep = prefab.to_string() + &"<div>".repeat(MAX_DEPTH - 1) + "<p/>";
    assert_eq!(
        common::parser().parse(too_deep.as_bytes()).unwrap_err().kind,
        ErrorKind::Element(ElementError::TooDeep)
    );
}

#[test]
fn parser_no_panic_many_instantiations() {
    let mut p = Parser::new();
    p.add_definitions(["div"]);
    let input = String::from("<!p><div a=\"{x}\"/><!/>") + &"<p x=\"1\"/>".repeat(5_000);
    let root = p.parse(input.as_bytes()).unwrap();
    assert_eq!(root.children.len(), 5_000);
}
