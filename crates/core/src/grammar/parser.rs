use std::collections::{BTreeMap, BTreeSet};

use goml_diagnostics::{Diagnostic, LineIndex, Span};
use log::{debug, trace};

use super::{
    ast::{Element, ROOT, SlotPosition, SlotRecord, TEXT},
    decoder::{DecodeOptions, Terminator, decode, placeholder},
    prefab::instantiate,
    scanner::{Scanner, is_ident_start},
};
use crate::error::{AttributeError, ElementError, ErrorKind, ParseError, PrefabError};
use crate::stack::Stack;

/// Longest excerpt of remaining input kept on a [`ParseError`].
const WINDOW: usize = 24;

/// Value given to attributes written without `=`.
const BARE_VALUE: &str = "true";

/// Deepest element nesting a document may reach, counting the nodes prefab
/// usages expand into. Text nodes do not count.
pub const MAX_DEPTH: usize = 256;

/// Result of parsing a document in diagnostic form.
#[derive(Debug, serde::Serialize)]
pub struct ParseResult {
    /// The root element; empty when parsing failed.
    pub root: Element,
    /// At most one error diagnostic: the first failure is final.
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseResult {
    /// Whether the document parsed without errors.
    pub fn ok(&self) -> bool {
        !self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

// ─── Public API ─────────────────────────────────────────────────────────────

/// Parse `input` with a fresh parser accepting `definitions` as element names.
pub fn parse_with_definitions<I, S>(input: &[u8], definitions: I) -> ParseResult
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut parser = Parser::new();
    parser.add_definitions(definitions);
    parser.parse_to_result(input)
}

// ─── Parser ─────────────────────────────────────────────────────────────────

/// What an open stack frame will turn into when it closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    /// The synthetic document root.
    Root,
    /// A registered element.
    Element,
    /// A `<!name>` prefab definition being captured.
    Definition,
    /// A usage tag of an existing prefab.
    Usage,
}

#[derive(Debug)]
struct Frame {
    element: Element,
    kind: FrameKind,
}

/// Single-pass goml parser.
///
/// The registry of element names and the prefab table belong to the parser
/// and outlive individual [`Parser::parse`] calls: a prefab defined by one
/// call can be instantiated by the next. Only the explicit `clear_*` and
/// `remove_definitions` calls shrink them.
///
/// Parsing stops at the first error, which is also kept as the sticky
/// [`Parser::error`] until the next parse or restart.
#[derive(Debug, Default)]
pub struct Parser {
    definitions: BTreeSet<String>,
    prefabs: BTreeMap<String, Element>,
    /// Prefab names in the order they were defined.
    prefab_order: Vec<String>,
    scanner: Scanner,
    /// Open frames; the bottom one is the document root.
    stack: Stack<Frame>,
    /// Number of open `<!name>` frames. Placeholders are legal while non-zero.
    definition_depth: usize,
    error: Option<ParseError>,
    /// Span overriding the scanner position for the pending error.
    mark: Option<Span>,
}

impl Parser {
    /// A parser with no definitions and no prefabs.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Registry ────────────────────────────────────────────────────────

    /// Accept `names` as ordinary element names.
    pub fn add_definitions<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            debug!("definition `{name}` added");
            self.definitions.insert(name);
        }
    }

    /// Stop accepting `names`. Unknown names are ignored.
    pub fn remove_definitions<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            if self.definitions.remove(name.as_ref()) {
                debug!("definition `{}` removed", name.as_ref());
            }
        }
    }

    /// Forget every element name.
    pub fn clear_definitions(&mut self) {
        debug!("{} definitions cleared", self.definitions.len());
        self.definitions.clear();
    }

    /// Registered element names in sorted order.
    pub fn definitions(&self) -> impl Iterator<Item = &str> {
        self.definitions.iter().map(String::as_str)
    }

    /// Whether `name` resolves, either as a definition or as a prefab.
    pub fn resolves(&self, name: &str) -> bool {
        self.definitions.contains(name) || self.prefabs.contains_key(name)
    }

    /// Forget every captured prefab.
    pub fn clear_prefabs(&mut self) {
        debug!("{} prefabs cleared", self.prefabs.len());
        self.prefabs.clear();
        self.prefab_order.clear();
    }

    /// Captured template for prefab `name`.
    pub fn prefab(&self, name: &str) -> Option<&Element> {
        self.prefabs.get(name)
    }

    /// Every captured prefab by name.
    pub fn prefabs(&self) -> &BTreeMap<String, Element> {
        &self.prefabs
    }

    /// Captured prefabs in the order they were defined.
    pub fn prefabs_in_order(&self) -> impl Iterator<Item = &Element> {
        self.prefab_order
            .iter()
            .filter_map(|name| self.prefabs.get(name))
    }

    // ── Lifecycle ───────────────────────────────────────────────────────

    /// Load `input` and reset scan state. Definitions and prefabs are kept.
    pub fn restart(&mut self, input: &[u8]) {
        self.scanner = Scanner::new(input);
        self.reset();
    }

    /// Rewind to the start of the loaded input, clear the sticky error and
    /// the element stack. Definitions and prefabs are kept.
    pub fn reset(&mut self) {
        self.scanner.rewind();
        self.stack.clear();
        self.stack.push(Frame {
            element: Element::new(ROOT),
            kind: FrameKind::Root,
        });
        self.definition_depth = 0;
        self.error = None;
        self.mark = None;
    }

    /// Parse `input` into a root element whose children are the top-level
    /// nodes. Prefab definitions add no children; they populate the prefab
    /// table.
    pub fn parse(&mut self, input: &[u8]) -> Result<Element, ParseError> {
        self.restart(input);
        match self.document() {
            Ok(root) => Ok(root),
            Err(kind) => {
                let err = self.locate(kind);
                debug!("parse failed: {err}");
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Like [`Parser::parse`], reporting failure as a diagnostic.
    pub fn parse_to_result(&mut self, input: &[u8]) -> ParseResult {
        match self.parse(input) {
            Ok(root) => ParseResult {
                root,
                diagnostics: Vec::new(),
            },
            Err(err) => ParseResult {
                root: Element::new(ROOT),
                diagnostics: vec![err.to_diagnostic(&LineIndex::new(input))],
            },
        }
    }

    /// Whether the last parse failed.
    pub fn failed(&self) -> bool {
        self.error.is_some()
    }

    /// The sticky error of the last parse.
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// Whether the cursor is inside a prefab definition.
    pub fn in_prefab(&self) -> bool {
        self.definition_depth > 0
    }

    fn locate(&mut self, kind: ErrorKind) -> ParseError {
        let span = self.mark.take().unwrap_or_else(|| {
            let start = self.scanner.offset();
            Span::new(start, start + self.scanner.current_len())
        });
        let rest = &self.scanner.input()[span.start.min(self.scanner.input().len())..];
        ParseError {
            kind,
            span,
            window: String::from_utf8_lossy(&rest[..rest.len().min(WINDOW)]).into_owned(),
        }
    }

    // ── Document ────────────────────────────────────────────────────────

    fn document(&mut self) -> Result<Element, ErrorKind> {
        self.scanner.advance()?;
        loop {
            self.scanner.skip_whitespace()?;
            match self.scanner.current() {
                None => break,
                Some('<') => self.tag()?,
                Some(_) => self.text()?,
            }
        }

        // Whatever is still open at end of input closes implicitly.
        while self.stack.len() > 1 {
            let frame = self.pop_frame()?;
            trace!("`{}` closed by end of input", frame.element.name);
            self.attach(frame)?;
        }
        self.stack
            .pop()
            .map(|frame| frame.element)
            .ok_or_else(|| ElementError::ExtraClosure.into())
    }

    fn text(&mut self) -> Result<(), ErrorKind> {
        let opts = DecodeOptions {
            terminator: Terminator::Text,
            collapse: true,
            placeholders: self.in_prefab(),
        };
        let decoded = decode(&mut self.scanner, opts)?;
        let mut element = Element::text(decoded.text);
        element.slots = decoded
            .placeholders
            .into_iter()
            .map(|(name, at)| SlotRecord::new(name, TEXT, SlotPosition::Interpolated { at }))
            .collect();
        self.push_child(element)
    }

    // ── Tags ────────────────────────────────────────────────────────────

    /// Parse one tag; the scanner sits on `<`.
    fn tag(&mut self) -> Result<(), ErrorKind> {
        self.scanner.advance()?;
        let definition = self.scanner.at('!');
        if definition {
            self.scanner.advance()?;
        }
        match self.scanner.current() {
            None => Err(ElementError::Incomplete.into()),
            Some('/') => {
                self.scanner.advance()?;
                self.tag_end()?;
                self.close(definition)
            }
            Some(c) if is_ident_start(c) => self.open(definition),
            Some(_) => Err(ElementError::Identifier.into()),
        }
    }

    /// Consume the `>` that must follow `/`.
    fn tag_end(&mut self) -> Result<(), ErrorKind> {
        if !self.scanner.at('>') {
            return Err(ElementError::AfterSlash.into());
        }
        self.scanner.advance()?;
        Ok(())
    }

    fn open(&mut self, definition: bool) -> Result<(), ErrorKind> {
        // The root frame is at the bottom, so the new element lands at
        // depth `stack.len()`.
        if self.stack.len() > MAX_DEPTH {
            return Err(ElementError::TooDeep.into());
        }
        let start = self.scanner.offset();
        let name = self.scanner.identifier()?;
        let name_span = Span::new(start, self.scanner.offset());
        match self.scanner.current() {
            None => return Err(ElementError::Incomplete.into()),
            Some(c) if c.is_whitespace() || c == '/' || c == '>' => {}
            Some(_) => return Err(ElementError::AfterIdent.into()),
        }

        let kind = if definition {
            if self.prefabs.contains_key(&name) {
                self.mark = Some(name_span);
                return Err(PrefabError::Shadow(name).into());
            }
            FrameKind::Definition
        } else if self.prefabs.contains_key(&name) {
            FrameKind::Usage
        } else if self.definitions.contains(&name) {
            FrameKind::Element
        } else {
            self.mark = Some(name_span);
            return Err(ErrorKind::Unknown(name));
        };
        trace!("open `{name}` as {kind:?}");

        let mut element = Element::new(name);
        let self_closing = loop {
            self.scanner.skip_whitespace()?;
            match self.scanner.current() {
                None => return Err(ElementError::Incomplete.into()),
                Some('/') => {
                    self.scanner.advance()?;
                    self.tag_end()?;
                    break true;
                }
                Some('>') => {
                    self.scanner.advance()?;
                    break false;
                }
                Some(_) if kind == FrameKind::Definition => {
                    return Err(PrefabError::Attributes.into());
                }
                Some(_) => self.attribute(&mut element)?,
            }
        };
        // Slots follow attribute name order, the order they are emitted in.
        element.slots.sort_by(|a, b| a.target.cmp(&b.target));

        if self_closing {
            return self.attach(Frame { element, kind });
        }
        if kind == FrameKind::Definition {
            self.definition_depth += 1;
        }
        self.stack.push(Frame { element, kind });
        Ok(())
    }

    /// Close the innermost frame for `</>` (or `<!/>` when `definition`).
    fn close(&mut self, definition: bool) -> Result<(), ErrorKind> {
        let matches = self.stack.top().is_some_and(|frame| match frame.kind {
            FrameKind::Root => false,
            FrameKind::Definition => definition,
            FrameKind::Element | FrameKind::Usage => !definition,
        });
        if !matches {
            return Err(ElementError::ExtraClosure.into());
        }
        let frame = self.pop_frame()?;
        trace!("close `{}`", frame.element.name);
        self.attach(frame)
    }

    fn pop_frame(&mut self) -> Result<Frame, ErrorKind> {
        let frame = self
            .stack
            .pop()
            .ok_or(ErrorKind::Element(ElementError::ExtraClosure))?;
        if frame.kind == FrameKind::Definition {
            self.definition_depth = self.definition_depth.saturating_sub(1);
        }
        Ok(frame)
    }

    /// Hand a finished frame to its parent.
    fn attach(&mut self, frame: Frame) -> Result<(), ErrorKind> {
        match frame.kind {
            FrameKind::Root => Err(ElementError::ExtraClosure.into()),
            FrameKind::Element => self.push_child(frame.element),
            FrameKind::Definition => self.define(frame.element),
            FrameKind::Usage => {
                let usage = frame.element;
                let template = self
                    .prefabs
                    .get(&usage.name)
                    .ok_or_else(|| ErrorKind::Unknown(usage.name.clone()))?;
                let mut nodes = instantiate(template, &usage);
                debug!(
                    "prefab `{}` instantiated into {} nodes",
                    usage.name,
                    nodes.len()
                );
                let parent_depth = self.stack.len().saturating_sub(1);
                if nodes.iter().any(|node| parent_depth + node.depth() > MAX_DEPTH) {
                    return Err(ElementError::TooDeep.into());
                }
                nodes.extend(usage.into_children());
                for node in nodes {
                    self.push_child(node)?;
                }
                Ok(())
            }
        }
    }

    fn push_child(&mut self, element: Element) -> Result<(), ErrorKind> {
        match self.stack.top_mut() {
            Some(frame) => {
                frame.element.children.push(element);
                Ok(())
            }
            None => Err(ElementError::ExtraClosure.into()),
        }
    }

    fn define(&mut self, template: Element) -> Result<(), ErrorKind> {
        if self.prefabs.contains_key(&template.name) {
            return Err(PrefabError::Shadow(template.name.clone()).into());
        }
        debug!(
            "prefab `{}` defined with {} top-level nodes",
            template.name,
            template.children.len()
        );
        self.prefab_order.push(template.name.clone());
        self.prefabs.insert(template.name.clone(), template);
        Ok(())
    }

    // ── Attributes ──────────────────────────────────────────────────────

    /// Parse one `name[=value]` into `element`.
    fn attribute(&mut self, element: &mut Element) -> Result<(), ErrorKind> {
        if !self.scanner.current().is_some_and(is_ident_start) {
            return Err(ElementError::Identifier.into());
        }
        let name = self.scanner.identifier()?;
        // A repeated attribute replaces the earlier value and its slots.
        element.slots.retain(|slot| slot.target != name);

        let values = match self.scanner.current() {
            Some('=') => {
                self.scanner.advance()?;
                let values = self.value(&name, &mut element.slots)?;
                // The next attribute needs whitespace in between.
                if self
                    .scanner
                    .current()
                    .is_some_and(|c| !c.is_whitespace() && c != '/' && c != '>')
                {
                    return Err(AttributeError::Assignment.into());
                }
                values
            }
            None => vec![BARE_VALUE.to_string()],
            Some(c) if c.is_whitespace() || c == '/' || c == '>' => vec![BARE_VALUE.to_string()],
            Some(_) => return Err(AttributeError::Assignment.into()),
        };
        element.attributes.insert(name, values);
        Ok(())
    }

    fn value(&mut self, target: &str, slots: &mut Vec<SlotRecord>) -> Result<Vec<String>, ErrorKind> {
        match self.scanner.current() {
            None => Err(AttributeError::Incomplete.into()),
            Some('"') => {
                self.scanner.advance()?;
                let opts = quoted(self.in_prefab());
                let decoded = decode(&mut self.scanner, opts)?;
                slots.extend(decoded.placeholders.into_iter().map(|(name, at)| {
                    SlotRecord::new(name, target, SlotPosition::Interpolated { at })
                }));
                Ok(vec![decoded.text])
            }
            Some('{') => {
                let name = self.slot_name()?;
                slots.push(SlotRecord::new(name, target, SlotPosition::Whole));
                Ok(vec![String::new()])
            }
            Some('[') => self.list(target, slots),
            Some(_) => Err(AttributeError::ValueStart.into()),
        }
    }

    /// `[v1 v2 ...]`, values separated by exactly one space.
    fn list(&mut self, target: &str, slots: &mut Vec<SlotRecord>) -> Result<Vec<String>, ErrorKind> {
        self.scanner.advance()?;
        let mut values = Vec::new();
        if self.scanner.at(']') {
            self.scanner.advance()?;
            return Ok(values);
        }
        loop {
            match self.scanner.current() {
                None => return Err(AttributeError::ListIncomplete.into()),
                Some(' ') => return Err(AttributeError::ExtraSpace.into()),
                Some('"') => {
                    self.scanner.advance()?;
                    // List items take placeholders only as whole items.
                    let opts = quoted(false);
                    values.push(decode(&mut self.scanner, opts)?.text);
                }
                Some('{') => {
                    let name = self.slot_name()?;
                    slots.push(SlotRecord::new(
                        name,
                        target,
                        SlotPosition::ListIndex(values.len()),
                    ));
                    values.push(String::new());
                }
                Some(_) => return Err(AttributeError::BetweenByte.into()),
            }

            match self.scanner.current() {
                Some(']') => {
                    self.scanner.advance()?;
                    return Ok(values);
                }
                Some(' ') => {
                    self.scanner.advance()?;
                    if self.scanner.at(']') {
                        return Err(AttributeError::ExtraSpace.into());
                    }
                }
                None => return Err(AttributeError::ListIncomplete.into()),
                Some(_) => return Err(AttributeError::BetweenByte.into()),
            }
        }
    }

    /// Read `{name}` where a whole value or list item is expected.
    fn slot_name(&mut self) -> Result<String, ErrorKind> {
        if !self.in_prefab() {
            return Err(PrefabError::Outside.into());
        }
        self.scanner.advance()?;
        placeholder(&mut self.scanner)
    }
}

fn quoted(placeholders: bool) -> DecodeOptions {
    DecodeOptions {
        terminator: Terminator::Quote('"'),
        collapse: false,
        placeholders,
    }
}
