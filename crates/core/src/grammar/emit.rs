//! goml emitter: converts an element tree back into markup text.
//!
//! The output parses back to the same tree when every element name is
//! registered with the parser. Text is escaped so that the whitespace rules
//! of the grammar (leading run skipped, runs collapsed, trailing run dropped)
//! leave it unchanged. Two adjacent text nodes cannot be told apart from one
//! and merge on the way back.
//!
//! Slot records are written as placeholders, which is how [`emit_prefab`]
//! reproduces a captured template.

use super::ast::{Element, SlotPosition, SlotRecord, TEXT};

// ── Configuration ───────────────────────────────────────────────────────

/// Indentation style for nested elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Indent {
    /// Every tag on its own line, no indentation.
    None,
    /// Two spaces per level.
    #[default]
    Two,
    /// Four spaces per level.
    Four,
    /// One tab per level.
    Tab,
}

impl Indent {
    fn unit(self) -> &'static str {
        match self {
            Indent::None => "",
            Indent::Two => "  ",
            Indent::Four => "    ",
            Indent::Tab => "\t",
        }
    }
}

/// Configuration for the goml emitter.
#[derive(Debug, Clone, Default)]
pub struct EmitConfig {
    /// Indentation style.
    pub indent: Indent,
}

// ── Public API ──────────────────────────────────────────────────────────

/// Emit the children of `root`, one top-level node after another.
pub fn emit_goml(root: &Element, config: &EmitConfig) -> String {
    let mut out = String::new();
    for child in &root.children {
        emit_node(&mut out, child, 0, config);
    }
    out
}

/// Emit a captured template as a `<!name> ... <!/>` definition.
pub fn emit_prefab(template: &Element, config: &EmitConfig) -> String {
    let mut out = format!("<!{}>\n", template.name);
    for child in &template.children {
        emit_node(&mut out, child, 1, config);
    }
    out.push_str("<!/>\n");
    out
}

/// Emit every template in `prefabs`, one definition after another.
pub fn emit_prefabs<'a, I>(prefabs: I, config: &EmitConfig) -> String
where
    I: IntoIterator<Item = &'a Element>,
{
    prefabs
        .into_iter()
        .map(|template| emit_prefab(template, config))
        .collect()
}

/// Emit a whole document: the tree of `root`, then the definitions of
/// `prefabs` in the given order.
///
/// A parsed tree holds no usage tags, so writing it ahead of the definitions
/// keeps every element name resolving to a plain element, even one that a
/// later definition reuses as a prefab name.
pub fn emit_document<'a, I>(root: &Element, prefabs: I, config: &EmitConfig) -> String
where
    I: IntoIterator<Item = &'a Element>,
{
    emit_goml(root, config) + &emit_prefabs(prefabs, config)
}

// ── Nodes ───────────────────────────────────────────────────────────────

fn emit_node(out: &mut String, el: &Element, depth: usize, config: &EmitConfig) {
    push_indent(out, config, depth);

    if el.is_text() {
        let value = el.value(TEXT).unwrap_or_default();
        write_literal(out, value, &interpolations(&el.slots, TEXT), Context::Text);
        out.push('\n');
        return;
    }

    out.push('<');
    out.push_str(&el.name);
    for (name, values) in &el.attributes {
        out.push(' ');
        emit_attribute(out, name, values, &el.slots);
    }
    if el.children.is_empty() {
        out.push_str("/>\n");
        return;
    }
    out.push_str(">\n");
    for child in &el.children {
        emit_node(out, child, depth + 1, config);
    }
    push_indent(out, config, depth);
    out.push_str("</>\n");
}

fn emit_attribute(out: &mut String, name: &str, values: &[String], slots: &[SlotRecord]) {
    out.push_str(name);

    if let Some(whole) = slots
        .iter()
        .find(|s| s.target == name && s.position == SlotPosition::Whole)
    {
        out.push('=');
        push_placeholder(out, &whole.name);
        return;
    }

    let marks = interpolations(slots, name);
    let list_slots = slots
        .iter()
        .any(|s| s.target == name && matches!(s.position, SlotPosition::ListIndex(_)));
    match values {
        [_] if list_slots => {}
        [only] if only == "true" && marks.is_empty() => return,
        [only] => {
            out.push_str("=\"");
            write_literal(out, only, &marks, Context::Quoted);
            out.push('"');
            return;
        }
        _ => {}
    }

    out.push_str("=[");
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let slot = slots
            .iter()
            .find(|s| s.target == name && s.position == SlotPosition::ListIndex(i));
        match slot {
            Some(slot) => push_placeholder(out, &slot.name),
            None => {
                out.push('"');
                write_literal(out, value, &[], Context::Quoted);
                out.push('"');
            }
        }
    }
    out.push(']');
}

/// Interpolated slots of `target` as `(name, offset)`, by offset.
fn interpolations<'a>(slots: &'a [SlotRecord], target: &str) -> Vec<(&'a str, usize)> {
    let mut marks: Vec<_> = slots
        .iter()
        .filter(|s| s.target == target)
        .filter_map(|s| match s.position {
            SlotPosition::Interpolated { at } => Some((s.name.as_str(), at)),
            _ => None,
        })
        .collect();
    marks.sort_by_key(|&(_, at)| at);
    marks
}

// ── Literals ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    /// Inside `"..."`.
    Quoted,
    /// Bare text between tags.
    Text,
}

/// Escape `value` for `context`, writing `{name}` at each mark's offset.
fn write_literal(out: &mut String, value: &str, marks: &[(&str, usize)], context: Context) {
    let text = context == Context::Text;
    let mut marks = marks.iter().peekable();
    let mut at_start = true;
    let mut after_space = false;

    for (i, c) in value.char_indices() {
        while let Some((name, _)) = marks.next_if(|(_, at)| *at <= i) {
            push_placeholder(out, name);
            at_start = false;
            after_space = false;
        }
        let trailing = i + c.len_utf8() == value.len() && marks.peek().is_none();
        match c {
            '\\' => out.push_str("\\\\"),
            '{' => out.push_str("{{"),
            '"' if !text => out.push_str("\\\""),
            '<' if text => push_code(out, c),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            ' ' if text && (at_start || after_space || trailing) => push_code(out, c),
            c if c.is_control() => push_code(out, c),
            c if text && at_start && c.is_whitespace() => push_code(out, c),
            c => out.push(c),
        }
        at_start = false;
        after_space = c == ' ';
    }
    for (name, _) in marks {
        push_placeholder(out, name);
    }
}

fn push_placeholder(out: &mut String, name: &str) {
    out.push('{');
    out.push_str(name);
    out.push('}');
}

/// Numeric escape for `c`, using the shortest form that holds it.
fn push_code(out: &mut String, c: char) {
    let code = u32::from(c);
    let escaped = if code <= 0xFF {
        format!("\\x{code:02X}")
    } else if code <= 0xFFFF {
        format!("\\u{code:04X}")
    } else {
        format!("\\U{code:08X}")
    };
    out.push_str(&escaped);
}

fn push_indent(out: &mut String, config: &EmitConfig, depth: usize) {
    out.push_str(&config.indent.unit().repeat(depth));
}
