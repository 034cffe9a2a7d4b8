use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Name of the synthetic element wrapping bare text, and of its attribute.
pub const TEXT: &str = "text";

/// Name of the synthetic root element returned by the parser.
pub const ROOT: &str = "root";

/// Attribute name to ordered values. Scalar attributes hold one value.
pub type Attributes = BTreeMap<String, Vec<String>>;

/// A parsed markup node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Element name (`div`, `text`, or a prefab name for captured templates).
    pub name: String,
    /// Attributes in name order; values keep source order.
    #[serde(default)]
    pub attributes: Attributes,
    /// Children in document order.
    #[serde(default)]
    pub children: Vec<Element>,
    /// Unresolved placeholders, only present on elements captured inside a
    /// prefab definition.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slots: Vec<SlotRecord>,
}

impl Element {
    /// An element with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::new(),
            children: Vec::new(),
            slots: Vec::new(),
        }
    }

    /// The synthetic `text` element holding `value`.
    pub fn text(value: impl Into<String>) -> Self {
        Self::new(TEXT).with_attribute(TEXT, [value.into()])
    }

    /// Builder: set attribute `name` to `values`.
    pub fn with_attribute<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Builder: append a child.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Values of attribute `name`.
    pub fn attribute(&self, name: &str) -> Option<&[String]> {
        self.attributes.get(name).map(Vec::as_slice)
    }

    /// First value of attribute `name`.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.attribute(name)?.first().map(String::as_str)
    }

    /// Whether this is a plain text node: named `text`, carrying exactly one
    /// `text` value and nothing else.
    pub fn is_text(&self) -> bool {
        self.name == TEXT
            && self.children.is_empty()
            && self.attributes.len() == 1
            && self.attribute(TEXT).is_some_and(|v| v.len() == 1)
    }

    /// Take the children, leaving this element empty.
    pub fn into_children(mut self) -> Vec<Element> {
        std::mem::take(&mut self.children)
    }

    /// Whether this element or any descendant still carries slot records.
    pub fn has_slots(&self) -> bool {
        let mut pending = vec![self];
        while let Some(el) = pending.pop() {
            if !el.slots.is_empty() {
                return true;
            }
            pending.extend(&el.children);
        }
        false
    }

    /// Levels of non-text elements from this one down, counting itself.
    /// A text node has depth 0.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 1)];
        while let Some((el, level)) = pending.pop() {
            if el.is_text() {
                continue;
            }
            deepest = deepest.max(level);
            pending.extend(el.children.iter().map(|child| (child, level + 1)));
        }
        deepest
    }
}

// Children are released level by level so dropping a deep tree cannot
// exhaust the stack.
impl Drop for Element {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut child) = pending.pop() {
            pending.append(&mut child.children);
        }
    }
}

/// An unresolved placeholder recorded while capturing a prefab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRecord {
    /// Attribute on the usage tag that supplies the value.
    pub name: String,
    /// Attribute on the captured element receiving the value (`text` for
    /// bare text).
    pub target: String,
    /// Where in `target` the value goes.
    pub position: SlotPosition,
}

impl SlotRecord {
    /// Shorthand constructor.
    pub fn new(name: impl Into<String>, target: impl Into<String>, position: SlotPosition) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            position,
        }
    }
}

/// How a slot's bound value is spliced back into its target attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotPosition {
    /// `attr={slot}`: the binding's whole value sequence replaces the attribute.
    Whole,
    /// `"text {slot} text"`: the binding's first value is inserted at byte
    /// offset `at` of the captured literal.
    Interpolated {
        /// Byte offset into the captured literal.
        at: usize,
    },
    /// `attr=["x" {slot}]`: the binding's first value overwrites this index.
    ListIndex(usize),
}
