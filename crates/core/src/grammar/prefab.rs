//! Prefab instantiation.
//!
//! A prefab is an [`Element`] whose children were captured inside
//! `<!name> ... <!/>`. Placeholders met during capture are stored as
//! [`SlotRecord`]s on the element that owns them, and the captured values
//! already have their final shape (`[""]` for whole-value slots, `""` at the
//! list index, the surrounding literal for interpolations).
//!
//! [`instantiate`] is pure: it clones the template and patches the copy.

use super::ast::{Element, SlotPosition, SlotRecord};

/// Clone the children of `template` and fill every slot from the attributes
/// of `usage`, the tag that instantiates the prefab.
///
/// A missing binding resolves to the empty string. Slots whose binding on
/// `usage` is itself a whole-value slot (a usage tag inside another prefab
/// body) are forwarded under the outer slot name instead of being resolved;
/// every other slot record is removed from the copy.
pub fn instantiate(template: &Element, usage: &Element) -> Vec<Element> {
    let mut nodes = template.children.clone();
    for node in &mut nodes {
        fill(node, usage);
    }
    nodes
}

fn fill(element: &mut Element, usage: &Element) {
    let slots = std::mem::take(&mut element.slots);
    let mut forwarded: Vec<SlotRecord> = Vec::new();

    // Last to first: an interpolation only shifts text after its own offset,
    // so earlier offsets stay valid.
    for slot in slots.iter().rev() {
        if let Some(outer) = forwarded_name(usage, &slot.name) {
            forwarded.push(SlotRecord::new(outer, slot.target.clone(), slot.position));
            continue;
        }
        let bound = usage.attribute(&slot.name).unwrap_or(&[]);
        let first = bound.first().map(String::as_str).unwrap_or("");
        match slot.position {
            SlotPosition::Whole => {
                let values = if bound.is_empty() {
                    vec![String::new()]
                } else {
                    bound.to_vec()
                };
                element.attributes.insert(slot.target.clone(), values);
            }
            SlotPosition::Interpolated { at } => {
                let values = element.attributes.entry(slot.target.clone()).or_default();
                if values.is_empty() {
                    values.push(String::new());
                }
                let literal = &mut values[0];
                literal.insert_str(at.min(literal.len()), first);
                shift_forwarded(&mut forwarded, &slot.target, at, first.len());
            }
            SlotPosition::ListIndex(index) => {
                if let Some(value) = element
                    .attributes
                    .get_mut(&slot.target)
                    .and_then(|values| values.get_mut(index))
                {
                    *value = first.to_string();
                }
            }
        }
    }

    forwarded.reverse();
    element.slots = forwarded;
    for child in &mut element.children {
        fill(child, usage);
    }
}

/// Name of the outer slot when `binding` on `usage` is a whole-value slot.
fn forwarded_name(usage: &Element, binding: &str) -> Option<String> {
    usage
        .slots
        .iter()
        .find(|s| s.target == binding && s.position == SlotPosition::Whole)
        .map(|s| s.name.clone())
}

/// Move forwarded interpolations in `target` at or after `at` right by `len`.
fn shift_forwarded(forwarded: &mut [SlotRecord], target: &str, at: usize, len: usize) {
    for slot in forwarded.iter_mut().filter(|s| s.target == target) {
        if let SlotPosition::Interpolated { at: pos } = &mut slot.position
            && *pos >= at
        {
            *pos += len;
        }
    }
}
