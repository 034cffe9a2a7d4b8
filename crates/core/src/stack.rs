//! Growable LIFO used for element construction bookkeeping.

/// A last-in first-out stack.
///
/// Unlike indexing into a `Vec`, every accessor is total: [`Stack::top`] and
/// [`Stack::pop`] return `None` on an empty stack, and [`Stack::can_pop`]
/// answers the question up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack<T> {
    items: Vec<T>,
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Stack<T> {
    /// An empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// The last pushed value.
    pub fn top(&self) -> Option<&T> {
        self.items.last()
    }

    /// Mutable access to the last pushed value.
    pub fn top_mut(&mut self) -> Option<&mut T> {
        self.items.last_mut()
    }

    /// Push `value` on top.
    pub fn push(&mut self, value: T) {
        self.items.push(value);
    }

    /// Remove and return the top value.
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Whether [`Stack::pop`] would return a value.
    pub fn can_pop(&self) -> bool {
        !self.items.is_empty()
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop every value.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Values from bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}
