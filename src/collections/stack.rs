use super::DynamicArray;

/// LIFO container layered over [`DynamicArray`]; the logical top is the last slot.
#[derive(Debug, Clone, Default)]
pub struct Stack<T> {
    items: DynamicArray<T>,
}

impl<T> Stack<T> {
    pub fn new() -> Self {
        Self {
            items: DynamicArray::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: DynamicArray::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Remove and return the top element, `None` when empty
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Top element without removing it, `None` when empty
    pub fn peek(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Bottom-to-top (oldest first) iteration; does not touch the stack
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + '_ {
        self.items.iter()
    }
}

impl<T: Clone> Stack<T> {
    /// Independent copy in insertion order (oldest first), not pop order
    pub fn snapshot(&self) -> DynamicArray<T> {
        self.items.snapshot()
    }
}
