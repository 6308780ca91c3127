use super::{DEFAULT_INITIAL_CAPACITY, DynamicArray};
use std::fmt;

/// FIFO ring buffer.
///
/// `head` is the next slot to dequeue and `tail` the last slot written, both
/// wrapping modulo the capacity. A full queue is re-laid into a buffer twice
/// the size starting at slot 0, so `head` becomes 0 and `tail` `len - 1`.
#[derive(Clone)]
pub struct CircularQueue<T> {
    slots: Box<[Option<T>]>,
    head: usize,
    tail: usize,
    len: usize,
}

impl<T> CircularQueue<T> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_INITIAL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: empty_slots(capacity),
            head: 0,
            tail: capacity - 1,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn enqueue(&mut self, item: T) {
        if self.len == self.capacity() {
            self.grow();
        }
        self.tail = (self.tail + 1) % self.capacity();
        self.slots[self.tail] = Some(item);
        self.len += 1;
    }

    /// Remove the element at the head, `None` when empty
    pub fn dequeue(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let item = self.slots[self.head].take();
        self.head = (self.head + 1) % self.capacity();
        self.len -= 1;
        item
    }

    /// Element at the head without removing it, `None` when empty
    pub fn front(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        self.slots[self.head].as_ref()
    }

    /// Drop every retained element, then reset the indices
    pub fn clear(&mut self) {
        let capacity = self.capacity();
        for offset in 0..self.len {
            self.slots[(self.head + offset) % capacity] = None;
        }
        self.head = 0;
        self.tail = capacity - 1;
        self.len = 0;
    }

    /// FIFO iteration from the head; does not move `head`, `tail` or `len`
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let capacity = self.capacity();
        (0..self.len).filter_map(move |offset| self.slots[(self.head + offset) % capacity].as_ref())
    }

    fn grow(&mut self) {
        let capacity = self.capacity();
        let mut next = empty_slots(capacity * 2);
        for (offset, dst) in next.iter_mut().take(self.len).enumerate() {
            *dst = self.slots[(self.head + offset) % capacity].take();
        }
        self.slots = next;
        self.head = 0;
        self.tail = self.len.saturating_sub(1);
    }
}

impl<T: Clone> CircularQueue<T> {
    /// Independent copy in FIFO order
    pub fn snapshot(&self) -> DynamicArray<T> {
        self.iter().cloned().collect()
    }
}

fn empty_slots<T>(capacity: usize) -> Box<[Option<T>]> {
    std::iter::repeat_with(|| None).take(capacity).collect()
}

impl<T> Default for CircularQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for CircularQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircularQueue")
            .field("head", &self.head)
            .field("tail", &self.tail)
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("items", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}
