use super::{CollectionError, DEFAULT_INITIAL_CAPACITY};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::fmt;

/// Contiguous, index-addressable sequence with amortized O(1) append.
///
/// Backing storage is a boxed slice of slots; only `0..len` is ever occupied.
/// When an append would exceed the capacity the slice is reallocated at twice
/// its size and the live prefix is moved across in order.
pub struct DynamicArray<T> {
    slots: Box<[Option<T>]>,
    len: usize,
}

impl<T> DynamicArray<T> {
    /// Create an empty array with the default initial capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_INITIAL_CAPACITY)
    }

    /// Create an empty array with room for `capacity` elements (minimum 1)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: empty_slots(capacity.max(1)),
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

    /// Append an element at the end, doubling the capacity when full
    pub fn push(&mut self, item: T) {
        if self.len == self.capacity() {
            self.grow();
        }
        self.slots[self.len] = Some(item);
        self.len += 1;
    }

    /// Insert at `index`, shifting every element at or after it one slot right
    pub fn insert(&mut self, index: usize, item: T) -> Result<(), CollectionError> {
        if index > self.len {
            return Err(CollectionError::OutOfRange {
                index,
                len: self.len,
            });
        }
        if self.len == self.capacity() {
            self.grow();
        }
        // The slot at `len` is empty, so rotating it down to `index` opens the gap.
        self.slots[index..=self.len].rotate_right(1);
        self.slots[index] = Some(item);
        self.len += 1;
        Ok(())
    }

    /// Remove and return the element at `index`, shifting the tail left
    pub fn remove(&mut self, index: usize) -> Result<T, CollectionError> {
        if index >= self.len {
            return Err(CollectionError::OutOfRange {
                index,
                len: self.len,
            });
        }
        let removed = self.slots[index].take();
        self.slots[index..self.len].rotate_left(1);
        self.len -= 1;
        removed.ok_or(CollectionError::OutOfRange {
            index,
            len: self.len,
        })
    }

    pub fn get(&self, index: usize) -> Result<&T, CollectionError> {
        self.slots
            .get(index)
            .filter(|_| index < self.len)
            .and_then(Option::as_ref)
            .ok_or(CollectionError::OutOfRange {
                index,
                len: self.len,
            })
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut T, CollectionError> {
        let len = self.len;
        if index >= len {
            return Err(CollectionError::OutOfRange { index, len });
        }
        self.slots[index]
            .as_mut()
            .ok_or(CollectionError::OutOfRange { index, len })
    }

    pub fn first(&self) -> Option<&T> {
        self.get(0).ok()
    }

    pub fn last(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|i| self.get(i).ok())
    }

    /// Position of the first element satisfying `predicate`
    pub fn position<P>(&self, mut predicate: P) -> Option<usize>
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().position(|item| predicate(item))
    }

    /// Drop every element and reset the length; capacity is kept
    pub fn clear(&mut self) {
        for slot in self.slots[..self.len].iter_mut() {
            *slot = None;
        }
        self.len = 0;
    }

    /// Remove and return the last element
    pub fn pop(&mut self) -> Option<T> {
        let index = self.len.checked_sub(1)?;
        self.len = index;
        self.slots[index].take()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + '_ {
        self.slots[..self.len].iter().filter_map(Option::as_ref)
    }

    fn grow(&mut self) {
        let mut next = empty_slots(self.capacity() * 2);
        for (dst, src) in next.iter_mut().zip(self.slots[..self.len].iter_mut()) {
            *dst = src.take();
        }
        self.slots = next;
    }
}

impl<T: PartialEq> DynamicArray<T> {
    /// Index of the first element equal to `item`
    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.position(|candidate| candidate == item)
    }

    pub fn contains(&self, item: &T) -> bool {
        self.index_of(item).is_some()
    }

    /// Remove the first element equal to `item`; returns whether one was removed
    pub fn remove_first_match(&mut self, item: &T) -> bool {
        match self.index_of(item) {
            Some(index) => self.remove(index).is_ok(),
            None => false,
        }
    }
}

impl<T: Clone> DynamicArray<T> {
    /// Independent ordered copy; mutating it never affects `self`
    pub fn snapshot(&self) -> DynamicArray<T> {
        self.iter().cloned().collect()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

fn empty_slots<T>(capacity: usize) -> Box<[Option<T>]> {
    std::iter::repeat_with(|| None).take(capacity).collect()
}

impl<T> Default for DynamicArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for DynamicArray<T> {
    fn clone(&self) -> Self {
        let mut copy = Self::with_capacity(self.capacity());
        for item in self.iter() {
            copy.push(item.clone());
        }
        copy
    }
}

impl<T: fmt::Debug> fmt::Debug for DynamicArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for DynamicArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T> FromIterator<T> for DynamicArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::new();
        for item in iter {
            array.push(item);
        }
        array
    }
}

impl<T> IntoIterator for DynamicArray<T> {
    type Item = T;
    type IntoIter = std::iter::Take<std::iter::Flatten<std::vec::IntoIter<Option<T>>>>;

    fn into_iter(self) -> Self::IntoIter {
        let len = self.len;
        self.slots.into_vec().into_iter().flatten().take(len)
    }
}

impl<T: Serialize> Serialize for DynamicArray<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len))?;
        for item in self.iter() {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}
