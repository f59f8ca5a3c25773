//! Append-only growable storage used by the bytecode container.

use std::ops::Index;
use std::slice;

/// Smallest non-zero capacity a buffer grows to.
pub const MIN_CAPACITY: usize = 8;

/// Next capacity for a buffer that is full at `capacity` elements.
pub fn grow_capacity(capacity: usize) -> usize {
    if capacity < MIN_CAPACITY {
        MIN_CAPACITY
    } else {
        capacity * 2
    }
}

/// A dynamic array that grows by doubling, starting at eight slots.
///
/// The capacity is tracked explicitly instead of being left to `Vec`, so the
/// reported capacity always follows the 0, 8, 16, 32, ... sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct GrowableArray<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> GrowableArray<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            capacity: 0,
        }
    }

    /// Append an element, doubling the capacity if the buffer is full
    pub fn push(&mut self, item: T) {
        if self.items.len() + 1 > self.capacity {
            let new_capacity = grow_capacity(self.capacity);
            self.items.reserve_exact(new_capacity - self.items.len());
            self.capacity = new_capacity;
        }
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Release the storage and return to the empty, zero-capacity state
    pub fn clear(&mut self) {
        self.items = Vec::new();
        self.capacity = 0;
    }
}

impl<T> Default for GrowableArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for GrowableArray<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<'a, T> IntoIterator for &'a GrowableArray<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grow_capacity_policy() {
        assert_eq!(grow_capacity(0), 8);
        assert_eq!(grow_capacity(7), 8);
        assert_eq!(grow_capacity(8), 16);
        assert_eq!(grow_capacity(16), 32);
    }

    #[test]
    fn test_capacity_doubles_from_eight() {
        let mut array = GrowableArray::new();
        assert_eq!(array.capacity(), 0);

        let mut seen = vec![];
        for i in 0..33u32 {
            array.push(i);
            if seen.last() != Some(&array.capacity()) {
                seen.push(array.capacity());
            }
        }

        assert_eq!(seen, vec![8, 16, 32, 64]);
        assert_eq!(array.len(), 33);
        assert_eq!(array[32], 32);
    }

    #[test]
    fn test_clear_frees_storage() {
        let mut array = GrowableArray::new();
        array.push('a');
        array.push('b');
        array.clear();

        assert!(array.is_empty());
        assert_eq!(array.capacity(), 0);
        assert_eq!(array.get(0), None);
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let mut array = GrowableArray::new();
        for word in ["one", "two", "three"] {
            array.push(word);
        }
        let collected: Vec<_> = array.iter().copied().collect();
        assert_eq!(collected, vec!["one", "two", "three"]);
        assert_eq!(array.as_slice(), &["one", "two", "three"]);
    }
}
