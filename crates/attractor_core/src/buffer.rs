//! Fixed-capacity trajectory history.

use anyhow::{bail, Result};
use std::iter::FusedIterator;

/// Ring buffer that keeps the last `capacity` items added to it.
///
/// Once full, every `add` evicts the oldest item. Iteration always runs from
/// oldest to newest.
#[derive(Debug, Clone)]
pub struct HistoryBuffer<T> {
    capacity: usize,
    items: Vec<T>,
    start: usize,
    end: usize,
    full: bool,
}

impl<T> HistoryBuffer<T> {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            bail!("History buffer capacity must be at least 1.");
        }
        Ok(Self {
            capacity,
            items: Vec::with_capacity(capacity),
            start: 0,
            end: 0,
            full: false,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        if self.full {
            self.capacity
        } else {
            self.end - self.start
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.full && self.start == self.end
    }

    pub fn is_full(&self) -> bool {
        self.full
    }

    pub fn add(&mut self, item: T) {
        // Until the first wrap the backing vector grows in step with `end`.
        if self.items.len() < self.capacity {
            self.items.push(item);
        } else {
            self.items[self.end] = item;
        }
        self.end = (self.end + 1) % self.capacity;
        if self.full {
            self.start = (self.start + 1) % self.capacity;
        }
        if self.end == self.start {
            self.full = true;
        }
    }

    /// Returns the most recently added item, or `None` if nothing was added yet.
    pub fn current(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        let idx = (self.end + self.capacity - 1) % self.capacity;
        self.items.get(idx)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.start = 0;
        self.end = 0;
        self.full = false;
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            buffer: self,
            idx: self.start,
            remaining: self.len(),
        }
    }
}

impl<'a, T> IntoIterator for &'a HistoryBuffer<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Oldest-to-newest iterator over a [`HistoryBuffer`].
#[derive(Debug, Clone)]
pub struct Iter<'a, T> {
    buffer: &'a HistoryBuffer<T>,
    idx: usize,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let item = self.buffer.items.get(self.idx);
        self.idx = (self.idx + 1) % self.buffer.capacity;
        self.remaining -= 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}
