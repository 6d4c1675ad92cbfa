//! FIFO queue that admits every item at most once.

use std::collections::{HashSet, VecDeque};
use std::hash::Hash;

/// A FIFO queue coupled with a visited marker.
///
/// An item that was ever added is never added again, even after it has
/// been polled. [`DedupQueue::done_all`] answers "has every one of these
/// already passed through", which is the readiness test of the layering
/// passes.
#[derive(Debug, Clone)]
pub struct DedupQueue<T> {
    queue: VecDeque<T>,
    seen: HashSet<T>,
}

impl<T: Eq + Hash + Clone> DedupQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            seen: HashSet::new(),
        }
    }

    /// Create an empty queue sized for `capacity` items.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity),
            seen: HashSet::with_capacity(capacity),
        }
    }

    /// Enqueue `item` unless it was added before. Returns whether it was added.
    pub fn add(&mut self, item: T) -> bool {
        if self.seen.insert(item.clone()) {
            self.queue.push_back(item);
            true
        } else {
            false
        }
    }

    /// Enqueue every item of `items`, skipping ones added before.
    pub fn add_all<I: IntoIterator<Item = T>>(&mut self, items: I) {
        for item in items {
            self.add(item);
        }
    }

    /// Remove and return the front item.
    pub fn poll(&mut self) -> Option<T> {
        self.queue.pop_front()
    }

    /// Whether nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of waiting items.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether `item` was ever added.
    pub fn done(&self, item: &T) -> bool {
        self.seen.contains(item)
    }

    /// Whether every item of `items` was ever added. True for an empty input.
    pub fn done_all<'a, I>(&self, items: I) -> bool
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        items.into_iter().all(|item| self.seen.contains(item))
    }
}

impl<T: Eq + Hash + Clone> Default for DedupQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_added_once() {
        let mut queue = DedupQueue::new();
        assert!(queue.add(1));
        assert!(!queue.add(1));
        assert_eq!(queue.poll(), Some(1));

        // Still rejected after it was polled
        assert!(!queue.add(1));
        assert!(queue.is_empty());
        assert_eq!(queue.poll(), None);
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = DedupQueue::with_capacity(4);
        queue.add_all([3, 1, 3, 2]);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.poll(), Some(3));
        assert_eq!(queue.poll(), Some(1));
        assert_eq!(queue.poll(), Some(2));
    }

    #[test]
    fn test_done_all() {
        let mut queue = DedupQueue::new();
        queue.add_all(["a", "b"]);
        assert!(queue.done_all(&["a", "b"]));
        assert!(!queue.done_all(&["a", "c"]));
        assert!(queue.done_all(&[] as &[&str]));
        assert!(queue.done(&"a"));
    }
}
