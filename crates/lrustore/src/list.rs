//! Recency list backing the LRU store
//!
//! Entries live in a single arena (`Vec`) and link to each other by slot
//! index, so the list never holds aliased references. Released slots go on a
//! free list and are handed out again by the next allocation.

use std::iter::FusedIterator;

/// Entry in the recency list
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    /// Neighbour toward the head (more recently used)
    pub(crate) prev: Option<usize>,
    /// Neighbour toward the tail (less recently used)
    pub(crate) next: Option<usize>,
}

/// Arena-backed doubly linked list ordered from most to least recently used
pub(crate) struct RecencyList<K, V> {
    slots: Vec<Option<Entry<K, V>>>,
    free_list: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl<K, V> RecencyList<K, V> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            head: None,
            tail: None,
        }
    }

    /// Most recently used slot
    pub(crate) fn head(&self) -> Option<usize> {
        self.head
    }

    /// Least recently used slot
    pub(crate) fn tail(&self) -> Option<usize> {
        self.tail
    }

    pub(crate) fn entry(&self, idx: usize) -> Option<&Entry<K, V>> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    pub(crate) fn entry_mut(&mut self, idx: usize) -> Option<&mut Entry<K, V>> {
        self.slots.get_mut(idx).and_then(Option::as_mut)
    }

    /// Store a new, unlinked entry and return its slot.
    pub(crate) fn alloc(&mut self, key: K, value: V) -> usize {
        let entry = Entry {
            key,
            value,
            prev: None,
            next: None,
        };

        if let Some(idx) = self.free_list.pop() {
            self.slots[idx] = Some(entry);
            idx
        } else {
            self.slots.push(Some(entry));
            self.slots.len() - 1
        }
    }

    /// Take a detached entry out of the arena and recycle its slot.
    pub(crate) fn release(&mut self, idx: usize) -> Option<(K, V)> {
        let entry = self.slots.get_mut(idx)?.take()?;
        debug_assert!(entry.prev.is_none() && entry.next.is_none());
        debug_assert!(self.head != Some(idx) && self.tail != Some(idx));
        self.free_list.push(idx);
        Some((entry.key, entry.value))
    }

    /// Insert a detached slot as the new head.
    pub(crate) fn prepend(&mut self, idx: usize) {
        let old_head = self.head;

        match self.entry_mut(idx) {
            Some(entry) => {
                entry.prev = None;
                entry.next = old_head;
            }
            None => return,
        }

        match old_head {
            Some(head_idx) => {
                if let Some(head) = self.entry_mut(head_idx) {
                    head.prev = Some(idx);
                }
            }
            None => self.tail = Some(idx),
        }

        self.head = Some(idx);
    }

    /// Unlink a slot from wherever it sits and clear its links.
    pub(crate) fn detach(&mut self, idx: usize) {
        let (prev, next) = match self.entry_mut(idx) {
            Some(entry) => (entry.prev.take(), entry.next.take()),
            None => return,
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_entry) = self.entry_mut(prev_idx) {
                    prev_entry.next = next;
                }
            }
            None if self.head == Some(idx) => self.head = next,
            None => {}
        }

        match next {
            Some(next_idx) => {
                if let Some(next_entry) = self.entry_mut(next_idx) {
                    next_entry.prev = prev;
                }
            }
            None if self.tail == Some(idx) => self.tail = prev,
            None => {}
        }
    }

    /// Drop every entry and forget all slots.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
        self.head = None;
        self.tail = None;
    }

    /// Walk `len` linked entries, head to tail.
    pub(crate) fn iter(&self, len: usize) -> Iter<'_, K, V> {
        Iter {
            list: self,
            front: self.head,
            back: self.tail,
            remaining: len,
        }
    }

    #[cfg(test)]
    pub(crate) fn arena_len(&self) -> usize {
        self.slots.len()
    }
}

/// Iterator over `(key, value)` pairs from most to least recently used.
///
/// Created by [`LruStore::iter`](crate::LruStore::iter).
pub struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    front: Option<usize>,
    back: Option<usize>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let entry = self.list.entry(self.front?)?;
        self.front = entry.next;
        self.remaining -= 1;
        Some((&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let entry = self.list.entry(self.back?)?;
        self.back = entry.prev;
        self.remaining -= 1;
        Some((&entry.key, &entry.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(list: &RecencyList<u32, ()>, len: usize) -> Vec<u32> {
        list.iter(len).map(|(k, _)| *k).collect()
    }

    fn list_of(n: u32) -> (RecencyList<u32, ()>, Vec<usize>) {
        let mut list = RecencyList::with_capacity(n as usize);
        let slots = (0..n)
            .map(|k| {
                let idx = list.alloc(k, ());
                list.prepend(idx);
                idx
            })
            .collect();
        (list, slots)
    }

    #[test]
    fn test_prepend_empty() {
        let (list, slots) = list_of(1);

        assert_eq!(list.head(), Some(slots[0]));
        assert_eq!(list.tail(), Some(slots[0]));
        let entry = list.entry(slots[0]).unwrap();
        assert_eq!(entry.prev, None);
        assert_eq!(entry.next, None);
    }

    #[test]
    fn test_prepend_order() {
        let (list, slots) = list_of(3);

        assert_eq!(keys(&list, 3), vec![2, 1, 0]);
        assert_eq!(list.head(), Some(slots[2]));
        assert_eq!(list.tail(), Some(slots[0]));
    }

    #[test]
    fn test_detach_head() {
        let (mut list, slots) = list_of(3);

        list.detach(slots[2]);

        assert_eq!(list.head(), Some(slots[1]));
        assert_eq!(list.entry(slots[1]).unwrap().prev, None);
        assert_eq!(keys(&list, 2), vec![1, 0]);
    }

    #[test]
    fn test_detach_tail() {
        let (mut list, slots) = list_of(3);

        list.detach(slots[0]);

        assert_eq!(list.tail(), Some(slots[1]));
        assert_eq!(list.entry(slots[1]).unwrap().next, None);
        assert_eq!(keys(&list, 2), vec![2, 1]);
    }

    #[test]
    fn test_detach_middle() {
        let (mut list, slots) = list_of(3);

        list.detach(slots[1]);

        let detached = list.entry(slots[1]).unwrap();
        assert_eq!(detached.prev, None);
        assert_eq!(detached.next, None);
        assert_eq!(list.entry(slots[2]).unwrap().next, Some(slots[0]));
        assert_eq!(list.entry(slots[0]).unwrap().prev, Some(slots[2]));
        assert_eq!(keys(&list, 2), vec![2, 0]);
    }

    #[test]
    fn test_detach_sole_entry() {
        let (mut list, slots) = list_of(1);

        list.detach(slots[0]);

        assert_eq!(list.head(), None);
        assert_eq!(list.tail(), None);
        assert_eq!(list.release(slots[0]), Some((0, ())));
    }

    #[test]
    fn test_detach_then_prepend() {
        let (mut list, slots) = list_of(3);

        list.detach(slots[0]);
        list.prepend(slots[0]);

        assert_eq!(keys(&list, 3), vec![0, 2, 1]);
        assert_eq!(list.tail(), Some(slots[1]));
    }

    #[test]
    fn test_release_reuses_slot() {
        let (mut list, slots) = list_of(2);

        list.detach(slots[0]);
        list.release(slots[0]);
        let idx = list.alloc(9, ());

        assert_eq!(idx, slots[0]);
        assert_eq!(list.arena_len(), 2);
    }

    #[test]
    fn test_iter_both_ends() {
        let (list, _) = list_of(4);

        let backward: Vec<u32> = list.iter(4).rev().map(|(k, _)| *k).collect();
        assert_eq!(backward, vec![0, 1, 2, 3]);

        let mut iter = list.iter(4);
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.next().map(|(k, _)| *k), Some(3));
        assert_eq!(iter.next_back().map(|(k, _)| *k), Some(0));
        assert_eq!(iter.next().map(|(k, _)| *k), Some(2));
        assert_eq!(iter.next_back().map(|(k, _)| *k), Some(1));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn test_clear() {
        let (mut list, _) = list_of(3);

        list.clear();

        assert_eq!(list.head(), None);
        assert_eq!(list.tail(), None);
        assert_eq!(list.arena_len(), 0);
    }
}
