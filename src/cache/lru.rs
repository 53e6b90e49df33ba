//! LRU Map Module
//!
//! Bounded map with Least Recently Used eviction, backed by an arena of
//! doubly-linked nodes plus a hash index from key to node slot.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

// == Node ==
#[derive(Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    /// Neighbour towards the most recently used end
    prev: Option<usize>,
    /// Neighbour towards the least recently used end
    next: Option<usize>,
}

// == LRU Map ==
/// Capacity-bounded map ordered by access recency.
///
/// - `head` = most recently used
/// - `tail` = least recently used
///
/// Every successful `get` or `insert` moves the entry to the head. Inserting
/// past capacity evicts the tail. A capacity of zero is legal: every insert
/// is evicted straight away.
#[derive(Debug)]
pub struct LruMap<K, V> {
    /// Node arena; `None` slots are recycled through `free`
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<usize>,
    index: HashMap<K, usize>,
    head: Option<usize>,
    tail: Option<usize>,
    capacity: usize,
}

impl<K, V> LruMap<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates an empty map that holds at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity.min(1024)),
            free: Vec::new(),
            index: HashMap::with_capacity(capacity.min(1024)),
            head: None,
            tail: None,
            capacity,
        }
    }

    #[cfg(test)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // == Contains ==
    /// Checks membership without touching recency.
    #[cfg(test)]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    // == Get ==
    /// Returns the value for `key` and marks it most recently used.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.index.get(key)?;
        self.move_to_head(idx);
        self.slots[idx].as_ref().map(|node| &node.value)
    }

    // == Peek ==
    /// Returns the value for `key` without touching recency.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.index.get(key)?;
        self.slots[idx].as_ref().map(|node| &node.value)
    }

    // == Insert ==
    /// Inserts or overwrites `key`, marking it most recently used.
    ///
    /// Returns the entry evicted to stay within capacity, if any. The evicted
    /// entry may be the one just inserted when the capacity is zero.
    pub fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&idx) = self.index.get(&key) {
            if let Some(node) = self.slots[idx].as_mut() {
                node.value = value;
            }
            self.move_to_head(idx);
            return None;
        }

        let node = Node {
            key: key.clone(),
            value,
            prev: None,
            next: None,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };
        self.index.insert(key, idx);
        self.attach_head(idx);

        if self.index.len() > self.capacity {
            self.pop_oldest()
        } else {
            None
        }
    }

    // == Remove ==
    /// Removes `key` and returns its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.index.remove(key)?;
        self.release(idx).map(|(_, value)| value)
    }

    // == Remove First Where ==
    /// Walks from most to least recently used and removes the first entry
    /// matching `pred`. O(n) in the worst case.
    pub fn remove_first_where<F>(&mut self, mut pred: F) -> Option<(K, V)>
    where
        F: FnMut(&K, &V) -> bool,
    {
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            let node = self.slots[idx].as_ref()?;
            if pred(&node.key, &node.value) {
                let key = node.key.clone();
                self.index.remove(&key);
                return self.release(idx);
            }
            cursor = node.next;
        }
        None
    }

    // == Pop Oldest ==
    /// Removes and returns the least recently used entry.
    pub fn pop_oldest(&mut self) -> Option<(K, V)> {
        let idx = self.tail?;
        if let Some(node) = self.slots[idx].as_ref() {
            self.index.remove(&node.key);
        }
        self.release(idx)
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    #[cfg(test)]
    pub fn peek_oldest(&self) -> Option<&K> {
        self.tail
            .and_then(|idx| self.slots[idx].as_ref())
            .map(|node| &node.key)
    }

    // == Iter ==
    /// Iterates entries from most to least recently used.
    #[cfg(test)]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            map: self,
            cursor: self.head,
        }
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.index.clear();
        self.head = None;
        self.tail = None;
    }

    // == Internal Linking ==
    fn detach(&mut self, idx: usize) {
        let (prev, next) = match self.slots[idx].as_ref() {
            Some(node) => (node.prev, node.next),
            None => return,
        };
        match prev {
            Some(p) => {
                if let Some(node) = self.slots[p].as_mut() {
                    node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(node) = self.slots[n].as_mut() {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
        if let Some(node) = self.slots[idx].as_mut() {
            node.prev = None;
            node.next = None;
        }
    }

    fn attach_head(&mut self, idx: usize) {
        let old_head = self.head;
        if let Some(node) = self.slots[idx].as_mut() {
            node.prev = None;
            node.next = old_head;
        }
        if let Some(h) = old_head {
            if let Some(node) = self.slots[h].as_mut() {
                node.prev = Some(idx);
            }
        }
        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    fn move_to_head(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.detach(idx);
        self.attach_head(idx);
    }

    /// Unlinks a slot already dropped from the index and recycles it.
    fn release(&mut self, idx: usize) -> Option<(K, V)> {
        self.detach(idx);
        let node = self.slots[idx].take()?;
        self.free.push(idx);
        Some((node.key, node.value))
    }
}

// == Iterator ==
#[cfg(test)]
pub struct Iter<'a, K, V> {
    map: &'a LruMap<K, V>,
    cursor: Option<usize>,
}

#[cfg(test)]
impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.map.slots[self.cursor?].as_ref()?;
        self.cursor = node.next;
        Some((&node.key, &node.value))
    }
}
