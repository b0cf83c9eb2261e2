//! LRU List Module
//!
//! Recency ordering for cache entries: an arena-backed doubly linked list
//! with O(1) push, unlink and promotion.

use generational_arena::{Arena, Index};

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<Index>,
    next: Option<Index>,
}

// == LRU List ==
/// Doubly linked list ordered by recency.
///
/// - Head = most recently used
/// - Tail = least recently used
///
/// Nodes live in a generational arena, so an [`Index`] handed out by
/// [`push_front`](Self::push_front) stops resolving as soon as its node is
/// removed by [`remove`](Self::remove), [`pop_back`](Self::pop_back),
/// [`remove_where`](Self::remove_where) or [`clear`](Self::clear), even if
/// the slot is reused by a later insert. Callers can hold an
/// index across a lock release and detect that it went stale.
#[derive(Debug)]
pub struct LruList<T> {
    nodes: Arena<Node<T>>,
    head: Option<Index>,
    tail: Option<Index>,
}

impl<T> Default for LruList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LruList<T> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self {
            nodes: Arena::new(),
            head: None,
            tail: None,
        }
    }

    // == Push Front ==
    /// Inserts a value at the MRU position and returns its handle.
    pub fn push_front(&mut self, value: T) -> Index {
        let index = self.nodes.insert(Node {
            value,
            prev: None,
            next: None,
        });
        self.link_front(index);
        index
    }

    // == Touch ==
    /// Moves the node to the MRU position.
    ///
    /// Returns false if the handle no longer resolves.
    pub fn move_to_front(&mut self, index: Index) -> bool {
        if !self.nodes.contains(index) {
            return false;
        }
        if self.head != Some(index) {
            self.unlink(index);
            self.link_front(index);
        }
        true
    }

    // == Remove ==
    /// Unlinks and returns the value behind the handle.
    pub fn remove(&mut self, index: Index) -> Option<T> {
        if !self.nodes.contains(index) {
            return None;
        }
        self.unlink(index);
        self.nodes.remove(index).map(|node| node.value)
    }

    // == Evict Oldest ==
    /// Removes and returns the LRU value.
    pub fn pop_back(&mut self) -> Option<T> {
        let tail = self.tail?;
        self.remove(tail)
    }

    // == Remove Where ==
    /// Walks from the LRU tail towards the MRU head and removes every value
    /// matching `predicate`, returning them in the order they were removed.
    pub fn remove_where<F>(&mut self, mut predicate: F) -> Vec<T>
    where
        F: FnMut(&T) -> bool,
    {
        let mut removed = Vec::new();
        let mut cursor = self.tail;

        while let Some(index) = cursor {
            let node = &self.nodes[index];
            cursor = node.prev;
            if predicate(&node.value) {
                if let Some(value) = self.remove(index) {
                    removed.push(value);
                }
            }
        }

        removed
    }

    // == Accessors ==
    /// Returns the value behind the handle, if it is still live.
    pub fn get(&self, index: Index) -> Option<&T> {
        self.nodes.get(index).map(|node| &node.value)
    }

    /// Iterates values from MRU to LRU.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    /// Returns the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drops every node.
    ///
    /// Nodes are removed one by one so every outstanding [`Index`] goes stale,
    /// the same as after [`remove`](Self::remove).
    pub fn clear(&mut self) {
        while self.pop_back().is_some() {}
    }

    // == Linking ==
    fn link_front(&mut self, index: Index) {
        let old_head = self.head;
        {
            let node = &mut self.nodes[index];
            node.prev = None;
            node.next = old_head;
        }
        if let Some(old_head) = old_head {
            self.nodes[old_head].prev = Some(index);
        }
        self.head = Some(index);
        if self.tail.is_none() {
            self.tail = Some(index);
        }
    }

    fn unlink(&mut self, index: Index) {
        let (prev, next) = {
            let node = &self.nodes[index];
            (node.prev, node.next)
        };

        match prev {
            Some(prev) => self.nodes[prev].next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.nodes[next].prev = prev,
            None => self.tail = prev,
        }

        let node = &mut self.nodes[index];
        node.prev = None;
        node.next = None;
    }
}

/// MRU → LRU iterator over an [`LruList`].
pub struct Iter<'a, T> {
    list: &'a LruList<T>,
    cursor: Option<Index>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.cursor?;
        let node = self.list.nodes.get(index)?;
        self.cursor = node.next;
        Some(&node.value)
    }
}
