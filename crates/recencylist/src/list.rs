//! Recency list implementation
//!
//! Nodes live in a slot arena and link to each other by slot index, so the
//! list never holds raw pointers. A handle records the id of the list that
//! issued it and the generation of its slot:
//! - a different list id means the handle is foreign
//! - a generation mismatch means the node was removed (and the slot maybe reused)
//!
//! Membership is therefore a direct lookup, valid for lists of any length.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, trace};

use crate::error::{Error, Result};

/// List ids are process-unique; 0 is reserved for detached handles
static NEXT_LIST_ID: AtomicU64 = AtomicU64::new(1);

fn next_list_id() -> u64 {
    NEXT_LIST_ID.fetch_add(1, Ordering::Relaxed)
}

/// Opaque reference to a node in a [`RecencyList`]
///
/// Handles are cheap to copy. They stay valid until the node is removed or
/// the list is cleared; after that every operation rejects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemHandle {
    list: u64,
    slot: usize,
    generation: u64,
}

impl ItemHandle {
    /// A handle that was never issued by any list
    pub const fn detached() -> Self {
        Self {
            list: 0,
            slot: 0,
            generation: 0,
        }
    }

    /// Check whether this is the detached handle
    pub fn is_detached(&self) -> bool {
        self.list == 0
    }
}

impl Default for ItemHandle {
    fn default() -> Self {
        Self::detached()
    }
}

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Debug)]
struct Slot<T> {
    generation: u64,
    node: Option<Node<T>>,
}

/// Doubly-linked list with O(1) positional operations by handle
///
/// The front is the most recently used end, the back the least recently used.
#[derive(Debug)]
pub struct RecencyList<T> {
    /// Identity stamped into every handle this list issues
    id: u64,

    /// Node storage; empty slots are recycled through `free_list`
    slots: Vec<Slot<T>>,
    free_list: Vec<usize>,

    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<T> RecencyList<T> {
    /// Create an empty list
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty list with room for `capacity` nodes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            id: next_list_id(),
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Get the number of nodes in the list
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the list is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Handle of the front (most recently used) node
    pub fn front(&self) -> Option<ItemHandle> {
        self.head.map(|idx| self.handle(idx))
    }

    /// Handle of the back (least recently used) node
    pub fn back(&self) -> Option<ItemHandle> {
        self.tail.map(|idx| self.handle(idx))
    }

    /// Check whether `handle` refers to a node currently in this list
    pub fn contains(&self, handle: ItemHandle) -> bool {
        self.resolve(handle).is_some()
    }

    /// Get the value behind a handle
    pub fn get(&self, handle: ItemHandle) -> Option<&T> {
        self.resolve(handle)
            .and_then(|idx| self.slots[idx].node.as_ref())
            .map(|node| &node.value)
    }

    /// Get the value behind a handle mutably
    pub fn get_mut(&mut self, handle: ItemHandle) -> Option<&mut T> {
        let idx = self.resolve(handle)?;
        self.slots[idx].node.as_mut().map(|node| &mut node.value)
    }

    /// Handle of the node after `handle` (towards the back)
    pub fn next(&self, handle: ItemHandle) -> Option<ItemHandle> {
        let idx = self.resolve(handle)?;
        let next = self.slots[idx].node.as_ref()?.next?;
        Some(self.handle(next))
    }

    /// Handle of the node before `handle` (towards the front)
    pub fn prev(&self, handle: ItemHandle) -> Option<ItemHandle> {
        let idx = self.resolve(handle)?;
        let prev = self.slots[idx].node.as_ref()?.prev?;
        Some(self.handle(prev))
    }

    /// Insert a value at the front
    pub fn push_front(&mut self, value: T) -> ItemHandle {
        let idx = self.alloc_node(value);
        self.link_front(idx);
        self.len += 1;
        self.handle(idx)
    }

    /// Insert a value at the back
    pub fn push_back(&mut self, value: T) -> ItemHandle {
        let idx = self.alloc_node(value);
        self.link_back(idx);
        self.len += 1;
        self.handle(idx)
    }

    /// Remove and return the front value
    pub fn pop_front(&mut self) -> Option<T> {
        let idx = self.head?;
        self.remove_at(idx)
    }

    /// Remove and return the back value
    pub fn pop_back(&mut self) -> Option<T> {
        let idx = self.tail?;
        self.remove_at(idx)
    }

    /// Remove the node behind `handle` and return its value
    ///
    /// # Panics
    /// Panics if the handle is detached, the list is empty, or the handle
    /// does not refer to a node in this list. Use [`try_remove`] to get the
    /// error instead.
    ///
    /// [`try_remove`]: RecencyList::try_remove
    pub fn remove(&mut self, handle: ItemHandle) -> T {
        match self.try_remove(handle) {
            Ok(value) => value,
            Err(err) => panic!("RecencyList::remove: {}", err),
        }
    }

    /// Remove the node behind `handle`, reporting misuse as an error
    pub fn try_remove(&mut self, handle: ItemHandle) -> Result<T> {
        let idx = self.validate(handle)?;
        self.remove_at(idx).ok_or(Error::Stale)
    }

    /// Move the node behind `handle` to the front
    ///
    /// # Panics
    /// Panics under the same conditions as [`remove`](RecencyList::remove).
    pub fn move_to_front(&mut self, handle: ItemHandle) {
        if let Err(err) = self.try_move_to_front(handle) {
            panic!("RecencyList::move_to_front: {}", err);
        }
    }

    /// Move the node behind `handle` to the front, reporting misuse as an error
    pub fn try_move_to_front(&mut self, handle: ItemHandle) -> Result<()> {
        let idx = self.validate(handle)?;
        if self.head == Some(idx) {
            return Ok(());
        }

        self.unlink(idx);
        self.link_front(idx);
        Ok(())
    }

    /// Move the node behind `handle` to the back
    ///
    /// # Panics
    /// Panics under the same conditions as [`remove`](RecencyList::remove).
    pub fn move_to_back(&mut self, handle: ItemHandle) {
        if let Err(err) = self.try_move_to_back(handle) {
            panic!("RecencyList::move_to_back: {}", err);
        }
    }

    /// Move the node behind `handle` to the back, reporting misuse as an error
    pub fn try_move_to_back(&mut self, handle: ItemHandle) -> Result<()> {
        let idx = self.validate(handle)?;
        if self.tail == Some(idx) {
            return Ok(());
        }

        self.unlink(idx);
        self.link_back(idx);
        Ok(())
    }

    /// Drop every node
    ///
    /// The list takes a fresh id, so handles issued before the clear are
    /// rejected as foreign afterwards.
    pub fn clear(&mut self) {
        debug!(len = self.len, "clearing recency list");
        self.slots.clear();
        self.free_list.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
        self.id = next_list_id();
    }

    /// Iterate values from front to back
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            current: self.head,
            remaining: self.len,
        }
    }

    /// Walk the chain and assert every structural invariant
    ///
    /// Intended for tests; runs in O(n).
    #[doc(hidden)]
    pub fn debug_validate_invariants(&self) {
        let mut count = 0;
        let mut prev = None;
        let mut current = self.head;

        while let Some(idx) = current {
            let node = match self.slots[idx].node.as_ref() {
                Some(node) => node,
                None => panic!("slot {} is linked but empty", idx),
            };
            assert_eq!(node.prev, prev, "broken back link at slot {}", idx);
            prev = Some(idx);
            current = node.next;
            count += 1;
            assert!(count <= self.len, "chain is longer than len");
        }

        assert_eq!(count, self.len, "len does not match chain");
        assert_eq!(self.tail, prev, "tail is not the last node");

        let occupied = self.slots.iter().filter(|slot| slot.node.is_some()).count();
        assert_eq!(occupied, self.len, "arena holds unlinked nodes");
        assert_eq!(
            self.free_list.len() + self.len,
            self.slots.len(),
            "free list out of sync"
        );
    }

    fn handle(&self, idx: usize) -> ItemHandle {
        ItemHandle {
            list: self.id,
            slot: idx,
            generation: self.slots[idx].generation,
        }
    }

    fn resolve(&self, handle: ItemHandle) -> Option<usize> {
        if handle.list != self.id {
            return None;
        }
        match self.slots.get(handle.slot) {
            Some(slot) if slot.generation == handle.generation && slot.node.is_some() => {
                Some(handle.slot)
            }
            _ => None,
        }
    }

    fn validate(&self, handle: ItemHandle) -> Result<usize> {
        let result = if handle.is_detached() {
            Err(Error::Detached)
        } else if self.len == 0 {
            Err(Error::Empty)
        } else if handle.list != self.id {
            Err(Error::Foreign)
        } else {
            self.resolve(handle).ok_or(Error::Stale)
        };

        if let Err(err) = &result {
            trace!(?handle, %err, "rejected list handle");
        }
        result
    }

    fn alloc_node(&mut self, value: T) -> usize {
        let node = Node {
            value,
            prev: None,
            next: None,
        };

        if let Some(idx) = self.free_list.pop() {
            self.slots[idx].node = Some(node);
            idx
        } else {
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            self.slots.len() - 1
        }
    }

    fn remove_at(&mut self, idx: usize) -> Option<T> {
        self.unlink(idx);
        let node = self.slots[idx].node.take()?;
        self.slots[idx].generation = self.slots[idx].generation.wrapping_add(1);
        self.free_list.push(idx);
        self.len -= 1;
        Some(node.value)
    }

    fn link_front(&mut self, idx: usize) {
        let old_head = self.head;
        if let Some(node) = &mut self.slots[idx].node {
            node.prev = None;
            node.next = old_head;
        }

        match old_head {
            Some(head_idx) => {
                if let Some(head) = &mut self.slots[head_idx].node {
                    head.prev = Some(idx);
                }
            }
            None => {
                self.tail = Some(idx);
            }
        }

        self.head = Some(idx);
    }

    fn link_back(&mut self, idx: usize) {
        let old_tail = self.tail;
        if let Some(node) = &mut self.slots[idx].node {
            node.prev = old_tail;
            node.next = None;
        }

        match old_tail {
            Some(tail_idx) => {
                if let Some(tail) = &mut self.slots[tail_idx].node {
                    tail.next = Some(idx);
                }
            }
            None => {
                self.head = Some(idx);
            }
        }

        self.tail = Some(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match &mut self.slots[idx].node {
            Some(node) => (node.prev.take(), node.next.take()),
            None => return,
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_node) = &mut self.slots[prev_idx].node {
                    prev_node.next = next;
                }
            }
            None => {
                self.head = next;
            }
        }

        match next {
            Some(next_idx) => {
                if let Some(next_node) = &mut self.slots[next_idx].node {
                    next_node.prev = prev;
                }
            }
            None => {
                self.tail = prev;
            }
        }
    }
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Front-to-back iterator over list values
pub struct Iter<'a, T> {
    list: &'a RecencyList<T>,
    current: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.current?;
        let node = self.list.slots[idx].node.as_ref()?;
        self.current = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> IntoIterator for &'a RecencyList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
