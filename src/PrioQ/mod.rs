//! Single-threaded mergeable priority queue (skew heap).
//!
//! Nodes live in an index-addressed arena. Popped nodes go onto a free-list
//! and are reused by later pushes, so a queue whose size stays bounded stops
//! allocating once it has reached its high-water mark.
//!
//! The arena is one growable allocation and is accounted as a single region
//! in the process-wide counters, re-recorded whenever it is reallocated.
//!
//! Not synchronized in any way: every operation takes `&mut self`.

mod node;

pub use node::NodeId;

use crate::Core::alloc::{array_bytes, record_alloc, record_release};
use node::{node, node_mut, Node, Slot};
use std::cmp::Ordering;
use std::mem;

/// Skew heap ordered by a caller-supplied comparator.
///
/// The smallest value under `cmp` is popped first. Equal values come out in
/// no particular order.
pub struct PriorityQueue<T, F> {
    slots: Vec<Slot<T>>,
    root: Option<NodeId>,
    free: Option<NodeId>,
    free_count: usize,
    len: usize,
    /// Arena capacity last recorded in the allocation counters.
    accounted: usize,
    cmp: F,
}

impl<T: Ord> PriorityQueue<T, fn(&T, &T) -> Ordering> {
    /// A min-queue using the natural order of `T`.
    pub fn ordered() -> Self {
        Self::new(T::cmp)
    }
}

impl<T, F> PriorityQueue<T, F>
where
    F: FnMut(&T, &T) -> Ordering,
{
    pub fn new(cmp: F) -> Self {
        Self {
            slots: Vec::new(),
            root: None,
            free: None,
            free_count: 0,
            len: 0,
            accounted: 0,
            cmp,
        }
    }

    /// Number of values in the queue.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Nodes ever allocated: live nodes plus the free-list.
    pub fn allocated_nodes(&self) -> usize {
        self.slots.len()
    }

    /// Nodes waiting on the free-list for reuse.
    pub fn free_nodes(&self) -> usize {
        self.free_count
    }

    /// Put `count` fresh nodes on the free-list so the next `count` pushes
    /// do not allocate.
    pub fn preallocate(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        let wanted = self.slots.len().checked_add(count).unwrap_or_else(|| {
            crate::fatal!("PriorityQueue::preallocate(): {count} more nodes overflows the address space")
        });
        // Fatal on size overflow before reserve_exact would panic on it.
        array_bytes::<Slot<T>>(wanted);
        self.slots.reserve_exact(count);
        for _ in 0..count {
            let id = self.slots.len();
            self.slots.push(Slot::Free { next: self.free });
            self.free = Some(id);
        }
        self.free_count += count;
        self.account_arena();
    }

    pub fn push(&mut self, value: T) {
        let id = self.alloc_node(value);
        self.root = self.merge(self.root, Some(id));
        self.len += 1;
    }

    /// Remove and return the smallest value.
    pub fn pop(&mut self) -> Option<T> {
        let root = self.root?;
        let (left, right) = {
            let node = node_mut(&mut self.slots, root);
            (node.left.take(), node.right.take())
        };
        self.root = self.merge(left, right);
        self.len -= 1;
        Some(self.release_node(root))
    }

    /// The smallest value, left in place.
    pub fn peek(&self) -> Option<&T> {
        self.root.map(|id| &node(&self.slots, id).value)
    }

    fn alloc_node(&mut self, value: T) -> NodeId {
        let fresh = Slot::Occupied(Node {
            value,
            left: None,
            right: None,
        });

        match self.free {
            Some(id) => {
                match mem::replace(&mut self.slots[id], fresh) {
                    Slot::Free { next } => self.free = next,
                    Slot::Occupied(_) => unreachable!("free-list points at live node {id}"),
                }
                self.free_count -= 1;
                id
            }
            None => {
                let id = self.slots.len();
                self.slots.push(fresh);
                self.account_arena();
                id
            }
        }
    }

    /// Re-record the arena after it may have been reallocated.
    fn account_arena(&mut self) {
        let capacity = self.slots.capacity();
        if capacity == self.accounted {
            return;
        }
        if self.accounted > 0 {
            record_release(self.accounted * mem::size_of::<Slot<T>>(), 1);
        }
        record_alloc(array_bytes::<Slot<T>>(capacity), 1);
        self.accounted = capacity;
    }

    fn release_node(&mut self, id: NodeId) -> T {
        let link = Slot::Free { next: self.free };
        match mem::replace(&mut self.slots[id], link) {
            Slot::Occupied(node) => {
                self.free = Some(id);
                self.free_count += 1;
                node.value
            }
            Slot::Free { .. } => unreachable!("node {id} released twice"),
        }
    }

    /// True if `a` goes before `b`. Ties go to `b`.
    #[inline]
    fn precedes(&mut self, a: NodeId, b: NodeId) -> bool {
        let (x, y) = (&node(&self.slots, a).value, &node(&self.slots, b).value);
        (self.cmp)(x, y) == Ordering::Less
    }

    /// Skew-heap merge of the heaps rooted at `a` and `b`.
    ///
    /// Walks down the right spines top-down: at each step the winning root
    /// swaps its children, then its new left child becomes the merge of its
    /// old right child with the loser. Runs in a loop, so the native stack
    /// stays flat however lopsided the heap is.
    fn merge(&mut self, a: Option<NodeId>, b: Option<NodeId>) -> Option<NodeId> {
        let (a, b) = match (a, b) {
            (None, other) | (other, None) => return other,
            (Some(a), Some(b)) => (a, b),
        };

        let (root, loser) = if self.precedes(a, b) { (a, b) } else { (b, a) };
        let mut parent = root;
        let mut spine = self.swap_children(root);
        let mut pending = Some(loser);

        loop {
            match (spine, pending) {
                (None, rest) | (rest, None) => {
                    node_mut(&mut self.slots, parent).left = rest;
                    return Some(root);
                }
                (Some(x), Some(y)) => {
                    let (winner, loser) = if self.precedes(x, y) { (x, y) } else { (y, x) };
                    node_mut(&mut self.slots, parent).left = Some(winner);
                    spine = self.swap_children(winner);
                    pending = Some(loser);
                    parent = winner;
                }
            }
        }
    }

    /// Move the left child of `id` to its right, leaving the left empty.
    /// Returns the old right child.
    fn swap_children(&mut self, id: NodeId) -> Option<NodeId> {
        let node = node_mut(&mut self.slots, id);
        let right = node.right.take();
        node.right = node.left.take();
        right
    }
}

impl<T, F> Drop for PriorityQueue<T, F> {
    fn drop(&mut self) {
        // Live nodes and the free-list share the arena; it goes in one piece.
        if self.accounted > 0 {
            record_release(self.accounted * mem::size_of::<Slot<T>>(), 1);
        }
    }
}
