/// Index of a node in the arena.
pub type NodeId = usize;

pub(crate) struct Node<T> {
    pub(crate) value: T,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
}

/// One arena slot: a live heap node, or a link in the free-list.
pub(crate) enum Slot<T> {
    Occupied(Node<T>),
    Free { next: Option<NodeId> },
}

#[inline]
pub(crate) fn node<T>(slots: &[Slot<T>], id: NodeId) -> &Node<T> {
    match &slots[id] {
        Slot::Occupied(node) => node,
        Slot::Free { .. } => unreachable!("node {id} is on the free-list"),
    }
}

#[inline]
pub(crate) fn node_mut<T>(slots: &mut [Slot<T>], id: NodeId) -> &mut Node<T> {
    match &mut slots[id] {
        Slot::Occupied(node) => node,
        Slot::Free { .. } => unreachable!("node {id} is on the free-list"),
    }
}
