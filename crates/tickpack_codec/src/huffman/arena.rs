//! # Node Arena
//!
//! Flat storage for the package-merge tree. Nodes are addressed by index and
//! the whole arena is dropped (or reset) once code lengths are extracted.

/// Index of a node inside a [`NodeArena`].
pub type NodeId = u32;

/// Marker for "no child".
pub const NO_NODE: NodeId = NodeId::MAX;

/// A leaf (input symbol) or a package of two nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Node {
    /// Symbol for leaves; unused for packages.
    pub symbol: u16,
    /// Symbol frequency, or the combined weight of a package.
    pub frequency: u64,
    /// Left child, [`NO_NODE`] for leaves.
    pub left: NodeId,
    /// Right child, [`NO_NODE`] for leaves.
    pub right: NodeId,
}

impl Node {
    /// Returns true if this node is an input symbol.
    #[inline]
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        self.left == NO_NODE
    }
}

/// Bump-style node storage for one length-limited build.
///
/// # Thread Safety
///
/// Not shared. Each build owns its arena.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    /// Creates an arena with room for `capacity` nodes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Number of allocated nodes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if no node has been allocated.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocates a leaf for `symbol`.
    pub fn leaf(&mut self, symbol: u16, frequency: u64) -> NodeId {
        self.push(Node {
            symbol,
            frequency,
            left: NO_NODE,
            right: NO_NODE,
        })
    }

    /// Allocates a package combining `left` and `right`.
    pub fn package(&mut self, left: NodeId, right: NodeId) -> NodeId {
        let frequency = self.get(left).frequency + self.get(right).frequency;
        self.push(Node {
            symbol: 0,
            frequency,
            left,
            right,
        })
    }

    /// Returns the node at `id`.
    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }

    /// Drops every node, keeping the allocation.
    #[inline]
    pub fn reset(&mut self) {
        self.nodes.clear();
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = self.nodes.len() as NodeId;
        debug_assert!(id != NO_NODE, "node arena exhausted");
        self.nodes.push(node);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_weight() {
        let mut arena = NodeArena::with_capacity(4);
        let a = arena.leaf(0, 3);
        let b = arena.leaf(1, 5);
        let p = arena.package(a, b);

        assert_eq!(arena.len(), 3);
        assert!(arena.get(a).is_leaf());
        assert!(!arena.get(p).is_leaf());
        assert_eq!(arena.get(p).frequency, 8);
    }

    #[test]
    fn test_reset() {
        let mut arena = NodeArena::default();
        arena.leaf(7, 1);
        assert!(!arena.is_empty());

        arena.reset();
        assert!(arena.is_empty());
    }
}
