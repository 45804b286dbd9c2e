// Shared trajectory store for the beam search.
//
// Instead of each candidate carrying its own move log, candidates point at a
// node in a 4-ary trie of moves. A candidate's route is the chain of
// directions from the root to its node. Nodes are kept alive by references
// from live search states and by their own children; as soon as both are
// gone the node goes back to the pool, and the check moves up to its parent.

use crate::game_interface::Direction;
use crate::pool::{Handle, ObjectPool, PoolStats, Recycle};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(Handle);

#[derive(Clone, Debug, Default)]
pub struct HistoryNode {
    parent: Option<NodeId>,
    // Move taken from the parent. None only for the root.
    direction: Option<Direction>,
    children: [Option<NodeId>; 4],
    // Live search states pointing at this node.
    refs: u32,
}

impl HistoryNode {
    fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }
}

impl Recycle for HistoryNode {
    fn recycle(&mut self) {
        *self = HistoryNode::default();
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub nodes: usize,
    pub leaves: usize,
    pub max_depth: usize,
}

pub struct HistoryTree {
    nodes: ObjectPool<HistoryNode>,
    root: NodeId,
}

impl Default for HistoryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryTree {
    pub fn new() -> Self {
        let mut nodes = ObjectPool::new();
        let root = NodeId(nodes.acquire(|node: &mut HistoryNode| node.recycle()));
        HistoryTree { nodes, root }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    fn node(&self, id: NodeId) -> &HistoryNode {
        self.nodes.get(id.0)
    }

    fn node_mut(&mut self, id: NodeId) -> &mut HistoryNode {
        self.nodes.get_mut(id.0)
    }

    /// Node for `parent` followed by `direction`, created if that move was
    /// never recorded. The returned node holds one new reference, owned by
    /// the caller.
    pub fn child(&mut self, parent: NodeId, direction: Direction) -> NodeId {
        if let Some(existing) = self.node(parent).children[direction.index()] {
            self.retain(existing);
            return existing;
        }
        let child = NodeId(self.nodes.acquire(|node| {
            node.parent = Some(parent);
            node.direction = Some(direction);
            node.children = [None; 4];
            node.refs = 1;
        }));
        self.node_mut(parent).children[direction.index()] = Some(child);
        child
    }

    pub fn retain(&mut self, id: NodeId) {
        self.node_mut(id).refs += 1;
    }

    /// Drops one reference to `id`, collecting every node that became
    /// unreachable because of it.
    pub fn release_ref(&mut self, id: NodeId) {
        let node = self.node_mut(id);
        assert!(node.refs > 0, "releasing an unreferenced history node");
        node.refs -= 1;
        self.collect(id);
    }

    fn collect(&mut self, mut id: NodeId) {
        while id != self.root {
            let node = self.node(id);
            if node.refs > 0 || !node.is_leaf() {
                break;
            }
            let parent = node.parent.expect("non-root history node without a parent");
            self.release(id);
            id = parent;
        }
    }

    // Only reachable from `collect`, once the node has no referents and no
    // children.
    fn release(&mut self, id: NodeId) {
        let node = self.node(id);
        debug_assert!(node.refs == 0 && node.is_leaf());
        if let (Some(parent), Some(direction)) = (node.parent, node.direction) {
            self.node_mut(parent).children[direction.index()] = None;
        }
        self.nodes.release(id.0);
    }

    /// Moves from the root to `id`.
    pub fn reconstruct_path(&self, id: NodeId) -> Vec<Direction> {
        let mut path = Vec::with_capacity(self.depth(id));
        let mut current = self.node(id);
        while let (Some(parent), Some(direction)) = (current.parent, current.direction) {
            path.push(direction);
            current = self.node(parent);
        }
        path.reverse();
        path
    }

    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.node(id);
        while let Some(parent) = current.parent {
            depth += 1;
            current = self.node(parent);
        }
        depth
    }

    pub fn refs(&self, id: NodeId) -> u32 {
        self.node(id).refs
    }

    pub fn live_nodes(&self) -> usize {
        self.nodes.live()
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.nodes.stats()
    }

    /// Shape of the live tree. Walks with an explicit stack: routes are
    /// thousands of moves deep.
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let node = self.node(id);
            stats.nodes += 1;
            stats.max_depth = stats.max_depth.max(depth);
            if node.is_leaf() {
                stats.leaves += 1;
            }
            stack.extend(node.children.iter().flatten().map(|&child| (child, depth + 1)));
        }
        stats
    }
}
