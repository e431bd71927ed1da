//! Arena-backed cost tree for detailed snapshots.
//!
//! Each snapshot that carries a `heap_tree=detailed|peak` record owns one
//! `HeapTree`. Nodes live in a flat arena and refer to each other through
//! `NodeId` indices: children are listed in decode order, the parent link is
//! a plain non-owning index (`None` for the root). Dropping the tree drops
//! every node with it; there is no way to build a cycle or share a subtree.

/// Index of a node inside its `HeapTree` arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Arena slot index
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One call-site entry in a detailed snapshot's cost tree
#[derive(Debug, Clone)]
pub struct TreeNode {
    label: String,
    cost: u64,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl TreeNode {
    /// Raw label, typically `address: function (location)` or a
    /// "below threshold" bucket description.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Cost of this entry in bytes
    pub fn cost(&self) -> u64 {
        self.cost
    }

    /// Parent entry, `None` for the tree root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child entries in decode order.
    ///
    /// May hold fewer entries than the child count the input declared:
    /// zero-cost/zero-child entries are dropped during decoding.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// The cost tree of one detailed snapshot
#[derive(Debug, Clone)]
pub struct HeapTree {
    nodes: Vec<TreeNode>,
}

impl HeapTree {
    /// Create a tree containing only its root entry
    pub(crate) fn with_root(label: String, cost: u64) -> Self {
        Self {
            nodes: vec![TreeNode {
                label,
                cost,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// The root entry; every tree has exactly one.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Look up a node by id
    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.index()]
    }

    /// Number of nodes in the arena, including any entries the merge pass
    /// detached from the root's children list.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Append a new node under `parent` and return its id
    pub(crate) fn add_child(&mut self, parent: NodeId, label: String, cost: u64) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(TreeNode {
            label,
            cost,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    pub(crate) fn set_label(&mut self, id: NodeId, label: String) {
        self.nodes[id.index()].label = label;
    }

    pub(crate) fn set_cost(&mut self, id: NodeId, cost: u64) {
        self.nodes[id.index()].cost = cost;
    }

    /// Replace a node's children list. Entries removed this way stay in the
    /// arena but become unreachable from the root.
    pub(crate) fn set_children(&mut self, id: NodeId, children: Vec<NodeId>) {
        self.nodes[id.index()].children = children;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_parent_links() {
        let mut tree = HeapTree::with_root("root".to_string(), 100);
        let a = tree.add_child(tree.root(), "a".to_string(), 60);
        let b = tree.add_child(tree.root(), "b".to_string(), 40);
        let aa = tree.add_child(a, "aa".to_string(), 60);

        assert_eq!(tree.node(tree.root()).children(), &[a, b]);
        assert_eq!(tree.node(aa).parent(), Some(a));
        assert_eq!(tree.node(a).parent(), Some(tree.root()));
        assert_eq!(tree.node(tree.root()).parent(), None);
        assert_eq!(tree.len(), 4);
    }
}
