//! Build collapsed allocation paths from a snapshot's cost tree.
//!
//! A collapsed path is the chain of function names from the tree root down
//! to one allocation site, joined with semicolons, weighted by the bytes
//! attributed to that site itself (its cost minus what its children already
//! account for).
//!
//! Example: "main;parse_document;alloc_node 10240"

use crate::parser::function_in_label;
use crate::trace::tree::{HeapTree, NodeId};
use log::debug;

/// A single collapsed allocation path
#[derive(Debug, Clone)]
pub struct CollapsedPath {
    /// Function chain as semicolon-separated string, root first
    pub path: String,

    /// Bytes attributed to this site itself
    pub self_cost: u64,
}

impl CollapsedPath {
    pub fn new(path: String, self_cost: u64) -> Self {
        Self { path, self_cost }
    }
}

/// Walk a cost tree and collect one collapsed path per node with non-zero
/// self cost, sorted descending by self cost.
pub fn build_collapsed_paths(tree: &HeapTree) -> Vec<CollapsedPath> {
    let mut paths = Vec::new();
    collect(tree, tree.root(), String::new(), &mut paths);
    // Stable: equal weights keep tree order.
    paths.sort_by(|a, b| b.self_cost.cmp(&a.self_cost));
    debug!("collapsed {} allocation paths", paths.len());
    paths
}

fn collect(tree: &HeapTree, id: NodeId, prefix: String, paths: &mut Vec<CollapsedPath>) {
    let node = tree.node(id);
    let path = if prefix.is_empty() {
        function_in_label(node.label()).to_string()
    } else {
        format!("{};{}", prefix, function_in_label(node.label()))
    };

    let child_cost: u64 = node
        .children()
        .iter()
        .map(|&child| tree.node(child).cost())
        .sum();
    let self_cost = node.cost().saturating_sub(child_cost);
    if self_cost > 0 {
        paths.push(CollapsedPath::new(path.clone(), self_cost));
    }

    for &child in node.children() {
        collect(tree, child, path.clone(), paths);
    }
}
