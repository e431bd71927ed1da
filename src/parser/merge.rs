//! Post-processing for snapshots that had custom-allocator frames elided.
//!
//! Eliding frames can leave several "in N places, all below threshold"
//! bucket entries as direct children of the root, one per elided branch.
//! This pass folds them into a single bucket and re-sorts the root's direct
//! children by cost so the tree reads the same as one massif would have
//! produced without the allocator frames. Nested levels are left as decoded.

use super::label::PatternSet;
use crate::trace::tree::{HeapTree, NodeId};
use log::debug;

/// Fold below-threshold buckets among the root's direct children and
/// stable-sort the children descending by cost.
pub(crate) fn merge_below_threshold(tree: &mut HeapTree, patterns: &PatternSet) {
    let root = tree.root();

    let mut kept: Vec<NodeId> = Vec::with_capacity(tree.node(root).children().len());
    let mut representative: Option<NodeId> = None;
    let mut total_places: u64 = 0;
    let mut folded_cost: u64 = 0;

    for &child in tree.node(root).children() {
        let label = tree.node(child).label();
        match patterns.below_threshold().captures(label) {
            Some(caps) => {
                total_places += caps[1].parse::<u64>().unwrap_or(0);
                if representative.is_none() {
                    representative = Some(child);
                    kept.push(child);
                } else {
                    // folded into the representative, dropped from the list
                    folded_cost += tree.node(child).cost();
                }
            }
            None => kept.push(child),
        }
    }

    if let Some(rep) = representative {
        let cost = tree.node(rep).cost() + folded_cost;
        tree.set_cost(rep, cost);
        if let Some(label) = rewrite_places(tree.node(rep).label(), total_places, patterns) {
            tree.set_label(rep, label);
        }
        debug!(
            "merged below-threshold buckets: {} places, {} bytes",
            total_places, cost
        );
    }

    // Stable: entries of equal cost keep their pre-sort relative order.
    kept.sort_by(|&a, &b| tree.node(b).cost().cmp(&tree.node(a).cost()));
    tree.set_children(root, kept);
}

/// Replace the place count inside a bucket label with the merged total
fn rewrite_places(label: &str, total_places: u64, patterns: &PatternSet) -> Option<String> {
    let caps = patterns.below_threshold().captures(label)?;
    let places = caps.get(1)?;
    let mut rewritten = String::with_capacity(label.len());
    rewritten.push_str(&label[..places.start()]);
    rewritten.push_str(&total_places.to_string());
    rewritten.push_str(&label[places.end()..]);
    Some(rewritten)
}
