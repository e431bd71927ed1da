//! Massif trace parsing.
//!
//! This module handles:
//! - Driving the line-level state machine over the input stream
//! - Decoding detailed snapshot cost trees, with custom-allocator elision
//! - Merging below-threshold buckets after elision
//! - Selecting the peak snapshot
//!
//! One call to [`parse`] is one complete, forward-only pass: it either
//! returns a finished [`Trace`] or a [`ParseError`] naming the first
//! offending line. No partial trace ever escapes a failed parse.

pub mod label;
mod heap_tree;
mod lines;
mod merge;
mod state;

use crate::trace::model::{Snapshot, Trace};
use label::PatternSet;
use log::debug;
use state::TraceParser;
use std::io::BufRead;

// Re-export main types
pub use crate::trace::{HeapTree, NodeId, TreeNode};
pub use crate::utils::error::ParseError;
pub use label::{function_in_label, pretty_label};

/// Parse one massif output stream.
///
/// # Arguments
/// * `reader` - the raw line stream; borrowed for the parse, never closed
/// * `custom_allocators` - wildcard patterns (`*`/`?`) naming allocator
///   functions whose tree frames should be elided
///
/// # Returns
/// The finished trace, with snapshots in file order and the peak selected.
///
/// # Errors
/// * `ParseError::BadRecord` - a line does not match the grammar for the
///   current state
/// * `ParseError::BadNumber` - a numeric field fails strict parsing
/// * `ParseError::UnexpectedEof` - input ended inside a required section
///
/// A dump truncated mid-tree is not an error; the affected snapshot keeps
/// whatever partial subtree was decoded.
pub fn parse<R: BufRead>(reader: R, custom_allocators: &[String]) -> Result<Trace, ParseError> {
    debug!(
        "starting parse with {} allocator pattern(s)",
        custom_allocators.len()
    );

    // Compiled once per invocation and passed down explicitly; two parses
    // on different threads share nothing.
    let patterns = PatternSet::new(custom_allocators);

    let mut trace = TraceParser::new(reader, &patterns).run()?;
    select_peak(&mut trace);
    Ok(trace)
}

/// Pick the peak snapshot.
///
/// Precedence: an explicitly marked `peak` snapshot wins if it carries a
/// tree; otherwise the largest `mem_heap` among tree-bearing snapshots;
/// otherwise the largest `mem_heap` overall; otherwise none. The first
/// maximum wins on ties.
fn select_peak(trace: &mut Trace) {
    if let Some(index) = trace.peak_index() {
        if trace.snapshots()[index].heap_tree.is_some() {
            return;
        }
        // a declared peak without a tree is not usable as one
        trace.set_peak_index(None);
    }

    let with_tree = index_of_max_heap(
        trace
            .snapshots()
            .iter()
            .enumerate()
            .filter(|(_, s)| s.heap_tree.is_some()),
    );
    let index = with_tree.or_else(|| index_of_max_heap(trace.snapshots().iter().enumerate()));
    trace.set_peak_index(index);
}

fn index_of_max_heap<'a>(snapshots: impl Iterator<Item = (usize, &'a Snapshot)>) -> Option<usize> {
    let mut best: Option<(usize, u64)> = None;
    for (index, snapshot) in snapshots {
        match best {
            Some((_, heap)) if heap >= snapshot.mem_heap => {}
            _ => best = Some((index, snapshot.mem_heap)),
        }
    }
    best.map(|(index, _)| index)
}
