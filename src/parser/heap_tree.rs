//! Recursive-descent decoder for detailed snapshot cost trees.
//!
//! A tree block is a count-prefixed line grammar: a line at nesting depth
//! `d` reads `n<childCount>:<cost> <label>` with the `n` marker at byte
//! offset `d`, followed by exactly `childCount` child blocks, each itself
//! recursive. Decoding is strictly forward over the shared line cursor; the
//! current parent is threaded down as an explicit parameter instead of
//! hidden mutable state.

use super::label::{function_in_label, PatternSet};
use super::lines::LineCursor;
use crate::trace::tree::{HeapTree, NodeId};
use crate::utils::error::ParseError;
use std::io::BufRead;

/// Result of decoding one tree block
#[derive(Debug)]
pub(crate) struct DecodedTree {
    /// `None` when the root entry itself was a zero-cost/zero-child no-op
    pub tree: Option<HeapTree>,
    /// True when at least one frame matched a custom-allocator pattern and
    /// was elided; the snapshot then needs the merge pass.
    pub had_custom_allocators: bool,
}

/// One successfully split tree line, before any node is created
struct RawEntry {
    child_count: u32,
    cost: u64,
    label: String,
}

pub(crate) struct HeapTreeDecoder<'a, R> {
    cursor: &'a mut LineCursor<R>,
    patterns: &'a PatternSet,
    had_custom_allocators: bool,
}

impl<'a, R: BufRead> HeapTreeDecoder<'a, R> {
    pub(crate) fn new(cursor: &'a mut LineCursor<R>, patterns: &'a PatternSet) -> Self {
        Self {
            cursor,
            patterns,
            had_custom_allocators: false,
        }
    }

    /// Decode one whole tree block starting from its already-read root line.
    ///
    /// Runs to the end of the declared structure, or to end of input: a
    /// truncated dump (massif killed mid-write) yields whatever partial
    /// subtree was built, never an error.
    pub(crate) fn decode(mut self, root_line: &str) -> Result<DecodedTree, ParseError> {
        // The root entry can never be a custom allocator; it is the
        // "(heap allocation functions)" summary line.
        let Some(root) = self.split_entry(root_line, 0)? else {
            return Ok(DecodedTree {
                tree: None,
                had_custom_allocators: false,
            });
        };

        let mut tree = HeapTree::with_root(root.label, root.cost);
        let root_id = tree.root();
        for _ in 0..root.child_count {
            let Some(line) = self.cursor.next_line()? else {
                break; // truncated dump
            };
            self.decode_entry(&mut tree, &line, 1, root_id)?;
        }

        Ok(DecodedTree {
            tree: Some(tree),
            had_custom_allocators: self.had_custom_allocators,
        })
    }

    /// Decode one non-root entry and its children under `parent`
    fn decode_entry(
        &mut self,
        tree: &mut HeapTree,
        line: &str,
        depth: usize,
        parent: NodeId,
    ) -> Result<(), ParseError> {
        // A zero-cost, zero-child entry is dropped entirely but still
        // consumed one declared child slot of the caller.
        let Some(entry) = self.split_entry(line, depth)? else {
            return Ok(());
        };

        let next_parent = if self
            .patterns
            .is_custom_allocator(function_in_label(&entry.label))
        {
            // Elide the allocator frame: its children are attributed
            // directly to the caller.
            self.had_custom_allocators = true;
            parent
        } else {
            tree.add_child(parent, entry.label, entry.cost)
        };

        for _ in 0..entry.child_count {
            let Some(next) = self.cursor.next_line()? else {
                break; // truncated dump
            };
            self.decode_entry(tree, &next, depth + 1, next_parent)?;
        }

        Ok(())
    }

    /// Split `n<childCount>:<cost> <label>` at byte offset `depth`.
    ///
    /// Returns `Ok(None)` for the intentionally ignored zero-cost,
    /// zero-child entries. A single space after the colon is tolerated;
    /// massif emitted one in older releases.
    fn split_entry(&self, line: &str, depth: usize) -> Result<Option<RawEntry>, ParseError> {
        let bytes = line.as_bytes();
        if bytes.get(depth) != Some(&b'n') {
            return Err(self.bad_record(line));
        }

        let colon = line[depth..]
            .find(':')
            .map(|rel| depth + rel)
            .ok_or_else(|| self.bad_record(line))?;
        let child_count: u32 = line[depth + 1..colon]
            .parse()
            .map_err(|_| self.bad_number(line))?;

        let cost_start = if bytes.get(colon + 1) == Some(&b' ') {
            colon + 2
        } else {
            colon + 1
        };
        let space = line[cost_start..]
            .find(' ')
            .map(|rel| cost_start + rel)
            .ok_or_else(|| self.bad_record(line))?;
        let cost: u64 = line[cost_start..space]
            .parse()
            .map_err(|_| self.bad_number(line))?;

        if child_count == 0 && cost == 0 {
            return Ok(None);
        }

        Ok(Some(RawEntry {
            child_count,
            cost,
            label: line[space + 1..].to_string(),
        }))
    }

    fn bad_record(&self, line: &str) -> ParseError {
        ParseError::BadRecord {
            line: self.cursor.index(),
            text: line.to_string(),
        }
    }

    fn bad_number(&self, line: &str) -> ParseError {
        ParseError::BadNumber {
            line: self.cursor.index(),
            text: line.to_string(),
        }
    }
}
