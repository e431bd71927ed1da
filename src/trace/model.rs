//! Parsed trace data model.
//!
//! A `Trace` is the full parsed result of one massif output file: the three
//! header fields, the snapshots in file order, and the selected peak
//! snapshot. The trace owns everything reachable from it; consumers never
//! see the raw text again.

use super::tree::HeapTree;

/// One point-in-time memory measurement
///
/// Created by the parser when a snapshot header is recognized and filled
/// field by field as the record's lines are consumed. Immutable once the
/// parser has moved on to the next snapshot.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Sequence number from the file; not necessarily contiguous
    pub number: u32,

    /// Timestamp in the trace's `time_unit`
    pub time: f64,

    /// Useful heap bytes
    pub mem_heap: u64,

    /// Heap administration overhead bytes
    pub mem_heap_extra: u64,

    /// Stack bytes, zero unless massif ran with --stacks=yes
    pub mem_stacks: u64,

    /// Cost tree, present for `detailed` and `peak` records
    pub heap_tree: Option<HeapTree>,
}

impl Snapshot {
    pub(crate) fn new(number: u32) -> Self {
        Self {
            number,
            time: 0.0,
            mem_heap: 0,
            mem_heap_extra: 0,
            mem_stacks: 0,
            heap_tree: None,
        }
    }
}

/// The full parsed result of one massif output file
#[derive(Debug, Clone, Default)]
pub struct Trace {
    description: String,
    command: String,
    time_unit: String,
    snapshots: Vec<Snapshot>,
    peak: Option<usize>,
}

impl Trace {
    /// The file's `desc:` header
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The profiled command line (`cmd:` header)
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Unit of snapshot timestamps (`time_unit:` header), e.g. "i" or "ms"
    pub fn time_unit(&self) -> &str {
        &self.time_unit
    }

    /// Snapshots in file encounter order
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// The peak snapshot, or `None` for a trace with zero snapshots.
    /// Callers should treat `None` as "no data, render nothing".
    pub fn peak(&self) -> Option<&Snapshot> {
        self.peak.map(|i| &self.snapshots[i])
    }

    /// Index of the peak snapshot within `snapshots()`
    pub fn peak_index(&self) -> Option<usize> {
        self.peak
    }

    pub(crate) fn set_description(&mut self, description: String) {
        self.description = description;
    }

    pub(crate) fn set_command(&mut self, command: String) {
        self.command = command;
    }

    pub(crate) fn set_time_unit(&mut self, time_unit: String) {
        self.time_unit = time_unit;
    }

    pub(crate) fn push_snapshot(&mut self, snapshot: Snapshot) {
        self.snapshots.push(snapshot);
    }

    /// Mutable access to the snapshot currently being filled in
    pub(crate) fn current_snapshot_mut(&mut self) -> Option<&mut Snapshot> {
        self.snapshots.last_mut()
    }

    pub(crate) fn set_peak_index(&mut self, index: Option<usize>) {
        self.peak = index;
    }
}
