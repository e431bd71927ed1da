//! Output JSON schema definitions for profile data.
//!
//! This module defines the structure of JSON files we write to disk.
//! Schema is versioned to allow future evolution.

use serde::{Deserialize, Serialize};

/// Top-level profile structure written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceProfile {
    /// Schema version for compatibility checking
    pub version: String,

    /// The trace's `desc:` header
    pub description: String,

    /// Profiled command line
    pub command: String,

    /// Unit of snapshot timestamps (e.g. "i", "ms", "B")
    pub time_unit: String,

    /// Number of snapshots in the trace
    pub snapshot_count: usize,

    /// The selected peak snapshot, absent for an empty trace
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak: Option<PeakSummary>,

    /// Top allocation sites in the peak snapshot (ranked by bytes)
    pub hot_sites: Vec<AllocationSite>,

    /// Timestamp when profile was generated
    pub generated_at: String,
}

/// Scalar fields of the peak snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeakSummary {
    /// Snapshot sequence number from the file
    pub snapshot: u32,

    /// Timestamp in the trace's time unit
    pub time: f64,

    /// Useful heap bytes
    pub mem_heap: u64,

    /// Heap administration overhead bytes
    pub mem_heap_extra: u64,

    /// Stack bytes
    pub mem_stacks: u64,
}

/// One hot allocation site (collapsed path with byte weight)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationSite {
    /// Collapsed path representation (e.g. "main;parse;alloc_node")
    pub path: String,

    /// Bytes attributed to this site
    pub bytes: u64,

    /// Percentage of the peak snapshot's heap
    pub percentage: f64,
}
