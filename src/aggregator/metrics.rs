//! Summary statistics and hot allocation sites for a parsed trace.
//!
//! Hot sites are the allocation paths that account for the most bytes in
//! the peak snapshot; they are the first places to look when chasing a
//! memory regression.

use super::sites::CollapsedPath;
use crate::output::schema::AllocationSite;
use crate::trace::model::Trace;
use log::debug;

/// Summary statistics over all snapshots of a trace
#[derive(Debug, Clone, Default)]
pub struct TraceStats {
    /// Number of snapshots in the trace
    pub snapshot_count: usize,

    /// Snapshots that carry a cost tree
    pub detailed_count: usize,

    /// Largest heap size across all snapshots, in bytes
    pub max_heap: u64,

    /// Mean heap size across all snapshots, in bytes
    pub mean_heap: u64,

    /// Timestamp of the last snapshot, in the trace's time unit
    pub end_time: f64,
}

/// Compute summary statistics for a trace
pub fn trace_stats(trace: &Trace) -> TraceStats {
    let snapshots = trace.snapshots();
    if snapshots.is_empty() {
        return TraceStats::default();
    }

    let total_heap: u64 = snapshots.iter().map(|s| s.mem_heap).sum();
    TraceStats {
        snapshot_count: snapshots.len(),
        detailed_count: snapshots.iter().filter(|s| s.heap_tree.is_some()).count(),
        max_heap: snapshots.iter().map(|s| s.mem_heap).max().unwrap_or(0),
        mean_heap: total_heap / snapshots.len() as u64,
        end_time: snapshots.last().map(|s| s.time).unwrap_or(0.0),
    }
}

/// Rank collapsed paths into the top N hot allocation sites
///
/// # Arguments
/// * `paths` - collapsed paths, already sorted by self cost
/// * `total_bytes` - the snapshot's heap size, used for percentages
/// * `top_n` - number of sites to keep
pub fn hot_sites(paths: &[CollapsedPath], total_bytes: u64, top_n: usize) -> Vec<AllocationSite> {
    debug!("ranking top {} of {} allocation paths", top_n, paths.len());
    paths
        .iter()
        .take(top_n)
        .map(|path| create_site(path, total_bytes))
        .collect()
}

fn create_site(path: &CollapsedPath, total_bytes: u64) -> AllocationSite {
    let percentage = if total_bytes > 0 {
        (path.self_cost as f64 / total_bytes as f64) * 100.0
    } else {
        0.0
    };

    AllocationSite {
        path: path.path.clone(),
        bytes: path.self_cost,
        percentage,
    }
}
