//! Derive summary data from a parsed trace.
//!
//! Collapses the peak snapshot's cost tree into weighted allocation paths
//! and computes trace-wide statistics for reporting.

pub mod metrics;
pub mod sites;

pub use metrics::{hot_sites, trace_stats, TraceStats};
pub use sites::{build_collapsed_paths, CollapsedPath};
