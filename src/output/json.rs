//! JSON profile output writer.
//!
//! Writes TraceProfile structs to JSON files with proper formatting.

use super::schema::{AllocationSite, PeakSummary, TraceProfile};
use crate::trace::model::Trace;
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Build the exportable profile for a parsed trace
///
/// # Arguments
/// * `trace` - the parsed trace
/// * `hot_sites` - ranked allocation sites from the aggregator
pub fn to_profile(trace: &Trace, hot_sites: Vec<AllocationSite>) -> TraceProfile {
    use chrono::Utc;

    let peak = trace.peak().map(|snapshot| PeakSummary {
        snapshot: snapshot.number,
        time: snapshot.time,
        mem_heap: snapshot.mem_heap,
        mem_heap_extra: snapshot.mem_heap_extra,
        mem_stacks: snapshot.mem_stacks,
    });

    TraceProfile {
        version: SCHEMA_VERSION.to_string(),
        description: trace.description().to_string(),
        command: trace.command().to_string(),
        time_unit: trace.time_unit().to_string(),
        snapshot_count: trace.snapshots().len(),
        peak,
        hot_sites,
        generated_at: Utc::now().to_rfc3339(),
    }
}

/// Write a profile to a JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - parent directory cannot be created
pub fn write_profile(profile: &TraceProfile, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing profile to: {}", output_path.display());

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, profile)?;

    debug!("Profile written successfully");
    Ok(())
}

/// Read a profile back from a JSON file
pub fn read_profile(path: impl AsRef<Path>) -> Result<TraceProfile, OutputError> {
    let file = File::open(path.as_ref()).map_err(OutputError::ReadFailed)?;
    let reader = BufReader::new(file);
    let profile = serde_json::from_reader(reader)?;
    Ok(profile)
}
