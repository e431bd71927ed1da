//! Inspect command implementation.
//!
//! The inspect command:
//! 1. Parses a massif output file
//! 2. Computes trace statistics
//! 3. Collapses the peak snapshot's tree into hot allocation sites
//! 4. Optionally writes a JSON profile and prints a text summary

use anyhow::{bail, Context, Result};
use log::{debug, info};
use massif_trace::aggregator::{build_collapsed_paths, hot_sites, trace_stats};
use massif_trace::output::{to_profile, write_profile, AllocationSite};
use massif_trace::parser::parse;
use massif_trace::trace::Trace;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

/// Arguments for the inspect command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct InspectArgs {
    /// Path to the massif output file
    pub input: PathBuf,

    /// Wildcard patterns naming custom allocator functions
    pub allocators: Vec<String>,

    /// Output path for JSON profile (optional)
    pub output_json: Option<PathBuf>,

    /// Number of top allocation sites to include
    pub top_sites: usize,

    /// Print text summary to stdout
    pub print_summary: bool,
}

/// Validate inspect arguments before doing any work
pub fn validate_args(args: &InspectArgs) -> Result<()> {
    if !args.input.is_file() {
        bail!("input file does not exist: {}", args.input.display());
    }
    if args.top_sites == 0 {
        bail!("--top must be at least 1");
    }
    Ok(())
}

/// Execute the inspect command
///
/// # Errors
/// * Parse failures, reported with the offending line
/// * File write errors for the JSON profile
pub fn execute_inspect(args: InspectArgs) -> Result<()> {
    info!("Inspecting massif file: {}", args.input.display());

    let file = File::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    let trace = parse(BufReader::new(file), &args.allocators)
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;

    debug!(
        "parsed trace: {} snapshots, peak index {:?}",
        trace.snapshots().len(),
        trace.peak_index()
    );

    let sites = peak_sites(&trace, args.top_sites);

    if let Some(path) = &args.output_json {
        let profile = to_profile(&trace, sites.clone());
        write_profile(&profile, path)
            .with_context(|| format!("Failed to write profile to {}", path.display()))?;
        println!("Profile written to {}", path.display());
    }

    if args.print_summary || args.output_json.is_none() {
        print_summary(&trace, &sites);
    }

    Ok(())
}

/// Rank the hot allocation sites of the peak snapshot
fn peak_sites(trace: &Trace, top_n: usize) -> Vec<AllocationSite> {
    let Some(peak) = trace.peak() else {
        return Vec::new();
    };
    let Some(tree) = &peak.heap_tree else {
        return Vec::new();
    };
    let paths = build_collapsed_paths(tree);
    hot_sites(&paths, peak.mem_heap, top_n)
}

/// Print a text summary of the parsed trace
fn print_summary(trace: &Trace, sites: &[AllocationSite]) {
    let stats = trace_stats(trace);

    println!("Description: {}", trace.description());
    println!("Command:     {}", trace.command());
    println!("Time unit:   {}", trace.time_unit());
    println!();
    println!("Snapshots:   {} ({} detailed)", stats.snapshot_count, stats.detailed_count);
    println!("Max heap:    {} B", stats.max_heap);
    println!("Mean heap:   {} B", stats.mean_heap);

    match trace.peak() {
        Some(peak) => {
            println!();
            println!(
                "Peak: snapshot #{} at time {} ({} B heap, {} B extra, {} B stacks)",
                peak.number, peak.time, peak.mem_heap, peak.mem_heap_extra, peak.mem_stacks
            );
        }
        None => println!("No peak snapshot (empty trace)"),
    }

    if !sites.is_empty() {
        println!();
        println!("Top allocation sites:");
        for site in sites {
            println!("  {:>5.1}%  {:>12} B  {}", site.percentage, site.bytes, site.path);
        }
    }
}
