//! Massif Trace CLI
//!
//! Parses Valgrind Massif output files into a structured trace and reports
//! memory statistics and hot allocation sites.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

mod commands;

use commands::{execute_inspect, validate_args, InspectArgs};
use massif_trace::utils::config::{DEFAULT_TOP_SITES, SCHEMA_VERSION};

/// Massif Trace - inspection tool for Valgrind Massif heap profiles
#[derive(Parser, Debug)]
#[command(name = "massif-trace")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a massif output file and report on it
    Inspect {
        /// Path to the massif output file (e.g. massif.out.12345)
        file: PathBuf,

        /// Wildcard pattern naming a custom allocator function; repeatable
        #[arg(short, long = "allocator")]
        allocators: Vec<String>,

        /// Output path for a JSON profile (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of top allocation sites to include
        #[arg(long, default_value_t = DEFAULT_TOP_SITES)]
        top: usize,

        /// Print text summary to stdout even when writing JSON
        #[arg(long)]
        summary: bool,
    },

    /// Validate a profile JSON file
    Validate {
        /// Path to profile JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Inspect {
            file,
            allocators,
            output,
            top,
            summary,
        } => {
            let args = InspectArgs {
                input: file,
                allocators,
                output_json: output,
                top_sites: top,
                print_summary: summary,
            };

            validate_args(&args)?;
            execute_inspect(args)?;
        }

        Commands::Validate { file } => {
            validate_profile_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Validate a profile JSON file
///
/// **Private** - internal command implementation
fn validate_profile_file(file_path: PathBuf) -> Result<()> {
    use massif_trace::output::read_profile;

    println!("Validating profile: {}", file_path.display());

    let profile = read_profile(&file_path)?;

    println!("✓ Valid profile JSON");
    println!("  Version: {}", profile.version);
    println!("  Command: {}", profile.command);
    println!("  Snapshots: {}", profile.snapshot_count);
    if let Some(peak) = &profile.peak {
        println!("  Peak heap: {} B (snapshot #{})", peak.mem_heap, peak.snapshot);
    }
    println!("  Hot sites: {}", profile.hot_sites.len());

    Ok(())
}

/// Display schema information
///
/// **Private** - internal command implementation
fn display_schema(show_details: bool) {
    println!("Massif Trace Profile Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string          - Schema version (e.g., '1.0.0')");
        println!("  description: string      - The trace's desc: header");
        println!("  command: string          - Profiled command line");
        println!("  time_unit: string        - Unit of snapshot timestamps");
        println!("  snapshot_count: number   - Number of snapshots");
        println!("  peak: object?            - Selected peak snapshot");
        println!("    snapshot: number       - Sequence number from the file");
        println!("    time: number           - Timestamp");
        println!("    mem_heap: number       - Useful heap bytes");
        println!("    mem_heap_extra: number - Heap overhead bytes");
        println!("    mem_stacks: number     - Stack bytes");
        println!("  hot_sites: array         - Top allocation sites by bytes");
        println!("    path: string           - Collapsed call path");
        println!("    bytes: number          - Bytes attributed to the site");
        println!("    percentage: number     - Share of the peak heap");
        println!("  generated_at: string     - ISO 8601 timestamp");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
///
/// **Private** - internal command implementation
fn display_version() {
    println!("Massif Trace v{}", env!("CARGO_PKG_VERSION"));
    println!("Profile Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("An inspection tool for Valgrind Massif heap profiles.");
}
