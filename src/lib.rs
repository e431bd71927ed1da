//! Massif Trace
//!
//! Parser and inspection tool for Valgrind Massif heap-profiler
//! output files.
//!
//! This crate provides the core implementation for the
//! `massif-trace` CLI tool. The parser turns one massif output
//! stream into a structured [`trace::Trace`]:
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::BufReader;
//!
//! let file = File::open("massif.out.12345")?;
//! let trace = massif_trace::parser::parse(BufReader::new(file), &[])?;
//! println!("{} snapshots", trace.snapshots().len());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod aggregator;
pub mod output;
pub mod parser;
pub mod trace;
pub mod utils;
