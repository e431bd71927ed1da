//! Profile export: versioned JSON schema and file writer.

pub mod json;
pub mod schema;

pub use json::{read_profile, to_profile, write_profile};
pub use schema::{AllocationSite, PeakSummary, TraceProfile};
