//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod inspect;

// Re-export main command functions
pub use inspect::{execute_inspect, validate_args, InspectArgs};
