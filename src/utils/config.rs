//! Configuration and constants for the parser and CLI.

/// Current output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

// Required line prefixes for the massif file grammar, one per parser state.
pub const DESC_PREFIX: &str = "desc: ";
pub const CMD_PREFIX: &str = "cmd: ";
pub const TIME_UNIT_PREFIX: &str = "time_unit: ";
pub const TIME_PREFIX: &str = "time=";
pub const MEM_HEAP_PREFIX: &str = "mem_heap_B=";
pub const MEM_HEAP_EXTRA_PREFIX: &str = "mem_heap_extra_B=";
pub const MEM_STACKS_PREFIX: &str = "mem_stacks_B=";
pub const HEAP_TREE_PREFIX: &str = "heap_tree=";

/// Separator line surrounding each `snapshot=<N>` record
pub const SNAPSHOT_SEPARATOR: &str = "#-----------";
pub const SNAPSHOT_PREFIX: &str = "snapshot=";

/// Matches the bucket entries massif emits for call sites it did not expand.
/// Accepts both the plain wording and massif's own ("all below massif's
/// threshold (1.23%)"); group 1 captures the place count.
pub const BELOW_THRESHOLD_PATTERN: &str = r"in ([0-9]+) places, all below (?:massif's )?threshold";

/// Default number of hot allocation sites reported by the CLI
pub const DEFAULT_TOP_SITES: usize = 20;
