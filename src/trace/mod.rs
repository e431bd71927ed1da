//! In-memory representation of a parsed massif trace.

pub mod model;
pub mod tree;

// Re-export main types
pub use model::{Snapshot, Trace};
pub use tree::{HeapTree, NodeId, TreeNode};
