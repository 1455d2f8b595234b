// Public library interface for treemap-diff
// The binaries and integration tests build on these modules

pub mod error;
pub mod input;
pub mod layout;
pub mod report;
pub mod tree;

pub use input::types::{DiffItem, DiffType};
pub use tree::element::TreemapDiffElement;
pub use tree::{build_diff_tree, build_tree_from_diff_items, build_treemap_diff};
