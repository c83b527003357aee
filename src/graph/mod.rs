pub mod conversion;
pub mod definition;
pub mod geometry;
pub mod topology;

pub use conversion::*;
pub use definition::*;
pub use geometry::*;
pub use topology::{find_canonical_root, find_roots, get_children, get_parent, is_tree_valid};
