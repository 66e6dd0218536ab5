//! Red-black engine: sentinel links, parent back references, CLRS-style
//! insert and delete fixups.

#[path = "RbTree.rs"]
pub mod rb_tree;
pub mod types;
pub(crate) mod util;

pub use rb_tree::RbTree;
pub use types::RbNode;
