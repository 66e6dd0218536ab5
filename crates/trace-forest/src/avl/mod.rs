//! AVL engine: `Option` child handles, stored heights, recursive insert and
//! delete that rebalance on the way back up.

#[path = "AvlTree.rs"]
pub mod avl_tree;
pub mod types;
pub(crate) mod util;

pub use avl_tree::AvlTree;
pub use types::AvlNode;
