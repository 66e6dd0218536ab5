//! Capability interface shared by the red-black and AVL engines.

use serde::{Deserialize, Serialize};

use crate::error::TreeError;
use crate::serialized::SerializedNode;
use crate::trace::Trace;
use crate::types::Orderable;

/// Which balancing strategy backs a tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TreeKind {
    #[serde(rename = "rb")]
    RedBlack,
    #[serde(rename = "avl")]
    Avl,
}

impl TreeKind {
    pub fn name(self) -> &'static str {
        match self {
            TreeKind::RedBlack => "Red-Black",
            TreeKind::Avl => "AVL",
        }
    }

    pub fn other(self) -> TreeKind {
        match self {
            TreeKind::RedBlack => TreeKind::Avl,
            TreeKind::Avl => TreeKind::RedBlack,
        }
    }
}

/// Operations every engine supports.
///
/// Mutating operations run to completion and return the full step trace;
/// callers never observe a half-rebalanced tree.
pub trait BalancedTree<V: Orderable> {
    fn kind(&self) -> TreeKind;

    /// Inserts `value`, returning the steps taken.
    ///
    /// # Errors
    ///
    /// [`TreeError::InvalidValue`] if `value` is not orderable; the tree is
    /// left untouched.
    fn insert(&mut self, value: V) -> Result<Trace, TreeError>;

    /// Deletes `value`. A missing value is reported as an `error` step, not
    /// as an `Err`.
    fn delete(&mut self, value: &V) -> Result<Trace, TreeError>;

    /// Arena handle of the node holding `value`, `None` when absent.
    fn find(&self, value: &V) -> Option<u32>;

    fn contains(&self, value: &V) -> bool {
        self.find(value).is_some()
    }

    fn count_nodes(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.count_nodes() == 0
    }

    /// Number of nodes on the longest root-to-leaf path.
    fn height(&self) -> usize;

    /// Whole-tree balance scalar: the black height for red-black trees. AVL
    /// trees only have per-node balance factors and return `None`.
    fn balance_metric(&self) -> Option<usize>;

    fn inorder_values(&self) -> Vec<V>;

    fn preorder_values(&self) -> Vec<V>;

    fn postorder_values(&self) -> Vec<V>;

    fn serialize(&self) -> Option<SerializedNode<V>>;

    /// Replaces the whole tree with `data`. On error the tree is unchanged.
    ///
    /// The shape is trusted as is; use [`BalancedTree::assert_valid`] to vet
    /// untrusted input.
    fn deserialize(&mut self, data: Option<&SerializedNode<V>>) -> Result<(), TreeError>;

    /// Drops every node.
    fn clear(&mut self) -> Trace;

    /// Checks the engine's structural invariants.
    fn assert_valid(&self) -> Result<(), String>;

    /// Human readable dump of the tree.
    fn print(&self) -> String;
}
