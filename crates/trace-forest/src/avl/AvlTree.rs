use tracing::{debug, warn};

use crate::arena::Arena;
use crate::engine::{BalancedTree, TreeKind};
use crate::error::TreeError;
use crate::serialized::SerializedNode;
use crate::trace::{StepCode, Trace};
use crate::types::Orderable;

use super::types::AvlNode;
use super::util;

/// AVL tree with a step trace for every mutation.
///
/// Duplicates are rejected: inserting a value that is already present
/// leaves the tree untouched and reports `AVL_INSERT_DUPLICATE`.
///
/// ```
/// use trace_forest::{AvlTree, BalancedTree, StepCode};
///
/// let mut tree = AvlTree::new();
/// tree.insert(10).unwrap();
/// tree.insert(20).unwrap();
/// let trace = tree.insert(30).unwrap();
///
/// assert!(trace.contains(StepCode::AvlInsertRrCase));
/// assert_eq!(tree.preorder_values(), vec![20, 10, 30]);
/// assert_eq!(tree.height(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct AvlTree<V> {
    arena: Arena<AvlNode<V>>,
    root: Option<u32>,
}

impl<V: Orderable> Default for AvlTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

fn check_value<V: Orderable>(value: &V) -> Result<(), TreeError> {
    if value.is_orderable() {
        Ok(())
    } else {
        warn!(value = ?value, "rejected AVL tree value");
        Err(TreeError::InvalidValue(format!("{value:?}")))
    }
}

impl<V: Orderable> AvlTree<V> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    pub fn root(&self) -> Option<u32> {
        self.root
    }

    pub fn node(&self, i: u32) -> &AvlNode<V> {
        self.arena.get(i)
    }

    pub fn value(&self, i: u32) -> &V {
        &self.arena.get(i).v
    }

    pub fn insert(&mut self, value: V) -> Result<Trace, TreeError> {
        check_value(&value)?;

        let mut trace = Trace::new();
        trace.push(StepCode::AvlInsertStart, format!("Inserting value {value}"));

        let (root, changed) = util::insert(&mut self.arena, self.root, &value, &mut trace);
        self.root = Some(root);
        if changed {
            trace.push(StepCode::AvlInsertComplete, "AVL insertion complete!");
        }

        debug!(value = %value, changed, steps = trace.len(), "AVL insert");
        Ok(trace)
    }

    pub fn delete(&mut self, value: &V) -> Result<Trace, TreeError> {
        check_value(value)?;

        let mut trace = Trace::new();
        trace.push(StepCode::AvlDeleteStart, format!("Deleting value {value}"));

        if self.search(value).is_none() {
            trace.push(
                StepCode::AvlDeleteNotFound,
                format!("Value {value} not found"),
            );
            debug!(value = %value, "AVL delete: not found");
            return Ok(trace);
        }

        self.root = util::remove(&mut self.arena, self.root, value, &mut trace);
        trace.push(StepCode::AvlDeleteComplete, "AVL deletion complete!");

        debug!(value = %value, steps = trace.len(), "AVL delete");
        Ok(trace)
    }

    pub fn search(&self, value: &V) -> Option<u32> {
        util::search(&self.arena, self.root, value)
    }

    /// Leftmost node under `i`.
    pub fn minimum(&self, i: u32) -> u32 {
        util::minimum(&self.arena, i)
    }

    /// Balance factor of a node: `height(left) - height(right)`.
    pub fn balance(&self, i: u32) -> i32 {
        util::balance(&self.arena, Some(i))
    }

    /// Stored height of a node.
    pub fn node_height(&self, i: u32) -> u32 {
        self.arena.get(i).h
    }

    /// Height of the whole tree, read from the root.
    pub fn height(&self) -> usize {
        util::height(&self.arena, self.root) as usize
    }

    pub fn count_nodes(&self) -> usize {
        util::count(&self.arena, self.root)
    }

    pub fn inorder_values(&self) -> Vec<V> {
        let mut out = Vec::new();
        util::inorder(&self.arena, self.root, &mut out);
        out
    }

    pub fn preorder_values(&self) -> Vec<V> {
        let mut out = Vec::new();
        util::preorder(&self.arena, self.root, &mut out);
        out
    }

    pub fn postorder_values(&self) -> Vec<V> {
        let mut out = Vec::new();
        util::postorder(&self.arena, self.root, &mut out);
        out
    }

    pub fn serialize(&self) -> Option<SerializedNode<V>> {
        fn walk<V: Orderable>(tree: &AvlTree<V>, node: Option<u32>) -> Option<Box<SerializedNode<V>>> {
            let i = node?;
            let n = tree.node(i);
            Some(Box::new(SerializedNode {
                value: n.v.clone(),
                color: None,
                left: walk(tree, n.l),
                right: walk(tree, n.r),
            }))
        }

        walk(self, self.root).map(|node| *node)
    }

    /// Replaces the tree with `data`. Colors are ignored and heights are
    /// recomputed from the shape.
    ///
    /// Order and balance are not checked; run [`AvlTree::assert_valid`] on
    /// data from an untrusted source before mutating the tree.
    pub fn deserialize(&mut self, data: Option<&SerializedNode<V>>) -> Result<(), TreeError> {
        fn build<V: Orderable>(
            arena: &mut Arena<AvlNode<V>>,
            data: Option<&SerializedNode<V>>,
        ) -> Result<Option<u32>, TreeError> {
            let Some(data) = data else {
                return Ok(None);
            };
            check_value(&data.value)?;

            let left = build(arena, data.left.as_deref())?;
            let right = build(arena, data.right.as_deref())?;

            let mut node = AvlNode::new(data.value.clone());
            node.l = left;
            node.r = right;
            Ok(Some(arena.alloc(node)))
        }

        let mut arena = Arena::new();
        let root = build(&mut arena, data)?;
        util::recompute_heights(&mut arena, root);
        self.arena = arena;
        self.root = root;
        debug!(nodes = self.arena.len(), "AVL deserialize");
        Ok(())
    }

    pub fn clear(&mut self) -> Trace {
        self.arena.clear();
        self.root = None;
        let mut trace = Trace::new();
        trace.push(StepCode::ClearTree, "Tree cleared");
        trace
    }

    pub fn assert_valid(&self) -> Result<(), String> {
        util::assert_avl_tree(&self.arena, self.root)
    }

    pub fn print(&self) -> String {
        util::print(&self.arena, self.root, "")
    }
}

impl<V: Orderable> BalancedTree<V> for AvlTree<V> {
    fn kind(&self) -> TreeKind {
        TreeKind::Avl
    }

    fn insert(&mut self, value: V) -> Result<Trace, TreeError> {
        AvlTree::insert(self, value)
    }

    fn delete(&mut self, value: &V) -> Result<Trace, TreeError> {
        AvlTree::delete(self, value)
    }

    fn find(&self, value: &V) -> Option<u32> {
        self.search(value)
    }

    fn count_nodes(&self) -> usize {
        AvlTree::count_nodes(self)
    }

    fn height(&self) -> usize {
        AvlTree::height(self)
    }

    fn balance_metric(&self) -> Option<usize> {
        None
    }

    fn inorder_values(&self) -> Vec<V> {
        AvlTree::inorder_values(self)
    }

    fn preorder_values(&self) -> Vec<V> {
        AvlTree::preorder_values(self)
    }

    fn postorder_values(&self) -> Vec<V> {
        AvlTree::postorder_values(self)
    }

    fn serialize(&self) -> Option<SerializedNode<V>> {
        AvlTree::serialize(self)
    }

    fn deserialize(&mut self, data: Option<&SerializedNode<V>>) -> Result<(), TreeError> {
        AvlTree::deserialize(self, data)
    }

    fn clear(&mut self) -> Trace {
        AvlTree::clear(self)
    }

    fn assert_valid(&self) -> Result<(), String> {
        AvlTree::assert_valid(self)
    }

    fn print(&self) -> String {
        AvlTree::print(self)
    }
}
