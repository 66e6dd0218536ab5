use tracing::{debug, warn};

use crate::arena::Arena;
use crate::engine::{BalancedTree, TreeKind};
use crate::error::TreeError;
use crate::serialized::SerializedNode;
use crate::trace::{StepCode, Trace};
use crate::types::{Color, Link, Orderable};

use super::types::RbNode;
use super::util;

/// Red-black tree with a step trace for every mutation.
///
/// Missing children and the root's parent are the sentinel [`Link::Nil`].
/// Equal values are not rejected: a repeated value descends right of its
/// equal and is stored as a separate node.
///
/// ```
/// use trace_forest::{BalancedTree, Color, RbTree, StepCode};
///
/// let mut tree = RbTree::new();
/// tree.insert(10).unwrap();
/// tree.insert(20).unwrap();
/// let trace = tree.insert(30).unwrap();
///
/// assert!(trace.contains(StepCode::RbInsertCase3));
/// assert_eq!(tree.preorder_values(), vec![20, 10, 30]);
/// assert_eq!(tree.color(tree.root()), Color::Black);
/// ```
#[derive(Clone, Debug)]
pub struct RbTree<V> {
    arena: Arena<RbNode<V>>,
    root: Link,
}

impl<V: Orderable> Default for RbTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

fn check_value<V: Orderable>(value: &V) -> Result<(), TreeError> {
    if value.is_orderable() {
        Ok(())
    } else {
        warn!(value = ?value, "rejected red-black tree value");
        Err(TreeError::InvalidValue(format!("{value:?}")))
    }
}

impl<V: Orderable> RbTree<V> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: Link::Nil,
        }
    }

    pub fn root(&self) -> Link {
        self.root
    }

    pub fn node(&self, i: u32) -> &RbNode<V> {
        self.arena.get(i)
    }

    pub fn value(&self, i: u32) -> &V {
        &self.arena.get(i).v
    }

    /// Color of any link; the sentinel reports black.
    pub fn color(&self, link: Link) -> Color {
        util::color(&self.arena, link)
    }

    pub fn insert(&mut self, value: V) -> Result<Trace, TreeError> {
        check_value(&value)?;

        let mut trace = Trace::new();
        trace.push(StepCode::RbInsertStart, format!("Inserting value {value}"));

        let mut parent = Link::Nil;
        let mut go_left = false;
        let mut curr = self.root;
        while let Link::Node(i) = curr {
            parent = curr;
            go_left = value < *self.value(i);
            curr = if go_left {
                util::l(&self.arena, i)
            } else {
                util::r(&self.arena, i)
            };
        }

        let message = format!("{value}");
        let z = self.arena.alloc(RbNode::new(value, parent));
        match parent {
            Link::Nil => {
                self.root = Link::Node(z);
                trace.push(
                    StepCode::RbInsertRoot,
                    format!("Tree was empty, new node {message} is root"),
                );
            }
            Link::Node(pi) => {
                let at = self.value(pi).to_string();
                if go_left {
                    self.arena.get_mut(pi).l = Link::Node(z);
                    trace.push(
                        StepCode::RbInsertPlaceLeft,
                        format!("Inserted {message} as left child of {at}"),
                    );
                } else {
                    self.arena.get_mut(pi).r = Link::Node(z);
                    trace.push(
                        StepCode::RbInsertPlaceRight,
                        format!("Inserted {message} as right child of {at}"),
                    );
                }
            }
        }

        trace.push(StepCode::RbInsertFixupStart, "Fixing violations...");
        self.root = util::insert_fixup(&mut self.arena, self.root, z, &mut trace);

        debug!(value = %message, steps = trace.len(), "red-black insert");
        Ok(trace)
    }

    pub fn delete(&mut self, value: &V) -> Result<Trace, TreeError> {
        check_value(value)?;

        let mut trace = Trace::new();
        trace.push(StepCode::RbDeleteStart, format!("Deleting value {value}"));

        let Link::Node(z) = self.search(value) else {
            trace.push(
                StepCode::RbDeleteNotFound,
                format!("Value {value} not found"),
            );
            debug!(value = %value, "red-black delete: not found");
            return Ok(trace);
        };

        self.root = util::remove(&mut self.arena, self.root, z, &mut trace);
        trace.push(StepCode::RbDeleteComplete, "Deletion complete!");

        debug!(value = %value, steps = trace.len(), "red-black delete");
        Ok(trace)
    }

    /// Node holding `value`, or the sentinel.
    pub fn search(&self, value: &V) -> Link {
        let mut curr = self.root;
        while let Link::Node(i) = curr {
            let v = self.value(i);
            if value == v {
                break;
            }
            curr = if value < v {
                util::l(&self.arena, i)
            } else {
                util::r(&self.arena, i)
            };
        }
        curr
    }

    /// Leftmost node under `link`.
    pub fn minimum(&self, link: Link) -> Link {
        util::minimum(&self.arena, link)
    }

    /// Grandparent's other child, or the sentinel.
    pub fn uncle(&self, i: u32) -> Link {
        util::uncle(&self.arena, i)
    }

    pub fn height(&self) -> usize {
        util::height(&self.arena, self.root)
    }

    /// Black nodes on the heaviest path from the root, root included.
    pub fn black_height(&self) -> usize {
        util::black_height(&self.arena, self.root)
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
        fn walk<V: Orderable>(tree: &RbTree<V>, link: Link) -> Option<Box<SerializedNode<V>>> {
            let Link::Node(i) = link else {
                return None;
            };
            let n = tree.node(i);
            Some(Box::new(SerializedNode {
                value: n.v.clone(),
                color: Some(n.color),
                left: walk(tree, n.l),
                right: walk(tree, n.r),
            }))
        }

        walk(self, self.root).map(|node| *node)
    }

    /// Replaces the tree with `data`. Nodes without a color come back red.
    ///
    /// Only values are checked. Order, colors and black heights are taken as
    /// given, and later fixups assume they hold, so run
    /// [`RbTree::assert_valid`] on data from an untrusted source.
    pub fn deserialize(&mut self, data: Option<&SerializedNode<V>>) -> Result<(), TreeError> {
        fn build<V: Orderable>(
            arena: &mut Arena<RbNode<V>>,
            data: Option<&SerializedNode<V>>,
        ) -> Result<Link, TreeError> {
            let Some(data) = data else {
                return Ok(Link::Nil);
            };
            check_value(&data.value)?;

            let left = build(arena, data.left.as_deref())?;
            let right = build(arena, data.right.as_deref())?;

            let mut node = RbNode::new(data.value.clone(), Link::Nil);
            node.color = data.color.unwrap_or(Color::Red);
            node.l = left;
            node.r = right;
            let i = arena.alloc(node);
            for child in [left, right] {
                if let Link::Node(c) = child {
                    arena.get_mut(c).p = Link::Node(i);
                }
            }
            Ok(Link::Node(i))
        }

        let mut arena = Arena::new();
        let root = build(&mut arena, data)?;
        self.arena = arena;
        self.root = root;
        debug!(nodes = self.arena.len(), "red-black deserialize");
        Ok(())
    }

    pub fn clear(&mut self) -> Trace {
        self.arena.clear();
        self.root = Link::Nil;
        let mut trace = Trace::new();
        trace.push(StepCode::ClearTree, "Tree cleared");
        trace
    }

    pub fn assert_valid(&self) -> Result<(), String> {
        util::assert_red_black_tree(&self.arena, self.root)
    }

    pub fn print(&self) -> String {
        util::print(&self.arena, self.root, "")
    }
}

impl<V: Orderable> BalancedTree<V> for RbTree<V> {
    fn kind(&self) -> TreeKind {
        TreeKind::RedBlack
    }

    fn insert(&mut self, value: V) -> Result<Trace, TreeError> {
        RbTree::insert(self, value)
    }

    fn delete(&mut self, value: &V) -> Result<Trace, TreeError> {
        RbTree::delete(self, value)
    }

    fn find(&self, value: &V) -> Option<u32> {
        self.search(value).index()
    }

    fn count_nodes(&self) -> usize {
        RbTree::count_nodes(self)
    }

    fn height(&self) -> usize {
        RbTree::height(self)
    }

    fn balance_metric(&self) -> Option<usize> {
        Some(self.black_height())
    }

    fn inorder_values(&self) -> Vec<V> {
        RbTree::inorder_values(self)
    }

    fn preorder_values(&self) -> Vec<V> {
        RbTree::preorder_values(self)
    }

    fn postorder_values(&self) -> Vec<V> {
        RbTree::postorder_values(self)
    }

    fn serialize(&self) -> Option<SerializedNode<V>> {
        RbTree::serialize(self)
    }

    fn deserialize(&mut self, data: Option<&SerializedNode<V>>) -> Result<(), TreeError> {
        RbTree::deserialize(self, data)
    }

    fn clear(&mut self) -> Trace {
        RbTree::clear(self)
    }

    fn assert_valid(&self) -> Result<(), String> {
        RbTree::assert_valid(self)
    }

    fn print(&self) -> String {
        RbTree::print(self)
    }
}
