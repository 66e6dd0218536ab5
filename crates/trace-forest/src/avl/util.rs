use std::fmt::Display;

use crate::arena::Arena;
use crate::print::{print_binary, PrintChild};
use crate::trace::{StepCode, Trace};
use crate::types::Orderable;

use super::types::AvlNode;

type AvlArena<V> = Arena<AvlNode<V>>;

#[inline]
pub(crate) fn l<V>(arena: &AvlArena<V>, i: u32) -> Option<u32> {
    arena.get(i).l
}

#[inline]
pub(crate) fn r<V>(arena: &AvlArena<V>, i: u32) -> Option<u32> {
    arena.get(i).r
}

#[inline]
fn value_of<V>(arena: &AvlArena<V>, i: u32) -> &V {
    &arena.get(i).v
}

#[inline]
fn expect_child(child: Option<u32>, what: &str) -> u32 {
    match child {
        Some(i) => i,
        None => panic!("AVL structure corrupted: {what} is missing"),
    }
}

/// Stored height, 0 for an absent child.
#[inline]
pub(crate) fn height<V>(arena: &AvlArena<V>, node: Option<u32>) -> u32 {
    node.map_or(0, |i| arena.get(i).h)
}

/// `height(left) - height(right)`, 0 for an absent node.
pub(crate) fn balance<V>(arena: &AvlArena<V>, node: Option<u32>) -> i32 {
    match node {
        None => 0,
        Some(i) => height(arena, l(arena, i)) as i32 - height(arena, r(arena, i)) as i32,
    }
}

fn update_height<V>(arena: &mut AvlArena<V>, i: u32) {
    let h = 1 + height(arena, l(arena, i)).max(height(arena, r(arena, i)));
    arena.get_mut(i).h = h;
}

/// Rotates `z` down to the left. Returns the new subtree root.
fn rotate_left<V>(arena: &mut AvlArena<V>, z: u32) -> u32 {
    let y = expect_child(r(arena, z), "right child of a left rotation");
    let t2 = l(arena, y);
    arena.get_mut(y).l = Some(z);
    arena.get_mut(z).r = t2;
    update_height(arena, z);
    update_height(arena, y);
    y
}

/// Rotates `z` down to the right. Returns the new subtree root.
fn rotate_right<V>(arena: &mut AvlArena<V>, z: u32) -> u32 {
    let y = expect_child(l(arena, z), "left child of a right rotation");
    let t3 = r(arena, y);
    arena.get_mut(y).r = Some(z);
    arena.get_mut(z).l = t3;
    update_height(arena, z);
    update_height(arena, y);
    y
}

pub(crate) fn minimum<V>(arena: &AvlArena<V>, mut i: u32) -> u32 {
    while let Some(left) = l(arena, i) {
        i = left;
    }
    i
}

pub(crate) fn search<V: PartialOrd>(arena: &AvlArena<V>, root: Option<u32>, value: &V) -> Option<u32> {
    let mut curr = root;
    while let Some(i) = curr {
        let v = value_of(arena, i);
        if value == v {
            return Some(i);
        }
        curr = if value < v { l(arena, i) } else { r(arena, i) };
    }
    None
}

/// Inserts `value` under `node`.
///
/// Returns the new subtree root and whether anything changed. A duplicate
/// stops the walk: ancestors neither recompute heights nor emit steps.
pub(crate) fn insert<V: Orderable>(
    arena: &mut AvlArena<V>,
    node: Option<u32>,
    value: &V,
    trace: &mut Trace,
) -> (u32, bool) {
    let Some(i) = node else {
        trace.push(
            StepCode::AvlInsertCreateNode,
            format!("Created new node with value {value}"),
        );
        return (arena.alloc(AvlNode::new(value.clone())), true);
    };

    let changed = if value < value_of(arena, i) {
        trace.push(
            StepCode::AvlInsertGoLeft,
            format!("Going left from node {}", value_of(arena, i)),
        );
        let left = l(arena, i);
        let (child, changed) = insert(arena, left, value, trace);
        arena.get_mut(i).l = Some(child);
        changed
    } else if value > value_of(arena, i) {
        trace.push(
            StepCode::AvlInsertGoRight,
            format!("Going right from node {}", value_of(arena, i)),
        );
        let right = r(arena, i);
        let (child, changed) = insert(arena, right, value, trace);
        arena.get_mut(i).r = Some(child);
        changed
    } else {
        trace.push(
            StepCode::AvlInsertDuplicate,
            format!("Value {value} already present, tree unchanged"),
        );
        return (i, false);
    };

    if !changed {
        return (i, false);
    }

    update_height(arena, i);
    let b = balance(arena, Some(i));
    trace.push(
        StepCode::AvlInsertCheckBalance,
        format!("Node {} balance factor: {b}", value_of(arena, i)),
    );

    if b > 1 {
        let li = expect_child(l(arena, i), "left child of a left-heavy node");
        if value < value_of(arena, li) {
            trace.push(
                StepCode::AvlInsertLlCase,
                format!("Left-Left case: Right rotation at {}", value_of(arena, i)),
            );
            return (rotate_right(arena, i), true);
        }
    }
    if b < -1 {
        let ri = expect_child(r(arena, i), "right child of a right-heavy node");
        if value > value_of(arena, ri) {
            trace.push(
                StepCode::AvlInsertRrCase,
                format!("Right-Right case: Left rotation at {}", value_of(arena, i)),
            );
            return (rotate_left(arena, i), true);
        }
    }
    if b > 1 {
        let li = expect_child(l(arena, i), "left child of a left-heavy node");
        if value > value_of(arena, li) {
            trace.push(
                StepCode::AvlInsertLrCase,
                format!(
                    "Left-Right case: Left rotation at {}, then right rotation at {}",
                    value_of(arena, li),
                    value_of(arena, i)
                ),
            );
            let new_left = rotate_left(arena, li);
            arena.get_mut(i).l = Some(new_left);
            return (rotate_right(arena, i), true);
        }
    }
    if b < -1 {
        let ri = expect_child(r(arena, i), "right child of a right-heavy node");
        if value < value_of(arena, ri) {
            trace.push(
                StepCode::AvlInsertRlCase,
                format!(
                    "Right-Left case: Right rotation at {}, then left rotation at {}",
                    value_of(arena, ri),
                    value_of(arena, i)
                ),
            );
            let new_right = rotate_right(arena, ri);
            arena.get_mut(i).r = Some(new_right);
            return (rotate_left(arena, i), true);
        }
    }

    (i, true)
}

/// Removes `value` from under `node`, returning the new subtree root.
pub(crate) fn remove<V: Orderable>(
    arena: &mut AvlArena<V>,
    node: Option<u32>,
    value: &V,
    trace: &mut Trace,
) -> Option<u32> {
    let Some(mut i) = node else {
        trace.push(
            StepCode::AvlDeleteNotFound,
            format!("Value {value} not found"),
        );
        return None;
    };

    if value < value_of(arena, i) {
        trace.push(
            StepCode::AvlDeleteGoLeft,
            format!("Going left from node {}", value_of(arena, i)),
        );
        let left = l(arena, i);
        let child = remove(arena, left, value, trace);
        arena.get_mut(i).l = child;
    } else if value > value_of(arena, i) {
        trace.push(
            StepCode::AvlDeleteGoRight,
            format!("Going right from node {}", value_of(arena, i)),
        );
        let right = r(arena, i);
        let child = remove(arena, right, value, trace);
        arena.get_mut(i).r = child;
    } else {
        match (l(arena, i), r(arena, i)) {
            (None, None) => {
                trace.push(
                    StepCode::AvlDeleteRemoveLeaf,
                    format!("Removing leaf node {}", value_of(arena, i)),
                );
                arena.take(i);
                return None;
            }
            (Some(child), None) | (None, Some(child)) => {
                trace.push(
                    StepCode::AvlDeleteReplaceWithChild,
                    format!(
                        "Replacing node {} with child {}",
                        value_of(arena, i),
                        value_of(arena, child)
                    ),
                );
                arena.take(i);
                i = child;
            }
            (Some(_), Some(ri)) => {
                let successor = value_of(arena, minimum(arena, ri)).clone();
                trace.push(
                    StepCode::AvlDeleteReplaceWithSuccessor,
                    format!(
                        "Replacing node {} with successor {successor}",
                        value_of(arena, i)
                    ),
                );
                arena.get_mut(i).v = successor.clone();
                let child = remove(arena, Some(ri), &successor, trace);
                arena.get_mut(i).r = child;
            }
        }
    }

    update_height(arena, i);
    let b = balance(arena, Some(i));
    trace.push(
        StepCode::AvlDeleteCheckBalance,
        format!("Node {} balance factor: {b}", value_of(arena, i)),
    );

    if b > 1 && balance(arena, l(arena, i)) >= 0 {
        trace.push(
            StepCode::AvlDeleteLlCase,
            format!("Left-Left case: Right rotation at {}", value_of(arena, i)),
        );
        return Some(rotate_right(arena, i));
    }
    if b > 1 && balance(arena, l(arena, i)) < 0 {
        let li = expect_child(l(arena, i), "left child of a left-heavy node");
        trace.push(
            StepCode::AvlDeleteLrCase,
            format!(
                "Left-Right case: Left rotation at {}, then right rotation at {}",
                value_of(arena, li),
                value_of(arena, i)
            ),
        );
        let new_left = rotate_left(arena, li);
        arena.get_mut(i).l = Some(new_left);
        return Some(rotate_right(arena, i));
    }
    if b < -1 && balance(arena, r(arena, i)) <= 0 {
        trace.push(
            StepCode::AvlDeleteRrCase,
            format!("Right-Right case: Left rotation at {}", value_of(arena, i)),
        );
        return Some(rotate_left(arena, i));
    }
    if b < -1 && balance(arena, r(arena, i)) > 0 {
        let ri = expect_child(r(arena, i), "right child of a right-heavy node");
        trace.push(
            StepCode::AvlDeleteRlCase,
            format!(
                "Right-Left case: Right rotation at {}, then left rotation at {}",
                value_of(arena, ri),
                value_of(arena, i)
            ),
        );
        let new_right = rotate_right(arena, ri);
        arena.get_mut(i).r = Some(new_right);
        return Some(rotate_left(arena, i));
    }

    Some(i)
}

pub(crate) fn count<V>(arena: &AvlArena<V>, node: Option<u32>) -> usize {
    match node {
        None => 0,
        Some(i) => 1 + count(arena, l(arena, i)) + count(arena, r(arena, i)),
    }
}

pub(crate) fn inorder<V: Clone>(arena: &AvlArena<V>, node: Option<u32>, out: &mut Vec<V>) {
    if let Some(i) = node {
        inorder(arena, l(arena, i), out);
        out.push(value_of(arena, i).clone());
        inorder(arena, r(arena, i), out);
    }
}

pub(crate) fn preorder<V: Clone>(arena: &AvlArena<V>, node: Option<u32>, out: &mut Vec<V>) {
    if let Some(i) = node {
        out.push(value_of(arena, i).clone());
        preorder(arena, l(arena, i), out);
        preorder(arena, r(arena, i), out);
    }
}

pub(crate) fn postorder<V: Clone>(arena: &AvlArena<V>, node: Option<u32>, out: &mut Vec<V>) {
    if let Some(i) = node {
        postorder(arena, l(arena, i), out);
        postorder(arena, r(arena, i), out);
        out.push(value_of(arena, i).clone());
    }
}

/// Recomputes every height bottom-up, e.g. after deserialization.
pub(crate) fn recompute_heights<V>(arena: &mut AvlArena<V>, node: Option<u32>) -> u32 {
    let Some(i) = node else {
        return 0;
    };
    let (left, right) = (l(arena, i), r(arena, i));
    let lh = recompute_heights(arena, left);
    let rh = recompute_heights(arena, right);
    let h = 1 + lh.max(rh);
    arena.get_mut(i).h = h;
    h
}

pub(crate) fn assert_avl_tree<V: Orderable>(arena: &AvlArena<V>, root: Option<u32>) -> Result<(), String> {
    fn check<V: Orderable>(arena: &AvlArena<V>, node: Option<u32>) -> Result<u32, String> {
        let Some(i) = node else {
            return Ok(0);
        };
        let n = arena
            .try_get(i)
            .ok_or_else(|| format!("Dangling link to slot {i}"))?;
        let lh = check(arena, n.l)?;
        let rh = check(arena, n.r)?;
        let h = 1 + lh.max(rh);
        if n.h != h {
            return Err(format!("Node {} stores height {} but has height {h}", n.v, n.h));
        }
        let b = lh as i32 - rh as i32;
        if !(-1..=1).contains(&b) {
            return Err(format!("Node {} is out of balance: {b}", n.v));
        }
        Ok(h)
    }

    check(arena, root)?;

    let mut values = Vec::new();
    inorder(arena, root, &mut values);
    for pair in values.windows(2) {
        if pair[0] >= pair[1] {
            return Err(format!("Node order violated: {} before {}", pair[0], pair[1]));
        }
    }

    if values.len() != arena.len() {
        return Err(format!(
            "Tree reaches {} nodes but arena holds {}",
            values.len(),
            arena.len()
        ));
    }

    Ok(())
}

/// Debug printer for AVL trees.
pub(crate) fn print<V: Display>(arena: &AvlArena<V>, node: Option<u32>, tab: &str) -> String {
    match node {
        None => "∅".to_string(),
        Some(i) => {
            let n = arena.get(i);
            let left = |tab: &str| print(arena, n.l, tab);
            let right = |tab: &str| print(arena, n.r, tab);
            let children = print_binary(
                tab,
                n.l.is_some().then_some(&left as &PrintChild<'_>),
                n.r.is_some().then_some(&right as &PrintChild<'_>),
            );
            format!(
                "{} [h={}, b={}]{children}",
                n.v,
                n.h,
                balance(arena, Some(i))
            )
        }
    }
}
