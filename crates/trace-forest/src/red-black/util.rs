use std::fmt::Display;

use crate::arena::Arena;
use crate::print::{print_binary, PrintChild};
use crate::trace::{StepCode, Trace};
use crate::types::{Color, Link, Orderable};

use super::types::RbNode;

type RbArena<V> = Arena<RbNode<V>>;

#[inline]
pub(crate) fn p<V>(arena: &RbArena<V>, i: u32) -> Link {
    arena.get(i).p
}

#[inline]
pub(crate) fn l<V>(arena: &RbArena<V>, i: u32) -> Link {
    arena.get(i).l
}

#[inline]
pub(crate) fn r<V>(arena: &RbArena<V>, i: u32) -> Link {
    arena.get(i).r
}

#[inline]
fn set_p<V>(arena: &mut RbArena<V>, i: u32, v: Link) {
    arena.get_mut(i).p = v;
}

#[inline]
fn set_l<V>(arena: &mut RbArena<V>, i: u32, v: Link) {
    arena.get_mut(i).l = v;
}

#[inline]
fn set_r<V>(arena: &mut RbArena<V>, i: u32, v: Link) {
    arena.get_mut(i).r = v;
}

/// Color of a link; the sentinel is always black.
#[inline]
pub(crate) fn color<V>(arena: &RbArena<V>, link: Link) -> Color {
    match link {
        Link::Nil => Color::Black,
        Link::Node(i) => arena.get(i).color,
    }
}

/// Recolors a real node. Painting the sentinel black is a no-op.
#[inline]
fn set_color<V>(arena: &mut RbArena<V>, link: Link, c: Color) {
    match link {
        Link::Node(i) => arena.get_mut(i).color = c,
        Link::Nil => debug_assert_eq!(c, Color::Black, "the sentinel cannot be painted red"),
    }
}

#[inline]
fn value<V>(arena: &RbArena<V>, i: u32) -> &V {
    &arena.get(i).v
}

#[inline]
fn expect_node(link: Link, what: &str) -> u32 {
    match link {
        Link::Node(i) => i,
        Link::Nil => panic!("red-black structure corrupted: {what} is the sentinel"),
    }
}

/// Left rotation around `x` and its right child. Returns the new root.
pub(crate) fn rotate_left<V>(arena: &mut RbArena<V>, root: Link, x: u32) -> Link {
    let y = expect_node(r(arena, x), "right child of a left rotation");
    let yl = l(arena, y);
    set_r(arena, x, yl);
    if let Link::Node(yl) = yl {
        set_p(arena, yl, Link::Node(x));
    }

    let xp = p(arena, x);
    set_p(arena, y, xp);
    let root = match xp {
        Link::Nil => Link::Node(y),
        Link::Node(pi) => {
            if l(arena, pi) == Link::Node(x) {
                set_l(arena, pi, Link::Node(y));
            } else {
                set_r(arena, pi, Link::Node(y));
            }
            root
        }
    };

    set_l(arena, y, Link::Node(x));
    set_p(arena, x, Link::Node(y));
    root
}

/// Right rotation around `x` and its left child. Returns the new root.
pub(crate) fn rotate_right<V>(arena: &mut RbArena<V>, root: Link, x: u32) -> Link {
    let y = expect_node(l(arena, x), "left child of a right rotation");
    let yr = r(arena, y);
    set_l(arena, x, yr);
    if let Link::Node(yr) = yr {
        set_p(arena, yr, Link::Node(x));
    }

    let xp = p(arena, x);
    set_p(arena, y, xp);
    let root = match xp {
        Link::Nil => Link::Node(y),
        Link::Node(pi) => {
            if r(arena, pi) == Link::Node(x) {
                set_r(arena, pi, Link::Node(y));
            } else {
                set_l(arena, pi, Link::Node(y));
            }
            root
        }
    };

    set_r(arena, y, Link::Node(x));
    set_p(arena, x, Link::Node(y));
    root
}

/// Puts `v` in the place `u` occupies under its parent. Returns the new root.
pub(crate) fn transplant<V>(arena: &mut RbArena<V>, root: Link, u: u32, v: Link) -> Link {
    let up = p(arena, u);
    let root = match up {
        Link::Nil => v,
        Link::Node(pi) => {
            if l(arena, pi) == Link::Node(u) {
                set_l(arena, pi, v);
            } else {
                set_r(arena, pi, v);
            }
            root
        }
    };
    if let Link::Node(vi) = v {
        set_p(arena, vi, up);
    }
    root
}

/// Leftmost descendant of `link`, the sentinel for an empty subtree.
pub(crate) fn minimum<V>(arena: &RbArena<V>, mut link: Link) -> Link {
    while let Link::Node(i) = link {
        match l(arena, i) {
            Link::Nil => return link,
            left => link = left,
        }
    }
    link
}

/// Grandparent's other child, or the sentinel when there is no grandparent.
pub(crate) fn uncle<V>(arena: &RbArena<V>, i: u32) -> Link {
    let Link::Node(pi) = p(arena, i) else {
        return Link::Nil;
    };
    let Link::Node(gi) = p(arena, pi) else {
        return Link::Nil;
    };
    if l(arena, gi) == Link::Node(pi) {
        r(arena, gi)
    } else {
        l(arena, gi)
    }
}

/// Restores the red-black properties after `z` was linked in red.
pub(crate) fn insert_fixup<V: Display>(
    arena: &mut RbArena<V>,
    mut root: Link,
    mut z: u32,
    trace: &mut Trace,
) -> Link {
    loop {
        let zp = match p(arena, z) {
            Link::Node(zp) if color(arena, Link::Node(zp)) == Color::Red => zp,
            _ => break,
        };
        let zg = expect_node(p(arena, zp), "grandparent of a red parent");

        if l(arena, zg) == Link::Node(zp) {
            let u = r(arena, zg);
            if color(arena, u) == Color::Red {
                trace.push(
                    StepCode::RbInsertCase1,
                    format!(
                        "Case 1: Uncle {} is red - Recoloring parent {} and uncle black, grandparent {} red",
                        value(arena, expect_node(u, "red uncle")),
                        value(arena, zp),
                        value(arena, zg)
                    ),
                );
                set_color(arena, Link::Node(zp), Color::Black);
                set_color(arena, u, Color::Black);
                set_color(arena, Link::Node(zg), Color::Red);
                z = zg;
            } else {
                if r(arena, zp) == Link::Node(z) {
                    trace.push(
                        StepCode::RbInsertCase2,
                        format!("Case 2: Triangle - Left rotation at {}", value(arena, zp)),
                    );
                    z = zp;
                    root = rotate_left(arena, root, z);
                }
                let zp = expect_node(p(arena, z), "parent in line case");
                let zg = expect_node(p(arena, zp), "grandparent in line case");
                trace.push(
                    StepCode::RbInsertCase3,
                    format!(
                        "Case 3: Line - Recoloring {} black, {} red and right rotation at {}",
                        value(arena, zp),
                        value(arena, zg),
                        value(arena, zg)
                    ),
                );
                set_color(arena, Link::Node(zp), Color::Black);
                set_color(arena, Link::Node(zg), Color::Red);
                root = rotate_right(arena, root, zg);
            }
        } else {
            let u = l(arena, zg);
            if color(arena, u) == Color::Red {
                trace.push(
                    StepCode::RbInsertCase1,
                    format!(
                        "Case 1: Uncle {} is red - Recoloring parent {} and uncle black, grandparent {} red",
                        value(arena, expect_node(u, "red uncle")),
                        value(arena, zp),
                        value(arena, zg)
                    ),
                );
                set_color(arena, Link::Node(zp), Color::Black);
                set_color(arena, u, Color::Black);
                set_color(arena, Link::Node(zg), Color::Red);
                z = zg;
            } else {
                if l(arena, zp) == Link::Node(z) {
                    trace.push(
                        StepCode::RbInsertCase2,
                        format!("Case 2: Triangle - Right rotation at {}", value(arena, zp)),
                    );
                    z = zp;
                    root = rotate_right(arena, root, z);
                }
                let zp = expect_node(p(arena, z), "parent in line case");
                let zg = expect_node(p(arena, zp), "grandparent in line case");
                trace.push(
                    StepCode::RbInsertCase3,
                    format!(
                        "Case 3: Line - Recoloring {} black, {} red and left rotation at {}",
                        value(arena, zp),
                        value(arena, zg),
                        value(arena, zg)
                    ),
                );
                set_color(arena, Link::Node(zp), Color::Black);
                set_color(arena, Link::Node(zg), Color::Red);
                root = rotate_left(arena, root, zg);
            }
        }

        if Link::Node(z) == root {
            break;
        }
    }

    set_color(arena, root, Color::Black);
    trace.push(StepCode::RbInsertComplete, "Root colored black - Tree balanced!");
    root
}

/// Unlinks node `z` and frees its slot. Returns the new root.
pub(crate) fn remove<V: Display>(
    arena: &mut RbArena<V>,
    mut root: Link,
    z: u32,
    trace: &mut Trace,
) -> Link {
    let mut removed_color = color(arena, Link::Node(z));
    let x: Link;
    let x_parent: Link;

    let zl = l(arena, z);
    let zr = r(arena, z);
    if zl.is_nil() {
        x = zr;
        x_parent = p(arena, z);
        root = transplant(arena, root, z, zr);
        trace.push(
            StepCode::RbDeleteNodeOneChild,
            format!(
                "Node {} has one right child or none. Transplanting.",
                value(arena, z)
            ),
        );
    } else if zr.is_nil() {
        x = zl;
        x_parent = p(arena, z);
        root = transplant(arena, root, z, zl);
        trace.push(
            StepCode::RbDeleteNodeOneChild,
            format!("Node {} has one left child. Transplanting.", value(arena, z)),
        );
    } else {
        let y = expect_node(minimum(arena, zr), "successor");
        removed_color = color(arena, Link::Node(y));
        x = r(arena, y);

        if p(arena, y) == Link::Node(z) {
            x_parent = Link::Node(y);
        } else {
            x_parent = p(arena, y);
            root = transplant(arena, root, y, x);
            set_r(arena, y, zr);
            set_p(arena, expect_node(zr, "right child"), Link::Node(y));
        }

        root = transplant(arena, root, z, Link::Node(y));
        set_l(arena, y, zl);
        set_p(arena, expect_node(zl, "left child"), Link::Node(y));
        let zc = color(arena, Link::Node(z));
        set_color(arena, Link::Node(y), zc);
        trace.push(
            StepCode::RbDeleteNodeTwoChildren,
            format!(
                "Node {} has two children. Replaced with successor {}.",
                value(arena, z),
                value(arena, y)
            ),
        );
    }

    arena.take(z);

    if removed_color == Color::Black {
        trace.push(
            StepCode::RbDeleteFixupStart,
            "Fixing violations after deletion...",
        );
        root = delete_fixup(arena, root, x, x_parent, trace);
    } else {
        trace.push(
            StepCode::RbDeleteNoFixup,
            "Deleted node was red. No fixup needed.",
        );
    }

    root
}

/// Pushes the extra black carried by `x` up the tree until it can be
/// absorbed. `x_parent` is tracked separately because `x` may be the
/// sentinel, which has no parent of its own.
fn delete_fixup<V: Display>(
    arena: &mut RbArena<V>,
    mut root: Link,
    mut x: Link,
    mut x_parent: Link,
    trace: &mut Trace,
) -> Link {
    while x != root && color(arena, x) == Color::Black {
        let pi = expect_node(x_parent, "parent of a double-black node");

        if l(arena, pi) == x {
            let mut w = expect_node(r(arena, pi), "sibling");
            if color(arena, Link::Node(w)) == Color::Red {
                trace.push(
                    StepCode::RbDeleteCase1,
                    format!(
                        "Case 1: Sibling {} is red - Recoloring and left rotation at {}",
                        value(arena, w),
                        value(arena, pi)
                    ),
                );
                set_color(arena, Link::Node(w), Color::Black);
                set_color(arena, Link::Node(pi), Color::Red);
                root = rotate_left(arena, root, pi);
                w = expect_node(r(arena, pi), "sibling");
            }

            let wl = l(arena, w);
            let wr = r(arena, w);
            if color(arena, wl) == Color::Black && color(arena, wr) == Color::Black {
                trace.push(
                    StepCode::RbDeleteCase2,
                    format!(
                        "Case 2: Both children of sibling {} are black - Recoloring sibling red",
                        value(arena, w)
                    ),
                );
                set_color(arena, Link::Node(w), Color::Red);
                x = Link::Node(pi);
                x_parent = p(arena, pi);
            } else {
                if color(arena, wr) == Color::Black {
                    trace.push(
                        StepCode::RbDeleteCase3,
                        format!(
                            "Case 3: Right child of sibling {} is black - Right rotation at sibling",
                            value(arena, w)
                        ),
                    );
                    set_color(arena, wl, Color::Black);
                    set_color(arena, Link::Node(w), Color::Red);
                    root = rotate_right(arena, root, w);
                    w = expect_node(r(arena, pi), "sibling");
                }

                trace.push(
                    StepCode::RbDeleteCase4,
                    format!(
                        "Case 4: Right child of sibling {} is red - Left rotation at {}",
                        value(arena, w),
                        value(arena, pi)
                    ),
                );
                let pc = color(arena, Link::Node(pi));
                set_color(arena, Link::Node(w), pc);
                set_color(arena, Link::Node(pi), Color::Black);
                let wr = r(arena, w);
                set_color(arena, wr, Color::Black);
                root = rotate_left(arena, root, pi);
                x = root;
                x_parent = Link::Nil;
            }
        } else {
            let mut w = expect_node(l(arena, pi), "sibling");
            if color(arena, Link::Node(w)) == Color::Red {
                trace.push(
                    StepCode::RbDeleteCase1,
                    format!(
                        "Case 1: Sibling {} is red - Recoloring and right rotation at {}",
                        value(arena, w),
                        value(arena, pi)
                    ),
                );
                set_color(arena, Link::Node(w), Color::Black);
                set_color(arena, Link::Node(pi), Color::Red);
                root = rotate_right(arena, root, pi);
                w = expect_node(l(arena, pi), "sibling");
            }

            let wl = l(arena, w);
            let wr = r(arena, w);
            if color(arena, wr) == Color::Black && color(arena, wl) == Color::Black {
                trace.push(
                    StepCode::RbDeleteCase2,
                    format!(
                        "Case 2: Both children of sibling {} are black - Recoloring sibling red",
                        value(arena, w)
                    ),
                );
                set_color(arena, Link::Node(w), Color::Red);
                x = Link::Node(pi);
                x_parent = p(arena, pi);
            } else {
                if color(arena, wl) == Color::Black {
                    trace.push(
                        StepCode::RbDeleteCase3,
                        format!(
                            "Case 3: Left child of sibling {} is black - Left rotation at sibling",
                            value(arena, w)
                        ),
                    );
                    set_color(arena, wr, Color::Black);
                    set_color(arena, Link::Node(w), Color::Red);
                    root = rotate_left(arena, root, w);
                    w = expect_node(l(arena, pi), "sibling");
                }

                trace.push(
                    StepCode::RbDeleteCase4,
                    format!(
                        "Case 4: Left child of sibling {} is red - Right rotation at {}",
                        value(arena, w),
                        value(arena, pi)
                    ),
                );
                let pc = color(arena, Link::Node(pi));
                set_color(arena, Link::Node(w), pc);
                set_color(arena, Link::Node(pi), Color::Black);
                let wl = l(arena, w);
                set_color(arena, wl, Color::Black);
                root = rotate_right(arena, root, pi);
                x = root;
                x_parent = Link::Nil;
            }
        }
    }

    set_color(arena, x, Color::Black);
    trace.push(StepCode::RbDeleteFixupComplete, "Delete fixup complete!");
    root
}

pub(crate) fn height<V>(arena: &RbArena<V>, link: Link) -> usize {
    match link {
        Link::Nil => 0,
        Link::Node(i) => 1 + height(arena, l(arena, i)).max(height(arena, r(arena, i))),
    }
}

pub(crate) fn black_height<V>(arena: &RbArena<V>, link: Link) -> usize {
    match link {
        Link::Nil => 0,
        Link::Node(i) => {
            let below = black_height(arena, l(arena, i)).max(black_height(arena, r(arena, i)));
            below + usize::from(arena.get(i).is_black())
        }
    }
}

pub(crate) fn count<V>(arena: &RbArena<V>, link: Link) -> usize {
    match link {
        Link::Nil => 0,
        Link::Node(i) => 1 + count(arena, l(arena, i)) + count(arena, r(arena, i)),
    }
}

pub(crate) fn inorder<V: Clone>(arena: &RbArena<V>, link: Link, out: &mut Vec<V>) {
    if let Link::Node(i) = link {
        inorder(arena, l(arena, i), out);
        out.push(value(arena, i).clone());
        inorder(arena, r(arena, i), out);
    }
}

pub(crate) fn preorder<V: Clone>(arena: &RbArena<V>, link: Link, out: &mut Vec<V>) {
    if let Link::Node(i) = link {
        out.push(value(arena, i).clone());
        preorder(arena, l(arena, i), out);
        preorder(arena, r(arena, i), out);
    }
}

pub(crate) fn postorder<V: Clone>(arena: &RbArena<V>, link: Link, out: &mut Vec<V>) {
    if let Link::Node(i) = link {
        postorder(arena, l(arena, i), out);
        postorder(arena, r(arena, i), out);
        out.push(value(arena, i).clone());
    }
}

pub(crate) fn assert_red_black_tree<V: Orderable>(arena: &RbArena<V>, root: Link) -> Result<(), String> {
    let Link::Node(root_i) = root else {
        return if arena.len() == 0 {
            Ok(())
        } else {
            Err(format!("Empty tree still holds {} nodes", arena.len()))
        };
    };

    if !p(arena, root_i).is_nil() {
        return Err("Root has parent".to_string());
    }
    if !arena.get(root_i).is_black() {
        return Err("Root is not black".to_string());
    }

    fn check<V: Orderable>(arena: &RbArena<V>, node: Link) -> Result<usize, String> {
        let Link::Node(i) = node else {
            return Ok(0);
        };
        let n = arena
            .try_get(i)
            .ok_or_else(|| format!("Dangling link to slot {i}"))?;

        for (side, child) in [("left", n.l), ("right", n.r)] {
            if let Link::Node(c) = child {
                let cn = arena
                    .try_get(c)
                    .ok_or_else(|| format!("Dangling {side} link to slot {c}"))?;
                if cn.p != node {
                    return Err(format!("Broken parent link on {side} child of {}", n.v));
                }
                if !n.is_black() && !cn.is_black() {
                    return Err(format!("Red node {} has red {side} child {}", n.v, cn.v));
                }
            }
        }

        let lh = check(arena, n.l)?;
        let rh = check(arena, n.r)?;
        if lh != rh {
            return Err(format!("Black height mismatch under {}: {lh} != {rh}", n.v));
        }
        Ok(lh + usize::from(n.is_black()))
    }

    check(arena, root)?;

    let mut values = Vec::new();
    inorder(arena, root, &mut values);
    for pair in values.windows(2) {
        if pair[1] < pair[0] {
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

/// Debug printer for red-black trees.
pub(crate) fn print<V: Display>(arena: &RbArena<V>, link: Link, tab: &str) -> String {
    match link {
        Link::Nil => "∅".to_string(),
        Link::Node(i) => {
            let n = arena.get(i);
            let left = |tab: &str| print(arena, n.l, tab);
            let right = |tab: &str| print(arena, n.r, tab);
            let children = print_binary(
                tab,
                (!n.l.is_nil()).then_some(&left as &PrintChild<'_>),
                (!n.r.is_nil()).then_some(&right as &PrintChild<'_>),
            );
            format!("{} {}{children}", n.v, n.color)
        }
    }
}
