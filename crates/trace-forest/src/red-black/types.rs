use crate::types::{Color, Link};

/// Red-black tree node.
///
/// Every link is either a real node or the sentinel [`Link::Nil`]; `p` is a
/// back reference only and never owns anything.
#[derive(Clone, Debug)]
pub struct RbNode<V> {
    pub p: Link,
    pub l: Link,
    pub r: Link,
    pub v: V,
    pub color: Color,
}

impl<V> RbNode<V> {
    /// New nodes start red with both children at the sentinel.
    pub fn new(v: V, p: Link) -> Self {
        Self {
            p,
            l: Link::Nil,
            r: Link::Nil,
            v,
            color: Color::Red,
        }
    }

    #[inline]
    pub fn is_black(&self) -> bool {
        self.color == Color::Black
    }
}
