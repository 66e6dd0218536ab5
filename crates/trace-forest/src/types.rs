//! Value, color and link types shared by both engines.

use std::fmt::{Debug, Display};

use serde::{Deserialize, Serialize};

/// A value that can live in a tree. Values double as keys.
///
/// Every implementor must be totally ordered over the values for which
/// [`Orderable::is_orderable`] returns `true`. Floats report `false` for NaN,
/// which the engines reject before touching the tree.
pub trait Orderable: PartialOrd + Clone + Debug + Display {
    fn is_orderable(&self) -> bool {
        true
    }
}

macro_rules! impl_orderable {
    ($($t:ty),* $(,)?) => {
        $(impl Orderable for $t {})*
    };
}

impl_orderable!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, char, String);

impl Orderable for f32 {
    fn is_orderable(&self) -> bool {
        !self.is_nan()
    }
}

impl Orderable for f64 {
    fn is_orderable(&self) -> bool {
        !self.is_nan()
    }
}

/// Red-black node color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Black,
}

impl Color {
    pub fn as_str(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Black => "black",
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Red-black tree link.
///
/// `Nil` is the shared sentinel leaf: always black, never holds a value, and
/// cannot be mutated. Two links are the same node iff they compare equal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Link {
    #[default]
    Nil,
    Node(u32),
}

impl Link {
    #[inline]
    pub fn is_nil(self) -> bool {
        matches!(self, Link::Nil)
    }

    #[inline]
    pub fn index(self) -> Option<u32> {
        match self {
            Link::Nil => None,
            Link::Node(i) => Some(i),
        }
    }
}

impl From<Option<u32>> for Link {
    fn from(v: Option<u32>) -> Self {
        match v {
            Some(i) => Link::Node(i),
            None => Link::Nil,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_is_not_orderable() {
        assert!(!f64::NAN.is_orderable());
        assert!(!f32::NAN.is_orderable());
        assert!(f64::INFINITY.is_orderable());
        assert!(1.5f64.is_orderable());
        assert!(42i32.is_orderable());
        assert!("abc".to_string().is_orderable());
    }

    #[test]
    fn link_identity() {
        assert_eq!(Link::Nil, Link::default());
        assert!(Link::Nil.is_nil());
        assert_ne!(Link::Node(0), Link::Nil);
        assert_eq!(Link::from(Some(3)), Link::Node(3));
        assert_eq!(Link::from(None), Link::Nil);
        assert_eq!(Link::Node(7).index(), Some(7));
        assert_eq!(Link::Nil.index(), None);
    }

    #[test]
    fn color_wire_names() {
        assert_eq!(serde_json::to_string(&Color::Red).unwrap(), "\"red\"");
        assert_eq!(serde_json::to_string(&Color::Black).unwrap(), "\"black\"");
        assert_eq!(Color::Black.to_string(), "black");
    }
}
