//! Plain nested-node form used for state transfer.
//!
//! ```
//! use trace_forest::{BalancedTree, RbTree, SerializedNode};
//!
//! let mut tree = RbTree::<i32>::new();
//! tree.insert(1).unwrap();
//! tree.insert(2).unwrap();
//!
//! let json = SerializedNode::to_json(tree.serialize().as_ref()).unwrap();
//! assert_eq!(
//!     json,
//!     r#"{"value":1,"color":"black","left":null,"right":{"value":2,"color":"red","left":null,"right":null}}"#
//! );
//! ```

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::TreeError;
use crate::types::Color;

/// One node of the serialized tree.
///
/// `color` is present only for red-black output. `None` children stand for
/// the sentinel (red-black) or an absent child (AVL).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SerializedNode<V> {
    pub value: V,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    pub left: Option<Box<SerializedNode<V>>>,
    pub right: Option<Box<SerializedNode<V>>>,
}

impl<V> SerializedNode<V> {
    pub fn leaf(value: V) -> Self {
        Self {
            value,
            color: None,
            left: None,
            right: None,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_left(mut self, left: SerializedNode<V>) -> Self {
        self.left = Some(Box::new(left));
        self
    }

    pub fn with_right(mut self, right: SerializedNode<V>) -> Self {
        self.right = Some(Box::new(right));
        self
    }

    pub fn count(&self) -> usize {
        1 + self.left.as_ref().map_or(0, |n| n.count()) + self.right.as_ref().map_or(0, |n| n.count())
    }
}

impl<V: Serialize> SerializedNode<V> {
    /// Empty trees serialize to `null`.
    pub fn to_json(node: Option<&SerializedNode<V>>) -> Result<String, TreeError> {
        Ok(serde_json::to_string(&node)?)
    }
}

impl<V: DeserializeOwned> SerializedNode<V> {
    pub fn from_json(json: &str) -> Result<Option<SerializedNode<V>>, TreeError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_color_is_omitted() {
        let node = SerializedNode::leaf(2).with_left(SerializedNode::leaf(1));
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({"value": 2, "left": {"value": 1, "left": null, "right": null}, "right": null})
        );
        assert_eq!(node.count(), 2);
    }

    #[test]
    fn empty_tree_is_null() {
        assert_eq!(SerializedNode::<i32>::to_json(None).unwrap(), "null");
        assert_eq!(SerializedNode::<i32>::from_json("null").unwrap(), None);
    }

    #[test]
    fn parses_colored_nodes() {
        let node = SerializedNode::<f64>::from_json(
            r#"{"value": 20, "color": "black", "left": {"value": 10, "color": "red", "left": null, "right": null}, "right": null}"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(node.value, 20.0);
        assert_eq!(node.color, Some(Color::Black));
        assert_eq!(node.left.as_ref().unwrap().color, Some(Color::Red));
        assert!(node.right.is_none());
    }

    #[test]
    fn bad_json_is_an_error() {
        let err = SerializedNode::<i32>::from_json("{").unwrap_err();
        assert!(matches!(err, TreeError::Json(_)));
    }
}
