//! Owns one tree of each kind and the state around them: the active kind,
//! the undo history, a log of recent operations and the per-kind saved
//! structures used when switching.

use std::collections::VecDeque;
use std::ops::{Range, RangeInclusive};

use rand::Rng;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::avl::AvlTree;
use crate::engine::{BalancedTree, TreeKind};
use crate::error::TreeError;
use crate::red_black::RbTree;
use crate::serialized::SerializedNode;
use crate::trace::Trace;
use crate::types::Orderable;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum number of undo snapshots; the oldest is dropped first.
    pub undo_depth: usize,
    /// How many values [`Session::generate_random`] inserts.
    pub random_count: RangeInclusive<usize>,
    /// Range the random values are drawn from.
    pub random_values: Range<u16>,
    /// Maximum number of operation log entries kept.
    pub history_depth: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            undo_depth: 10,
            random_count: 5..=14,
            random_values: 0..100,
            history_depth: 20,
        }
    }
}

/// Kind and in-order contents of a tree. Rebuilding from a snapshot
/// reinserts the values, so the shape is not preserved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeSnapshot<V> {
    #[serde(rename = "type")]
    pub kind: TreeKind,
    pub values: Vec<V>,
}

impl<V: Serialize> TreeSnapshot<V> {
    pub fn to_json(&self) -> Result<String, TreeError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl<V: DeserializeOwned> TreeSnapshot<V> {
    pub fn from_json(json: &str) -> Result<Self, TreeError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    Insert,
    Delete,
    Convert,
    Clear,
}

/// One line of the operation log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub operation: String,
    pub value: Option<String>,
    #[serde(rename = "type")]
    pub kind: HistoryKind,
}

#[derive(Clone, Debug)]
pub struct Session<V> {
    rb: RbTree<V>,
    avl: AvlTree<V>,
    kind: TreeKind,
    saved_rb: Option<SerializedNode<V>>,
    saved_avl: Option<SerializedNode<V>>,
    undo: VecDeque<TreeSnapshot<V>>,
    history: VecDeque<HistoryEntry>,
    config: SessionConfig,
}

impl<V: Orderable> Default for Session<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Orderable> Session<V> {
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            rb: RbTree::new(),
            avl: AvlTree::new(),
            kind: TreeKind::RedBlack,
            saved_rb: None,
            saved_avl: None,
            undo: VecDeque::new(),
            history: VecDeque::new(),
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn kind(&self) -> TreeKind {
        self.kind
    }

    pub fn rb(&self) -> &RbTree<V> {
        &self.rb
    }

    pub fn avl(&self) -> &AvlTree<V> {
        &self.avl
    }

    pub fn active(&self) -> &dyn BalancedTree<V> {
        match self.kind {
            TreeKind::RedBlack => &self.rb,
            TreeKind::Avl => &self.avl,
        }
    }

    fn active_mut(&mut self) -> &mut dyn BalancedTree<V> {
        match self.kind {
            TreeKind::RedBlack => &mut self.rb,
            TreeKind::Avl => &mut self.avl,
        }
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    fn push_undo(&mut self, snapshot: TreeSnapshot<V>) {
        if self.config.undo_depth == 0 {
            return;
        }
        self.undo.push_back(snapshot);
        while self.undo.len() > self.config.undo_depth {
            self.undo.pop_front();
        }
    }

    /// Recent operations, newest first.
    pub fn history(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.history.iter()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn log(&mut self, operation: &str, value: Option<String>, kind: HistoryKind) {
        if self.config.history_depth == 0 {
            return;
        }
        self.history.push_front(HistoryEntry {
            operation: operation.to_string(),
            value,
            kind,
        });
        self.history.truncate(self.config.history_depth);
    }

    fn forget_saved(&mut self) {
        self.saved_rb = None;
        self.saved_avl = None;
    }

    /// Inserts into the active tree. A rejected value leaves the tree, the
    /// undo history and the log untouched.
    pub fn insert(&mut self, value: V) -> Result<Trace, TreeError> {
        let snapshot = self.snapshot();
        let shown = value.to_string();
        let trace = self.active_mut().insert(value)?;
        self.push_undo(snapshot);
        self.log("Insert", Some(shown), HistoryKind::Insert);
        Ok(trace)
    }

    pub fn delete(&mut self, value: &V) -> Result<Trace, TreeError> {
        let snapshot = self.snapshot();
        let trace = self.active_mut().delete(value)?;
        self.push_undo(snapshot);
        self.log("Delete", Some(value.to_string()), HistoryKind::Delete);
        Ok(trace)
    }

    /// Empties the active tree and forgets both saved structures.
    pub fn clear(&mut self) -> Trace {
        let snapshot = self.snapshot();
        self.push_undo(snapshot);
        self.forget_saved();
        self.log("Clear Tree", None, HistoryKind::Clear);
        self.active_mut().clear()
    }

    /// Rebuilds the tree as it was before the last recorded operation.
    /// Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> Result<bool, TreeError> {
        let Some(snapshot) = self.undo.pop_back() else {
            return Ok(false);
        };
        self.load(snapshot)?;
        debug!(remaining = self.undo.len(), "undo");
        Ok(true)
    }

    /// Makes `kind` the active engine.
    ///
    /// The outgoing tree's structure is saved first. If the incoming kind has
    /// a saved structure it is restored as is; otherwise the incoming tree is
    /// rebuilt by inserting the outgoing tree's values in order.
    pub fn switch_kind(&mut self, kind: TreeKind) -> Result<(), TreeError> {
        if kind == self.kind {
            return Ok(());
        }

        let from = self.kind;
        let state = self.active().serialize();
        match from {
            TreeKind::RedBlack => self.saved_rb = state,
            TreeKind::Avl => self.saved_avl = state,
        }
        self.kind = kind;

        let saved = match kind {
            TreeKind::RedBlack => self.saved_rb.clone(),
            TreeKind::Avl => self.saved_avl.clone(),
        };
        if let Some(saved) = saved {
            self.active_mut().deserialize(Some(&saved))?;
            self.log("Convert", Some(format!("{} Tree (restored)", kind.name())), HistoryKind::Convert);
            debug!(kind = kind.name(), "restored saved structure");
            return Ok(());
        }

        let values = match from {
            TreeKind::RedBlack => self.rb.inorder_values(),
            TreeKind::Avl => self.avl.inorder_values(),
        };
        let count = values.len();
        let target = self.active_mut();
        target.clear();
        for value in values {
            target.insert(value)?;
        }
        self.log("Convert", Some(format!("{} Tree", kind.name())), HistoryKind::Convert);
        debug!(from = from.name(), to = kind.name(), count, "converted tree");
        Ok(())
    }

    pub fn snapshot(&self) -> TreeSnapshot<V> {
        TreeSnapshot {
            kind: self.kind,
            values: self.active().inorder_values(),
        }
    }

    /// Switches to the snapshot's kind and rebuilds the tree from its values.
    /// Undo history is kept; saved structures are dropped.
    pub fn restore(&mut self, snapshot: TreeSnapshot<V>) -> Result<(), TreeError> {
        self.load(snapshot)
    }

    fn load(&mut self, snapshot: TreeSnapshot<V>) -> Result<(), TreeError> {
        self.kind = snapshot.kind;
        self.forget_saved();
        let tree = self.active_mut();
        tree.clear();
        for value in snapshot.values {
            tree.insert(value)?;
        }
        Ok(())
    }
}

impl<V: Orderable + From<u16>> Session<V> {
    /// Replaces the active tree with distinct random values.
    ///
    /// The count is clamped to the size of `random_values`. Returns the
    /// values in insertion order.
    pub fn generate_random<R: Rng>(&mut self, rng: &mut R) -> Result<Vec<V>, TreeError> {
        let snapshot = self.snapshot();
        self.push_undo(snapshot);
        self.forget_saved();
        self.active_mut().clear();

        let values = self.config.random_values.clone();
        let count = match self.config.random_count.is_empty() {
            true => 0,
            false => rng.gen_range(self.config.random_count.clone()),
        };
        let count = count.min(values.len());

        let mut picked: Vec<u16> = Vec::with_capacity(count);
        while picked.len() < count {
            let v = rng.gen_range(values.clone());
            if !picked.contains(&v) {
                picked.push(v);
            }
        }

        let picked: Vec<V> = picked.into_iter().map(V::from).collect();
        let tree = self.active_mut();
        for value in &picked {
            tree.insert(value.clone())?;
        }
        self.log("Generate Random", Some(format!("{count} nodes")), HistoryKind::Insert);
        debug!(kind = self.kind.name(), count, "generated random tree");
        Ok(picked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_depth_drops_oldest() {
        let mut session = Session::with_config(SessionConfig {
            undo_depth: 2,
            ..SessionConfig::default()
        });
        for v in [1, 2, 3] {
            session.insert(v).unwrap();
        }
        assert_eq!(session.undo_len(), 2);
        assert!(session.undo().unwrap());
        assert_eq!(session.active().inorder_values(), vec![1, 2]);
        assert!(session.undo().unwrap());
        assert_eq!(session.active().inorder_values(), vec![1]);
        assert!(!session.undo().unwrap());
    }

    #[test]
    fn rejected_value_leaves_no_undo_entry() {
        let mut session = Session::<f64>::new();
        session.insert(1.5).unwrap();
        assert!(session.insert(f64::NAN).is_err());
        assert_eq!(session.undo_len(), 1);
    }

    #[test]
    fn rejected_value_keeps_full_undo_stack() {
        let mut session = Session::with_config(SessionConfig {
            undo_depth: 2,
            ..SessionConfig::default()
        });
        session.insert(1.0).unwrap();
        session.insert(2.0).unwrap();
        assert!(session.insert(f64::NAN).is_err());
        assert!(session.delete(&f64::NAN).is_err());
        assert_eq!(session.undo_len(), 2);
        assert_eq!(session.history().count(), 2);

        assert!(session.undo().unwrap());
        assert_eq!(session.active().inorder_values(), vec![1.0]);
        assert!(session.undo().unwrap());
        assert!(session.active().inorder_values().is_empty());
        assert!(!session.undo().unwrap());
    }

    #[test]
    fn history_is_newest_first_and_bounded() {
        let mut session = Session::with_config(SessionConfig {
            history_depth: 3,
            ..SessionConfig::default()
        });
        for v in [4, 2, 6] {
            session.insert(v).unwrap();
        }
        session.delete(&2).unwrap();

        let entries: Vec<_> = session.history().cloned().collect();
        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries[0],
            HistoryEntry {
                operation: "Delete".to_string(),
                value: Some("2".to_string()),
                kind: HistoryKind::Delete,
            }
        );
        assert_eq!(entries[2].value.as_deref(), Some("2"));

        session.switch_kind(TreeKind::Avl).unwrap();
        session.clear();
        let entries: Vec<_> = session.history().map(|e| (e.operation.as_str(), e.kind)).collect();
        assert_eq!(
            entries,
            vec![
                ("Clear Tree", HistoryKind::Clear),
                ("Convert", HistoryKind::Convert),
                ("Delete", HistoryKind::Delete),
            ]
        );

        session.clear_history();
        assert_eq!(session.history().count(), 0);
    }

    #[test]
    fn snapshot_json_uses_type_key() {
        let snapshot = TreeSnapshot {
            kind: TreeKind::Avl,
            values: vec![1, 2],
        };
        assert_eq!(snapshot.to_json().unwrap(), r#"{"type":"avl","values":[1,2]}"#);
        assert_eq!(TreeSnapshot::<i32>::from_json(r#"{"type":"avl","values":[1,2]}"#).unwrap(), snapshot);
    }
}
