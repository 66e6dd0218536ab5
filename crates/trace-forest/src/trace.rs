//! Step records emitted by every mutating operation.
//!
//! A [`Trace`] is an append-only list of [`Step`]s in the exact order the
//! algorithm made its decisions. Engines thread one `&mut Trace` through the
//! whole operation, including recursive calls, and hand it back to the
//! caller once the tree is in a valid state again.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Success,
    Error,
}

macro_rules! step_codes {
    ($($variant:ident => $wire:literal, $severity:ident;)*) => {
        /// Stable machine-readable step identifiers.
        ///
        /// The wire strings are part of the public contract; visualizers match
        /// on them.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum StepCode {
            $(
                #[serde(rename = $wire)]
                $variant,
            )*
        }

        impl StepCode {
            pub const ALL: &'static [StepCode] = &[$(StepCode::$variant),*];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(StepCode::$variant => $wire,)*
                }
            }

            /// Severity the engines attach to this code.
            pub fn severity(self) -> Severity {
                match self {
                    $(StepCode::$variant => Severity::$severity,)*
                }
            }
        }
    };
}

step_codes! {
    RbInsertStart => "RB_INSERT_START", Info;
    RbInsertRoot => "RB_INSERT_ROOT", Success;
    RbInsertPlaceLeft => "RB_INSERT_PLACE_LEFT", Info;
    RbInsertPlaceRight => "RB_INSERT_PLACE_RIGHT", Info;
    RbInsertFixupStart => "RB_INSERT_FIXUP_START", Warning;
    RbInsertCase1 => "RB_INSERT_CASE_1", Info;
    RbInsertCase2 => "RB_INSERT_CASE_2", Info;
    RbInsertCase3 => "RB_INSERT_CASE_3", Info;
    RbInsertComplete => "RB_INSERT_COMPLETE", Success;
    RbDeleteStart => "RB_DELETE_START", Info;
    RbDeleteNotFound => "RB_DELETE_NOT_FOUND", Error;
    RbDeleteNodeOneChild => "RB_DELETE_NODE_ONE_CHILD", Info;
    RbDeleteNodeTwoChildren => "RB_DELETE_NODE_TWO_CHILDREN", Info;
    RbDeleteFixupStart => "RB_DELETE_FIXUP_START", Warning;
    RbDeleteNoFixup => "RB_DELETE_NO_FIXUP", Success;
    RbDeleteCase1 => "RB_DELETE_CASE_1", Info;
    RbDeleteCase2 => "RB_DELETE_CASE_2", Info;
    RbDeleteCase3 => "RB_DELETE_CASE_3", Info;
    RbDeleteCase4 => "RB_DELETE_CASE_4", Info;
    RbDeleteFixupComplete => "RB_DELETE_FIXUP_COMPLETE", Success;
    RbDeleteComplete => "RB_DELETE_COMPLETE", Success;
    AvlInsertStart => "AVL_INSERT_START", Info;
    AvlInsertCreateNode => "AVL_INSERT_CREATE_NODE", Info;
    AvlInsertGoLeft => "AVL_INSERT_GO_LEFT", Info;
    AvlInsertGoRight => "AVL_INSERT_GO_RIGHT", Info;
    AvlInsertDuplicate => "AVL_INSERT_DUPLICATE", Info;
    AvlInsertCheckBalance => "AVL_INSERT_CHECK_BALANCE", Info;
    AvlInsertLlCase => "AVL_INSERT_LL_CASE", Warning;
    AvlInsertRrCase => "AVL_INSERT_RR_CASE", Warning;
    AvlInsertLrCase => "AVL_INSERT_LR_CASE", Warning;
    AvlInsertRlCase => "AVL_INSERT_RL_CASE", Warning;
    AvlInsertComplete => "AVL_INSERT_COMPLETE", Success;
    AvlDeleteStart => "AVL_DELETE_START", Info;
    AvlDeleteNotFound => "AVL_DELETE_NOT_FOUND", Error;
    AvlDeleteGoLeft => "AVL_DELETE_GO_LEFT", Info;
    AvlDeleteGoRight => "AVL_DELETE_GO_RIGHT", Info;
    AvlDeleteRemoveLeaf => "AVL_DELETE_REMOVE_LEAF", Info;
    AvlDeleteReplaceWithChild => "AVL_DELETE_REPLACE_WITH_CHILD", Info;
    AvlDeleteReplaceWithSuccessor => "AVL_DELETE_REPLACE_WITH_SUCCESSOR", Info;
    AvlDeleteCheckBalance => "AVL_DELETE_CHECK_BALANCE", Info;
    AvlDeleteLlCase => "AVL_DELETE_LL_CASE", Warning;
    AvlDeleteLrCase => "AVL_DELETE_LR_CASE", Warning;
    AvlDeleteRrCase => "AVL_DELETE_RR_CASE", Warning;
    AvlDeleteRlCase => "AVL_DELETE_RL_CASE", Warning;
    AvlDeleteComplete => "AVL_DELETE_COMPLETE", Success;
    ClearTree => "CLEAR_TREE", Success;
}

impl StepCode {
    /// Whether this step reports a change to the tree's shape or colors.
    ///
    /// Start markers, descent steps, balance checks, completion markers and
    /// failures are narrative only.
    pub fn is_structural(self) -> bool {
        use StepCode::*;
        matches!(
            self,
            RbInsertRoot
                | RbInsertPlaceLeft
                | RbInsertPlaceRight
                | RbInsertCase1
                | RbInsertCase2
                | RbInsertCase3
                | RbDeleteNodeOneChild
                | RbDeleteNodeTwoChildren
                | RbDeleteCase1
                | RbDeleteCase2
                | RbDeleteCase3
                | RbDeleteCase4
                | AvlInsertCreateNode
                | AvlInsertLlCase
                | AvlInsertRrCase
                | AvlInsertLrCase
                | AvlInsertRlCase
                | AvlDeleteRemoveLeaf
                | AvlDeleteReplaceWithChild
                | AvlDeleteReplaceWithSuccessor
                | AvlDeleteLlCase
                | AvlDeleteLrCase
                | AvlDeleteRrCase
                | AvlDeleteRlCase
                | ClearTree
        )
    }
}

impl fmt::Display for StepCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub code: StepCode,
    pub message: String,
    pub severity: Severity,
}

impl Step {
    pub fn new(code: StepCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            severity: code.severity(),
        }
    }
}

/// Ordered record of one operation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trace {
    steps: Vec<Step>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, code: StepCode, message: impl Into<String>) {
        let step = Step::new(code, message);
        tracing::trace!(code = step.code.as_str(), message = %step.message, "step");
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }

    pub fn codes(&self) -> Vec<StepCode> {
        self.steps.iter().map(|s| s.code).collect()
    }

    pub fn contains(&self, code: StepCode) -> bool {
        self.steps.iter().any(|s| s.code == code)
    }

    pub fn count(&self, code: StepCode) -> usize {
        self.steps.iter().filter(|s| s.code == code).count()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter().filter(|s| s.severity == Severity::Error)
    }

    /// Whether any step in this trace changed the tree.
    pub fn is_structural(&self) -> bool {
        self.steps.iter().any(|s| s.code.is_structural())
    }

    pub fn into_steps(self) -> Vec<Step> {
        self.steps
    }
}

impl IntoIterator for Trace {
    type Item = Step;
    type IntoIter = std::vec::IntoIter<Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_names_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for code in StepCode::ALL {
            assert!(seen.insert(code.as_str()), "duplicate code {code}");
        }
    }

    #[test]
    fn serde_uses_wire_names() {
        for code in StepCode::ALL {
            let s = serde_json::to_value(code).unwrap();
            assert_eq!(s, json!(code.as_str()));
            let back: StepCode = serde_json::from_value(s).unwrap();
            assert_eq!(back, *code);
        }
    }

    #[test]
    fn trace_serializes_as_plain_array() {
        let mut trace = Trace::new();
        trace.push(StepCode::RbDeleteStart, "Deleting value 3");
        trace.push(StepCode::RbDeleteNotFound, "Value 3 not found");
        assert_eq!(
            serde_json::to_value(&trace).unwrap(),
            json!([
                {"code": "RB_DELETE_START", "message": "Deleting value 3", "severity": "info"},
                {"code": "RB_DELETE_NOT_FOUND", "message": "Value 3 not found", "severity": "error"},
            ])
        );
        assert_eq!(trace.errors().count(), 1);
        assert!(!trace.is_structural());
    }
}
