//! Red-black and AVL trees that report every balancing decision.
//!
//! Each mutating operation returns a [`Trace`]: the ordered list of steps the
//! algorithm took (descents, rotations, recolorings, fixup cases) with a
//! stable machine-readable [`StepCode`], a human readable message and a
//! [`Severity`]. A visualizer can replay the trace without knowing anything
//! about the algorithms.
//!
//! Nodes live in an arena and link to each other by `u32` handle. The
//! red-black engine addresses children and parents through [`Link`], whose
//! `Nil` variant is the shared black sentinel; the AVL engine has no parent
//! links and uses plain `Option<u32>` children.
//!
//! # Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! [`red_black`] | [`RbTree`], CLRS insert and delete fixups |
//! [`avl`] | [`AvlTree`], recursive insert and delete with rotations |
//! [`engine`] | [`BalancedTree`] capability trait and [`TreeKind`] |
//! [`trace`] | [`Step`], [`StepCode`], [`Trace`] |
//! [`serialized`] | [`SerializedNode`] nested form and JSON helpers |
//! [`session`] | [`Session`]: undo, operation log, kind switching, random trees |
//! [`print`] | text rendering helpers |
//!
//! ```
//! use trace_forest::{BalancedTree, RbTree, StepCode};
//!
//! let mut tree = RbTree::new();
//! for v in [10, 20, 30, 15, 25, 5] {
//!     tree.insert(v).unwrap();
//! }
//! let trace = tree.delete(&99).unwrap();
//! assert_eq!(trace.codes(), vec![StepCode::RbDeleteStart, StepCode::RbDeleteNotFound]);
//! assert_eq!(tree.inorder_values(), vec![5, 10, 15, 20, 25, 30]);
//! ```

mod arena;
pub mod avl;
pub mod engine;
pub mod error;
pub mod print;
#[path = "red-black/mod.rs"]
pub mod red_black;
pub mod serialized;
pub mod session;
pub mod trace;
pub mod types;

pub use avl::AvlTree;
pub use engine::{BalancedTree, TreeKind};
pub use error::TreeError;
pub use red_black::RbTree;
pub use serialized::SerializedNode;
pub use session::{HistoryEntry, HistoryKind, Session, SessionConfig, TreeSnapshot};
pub use trace::{Severity, Step, StepCode, Trace};
pub use types::{Color, Link, Orderable};
