use std::collections::BTreeSet;

use proptest::prelude::*;
use trace_forest::{AvlTree, BalancedTree, RbTree, StepCode};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 200;

#[derive(Clone, Debug)]
enum TreeOp {
    Insert(i32),
    Delete(i32),
    Contains(i32),
}

fn tree_op_strategy() -> impl Strategy<Value = TreeOp> {
    let value = -64i32..64;
    prop_oneof![
        5 => value.clone().prop_map(TreeOp::Insert),
        3 => value.clone().prop_map(TreeOp::Delete),
        1 => value.prop_map(TreeOp::Contains),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn red_black_matches_sorted_multiset(ops in proptest::collection::vec(tree_op_strategy(), 0..TEST_SIZE)) {
        let mut tree = RbTree::new();
        let mut model: Vec<i32> = Vec::new();

        for op in ops {
            match op {
                TreeOp::Insert(v) => {
                    tree.insert(v).unwrap();
                    let at = model.partition_point(|x| *x <= v);
                    model.insert(at, v);
                }
                TreeOp::Delete(v) => {
                    let trace = tree.delete(&v).unwrap();
                    match model.binary_search(&v) {
                        Ok(at) => {
                            model.remove(at);
                            prop_assert_eq!(trace.last().map(|s| s.code), Some(StepCode::RbDeleteComplete));
                        }
                        Err(_) => {
                            prop_assert_eq!(trace.codes(), vec![StepCode::RbDeleteStart, StepCode::RbDeleteNotFound]);
                        }
                    }
                }
                TreeOp::Contains(v) => {
                    prop_assert_eq!(tree.contains(&v), model.binary_search(&v).is_ok(), "contains({})", v);
                }
            }
            if let Err(err) = tree.assert_valid() {
                prop_assert!(false, "{}\n{}", err, tree.print());
            }
            prop_assert_eq!(tree.inorder_values(), model.clone());
        }

        let n = tree.count_nodes() as f64;
        prop_assert!(tree.height() as f64 <= 2.0 * (n + 1.0).log2() + 1e-9);
    }

    #[test]
    fn avl_matches_btreeset(ops in proptest::collection::vec(tree_op_strategy(), 0..TEST_SIZE)) {
        let mut tree = AvlTree::new();
        let mut model = BTreeSet::new();

        for op in ops {
            match op {
                TreeOp::Insert(v) => {
                    let trace = tree.insert(v).unwrap();
                    let added = model.insert(v);
                    prop_assert_eq!(trace.contains(StepCode::AvlInsertDuplicate), !added, "insert({})", v);
                }
                TreeOp::Delete(v) => {
                    let trace = tree.delete(&v).unwrap();
                    let removed = model.remove(&v);
                    prop_assert_eq!(trace.contains(StepCode::AvlDeleteNotFound), !removed, "delete({})", v);
                }
                TreeOp::Contains(v) => {
                    prop_assert_eq!(tree.contains(&v), model.contains(&v), "contains({})", v);
                }
            }
            if let Err(err) = tree.assert_valid() {
                prop_assert!(false, "{}\n{}", err, tree.print());
            }
            prop_assert_eq!(tree.inorder_values(), model.iter().copied().collect::<Vec<_>>());
        }
    }

    #[test]
    fn round_trip_preserves_both_engines(values in proptest::collection::vec(-1000i32..1000, 0..100)) {
        let mut rb = RbTree::new();
        let mut avl = AvlTree::new();
        for &v in &values {
            rb.insert(v).unwrap();
            avl.insert(v).unwrap();
        }

        let mut rb_copy = RbTree::new();
        rb_copy.deserialize(rb.serialize().as_ref()).unwrap();
        prop_assert_eq!(rb_copy.serialize(), rb.serialize());
        prop_assert!(rb_copy.assert_valid().is_ok());

        let mut avl_copy = AvlTree::new();
        avl_copy.deserialize(avl.serialize().as_ref()).unwrap();
        prop_assert_eq!(avl_copy.serialize(), avl.serialize());
        prop_assert_eq!(avl_copy.height(), avl.height());
        prop_assert!(avl_copy.assert_valid().is_ok());
    }
}
