use pretty_assertions::assert_eq;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use trace_forest::{Session, SessionConfig, StepCode, TreeKind, TreeSnapshot};

fn session_of(values: &[i32]) -> Session<i32> {
    let mut session = Session::new();
    for &v in values {
        session.insert(v).unwrap();
    }
    session
}

#[test]
fn starts_red_black_and_empty() {
    let session = Session::<i32>::new();
    assert_eq!(session.kind(), TreeKind::RedBlack);
    assert!(session.active().is_empty());
    assert_eq!(session.undo_len(), 0);
    assert_eq!(session.config(), &SessionConfig::default());
}

#[test]
fn switch_converts_when_nothing_is_saved() {
    let mut session = session_of(&[1, 2, 3, 4, 5]);
    session.switch_kind(TreeKind::Avl).unwrap();

    assert_eq!(session.kind(), TreeKind::Avl);
    assert_eq!(session.active().kind(), TreeKind::Avl);
    assert_eq!(session.active().inorder_values(), vec![1, 2, 3, 4, 5]);
    session.active().assert_valid().unwrap();
}

#[test]
fn switch_back_restores_saved_structure() {
    let mut session = session_of(&[10, 20, 30, 40]);
    let original = session.rb().serialize();

    session.switch_kind(TreeKind::Avl).unwrap();
    session.switch_kind(TreeKind::RedBlack).unwrap();

    assert_eq!(session.rb().serialize(), original);

    // Switching to the current kind does nothing.
    session.switch_kind(TreeKind::RedBlack).unwrap();
    assert_eq!(session.rb().serialize(), original);
}

#[test]
fn clear_forgets_saved_structures() {
    let mut session = session_of(&[3, 1, 2]);
    session.switch_kind(TreeKind::Avl).unwrap();
    let trace = session.clear();
    assert_eq!(trace.codes(), vec![StepCode::ClearTree]);

    session.insert(7).unwrap();
    session.switch_kind(TreeKind::RedBlack).unwrap();
    assert_eq!(session.active().inorder_values(), vec![7]);
}

#[test]
fn undo_walks_back_through_operations() {
    let mut session = session_of(&[5, 3, 8]);
    session.delete(&3).unwrap();
    session.clear();

    assert!(session.undo().unwrap());
    assert_eq!(session.active().inorder_values(), vec![5, 8]);
    assert!(session.undo().unwrap());
    assert_eq!(session.active().inorder_values(), vec![3, 5, 8]);
    assert!(session.undo().unwrap());
    assert_eq!(session.active().inorder_values(), vec![3, 5]);
}

#[test]
fn undo_returns_to_recorded_kind() {
    let mut session = session_of(&[1, 2]);
    session.switch_kind(TreeKind::Avl).unwrap();
    session.insert(3).unwrap();
    session.switch_kind(TreeKind::RedBlack).unwrap();

    assert!(session.undo().unwrap());
    assert_eq!(session.kind(), TreeKind::Avl);
    assert_eq!(session.active().inorder_values(), vec![1, 2]);
}

#[test]
fn snapshot_restore_through_json() {
    let mut session = session_of(&[9, 4, 6]);
    session.switch_kind(TreeKind::Avl).unwrap();
    let json = session.snapshot().to_json().unwrap();
    assert_eq!(json, r#"{"type":"avl","values":[4,6,9]}"#);

    let mut other = Session::new();
    other.insert(100).unwrap();
    other.restore(TreeSnapshot::from_json(&json).unwrap()).unwrap();

    assert_eq!(other.kind(), TreeKind::Avl);
    assert_eq!(other.active().inorder_values(), vec![4, 6, 9]);
    assert_eq!(other.undo_len(), 1);
}

#[test]
fn generate_random_is_reproducible_with_a_seed() {
    let mut a = Session::<i64>::new();
    let mut b = Session::<i64>::new();
    let values_a = a.generate_random(&mut Xoshiro256PlusPlus::seed_from_u64(7)).unwrap();
    let values_b = b.generate_random(&mut Xoshiro256PlusPlus::seed_from_u64(7)).unwrap();

    assert_eq!(values_a, values_b);
    assert!((5..=14).contains(&values_a.len()));
    assert!(values_a.iter().all(|v| (0..100).contains(v)));

    let mut sorted = values_a.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), values_a.len());
    assert_eq!(a.active().inorder_values(), sorted);
    a.active().assert_valid().unwrap();
}

#[test]
fn generate_random_respects_config() {
    let mut session = Session::<u32>::with_config(SessionConfig {
        undo_depth: 3,
        random_count: 20..=20,
        random_values: 0..8,
        ..SessionConfig::default()
    });
    session.switch_kind(TreeKind::Avl).unwrap();
    let values = session.generate_random(&mut Xoshiro256PlusPlus::seed_from_u64(1)).unwrap();

    // Only 8 distinct values exist in range.
    assert_eq!(values.len(), 8);
    assert_eq!(session.active().inorder_values(), (0..8).collect::<Vec<_>>());
    session.active().assert_valid().unwrap();
}
