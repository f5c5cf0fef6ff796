//! Property tests for the Goal Store under arbitrary action sequences.

use leagues_core::{GoalStore, LocalBackend, LocalStore};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Create(String),
    Delete(usize),
    Select(usize),
    Log(usize, u64),
    Rename(usize, String),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        "[a-z]{1,8}".prop_map(Op::Create),
        (0usize..8).prop_map(Op::Delete),
        (0usize..8).prop_map(Op::Select),
        ((0usize..8), 0u64..10_000).prop_map(|(i, d)| Op::Log(i, d)),
        ((0usize..8), "[A-Z][a-z]{0,6}").prop_map(|(i, n)| Op::Rename(i, n)),
    ]
}

fn id_at(store: &GoalStore, index: usize) -> String {
    let goals = store.list();
    goals[index % goals.len()].id.clone()
}

fn apply(store: &mut GoalStore, op: &Op) {
    match op {
        Op::Create(name) => {
            store.create(name).unwrap();
        }
        Op::Delete(i) => {
            let id = id_at(store, *i);
            store.delete(&id).unwrap();
        }
        Op::Select(i) => {
            let id = id_at(store, *i);
            store.select(&id).unwrap();
        }
        Op::Log(i, secs) => {
            let id = id_at(store, *i);
            assert!(store.append_log(&id, *secs, "").unwrap());
        }
        Op::Rename(i, name) => {
            let id = id_at(store, *i);
            store.rename(&id, name).unwrap();
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// There is always at least one goal and the pointer names one of them.
    #[test]
    fn prop_never_empty_and_pointer_valid(ops in prop::collection::vec(arb_op(), 0..40)) {
        let local = LocalStore::open_memory().unwrap();
        let mut store = GoalStore::open(Box::new(LocalBackend::new(local))).unwrap();

        for op in &ops {
            apply(&mut store, op);
            prop_assert!(!store.list().is_empty());
            let current = store.current_id().unwrap();
            prop_assert!(store.get(current).is_some());
        }
    }

    /// A goal's total always equals the sum of its logs.
    #[test]
    fn prop_total_matches_logs(ops in prop::collection::vec(arb_op(), 0..40)) {
        let local = LocalStore::open_memory().unwrap();
        let mut store = GoalStore::open(Box::new(LocalBackend::new(local))).unwrap();

        for op in &ops {
            apply(&mut store, op);
        }
        for goal in store.list() {
            let sum: u64 = goal.logs.iter().map(|l| l.duration_sec).sum();
            prop_assert_eq!(goal.total_time, sum);
        }
    }

    /// Whatever was written can be read back unchanged.
    #[test]
    fn prop_reload_matches_memory(ops in prop::collection::vec(arb_op(), 0..25)) {
        let local = LocalStore::open_memory().unwrap();
        let mut store = GoalStore::open(Box::new(LocalBackend::new(local.clone()))).unwrap();
        for op in &ops {
            apply(&mut store, op);
        }

        let reopened = GoalStore::open(Box::new(LocalBackend::new(local))).unwrap();
        prop_assert_eq!(reopened.snapshot(), store.snapshot());
    }
}
