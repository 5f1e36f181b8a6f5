use std::{cell::RefCell, rc::Rc};

use fintrack_core::{
    ChangeEvent, ChangeKind, CoreError, KeyValueStore, Ledger, MemoryStore, Tracker,
};
use fintrack_domain::TransactionKind;

/// Small deterministic generator so the sequences are reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn below(&mut self, bound: u64) -> u64 {
        self.next() % bound
    }

    fn cents(&mut self, max_whole: u64) -> f64 {
        (self.below(max_whole * 100) as f64) / 100.0
    }
}

fn run_random_sequence(seed: u64, steps: usize) -> Tracker<MemoryStore> {
    let mut rng = Lcg(seed);
    let mut tracker = Tracker::open(MemoryStore::new());
    tracker.set_initial_balance(500.0).expect("seed balance");

    for step in 0..steps {
        let len = tracker.ledger().len();
        let outcome = match rng.below(10) {
            0 => tracker.set_initial_balance(rng.cents(1_000)).map(|_| ()),
            1..=4 => tracker
                .add_transaction(TransactionKind::Credit, rng.cents(300), "income")
                .map(|_| ()),
            5..=6 => tracker
                .add_transaction(TransactionKind::Debit, rng.cents(400), "expense")
                .map(|_| ()),
            7..=8 => {
                let index = rng.below(len as u64 + 2) as usize;
                tracker
                    .edit_transaction(index, rng.cents(250), "edited")
                    .map(|_| ())
            }
            _ => {
                let index = rng.below(len as u64 + 2) as usize;
                tracker.delete_transaction(index).map(|_| ())
            }
        };

        match outcome {
            Ok(()) => {}
            Err(CoreError::InsufficientBalance { .. }) | Err(CoreError::IndexOutOfRange { .. }) => {}
            Err(other) => panic!("step {step}: unexpected error {other}"),
        }
        assert!(
            tracker.ledger().is_consistent(),
            "balance drifted at step {step}: {:?}",
            tracker.snapshot()
        );
    }
    tracker
}

#[test]
fn balance_stays_consistent_across_random_sequences() {
    for seed in [1, 7, 42, 2024, 99_991] {
        run_random_sequence(seed, 400);
    }
}

#[test]
fn reopened_tracker_matches_after_random_sequences() {
    for seed in [3, 11, 500] {
        let tracker = run_random_sequence(seed, 250);
        let expected = tracker.snapshot();

        let reopened = Tracker::open(tracker.into_store());
        let actual = reopened.snapshot();
        assert_eq!(actual.transactions, expected.transactions);
        assert_eq!(actual.current_balance, expected.current_balance);
        assert!(reopened.ledger().is_consistent());
    }
}

#[test]
fn handlers_see_each_committed_change() {
    let seen: Rc<RefCell<Vec<ChangeEvent>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);

    let mut tracker = Tracker::open(MemoryStore::new());
    tracker.subscribe(move |event: &ChangeEvent| sink.borrow_mut().push(event.clone()));

    tracker.set_initial_balance(100.0).unwrap();
    tracker
        .add_transaction(TransactionKind::Credit, 50.0, "salary")
        .unwrap();
    let _ = tracker.add_transaction(TransactionKind::Debit, 1_000.0, "yacht");
    tracker.edit_transaction(0, 20.0, "gift").unwrap();
    tracker.set_goal(100.0).unwrap();
    tracker.delete_transaction(0).unwrap();

    let events = seen.borrow();
    let kinds: Vec<ChangeKind> = events.iter().map(|event| event.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ChangeKind::BalanceReset,
            ChangeKind::TransactionAdded { index: 0 },
            ChangeKind::TransactionEdited { index: 0 },
            ChangeKind::GoalSet,
            ChangeKind::TransactionDeleted { index: 0 },
        ]
    );
    let goal_event = &events[3];
    assert_eq!(goal_event.snapshot.current_balance, 120.0);
    assert_eq!(goal_event.goal, Some(100.0));
    assert_eq!(goal_event.split.achieved, 100.0);
    assert_eq!(events.last().unwrap().snapshot.current_balance, 100.0);
}

struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&mut self, key: &str, _value: &str) -> Result<(), CoreError> {
        Err(CoreError::Storage(format!("cannot write `{key}`")))
    }
}

#[test]
fn storage_failures_surface_but_keep_memory_state() {
    let mut tracker = Tracker::open(FailingStore);
    let err = tracker.set_initial_balance(25.0).unwrap_err();
    assert!(matches!(err, CoreError::Storage(_)));
    assert!(!err.is_user_error());
    assert_eq!(tracker.ledger().current_balance(), 25.0);
}

#[test]
fn ledger_rehydrates_from_browser_style_payload() {
    let store = MemoryStore::new()
        .with_entry(
            "transactions",
            r#"[{"type":"add","amount":50,"description":"salary"},{"type":"subtract","amount":30,"description":"food"}]"#,
        )
        .with_entry("balance", "120");
    let ledger = Ledger::rehydrate(&store);
    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger.current_balance(), 120.0);
    assert_eq!(ledger.initial_balance(), 100.0);
}
