//! Behavioral tests for the alert store's snapshot and notification contract

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use taas::alerting::{AlertStore, Listener, SeverityCounts};
use taas::models::{NewAlert, Severity};

fn fields(title: &str, severity: Severity) -> NewAlert {
    NewAlert::new(severity, "Test Rig #1", "rig-001", title, "Synthetic alert")
}

fn listener(hits: &Arc<AtomicUsize>) -> Listener {
    let hits = Arc::clone(hits);
    Arc::new(move || {
        hits.fetch_add(1, Ordering::SeqCst);
    })
}

#[test]
fn seeded_scenario_acknowledge_then_clear() {
    let store = AlertStore::new();
    let hits = Arc::new(AtomicUsize::new(0));
    let _sub = store.subscribe(listener(&hits));

    let seeded = store.snapshot();
    assert_eq!(seeded.len(), 5);
    assert_eq!(store.unacknowledged_count(), 3);

    let first_critical = seeded
        .iter()
        .find(|a| a.severity == Severity::Critical)
        .cloned()
        .unwrap();
    assert_eq!(first_critical.id, "alert-001");

    store.acknowledge_alert(&first_critical.id);
    let acked = store.snapshot();
    assert_eq!(store.unacknowledged_count(), 2);
    assert!(acked[0].acknowledged);
    for (before, after) in seeded.iter().zip(acked.iter()).skip(1) {
        assert_eq!(before.acknowledged, after.acknowledged);
    }

    store.clear_alert(&first_critical.id);
    let cleared = store.snapshot();
    assert_eq!(cleared.len(), 4);
    assert!(cleared.iter().all(|a| a.id != first_critical.id));
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[test]
fn snapshot_is_reference_stable_between_mutations() {
    let store = AlertStore::new();
    store.initialize();

    let a = store.snapshot();
    let b = store.snapshot();
    assert!(Arc::ptr_eq(&a, &b));

    store.add_alert(fields("Spindle Overload", Severity::Warning));
    let c = store.snapshot();
    assert!(!Arc::ptr_eq(&b, &c));
    assert_eq!(b.len(), 5);
    assert!(Arc::ptr_eq(&c, &store.snapshot()));
}

#[test]
fn every_subscriber_notified_once_per_mutation() {
    let store = AlertStore::unseeded();
    let counters: Vec<Arc<AtomicUsize>> = (0..4).map(|_| Arc::new(AtomicUsize::new(0))).collect();
    let subs: Vec<_> = counters.iter().map(|c| store.subscribe(listener(c))).collect();

    store.add_alert(fields("Belt Slip", Severity::Info));
    for counter in &counters {
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    let mut subs = subs.into_iter();
    assert!(subs.next().unwrap().unsubscribe());
    store.add_alert(fields("Belt Slip", Severity::Info));

    assert_eq!(counters[0].load(Ordering::SeqCst), 1);
    for counter in &counters[1..] {
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }
}

#[test]
fn shared_listener_handle_registers_once() {
    let store = AlertStore::unseeded();
    let hits = Arc::new(AtomicUsize::new(0));
    let shared: Listener = listener(&hits);

    let first = store.subscribe(Arc::clone(&shared));
    let _again = store.subscribe(shared);
    assert_eq!(store.listener_count(), 1);

    store.add_alert(fields("Coolant Low", Severity::Warning));
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    assert!(first.unsubscribe());
    assert_eq!(store.listener_count(), 0);
}

#[test]
fn acknowledge_twice_is_idempotent() {
    let store = AlertStore::new();
    let hits = Arc::new(AtomicUsize::new(0));
    let _sub = store.subscribe(listener(&hits));

    store.acknowledge_alert("alert-002");
    let once = store.snapshot();
    store.acknowledge_alert("alert-002");
    let twice = store.snapshot();

    assert_eq!(*once, *twice);
    assert_eq!(store.unacknowledged_count(), 2);
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[test]
fn ids_are_never_reused_after_clear() {
    let store = AlertStore::unseeded();
    let mut seen = HashSet::new();

    for _ in 0..200 {
        let alert = store.add_alert(fields("Cycle", Severity::Info));
        assert!(seen.insert(alert.id.clone()));
        store.clear_alert(&alert.id);
    }
    assert!(store.snapshot().is_empty());
}

#[test]
fn concurrent_writers_lose_nothing() {
    let store = AlertStore::unseeded();
    let hits = Arc::new(AtomicUsize::new(0));
    let _sub = store.subscribe(listener(&hits));

    let workers: Vec<_> = (0..4)
        .map(|w| {
            let store = store.clone();
            std::thread::spawn(move || {
                for i in 0..50 {
                    store.add_alert(fields(&format!("w{w}-{i}"), Severity::Warning));
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(store.snapshot().len(), 200);
    assert_eq!(hits.load(Ordering::SeqCst), 200);
}

#[derive(Debug, Clone)]
enum Op {
    Add(Severity),
    Ack(usize),
    Clear(usize),
    AckMissing,
}

fn op() -> impl Strategy<Value = Op> {
    let severity = prop_oneof![
        Just(Severity::Critical),
        Just(Severity::Warning),
        Just(Severity::Info)
    ];
    prop_oneof![
        severity.prop_map(Op::Add),
        (0usize..16).prop_map(Op::Ack),
        (0usize..16).prop_map(Op::Clear),
        Just(Op::AckMissing),
    ]
}

proptest! {
    #[test]
    fn adds_prepend_and_preserve_order(titles in prop::collection::vec("[a-z]{1,8}", 1..24)) {
        let store = AlertStore::unseeded();
        let mut expected: Vec<String> = Vec::new();

        for title in &titles {
            let alert = store.add_alert(fields(title, Severity::Info));
            expected.insert(0, alert.id.clone());

            let snapshot = store.snapshot();
            prop_assert_eq!(&snapshot[0].id, &alert.id);
            let ids: Vec<String> = snapshot.iter().map(|a| a.id.clone()).collect();
            prop_assert_eq!(&ids, &expected);
        }
    }

    #[test]
    fn unacknowledged_count_matches_snapshot(ops in prop::collection::vec(op(), 0..48)) {
        let store = AlertStore::new();
        store.initialize();

        for op in ops {
            let snapshot = store.snapshot();
            let before = snapshot.len();
            match op {
                Op::Add(severity) => {
                    store.add_alert(fields("generated", severity));
                    prop_assert_eq!(store.snapshot().len(), before + 1);
                }
                Op::Ack(idx) => {
                    if let Some(target) = snapshot.get(idx) {
                        store.acknowledge_alert(&target.id);
                    }
                }
                Op::Clear(idx) => {
                    if let Some(target) = snapshot.get(idx) {
                        store.clear_alert(&target.id);
                        let after = store.snapshot();
                        prop_assert_eq!(after.len(), before - 1);
                        let remaining: Vec<&str> = after.iter().map(|a| a.id.as_str()).collect();
                        let expected: Vec<&str> = snapshot
                            .iter()
                            .filter(|a| a.id != target.id)
                            .map(|a| a.id.as_str())
                            .collect();
                        prop_assert_eq!(remaining, expected);
                    } else {
                        store.clear_alert("alert-missing");
                        prop_assert_eq!(store.snapshot().len(), before);
                    }
                }
                Op::AckMissing => {
                    store.acknowledge_alert("alert-missing");
                    prop_assert!(Arc::ptr_eq(&snapshot, &store.snapshot()));
                }
            }

            let current = store.snapshot();
            let manual = current.iter().filter(|a| !a.acknowledged).count();
            prop_assert_eq!(store.unacknowledged_count(), manual);
            prop_assert_eq!(SeverityCounts::from_alerts(&current).unacknowledged, manual);
        }
    }
}
