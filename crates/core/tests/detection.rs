mod common;

use rag_core::snapshot::error::Error;
use rag_core::{detect, detect_with, Report, Snapshot, Strategy};

const STRATEGIES: [Strategy; 2] = [Strategy::Rescan, Strategy::ReadyQueue];

/// Two processes, each holding the unit the other one wants.
#[test]
fn circular_wait_deadlocks_both() {
    let snapshot = detect(snapshot! {
        total: [1, 1],
        allocation: [[1, 0], [0, 1]],
        request: [[0, 1], [1, 0]],
    });
    assert_eq!(snapshot.finish(), [false, false]);

    let report = Report::new(&snapshot);
    assert_eq!(report.deadlocked, vec![0, 1]);
    assert!(report.deadlock_exists);
}

/// P0 fits into the single free unit; releasing it lets P1 finish too.
#[test]
fn safe_state_finishes_everyone() {
    let snapshot = detect(snapshot! {
        total: [3],
        allocation: [[1], [1]],
        request: [[1], [0]],
    });
    assert_eq!(snapshot.finish(), [true, true]);
    assert_eq!(snapshot.available(), [3]);

    let report = snapshot.report();
    assert!(report.deadlocked.is_empty());
    assert!(!report.deadlock_exists);
}

#[test]
fn over_committed_allocation_is_rejected() {
    let result = Snapshot::new(&scenario! {
        total: [1],
        allocation: [[2]],
        request: [[0]],
    });
    assert_eq!(
        result,
        Err(Error::OverCommitted {
            resource: 0,
            total: 1,
            allocated: 2,
        })
    );
}

#[test]
fn no_processes_is_not_a_deadlock() {
    for strategy in STRATEGIES {
        let mut snapshot = snapshot! {
            total: [3, 4],
            allocation: [],
            request: [],
        };
        assert!(detect_with(&mut snapshot, strategy).is_empty());
        let report = snapshot.report();
        assert!(report.deadlocked.is_empty());
        assert!(!report.deadlock_exists);
    }
}

#[test]
fn no_resources_finishes_every_process() {
    for strategy in STRATEGIES {
        let mut snapshot = snapshot! {
            total: [],
            allocation: [[], [], []],
            request: [[], [], []],
        };
        let trace = detect_with(&mut snapshot, strategy);
        assert_eq!(trace.len(), 3);
        assert_eq!(snapshot.finish(), [true, true, true]);
    }
}

#[test]
fn zero_request_always_finishes() {
    // Nothing is free, but P1 asks for nothing.
    for strategy in STRATEGIES {
        let mut snapshot = snapshot! {
            total: [2, 2],
            allocation: [[1, 1], [1, 1]],
            request: [[1, 0], [0, 0]],
        };
        detect_with(&mut snapshot, strategy);
        assert!(snapshot.is_finished(1));
        // P1 returned one unit of each class, which is exactly what P0 needed.
        assert!(snapshot.is_finished(0));
    }
}

#[test]
fn every_reduction_fits_the_available_units() {
    for strategy in STRATEGIES {
        let mut snapshot = snapshot! {
            total: [10, 5, 7],
            allocation: [[0, 1, 0], [2, 0, 0], [3, 0, 2], [2, 1, 1], [0, 0, 2]],
            request: [[0, 0, 0], [2, 0, 2], [0, 0, 0], [1, 0, 0], [0, 0, 2]],
        };
        let trace = detect_with(&mut snapshot, strategy);
        assert_eq!(trace.len(), 5);
        for step in &trace {
            assert!(
                step.request
                    .iter()
                    .zip(&step.available)
                    .all(|(request, available)| request <= available),
                "process {} reduced with request {:?} over available {:?}",
                step.process,
                step.request,
                step.available,
            );
        }
        assert_eq!(snapshot.available(), snapshot.total_units());
    }
}

#[test]
fn partial_deadlock_keeps_blocked_rows() {
    // P0 and P1 wait on each other; P2 can finish but frees nothing they need.
    for strategy in STRATEGIES {
        let mut snapshot = snapshot! {
            total: [1, 1, 2],
            allocation: [[1, 0, 0], [0, 1, 0], [0, 0, 1]],
            request: [[0, 1, 0], [1, 0, 0], [0, 0, 1]],
        };
        detect_with(&mut snapshot, strategy);
        assert_eq!(snapshot.report().deadlocked, vec![0, 1]);
        assert_eq!(snapshot.available(), [0, 0, 2]);
        assert_eq!(snapshot.allocation().row(0), [1, 0, 0]);
        assert_eq!(snapshot.request().row(1), [1, 0, 0]);
    }
}

#[test]
fn detection_is_idempotent() {
    for strategy in STRATEGIES {
        let mut snapshot = snapshot! {
            total: [3, 3],
            allocation: [[1, 1], [1, 0], [0, 2]],
            request: [[0, 3], [1, 0], [2, 0]],
        };
        detect_with(&mut snapshot, strategy);
        let first = snapshot.clone();
        let trace = detect_with(&mut snapshot, strategy);
        assert!(trace.is_empty());
        assert_eq!(snapshot, first);
    }
}

#[test]
fn strategies_produce_identical_traces() {
    let mut rescan = snapshot! {
        total: [6, 4, 3],
        allocation: [[1, 0, 1], [0, 2, 0], [2, 1, 0], [1, 0, 1], [0, 1, 0]],
        request: [[3, 1, 0], [2, 0, 1], [0, 0, 1], [4, 2, 2], [1, 0, 0]],
    };
    let mut ready_queue = rescan.clone();
    let expected = detect_with(&mut rescan, Strategy::Rescan);
    let actual = detect_with(&mut ready_queue, Strategy::ReadyQueue);
    assert_eq!(expected, actual);
    assert_eq!(rescan, ready_queue);
}
