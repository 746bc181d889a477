//! Deadlock detection by resource-allocation-graph reduction.
//!
//! A process is *reducible* when every one of its outstanding requests fits
//! in the currently available units. Reducing it models the process running
//! to completion: it is marked finished and everything it holds is returned
//! to `available`. Reduction repeats until no unfinished process is
//! reducible. Whatever is still unfinished at that point is deadlocked.
//!
//! Reducibility is monotone in `available`, and `available` only grows, so
//! the order in which reducible processes are picked never changes the final
//! `finish` vector. Both strategies below always reduce the lowest-indexed
//! reducible process, which makes their traces identical as well:
//!
//! - [`Strategy::Rescan`] scans from process 0 after every reduction.
//!   `O(n^2 * m)` in the worst case.
//! - [`Strategy::ReadyQueue`] keeps, per resource class, the waiting
//!   processes sorted by request size and only revisits the ones whose
//!   request became satisfiable. `O(n * m * log n)`.
//!
//! Every run terminates after at most `n` reductions and has no failure
//! path: all validation happens when the [`Snapshot`] is built.

use alloc::vec::Vec;

use crate::snapshot::Snapshot;

mod ready_queue;
mod rescan;

/// How the detector looks for the next reducible process.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Restart the scan from process 0 after every reduction.
    #[default]
    Rescan,
    /// Track per-class waiting lists and wake processes as units return.
    ReadyQueue,
}

/// One step of a detection run.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reduction {
    /// The process that was reduced.
    pub process: usize,
    /// Its outstanding request at the time of reduction.
    pub request: Vec<u64>,
    /// Units available just before its held units were returned.
    pub available: Vec<u64>,
}

impl Reduction {
    /// Records the reduction of `process` and applies it to `snapshot`.
    fn apply(snapshot: &mut Snapshot, process: usize) -> Self {
        let step = Self {
            process,
            request: snapshot.request().row(process).to_vec(),
            available: snapshot.available().to_vec(),
        };
        tracing::trace!(
            process,
            request = ?step.request,
            available = ?step.available,
            "reducing process"
        );
        snapshot.release(process);
        step
    }
}

/// Run detection with the default strategy and hand the snapshot back.
///
/// After the call, `snapshot.finish()[i]` is `false` exactly for the
/// deadlocked processes. See [`Report`](crate::report::Report) for the
/// summarized result.
#[must_use]
pub fn detect(mut snapshot: Snapshot) -> Snapshot {
    detect_with(&mut snapshot, Strategy::default());
    snapshot
}

/// Run detection in place and return the reductions in the order they were
/// applied.
///
/// Running it again on an already detected snapshot changes nothing and
/// returns an empty trace.
pub fn detect_with(snapshot: &mut Snapshot, strategy: Strategy) -> Vec<Reduction> {
    tracing::debug!(
        processes = snapshot.processes(),
        resources = snapshot.resources(),
        ?strategy,
        "detecting deadlock"
    );

    let trace = match strategy {
        Strategy::Rescan => rescan::reduce(snapshot),
        Strategy::ReadyQueue => ready_queue::reduce(snapshot),
    };

    tracing::debug!(
        reductions = trace.len(),
        deadlocked = snapshot.finish().iter().filter(|done| !**done).count(),
        "detection finished"
    );
    trace
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Scenario;

    fn snapshot(total: &[u64], allocation: &[&[u64]], request: &[&[u64]]) -> Snapshot {
        Snapshot::new(&Scenario::new(
            total.to_vec(),
            allocation.iter().map(|row| row.to_vec()).collect(),
            request.iter().map(|row| row.to_vec()).collect(),
        ))
        .unwrap()
    }

    const STRATEGIES: [Strategy; 2] = [Strategy::Rescan, Strategy::ReadyQueue];

    #[test]
    fn circular_wait_is_deadlocked() {
        for strategy in STRATEGIES {
            let mut s = snapshot(&[1, 1], &[&[1, 0], &[0, 1]], &[&[0, 1], &[1, 0]]);
            let trace = detect_with(&mut s, strategy);
            assert!(trace.is_empty());
            assert_eq!(s.finish(), [false, false]);
            assert_eq!(s.available(), [0, 0]);
        }
    }

    #[test]
    fn release_unblocks_the_next_process() {
        for strategy in STRATEGIES {
            let mut s = snapshot(&[3], &[&[1], &[1]], &[&[1], &[0]]);
            let trace = detect_with(&mut s, strategy);
            assert_eq!(
                trace,
                vec![
                    Reduction {
                        process: 0,
                        request: vec![1],
                        available: vec![1],
                    },
                    Reduction {
                        process: 1,
                        request: vec![0],
                        available: vec![2],
                    },
                ]
            );
            assert_eq!(s.finish(), [true, true]);
            assert_eq!(s.available(), [3]);
        }
    }

    #[test]
    fn scan_restarts_from_the_lowest_index() {
        // P2 is the only one reducible at first; releasing it unblocks P0
        // and P1, and P0 must be picked before P1.
        for strategy in STRATEGIES {
            let mut s = snapshot(
                &[4],
                &[&[1], &[1], &[2]],
                &[&[2], &[1], &[0]],
            );
            let order: Vec<_> = detect_with(&mut s, strategy)
                .into_iter()
                .map(|step| step.process)
                .collect();
            assert_eq!(order, vec![2, 0, 1]);
        }
    }

    #[test]
    fn released_rows_are_cleared() {
        for strategy in STRATEGIES {
            let mut s = snapshot(&[2, 2], &[&[1, 1], &[1, 1]], &[&[0, 0], &[3, 0]]);
            detect_with(&mut s, strategy);
            assert_eq!(s.finish(), [true, false]);
            assert_eq!(s.allocation().row(0), [0, 0]);
            assert_eq!(s.request().row(0), [0, 0]);
            assert_eq!(s.allocation().row(1), [1, 1]);
            assert_eq!(s.request().row(1), [3, 0]);
            assert_eq!(s.available(), [1, 1]);
        }
    }

    #[test]
    fn second_run_is_a_no_op() {
        for strategy in STRATEGIES {
            let mut s = snapshot(&[2, 1], &[&[1, 1], &[1, 0]], &[&[1, 0], &[0, 2]]);
            detect_with(&mut s, strategy);
            let first = s.clone();
            assert!(detect_with(&mut s, strategy).is_empty());
            assert_eq!(s, first);
        }
    }

    #[test]
    fn detect_uses_rescan() {
        let s = detect(snapshot(&[3], &[&[1], &[1]], &[&[1], &[0]]));
        assert_eq!(s.finish(), [true, true]);
    }
}
