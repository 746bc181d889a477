use alloc::collections::BTreeSet;
use alloc::vec;
use alloc::vec::Vec;

use super::Reduction;
use crate::snapshot::Snapshot;

/// Worklist variant of the reduction.
///
/// `unmet[p]` counts the classes whose request from `p` exceeds the units
/// available. `waiting[r]` lists `(request, process)` pairs for class `r`
/// that were unmet at the start, sorted by request, and `cursor[r]` marks
/// how many of them have been satisfied since. Since `available` only grows,
/// each cursor only moves forward, and a process becomes reducible exactly
/// when its `unmet` count reaches zero.
///
/// `ready` holds every reducible unfinished process. Taking its minimum
/// reproduces the order of the rescanning strategy.
pub(super) fn reduce(snapshot: &mut Snapshot) -> Vec<Reduction> {
    let processes = snapshot.processes();
    let resources = snapshot.resources();

    let mut unmet = vec![0usize; processes];
    let mut waiting: Vec<Vec<(u64, usize)>> = vec![Vec::new(); resources];
    for process in (0..processes).filter(|&process| !snapshot.is_finished(process)) {
        let requests = snapshot.request().row(process);
        for (resource, (&request, &available)) in
            requests.iter().zip(snapshot.available()).enumerate()
        {
            if request > available {
                unmet[process] += 1;
                waiting[resource].push((request, process));
            }
        }
    }
    for list in &mut waiting {
        list.sort_unstable();
    }

    let mut cursor = vec![0usize; resources];
    let mut ready: BTreeSet<usize> = (0..processes)
        .filter(|&process| !snapshot.is_finished(process) && unmet[process] == 0)
        .collect();

    let mut trace = Vec::new();
    while let Some(process) = ready.pop_first() {
        trace.push(Reduction::apply(snapshot, process));

        for (resource, list) in waiting.iter().enumerate() {
            let available = snapshot.available()[resource];
            while let Some(&(request, waiter)) = list.get(cursor[resource]) {
                if request > available {
                    break;
                }
                cursor[resource] += 1;
                unmet[waiter] -= 1;
                if unmet[waiter] == 0 {
                    ready.insert(waiter);
                }
            }
        }
    }
    trace
}
