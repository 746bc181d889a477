use alloc::vec::Vec;

use super::Reduction;
use crate::snapshot::Snapshot;

/// Reduce the first reducible unfinished process, then start over from
/// process 0. Stops after a full pass finds nothing to reduce.
pub(super) fn reduce(snapshot: &mut Snapshot) -> Vec<Reduction> {
    let mut trace = Vec::new();
    while let Some(process) = (0..snapshot.processes())
        .find(|&process| !snapshot.is_finished(process) && snapshot.is_reducible(process))
    {
        trace.push(Reduction::apply(snapshot, process));
    }
    trace
}
