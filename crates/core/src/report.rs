//! Summary of a finished detection run.

use alloc::vec::Vec;
use core::fmt::{Display, Formatter};

use crate::snapshot::Snapshot;

/// Which processes are deadlocked, and whether any are.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "schemars", derive(::schemars::JsonSchema))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Indices of unfinished processes, ascending.
    pub deadlocked: Vec<usize>,
    /// `true` iff `deadlocked` is non-empty.
    pub deadlock_exists: bool,
}

impl Report {
    /// Reads the `finish` vector of `snapshot`. Meaningful only after
    /// detection has run on it.
    #[must_use]
    pub fn new(snapshot: &Snapshot) -> Self {
        let deadlocked: Vec<usize> = snapshot
            .finish()
            .iter()
            .enumerate()
            .filter(|(_, finished)| !**finished)
            .map(|(process, _)| process)
            .collect();
        Self {
            deadlock_exists: !deadlocked.is_empty(),
            deadlocked,
        }
    }
}

impl From<&Snapshot> for Report {
    fn from(snapshot: &Snapshot) -> Self {
        Self::new(snapshot)
    }
}

impl Snapshot {
    /// Shorthand for [`Report::new`].
    #[must_use]
    pub fn report(&self) -> Report {
        Report::new(self)
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str("Deadlocked processes:")?;
        if self.deadlocked.is_empty() {
            f.write_str(" none")?;
        }
        for process in &self.deadlocked {
            write!(f, " P{process}")?;
        }
        writeln!(f)?;
        if self.deadlock_exists {
            f.write_str("The system is in a deadlock state")
        } else {
            f.write_str("The system is not in a deadlock state")
        }
    }
}
