//! Raw scenario data as handed over by a scenario source.
//!
//! A [`Scenario`] is what a parser or generator produces before any
//! validation: the total units of every resource class plus the allocation
//! and request tables. Turning it into a [`Snapshot`] checks shape and the
//! conservation invariant.
//!
//! [`Snapshot`]: crate::snapshot::Snapshot

use alloc::vec::Vec;

pub mod display;

pub use display::format_scenario;

/// Unvalidated resource-allocation state.
///
/// Row `i` of `allocation` and `request` belongs to process `i`, column `j`
/// to resource class `j`.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "schemars", derive(::schemars::JsonSchema))]
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Scenario {
    /// Units of each resource class in the system.
    pub total_units: Vec<u64>,
    /// `allocation[i][j]`: units of class `j` held by process `i`.
    pub allocation: Vec<Vec<u64>>,
    /// `request[i][j]`: further units of class `j` process `i` waits for.
    pub request: Vec<Vec<u64>>,
}

impl Scenario {
    #[must_use]
    pub const fn new(
        total_units: Vec<u64>,
        allocation: Vec<Vec<u64>>,
        request: Vec<Vec<u64>>,
    ) -> Self {
        Self {
            total_units,
            allocation,
            request,
        }
    }

    /// Number of processes (`n`).
    #[must_use]
    pub fn processes(&self) -> usize {
        self.allocation.len()
    }

    /// Number of resource classes (`m`).
    #[must_use]
    pub fn resources(&self) -> usize {
        self.total_units.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_follow_tables() {
        let scenario = Scenario::new(vec![1, 2, 3], vec![vec![0, 0, 0]; 4], vec![vec![0, 0, 0]; 4]);
        assert_eq!(scenario.processes(), 4);
        assert_eq!(scenario.resources(), 3);
    }

    #[test]
    fn default_is_empty() {
        let scenario = Scenario::default();
        assert_eq!(scenario.processes(), 0);
        assert_eq!(scenario.resources(), 0);
    }
}
