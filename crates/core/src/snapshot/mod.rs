//! Validated resource-allocation state, mutated in place by detection.
//!
//! A [`Snapshot`] is built once from a [`Scenario`]. Construction derives
//! `available[j] = total_units[j] - sum_i allocation[i][j]` and refuses any
//! scenario in which a class is over-committed, so every snapshot that
//! exists satisfies `sum_i allocation[i][j] <= total_units[j]`.
//!
//! The detection engine is the only writer. It marks processes finished and
//! moves their held units back into `available`, which keeps the
//! conservation invariant intact:
//! `available[j] + sum_i allocation[i][j] == total_units[j]` at all times.

use alloc::vec;
use alloc::vec::Vec;

use self::error::{Error, Table};
use crate::matrix::Matrix;
use crate::scenario::Scenario;

pub mod error;

/// Validated allocation state of `n` processes over `m` resource classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    total_units: Vec<u64>,
    available: Vec<u64>,
    allocation: Matrix<u64>,
    request: Matrix<u64>,
    finish: Vec<bool>,
}

impl Snapshot {
    /// Validates `scenario` and builds a snapshot with no process finished.
    ///
    /// # Errors
    ///
    /// - [`Error::ProcessCount`] or [`Error::Shape`] if the tables are not
    ///   `n x m`.
    /// - [`Error::OverCommitted`] if some class has more units allocated
    ///   than exist.
    /// - [`Error::Allocation`] if the tables cannot be stored.
    pub fn new(scenario: &Scenario) -> Result<Self, Error> {
        let processes = scenario.processes();
        let resources = scenario.resources();

        if scenario.request.len() != processes {
            return Err(Error::ProcessCount {
                allocation: processes,
                request: scenario.request.len(),
            });
        }
        check_shape(Table::Allocation, &scenario.allocation, resources)?;
        check_shape(Table::Request, &scenario.request, resources)?;

        let allocation = Matrix::try_from_rows(&scenario.allocation, resources)?;
        let request = Matrix::try_from_rows(&scenario.request, resources)?;

        let available = scenario
            .total_units
            .iter()
            .enumerate()
            .map(|(resource, &total)| {
                let allocated = allocation
                    .column(resource)
                    .try_fold(0u64, |sum, &units| sum.checked_add(units));
                allocated
                    .and_then(|allocated| total.checked_sub(allocated))
                    .ok_or(Error::OverCommitted {
                        resource,
                        total,
                        allocated: allocated.unwrap_or(u64::MAX),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(processes, resources, ?available, "snapshot built");

        Ok(Self {
            total_units: scenario.total_units.clone(),
            available,
            allocation,
            request,
            finish: vec![false; processes],
        })
    }

    /// Number of processes (`n`).
    #[must_use]
    pub fn processes(&self) -> usize {
        self.finish.len()
    }

    /// Number of resource classes (`m`).
    #[must_use]
    pub fn resources(&self) -> usize {
        self.total_units.len()
    }

    #[must_use]
    pub fn total_units(&self) -> &[u64] {
        &self.total_units
    }

    #[must_use]
    pub fn available(&self) -> &[u64] {
        &self.available
    }

    #[must_use]
    pub const fn allocation(&self) -> &Matrix<u64> {
        &self.allocation
    }

    #[must_use]
    pub const fn request(&self) -> &Matrix<u64> {
        &self.request
    }

    #[must_use]
    pub fn finish(&self) -> &[bool] {
        &self.finish
    }

    /// # Panics
    ///
    /// Panics if `process >= self.processes()`.
    #[must_use]
    pub fn is_finished(&self, process: usize) -> bool {
        self.finish[process]
    }

    /// `true` if every request of `process` fits in the available units.
    pub(crate) fn is_reducible(&self, process: usize) -> bool {
        self.request
            .row(process)
            .iter()
            .zip(&self.available)
            .all(|(request, available)| request <= available)
    }

    /// Finishes `process`: its held units return to `available` and its
    /// allocation and request rows are cleared.
    pub(crate) fn release(&mut self, process: usize) {
        self.finish[process] = true;
        for (available, held) in self.available.iter_mut().zip(self.allocation.row(process)) {
            // Bounded by total_units, so this cannot overflow.
            *available += held;
        }
        self.allocation.fill_row(process, 0);
        self.request.fill_row(process, 0);
    }
}

impl TryFrom<&Scenario> for Snapshot {
    type Error = Error;

    fn try_from(scenario: &Scenario) -> Result<Self, Self::Error> {
        Self::new(scenario)
    }
}

impl TryFrom<Scenario> for Snapshot {
    type Error = Error;

    fn try_from(scenario: Scenario) -> Result<Self, Self::Error> {
        Self::new(&scenario)
    }
}

fn check_shape(table: Table, rows: &[Vec<u64>], expected: usize) -> Result<(), Error> {
    match rows.iter().position(|row| row.len() != expected) {
        Some(row) => Err(Error::Shape {
            table,
            row,
            expected,
            found: rows[row].len(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(total: &[u64], allocation: &[&[u64]], request: &[&[u64]]) -> Scenario {
        Scenario::new(
            total.to_vec(),
            allocation.iter().map(|row| row.to_vec()).collect(),
            request.iter().map(|row| row.to_vec()).collect(),
        )
    }

    #[test]
    fn available_is_total_minus_allocated() {
        let snapshot =
            Snapshot::new(&scenario(&[5, 3], &[&[1, 2], &[3, 0]], &[&[0, 0], &[0, 0]])).unwrap();
        assert_eq!(snapshot.available(), [1, 1]);
        assert_eq!(snapshot.finish(), [false, false]);
        assert_eq!(snapshot.processes(), 2);
        assert_eq!(snapshot.resources(), 2);
    }

    #[test]
    fn over_committed_class_is_rejected() {
        let err = Snapshot::new(&scenario(&[1], &[&[2]], &[&[0]])).unwrap_err();
        assert_eq!(
            err,
            Error::OverCommitted {
                resource: 0,
                total: 1,
                allocated: 2
            }
        );
    }

    #[test]
    fn overflowing_column_sum_is_over_committed() {
        let err =
            Snapshot::new(&scenario(&[u64::MAX], &[&[u64::MAX], &[1]], &[&[0], &[0]])).unwrap_err();
        assert_eq!(
            err,
            Error::OverCommitted {
                resource: 0,
                total: u64::MAX,
                allocated: u64::MAX
            }
        );
    }

    #[test]
    fn fully_allocated_class_is_accepted() {
        let snapshot = Snapshot::new(&scenario(&[2], &[&[1], &[1]], &[&[0], &[0]])).unwrap();
        assert_eq!(snapshot.available(), [0]);
    }

    #[test]
    fn ragged_request_is_a_shape_error() {
        let err = Snapshot::new(&scenario(&[2, 2], &[&[1, 1]], &[&[1]])).unwrap_err();
        assert_eq!(
            err,
            Error::Shape {
                table: Table::Request,
                row: 0,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn mismatched_process_count_is_rejected() {
        let err = Snapshot::new(&scenario(&[2], &[&[1]], &[])).unwrap_err();
        assert_eq!(
            err,
            Error::ProcessCount {
                allocation: 1,
                request: 0
            }
        );
    }

    #[test]
    fn release_returns_held_units() {
        let mut snapshot =
            Snapshot::new(&scenario(&[3, 1], &[&[2, 1], &[1, 0]], &[&[1, 0], &[0, 1]])).unwrap();
        assert!(!snapshot.is_reducible(0));
        assert!(!snapshot.is_reducible(1));
        snapshot.release(0);
        assert!(snapshot.is_finished(0));
        assert_eq!(snapshot.available(), [2, 1]);
        assert_eq!(snapshot.allocation().row(0), [0, 0]);
        assert_eq!(snapshot.request().row(0), [0, 0]);
        assert!(snapshot.is_reducible(1));
    }

    #[test]
    fn error_display_names_the_class() {
        let err = Snapshot::new(&scenario(&[1], &[&[2]], &[&[0]])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "resource R0 has 2 units allocated but only 1 in total"
        );
    }
}
