use core::fmt::{Display, Formatter};

use derive_more::From;

use crate::matrix::AllocationError;

/// Which table of a scenario a shape error refers to.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Table {
    Allocation,
    Request,
}

impl Display for Table {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Allocation => f.write_str("allocation"),
            Self::Request => f.write_str("request"),
        }
    }
}

/// Error building a [`Snapshot`](super::Snapshot) from a scenario.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, From)]
pub enum Error {
    /// Storage for the allocation or request table could not be obtained.
    Allocation(AllocationError),
    /// The request table has a different number of rows than the
    /// allocation table.
    ProcessCount { allocation: usize, request: usize },
    /// A row does not have one entry per resource class.
    Shape {
        table: Table,
        row: usize,
        expected: usize,
        found: usize,
    },
    /// More units of `resource` are allocated than exist.
    OverCommitted {
        resource: usize,
        total: u64,
        allocated: u64,
    },
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Allocation(e) => write!(f, "{e}"),
            Self::ProcessCount {
                allocation,
                request,
            } => write!(
                f,
                "allocation has {allocation} process rows but request has {request}"
            ),
            Self::Shape {
                table,
                row,
                expected,
                found,
            } => write!(
                f,
                "{table} row {row} has {found} entries, expected {expected}"
            ),
            Self::OverCommitted {
                resource,
                total,
                allocated,
            } => write!(
                f,
                "resource R{resource} has {allocated} units allocated but only {total} in total"
            ),
        }
    }
}
