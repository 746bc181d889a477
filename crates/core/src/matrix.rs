//! Dense two-dimensional storage for per-process, per-resource counts.
//!
//! [`Matrix`] owns one contiguous row-major buffer. Row `i` occupies
//! `data[i * cols..(i + 1) * cols]`, so a zero-width matrix still has `rows`
//! (empty) rows and every row accessor keeps working.
//!
//! Indexing outside `[0, rows) x [0, cols)` is a caller bug and panics.

use alloc::collections::TryReserveError;
use alloc::vec::Vec;
use core::fmt::{Display, Formatter};
use core::ops::{Index, IndexMut};

/// Failure to obtain storage for a [`Matrix`].
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    /// `rows * cols` does not fit in `usize`.
    CapacityOverflow { rows: usize, cols: usize },
    /// The allocator refused the request.
    OutOfMemory { rows: usize, cols: usize },
}

impl Display for AllocationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::CapacityOverflow { rows, cols } => {
                write!(f, "a {rows}x{cols} matrix exceeds the addressable size")
            }
            Self::OutOfMemory { rows, cols } => {
                write!(f, "failed to allocate a {rows}x{cols} matrix")
            }
        }
    }
}

/// Row-major `rows x cols` matrix.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T> Matrix<T>
where
    T: Copy + Default,
{
    /// Allocates a matrix with every cell set to `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError`] if the cell count overflows or the
    /// allocator cannot provide the buffer.
    pub fn try_zeroed(rows: usize, cols: usize) -> Result<Self, AllocationError> {
        let len = rows
            .checked_mul(cols)
            .ok_or(AllocationError::CapacityOverflow { rows, cols })?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_: TryReserveError| AllocationError::OutOfMemory { rows, cols })?;
        data.resize(len, T::default());
        Ok(Self { rows, cols, data })
    }

    /// Copies `source` into a fresh matrix with `cols` columns.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError`] if the buffer cannot be allocated.
    ///
    /// # Panics
    ///
    /// Panics if any row of `source` is not exactly `cols` long.
    pub fn try_from_rows<R>(source: &[R], cols: usize) -> Result<Self, AllocationError>
    where
        R: AsRef<[T]>,
    {
        let mut matrix = Self::try_zeroed(source.len(), cols)?;
        for (i, row) in source.iter().enumerate() {
            matrix.row_mut(i).copy_from_slice(row.as_ref());
        }
        Ok(matrix)
    }

    /// Sets every cell of row `row` to `value`.
    pub fn fill_row(&mut self, row: usize, value: T) {
        self.row_mut(row).fill(value);
    }
}

impl<T> Matrix<T> {
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// `true` if the matrix holds no cells (either dimension is zero).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrows row `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.rows()`.
    #[must_use]
    pub fn row(&self, row: usize) -> &[T] {
        assert!(row < self.rows, "row {row} out of range 0..{}", self.rows);
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Mutably borrows row `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.rows()`.
    pub fn row_mut(&mut self, row: usize) -> &mut [T] {
        assert!(row < self.rows, "row {row} out of range 0..{}", self.rows);
        &mut self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Iterates over rows in index order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.rows).map(move |row| self.row(row))
    }

    /// Iterates over column `col` top to bottom.
    ///
    /// # Panics
    ///
    /// Panics if `col >= self.cols()`.
    pub fn column(&self, col: usize) -> impl Iterator<Item = &T> + '_ {
        assert!(col < self.cols, "column {col} out of range 0..{}", self.cols);
        self.data.iter().skip(col).step_by(self.cols)
    }
}

impl<T> Matrix<T>
where
    T: Clone,
{
    /// Copies the matrix out as nested rows.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        self.iter_rows().map(<[T]>::to_vec).collect()
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(col < self.cols, "column {col} out of range 0..{}", self.cols);
        &self.row(row)[col]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        assert!(col < self.cols, "column {col} out of range 0..{}", self.cols);
        &mut self.row_mut(row)[col]
    }
}

impl<T> Display for Matrix<T>
where
    T: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        for row in self.iter_rows() {
            for (j, value) in row.iter().enumerate() {
                if j > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{value}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
