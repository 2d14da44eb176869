// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sparse incidence operators.
//!
//! An [`Operator`] is a compressed-sparse-row integer matrix relating cells of
//! one dimension (rows) to vertices or cells of an adjacent dimension
//! (columns). Unsigned operators hold entries in `{0, 1}`; signed operators
//! hold `{-1, 0, 1}` where `-1` marks the tail and `+1` the head of an
//! oriented boundary. Explicit zeros are never stored, so the stored pattern
//! of a row is exactly the set of incident cells.

use nalgebra_sparse::{CooMatrix, CsrMatrix};

use crate::error::{Error, Result};

/// Operator whose entries are `0` or `1`.
pub type UnsignedOperator = Operator;

/// Operator whose entries are `-1`, `0` or `1`.
pub type SignedOperator = Operator;

/// Sparse integer matrix with O(nonzeros) storage and fast row queries.
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    matrix: CsrMatrix<i32>,
}

impl Operator {
    /// Creates an all-zero operator of the given shape.
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            matrix: CsrMatrix::zeros(nrows, ncols),
        }
    }

    /// Assembles an operator from `(row, col, value)` triplets.
    ///
    /// Duplicate positions are summed and resulting zeros are dropped.
    /// Callers are responsible for keeping every position inside the shape.
    pub(crate) fn from_triplets<I>(nrows: usize, ncols: usize, triplets: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize, i32)>,
    {
        let mut coo = CooMatrix::new(nrows, ncols);
        for (row, col, value) in triplets {
            coo.push(row, col, value);
        }
        Self::pruned(CsrMatrix::from(&coo))
    }

    /// Builds an operator from triplets, validating every position.
    pub fn try_from_triplets(
        nrows: usize,
        ncols: usize,
        triplets: &[(usize, usize, i32)],
    ) -> Result<Self> {
        for &(row, col, _) in triplets {
            if row >= nrows {
                return Err(Error::IndexOutOfRange {
                    cell: row,
                    index: row,
                    bound: nrows,
                });
            }
            if col >= ncols {
                return Err(Error::IndexOutOfRange {
                    cell: row,
                    index: col,
                    bound: ncols,
                });
            }
        }
        Ok(Self::from_triplets(nrows, ncols, triplets.iter().copied()))
    }

    /// Rebuilds a CSR matrix without explicitly stored zeros.
    fn pruned(matrix: CsrMatrix<i32>) -> Self {
        if matrix.values().iter().all(|&v| v != 0) {
            return Self { matrix };
        }
        let mut coo = CooMatrix::new(matrix.nrows(), matrix.ncols());
        for (row, col, &value) in matrix.triplet_iter() {
            if value != 0 {
                coo.push(row, col, value);
            }
        }
        Self {
            matrix: CsrMatrix::from(&coo),
        }
    }

    /// Number of rows (cells of the operator's domain dimension).
    pub fn nrows(&self) -> usize {
        self.matrix.nrows()
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.matrix.ncols()
    }

    /// `(nrows, ncols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }

    /// Number of stored nonzero entries.
    pub fn nnz(&self) -> usize {
        self.matrix.nnz()
    }

    /// Offsets of `row` into the CSR index/value arrays.
    fn row_range(&self, row: usize) -> std::ops::Range<usize> {
        let offsets = self.matrix.row_offsets();
        offsets[row]..offsets[row + 1]
    }

    /// Sorted column indices of the nonzero entries of `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of bounds.
    pub fn row_indices(&self, row: usize) -> &[usize] {
        &self.matrix.col_indices()[self.row_range(row)]
    }

    /// Values aligned with [`Operator::row_indices`].
    pub fn row_values(&self, row: usize) -> &[i32] {
        &self.matrix.values()[self.row_range(row)]
    }

    /// Iterates `(column, value)` over the nonzero entries of `row`.
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, i32)> + '_ {
        self.row_indices(row)
            .iter()
            .copied()
            .zip(self.row_values(row).iter().copied())
    }

    /// Entry at `(row, col)`, zero when not stored or out of bounds.
    pub fn get(&self, row: usize, col: usize) -> i32 {
        if row >= self.nrows() {
            return 0;
        }
        let cols = self.row_indices(row);
        match cols.binary_search(&col) {
            Ok(pos) => self.row_values(row)[pos],
            Err(_) => 0,
        }
    }

    /// Iterates all nonzero entries as `(row, col, value)` in row-major order.
    pub fn triplets(&self) -> impl Iterator<Item = (usize, usize, i32)> + '_ {
        self.matrix
            .triplet_iter()
            .map(|(row, col, &value)| (row, col, value))
    }

    /// Returns the transposed operator.
    pub fn transpose(&self) -> Self {
        Self {
            matrix: self.matrix.transpose(),
        }
    }

    /// Sparse matrix product `self * rhs`.
    pub fn matmul(&self, rhs: &Operator) -> Result<Self> {
        if self.ncols() != rhs.nrows() {
            return Err(Error::DimensionMismatch {
                lhs: self.shape(),
                rhs: rhs.shape(),
            });
        }
        Ok(Self::pruned(&self.matrix * &rhs.matrix))
    }

    /// Applies `f` to every nonzero value; `None` (or `Some(0)`) drops the entry.
    pub fn filter_map_values<F>(&self, f: F) -> Self
    where
        F: Fn(i32) -> Option<i32>,
    {
        Self::from_triplets(
            self.nrows(),
            self.ncols(),
            self.triplets()
                .filter_map(|(row, col, value)| f(value).map(|v| (row, col, v))),
        )
    }

    /// Replaces every nonzero entry with `1`.
    pub fn to_unsigned(&self) -> Self {
        self.filter_map_values(|_| Some(1))
    }

    /// Returns `true` when no nonzero entry is stored.
    pub fn is_zero(&self) -> bool {
        self.matrix.values().iter().all(|&v| v == 0)
    }

    /// Returns `true` when every stored entry equals `1`.
    pub fn is_unsigned(&self) -> bool {
        self.matrix.values().iter().all(|&v| v == 1)
    }

    /// Returns `true` when every stored entry is `-1` or `1`.
    pub fn is_signed_unit(&self) -> bool {
        self.matrix.values().iter().all(|&v| v == 1 || v == -1)
    }

    /// Borrow the underlying CSR matrix.
    pub fn as_csr(&self) -> &CsrMatrix<i32> {
        &self.matrix
    }
}
