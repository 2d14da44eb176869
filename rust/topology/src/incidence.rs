// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cell-vertex incidence.
//!
//! Converts between the list form of a cell set (each cell as its vertex
//! indices) and the unsigned incidence operator (cells × vertices).

use crate::error::{Error, Result};
use crate::keys::{Cell, Cells};
use crate::operator::{Operator, UnsignedOperator};

/// Builds the unsigned incidence operator of `cells` over `vertex_count` vertices.
///
/// Row `i` corresponds to `cells[i]` and has a `1` in column `v` iff `v` is a
/// vertex of that cell. Repeated vertices inside one cell collapse to a single
/// entry.
pub fn build_incidence(cells: &[Cell], vertex_count: usize) -> Result<UnsignedOperator> {
    let mut triplets = Vec::with_capacity(cells.iter().map(Vec::len).sum());

    for (cell, vertices) in cells.iter().enumerate() {
        if vertices.is_empty() {
            return Err(Error::MalformedCell { cell, arity: 0 });
        }
        for &v in vertices {
            if v >= vertex_count {
                return Err(Error::IndexOutOfRange {
                    cell,
                    index: v,
                    bound: vertex_count,
                });
            }
            triplets.push((cell, v, 1));
        }
    }

    Ok(Operator::from_triplets(cells.len(), vertex_count, triplets).to_unsigned())
}

/// Reads the nonzero columns of every row back into a cell list.
///
/// Each returned cell is sorted ascending and free of duplicates.
pub fn cells_from_operator(op: &Operator) -> Cells {
    (0..op.nrows())
        .map(|row| op.row_indices(row).to_vec())
        .collect()
}
