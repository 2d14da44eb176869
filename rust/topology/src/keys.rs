// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cell identifiers and dimension discriminants.
//!
//! Cells are identified by their row position in the incidence operator of
//! their dimension. A cell itself is an unordered set of vertex indices; the
//! order of cells in a [`Cells`] sequence is the cell's external identity.

use serde::{Deserialize, Serialize};

/// Index of a 0-cell (a vertex).
pub type VertexId = usize;

/// Index of a 1-cell (an edge).
pub type EdgeId = usize;

/// Index of a 2-cell (a face).
pub type FaceId = usize;

/// Index of a 3-cell (a solid).
pub type SolidId = usize;

/// A p-cell given by the vertex indices it contains.
pub type Cell = Vec<VertexId>;

/// An ordered sequence of cells of one dimension.
pub type Cells = Vec<Cell>;

/// Topological dimension of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CellDimension {
    Vertex = 0,
    Edge = 1,
    Face = 2,
    Solid = 3,
}

impl CellDimension {
    /// All dimensions in increasing order.
    pub const ALL: [CellDimension; 4] = [
        CellDimension::Vertex,
        CellDimension::Edge,
        CellDimension::Face,
        CellDimension::Solid,
    ];

    /// Returns the dimension as an integer `p`.
    pub fn rank(self) -> usize {
        self as usize
    }

    /// Returns the dimension of the cells on this cell's boundary.
    pub fn boundary(self) -> Option<CellDimension> {
        match self {
            CellDimension::Vertex => None,
            CellDimension::Edge => Some(CellDimension::Vertex),
            CellDimension::Face => Some(CellDimension::Edge),
            CellDimension::Solid => Some(CellDimension::Face),
        }
    }

    /// Returns the dimension name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CellDimension::Vertex => "Vertex",
            CellDimension::Edge => "Edge",
            CellDimension::Face => "Face",
            CellDimension::Solid => "Solid",
        }
    }
}

impl std::fmt::Display for CellDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
