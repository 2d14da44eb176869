// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Interface to the spatial arrangement collaborator.
//!
//! The arrangement splits cells at their mutual intersections and returns a
//! refined, non-overlapping complex together with its solids. It is the only
//! source of new vertices and cells; this crate consumes it through the
//! [`Arrangement`] trait and checks the shape of what comes back.

use nalgebra::Point3;

use crate::error::{Error, Result};
use crate::incidence::build_incidence;
use crate::keys::Cells;
use crate::operator::{Operator, UnsignedOperator};

/// Raw complex handed to an arrangement.
#[derive(Debug, Clone, Copy)]
pub struct ArrangementInput<'a> {
    pub vertices: &'a [Point3<f64>],
    /// Unsigned edges × vertices.
    pub edge_vertex: &'a UnsignedOperator,
    /// Unsigned faces × edges.
    pub face_edge: &'a UnsignedOperator,
}

/// Refined complex returned by an arrangement.
#[derive(Debug, Clone)]
pub struct ArrangedComplex {
    pub vertices: Vec<Point3<f64>>,
    /// Edges × vertices (signed or unsigned).
    pub edge_vertex: Operator,
    /// Faces × edges (signed or unsigned).
    pub face_edge: Operator,
    /// Solids × faces (signed or unsigned).
    pub solid_face: Operator,
}

impl ArrangedComplex {
    /// Checks that the operators chain together and describe a non-empty complex.
    ///
    /// Every edge row must reference exactly two vertices and all entries
    /// must be `±1`.
    pub fn check(&self) -> Result<()> {
        let counts = [
            ("vertices", self.vertices.len()),
            ("edges", self.edge_vertex.nrows()),
            ("faces", self.face_edge.nrows()),
            ("solids", self.solid_face.nrows()),
        ];
        if let Some((name, _)) = counts.iter().find(|(_, n)| *n == 0) {
            return Err(Error::Arrangement(format!("result has no {name}")));
        }

        let chain = [
            ("edge-vertex", &self.edge_vertex, self.vertices.len()),
            ("face-edge", &self.face_edge, self.edge_vertex.nrows()),
            ("solid-face", &self.solid_face, self.face_edge.nrows()),
        ];
        for (name, op, expected) in chain {
            if op.ncols() != expected {
                return Err(Error::Arrangement(format!(
                    "{name} operator has {} columns, expected {expected}",
                    op.ncols()
                )));
            }
            if !op.is_signed_unit() {
                return Err(Error::Arrangement(format!(
                    "{name} operator has entries outside {{-1, 0, 1}}"
                )));
            }
        }

        for edge in 0..self.edge_vertex.nrows() {
            let arity = self.edge_vertex.row_indices(edge).len();
            if arity != 2 {
                return Err(Error::Arrangement(format!(
                    "edge {edge} has {arity} vertices"
                )));
            }
        }
        Ok(())
    }
}

/// A spatial arrangement collaborator.
pub trait Arrangement: Send + Sync {
    /// Refines the input complex and returns its arranged counterpart.
    fn arrange(&self, input: &ArrangementInput<'_>) -> Result<ArrangedComplex>;
}

/// Arrangement for input that is already intersection-free.
///
/// Returns the vertices and operators unchanged and builds the solid-face
/// operator from the face lists given for each solid. The resulting
/// solid-face entries are unsigned.
#[derive(Debug, Clone, Default)]
pub struct Prearranged {
    solids: Cells,
}

impl Prearranged {
    /// `solids[i]` lists the faces bounding solid `i`.
    pub fn new(solids: Cells) -> Self {
        Self { solids }
    }

    pub fn solids(&self) -> &Cells {
        &self.solids
    }
}

impl Arrangement for Prearranged {
    fn arrange(&self, input: &ArrangementInput<'_>) -> Result<ArrangedComplex> {
        let solid_face = build_incidence(&self.solids, input.face_edge.nrows())
            .map_err(|e| Error::Arrangement(format!("invalid solid: {e}")))?;

        Ok(ArrangedComplex {
            vertices: input.vertices.to_vec(),
            edge_vertex: input.edge_vertex.clone(),
            face_edge: input.face_edge.clone(),
            solid_face,
        })
    }
}
