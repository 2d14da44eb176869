// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boundary and coboundary operators between 0-, 1- and 2-cells.
//!
//! All operators are derived from set incidence alone. Edge orientation is
//! taken from the listing order of an edge's two vertices (first = tail,
//! second = head); face orientation is recovered by walking the face's
//! boundary edges (see [`crate::orientation`]).

use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::error::{Error, Result};
use crate::incidence::build_incidence;
use crate::keys::{Cell, EdgeId, VertexId};
use crate::operator::{Operator, SignedOperator, UnsignedOperator};
use crate::orientation::orient_face;

/// Returns the `(tail, head)` vertices of an edge cell.
///
/// An edge must list exactly two distinct vertices.
pub(crate) fn edge_endpoints(edge: EdgeId, cell: &Cell) -> Result<(VertexId, VertexId)> {
    match cell.as_slice() {
        &[tail, head] if tail != head => Ok((tail, head)),
        &[_, _] => Err(Error::MalformedCell {
            cell: edge,
            arity: 1,
        }),
        other => {
            let mut distinct = other.to_vec();
            distinct.sort_unstable();
            distinct.dedup();
            Err(Error::MalformedCell {
                cell: edge,
                arity: distinct.len(),
            })
        }
    }
}

/// Validates every edge and returns its endpoints.
fn checked_endpoints(edges: &[Cell], vertex_count: usize) -> Result<Vec<(VertexId, VertexId)>> {
    edges
        .iter()
        .enumerate()
        .map(|(edge, cell)| {
            let (tail, head) = edge_endpoints(edge, cell)?;
            for v in [tail, head] {
                if v >= vertex_count {
                    return Err(Error::IndexOutOfRange {
                        cell: edge,
                        index: v,
                        bound: vertex_count,
                    });
                }
            }
            Ok((tail, head))
        })
        .collect()
}

/// Signed edge-vertex operator (edges × vertices).
///
/// Each row holds `-1` at the edge's first listed vertex and `+1` at the
/// second.
pub fn edge_vertex_signed(edges: &[Cell], vertex_count: usize) -> Result<SignedOperator> {
    let endpoints = checked_endpoints(edges, vertex_count)?;
    let triplets = endpoints
        .iter()
        .enumerate()
        .flat_map(|(edge, &(tail, head))| [(edge, tail, -1), (edge, head, 1)]);
    Ok(Operator::from_triplets(edges.len(), vertex_count, triplets))
}

/// Signed 1-boundary operator ∂₁ (vertices × edges).
///
/// Column `e` has exactly one `-1` (the edge's first listed vertex) and one
/// `+1` (the second). Edges without exactly two distinct vertices fail with
/// [`Error::MalformedCell`].
pub fn signed_boundary_1(edges: &[Cell], vertex_count: usize) -> Result<SignedOperator> {
    Ok(edge_vertex_signed(edges, vertex_count)?.transpose())
}

/// Unsigned 2-coboundary operator (faces × edges).
///
/// Computed as `FV · EVᵀ`, keeping the entries equal to 2: an edge bounds a
/// face when both of its vertices belong to the face. The transpose is the
/// unsigned boundary-direction counterpart (edges × faces).
pub fn unsigned_coboundary_2(
    faces: &[Cell],
    edges: &[Cell],
    vertex_count: usize,
) -> Result<UnsignedOperator> {
    checked_endpoints(edges, vertex_count)?;
    let face_vertex = build_incidence(faces, vertex_count)?;
    let edge_vertex = build_incidence(edges, vertex_count)?;

    let product = face_vertex.matmul(&edge_vertex.transpose())?;
    let face_edge = product.filter_map_values(|count| (count == 2).then_some(1));

    debug!(
        faces = faces.len(),
        edges = edges.len(),
        nnz = face_edge.nnz(),
        "Built unsigned face-edge coboundary"
    );
    Ok(face_edge)
}

/// Maps every vertex to the set of edges incident to it.
pub fn vertex_edge_index(edges: &[Cell]) -> FxHashMap<VertexId, FxHashSet<EdgeId>> {
    let mut index: FxHashMap<VertexId, FxHashSet<EdgeId>> = FxHashMap::default();
    for (edge, cell) in edges.iter().enumerate() {
        for &v in cell {
            index.entry(v).or_default().insert(edge);
        }
    }
    index
}

/// Signs an unsigned face-edge operator by orienting every face's boundary cycle.
///
/// Faces are independent, so the walks run in parallel.
pub(crate) fn sign_face_edge(
    face_edge: &UnsignedOperator,
    edges: &[Cell],
    vertex_to_edges: &FxHashMap<VertexId, FxHashSet<EdgeId>>,
) -> Result<SignedOperator> {
    let rows = (0..face_edge.nrows())
        .into_par_iter()
        .map(|face| {
            let cycle = orient_face(face, face_edge.row_indices(face), edges, vertex_to_edges)?;
            Ok(cycle
                .scatter_row()
                .map(|(edge, sign)| (face, edge, i32::from(sign)))
                .collect::<Vec<_>>())
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Operator::from_triplets(
        face_edge.nrows(),
        face_edge.ncols(),
        rows.into_iter().flatten(),
    ))
}

/// Signed 2-coboundary operator (faces × edges).
///
/// Each face row carries the signs of its oriented boundary cycle, so that
/// `∂₁ · (this)ᵀ = 0`.
pub fn signed_coboundary_2(
    faces: &[Cell],
    edges: &[Cell],
    vertex_count: usize,
) -> Result<SignedOperator> {
    let unsigned = unsigned_coboundary_2(faces, edges, vertex_count)?;
    let index = vertex_edge_index(edges);
    sign_face_edge(&unsigned, edges, &index)
}
