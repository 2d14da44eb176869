// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-solid boundary meshes.
//!
//! A solid's boundary is assembled from the triangulations of its faces.
//! Faces whose orientation sign is `-1` in the solid have their triangle
//! winding reversed, so the result is consistently wound when the signs are
//! coherent. The mesh is reindexed into its own local vertex array: the
//! solid's global vertices first, in ascending id order, then any points the
//! triangulation engine added.

use nalgebra::Point3;
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::keys::{FaceId, SolidId, VertexId};
use crate::triangulation::{triangulate_face, ConstrainedTriangulator, FaceCorner};

/// A face of a solid with its orientation sign and directed boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryFace {
    pub face: FaceId,
    /// `+1` keeps the face's own winding, `-1` reverses it.
    pub sign: i8,
    /// Directed `[tail, head]` boundary edges in global vertex ids.
    pub boundary: Vec<[VertexId; 2]>,
}

/// Self-contained triangle mesh of one solid's boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct SolidMesh {
    pub solid: SolidId,
    /// Local vertex positions.
    pub vertices: Vec<Point3<f64>>,
    /// Global ids of the first `global_ids.len()` local vertices (sorted
    /// ascending). The remaining local vertices are engine-added points.
    pub global_ids: Vec<VertexId>,
    /// Triangles as local vertex indices.
    pub triangles: Vec<[usize; 3]>,
}

impl SolidMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Number of local vertices added by the triangulation engine.
    pub fn steiner_count(&self) -> usize {
        self.vertices.len() - self.global_ids.len()
    }

    /// Signed volume enclosed by the mesh (sum of signed tetrahedra against
    /// the origin). Positive for outward-facing triangles of a closed mesh.
    pub fn signed_volume(&self) -> f64 {
        self.triangles
            .iter()
            .map(|&[a, b, c]| {
                let p0 = self.vertices[a].coords;
                let p1 = self.vertices[b].coords;
                let p2 = self.vertices[c].coords;
                p0.dot(&p1.cross(&p2))
            })
            .sum::<f64>()
            / 6.0
    }

    /// Total surface area of the triangles.
    pub fn area(&self) -> f64 {
        self.triangles
            .iter()
            .map(|&[a, b, c]| {
                let e1 = self.vertices[b] - self.vertices[a];
                let e2 = self.vertices[c] - self.vertices[a];
                e1.cross(&e2).norm() / 2.0
            })
            .sum()
    }

    /// Directed edge → number of uses.
    fn directed_edge_counts(&self) -> FxHashMap<(usize, usize), usize> {
        let mut counts = FxHashMap::default();
        for &[a, b, c] in &self.triangles {
            for edge in [(a, b), (b, c), (c, a)] {
                *counts.entry(edge).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Returns `true` if the mesh is non-empty and every edge is shared by
    /// exactly two triangles that traverse it in opposite directions.
    pub fn is_closed(&self) -> bool {
        if self.triangles.is_empty() {
            return false;
        }
        let counts = self.directed_edge_counts();
        counts
            .iter()
            .all(|(&(a, b), &n)| n == 1 && counts.get(&(b, a)) == Some(&1))
    }

    /// `V - E + F` of the triangulated surface (2 for a sphere-like boundary).
    pub fn euler_characteristic(&self) -> i64 {
        let mut undirected: Vec<(usize, usize)> = self
            .directed_edge_counts()
            .into_keys()
            .map(|(a, b)| (a.min(b), a.max(b)))
            .collect();
        undirected.sort_unstable();
        undirected.dedup();

        self.vertices.len() as i64 - undirected.len() as i64 + self.triangles.len() as i64
    }
}

/// Triangulates the boundary faces of `solid` and gathers them into one
/// locally indexed mesh.
///
/// Triangles of faces with sign `+1` keep their winding; for sign `-1` the
/// first two indices are swapped. Any other sign fails with
/// [`Error::InvalidOrientation`].
pub fn assemble_solid<T>(
    solid: SolidId,
    faces: &[BoundaryFace],
    vertices: &[Point3<f64>],
    engine: &T,
    tolerance: f64,
) -> Result<SolidMesh>
where
    T: ConstrainedTriangulator + ?Sized,
{
    let mut triangles: Vec<[FaceCorner; 3]> = Vec::new();
    let mut steiner_points: Vec<Point3<f64>> = Vec::new();

    for bf in faces {
        if bf.sign != 1 && bf.sign != -1 {
            return Err(Error::InvalidOrientation {
                solid,
                face: bf.face,
                sign: bf.sign,
            });
        }
        let tri = triangulate_face(bf.face, vertices, &bf.boundary, engine, tolerance)?;

        // Engine points are numbered per face; make them unique in the solid
        let offset = steiner_points.len();
        steiner_points.extend(tri.steiner_points);
        let shift = |c: FaceCorner| match c {
            FaceCorner::Steiner(k) => FaceCorner::Steiner(k + offset),
            vertex => vertex,
        };

        triangles.extend(tri.triangles.into_iter().map(|[a, b, c]| {
            let [a, b, c] = [shift(a), shift(b), shift(c)];
            if bf.sign < 0 {
                [b, a, c]
            } else {
                [a, b, c]
            }
        }));
    }

    let mut global_ids: Vec<VertexId> = triangles
        .iter()
        .flatten()
        .filter_map(|c| match c {
            FaceCorner::Vertex(v) => Some(*v),
            FaceCorner::Steiner(_) => None,
        })
        .collect();
    global_ids.sort_unstable();
    global_ids.dedup();

    let local: FxHashMap<VertexId, usize> = global_ids
        .iter()
        .enumerate()
        .map(|(i, &v)| (v, i))
        .collect();
    let base = global_ids.len();
    let local_index = |c: FaceCorner| match c {
        FaceCorner::Vertex(v) => local[&v],
        FaceCorner::Steiner(k) => base + k,
    };

    Ok(SolidMesh {
        solid,
        vertices: global_ids
            .iter()
            .map(|&v| vertices[v])
            .chain(steiner_points)
            .collect(),
        triangles: triangles.iter().map(|t| t.map(local_index)).collect(),
        global_ids,
    })
}
