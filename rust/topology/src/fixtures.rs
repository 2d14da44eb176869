// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared complexes for unit tests.

use nalgebra::{Point2, Point3, Vector2};

use crate::error::Result;
use crate::keys::Cells;
use crate::triangulation::{ConstrainedTriangulator, PlanarTriangulation};

/// Unit cube: 8 vertices, 12 edges, 6 quadrilateral faces.
///
/// Faces are ordered bottom, top, front (y = 0), back (y = 1), left (x = 0),
/// right (x = 1).
pub(crate) fn unit_cube() -> (Vec<Point3<f64>>, Cells, Cells) {
    let vertices = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(1.0, 0.0, 1.0),
        Point3::new(1.0, 1.0, 1.0),
        Point3::new(0.0, 1.0, 1.0),
    ];
    let edges = vec![
        vec![0, 1],
        vec![1, 2],
        vec![2, 3],
        vec![0, 3],
        vec![4, 5],
        vec![5, 6],
        vec![6, 7],
        vec![4, 7],
        vec![0, 4],
        vec![1, 5],
        vec![2, 6],
        vec![3, 7],
    ];
    let faces = vec![
        vec![0, 1, 2, 3],
        vec![4, 5, 6, 7],
        vec![0, 1, 4, 5],
        vec![2, 3, 6, 7],
        vec![0, 3, 4, 7],
        vec![1, 2, 5, 6],
    ];
    (vertices, edges, faces)
}

/// Outward signs of the unit cube faces relative to the cycles produced by
/// the face orienter (lowest edge as seed).
pub(crate) const UNIT_CUBE_OUTWARD_SIGNS: [i8; 6] = [-1, 1, 1, 1, -1, 1];

/// Two unit cubes side by side along x, sharing the face `x = 1` (face 5).
///
/// Solid 0 uses faces 0..=5, solid 1 uses faces 5..=10.
pub(crate) fn two_cubes() -> (Vec<Point3<f64>>, Cells, Cells, Cells) {
    let (mut vertices, mut edges, mut faces) = unit_cube();
    vertices.extend([
        Point3::new(2.0, 0.0, 0.0),
        Point3::new(2.0, 1.0, 0.0),
        Point3::new(2.0, 0.0, 1.0),
        Point3::new(2.0, 1.0, 1.0),
    ]);
    edges.extend([
        vec![1, 8],
        vec![8, 9],
        vec![2, 9],
        vec![5, 10],
        vec![10, 11],
        vec![6, 11],
        vec![8, 10],
        vec![9, 11],
    ]);
    faces.extend([
        vec![1, 2, 8, 9],
        vec![5, 6, 10, 11],
        vec![1, 5, 8, 10],
        vec![2, 6, 9, 11],
        vec![8, 9, 10, 11],
    ]);
    let solids = vec![vec![0, 1, 2, 3, 4, 5], vec![5, 6, 7, 8, 9, 10]];
    (vertices, edges, faces, solids)
}

/// Two separate unit cubes, the second shifted to `x = 3..4`.
///
/// The second cube lists its top face first, so its lowest-numbered face
/// walks the opposite way (relative to the solid) from the first cube's.
/// Solid 0 uses faces 0..=5, solid 1 uses faces 6..=11.
pub(crate) fn disjoint_cubes() -> (Vec<Point3<f64>>, Cells, Cells, Cells) {
    let (mut vertices, mut edges, mut faces) = unit_cube();
    let (second, second_edges, second_faces) = unit_cube();

    vertices.extend(second.iter().map(|p| Point3::new(p.x + 3.0, p.y, p.z)));
    edges.extend(
        second_edges
            .iter()
            .map(|e| e.iter().map(|v| v + 8).collect::<Vec<_>>()),
    );
    // top, bottom, then the sides
    for face in [1, 0, 2, 3, 4, 5] {
        faces.push(second_faces[face].iter().map(|v| v + 8).collect());
    }
    let solids = vec![(0..6).collect(), (6..12).collect()];
    (vertices, edges, faces, solids)
}

/// Engine that fans every constraint edge to one added point at the
/// centroid of the input points. Valid for convex faces.
pub(crate) struct CentroidFan;

impl ConstrainedTriangulator for CentroidFan {
    fn triangulate(
        &self,
        points: &[Point2<f64>],
        constraints: &[[usize; 2]],
    ) -> Result<PlanarTriangulation> {
        let sum = points
            .iter()
            .fold(Vector2::zeros(), |acc: Vector2<f64>, p| acc + p.coords);
        Ok(PlanarTriangulation {
            steiner_points: vec![Point2::from(sum / points.len() as f64)],
            triangles: constraints
                .iter()
                .map(|&[a, b]| [a, b, points.len()])
                .collect(),
        })
    }
}
