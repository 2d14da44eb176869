// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face triangulation in a local planar basis.
//!
//! A face's vertices are expressed in a 2D coordinate system spanned by two
//! of its own edge directions, handed to a constrained triangulation engine
//! together with the face boundary, and the resulting triangles are mapped
//! back to global vertex ids. Vertex ids travel alongside the coordinates at
//! every step, so no lookup is ever keyed on a floating-point value. Points
//! added by the engine are lifted back into 3D through the same basis.

use nalgebra::{Matrix3, Point2, Point3, Vector3};
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::error::{Error, Result};
use crate::keys::{FaceId, VertexId};

/// Output of a [`ConstrainedTriangulator`].
///
/// Triangle index `i < n` (with `n` the number of input points) refers to
/// input point `i`; `i >= n` refers to `steiner_points[i - n]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanarTriangulation {
    pub steiner_points: Vec<Point2<f64>>,
    pub triangles: Vec<[usize; 3]>,
}

impl PlanarTriangulation {
    /// Triangulation over the input points only.
    pub fn new(triangles: Vec<[usize; 3]>) -> Self {
        Self {
            steiner_points: Vec::new(),
            triangles,
        }
    }
}

/// A constrained triangulation engine.
///
/// `constraints` are index pairs into `points` that the triangulation must
/// keep as edges. Engines may add interior points; they must not split the
/// constraint edges.
pub trait ConstrainedTriangulator: Send + Sync {
    fn triangulate(
        &self,
        points: &[Point2<f64>],
        constraints: &[[usize; 2]],
    ) -> Result<PlanarTriangulation>;
}

/// Corner of a face triangle: an existing vertex or a point added by the
/// triangulation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceCorner {
    Vertex(VertexId),
    /// Index into [`FaceTriangulation::steiner_points`].
    Steiner(usize),
}

/// Triangles of one face.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaceTriangulation {
    /// Engine-added points, in 3D.
    pub steiner_points: Vec<Point3<f64>>,
    pub triangles: Vec<[FaceCorner; 3]>,
}

impl FaceTriangulation {
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Position of a corner, looking vertices up in `vertices`.
    pub fn position(&self, vertices: &[Point3<f64>], corner: FaceCorner) -> Point3<f64> {
        match corner {
            FaceCorner::Vertex(v) => vertices[v],
            FaceCorner::Steiner(k) => self.steiner_points[k],
        }
    }
}

/// Ear-clipping engine backed by `earcutr`.
///
/// The constraint edges are chained into closed loops; the loop enclosing
/// the largest area becomes the outer ring and all other loops are holes.
#[derive(Debug, Clone, Copy, Default)]
pub struct EarcutTriangulator;

impl ConstrainedTriangulator for EarcutTriangulator {
    fn triangulate(
        &self,
        points: &[Point2<f64>],
        constraints: &[[usize; 2]],
    ) -> Result<PlanarTriangulation> {
        let mut loops = constraint_loops(points.len(), constraints)?;
        if loops.is_empty() {
            return Err(Error::Triangulation("no boundary constraints".into()));
        }

        // Outer ring first
        let outer = loops
            .iter()
            .enumerate()
            .map(|(i, ring)| (i, ring_area(points, ring).abs()))
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
            .unwrap_or(0);
        loops.swap(0, outer);

        // Flatten for earcutr, remembering which input point each slot holds
        let mut order: Vec<usize> = Vec::with_capacity(points.len());
        let mut coords: Vec<f64> = Vec::with_capacity(points.len() * 2);
        let mut hole_indices: Vec<usize> = Vec::with_capacity(loops.len() - 1);

        for (i, ring) in loops.iter().enumerate() {
            if i > 0 {
                hole_indices.push(order.len());
            }
            for &p in ring {
                order.push(p);
                coords.push(points[p].x);
                coords.push(points[p].y);
            }
        }

        let indices = earcutr::earcut(&coords, &hole_indices, 2)
            .map_err(|e| Error::Triangulation(format!("{:?}", e)))?;

        Ok(PlanarTriangulation::new(
            indices
                .chunks_exact(3)
                .map(|c| [order[c[0]], order[c[1]], order[c[2]]])
                .collect(),
        ))
    }
}

/// Chains constraint edges into closed loops of point indices.
fn constraint_loops(point_count: usize, constraints: &[[usize; 2]]) -> Result<Vec<Vec<usize>>> {
    let mut incident: FxHashMap<usize, Vec<usize>> = FxHashMap::default();
    for (i, &[a, b]) in constraints.iter().enumerate() {
        if a >= point_count || b >= point_count {
            return Err(Error::Triangulation(format!(
                "constraint {i} references a point outside 0..{point_count}"
            )));
        }
        incident.entry(a).or_default().push(i);
        incident.entry(b).or_default().push(i);
    }

    let mut used = vec![false; constraints.len()];
    let mut loops = Vec::new();

    for start in 0..constraints.len() {
        if used[start] {
            continue;
        }
        used[start] = true;
        let [first, mut current] = constraints[start];
        let mut ring = vec![first];

        while current != first {
            ring.push(current);
            let next = incident
                .get(&current)
                .and_then(|list| list.iter().copied().find(|&e| !used[e]))
                .ok_or_else(|| {
                    Error::Triangulation(format!("boundary is open at point {current}"))
                })?;
            used[next] = true;
            let [a, b] = constraints[next];
            current = if a == current { b } else { a };
        }
        loops.push(ring);
    }
    Ok(loops)
}

/// Signed area of a closed ring (positive when counter-clockwise).
fn ring_area(points: &[Point2<f64>], ring: &[usize]) -> f64 {
    let n = ring.len();
    (0..n)
        .map(|i| {
            let p = points[ring[i]];
            let q = points[ring[(i + 1) % n]];
            p.x * q.y - q.x * p.y
        })
        .sum::<f64>()
        / 2.0
}

fn triangle_area(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)) / 2.0
}

/// Affine 2D coordinate system in the plane of a face.
///
/// Built from the first point and two edge directions `u`, `v` whose cross
/// product exceeds the tolerance; `n = u × v` completes the 3×3 basis.
#[derive(Debug, Clone)]
pub struct LocalBasis {
    origin: Point3<f64>,
    u: Vector3<f64>,
    v: Vector3<f64>,
    normal: Vector3<f64>,
    inverse: Matrix3<f64>,
}

impl LocalBasis {
    /// Chooses a basis from `points`, skipping near-coincident and
    /// near-collinear candidates. Returns `None` if every candidate is
    /// degenerate.
    pub fn from_points(points: &[Point3<f64>], tolerance: f64) -> Option<Self> {
        let origin = *points.first()?;
        let (first, u) = points
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, p)| (i, p - origin))
            .find(|(_, d)| d.norm() > tolerance)?;

        for p in &points[first + 1..] {
            let v = p - origin;
            let normal = u.cross(&v);
            if normal.norm() <= tolerance {
                continue;
            }
            if let Some(inverse) = Matrix3::from_columns(&[u, v, normal]).try_inverse() {
                return Some(Self {
                    origin,
                    u,
                    v,
                    normal,
                    inverse,
                });
            }
        }
        None
    }

    /// Unnormalised plane normal `u × v`.
    pub fn normal(&self) -> Vector3<f64> {
        self.normal
    }

    /// In-plane coordinates of `point` (first two rows of the inverse basis).
    pub fn project(&self, point: &Point3<f64>) -> Point2<f64> {
        let local = self.inverse * (point - self.origin);
        Point2::new(local.x, local.y)
    }

    /// Point of the face plane with in-plane coordinates `point`.
    pub fn unproject(&self, point: &Point2<f64>) -> Point3<f64> {
        self.origin + self.u * point.x + self.v * point.y
    }
}

/// Triangulates one face.
///
/// `boundary` is the face's directed boundary as `[tail, head]` global
/// vertex ids (for instance [`crate::orientation::OrientedCycle::directed_edges`]).
/// Returned triangles use global vertex ids (or engine-added points) and
/// wind in the same direction as the boundary walk.
pub fn triangulate_face<T>(
    face: FaceId,
    vertices: &[Point3<f64>],
    boundary: &[[VertexId; 2]],
    engine: &T,
    tolerance: f64,
) -> Result<FaceTriangulation>
where
    T: ConstrainedTriangulator + ?Sized,
{
    // Local numbering in order of first appearance
    let mut local: FxHashMap<VertexId, usize> = FxHashMap::default();
    let mut ids: Vec<VertexId> = Vec::new();
    for &[a, b] in boundary {
        for v in [a, b] {
            if v >= vertices.len() {
                return Err(Error::IndexOutOfRange {
                    cell: face,
                    index: v,
                    bound: vertices.len(),
                });
            }
            local.entry(v).or_insert_with(|| {
                ids.push(v);
                ids.len() - 1
            });
        }
    }

    if ids.len() < 3 {
        return Err(Error::DegenerateFace { face });
    }

    let points3: Vec<Point3<f64>> = ids.iter().map(|&v| vertices[v]).collect();
    let basis = LocalBasis::from_points(&points3, tolerance).ok_or(Error::DegenerateFace { face })?;
    let points2: Vec<Point2<f64>> = points3.iter().map(|p| basis.project(p)).collect();

    let constraints: Vec<[usize; 2]> = boundary
        .iter()
        .map(|[a, b]| [local[a], local[b]])
        .collect();

    // Winding of the directed boundary in the local plane
    let winding: f64 = constraints
        .iter()
        .map(|&[a, b]| points2[a].x * points2[b].y - points2[b].x * points2[a].y)
        .sum();

    let PlanarTriangulation {
        steiner_points,
        triangles: local_triangles,
    } = engine.triangulate(&points2, &constraints)?;

    let n = ids.len();
    let planar: Vec<Point2<f64>> = points2.iter().chain(&steiner_points).copied().collect();
    let corner = |i: usize| {
        if i < n {
            FaceCorner::Vertex(ids[i])
        } else {
            FaceCorner::Steiner(i - n)
        }
    };

    let mut triangles = Vec::with_capacity(local_triangles.len());
    for [a, b, c] in local_triangles {
        if a.max(b).max(c) >= planar.len() {
            return Err(Error::Triangulation(format!(
                "engine returned a point outside face {face}"
            )));
        }
        let area = triangle_area(&planar[a], &planar[b], &planar[c]);
        let [a, b, c] = if area * winding < 0.0 { [b, a, c] } else { [a, b, c] };
        triangles.push([corner(a), corner(b), corner(c)]);
    }

    trace!(
        face,
        triangles = triangles.len(),
        steiner = steiner_points.len(),
        "Triangulated face"
    );
    Ok(FaceTriangulation {
        steiner_points: steiner_points.iter().map(|p| basis.unproject(p)).collect(),
        triangles,
    })
}
