// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Oriented 3-dimensional chain complexes.
//!
//! The [`ChainComplex`] owns the refined vertices, the cell lists of every
//! dimension and the three signed operators between consecutive dimensions:
//!
//! | Operator       | Shape            | Signs                                   |
//! |----------------|------------------|-----------------------------------------|
//! | `edge_vertex`  | edges × vertices | `-1` first endpoint, `+1` second        |
//! | `face_edge`    | faces × edges    | orientation of the face's boundary walk |
//! | `solid_face`   | solids × faces   | coherent per solid, outward facing      |
//!
//! Boundary maps are the transposes, and `∂₁∂₂ = 0`, `∂₂∂₃ = 0` hold for a
//! well-formed complex ([`ChainComplex::validate`]). Every solid is oriented
//! outward: its signed faces enclose a positive volume.

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

use crate::arrangement::{ArrangedComplex, Arrangement, ArrangementInput};
use crate::boundary::{edge_vertex_signed, sign_face_edge, unsigned_coboundary_2, vertex_edge_index};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::incidence::{build_incidence, cells_from_operator};
use crate::keys::{Cell, CellDimension, Cells, EdgeId, FaceId, SolidId, VertexId};
use crate::operator::{Operator, SignedOperator};
use crate::orientation::{coherent_solid_signs, orient_face, OrientedCycle};
use crate::solid::{assemble_solid, BoundaryFace, SolidMesh};
use crate::triangulation::ConstrainedTriangulator;

/// A signed 3-dimensional chain complex.
///
/// # Example
///
/// ```
/// use cellchain_topology::{assemble_chain_complex, Config, Prearranged};
/// use nalgebra::{Point3, Vector3};
///
/// // A tetrahedron
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
///     Point3::new(0.0, 0.0, 1.0),
/// ];
/// let edges = vec![vec![0, 1], vec![0, 2], vec![0, 3], vec![1, 2], vec![1, 3], vec![2, 3]];
/// let faces = vec![vec![0, 1, 2], vec![0, 1, 3], vec![0, 2, 3], vec![1, 2, 3]];
///
/// let arrangement = Prearranged::new(vec![vec![0, 1, 2, 3]]);
/// let complex =
///     assemble_chain_complex(&vertices, &faces, &edges, &arrangement, &Config::default()).unwrap();
///
/// assert_eq!(complex.solid_count(), 1);
/// assert!(complex.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ChainComplex {
    pub(crate) vertices: Vec<Point3<f64>>,
    pub(crate) edges: Cells,
    pub(crate) faces: Cells,
    pub(crate) solids: Cells,

    pub(crate) edge_vertex: SignedOperator,
    pub(crate) face_edge: SignedOperator,
    pub(crate) solid_face: SignedOperator,

    // Upward adjacency: vertex → edges using it
    pub(crate) vertex_to_edges: FxHashMap<VertexId, FxHashSet<EdgeId>>,
}

/// Builds a chain complex from raw cells through an arrangement.
///
/// 1. unsigned edge-vertex incidence of the raw 1-skeleton;
/// 2. unsigned face-edge relation of the raw faces;
/// 3. the arrangement refines both and supplies the solids;
/// 4. vertex lists of edges, faces and solids are read off the refined
///    operators (a face owns the vertices of its edges, a solid those of its
///    faces);
/// 5. edges are re-signed (`-1` first endpoint, `+1` second), faces are
///    signed by their boundary walks and solid signs are made coherent;
/// 6. each solid's signs are flipped if needed so that it faces outward.
pub fn assemble_chain_complex<A>(
    vertices: &[Point3<f64>],
    faces: &[Cell],
    edges: &[Cell],
    arrangement: &A,
    config: &Config,
) -> Result<ChainComplex>
where
    A: Arrangement + ?Sized,
{
    let edge_vertex = build_incidence(edges, vertices.len())?;
    let face_edge = unsigned_coboundary_2(faces, edges, vertices.len())?;

    debug!(
        vertices = vertices.len(),
        edges = edges.len(),
        faces = faces.len(),
        "Invoking arrangement"
    );
    let arranged = arrangement.arrange(&ArrangementInput {
        vertices,
        edge_vertex: &edge_vertex,
        face_edge: &face_edge,
    })?;

    ChainComplex::from_arranged(arranged, config)
}

impl ChainComplex {
    /// Derives cells and signed operators from an arrangement result.
    pub fn from_arranged(arranged: ArrangedComplex, config: &Config) -> Result<Self> {
        arranged.check()?;
        let ArrangedComplex {
            vertices,
            edge_vertex,
            face_edge,
            solid_face,
        } = arranged;

        let edges = cells_from_operator(&edge_vertex);
        let face_vertex = face_edge.to_unsigned().matmul(&edge_vertex.to_unsigned())?;
        let solid_vertex = solid_face.to_unsigned().matmul(&face_vertex)?;
        let faces = cells_from_operator(&face_vertex);
        let solids = cells_from_operator(&solid_vertex);

        let edge_vertex = edge_vertex_signed(&edges, vertices.len())?;
        let vertex_to_edges = vertex_edge_index(&edges);
        let face_edge = sign_face_edge(&face_edge.to_unsigned(), &edges, &vertex_to_edges)?;

        let mut complex = Self {
            vertices,
            edges,
            faces,
            solids,
            edge_vertex,
            face_edge,
            solid_face,
            vertex_to_edges,
        };

        let closes = complex
            .face_edge
            .transpose()
            .matmul(&complex.solid_face.transpose())?
            .is_zero();
        if config.recompute_solid_signs || !closes {
            if !config.recompute_solid_signs && !complex.solid_face.is_unsigned() {
                warn!("Arrangement solid signs do not cancel on shared edges, recomputing");
            }
            complex.solid_face = complex.coherent_solid_face()?;
        }
        complex.solid_face = complex.outward_solid_face()?;

        debug!(
            vertices = complex.vertex_count(),
            edges = complex.edge_count(),
            faces = complex.face_count(),
            solids = complex.solid_count(),
            "Assembled chain complex"
        );
        Ok(complex)
    }

    /// Assembles a complex directly from signed operators, checking that
    /// they chain together and describe closed face cycles.
    pub(crate) fn from_parts(
        vertices: Vec<Point3<f64>>,
        edge_vertex: SignedOperator,
        face_edge: SignedOperator,
        solid_face: SignedOperator,
    ) -> Result<Self> {
        let arranged = ArrangedComplex {
            vertices,
            edge_vertex,
            face_edge,
            solid_face,
        };
        arranged.check()?;
        let ArrangedComplex {
            vertices,
            edge_vertex,
            face_edge,
            solid_face,
        } = arranged;

        let edges = cells_from_operator(&edge_vertex);
        let face_vertex = face_edge.to_unsigned().matmul(&edge_vertex.to_unsigned())?;
        let solids = cells_from_operator(&solid_face.to_unsigned().matmul(&face_vertex)?);
        let complex = Self {
            vertex_to_edges: vertex_edge_index(&edges),
            faces: cells_from_operator(&face_vertex),
            vertices,
            edges,
            solids,
            edge_vertex,
            face_edge,
            solid_face,
        };
        complex.validate()?;
        Ok(complex)
    }

    /// Solid-face operator with coherent signs for every solid.
    fn coherent_solid_face(&self) -> Result<SignedOperator> {
        let rows = (0..self.solid_count())
            .map(|solid| {
                let faces = self.solid_face.row_indices(solid);
                coherent_solid_signs(solid, faces, &self.face_edge)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Operator::from_triplets(
            self.solid_count(),
            self.face_count(),
            rows.into_iter().enumerate().flat_map(|(solid, signs)| {
                signs
                    .into_iter()
                    .map(move |(face, sign)| (solid, face, i32::from(sign)))
            }),
        ))
    }

    /// Solid-face operator with every solid's row negated where its faces
    /// enclose a negative volume.
    fn outward_solid_face(&self) -> Result<SignedOperator> {
        let mut triplets = Vec::with_capacity(self.solid_face.nnz());
        for solid in 0..self.solid_count() {
            let signs = self.solid_faces(solid)?;
            let flip = if self.enclosed_volume(&signs)? < 0.0 {
                debug!(solid, "Flipping solid to outward orientation");
                -1
            } else {
                1
            };
            triplets.extend(
                signs
                    .into_iter()
                    .map(|(face, sign)| (solid, face, flip * i32::from(sign))),
            );
        }
        Ok(Operator::from_triplets(
            self.solid_count(),
            self.face_count(),
            triplets,
        ))
    }

    /// Signed volume bounded by `(face, sign)` pairs.
    ///
    /// Each face contributes `sign · p · A / 3`, with `A` the vector area of
    /// its oriented boundary cycle and `p` any point of the face.
    fn enclosed_volume(&self, faces: &[(FaceId, i8)]) -> Result<f64> {
        let mut volume = 0.0;
        for &(face, sign) in faces {
            let boundary = self.face_cycle(face)?.directed_edges();
            let Some(&[anchor, _]) = boundary.first() else {
                continue;
            };
            let twice_area: Vector3<f64> = boundary
                .iter()
                .map(|&[a, b]| self.vertices[a].coords.cross(&self.vertices[b].coords))
                .sum();
            volume += f64::from(sign) * self.vertices[anchor].coords.dot(&twice_area) / 6.0;
        }
        Ok(volume)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    pub fn edges(&self) -> &Cells {
        &self.edges
    }

    pub fn faces(&self) -> &Cells {
        &self.faces
    }

    pub fn solids(&self) -> &Cells {
        &self.solids
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn solid_count(&self) -> usize {
        self.solids.len()
    }

    /// Number of cells of the given dimension.
    pub fn count(&self, dimension: CellDimension) -> usize {
        match dimension {
            CellDimension::Vertex => self.vertex_count(),
            CellDimension::Edge => self.edge_count(),
            CellDimension::Face => self.face_count(),
            CellDimension::Solid => self.solid_count(),
        }
    }

    /// Vertex lists of the cells of a dimension (`None` for vertices).
    pub fn cells(&self, dimension: CellDimension) -> Option<&Cells> {
        match dimension {
            CellDimension::Vertex => None,
            CellDimension::Edge => Some(&self.edges),
            CellDimension::Face => Some(&self.faces),
            CellDimension::Solid => Some(&self.solids),
        }
    }

    /// Signed edges × vertices.
    pub fn edge_vertex(&self) -> &SignedOperator {
        &self.edge_vertex
    }

    /// Signed faces × edges.
    pub fn face_edge(&self) -> &SignedOperator {
        &self.face_edge
    }

    /// Signed solids × faces.
    pub fn solid_face(&self) -> &SignedOperator {
        &self.solid_face
    }

    /// Operator from cells of `dimension` to cells one dimension lower.
    pub fn coboundary(&self, dimension: CellDimension) -> Option<&SignedOperator> {
        match dimension {
            CellDimension::Vertex => None,
            CellDimension::Edge => Some(&self.edge_vertex),
            CellDimension::Face => Some(&self.face_edge),
            CellDimension::Solid => Some(&self.solid_face),
        }
    }

    /// ∂₁: vertices × edges.
    pub fn boundary_1(&self) -> SignedOperator {
        self.edge_vertex.transpose()
    }

    /// ∂₂: edges × faces.
    pub fn boundary_2(&self) -> SignedOperator {
        self.face_edge.transpose()
    }

    /// ∂₃: faces × solids.
    pub fn boundary_3(&self) -> SignedOperator {
        self.solid_face.transpose()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Oriented boundary cycle of a face, consistent with its `face_edge` row.
    pub fn face_cycle(&self, face: FaceId) -> Result<OrientedCycle> {
        if face >= self.face_count() {
            return Err(Error::IndexOutOfRange {
                cell: face,
                index: face,
                bound: self.face_count(),
            });
        }
        let cycle = orient_face(
            face,
            self.face_edge.row_indices(face),
            &self.edges,
            &self.vertex_to_edges,
        )?;

        // The walk may come out opposite to the stored signs
        let agrees = cycle
            .scatter_row()
            .all(|(edge, sign)| self.face_edge.get(face, edge) == i32::from(sign));
        Ok(if agrees { cycle } else { cycle.reversed() })
    }

    /// Oriented cycles of all faces, one result per face.
    pub fn face_cycles(&self, config: &Config) -> Vec<Result<OrientedCycle>> {
        let run = |face: FaceId| {
            let result = self.face_cycle(face);
            if let Err(e) = &result {
                warn!(face, error = %e, "Face cycle failed");
            }
            result
        };
        if config.parallel {
            (0..self.face_count()).into_par_iter().map(run).collect()
        } else {
            (0..self.face_count()).map(run).collect()
        }
    }

    /// `(face, sign)` pairs bounding a solid.
    pub fn solid_faces(&self, solid: SolidId) -> Result<Vec<(FaceId, i8)>> {
        if solid >= self.solid_count() {
            return Err(Error::IndexOutOfRange {
                cell: solid,
                index: solid,
                bound: self.solid_count(),
            });
        }
        Ok(self
            .solid_face
            .row(solid)
            .map(|(face, sign)| (face, sign.signum() as i8))
            .collect())
    }

    /// Volume enclosed by a solid's signed faces. Positive for every solid
    /// of an assembled complex.
    pub fn solid_volume(&self, solid: SolidId) -> Result<f64> {
        self.enclosed_volume(&self.solid_faces(solid)?)
    }

    /// Euler characteristic `V - E + F - S`.
    pub fn euler_characteristic(&self) -> i64 {
        CellDimension::ALL
            .iter()
            .map(|&d| {
                let n = self.count(d) as i64;
                if d.rank() % 2 == 0 {
                    n
                } else {
                    -n
                }
            })
            .sum()
    }

    /// Checks `∂₁∂₂ = 0` and `∂₂∂₃ = 0`.
    pub fn validate(&self) -> Result<()> {
        if !self.boundary_1().matmul(&self.boundary_2())?.is_zero() {
            return Err(Error::Arrangement(
                "face boundaries are not closed (∂₁∂₂ ≠ 0)".into(),
            ));
        }
        if !self.boundary_2().matmul(&self.boundary_3())?.is_zero() {
            return Err(Error::Arrangement(
                "solid boundaries are not closed (∂₂∂₃ ≠ 0)".into(),
            ));
        }
        Ok(())
    }

    // =========================================================================
    // Triangulation
    // =========================================================================

    /// Triangulated, consistently wound boundary of one solid.
    pub fn triangulate_solid<T>(&self, solid: SolidId, engine: &T, config: &Config) -> Result<SolidMesh>
    where
        T: ConstrainedTriangulator + ?Sized,
    {
        let faces = self
            .solid_faces(solid)?
            .into_iter()
            .map(|(face, sign)| {
                Ok(BoundaryFace {
                    face,
                    sign,
                    boundary: self.face_cycle(face)?.directed_edges(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        assemble_solid(solid, &faces, &self.vertices, engine, config.basis_tolerance)
    }

    /// Triangulates every solid, one result per solid.
    ///
    /// A failing solid is reported in its slot and does not affect the others.
    pub fn triangulate_solids<T>(&self, engine: &T, config: &Config) -> Vec<Result<SolidMesh>>
    where
        T: ConstrainedTriangulator + ?Sized,
    {
        let run = |solid: SolidId| {
            let result = self.triangulate_solid(solid, engine, config);
            if let Err(e) = &result {
                warn!(solid, error = %e, "Solid triangulation failed");
            }
            result
        };
        if config.parallel {
            (0..self.solid_count()).into_par_iter().map(run).collect()
        } else {
            (0..self.solid_count()).map(run).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arrangement::Prearranged;
    use crate::fixtures::{disjoint_cubes, two_cubes, unit_cube, UNIT_CUBE_OUTWARD_SIGNS};
    use crate::triangulation::EarcutTriangulator;
    use approx::assert_relative_eq;

    fn cube_complex(config: &Config) -> ChainComplex {
        let (vertices, edges, faces) = unit_cube();
        let arrangement = Prearranged::new(vec![vec![0, 1, 2, 3, 4, 5]]);
        assemble_chain_complex(&vertices, &faces, &edges, &arrangement, config).unwrap()
    }

    struct FailingArrangement;

    impl Arrangement for FailingArrangement {
        fn arrange(&self, _input: &ArrangementInput<'_>) -> Result<ArrangedComplex> {
            Err(Error::Arrangement("no intersection kernel".into()))
        }
    }

    struct EmptyArrangement;

    impl Arrangement for EmptyArrangement {
        fn arrange(&self, input: &ArrangementInput<'_>) -> Result<ArrangedComplex> {
            Ok(ArrangedComplex {
                vertices: input.vertices.to_vec(),
                edge_vertex: input.edge_vertex.clone(),
                face_edge: input.face_edge.clone(),
                solid_face: Operator::zeros(0, input.face_edge.nrows()),
            })
        }
    }

    /// Splits the bottom edge 0-1 of the cube at its midpoint.
    struct SplitBottomEdge;

    impl Arrangement for SplitBottomEdge {
        fn arrange(&self, input: &ArrangementInput<'_>) -> Result<ArrangedComplex> {
            let mut vertices = input.vertices.to_vec();
            let mid = vertices.len();
            vertices.push(Point3::new(0.5, 0.0, 0.0));

            let mut edges = cells_from_operator(input.edge_vertex);
            let new_edge = edges.len();
            edges[0] = vec![0, mid];
            edges.push(vec![mid, 1]);

            let mut faces = cells_from_operator(input.face_edge);
            for face in faces.iter_mut() {
                if face.contains(&0) {
                    face.push(new_edge);
                }
            }

            Ok(ArrangedComplex {
                edge_vertex: build_incidence(&edges, vertices.len())?,
                face_edge: build_incidence(&faces, edges.len())?,
                solid_face: build_incidence(&[vec![0, 1, 2, 3, 4, 5]], faces.len())?,
                vertices,
            })
        }
    }

    #[test]
    fn cube_complex_is_valid() {
        let complex = cube_complex(&Config::default());

        assert_eq!(complex.vertex_count(), 8);
        assert_eq!(complex.edge_count(), 12);
        assert_eq!(complex.face_count(), 6);
        assert_eq!(complex.solid_count(), 1);
        assert_eq!(complex.euler_characteristic(), 1);
        assert!(complex.validate().is_ok());
    }

    #[test]
    fn bases_are_sorted_vertex_sets() {
        let complex = cube_complex(&Config::default());
        assert_eq!(complex.faces()[2], vec![0, 1, 4, 5]);
        assert_eq!(complex.solids()[0], (0..8).collect::<Vec<_>>());
        assert_eq!(complex.cells(CellDimension::Edge).unwrap()[3], vec![0, 3]);
        assert!(complex.cells(CellDimension::Vertex).is_none());
    }

    #[test]
    fn edge_rows_have_one_tail_and_one_head() {
        let complex = cube_complex(&Config::default());
        for edge in 0..complex.edge_count() {
            let mut values = complex.edge_vertex().row_values(edge).to_vec();
            values.sort_unstable();
            assert_eq!(values, vec![-1, 1]);
        }
    }

    #[test]
    fn unsigned_solid_faces_are_made_coherent() {
        let complex = cube_complex(&Config::default());
        assert!(complex.solid_face().is_signed_unit());
        assert!(!complex.solid_face().is_unsigned());
        assert!(complex
            .boundary_2()
            .matmul(&complex.boundary_3())
            .unwrap()
            .is_zero());
    }

    #[test]
    fn face_cycle_agrees_with_operator_row() {
        let complex = cube_complex(&Config::default());
        for face in 0..complex.face_count() {
            let cycle = complex.face_cycle(face).unwrap();
            assert!(cycle.is_closed());
            for (edge, sign) in cycle.scatter_row() {
                assert_eq!(complex.face_edge().get(face, edge), i32::from(sign));
            }
        }
    }

    #[test]
    fn face_cycles_batch_matches_single_calls() {
        let complex = cube_complex(&Config::default());
        let batch = complex.face_cycles(&Config::default());
        assert_eq!(batch.len(), 6);
        for (face, result) in batch.into_iter().enumerate() {
            assert_eq!(result.unwrap(), complex.face_cycle(face).unwrap());
        }
    }

    #[test]
    fn arrangement_errors_are_surfaced() {
        let (vertices, edges, faces) = unit_cube();
        let err = assemble_chain_complex(&vertices, &faces, &edges, &FailingArrangement, &Config::default())
            .unwrap_err();
        assert!(matches!(err, Error::Arrangement(_)));
    }

    #[test]
    fn empty_arrangement_is_rejected() {
        let (vertices, edges, faces) = unit_cube();
        let err = assemble_chain_complex(&vertices, &faces, &edges, &EmptyArrangement, &Config::default())
            .unwrap_err();
        assert!(matches!(err, Error::Arrangement(_)));
    }

    #[test]
    fn refined_vertices_flow_into_cells() {
        let (vertices, edges, faces) = unit_cube();
        let complex =
            assemble_chain_complex(&vertices, &faces, &edges, &SplitBottomEdge, &Config::default())
                .unwrap();

        assert_eq!(complex.vertex_count(), 9);
        assert_eq!(complex.edge_count(), 13);
        // bottom and front faces gained the midpoint
        assert_eq!(complex.faces()[0], vec![0, 1, 2, 3, 8]);
        assert_eq!(complex.faces()[2], vec![0, 1, 4, 5, 8]);
        assert_eq!(complex.face_cycle(0).unwrap().len(), 5);
        assert_eq!(complex.euler_characteristic(), 1);
        assert!(complex.validate().is_ok());

        let mesh = complex
            .triangulate_solid(0, &EarcutTriangulator, &Config::default())
            .unwrap();
        assert!(mesh.is_closed());
        assert_eq!(mesh.euler_characteristic(), 2);
        assert_relative_eq!(mesh.signed_volume(), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn two_cubes_share_a_face() {
        let (vertices, edges, faces, solids) = two_cubes();
        let complex = assemble_chain_complex(
            &vertices,
            &faces,
            &edges,
            &Prearranged::new(solids),
            &Config::default(),
        )
        .unwrap();

        assert_eq!(complex.euler_characteristic(), 12 - 20 + 11 - 2);
        assert!(complex.validate().is_ok());

        let shared: Vec<_> = (0..2)
            .filter(|&s| complex.solid_faces(s).unwrap().iter().any(|&(f, _)| f == 5))
            .collect();
        assert_eq!(shared, vec![0, 1]);

        for result in complex.triangulate_solids(&EarcutTriangulator, &Config::default()) {
            let mesh = result.unwrap();
            assert!(mesh.is_closed());
            assert_relative_eq!(mesh.signed_volume(), 1.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn every_solid_faces_outward() {
        let (vertices, edges, faces, solids) = disjoint_cubes();
        let complex = assemble_chain_complex(
            &vertices,
            &faces,
            &edges,
            &Prearranged::new(solids),
            &Config::default(),
        )
        .unwrap();
        complex.validate().unwrap();

        for solid in 0..2 {
            assert_relative_eq!(complex.solid_volume(solid).unwrap(), 1.0, epsilon = 1e-10);
        }
        let volumes: Vec<f64> = complex
            .triangulate_solids(&EarcutTriangulator, &Config::default())
            .into_iter()
            .map(|mesh| mesh.unwrap().signed_volume())
            .collect();
        assert_eq!(volumes.len(), 2);
        for volume in volumes {
            assert_relative_eq!(volume, 1.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn inward_arrangement_signs_are_flipped() {
        // Coherent, but every face points into the cube
        struct Inward;

        impl Arrangement for Inward {
            fn arrange(&self, input: &ArrangementInput<'_>) -> Result<ArrangedComplex> {
                let triplets: Vec<_> = UNIT_CUBE_OUTWARD_SIGNS
                    .iter()
                    .enumerate()
                    .map(|(face, &sign)| (0, face, -i32::from(sign)))
                    .collect();
                Ok(ArrangedComplex {
                    vertices: input.vertices.to_vec(),
                    edge_vertex: input.edge_vertex.clone(),
                    face_edge: input.face_edge.clone(),
                    solid_face: Operator::try_from_triplets(1, input.face_edge.nrows(), &triplets)?,
                })
            }
        }

        let (vertices, edges, faces) = unit_cube();
        let complex =
            assemble_chain_complex(&vertices, &faces, &edges, &Inward, &Config::default()).unwrap();
        let signs: Vec<i8> = complex
            .solid_faces(0)
            .unwrap()
            .into_iter()
            .map(|(_, s)| s)
            .collect();
        assert_eq!(signs, UNIT_CUBE_OUTWARD_SIGNS.to_vec());
        assert_relative_eq!(complex.solid_volume(0).unwrap(), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn sequential_and_parallel_batches_agree() {
        let complex = cube_complex(&Config::default());
        let par = complex.triangulate_solids(&EarcutTriangulator, &Config::default());
        let seq = complex.triangulate_solids(&EarcutTriangulator, &Config::default().with_parallel(false));
        assert_eq!(par.len(), seq.len());
        for (a, b) in par.into_iter().zip(seq) {
            assert_eq!(a.unwrap(), b.unwrap());
        }
    }

    #[test]
    fn degenerate_face_fails_only_its_solid() {
        let (vertices, edges, faces, solids) = two_cubes();
        let mut complex = assemble_chain_complex(
            &vertices,
            &faces,
            &edges,
            &Prearranged::new(solids),
            &Config::default(),
        )
        .unwrap();
        // Collapse the far face of the second cube onto a line
        for v in 8..12 {
            complex.vertices[v] = Point3::new(2.0, 0.0, 0.0);
        }

        let results = complex.triangulate_solids(&EarcutTriangulator, &Config::default());
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }

    #[test]
    fn out_of_range_queries_are_index_errors() {
        let complex = cube_complex(&Config::default());
        assert!(matches!(complex.face_cycle(6), Err(Error::IndexOutOfRange { .. })));
        assert!(matches!(complex.solid_faces(1), Err(Error::IndexOutOfRange { .. })));
    }
}
