// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON serialization for chain complexes.
//!
//! A snapshot stores the vertex positions and the three signed operators as
//! sparse triplet lists. Cell vertex lists and adjacency indices are derived
//! again on load, and the restored complex is validated before it is
//! returned.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::complex::ChainComplex;
use crate::error::{Error, Result};
use crate::operator::Operator;

/// Serializable representation of a chain complex.
#[derive(Debug, Serialize, Deserialize)]
pub struct ComplexSnapshot {
    pub vertices: Vec<[f64; 3]>,
    pub edge_vertex: OperatorSnapshot,
    pub face_edge: OperatorSnapshot,
    pub solid_face: OperatorSnapshot,
}

/// Sparse operator as `(row, col, value)` triplets.
#[derive(Debug, Serialize, Deserialize)]
pub struct OperatorSnapshot {
    pub nrows: usize,
    pub ncols: usize,
    pub entries: Vec<(usize, usize, i32)>,
}

impl From<&Operator> for OperatorSnapshot {
    fn from(op: &Operator) -> Self {
        Self {
            nrows: op.nrows(),
            ncols: op.ncols(),
            entries: op.triplets().collect(),
        }
    }
}

impl OperatorSnapshot {
    fn to_operator(&self, name: &str) -> Result<Operator> {
        Operator::try_from_triplets(self.nrows, self.ncols, &self.entries)
            .map_err(|e| Error::Serialization(format!("{name}: {e}")))
    }
}

impl ChainComplex {
    /// Serializes the complex to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_snapshot())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Creates a serializable snapshot of the complex.
    pub fn to_snapshot(&self) -> ComplexSnapshot {
        ComplexSnapshot {
            vertices: self.vertices.iter().map(|p| [p.x, p.y, p.z]).collect(),
            edge_vertex: OperatorSnapshot::from(&self.edge_vertex),
            face_edge: OperatorSnapshot::from(&self.face_edge),
            solid_face: OperatorSnapshot::from(&self.solid_face),
        }
    }

    /// Deserializes a complex from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: ComplexSnapshot =
            serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
        Self::from_snapshot(&snapshot)
    }

    /// Rebuilds a complex from a snapshot.
    ///
    /// Edge rows must be `-1` at the lower vertex id and `+1` at the higher.
    pub fn from_snapshot(snap: &ComplexSnapshot) -> Result<Self> {
        let vertices: Vec<Point3<f64>> = snap
            .vertices
            .iter()
            .map(|&[x, y, z]| Point3::new(x, y, z))
            .collect();

        let edge_vertex = snap.edge_vertex.to_operator("edge_vertex")?;
        let face_edge = snap.face_edge.to_operator("face_edge")?;
        let solid_face = snap.solid_face.to_operator("solid_face")?;

        for edge in 0..edge_vertex.nrows() {
            if edge_vertex.row_values(edge) != [-1, 1] {
                return Err(Error::Serialization(format!(
                    "edge {edge} is not oriented from its lower to its higher vertex"
                )));
            }
        }

        Self::from_parts(vertices, edge_vertex, face_edge, solid_face)
            .map_err(|e| Error::Serialization(format!("invalid complex: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arrangement::Prearranged;
    use crate::complex::assemble_chain_complex;
    use crate::config::Config;
    use crate::fixtures::{two_cubes, unit_cube};

    fn cube() -> ChainComplex {
        let (vertices, edges, faces) = unit_cube();
        let arrangement = Prearranged::new(vec![vec![0, 1, 2, 3, 4, 5]]);
        assemble_chain_complex(&vertices, &faces, &edges, &arrangement, &Config::default()).unwrap()
    }

    #[test]
    fn roundtrip_cube() {
        let complex = cube();
        let json = complex.to_json().unwrap();
        let restored = ChainComplex::from_json(&json).unwrap();

        assert_eq!(restored.vertices(), complex.vertices());
        assert_eq!(restored.edges(), complex.edges());
        assert_eq!(restored.faces(), complex.faces());
        assert_eq!(restored.solids(), complex.solids());
        assert_eq!(restored.face_edge(), complex.face_edge());
        assert_eq!(restored.solid_face(), complex.solid_face());
    }

    #[test]
    fn roundtrip_two_cubes() {
        let (vertices, edges, faces, solids) = two_cubes();
        let complex = assemble_chain_complex(
            &vertices,
            &faces,
            &edges,
            &Prearranged::new(solids),
            &Config::default(),
        )
        .unwrap();

        let restored = ChainComplex::from_json(&complex.to_json().unwrap()).unwrap();
        assert_eq!(restored.solid_count(), 2);
        assert_eq!(restored.euler_characteristic(), complex.euler_characteristic());
    }

    #[test]
    fn malformed_json_is_serialization_error() {
        let err = ChainComplex::from_json("{\"vertices\": 3}").unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn inconsistent_solid_signs_are_rejected() {
        let mut snapshot = cube().to_snapshot();
        for entry in snapshot.solid_face.entries.iter_mut() {
            entry.2 = 1;
        }
        let err = ChainComplex::from_snapshot(&snapshot).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn reversed_edge_is_rejected() {
        let mut snapshot = cube().to_snapshot();
        for entry in snapshot.edge_vertex.entries.iter_mut().filter(|e| e.0 == 0) {
            entry.2 = -entry.2;
        }
        let err = ChainComplex::from_snapshot(&snapshot).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn out_of_range_entry_is_rejected() {
        let mut snapshot = cube().to_snapshot();
        snapshot.face_edge.entries.push((0, 99, 1));
        let err = ChainComplex::from_snapshot(&snapshot).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
