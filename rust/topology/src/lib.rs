// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # cellchain topology
//!
//! Oriented 3-dimensional chain complexes built from raw cell data.
//!
//! Starting from vertex positions, edges and faces given as vertex lists,
//! this crate derives sparse incidence operators between consecutive
//! dimensions, hands them to a spatial [`Arrangement`] that resolves
//! intersections and supplies solids, and assigns consistent orientation
//! signs so that `∂₁∂₂ = 0` and `∂₂∂₃ = 0` hold. Each solid's boundary can
//! then be triangulated into a closed, consistently wound mesh.
//!
//! ## Pipeline
//!
//! 1. [`build_incidence`] turns cell vertex lists into unsigned operators.
//! 2. [`unsigned_coboundary_2`] relates faces to the edges on their boundary.
//! 3. An [`Arrangement`] refines the complex and returns the solid-face
//!    relation.
//! 4. [`ChainComplex::from_arranged`] signs every operator: edges point from
//!    their lower to their higher vertex, faces follow their boundary walk
//!    ([`orient_face`]) and solids get coherent face signs
//!    ([`coherent_solid_signs`]), flipped where needed so that every solid
//!    faces outward.
//! 5. [`ChainComplex::triangulate_solids`] produces one [`SolidMesh`] per
//!    solid using a [`ConstrainedTriangulator`].

pub mod arrangement;
pub mod boundary;
pub mod complex;
pub mod config;
pub mod error;
pub mod incidence;
pub mod keys;
pub mod operator;
pub mod orientation;
pub mod serialization;
pub mod solid;
pub mod triangulation;

#[cfg(test)]
mod fixtures;

pub use arrangement::{ArrangedComplex, Arrangement, ArrangementInput, Prearranged};
pub use boundary::{
    edge_vertex_signed, signed_boundary_1, signed_coboundary_2, unsigned_coboundary_2,
    vertex_edge_index,
};
pub use complex::{assemble_chain_complex, ChainComplex};
pub use config::Config;
pub use error::{Error, Result};
pub use incidence::{build_incidence, cells_from_operator};
pub use keys::{Cell, CellDimension, Cells, EdgeId, FaceId, SolidId, VertexId};
pub use operator::{Operator, SignedOperator, UnsignedOperator};
pub use orientation::{coherent_solid_signs, orient_face, CycleStep, OrientedCycle};
pub use serialization::{ComplexSnapshot, OperatorSnapshot};
pub use solid::{assemble_solid, BoundaryFace, SolidMesh};
pub use triangulation::{
    triangulate_face, ConstrainedTriangulator, EarcutTriangulator, FaceCorner, FaceTriangulation,
    LocalBasis, PlanarTriangulation,
};
