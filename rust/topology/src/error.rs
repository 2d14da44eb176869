// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for chain complex operations.

/// Result type alias for chain complex operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or consuming a chain complex.
///
/// Every variant that concerns a single entity carries the id of the
/// offending cell so batch callers can report per-entity diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A cell references a vertex or lower-dimensional cell that does not exist.
    #[error("cell {cell} references index {index}, but only {bound} are available")]
    IndexOutOfRange {
        cell: usize,
        index: usize,
        bound: usize,
    },

    /// A cell has the wrong number of distinct vertices (an edge needs exactly 2,
    /// any cell needs at least 1).
    #[error("cell {cell} is malformed: wrong arity ({arity} distinct vertices)")]
    MalformedCell { cell: usize, arity: usize },

    /// The edges bounding a face do not form a single closed walk.
    #[error("face {face} boundary is not a single closed cycle: {reason}")]
    InconsistentCycle { face: usize, reason: String },

    /// The arrangement collaborator failed or returned inconsistent data.
    #[error("arrangement failed: {0}")]
    Arrangement(String),

    /// No non-degenerate 2D basis exists for the face within tolerance.
    #[error("face {face} is degenerate: no planar basis within tolerance")]
    DegenerateFace { face: usize },

    /// The faces of a solid cannot be signed so that shared edges cancel.
    #[error("solid {solid} is not orientable: {reason}")]
    NonOrientableSolid { solid: usize, reason: String },

    /// A face was given an orientation sign other than `-1` or `+1`.
    #[error("face {face} has orientation sign {sign} in solid {solid}, expected -1 or 1")]
    InvalidOrientation { solid: usize, face: usize, sign: i8 },

    /// Operator shapes are incompatible for a product.
    #[error("operator shapes do not compose: {lhs:?} x {rhs:?}")]
    DimensionMismatch {
        lhs: (usize, usize),
        rhs: (usize, usize),
    },

    /// The constrained triangulation engine failed.
    #[error("triangulation failed: {0}")]
    Triangulation(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}
