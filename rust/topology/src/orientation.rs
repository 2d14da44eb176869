// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Orientation recovery from unsigned incidence.
//!
//! ## Face cycles
//!
//! [`orient_face`] turns the unordered set of edges bounding a face into a
//! closed walk. Starting from the lowest-numbered edge, each step follows the
//! single unplaced face edge that touches the current head vertex. Edges
//! whose listing runs against the walk are recorded with sign `-1` and their
//! endpoints swapped, so that the head of every step is the tail of the next.
//! No coordinates are needed.
//!
//! ## Solid signs
//!
//! [`coherent_solid_signs`] assigns `±1` to every face of a solid so that
//! each edge shared by two of its faces is traversed in opposite directions,
//! which is the combinatorial condition `∂₂∂₃ = 0` for that solid.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::boundary::edge_endpoints;
use crate::error::{Error, Result};
use crate::keys::{Cell, EdgeId, FaceId, SolidId, VertexId};
use crate::operator::SignedOperator;

/// One oriented edge in a face's boundary walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleStep {
    /// `+1` if the edge is walked in its listing direction, `-1` otherwise.
    pub sign: i8,
    pub edge: EdgeId,
    /// Effective tail (after applying `sign`).
    pub tail: VertexId,
    /// Effective head (after applying `sign`).
    pub head: VertexId,
}

/// Closed, oriented walk over the boundary edges of one face.
///
/// Invariant: `steps[k].head == steps[(k + 1) % n].tail`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrientedCycle {
    face: FaceId,
    steps: Vec<CycleStep>,
}

impl OrientedCycle {
    /// The face this cycle bounds.
    pub fn face(&self) -> FaceId {
        self.face
    }

    /// Steps in walk order.
    pub fn steps(&self) -> &[CycleStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns `true` if every head equals the following tail (cyclically).
    pub fn is_closed(&self) -> bool {
        let n = self.steps.len();
        n > 0
            && (0..n).all(|k| self.steps[k].head == self.steps[(k + 1) % n].tail)
    }

    /// Vertices in walk order (the tail of every step).
    pub fn vertices(&self) -> Vec<VertexId> {
        self.steps.iter().map(|s| s.tail).collect()
    }

    /// Boundary as directed `[tail, head]` vertex pairs.
    pub fn directed_edges(&self) -> Vec<[VertexId; 2]> {
        self.steps.iter().map(|s| [s.tail, s.head]).collect()
    }

    /// `(edge, sign)` pairs to scatter into a signed face-edge operator row.
    pub fn scatter_row(&self) -> impl Iterator<Item = (EdgeId, i8)> + '_ {
        self.steps.iter().map(|s| (s.edge, s.sign))
    }

    /// The same boundary walked in the opposite direction.
    pub fn reversed(&self) -> Self {
        let steps = self
            .steps
            .iter()
            .rev()
            .map(|s| CycleStep {
                sign: -s.sign,
                edge: s.edge,
                tail: s.head,
                head: s.tail,
            })
            .collect();
        Self {
            face: self.face,
            steps,
        }
    }
}

/// Recovers the oriented boundary cycle of `face`.
///
/// `incident_edges` is the face's unordered set of bounding edges (a row of
/// the unsigned face-edge operator), `edges` the global edge list and
/// `vertex_to_edges` the vertex → incident edges index over `edges`.
///
/// Fails with [`Error::InconsistentCycle`] when the edges do not form a single
/// closed walk (a vertex with zero or several unplaced continuations, or a
/// walk that does not return to its start).
pub fn orient_face(
    face: FaceId,
    incident_edges: &[EdgeId],
    edges: &[Cell],
    vertex_to_edges: &FxHashMap<VertexId, FxHashSet<EdgeId>>,
) -> Result<OrientedCycle> {
    let endpoints = |edge: EdgeId| -> Result<(VertexId, VertexId)> {
        let cell = edges.get(edge).ok_or(Error::IndexOutOfRange {
            cell: face,
            index: edge,
            bound: edges.len(),
        })?;
        edge_endpoints(edge, cell)
    };

    let seed = incident_edges
        .iter()
        .copied()
        .min()
        .ok_or_else(|| Error::InconsistentCycle {
            face,
            reason: "face has no bounding edges".into(),
        })?;

    let mut remaining: FxHashSet<EdgeId> = incident_edges.iter().copied().collect();
    remaining.remove(&seed);

    let (tail, head) = endpoints(seed)?;
    let mut steps = Vec::with_capacity(remaining.len() + 1);
    steps.push(CycleStep {
        sign: 1,
        edge: seed,
        tail,
        head,
    });

    let mut current = head;
    while !remaining.is_empty() {
        let candidates: Vec<EdgeId> = vertex_to_edges
            .get(&current)
            .map(|incident| {
                incident
                    .iter()
                    .copied()
                    .filter(|e| remaining.contains(e))
                    .collect()
            })
            .unwrap_or_default();

        let next = match candidates.as_slice() {
            [edge] => *edge,
            _ => {
                return Err(Error::InconsistentCycle {
                    face,
                    reason: format!(
                        "{} unplaced edges continue the walk at vertex {current}",
                        candidates.len()
                    ),
                })
            }
        };
        remaining.remove(&next);

        let (a, b) = endpoints(next)?;
        let step = if a == current {
            CycleStep {
                sign: 1,
                edge: next,
                tail: a,
                head: b,
            }
        } else if b == current {
            CycleStep {
                sign: -1,
                edge: next,
                tail: b,
                head: a,
            }
        } else {
            return Err(Error::InconsistentCycle {
                face,
                reason: format!("edge {next} is indexed at vertex {current} but does not touch it"),
            });
        };

        current = step.head;
        steps.push(step);
    }

    if current != steps[0].tail {
        return Err(Error::InconsistentCycle {
            face,
            reason: format!(
                "walk ends at vertex {current} instead of returning to vertex {}",
                steps[0].tail
            ),
        });
    }

    trace!(face, len = steps.len(), "Oriented face cycle");
    Ok(OrientedCycle { face, steps })
}

/// Signs the faces of a solid so that shared edges cancel.
///
/// `faces` lists the solid's boundary faces; `face_edge` is the signed
/// face-edge operator. The first face of every connected group of faces is
/// given `+1` and the signs spread breadth-first across shared edges: for an
/// edge used by faces `f` and `g` with operator signs `s_f` and `s_g`, the
/// solid signs must satisfy `σ_f·s_f + σ_g·s_g = 0`.
///
/// The result is coherent but may face inward; the chain complex flips such
/// solids when it assembles them.
///
/// Fails with [`Error::NonOrientableSolid`] if an edge is used by a number of
/// the solid's faces other than two, or if the constraints contradict each
/// other.
pub fn coherent_solid_signs(
    solid: SolidId,
    faces: &[FaceId],
    face_edge: &SignedOperator,
) -> Result<Vec<(FaceId, i8)>> {
    for &face in faces {
        if face >= face_edge.nrows() {
            return Err(Error::IndexOutOfRange {
                cell: solid,
                index: face,
                bound: face_edge.nrows(),
            });
        }
    }

    // edge -> (position in `faces`, operator sign)
    let mut users: FxHashMap<EdgeId, Vec<(usize, i32)>> = FxHashMap::default();
    for (pos, &face) in faces.iter().enumerate() {
        for (edge, sign) in face_edge.row(face) {
            users.entry(edge).or_default().push((pos, sign));
        }
    }
    if let Some((edge, list)) = users.iter().find(|(_, list)| list.len() != 2) {
        return Err(Error::NonOrientableSolid {
            solid,
            reason: format!("edge {edge} bounds {} of its faces", list.len()),
        });
    }

    let mut signs = vec![0i32; faces.len()];
    let mut queue = VecDeque::new();
    for start in 0..faces.len() {
        if signs[start] != 0 {
            continue;
        }
        signs[start] = 1;
        queue.push_back(start);

        while let Some(pos) = queue.pop_front() {
            for (edge, sign) in face_edge.row(faces[pos]) {
                let list = &users[&edge];
                let (other, other_sign) = if list[0].0 == pos { list[1] } else { list[0] };
                let required = -signs[pos] * sign * other_sign;

                if signs[other] == 0 {
                    signs[other] = required;
                    queue.push_back(other);
                } else if signs[other] != required {
                    return Err(Error::NonOrientableSolid {
                        solid,
                        reason: format!("conflicting orientation across edge {edge}"),
                    });
                }
            }
        }
    }

    Ok(faces
        .iter()
        .zip(signs)
        .map(|(&face, sign)| (face, sign as i8))
        .collect())
}
