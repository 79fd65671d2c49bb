// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Face adjacency (dual) graph

use super::merge::{FaceId, FaceMerge};
use crate::geometry::{EdgeKey, Triangle};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Adjacency between two distinct faces across one shared mesh edge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolyEdge {
    pub key: EdgeKey,
    /// Face of the first triangle on the edge, then the second
    pub faces: [FaceId; 2],
    /// Shared corners, in the order they appear on the first triangle
    pub endpoints: [Point3<f64>; 2],
}

impl PolyEdge {
    /// Face across the edge from `face`
    pub fn other(&self, face: FaceId) -> Option<FaceId> {
        if self.faces[0] == face {
            Some(self.faces[1])
        } else if self.faces[1] == face {
            Some(self.faces[0])
        } else {
            None
        }
    }

    pub fn joins(&self, a: FaceId, b: FaceId) -> bool {
        self.other(a) == Some(b)
    }

    pub fn direction(&self) -> Vector3<f64> {
        self.endpoints[1] - self.endpoints[0]
    }

    pub fn length(&self) -> f64 {
        self.direction().norm()
    }

    pub fn midpoint(&self) -> Point3<f64> {
        nalgebra::center(&self.endpoints[0], &self.endpoints[1])
    }
}

/// Neighbour entry in a face's adjacency list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjacent {
    /// Position of the neighbouring face in the face list
    pub slot: usize,
    /// Index of the connecting [`PolyEdge`]
    pub edge: usize,
}

/// Face-to-face adjacency graph
#[derive(Debug, Clone, Default)]
pub struct DualGraph {
    edges: Vec<PolyEdge>,
    adjacency: Vec<Vec<Adjacent>>,
}

impl DualGraph {
    /// Build one [`PolyEdge`] per mesh edge shared by exactly two triangles of
    /// different faces, in edge first-seen order
    pub fn build(triangles: &[Triangle], merge: &FaceMerge, seam_tolerance: f64) -> Self {
        let mut graph = Self {
            edges: Vec::new(),
            adjacency: vec![Vec::new(); merge.faces.len()],
        };
        let mut unmatched = 0usize;

        for edge in merge.usage.iter() {
            let [ta, tb] = match edge.triangles[..] {
                [ta, tb] => [ta, tb],
                _ => continue,
            };
            let (fa, fb) = (merge.face_of[ta], merge.face_of[tb]);
            if fa == fb {
                continue;
            }
            let (Some(&sa), Some(&sb)) = (merge.slots.get(&fa), merge.slots.get(&fb)) else {
                continue;
            };

            let Some(endpoints) = shared_endpoints(&triangles[ta], &triangles[tb], seam_tolerance)
            else {
                unmatched += 1;
                continue;
            };

            let index = graph.edges.len();
            graph.edges.push(PolyEdge {
                key: edge.key,
                faces: [fa, fb],
                endpoints,
            });
            graph.adjacency[sa].push(Adjacent {
                slot: sb,
                edge: index,
            });
            graph.adjacency[sb].push(Adjacent {
                slot: sa,
                edge: index,
            });
        }

        if unmatched > 0 {
            tracing::warn!(
                unmatched,
                seam_tolerance,
                "shared edges without two coincident corners left out of the dual graph"
            );
        }

        graph
    }

    pub fn edges(&self) -> &[PolyEdge] {
        &self.edges
    }

    pub fn edge(&self, index: usize) -> Option<&PolyEdge> {
        self.edges.get(index)
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Neighbours of the face at `slot`, in edge insertion order
    pub fn neighbors(&self, slot: usize) -> &[Adjacent] {
        self.adjacency.get(slot).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn face_count(&self) -> usize {
        self.adjacency.len()
    }
}

/// First two corner pairs of `a` and `b` closer than `tolerance`, as corners of `a`
fn shared_endpoints(a: &Triangle, b: &Triangle, tolerance: f64) -> Option<[Point3<f64>; 2]> {
    let mut found: Vec<Point3<f64>> = Vec::with_capacity(2);
    for pa in &a.vertices {
        if b.vertices.iter().any(|pb| (pa - pb).norm() < tolerance) {
            found.push(*pa);
            if found.len() == 2 {
                return Some([found[0], found[1]]);
            }
        }
    }
    None
}
