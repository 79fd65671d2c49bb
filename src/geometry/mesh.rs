// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh buffers and triangle ingestion

use super::keys::{EdgeKey, VertexKey};
use crate::config::AnalysisConfig;
use crate::error::{Result, UnfoldError};
use nalgebra::{Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Triangle soup as handed over by a mesh source
///
/// `positions` holds three floats per vertex. Without `indices` every three
/// consecutive vertices form a triangle; with `indices` every three indices do.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshBuffer {
    pub positions: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indices: Option<Vec<u32>>,
}

impl MeshBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn non_indexed(positions: Vec<f64>) -> Self {
        Self {
            positions,
            indices: None,
        }
    }

    pub fn indexed(positions: Vec<f64>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            indices: Some(indices),
        }
    }

    /// Build from single-precision positions, as most renderers keep them
    pub fn from_f32(positions: &[f32], indices: Option<Vec<u32>>) -> Self {
        Self {
            positions: positions.iter().map(|&p| p as f64).collect(),
            indices,
        }
    }

    /// Number of vertices in the position buffer
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Number of triangles described, degenerate ones included
    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.vertex_count() / 3,
        }
    }

    /// Append a triangle given by three positions, dropping any index buffer
    /// in favour of an equivalent non-indexed one
    pub fn push_triangle(&mut self, corners: [Point3<f64>; 3]) {
        if self.indices.is_some() {
            self.positions = self.expanded_positions();
            self.indices = None;
        }
        for corner in corners {
            self.positions.extend_from_slice(&[corner.x, corner.y, corner.z]);
        }
    }

    /// Merge with another buffer (no welding)
    pub fn merge(&mut self, other: &MeshBuffer) {
        match (&mut self.indices, &other.indices) {
            (Some(indices), Some(other_indices)) => {
                let offset = self.positions.len() as u32 / 3;
                indices.extend(other_indices.iter().map(|i| i + offset));
                self.positions.extend_from_slice(&other.positions);
            }
            _ => {
                self.positions = self.expanded_positions();
                self.indices = None;
                self.positions.extend(other.expanded_positions());
            }
        }
    }

    /// Transform all positions by a matrix
    pub fn transform(&mut self, matrix: &Matrix4<f64>) {
        for chunk in self.positions.chunks_exact_mut(3) {
            let p = matrix.transform_point(&Point3::new(chunk[0], chunk[1], chunk[2]));
            chunk.copy_from_slice(&[p.x, p.y, p.z]);
        }
    }

    /// Hex SHA-256 over positions and indices, used as mesh identity
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for value in &self.positions {
            hasher.update(value.to_bits().to_le_bytes());
        }
        match &self.indices {
            Some(indices) => {
                hasher.update(b"indexed");
                for index in indices {
                    hasher.update(index.to_le_bytes());
                }
            }
            None => hasher.update(b"soup"),
        }
        format!("{:x}", hasher.finalize())
    }

    /// Positions with the index buffer applied; out-of-range indices are skipped
    fn expanded_positions(&self) -> Vec<f64> {
        match &self.indices {
            None => self.positions.clone(),
            Some(indices) => {
                let vertex_count = self.vertex_count();
                indices
                    .chunks_exact(3)
                    .filter(|tri| tri.iter().all(|&i| (i as usize) < vertex_count))
                    .flat_map(|tri| tri.iter().copied())
                    .flat_map(|i| {
                        let base = i as usize * 3;
                        self.positions[base..base + 3].iter().copied()
                    })
                    .collect()
            }
        }
    }

    fn point(&self, vertex: usize) -> Point3<f64> {
        let base = vertex * 3;
        Point3::new(
            self.positions[base],
            self.positions[base + 1],
            self.positions[base + 2],
        )
    }

    /// Validate the buffers and materialize the non-degenerate triangle list
    pub fn triangles(&self, config: &AnalysisConfig) -> Result<Ingested> {
        if self.positions.len() % 3 != 0 {
            return Err(UnfoldError::MalformedPositions(self.positions.len()));
        }
        let vertex_count = self.vertex_count();

        let corners: Vec<[usize; 3]> = match &self.indices {
            Some(indices) => {
                if indices.len() % 3 != 0 {
                    return Err(UnfoldError::MalformedIndices(indices.len()));
                }
                if let Some(&bad) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                    return Err(UnfoldError::IndexOutOfBounds {
                        index: bad as usize,
                        vertex_count,
                    });
                }
                indices
                    .chunks_exact(3)
                    .map(|tri| [tri[0] as usize, tri[1] as usize, tri[2] as usize])
                    .collect()
            }
            None => {
                if vertex_count % 3 != 0 {
                    return Err(UnfoldError::IncompleteTriangle(vertex_count));
                }
                (0..vertex_count / 3)
                    .map(|t| [3 * t, 3 * t + 1, 3 * t + 2])
                    .collect()
            }
        };

        let scale = config.key_scale();
        let mut triangles = Vec::with_capacity(corners.len());
        let mut degenerate = 0;
        for [i0, i1, i2] in corners {
            match Triangle::new(
                [self.point(i0), self.point(i1), self.point(i2)],
                scale,
                config.degenerate_epsilon,
            ) {
                Some(triangle) => triangles.push(triangle),
                None => degenerate += 1,
            }
        }

        if degenerate > 0 {
            tracing::debug!(degenerate, kept = triangles.len(), "dropped degenerate triangles");
        }

        Ok(Ingested {
            triangles,
            degenerate,
        })
    }
}

/// Triangles that survived ingestion
#[derive(Debug, Clone)]
pub struct Ingested {
    pub triangles: Vec<Triangle>,
    /// Number of zero-area triangles dropped
    pub degenerate: usize,
}

/// One non-degenerate input triangle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Triangle {
    pub vertices: [Point3<f64>; 3],
    pub normal: Vector3<f64>,
    pub keys: [VertexKey; 3],
}

impl Triangle {
    /// Build a triangle, or `None` when it has (near) zero area or two
    /// corners quantize onto the same key
    pub fn new(vertices: [Point3<f64>; 3], scale: f64, epsilon: f64) -> Option<Self> {
        let cross = (vertices[1] - vertices[0]).cross(&(vertices[2] - vertices[0]));
        let magnitude = cross.norm();
        // Negated so NaN coordinates count as degenerate, overflow too.
        if !(magnitude > epsilon && magnitude.is_finite()) {
            return None;
        }

        let keys = [
            VertexKey::new(&vertices[0], scale),
            VertexKey::new(&vertices[1], scale),
            VertexKey::new(&vertices[2], scale),
        ];
        if keys[0] == keys[1] || keys[1] == keys[2] || keys[0] == keys[2] {
            return None;
        }

        Some(Self {
            vertices,
            normal: cross / magnitude,
            keys,
        })
    }

    /// Edge `i` runs from corner `i` to corner `i + 1`
    pub fn edge_key(&self, i: usize) -> EdgeKey {
        EdgeKey::new(self.keys[i], self.keys[(i + 1) % 3])
    }

    pub fn edge_keys(&self) -> [EdgeKey; 3] {
        [self.edge_key(0), self.edge_key(1), self.edge_key(2)]
    }

    pub fn area(&self) -> f64 {
        (self.vertices[1] - self.vertices[0])
            .cross(&(self.vertices[2] - self.vertices[0]))
            .norm()
            / 2.0
    }

    pub fn centroid(&self) -> Point3<f64> {
        Point3::from((self.vertices[0].coords + self.vertices[1].coords + self.vertices[2].coords) / 3.0)
    }
}
