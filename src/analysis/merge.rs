// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Coplanar face merging
//!
//! Triangles sharing an edge with near-parallel normals are joined into one
//! polygonal face. The decision is purely local to each edge, so a flat face
//! tessellated into hundreds of triangles still becomes a single [`PolyFace`].

use super::union_find::UnionFind;
use crate::config::AnalysisConfig;
use crate::geometry::{EdgeKey, Triangle, VertexKey};
use ahash::AHashMap;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable face identifier: the union-find root triangle index
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FaceId(pub usize);

impl fmt::Display for FaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F{}", self.0)
    }
}

/// Triangles using one undirected mesh edge
#[derive(Debug, Clone)]
pub struct EdgeUse {
    pub key: EdgeKey,
    pub triangles: Vec<usize>,
}

/// Edge usage map in first-seen order
#[derive(Debug, Clone, Default)]
pub struct EdgeUsage {
    edges: Vec<EdgeUse>,
    index: AHashMap<EdgeKey, usize>,
}

impl EdgeUsage {
    pub fn build(triangles: &[Triangle]) -> Self {
        let mut usage = Self::default();
        for (t, triangle) in triangles.iter().enumerate() {
            for key in triangle.edge_keys() {
                let slot = *usage.index.entry(key).or_insert_with(|| {
                    usage.edges.push(EdgeUse {
                        key,
                        triangles: Vec::with_capacity(2),
                    });
                    usage.edges.len() - 1
                });
                usage.edges[slot].triangles.push(t);
            }
        }
        usage
    }

    pub fn iter(&self) -> impl Iterator<Item = &EdgeUse> {
        self.edges.iter()
    }

    pub fn get(&self, key: &EdgeKey) -> Option<&EdgeUse> {
        self.index.get(key).map(|&slot| &self.edges[slot])
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Edges used by three or more triangles
    pub fn non_manifold_count(&self) -> usize {
        self.edges.iter().filter(|e| e.triangles.len() > 2).count()
    }
}

/// Directed outline segment of a face, in its triangle's winding order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryEdge {
    pub key: EdgeKey,
    pub start: Point3<f64>,
    pub end: Point3<f64>,
    pub start_key: VertexKey,
    pub end_key: VertexKey,
    /// Triangle that owns the segment
    pub triangle: usize,
}

impl BoundaryEdge {
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }
}

/// A maximal group of coplanar, edge-connected triangles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolyFace {
    pub id: FaceId,
    /// Member triangle indices, ascending
    pub triangles: Vec<usize>,
    /// Unit normal of the first member triangle
    pub normal: Vector3<f64>,
    /// Edges used by exactly one member triangle
    pub boundary: Vec<BoundaryEdge>,
    pub area: f64,
    /// Area-weighted centroid
    pub centroid: Point3<f64>,
}

impl PolyFace {
    /// Number of polygon sides: outline segments, interior edges excluded
    pub fn side_count(&self) -> usize {
        self.boundary.len()
    }

    /// Outline segments chained into closed loops
    ///
    /// A face with a hole yields several loops. A chain that cannot be closed
    /// (non-manifold outline) is returned open.
    pub fn outline(&self) -> Vec<Vec<Point3<f64>>> {
        let mut used = vec![false; self.boundary.len()];
        let mut loops = Vec::new();

        for start in 0..self.boundary.len() {
            if used[start] {
                continue;
            }
            used[start] = true;
            let first = self.boundary[start].start_key;
            let mut current = self.boundary[start].end_key;
            let mut points = vec![self.boundary[start].start];

            while current != first {
                let next = (0..self.boundary.len())
                    .find(|&i| !used[i] && self.boundary[i].start_key == current);
                match next {
                    Some(i) => {
                        used[i] = true;
                        points.push(self.boundary[i].start);
                        current = self.boundary[i].end_key;
                    }
                    None => break,
                }
            }

            loops.push(points);
        }

        loops
    }

    /// Outline vertices where the outline changes direction
    ///
    /// Collinear segments from a subdivided edge count as one side here.
    pub fn corner_count(&self) -> usize {
        self.outline()
            .iter()
            .map(|points| {
                let n = points.len();
                (0..n)
                    .filter(|&i| {
                        let incoming = points[i] - points[(i + n - 1) % n];
                        let outgoing = points[(i + 1) % n] - points[i];
                        incoming.cross(&outgoing).norm()
                            > 1e-6 * incoming.norm() * outgoing.norm()
                    })
                    .count()
            })
            .sum()
    }
}

/// Result of the merge stage
#[derive(Debug, Clone)]
pub struct FaceMerge {
    /// Faces in ascending id order
    pub faces: Vec<PolyFace>,
    /// Triangle index to face id, filled once after union-find settles
    pub face_of: Vec<FaceId>,
    /// Face id to position in `faces`
    pub slots: AHashMap<FaceId, usize>,
    pub usage: EdgeUsage,
}

/// Group triangles into coplanar polygonal faces
pub fn merge_faces(triangles: &[Triangle], config: &AnalysisConfig) -> FaceMerge {
    let usage = EdgeUsage::build(triangles);
    let mut uf = UnionFind::new(triangles.len());

    for edge in usage.iter() {
        // Only edges shared by exactly two triangles fold through
        if let [a, b] = edge.triangles[..] {
            if triangles[a].normal.dot(&triangles[b].normal) > config.coplanar_dot {
                uf.union(a, b);
            }
        }
    }

    let face_of: Vec<FaceId> = uf.roots().into_iter().map(FaceId).collect();

    let mut slots: AHashMap<FaceId, usize> = AHashMap::new();
    let mut members: Vec<Vec<usize>> = Vec::new();
    for (t, &id) in face_of.iter().enumerate() {
        let slot = *slots.entry(id).or_insert_with(|| {
            members.push(Vec::new());
            members.len() - 1
        });
        members[slot].push(t);
    }

    let faces = members
        .into_iter()
        .map(|tris| build_face(triangles, tris))
        .collect();

    FaceMerge {
        faces,
        face_of,
        slots,
        usage,
    }
}

fn build_face(triangles: &[Triangle], members: Vec<usize>) -> PolyFace {
    // Roots are the smallest member, which is also the first one pushed.
    let id = FaceId(members[0]);
    let normal = triangles[members[0]].normal;

    let mut counts: AHashMap<EdgeKey, usize> = AHashMap::new();
    for &t in &members {
        for key in triangles[t].edge_keys() {
            *counts.entry(key).or_insert(0) += 1;
        }
    }

    let mut boundary = Vec::new();
    let mut area = 0.0;
    let mut weighted = Vector3::zeros();
    for &t in &members {
        let triangle = &triangles[t];
        let triangle_area = triangle.area();
        area += triangle_area;
        weighted += triangle.centroid().coords * triangle_area;

        for i in 0..3 {
            let key = triangle.edge_key(i);
            if counts.get(&key) == Some(&1) {
                let j = (i + 1) % 3;
                boundary.push(BoundaryEdge {
                    key,
                    start: triangle.vertices[i],
                    end: triangle.vertices[j],
                    start_key: triangle.keys[i],
                    end_key: triangle.keys[j],
                    triangle: t,
                });
            }
        }
    }

    let centroid = if area > 0.0 {
        Point3::from(weighted / area)
    } else {
        triangles[members[0]].centroid()
    };

    PolyFace {
        id,
        triangles: members,
        normal,
        boundary,
        area,
        centroid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{MeshBuffer, Primitive};

    fn merged(mesh: &MeshBuffer) -> (Vec<Triangle>, FaceMerge) {
        let config = AnalysisConfig::default();
        let triangles = mesh.triangles(&config).unwrap().triangles;
        let merge = merge_faces(&triangles, &config);
        (triangles, merge)
    }

    #[test]
    fn test_cube_merges_into_six_quads() {
        let mesh = Primitive::cube(Vector3::new(2.0, 2.0, 2.0), true).to_mesh();
        let (_, merge) = merged(&mesh);

        assert_eq!(merge.faces.len(), 6);
        for face in &merge.faces {
            assert_eq!(face.triangles.len(), 2);
            assert_eq!(face.side_count(), 4);
            assert_eq!(face.corner_count(), 4);
            assert!((face.area - 4.0).abs() < 1e-9);
            // Centroid sits on the face, one unit out along the normal
            assert!((face.centroid.coords - face.normal).norm() < 1e-9);
        }
    }

    #[test]
    fn test_face_ids_are_smallest_member() {
        let mesh = Primitive::cube(Vector3::new(1.0, 1.0, 1.0), true).to_mesh();
        let (_, merge) = merged(&mesh);

        let ids: Vec<usize> = merge.faces.iter().map(|f| f.id.0).collect();
        assert_eq!(ids, vec![0, 2, 4, 6, 8, 10]);
        for face in &merge.faces {
            assert!(face.triangles.iter().all(|&t| merge.face_of[t] == face.id));
            let position = ids.iter().position(|&i| i == face.id.0);
            assert_eq!(merge.slots.get(&face.id).copied(), position);
        }
    }

    #[test]
    fn test_tessellated_face_collapses() {
        let mesh = Primitive::tessellated_cube(3.0, 5).to_mesh();
        let (_, merge) = merged(&mesh);

        assert_eq!(merge.faces.len(), 6);
        for face in &merge.faces {
            assert_eq!(face.triangles.len(), 50);
            // 5 segments per cube edge, interior edges excluded
            assert_eq!(face.side_count(), 20);
            assert_eq!(face.outline().len(), 1);
            assert_eq!(face.outline()[0].len(), 20);
            assert_eq!(face.corner_count(), 4);
        }
    }

    #[test]
    fn test_icosahedron_does_not_merge() {
        let mesh = Primitive::icosahedron(1.0).to_mesh();
        let (_, merge) = merged(&mesh);
        assert_eq!(merge.faces.len(), 20);
        assert_eq!(merge.usage.len(), 30);
        assert!(merge.usage.iter().all(|e| e.triangles.len() == 2));
    }

    #[test]
    fn test_non_manifold_edge_is_not_merged_across() {
        // Three triangles sharing the edge from (0,0,0) to (1,0,0)
        let mut mesh = MeshBuffer::new();
        mesh.push_triangle([
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        ]);
        mesh.push_triangle([
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.5, -1.0, 0.0),
        ]);
        mesh.push_triangle([
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.5, -2.0, 0.0),
        ]);
        let (_, merge) = merged(&mesh);

        assert_eq!(merge.usage.non_manifold_count(), 1);
        assert_eq!(merge.faces.len(), 3);
    }
}
