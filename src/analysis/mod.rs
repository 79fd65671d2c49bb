// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polyhedron analysis pipeline
//!
//! Triangles are merged into coplanar faces, faces are linked into a dual
//! graph, a spanning forest picks the hinges and every face gets a tile type.
//! The result is an immutable snapshot rebuilt whenever the mesh changes.

mod classify;
mod dual;
mod forest;
mod merge;
mod stats;
mod union_find;

pub use classify::{classify_face, classify_triangle, TileType};
pub use dual::{Adjacent, DualGraph, PolyEdge};
pub use forest::{HingeNode, SpanningForest};
pub use merge::{merge_faces, BoundaryEdge, EdgeUse, EdgeUsage, FaceId, FaceMerge, PolyFace};
pub use stats::MeshStats;
pub use union_find::UnionFind;

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::geometry::{MeshBuffer, Triangle, VertexKey};
use ahash::{AHashMap, AHashSet};

/// Everything derived from one mesh
#[derive(Debug, Clone)]
pub struct PolyAnalysis {
    triangles: Vec<Triangle>,
    degenerate: usize,
    faces: Vec<PolyFace>,
    slots: AHashMap<FaceId, usize>,
    face_of: Vec<FaceId>,
    usage: EdgeUsage,
    dual: DualGraph,
    forest: SpanningForest,
    tiles: Vec<TileType>,
}

/// Per-face data a renderer needs to draw one polygon
#[derive(Debug, Clone)]
pub struct FaceRender<'a> {
    pub id: FaceId,
    pub triangles: Vec<&'a Triangle>,
    pub boundary: &'a [BoundaryEdge],
    pub side_count: usize,
    pub tile: TileType,
    pub face: &'a PolyFace,
}

/// Run the full analysis on a mesh buffer
pub fn analyze(mesh: &MeshBuffer, config: &AnalysisConfig) -> Result<PolyAnalysis> {
    config.validate()?;
    let ingested = mesh.triangles(config)?;
    let analysis = PolyAnalysis::from_triangles(ingested.triangles, ingested.degenerate, config);

    tracing::info!(
        triangles = analysis.triangles.len(),
        degenerate = analysis.degenerate,
        faces = analysis.faces.len(),
        poly_edges = analysis.dual.edge_count(),
        components = analysis.forest.component_count(),
        "mesh analyzed"
    );

    Ok(analysis)
}

impl PolyAnalysis {
    /// Build every stage from already-ingested triangles
    pub fn from_triangles(
        triangles: Vec<Triangle>,
        degenerate: usize,
        config: &AnalysisConfig,
    ) -> Self {
        let merge = merge_faces(&triangles, config);
        let dual = DualGraph::build(&triangles, &merge, config.seam_tolerance);
        let FaceMerge {
            faces,
            face_of,
            slots,
            usage,
        } = merge;

        let forest = SpanningForest::build(&faces, &dual);
        let tiles = faces
            .iter()
            .map(|face| classify_face(face, &config.classifier))
            .collect();

        Self {
            triangles,
            degenerate,
            faces,
            slots,
            face_of,
            usage,
            dual,
            forest,
            tiles,
        }
    }

    /// Kept triangles; face membership indexes into this list
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Number of zero-area triangles dropped at ingestion
    pub fn degenerate_count(&self) -> usize {
        self.degenerate
    }

    /// Faces in enumeration (ascending id) order
    pub fn faces(&self) -> &[PolyFace] {
        &self.faces
    }

    pub fn face(&self, id: FaceId) -> Option<&PolyFace> {
        self.slots.get(&id).map(|&slot| &self.faces[slot])
    }

    /// Position of a face in [`Self::faces`]
    pub fn slot(&self, id: FaceId) -> Option<usize> {
        self.slots.get(&id).copied()
    }

    /// Face owning a kept triangle
    pub fn face_of_triangle(&self, triangle: usize) -> Option<FaceId> {
        self.face_of.get(triangle).copied()
    }

    pub fn edge_usage(&self) -> &EdgeUsage {
        &self.usage
    }

    pub fn dual(&self) -> &DualGraph {
        &self.dual
    }

    pub fn forest(&self) -> &SpanningForest {
        &self.forest
    }

    #[cfg(test)]
    pub(crate) fn forest_mut(&mut self) -> &mut SpanningForest {
        &mut self.forest
    }

    pub fn tile(&self, id: FaceId) -> Option<TileType> {
        self.slot(id).map(|slot| self.tiles[slot])
    }

    /// Distinct vertex keys over all kept triangles
    pub fn vertex_count(&self) -> usize {
        let keys: AHashSet<VertexKey> = self
            .triangles
            .iter()
            .flat_map(|t| t.keys.iter().copied())
            .collect();
        keys.len()
    }

    /// Distinct mesh edges lying on at least one face outline
    pub fn edge_count(&self) -> usize {
        let keys: AHashSet<_> = self
            .faces
            .iter()
            .flat_map(|f| f.boundary.iter().map(|b| b.key))
            .collect();
        keys.len()
    }

    /// Distinct vertex keys touched by face outlines
    pub fn outline_vertex_count(&self) -> usize {
        let keys: AHashSet<VertexKey> = self
            .faces
            .iter()
            .flat_map(|f| f.boundary.iter().flat_map(|b| [b.start_key, b.end_key]))
            .collect();
        keys.len()
    }

    /// Render data for every face, in face order
    pub fn render_faces(&self) -> impl Iterator<Item = FaceRender<'_>> + '_ {
        self.faces.iter().zip(&self.tiles).map(|(face, &tile)| FaceRender {
            id: face.id,
            triangles: face.triangles.iter().map(|&t| &self.triangles[t]).collect(),
            boundary: &face.boundary,
            side_count: face.side_count(),
            tile,
            face,
        })
    }

    pub fn stats(&self) -> MeshStats {
        MeshStats::from_analysis(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;
    use crate::UnfoldError;
    use nalgebra::Vector3;

    #[test]
    fn test_analyze_cube() {
        let mesh = Primitive::cube(Vector3::new(1.0, 1.0, 1.0), true).to_mesh();
        let analysis = analyze(&mesh, &AnalysisConfig::default()).unwrap();

        assert_eq!(analysis.faces().len(), 6);
        assert_eq!(analysis.vertex_count(), 8);
        assert_eq!(analysis.edge_count(), 12);
        assert_eq!(analysis.dual().edge_count(), 12);
        for render in analysis.render_faces() {
            assert_eq!(render.tile, TileType::Quad);
            assert_eq!(render.side_count, 4);
            assert_eq!(render.triangles.len(), 2);
        }
    }

    #[test]
    fn test_face_lookup() {
        let mesh = Primitive::cube(Vector3::new(1.0, 1.0, 1.0), true).to_mesh();
        let analysis = analyze(&mesh, &AnalysisConfig::default()).unwrap();

        let id = analysis.face_of_triangle(3).unwrap();
        assert_eq!(id, FaceId(2));
        assert_eq!(analysis.face(id).unwrap().triangles, vec![2, 3]);
        assert_eq!(analysis.tile(id), Some(TileType::Quad));
        assert!(analysis.face(FaceId(1)).is_none());
        assert!(analysis.tile(FaceId(99)).is_none());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mesh = Primitive::tetrahedron(1.0).to_mesh();
        let config = AnalysisConfig {
            seam_tolerance: -1.0,
            ..AnalysisConfig::default()
        };
        assert!(matches!(
            analyze(&mesh, &config),
            Err(UnfoldError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_empty_mesh() {
        let analysis = analyze(&MeshBuffer::new(), &AnalysisConfig::default()).unwrap();
        assert!(analysis.faces().is_empty());
        assert_eq!(analysis.forest().component_count(), 0);
        assert_eq!(analysis.render_faces().count(), 0);
    }
}
