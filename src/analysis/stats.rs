// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polyhedron statistics

use super::{PolyAnalysis, TileType};
use crate::geometry::BoundingBox;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary numbers of one analyzed mesh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshStats {
    /// Triangles kept after ingestion
    pub triangle_count: usize,
    /// Zero-area triangles dropped at ingestion
    pub degenerate_count: usize,
    /// Distinct quantized vertices
    pub vertex_count: usize,
    /// Distinct vertices on face outlines
    pub outline_vertex_count: usize,
    /// Distinct mesh edges on face outlines
    pub edge_count: usize,
    pub face_count: usize,
    /// Dual graph edges (face adjacencies)
    pub poly_edge_count: usize,
    pub hinge_count: usize,
    pub cut_count: usize,
    pub component_count: usize,
    /// Edges used by three or more triangles
    pub non_manifold_edges: usize,
    pub surface_area: f64,
    pub bbox: [f64; 6],
    /// Faces per side count
    pub sides: BTreeMap<usize, usize>,
    /// Faces per tile type
    pub tiles: BTreeMap<TileType, usize>,
}

impl MeshStats {
    pub fn from_analysis(analysis: &PolyAnalysis) -> Self {
        let faces = analysis.faces();
        let forest = analysis.forest();
        let dual = analysis.dual();

        let mut sides = BTreeMap::new();
        let mut tiles = BTreeMap::new();
        for render in analysis.render_faces() {
            *sides.entry(render.side_count).or_insert(0) += 1;
            *tiles.entry(render.tile).or_insert(0) += 1;
        }

        let bounds =
            BoundingBox::from_points(analysis.triangles().iter().flat_map(|t| t.vertices.iter()));
        let bbox = if bounds.is_empty() {
            [0.0; 6]
        } else {
            [
                bounds.min.x,
                bounds.min.y,
                bounds.min.z,
                bounds.max.x,
                bounds.max.y,
                bounds.max.z,
            ]
        };

        let hinge_count = forest.hinge_count();
        Self {
            triangle_count: analysis.triangles().len(),
            degenerate_count: analysis.degenerate_count(),
            vertex_count: analysis.vertex_count(),
            outline_vertex_count: analysis.outline_vertex_count(),
            edge_count: analysis.edge_count(),
            face_count: faces.len(),
            poly_edge_count: dual.edge_count(),
            hinge_count,
            cut_count: dual.edge_count() - hinge_count,
            component_count: forest.component_count(),
            non_manifold_edges: analysis.edge_usage().non_manifold_count(),
            surface_area: faces.iter().map(|f| f.area).sum(),
            bbox,
            sides,
            tiles,
        }
    }

    /// V - E + F over the polygonal surface
    ///
    /// Uses outline vertices so interior tessellation vertices of merged
    /// faces do not count.
    pub fn euler_characteristic(&self) -> i64 {
        self.outline_vertex_count as i64 - self.edge_count as i64 + self.face_count as i64
    }

    /// A closed, manifold, connected surface of genus zero
    pub fn is_closed_sphere(&self) -> bool {
        self.component_count == 1 && self.non_manifold_edges == 0 && self.euler_characteristic() == 2
    }

    /// Pretty print statistics
    pub fn print(&self) {
        println!("╔══════════════════════════════════════════════════════════╗");
        println!("║              POLYHEDRON ANALYSIS                         ║");
        println!("╠══════════════════════════════════════════════════════════╣");
        println!(
            "║ Triangles:       {:>10}   (degenerate {:>6})        ║",
            self.triangle_count, self.degenerate_count
        );
        println!(
            "║ Vertices:        {:>10}   (outline    {:>6})        ║",
            self.vertex_count, self.outline_vertex_count
        );
        println!(
            "║ Edges:           {:>10}                              ║",
            self.edge_count
        );
        println!(
            "║ Faces:           {:>10}                              ║",
            self.face_count
        );
        println!(
            "║ Euler (V-E+F):   {:>10}                              ║",
            self.euler_characteristic()
        );
        println!("║                                                          ║");
        println!(
            "║ Adjacencies:     {:>10}                              ║",
            self.poly_edge_count
        );
        println!(
            "║ Hinges / Cuts:   {:>10} / {:<10}                 ║",
            self.hinge_count, self.cut_count
        );
        println!(
            "║ Components:      {:>10}                              ║",
            self.component_count
        );
        println!(
            "║ Surface Area:    {:>10.4}                              ║",
            self.surface_area
        );
        println!(
            "║ Size: {:>9.3} × {:>9.3} × {:>9.3}                  ║",
            self.bbox[3] - self.bbox[0],
            self.bbox[4] - self.bbox[1],
            self.bbox[5] - self.bbox[2]
        );
        println!("║                                                          ║");
        println!("║ Tiles:                                                   ║");
        for (tile, count) in &self.tiles {
            println!("║   {:<18} {:>8}                              ║", tile.as_str(), count);
        }
        println!("╚══════════════════════════════════════════════════════════╝");
    }
}
