// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Frame exporters: STL of the posed net and a JSON frame report

use crate::analysis::{MeshStats, PolyAnalysis, TileType};
use crate::unfold::UnfoldFrame;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Export a frame, picking the format from the file extension
pub fn export_frame(analysis: &PolyAnalysis, frame: &UnfoldFrame, path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "stl" => export_stl(analysis, frame, path),
        "json" => export_report(analysis, frame, path),
        "gltf" | "glb" => super::export_gltf(analysis, frame, path),
        other => bail!("Unsupported output format '{}' for {:?}", other, path),
    }
}

/// Write every posed face triangle as binary STL
pub fn export_stl(analysis: &PolyAnalysis, frame: &UnfoldFrame, path: &Path) -> Result<()> {
    use stl_io::{Normal, Triangle as StlTriangle, Vertex as StlVertex};

    let mut triangles: Vec<StlTriangle> = Vec::new();
    for transform in frame.iter() {
        let (Some(corners), Some(normal)) = (
            frame.face_triangles(analysis, transform.face),
            frame.face_normal(analysis, transform.face),
        ) else {
            continue;
        };
        for [a, b, c] in corners {
            triangles.push(StlTriangle {
                normal: Normal::new([normal.x as f32, normal.y as f32, normal.z as f32]),
                vertices: [
                    StlVertex::new([a.x as f32, a.y as f32, a.z as f32]),
                    StlVertex::new([b.x as f32, b.y as f32, b.z as f32]),
                    StlVertex::new([c.x as f32, c.y as f32, c.z as f32]),
                ],
            });
        }
    }

    let mut file = File::create(path).context("Failed to create STL file")?;
    stl_io::write_stl(&mut file, triangles.iter()).context("Failed to write STL file")?;

    Ok(())
}

/// One face in a [`FrameReport`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceReport {
    pub id: usize,
    pub tile: TileType,
    pub sides: usize,
    pub parent: Option<usize>,
    /// Full dihedral angle to the parent, radians
    pub dihedral: f64,
    /// Angle applied at this progress, radians
    pub angle: f64,
    /// Column-major 4×4 transform
    pub matrix: [f64; 16],
}

/// Serializable snapshot of one unfold frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameReport {
    pub progress: f64,
    pub stats: MeshStats,
    pub faces: Vec<FaceReport>,
    /// Faces with no transform this frame
    pub skipped: Vec<usize>,
}

impl FrameReport {
    pub fn new(analysis: &PolyAnalysis, frame: &UnfoldFrame) -> Self {
        let forest = analysis.forest();
        let mut faces = Vec::with_capacity(frame.len());
        for transform in frame.iter() {
            let Some(slot) = analysis.slot(transform.face) else {
                continue;
            };
            let mut matrix = [0.0; 16];
            matrix.copy_from_slice(transform.matrix().as_slice());
            faces.push(FaceReport {
                id: transform.face.0,
                tile: analysis.tile(transform.face).unwrap_or(TileType::Other),
                sides: analysis.faces()[slot].side_count(),
                parent: forest
                    .node_for_slot(slot)
                    .and_then(|node| node.parent)
                    .map(|p| p.0),
                dihedral: transform.dihedral,
                angle: transform.angle,
                matrix,
            });
        }

        let skipped = analysis
            .faces()
            .iter()
            .filter(|face| !frame.contains(face.id))
            .map(|face| face.id.0)
            .collect();

        Self {
            progress: frame.progress(),
            stats: analysis.stats(),
            faces,
            skipped,
        }
    }
}

/// Write a [`FrameReport`] as pretty JSON
pub fn export_report(analysis: &PolyAnalysis, frame: &UnfoldFrame, path: &Path) -> Result<()> {
    let report = FrameReport::new(analysis, frame);
    let json = serde_json::to_string_pretty(&report).context("Failed to serialize frame report")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write report: {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::config::AnalysisConfig;
    use crate::geometry::builtin;
    use crate::unfold::unfold;
    use tempfile::NamedTempFile;

    #[test]
    fn test_export_stl() -> Result<()> {
        let config = AnalysisConfig::default();
        let analysis = analyze(&builtin("cube").unwrap(), &config)?;
        let frame = unfold(&analysis, &config.unfold, 1.0);

        let file = NamedTempFile::with_suffix(".stl")?;
        export_frame(&analysis, &frame, file.path())?;

        let mut reader = File::open(file.path())?;
        let stl = stl_io::read_stl(&mut reader)?;
        assert_eq!(stl.faces.len(), 12);
        Ok(())
    }

    #[test]
    fn test_frame_report() {
        let config = AnalysisConfig::default();
        let analysis = analyze(&builtin("tetrahedron").unwrap(), &config).unwrap();
        let frame = unfold(&analysis, &config.unfold, 0.5);
        let report = FrameReport::new(&analysis, &frame);

        assert_eq!(report.progress, 0.5);
        assert_eq!(report.faces.len(), 4);
        assert!(report.skipped.is_empty());
        assert_eq!(report.faces[0].parent, None);
        assert!(report.faces[1..].iter().all(|f| f.parent.is_some()));
        for face in &report.faces {
            assert_eq!(face.tile, TileType::Equilateral);
            assert_eq!(face.sides, 3);
            assert_eq!(face.matrix[15], 1.0);
        }
    }

    #[test]
    fn test_unknown_extension() {
        let config = AnalysisConfig::default();
        let analysis = analyze(&builtin("cube").unwrap(), &config).unwrap();
        let frame = unfold(&analysis, &config.unfold, 0.0);
        assert!(export_frame(&analysis, &frame, Path::new("net.obj")).is_err());
    }
}
