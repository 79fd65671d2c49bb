// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Round-trip import/export tests

use anyhow::Result;
use approx::assert_relative_eq;
use polyfold::geometry::builtin;
use polyfold::io::{self, FrameReport};
use polyfold::{analyze, unfold, AnalysisConfig, FaceId, RootPlacement, TileType};
use std::fs::File;
use tempfile::{tempdir, NamedTempFile};

#[test]
fn test_stl_import_analyzes_like_the_source() -> Result<()> {
    use stl_io::{Normal, Triangle as StlTriangle, Vertex as StlVertex};

    let config = AnalysisConfig::default();
    let source = builtin("octagonal-prism").unwrap();
    let triangles: Vec<StlTriangle> = source
        .triangles(&config)?
        .triangles
        .iter()
        .map(|t| {
            let [a, b, c] = t.vertices.map(|v| StlVertex::new([v.x as f32, v.y as f32, v.z as f32]));
            StlTriangle {
                normal: Normal::new([t.normal.x as f32, t.normal.y as f32, t.normal.z as f32]),
                vertices: [a, b, c],
            }
        })
        .collect();

    let file = NamedTempFile::with_suffix(".stl")?;
    let mut writer = File::create(file.path())?;
    stl_io::write_stl(&mut writer, triangles.iter())?;
    drop(writer);

    let imported = io::import_mesh(file.path())?;
    assert!(imported.indices.is_some());

    let a = analyze(&source, &config)?.stats();
    let b = analyze(&imported, &config)?.stats();
    assert_eq!(a.face_count, b.face_count);
    assert_eq!(a.edge_count, b.edge_count);
    assert_eq!(a.vertex_count, b.vertex_count);
    assert_eq!(a.tiles, b.tiles);

    Ok(())
}

#[test]
fn test_json_mesh_roundtrip() -> Result<()> {
    let mesh = builtin("two-cubes").unwrap();

    let file = NamedTempFile::with_suffix(".json")?;
    std::fs::write(file.path(), serde_json::to_string(&mesh)?)?;

    let imported = io::import_mesh(file.path())?;
    assert_eq!(imported.fingerprint(), mesh.fingerprint());

    Ok(())
}

#[test]
fn test_flat_net_reimports_as_one_face() -> Result<()> {
    let mut config = AnalysisConfig::default();
    config.unfold.root_placement = RootPlacement::Ground;
    let analysis = analyze(&builtin("cube").unwrap(), &config)?;
    let frame = unfold(&analysis, &config.unfold, 1.0);

    let file = NamedTempFile::with_suffix(".stl")?;
    io::export_frame(&analysis, &frame, file.path())?;

    let net = analyze(&io::import_stl(file.path())?, &config)?;
    let stats = net.stats();
    assert_eq!(stats.face_count, 1);
    assert_eq!(stats.triangle_count, 12);
    // Six unit squares, five shared hinge edges
    assert_eq!(net.faces()[0].side_count(), 14);
    assert!((stats.surface_area - 6.0).abs() < 1e-4);

    Ok(())
}

#[test]
fn test_glb_nodes_carry_frame_matrices() -> Result<()> {
    let config = AnalysisConfig::default();
    let analysis = analyze(&builtin("tetrahedron").unwrap(), &config)?;
    let frame = unfold(&analysis, &config.unfold, 0.75);

    let dir = tempdir()?;
    let path = dir.path().join("net.glb");
    io::export_frame(&analysis, &frame, &path)?;

    let bytes = std::fs::read(&path)?;
    assert_eq!(&bytes[0..4], b"glTF");
    let json_length = u32::from_le_bytes(bytes[12..16].try_into()?) as usize;
    assert_eq!(&bytes[16..20], b"JSON");
    let gltf: serde_json::Value = serde_json::from_slice(&bytes[20..20 + json_length])?;

    let nodes = gltf["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 4);
    for node in nodes {
        let face: usize = serde_json::from_value(node["extras"]["face"].clone())?;
        let transform = frame.get(FaceId(face)).unwrap();
        assert_eq!(node["extras"]["tile"], TileType::Equilateral.as_str());

        let matrix: Vec<f64> = serde_json::from_value(node["matrix"].clone())?;
        for (a, b) in matrix.iter().zip(transform.matrix().as_slice()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }
    }

    Ok(())
}

#[test]
fn test_frame_report_roundtrip() -> Result<()> {
    let config = AnalysisConfig::default();
    let analysis = analyze(&builtin("two-cubes").unwrap(), &config)?;
    let frame = unfold(&analysis, &config.unfold, 0.3);

    let file = NamedTempFile::with_suffix(".json")?;
    io::export_frame(&analysis, &frame, file.path())?;

    let report: FrameReport = serde_json::from_str(&std::fs::read_to_string(file.path())?)?;
    assert_eq!(report.progress, 0.3);
    assert_eq!(report.faces.len(), 12);
    assert_eq!(report.stats.component_count, 2);
    assert_eq!(report.faces.iter().filter(|f| f.parent.is_none()).count(), 2);

    Ok(())
}
