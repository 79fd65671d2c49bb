// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! GLTF/GLB exporter
//!
//! Every face becomes its own node holding the face's original geometry; the
//! node matrix carries the face transform, so a viewer can animate the fold by
//! swapping matrices alone.

use crate::analysis::PolyAnalysis;
use crate::unfold::UnfoldFrame;
use anyhow::{Context, Result};
use nalgebra::Point3;
use serde_json::json;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Export a frame to GLTF or GLB format
pub fn export(analysis: &PolyAnalysis, frame: &UnfoldFrame, path: &Path) -> Result<()> {
    let is_glb = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("glb"));

    if is_glb {
        export_glb(analysis, frame, path)
    } else {
        export_gltf_separate(analysis, frame, path)
    }
}

/// Export to GLB (binary GLTF)
fn export_glb(analysis: &PolyAnalysis, frame: &UnfoldFrame, path: &Path) -> Result<()> {
    let (gltf_json_val, buffer_data) = create_gltf_json(analysis, frame, None);

    let json_string = serde_json::to_string(&gltf_json_val)?;
    let mut json_offset = json_string.len();
    align_to_multiple_of_four(&mut json_offset);
    let json_padding = json_offset - json_string.len();

    let mut buffer_offset = buffer_data.len();
    align_to_multiple_of_four(&mut buffer_offset);
    let buffer_padding = buffer_offset - buffer_data.len();

    let total_length = 12 + 8 + json_offset + 8 + buffer_offset;

    let mut file =
        File::create(path).with_context(|| format!("Failed to create GLB file: {:?}", path))?;

    // GLB header
    file.write_all(&0x46546C67u32.to_le_bytes())?; // magic: "glTF"
    file.write_all(&2u32.to_le_bytes())?; // version
    file.write_all(&(total_length as u32).to_le_bytes())?;

    // JSON chunk
    file.write_all(&(json_offset as u32).to_le_bytes())?;
    file.write_all(&0x4E4F534Au32.to_le_bytes())?; // type: "JSON"
    file.write_all(json_string.as_bytes())?;
    file.write_all(&vec![b' '; json_padding])?;

    // BIN chunk
    file.write_all(&(buffer_offset as u32).to_le_bytes())?;
    file.write_all(&0x004E4942u32.to_le_bytes())?; // type: "BIN\0"
    file.write_all(&buffer_data)?;
    file.write_all(&vec![0u8; buffer_padding])?;

    Ok(())
}

/// Export to GLTF with a sibling .bin file
fn export_gltf_separate(analysis: &PolyAnalysis, frame: &UnfoldFrame, path: &Path) -> Result<()> {
    let bin_path = path.with_extension("bin");
    let uri = bin_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("data.bin")
        .to_string();
    let (gltf_json_val, buffer_data) = create_gltf_json(analysis, frame, Some(uri));

    let json_string = serde_json::to_string_pretty(&gltf_json_val)?;
    std::fs::write(path, json_string)
        .with_context(|| format!("Failed to write GLTF file: {:?}", path))?;
    std::fs::write(&bin_path, buffer_data)
        .with_context(|| format!("Failed to write GLTF buffer: {:?}", bin_path))?;

    Ok(())
}

fn create_gltf_json(
    analysis: &PolyAnalysis,
    frame: &UnfoldFrame,
    uri: Option<String>,
) -> (serde_json::Value, Vec<u8>) {
    let mut buffer_data = Vec::new();
    let mut nodes = Vec::new();
    let mut meshes = Vec::new();
    let mut accessors = Vec::new();
    let mut buffer_views = Vec::new();

    for render in analysis.render_faces() {
        // Faces without a transform are not drawn
        let Some(transform) = frame.get(render.id) else {
            continue;
        };
        let corners: Vec<Point3<f64>> = render
            .triangles
            .iter()
            .flat_map(|t| t.vertices.iter().copied())
            .collect();
        let (min_pos, max_pos) = calculate_bounds(&corners);

        // Write positions
        let position_offset = buffer_data.len();
        for p in &corners {
            for c in [p.x, p.y, p.z] {
                buffer_data.extend_from_slice(&(c as f32).to_le_bytes());
            }
        }
        let position_length = buffer_data.len() - position_offset;

        // Write normals
        let normal_offset = buffer_data.len();
        let normal = render.face.normal;
        for _ in &corners {
            for c in [normal.x, normal.y, normal.z] {
                buffer_data.extend_from_slice(&(c as f32).to_le_bytes());
            }
        }
        let normal_length = buffer_data.len() - normal_offset;

        let view = buffer_views.len();
        buffer_views.push(json!({
            "buffer": 0,
            "byteOffset": position_offset,
            "byteLength": position_length,
            "target": 34962
        }));
        buffer_views.push(json!({
            "buffer": 0,
            "byteOffset": normal_offset,
            "byteLength": normal_length,
            "target": 34962
        }));

        let accessor = accessors.len();
        accessors.push(json!({
            "bufferView": view,
            "byteOffset": 0,
            "componentType": 5126,
            "count": corners.len(),
            "type": "VEC3",
            "min": min_pos,
            "max": max_pos
        }));
        accessors.push(json!({
            "bufferView": view + 1,
            "byteOffset": 0,
            "componentType": 5126,
            "count": corners.len(),
            "type": "VEC3"
        }));

        meshes.push(json!({
            "name": render.id.to_string(),
            "primitives": [
                {
                    "attributes": {
                        "POSITION": accessor,
                        "NORMAL": accessor + 1
                    },
                    "mode": 4
                }
            ]
        }));

        let matrix: Vec<f64> = transform.matrix().as_slice().to_vec();
        nodes.push(json!({
            "name": render.id.to_string(),
            "mesh": meshes.len() - 1,
            "matrix": matrix,
            "extras": {
                "face": render.id.0,
                "tile": render.tile.as_str(),
                "sides": render.side_count,
                "angle": transform.angle
            }
        }));
    }

    let mut buffer = json!({ "byteLength": buffer_data.len() });
    if let Some(uri) = uri {
        buffer["uri"] = json!(uri);
    }

    let gltf = json!({
        "asset": {
            "generator": "Polyfold",
            "version": "2.0"
        },
        "scene": 0,
        "scenes": [
            {
                "nodes": (0..nodes.len()).collect::<Vec<_>>(),
                "extras": { "progress": frame.progress() }
            }
        ],
        "nodes": nodes,
        "meshes": meshes,
        "accessors": accessors,
        "bufferViews": buffer_views,
        "buffers": [buffer]
    });

    (gltf, buffer_data)
}

fn calculate_bounds(points: &[Point3<f64>]) -> ([f32; 3], [f32; 3]) {
    let mut min = [f32::MAX, f32::MAX, f32::MAX];
    let mut max = [f32::MIN, f32::MIN, f32::MIN];

    for p in points {
        for (axis, value) in [p.x, p.y, p.z].into_iter().enumerate() {
            min[axis] = min[axis].min(value as f32);
            max[axis] = max[axis].max(value as f32);
        }
    }

    (min, max)
}

fn align_to_multiple_of_four(n: &mut usize) {
    *n = (*n + 3) & !3;
}
