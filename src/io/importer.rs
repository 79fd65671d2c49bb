// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh importers

use crate::geometry::{builtin, MeshBuffer, BUILTIN_NAMES};
use anyhow::{bail, Context, Result};
use std::fs::File;
use std::path::Path;

/// Prefix selecting a fixture solid instead of a file
pub const BUILTIN_PREFIX: &str = "builtin:";

/// Load an STL file (binary or ASCII) as an indexed mesh buffer
pub fn import_stl(path: impl AsRef<Path>) -> Result<MeshBuffer> {
    let path = path.as_ref();
    let mut file =
        File::open(path).with_context(|| format!("Failed to open STL file: {:?}", path))?;
    let stl = stl_io::read_stl(&mut file)
        .with_context(|| format!("Failed to read STL file: {:?}", path))?;

    // stl_io returns an IndexedMesh with welded vertices and faces
    let positions = stl
        .vertices
        .iter()
        .flat_map(|v| [v[0] as f64, v[1] as f64, v[2] as f64])
        .collect();
    let indices = stl
        .faces
        .iter()
        .flat_map(|face| face.vertices.map(|i| i as u32))
        .collect();

    Ok(MeshBuffer::indexed(positions, indices))
}

/// Load a JSON mesh buffer: `{"positions": [...], "indices": [...]}`
pub fn import_json(path: impl AsRef<Path>) -> Result<MeshBuffer> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read mesh file: {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse mesh file: {:?}", path))
}

/// Load a mesh file, picking the format from its extension
pub fn import_mesh(path: impl AsRef<Path>) -> Result<MeshBuffer> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "stl" => import_stl(path),
        "json" => import_json(path),
        other => bail!("Unsupported mesh format '{}' for {:?}", other, path),
    }
}

/// Resolve a command-line input: `builtin:<name>` or a mesh file path
pub fn load_input(input: &str) -> Result<MeshBuffer> {
    match input.strip_prefix(BUILTIN_PREFIX) {
        Some(name) => builtin(name).with_context(|| {
            format!(
                "Unknown builtin '{}', expected one of: {}",
                name,
                BUILTIN_NAMES.join(", ")
            )
        }),
        None => import_mesh(input),
    }
}
