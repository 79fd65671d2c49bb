// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - importing meshes and exporting unfold frames

mod export_gltf;
mod exporter;
mod importer;

pub use export_gltf::export as export_gltf;
pub use exporter::{export_frame, export_report, export_stl, FaceReport, FrameReport};
pub use importer::{import_json, import_mesh, import_stl, load_input, BUILTIN_PREFIX};
