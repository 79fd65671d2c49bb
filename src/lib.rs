// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polyfold
//!
//! Polyhedron face analysis and continuous net unfolding. A triangle mesh is
//! merged into coplanar polygonal faces, the faces are linked through a dual
//! graph, a spanning forest picks the hinges, and a solver produces one rigid
//! transform per face for any unfold progress between folded and flat.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod io;
pub mod kernel;
pub mod unfold;

pub use analysis::{analyze, FaceId, FaceRender, MeshStats, PolyAnalysis, TileType};
pub use config::{AnalysisConfig, RootPlacement};
pub use error::{Result, UnfoldError};
pub use geometry::{MeshBuffer, Primitive};
pub use kernel::Unfolder;
pub use unfold::{unfold, FaceTransform, UnfoldFrame};
