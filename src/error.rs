// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for mesh ingestion and configuration

use thiserror::Error;

/// Errors raised while turning a mesh buffer into analysable triangles.
///
/// Degenerate triangles are not errors; they are dropped and counted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnfoldError {
    /// Position buffer length is not a multiple of three.
    #[error("position buffer has {0} floats, expected a multiple of 3")]
    MalformedPositions(usize),

    /// Index buffer length is not a multiple of three.
    #[error("index buffer has {0} entries, expected a multiple of 3")]
    MalformedIndices(usize),

    /// An index references a vertex past the end of the position buffer.
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfBounds { index: usize, vertex_count: usize },

    /// Non-indexed buffer whose vertex count does not form whole triangles.
    #[error("non-indexed buffer has {0} vertices, expected a multiple of 3")]
    IncompleteTriangle(usize),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for core engine operations.
pub type Result<T> = std::result::Result<T, UnfoldError>;
