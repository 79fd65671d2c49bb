// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Tolerance-based identity for points and undirected edges

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Quantized vertex position
///
/// Each coordinate is scaled by `10^decimals` and rounded, so two points
/// closer than half a step on every axis share a key. Used for identity only,
/// never for geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VertexKey(pub [i64; 3]);

impl VertexKey {
    /// Quantize a point with the given scale (`10^decimals`)
    pub fn new(point: &Point3<f64>, scale: f64) -> Self {
        Self([
            quantize(point.x, scale),
            quantize(point.y, scale),
            quantize(point.z, scale),
        ])
    }
}

fn quantize(value: f64, scale: f64) -> i64 {
    // `as` saturates and maps NaN to 0.
    (value * scale).round() as i64
}

/// Undirected edge between two vertex keys, smallest key first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeKey {
    pub a: VertexKey,
    pub b: VertexKey,
}

impl EdgeKey {
    pub fn new(v0: VertexKey, v1: VertexKey) -> Self {
        if v0 <= v1 {
            Self { a: v0, b: v1 }
        } else {
            Self { a: v1, b: v0 }
        }
    }

    /// True when both endpoints collapsed onto one key
    pub fn is_degenerate(&self) -> bool {
        self.a == self.b
    }
}
